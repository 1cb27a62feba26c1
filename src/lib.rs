#![forbid(unsafe_code)]

pub mod assets;
pub mod catalog;
pub mod compose;
pub mod composite;
pub mod encode;
pub mod error;
pub mod layout;
pub mod placement;
pub mod transform;

pub use assets::{AssetSource, MemoryAssets};
pub use catalog::{Catalog, Category, CosmeticConfig, EventConfig, Layer, Position};
pub use compose::{CompositionRequest, SubjectImage, compose};
pub use error::{IconError, IconResult};
pub use layout::LayoutTable;
