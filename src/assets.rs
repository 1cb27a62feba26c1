use std::collections::BTreeMap;

use image::RgbaImage;

use crate::error::{IconError, IconResult};

/// Supplies raw decodable image bytes for a layer's `image` reference.
///
/// Implementations live with the caller (filesystem, embedded bundle, sprite
/// download cache); the composition engine itself never touches the network
/// or the filesystem.
pub trait AssetSource {
    fn fetch(&self, reference: &str) -> IconResult<Vec<u8>>;
}

/// In-memory asset source keyed by reference string.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssets {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(reference.into(), bytes);
    }
}

impl AssetSource for MemoryAssets {
    fn fetch(&self, reference: &str) -> IconResult<Vec<u8>> {
        self.entries
            .get(reference)
            .cloned()
            .ok_or_else(|| IconError::asset(format!("asset {reference:?} not found")))
    }
}

/// Decode PNG/JPEG bytes into premultiplied RGBA8.
///
/// All blending and resampling downstream operates on premultiplied pixels;
/// [`crate::encode`] converts back to straight alpha at the output boundary.
pub fn decode_premul(bytes: &[u8]) -> IconResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|err| IconError::decode(format!("decode image from memory: {err}")))?;
    let mut rgba = dyn_img.to_rgba8();
    premultiply_rgba8_in_place(&mut rgba);
    Ok(rgba)
}

pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = (((px[0] as u32 * 255) + a / 2) / a).min(255) as u8;
        px[1] = (((px[1] as u32 * 255) + a / 2) / a).min(255) as u8;
        px[2] = (((px[2] as u32 * 255) + a / 2) / a).min(255) as u8;
    }
}
