use std::fmt;

use crate::{
    error::{IconError, IconResult},
    layout::LayoutTable,
};

/// Composite order class of a layer. The order is total and fixed:
/// backgrounds draw first, subjects next, cosmetics last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Background,
    Subject,
    Cosmetic,
}

impl Category {
    pub fn order(self) -> u8 {
        match self {
            Category::Background => 0,
            Category::Subject => 1,
            Category::Cosmetic => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Background => "background",
            Category::Subject => "subject",
            Category::Cosmetic => "cosmetic",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named canvas anchor used as the placement base for a layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
    Center,
    Left,
    Right,
}

/// One image plus its transform and placement metadata.
///
/// Scale values are fractions of the canvas dimension; `0.0` and `1.0` both
/// mean "axis unset". Offsets are fractions of the layer's own post-transform
/// size, not of the canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    pub category: Category,
    /// Asset reference resolved by the caller's [`crate::AssetSource`].
    /// Subject layout templates leave this empty; the compositor fills it
    /// with the subject's name.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub scale_x: f64,
    #[serde(default)]
    pub scale_y: f64,
    pub position: Position,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
    /// Rotation in degrees, clockwise. Normalized modulo 360 at render time.
    #[serde(default)]
    pub rotate: f64,
}

impl Layer {
    pub fn new(category: Category, image: impl Into<String>, position: Position) -> Self {
        Self {
            category,
            image: image.into(),
            scale_x: 0.0,
            scale_y: 0.0,
            position,
            offset_x: 0.0,
            offset_y: 0.0,
            flip_x: false,
            flip_y: false,
            rotate: 0.0,
        }
    }

    pub fn scale_x_set(&self) -> bool {
        self.scale_x != 0.0 && self.scale_x != 1.0
    }

    pub fn scale_y_set(&self) -> bool {
        self.scale_y != 0.0 && self.scale_y != 1.0
    }

    /// Identity string used when wrapping errors, e.g. `background layer
    /// "backgrounds/day.png"`.
    pub fn describe(&self) -> String {
        format!("{} layer {:?}", self.category, self.image)
    }

    fn validate(&self, ctx: &str) -> IconResult<()> {
        for (name, v) in [("scale_x", self.scale_x), ("scale_y", self.scale_y)] {
            if !v.is_finite() || v < 0.0 {
                return Err(IconError::config(format!(
                    "{ctx}: {name} must be a finite value >= 0, got {v}"
                )));
            }
        }
        if self.scale_x_set() && self.scale_y_set() {
            return Err(IconError::config(format!(
                "{ctx}: at most one of scale_x/scale_y may be set, got {} and {}",
                self.scale_x, self.scale_y
            )));
        }
        for (name, v) in [("offset_x", self.offset_x), ("offset_y", self.offset_y)] {
            if !v.is_finite() {
                return Err(IconError::config(format!(
                    "{ctx}: {name} must be finite, got {v}"
                )));
            }
        }
        if !self.rotate.is_finite() {
            return Err(IconError::config(format!(
                "{ctx}: rotate must be finite, got {}",
                self.rotate
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct EventConfig {
    pub name: String,
    pub layers: Vec<Layer>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CosmeticConfig {
    pub name: String,
    pub layers: Vec<Layer>,
}

/// One per-subject-count arrangement of subject layer templates.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SubjectLayout {
    pub layers: Vec<Layer>,
}

/// Immutable mapping of event and cosmetic names to layer lists, built once
/// at startup and shared read-only across requests.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub events: Vec<EventConfig>,
    #[serde(default)]
    pub cosmetics: Vec<CosmeticConfig>,
    /// Optional override for the built-in subject layout table. When present
    /// it must cover subject counts 1 through 4.
    #[serde(default)]
    pub subject_layouts: Vec<SubjectLayout>,
}

impl Catalog {
    /// Parse and validate a TOML catalog. The caller does the file I/O.
    pub fn from_toml_str(s: &str) -> IconResult<Self> {
        let catalog: Catalog = toml::from_str(s)
            .map_err(|err| IconError::config(format!("failed to parse catalog: {err}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject invalid layer values up front so rendering never sees them.
    pub fn validate(&self) -> IconResult<()> {
        for event in &self.events {
            for layer in &event.layers {
                layer.validate(&format!("event {:?}", event.name))?;
            }
        }
        for cosmetic in &self.cosmetics {
            for layer in &cosmetic.layers {
                layer.validate(&format!("cosmetic {:?}", cosmetic.name))?;
            }
        }
        if !self.subject_layouts.is_empty() {
            if self.subject_layouts.len() != 4 {
                return Err(IconError::config(format!(
                    "subject_layouts must define arrangements for counts 1..=4, got {}",
                    self.subject_layouts.len()
                )));
            }
            for (i, preset) in self.subject_layouts.iter().enumerate() {
                let count = i + 1;
                if preset.layers.len() != count {
                    return Err(IconError::config(format!(
                        "subject layout {count} must have {count} slots, got {}",
                        preset.layers.len()
                    )));
                }
                for layer in &preset.layers {
                    if layer.category != Category::Subject {
                        return Err(IconError::config(format!(
                            "subject layout {count} contains a {} layer",
                            layer.category
                        )));
                    }
                    layer.validate(&format!("subject layout {count}"))?;
                }
            }
        }
        Ok(())
    }

    pub fn lookup_event(&self, name: &str) -> IconResult<&EventConfig> {
        self.events
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| IconError::config(format!("event {name:?} not found")))
    }

    pub fn lookup_cosmetic(&self, name: &str) -> IconResult<&CosmeticConfig> {
        self.cosmetics
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| IconError::config(format!("cosmetic {name:?} not found")))
    }

    /// Layout table for this catalog: the configured override when present,
    /// the built-in quadrant table otherwise.
    pub fn layout_table(&self) -> LayoutTable {
        if self.subject_layouts.is_empty() {
            LayoutTable::builtin()
        } else {
            LayoutTable::from_presets(
                self.subject_layouts
                    .iter()
                    .map(|p| p.layers.clone())
                    .collect(),
            )
        }
    }
}
