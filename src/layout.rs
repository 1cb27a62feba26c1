use crate::{
    catalog::{Category, Layer, Position},
    error::{IconError, IconResult},
};

/// Fixed table of subject arrangements indexed by subject count.
///
/// Built once per composition and never mutated; the built-in presets place
/// one to four subjects in a centered quadrant pattern.
#[derive(Clone, Debug)]
pub struct LayoutTable {
    presets: Vec<Vec<Layer>>,
}

impl LayoutTable {
    /// The default quadrant arrangement:
    /// 1 subject centered at native scale, 2 side by side, 3 one-over-two,
    /// 4 one per quadrant, all scaled to 0.6 of canvas height.
    pub fn builtin() -> Self {
        Self {
            presets: vec![
                vec![Layer::new(Category::Subject, "", Position::Center)],
                vec![slot(-0.4, 0.0), slot(0.4, 0.0)],
                vec![slot(0.0, -0.4), slot(0.4, 0.4), slot(-0.4, 0.4)],
                vec![
                    slot(-0.4, -0.4),
                    slot(0.4, -0.4),
                    slot(0.4, 0.4),
                    slot(-0.4, 0.4),
                ],
            ],
        }
    }

    /// Build a table from catalog-supplied presets, index 0 holding the
    /// single-subject arrangement. Callers validate slot counts and
    /// categories before this point.
    pub fn from_presets(presets: Vec<Vec<Layer>>) -> Self {
        Self { presets }
    }

    /// Slot templates for `count` subjects, in draw order.
    pub fn resolve(&self, count: usize) -> IconResult<&[Layer]> {
        if count == 0 || count > self.presets.len() {
            return Err(IconError::config(format!(
                "no subject layout for {count} subjects (supported: 1..={})",
                self.presets.len()
            )));
        }
        Ok(&self.presets[count - 1])
    }
}

fn slot(offset_x: f64, offset_y: f64) -> Layer {
    let mut layer = Layer::new(Category::Subject, "", Position::Center);
    layer.scale_y = 0.6;
    layer.offset_x = offset_x;
    layer.offset_y = offset_y;
    layer
}
