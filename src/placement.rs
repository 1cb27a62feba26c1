use crate::catalog::Position;

/// Top-left pixel position for a transformed layer on the canvas.
///
/// The anchor gives the base origin; the fractional offsets then shift the
/// layer by a fraction of its *own* width/height, not of the canvas. The
/// result may lie outside the canvas; drawing clips it.
pub fn place(
    position: Position,
    layer_w: u32,
    layer_h: u32,
    canvas_w: u32,
    canvas_h: u32,
    offset_x: f64,
    offset_y: f64,
) -> (i64, i64) {
    let (lw, lh) = (i64::from(layer_w), i64::from(layer_h));
    let (cw, ch) = (i64::from(canvas_w), i64::from(canvas_h));

    let (mut x, mut y) = match position {
        Position::Top => (cw / 2, 0),
        Position::TopLeft => (0, 0),
        Position::TopRight => (cw - lw, 0),
        Position::Bottom => (cw / 2, ch - lh),
        Position::BottomLeft => (0, ch - lh),
        Position::BottomRight => (cw - lw, ch - lh),
        Position::Center => ((cw - lw) / 2, (ch - lh) / 2),
        Position::Left => (0, (ch - lh) / 2),
        Position::Right => (cw - lw, (ch - lh) / 2),
    };

    if offset_x != 0.0 {
        x += (layer_w as f64 * offset_x) as i64;
    }
    if offset_y != 0.0 {
        y += (layer_h as f64 * offset_y) as i64;
    }
    (x, y)
}
