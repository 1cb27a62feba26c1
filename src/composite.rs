use image::{Rgba, RgbaImage};

pub type PremulRgba8 = [u8; 4];

/// Source-over blend of premultiplied RGBA8 pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Blend `layer` onto `canvas` with its top-left at `(x, y)`, clipped to the
/// canvas bounds. Positions may be negative or overhang; out-of-bounds parts
/// of the layer are dropped.
pub fn draw_over(canvas: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let (lw, lh) = (i64::from(layer.width()), i64::from(layer.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + lw).min(cw);
    let y1 = (y + lh).min(ch);

    for cy in y0..y1 {
        for cx in x0..x1 {
            let src = layer.get_pixel((cx - x) as u32, (cy - y) as u32).0;
            let dst = canvas.get_pixel(cx as u32, cy as u32).0;
            canvas.put_pixel(cx as u32, cy as u32, Rgba(over(dst, src)));
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
