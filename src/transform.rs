use image::{Rgba, RgbaImage, imageops};

use crate::catalog::Layer;

/// Run a decoded layer image through resize, flip, and rotate, in that order.
pub fn apply(layer: &Layer, src: RgbaImage, canvas_w: u32, canvas_h: u32) -> RgbaImage {
    let mut img = resize(layer, src, canvas_w, canvas_h);
    if layer.flip_x {
        imageops::flip_horizontal_in_place(&mut img);
    }
    if layer.flip_y {
        imageops::flip_vertical_in_place(&mut img);
    }
    rotate(img, layer.rotate)
}

/// Scale to a fraction of the canvas dimension, preserving the source aspect
/// ratio. A set `scale_x` drives the width and derives the height; otherwise
/// a set `scale_y` drives the height; otherwise the source size is kept.
fn resize(layer: &Layer, src: RgbaImage, canvas_w: u32, canvas_h: u32) -> RgbaImage {
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return src;
    }

    let (new_w, new_h) = if layer.scale_x_set() {
        let new_w = (f64::from(canvas_w) * layer.scale_x) as u32;
        let new_h = (f64::from(new_w) * f64::from(h) / f64::from(w)) as u32;
        (new_w, new_h)
    } else if layer.scale_y_set() {
        let new_h = (f64::from(canvas_h) * layer.scale_y) as u32;
        let new_w = (f64::from(new_h) * f64::from(w) / f64::from(h)) as u32;
        (new_w, new_h)
    } else {
        return src;
    };

    imageops::resize(
        &src,
        new_w.max(1),
        new_h.max(1),
        imageops::FilterType::Triangle,
    )
}

/// Rotate clockwise by `degrees` around the image center, growing the output
/// to the rotated bounding box so no corner is clipped. Sampling is
/// inverse-mapped bilinear over premultiplied pixels; area outside the source
/// stays transparent. Angles are normalized modulo 360 and a normalized angle
/// of 0 is the identity.
fn rotate(src: RgbaImage, degrees: f64) -> RgbaImage {
    let angle = degrees.rem_euclid(360.0);
    if angle == 0.0 {
        return src;
    }

    let (sin, cos) = angle.to_radians().sin_cos();
    let (w, h) = (f64::from(src.width()), f64::from(src.height()));
    let out_w = rotated_extent(w * cos.abs() + h * sin.abs());
    let out_h = rotated_extent(w * sin.abs() + h * cos.abs());

    let (cx, cy) = (w / 2.0, h / 2.0);
    let (ocx, ocy) = (f64::from(out_w) / 2.0, f64::from(out_h) / 2.0);

    let mut out = RgbaImage::new(out_w, out_h);
    for y in 0..out_h {
        for x in 0..out_w {
            let dx = f64::from(x) + 0.5 - ocx;
            let dy = f64::from(y) + 0.5 - ocy;
            // inverse of the clockwise rotation, back into source space
            let sx = dx * cos + dy * sin + cx - 0.5;
            let sy = -dx * sin + dy * cos + cy - 0.5;
            out.put_pixel(x, y, sample_bilinear(&src, sx, sy));
        }
    }
    out
}

/// Bounding-box extents collapse to exact integers at right angles; keep them
/// exact instead of ceiling float noise up to an extra pixel.
fn rotated_extent(v: f64) -> u32 {
    let r = v.round();
    let v = if (v - r).abs() < 1e-9 { r } else { v.ceil() };
    (v as u32).max(1)
}

fn sample_bilinear(src: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (w, h) = (i64::from(src.width()), i64::from(src.height()));
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = x - x0;
    let ty = y - y0;

    let mut acc = [0.0f64; 4];
    for (dx, wx) in [(0i64, 1.0 - tx), (1, tx)] {
        for (dy, wy) in [(0i64, 1.0 - ty), (1, ty)] {
            let weight = wx * wy;
            if weight <= 0.0 {
                continue;
            }
            let px = x0 as i64 + dx;
            let py = y0 as i64 + dy;
            if px < 0 || py < 0 || px >= w || py >= h {
                continue; // transparent outside the source
            }
            let p = src.get_pixel(px as u32, py as u32).0;
            for c in 0..4 {
                acc[c] += f64::from(p[c]) * weight;
            }
        }
    }

    Rgba([
        acc[0].round().min(255.0) as u8,
        acc[1].round().min(255.0) as u8,
        acc[2].round().min(255.0) as u8,
        acc[3].round().min(255.0) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Position};

    fn subject(scale_x: f64, scale_y: f64) -> Layer {
        let mut layer = Layer::new(Category::Subject, "", Position::Center);
        layer.scale_x = scale_x;
        layer.scale_y = scale_y;
        layer
    }

    fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(px))
    }

    #[test]
    fn unset_scales_keep_source_dimensions() {
        let src = solid(64, 32, [1, 2, 3, 255]);
        let out = apply(&subject(0.0, 0.0), src.clone(), 200, 100);
        assert_eq!(out.dimensions(), (64, 32));
        assert_eq!(out, src);
    }

    #[test]
    fn scale_x_drives_width_and_preserves_aspect() {
        let src = solid(64, 32, [1, 2, 3, 255]);
        let out = apply(&subject(0.5, 0.0), src, 200, 100);
        let (w, h) = out.dimensions();
        assert_eq!(w, 100);
        // newHeight == round(newWidth * srcH / srcW) within 1px
        let expected = (f64::from(w) * 32.0 / 64.0).round();
        assert!((f64::from(h) - expected).abs() <= 1.0, "{w}x{h}");
    }

    #[test]
    fn scale_y_drives_height_and_preserves_aspect() {
        let src = solid(50, 100, [1, 2, 3, 255]);
        let out = apply(&subject(0.0, 0.6), src, 300, 200);
        let (w, h) = out.dimensions();
        assert_eq!(h, 120);
        let expected = (f64::from(h) * 50.0 / 100.0).round();
        assert!((f64::from(w) - expected).abs() <= 1.0, "{w}x{h}");
    }

    #[test]
    fn flip_x_mirrors_horizontally() {
        let mut src = RgbaImage::new(2, 1);
        src.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        src.put_pixel(1, 0, Rgba([0, 255, 0, 255]));

        let mut layer = subject(0.0, 0.0);
        layer.flip_x = true;
        let out = apply(&layer, src, 10, 10);
        assert_eq!(out.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(out.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn flip_y_mirrors_vertically() {
        let mut src = RgbaImage::new(1, 2);
        src.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        src.put_pixel(0, 1, Rgba([0, 255, 0, 255]));

        let mut layer = subject(0.0, 0.0);
        layer.flip_y = true;
        let out = apply(&layer, src, 10, 10);
        assert_eq!(out.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(out.get_pixel(0, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn rotate_0_and_360_are_identity() {
        let src = solid(3, 5, [9, 8, 7, 255]);
        for degrees in [0.0, 360.0, -360.0] {
            let mut layer = subject(0.0, 0.0);
            layer.rotate = degrees;
            let out = apply(&layer, src.clone(), 10, 10);
            assert_eq!(out, src, "rotate {degrees}");
        }
    }

    #[test]
    fn rotate_90_swaps_dimensions_exactly() {
        let src = solid(4, 2, [1, 2, 3, 255]);
        let mut layer = subject(0.0, 0.0);
        layer.rotate = 90.0;
        let out = apply(&layer, src, 10, 10);
        assert_eq!(out.dimensions(), (2, 4));
    }

    #[test]
    fn rotate_90_clockwise_moves_left_to_top() {
        let mut src = RgbaImage::new(2, 1);
        src.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        src.put_pixel(1, 0, Rgba([0, 255, 0, 255]));

        let mut layer = subject(0.0, 0.0);
        layer.rotate = 90.0;
        let out = apply(&layer, src, 10, 10);
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(0, 1).0, [0, 255, 0, 255]);
    }

    #[test]
    fn rotate_45_grows_to_the_bounding_box() {
        let src = solid(10, 10, [1, 2, 3, 255]);
        let mut layer = subject(0.0, 0.0);
        layer.rotate = 45.0;
        let out = apply(&layer, src, 10, 10);
        let expect = (10.0 * std::f64::consts::SQRT_2).ceil() as u32;
        assert_eq!(out.dimensions(), (expect, expect));
        // corners of the grown buffer are outside the rotated square
        assert_eq!(out.get_pixel(0, 0).0[3], 0);
        // center is inside it
        assert_eq!(out.get_pixel(expect / 2, expect / 2).0, [1, 2, 3, 255]);
    }
}
