use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::{
    assets::unpremultiply_rgba8_in_place,
    error::{IconError, IconResult},
};

/// Encode the finished premultiplied canvas as a PNG byte stream.
///
/// PNG carries straight alpha, so the canvas is un-premultiplied on a copy
/// before serialization; the full RGBA channel set is preserved losslessly.
pub fn encode_png(canvas: &RgbaImage) -> IconResult<Vec<u8>> {
    let mut straight = canvas.clone();
    unpremultiply_rgba8_in_place(&mut straight);

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(straight)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|err| IconError::encode(format!("write png: {err}")))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn encoded_png_decodes_to_the_same_bounds() {
        let canvas = RgbaImage::from_pixel(7, 3, Rgba([255, 0, 0, 255]));
        let bytes = encode_png(&canvas).unwrap();
        let back = image::load_from_memory(&bytes).unwrap();
        assert_eq!(back.width(), 7);
        assert_eq!(back.height(), 3);
    }

    #[test]
    fn encoded_png_restores_straight_alpha() {
        // premultiplied half-alpha red
        let canvas = RgbaImage::from_pixel(1, 1, Rgba([128, 0, 0, 128]));
        let bytes = encode_png(&canvas).unwrap();
        let back = image::load_from_memory(&bytes).unwrap().to_rgba8();
        let px = back.get_pixel(0, 0).0;
        assert_eq!(px[3], 128);
        assert!(px[0] >= 254, "{px:?}");
    }
}
