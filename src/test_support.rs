//! In-memory image fixtures for unit tests.

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use std::io::Cursor;

pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .unwrap();
    buf
}

pub fn solid_png(width: u32, height: u32, colour: [u8; 3]) -> Vec<u8> {
    encode_png(&DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        Rgb(colour),
    )))
}

/// 512x512 black with a white square covering pixels 200..=311 on both axes.
pub fn centre_square_mask_png() -> Vec<u8> {
    let img = RgbImage::from_fn(512, 512, |x, y| {
        if (200..312).contains(&x) && (200..312).contains(&y) {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    });
    encode_png(&DynamicImage::ImageRgb8(img))
}
