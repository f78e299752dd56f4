// Artwork rasterization: RGBA -> 1 bpp ordered-dither bitmap

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::RgbaImage;

// 4x4 Bayer matrix, scaled to 0..=255 thresholds
const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Monochrome raster, rows packed MSB first, 1 = dot printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl MonoImage {
    /// Composite over white, convert to luma, then ordered-dither
    pub fn from_rgba(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let stride = Self::stride_for(width);
        let mut data = vec![0u8; stride * height as usize];

        for (x, y, pixel) in image.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = f32::from(a) / 255.0;
            let over_white = |c: u8| f32::from(c) * alpha + 255.0 * (1.0 - alpha);
            let luma =
                0.299 * over_white(r) + 0.587 * over_white(g) + 0.114 * over_white(b);

            let threshold = f32::from(BAYER_4X4[(y % 4) as usize][(x % 4) as usize]) * 16.0 + 8.0;
            if luma < threshold {
                let idx = y as usize * stride + (x / 8) as usize;
                data[idx] |= 0x80 >> (x % 8);
            }
        }

        Self {
            width,
            height,
            data,
        }
    }

    fn stride_for(width: u32) -> usize {
        (width as usize).div_ceil(8)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed raster bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_black_and_white() {
        let mut img = RgbaImage::from_pixel(10, 2, Rgba([255, 255, 255, 255]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(9, 1, Rgba([0, 0, 0, 255]));

        let mono = MonoImage::from_rgba(&img);

        assert_eq!((mono.width(), mono.height()), (10, 2));
        // 10 dots -> 2 bytes per row
        assert_eq!(mono.data(), &[0b1000_0000, 0, 0, 0b0100_0000]);
    }

    #[test]
    fn test_transparent_pixels_print_as_white() {
        let img = RgbaImage::from_pixel(8, 1, Rgba([0, 0, 0, 0]));
        assert_eq!(MonoImage::from_rgba(&img).data(), &[0]);
    }

    #[test]
    fn test_mid_grey_is_dithered_to_half_coverage() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([128, 128, 128, 255]));
        let mono = MonoImage::from_rgba(&img);
        let dots: u32 = mono.data().iter().map(|b| b.count_ones()).sum();
        assert_eq!(dots, 8);
    }

    #[test]
    fn test_base64() {
        let img = RgbaImage::from_pixel(8, 1, Rgba([0, 0, 0, 255]));
        assert_eq!(MonoImage::from_rgba(&img).to_base64(), "/w==");
    }
}
