// ABOUTME: Software glyph renderer used as the last fallback tier
// ABOUTME: Samples the decoded map per cell and maps luminance onto a density ramp

use super::{GridSize, ImageProtocol};
use crate::constants::ascii::{ALPHA_THRESHOLD, DECODE_ERROR, RAMP};
use anyhow::Result;
use image::RgbaImage;

pub struct AsciiProtocol;

impl AsciiProtocol {
    /// Render without failing: undecodable bytes yield a placeholder.
    pub fn render(&self, data: &[u8], grid: GridSize) -> String {
        match image::load_from_memory(data) {
            Ok(img) => render_rgba(&img.to_rgba8(), grid),
            Err(e) => {
                log::warn!("Could not decode map image: {}", e);
                DECODE_ERROR.to_string()
            }
        }
    }
}

impl ImageProtocol for AsciiProtocol {
    fn name(&self) -> &'static str {
        "ascii"
    }

    fn render_image(&self, data: &[u8], grid: GridSize) -> Result<String> {
        Ok(self.render(data, grid))
    }
}

/// One glyph per cell, a newline after every row.
pub fn render_rgba(img: &RgbaImage, grid: GridSize) -> String {
    let (src_w, src_h) = img.dimensions();
    if src_w == 0 || src_h == 0 || grid.cols == 0 || grid.rows == 0 {
        return String::new();
    }

    let cols = u32::from(grid.cols);
    let rows = u32::from(grid.rows);
    let mut out = String::with_capacity(((cols + 1) * rows) as usize);

    for row in 0..rows {
        let y = sample_index(row, src_h, rows);
        for col in 0..cols {
            let x = sample_index(col, src_w, cols);
            let [r, g, b, a] = img.get_pixel(x, y).0;
            out.push(glyph(r, g, b, a));
        }
        out.push('\n');
    }

    out
}

/// Nearest source pixel for a cell: `floor(i * src / grid)`, clamped.
fn sample_index(cell: u32, src_extent: u32, grid_extent: u32) -> u32 {
    let scaled = u64::from(cell) * u64::from(src_extent) / u64::from(grid_extent);
    (scaled as u32).min(src_extent - 1)
}

fn glyph(r: u8, g: u8, b: u8, a: u8) -> char {
    if a < ALPHA_THRESHOLD {
        return ' ';
    }
    let lum = (u32::from(r) + u32::from(g) + u32::from(b)) / 3;
    let index = (255 - lum) * (RAMP.len() as u32 - 1) / 255;
    RAMP[index as usize] as char
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn encode(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_black_is_dense_and_transparent_is_blank() {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 1, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 1, Rgba([128, 128, 128, 255]));

        let frame = AsciiProtocol.render(&encode(&img), GridSize::new(2, 2));
        let lines: Vec<&str> = frame.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].chars().next(), Some('@'));
        assert_eq!(lines[0].chars().nth(1), Some(' '));
        assert_eq!(lines[1].chars().next(), Some(' '));
        assert_eq!(lines[1].chars().nth(1), Some('='));
    }

    #[test]
    fn test_output_has_one_glyph_per_cell() {
        let img = RgbaImage::from_pixel(10, 7, Rgba([40, 80, 120, 255]));
        let frame = render_rgba(&img, GridSize::new(40, 15));

        assert_eq!(frame.lines().count(), 15);
        assert!(frame.lines().all(|line| line.chars().count() == 40));
        assert!(frame.ends_with('\n'));
    }

    #[test]
    fn test_downsampling_picks_nearest_pixel() {
        // Left half black, right half white
        let img = RgbaImage::from_fn(8, 2, |x, _| {
            if x < 4 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let frame = render_rgba(&img, GridSize::new(4, 1));
        assert_eq!(frame, "@@  \n");
    }

    #[test]
    fn test_alpha_threshold() {
        assert_eq!(glyph(0, 0, 0, 127), ' ');
        assert_eq!(glyph(0, 0, 0, 128), '@');
    }

    #[test]
    fn test_sample_index_clamps() {
        assert_eq!(sample_index(0, 3, 10), 0);
        assert_eq!(sample_index(9, 3, 10), 2);
        assert_eq!(sample_index(1, 1, 2), 0);
    }

    #[test]
    fn test_decode_error_placeholder() {
        let frame = AsciiProtocol.render(b"not a png", GridSize::new(40, 15));
        assert_eq!(frame, "[Image decode error]");
    }

    #[test]
    fn test_never_fails_through_trait() {
        let result = AsciiProtocol.render_image(&[], GridSize::new(40, 15));
        assert_eq!(result.unwrap(), DECODE_ERROR);
    }
}
