use font8x8::{UnicodeFonts, BASIC_FONTS};
use plotters::coord::Shift;
use plotters::prelude::*;
use crate::graph::GraphError;

const GLYPH_SIZE: i32 = 8;
const BOX_PADDING: i32 = 2;

#[derive(Debug, Clone)]
pub struct TextStyle {
    pub color: RGBColor,
    pub scale: u32,
    pub bold: bool,
    pub background: Option<RGBColor>,
}

/// Pixel width and height of `text` at the given glyph scale.
pub fn text_size(text: &str, scale: u32) -> (i32, i32) {
    let scale = scale as i32;
    let chars = text.chars().count() as i32;
    (chars * GLYPH_SIZE * scale, GLYPH_SIZE * scale)
}

/// Rasterize `text` centred on `center` using the 8x8 bitmap font.
///
/// Characters outside the basic latin block are drawn as blanks.
pub fn draw_text_centered<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    center: (i32, i32),
    style: &TextStyle,
) -> Result<(), GraphError> {
    let scale = style.scale.max(1) as i32;
    let (width, height) = text_size(text, style.scale.max(1));
    let x0 = center.0 - width / 2;
    let y0 = center.1 - height / 2;

    if let Some(bg) = style.background {
        let top_left = (x0 - BOX_PADDING, y0 - BOX_PADDING);
        let bottom_right = (x0 + width + BOX_PADDING, y0 + height + BOX_PADDING);
        area.draw(&Rectangle::new([top_left, bottom_right], bg.filled()))?;
    }

    // Bold is a one pixel horizontal smear
    let extra = if style.bold { 1 } else { 0 };

    for (ci, ch) in text.chars().enumerate() {
        let glyph = match BASIC_FONTS.get(ch) {
            Some(glyph) => glyph,
            None => continue,
        };
        let gx = x0 + ci as i32 * GLYPH_SIZE * scale;

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if *bits & (1u8 << col) == 0 {
                    continue;
                }
                let x = gx + col * scale;
                let y = y0 + row as i32 * scale;
                let cell = [(x, y), (x + scale - 1 + extra, y + scale - 1)];
                area.draw(&Rectangle::new(cell, style.color.filled()))?;
            }
        }
    }

    Ok(())
}

// -- Unit tests --
