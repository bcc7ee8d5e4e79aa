use plotters::style::RGBColor;

pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
pub const GRAY: RGBColor = RGBColor(128, 128, 128);
pub const RED: RGBColor = RGBColor(255, 0, 0);
pub const WHITE: RGBColor = RGBColor(255, 255, 255);
pub const BLACK: RGBColor = RGBColor(0, 0, 0);

/// Colors and sizes used when drawing a graph. Sizes are in points and
/// converted to pixels with `dpi`.
#[derive(Debug, Clone)]
pub struct GraphStyle {
    pub node_color: RGBColor,
    pub edge_color: RGBColor,
    pub edge_label_color: RGBColor,
    pub font_color: RGBColor,
    pub node_size: f64, // Marker area in pt^2
    pub font_size: f64,
    pub edge_font_size: f64,
    pub bold_names: bool,
    pub dpi: f64,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            node_color: SKY_BLUE,
            edge_color: GRAY,
            edge_label_color: RED,
            font_color: BLACK,
            node_size: 2000.0,
            font_size: 12.0,
            edge_font_size: 10.0,
            bold_names: true,
            dpi: 100.0,
        }
    }
}

impl GraphStyle {
    fn pt_to_px(&self, pt: f64) -> f64 {
        pt * self.dpi / 72.0
    }

    pub fn node_radius_px(&self) -> i32 {
        let diameter = self.pt_to_px(self.node_size.max(0.0).sqrt());
        ((diameter / 2.0).round() as i32).max(1)
    }

    /// Pixel scale applied to the 8x8 glyphs for a given font size.
    pub fn glyph_scale(&self, font_size: f64) -> u32 {
        (self.pt_to_px(font_size) / 8.0).round().max(1.0) as u32
    }
}

// -- Unit tests --

#[cfg(test)]
mod tests {
    use crate::render::style::GraphStyle;

    #[test]
    fn test_default_sizes() {
        let style = GraphStyle::default();
        // sqrt(2000) pt at 100 dpi is about 62 px across
        assert_eq!(style.node_radius_px(), 31);
        assert_eq!(style.glyph_scale(12.0), 2);
        assert_eq!(style.glyph_scale(1.0), 1);
    }
}
