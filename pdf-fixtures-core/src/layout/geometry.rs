use crate::error::{FixtureError, Result};

/// Page size, margins and type metrics used to size lines and pages.
///
/// Character width is approximated as `font_size * char_width_factor`,
/// which is close enough for Helvetica filler text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub font_size: f64,
    pub line_height: f64,
    pub char_width_factor: f64,
}

impl PageGeometry {
    /// US Letter with one-inch margins, 12pt text on 14pt leading.
    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin: 72.0,
            font_size: 12.0,
            line_height: 14.0,
            char_width_factor: 0.6,
        }
    }

    /// ISO A4 with the same margins and metrics as [`PageGeometry::letter`].
    pub fn a4() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            ..Self::letter()
        }
    }

    pub fn with_font(mut self, font_size: f64, line_height: f64) -> Self {
        self.font_size = font_size;
        self.line_height = line_height;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn text_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn text_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    pub fn chars_per_line(&self) -> usize {
        whole_units(self.text_width() / (self.font_size * self.char_width_factor))
    }

    pub fn lines_per_page(&self) -> usize {
        whole_units(self.text_height() / self.line_height)
    }

    /// Baseline of the first line, measured from the bottom edge.
    pub fn first_baseline(&self) -> f64 {
        self.height - self.margin - self.font_size
    }

    /// Rejects geometry that cannot hold a single character or line.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("font size", self.font_size),
            ("line height", self.line_height),
            ("character width factor", self.char_width_factor),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(FixtureError::invalid(format!(
                    "Page {name} must be a positive number, got {value}"
                )));
            }
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(FixtureError::invalid(format!(
                "Page margin must not be negative, got {}",
                self.margin
            )));
        }
        if self.chars_per_line() == 0 {
            return Err(FixtureError::invalid(
                "Page geometry leaves no room for a single character per line",
            ));
        }
        if self.lines_per_page() == 0 {
            return Err(FixtureError::invalid(
                "Page geometry leaves no room for a single line per page",
            ));
        }
        Ok(())
    }
}

// Floors a ratio, tolerating representation error so 468 / (12 * 0.6)
// counts as 65 rather than 64.
fn whole_units(ratio: f64) -> usize {
    if ratio.is_finite() && ratio > 0.0 {
        (ratio + 1e-9).floor() as usize
    } else {
        0
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_metrics() {
        let geometry = PageGeometry::letter();
        // 468pt text width / 7.2pt per char
        assert_eq!(geometry.chars_per_line(), 65);
        // 648pt text height / 14pt leading
        assert_eq!(geometry.lines_per_page(), 46);
        assert_eq!(geometry.first_baseline(), 708.0);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_a4_metrics() {
        let geometry = PageGeometry::a4();
        assert_eq!(geometry.chars_per_line(), 62);
        assert_eq!(geometry.lines_per_page(), 49);
    }

    #[test]
    fn test_custom_font() {
        let geometry = PageGeometry::letter().with_font(11.0, 14.0);
        // 468 / 6.6 = 70.9
        assert_eq!(geometry.chars_per_line(), 70);
        assert_eq!(geometry.lines_per_page(), 46);
    }

    #[test]
    fn test_validate_rejects_degenerate_geometry() {
        let no_width = PageGeometry {
            width: 0.0,
            ..PageGeometry::letter()
        };
        assert!(matches!(
            no_width.validate(),
            Err(FixtureError::InvalidParameter(_))
        ));

        let margins_eat_page = PageGeometry::letter().with_margin(400.0);
        assert!(margins_eat_page.validate().is_err());

        let negative_margin = PageGeometry::letter().with_margin(-1.0);
        assert!(negative_margin.validate().is_err());

        let nan_font = PageGeometry::letter().with_font(f64::NAN, 14.0);
        assert!(nan_font.validate().is_err());
        assert_eq!(nan_font.chars_per_line(), 0);

        let huge_leading = PageGeometry::letter().with_font(12.0, 1000.0);
        assert!(huge_leading.validate().is_err());
    }
}
