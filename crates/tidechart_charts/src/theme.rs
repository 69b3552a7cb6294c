//! Light and dark chart palettes.

use crate::surface::Color;

/// Chrome colors for one theme. Line colors come from the dataset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub grid_line: Color,
    pub label_text: Color,
    pub guide_line: Color,
    pub tooltip_bg: Color,
    pub tooltip_text: Color,
}

const LIGHT: Palette = Palette {
    background: Color::WHITE,
    grid_line: Color::rgba(0.949, 0.949, 0.949, 1.0),
    label_text: Color::from_hex(0xa5a5a5),
    guide_line: Color::from_hex(0xdfe6eb),
    tooltip_bg: Color::WHITE,
    tooltip_text: Color::from_hex(0x222222),
};

const DARK: Palette = Palette {
    background: Color::from_hex(0x242f3e),
    grid_line: Color::from_hex(0x293544),
    label_text: Color::from_hex(0x546778),
    guide_line: Color::from_hex(0x3b4a5a),
    tooltip_bg: Color::from_hex(0x253241),
    tooltip_text: Color::WHITE,
};

/// Theme selection, toggled at runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChartTheme {
    pub dark: bool,
}

impl ChartTheme {
    pub fn toggled(self) -> ChartTheme {
        ChartTheme { dark: !self.dark }
    }

    pub fn palette(self) -> &'static Palette {
        if self.dark {
            &DARK
        } else {
            &LIGHT
        }
    }
}
