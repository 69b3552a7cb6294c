//! Drawing surface abstraction.
//!
//! The render facade targets [`DrawSurface`], a minimal immediate-mode
//! drawing contract. [`Recording`] is the provided implementation: it
//! captures draw ops as data so a frame can be inspected, diffed, or
//! replayed onto a real backend.

use thiserror::Error;

/// RGBA color, components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Error)]
pub enum ColorParseError {
    #[error("color must be '#rrggbb' or '#rrggbbaa', got {0:?}")]
    BadFormat(String),
    #[error("invalid hex digits in color {0:?}")]
    BadHex(String),
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Color {
        Color { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    /// Opaque color from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Color {
        Color {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex_str(s: &str) -> Result<Color, ColorParseError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let byte = |range: &str| {
            u8::from_str_radix(range, 16).map_err(|_| ColorParseError::BadHex(s.to_owned()))
        };
        match hex.len() {
            6 => Ok(Color::rgb(
                byte(&hex[0..2])? as f32 / 255.0,
                byte(&hex[2..4])? as f32 / 255.0,
                byte(&hex[4..6])? as f32 / 255.0,
            )),
            8 => Ok(Color::rgba(
                byte(&hex[0..2])? as f32 / 255.0,
                byte(&hex[2..4])? as f32 / 255.0,
                byte(&hex[4..6])? as f32 / 255.0,
                byte(&hex[6..8])? as f32 / 255.0,
            )),
            _ => Err(ColorParseError::BadFormat(s.to_owned())),
        }
    }

    pub fn with_alpha(self, a: f32) -> Color {
        Color { a, ..self }
    }
}

/// Point in physical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointPx {
    pub x: f64,
    pub y: f64,
}

impl PointPx {
    pub const fn new(x: f64, y: f64) -> PointPx {
        PointPx { x, y }
    }
}

/// Axis-aligned rectangle in physical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RectPx {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl RectPx {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> RectPx {
        RectPx { x, y, w, h }
    }
}

/// Stroke style for lines and polylines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub width: f64,
}

impl Default for Stroke {
    fn default() -> Self {
        Stroke { width: 1.0 }
    }
}

/// Immediate-mode drawing target for one frame.
pub trait DrawSurface {
    fn clear(&mut self, color: Color);
    fn line(&mut self, from: PointPx, to: PointPx, color: Color, stroke: Stroke);
    fn stroke_polyline(&mut self, points: &[PointPx], color: Color, stroke: Stroke);
    fn fill_rect(&mut self, rect: RectPx, color: Color);
    fn fill_circle(&mut self, center: PointPx, radius: f64, color: Color);
    fn text(&mut self, pos: PointPx, text: &str, color: Color, size: f64);
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear {
        color: Color,
    },
    Line {
        from: PointPx,
        to: PointPx,
        color: Color,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<PointPx>,
        color: Color,
        stroke: Stroke,
    },
    Rect {
        rect: RectPx,
        color: Color,
    },
    Circle {
        center: PointPx,
        radius: f64,
        color: Color,
    },
    Text {
        pos: PointPx,
        text: String,
        color: Color,
        size: f64,
    },
}

/// Surface that records draw ops instead of rasterizing.
#[derive(Debug, Default)]
pub struct Recording {
    pub ops: Vec<DrawOp>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl DrawSurface for Recording {
    fn clear(&mut self, color: Color) {
        self.ops.push(DrawOp::Clear { color });
    }

    fn line(&mut self, from: PointPx, to: PointPx, color: Color, stroke: Stroke) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            stroke,
        });
    }

    fn stroke_polyline(&mut self, points: &[PointPx], color: Color, stroke: Stroke) {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            color,
            stroke,
        });
    }

    fn fill_rect(&mut self, rect: RectPx, color: Color) {
        self.ops.push(DrawOp::Rect { rect, color });
    }

    fn fill_circle(&mut self, center: PointPx, radius: f64, color: Color) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }

    fn text(&mut self, pos: PointPx, text: &str, color: Color, size: f64) {
        self.ops.push(DrawOp::Text {
            pos,
            text: text.to_owned(),
            color,
            size,
        });
    }
}
