// THEORY:
// The engine does not own a canvas. Instead it describes what should be drawn as an
// ordered display list of simple shapes, and the caller rasterizes that list with
// whatever drawing backend it has (the live runner uses OpenCV). This keeps the HUD
// logic testable without a window, a font or a native library.
//
// Order matters: later primitives are painted over earlier ones.

use crate::core_modules::contour::Point;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const GREEN: Rgb = Rgb([0, 255, 0]);
    pub const YELLOW: Rgb = Rgb([255, 255, 0]);
    pub const RED: Rgb = Rgb([255, 0, 0]);
    pub const BLUE: Rgb = Rgb([0, 0, 255]);
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    pub const fn r(self) -> u8 {
        self.0[0]
    }

    pub const fn g(self) -> u8 {
        self.0[1]
    }

    pub const fn b(self) -> u8 {
        self.0[2]
    }
}

/// How a closed shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Solid,
    /// Stroke only, with the given line thickness.
    Outline(i32),
}

/// Horizontal anchoring of a text origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// `origin` is the bottom-left of the text.
    #[default]
    Left,
    /// The text is centred across the span `origin.x .. origin.x + width`, with
    /// `origin.y` as its baseline. Odd leftovers go to the right.
    Center { width: i32 },
}

impl TextAlign {
    /// X coordinate of the text's left edge once the backend knows its rendered width.
    pub fn left_edge(self, origin_x: i32, text_width: i32) -> i32 {
        match self {
            TextAlign::Left => origin_x,
            TextAlign::Center { width } => origin_x + (width - text_width).div_euclid(2),
        }
    }
}

/// A single drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        color: Rgb,
        thickness: i32,
    },
    Rectangle {
        top_left: Point,
        bottom_right: Point,
        color: Rgb,
        fill: Fill,
    },
    Circle {
        center: Point,
        radius: i32,
        color: Rgb,
        fill: Fill,
    },
    Polyline {
        points: Vec<Point>,
        closed: bool,
        color: Rgb,
        thickness: i32,
    },
    Text {
        text: String,
        origin: Point,
        align: TextAlign,
        /// Font scale factor relative to the backend's base font height.
        scale: f64,
        color: Rgb,
        thickness: i32,
    },
}

/// An ordered display list for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    primitives: Vec<Primitive>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn line(&mut self, from: Point, to: Point, color: Rgb, thickness: i32) {
        self.push(Primitive::Line {
            from,
            to,
            color,
            thickness,
        });
    }

    pub fn rectangle(&mut self, top_left: Point, bottom_right: Point, color: Rgb, fill: Fill) {
        self.push(Primitive::Rectangle {
            top_left,
            bottom_right,
            color,
            fill,
        });
    }

    pub fn circle(&mut self, center: Point, radius: i32, color: Rgb, fill: Fill) {
        self.push(Primitive::Circle {
            center,
            radius,
            color,
            fill,
        });
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        origin: Point,
        align: TextAlign,
        scale: f64,
        color: Rgb,
        thickness: i32,
    ) {
        self.push(Primitive::Text {
            text: text.into(),
            origin,
            align,
            scale,
            color,
            thickness,
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Primitive> {
        self.primitives.iter()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// All text strings in paint order. Handy for asserting on what the HUD says.
    pub fn texts(&self) -> Vec<&str> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Extend<Primitive> for Overlay {
    fn extend<T: IntoIterator<Item = Primitive>>(&mut self, iter: T) {
        self.primitives.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Overlay {
    type Item = &'a Primitive;
    type IntoIter = std::slice::Iter<'a, Primitive>;

    fn into_iter(self) -> Self::IntoIter {
        self.primitives.iter()
    }
}
