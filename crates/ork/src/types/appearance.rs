use super::EdgeMode;

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(255, 255, 255)
    }
}

/// A 2D texture coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An image mapped onto a component surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Decal {
    /// Name of the image resource inside the design file.
    pub image: String,
    pub rotation: f64,
    pub edge_mode: EdgeMode,
    pub center: Vec2,
    pub offset: Vec2,
    pub scale: Vec2,
}

impl Decal {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            rotation: 0.0,
            edge_mode: EdgeMode::default(),
            center: Vec2::new(0.0, 0.0),
            offset: Vec2::new(0.0, 0.0),
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

/// Rendering appearance of a component surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub paint: Color,
    /// 0.0 (matte) to 1.0 (mirror).
    pub shine: f64,
    pub decal: Option<Decal>,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            paint: Color::rgb(255, 255, 255),
            shine: 0.0,
            decal: None,
        }
    }
}

/// Appearance of the inner surface of a hollow component.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InsideAppearance {
    pub appearance: Appearance,
    /// Render the edges with the inside appearance instead of the outside one.
    pub edges_same_as_inside: bool,
    /// Ignore the inside appearance and render the inside like the outside.
    pub inside_same_as_outside: bool,
}
