pub mod body;
pub mod genesis;
pub mod trail;
pub mod universe;

use serde::Serialize;
use thiserror::Error;

/// Absolute position in the simulation's root coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn rounded(self) -> Self {
        Self {
            x: self.x.round(),
            y: self.y.round(),
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const STAR_YELLOW: Color = Color::rgb(255, 255, 0);
    pub const MOON_GRAY: Color = Color::rgb(127, 127, 127);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpaceError {
    #[error("degenerate body: radius must be positive, got {0}")]
    DegenerateBody(f64),

    #[error("invalid time factor: {0:?}")]
    InvalidTimeFactor(String),

    #[error("invalid name: empty or whitespace-only")]
    InvalidName,

    #[error("no body matching {0:?}")]
    UnknownBody(String),
}
