use serde::Serialize;

use crate::space::body::BodyId;
use crate::space::Vec2;

/// Integer pixel position on the rendered surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: ScreenPoint) -> f64 {
        f64::from(self.x - other.x).hypot(f64::from(self.y - other.y))
    }
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    /// Pixels per pan input, before time scaling (keyboard repeat supplies
    /// the cadence).
    pub movement_step: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            screen_width: 1280,
            screen_height: 720,
            movement_step: 20.0,
            zoom_min: 0.5,
            zoom_max: 8.0,
        }
    }
}

/// Maps absolute simulation coordinates onto the screen.
///
/// The zoom factor is tracked and clamped but deliberately not applied in
/// `project`; sprite scaling is the renderer's business and the coordinate
/// protocol stays a pure translation.
#[derive(Debug, Clone)]
pub struct Camera {
    focus: Vec2,
    zoom_factor: f64,
    locked: Option<BodyId>,
    config: CameraConfig,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            focus: Vec2::ZERO,
            zoom_factor: 1.0,
            locked: None,
            config,
        }
    }

    pub fn screen_center(&self) -> Vec2 {
        Vec2::new(
            f64::from(self.config.screen_width) / 2.0,
            f64::from(self.config.screen_height) / 2.0,
        )
        .rounded()
    }

    pub fn project(&self, absolute: Vec2) -> ScreenPoint {
        let p = absolute - self.focus + self.screen_center();
        ScreenPoint::new(p.x.round() as i32, p.y.round() as i32)
    }

    pub fn focus(&self) -> Vec2 {
        self.focus
    }

    pub fn set_focus(&mut self, focus: Vec2) {
        self.focus = focus;
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    pub fn locked_body(&self) -> Option<BodyId> {
        self.locked
    }

    pub fn lock_to(&mut self, body: BodyId) {
        self.locked = Some(body);
    }

    pub fn clear_lock(&mut self) {
        self.locked = None;
    }

    /// Pans by unit direction signals (-1/0/1 per axis). Any actual
    /// movement releases the lock; a zero vector changes nothing.
    pub fn move_focus(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }

        self.clear_lock();
        self.focus = self.focus
            + Vec2::new(
                f64::from(dx) * self.config.movement_step,
                f64::from(dy) * self.config.movement_step,
            );
    }

    pub fn adjust_zoom(&mut self, factor: f64) {
        self.zoom_factor =
            (self.zoom_factor * factor).clamp(self.config.zoom_min, self.config.zoom_max);
    }
}
