use crate::space::{Color, Vec2};

#[derive(Debug, Clone)]
pub struct TrailConfig {
    /// Upper bound on points emitted per simulated second.
    pub max_points: u32,
    /// Render frame rate the cadence is capped against.
    pub frame_rate: f64,
    /// Points at or past this age are evicted.
    pub max_age: f64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            max_points: 100,
            frame_rate: 120.0,
            max_age: 1.0,
        }
    }
}

/// An immutable position sample, fading out as it ages.
#[derive(Debug, Clone, Copy)]
pub struct TracePoint {
    position: Vec2,
    color: Color,
    age: f64,
}

impl TracePoint {
    fn new(position: Vec2, color: Color) -> Self {
        Self {
            position,
            color,
            age: 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    /// Fade alpha for drawing. Age may overshoot `max_age` by one frame at
    /// the drawing boundary, so the result is clamped explicitly.
    pub fn alpha(&self, max_age: f64) -> u8 {
        let a = ((1.0 - self.age / max_age) * 255.0).floor();
        a.clamp(0.0, 255.0) as u8
    }
}

/// Position history of one body, oldest point first.
///
/// Emission cadence is fixed at construction to `min(max_points, frame_rate)`
/// points per simulated second; a cadence above the frame rate would emit
/// faster than aging can evict and grow without bound.
#[derive(Debug, Clone)]
pub struct TraceTrail {
    points: Vec<TracePoint>,
    max_age: f64,
    interval: f64,
    since_last: f64,
}

impl TraceTrail {
    pub fn new(config: &TrailConfig) -> Self {
        let cadence = f64::from(config.max_points).min(config.frame_rate);
        debug_assert!(
            cadence > 0.0 && cadence <= config.frame_rate,
            "trace cadence must be positive and capped by the frame rate"
        );

        Self {
            points: Vec::new(),
            max_age: config.max_age,
            interval: 1.0 / cadence,
            since_last: 0.0,
        }
    }

    /// Ages and evicts existing points, then emits at most one new sample
    /// of `position` once a full cadence interval has accumulated.
    pub(crate) fn tick(&mut self, dt: f64, position: Vec2, color: Color) {
        for point in &mut self.points {
            point.age += dt;
        }
        self.points.retain(|point| point.age < self.max_age);

        self.since_last += dt;
        if self.since_last >= self.interval {
            self.points.push(TracePoint::new(position, color));
            self.since_last = 0.0;
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_age(&self) -> f64 {
        self.max_age
    }

    /// Iteration order used for rendering the fading line.
    pub fn newest_first(&self) -> impl Iterator<Item = &TracePoint> {
        self.points.iter().rev()
    }
}
