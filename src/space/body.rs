use std::f64::consts::TAU;
use std::fmt;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::space::trail::{TraceTrail, TrailConfig};
use crate::space::{Color, SpaceError, Vec2};

/// Registry-unique body identifier, assigned once and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
}

impl BodyKind {
    pub fn label(&self) -> &'static str {
        match self {
            BodyKind::Star => "Star",
            BodyKind::Planet => "Planet",
            BodyKind::Moon => "Moon",
        }
    }
}

/// Construction parameters for a body, before registration assigns an id.
///
/// `angle`, `angular_velocity` and `color` fall back to randomized defaults
/// when left unset; `name` falls back to `"{kind}#{id}"`.
#[derive(Debug, Clone)]
pub struct BodySeed {
    pub kind: BodyKind,
    pub host: Option<BodyId>,
    /// Fixed absolute position; only meaningful when `host` is `None`.
    pub center: Vec2,
    pub distance: f64,
    pub radius: f64,
    pub angle: Option<f64>,
    pub angular_velocity: Option<f64>,
    pub color: Option<Color>,
    pub name: Option<String>,
}

impl BodySeed {
    pub fn star(center: Vec2, radius: f64) -> Self {
        Self {
            kind: BodyKind::Star,
            host: None,
            center,
            distance: 0.0,
            radius,
            angle: None,
            angular_velocity: None,
            color: Some(Color::STAR_YELLOW),
            name: None,
        }
    }

    pub fn orbiting(kind: BodyKind, host: BodyId, distance: f64, radius: f64) -> Self {
        Self {
            kind,
            host: Some(host),
            center: Vec2::ZERO,
            distance,
            radius,
            angle: None,
            angular_velocity: None,
            color: None,
            name: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CelestialBody {
    pub id: BodyId,
    pub kind: BodyKind,
    name: String,
    color: Color,
    host: Option<BodyId>,
    center: Vec2,
    distance: f64,
    radius: f64,
    angle: f64,
    angular_velocity: f64,
    age: f64,
    guests: Vec<BodyId>,
    trail: TraceTrail,
}

impl CelestialBody {
    /// Resolves a seed into a body, drawing unset defaults from `rng`.
    ///
    /// Fails without consuming the id when the radius is not strictly
    /// positive.
    pub(crate) fn from_seed(
        seed: BodySeed,
        id: BodyId,
        rng: &mut ChaCha8Rng,
        trail: &TrailConfig,
    ) -> Result<Self, SpaceError> {
        if !(seed.radius > 0.0) {
            return Err(SpaceError::DegenerateBody(seed.radius));
        }

        let angle = seed
            .angle
            .unwrap_or_else(|| rng.gen_range(0.0..TAU))
            .rem_euclid(TAU);
        let angular_velocity = seed
            .angular_velocity
            .unwrap_or_else(|| TAU * rng.gen_range(0.1..=1.0));
        let color = seed
            .color
            .unwrap_or_else(|| Color::rgb(rng.gen(), rng.gen(), rng.gen()));
        let name = seed
            .name
            .unwrap_or_else(|| format!("{}#{}", seed.kind.label(), id));

        Ok(Self {
            id,
            kind: seed.kind,
            name,
            color,
            host: seed.host,
            center: seed.center,
            distance: seed.distance.max(0.0),
            radius: seed.radius,
            angle,
            angular_velocity,
            age: 0.0,
            guests: Vec::new(),
            trail: TraceTrail::new(trail),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn host(&self) -> Option<BodyId> {
        self.host
    }

    /// Stored absolute position; the orbit origin for root bodies.
    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn guests(&self) -> &[BodyId] {
        &self.guests
    }

    pub(crate) fn guests_mut(&mut self) -> &mut Vec<BodyId> {
        &mut self.guests
    }

    pub fn trail(&self) -> &TraceTrail {
        &self.trail
    }

    pub(crate) fn trail_mut(&mut self) -> &mut TraceTrail {
        &mut self.trail
    }

    /// Seconds for one full revolution, `None` for roots.
    pub fn orbital_period(&self) -> Option<f64> {
        if self.host.is_some() && self.angular_velocity != 0.0 {
            Some(TAU / self.angular_velocity.abs())
        } else {
            None
        }
    }

    /// Offset from the host center at the current angle.
    pub fn orbital_offset(&self) -> Vec2 {
        Vec2::new(
            self.distance * self.angle.cos(),
            self.distance * self.angle.sin(),
        )
    }

    /// Advances age and, for orbiting bodies, the wrapped angle.
    /// Roots hold their stored center and only age.
    pub(crate) fn advance(&mut self, dt: f64) {
        self.age += dt;
        if self.host.is_none() {
            return;
        }
        self.angle = (self.angle + self.angular_velocity * dt).rem_euclid(TAU);
    }
}
