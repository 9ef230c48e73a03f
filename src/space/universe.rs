use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::camera::{Camera, CameraConfig, ScreenPoint};
use crate::space::body::{BodyId, BodySeed, CelestialBody};
use crate::space::genesis::{self, GenesisConfig};
use crate::space::trail::TrailConfig;
use crate::space::{SpaceError, Vec2};

#[derive(Debug, Clone)]
pub struct UniverseConfig {
    pub default_time_factor: f64,
    pub time_factor_step: f64,
    pub time_factor_min: f64,
    pub time_factor_max: f64,
    /// Planets generated for each fresh star.
    pub default_planets: usize,
    /// X-axis spacing between consecutive root stars.
    pub star_spacing: f64,
    pub trail: TrailConfig,
    pub genesis: GenesisConfig,
    pub camera: CameraConfig,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            default_time_factor: 0.1,
            time_factor_step: 0.01,
            time_factor_min: 0.01,
            time_factor_max: 5.0,
            default_planets: 3,
            star_spacing: 2000.0,
            trail: TrailConfig::default(),
            genesis: GenesisConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

/// Flat body store in registration order, with the monotonic id counter.
///
/// All cross-references between bodies are ids resolved here; a lookup for
/// a body that no longer exists answers `None` instead of dangling.
#[derive(Debug, Clone)]
pub struct Registry {
    bodies: Vec<CelestialBody>,
    next_id: u32,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            bodies: Vec::new(),
            next_id: 1,
        }
    }

    /// Validates and registers a body, wiring it into its host's guest
    /// list. A rejected seed consumes no id and leaves the registry
    /// untouched.
    pub(crate) fn add(
        &mut self,
        seed: BodySeed,
        rng: &mut ChaCha8Rng,
        trail: &TrailConfig,
    ) -> Result<BodyId, SpaceError> {
        if let Some(host) = seed.host {
            if self.index_of(host).is_none() {
                return Err(SpaceError::UnknownBody(host.to_string()));
            }
        }

        let id = BodyId(self.next_id);
        let body = CelestialBody::from_seed(seed, id, rng, trail)?;
        self.next_id += 1;

        if let Some(host) = body.host() {
            if let Some(host_body) = self.get_mut(host) {
                host_body.guests_mut().push(id);
            }
        }
        self.bodies.push(body);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn roots(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter().filter(|body| body.host().is_none())
    }

    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.index_of(id).map(|idx| &self.bodies[idx])
    }

    pub(crate) fn get_mut(&mut self, id: BodyId) -> Option<&mut CelestialBody> {
        let idx = self.index_of(id)?;
        Some(&mut self.bodies[idx])
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|body| body.id == id)
    }

    /// Absolute position in root coordinates, following the host chain.
    pub fn absolute_position(&self, id: BodyId) -> Option<Vec2> {
        self.index_of(id).map(|idx| self.position_at(idx))
    }

    fn position_at(&self, idx: usize) -> Vec2 {
        let body = &self.bodies[idx];
        match body.host() {
            None => body.center(),
            Some(host) => {
                let host_idx = self
                    .index_of(host)
                    .expect("hosts are registered before their guests");
                self.position_at(host_idx) + body.orbital_offset()
            }
        }
    }

    /// Every descendant of `id` in depth-first pre-order.
    pub fn guests_recursive(&self, id: BodyId) -> Vec<BodyId> {
        let mut out = Vec::new();
        self.collect_guests(id, &mut out);
        out
    }

    fn collect_guests(&self, id: BodyId, out: &mut Vec<BodyId>) {
        let Some(body) = self.get(id) else { return };
        for &guest in body.guests() {
            out.push(guest);
            self.collect_guests(guest, out);
        }
    }

    /// Case-insensitive exact match against the stringified id or the name.
    pub fn find_by_id_or_name(&self, text: &str) -> Option<BodyId> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.bodies
            .iter()
            .find(|body| body.id.to_string() == needle || body.name().to_lowercase() == needle)
            .map(|body| body.id)
    }

    /// Renames a body; a blank name is rejected and the old name kept.
    pub fn rename(&mut self, id: BodyId, name: &str) -> Result<(), SpaceError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SpaceError::InvalidName);
        }

        let body = self
            .get_mut(id)
            .ok_or_else(|| SpaceError::UnknownBody(id.to_string()))?;
        body.set_name(trimmed);
        Ok(())
    }

    pub fn trace_point_count(&self) -> usize {
        self.bodies.iter().map(|body| body.trail().len()).sum()
    }

    pub(crate) fn clear(&mut self) {
        self.bodies.clear();
        self.next_id = 1;
    }

    fn advance_bodies(&mut self, dt: f64) {
        for body in &mut self.bodies {
            body.advance(dt);
        }
    }

    fn update_trails(&mut self, dt: f64) {
        for idx in 0..self.bodies.len() {
            if self.bodies[idx].host().is_none() {
                continue; // roots do not move, so they leave no trail
            }
            let position = self.position_at(idx);
            let color = self.bodies[idx].color();
            self.bodies[idx].trail_mut().tick(dt, position, color);
        }
    }
}

/// Result of one console command, surfaced to the caller as a status.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Empty,
    TimeFactorSet(f64),
    Locked(BodyId),
    Renamed { id: BodyId, name: String },
    NoLockedBody,
    Rejected(SpaceError),
    Unrecognized(String),
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Empty => write!(f, "nothing to do"),
            CommandOutcome::TimeFactorSet(factor) => write!(f, "time factor set to {factor}"),
            CommandOutcome::Locked(id) => write!(f, "camera locked to body {id}"),
            CommandOutcome::Renamed { id, name } => write!(f, "body {id} renamed to {name:?}"),
            CommandOutcome::NoLockedBody => write!(f, "no locked body"),
            CommandOutcome::Rejected(err) => write!(f, "{err}"),
            CommandOutcome::Unrecognized(text) => write!(f, "unrecognized command {text:?}"),
        }
    }
}

/// The simulation aggregate: registry, camera and clock, advanced one
/// frame at a time. All state lives here; nothing is process-global.
pub struct Universe {
    registry: Registry,
    camera: Camera,
    rng: ChaCha8Rng,
    config: UniverseConfig,
    time_factor: f64,
    paused: bool,
    age: f64,
    real_age: f64,
    ticks: u64,
}

impl Universe {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, UniverseConfig::default())
    }

    pub fn with_config(seed: u64, config: UniverseConfig) -> Self {
        let mut universe = Self {
            registry: Registry::new(),
            camera: Camera::new(config.camera.clone()),
            rng: ChaCha8Rng::seed_from_u64(seed),
            time_factor: config.default_time_factor,
            paused: false,
            age: 0.0,
            real_age: 0.0,
            ticks: 0,
            config,
        };
        universe.reset();
        universe
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn time_factor(&self) -> f64 {
        self.time_factor
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_paused(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Simulated seconds elapsed (time-factor scaled).
    pub fn age(&self) -> f64 {
        self.age
    }

    /// Wall-clock seconds fed into `tick`.
    pub fn real_age(&self) -> f64 {
        self.real_age
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One render frame: the simulation tick is skipped entirely while
    /// paused, but a locked camera still tracks its (stale) target.
    pub fn frame(&mut self, dt_real: f64) {
        if !self.paused {
            self.tick(dt_real);
        }
        self.snap_camera_to_lock();
    }

    /// Advances simulated time by `dt_real * time_factor` and every body
    /// with it, in registration order.
    pub fn tick(&mut self, dt_real: f64) {
        let dt = dt_real * self.time_factor;
        self.ticks += 1;
        self.real_age += dt_real;
        self.age += dt;

        self.registry.advance_bodies(dt);
        self.registry.update_trails(dt);
    }

    /// First body under `point` in registration order, if any. Overlapping
    /// hits resolve to whichever body registered first, not the closest.
    pub fn find_hovered(&self, point: ScreenPoint) -> Option<BodyId> {
        self.registry
            .iter()
            .find(|body| self.is_body_hovered(body.id, point))
            .map(|body| body.id)
    }

    /// Screen-space distance test against the body's radius. The radius is
    /// compared unscaled, matching the coordinate protocol in `Camera`.
    pub fn is_body_hovered(&self, id: BodyId, point: ScreenPoint) -> bool {
        let Some(body) = self.registry.get(id) else {
            return false;
        };
        let Some(position) = self.registry.absolute_position(id) else {
            return false;
        };
        self.camera.project(position).distance_to(point) <= body.radius()
    }

    /// Parses a time factor; on failure the previous factor survives and
    /// the error is returned as a status for the caller to report.
    pub fn set_time_factor(&mut self, text: &str) -> Result<f64, SpaceError> {
        match text.trim().parse::<f64>() {
            Ok(factor) => {
                self.time_factor = factor;
                Ok(factor)
            }
            Err(_) => Err(SpaceError::InvalidTimeFactor(text.to_string())),
        }
    }

    /// Steps the factor by the configured increment, staying in bounds.
    pub fn adjust_time_factor(&mut self, direction: i32) {
        if direction == 0 {
            return;
        }
        let step = self.config.time_factor_step * f64::from(direction.signum());
        self.time_factor = (self.time_factor + step)
            .clamp(self.config.time_factor_min, self.config.time_factor_max);
    }

    /// Clears every body (the only destruction path), restarts the id
    /// counter, drops the now-meaningless camera lock and spawns a fresh
    /// star with the default planet count.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.camera.clear_lock();
        self.add_star();
    }

    /// Appends another root star, spaced along the x axis, with its own
    /// randomly generated planets and moons.
    pub fn add_star(&mut self) -> BodyId {
        let star_index = self.registry.roots().count() as f64;
        let center = Vec2::new(star_index * self.config.star_spacing, 0.0);
        genesis::spawn_star(
            &mut self.registry,
            &mut self.rng,
            &self.config.genesis,
            &self.config.trail,
            center,
            self.config.default_planets,
        )
        .expect("generated bodies always have positive radii")
    }

    /// Sets focus onto the locked body; a lock whose body no longer
    /// resolves is cleared instead of left dangling.
    pub fn snap_camera_to_lock(&mut self) {
        let Some(id) = self.camera.locked_body() else {
            return;
        };
        match self.registry.absolute_position(id) {
            Some(position) => self.camera.set_focus(position.rounded()),
            None => self.camera.clear_lock(),
        }
    }

    /// Console input: `time <factor>`, a body id or name (locks the
    /// camera), or `name <new name>` for the locked body. Every failure is
    /// reported in the outcome, never raised.
    pub fn execute_command(&mut self, text: &str) -> CommandOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return CommandOutcome::Empty;
        }

        let mut tokens = trimmed.split_whitespace();
        let first = tokens.next().unwrap_or_default().to_lowercase();

        if first == "time" {
            return match tokens.next() {
                Some(value) => match self.set_time_factor(value) {
                    Ok(factor) => CommandOutcome::TimeFactorSet(factor),
                    Err(err) => CommandOutcome::Rejected(err),
                },
                None => CommandOutcome::Unrecognized(trimmed.to_string()),
            };
        }

        if let Some(id) = self.registry.find_by_id_or_name(trimmed) {
            self.camera.lock_to(id);
            return CommandOutcome::Locked(id);
        }

        if first == "name" && tokens.next().is_some() {
            let Some(id) = self.camera.locked_body() else {
                return CommandOutcome::NoLockedBody;
            };
            // Keep the caller's casing; only the keyword is folded.
            let name = trimmed
                .split_whitespace()
                .skip(1)
                .collect::<Vec<_>>()
                .join(" ");
            return match self.registry.rename(id, &name) {
                Ok(()) => CommandOutcome::Renamed { id, name },
                Err(err) => CommandOutcome::Rejected(err),
            };
        }

        CommandOutcome::Unrecognized(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::body::BodyKind;
    use rand::SeedableRng;

    fn fixture() -> (Registry, ChaCha8Rng, TrailConfig) {
        (
            Registry::new(),
            ChaCha8Rng::seed_from_u64(1),
            TrailConfig::default(),
        )
    }

    fn star_seed() -> BodySeed {
        BodySeed::star(Vec2::ZERO, 20.0)
    }

    #[test]
    fn degenerate_seed_registers_nothing() {
        let (mut reg, mut rng, trail) = fixture();
        let star = reg.add(star_seed(), &mut rng, &trail).unwrap();

        let err = reg
            .add(
                BodySeed::orbiting(BodyKind::Planet, star, 100.0, 0.0),
                &mut rng,
                &trail,
            )
            .unwrap_err();

        assert_eq!(err, SpaceError::DegenerateBody(0.0));
        assert_eq!(reg.len(), 1);
        assert!(reg.get(star).unwrap().guests().is_empty());

        // The failed registration burned no id.
        let planet = reg
            .add(
                BodySeed::orbiting(BodyKind::Planet, star, 100.0, 5.0),
                &mut rng,
                &trail,
            )
            .unwrap();
        assert_eq!(planet, BodyId(2));
    }

    #[test]
    fn unknown_host_is_rejected() {
        let (mut reg, mut rng, trail) = fixture();
        let err = reg
            .add(
                BodySeed::orbiting(BodyKind::Moon, BodyId(99), 10.0, 5.0),
                &mut rng,
                &trail,
            )
            .unwrap_err();
        assert_eq!(err, SpaceError::UnknownBody("99".to_string()));
        assert!(reg.is_empty());
    }

    #[test]
    fn guests_recursive_is_preorder() {
        let (mut reg, mut rng, trail) = fixture();
        let star = reg.add(star_seed(), &mut rng, &trail).unwrap();
        let planet_a = reg
            .add(
                BodySeed::orbiting(BodyKind::Planet, star, 100.0, 10.0),
                &mut rng,
                &trail,
            )
            .unwrap();
        let moon_a1 = reg
            .add(
                BodySeed::orbiting(BodyKind::Moon, planet_a, 25.0, 5.0),
                &mut rng,
                &trail,
            )
            .unwrap();
        let planet_b = reg
            .add(
                BodySeed::orbiting(BodyKind::Planet, star, 200.0, 10.0),
                &mut rng,
                &trail,
            )
            .unwrap();
        let moon_b1 = reg
            .add(
                BodySeed::orbiting(BodyKind::Moon, planet_b, 25.0, 5.0),
                &mut rng,
                &trail,
            )
            .unwrap();

        assert_eq!(
            reg.guests_recursive(star),
            vec![planet_a, moon_a1, planet_b, moon_b1]
        );
    }

    #[test]
    fn absolute_position_composes_polar_offsets() {
        let (mut reg, mut rng, trail) = fixture();
        let star = reg
            .add(BodySeed::star(Vec2::new(1000.0, -50.0), 20.0), &mut rng, &trail)
            .unwrap();

        let planet = reg
            .add(
                BodySeed {
                    angle: Some(0.0),
                    ..BodySeed::orbiting(BodyKind::Planet, star, 100.0, 10.0)
                },
                &mut rng,
                &trail,
            )
            .unwrap();
        let moon = reg
            .add(
                BodySeed {
                    angle: Some(std::f64::consts::FRAC_PI_2),
                    ..BodySeed::orbiting(BodyKind::Moon, planet, 30.0, 5.0)
                },
                &mut rng,
                &trail,
            )
            .unwrap();

        assert_eq!(
            reg.absolute_position(star).unwrap(),
            Vec2::new(1000.0, -50.0)
        );
        let planet_pos = reg.absolute_position(planet).unwrap();
        assert!((planet_pos.x - 1100.0).abs() < 1e-9);
        assert!((planet_pos.y - -50.0).abs() < 1e-9);

        let moon_pos = reg.absolute_position(moon).unwrap();
        assert!((moon_pos.x - 1100.0).abs() < 1e-9);
        assert!((moon_pos.y - -20.0).abs() < 1e-9);
    }

    #[test]
    fn lookup_is_case_insensitive_on_id_and_name() {
        let (mut reg, mut rng, trail) = fixture();
        let star = reg
            .add(
                BodySeed {
                    name: Some("Alpha Prime".to_string()),
                    ..star_seed()
                },
                &mut rng,
                &trail,
            )
            .unwrap();

        assert_eq!(reg.find_by_id_or_name("1"), Some(star));
        assert_eq!(reg.find_by_id_or_name("  ALPHA PRIME "), Some(star));
        assert_eq!(reg.find_by_id_or_name("alpha"), None);
        assert_eq!(reg.find_by_id_or_name(""), None);
    }

    #[test]
    fn rename_validates_and_trims() {
        let (mut reg, mut rng, trail) = fixture();
        let star = reg.add(star_seed(), &mut rng, &trail).unwrap();

        assert_eq!(reg.rename(star, "  \t "), Err(SpaceError::InvalidName));
        assert_eq!(reg.get(star).unwrap().name(), "Star#1");

        reg.rename(star, "  Sol  ").unwrap();
        assert_eq!(reg.get(star).unwrap().name(), "Sol");

        assert_eq!(
            reg.rename(BodyId(42), "x"),
            Err(SpaceError::UnknownBody("42".to_string()))
        );
    }

    #[test]
    fn adjust_time_factor_steps_within_bounds() {
        let mut u = Universe::new(8);
        assert_eq!(u.time_factor(), 0.1);

        u.adjust_time_factor(1);
        assert!((u.time_factor() - 0.11).abs() < 1e-12);

        u.adjust_time_factor(0);
        assert!((u.time_factor() - 0.11).abs() < 1e-12);

        for _ in 0..1000 {
            u.adjust_time_factor(1);
        }
        assert_eq!(u.time_factor(), 5.0);

        for _ in 0..1000 {
            u.adjust_time_factor(-1);
        }
        assert_eq!(u.time_factor(), 0.01);
    }

    #[test]
    fn locked_camera_tracks_its_body_across_ticks() {
        let mut u = Universe::new(4);
        let planet = u
            .registry()
            .iter()
            .find(|b| b.kind == BodyKind::Planet)
            .map(|b| b.id)
            .unwrap();
        u.camera_mut().lock_to(planet);

        for _ in 0..5 {
            u.frame(0.1);
            let expected = u.registry().absolute_position(planet).unwrap().rounded();
            assert_eq!(u.camera().focus(), expected);
        }
    }

    #[test]
    fn name_command_without_argument_is_unrecognized() {
        let mut u = Universe::new(4);
        assert_eq!(
            u.execute_command("name"),
            CommandOutcome::Unrecognized("name".to_string())
        );
    }

    #[test]
    fn roots_keep_empty_trails() {
        let mut u = Universe::new(6);
        for _ in 0..200 {
            u.frame(0.05);
        }

        for body in u.registry().iter() {
            if body.host().is_none() {
                assert!(body.trail().is_empty());
            } else {
                assert!(!body.trail().is_empty());
            }
        }
    }
}
