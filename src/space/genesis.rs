use std::f64::consts::TAU;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::space::body::{BodyId, BodyKind, BodySeed};
use crate::space::trail::TrailConfig;
use crate::space::universe::Registry;
use crate::space::{Color, SpaceError, Vec2};

#[derive(Debug, Clone)]
pub struct GenesisConfig {
    pub star_radius: f64,
    pub star_radius_variance: f64,
    /// Base orbit spacing between successive planets of a star.
    pub planet_distance: f64,
    pub planet_distance_variance: f64,
    pub planet_radius: f64,
    pub planet_radius_variance: f64,
    /// Extra spacing per already-present moon, on top of the host radius.
    pub moon_distance: f64,
    pub moon_radius: f64,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            star_radius: 20.0,
            star_radius_variance: 0.5,
            planet_distance: 100.0,
            planet_distance_variance: 0.2,
            planet_radius: 20.0,
            planet_radius_variance: 0.95,
            moon_distance: 20.0,
            moon_radius: 5.0,
        }
    }
}

fn random_radius(rng: &mut ChaCha8Rng, base: f64, variance: f64) -> f64 {
    rng.gen_range(base * (1.0 - variance)..=base * (1.0 + variance))
}

/// Orbit distance for the next guest: the band scales with how many
/// guests the host already has, so siblings spread outward.
fn random_distance(rng: &mut ChaCha8Rng, guest_count: usize, base: f64, variance: f64) -> f64 {
    let n = guest_count as f64;
    rng.gen_range(base * (n - variance + 1.0)..=base * (n + variance + 1.0))
}

pub fn spawn_star(
    registry: &mut Registry,
    rng: &mut ChaCha8Rng,
    config: &GenesisConfig,
    trail: &TrailConfig,
    center: Vec2,
    planets: usize,
) -> Result<BodyId, SpaceError> {
    let radius = random_radius(rng, config.star_radius, config.star_radius_variance);
    let star = registry.add(BodySeed::star(center, radius), rng, trail)?;

    for _ in 0..planets {
        spawn_planet(registry, rng, config, trail, star)?;
    }
    Ok(star)
}

pub fn spawn_planet(
    registry: &mut Registry,
    rng: &mut ChaCha8Rng,
    config: &GenesisConfig,
    trail: &TrailConfig,
    host: BodyId,
) -> Result<BodyId, SpaceError> {
    let siblings = registry.get(host).map_or(0, |body| body.guests().len());
    let distance = random_distance(
        rng,
        siblings,
        config.planet_distance,
        config.planet_distance_variance,
    );
    let radius = random_radius(rng, config.planet_radius, config.planet_radius_variance);

    let planet = registry.add(
        BodySeed::orbiting(BodyKind::Planet, host, distance, radius),
        rng,
        trail,
    )?;

    for _ in 0..roll_moon_count(rng) {
        spawn_moon(registry, rng, config, trail, planet)?;
    }
    Ok(planet)
}

/// Most planets are bare; a lucky few get up to four moons.
fn roll_moon_count(rng: &mut ChaCha8Rng) -> usize {
    let roll: f64 = rng.gen();
    if roll > 0.95 {
        4
    } else if roll > 0.9 {
        3
    } else if roll > 0.75 {
        2
    } else if roll > 0.5 {
        1
    } else {
        0
    }
}

pub fn spawn_moon(
    registry: &mut Registry,
    rng: &mut ChaCha8Rng,
    config: &GenesisConfig,
    trail: &TrailConfig,
    host: BodyId,
) -> Result<BodyId, SpaceError> {
    let (host_radius, siblings) = registry
        .get(host)
        .map_or((0.0, 0), |body| (body.radius(), body.guests().len()));

    // Clear the host's own disc, then stack outward per existing moon.
    let base = host_radius * 2.0 + config.moon_distance * siblings as f64;
    let distance = random_distance(rng, siblings, base, 0.0);

    registry.add(
        BodySeed {
            angular_velocity: Some(TAU * rng.gen_range(0.5..=4.0)),
            color: Some(Color::MOON_GRAY),
            ..BodySeed::orbiting(BodyKind::Moon, host, distance, config.moon_radius)
        },
        rng,
        trail,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn fixture() -> (Registry, ChaCha8Rng, GenesisConfig, TrailConfig) {
        (
            Registry::new(),
            ChaCha8Rng::seed_from_u64(123),
            GenesisConfig::default(),
            TrailConfig::default(),
        )
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let (mut r1, mut rng1, cfg, trail) = fixture();
        let mut r2 = Registry::new();
        let mut rng2 = ChaCha8Rng::seed_from_u64(123);

        spawn_star(&mut r1, &mut rng1, &cfg, &trail, Vec2::ZERO, 3).unwrap();
        spawn_star(&mut r2, &mut rng2, &cfg, &trail, Vec2::ZERO, 3).unwrap();

        assert_eq!(r1.len(), r2.len());
        for (a, b) in r1.iter().zip(r2.iter()) {
            assert_eq!(a.name(), b.name());
            assert_eq!(a.distance(), b.distance());
            assert_eq!(a.angle(), b.angle());
        }
    }

    #[test]
    fn planet_orbits_fall_in_their_variance_band() {
        let (mut reg, mut rng, cfg, trail) = fixture();
        let star = spawn_star(&mut reg, &mut rng, &cfg, &trail, Vec2::ZERO, 0).unwrap();

        for slot in 0..5 {
            let planet = spawn_planet(&mut reg, &mut rng, &cfg, &trail, star).unwrap();
            let body = reg.get(planet).unwrap();
            let n = slot as f64;
            let lo = 100.0 * (n - 0.2 + 1.0);
            let hi = 100.0 * (n + 0.2 + 1.0);
            assert!(
                (lo..=hi).contains(&body.distance()),
                "planet {slot} at {}",
                body.distance()
            );
            assert!(body.radius() > 0.0 && body.radius() <= 20.0 * 1.95);
        }
    }

    #[test]
    fn moons_stack_outward_from_their_host() {
        let (mut reg, mut rng, cfg, trail) = fixture();
        let star = spawn_star(&mut reg, &mut rng, &cfg, &trail, Vec2::ZERO, 0).unwrap();
        let planet = spawn_planet(&mut reg, &mut rng, &cfg, &trail, star).unwrap();

        let host_radius = reg.get(planet).unwrap().radius();
        let existing = reg.get(planet).unwrap().guests().len();

        let mut last = 0.0;
        for slot in existing..existing + 3 {
            let moon = spawn_moon(&mut reg, &mut rng, &cfg, &trail, planet).unwrap();
            let body = reg.get(moon).unwrap();
            let base = host_radius * 2.0 + 20.0 * slot as f64;
            let expected = base * (slot as f64 + 1.0);
            assert!((body.distance() - expected).abs() < 1e-9);
            assert!(body.distance() > last);
            last = body.distance();

            assert_eq!(body.kind, BodyKind::Moon);
            assert_eq!(body.radius(), 5.0);
            assert_eq!(body.color(), Color::MOON_GRAY);
            let v = body.angular_velocity();
            assert!((TAU * 0.5..=TAU * 4.0).contains(&v));
        }
    }

    #[test]
    fn moon_counts_stay_in_documented_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        for _ in 0..500 {
            let n = roll_moon_count(&mut rng);
            assert!(n <= 4);
        }
    }

    #[test]
    fn star_gets_requested_planet_count() {
        let (mut reg, mut rng, cfg, trail) = fixture();
        let star = spawn_star(&mut reg, &mut rng, &cfg, &trail, Vec2::new(2000.0, 0.0), 3).unwrap();

        let body = reg.get(star).unwrap();
        assert_eq!(body.guests().len(), 3);
        assert_eq!(body.center(), Vec2::new(2000.0, 0.0));
        assert_eq!(body.color(), Color::STAR_YELLOW);
        assert!(body
            .guests()
            .iter()
            .all(|&g| reg.get(g).unwrap().kind == BodyKind::Planet));
    }
}
