use serde::Serialize;

use crate::camera::ScreenPoint;
use crate::space::body::{BodyId, CelestialBody};
use crate::space::universe::Universe;
use crate::space::{Color, Vec2};

/// One fading line segment of a trail, newest end first.
#[derive(Debug, Clone, Serialize)]
pub struct TraceSegmentView {
    pub from: ScreenPoint,
    pub to: ScreenPoint,
    pub color: Color,
    pub alpha: u8,
}

/// Everything the renderer needs to draw one body this frame.
#[derive(Debug, Clone, Serialize)]
pub struct SceneBodyView {
    pub id: u32,
    pub kind: &'static str,
    pub name: String,
    pub color: Color,
    pub radius: f64,
    pub position: Vec2,
    pub screen: ScreenPoint,
    pub trail: Vec<TraceSegmentView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CameraView {
    pub focus: Vec2,
    pub zoom_factor: f64,
    pub locked: Option<u32>,
}

/// The numbers behind the debug overlay.
#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
    pub age: f64,
    pub real_age: f64,
    pub ticks: u64,
    pub time_factor: f64,
    pub paused: bool,
    pub bodies: usize,
    pub stars: usize,
    pub trace_points: usize,
}

/// Per-frame snapshot in draw order: each star, then its descendants in
/// pre-order, so hosts are always painted under their guests.
#[derive(Debug, Clone, Serialize)]
pub struct SceneView {
    pub bodies: Vec<SceneBodyView>,
    pub camera: CameraView,
    pub stats: StatsView,
}

/// Structural snapshot of the hierarchy, guests nested under their hosts.
#[derive(Debug, Clone, Serialize)]
pub struct BodyNodeView {
    pub id: u32,
    pub kind: &'static str,
    pub name: String,
    pub color: Color,
    pub distance: f64,
    pub radius: f64,
    pub angle: f64,
    pub angular_velocity: f64,
    pub orbital_period: Option<f64>,
    pub age: f64,
    pub position: Vec2,
    pub trace_points: usize,
    pub guests: Vec<BodyNodeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UniverseView {
    pub stars: Vec<BodyNodeView>,
    pub camera: CameraView,
    pub stats: StatsView,
}

fn camera_view(universe: &Universe) -> CameraView {
    let camera = universe.camera();
    CameraView {
        focus: camera.focus(),
        zoom_factor: camera.zoom_factor(),
        locked: camera.locked_body().map(|id| id.0),
    }
}

fn stats_view(universe: &Universe) -> StatsView {
    let registry = universe.registry();
    StatsView {
        age: universe.age(),
        real_age: universe.real_age(),
        ticks: universe.ticks(),
        time_factor: universe.time_factor(),
        paused: universe.paused(),
        bodies: registry.len(),
        stars: registry.roots().count(),
        trace_points: registry.trace_point_count(),
    }
}

fn trail_segments(universe: &Universe, body: &CelestialBody, position: Vec2) -> Vec<TraceSegmentView> {
    let camera = universe.camera();
    let max_age = body.trail().max_age();
    let points: Vec<_> = body.trail().newest_first().collect();

    let mut segments = Vec::with_capacity(points.len());
    let mut target = camera.project(position);
    for point in points {
        let from = camera.project(point.position());
        segments.push(TraceSegmentView {
            from,
            to: target,
            color: point.color(),
            alpha: point.alpha(max_age),
        });
        target = from;
    }
    segments
}

fn scene_body(universe: &Universe, id: BodyId) -> Option<SceneBodyView> {
    let body = universe.registry().get(id)?;
    let position = universe.registry().absolute_position(id)?;

    Some(SceneBodyView {
        id: body.id.0,
        kind: body.kind.label(),
        name: body.name().to_string(),
        color: body.color(),
        radius: body.radius(),
        position,
        screen: universe.camera().project(position),
        trail: trail_segments(universe, body, position),
    })
}

pub fn scene_view(universe: &Universe) -> SceneView {
    let registry = universe.registry();
    let mut bodies = Vec::with_capacity(registry.len());

    for star in registry.roots() {
        bodies.extend(scene_body(universe, star.id));
        for guest in registry.guests_recursive(star.id) {
            bodies.extend(scene_body(universe, guest));
        }
    }

    SceneView {
        bodies,
        camera: camera_view(universe),
        stats: stats_view(universe),
    }
}

fn body_node(universe: &Universe, id: BodyId) -> Option<BodyNodeView> {
    let body = universe.registry().get(id)?;
    let position = universe.registry().absolute_position(id)?;
    let guests = body
        .guests()
        .iter()
        .filter_map(|&guest| body_node(universe, guest))
        .collect();

    Some(BodyNodeView {
        id: body.id.0,
        kind: body.kind.label(),
        name: body.name().to_string(),
        color: body.color(),
        distance: body.distance(),
        radius: body.radius(),
        angle: body.angle(),
        angular_velocity: body.angular_velocity(),
        orbital_period: body.orbital_period(),
        age: body.age(),
        position,
        trace_points: body.trail().len(),
        guests,
    })
}

/// Detail for a single body (hover inspection); guests come nested.
pub fn body_detail(universe: &Universe, id: BodyId) -> Option<BodyNodeView> {
    body_node(universe, id)
}

pub fn universe_view(universe: &Universe) -> UniverseView {
    let stars = universe
        .registry()
        .roots()
        .filter_map(|star| body_node(universe, star.id))
        .collect();

    UniverseView {
        stars,
        camera: camera_view(universe),
        stats: stats_view(universe),
    }
}

pub fn scene_json(universe: &Universe) -> String {
    serde_json::to_string(&scene_view(universe)).unwrap_or_else(|_| "{}".to_string())
}

pub fn universe_json(universe: &Universe) -> String {
    serde_json::to_string(&universe_view(universe)).unwrap_or_else(|_| "{}".to_string())
}
