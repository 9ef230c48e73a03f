use std::cell::RefCell;
use wasm_bindgen::prelude::*;

pub mod camera;
pub mod space;
pub mod view;

use camera::ScreenPoint;
use space::universe::Universe;

thread_local! {
    static UNIVERSE: RefCell<Option<Universe>> = RefCell::new(None);
}

fn with_universe_mut<R>(f: impl FnOnce(&mut Universe) -> R) -> Result<R, &'static str> {
    UNIVERSE.with(|cell| {
        let mut opt = cell.borrow_mut();
        match opt.as_mut() {
            Some(universe) => Ok(f(universe)),
            None => Err("universe not initialized"),
        }
    })
}

#[cfg(target_arch = "wasm32")]
fn console_log(message: &str) {
    web_sys::console::log_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn console_log(message: &str) {
    let _ = message;
}

#[wasm_bindgen]
pub fn init_universe(seed: u64) {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    UNIVERSE.with(|cell| {
        *cell.borrow_mut() = Some(Universe::new(seed));
    });
    console_log(&format!("universe init, seed {seed}"));
}

/// Advances one render frame by `dt` wall-clock seconds.
#[wasm_bindgen]
pub fn frame(dt: f64) {
    let _ = with_universe_mut(|universe| universe.frame(dt));
}

/// Per-frame draw snapshot (projected positions, trail segments, stats).
#[wasm_bindgen]
pub fn scene_json() -> String {
    match with_universe_mut(|universe| view::scene_json(universe)) {
        Ok(json) => json,
        Err(e) => e.to_string(),
    }
}

/// Structural snapshot of the full hierarchy.
#[wasm_bindgen]
pub fn universe_json() -> String {
    match with_universe_mut(|universe| view::universe_json(universe)) {
        Ok(json) => json,
        Err(e) => e.to_string(),
    }
}

#[wasm_bindgen]
pub fn reset_universe() {
    let _ = with_universe_mut(|universe| universe.reset());
    console_log("universe reset");
}

#[wasm_bindgen]
pub fn add_star() {
    let _ = with_universe_mut(|universe| universe.add_star());
}

/// Runs one console command and reports the outcome as a status line.
#[wasm_bindgen]
pub fn run_command(text: &str) -> String {
    match with_universe_mut(|universe| universe.execute_command(text).to_string()) {
        Ok(status) => status,
        Err(e) => e.to_string(),
    }
}

#[wasm_bindgen]
pub fn set_time_factor(text: &str) -> String {
    match with_universe_mut(|universe| match universe.set_time_factor(text) {
        Ok(factor) => format!("time factor set to {factor}"),
        Err(err) => err.to_string(),
    }) {
        Ok(status) => status,
        Err(e) => e.to_string(),
    }
}

/// Nudges the time factor up (positive) or down (negative) one step.
#[wasm_bindgen]
pub fn adjust_time(direction: i32) {
    let _ = with_universe_mut(|universe| universe.adjust_time_factor(direction));
}

#[wasm_bindgen]
pub fn toggle_paused() -> bool {
    with_universe_mut(|universe| universe.toggle_paused()).unwrap_or(false)
}

/// JSON view of the body under the cursor, or `null`.
#[wasm_bindgen]
pub fn hovered_body(x: i32, y: i32) -> String {
    match with_universe_mut(|universe| {
        let node = universe
            .find_hovered(ScreenPoint::new(x, y))
            .and_then(|id| view::body_detail(universe, id));
        serde_json::to_string(&node).unwrap_or_else(|_| "null".to_string())
    }) {
        Ok(json) => json,
        Err(_) => "null".to_string(),
    }
}

/// Primary click: locks the camera onto the body under the cursor.
#[wasm_bindgen]
pub fn click_at(x: i32, y: i32) -> bool {
    with_universe_mut(|universe| match universe.find_hovered(ScreenPoint::new(x, y)) {
        Some(id) => {
            universe.camera_mut().lock_to(id);
            true
        }
        None => false,
    })
    .unwrap_or(false)
}

/// Keyboard panning with unit direction signals per axis.
#[wasm_bindgen]
pub fn pan_camera(dx: i32, dy: i32) {
    let _ = with_universe_mut(|universe| universe.camera_mut().move_focus(dx, dy));
}

#[wasm_bindgen]
pub fn zoom_camera(factor: f64) {
    let _ = with_universe_mut(|universe| universe.camera_mut().adjust_zoom(factor));
}
