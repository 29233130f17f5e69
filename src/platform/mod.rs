//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keys and swipes to directions)
//! - Tick scheduling (one-shot browser timeouts)

use crate::sim::Direction;

/// Minimum swipe travel (CSS px) before it counts as a turn
pub const MIN_SWIPE_DISTANCE: f32 = 24.0;

/// Map a `KeyboardEvent.key` value to a direction
pub fn direction_from_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// Map a swipe (screen coords, y down) to a direction along its dominant axis
pub fn direction_from_swipe(dx: f32, dy: f32) -> Option<Direction> {
    if dx.abs().max(dy.abs()) < MIN_SWIPE_DISTANCE {
        return None;
    }
    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    }
}

/// Run `callback` once after `delay_ms` (WASM only). Returns the timeout handle.
#[cfg(target_arch = "wasm32")]
pub fn schedule_once(
    delay_ms: u32,
    callback: impl FnOnce() + 'static,
) -> Result<i32, wasm_bindgen::JsValue> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let closure = Closure::once(callback);
    let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        delay_ms as i32,
    )?;
    closure.forget();
    Ok(handle)
}

/// Cancel a pending `schedule_once` (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn cancel_scheduled(handle: i32) {
    if let Some(window) = web_sys::window() {
        window.clear_timeout_with_handle(handle);
    }
}
