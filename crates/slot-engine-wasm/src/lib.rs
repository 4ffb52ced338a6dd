//! WASM bindings for slot-engine.
//!
//! Exposes slot computation and free-window inspection to the booking front
//! end via `wasm-bindgen`. Requests and results cross the boundary as JSON
//! strings; the request is the camelCase form of `slot_engine::RequestSpec`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use slot_engine::{localize_slots, localize_windows, AvailabilityRequest, SlotError};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON-level API (plain Rust, shared by the exports and native tests)
// ---------------------------------------------------------------------------

/// Compute slots for a JSON request and return them as a JSON array.
pub fn compute_availability_json(request_json: &str) -> Result<String, SlotError> {
    let request = AvailabilityRequest::from_json(request_json)?;
    let slots = slot_engine::compute_availability(&request)?;
    serde_json::to_string(&localize_slots(&slots, &request.zone))
        .map_err(|e| SlotError::InvalidRequest(e.to_string()))
}

/// Compute free windows for a JSON request and return them as a JSON array.
pub fn free_windows_json(request_json: &str) -> Result<String, SlotError> {
    let request = AvailabilityRequest::from_json(request_json)?;
    let windows = slot_engine::free_windows(&request)?;
    serde_json::to_string(&localize_windows(&windows, &request.zone))
        .map_err(|e| SlotError::InvalidRequest(e.to_string()))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute bookable slots, best first.
///
/// Returns a JSON string containing an array of `{start, end, durationMinutes}`
/// objects with RFC 3339 datetimes in the request's timezone.
#[wasm_bindgen(js_name = "computeAvailability")]
pub fn compute_availability(request_json: &str) -> Result<String, JsValue> {
    compute_availability_json(request_json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Compute the free windows inside working hours.
///
/// Returns a JSON string containing an array of window objects.
#[wasm_bindgen(js_name = "freeWindows")]
pub fn free_windows(request_json: &str) -> Result<String, JsValue> {
    free_windows_json(request_json).map_err(|e| JsValue::from_str(&e.to_string()))
}
