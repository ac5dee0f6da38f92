use std::cell::RefCell;

use safezone_shared::LatLng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Geolocation, Position, PositionError, PositionOptions};

use crate::config::{GEO_HIGH_ACCURACY, GEO_MAXIMUM_AGE_MS, GEO_TIMEOUT_MS};

pub const LOCATION_REQUIRED_MESSAGE: &str =
    "Location access is required for live tracking. Please allow location access.";
pub const GEOLOCATION_UNSUPPORTED_MESSAGE: &str = "Geolocation not supported by your browser.";

struct WatchBinding {
    geolocation: Geolocation,
    watch_id: i32,
    _on_fix: Closure<dyn Fn(Position)>,
    _on_error: Closure<dyn Fn(PositionError)>,
}

thread_local! {
    static WATCH_BINDING: RefCell<Option<WatchBinding>> = const { RefCell::new(None) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchError {
    Unsupported,
    Rejected,
}

fn stop() {
    WATCH_BINDING.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            old.geolocation.clear_watch(old.watch_id);
        }
    });
}

/// Subscribe to continuous position fixes. Fixes with out-of-range
/// coordinates are dropped.
pub fn watch(on_fix: impl Fn(LatLng) + 'static) -> Result<(), WatchError> {
    let geolocation = web_sys::window()
        .and_then(|window| window.navigator().geolocation().ok())
        .ok_or(WatchError::Unsupported)?;

    stop();

    let on_fix = Closure::<dyn Fn(Position)>::new(move |position: Position| {
        let coords = position.coords();
        let at = LatLng::new(coords.latitude(), coords.longitude());
        if at.is_valid() {
            on_fix(at);
        } else {
            web_sys::console::warn_1(&format!("Ignoring invalid position fix: {at:?}").into());
        }
    });
    let on_error = Closure::<dyn Fn(PositionError)>::new(|err: PositionError| {
        web_sys::console::error_1(
            &format!("Geolocation error {}: {}", err.code(), err.message()).into(),
        );
        if alerts_user(err.code()) {
            alert(LOCATION_REQUIRED_MESSAGE);
        }
    });

    let options = PositionOptions::new();
    options.set_enable_high_accuracy(GEO_HIGH_ACCURACY);
    options.set_maximum_age(GEO_MAXIMUM_AGE_MS);
    options.set_timeout(GEO_TIMEOUT_MS);

    let watch_id = geolocation
        .watch_position_with_error_callback_and_options(
            on_fix.as_ref().unchecked_ref(),
            Some(on_error.as_ref().unchecked_ref()),
            &options,
        )
        .map_err(|e| {
            web_sys::console::error_1(&e);
            WatchError::Rejected
        })?;

    WATCH_BINDING.with(|slot| {
        *slot.borrow_mut() = Some(WatchBinding {
            geolocation,
            watch_id,
            _on_fix: on_fix,
            _on_error: on_error,
        });
    });
    Ok(())
}

/// Timeouts are only logged.
fn alerts_user(code: u16) -> bool {
    code == PositionError::PERMISSION_DENIED || code == PositionError::POSITION_UNAVAILABLE
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
