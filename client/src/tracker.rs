use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use safezone_shared::{BAR_SEGMENTS, LatLng};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::config::{BAR_FILL_DELAY_MS, BAR_FILL_ELEMENT_ID};
use crate::leaflet::LeafletMap;
use crate::viewer::{FixOutcome, ZoneViewer};

pub type SharedViewer = Rc<RefCell<ZoneViewer<LeafletMap>>>;

/// One-shot zone load. Failures are logged and leave the map empty.
pub fn load_zones(viewer: SharedViewer) {
    spawn_local(async move {
        match api::fetch_zones().await {
            Ok(zones) => {
                let drawn = viewer.borrow_mut().render_zones(&zones);
                if drawn < zones.len() {
                    web_sys::console::warn_1(
                        &format!("Skipped {} zones without coordinates", zones.len() - drawn)
                            .into(),
                    );
                }
            }
            Err(e) => {
                web_sys::console::error_1(&format!("Error loading zones: {e}").into());
            }
        }
    });
}

/// Recenter on the fix and look up its locality. Responses are applied as
/// they arrive; the viewer drops any that were overtaken.
pub fn on_fix(viewer: &SharedViewer, at: LatLng) {
    let ticket = viewer.borrow_mut().begin_fix(at);
    let viewer = Rc::clone(viewer);
    spawn_local(async move {
        let response = match api::fetch_crime_info(ticket.at()).await {
            Ok(response) => response,
            Err(e) => {
                web_sys::console::error_1(&format!("Error fetching crime-info: {e}").into());
                return;
            }
        };

        let outcome = viewer.borrow_mut().apply_crime_info(ticket, response);
        match outcome {
            FixOutcome::LocalityChanged {
                fill_percent,
                bar_length_ok,
            } => {
                if let Some(locality) = viewer.borrow().current_locality() {
                    web_sys::console::info_1(&format!("Entered {locality}").into());
                }
                if !bar_length_ok {
                    web_sys::console::warn_1(
                        &format!("crime-info bar is not {BAR_SEGMENTS} segments long").into(),
                    );
                }
                schedule_bar_fill(fill_percent);
            }
            FixOutcome::Rejected(error) => {
                web_sys::console::error_1(&format!("crime-info error: {error}").into());
            }
            FixOutcome::Stale | FixOutcome::Unchanged => {}
        }
    });
}

fn schedule_bar_fill(percent: u32) {
    Timeout::new(BAR_FILL_DELAY_MS, move || {
        let Some(bar) = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(BAR_FILL_ELEMENT_ID))
            .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return;
        };
        let _ = bar.style().set_property("width", &format!("{percent}%"));
    })
    .forget();
}
