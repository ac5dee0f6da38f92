use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

use crate::config::MAP_ELEMENT_ID;
use crate::geolocation::{self, GEOLOCATION_UNSUPPORTED_MESSAGE, WatchError};
use crate::leaflet::LeafletMap;
use crate::panel::{DetailPanel, PanelContent, PanelState};
use crate::tracker::{self, SharedViewer};
use crate::viewer::ZoneViewer;

thread_local! {
    static VIEWER: RefCell<Option<SharedViewer>> = const { RefCell::new(None) };
}

#[component]
pub fn App() -> impl IntoView {
    let panel = RwSignal::new(PanelState::default());
    provide_context(DetailPanel(panel));

    // The map container must be in the DOM before Leaflet mounts on it.
    Effect::new(move || {
        start_viewer(panel);
    });

    view! {
        <div id=MAP_ELEMENT_ID></div>
        <InfoBox />
    }
}

#[component]
fn InfoBox() -> impl IntoView {
    let DetailPanel(panel) = expect_context::<DetailPanel>();

    view! {
        <div id="info-box" hidden=move || !panel.with(|p| p.visible)>
            <button id="info-close" title="Close" on:click=move |_| panel.update(PanelState::hide)>
                "\u{00d7}"
            </button>
            <div id="info-content" inner_html=move || panel.with(PanelState::inner_html)></div>
        </div>
    }
}

fn start_viewer(panel: RwSignal<PanelState>) {
    if VIEWER.with(|slot| slot.borrow().is_some()) {
        return;
    }

    let map = match LeafletMap::mount(MAP_ELEMENT_ID) {
        Ok(map) => map,
        Err(e) => {
            web_sys::console::error_1(&e.into());
            return;
        }
    };
    let on_zone_selected = Rc::new(move |content: PanelContent| {
        panel.update(|state| state.show(content));
    });
    let viewer: SharedViewer = Rc::new(RefCell::new(ZoneViewer::new(map, on_zone_selected)));

    tracker::load_zones(Rc::clone(&viewer));

    let tracked = Rc::clone(&viewer);
    match geolocation::watch(move |at| tracker::on_fix(&tracked, at)) {
        Ok(()) => {}
        Err(WatchError::Unsupported) => geolocation::alert(GEOLOCATION_UNSUPPORTED_MESSAGE),
        Err(WatchError::Rejected) => {
            web_sys::console::warn_1(&"Position watch could not be started".into());
        }
    }

    VIEWER.with(|slot| *slot.borrow_mut() = Some(viewer));
}
