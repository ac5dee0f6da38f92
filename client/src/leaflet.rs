#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use safezone_shared::LatLng;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::config::{TILE_ATTRIBUTION, TILE_MAX_ZOOM, TILE_URL};
use crate::map_surface::{CircleStyle, MapSurface};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = L, js_name = Map)]
    pub type LMap;

    /// Any Leaflet layer: tile layers, groups, markers, circles.
    #[wasm_bindgen(js_namespace = L, js_name = Layer)]
    pub type Layer;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn l_map(element_id: &str) -> Result<LMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LMap, center: &JsValue, zoom: u8);

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn l_tile_layer(url_template: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    fn l_layer_group() -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn l_marker(at: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = circle)]
    fn l_circle(center: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Layer, target: &JsValue);

    #[wasm_bindgen(method, js_name = clearLayers)]
    fn clear_layers(this: &Layer);

    #[wasm_bindgen(method, js_name = setLatLng)]
    fn set_lat_lng(this: &Layer, at: &JsValue);

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Layer, html: &str);

    #[wasm_bindgen(method, js_name = openPopup)]
    fn open_popup(this: &Layer);

    #[wasm_bindgen(method)]
    fn on(this: &Layer, event: &str, handler: &js_sys::Function);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileOptions {
    max_zoom: u8,
    attribution: &'static str,
}

fn lat_lng(at: LatLng) -> JsValue {
    js_sys::Array::of2(&at.lat.into(), &at.lon.into()).into()
}

fn options<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        web_sys::console::warn_1(&format!("Leaflet options not serializable: {e}").into());
        JsValue::UNDEFINED
    })
}

/// Leaflet map mounted on a DOM element, with a dedicated layer group for the
/// zone circles.
pub struct LeafletMap {
    map: LMap,
    zones: Layer,
    zone_click_handlers: Vec<Closure<dyn Fn()>>,
}

impl LeafletMap {
    pub fn mount(element_id: &str) -> Result<Self, String> {
        let map = l_map(element_id).map_err(|e| format!("failed to create map: {e:?}"))?;
        l_tile_layer(
            TILE_URL,
            &options(&TileOptions {
                max_zoom: TILE_MAX_ZOOM,
                attribution: TILE_ATTRIBUTION,
            }),
        )
        .add_to(&map);
        let zones = l_layer_group();
        zones.add_to(&map);
        Ok(Self {
            map,
            zones,
            zone_click_handlers: Vec::new(),
        })
    }
}

impl MapSurface for LeafletMap {
    type Marker = Layer;
    type Circle = Layer;

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.map.set_view(&lat_lng(center), zoom);
    }

    fn clear_zones(&mut self) {
        self.zones.clear_layers();
        self.zone_click_handlers.clear();
    }

    fn add_zone_circle(&mut self, center: LatLng, style: &CircleStyle, on_click: Box<dyn Fn()>) {
        let circle = l_circle(&lat_lng(center), &options(style));
        let handler = Closure::wrap(on_click);
        circle.on("click", handler.as_ref().unchecked_ref());
        circle.add_to(&self.zones);
        self.zone_click_handlers.push(handler);
    }

    fn add_marker(&mut self, at: LatLng) -> Layer {
        let marker = l_marker(&lat_lng(at));
        marker.add_to(&self.map);
        marker
    }

    fn move_marker(&mut self, marker: &Layer, to: LatLng) {
        marker.set_lat_lng(&lat_lng(to));
    }

    fn add_circle(&mut self, at: LatLng, style: &CircleStyle) -> Layer {
        let circle = l_circle(&lat_lng(at), &options(style));
        circle.add_to(&self.map);
        circle
    }

    fn move_circle(&mut self, circle: &Layer, to: LatLng) {
        circle.set_lat_lng(&lat_lng(to));
    }

    fn open_popup(&mut self, marker: &Layer, html: &str) {
        marker.bind_popup(html);
        marker.open_popup();
    }
}
