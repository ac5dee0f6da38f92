use std::rc::Rc;

use safezone_shared::bar::has_expected_length;
use safezone_shared::{CrimeInfoResponse, LatLng, Zone, bar_fill_percent, safety_color};

use crate::config::{DEFAULT_CENTER, DEFAULT_ZOOM, TRACKING_ZOOM};
use crate::map_surface::{CircleStyle, MapSurface};
use crate::panel::PanelContent;
use crate::popup;

/// Issued for every position fix; the crime-info response for that fix is
/// applied with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixTicket {
    seq: u64,
    at: LatLng,
}

impl FixTicket {
    pub fn at(&self) -> LatLng {
        self.at
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FixOutcome {
    /// A newer fix was already applied.
    Stale,
    /// The backend answered with `{ "error": .. }`, whatever the fix's age.
    Rejected(String),
    /// Marker moved, still inside the tracked locality.
    Unchanged,
    /// Popup rebuilt for a new locality.
    LocalityChanged {
        fill_percent: u32,
        bar_length_ok: bool,
    },
}

struct UserOverlay<M: MapSurface> {
    marker: M::Marker,
    circle: M::Circle,
}

/// Owns the map and everything drawn on it for one page.
pub struct ZoneViewer<M: MapSurface> {
    map: M,
    user: Option<UserOverlay<M>>,
    current_locality: Option<String>,
    next_seq: u64,
    last_applied_seq: Option<u64>,
    on_zone_selected: Rc<dyn Fn(PanelContent)>,
}

impl<M: MapSurface> ZoneViewer<M> {
    pub fn new(mut map: M, on_zone_selected: Rc<dyn Fn(PanelContent)>) -> Self {
        map.set_view(DEFAULT_CENTER, DEFAULT_ZOOM);
        Self {
            map,
            user: None,
            current_locality: None,
            next_seq: 0,
            last_applied_seq: None,
            on_zone_selected,
        }
    }

    /// Replace the zone overlays. Zones without usable coordinates are skipped.
    pub fn render_zones(&mut self, zones: &[Zone]) -> usize {
        self.map.clear_zones();
        let mut drawn = 0;
        for zone in zones.iter().filter(|zone| zone.has_coordinates()) {
            let style = CircleStyle::zone(safety_color(zone.safety_level.as_deref()));
            let detail = popup::zone_detail(zone);
            let on_zone_selected = Rc::clone(&self.on_zone_selected);
            self.map.add_zone_circle(
                LatLng::new(zone.latitude, zone.longitude),
                &style,
                Box::new(move || on_zone_selected(detail.clone())),
            );
            drawn += 1;
        }
        drawn
    }

    pub fn current_locality(&self) -> Option<&str> {
        self.current_locality.as_deref()
    }

    /// Recenter on a new fix and hand out the ticket its lookup must carry.
    pub fn begin_fix(&mut self, at: LatLng) -> FixTicket {
        self.map.set_view(at, TRACKING_ZOOM);
        let seq = self.next_seq;
        self.next_seq += 1;
        FixTicket { seq, at }
    }

    pub fn apply_crime_info(&mut self, ticket: FixTicket, response: CrimeInfoResponse) -> FixOutcome {
        let info = match response {
            CrimeInfoResponse::Error { error } => return FixOutcome::Rejected(error),
            CrimeInfoResponse::Info(info) => info,
        };
        if self.last_applied_seq.is_some_and(|last| ticket.seq <= last) {
            return FixOutcome::Stale;
        }
        self.last_applied_seq = Some(ticket.seq);

        let at = ticket.at;
        let user = match self.user.take() {
            Some(user) => {
                self.map.move_marker(&user.marker, at);
                self.map.move_circle(&user.circle, at);
                user
            }
            None => UserOverlay {
                marker: self.map.add_marker(at),
                circle: self.map.add_circle(at, &CircleStyle::user_radius()),
            },
        };

        let changed = self.current_locality.as_deref() != Some(info.locality.as_str());
        if changed {
            self.map
                .open_popup(&user.marker, &popup::locality_popup_html(&info));
        }
        self.user = Some(user);
        if !changed {
            return FixOutcome::Unchanged;
        }

        self.current_locality = Some(info.locality);
        FixOutcome::LocalityChanged {
            fill_percent: bar_fill_percent(&info.bar),
            bar_length_ok: has_expected_length(&info.bar),
        }
    }

    #[cfg(test)]
    fn map(&self) -> &M {
        &self.map
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use safezone_shared::LocalityInfo;
    use safezone_shared::safety::{SAFETY_DEFAULT_COLOR, SAFETY_HIGH_COLOR, SAFETY_LOW_COLOR};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        SetView(LatLng, u8),
        ClearZones,
        AddZone(LatLng, String),
        AddMarker(LatLng),
        MoveMarker(usize, LatLng),
        AddCircle(LatLng, f64),
        MoveCircle(usize, LatLng),
        OpenPopup(usize, String),
    }

    #[derive(Default)]
    struct FakeMap {
        calls: Vec<Call>,
        zone_clicks: Vec<Box<dyn Fn()>>,
        next_handle: usize,
    }

    impl FakeMap {
        fn handle(&mut self) -> usize {
            self.next_handle += 1;
            self.next_handle
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|call| pred(call)).count()
        }

        fn popups(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::OpenPopup(_, html) => Some(html.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl MapSurface for FakeMap {
        type Marker = usize;
        type Circle = usize;

        fn set_view(&mut self, center: LatLng, zoom: u8) {
            self.calls.push(Call::SetView(center, zoom));
        }

        fn clear_zones(&mut self) {
            self.zone_clicks.clear();
            self.calls.push(Call::ClearZones);
        }

        fn add_zone_circle(&mut self, center: LatLng, style: &CircleStyle, on_click: Box<dyn Fn()>) {
            self.zone_clicks.push(on_click);
            self.calls.push(Call::AddZone(center, style.color.clone()));
        }

        fn add_marker(&mut self, at: LatLng) -> usize {
            self.calls.push(Call::AddMarker(at));
            self.handle()
        }

        fn move_marker(&mut self, marker: &usize, to: LatLng) {
            self.calls.push(Call::MoveMarker(*marker, to));
        }

        fn add_circle(&mut self, at: LatLng, style: &CircleStyle) -> usize {
            self.calls.push(Call::AddCircle(at, style.radius));
            self.handle()
        }

        fn move_circle(&mut self, circle: &usize, to: LatLng) {
            self.calls.push(Call::MoveCircle(*circle, to));
        }

        fn open_popup(&mut self, marker: &usize, html: &str) {
            self.calls.push(Call::OpenPopup(*marker, html.to_owned()));
        }
    }

    type Selected = Rc<RefCell<Vec<PanelContent>>>;

    fn viewer() -> (ZoneViewer<FakeMap>, Selected) {
        let selected: Selected = Rc::default();
        let sink = Rc::clone(&selected);
        let viewer = ZoneViewer::new(
            FakeMap::default(),
            Rc::new(move |content| sink.borrow_mut().push(content)),
        );
        (viewer, selected)
    }

    fn zone(locality: &str, lat: f64, lon: f64, safety: Option<&str>) -> Zone {
        Zone {
            locality: locality.into(),
            district: "Raipur".into(),
            latitude: lat,
            longitude: lon,
            safety_level: safety.map(str::to_owned),
            crime_rate_per_100k: 120.0,
            total_crimes: 240,
        }
    }

    fn info(locality: &str, bar: &str) -> CrimeInfoResponse {
        CrimeInfoResponse::Info(LocalityInfo {
            locality: locality.into(),
            district: "D1".into(),
            crime_rate_per_100k: 12.0,
            total_crimes: 40,
            safety_level: Some("Low".into()),
            bar: bar.into(),
            bar_color: "#2ecc71".into(),
            distance_km: 1.2,
        })
    }

    fn rejected() -> CrimeInfoResponse {
        CrimeInfoResponse::Error {
            error: "No data available".into(),
        }
    }

    #[test]
    fn starts_at_default_view() {
        let (viewer, _) = viewer();
        assert_eq!(
            viewer.map().calls,
            vec![Call::SetView(LatLng::new(21.25, 81.63), 13)]
        );
    }

    #[test]
    fn zones_are_colored_by_safety_level() {
        let (mut viewer, _) = viewer();
        let drawn = viewer.render_zones(&[
            zone("Civil Lines", 21.24, 81.64, Some("LOW risk")),
            zone("Gudhiyari", 21.26, 81.61, Some("high")),
            zone("Tatibandh", 21.27, 81.58, None),
        ]);
        assert_eq!(drawn, 3);

        let colors: Vec<_> = viewer
            .map()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::AddZone(_, color) => Some(color.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(colors, [SAFETY_LOW_COLOR, SAFETY_HIGH_COLOR, SAFETY_DEFAULT_COLOR]);
    }

    #[test]
    fn rendering_again_replaces_previous_zones() {
        let (mut viewer, _) = viewer();
        viewer.render_zones(&[zone("A", 21.0, 81.0, None), zone("B", 21.1, 81.1, None)]);
        let drawn = viewer.render_zones(&[zone("C", 21.2, 81.2, None)]);

        assert_eq!(drawn, 1);
        assert_eq!(viewer.map().zone_clicks.len(), 1);
        assert_eq!(viewer.map().count(|c| *c == Call::ClearZones), 2);
    }

    #[test]
    fn zones_without_coordinates_are_skipped() {
        let (mut viewer, _) = viewer();
        let drawn = viewer.render_zones(&[
            zone("A", f64::NAN, 81.0, None),
            zone("B", 21.1, 81.1, None),
        ]);
        assert_eq!(drawn, 1);
    }

    #[test]
    fn clicking_a_zone_selects_its_detail() {
        let (mut viewer, selected) = viewer();
        viewer.render_zones(&[zone("Telibandha", 21.24, 81.66, Some("Medium"))]);

        (viewer.map().zone_clicks[0])();

        let selected = selected.borrow();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].title, "Telibandha, Raipur");
        assert!(selected[0].content_html.contains("Medium"));
    }

    #[test]
    fn first_fix_places_marker_and_opens_popup() {
        let (mut viewer, _) = viewer();
        let at = LatLng::new(21.2514, 81.6296);
        let ticket = viewer.begin_fix(at);
        let outcome = viewer.apply_crime_info(ticket, info("A", "██████░░░░"));

        assert_eq!(
            outcome,
            FixOutcome::LocalityChanged {
                fill_percent: 60,
                bar_length_ok: true,
            }
        );
        let map = viewer.map();
        assert!(map.calls.contains(&Call::SetView(at, 15)));
        assert!(map.calls.contains(&Call::AddMarker(at)));
        assert!(map.calls.contains(&Call::AddCircle(at, 30.0)));
        let popups = map.popups();
        assert_eq!(popups.len(), 1);
        assert!(popups[0].contains("<b>A, D1</b>"));
        assert_eq!(viewer.current_locality(), Some("A"));
    }

    #[test]
    fn same_locality_moves_marker_without_rebuilding_popup() {
        let (mut viewer, _) = viewer();
        let first = viewer.begin_fix(LatLng::new(21.25, 81.63));
        viewer.apply_crime_info(first, info("A", "███-------"));

        let next_at = LatLng::new(21.2505, 81.6305);
        let second = viewer.begin_fix(next_at);
        let outcome = viewer.apply_crime_info(second, info("A", "███-------"));

        assert_eq!(outcome, FixOutcome::Unchanged);
        let map = viewer.map();
        assert_eq!(map.popups().len(), 1);
        assert_eq!(map.count(|c| matches!(c, Call::AddMarker(_))), 1);
        assert!(map.calls.contains(&Call::MoveMarker(1, next_at)));
        assert!(map.calls.contains(&Call::MoveCircle(2, next_at)));
    }

    #[test]
    fn new_locality_rebuilds_popup() {
        let (mut viewer, _) = viewer();
        let first = viewer.begin_fix(LatLng::new(21.25, 81.63));
        viewer.apply_crime_info(first, info("A", "██--------"));
        let second = viewer.begin_fix(LatLng::new(21.27, 81.60));
        let outcome = viewer.apply_crime_info(second, info("B", "█████-----"));

        assert_eq!(
            outcome,
            FixOutcome::LocalityChanged {
                fill_percent: 50,
                bar_length_ok: true,
            }
        );
        let popups = viewer.map().popups();
        assert_eq!(popups.len(), 2);
        assert!(popups[1].contains("<b>B, D1</b>"));
        assert_eq!(viewer.current_locality(), Some("B"));
    }

    #[test]
    fn off_length_bar_is_flagged() {
        let (mut viewer, _) = viewer();
        let ticket = viewer.begin_fix(LatLng::new(21.25, 81.63));
        let outcome = viewer.apply_crime_info(ticket, info("A", "████"));
        assert_eq!(
            outcome,
            FixOutcome::LocalityChanged {
                fill_percent: 40,
                bar_length_ok: false,
            }
        );
    }

    #[test]
    fn error_before_any_fix_leaves_map_untouched() {
        let (mut viewer, _) = viewer();
        let ticket = viewer.begin_fix(LatLng::new(21.25, 81.63));
        let outcome = viewer.apply_crime_info(ticket, rejected());

        assert_eq!(outcome, FixOutcome::Rejected("No data available".into()));
        let map = viewer.map();
        assert_eq!(map.count(|c| matches!(c, Call::AddMarker(_))), 0);
        assert!(map.popups().is_empty());
        assert_eq!(viewer.current_locality(), None);
    }

    #[test]
    fn error_after_fix_keeps_marker_where_it_was() {
        let (mut viewer, _) = viewer();
        let first = viewer.begin_fix(LatLng::new(21.25, 81.63));
        viewer.apply_crime_info(first, info("A", "██--------"));
        let second = viewer.begin_fix(LatLng::new(22.0, 82.0));
        viewer.apply_crime_info(second, rejected());

        let map = viewer.map();
        assert_eq!(map.count(|c| matches!(c, Call::MoveMarker(..))), 0);
        assert_eq!(viewer.current_locality(), Some("A"));
    }

    #[test]
    fn stale_response_is_discarded() {
        let (mut viewer, _) = viewer();
        let older = viewer.begin_fix(LatLng::new(21.25, 81.63));
        let newer = viewer.begin_fix(LatLng::new(21.27, 81.60));

        viewer.apply_crime_info(newer, info("B", "█████-----"));
        let calls_before = viewer.map().calls.len();
        let outcome = viewer.apply_crime_info(older, info("A", "██--------"));

        assert_eq!(outcome, FixOutcome::Stale);
        assert_eq!(viewer.map().calls.len(), calls_before);
        assert_eq!(viewer.current_locality(), Some("B"));
    }

    #[test]
    fn error_for_overtaken_fix_is_still_reported() {
        let (mut viewer, _) = viewer();
        let older = viewer.begin_fix(LatLng::new(21.25, 81.63));
        let newer = viewer.begin_fix(LatLng::new(21.27, 81.60));

        viewer.apply_crime_info(newer, info("B", "█████-----"));
        let calls_before = viewer.map().calls.len();
        let outcome = viewer.apply_crime_info(older, rejected());

        assert_eq!(outcome, FixOutcome::Rejected("No data available".into()));
        assert_eq!(viewer.map().calls.len(), calls_before);
        assert_eq!(viewer.current_locality(), Some("B"));
    }
}
