use safezone_shared::{LocalityInfo, Zone};

use crate::panel::PanelContent;

/// Detail panel content shown when a zone circle is clicked.
pub fn zone_detail(zone: &Zone) -> PanelContent {
    let content_html = format!(
        "<div class=\"info-row\"><strong>Crime Rate:</strong> {} per 100k</div>\
         <div class=\"info-row\"><strong>Total Crimes:</strong> {}</div>\
         <div class=\"info-row\"><strong>Safety:</strong> {}</div>",
        zone.crime_rate_per_100k,
        zone.total_crimes,
        escape_html(safety_label(zone.safety_level.as_deref())),
    );
    PanelContent {
        title: escape_html(&zone.title()),
        content_html,
    }
}

/// Popup bound to the user marker when they enter a new locality. The
/// `#bar-fill` element starts at 0% and is widened once the popup is open.
pub fn locality_popup_html(info: &LocalityInfo) -> String {
    let bar_color = escape_html(&info.bar_color);
    format!(
        "<div style=\"min-width:180px\">\
           <b>{title}</b><br/>\
           <div style=\"margin-top:6px;\"><strong>Crime rate:</strong> {rate} per 100k</div>\
           <div><strong>Total crimes:</strong> {total}</div>\
           <div><strong>Safety:</strong> {safety}</div>\
           <div style=\"margin-top:8px\">\
             <div class=\"bar-visual\"><div class=\"bar-fill\" id=\"bar-fill\" style=\"background:{bar_color}; width:0%\"></div></div>\
             <div style=\"font-family: monospace; margin-top:6px; color:{bar_color}\">{bar}</div>\
           </div>\
           <div style=\"margin-top:6px; font-size:12px; color:#666\">Distance to center: {distance} km</div>\
         </div>",
        title = escape_html(&info.title()),
        rate = info.crime_rate_per_100k,
        total = info.total_crimes,
        safety = escape_html(safety_label(info.safety_level.as_deref())),
        bar = escape_html(&info.bar),
        distance = info.distance_km,
    )
}

fn safety_label(raw: Option<&str>) -> &str {
    match raw {
        Some(level) if !level.trim().is_empty() => level,
        _ => "Unknown",
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
