//! The textual safety bar returned by `/crime-info`.
//!
//! A bar is exactly [`BAR_SEGMENTS`] glyphs: some [`BAR_FILLED`] glyphs followed
//! by padding. The client only counts filled glyphs, so any padding glyph works.

/// Number of glyphs in a safety bar.
pub const BAR_SEGMENTS: usize = 10;
pub const BAR_FILLED: char = '█';
pub const BAR_EMPTY: char = '-';

/// Used as the scale maximum when the dataset has no positive rate.
pub const DEFAULT_MAX_RATE_PER_100K: f64 = 500.0;
pub const GREEN_MAX_RATE_PER_100K: f64 = 200.0;
pub const ORANGE_MAX_RATE_PER_100K: f64 = 320.0;

/// Number of filled segments for `rate` on a scale topped by `max_rate`.
pub fn filled_segments(rate: f64, max_rate: f64) -> usize {
    let max_rate = effective_max_rate(max_rate);
    let ratio = rate / max_rate * BAR_SEGMENTS as f64;
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0;
    }
    (ratio.floor() as usize).min(BAR_SEGMENTS)
}

pub fn effective_max_rate(max_rate: f64) -> f64 {
    if max_rate.is_finite() && max_rate > 0.0 {
        max_rate
    } else {
        DEFAULT_MAX_RATE_PER_100K
    }
}

pub fn render_bar(filled: usize) -> String {
    let filled = filled.min(BAR_SEGMENTS);
    let mut bar = String::with_capacity(BAR_SEGMENTS * BAR_FILLED.len_utf8());
    bar.extend(std::iter::repeat_n(BAR_FILLED, filled));
    bar.extend(std::iter::repeat_n(BAR_EMPTY, BAR_SEGMENTS - filled));
    bar
}

/// CSS color name paired with a bar, picked from the raw rate.
pub fn bar_color_for_rate(rate: f64) -> &'static str {
    if rate <= GREEN_MAX_RATE_PER_100K {
        "green"
    } else if rate <= ORANGE_MAX_RATE_PER_100K {
        "orange"
    } else {
        "red"
    }
}

pub fn count_filled(bar: &str) -> usize {
    bar.chars().filter(|c| *c == BAR_FILLED).count()
}

/// Width of the graphical fill, in whole percent of [`BAR_SEGMENTS`].
pub fn bar_fill_percent(bar: &str) -> u32 {
    let filled = count_filled(bar).min(BAR_SEGMENTS);
    ((filled as f64 / BAR_SEGMENTS as f64) * 100.0).round() as u32
}

pub fn has_expected_length(bar: &str) -> bool {
    bar.chars().count() == BAR_SEGMENTS
}
