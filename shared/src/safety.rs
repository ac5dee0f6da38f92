/// Zone overlay color for a low-crime locality.
pub const SAFETY_LOW_COLOR: &str = "#2ecc71";
pub const SAFETY_MEDIUM_COLOR: &str = "#f39c12";
pub const SAFETY_HIGH_COLOR: &str = "#e74c3c";
/// Used when the safety level is missing or unrecognised.
pub const SAFETY_DEFAULT_COLOR: &str = "#3498db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl SafetyLevel {
    /// Case-insensitive substring match, checked in low/medium/high order.
    pub fn classify(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unknown;
        };
        let normalized = raw.to_lowercase();
        if normalized.contains("low") {
            Self::Low
        } else if normalized.contains("medium") {
            Self::Medium
        } else if normalized.contains("high") {
            Self::High
        } else {
            Self::Unknown
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Low => SAFETY_LOW_COLOR,
            Self::Medium => SAFETY_MEDIUM_COLOR,
            Self::High => SAFETY_HIGH_COLOR,
            Self::Unknown => SAFETY_DEFAULT_COLOR,
        }
    }
}

pub fn safety_color(raw: Option<&str>) -> &'static str {
    SafetyLevel::classify(raw).color()
}
