use serde::{Deserialize, Deserializer, Serialize};

/// A locality with its crime statistics, as listed by `GET /zones`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub locality: String,
    pub district: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub latitude: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub longitude: f64,
    #[serde(default)]
    pub safety_level: Option<String>,
    #[serde(default)]
    pub crime_rate_per_100k: f64,
    #[serde(default)]
    pub total_crimes: i64,
}

impl Zone {
    pub fn title(&self) -> String {
        format!("{}, {}", self.locality, self.district)
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Statistics for the locality nearest to a queried coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalityInfo {
    pub locality: String,
    pub district: String,
    pub crime_rate_per_100k: f64,
    pub total_crimes: i64,
    #[serde(default)]
    pub safety_level: Option<String>,
    pub bar: String,
    pub bar_color: String,
    pub distance_km: f64,
}

impl LocalityInfo {
    pub fn title(&self) -> String {
        format!("{}, {}", self.locality, self.district)
    }
}

/// Body of `GET /crime-info`. Failures carry only an `error` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CrimeInfoResponse {
    Error { error: String },
    Info(LocalityInfo),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Accepts a JSON number, a numeric string or null. Anything unparseable
/// becomes NaN so the zone can be skipped instead of failing the whole list.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
        Null,
    }

    Ok(match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => value,
        NumberOrString::String(raw) => raw.trim().parse().unwrap_or(f64::NAN),
        NumberOrString::Null => f64::NAN,
    })
}
