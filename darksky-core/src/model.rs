use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.address)
    }
}

/// Unit system understood by the forecast API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Chosen by the API from the location.
    #[default]
    Auto,
    /// SI, with wind speed in km/h.
    Ca,
    /// SI, with wind speed in mph and distances in miles.
    Uk2,
    /// Imperial.
    Us,
    Si,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Auto => "auto",
            Units::Ca => "ca",
            Units::Uk2 => "uk2",
            Units::Us => "us",
            Units::Si => "si",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Auto, Units::Ca, Units::Uk2, Units::Us, Units::Si]
    }

    /// Temperature suffix. `Auto` has none until the API has resolved it.
    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Auto => "",
            Units::Us => "F",
            Units::Ca | Units::Uk2 | Units::Si => "C",
        }
    }

    pub fn wind_speed_unit(&self) -> &'static str {
        match self {
            Units::Auto => "",
            Units::Us | Units::Uk2 => "mph",
            Units::Ca => "km/h",
            Units::Si => "m/s",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "auto" => Ok(Units::Auto),
            "ca" => Ok(Units::Ca),
            "uk2" | "uk" => Ok(Units::Uk2),
            "us" => Ok(Units::Us),
            "si" => Ok(Units::Si),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: auto, ca, uk2, us, si."
            )),
        }
    }
}

/// One observation or forecast slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub time: DateTime<Utc>,
    pub summary: String,
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    /// Relative humidity in `[0, 1]`.
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

/// A run of data points at one granularity (hourly or daily).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub summary: String,
    pub data: Vec<DataPoint>,
}

impl Block {
    /// Temperature series in time order; points without a temperature are skipped.
    pub fn temperatures(&self) -> Vec<f64> {
        self.data.iter().filter_map(|p| p.temperature).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub location: Location,
    pub timezone: String,
    pub utc_offset_hours: f64,
    /// Units the values are expressed in, as resolved by the API.
    pub units: Units,
    pub currently: DataPoint,
    pub hourly: Block,
    pub daily: Block,
}

impl ForecastReport {
    /// Time of the current observation in the location's own offset.
    pub fn local_time(&self) -> DateTime<FixedOffset> {
        let secs = (self.utc_offset_hours * 3600.0).round() as i32;
        let offset = FixedOffset::east_opt(secs).unwrap_or(Utc.fix());
        self.currently.time.with_timezone(&offset)
    }
}
