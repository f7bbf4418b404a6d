//! CF-convention time axis decoding.
//!
//! NetCDF time coordinates are stored as numeric offsets with a units
//! attribute such as `"days since 1800-01-01 00:00:00"`.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{RasterError, RasterResult};

/// Offset unit of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    /// Parse a CF unit name (case-insensitive, singular or plural).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "days" | "day" | "d" => Some(Self::Days),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(Self::Hours),
            "minutes" | "minute" | "mins" | "min" => Some(Self::Minutes),
            "seconds" | "second" | "secs" | "sec" | "s" => Some(Self::Seconds),
            _ => None,
        }
    }

    fn millis(&self) -> f64 {
        match self {
            Self::Days => 86_400_000.0,
            Self::Hours => 3_600_000.0,
            Self::Minutes => 60_000.0,
            Self::Seconds => 1_000.0,
        }
    }
}

/// Parsed `"<unit> since <epoch>"` time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfTimeUnits {
    pub unit: TimeUnit,
    pub epoch: NaiveDateTime,
}

impl CfTimeUnits {
    /// Parse a CF units string.
    pub fn parse(units: &str) -> RasterResult<Self> {
        let invalid = || RasterError::InvalidTimeUnits(units.to_string());

        let (unit, epoch) = units.split_once(" since ").ok_or_else(invalid)?;
        let unit = TimeUnit::parse(unit).ok_or_else(invalid)?;
        let epoch = parse_epoch(epoch).ok_or_else(invalid)?;

        Ok(Self { unit, epoch })
    }

    /// Convert one numeric offset into a timestamp (millisecond precision).
    pub fn decode(&self, offset: f64) -> RasterResult<NaiveDateTime> {
        let millis = offset * self.unit.millis();
        // Beyond chrono's representable range either way.
        if !millis.is_finite() || millis.abs() > 1.0e16 {
            return Err(RasterError::InvalidTimeValue(offset));
        }

        self.epoch
            .checked_add_signed(Duration::milliseconds(millis.round() as i64))
            .ok_or(RasterError::InvalidTimeValue(offset))
    }
}

/// Decode a whole time axis.
pub fn decode_cf_times(units: &str, offsets: &[f64]) -> RasterResult<Vec<NaiveDateTime>> {
    let units = CfTimeUnits::parse(units)?;
    offsets.iter().map(|&offset| units.decode(offset)).collect()
}

fn parse_epoch(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_end_matches("UTC").trim_end_matches('Z').trim();

    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
