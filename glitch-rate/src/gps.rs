//! GPS time as taken from the command line. Either plain GPS seconds or a
//! UTC date and time, which is converted using the table of leap seconds.
use chrono::{DateTime, NaiveDateTime, Utc};
use glitch_rate_common::Time;
use std::str::FromStr;
use thiserror::Error;

/// Unix timestamp of 1980-01-06T00:00:00Z.
const GPS_EPOCH_UNIX: i64 = 315_964_800;

/// Unix timestamps at which each leap second since the GPS epoch took effect.
const LEAP_SECONDS_UNIX: [i64; 18] = [
    362_793_600,   // 1981-07-01
    394_329_600,   // 1982-07-01
    425_865_600,   // 1983-07-01
    489_024_000,   // 1985-07-01
    567_993_600,   // 1988-01-01
    631_152_000,   // 1990-01-01
    662_688_000,   // 1991-01-01
    709_948_800,   // 1992-07-01
    741_484_800,   // 1993-07-01
    773_020_800,   // 1994-07-01
    820_454_400,   // 1996-01-01
    867_715_200,   // 1997-07-01
    915_148_800,   // 1999-01-01
    1_136_073_600, // 2006-01-01
    1_230_768_000, // 2009-01-01
    1_341_100_800, // 2012-07-01
    1_435_708_800, // 2015-07-01
    1_483_228_800, // 2017-01-01
];

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Debug, Error, PartialEq)]
pub enum GpsTimeError {
    #[error("Cannot interpret '{0}' as GPS seconds or as a UTC date and time")]
    Unrecognised(String),
}

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct GpsTime(Time);

impl GpsTime {
    pub fn seconds(&self) -> Time {
        self.0
    }

    pub fn from_utc(date_time: DateTime<Utc>) -> Self {
        let unix = date_time.timestamp();
        let leap_seconds = LEAP_SECONDS_UNIX
            .iter()
            .take_while(|&&leap| leap <= unix)
            .count();
        let whole = unix - GPS_EPOCH_UNIX + leap_seconds as i64;
        Self(whole as Time + date_time.timestamp_subsec_nanos() as Time * 1e-9)
    }
}

impl FromStr for GpsTime {
    type Err = GpsTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(seconds) = s.parse::<Time>() {
            return if seconds.is_finite() {
                Ok(Self(seconds))
            } else {
                Err(GpsTimeError::Unrecognised(s.to_owned()))
            };
        }
        if let Ok(date_time) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::from_utc(date_time.with_timezone(&Utc)));
        }
        DATE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .map(|naive| Self::from_utc(naive.and_utc()))
            .ok_or_else(|| GpsTimeError::Unrecognised(s.to_owned()))
    }
}
