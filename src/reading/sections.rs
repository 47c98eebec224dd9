//! Field layouts of the mandatory prefix and of each tagged sub-record.
//!
//! Offsets of tagged sub-records are relative to the start of their tag.

use super::layout::{field, FieldSpec, Fields};

pub const GUST_TAG: &str = "OC1";
pub const SKY_LAYERS_TAG: &str = "GF1";
pub const PRESENT_WEATHER_GROUP: &str = "MW";
pub const PAST_WEATHER_GROUP: &str = "AW";
pub const PRECIPITATION_OCCURRENCE_TAG: &str = "AY1";
pub const PRESSURE_TAG: &str = "MA1";
pub const EXTREME_TEMPERATURE_TAG: &str = "KA1";
pub const PRECIPITATION_GROUP: &str = "AA";
pub const SNOW_DEPTH_TAG: &str = "AJ1";

/// A fixed-width region decoded into a plain structure of raw tokens.
pub trait Section<'a>: Sized {
    /// Window length, counted from the tag for tagged sub-records.
    const LENGTH: usize;
    const LAYOUT: &'static [FieldSpec];

    fn from_fields(fields: &Fields<'a>) -> Self;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlSection<'a> {
    pub id: &'a str,
    pub wban: &'a str,
    pub year: &'a str,
    pub month: &'a str,
    pub day: &'a str,
    pub hour: &'a str,
    pub minute: &'a str,
}

impl<'a> Section<'a> for ControlSection<'a> {
    const LENGTH: usize = 60;
    const LAYOUT: &'static [FieldSpec] = &[
        field("id", 4, 10),
        field("wban", 10, 15),
        field("year", 15, 19),
        field("month", 19, 21),
        field("day", 21, 23),
        field("hour", 23, 25),
        field("minute", 25, 27),
    ];

    fn from_fields(f: &Fields<'a>) -> Self {
        ControlSection {
            id: f.get("id"),
            wban: f.get("wban"),
            year: f.get("year"),
            month: f.get("month"),
            day: f.get("day"),
            hour: f.get("hour"),
            minute: f.get("minute"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MandatorySection<'a> {
    pub direction: &'a str,
    pub speed: &'a str,
    pub ceiling: &'a str,
    pub visibility: &'a str,
    pub temp_sign: &'a str,
    pub temp: &'a str,
    pub dewp_sign: &'a str,
    pub dewp: &'a str,
    pub sea_level_pressure: &'a str,
}

impl<'a> Section<'a> for MandatorySection<'a> {
    const LENGTH: usize = 105;
    const LAYOUT: &'static [FieldSpec] = &[
        field("dir", 60, 63),
        field("spd", 65, 69),
        field("clg", 70, 75),
        field("vsb", 78, 84),
        field("temp_sign", 87, 88),
        field("temp", 88, 92),
        field("dewp_sign", 93, 94),
        field("dewp", 94, 98),
        field("slp", 99, 104),
    ];

    fn from_fields(f: &Fields<'a>) -> Self {
        MandatorySection {
            direction: f.get("dir"),
            speed: f.get("spd"),
            ceiling: f.get("clg"),
            visibility: f.get("vsb"),
            temp_sign: f.get("temp_sign"),
            temp: f.get("temp"),
            dewp_sign: f.get("dewp_sign"),
            dewp: f.get("dewp"),
            sea_level_pressure: f.get("slp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gust<'a> {
    pub speed: &'a str,
}

impl<'a> Section<'a> for Gust<'a> {
    const LENGTH: usize = 8;
    const LAYOUT: &'static [FieldSpec] = &[field("gus", 3, 7)];

    fn from_fields(f: &Fields<'a>) -> Self {
        Gust { speed: f.get("gus") }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkyLayers<'a> {
    pub total: &'a str,
    pub low: &'a str,
    pub mid: &'a str,
    pub high: &'a str,
}

impl<'a> Section<'a> for SkyLayers<'a> {
    const LENGTH: usize = 26;
    const LAYOUT: &'static [FieldSpec] = &[
        field("skc", 3, 5),
        field("low", 11, 13),
        field("med", 20, 22),
        field("hi", 23, 25),
    ];

    fn from_fields(f: &Fields<'a>) -> Self {
        SkyLayers {
            total: f.get("skc"),
            low: f.get("low"),
            mid: f.get("med"),
            high: f.get("hi"),
        }
    }
}

/// One present (`MW1`..`MW4`) or past (`AW1`..`AW4`) weather slot.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCode<'a> {
    pub code: &'a str,
}

impl<'a> Section<'a> for WeatherCode<'a> {
    const LENGTH: usize = 6;
    const LAYOUT: &'static [FieldSpec] = &[field("code", 3, 5)];

    fn from_fields(f: &Fields<'a>) -> Self {
        WeatherCode { code: f.get("code") }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationOccurrence<'a> {
    pub code: &'a str,
}

impl<'a> Section<'a> for PrecipitationOccurrence<'a> {
    const LENGTH: usize = 8;
    const LAYOUT: &'static [FieldSpec] = &[field("pw", 3, 4)];

    fn from_fields(f: &Fields<'a>) -> Self {
        PrecipitationOccurrence { code: f.get("pw") }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PressureExtras<'a> {
    pub altimeter: &'a str,
    pub station: &'a str,
}

impl<'a> Section<'a> for PressureExtras<'a> {
    const LENGTH: usize = 15;
    const LAYOUT: &'static [FieldSpec] = &[field("alt", 3, 8), field("stp", 9, 14)];

    fn from_fields(f: &Fields<'a>) -> Self {
        PressureExtras {
            altimeter: f.get("alt"),
            station: f.get("stp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtremeTemperature<'a> {
    pub code: &'a str,
    pub temp: &'a str,
}

impl<'a> Section<'a> for ExtremeTemperature<'a> {
    const LENGTH: usize = 13;
    const LAYOUT: &'static [FieldSpec] = &[field("code", 6, 7), field("temp", 7, 12)];

    fn from_fields(f: &Fields<'a>) -> Self {
        ExtremeTemperature {
            code: f.get("code"),
            temp: f.get("temp"),
        }
    }
}

/// One liquid precipitation slot (`AA1`..`AA4`).
#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationAmount<'a> {
    pub hours: &'a str,
    pub depth: &'a str,
    pub trace: &'a str,
}

impl<'a> Section<'a> for PrecipitationAmount<'a> {
    const LENGTH: usize = 11;
    const LAYOUT: &'static [FieldSpec] = &[
        field("hours", 3, 5),
        field("pcp", 5, 9),
        field("trace", 9, 10),
    ];

    fn from_fields(f: &Fields<'a>) -> Self {
        PrecipitationAmount {
            hours: f.get("hours"),
            depth: f.get("pcp"),
            trace: f.get("trace"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnowDepth<'a> {
    pub depth: &'a str,
}

impl<'a> Section<'a> for SnowDepth<'a> {
    const LENGTH: usize = 17;
    const LAYOUT: &'static [FieldSpec] = &[field("sd", 3, 7)];

    fn from_fields(f: &Fields<'a>) -> Self {
        SnowDepth { depth: f.get("sd") }
    }
}
