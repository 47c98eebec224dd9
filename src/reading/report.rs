//! The normalized report line built from one raw record.

use std::fmt;

use super::{
    convert::{self, placeholder},
    decode, decode_prefix,
    sections::*,
    RawLine,
};

pub const HEADER: &str = "  USAF  WBAN YR--MODAHRMN DIR SPD GUS CLG SKC L M H  VSB MW MW MW MW AW AW AW AW W TEMP DEWP    SLP   ALT    STP MAX MIN PCP01 PCP06 PCP24 PCPXX SD";

const WEATHER_SLOTS: usize = 4;
const TRACE_INDICATOR: &str = "2";
const TRACE: char = 'T';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecipitationSlot {
    pub amount: String,
    pub trace: char,
}

impl Default for PrecipitationSlot {
    fn default() -> Self {
        PrecipitationSlot {
            amount: placeholder(5),
            trace: ' ',
        }
    }
}

/// Precipitation accumulated over the `AA` slots of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Precipitation {
    pub one_hour: PrecipitationSlot,
    pub six_hours: PrecipitationSlot,
    pub day: PrecipitationSlot,
    pub other: PrecipitationSlot,
}

impl Precipitation {
    /// Folds one slot into the accumulator. A sentinel amount leaves it
    /// untouched. The 1h and 6h windows flag a trace only for indicator `2`;
    /// the 24h and other windows always flag it.
    pub fn accumulate(mut self, amount: PrecipitationAmount<'_>) -> Self {
        let Some(value) = convert::precipitation(amount.depth) else {
            return self;
        };

        let (slot, flagged) = match amount.hours {
            "01" => (&mut self.one_hour, amount.trace == TRACE_INDICATOR),
            "06" => (&mut self.six_hours, amount.trace == TRACE_INDICATOR),
            "24" => (&mut self.day, true),
            _ => (&mut self.other, true),
        };
        slot.amount = value;
        if flagged {
            slot.trace = TRACE;
        }

        self
    }

    fn slots(&self) -> [&PrecipitationSlot; 4] {
        [&self.one_hour, &self.six_hours, &self.day, &self.other]
    }
}

/// One record with every column rendered, placeholders included.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedReport {
    pub id: String,
    pub wban: String,
    pub timestamp: String,
    pub direction: String,
    pub speed: String,
    pub gust: String,
    pub ceiling: String,
    pub sky_cover: String,
    pub low_cloud: String,
    pub mid_cloud: String,
    pub high_cloud: String,
    pub visibility: String,
    pub present_weather: [String; WEATHER_SLOTS],
    pub past_weather: [String; WEATHER_SLOTS],
    pub precipitation_code: String,
    pub temperature: String,
    pub dew_point: String,
    pub sea_level_pressure: String,
    pub altimeter: String,
    pub station_pressure: String,
    pub max_temperature: String,
    pub min_temperature: String,
    pub precipitation: Precipitation,
    pub snow_depth: String,
}

impl DecodedReport {
    pub fn from_line(text: &str) -> Self {
        let line = RawLine::new(text);
        let control: ControlSection = decode_prefix(&line);
        let mandatory: MandatorySection = decode_prefix(&line);

        let gust = decode::<Gust>(&line, GUST_TAG)
            .map(|g| convert::wind_speed(g.speed))
            .unwrap_or_else(|| placeholder(3));

        let (sky_cover, low_cloud, mid_cloud, high_cloud) = match decode::<SkyLayers>(&line, SKY_LAYERS_TAG) {
            Some(sky) => (
                convert::sky_cover(sky.total),
                convert::cloud_amount(sky.low),
                convert::cloud_amount(sky.mid),
                convert::cloud_amount(sky.high),
            ),
            None => (placeholder(3), placeholder(1), placeholder(1), placeholder(1)),
        };

        let precipitation_code = decode::<PrecipitationOccurrence>(&line, PRECIPITATION_OCCURRENCE_TAG)
            .map(|p| p.code.to_string())
            .unwrap_or_else(|| placeholder(1));

        let (altimeter, station_pressure) = match decode::<PressureExtras>(&line, PRESSURE_TAG) {
            Some(p) => (convert::altimeter(p.altimeter), convert::hectopascals(p.station)),
            None => (placeholder(5), placeholder(6)),
        };

        let (max_temperature, min_temperature) = match decode::<ExtremeTemperature>(&line, EXTREME_TEMPERATURE_TAG) {
            Some(k) => convert::extremes(k.code, k.temp),
            None => (placeholder(3), placeholder(3)),
        };

        let precipitation = (1..=4)
            .filter_map(|i| decode::<PrecipitationAmount>(&line, &format!("{}{}", PRECIPITATION_GROUP, i)))
            .fold(Precipitation::default(), Precipitation::accumulate);

        let snow_depth = decode::<SnowDepth>(&line, SNOW_DEPTH_TAG)
            .map(|s| convert::snow_depth(s.depth))
            .unwrap_or_else(|| placeholder(2));

        DecodedReport {
            id: control.id.to_string(),
            wban: convert::wban(control.wban),
            timestamp: [control.year, control.month, control.day, control.hour, control.minute].concat(),
            direction: convert::direction(mandatory.direction),
            speed: convert::wind_speed(mandatory.speed),
            gust,
            ceiling: convert::ceiling(mandatory.ceiling),
            sky_cover,
            low_cloud,
            mid_cloud,
            high_cloud,
            visibility: convert::visibility(mandatory.visibility),
            present_weather: weather_group(&line, PRESENT_WEATHER_GROUP),
            past_weather: weather_group(&line, PAST_WEATHER_GROUP),
            precipitation_code,
            temperature: convert::temperature(mandatory.temp_sign, mandatory.temp),
            dew_point: convert::temperature(mandatory.dewp_sign, mandatory.dewp),
            sea_level_pressure: convert::hectopascals(mandatory.sea_level_pressure),
            altimeter,
            station_pressure,
            max_temperature,
            min_temperature,
            precipitation,
            snow_depth,
        }
    }
}

/// The four codes of a weather group, sorted as strings in descending order.
fn weather_group(line: &RawLine<'_>, group: &str) -> [String; WEATHER_SLOTS] {
    let mut codes: [String; WEATHER_SLOTS] = std::array::from_fn(|i| {
        decode::<WeatherCode>(line, &format!("{}{}", group, i + 1))
            .map(|w| w.code.to_string())
            .unwrap_or_else(|| placeholder(2))
    });
    codes.sort_by(|a, b| b.cmp(a));
    codes
}

impl fmt::Display for DecodedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} ", self.id, self.wban, self.timestamp)?;

        let mut columns: Vec<&str> = vec![
            self.direction.as_str(),
            self.speed.as_str(),
            self.gust.as_str(),
            self.ceiling.as_str(),
            self.sky_cover.as_str(),
            self.low_cloud.as_str(),
            self.mid_cloud.as_str(),
            self.high_cloud.as_str(),
            self.visibility.as_str(),
        ];
        columns.extend(self.present_weather.iter().map(String::as_str));
        columns.extend(self.past_weather.iter().map(String::as_str));
        columns.extend([
            self.precipitation_code.as_str(),
            self.temperature.as_str(),
            self.dew_point.as_str(),
            self.sea_level_pressure.as_str(),
            self.altimeter.as_str(),
            self.station_pressure.as_str(),
            self.max_temperature.as_str(),
            self.min_temperature.as_str(),
        ]);
        write!(f, "{} ", columns.join(" "))?;

        for slot in self.precipitation.slots() {
            write!(f, "{}{}", slot.amount, slot.trace)?;
        }
        write!(f, "{}", self.snow_depth)
    }
}
