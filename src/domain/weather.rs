// src/domain/weather.rs
//
// Weather conditions during a census.
//
// Every field may be absent. An unset field is persisted as SQL NULL and
// must never be coerced to ordinal 0 - "unset" and "the first enum value"
// are different facts.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl WindDirection {
    pub fn ordinal(self) -> i64 {
        match self {
            WindDirection::North => 0,
            WindDirection::NorthEast => 1,
            WindDirection::East => 2,
            WindDirection::SouthEast => 3,
            WindDirection::South => 4,
            WindDirection::SouthWest => 5,
            WindDirection::West => 6,
            WindDirection::NorthWest => 7,
        }
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            0 => Some(WindDirection::North),
            1 => Some(WindDirection::NorthEast),
            2 => Some(WindDirection::East),
            3 => Some(WindDirection::SouthEast),
            4 => Some(WindDirection::South),
            5 => Some(WindDirection::SouthWest),
            6 => Some(WindDirection::West),
            7 => Some(WindDirection::NorthWest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precipitation {
    None,
    Drizzle,
    Rain,
}

impl Precipitation {
    pub fn ordinal(self) -> i64 {
        match self {
            Precipitation::None => 0,
            Precipitation::Drizzle => 1,
            Precipitation::Rain => 2,
        }
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            0 => Some(Precipitation::None),
            1 => Some(Precipitation::Drizzle),
            2 => Some(Precipitation::Rain),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Clear,
    Misty,
    Foggy,
}

impl Visibility {
    pub fn ordinal(self) -> i64 {
        match self {
            Visibility::Clear => 0,
            Visibility::Misty => 1,
            Visibility::Foggy => 2,
        }
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            0 => Some(Visibility::Clear),
            1 => Some(Visibility::Misty),
            2 => Some(Visibility::Foggy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlaciationLevel {
    None,
    RiparianZone,
    Complete,
}

impl GlaciationLevel {
    pub fn ordinal(self) -> i64 {
        match self {
            GlaciationLevel::None => 0,
            GlaciationLevel::RiparianZone => 1,
            GlaciationLevel::Complete => 2,
        }
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            0 => Some(GlaciationLevel::None),
            1 => Some(GlaciationLevel::RiparianZone),
            2 => Some(GlaciationLevel::Complete),
            _ => None,
        }
    }
}

/// Information about the weather during a bird count.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeatherData {
    pub water_gauge: Option<f64>,
    pub wind_strength: Option<u8>,
    pub wind_direction: Option<WindDirection>,
    pub precipitation: Option<Precipitation>,
    pub visibility: Option<Visibility>,
    pub glaciation_level: Option<GlaciationLevel>,
}

impl WeatherData {
    pub fn new(
        water_gauge: Option<f64>,
        wind_strength: Option<u8>,
        wind_direction: Option<WindDirection>,
        precipitation: Option<Precipitation>,
        visibility: Option<Visibility>,
        glaciation_level: Option<GlaciationLevel>,
    ) -> Self {
        Self {
            water_gauge,
            wind_strength,
            wind_direction,
            precipitation,
            visibility,
            glaciation_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_round_trip() {
        for direction in [
            WindDirection::North,
            WindDirection::SouthWest,
            WindDirection::NorthWest,
        ] {
            assert_eq!(WindDirection::from_ordinal(direction.ordinal()), Some(direction));
        }
        assert_eq!(Precipitation::from_ordinal(Precipitation::Rain.ordinal()), Some(Precipitation::Rain));
        assert_eq!(Visibility::from_ordinal(Visibility::Foggy.ordinal()), Some(Visibility::Foggy));
        assert_eq!(
            GlaciationLevel::from_ordinal(GlaciationLevel::RiparianZone.ordinal()),
            Some(GlaciationLevel::RiparianZone)
        );
    }

    #[test]
    fn out_of_range_ordinals_are_rejected() {
        assert_eq!(WindDirection::from_ordinal(8), None);
        assert_eq!(Precipitation::from_ordinal(-1), None);
        assert_eq!(Visibility::from_ordinal(3), None);
        assert_eq!(GlaciationLevel::from_ordinal(42), None);
    }

    #[test]
    fn default_weather_has_every_field_unset() {
        let weather = WeatherData::default();
        assert!(weather.water_gauge.is_none());
        assert!(weather.wind_strength.is_none());
        assert!(weather.wind_direction.is_none());
        assert!(weather.precipitation.is_none());
        assert!(weather.visibility.is_none());
        assert!(weather.glaciation_level.is_none());
    }
}
