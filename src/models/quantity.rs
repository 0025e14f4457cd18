use crate::error::{DashboardError, Result};
use crate::utils::constants::{
    PRESSURE_BOUNDS, SOIL_MOISTURE_BOUNDS, SOIL_TEMPERATURE_BOUNDS, TEMPERATURE_BOUNDS,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A measured weather quantity. Every selectable chart column is one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quantity {
    Temperature,
    Humidity,
    Pressure,
    SoilMoisture,
    SoilTemperature,
    Light,
    #[serde(rename = "PM25")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
}

impl Quantity {
    /// All quantities in table column order.
    pub const ALL: [Quantity; 8] = [
        Quantity::Temperature,
        Quantity::Humidity,
        Quantity::Pressure,
        Quantity::SoilMoisture,
        Quantity::SoilTemperature,
        Quantity::Light,
        Quantity::Pm25,
        Quantity::Pm10,
    ];

    /// Column name used in tables, dropdowns and chart titles.
    pub fn name(&self) -> &'static str {
        match self {
            Quantity::Temperature => "Temperature",
            Quantity::Humidity => "Humidity",
            Quantity::Pressure => "Pressure",
            Quantity::SoilMoisture => "SoilMoisture",
            Quantity::SoilTemperature => "SoilTemperature",
            Quantity::Light => "Light",
            Quantity::Pm25 => "PM25",
            Quantity::Pm10 => "PM10",
        }
    }

    /// Column holding this quantity in the raw sensor table.
    pub fn store_column(&self) -> &'static str {
        match self {
            Quantity::Temperature => "Temperatur",
            Quantity::Humidity => "rel_Luftfeuchte",
            Quantity::Pressure => "Luftdruck",
            Quantity::SoilMoisture => "Bodenfeuchte",
            Quantity::SoilTemperature => "Bodentemperatur",
            Quantity::Light => "Licht",
            Quantity::Pm25 => "PM25",
            Quantity::Pm10 => "PM10",
        }
    }

    /// Column names accepted for this quantity in forecast files.
    pub fn file_aliases(&self) -> &'static [&'static str] {
        match self {
            Quantity::Temperature => &["Temperature", "Temperatur"],
            Quantity::Humidity => &["Humidity", "Luftfeuchte", "rel_Luftfeuchte"],
            Quantity::Pressure => &["Pressure", "Luftdruck"],
            Quantity::SoilMoisture => &["SoilMoisture", "Bodenfeuchte"],
            Quantity::SoilTemperature => &["SoilTemperature", "Bodentemperatur"],
            Quantity::Light => &["Light", "Licht"],
            Quantity::Pm25 => &["PM25"],
            Quantity::Pm10 => &["PM10"],
        }
    }

    /// Inclusive valid range, for quantities that are clipped.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Quantity::Temperature => Some(TEMPERATURE_BOUNDS),
            Quantity::Pressure => Some(PRESSURE_BOUNDS),
            Quantity::SoilMoisture => Some(SOIL_MOISTURE_BOUNDS),
            Quantity::SoilTemperature => Some(SOIL_TEMPERATURE_BOUNDS),
            _ => None,
        }
    }

    /// Light is aggregated as a daily maximum, everything else as a mean.
    pub fn is_daily_maximum(&self) -> bool {
        matches!(self, Quantity::Light)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quantity {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Quantity::ALL
            .into_iter()
            .find(|q| q.name() == s)
            .ok_or_else(|| DashboardError::UnknownQuantity(s.to_string()))
    }
}

/// One nullable value per quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    values: [Option<f64>; 8],
}

impl Measurements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, quantity: Quantity) -> Option<f64> {
        self.values[quantity.index()]
    }

    /// Stores a value; NaN is stored as missing.
    pub fn set(&mut self, quantity: Quantity, value: Option<f64>) {
        self.values[quantity.index()] = value.filter(|v| !v.is_nan());
    }

    pub fn with(mut self, quantity: Quantity, value: f64) -> Self {
        self.set(quantity, Some(value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quantity, Option<f64>)> + '_ {
        Quantity::ALL.into_iter().map(|q| (q, self.get(q)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_parse() {
        for quantity in Quantity::ALL {
            assert_eq!(quantity.name().parse::<Quantity>().unwrap(), quantity);
        }
    }

    #[test]
    fn test_station_and_date_are_not_quantities() {
        assert!(matches!(
            "Station".parse::<Quantity>(),
            Err(DashboardError::UnknownQuantity(_))
        ));
        assert!("Date".parse::<Quantity>().is_err());
        assert!("temperature".parse::<Quantity>().is_err());
    }

    #[test]
    fn test_only_four_quantities_are_bounded() {
        let bounded: Vec<Quantity> = Quantity::ALL
            .into_iter()
            .filter(|q| q.bounds().is_some())
            .collect();
        assert_eq!(
            bounded,
            vec![
                Quantity::Temperature,
                Quantity::Pressure,
                Quantity::SoilMoisture,
                Quantity::SoilTemperature
            ]
        );
        assert_eq!(Quantity::Pressure.bounds(), Some((950.0, 1060.0)));
    }

    #[test]
    fn test_measurements_store_nan_as_missing() {
        let mut m = Measurements::new().with(Quantity::Humidity, 55.0);
        m.set(Quantity::Light, Some(f64::NAN));

        assert_eq!(m.get(Quantity::Humidity), Some(55.0));
        assert_eq!(m.get(Quantity::Light), None);
        assert!(!m.is_empty());
        assert!(Measurements::new().is_empty());
    }

    #[test]
    fn test_serde_uses_column_names() {
        let json = serde_json::to_string(&Quantity::Pm25).unwrap();
        assert_eq!(json, "\"PM25\"");
    }
}
