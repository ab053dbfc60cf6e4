// JSON-Payload einer Messung: {"r":..,"g":..,"b":..,"clear":..}

use esp_core::SensorReading;
use serde::Serialize;

/// r/g/b sind normalisiert (0-255), clear ist der Rohwert des Clear-Kanals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RgbPayload {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub clear: u16,
}

impl From<&SensorReading> for RgbPayload {
    fn from(reading: &SensorReading) -> Self {
        Self {
            r: reading.rgb.r,
            g: reading.rgb.g,
            b: reading.rgb.b,
            clear: reading.raw.clear,
        }
    }
}

impl RgbPayload {
    /// Serialisiert in `buffer`, gibt die Anzahl geschriebener Bytes zurück
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, serde_json_core::ser::Error> {
        serde_json_core::to_slice(self, buffer)
    }
}
