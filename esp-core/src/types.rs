//! Core Types für Farbsensor und LED-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use rgb::RGB8;

use crate::logic::normalize_channel;
use crate::registers::{Gain, IntegrationTime};

/// Rohwerte aller vier Kanäle aus einem Messzyklus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawChannels {
    pub clear: u16,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl RawChannels {
    /// Normalisiert Rot/Grün/Blau auf 0-255 relativ zum Clear-Kanal
    ///
    /// Clear = 0 ergibt Schwarz.
    ///
    /// ```
    /// # use esp_core::RawChannels;
    /// # use rgb::RGB8;
    /// let raw = RawChannels { clear: 100, red: 50, green: 25, blue: 10 };
    /// assert_eq!(raw.normalize(), RGB8 { r: 127, g: 63, b: 25 });
    /// ```
    pub fn normalize(&self) -> RGB8 {
        RGB8 {
            r: normalize_channel(self.red, self.clear),
            g: normalize_channel(self.green, self.clear),
            b: normalize_channel(self.blue, self.clear),
        }
    }
}

/// Sensor-Konfiguration, wird bei jeder Änderung und bei Re-Init gesendet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorConfig {
    pub integration_time: IntegrationTime,
    pub gain: Gain,
}

/// Zustand des Sensor-Treibers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorState {
    /// Noch nicht mit dem Gerät gesprochen (oder ID-Prüfung fehlgeschlagen)
    #[default]
    Uninitialized,
    /// ID geprüft, Konfiguration wird übertragen
    Verifying,
    /// Betriebsbereit
    Ready { enabled: bool },
}

/// Eine Messung für Channel-Kommunikation
///
/// Wird vom Sensor-Task an den Telemetrie-Task gesendet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReading {
    pub raw: RawChannels,
    pub rgb: RGB8,
}

impl SensorReading {
    /// Erstellt eine Messung aus Rohwerten (normalisiert sofort)
    pub fn from_raw(raw: RawChannels) -> Self {
        Self {
            raw,
            rgb: raw.normalize(),
        }
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for RawChannels {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "RawChannels {{ c: {}, r: {}, g: {}, b: {} }}",
            self.clear,
            self.red,
            self.green,
            self.blue
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorConfig {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "SensorConfig {{ atime: {}, gain: {} }}",
            self.integration_time,
            self.gain
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SensorState::Uninitialized => defmt::write!(fmt, "Uninitialized"),
            SensorState::Verifying => defmt::write!(fmt, "Verifying"),
            SensorState::Ready { enabled } => {
                defmt::write!(fmt, "Ready {{ enabled: {} }}", enabled)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorReading {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "SensorReading {{ rgb: ({}, {}, {}), clear: {} }}",
            self.rgb.r,
            self.rgb.g,
            self.rgb.b,
            self.raw.clear
        )
    }
}
