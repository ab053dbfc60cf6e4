//! TCS34725 Register-Map
//!
//! Adressen und Codes laut Datenblatt (ams TCS3472).
//! Alle Werte sind bit-genau und dürfen nicht verändert werden.

use bitflags::bitflags;

/// Feste 7-Bit I2C-Adresse des TCS34725
pub const SENSOR_ADDRESS: u8 = 0x29;

/// Muss mit jeder Register-Adresse ver-ODER-t werden
pub const COMMAND_BIT: u8 = 0x80;

/// Power-/ADC-Enable Register
pub const ENABLE: u8 = 0x00;
/// Power-On Bit: aktiviert den internen Oszillator
pub const ENABLE_PON: u8 = 0x01;
/// RGBC Enable Bit: aktiviert den ADC
pub const ENABLE_AEN: u8 = 0x02;

/// Integrationszeit
pub const ATIME: u8 = 0x01;
/// Gain
pub const CONTROL: u8 = 0x0F;

/// Identitäts-Register
pub const ID: u8 = 0x12;
/// Erwarteter Wert im ID-Register (TCS34721/TCS34725)
pub const EXPECTED_ID: u8 = 0x44;

/// Clear-Kanal, Low-Byte (High-Byte bei +1)
pub const CDATAL: u8 = 0x14;
/// Rot-Kanal, Low-Byte
pub const RDATAL: u8 = 0x16;
/// Grün-Kanal, Low-Byte
pub const GDATAL: u8 = 0x18;
/// Blau-Kanal, Low-Byte
pub const BDATAL: u8 = 0x1A;

/// Wartezeit zwischen PON und AEN in Millisekunden
///
/// Hardware-Vorgabe: nach dem Einschalten braucht der Oszillator
/// mindestens 2.4 ms bevor der ADC zuverlässig aktiviert werden kann.
pub const POWER_ON_SETTLE_MS: u32 = 3;

bitflags! {
    /// Bits im ENABLE-Register, die der Treiber verwaltet
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EnableFlags: u8 {
        /// Power On
        const PON = ENABLE_PON;
        /// RGBC ADC Enable
        const AEN = ENABLE_AEN;
    }
}

impl EnableFlags {
    /// Maske zum Abschalten: löscht PON und AEN, alle anderen Bits bleiben erhalten
    pub const fn power_down(current: u8) -> u8 {
        current & !Self::all().bits()
    }
}

/// Integrationszeit des ADC (Codes für das ATIME-Register)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum IntegrationTime {
    /// 2.4 ms - 1 Zyklus
    Ms2_4 = 0xFF,
    /// 24 ms - 10 Zyklen
    Ms24 = 0xF6,
    /// 50 ms - 20 Zyklen
    Ms50 = 0xEB,
    /// 101 ms - 42 Zyklen
    Ms101 = 0xD5,
    /// 154 ms - 64 Zyklen
    Ms154 = 0xC0,
    /// 700 ms - 256 Zyklen
    #[default]
    Ms700 = 0x00,
}

impl IntegrationTime {
    /// Alle Integrationszeiten, aufsteigend
    pub const ALL: [IntegrationTime; 6] = [
        IntegrationTime::Ms2_4,
        IntegrationTime::Ms24,
        IntegrationTime::Ms50,
        IntegrationTime::Ms101,
        IntegrationTime::Ms154,
        IntegrationTime::Ms700,
    ];

    /// Register-Code für ATIME
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Anzahl der 2.4 ms Integrationszyklen
    pub const fn cycles(self) -> u16 {
        match self {
            IntegrationTime::Ms2_4 => 1,
            IntegrationTime::Ms24 => 10,
            IntegrationTime::Ms50 => 20,
            IntegrationTime::Ms101 => 42,
            IntegrationTime::Ms154 => 64,
            IntegrationTime::Ms700 => 256,
        }
    }

    /// Maximaler Zählerstand eines Kanals bei dieser Integrationszeit
    ///
    /// 1024 pro Zyklus, gesättigt bei 65535 (16-Bit Kanal).
    pub const fn max_count(self) -> u16 {
        let count = self.cycles() as u32 * 1024;
        if count > u16::MAX as u32 {
            u16::MAX
        } else {
            count as u16
        }
    }
}

/// Analoge Verstärkung (Codes für das CONTROL-Register)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Gain {
    /// Keine Verstärkung
    X1 = 0x00,
    /// 4-fach
    X4 = 0x01,
    /// 16-fach
    #[default]
    X16 = 0x02,
    /// 60-fach
    X60 = 0x03,
}

impl Gain {
    /// Register-Code für CONTROL
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Verstärkungsfaktor
    pub const fn factor(self) -> u8 {
        match self {
            Gain::X1 => 1,
            Gain::X4 => 4,
            Gain::X16 => 16,
            Gain::X60 => 60,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IntegrationTime {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            IntegrationTime::Ms2_4 => defmt::write!(fmt, "2.4ms"),
            IntegrationTime::Ms24 => defmt::write!(fmt, "24ms"),
            IntegrationTime::Ms50 => defmt::write!(fmt, "50ms"),
            IntegrationTime::Ms101 => defmt::write!(fmt, "101ms"),
            IntegrationTime::Ms154 => defmt::write!(fmt, "154ms"),
            IntegrationTime::Ms700 => defmt::write!(fmt, "700ms"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Gain {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}x", self.factor())
    }
}
