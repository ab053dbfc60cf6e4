//! Hardware Abstraction Traits und Fehler-Typen
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung. Der I2C-Bus und die GPIO-Ausgänge
//! selbst kommen über `embedded-hal` / `embedded-hal-async`.

use core::fmt::Debug;

use embedded_hal::digital::OutputPin;
use rgb::RGB8;
use snafu::Snafu;

/// Fehler einer einzelnen I2C-Transaktion
///
/// Wird nicht intern wiederholt, sondern immer an den Aufrufer weitergegeben.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[snafu(display("I2C transaction on register {register:#04x} failed: {error:?}"))]
pub struct BusError<E: Debug> {
    /// Register-Adresse (ohne Command-Bit)
    pub register: u8,
    /// Fehler des Transports
    pub error: E,
}

/// Fehler-Typ für Sensor-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum SensorError<E: Debug + 'static> {
    /// Transport-Fehler (Gerät fehlt, NACK, ...)
    #[snafu(context(false), display("{source}"))]
    Bus {
        /// Fehlgeschlagene Transaktion
        source: BusError<E>,
    },

    /// Gerät antwortet, ist aber kein TCS34725
    #[snafu(display("Unexpected sensor ID {found:#04x} (expected 0x44)"))]
    IdentityMismatch {
        /// Gelesener Wert im ID-Register
        found: u8,
    },
}

impl<E: Debug + 'static> SensorError<E> {
    /// `true` wenn der Sensor fehlt oder nicht passt (später erneut versuchen)
    pub fn is_identity_mismatch(&self) -> bool {
        matches!(self, SensorError::IdentityMismatch { .. })
    }
}

/// Fehler beim Binden des Treibers an den Bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum OpenError {
    /// Keine gültige 7-Bit I2C-Adresse
    #[snafu(display("{address:#04x} is not a 7-bit I2C address"))]
    InvalidAddress {
        /// Übergebene Adresse
        address: u8,
    },
}

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum LedError {
    /// Hardware-Zugriff fehlgeschlagen
    #[snafu(display("LED write failed"))]
    WriteFailed,

    /// Pin konnte nicht als Ausgang geöffnet werden
    #[snafu(display("GPIO{pin} is not available"))]
    PinUnavailable {
        /// Physische Pin-Nummer
        pin: u8,
    },

    /// LED-Index außerhalb der Bank (Programmierfehler)
    #[snafu(display("LED index {index} out of range (bank has {len} LEDs)"))]
    IndexOutOfRange {
        /// Angefragter Index
        index: usize,
        /// Anzahl LEDs in der Bank
        len: usize,
    },
}

/// Trait für GPIO-Zugriff über Pin-Nummern
///
/// Öffnet einen Pin als digitalen Ausgang. Jeder Pin kann nur einmal
/// geöffnet werden.
///
/// # Implementierungen
/// - **Production:** GpioBank (ESP32 GPIO Peripheral)
/// - **Testing:** MockPinController (in-memory Mock)
pub trait PinController {
    /// Typ des geöffneten Ausgangs
    type Pin: OutputPin;

    /// Öffnet `pin` als Ausgang
    ///
    /// Gibt `None` zurück wenn der Pin nicht existiert oder schon vergeben ist.
    fn open_output(&mut self, pin: u8) -> Option<Self::Pin>;
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf RGB LEDs (WS2812/Neopixel).
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait SmartLedWriter: Send {
    /// Schreibt eine RGB-Farbe auf die LED
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, color: RGB8) -> Result<(), LedError>;
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl<E: Debug + 'static> defmt::Format for SensorError<E> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SensorError::Bus { source } => defmt::write!(
                fmt,
                "Bus error on register {=u8:#x}: {}",
                source.register,
                defmt::Debug2Format(&source.error)
            ),
            SensorError::IdentityMismatch { found } => {
                defmt::write!(fmt, "IdentityMismatch {{ found: {=u8:#x} }}", found)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LedError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LedError::WriteFailed => defmt::write!(fmt, "WriteFailed"),
            LedError::PinUnavailable { pin } => {
                defmt::write!(fmt, "PinUnavailable {{ pin: {} }}", pin)
            }
            LedError::IndexOutOfRange { index, len } => {
                defmt::write!(fmt, "IndexOutOfRange {{ index: {}, len: {} }}", index, len)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OpenError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            OpenError::InvalidAddress { address } => {
                defmt::write!(fmt, "InvalidAddress {{ address: {=u8:#x} }}", address)
            }
        }
    }
}
