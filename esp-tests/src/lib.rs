//! Mocks für die Host-Tests
//!
//! Ersetzen I2C-Bus, Delay, GPIO-Pins und die SmartLED durch
//! In-Memory-Implementierungen. Alle Mocks sind `Clone` und teilen ihren
//! Zustand, damit Tests nach dem Übergeben an den Treiber noch prüfen können.

pub mod gpio;
pub mod i2c;

use esp_core::{LedError, SmartLedWriter};
use rgb::RGB8;

pub use gpio::{MockPin, MockPinController, MockPinError};
pub use i2c::{BusEvent, MockBusError, MockDelay, MockI2c};

// ============================================================================
// Mock LED Writer
// ============================================================================

#[derive(Default)]
pub struct MockLedWriter {
    pub last_color: Option<RGB8>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl MockLedWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SmartLedWriter for MockLedWriter {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_color = Some(color);
        self.write_count += 1;
        Ok(())
    }
}
