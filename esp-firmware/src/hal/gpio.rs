// GPIO-Bank: Vergibt Ausgangs-Pins an die LED-Bank
//
// Implementiert esp_core::PinController für echte ESP32-C6 GPIOs.
// Jeder Pin wird genau einmal als Output herausgegeben.

use esp_core::PinController;
use esp_hal::gpio::{AnyPin, Level, Output, OutputConfig};

/// Besitzt eine feste Menge von GPIOs, adressiert über ihre Nummer
pub struct GpioBank<const N: usize> {
    slots: [(u8, Option<AnyPin<'static>>); N],
}

impl<const N: usize> GpioBank<N> {
    /// Erstellt die Bank aus (GPIO-Nummer, Pin) Paaren
    ///
    /// Die Nummern müssen zu den Peripherals passen (z.B. `(5, peripherals.GPIO5.into())`).
    pub fn new(pins: [(u8, AnyPin<'static>); N]) -> Self {
        Self {
            slots: pins.map(|(id, pin)| (id, Some(pin))),
        }
    }
}

impl<const N: usize> PinController for GpioBank<N> {
    type Pin = Output<'static>;

    fn open_output(&mut self, pin: u8) -> Option<Self::Pin> {
        let pin = self
            .slots
            .iter_mut()
            .find(|(id, _)| *id == pin)
            .and_then(|(_, slot)| slot.take())?;

        // Startpegel ist egal: LedBank::init schreibt sofort den Aus-Pegel
        Some(Output::new(pin, Level::Low, OutputConfig::default()))
    }
}
