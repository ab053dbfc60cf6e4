//! Bank aus einfachen Status-LEDs an GPIO-Ausgängen
//!
//! Übersetzt logisch an/aus in den physischen Pegel, abhängig von der
//! Polarität der Beschaltung (LED gegen VCC = invertiert).

use embedded_hal::digital::{OutputPin, PinState};
use heapless::Vec;

use crate::traits::{LedError, PinController};

/// Feste Anzahl LEDs an festen Pins
///
/// `states()[i]` ist immer der zuletzt angeforderte logische Wert,
/// unabhängig von der Polarität.
pub struct LedBank<P, const N: usize> {
    pins: Vec<P, N>,
    states: [bool; N],
    inverted: bool,
}

impl<P: OutputPin, const N: usize> LedBank<P, N> {
    /// Öffnet alle Pins als Ausgang und schaltet alle LEDs aus
    ///
    /// # Parameter
    /// - `controller`: GPIO-Zugriff (Hardware oder Mock)
    /// - `pin_ids`: Physische Pin-Nummern, Index = LED-Index
    /// - `inverted`: `true` wenn die LED bei Low-Pegel leuchtet
    ///
    /// # Fehlerbehandlung
    /// `LedError::PinUnavailable` für den ersten Pin, der nicht geöffnet werden
    /// kann. Bereits geöffnete Pins werden nicht zurückgesetzt.
    pub fn init<C>(controller: &mut C, pin_ids: [u8; N], inverted: bool) -> Result<Self, LedError>
    where
        C: PinController<Pin = P>,
    {
        let mut pins = Vec::new();
        for pin in pin_ids {
            let mut output = controller
                .open_output(pin)
                .ok_or(LedError::PinUnavailable { pin })?;
            output
                .set_state(physical_level(false, inverted))
                .map_err(|_| LedError::WriteFailed)?;
            pins.push(output).map_err(|_| LedError::PinUnavailable { pin })?;
        }

        Ok(Self {
            pins,
            states: [false; N],
            inverted,
        })
    }

    /// Setzt eine LED logisch an oder aus
    pub fn set_led(&mut self, index: usize, value: bool) -> Result<(), LedError> {
        let level = physical_level(value, self.inverted);
        let pin = self
            .pins
            .get_mut(index)
            .ok_or(LedError::IndexOutOfRange { index, len: N })?;
        self.states[index] = value;
        pin.set_state(level).map_err(|_| LedError::WriteFailed)
    }

    /// Zuletzt gesetzter logischer Wert (Standard: aus)
    pub fn get_led(&self, index: usize) -> Result<bool, LedError> {
        self.states
            .get(index)
            .copied()
            .ok_or(LedError::IndexOutOfRange { index, len: N })
    }

    /// Setzt alle LEDs nach Muster, in Index-Reihenfolge
    pub fn apply(&mut self, pattern: [bool; N]) -> Result<(), LedError> {
        for (index, value) in pattern.into_iter().enumerate() {
            self.set_led(index, value)?;
        }
        Ok(())
    }

    /// Logischer Zustand aller LEDs
    pub fn states(&self) -> [bool; N] {
        self.states
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }
}

/// Physischer Pegel: `inverted ? !value : value`
pub fn physical_level(value: bool, inverted: bool) -> PinState {
    PinState::from(value != inverted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_level_normal() {
        assert_eq!(physical_level(true, false), PinState::High);
        assert_eq!(physical_level(false, false), PinState::Low);
    }

    #[test]
    fn test_physical_level_inverted() {
        assert_eq!(physical_level(true, true), PinState::Low);
        assert_eq!(physical_level(false, true), PinState::High);
    }
}
