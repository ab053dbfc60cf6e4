//! GPIO-Mocks: Pin-Controller und Ausgangs-Pins
//!
//! Jeder geöffnete Pin schreibt seine Pegel in eine gemeinsame Historie,
//! die über den Controller abgefragt werden kann.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, PinState};
use esp_core::PinController;

/// Schreibfehler eines Mock-Pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl embedded_hal::digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Default)]
struct PinRecord {
    history: Vec<PinState>,
    fail_writes: bool,
}

type SharedPins = Rc<RefCell<BTreeMap<u8, PinRecord>>>;

/// Ein geöffneter Ausgang
pub struct MockPin {
    id: u8,
    pins: SharedPins,
}

impl MockPin {
    pub fn id(&self) -> u8 {
        self.id
    }

    fn write(&mut self, level: PinState) -> Result<(), MockPinError> {
        let mut pins = self.pins.borrow_mut();
        let record = pins.entry(self.id).or_default();
        if record.fail_writes {
            return Err(MockPinError);
        }
        record.history.push(level);
        Ok(())
    }
}

impl ErrorType for MockPin {
    type Error = MockPinError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::High)
    }
}

/// Pin-Controller mit fester Liste verfügbarer Pins
///
/// Jeder Pin kann genau einmal geöffnet werden.
#[derive(Clone)]
pub struct MockPinController {
    available: Vec<u8>,
    opened: Rc<RefCell<Vec<u8>>>,
    pins: SharedPins,
}

impl MockPinController {
    pub fn new(available: &[u8]) -> Self {
        Self {
            available: available.to_vec(),
            opened: Rc::new(RefCell::new(Vec::new())),
            pins: Rc::new(RefCell::new(BTreeMap::new())),
        }
    }

    /// Aktueller physischer Pegel (None wenn nie geschrieben)
    pub fn level(&self, pin: u8) -> Option<PinState> {
        self.pins
            .borrow()
            .get(&pin)
            .and_then(|record| record.history.last().copied())
    }

    /// Alle geschriebenen Pegel eines Pins
    pub fn history(&self, pin: u8) -> Vec<PinState> {
        self.pins
            .borrow()
            .get(&pin)
            .map(|record| record.history.clone())
            .unwrap_or_default()
    }

    /// Bisher geöffnete Pins, in Reihenfolge
    pub fn opened(&self) -> Vec<u8> {
        self.opened.borrow().clone()
    }

    /// Schreibzugriffe auf `pin` schlagen ab jetzt fehl
    pub fn fail_writes(&self, pin: u8, fail: bool) {
        self.pins.borrow_mut().entry(pin).or_default().fail_writes = fail;
    }
}

impl PinController for MockPinController {
    type Pin = MockPin;

    fn open_output(&mut self, pin: u8) -> Option<MockPin> {
        if !self.available.contains(&pin) || self.opened.borrow().contains(&pin) {
            return None;
        }
        self.opened.borrow_mut().push(pin);
        Some(MockPin {
            id: pin,
            pins: Rc::clone(&self.pins),
        })
    }
}
