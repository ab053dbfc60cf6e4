//! Simulierter TCS34725 am I2C-Bus
//!
//! Hält 256 Register, wertet das Command-Bit aus und protokolliert jede
//! Transaktion. Delays landen im selben Protokoll, damit die Reihenfolge
//! von Schreibzugriffen und Wartezeit geprüft werden kann.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorType, I2c, Operation};
use esp_core::registers::{COMMAND_BIT, EXPECTED_ID, ID};

const NANOS_PER_MICRO: u32 = 1_000;
const NANOS_PER_MILLI: u32 = 1_000_000;

/// Transport-Fehler des Mocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBusError {
    Nack,
}

impl embedded_hal::i2c::Error for MockBusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
    }
}

/// Ein Eintrag im Bus-Protokoll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// Reiner Schreibzugriff (Bytes wie auf dem Draht)
    Write { address: u8, bytes: Vec<u8> },
    /// Write-then-read in einer Transaktion
    WriteRead {
        address: u8,
        bytes: Vec<u8>,
        read: Vec<u8>,
    },
    /// Wartezeit in Nanosekunden
    Delay { ns: u32 },
}

#[derive(Debug)]
struct BusState {
    registers: [u8; 256],
    events: Vec<BusEvent>,
    absent: bool,
    fail_register: Option<u8>,
    fail_count: usize,
}

/// Simulierter Sensor
#[derive(Clone)]
pub struct MockI2c {
    state: Rc<RefCell<BusState>>,
}

impl Default for MockI2c {
    fn default() -> Self {
        Self::new()
    }
}

impl MockI2c {
    /// Sensor mit korrekter ID (0x44), alle anderen Register 0
    pub fn new() -> Self {
        let mut registers = [0u8; 256];
        registers[ID as usize] = EXPECTED_ID;
        Self {
            state: Rc::new(RefCell::new(BusState {
                registers,
                events: Vec::new(),
                absent: false,
                fail_register: None,
                fail_count: 0,
            })),
        }
    }

    /// Sensor mit beliebigem Wert im ID-Register
    pub fn with_id(id: u8) -> Self {
        let mock = Self::new();
        mock.set_register(ID, id);
        mock
    }

    /// Kein Gerät am Bus: jede Transaktion endet mit NACK
    pub fn absent() -> Self {
        let mock = Self::new();
        mock.set_absent(true);
        mock
    }

    pub fn set_absent(&self, absent: bool) {
        self.state.borrow_mut().absent = absent;
    }

    /// Transaktionen auf `register` schlagen fehl
    pub fn fail_on_register(&self, register: Option<u8>) {
        self.state.borrow_mut().fail_register = register;
    }

    pub fn set_register(&self, register: u8, value: u8) {
        self.state.borrow_mut().registers[register as usize] = value;
    }

    pub fn register(&self, register: u8) -> u8 {
        self.state.borrow().registers[register as usize]
    }

    /// Setzt ein 16-Bit Kanal-Register (Low-Byte zuerst)
    pub fn set_channel(&self, register_low: u8, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.set_register(register_low, low);
        self.set_register(register_low + 1, high);
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    /// Alle reinen Schreibzugriffe als (Register-Byte auf dem Draht, Wert)
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BusEvent::Write { bytes, .. } if bytes.len() == 2 => Some((bytes[0], bytes[1])),
                _ => None,
            })
            .collect()
    }

    /// Anzahl fehlgeschlagener Transaktionen
    pub fn fail_count(&self) -> usize {
        self.state.borrow().fail_count
    }

    /// Passender Delay, der ins gleiche Protokoll schreibt
    pub fn delay(&self) -> MockDelay {
        MockDelay {
            state: Rc::clone(&self.state),
        }
    }
}

impl ErrorType for MockI2c {
    type Error = MockBusError;
}

impl I2c for MockI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        let first_register = operations.iter().find_map(|op| match op {
            Operation::Write(bytes) => bytes.first().map(|b| b & !COMMAND_BIT),
            Operation::Read(_) => None,
        });
        if state.absent || (first_register.is_some() && first_register == state.fail_register) {
            state.fail_count += 1;
            return Err(MockBusError::Nack);
        }

        let mut pointer: u8 = 0;
        let mut written = Vec::new();
        let mut read = Vec::new();
        let mut has_read = false;

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    written.extend_from_slice(&bytes[..]);
                    if let Some((command, data)) = bytes.split_first() {
                        pointer = command & !COMMAND_BIT;
                        for value in data {
                            state.registers[pointer as usize] = *value;
                            pointer = pointer.wrapping_add(1);
                        }
                    }
                }
                Operation::Read(buffer) => {
                    has_read = true;
                    for slot in buffer.iter_mut() {
                        *slot = state.registers[pointer as usize];
                        pointer = pointer.wrapping_add(1);
                    }
                    read.extend_from_slice(&buffer[..]);
                }
            }
        }

        let event = if has_read {
            BusEvent::WriteRead {
                address,
                bytes: written,
                read,
            }
        } else {
            BusEvent::Write {
                address,
                bytes: written,
            }
        };
        state.events.push(event);
        Ok(())
    }
}

/// Delay ohne echte Wartezeit, protokolliert nur
#[derive(Clone)]
pub struct MockDelay {
    state: Rc<RefCell<BusState>>,
}

impl MockDelay {
    fn record(&mut self, ns: u32) {
        self.state.borrow_mut().events.push(BusEvent::Delay { ns });
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(ns);
    }

    async fn delay_us(&mut self, us: u32) {
        self.record(us.saturating_mul(NANOS_PER_MICRO));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(ms.saturating_mul(NANOS_PER_MILLI));
    }
}
