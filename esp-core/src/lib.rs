//! ESP Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, den TCS34725-Treiber, die LED-Bank und Pure Functions.
//! Der Hardware-Zugriff kommt generisch über `embedded-hal(-async)`.

#![no_std]

pub mod bus;
pub mod led_bank;
pub mod logic;
pub mod registers;
pub mod tcs34725;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use bus::ColorBus;
pub use led_bank::LedBank;
pub use logic::{
    DEFAULT_LED_THRESHOLD, LED_COUNT, heartbeat_pattern, indicator_color, led_pattern,
    normalize_channel,
};
pub use registers::{Gain, IntegrationTime};
pub use tcs34725::{ColorSensor, NoIllumination};
pub use traits::{BusError, LedError, OpenError, PinController, SensorError, SmartLedWriter};
pub use types::{RawChannels, SensorConfig, SensorReading, SensorState};
