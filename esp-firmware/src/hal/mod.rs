// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul bindet die esp-hal Peripherals an die Traits aus esp-core,
// damit die Logik in esp-core/esp-tests ohne Hardware testbar bleibt.

pub mod gpio;
pub mod led_writer;

pub use gpio::GpioBank;
pub use led_writer::RmtLedWriter;
