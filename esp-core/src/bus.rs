//! Register-Zugriff auf den TCS34725
//!
//! Kapselt das Command-Bit und die Byte-Reihenfolge der Kanal-Register.
//! Jede Methode ist genau eine I2C-Transaktion.

use embedded_hal_async::i2c::I2c;

use crate::registers::COMMAND_BIT;
use crate::traits::BusError;

/// Setzt zwei Register-Bytes zu einem 16-Bit Wert zusammen
///
/// Der Sensor liefert das Low-Byte zuerst.
///
/// ```
/// # use esp_core::bus::compose_word;
/// assert_eq!(compose_word(0x34, 0x12), 0x1234);
/// ```
pub const fn compose_word(low: u8, high: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

/// Adressierter Register-Bus für ein einzelnes Gerät
pub struct ColorBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> ColorBus<I2C> {
    /// Bindet den Bus an eine feste 7-Bit Adresse
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Geräte-Adresse
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Gibt den I2C-Transport zurück
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Schreibt ein Register-Byte
    pub async fn write_register(
        &mut self,
        register: u8,
        value: u8,
    ) -> Result<(), BusError<I2C::Error>> {
        self.i2c
            .write(self.address, &[register | COMMAND_BIT, value])
            .await
            .map_err(|error| BusError { register, error })
    }

    /// Liest ein Register-Byte (write-then-read in einer Transaktion)
    pub async fn read_register(&mut self, register: u8) -> Result<u8, BusError<I2C::Error>> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register | COMMAND_BIT], &mut buffer)
            .await
            .map_err(|error| BusError { register, error })?;
        Ok(buffer[0])
    }

    /// Liest zwei aufeinanderfolgende Register als 16-Bit Wert
    ///
    /// `register_low` ist das Low-Byte, das High-Byte liegt bei `register_low + 1`.
    pub async fn read_register_pair(
        &mut self,
        register_low: u8,
    ) -> Result<u16, BusError<I2C::Error>> {
        let mut buffer = [0u8; 2];
        self.i2c
            .write_read(self.address, &[register_low | COMMAND_BIT], &mut buffer)
            .await
            .map_err(|error| BusError {
                register: register_low,
                error,
            })?;
        Ok(compose_word(buffer[0], buffer[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_word_low_byte_first() {
        assert_eq!(compose_word(0x01, 0x00), 0x0001);
        assert_eq!(compose_word(0x00, 0x01), 0x0100);
        assert_eq!(compose_word(0xFF, 0xFF), 0xFFFF);
    }

    #[test]
    fn test_compose_word_swapped_bytes_differ() {
        assert_ne!(compose_word(0x12, 0x34), compose_word(0x34, 0x12));
    }
}
