//! TCS34725 Farbsensor-Treiber
//!
//! Zustandsmaschine `Uninitialized → Verifying → Ready { enabled }`.
//! Jede öffentliche Operation prüft zuerst den Zustand und initialisiert
//! den Sensor bei Bedarf (ID-Prüfung, Konfiguration, Einschalten).
//!
//! Alle Register-Zugriffe werden in der aufrufenden Operation der Reihe
//! nach abgeschlossen - eine Gain-Änderung ist also garantiert übertragen,
//! bevor die nächste Messung gelesen wird.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use rgb::RGB8;

use crate::bus::ColorBus;
use crate::registers::{
    ATIME, BDATAL, CDATAL, CONTROL, ENABLE, EXPECTED_ID, EnableFlags, GDATAL, Gain, ID,
    IntegrationTime, POWER_ON_SETTLE_MS, RDATAL, SENSOR_ADDRESS,
};
use crate::traits::{BusError, LedError, OpenError, SensorError};
use crate::types::{RawChannels, SensorConfig, SensorState};

/// Höchste gültige 7-Bit I2C-Adresse
const MAX_I2C_ADDRESS: u8 = 0x7F;

/// Treiber für den TCS34725 RGB-Farbsensor
///
/// # Trait-basierte Abstraktion
/// - `I2C: embedded_hal_async::i2c::I2c` - ESP32 I2C im Async-Modus oder Mock
/// - `D: embedded_hal_async::delay::DelayNs` - `embassy_time::Delay` oder Mock
///
/// - `L: embedded_hal::digital::OutputPin` - optionaler Steuer-Pin der
///   Beleuchtungs-LED auf dem Breakout (`NoIllumination` wenn nicht verdrahtet)
///
/// Das Binden an den Bus spricht noch nicht mit dem Gerät. Ein fehlender
/// Sensor fällt erst bei der ersten Operation auf.
pub struct ColorSensor<I2C, D, L = NoIllumination> {
    bus: ColorBus<I2C>,
    delay: D,
    config: SensorConfig,
    state: SensorState,
    illumination_pin: Option<L>,
    illumination: bool,
}

/// Platzhalter für einen Sensor ohne verdrahteten LED-Steuer-Pin
///
/// Unbewohnt: `Option<NoIllumination>` ist immer `None`.
pub enum NoIllumination {}

impl ErrorType for NoIllumination {
    type Error = Infallible;
}

impl OutputPin for NoIllumination {
    fn set_low(&mut self) -> Result<(), Infallible> {
        match *self {}
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        match *self {}
    }
}

impl<I2C, D> ColorSensor<I2C, D>
where
    I2C: I2c,
    I2C::Error: 'static,
    D: DelayNs,
{
    /// Bindet den Treiber an die Standard-Adresse 0x29
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::bind(i2c, SENSOR_ADDRESS, delay)
    }

    /// Bindet den Treiber an eine explizite Adresse
    ///
    /// # Fehlerbehandlung
    /// Gibt `OpenError::InvalidAddress` zurück wenn `address` keine 7-Bit Adresse ist
    pub fn open(address: u8, i2c: I2C, delay: D) -> Result<Self, OpenError> {
        if address > MAX_I2C_ADDRESS {
            return Err(OpenError::InvalidAddress { address });
        }
        Ok(Self::bind(i2c, address, delay))
    }

    fn bind(i2c: I2C, address: u8, delay: D) -> Self {
        Self {
            bus: ColorBus::new(i2c, address),
            delay,
            config: SensorConfig::default(),
            state: SensorState::Uninitialized,
            illumination_pin: None,
            illumination: true,
        }
    }

    /// Übernimmt den Steuer-Pin der Beleuchtungs-LED
    ///
    /// Der Pin wird dabei nicht geschrieben: das Breakout zieht ihn selbst
    /// auf High, die LED ist also ab Werk an.
    pub fn with_illumination<P: OutputPin>(self, pin: P) -> ColorSensor<I2C, D, P> {
        ColorSensor {
            bus: self.bus,
            delay: self.delay,
            config: self.config,
            state: self.state,
            illumination_pin: Some(pin),
            illumination: self.illumination,
        }
    }
}

impl<I2C, D, L> ColorSensor<I2C, D, L>
where
    I2C: I2c,
    I2C::Error: 'static,
    D: DelayNs,
    L: OutputPin,
{
    /// Aktueller Zustand der Zustandsmaschine
    pub fn state(&self) -> SensorState {
        self.state
    }

    /// Aktuelle Konfiguration (wird bei Re-Init erneut gesendet)
    pub fn config(&self) -> SensorConfig {
        self.config
    }

    /// `true` wenn der Sensor initialisiert und eingeschaltet ist
    pub fn is_enabled(&self) -> bool {
        matches!(self.state, SensorState::Ready { enabled: true })
    }

    /// Geräte-Adresse
    pub fn address(&self) -> u8 {
        self.bus.address()
    }

    /// Zustand der Beleuchtungs-LED (`true` = an)
    pub fn illumination(&self) -> bool {
        self.illumination
    }

    /// Schaltet die Beleuchtungs-LED (High = an)
    ///
    /// Ohne Steuer-Pin bleibt der gemeldete Zustand unverändert.
    ///
    /// # Fehlerbehandlung
    /// `LedError::WriteFailed` wenn der Pin den Pegel nicht annimmt;
    /// der gemeldete Zustand bleibt dann ebenfalls der alte.
    pub fn set_illumination(&mut self, on: bool) -> Result<(), LedError> {
        let Some(pin) = self.illumination_pin.as_mut() else {
            return Ok(());
        };
        pin.set_state(on.into()).map_err(|_| LedError::WriteFailed)?;
        self.illumination = on;
        Ok(())
    }

    /// Gibt I2C-Transport und Delay zurück (ein LED-Pin wird verworfen)
    pub fn release(self) -> (I2C, D) {
        (self.bus.release(), self.delay)
    }

    /// Initialisiert den Sensor falls noch nicht geschehen
    ///
    /// Wird von jeder Operation automatisch aufgerufen. Kann explizit
    /// genutzt werden um die Anwesenheit des Sensors zu prüfen - nach
    /// `IdentityMismatch` ist ein erneuter Aufruf ein neuer Versuch.
    pub async fn begin(&mut self) -> Result<(), SensorError<I2C::Error>> {
        if self.state == SensorState::Uninitialized {
            self.start().await?;
        }
        Ok(())
    }

    /// Schaltet Oszillator und ADC ein
    ///
    /// Zwischen PON und AEN liegt die vorgeschriebene Wartezeit von 3 ms.
    pub async fn enable(&mut self) -> Result<(), SensorError<I2C::Error>> {
        self.begin().await?;
        self.power_on().await?;
        self.state = SensorState::Ready { enabled: true };
        Ok(())
    }

    /// Schaltet Oszillator und ADC aus
    ///
    /// Read-Modify-Write: nur PON und AEN werden gelöscht, alle anderen
    /// Bits im ENABLE-Register bleiben unverändert.
    pub async fn disable(&mut self) -> Result<(), SensorError<I2C::Error>> {
        self.begin().await?;
        let current = self.bus.read_register(ENABLE).await?;
        self.bus
            .write_register(ENABLE, EnableFlags::power_down(current))
            .await?;
        self.state = SensorState::Ready { enabled: false };
        Ok(())
    }

    /// Setzt die Integrationszeit und überträgt sie sofort
    pub async fn set_integration_time(
        &mut self,
        integration_time: IntegrationTime,
    ) -> Result<(), SensorError<I2C::Error>> {
        self.config.integration_time = integration_time;
        self.begin().await?;
        self.bus
            .write_register(ATIME, integration_time.code())
            .await?;
        Ok(())
    }

    /// Setzt den Gain und überträgt ihn sofort
    pub async fn set_gain(&mut self, gain: Gain) -> Result<(), SensorError<I2C::Error>> {
        self.config.gain = gain;
        self.begin().await?;
        self.bus.write_register(CONTROL, gain.code()).await?;
        Ok(())
    }

    /// Liest alle vier Kanäle (Clear zuerst)
    pub async fn read_raw(&mut self) -> Result<RawChannels, SensorError<I2C::Error>> {
        self.begin().await?;
        let clear = self.bus.read_register_pair(CDATAL).await?;
        let red = self.bus.read_register_pair(RDATAL).await?;
        let green = self.bus.read_register_pair(GDATAL).await?;
        let blue = self.bus.read_register_pair(BDATAL).await?;
        Ok(RawChannels {
            clear,
            red,
            green,
            blue,
        })
    }

    /// Liest eine Messung und normalisiert sie auf 0-255
    pub async fn read_rgb(&mut self) -> Result<RGB8, SensorError<I2C::Error>> {
        let raw = self.read_raw().await?;
        Ok(raw.normalize())
    }

    /// ID prüfen, Konfiguration senden, einschalten
    async fn start(&mut self) -> Result<(), SensorError<I2C::Error>> {
        let found = self.bus.read_register(ID).await?;
        if found != EXPECTED_ID {
            return Err(SensorError::IdentityMismatch { found });
        }

        self.state = SensorState::Verifying;
        match self.configure_and_power_on().await {
            Ok(()) => {
                self.state = SensorState::Ready { enabled: true };
                Ok(())
            }
            Err(e) => {
                // Halb konfiguriert: nächster Aufruf beginnt von vorn
                self.state = SensorState::Uninitialized;
                Err(e.into())
            }
        }
    }

    async fn configure_and_power_on(&mut self) -> Result<(), BusError<I2C::Error>> {
        self.bus
            .write_register(ATIME, self.config.integration_time.code())
            .await?;
        self.bus
            .write_register(CONTROL, self.config.gain.code())
            .await?;
        self.power_on().await
    }

    async fn power_on(&mut self) -> Result<(), BusError<I2C::Error>> {
        self.bus
            .write_register(ENABLE, EnableFlags::PON.bits())
            .await?;
        self.delay.delay_ms(POWER_ON_SETTLE_MS).await;
        self.bus
            .write_register(ENABLE, (EnableFlags::PON | EnableFlags::AEN).bits())
            .await
    }
}
