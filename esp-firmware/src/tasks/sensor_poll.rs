// Sensor Poll Task - Liest den Farbsensor und steuert die Anzeige-LEDs
use core::fmt::Debug;

use defmt::{Debug2Format, error, info, warn};
use embassy_time::{Delay, Duration, Timer};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use esp_hal::Async;
use esp_hal::gpio::Output;
use esp_hal::i2c::master::{Config as I2cConfig, I2c as EspI2c};
use esp_hal::time::Rate;
use esp_hal_smartled::smart_led_buffer;

use esp_core::{
    ColorSensor, LED_COUNT, LedBank, PinController, SensorReading, SmartLedWriter,
    heartbeat_pattern, indicator_color, led_pattern,
};

use crate::SensorReadingPublisher;
use crate::config::{
    GPIO_BANK_SIZE, I2C_FREQUENCY_KHZ, LED_BRIGHTNESS, LED_PINS, LED_THRESHOLD, LEDS_INVERTED,
    POLL_INTERVAL_MS, RMT_CLOCK_MHZ, SENSOR_GAIN, SENSOR_ILLUMINATION, SENSOR_INTEGRATION_TIME,
    SENSOR_LED_PIN,
};
use crate::hal::{GpioBank, RmtLedWriter};

/// Sensor Poll Logic - Testbare Business Logic ohne esp-hal Typen
///
/// Pro Tick:
/// - Liest alle vier Kanäle (initialisiert den Sensor bei Bedarf lazy)
/// - Normalisiert, published die Messung und schaltet die LEDs nach Schwelle
/// - Ohne Sensor: alle LEDs toggeln (Heartbeat), Fehler nur bei Zustandswechsel loggen
///
/// # Parameter
/// - `sensor`: Farbsensor-Treiber (beliebiger async I2C-Bus, optional mit LED-Pin)
/// - `leds`: Anzeige-LEDs Rot, Grün, Blau
/// - `indicator`: Onboard SmartLED, spiegelt das LED-Muster
/// - `publisher`: PubSub Publisher für Messwerte (Telemetrie)
pub async fn sensor_poll_logic<I2C, D, S, P, L>(
    mut sensor: ColorSensor<I2C, D, S>,
    mut leds: LedBank<P, LED_COUNT>,
    mut indicator: L,
    publisher: SensorReadingPublisher,
) -> !
where
    I2C: I2c,
    I2C::Error: Debug + 'static,
    D: DelayNs,
    S: OutputPin,
    P: OutputPin,
    L: SmartLedWriter,
{
    if let Err(e) = sensor.set_illumination(SENSOR_ILLUMINATION) {
        error!("Sensor: Illumination LED: {}", e);
    }

    // Beide Setter merken sich den Wert auch wenn der Sensor fehlt,
    // er wird dann beim ersten erfolgreichen Init übertragen
    if let Err(e) = sensor.set_integration_time(SENSOR_INTEGRATION_TIME).await {
        warn!("Sensor: Set integration time failed: {}", e);
    }
    if let Err(e) = sensor.set_gain(SENSOR_GAIN).await {
        warn!("Sensor: Set gain failed: {}", e);
    }

    if sensor.is_enabled() {
        info!(
            "Sensor: Ready at {=u8:#x} ({}, {})",
            sensor.address(),
            SENSOR_INTEGRATION_TIME,
            SENSOR_GAIN
        );
    } else {
        warn!("Sensor: Not available, running heartbeat");
    }

    let mut available = sensor.is_enabled();

    loop {
        let pattern = match sensor.read_raw().await {
            Ok(raw) => {
                if !available {
                    info!("Sensor: Available");
                    available = true;
                }

                let reading = SensorReading::from_raw(raw);
                publisher.publish_immediate(reading); // Broadcast, blockiert nie
                info!("Sensor: {}", reading);

                led_pattern(reading.rgb, LED_THRESHOLD)
            }
            Err(e) => {
                if available {
                    error!("Sensor: Read failed: {}", e);
                    available = false;
                }
                heartbeat_pattern(leds.states())
            }
        };

        if let Err(e) = leds.apply(pattern) {
            error!("LEDs: {}", e);
        }

        if let Err(e) = indicator.write(indicator_color(pattern, LED_BRIGHTNESS)) {
            error!("Failed to write to LED: {}", e);
        }

        // Async Delay: gibt CPU an andere Tasks zurück
        Timer::after(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

/// Sensor Poll Task - Embassy Task für parallele Ausführung
///
/// Übernimmt die Hardware-Initialisierung (I2C, GPIO, RMT) und ruft dann
/// die testbare `sensor_poll_logic()` Funktion auf.
///
/// # Parameter
/// - `i2c0`: I2C0 Peripheral für den Sensor
/// - `sda` / `scl`: I2C Datenleitung (GPIO22) und Taktleitung (GPIO23)
/// - `gpio_bank`: GPIOs der Anzeige-LEDs und der Sensor-Beleuchtung
/// - `gpio8`: GPIO8 Peripheral für die Onboard SmartLED
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `publisher`: PubSub Publisher für Messwerte
#[embassy_executor::task]
pub async fn sensor_poll_task(
    i2c0: esp_hal::peripherals::I2C0<'static>,
    sda: esp_hal::peripherals::GPIO22<'static>,
    scl: esp_hal::peripherals::GPIO23<'static>,
    mut gpio_bank: GpioBank<GPIO_BANK_SIZE>,
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    publisher: SensorReadingPublisher,
) {
    // I2C Bus im Async-Modus (Fast-Mode)
    let i2c_config = I2cConfig::default().with_frequency(Rate::from_khz(I2C_FREQUENCY_KHZ));
    let i2c: EspI2c<'static, Async> = match EspI2c::new(i2c0, i2c_config) {
        Ok(i2c) => i2c.with_sda(sda).with_scl(scl).into_async(),
        Err(e) => {
            error!("I2C: Configuration rejected: {}", Debug2Format(&e));
            return;
        }
    };
    let sensor = ColorSensor::new(i2c, Delay);

    // Beleuchtungs-LED des Breakouts (Steuer-Pin aus derselben GPIO-Bank)
    let sensor = match gpio_bank.open_output(SENSOR_LED_PIN) {
        Some(pin) => sensor.with_illumination(pin),
        None => {
            error!("Sensor: Illumination pin GPIO{} unavailable", SENSOR_LED_PIN);
            return;
        }
    };

    // Anzeige-LEDs öffnen und ausschalten
    let leds: LedBank<Output<'static>, LED_COUNT> =
        match LedBank::init(&mut gpio_bank, LED_PINS, LEDS_INVERTED) {
            Ok(leds) => leds,
            Err(e) => {
                error!("LEDs: Init failed: {}", e);
                return;
            }
        };

    // Buffer für SmartLED Daten erstellen (1 LED)
    // Macro allokiert Speicher im richtigen Format für RMT
    let mut rmt_buffer = smart_led_buffer!(1);
    let indicator = match RmtLedWriter::new(gpio8, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer)
    {
        Ok(indicator) => indicator,
        Err(e) => {
            error!("RMT: Init failed: {}", Debug2Format(&e));
            return;
        }
    };

    sensor_poll_logic(sensor, leds, indicator, publisher).await
}
