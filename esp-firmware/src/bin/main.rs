// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// defmt Logging
use defmt::{error, info, warn};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_farbsensor::SensorReadingChannel;
use esp_farbsensor::config::{
    EXTRA_HEAP_SIZE, LED_PINS, MQTT_BROKER, SENSOR_LED_PIN, WIFI_HEAP_SIZE, WIFI_SSID,
};
use esp_farbsensor::hal::GpioBank;
use esp_farbsensor::tasks::sensor_poll_task;
use esp_farbsensor::telemetry;

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, startet Embassy Runtime und spawnt den Sensor-Task.
/// WiFi + MQTT werden nur gestartet wenn WIFI_SSID und MQTT_BROKER gesetzt sind,
/// ein Fehler dabei lässt den Sensor-Task offline weiterlaufen.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Messwert-Channel erstellen (Sensor → MQTT)
    // PubSubChannel: publish_immediate verdrängt alte Messungen, Sensor blockiert nie
    static READING_CHANNEL: static_cell::StaticCell<SensorReadingChannel> =
        static_cell::StaticCell::new();
    let reading_channel = &*READING_CHANNEL.init(SensorReadingChannel::new());
    let reading_publisher = reading_channel
        .publisher()
        .expect("Reading channel has no free publisher slot");

    // GPIOs der Anzeige-LEDs (Reihenfolge wie LED_PINS: Rot, Grün, Blau)
    // plus Steuer-Pin der Sensor-Beleuchtung
    let gpio_bank = GpioBank::new([
        (LED_PINS[0], peripherals.GPIO5.into()),
        (LED_PINS[1], peripherals.GPIO6.into()),
        (LED_PINS[2], peripherals.GPIO7.into()),
        (SENSOR_LED_PIN, peripherals.GPIO4.into()),
    ]);

    // Spawn Sensor Task (I2C0 an GPIO22/23, Anzeige-LEDs, Onboard SmartLED)
    spawner
        .spawn(sensor_poll_task(
            peripherals.I2C0,
            peripherals.GPIO22,
            peripherals.GPIO23,
            gpio_bank,
            peripherals.GPIO8,
            peripherals.RMT,
            reading_publisher,
        ))
        .expect("Failed to spawn sensor task");

    // Telemetrie ist optional: ohne WiFi-Zugangsdaten oder Broker läuft die Firmware offline
    match (WIFI_SSID, MQTT_BROKER) {
        (Some(ssid), Some(broker)) => {
            match telemetry::start(spawner, peripherals.WIFI, ssid, broker, reading_channel) {
                Ok(()) => info!("Telemetry: Started for '{}'", ssid),
                Err(e) => error!("Telemetry: {}, running offline", e),
            }
        }
        _ => warn!("Telemetry: WIFI_SSID or MQTT_BROKER not set, running offline"),
    }

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
