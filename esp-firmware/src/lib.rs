// Library-Root: Firmware-Module für den Farbsensor
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;
pub mod telemetry;

// Re-exports von esp-core
pub use esp_core::{ColorSensor, LedBank, LedError, SensorError, SensorReading, SmartLedWriter};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Diese Type-Aliase vereinfachen die Lesbarkeit der Funktionssignaturen.
// Statt:  Publisher<'static, NoopRawMutex, SensorReading, 2, 2, 1>
// Nutze:  SensorReadingPublisher

/// PubSubChannel für Messwert-Broadcasts
/// - 2: Nachrichten-Kapazität im Queue (ältere Messungen werden verdrängt)
/// - 2: Maximale Anzahl Subscribers (MQTT + Reserve)
/// - 1: Publisher (Sensor-Task)
pub type SensorReadingChannel = PubSubChannel<NoopRawMutex, SensorReading, 2, 2, 1>;

/// Publisher für Messwerte
/// Erzeugt aus SensorReadingChannel
pub type SensorReadingPublisher = Publisher<'static, NoopRawMutex, SensorReading, 2, 2, 1>;

/// Subscriber für Messwerte
/// Empfängt Broadcasts von SensorReadingPublisher
pub type SensorReadingSubscriber = Subscriber<'static, NoopRawMutex, SensorReading, 2, 2, 1>;
