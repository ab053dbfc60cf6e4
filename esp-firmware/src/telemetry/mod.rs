// Telemetrie: WLAN + MQTT, nur wenn WIFI_SSID und MQTT_BROKER gesetzt sind
//
// `start` bringt Funk, Netzwerk-Stack und alle Netzwerk-Tasks hoch.
// Ein Fehler hier lässt den Sensor-Task unberührt weiterlaufen.

mod link;
mod mqtt;
mod payload;

pub use payload::RgbPayload;

use defmt::{Debug2Format, error};
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use esp_hal::rng::Rng;
use static_cell::StaticCell;

use crate::SensorReadingChannel;

/// Sockets: DHCP, DNS, MQTT
const SOCKET_COUNT: usize = 3;

/// Fehler beim Hochfahren oder während einer MQTT-Sitzung
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum TelemetryError {
    /// Funk-Controller ließ sich nicht initialisieren
    Radio,
    /// WLAN-Treiber ließ sich nicht erstellen
    Wifi,
    /// Kein Subscriber-Slot mehr im Messwert-Channel
    NoSubscriber,
    /// Task-Pool erschöpft
    Spawn,
    /// Broker-Name nicht auflösbar
    Dns,
    DnsTimeout,
    /// TCP-Verbindung zum Broker fehlgeschlagen
    Connect,
    /// MQTT CONNECT abgelehnt
    Handshake,
    /// Payload passt nicht in den JSON-Buffer
    Encode,
    Publish,
}

/// Startet WLAN-Verbindung, Netzwerk-Stack und MQTT-Publisher
///
/// Darf nur einmal aufgerufen werden (statische Ressourcen).
pub fn start(
    spawner: Spawner,
    wifi: esp_hal::peripherals::WIFI<'static>,
    ssid: &'static str,
    broker: &'static str,
    readings: &'static SensorReadingChannel,
) -> Result<(), TelemetryError> {
    let subscriber = readings
        .subscriber()
        .map_err(|_| TelemetryError::NoSubscriber)?;

    static RADIO: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
    let radio = esp_radio::init().map_err(|e| {
        error!("Radio: {}", Debug2Format(&e));
        TelemetryError::Radio
    })?;
    let radio = RADIO.init(radio);

    let (controller, interfaces) =
        esp_radio::wifi::new(radio, wifi, Default::default()).map_err(|e| {
            error!("WiFi: {}", Debug2Format(&e));
            TelemetryError::Wifi
        })?;

    // Seed für den TCP/IP-Stack aus dem Hardware-RNG
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    static RESOURCES: StaticCell<StackResources<SOCKET_COUNT>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        NetConfig::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );

    spawner
        .spawn(link::link_task(controller, ssid))
        .map_err(|_| TelemetryError::Spawn)?;
    spawner
        .spawn(link::net_task(runner))
        .map_err(|_| TelemetryError::Spawn)?;
    spawner
        .spawn(mqtt::mqtt_task(stack, broker, subscriber))
        .map_err(|_| TelemetryError::Spawn)?;
    Ok(())
}
