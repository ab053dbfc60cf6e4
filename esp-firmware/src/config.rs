// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

use esp_core::{DEFAULT_LED_THRESHOLD, Gain, IntegrationTime, LED_COUNT};

// ============================================================================
// Farbsensor (TCS34725) Konfiguration
// ============================================================================

/// I2C Datenleitung (SDA) → GPIO22
/// I2C Taktleitung (SCL) → GPIO23
/// Die Pins werden in main.rs als Peripherals übergeben, hier nur zur Doku
pub const I2C_SDA_PIN: u8 = 22;
pub const I2C_SCL_PIN: u8 = 23;

/// I2C Bus-Frequenz in kHz
/// Der TCS34725 unterstützt Fast-Mode (400 kHz)
pub const I2C_FREQUENCY_KHZ: u32 = 400;

/// Integrationszeit des Sensors
/// 154 ms: guter Kompromiss zwischen Auflösung und Reaktionszeit
pub const SENSOR_INTEGRATION_TIME: IntegrationTime = IntegrationTime::Ms154;

/// Verstärkung des Sensors
pub const SENSOR_GAIN: Gain = Gain::X16;

/// Steuer-Pin der Beleuchtungs-LED auf dem Sensor-Breakout (High = an)
pub const SENSOR_LED_PIN: u8 = 4;

/// Beleuchtungs-LED beim Start einschalten
pub const SENSOR_ILLUMINATION: bool = true;

/// Abfrage-Intervall in Millisekunden
/// Sollte größer als die Integrationszeit sein, sonst liest man alte Werte
pub const POLL_INTERVAL_MS: u64 = 500;

// ============================================================================
// Anzeige-LEDs (Rot, Grün, Blau) Konfiguration
// ============================================================================

/// GPIO-Pins der drei Anzeige-LEDs, Reihenfolge: Rot, Grün, Blau
pub const LED_PINS: [u8; LED_COUNT] = [5, 6, 7];

/// Anzahl Pins in der GPIO-Bank: drei Anzeige-LEDs plus Sensor-Beleuchtung
pub const GPIO_BANK_SIZE: usize = LED_COUNT + 1;

/// Polarität der Anzeige-LEDs
/// true = LEDs hängen gegen VCC (aktiv low), false = gegen GND (aktiv high)
pub const LEDS_INVERTED: bool = true;

/// Schwelle (0-255) ab der ein normalisierter Kanal seine LED einschaltet
pub const LED_THRESHOLD: u8 = DEFAULT_LED_THRESHOLD;

// ============================================================================
// Onboard SmartLED Konfiguration
// ============================================================================

/// GPIO-Pin für die RGB LED (WS2812/Neopixel)
pub const LED_GPIO_PIN: u8 = 8;

/// Helligkeits-Level für die LED (0-255)
/// Wert ist gedimmt für Augenschonung
pub const LED_BRIGHTNESS: u8 = 10;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

// ============================================================================
// WiFi Konfiguration (optional)
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Ohne SSID läuft die Firmware offline (nur Sensor + LEDs)
pub const WIFI_SSID: Option<&str> = option_env!("WIFI_SSID");

/// WiFi Passwort
/// Leer erlaubt offene Netzwerke
pub const WIFI_PASSWORD: &str = match option_env!("WIFI_PASSWORD") {
    Some(password) => password,
    None => "",
};

/// Wartezeit bis zum nächsten Verbindungsversuch nach Abbruch
pub const LINK_RETRY_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// Gesamt-Heap: ~100 KB für WiFi-Stack

// ============================================================================
// MQTT Konfiguration (optional)
// ============================================================================

/// MQTT Broker Hostname oder IP-Adresse
/// Ohne Broker ist die Telemetrie deaktiviert
pub const MQTT_BROKER: Option<&str> = option_env!("MQTT_BROKER");

/// MQTT Broker Port
/// Standard: 1883 (unverschlüsselt), 8883 (TLS)
pub const MQTT_PORT: u16 = 1883;

/// MQTT Client ID
/// Eindeutige Kennung für diesen ESP32-C6
pub const MQTT_CLIENT_ID: &str = match option_env!("MQTT_CLIENT_ID") {
    Some(id) => id,
    None => "farbsensor",
};

/// MQTT Publish Topic für Messwerte
/// Payload: {"r":..,"g":..,"b":..,"clear":..}
pub const MQTT_TOPIC_RGB: &str = match option_env!("MQTT_TOPIC_RGB") {
    Some(topic) => topic,
    None => "farbsensor/rgb",
};

/// MQTT Reconnect Delay in Sekunden
/// Wartezeit nach Verbindungsfehler vor erneutem Versuch
pub const MQTT_RECONNECT_DELAY_SECS: u64 = 5;

/// MQTT Keep-Alive in Sekunden
/// Deutlich größer als POLL_INTERVAL_MS, da jede Messung ohnehin ein Paket sendet
pub const MQTT_KEEP_ALIVE_SECS: u16 = 30;

/// TCP RX/TX Buffer-Größe je Richtung in Bytes
pub const TCP_BUFFER_SIZE: usize = 1536;

/// Socket-Timeout in Sekunden (Verbindungsaufbau und Senden)
pub const SOCKET_TIMEOUT_SECS: u64 = 10;

/// MQTT Buffer-Größe in Bytes
/// Muss groß genug für MQTT-Pakete sein
pub const MQTT_BUFFER_SIZE: usize = 1024;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

/// JSON Serialisierungs-Buffer für eine Messung
/// {"r":255,"g":255,"b":255,"clear":65535} sind 39 Bytes
pub const JSON_READING_BUFFER_SIZE: usize = 64;
