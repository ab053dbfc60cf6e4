// Task-Modul: Sensor-Task
//
// Läuft immer, auch ohne Netzwerk. Die Netzwerk-Tasks leben in `telemetry`,
// weil sie nur mit WIFI_SSID + MQTT_BROKER gestartet werden.

pub mod sensor_poll;

pub use sensor_poll::{sensor_poll_logic, sensor_poll_task};
