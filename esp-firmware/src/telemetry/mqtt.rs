// MQTT-Publisher: jede Messung als JSON auf MQTT_TOPIC_RGB

use defmt::{Debug2Format, error, info};
use embassy_net::{IpAddress, Ipv4Address, Stack, dns::DnsQueryType, tcp::TcpSocket};
use embassy_time::{Duration, Timer, with_timeout};

use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::utils::rng_generator::CountingRng;
use rust_mqtt::utils::types::EncodedString;

use super::{RgbPayload, TelemetryError};
use crate::SensorReadingSubscriber;
use crate::config::{
    DNS_TIMEOUT_SECS, JSON_READING_BUFFER_SIZE, MQTT_BUFFER_SIZE, MQTT_CLIENT_ID,
    MQTT_KEEP_ALIVE_SECS, MQTT_PORT, MQTT_RECONNECT_DELAY_SECS, MQTT_TOPIC_RGB,
    SOCKET_TIMEOUT_SECS, TCP_BUFFER_SIZE,
};

/// Published Messwerte solange das Netz steht, sonst wartet er auf DHCP
///
/// Jede Sitzung endet beim ersten Fehler, danach neuer Versuch nach
/// `MQTT_RECONNECT_DELAY_SECS`.
#[embassy_executor::task]
pub async fn mqtt_task(
    stack: Stack<'static>,
    broker: &'static str,
    mut readings: SensorReadingSubscriber,
) {
    loop {
        stack.wait_config_up().await;
        if let Some(config) = stack.config_v4() {
            info!("Net: Address {}", Debug2Format(&config.address));
        }

        if let Err(e) = session(stack, broker, &mut readings).await {
            error!("MQTT: {}", e);
        }
        Timer::after(Duration::from_secs(MQTT_RECONNECT_DELAY_SECS)).await;
    }
}

async fn session(
    stack: Stack<'static>,
    broker: &str,
    readings: &mut SensorReadingSubscriber,
) -> Result<(), TelemetryError> {
    let address = broker_address(stack, broker).await?;

    let mut rx_buffer = [0u8; TCP_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_BUFFER_SIZE];
    let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(SOCKET_TIMEOUT_SECS)));
    socket
        .connect((address, MQTT_PORT))
        .await
        .map_err(|_| TelemetryError::Connect)?;

    let mut config = ClientConfig::<5, _>::new(MqttVersion::MQTTv5, CountingRng(20000));
    config.client_id = EncodedString {
        string: MQTT_CLIENT_ID,
        len: MQTT_CLIENT_ID.len() as u16,
    };
    config.keep_alive = MQTT_KEEP_ALIVE_SECS;
    config.max_packet_size = MQTT_BUFFER_SIZE as u32;

    let mut send_buffer = [0u8; MQTT_BUFFER_SIZE];
    let mut recv_buffer = [0u8; MQTT_BUFFER_SIZE];
    let mut client = MqttClient::<_, 5, _>::new(
        socket,
        &mut send_buffer,
        MQTT_BUFFER_SIZE,
        &mut recv_buffer,
        MQTT_BUFFER_SIZE,
        config,
    );
    client
        .connect_to_broker()
        .await
        .map_err(|_| TelemetryError::Handshake)?;
    info!("MQTT: Publishing to '{}' on {}", MQTT_TOPIC_RGB, broker);

    let mut json = [0u8; JSON_READING_BUFFER_SIZE];
    loop {
        let payload = RgbPayload::from(&readings.next_message_pure().await);
        let len = payload
            .encode(&mut json)
            .map_err(|_| TelemetryError::Encode)?;
        client
            .send_message(MQTT_TOPIC_RGB, &json[..len], QualityOfService::QoS0, false)
            .await
            .map_err(|_| TelemetryError::Publish)?;
    }
}

/// IPv4-Literal direkt, sonst DNS (A-Record)
async fn broker_address(
    stack: Stack<'static>,
    broker: &str,
) -> Result<Ipv4Address, TelemetryError> {
    if let Ok(address) = broker.parse::<Ipv4Address>() {
        return Ok(address);
    }

    let addresses = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(broker, DnsQueryType::A),
    )
    .await
    .map_err(|_| TelemetryError::DnsTimeout)?
    .map_err(|_| TelemetryError::Dns)?;

    addresses
        .into_iter()
        .find_map(|address| match address {
            IpAddress::Ipv4(v4) => Some(v4),
            #[allow(unreachable_patterns)]
            _ => None,
        })
        .ok_or(TelemetryError::Dns)
}
