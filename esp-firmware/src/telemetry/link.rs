// WLAN-Verbindung (Station-Modus) und embassy-net Runner

use defmt::{Debug2Format, error, info, warn};
use embassy_net::Runner;
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiError, WifiEvent};

use crate::config::{LINK_RETRY_DELAY_SECS, WIFI_PASSWORD};

/// Hält die Station mit `ssid` verbunden
///
/// Nach einem Verbindungsabbruch wird nach `LINK_RETRY_DELAY_SECS` neu verbunden.
#[embassy_executor::task]
pub async fn link_task(mut controller: WifiController<'static>, ssid: &'static str) {
    let station = ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(ssid.into())
            .with_password(WIFI_PASSWORD.into()),
    );

    loop {
        match join(&mut controller, &station).await {
            Ok(()) => {
                info!("WiFi: Joined '{}'", ssid);
                controller.wait_for_event(WifiEvent::StaDisconnected).await;
                warn!("WiFi: Lost '{}'", ssid);
            }
            Err(e) => error!("WiFi: Joining '{}' failed: {}", ssid, Debug2Format(&e)),
        }
        Timer::after(Duration::from_secs(LINK_RETRY_DELAY_SECS)).await;
    }
}

async fn join(
    controller: &mut WifiController<'static>,
    station: &ModeConfig,
) -> Result<(), WifiError> {
    if !matches!(controller.is_started(), Ok(true)) {
        controller.set_config(station)?;
        controller.start_async().await?;
    }
    controller.connect_async().await
}

/// Verarbeitet Pakete des Netzwerk-Stacks
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}
