//! Integration Tests für den TCS34725-Treiber
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockI2c / MockDelay

use embassy_futures::block_on;
use embedded_hal::digital::PinState;
use esp_core::bus::compose_word;
use esp_core::registers::{
    ATIME, BDATAL, CDATAL, COMMAND_BIT, CONTROL, ENABLE, ENABLE_AEN, ENABLE_PON, GDATAL, ID,
    RDATAL, SENSOR_ADDRESS,
};
use esp_core::{
    BusError, ColorBus, ColorSensor, Gain, IntegrationTime, LedError, OpenError, PinController,
    RawChannels, SensorError, SensorState,
};
use esp_tests::{BusEvent, MockBusError, MockDelay, MockI2c, MockPin, MockPinController};
use rgb::RGB8;

fn sensor(mock: &MockI2c) -> ColorSensor<MockI2c, MockDelay> {
    ColorSensor::new(mock.clone(), mock.delay())
}

fn set_channels(mock: &MockI2c, raw: RawChannels) {
    mock.set_channel(CDATAL, raw.clear);
    mock.set_channel(RDATAL, raw.red);
    mock.set_channel(GDATAL, raw.green);
    mock.set_channel(BDATAL, raw.blue);
}

// ============================================================================
// Tests: ColorBus
// ============================================================================

#[test]
fn test_bus_write_sets_command_bit() {
    let mock = MockI2c::new();
    let mut bus = ColorBus::new(mock.clone(), SENSOR_ADDRESS);

    block_on(bus.write_register(CONTROL, 0x03)).unwrap();

    assert_eq!(
        mock.events(),
        vec![BusEvent::Write {
            address: 0x29,
            bytes: vec![0x8F, 0x03],
        }]
    );
    assert_eq!(mock.register(CONTROL), 0x03);
}

#[test]
fn test_bus_read_register_single_transaction() {
    let mock = MockI2c::new();
    let mut bus = ColorBus::new(mock.clone(), SENSOR_ADDRESS);

    let id = block_on(bus.read_register(ID)).unwrap();

    assert_eq!(id, 0x44);
    assert_eq!(
        mock.events(),
        vec![BusEvent::WriteRead {
            address: 0x29,
            bytes: vec![ID | COMMAND_BIT],
            read: vec![0x44],
        }]
    );
}

#[test]
fn test_bus_read_register_pair_low_byte_first() {
    let mock = MockI2c::new();
    mock.set_register(CDATAL, 0x34);
    mock.set_register(CDATAL + 1, 0x12);
    let mut bus = ColorBus::new(mock.clone(), SENSOR_ADDRESS);

    let value = block_on(bus.read_register_pair(CDATAL)).unwrap();

    assert_eq!(value, 0x1234);
    assert_eq!(
        mock.events(),
        vec![BusEvent::WriteRead {
            address: 0x29,
            bytes: vec![0x94],
            read: vec![0x34, 0x12],
        }]
    );
}

#[test]
fn test_bus_read_register_pair_swapped_bytes_change_result() {
    let mock = MockI2c::new();
    let mut bus = ColorBus::new(mock.clone(), SENSOR_ADDRESS);

    mock.set_register(RDATAL, 0x01);
    mock.set_register(RDATAL + 1, 0x02);
    let forward = block_on(bus.read_register_pair(RDATAL)).unwrap();

    mock.set_register(RDATAL, 0x02);
    mock.set_register(RDATAL + 1, 0x01);
    let swapped = block_on(bus.read_register_pair(RDATAL)).unwrap();

    assert_eq!(forward, 0x0201);
    assert_eq!(swapped, 0x0102);
    assert_ne!(forward, swapped);
    assert_eq!(forward, compose_word(0x01, 0x02));
}

#[test]
fn test_bus_error_carries_register() {
    let mock = MockI2c::absent();
    let mut bus = ColorBus::new(mock.clone(), SENSOR_ADDRESS);

    let result = block_on(bus.read_register(ID));

    assert_eq!(
        result,
        Err(BusError {
            register: ID,
            error: MockBusError::Nack,
        })
    );
}

// ============================================================================
// Tests: open()
// ============================================================================

#[test]
fn test_open_does_not_touch_bus() {
    let mock = MockI2c::new();
    let sensor = ColorSensor::open(0x29, mock.clone(), mock.delay()).unwrap();

    assert_eq!(sensor.address(), 0x29);
    assert_eq!(sensor.state(), SensorState::Uninitialized);
    assert!(mock.events().is_empty());
}

#[test]
fn test_open_rejects_invalid_address() {
    let mock = MockI2c::new();
    let result = ColorSensor::open(0x80, mock.clone(), mock.delay());

    assert!(matches!(
        result,
        Err(OpenError::InvalidAddress { address: 0x80 })
    ));
}

// ============================================================================
// Tests: Initialisierung
// ============================================================================

#[test]
fn test_begin_with_matching_id_becomes_ready() {
    let mock = MockI2c::new();
    let mut sensor = sensor(&mock);

    block_on(sensor.begin()).unwrap();

    assert_eq!(sensor.state(), SensorState::Ready { enabled: true });
    assert!(sensor.is_enabled());
}

#[test]
fn test_begin_sequence_on_the_wire() {
    let mock = MockI2c::new();
    let mut sensor = sensor(&mock);

    block_on(sensor.begin()).unwrap();

    assert_eq!(
        mock.events(),
        vec![
            BusEvent::WriteRead {
                address: 0x29,
                bytes: vec![0x92],
                read: vec![0x44],
            },
            // Default-Konfiguration: 700 ms, 16x
            BusEvent::Write {
                address: 0x29,
                bytes: vec![0x81, 0x00],
            },
            BusEvent::Write {
                address: 0x29,
                bytes: vec![0x8F, 0x02],
            },
            BusEvent::Write {
                address: 0x29,
                bytes: vec![0x80, ENABLE_PON],
            },
            BusEvent::Delay { ns: 3_000_000 },
            BusEvent::Write {
                address: 0x29,
                bytes: vec![0x80, ENABLE_PON | ENABLE_AEN],
            },
        ]
    );
}

#[test]
fn test_begin_is_only_done_once() {
    let mock = MockI2c::new();
    let mut sensor = sensor(&mock);

    block_on(sensor.begin()).unwrap();
    mock.clear_events();
    block_on(sensor.begin()).unwrap();

    assert!(mock.events().is_empty());
}

#[test]
fn test_identity_mismatch_stays_uninitialized() {
    let mock = MockI2c::with_id(0x4D);
    let mut sensor = sensor(&mock);

    let result = block_on(sensor.read_rgb());

    assert_eq!(result, Err(SensorError::IdentityMismatch { found: 0x4D }));
    assert!(result.unwrap_err().is_identity_mismatch());
    assert_eq!(sensor.state(), SensorState::Uninitialized);
    // Nur die ID wurde gelesen, nichts geschrieben
    assert!(mock.writes().is_empty());
    assert_eq!(mock.events().len(), 1);
}

#[test]
fn test_identity_mismatch_retry_after_sensor_appears() {
    let mock = MockI2c::with_id(0x00);
    let mut sensor = sensor(&mock);

    assert!(block_on(sensor.enable()).is_err());
    assert_eq!(sensor.state(), SensorState::Uninitialized);

    mock.set_register(ID, 0x44);
    block_on(sensor.enable()).unwrap();

    assert_eq!(sensor.state(), SensorState::Ready { enabled: true });
}

#[test]
fn test_every_operation_fails_while_identity_mismatch() {
    let mock = MockI2c::with_id(0x12);
    let mut sensor = sensor(&mock);
    let mismatch = Err(SensorError::IdentityMismatch { found: 0x12 });

    assert_eq!(block_on(sensor.enable()), mismatch);
    assert_eq!(block_on(sensor.disable()), mismatch);
    assert_eq!(block_on(sensor.set_gain(Gain::X60)), mismatch);
    assert_eq!(
        block_on(sensor.set_integration_time(IntegrationTime::Ms24)),
        mismatch
    );
    assert!(matches!(
        block_on(sensor.read_raw()),
        Err(SensorError::IdentityMismatch { found: 0x12 })
    ));
    assert!(mock.writes().is_empty());
    assert_eq!(sensor.state(), SensorState::Uninitialized);
}

#[test]
fn test_absent_sensor_reports_bus_error() {
    let mock = MockI2c::absent();
    let mut sensor = sensor(&mock);

    let result = block_on(sensor.read_rgb());

    assert_eq!(
        result,
        Err(SensorError::Bus {
            source: BusError {
                register: ID,
                error: MockBusError::Nack,
            },
        })
    );
    assert_eq!(sensor.state(), SensorState::Uninitialized);
}

#[test]
fn test_bus_error_during_configuration_resets_state() {
    let mock = MockI2c::new();
    mock.fail_on_register(Some(CONTROL));
    let mut sensor = sensor(&mock);

    let result = block_on(sensor.begin());

    assert!(matches!(
        result,
        Err(SensorError::Bus {
            source: BusError {
                register: CONTROL,
                ..
            }
        })
    ));
    assert_eq!(sensor.state(), SensorState::Uninitialized);

    // Nächster Versuch beginnt wieder mit der ID-Prüfung
    mock.fail_on_register(None);
    mock.clear_events();
    block_on(sensor.begin()).unwrap();
    assert_eq!(
        mock.events()[0],
        BusEvent::WriteRead {
            address: 0x29,
            bytes: vec![0x92],
            read: vec![0x44],
        }
    );
}

#[test]
fn test_bus_errors_are_not_retried() {
    let mock = MockI2c::new();
    let mut sensor = sensor(&mock);
    block_on(sensor.begin()).unwrap();

    mock.fail_on_register(Some(GDATAL));
    let result = block_on(sensor.read_raw());

    assert!(matches!(
        result,
        Err(SensorError::Bus {
            source: BusError {
                register: GDATAL,
                error: MockBusError::Nack,
            }
        })
    ));
    assert_eq!(mock.fail_count(), 1);
    // Treiber bleibt bereit, nur der Aufruf schlug fehl
    assert_eq!(sensor.state(), SensorState::Ready { enabled: true });
}

// ============================================================================
// Tests: enable() / disable()
// ============================================================================

#[test]
fn test_enable_waits_between_pon_and_aen() {
    let mock = MockI2c::new();
    let mut sensor = sensor(&mock);
    block_on(sensor.begin()).unwrap();
    mock.clear_events();

    block_on(sensor.enable()).unwrap();

    assert_eq!(
        mock.events(),
        vec![
            BusEvent::Write {
                address: 0x29,
                bytes: vec![0x80, 0x01],
            },
            BusEvent::Delay { ns: 3_000_000 },
            BusEvent::Write {
                address: 0x29,
                bytes: vec![0x80, 0x03],
            },
        ]
    );
    assert_eq!(mock.register(ENABLE), 0x03);
}

#[test]
fn test_disable_clears_power_bits() {
    let mock = MockI2c::new();
    let mut sensor = sensor(&mock);

    block_on(sensor.enable()).unwrap();
    block_on(sensor.disable()).unwrap();

    assert_eq!(mock.register(ENABLE) & (ENABLE_PON | ENABLE_AEN), 0);
    assert_eq!(sensor.state(), SensorState::Ready { enabled: false });
    assert!(!sensor.is_enabled());
}

#[test]
fn test_disable_preserves_unrelated_bits() {
    let mock = MockI2c::new();
    let mut sensor = sensor(&mock);
    block_on(sensor.enable()).unwrap();

    // Interrupt- und Wait-Enable vom Gerät/anderer Software gesetzt
    mock.set_register(ENABLE, 0xF0 | ENABLE_PON | ENABLE_AEN);
    mock.clear_events();
    block_on(sensor.disable()).unwrap();

    assert_eq!(mock.register(ENABLE), 0xF0);
    assert_eq!(
        mock.events(),
        vec![
            BusEvent::WriteRead {
                address: 0x29,
                bytes: vec![0x80],
                read: vec![0xF3],
            },
            BusEvent::Write {
                address: 0x29,
                bytes: vec![0x80, 0xF0],
            },
        ]
    );
}

#[test]
fn test_enable_after_disable() {
    let mock = MockI2c::new();
    let mut sensor = sensor(&mock);

    block_on(sensor.disable()).unwrap();
    assert!(!sensor.is_enabled());

    block_on(sensor.enable()).unwrap();
    assert!(sensor.is_enabled());
    assert_eq!(mock.register(ENABLE), 0x03);
}

// ============================================================================
// Tests: Konfiguration
// ============================================================================

#[test]
fn test_default_config() {
    let mock = MockI2c::new();
    let sensor = sensor(&mock);

    assert_eq!(sensor.config().integration_time, IntegrationTime::Ms700);
    assert_eq!(sensor.config().gain, Gain::X16);
}

#[test]
fn test_set_gain_writes_immediately() {
    let mock = MockI2c::new();
    let mut sensor = sensor(&mock);
    block_on(sensor.begin()).unwrap();
    mock.clear_events();

    block_on(sensor.set_gain(Gain::X60)).unwrap();

    assert_eq!(mock.writes(), vec![(CONTROL | COMMAND_BIT, 0x03)]);
    assert_eq!(sensor.config().gain, Gain::X60);
}

#[test]
fn test_set_integration_time_writes_immediately() {
    let mock = MockI2c::new();
    let mut sensor = sensor(&mock);
    block_on(sensor.begin()).unwrap();
    mock.clear_events();

    block_on(sensor.set_integration_time(IntegrationTime::Ms101)).unwrap();

    assert_eq!(mock.writes(), vec![(ATIME | COMMAND_BIT, 0xD5)]);
    assert_eq!(mock.register(ATIME), 0xD5);
}

#[test]
fn test_set_gain_before_begin_initializes_first() {
    let mock = MockI2c::new();
    let mut sensor = sensor(&mock);

    block_on(sensor.set_gain(Gain::X4)).unwrap();

    let writes = mock.writes();
    assert_eq!(writes.first(), Some(&(ATIME | COMMAND_BIT, 0x00)));
    assert_eq!(writes.last(), Some(&(CONTROL | COMMAND_BIT, 0x01)));
    assert_eq!(mock.register(CONTROL), 0x01);
    assert_eq!(sensor.state(), SensorState::Ready { enabled: true });
}

#[test]
fn test_config_is_resent_after_failed_init() {
    let mock = MockI2c::with_id(0x00);
    let mut sensor = sensor(&mock);

    assert!(block_on(sensor.set_integration_time(IntegrationTime::Ms24)).is_err());
    assert_eq!(sensor.config().integration_time, IntegrationTime::Ms24);

    mock.set_register(ID, 0x44);
    mock.clear_events();
    block_on(sensor.begin()).unwrap();

    assert_eq!(mock.writes()[0], (ATIME | COMMAND_BIT, 0xF6));
}

#[test]
fn test_config_survives_absent_sensor_at_boot() {
    let mock = MockI2c::absent();
    let mut sensor = sensor(&mock);

    // Beide Setter schlagen fehl, merken sich den Wert aber trotzdem
    assert!(block_on(sensor.set_integration_time(IntegrationTime::Ms154)).is_err());
    assert!(block_on(sensor.set_gain(Gain::X60)).is_err());

    mock.set_absent(false);
    mock.clear_events();
    block_on(sensor.read_raw()).unwrap();

    let writes = mock.writes();
    assert_eq!(writes[0], (ATIME | COMMAND_BIT, 0xC0));
    assert_eq!(writes[1], (CONTROL | COMMAND_BIT, 0x03));
}

// ============================================================================
// Tests: Messung
// ============================================================================

#[test]
fn test_read_raw_order_clear_first() {
    let mock = MockI2c::new();
    let mut sensor = sensor(&mock);
    block_on(sensor.begin()).unwrap();
    mock.clear_events();

    block_on(sensor.read_raw()).unwrap();

    let registers: Vec<u8> = mock
        .events()
        .into_iter()
        .filter_map(|event| match event {
            BusEvent::WriteRead { bytes, .. } => Some(bytes[0]),
            _ => None,
        })
        .collect();
    assert_eq!(registers, vec![0x94, 0x96, 0x98, 0x9A]);
}

#[test]
fn test_read_raw_values() {
    let mock = MockI2c::new();
    let raw = RawChannels {
        clear: 0xABCD,
        red: 0x0102,
        green: 0x7F00,
        blue: 0x00FF,
    };
    set_channels(&mock, raw);
    let mut sensor = sensor(&mock);

    assert_eq!(block_on(sensor.read_raw()).unwrap(), raw);
}

#[test]
fn test_read_rgb_end_to_end() {
    let mock = MockI2c::new();
    set_channels(
        &mock,
        RawChannels {
            clear: 100,
            red: 50,
            green: 25,
            blue: 10,
        },
    );
    let mut sensor = sensor(&mock);

    let rgb = block_on(sensor.read_rgb()).unwrap();

    assert_eq!(rgb, RGB8 { r: 127, g: 63, b: 25 });
}

#[test]
fn test_read_rgb_zero_clear_is_black() {
    let mock = MockI2c::new();
    set_channels(
        &mock,
        RawChannels {
            clear: 0,
            red: 500,
            green: 20,
            blue: 7,
        },
    );
    let mut sensor = sensor(&mock);

    assert_eq!(block_on(sensor.read_rgb()).unwrap(), RGB8 { r: 0, g: 0, b: 0 });
}

#[test]
fn test_read_rgb_saturates() {
    let mock = MockI2c::new();
    set_channels(
        &mock,
        RawChannels {
            clear: 1000,
            red: 4000,
            green: 1000,
            blue: 999,
        },
    );
    let mut sensor = sensor(&mock);

    assert_eq!(
        block_on(sensor.read_rgb()).unwrap(),
        RGB8 { r: 255, g: 255, b: 254 }
    );
}

#[test]
fn test_release_returns_transport() {
    let mock = MockI2c::new();
    let sensor = sensor(&mock);

    let (i2c, _delay) = sensor.release();
    i2c.set_register(0x20, 0x55);

    assert_eq!(mock.register(0x20), 0x55);
}

// ============================================================================
// Tests: Beleuchtungs-LED
// ============================================================================

const ILLUMINATION_PIN: u8 = 4;

fn illuminated_sensor(
    mock: &MockI2c,
) -> (ColorSensor<MockI2c, MockDelay, MockPin>, MockPinController) {
    let mut controller = MockPinController::new(&[ILLUMINATION_PIN]);
    let pin = controller.open_output(ILLUMINATION_PIN).unwrap();
    (sensor(mock).with_illumination(pin), controller)
}

#[test]
fn test_illumination_defaults_to_on() {
    let mock = MockI2c::new();
    let (sensor, controller) = illuminated_sensor(&mock);

    assert!(sensor.illumination());
    // Übernehmen des Pins schreibt nichts
    assert!(controller.history(ILLUMINATION_PIN).is_empty());
}

#[test]
fn test_illumination_drives_pin_high_when_on() {
    let mock = MockI2c::new();
    let (mut sensor, controller) = illuminated_sensor(&mock);

    sensor.set_illumination(false).unwrap();
    assert!(!sensor.illumination());
    assert_eq!(controller.level(ILLUMINATION_PIN), Some(PinState::Low));

    sensor.set_illumination(true).unwrap();
    assert!(sensor.illumination());
    assert_eq!(controller.level(ILLUMINATION_PIN), Some(PinState::High));

    // Kein Bus-Verkehr, Sensor bleibt uninitialisiert
    assert!(mock.events().is_empty());
    assert_eq!(sensor.state(), SensorState::Uninitialized);
}

#[test]
fn test_illumination_write_failure_keeps_state() {
    let mock = MockI2c::new();
    let (mut sensor, controller) = illuminated_sensor(&mock);
    controller.fail_writes(ILLUMINATION_PIN, true);

    assert_eq!(sensor.set_illumination(false), Err(LedError::WriteFailed));
    assert!(sensor.illumination());
}

#[test]
fn test_illumination_without_pin_is_ignored() {
    let mock = MockI2c::new();
    let mut sensor = sensor(&mock);

    assert_eq!(sensor.set_illumination(false), Ok(()));
    assert!(sensor.illumination());
}

#[test]
fn test_illuminated_sensor_reads_normally() {
    let mock = MockI2c::new();
    set_channels(
        &mock,
        RawChannels {
            clear: 100,
            red: 50,
            green: 25,
            blue: 10,
        },
    );
    let (mut sensor, _controller) = illuminated_sensor(&mock);

    assert_eq!(
        block_on(sensor.read_rgb()).unwrap(),
        RGB8 { r: 127, g: 63, b: 25 }
    );
}
