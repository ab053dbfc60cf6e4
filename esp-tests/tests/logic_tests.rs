//! Integration Tests für Pure Logic (Normalisierung, LED-Muster)
//!
//! Diese Tests laufen auf dem Host (x86_64) ohne Mocks

use esp_core::registers::EnableFlags;
use esp_core::{
    DEFAULT_LED_THRESHOLD, IntegrationTime, RawChannels, SensorReading, heartbeat_pattern,
    indicator_color, led_pattern, normalize_channel,
};
use rgb::RGB8;

// ============================================================================
// Tests: normalize_channel()
// ============================================================================

#[test]
fn test_normalize_formula_over_range() {
    for clear in (1u16..=u16::MAX).step_by(997) {
        for raw in (0u16..=u16::MAX).step_by(1231) {
            let expected = core::cmp::min(255, raw as u32 * 255 / clear as u32) as u8;
            assert_eq!(normalize_channel(raw, clear), expected, "raw={raw} clear={clear}");
        }
    }
}

#[test]
fn test_normalize_zero_clear_is_zero() {
    for raw in [0u16, 1, 255, 1024, u16::MAX] {
        assert_eq!(normalize_channel(raw, 0), 0);
    }
}

#[test]
fn test_normalize_end_to_end_scenario() {
    let raw = RawChannels {
        clear: 100,
        red: 50,
        green: 25,
        blue: 10,
    };
    assert_eq!(raw.normalize(), RGB8 { r: 127, g: 63, b: 25 });
}

#[test]
fn test_sensor_reading_from_raw() {
    let raw = RawChannels {
        clear: 200,
        red: 200,
        green: 100,
        blue: 0,
    };
    let reading = SensorReading::from_raw(raw);
    assert_eq!(reading.raw, raw);
    assert_eq!(reading.rgb, RGB8 { r: 255, g: 127, b: 0 });
}

// ============================================================================
// Tests: LED-Muster
// ============================================================================

#[test]
fn test_led_pattern_red_object() {
    let pattern = led_pattern(RGB8 { r: 170, g: 50, b: 40 }, DEFAULT_LED_THRESHOLD);
    assert_eq!(pattern, [true, false, false]);
}

#[test]
fn test_led_pattern_threshold_is_inclusive() {
    let color = RGB8 {
        r: DEFAULT_LED_THRESHOLD,
        g: DEFAULT_LED_THRESHOLD - 1,
        b: 255,
    };
    assert_eq!(led_pattern(color, DEFAULT_LED_THRESHOLD), [true, false, true]);
}

#[test]
fn test_led_pattern_black_is_off() {
    assert_eq!(
        led_pattern(RGB8::default(), DEFAULT_LED_THRESHOLD),
        [false, false, false]
    );
}

#[test]
fn test_heartbeat_toggles_every_led() {
    assert_eq!(heartbeat_pattern([false, false, false]), [true, true, true]);
    assert_eq!(heartbeat_pattern([true, false, true]), [false, true, false]);
}

#[test]
fn test_indicator_color_brightness() {
    assert_eq!(
        indicator_color([true, true, false], 10),
        RGB8 { r: 10, g: 10, b: 0 }
    );
}

// ============================================================================
// Tests: Register-Helfer
// ============================================================================

#[test]
fn test_enable_flags_bits() {
    assert_eq!(EnableFlags::PON.bits(), 0x01);
    assert_eq!(EnableFlags::AEN.bits(), 0x02);
    assert_eq!(EnableFlags::power_down(0xFF), 0xFC);
}

#[test]
fn test_integration_time_cycles() {
    let cycles = IntegrationTime::ALL.map(IntegrationTime::cycles);
    assert_eq!(cycles, [1, 10, 20, 42, 64, 256]);
}
