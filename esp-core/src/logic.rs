//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

/// Anzahl der Status-LEDs (Rot, Grün, Blau)
pub const LED_COUNT: usize = 3;

/// Standard-Schwelle für die LED-Anzeige (≈ 255 / 3)
pub const DEFAULT_LED_THRESHOLD: u8 = 85;

/// Normalisiert einen Rohwert relativ zum Clear-Kanal auf 0-255
///
/// Ganzzahl-Division (abgeschnitten, nicht gerundet), begrenzt auf 255.
/// Clear = 0 ergibt 0.
///
/// ```
/// # use esp_core::normalize_channel;
/// assert_eq!(normalize_channel(50, 100), 127);
/// assert_eq!(normalize_channel(300, 100), 255);
/// assert_eq!(normalize_channel(42, 0), 0);
/// ```
pub fn normalize_channel(raw: u16, clear: u16) -> u8 {
    if clear == 0 {
        return 0;
    }
    let scaled = raw as u32 * 255 / clear as u32;
    scaled.min(255) as u8
}

/// LED-Muster aus einer normalisierten Farbe
///
/// LED 0/1/2 (Rot/Grün/Blau) leuchtet wenn der Kanal die Schwelle erreicht.
pub fn led_pattern(color: RGB8, threshold: u8) -> [bool; LED_COUNT] {
    [
        color.r >= threshold,
        color.g >= threshold,
        color.b >= threshold,
    ]
}

/// Invertiert jede LED - Herzschlag-Anzeige wenn kein Sensor antwortet
pub fn heartbeat_pattern(current: [bool; LED_COUNT]) -> [bool; LED_COUNT] {
    current.map(|on| !on)
}

/// Farbe für die Onboard-SmartLED aus dem LED-Muster
pub fn indicator_color(pattern: [bool; LED_COUNT], brightness: u8) -> RGB8 {
    let level = |on: bool| if on { brightness } else { 0 };
    RGB8 {
        r: level(pattern[0]),
        g: level(pattern[1]),
        b: level(pattern[2]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_truncates() {
        assert_eq!(normalize_channel(50, 100), 127); // 127.5
        assert_eq!(normalize_channel(25, 100), 63); // 63.75
        assert_eq!(normalize_channel(10, 100), 25); // 25.5
    }

    #[test]
    fn test_normalize_clamps_to_255() {
        assert_eq!(normalize_channel(100, 100), 255);
        assert_eq!(normalize_channel(u16::MAX, 1), 255);
    }

    #[test]
    fn test_normalize_zero_clear() {
        assert_eq!(normalize_channel(0, 0), 0);
        assert_eq!(normalize_channel(u16::MAX, 0), 0);
    }

    #[test]
    fn test_normalize_matches_formula() {
        for clear in [1u16, 7, 100, 1024, 65535] {
            for raw in [0u16, 1, 3, 99, 512, 4096, 65535] {
                let expected = (raw as u32 * 255 / clear as u32).min(255) as u8;
                assert_eq!(normalize_channel(raw, clear), expected);
            }
        }
    }

    #[test]
    fn test_led_pattern_threshold() {
        let color = RGB8 { r: 127, g: 63, b: 85 };
        assert_eq!(led_pattern(color, 85), [true, false, true]);
        assert_eq!(led_pattern(color, 128), [false, false, false]);
        assert_eq!(led_pattern(RGB8::default(), 0), [true, true, true]);
    }

    #[test]
    fn test_heartbeat_pattern_full_cycle() {
        let mut pattern = [false, true, false];
        pattern = heartbeat_pattern(pattern);
        assert_eq!(pattern, [true, false, true]);
        pattern = heartbeat_pattern(pattern);
        assert_eq!(pattern, [false, true, false]);
    }

    #[test]
    fn test_indicator_color() {
        assert_eq!(
            indicator_color([true, false, true], 10),
            RGB8 { r: 10, g: 0, b: 10 }
        );
        assert_eq!(indicator_color([false; LED_COUNT], 10), RGB8::default());
    }
}
