//! Signed fixed-point conversions for the temperature registers.
//!
//! Cold junction: 14 bits in CJTH:CJTL[7:2], 2^-6 °C per count.
//! Thermocouple: 19 bits in LTCBH:LTCBM:LTCBL[7:5], 2^-7 °C per count.
//! Bit 7 of the MSB register is the sign bit of the field in both cases.

pub const COLD_JUNCTION_BITS: u32 = 14;
pub const COLD_JUNCTION_LSB: f32 = 1.0 / 64.0;

pub const THERMOCOUPLE_BITS: u32 = 19;
pub const THERMOCOUPLE_LSB: f32 = 1.0 / 128.0;

/// Resolution of the linearized fault threshold registers.
pub const THRESHOLD_LSB: f32 = 1.0 / 16.0;
/// Resolution of the cold-junction offset register.
pub const OFFSET_LSB: f32 = 1.0 / 16.0;

/// Raw 14-bit cold-junction count, sign extended.
pub fn cold_junction_counts(msb: u8, lsb: u8) -> i32 {
    let mut counts = ((msb as i32) << 6) | ((lsb >> 2) as i32);
    if msb & 0x80 != 0 {
        counts -= 1 << COLD_JUNCTION_BITS;
    }
    counts
}

/// Cold-junction (die) temperature in degrees Celsius.
pub fn cold_junction_celsius(msb: u8, lsb: u8) -> f32 {
    cold_junction_counts(msb, lsb) as f32 * COLD_JUNCTION_LSB
}

/// Raw 19-bit thermocouple count, sign extended.
pub fn thermocouple_counts(byte2: u8, byte1: u8, byte0: u8) -> i32 {
    let mut counts = ((byte2 as i32) << 11) | ((byte1 as i32) << 3) | ((byte0 >> 5) as i32);
    if byte2 & 0x80 != 0 {
        counts -= 1 << THERMOCOUPLE_BITS;
    }
    counts
}

/// Linearized, cold-junction compensated thermocouple temperature in degrees Celsius.
pub fn thermocouple_celsius(byte2: u8, byte1: u8, byte0: u8) -> f32 {
    thermocouple_counts(byte2, byte1, byte0) as f32 * THERMOCOUPLE_LSB
}

/// Encode a linearized fault threshold as `(msb, lsb)`.
///
/// Out-of-range values saturate at the register limits.
pub fn threshold_bytes(celsius: f32) -> (u8, u8) {
    let raw = (celsius / THRESHOLD_LSB) as i16;
    let [msb, lsb] = raw.to_be_bytes();
    (msb, lsb)
}

/// Encode a cold-junction offset, saturating at -8 .. +7.9375 °C.
pub fn offset_byte(celsius: f32) -> u8 {
    (celsius / OFFSET_LSB) as i8 as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thermocouple_scenarios() {
        assert_eq!(thermocouple_celsius(0x01, 0x70, 0x20), 23.0078125);
        assert_eq!(thermocouple_celsius(0b0000_0001, 0b1001_0000, 0), 25.0);
        assert_eq!(thermocouple_celsius(0, 0, 0), 0.0);
        assert_eq!(thermocouple_celsius(0b1111_1111, 0b1111_0000, 0), -1.0);
        assert_eq!(thermocouple_celsius(0b1111_0000, 0b0110_0000, 0), -250.0);
    }

    #[test]
    fn cold_junction_scenarios() {
        assert_eq!(cold_junction_celsius(0x1C, 0x64), 28.390625);
        assert_eq!(cold_junction_celsius(0b0111_1111, 0b1111_1100), 127.984375);
        assert_eq!(cold_junction_celsius(0b0001_1001, 0), 25.0);
        assert_eq!(cold_junction_celsius(0, 0), 0.0);
        assert_eq!(cold_junction_celsius(0b1110_0111, 0), -25.0);
        assert_eq!(cold_junction_celsius(0b1100_1001, 0), -55.0);
    }

    #[test]
    fn cold_junction_matches_twos_complement_for_every_field() {
        for field in 0u16..(1 << 14) {
            let word = field << 2;
            let [msb, lsb] = word.to_be_bytes();
            let signed = ((word as i16) >> 2) as i32;
            assert_eq!(cold_junction_counts(msb, lsb), signed);
            assert_eq!(cold_junction_celsius(msb, lsb), signed as f32 / 64.0);
        }
    }

    #[test]
    fn thermocouple_matches_twos_complement_for_every_field() {
        for field in 0u32..(1 << 19) {
            let word = field << 5;
            let [_, byte2, byte1, byte0] = word.to_be_bytes();
            let signed = ((word << 8) as i32) >> 13;
            assert_eq!(thermocouple_counts(byte2, byte1, byte0), signed);
            assert_eq!(thermocouple_celsius(byte2, byte1, byte0), signed as f32 / 128.0);
        }
    }

    #[test]
    fn unused_low_bits_are_ignored() {
        assert_eq!(cold_junction_celsius(0x19, 0x03), 25.0);
        assert_eq!(thermocouple_celsius(0x01, 0x90, 0x1F), 25.0);
    }

    #[test]
    fn extremes() {
        assert_eq!(cold_junction_celsius(0x80, 0x00), -128.0);
        assert_eq!(cold_junction_celsius(0xFF, 0xFC), -0.015625);
        assert_eq!(thermocouple_celsius(0x80, 0x00, 0x00), -2048.0);
        assert_eq!(thermocouple_celsius(0xFF, 0xFF, 0xE0), -0.0078125);
        assert_eq!(thermocouple_celsius(0x7F, 0xFF, 0xE0), 2047.9921875);
    }

    #[test]
    fn threshold_encoding() {
        assert_eq!(threshold_bytes(0.0), (0x00, 0x00));
        assert_eq!(threshold_bytes(1.0), (0x00, 0x10));
        assert_eq!(threshold_bytes(-1.0), (0xFF, 0xF0));
        assert_eq!(threshold_bytes(1800.0), (0x70, 0x80));
        assert_eq!(threshold_bytes(5000.0), (0x7F, 0xFF));
    }

    #[test]
    fn offset_encoding() {
        assert_eq!(offset_byte(0.0), 0x00);
        assert_eq!(offset_byte(0.5), 0x08);
        assert_eq!(offset_byte(-0.25), 0xFC);
        assert_eq!(offset_byte(100.0), 0x7F);
    }
}
