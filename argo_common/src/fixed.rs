//! Fixed-point scaling helpers.
//!
//! Wire payloads carry angles and rates as scaled integers:
//!
//! - **deci** (×10): one decimal of precision, used by telemetry
//!   snapshots (`12.34°` → `123` → `12.3°` after the peer decodes).
//! - **centi** (×100): two decimals, used by gimbal angle commands
//!   (`450` → `4.50°`).
//!
//! Encoding truncates toward zero. The one-decimal precision loss on the
//! deci path is part of the wire contract, not an accident.

/// Encode a value to deci fixed-point (×10, truncating).
#[inline]
pub fn encode_deci(value: f32) -> i16 {
    (value * 10.0) as i16
}

/// Decode a deci fixed-point value (÷10).
#[inline]
pub fn decode_deci(raw: i16) -> f32 {
    raw as f32 / 10.0
}

/// Encode a value to centi fixed-point (×100, truncating).
#[inline]
pub fn encode_centi(value: f32) -> i16 {
    (value * 100.0) as i16
}

/// Decode a centi fixed-point value (÷100).
#[inline]
pub fn decode_centi(raw: i16) -> f32 {
    raw as f32 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deci_encode_truncates_second_decimal() {
        assert_eq!(encode_deci(12.34), 123);
        assert_eq!(encode_deci(-12.34), -123);
        assert_eq!(encode_deci(0.0), 0);
    }

    #[test]
    fn deci_round_trip_loses_second_decimal() {
        // 12.34 survives only to one decimal place on the peer side.
        let raw = encode_deci(12.34);
        assert_eq!(raw, 123);
        let restored = decode_deci(raw);
        assert!((restored - 12.3).abs() < 1e-6);
        assert!((restored - 12.34).abs() > 1e-3);
    }

    #[test]
    fn centi_decode() {
        assert!((decode_centi(450) - 4.50).abs() < 1e-6);
        assert!((decode_centi(-450) + 4.50).abs() < 1e-6);
    }

    #[test]
    fn centi_encode() {
        assert_eq!(encode_centi(4.5), 450);
        assert_eq!(encode_centi(-4.5), -450);
    }
}
