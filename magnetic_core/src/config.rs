// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parameter defaults and normalization.
//!
//! Cosmetic parameters are never rejected. A missing or NaN `force` or
//! `distance` is replaced by the configured default, and `force` is clamped
//! below 1 so the integrator always keeps some history.

/// Engine-wide tuning knobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Smoothing coefficient used when none (or NaN) is supplied.
    pub default_force: f64,
    /// Displacement multiplier used when none (or NaN) is supplied.
    pub default_distance: f64,
    /// Upper clamp for `force`. Must stay below 1.
    pub max_force: f64,
    /// An instance settles once both rendered axes are within this many
    /// pixels of zero.
    pub settle_threshold: f64,
}

impl EngineConfig {
    /// The stock configuration: force 0.1, distance 1, force capped at 0.999,
    /// settle threshold 0.1px.
    pub const DEFAULT: Self = Self {
        default_force: 0.1,
        default_distance: 1.0,
        max_force: 0.999,
        settle_threshold: 0.1,
    };

    /// Normalizes a requested smoothing coefficient.
    ///
    /// `None` and NaN map to [`default_force`](Self::default_force); anything
    /// else is clamped to `[0, max_force]`.
    #[must_use]
    pub fn normalize_force(&self, force: Option<f64>) -> f64 {
        match force {
            Some(f) if !f.is_nan() => f.clamp(0.0, self.max_force),
            _ => self.default_force,
        }
    }

    /// Normalizes a requested displacement multiplier.
    ///
    /// `None` and NaN map to [`default_distance`](Self::default_distance).
    /// Every other value, negative and zero included, passes through.
    #[must_use]
    pub fn normalize_distance(&self, distance: Option<f64>) -> f64 {
        match distance {
            Some(d) if !d.is_nan() => d,
            _ => self.default_distance,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Coerces attribute text to a number the way the browser's `Number()`
/// does.
///
/// Surrounding whitespace is ignored and an empty string is `0`. Decimal
/// literals (with optional sign and exponent), `Infinity`, and unsigned
/// `0x`/`0o`/`0b` literals are accepted. Anything else is NaN.
#[must_use]
pub fn coerce_number(text: &str) -> f64 {
    let s = text.trim();
    if s.is_empty() {
        return 0.0;
    }

    let (sign, unsigned) = match s.as_bytes()[0] {
        b'+' => (1.0, &s[1..]),
        b'-' => (-1.0, &s[1..]),
        _ => (1.0, s),
    };
    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }

    if unsigned.len() > 2 && unsigned.as_bytes()[0] == b'0' && unsigned.len() == s.len() {
        let radix = match unsigned.as_bytes()[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return radix_literal(&unsigned[2..], radix);
        }
    }

    // Rust accepts spellings such as "inf" and "NaN" that `Number()` does not.
    let decimal = unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal || !unsigned.bytes().any(|b| b.is_ascii_digit()) {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn radix_literal(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut value = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * f64::from(radix) + f64::from(d),
            None => return f64::NAN,
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_is_clamped_and_never_one() {
        let config = EngineConfig::DEFAULT;
        for input in [-5.0, 1.0, 2.0, f64::INFINITY, f64::NEG_INFINITY] {
            let force = config.normalize_force(Some(input));
            assert!((0.0..=0.999).contains(&force), "force {force} out of range");
            assert!(force < 1.0, "force must never reach 1");
        }
        assert_eq!(config.normalize_force(Some(-5.0)), 0.0);
        assert_eq!(config.normalize_force(Some(2.0)), 0.999);
        assert_eq!(config.normalize_force(Some(0.25)), 0.25);
    }

    #[test]
    fn missing_or_nan_force_uses_default() {
        let config = EngineConfig::DEFAULT;
        assert_eq!(config.normalize_force(None), 0.1);
        assert_eq!(config.normalize_force(Some(f64::NAN)), 0.1);
    }

    #[test]
    fn distance_passes_through_including_negative() {
        let config = EngineConfig::DEFAULT;
        assert_eq!(config.normalize_distance(Some(-2.5)), -2.5);
        assert_eq!(config.normalize_distance(Some(0.0)), 0.0);
        assert_eq!(config.normalize_distance(Some(40.0)), 40.0);
        assert_eq!(config.normalize_distance(None), 1.0);
        assert_eq!(config.normalize_distance(Some(f64::NAN)), 1.0);
    }

    #[test]
    fn coerce_accepts_number_syntax() {
        assert_eq!(coerce_number("0.5"), 0.5);
        assert_eq!(coerce_number("  -3 "), -3.0);
        assert_eq!(coerce_number("+2e1"), 20.0);
        assert_eq!(coerce_number(".25"), 0.25);
        assert_eq!(coerce_number("5."), 5.0);
        assert_eq!(coerce_number("0x1F"), 31.0);
        assert_eq!(coerce_number("0b101"), 5.0);
        assert_eq!(coerce_number("0o17"), 15.0);
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn coerce_empty_is_zero() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("   "), 0.0);
    }

    #[test]
    fn coerce_rejects_garbage() {
        for text in ["x", "1px", "inf", "NaN", "infinity", "-0x10", "0x", "1e", "--1", "."] {
            assert!(coerce_number(text).is_nan(), "{text:?} should be NaN");
        }
    }
}
