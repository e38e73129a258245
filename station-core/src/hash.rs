/// Stable, non-negative hash of a city name.
///
/// Folds the UTF-16 code units into a wrapping `i32` (`h * 31 + unit`) and
/// returns the absolute value. Not collision resistant.
pub fn city_hash(name: &str) -> u32 {
    name.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
        .unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_zero() {
        assert_eq!(city_hash(""), 0);
    }

    #[test]
    fn known_values() {
        assert_eq!(city_hash("a"), 97);
        assert_eq!(city_hash("ab"), 97 * 31 + 98);
        // The accumulator for "London" wraps negative.
        assert_eq!(city_hash("London"), 2_013_264_328);
        assert_eq!(city_hash("Berlin"), 1_986_302_914);
    }

    #[test]
    fn deterministic() {
        for name in ["Berlin", "São Paulo", "東京", "Your Location"] {
            assert_eq!(city_hash(name), city_hash(name));
        }
    }

    #[test]
    fn negative_accumulator_is_made_positive() {
        // The accumulator goes negative for this input.
        let raw = "Demo City"
            .encode_utf16()
            .fold(0i32, |h, u| h.wrapping_mul(31).wrapping_add(i32::from(u)));
        assert!(raw < 0);
        assert_eq!(city_hash("Demo City"), raw.unsigned_abs());
    }
}
