/// Round to a fixed number of decimal places (half away from zero).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(round_to(5.12345, 2), 5.12);
        assert_eq!(round_to(2.98765, 2), 2.99);
        assert_eq!(round_to(-3.456, 1), -3.5);
        assert_eq!(round_to(123.456_789_4, 6), 123.456789);
        assert_eq!(round_to(7.5, 0), 8.0);
    }
}
