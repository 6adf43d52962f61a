// limit_core/src/types/decimal.rs
//
// Price and Quantity are plain aliases over `rust_decimal::Decimal`: exact base-10
// arithmetic, deterministic equality, and a total order, with none of the rounding
// surprises of binary floating point. Nothing on the matching hot path may construct
// or compare an `f32`/`f64`.

pub use rust_decimal::Decimal;

/// A limit price or trade execution price.
pub type Price = Decimal;

/// An order quantity, fill quantity, or trade quantity.
pub type Quantity = Decimal;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn exact_decimal_addition() {
        let a = Price::from_str("0.1").unwrap();
        let b = Price::from_str("0.2").unwrap();
        assert_eq!(a + b, Price::from_str("0.3").unwrap());
    }

    #[test]
    fn total_order_respected_by_min() {
        let a = Quantity::from_str("1.50").unwrap();
        let b = Quantity::from_str("1.5").unwrap();
        assert_eq!(a.min(b), b);
        assert_eq!(a, b);
    }
}
