//! Delta computation and power-of-ten divisor normalization.

use crate::constants::pow10;
use crate::varint::zigzag_encode;

/// A timestamp sequence reduced to its first value and scaled deltas
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Normalized {
    /// First timestamp, unscaled
    pub first: i64,
    /// Decimal exponent of the divisor
    pub exponent: u8,
    /// `(ts[i + 1] - ts[i]) / 10^exponent`, wrapping on 64-bit overflow
    pub deltas: Vec<i64>,
}

impl Normalized {
    #[inline]
    pub fn divisor(&self) -> i64 {
        pow10(self.exponent)
    }

    /// True when every scaled delta equals the first (vacuously true below two deltas)
    pub fn is_arithmetic(&self) -> bool {
        self.deltas.windows(2).all(|w| w[0] == w[1])
    }

    /// Zigzag-mapped deltas, ready for packing
    pub fn zigzag_deltas(&self) -> Vec<u64> {
        self.deltas.iter().map(|&d| zigzag_encode(d)).collect()
    }
}

/// Reduce `ts` to `(first, exponent, scaled deltas)`
///
/// Returns `None` for an empty sequence. A single timestamp has divisor 1.
pub(crate) fn normalize(ts: &[i64], max_exp: u8) -> Option<Normalized> {
    let (&first, _) = ts.split_first()?;

    let mut deltas: Vec<i64> = ts.windows(2).map(|w| w[1].wrapping_sub(w[0])).collect();
    let exponent = if deltas.is_empty() { 0 } else { common_exponent(&deltas, max_exp) };

    if exponent > 0 {
        let divisor = pow10(exponent);
        for d in &mut deltas {
            *d /= divisor;
        }
    }

    Some(Normalized { first, exponent, deltas })
}

/// Largest `e <= max_exp` such that `10^e` divides every delta
///
/// Zero deltas are divisible by anything and never lower the result.
pub(crate) fn common_exponent(deltas: &[i64], max_exp: u8) -> u8 {
    let mut exp = max_exp;
    for &d in deltas {
        if exp == 0 {
            break;
        }
        while exp > 0 && d % pow10(exp) != 0 {
            exp -= 1;
        }
    }
    exp
}
