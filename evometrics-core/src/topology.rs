//! Number of distinct labeled binary tree topologies over `n` taxa.
//!
//! Rooted trees: `(2n-3)!!` for `n >= 2`. Unrooted trees: `(2n-5)!!` for
//! `n >= 3`. Smaller inputs have no valid topology and yield zero. Counts
//! grow super-exponentially, so results are arbitrary precision.

use log::trace;
use num_bigint::BigUint;

/// Product of the odd numbers `1 * 3 * ... * k`.
fn odd_double_factorial(k: u64) -> BigUint {
    let mut acc = BigUint::from(1u8);
    let mut i = 3u64;
    while i <= k {
        acc *= i;
        i += 2;
    }
    acc
}

/// Largest factor `2n - offset` of the double factorial, computed in `u64`
/// so every `u32` taxon count fits.
fn last_factor(n: u32, offset: u64) -> u64 {
    2 * u64::from(n) - offset
}

pub fn count_rooted(n: u32) -> BigUint {
    if n < 2 {
        return BigUint::from(0u8);
    }
    trace!("counting rooted topologies for {n} taxa");
    odd_double_factorial(last_factor(n, 3))
}

pub fn count_unrooted(n: u32) -> BigUint {
    if n < 3 {
        return BigUint::from(0u8);
    }
    trace!("counting unrooted topologies for {n} taxa");
    odd_double_factorial(last_factor(n, 5))
}
