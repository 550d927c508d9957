//! Binary symmetric channel model and bit-flip noise generation

use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

use crate::{Bit, Error};

/// Mapping from a received bit vector to initial LLR values for the decoder
pub trait LlrChannel {
    /// Returns one LLR value per received bit, with positive values indicating that `Zero` is
    /// more likely.
    fn llrs(&self, received: &[Bit]) -> Vec<f64>;
}

/// Binary symmetric channel with a given crossover probability
#[derive(Clone, Debug, Copy)]
pub struct Bsc {
    /// Probability that a transmitted bit is flipped
    crossover_prob: f64,
    /// Per-bit flip distribution
    flip_dist: Bernoulli,
}

impl Bsc {
    /// Returns binary symmetric channel with given crossover probability.
    ///
    /// # Parameters
    ///
    /// - `crossover_prob`: Probability that a transmitted bit is flipped. Must be strictly
    ///   between `0` and `1`; at the boundaries the LLR values would be undefined.
    ///
    /// # Errors
    ///
    /// Returns an error if `crossover_prob` is not in the open interval `(0, 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ldpc_bp::Bsc;
    ///
    /// let bsc = Bsc::new(0.02)?;
    /// assert!(Bsc::new(0.0).is_err());
    /// assert!(Bsc::new(1.0).is_err());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(crossover_prob: f64) -> Result<Self, Error> {
        if !(crossover_prob > 0.0 && crossover_prob < 1.0) {
            return Err(Error::InvalidInput(format!(
                "Crossover probability must be in the open interval (0, 1), found {crossover_prob}",
            )));
        }
        let flip_dist = Bernoulli::new(crossover_prob).map_err(|_| {
            Error::InvalidInput(format!(
                "Invalid crossover probability {crossover_prob}",
            ))
        })?;
        Ok(Self {
            crossover_prob,
            flip_dist,
        })
    }

    /// Returns crossover probability.
    #[must_use]
    pub fn crossover_prob(&self) -> f64 {
        self.crossover_prob
    }

    /// Returns the given bits with each one independently flipped with the crossover probability.
    ///
    /// # Parameters
    ///
    /// - `bits`: Bits to be transmitted over the channel.
    ///
    /// - `rng`: Random number generator to be used.
    pub fn flip<R: Rng + ?Sized>(&self, bits: &[Bit], rng: &mut R) -> Vec<Bit> {
        bits.iter()
            .map(|&bit| {
                if self.flip_dist.sample(rng) {
                    bit.flipped()
                } else {
                    bit
                }
            })
            .collect()
    }
}

impl LlrChannel for Bsc {
    /// Returns LLR values at the channel output corresponding to the received bits.
    ///
    /// A received `Zero` maps to `ln((1 - p) / p)` and a received `One` to `ln(p / (1 - p))`,
    /// where `p` is the crossover probability.
    fn llrs(&self, received: &[Bit]) -> Vec<f64> {
        let p = self.crossover_prob;
        let llr_for_zero = ((1.0 - p) / p).ln();
        received
            .iter()
            .map(|&bit| match bit {
                Bit::Zero => llr_for_zero,
                Bit::One => -llr_for_zero,
            })
            .collect()
    }
}

/// Returns the given bits with exactly the given number of distinct positions flipped.
///
/// # Parameters
///
/// - `bits`: Bits to be transmitted over the channel.
///
/// - `num_errors`: Number of distinct positions to flip.
///
/// - `rng`: Random number generator to be used.
///
/// # Errors
///
/// Returns an error if `num_errors` exceeds `bits.len()`.
pub fn flip_fixed_count<R: Rng + ?Sized>(
    bits: &[Bit],
    num_errors: usize,
    rng: &mut R,
) -> Result<Vec<Bit>, Error> {
    if num_errors > bits.len() {
        return Err(Error::InvalidInput(format!(
            "Cannot flip {num_errors} distinct positions in a sequence of length {}",
            bits.len()
        )));
    }
    let mut out = bits.to_vec();
    for index in rand::seq::index::sample(rng, bits.len(), num_errors) {
        out[index] = out[index].flipped();
    }
    Ok(out)
}

#[cfg(test)]
mod tests_of_bsc {
    use float_eq::assert_float_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::utils;
    use Bit::{One, Zero};

    #[test]
    fn test_new() {
        // Invalid input
        assert!(Bsc::new(0.0).is_err());
        assert!(Bsc::new(1.0).is_err());
        assert!(Bsc::new(-0.1).is_err());
        assert!(Bsc::new(1.5).is_err());
        assert!(Bsc::new(f64::NAN).is_err());
        // Valid input
        let bsc = Bsc::new(0.02).unwrap();
        assert_float_eq!(bsc.crossover_prob(), 0.02, abs <= 1e-12);
    }

    #[test]
    fn test_llrs() {
        let bsc = Bsc::new(0.2).unwrap();
        let llrs = bsc.llrs(&[Zero, One, Zero]);
        let expected = 4f64.ln();
        assert_float_eq!(llrs, vec![expected, -expected, expected], abs_all <= 1e-12);
        assert!(bsc.llrs(&[]).is_empty());
    }

    #[test]
    fn test_flip_statistics() {
        let mut rng = StdRng::seed_from_u64(7);
        let bsc = Bsc::new(0.1).unwrap();
        let bits = vec![Zero; 10000];
        let noisy = bsc.flip(&bits, &mut rng);
        let num_flips = utils::error_count(&noisy, &bits);
        assert!(num_flips > 700 && num_flips < 1300);
    }

    #[test]
    fn test_flip_reproducibility() {
        let bsc = Bsc::new(0.3).unwrap();
        let bits = vec![Zero; 100];
        let first = bsc.flip(&bits, &mut StdRng::seed_from_u64(42));
        let second = bsc.flip(&bits, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_flip_fixed_count() {
        let mut rng = StdRng::seed_from_u64(11);
        let bits = vec![Zero; 50];
        // Invalid input
        assert!(flip_fixed_count(&bits, 51, &mut rng).is_err());
        // Valid input
        for num_errors in [0, 1, 5, 50] {
            let noisy = flip_fixed_count(&bits, num_errors, &mut rng).unwrap();
            assert_eq!(utils::error_count(&noisy, &bits), num_errors);
        }
    }
}
