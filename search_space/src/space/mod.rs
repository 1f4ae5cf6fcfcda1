mod resnet;

use std::fmt::Debug;

use rand::Rng;

use crate::{
    error::{Result, SearchSpaceErr},
    plan::Architecture,
};

pub use resnet::ResNetSpace;

/// A discrete family of architectures addressed by fixed length token vectors.
pub trait SearchSpace: Debug + Send + Sync {
    /// Returns the name the space is registered under.
    fn name(&self) -> &'static str;

    /// Returns the token vector a search starts from.
    fn init_tokens(&self) -> Vec<usize>;

    /// Returns the exclusive upper bound of every token position.
    fn range_table(&self) -> Vec<usize>;

    /// Decodes a token vector into an architecture.
    ///
    /// # Arguments
    /// * `tokens` - The tokens to decode, `None` decodes `init_tokens`.
    ///
    /// # Returns
    /// The decoded architecture or an error if the tokens don't fit the range table.
    fn token_to_arch(&self, tokens: Option<&[usize]>) -> Result<Architecture>;
}

/// Checks that `tokens` has exactly one token per range table entry and that each token is
/// below its bound.
///
/// # Arguments
/// * `tokens` - The token vector to check.
/// * `range_table` - The exclusive bound of every position.
///
/// # Returns
/// An error naming the first offending position.
pub fn validate_tokens(tokens: &[usize], range_table: &[usize]) -> Result<()> {
    if tokens.len() != range_table.len() {
        return Err(SearchSpaceErr::TokenLengthMismatch {
            got: tokens.len(),
            expected: range_table.len(),
        });
    }

    let offending = tokens
        .iter()
        .zip(range_table)
        .position(|(token, bound)| token >= bound);

    match offending {
        Some(position) => Err(SearchSpaceErr::TokenOutOfRange {
            position,
            token: tokens[position],
            bound: range_table[position],
        }),
        None => Ok(()),
    }
}

/// Samples a uniformly random token vector within `range_table`.
///
/// Every bound in `range_table` must be positive.
pub fn sample_tokens<R: Rng + ?Sized>(range_table: &[usize], rng: &mut R) -> Vec<usize> {
    range_table
        .iter()
        .map(|&bound| rng.random_range(0..bound))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn valid_tokens() {
        assert!(validate_tokens(&[0, 4, 6], &[1, 5, 7]).is_ok());
        assert!(validate_tokens(&[], &[]).is_ok());
    }

    #[test]
    fn length_mismatch() {
        assert_eq!(
            validate_tokens(&[0, 0, 0], &[7, 5]),
            Err(SearchSpaceErr::TokenLengthMismatch {
                got: 3,
                expected: 2
            })
        );
        assert_eq!(
            validate_tokens(&[0], &[7, 5]),
            Err(SearchSpaceErr::TokenLengthMismatch {
                got: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn first_offending_position() {
        assert_eq!(
            validate_tokens(&[0, 5, 9], &[7, 5, 6]),
            Err(SearchSpaceErr::TokenOutOfRange {
                position: 1,
                token: 5,
                bound: 5
            })
        );
    }

    #[test]
    fn samples_within_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let range_table = [7, 5, 7, 6, 6, 13, 5, 6];

        for _ in 0..100 {
            let tokens = sample_tokens(&range_table, &mut rng);
            assert!(validate_tokens(&tokens, &range_table).is_ok());
        }
    }
}
