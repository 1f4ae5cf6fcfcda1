mod error;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

pub use error::InitErr;

/// How the parameters of a layer are initialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamInit {
    Const { value: f32 },
    Normal { mean: f32, std_dev: f32 },
    Kaiming { fan_in: usize },
}

impl ParamInit {
    /// Samples `n` parameters following this initializer.
    ///
    /// # Arguments
    /// * `rng` - The random number generator to sample with.
    /// * `n` - The amount of parameters to generate.
    ///
    /// # Returns
    /// The generated parameters or an error if the distribution is invalid (a non finite or
    /// negative standard deviation, or a zero `fan_in`).
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Result<Vec<f32>, InitErr> {
        match *self {
            ParamInit::Const { value } => Ok(vec![value; n]),
            ParamInit::Normal { mean, std_dev } => Self::sample_normal(rng, n, mean, std_dev),
            ParamInit::Kaiming { fan_in } => {
                if fan_in == 0 {
                    return Err(InitErr::new("kaiming initialization needs a positive fan_in"));
                }

                let std_dev = (2. / fan_in as f32).sqrt();
                Self::sample_normal(rng, n, 0., std_dev)
            }
        }
    }

    fn sample_normal<R: Rng + ?Sized>(
        rng: &mut R,
        n: usize,
        mean: f32,
        std_dev: f32,
    ) -> Result<Vec<f32>, InitErr> {
        if std_dev < 0. {
            return Err(InitErr::new("normal std_dev must be non-negative"));
        }

        let distribution = Normal::new(mean, std_dev)?;
        Ok((0..n).map(|_| distribution.sample(rng)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn constant() {
        let init = ParamInit::Const { value: 0. };
        assert_eq!(init.sample(&mut seeded_rng(), 4).unwrap(), vec![0.; 4]);
    }

    #[test]
    fn empty() {
        let init = ParamInit::Normal {
            mean: 0.,
            std_dev: 1.,
        };
        assert!(init.sample(&mut seeded_rng(), 0).unwrap().is_empty());
    }

    #[test]
    fn normal_is_reproducible() {
        let init = ParamInit::Normal {
            mean: 0.,
            std_dev: 0.01,
        };

        let a = init.sample(&mut seeded_rng(), 16).unwrap();
        let b = init.sample(&mut seeded_rng(), 16).unwrap();

        assert_eq!(a, b);
        assert!(a.iter().all(|x| x.abs() < 0.1));
    }

    #[test]
    fn invalid_std_dev() {
        let init = ParamInit::Normal {
            mean: 0.,
            std_dev: f32::NAN,
        };
        assert!(init.sample(&mut seeded_rng(), 1).is_err());
    }

    #[test]
    fn negative_std_dev() {
        let init = ParamInit::Normal {
            mean: 0.,
            std_dev: -1.,
        };
        assert!(init.sample(&mut seeded_rng(), 1).is_err());
    }

    #[test]
    fn kaiming_zero_fan_in() {
        let init = ParamInit::Kaiming { fan_in: 0 };
        assert!(init.sample(&mut seeded_rng(), 1).is_err());
    }
}
