use log::trace;
use ndarray::{Array1, Array2, Array4, ArrayView3, Axis, linalg::general_mat_mul};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{Add, ConvBn, Fc, GraphBuilder, GraphErr};
use crate::init::ParamInit;

const BN_EPSILON: f32 = 1e-5;

/// A `GraphBuilder` that eagerly runs the forward pass of the network on `NCHW` batches.
///
/// Every primitive call creates fresh parameters: convolutions are Kaiming initialized, the
/// normalization starts with unit scale and zero shift and normalizes with the statistics of
/// the current batch.
pub struct Executor<R: Rng> {
    rng: R,
    params: usize,
}

impl Executor<StdRng> {
    /// Creates a new `Executor` with a reproducible generator.
    ///
    /// # Arguments
    /// * `seed` - The seed of the parameter generator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Executor<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, params: 0 }
    }

    /// Returns the amount of parameters created so far.
    pub fn params(&self) -> usize {
        self.params
    }

    fn init(&mut self, name: &str, init: ParamInit, n: usize) -> Result<Vec<f32>, GraphErr> {
        self.params += n;
        init.sample(&mut self.rng, n)
            .map_err(|source| GraphErr::Init {
                name: name.to_string(),
                source,
            })
    }

    /// Unfolds every receptive field of `x` into a column so the convolution becomes a single
    /// matrix product.
    fn im2col(x: ArrayView3<f32>, layer: &ConvBn, (oh, ow): (usize, usize)) -> Array2<f32> {
        let (channels, h, w) = x.dim();
        let k = layer.filter_size;
        let pad = layer.padding();
        let stride = layer.stride;

        let mut cols = Array2::zeros((channels * k * k, oh * ow));
        for c in 0..channels {
            for ky in 0..k {
                for kx in 0..k {
                    let row = (c * k + ky) * k + kx;

                    for oy in 0..oh {
                        let Some(iy) = (oy * stride + ky).checked_sub(pad).filter(|&iy| iy < h)
                        else {
                            continue;
                        };

                        for ox in 0..ow {
                            let Some(ix) =
                                (ox * stride + kx).checked_sub(pad).filter(|&ix| ix < w)
                            else {
                                continue;
                            };

                            cols[[row, oy * ow + ox]] = x[[c, iy, ix]];
                        }
                    }
                }
            }
        }

        cols
    }

    fn batch_norm(&mut self, x: &mut Array4<f32>, name: &str) -> Result<(), GraphErr> {
        let channels = x.dim().1;
        let scale = self.init(name, ParamInit::Const { value: 1. }, channels)?;
        let shift = self.init(name, ParamInit::Const { value: 0. }, channels)?;

        for (mut ch, (&gamma, &beta)) in x.axis_iter_mut(Axis(1)).zip(scale.iter().zip(&shift)) {
            let mean = ch.mean().unwrap_or_default();
            let var = ch.mapv(|v| (v - mean).powi(2)).mean().unwrap_or_default();
            let std = (var + BN_EPSILON).sqrt();
            ch.mapv_inplace(|v| (v - mean) / std * gamma + beta);
        }

        Ok(())
    }
}

impl<R: Rng> GraphBuilder for Executor<R> {
    type Tensor = Array4<f32>;
    type Error = GraphErr;

    fn conv_bn(&mut self, input: &Array4<f32>, layer: &ConvBn) -> Result<Array4<f32>, GraphErr> {
        if input.is_empty() {
            return Err(GraphErr::EmptyInput {
                name: layer.name.clone(),
            });
        }

        let (n, channels, h, w) = input.dim();
        let (oh, ow) = (layer.out_size(h), layer.out_size(w));
        let k = layer.filter_size;
        let fan_in = channels * k * k;
        let cout = layer.num_filters;

        let weights = self.init(&layer.name, ParamInit::Kaiming { fan_in }, cout * fan_in)?;
        let weights = Array2::from_shape_vec((cout, fan_in), weights)?;

        let mut out = Array4::zeros((n, cout, oh, ow));
        let mut res = Array2::zeros((cout, oh * ow));
        for (sample, mut dst) in input.outer_iter().zip(out.outer_iter_mut()) {
            let cols = Self::im2col(sample, layer, (oh, ow));
            general_mat_mul(1., &weights, &cols, 0., &mut res);
            dst.assign(&res.view().into_shape_with_order((cout, oh, ow))?);
        }

        self.batch_norm(&mut out, &layer.name)?;
        if let Some(act) = layer.act {
            out.mapv_inplace(|v| act.f(v));
        }

        trace!("{}: {:?} -> {:?}", layer.name, input.dim(), out.dim());
        Ok(out)
    }

    fn add(
        &mut self,
        x: &Array4<f32>,
        y: &Array4<f32>,
        layer: &Add,
    ) -> Result<Array4<f32>, GraphErr> {
        if x.shape() != y.shape() {
            return Err(GraphErr::ShapeMismatch {
                name: layer.name.clone(),
                lhs: x.shape().to_vec(),
                rhs: y.shape().to_vec(),
            });
        }

        let mut z = x + y;
        if let Some(act) = layer.act {
            z.mapv_inplace(|v| act.f(v));
        }

        Ok(z)
    }

    fn fc(&mut self, input: &Array4<f32>, layer: &Fc) -> Result<Array4<f32>, GraphErr> {
        if input.is_empty() {
            return Err(GraphErr::EmptyInput {
                name: layer.name.clone(),
            });
        }

        let n = input.dim().0;
        let features = input.len() / n;
        let flat = input.to_owned().into_shape_with_order((n, features))?;

        let weights = self.init(&layer.name, layer.weight_init, features * layer.size)?;
        let weights = Array2::from_shape_vec((features, layer.size), weights)?;
        let bias = Array1::from(self.init(&layer.name, layer.bias_init, layer.size)?);

        let out = flat.dot(&weights) + &bias;
        Ok(out.into_shape_with_order((n, layer.size, 1, 1))?)
    }
}
