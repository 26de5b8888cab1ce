//! Parameter initialisation.
//!
//! Values are sampled on the host with `rand` and uploaded to the target
//! device, so a seeded RNG gives identical parameters on every device.

use crate::error::SeaDlError;
use candle_core::{DType, Device, Tensor};
use num_traits::Float;
use rand::Rng;
use rand_distr::uniform::SampleUniform;
use rand_distr::{Distribution, Normal, StandardNormal, Uniform};

fn ensure_float(dtype: DType, operation: &str) -> Result<(), SeaDlError> {
    if dtype.is_float() {
        Ok(())
    } else {
        Err(SeaDlError::invalid_config(
            operation,
            format!("parameters must use a float dtype, got {:?}", dtype),
        ))
    }
}

fn checked_numel(shape: &[usize], operation: &str) -> Result<usize, SeaDlError> {
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| {
            SeaDlError::invalid_config(operation, format!("shape {:?} overflows usize", shape))
        })
}

fn sample_uniform<T, R>(low: T, high: T, n: usize, rng: &mut R) -> Result<Vec<T>, SeaDlError>
where
    T: Float + SampleUniform + std::fmt::Debug,
    R: Rng + ?Sized,
{
    // Checked in the sampling type: f64 bounds may overflow once cast to f32.
    if !low.is_finite() || !high.is_finite() || !(high - low).is_finite() {
        return Err(SeaDlError::invalid_config(
            "init::uniform",
            format!(
                "bounds must be finite with a finite width, got [{:?}, {:?}]",
                low, high
            ),
        ));
    }
    if low == high {
        return Ok(vec![low; n]);
    }
    // Reversed bounds describe the same interval.
    let (lo, hi) = if low < high { (low, high) } else { (high, low) };
    let dist = Uniform::new(lo, hi);
    Ok((0..n).map(|_| dist.sample(rng)).collect())
}

fn sample_normal<T, R>(mean: T, std: T, n: usize, rng: &mut R) -> Result<Vec<T>, SeaDlError>
where
    T: Float,
    StandardNormal: Distribution<T>,
    R: Rng + ?Sized,
{
    if !mean.is_finite() || !std.is_finite() {
        return Err(SeaDlError::invalid_config(
            "init::normal",
            "mean and std must be finite",
        ));
    }
    let dist = Normal::new(mean, std)
        .map_err(|e| SeaDlError::invalid_config("init::normal", e.to_string()))?;
    Ok((0..n).map(|_| dist.sample(rng)).collect())
}

/// Tensor of `shape` drawn from `U(low, high)`.
///
/// F64 tensors are sampled in f64; every other float dtype is sampled in f32
/// and cast.
pub fn uniform<R: Rng + ?Sized>(
    low: f64,
    high: f64,
    shape: &[usize],
    dtype: DType,
    device: &Device,
    rng: &mut R,
) -> Result<Tensor, SeaDlError> {
    ensure_float(dtype, "init::uniform")?;
    let n = checked_numel(shape, "init::uniform")?;
    let tensor = match dtype {
        DType::F64 => Tensor::from_vec(sample_uniform(low, high, n, rng)?, shape, device)?,
        _ => Tensor::from_vec(sample_uniform(low as f32, high as f32, n, rng)?, shape, device)?
            .to_dtype(dtype)?,
    };
    Ok(tensor)
}

/// Tensor of `shape` drawn from `N(mean, std^2)`.
pub fn normal<R: Rng + ?Sized>(
    mean: f64,
    std: f64,
    shape: &[usize],
    dtype: DType,
    device: &Device,
    rng: &mut R,
) -> Result<Tensor, SeaDlError> {
    ensure_float(dtype, "init::normal")?;
    let n = checked_numel(shape, "init::normal")?;
    let tensor = match dtype {
        DType::F64 => Tensor::from_vec(sample_normal(mean, std, n, rng)?, shape, device)?,
        _ => Tensor::from_vec(sample_normal(mean as f32, std as f32, n, rng)?, shape, device)?
            .to_dtype(dtype)?,
    };
    Ok(tensor)
}

/// `sqrt(1 / fan_in)`, the bound used by [`fan_in_uniform`].
pub fn fan_in_bound(fan_in: usize) -> Result<f64, SeaDlError> {
    if fan_in == 0 {
        return Err(SeaDlError::invalid_config(
            "init::fan_in_bound",
            "fan-in must be > 0",
        ));
    }
    Ok((1.0 / fan_in as f64).sqrt())
}

/// `U(-sqrt(1/fan_in), sqrt(1/fan_in))`: the default initialisation of
/// linear and convolution weights and biases.
pub fn fan_in_uniform<R: Rng + ?Sized>(
    shape: &[usize],
    fan_in: usize,
    dtype: DType,
    device: &Device,
    rng: &mut R,
) -> Result<Tensor, SeaDlError> {
    let bound = fan_in_bound(fan_in)?;
    uniform(-bound, bound, shape, dtype, device, rng)
}

pub fn zeros(shape: &[usize], dtype: DType, device: &Device) -> Result<Tensor, SeaDlError> {
    ensure_float(dtype, "init::zeros")?;
    Ok(Tensor::zeros(shape, dtype, device)?)
}

pub fn ones(shape: &[usize], dtype: DType, device: &Device) -> Result<Tensor, SeaDlError> {
    ensure_float(dtype, "init::ones")?;
    Ok(Tensor::ones(shape, dtype, device)?)
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
