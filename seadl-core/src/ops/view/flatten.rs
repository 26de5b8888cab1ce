use crate::error::SeaDlError;
use candle_core::Tensor;
use log::trace;

/// Resolves a possibly negative dimension index against `rank`.
///
/// `-1` is the last dimension, `-rank` the first.
pub fn normalize_dim(dim: isize, rank: usize, operation: &str) -> Result<usize, SeaDlError> {
    let resolved = if dim < 0 { dim + rank as isize } else { dim };
    if resolved < 0 || resolved >= rank as isize {
        return Err(SeaDlError::InvalidDimension {
            dim,
            rank,
            operation: operation.to_string(),
        });
    }
    Ok(resolved as usize)
}

/// Merges the dimensions `start_dim..=end_dim` of `input` into one.
///
/// Negative indices count from the end. A rank-0 tensor flattens to shape `[1]`.
pub fn flatten_op(input: &Tensor, start_dim: isize, end_dim: isize) -> Result<Tensor, SeaDlError> {
    let dims = input.dims();
    if dims.is_empty() {
        return Ok(input.reshape(1)?);
    }
    let start = normalize_dim(start_dim, dims.len(), "flatten_op")?;
    let end = normalize_dim(end_dim, dims.len(), "flatten_op")?;
    if start > end {
        return Err(SeaDlError::InvalidDimension {
            dim: start_dim,
            rank: dims.len(),
            operation: format!("flatten_op (start_dim after end_dim {})", end_dim),
        });
    }

    let merged: usize = dims[start..=end].iter().product();
    let mut new_dims = Vec::with_capacity(dims.len() - (end - start));
    new_dims.extend_from_slice(&dims[..start]);
    new_dims.push(merged);
    new_dims.extend_from_slice(&dims[end + 1..]);

    trace!("flatten_op: {:?} -> {:?}", dims, new_dims);
    Ok(input.reshape(new_dims)?)
}
