use approx::abs_diff_eq;
use candle_core::{DType, Tensor};

fn to_f32_vec(tensor: &Tensor) -> Vec<f32> {
    tensor
        .to_dtype(DType::F32)
        .and_then(|t| t.flatten_all())
        .and_then(|t| t.to_vec1::<f32>())
        .expect("Failed to read tensor data as f32")
}

/// Checks that a tensor has the expected shape and that its data is within
/// `tolerance` of `expected_data` (compared as f32, row-major).
/// Panics on the first mismatch.
pub fn check_tensor_near(
    actual: &Tensor,
    expected_shape: &[usize],
    expected_data: &[f32],
    tolerance: f32,
) {
    assert_eq!(actual.dims(), expected_shape, "Shape mismatch");

    let actual_data = to_f32_vec(actual);
    assert_eq!(
        actual_data.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data.iter().zip(expected_data.iter()).enumerate() {
        if !abs_diff_eq!(*a, *e, epsilon = tolerance) {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i,
                a,
                e,
                (a - e).abs(),
                tolerance
            );
        }
    }
}

/// Checks that two tensors have the same shape and element-wise close values.
pub fn assert_tensors_close(actual: &Tensor, expected: &Tensor, tolerance: f32) {
    let expected_data = to_f32_vec(expected);
    check_tensor_near(actual, expected.dims(), &expected_data, tolerance);
}
