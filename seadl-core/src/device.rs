use candle_core::{utils, Device, Tensor};
use log::{info, warn};

use crate::error::SeaDlError;

/// Picks the device layers are placed on when none is requested.
///
/// Accelerators are preferred: the first CUDA device, then the first Metal
/// device, then the CPU. Failing to open an advertised accelerator is not an
/// error; the CPU is used instead.
pub fn default_device() -> Device {
    if utils::cuda_is_available() {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("Using CUDA device 0");
                return device;
            }
            Err(e) => warn!("CUDA reported as available but device 0 failed to open: {}", e),
        }
    }
    if utils::metal_is_available() {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Using Metal device 0");
                return device;
            }
            Err(e) => warn!("Metal reported as available but device 0 failed to open: {}", e),
        }
    }
    info!("No accelerator available, using CPU");
    Device::Cpu
}

/// Returns the requested device, or [`default_device`] when `None`.
pub fn resolve_device(requested: Option<&Device>) -> Device {
    match requested {
        Some(device) => device.clone(),
        None => default_device(),
    }
}

/// Fails with [`SeaDlError::DeviceMismatch`] if `actual` does not live on the
/// same device as `expected`.
pub fn ensure_same_device(
    expected: &Tensor,
    actual: &Tensor,
    operation: &str,
) -> Result<(), SeaDlError> {
    if expected.device().same_device(actual.device()) {
        Ok(())
    } else {
        Err(SeaDlError::DeviceMismatch {
            expected: expected.device().location(),
            actual: actual.device().location(),
            operation: operation.to_string(),
        })
    }
}
