// SPDX-License-Identifier: Apache-2.0

//! # findx dispatch layer
//!
//! Chooses between the scalar implementation and hardware-accelerated
//! backends (SIMD and, when enabled, CUDA) based on target capabilities and
//! input sizes. One public function per element type and operation; the tier
//! walk lives once per type in a private `first_match_*` dispatcher shared by
//! `find`/`find_if`/`find_if_not` (they differ only in the predicate table).

use log::trace;

use crate::constants::*;
use crate::search;
use crate::types::{Bound, CmpOp, Result};

#[cfg(target_arch = "aarch64")]
use std::arch::is_aarch64_feature_detected;

#[cfg(has_cuda)]
use crate::gpu;

// =============================================================================
//  HARDWARE DETECTION
// =============================================================================

/// Hardware capability detection used by the findx dispatch layer
pub struct HardwareCapabilities {
    pub has_avx2: bool,
    pub has_neon: bool,
    pub has_cuda: bool,
}

impl HardwareCapabilities {
    #[inline]
    pub fn detect() -> Self {
        HardwareCapabilities {
            has_avx2: Self::detect_avx2(),
            has_neon: Self::detect_neon(),
            has_cuda: Self::detect_cuda(),
        }
    }

    fn detect_avx2() -> bool {
        #[allow(unused_mut)]
        let mut detected_avx2 = false;

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        if is_x86_feature_detected!("avx2") {
            detected_avx2 = true;
        }

        detected_avx2
    }

    fn detect_neon() -> bool {
        #[allow(unused_mut)]
        let mut detected_neon = false;

        #[cfg(target_arch = "aarch64")]
        if is_aarch64_feature_detected!("neon") {
            detected_neon = true;
        }

        detected_neon
    }

    fn detect_cuda() -> bool {
        // Static atomic for one-time detection and caching
        use std::sync::atomic::{AtomicU8, Ordering};
        static CUDA_DETECTED: AtomicU8 = AtomicU8::new(2); // 2 = unknown, 1 = true, 0 = false

        let cached = CUDA_DETECTED.load(Ordering::Relaxed);
        if cached != 2 {
            return cached == 1;
        }

        #[cfg(has_cuda)]
        let has_cuda = crate::gpu::ensure_cuda_initialized().is_ok();
        #[cfg(not(has_cuda))]
        let has_cuda = false;

        CUDA_DETECTED.store(if has_cuda { 1 } else { 0 }, Ordering::Relaxed);
        has_cuda
    }
}

/// Get information about available hardware capabilities
#[inline]
pub fn get_hw_capabilities() -> HardwareCapabilities {
    HardwareCapabilities::detect()
}

/// Which execution tiers a dispatcher may use.
///
/// `Auto` is the normal threshold walk. `Host` never stages to the device.
/// `Device` prefers the device unconditionally and falls back to the scalar
/// reference only when no device is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Auto,
    Host,
    Device,
}

// =============================================================================
//  PER-TYPE TIERED DISPATCHERS
// =============================================================================
//
// Shape shared by all types: empty early return, forced-device handling,
// scalar below SIMD_THRESHOLD_FIND, CUDA above GPU_THRESHOLD_FIND, SIMD for
// the integer widths that have lane kernels, scalar tail otherwise.

pub(crate) fn first_match_u32(
    arr: &[u32],
    value: u32,
    table: u32,
    backend: Backend,
) -> Result<usize> {
    let len = arr.len();
    if len == 0 {
        return Ok(0);
    }

    if backend == Backend::Device {
        #[cfg(has_cuda)]
        if get_hw_capabilities().has_cuda {
            return gpu_first_match_u32(arr, value, table);
        }
        return Ok(search::first_match_scalar(arr, value, table));
    }

    if len < SIMD_THRESHOLD_FIND {
        return Ok(search::first_match_scalar(arr, value, table));
    }

    #[cfg(has_cuda)]
    if backend == Backend::Auto && len >= GPU_THRESHOLD_FIND && get_hw_capabilities().has_cuda {
        return gpu_first_match_u32(arr, value, table);
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if get_hw_capabilities().has_avx2 {
        return Ok(unsafe { search::first_match_u32_avx2(arr, value, table) });
    }

    #[cfg(target_arch = "aarch64")]
    if get_hw_capabilities().has_neon {
        return Ok(unsafe { search::first_match_u32_neon(arr, value, table) });
    }

    Ok(search::first_match_scalar(arr, value, table))
}

#[cfg(has_cuda)]
fn gpu_first_match_u32(arr: &[u32], value: u32, table: u32) -> Result<usize> {
    let len = arr.len();
    let idx = unsafe {
        gpu::with_gpu_buffer_find(
            arr.as_ptr() as *const std::ffi::c_void,
            std::mem::size_of_val(arr),
            len,
            |d_data, n, d_result| search::first_match_u32_gpu(d_data, value, table, n, d_result),
        )?
    };
    Ok(idx as usize)
}

pub(crate) fn first_match_i32(
    arr: &[i32],
    value: i32,
    table: u32,
    backend: Backend,
) -> Result<usize> {
    let len = arr.len();
    if len == 0 {
        return Ok(0);
    }

    if backend == Backend::Device {
        #[cfg(has_cuda)]
        if get_hw_capabilities().has_cuda {
            return gpu_first_match_i32(arr, value, table);
        }
        return Ok(search::first_match_scalar(arr, value, table));
    }

    if len < SIMD_THRESHOLD_FIND {
        return Ok(search::first_match_scalar(arr, value, table));
    }

    #[cfg(has_cuda)]
    if backend == Backend::Auto && len >= GPU_THRESHOLD_FIND && get_hw_capabilities().has_cuda {
        return gpu_first_match_i32(arr, value, table);
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if get_hw_capabilities().has_avx2 {
        return Ok(unsafe { search::first_match_i32_avx2(arr, value, table) });
    }

    #[cfg(target_arch = "aarch64")]
    if get_hw_capabilities().has_neon {
        return Ok(unsafe { search::first_match_i32_neon(arr, value, table) });
    }

    Ok(search::first_match_scalar(arr, value, table))
}

#[cfg(has_cuda)]
fn gpu_first_match_i32(arr: &[i32], value: i32, table: u32) -> Result<usize> {
    let len = arr.len();
    let idx = unsafe {
        gpu::with_gpu_buffer_find(
            arr.as_ptr() as *const std::ffi::c_void,
            std::mem::size_of_val(arr),
            len,
            |d_data, n, d_result| search::first_match_i32_gpu(d_data, value, table, n, d_result),
        )?
    };
    Ok(idx as usize)
}

pub(crate) fn first_match_u64(
    arr: &[u64],
    value: u64,
    table: u32,
    backend: Backend,
) -> Result<usize> {
    let len = arr.len();
    if len == 0 {
        return Ok(0);
    }

    if backend == Backend::Device {
        #[cfg(has_cuda)]
        if get_hw_capabilities().has_cuda {
            return gpu_first_match_u64(arr, value, table);
        }
        return Ok(search::first_match_scalar(arr, value, table));
    }

    if len < SIMD_THRESHOLD_FIND {
        return Ok(search::first_match_scalar(arr, value, table));
    }

    #[cfg(has_cuda)]
    if backend == Backend::Auto && len >= GPU_THRESHOLD_FIND && get_hw_capabilities().has_cuda {
        return gpu_first_match_u64(arr, value, table);
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if get_hw_capabilities().has_avx2 {
        return Ok(unsafe { search::first_match_u64_avx2(arr, value, table) });
    }

    #[cfg(target_arch = "aarch64")]
    if get_hw_capabilities().has_neon {
        return Ok(unsafe { search::first_match_u64_neon(arr, value, table) });
    }

    Ok(search::first_match_scalar(arr, value, table))
}

#[cfg(has_cuda)]
fn gpu_first_match_u64(arr: &[u64], value: u64, table: u32) -> Result<usize> {
    let len = arr.len();
    let idx = unsafe {
        gpu::with_gpu_buffer_find(
            arr.as_ptr() as *const std::ffi::c_void,
            std::mem::size_of_val(arr),
            len,
            |d_data, n, d_result| search::first_match_u64_gpu(d_data, value, table, n, d_result),
        )?
    };
    Ok(idx as usize)
}

pub(crate) fn first_match_i64(
    arr: &[i64],
    value: i64,
    table: u32,
    backend: Backend,
) -> Result<usize> {
    let len = arr.len();
    if len == 0 {
        return Ok(0);
    }

    if backend == Backend::Device {
        #[cfg(has_cuda)]
        if get_hw_capabilities().has_cuda {
            return gpu_first_match_i64(arr, value, table);
        }
        return Ok(search::first_match_scalar(arr, value, table));
    }

    if len < SIMD_THRESHOLD_FIND {
        return Ok(search::first_match_scalar(arr, value, table));
    }

    #[cfg(has_cuda)]
    if backend == Backend::Auto && len >= GPU_THRESHOLD_FIND && get_hw_capabilities().has_cuda {
        return gpu_first_match_i64(arr, value, table);
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if get_hw_capabilities().has_avx2 {
        return Ok(unsafe { search::first_match_i64_avx2(arr, value, table) });
    }

    #[cfg(target_arch = "aarch64")]
    if get_hw_capabilities().has_neon {
        return Ok(unsafe { search::first_match_i64_neon(arr, value, table) });
    }

    Ok(search::first_match_scalar(arr, value, table))
}

#[cfg(has_cuda)]
fn gpu_first_match_i64(arr: &[i64], value: i64, table: u32) -> Result<usize> {
    let len = arr.len();
    let idx = unsafe {
        gpu::with_gpu_buffer_find(
            arr.as_ptr() as *const std::ffi::c_void,
            std::mem::size_of_val(arr),
            len,
            |d_data, n, d_result| search::first_match_i64_gpu(d_data, value, table, n, d_result),
        )?
    };
    Ok(idx as usize)
}

// 16-bit elements have no lane kernels of their own; the device tier
// width-extends them (order- and equality-preserving) and reuses the 32-bit
// kernels. Below the GPU threshold they take the scalar path.

pub(crate) fn first_match_u16(
    arr: &[u16],
    value: u16,
    table: u32,
    backend: Backend,
) -> Result<usize> {
    let len = arr.len();
    if len == 0 {
        return Ok(0);
    }

    if backend == Backend::Device {
        #[cfg(has_cuda)]
        if get_hw_capabilities().has_cuda {
            let widened: Vec<u32> = arr.iter().map(|&x| x as u32).collect();
            return gpu_first_match_u32(&widened, value as u32, table);
        }
        return Ok(search::first_match_scalar(arr, value, table));
    }

    #[cfg(has_cuda)]
    if backend == Backend::Auto && len >= GPU_THRESHOLD_FIND && get_hw_capabilities().has_cuda {
        let widened: Vec<u32> = arr.iter().map(|&x| x as u32).collect();
        return gpu_first_match_u32(&widened, value as u32, table);
    }

    Ok(search::first_match_scalar(arr, value, table))
}

pub(crate) fn first_match_i16(
    arr: &[i16],
    value: i16,
    table: u32,
    backend: Backend,
) -> Result<usize> {
    let len = arr.len();
    if len == 0 {
        return Ok(0);
    }

    if backend == Backend::Device {
        #[cfg(has_cuda)]
        if get_hw_capabilities().has_cuda {
            let widened: Vec<i32> = arr.iter().map(|&x| x as i32).collect();
            return gpu_first_match_i32(&widened, value as i32, table);
        }
        return Ok(search::first_match_scalar(arr, value, table));
    }

    #[cfg(has_cuda)]
    if backend == Backend::Auto && len >= GPU_THRESHOLD_FIND && get_hw_capabilities().has_cuda {
        let widened: Vec<i32> = arr.iter().map(|&x| x as i32).collect();
        return gpu_first_match_i32(&widened, value as i32, table);
    }

    Ok(search::first_match_scalar(arr, value, table))
}

// Floats keep the scalar path on the host (predicate search over floats is
// memory-bound and NaN states don't map onto the integer lane masks); the
// device tier handles large inputs.

pub(crate) fn first_match_f32(
    arr: &[f32],
    value: f32,
    table: u32,
    backend: Backend,
) -> Result<usize> {
    let len = arr.len();
    if len == 0 {
        return Ok(0);
    }

    if backend == Backend::Device {
        #[cfg(has_cuda)]
        if get_hw_capabilities().has_cuda {
            return gpu_first_match_f32(arr, value, table);
        }
        return Ok(search::first_match_scalar(arr, value, table));
    }

    #[cfg(has_cuda)]
    if backend == Backend::Auto && len >= GPU_THRESHOLD_FIND && get_hw_capabilities().has_cuda {
        return gpu_first_match_f32(arr, value, table);
    }

    Ok(search::first_match_scalar(arr, value, table))
}

#[cfg(has_cuda)]
fn gpu_first_match_f32(arr: &[f32], value: f32, table: u32) -> Result<usize> {
    let len = arr.len();
    let idx = unsafe {
        gpu::with_gpu_buffer_find(
            arr.as_ptr() as *const std::ffi::c_void,
            std::mem::size_of_val(arr),
            len,
            |d_data, n, d_result| search::first_match_f32_gpu(d_data, value, table, n, d_result),
        )?
    };
    Ok(idx as usize)
}

pub(crate) fn first_match_f64(
    arr: &[f64],
    value: f64,
    table: u32,
    backend: Backend,
) -> Result<usize> {
    let len = arr.len();
    if len == 0 {
        return Ok(0);
    }

    if backend == Backend::Device {
        #[cfg(has_cuda)]
        if get_hw_capabilities().has_cuda {
            return gpu_first_match_f64(arr, value, table);
        }
        return Ok(search::first_match_scalar(arr, value, table));
    }

    #[cfg(has_cuda)]
    if backend == Backend::Auto && len >= GPU_THRESHOLD_FIND && get_hw_capabilities().has_cuda {
        return gpu_first_match_f64(arr, value, table);
    }

    Ok(search::first_match_scalar(arr, value, table))
}

#[cfg(has_cuda)]
fn gpu_first_match_f64(arr: &[f64], value: f64, table: u32) -> Result<usize> {
    let len = arr.len();
    let idx = unsafe {
        gpu::with_gpu_buffer_find(
            arr.as_ptr() as *const std::ffi::c_void,
            std::mem::size_of_val(arr),
            len,
            |d_data, n, d_result| search::first_match_f64_gpu(d_data, value, table, n, d_result),
        )?
    };
    Ok(idx as usize)
}

// =============================================================================
//  PUBLIC TYPED ENTRY POINTS
// =============================================================================

/// Find the first index where `arr[i] == value` with smart threshold-based
/// dispatching.
///
/// Returns `arr.len()` when the value is absent.
///
/// # Examples
/// ```rust
/// use findx::find_u32;
///
/// let vec = vec![1u32, 2, 3, 3, 5];
/// assert_eq!(find_u32(&vec, 3)?, 2); // lowest duplicate wins
/// assert_eq!(find_u32(&vec, 4)?, 5); // absent -> length
/// # Ok::<(), findx::types::FindxError>(())
/// ```
#[inline]
pub fn find_u32(arr: &[u32], value: u32) -> Result<usize> {
    trace!("FIND_U32 DISPATCH: arr.len()={}, value={}", arr.len(), value);
    first_match_u32(arr, value, CmpOp::Eq.table(), Backend::Auto)
}

/// Find the first index where `pred` holds, or `arr.len()`.
#[inline]
pub fn find_if_u32(arr: &[u32], pred: Bound<u32>) -> Result<usize> {
    trace!("FIND_IF_U32 DISPATCH: arr.len()={}", arr.len());
    first_match_u32(arr, pred.value(), pred.table(), Backend::Auto)
}

/// Find the first index where `pred` does not hold, or `arr.len()`.
#[inline]
pub fn find_if_not_u32(arr: &[u32], pred: Bound<u32>) -> Result<usize> {
    trace!("FIND_IF_NOT_U32 DISPATCH: arr.len()={}", arr.len());
    first_match_u32(arr, pred.value(), pred.table_not(), Backend::Auto)
}

/// Find the first index where `arr[i] == value`, or `arr.len()`.
#[inline]
pub fn find_i32(arr: &[i32], value: i32) -> Result<usize> {
    trace!("FIND_I32 DISPATCH: arr.len()={}, value={}", arr.len(), value);
    first_match_i32(arr, value, CmpOp::Eq.table(), Backend::Auto)
}

/// Find the first index where `pred` holds, or `arr.len()`.
#[inline]
pub fn find_if_i32(arr: &[i32], pred: Bound<i32>) -> Result<usize> {
    trace!("FIND_IF_I32 DISPATCH: arr.len()={}", arr.len());
    first_match_i32(arr, pred.value(), pred.table(), Backend::Auto)
}

/// Find the first index where `pred` does not hold, or `arr.len()`.
#[inline]
pub fn find_if_not_i32(arr: &[i32], pred: Bound<i32>) -> Result<usize> {
    trace!("FIND_IF_NOT_I32 DISPATCH: arr.len()={}", arr.len());
    first_match_i32(arr, pred.value(), pred.table_not(), Backend::Auto)
}

/// Find the first index where `arr[i] == value`, or `arr.len()`.
#[inline]
pub fn find_u64(arr: &[u64], value: u64) -> Result<usize> {
    trace!("FIND_U64 DISPATCH: arr.len()={}, value={}", arr.len(), value);
    first_match_u64(arr, value, CmpOp::Eq.table(), Backend::Auto)
}

/// Find the first index where `pred` holds, or `arr.len()`.
#[inline]
pub fn find_if_u64(arr: &[u64], pred: Bound<u64>) -> Result<usize> {
    trace!("FIND_IF_U64 DISPATCH: arr.len()={}", arr.len());
    first_match_u64(arr, pred.value(), pred.table(), Backend::Auto)
}

/// Find the first index where `pred` does not hold, or `arr.len()`.
#[inline]
pub fn find_if_not_u64(arr: &[u64], pred: Bound<u64>) -> Result<usize> {
    trace!("FIND_IF_NOT_U64 DISPATCH: arr.len()={}", arr.len());
    first_match_u64(arr, pred.value(), pred.table_not(), Backend::Auto)
}

/// Find the first index where `arr[i] == value`, or `arr.len()`.
#[inline]
pub fn find_i64(arr: &[i64], value: i64) -> Result<usize> {
    trace!("FIND_I64 DISPATCH: arr.len()={}, value={}", arr.len(), value);
    first_match_i64(arr, value, CmpOp::Eq.table(), Backend::Auto)
}

/// Find the first index where `pred` holds, or `arr.len()`.
#[inline]
pub fn find_if_i64(arr: &[i64], pred: Bound<i64>) -> Result<usize> {
    trace!("FIND_IF_I64 DISPATCH: arr.len()={}", arr.len());
    first_match_i64(arr, pred.value(), pred.table(), Backend::Auto)
}

/// Find the first index where `pred` does not hold, or `arr.len()`.
#[inline]
pub fn find_if_not_i64(arr: &[i64], pred: Bound<i64>) -> Result<usize> {
    trace!("FIND_IF_NOT_I64 DISPATCH: arr.len()={}", arr.len());
    first_match_i64(arr, pred.value(), pred.table_not(), Backend::Auto)
}

/// Find the first index where `arr[i] == value`, or `arr.len()`.
#[inline]
pub fn find_u16(arr: &[u16], value: u16) -> Result<usize> {
    trace!("FIND_U16 DISPATCH: arr.len()={}, value={}", arr.len(), value);
    first_match_u16(arr, value, CmpOp::Eq.table(), Backend::Auto)
}

/// Find the first index where `pred` holds, or `arr.len()`.
#[inline]
pub fn find_if_u16(arr: &[u16], pred: Bound<u16>) -> Result<usize> {
    trace!("FIND_IF_U16 DISPATCH: arr.len()={}", arr.len());
    first_match_u16(arr, pred.value(), pred.table(), Backend::Auto)
}

/// Find the first index where `pred` does not hold, or `arr.len()`.
#[inline]
pub fn find_if_not_u16(arr: &[u16], pred: Bound<u16>) -> Result<usize> {
    trace!("FIND_IF_NOT_U16 DISPATCH: arr.len()={}", arr.len());
    first_match_u16(arr, pred.value(), pred.table_not(), Backend::Auto)
}

/// Find the first index where `arr[i] == value`, or `arr.len()`.
#[inline]
pub fn find_i16(arr: &[i16], value: i16) -> Result<usize> {
    trace!("FIND_I16 DISPATCH: arr.len()={}, value={}", arr.len(), value);
    first_match_i16(arr, value, CmpOp::Eq.table(), Backend::Auto)
}

/// Find the first index where `pred` holds, or `arr.len()`.
#[inline]
pub fn find_if_i16(arr: &[i16], pred: Bound<i16>) -> Result<usize> {
    trace!("FIND_IF_I16 DISPATCH: arr.len()={}", arr.len());
    first_match_i16(arr, pred.value(), pred.table(), Backend::Auto)
}

/// Find the first index where `pred` does not hold, or `arr.len()`.
#[inline]
pub fn find_if_not_i16(arr: &[i16], pred: Bound<i16>) -> Result<usize> {
    trace!("FIND_IF_NOT_I16 DISPATCH: arr.len()={}", arr.len());
    first_match_i16(arr, pred.value(), pred.table_not(), Backend::Auto)
}

/// Find the first index where `arr[i] == value`, or `arr.len()`.
///
/// NaN never equals anything, so a NaN needle always returns `arr.len()`.
#[inline]
pub fn find_f32(arr: &[f32], value: f32) -> Result<usize> {
    trace!("FIND_F32 DISPATCH: arr.len()={}, value={}", arr.len(), value);
    first_match_f32(arr, value, CmpOp::Eq.table(), Backend::Auto)
}

/// Find the first index where `pred` holds, or `arr.len()`.
#[inline]
pub fn find_if_f32(arr: &[f32], pred: Bound<f32>) -> Result<usize> {
    trace!("FIND_IF_F32 DISPATCH: arr.len()={}", arr.len());
    first_match_f32(arr, pred.value(), pred.table(), Backend::Auto)
}

/// Find the first index where `pred` does not hold, or `arr.len()`.
#[inline]
pub fn find_if_not_f32(arr: &[f32], pred: Bound<f32>) -> Result<usize> {
    trace!("FIND_IF_NOT_F32 DISPATCH: arr.len()={}", arr.len());
    first_match_f32(arr, pred.value(), pred.table_not(), Backend::Auto)
}

/// Find the first index where `arr[i] == value`, or `arr.len()`.
///
/// NaN never equals anything, so a NaN needle always returns `arr.len()`.
#[inline]
pub fn find_f64(arr: &[f64], value: f64) -> Result<usize> {
    trace!("FIND_F64 DISPATCH: arr.len()={}, value={}", arr.len(), value);
    first_match_f64(arr, value, CmpOp::Eq.table(), Backend::Auto)
}

/// Find the first index where `pred` holds, or `arr.len()`.
#[inline]
pub fn find_if_f64(arr: &[f64], pred: Bound<f64>) -> Result<usize> {
    trace!("FIND_IF_F64 DISPATCH: arr.len()={}", arr.len());
    first_match_f64(arr, pred.value(), pred.table(), Backend::Auto)
}

/// Find the first index where `pred` does not hold, or `arr.len()`.
#[inline]
pub fn find_if_not_f64(arr: &[f64], pred: Bound<f64>) -> Result<usize> {
    trace!("FIND_IF_NOT_F64 DISPATCH: arr.len()={}", arr.len());
    first_match_f64(arr, pred.value(), pred.table_not(), Backend::Auto)
}
