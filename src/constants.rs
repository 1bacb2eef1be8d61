// SPDX-License-Identifier: Apache-2.0

//! Common constants used across implementations
//!
//! This module centralizes lane counts, thresholds, and GPU launch constants
//! used by the scalar/SIMD/CUDA search paths.

// =============================================================================
// SIMD Lane Counts by Architecture
// =============================================================================

// x86/x86_64 (AVX2, 256-bit registers)
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub use x86_constants::*;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86_constants {
    pub const LANES_AVX2_U64: usize = 4; // 256/64 = 4 u64 elements
    pub const LANES_AVX2_U32: usize = 8; // 256/32 = 8 u32 elements
}

// NEON (ARM64, 128-bit registers)
#[cfg(target_arch = "aarch64")]
pub use neon_constants::*;
#[cfg(target_arch = "aarch64")]
mod neon_constants {
    pub const LANES_NEON_U64: usize = 2; // 128/64 = 2 u64 elements
    pub const LANES_NEON_U32: usize = 4; // 128/32 = 4 u32 elements
}

// =============================================================================
// Dispatch Thresholds
// =============================================================================

// When the disable-findx feature is enabled, every threshold becomes
// usize::MAX so all dispatchers take the scalar path.
#[cfg(feature = "disable-findx")]
mod thresholds {
    pub const SIMD_THRESHOLD_FIND: usize = usize::MAX;
    pub const GPU_THRESHOLD_FIND: usize = usize::MAX;
}

#[cfg(not(feature = "disable-findx"))]
mod thresholds {
    /// Below this length a scalar loop beats the SIMD setup cost.
    pub const SIMD_THRESHOLD_FIND: usize = 32;
    /// Above this length staging to the device pays for the transfer.
    pub const GPU_THRESHOLD_FIND: usize = 4096;
}

pub use thresholds::*;

// =============================================================================
// GPU/CUDA Constants
// =============================================================================

pub use gpu_constants::*;

mod gpu_constants {
    pub const GPU_BLOCK_SIZE_MEDIUM: usize = 256; // Standard block size
}
