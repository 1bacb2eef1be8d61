// SPDX-License-Identifier: Apache-2.0

//! FINDX library
//!
//! First-match search (`find`, `find_if`, `find_if_not`) with
//! hardware-accelerated implementations where it makes sense. Every operation
//! has a scalar fallback and optional SIMD/CUDA backends.
//!
//! - `find(seq, value)`: first index equal to a value
//! - `find_if(seq, pred)`: first index satisfying a bound predicate
//! - `find_if_not(seq, pred)`: first index violating a bound predicate
//!
//! All three return the sequence length when nothing matches, and all
//! execution tiers return the identical index for identical inputs.
//!
//! ## Hardware support
//! - **AVX2 / NEON** are used on stable Rust where available
//! - **CUDA** is enabled when detected by `build.rs` (requires `nvcc`)
//!
//! ## Usage
//!
//! ```rust
//! use findx::types::Bound;
//!
//! // Value search (automatically selects the best backend)
//! let vec = vec![1u32, 2, 3, 3, 5];
//! assert_eq!(findx::find(&vec, 3)?, 2);
//!
//! // Predicate search
//! let vec = vec![0i32, 1, 2, 3, 4];
//! assert_eq!(findx::find_if_not(&vec, Bound::lt(3))?, 3);
//!
//! // Check available hardware capabilities
//! let caps = findx::get_hw_capabilities();
//! println!("Has AVX2: {}", caps.has_avx2);
//! # Ok::<(), findx::types::FindxError>(())
//! ```

#![allow(clippy::missing_safety_doc)]

pub mod constants;
pub mod dispatch;
pub mod element;
#[cfg(has_cuda)]
pub mod gpu;
pub mod policy;
pub mod search;
pub mod types;

pub use types::*;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod search_tests;
#[cfg(test)]
#[path = "tests/policy_tests.rs"]
mod policy_tests;
#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod types_tests;

// Re-export the main API
pub use dispatch::*;
pub use element::{find, find_if, find_if_not, SearchValue};
pub use policy::{find_if_not_with, find_if_with, find_with, SearchPolicy};
#[cfg(has_cuda)]
pub use gpu::{get_gpu_properties, launch_ptx, GpuDeviceProperties, LaunchConfig};
