// SPDX-License-Identifier: Apache-2.0

//! Typed routing for the generic search API
//!
//! [`SearchValue`] connects the generic `find`/`find_if`/`find_if_not` entry
//! points (and the policy layer) to the monomorphic per-type dispatchers.
//! It is implemented for the eight element widths the dispatchers cover.

use crate::dispatch::{self, Backend};
use crate::types::{Bound, Result};

/// An element type the search dispatchers know how to handle.
pub trait SearchValue: Copy + PartialOrd {
    /// Route one first-match query to this type's tiered dispatcher.
    ///
    /// `negate` complements the predicate (the `find_if_not` form).
    /// Implementations exist for `i16`/`u16`/`i32`/`u32`/`i64`/`u64`/
    /// `f32`/`f64`; this is the only required method.
    fn first_match(
        data: &[Self],
        pred: Bound<Self>,
        negate: bool,
        backend: Backend,
    ) -> Result<usize>;
}

macro_rules! impl_search_value {
    ($ty:ty, $dispatcher:path) => {
        impl SearchValue for $ty {
            #[inline]
            fn first_match(
                data: &[Self],
                pred: Bound<Self>,
                negate: bool,
                backend: Backend,
            ) -> Result<usize> {
                let table = if negate {
                    pred.table_not()
                } else {
                    pred.table()
                };
                $dispatcher(data, pred.value(), table, backend)
            }
        }
    };
}

impl_search_value!(u16, dispatch::first_match_u16);
impl_search_value!(i16, dispatch::first_match_i16);
impl_search_value!(u32, dispatch::first_match_u32);
impl_search_value!(i32, dispatch::first_match_i32);
impl_search_value!(u64, dispatch::first_match_u64);
impl_search_value!(i64, dispatch::first_match_i64);
impl_search_value!(f32, dispatch::first_match_f32);
impl_search_value!(f64, dispatch::first_match_f64);

/// Find the first index where `data[i] == value`, or `data.len()` if absent.
///
/// Generic front door over the typed dispatchers; picks the execution tier
/// automatically.
///
/// ```rust
/// let vec = vec![1i64, 2, 3, 3, 5];
/// assert_eq!(findx::find(&vec, 3)?, 2);
/// assert_eq!(findx::find(&vec, 9)?, 5);
/// # Ok::<(), findx::types::FindxError>(())
/// ```
#[inline]
pub fn find<T: SearchValue>(data: &[T], value: T) -> Result<usize> {
    T::first_match(data, Bound::eq(value), false, Backend::Auto)
}

/// Find the first index where `pred` holds, or `data.len()` if it never does.
#[inline]
pub fn find_if<T: SearchValue>(data: &[T], pred: Bound<T>) -> Result<usize> {
    T::first_match(data, pred, false, Backend::Auto)
}

/// Find the first index where `pred` does not hold, or `data.len()`.
#[inline]
pub fn find_if_not<T: SearchValue>(data: &[T], pred: Bound<T>) -> Result<usize> {
    T::first_match(data, pred, true, Backend::Auto)
}
