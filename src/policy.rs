// SPDX-License-Identifier: Apache-2.0

//! Execution-policy dispatch
//!
//! A [`SearchPolicy`] decides which implementation handles a search call.
//! The built-in policies select among the crate's tiers ([`Auto`], [`Host`],
//! [`Device`]); a user-defined policy substitutes the entire implementation.
//! When a custom policy handles a call, the library performs no scanning of
//! its own. Policies receive `&mut self` (so they can record that they were
//! routed to) and a mutable slice (so custom backends may stage or mark
//! elements in place).
//!
//! The trait is generic over the element type, so a custom policy may be
//! implemented for exactly the types it supports.
//!
//! ```rust
//! use findx::policy::{find_with, Host};
//!
//! let mut data = vec![5u32, 1, 9];
//! let mut host = Host;
//! assert_eq!(find_with(&mut host, &mut data, 9)?, 2);
//! # Ok::<(), findx::types::FindxError>(())
//! ```

use crate::dispatch::Backend;
use crate::element::SearchValue;
use crate::types::{Bound, Result};

/// Selects the implementation that handles `find`/`find_if`/`find_if_not`
/// over element type `T`.
///
/// The default methods run the automatic threshold dispatch, so a custom
/// policy only overrides what it wants to intercept.
pub trait SearchPolicy<T: SearchValue> {
    /// First index equal to `value`, or `data.len()`.
    fn find(&mut self, data: &mut [T], value: T) -> Result<usize> {
        T::first_match(data, Bound::eq(value), false, Backend::Auto)
    }

    /// First index satisfying `pred`, or `data.len()`.
    fn find_if(&mut self, data: &mut [T], pred: Bound<T>) -> Result<usize> {
        T::first_match(data, pred, false, Backend::Auto)
    }

    /// First index not satisfying `pred`, or `data.len()`.
    fn find_if_not(&mut self, data: &mut [T], pred: Bound<T>) -> Result<usize> {
        T::first_match(data, pred, true, Backend::Auto)
    }
}

/// Threshold-based tier selection (the same behavior as the free functions).
#[derive(Debug, Default, Clone, Copy)]
pub struct Auto;

impl<T: SearchValue> SearchPolicy<T> for Auto {}

/// Host-only execution: scalar and SIMD tiers, never the device.
#[derive(Debug, Default, Clone, Copy)]
pub struct Host;

impl<T: SearchValue> SearchPolicy<T> for Host {
    fn find(&mut self, data: &mut [T], value: T) -> Result<usize> {
        T::first_match(data, Bound::eq(value), false, Backend::Host)
    }

    fn find_if(&mut self, data: &mut [T], pred: Bound<T>) -> Result<usize> {
        T::first_match(data, pred, false, Backend::Host)
    }

    fn find_if_not(&mut self, data: &mut [T], pred: Bound<T>) -> Result<usize> {
        T::first_match(data, pred, true, Backend::Host)
    }
}

/// Device-preferred execution: stages to the GPU regardless of input size and
/// falls back to the scalar reference only when no device is usable, so the
/// result is always defined.
#[derive(Debug, Default, Clone, Copy)]
pub struct Device;

impl<T: SearchValue> SearchPolicy<T> for Device {
    fn find(&mut self, data: &mut [T], value: T) -> Result<usize> {
        T::first_match(data, Bound::eq(value), false, Backend::Device)
    }

    fn find_if(&mut self, data: &mut [T], pred: Bound<T>) -> Result<usize> {
        T::first_match(data, pred, false, Backend::Device)
    }

    fn find_if_not(&mut self, data: &mut [T], pred: Bound<T>) -> Result<usize> {
        T::first_match(data, pred, true, Backend::Device)
    }
}

/// `find` through an explicit policy.
#[inline]
pub fn find_with<P: SearchPolicy<T>, T: SearchValue>(
    policy: &mut P,
    data: &mut [T],
    value: T,
) -> Result<usize> {
    policy.find(data, value)
}

/// `find_if` through an explicit policy.
#[inline]
pub fn find_if_with<P: SearchPolicy<T>, T: SearchValue>(
    policy: &mut P,
    data: &mut [T],
    pred: Bound<T>,
) -> Result<usize> {
    policy.find_if(data, pred)
}

/// `find_if_not` through an explicit policy.
#[inline]
pub fn find_if_not_with<P: SearchPolicy<T>, T: SearchValue>(
    policy: &mut P,
    data: &mut [T],
    pred: Bound<T>,
) -> Result<usize> {
    policy.find_if_not(data, pred)
}
