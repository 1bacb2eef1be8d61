// SPDX-License-Identifier: Apache-2.0

// types.rs for findx
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FindxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CUDA error: {0}")]
    Cuda(String),
    #[error("Invalid PTX code: {0}")]
    InvalidPtx(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, FindxError>;

/// Comparison operator for a [`Bound`] predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

// A predicate over one element is encoded as a 4-bit truth table indexed by
// the ordering of the element relative to the bound value:
//   bit 0: element > value
//   bit 1: element == value
//   bit 2: element < value
//   bit 3: unordered (float NaN on either side)
// The same table drives the scalar loops, the SIMD lane masks, and the PTX
// kernels, so every tier evaluates predicates identically.
pub(crate) const STATE_GT: u32 = 0;
pub(crate) const STATE_EQ: u32 = 1;
pub(crate) const STATE_LT: u32 = 2;
pub(crate) const STATE_UNORDERED: u32 = 3;

pub(crate) const TABLE_MASK: u32 = 0b1111;

impl CmpOp {
    /// Truth table of this operator (see the state encoding above).
    ///
    /// NaN is unordered against everything, so it satisfies only `Ne`,
    /// matching the native `==`/`<` operators on floats.
    #[inline]
    pub(crate) fn table(self) -> u32 {
        match self {
            CmpOp::Eq => 1 << STATE_EQ,
            CmpOp::Ne => (1 << STATE_GT) | (1 << STATE_LT) | (1 << STATE_UNORDERED),
            CmpOp::Lt => 1 << STATE_LT,
            CmpOp::Le => (1 << STATE_LT) | (1 << STATE_EQ),
            CmpOp::Gt => 1 << STATE_GT,
            CmpOp::Ge => (1 << STATE_GT) | (1 << STATE_EQ),
        }
    }
}

/// A pure single-element predicate: one comparison operator bound to one value.
///
/// This is the predicate form accepted by `find_if`/`find_if_not`. Keeping the
/// predicate structured (instead of an arbitrary closure) is what lets the
/// device tier execute it: the operator travels to the CUDA kernel as a truth
/// table while the bound value travels as a kernel parameter.
///
/// ```rust
/// use findx::types::{Bound, CmpOp};
///
/// let lt3 = Bound::new(CmpOp::Lt, 3u32);
/// assert!(lt3.eval(2));
/// assert!(!lt3.eval(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound<T> {
    op: CmpOp,
    value: T,
}

impl<T: Copy + PartialOrd> Bound<T> {
    #[inline]
    pub fn new(op: CmpOp, value: T) -> Self {
        Self { op, value }
    }

    #[inline]
    pub fn eq(value: T) -> Self {
        Self::new(CmpOp::Eq, value)
    }

    #[inline]
    pub fn ne(value: T) -> Self {
        Self::new(CmpOp::Ne, value)
    }

    #[inline]
    pub fn lt(value: T) -> Self {
        Self::new(CmpOp::Lt, value)
    }

    #[inline]
    pub fn le(value: T) -> Self {
        Self::new(CmpOp::Le, value)
    }

    #[inline]
    pub fn gt(value: T) -> Self {
        Self::new(CmpOp::Gt, value)
    }

    #[inline]
    pub fn ge(value: T) -> Self {
        Self::new(CmpOp::Ge, value)
    }

    #[inline]
    pub fn op(&self) -> CmpOp {
        self.op
    }

    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    /// Evaluate the predicate against one element.
    #[inline]
    pub fn eval(&self, element: T) -> bool {
        let state = match element.partial_cmp(&self.value) {
            Some(Ordering::Greater) => STATE_GT,
            Some(Ordering::Equal) => STATE_EQ,
            Some(Ordering::Less) => STATE_LT,
            None => STATE_UNORDERED,
        };
        (self.table() >> state) & 1 == 1
    }

    /// Truth table for the direct predicate.
    #[inline]
    pub(crate) fn table(&self) -> u32 {
        self.op.table()
    }

    /// Truth table for the complement of the predicate.
    ///
    /// `find_if_not` uses the complemented table rather than a flipped
    /// operator: `!(x < v)` must match NaN, but `x >= v` must not.
    #[inline]
    pub(crate) fn table_not(&self) -> u32 {
        !self.op.table() & TABLE_MASK
    }
}
