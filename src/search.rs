// SPDX-License-Identifier: Apache-2.0

//! First-match search kernels
//!
//! This module contains the per-tier implementations behind the public
//! dispatchers: a scalar reference loop, AVX2/NEON lane scans for 32-bit and
//! 64-bit integers, and (when CUDA is enabled) PTX kernels that reduce the
//! first matching index with `atom.global.min.u64`.
//!
//! All tiers evaluate predicates through the same 4-bit truth table
//! (see `types.rs`), so they return identical indices for identical inputs.

#![allow(unsafe_op_in_unsafe_fn)]

use std::cmp::Ordering;

use crate::types::{STATE_EQ, STATE_GT, STATE_LT, STATE_UNORDERED};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use std::arch::x86_64::{
    _mm256_castsi256_pd, _mm256_castsi256_ps, _mm256_cmpeq_epi32, _mm256_cmpeq_epi64,
    _mm256_cmpgt_epi32, _mm256_cmpgt_epi64, _mm256_loadu_si256, _mm256_movemask_pd,
    _mm256_movemask_ps, _mm256_set1_epi32, _mm256_set1_epi64x, _mm256_xor_si256,
};

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::{
    vceqq_s32, vceqq_s64, vceqq_u32, vceqq_u64, vcltq_s32, vcltq_s64, vcltq_u32, vcltq_u64,
    vdupq_n_s32, vdupq_n_s64, vdupq_n_u32, vdupq_n_u64, vld1q_s32, vld1q_s64, vld1q_u32,
    vld1q_u64, vst1q_u32, vst1q_u64,
};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::constants::{LANES_AVX2_U32, LANES_AVX2_U64};

#[cfg(target_arch = "aarch64")]
use crate::constants::{LANES_NEON_U32, LANES_NEON_U64};

#[cfg(has_cuda)]
use crate::gpu::{launch_ptx, LaunchConfig};
#[cfg(has_cuda)]
use std::ffi::c_void;

// =============================================================================
// SCALAR REFERENCE IMPLEMENTATION
// =============================================================================

/// First index whose element matches the predicate truth table, or `arr.len()`.
///
/// This is the canonical semantics every accelerated tier must reproduce.
pub(crate) fn first_match_scalar<T: Copy + PartialOrd>(arr: &[T], value: T, table: u32) -> usize {
    let len = arr.len();
    for i in 0..len {
        let state = match arr[i].partial_cmp(&value) {
            Some(Ordering::Greater) => STATE_GT,
            Some(Ordering::Equal) => STATE_EQ,
            Some(Ordering::Less) => STATE_LT,
            None => STATE_UNORDERED,
        };
        if (table >> state) & 1 == 1 {
            return i;
        }
    }
    len
}

// =============================================================================
// AVX2 IMPLEMENTATIONS (x86/x86_64)
// =============================================================================

// AVX2 first-match scan for u32 elements.
//
// Builds per-lane equal/less masks, folds them through the predicate table,
// and extracts the first satisfied lane with movemask + trailing_zeros.
// AVX2 has no unsigned compare, so `less` is a signed compare after XOR-ing
// the sign bit into both sides.
//
// # Safety
// Requires AVX2 support. Use `is_x86_feature_detected!("avx2")` before calling.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn first_match_u32_avx2(arr: &[u32], value: u32, table: u32) -> usize {
    const LANES: usize = LANES_AVX2_U32;
    let len = arr.len();
    let value_vec = _mm256_set1_epi32(value as i32);
    let bias = _mm256_set1_epi32(0x8000_0000u32 as i32);
    let biased_value = _mm256_xor_si256(value_vec, bias);

    let mut i = 0;
    while i + LANES <= len {
        let chunk = _mm256_loadu_si256(arr.as_ptr().add(i).cast());
        let eq = _mm256_cmpeq_epi32(chunk, value_vec);
        let biased_chunk = _mm256_xor_si256(chunk, bias);
        let lt = _mm256_cmpgt_epi32(biased_value, biased_chunk);

        let m_eq = _mm256_movemask_ps(_mm256_castsi256_ps(eq)) as u32;
        let m_lt = _mm256_movemask_ps(_mm256_castsi256_ps(lt)) as u32;

        let wanted = lane_mask_from_table(m_eq, m_lt, table, 0xff);
        if wanted != 0 {
            return i + wanted.trailing_zeros() as usize;
        }
        i += LANES;
    }

    i + first_match_scalar(&arr[i..], value, table)
}

// AVX2 first-match scan for i32 elements (signed compares, no bias needed).
//
// # Safety
// Requires AVX2 support. Use `is_x86_feature_detected!("avx2")` before calling.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn first_match_i32_avx2(arr: &[i32], value: i32, table: u32) -> usize {
    const LANES: usize = LANES_AVX2_U32;
    let len = arr.len();
    let value_vec = _mm256_set1_epi32(value);

    let mut i = 0;
    while i + LANES <= len {
        let chunk = _mm256_loadu_si256(arr.as_ptr().add(i).cast());
        let eq = _mm256_cmpeq_epi32(chunk, value_vec);
        let lt = _mm256_cmpgt_epi32(value_vec, chunk);

        let m_eq = _mm256_movemask_ps(_mm256_castsi256_ps(eq)) as u32;
        let m_lt = _mm256_movemask_ps(_mm256_castsi256_ps(lt)) as u32;

        let wanted = lane_mask_from_table(m_eq, m_lt, table, 0xff);
        if wanted != 0 {
            return i + wanted.trailing_zeros() as usize;
        }
        i += LANES;
    }

    i + first_match_scalar(&arr[i..], value, table)
}

// AVX2 first-match scan for u64 elements (4 lanes, sign-bias for unsigned less).
//
// # Safety
// Requires AVX2 support. Use `is_x86_feature_detected!("avx2")` before calling.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn first_match_u64_avx2(arr: &[u64], value: u64, table: u32) -> usize {
    const LANES: usize = LANES_AVX2_U64;
    let len = arr.len();
    let value_vec = _mm256_set1_epi64x(value as i64);
    let bias = _mm256_set1_epi64x(i64::MIN);
    let biased_value = _mm256_xor_si256(value_vec, bias);

    let mut i = 0;
    while i + LANES <= len {
        let chunk = _mm256_loadu_si256(arr.as_ptr().add(i).cast());
        let eq = _mm256_cmpeq_epi64(chunk, value_vec);
        let biased_chunk = _mm256_xor_si256(chunk, bias);
        let lt = _mm256_cmpgt_epi64(biased_value, biased_chunk);

        let m_eq = _mm256_movemask_pd(_mm256_castsi256_pd(eq)) as u32;
        let m_lt = _mm256_movemask_pd(_mm256_castsi256_pd(lt)) as u32;

        let wanted = lane_mask_from_table(m_eq, m_lt, table, 0xf);
        if wanted != 0 {
            return i + wanted.trailing_zeros() as usize;
        }
        i += LANES;
    }

    i + first_match_scalar(&arr[i..], value, table)
}

// AVX2 first-match scan for i64 elements.
//
// # Safety
// Requires AVX2 support. Use `is_x86_feature_detected!("avx2")` before calling.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn first_match_i64_avx2(arr: &[i64], value: i64, table: u32) -> usize {
    const LANES: usize = LANES_AVX2_U64;
    let len = arr.len();
    let value_vec = _mm256_set1_epi64x(value);

    let mut i = 0;
    while i + LANES <= len {
        let chunk = _mm256_loadu_si256(arr.as_ptr().add(i).cast());
        let eq = _mm256_cmpeq_epi64(chunk, value_vec);
        let lt = _mm256_cmpgt_epi64(value_vec, chunk);

        let m_eq = _mm256_movemask_pd(_mm256_castsi256_pd(eq)) as u32;
        let m_lt = _mm256_movemask_pd(_mm256_castsi256_pd(lt)) as u32;

        let wanted = lane_mask_from_table(m_eq, m_lt, table, 0xf);
        if wanted != 0 {
            return i + wanted.trailing_zeros() as usize;
        }
        i += LANES;
    }

    i + first_match_scalar(&arr[i..], value, table)
}

// Fold equal/less lane masks through the predicate truth table.
// Integers are always ordered, so the unordered table bit never contributes.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[inline]
fn lane_mask_from_table(m_eq: u32, m_lt: u32, table: u32, full: u32) -> u32 {
    let mut wanted = 0u32;
    if table & (1 << STATE_EQ) != 0 {
        wanted |= m_eq;
    }
    if table & (1 << STATE_LT) != 0 {
        wanted |= m_lt;
    }
    if table & (1 << STATE_GT) != 0 {
        wanted |= !(m_eq | m_lt) & full;
    }
    wanted
}

// =============================================================================
// NEON IMPLEMENTATIONS (aarch64)
// =============================================================================

// NEON first-match scan for u32 elements (4 lanes per 128-bit register).
//
// # Safety
// Requires NEON support (always present on aarch64).
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
pub(crate) unsafe fn first_match_u32_neon(arr: &[u32], value: u32, table: u32) -> usize {
    const LANES: usize = LANES_NEON_U32;
    let len = arr.len();
    let value_vec = vdupq_n_u32(value);

    let mut i = 0;
    while i + LANES <= len {
        let chunk = vld1q_u32(arr.as_ptr().add(i));
        let eq = vceqq_u32(chunk, value_vec);
        let lt = vcltq_u32(chunk, value_vec);

        let mut eq_lanes = [0u32; LANES];
        let mut lt_lanes = [0u32; LANES];
        vst1q_u32(eq_lanes.as_mut_ptr(), eq);
        vst1q_u32(lt_lanes.as_mut_ptr(), lt);

        for lane in 0..LANES {
            let state = lane_state(eq_lanes[lane] != 0, lt_lanes[lane] != 0);
            if (table >> state) & 1 == 1 {
                return i + lane;
            }
        }
        i += LANES;
    }

    i + first_match_scalar(&arr[i..], value, table)
}

// NEON first-match scan for i32 elements.
//
// # Safety
// Requires NEON support (always present on aarch64).
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
pub(crate) unsafe fn first_match_i32_neon(arr: &[i32], value: i32, table: u32) -> usize {
    const LANES: usize = LANES_NEON_U32;
    let len = arr.len();
    let value_vec = vdupq_n_s32(value);

    let mut i = 0;
    while i + LANES <= len {
        let chunk = vld1q_s32(arr.as_ptr().add(i));
        let eq = vceqq_s32(chunk, value_vec);
        let lt = vcltq_s32(chunk, value_vec);

        let mut eq_lanes = [0u32; LANES];
        let mut lt_lanes = [0u32; LANES];
        vst1q_u32(eq_lanes.as_mut_ptr(), eq);
        vst1q_u32(lt_lanes.as_mut_ptr(), lt);

        for lane in 0..LANES {
            let state = lane_state(eq_lanes[lane] != 0, lt_lanes[lane] != 0);
            if (table >> state) & 1 == 1 {
                return i + lane;
            }
        }
        i += LANES;
    }

    i + first_match_scalar(&arr[i..], value, table)
}

// NEON first-match scan for u64 elements (2 lanes per 128-bit register).
//
// # Safety
// Requires NEON support (always present on aarch64).
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
pub(crate) unsafe fn first_match_u64_neon(arr: &[u64], value: u64, table: u32) -> usize {
    const LANES: usize = LANES_NEON_U64;
    let len = arr.len();
    let value_vec = vdupq_n_u64(value);

    let mut i = 0;
    while i + LANES <= len {
        let chunk = vld1q_u64(arr.as_ptr().add(i));
        let eq = vceqq_u64(chunk, value_vec);
        let lt = vcltq_u64(chunk, value_vec);

        let mut eq_lanes = [0u64; LANES];
        let mut lt_lanes = [0u64; LANES];
        vst1q_u64(eq_lanes.as_mut_ptr(), eq);
        vst1q_u64(lt_lanes.as_mut_ptr(), lt);

        for lane in 0..LANES {
            let state = lane_state(eq_lanes[lane] != 0, lt_lanes[lane] != 0);
            if (table >> state) & 1 == 1 {
                return i + lane;
            }
        }
        i += LANES;
    }

    i + first_match_scalar(&arr[i..], value, table)
}

// NEON first-match scan for i64 elements.
//
// # Safety
// Requires NEON support (always present on aarch64).
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
pub(crate) unsafe fn first_match_i64_neon(arr: &[i64], value: i64, table: u32) -> usize {
    const LANES: usize = LANES_NEON_U64;
    let len = arr.len();
    let value_vec = vdupq_n_s64(value);

    let mut i = 0;
    while i + LANES <= len {
        let chunk = vld1q_s64(arr.as_ptr().add(i));
        let eq = vceqq_s64(chunk, value_vec);
        let lt = vcltq_s64(chunk, value_vec);

        let mut eq_lanes = [0u64; LANES];
        let mut lt_lanes = [0u64; LANES];
        vst1q_u64(eq_lanes.as_mut_ptr(), eq);
        vst1q_u64(lt_lanes.as_mut_ptr(), lt);

        for lane in 0..LANES {
            let state = lane_state(eq_lanes[lane] != 0, lt_lanes[lane] != 0);
            if (table >> state) & 1 == 1 {
                return i + lane;
            }
        }
        i += LANES;
    }

    i + first_match_scalar(&arr[i..], value, table)
}

#[cfg(target_arch = "aarch64")]
#[inline]
fn lane_state(eq: bool, lt: bool) -> u32 {
    if eq {
        STATE_EQ
    } else if lt {
        STATE_LT
    } else {
        STATE_GT
    }
}

// =============================================================================
// CUDA IMPLEMENTATIONS (PTX kernels)
// =============================================================================
//
// Each kernel walks the input with a grid-stride loop, classifies every
// element against the bound value (greater/equal/less, plus unordered for
// floats), tests the predicate table bit for that state, and reduces the
// smallest matching index into the result slot with atom.global.min.u64.
// The result slot is pre-initialized to the sequence length by the staging
// helper, which is also the not-found sentinel.

#[cfg(has_cuda)]
const PTX_FIRST_MATCH_U32: &str = r#"
    .version 7.5
    .target sm_70
    .address_size 64

    .visible .entry first_match_u32(
      .param .u64 data_ptr,
      .param .u32 value,
      .param .u32 table,
      .param .u64 len,
      .param .u64 result_ptr
    ) {
      .reg .b32 %r<16>;
      .reg .b64 %rd<16>;
      .reg .pred %p<8>;

      ld.param.u64 %rd0, [data_ptr];
      ld.param.u32 %r0, [value];
      ld.param.u32 %r1, [table];
      ld.param.u64 %rd1, [len];
      ld.param.u64 %rd2, [result_ptr];

      // global thread index and grid stride
      mov.u32 %r2, %ctaid.x;
      mov.u32 %r3, %ntid.x;
      mov.u32 %r4, %tid.x;
      mad.lo.u32 %r5, %r2, %r3, %r4;
      cvt.u64.u32 %rd3, %r5;
      mov.u32 %r6, %nctaid.x;
      mul.lo.u32 %r7, %r6, %r3;
      cvt.u64.u32 %rd4, %r7;

    loop_body:
      setp.ge.u64 %p0, %rd3, %rd1;
      @%p0 bra done;

      shl.b64 %rd5, %rd3, 2;
      add.u64 %rd6, %rd0, %rd5;
      ld.global.u32 %r8, [%rd6];

      setp.eq.u32 %p1, %r8, %r0;
      setp.lt.u32 %p2, %r8, %r0;
      selp.b32 %r9, 1, 0, %p1;
      selp.b32 %r10, 2, 0, %p2;
      or.b32 %r11, %r9, %r10;

      shr.b32 %r12, %r1, %r11;
      and.b32 %r13, %r12, 1;
      setp.ne.u32 %p3, %r13, 0;
      @!%p3 bra next;

      atom.global.min.u64 %rd7, [%rd2], %rd3;

    next:
      add.u64 %rd3, %rd3, %rd4;
      bra loop_body;

    done:
      ret;
    }
"#;

#[cfg(has_cuda)]
const PTX_FIRST_MATCH_I32: &str = r#"
    .version 7.5
    .target sm_70
    .address_size 64

    .visible .entry first_match_i32(
      .param .u64 data_ptr,
      .param .u32 value,
      .param .u32 table,
      .param .u64 len,
      .param .u64 result_ptr
    ) {
      .reg .b32 %r<16>;
      .reg .b64 %rd<16>;
      .reg .pred %p<8>;

      ld.param.u64 %rd0, [data_ptr];
      ld.param.u32 %r0, [value];
      ld.param.u32 %r1, [table];
      ld.param.u64 %rd1, [len];
      ld.param.u64 %rd2, [result_ptr];

      mov.u32 %r2, %ctaid.x;
      mov.u32 %r3, %ntid.x;
      mov.u32 %r4, %tid.x;
      mad.lo.u32 %r5, %r2, %r3, %r4;
      cvt.u64.u32 %rd3, %r5;
      mov.u32 %r6, %nctaid.x;
      mul.lo.u32 %r7, %r6, %r3;
      cvt.u64.u32 %rd4, %r7;

    loop_body:
      setp.ge.u64 %p0, %rd3, %rd1;
      @%p0 bra done;

      shl.b64 %rd5, %rd3, 2;
      add.u64 %rd6, %rd0, %rd5;
      ld.global.u32 %r8, [%rd6];

      setp.eq.s32 %p1, %r8, %r0;
      setp.lt.s32 %p2, %r8, %r0;
      selp.b32 %r9, 1, 0, %p1;
      selp.b32 %r10, 2, 0, %p2;
      or.b32 %r11, %r9, %r10;

      shr.b32 %r12, %r1, %r11;
      and.b32 %r13, %r12, 1;
      setp.ne.u32 %p3, %r13, 0;
      @!%p3 bra next;

      atom.global.min.u64 %rd7, [%rd2], %rd3;

    next:
      add.u64 %rd3, %rd3, %rd4;
      bra loop_body;

    done:
      ret;
    }
"#;

#[cfg(has_cuda)]
const PTX_FIRST_MATCH_U64: &str = r#"
    .version 7.5
    .target sm_70
    .address_size 64

    .visible .entry first_match_u64(
      .param .u64 data_ptr,
      .param .u64 value,
      .param .u32 table,
      .param .u64 len,
      .param .u64 result_ptr
    ) {
      .reg .b32 %r<16>;
      .reg .b64 %rd<16>;
      .reg .pred %p<8>;

      ld.param.u64 %rd0, [data_ptr];
      ld.param.u64 %rd8, [value];
      ld.param.u32 %r1, [table];
      ld.param.u64 %rd1, [len];
      ld.param.u64 %rd2, [result_ptr];

      mov.u32 %r2, %ctaid.x;
      mov.u32 %r3, %ntid.x;
      mov.u32 %r4, %tid.x;
      mad.lo.u32 %r5, %r2, %r3, %r4;
      cvt.u64.u32 %rd3, %r5;
      mov.u32 %r6, %nctaid.x;
      mul.lo.u32 %r7, %r6, %r3;
      cvt.u64.u32 %rd4, %r7;

    loop_body:
      setp.ge.u64 %p0, %rd3, %rd1;
      @%p0 bra done;

      shl.b64 %rd5, %rd3, 3;
      add.u64 %rd6, %rd0, %rd5;
      ld.global.u64 %rd9, [%rd6];

      setp.eq.u64 %p1, %rd9, %rd8;
      setp.lt.u64 %p2, %rd9, %rd8;
      selp.b32 %r9, 1, 0, %p1;
      selp.b32 %r10, 2, 0, %p2;
      or.b32 %r11, %r9, %r10;

      shr.b32 %r12, %r1, %r11;
      and.b32 %r13, %r12, 1;
      setp.ne.u32 %p3, %r13, 0;
      @!%p3 bra next;

      atom.global.min.u64 %rd7, [%rd2], %rd3;

    next:
      add.u64 %rd3, %rd3, %rd4;
      bra loop_body;

    done:
      ret;
    }
"#;

#[cfg(has_cuda)]
const PTX_FIRST_MATCH_I64: &str = r#"
    .version 7.5
    .target sm_70
    .address_size 64

    .visible .entry first_match_i64(
      .param .u64 data_ptr,
      .param .u64 value,
      .param .u32 table,
      .param .u64 len,
      .param .u64 result_ptr
    ) {
      .reg .b32 %r<16>;
      .reg .b64 %rd<16>;
      .reg .pred %p<8>;

      ld.param.u64 %rd0, [data_ptr];
      ld.param.u64 %rd8, [value];
      ld.param.u32 %r1, [table];
      ld.param.u64 %rd1, [len];
      ld.param.u64 %rd2, [result_ptr];

      mov.u32 %r2, %ctaid.x;
      mov.u32 %r3, %ntid.x;
      mov.u32 %r4, %tid.x;
      mad.lo.u32 %r5, %r2, %r3, %r4;
      cvt.u64.u32 %rd3, %r5;
      mov.u32 %r6, %nctaid.x;
      mul.lo.u32 %r7, %r6, %r3;
      cvt.u64.u32 %rd4, %r7;

    loop_body:
      setp.ge.u64 %p0, %rd3, %rd1;
      @%p0 bra done;

      shl.b64 %rd5, %rd3, 3;
      add.u64 %rd6, %rd0, %rd5;
      ld.global.u64 %rd9, [%rd6];

      setp.eq.s64 %p1, %rd9, %rd8;
      setp.lt.s64 %p2, %rd9, %rd8;
      selp.b32 %r9, 1, 0, %p1;
      selp.b32 %r10, 2, 0, %p2;
      or.b32 %r11, %r9, %r10;

      shr.b32 %r12, %r1, %r11;
      and.b32 %r13, %r12, 1;
      setp.ne.u32 %p3, %r13, 0;
      @!%p3 bra next;

      atom.global.min.u64 %rd7, [%rd2], %rd3;

    next:
      add.u64 %rd3, %rd3, %rd4;
      bra loop_body;

    done:
      ret;
    }
"#;

#[cfg(has_cuda)]
const PTX_FIRST_MATCH_F32: &str = r#"
    .version 7.5
    .target sm_70
    .address_size 64

    .visible .entry first_match_f32(
      .param .u64 data_ptr,
      .param .f32 value,
      .param .u32 table,
      .param .u64 len,
      .param .u64 result_ptr
    ) {
      .reg .b32 %r<16>;
      .reg .b64 %rd<16>;
      .reg .f32 %f<4>;
      .reg .pred %p<8>;

      ld.param.u64 %rd0, [data_ptr];
      ld.param.f32 %f0, [value];
      ld.param.u32 %r1, [table];
      ld.param.u64 %rd1, [len];
      ld.param.u64 %rd2, [result_ptr];

      mov.u32 %r2, %ctaid.x;
      mov.u32 %r3, %ntid.x;
      mov.u32 %r4, %tid.x;
      mad.lo.u32 %r5, %r2, %r3, %r4;
      cvt.u64.u32 %rd3, %r5;
      mov.u32 %r6, %nctaid.x;
      mul.lo.u32 %r7, %r6, %r3;
      cvt.u64.u32 %rd4, %r7;

    loop_body:
      setp.ge.u64 %p0, %rd3, %rd1;
      @%p0 bra done;

      shl.b64 %rd5, %rd3, 2;
      add.u64 %rd6, %rd0, %rd5;
      ld.global.f32 %f1, [%rd6];

      // ordered compares are all false for NaN, leaving state 3 (unordered)
      setp.eq.f32 %p1, %f1, %f0;
      setp.lt.f32 %p2, %f1, %f0;
      setp.gt.f32 %p3, %f1, %f0;
      mov.u32 %r11, 3;
      selp.b32 %r11, 0, %r11, %p3;
      selp.b32 %r11, 2, %r11, %p2;
      selp.b32 %r11, 1, %r11, %p1;

      shr.b32 %r12, %r1, %r11;
      and.b32 %r13, %r12, 1;
      setp.ne.u32 %p4, %r13, 0;
      @!%p4 bra next;

      atom.global.min.u64 %rd7, [%rd2], %rd3;

    next:
      add.u64 %rd3, %rd3, %rd4;
      bra loop_body;

    done:
      ret;
    }
"#;

#[cfg(has_cuda)]
const PTX_FIRST_MATCH_F64: &str = r#"
    .version 7.5
    .target sm_70
    .address_size 64

    .visible .entry first_match_f64(
      .param .u64 data_ptr,
      .param .f64 value,
      .param .u32 table,
      .param .u64 len,
      .param .u64 result_ptr
    ) {
      .reg .b32 %r<16>;
      .reg .b64 %rd<16>;
      .reg .f64 %fd<4>;
      .reg .pred %p<8>;

      ld.param.u64 %rd0, [data_ptr];
      ld.param.f64 %fd0, [value];
      ld.param.u32 %r1, [table];
      ld.param.u64 %rd1, [len];
      ld.param.u64 %rd2, [result_ptr];

      mov.u32 %r2, %ctaid.x;
      mov.u32 %r3, %ntid.x;
      mov.u32 %r4, %tid.x;
      mad.lo.u32 %r5, %r2, %r3, %r4;
      cvt.u64.u32 %rd3, %r5;
      mov.u32 %r6, %nctaid.x;
      mul.lo.u32 %r7, %r6, %r3;
      cvt.u64.u32 %rd4, %r7;

    loop_body:
      setp.ge.u64 %p0, %rd3, %rd1;
      @%p0 bra done;

      shl.b64 %rd5, %rd3, 3;
      add.u64 %rd6, %rd0, %rd5;
      ld.global.f64 %fd1, [%rd6];

      setp.eq.f64 %p1, %fd1, %fd0;
      setp.lt.f64 %p2, %fd1, %fd0;
      setp.gt.f64 %p3, %fd1, %fd0;
      mov.u32 %r11, 3;
      selp.b32 %r11, 0, %r11, %p3;
      selp.b32 %r11, 2, %r11, %p2;
      selp.b32 %r11, 1, %r11, %p1;

      shr.b32 %r12, %r1, %r11;
      and.b32 %r13, %r12, 1;
      setp.ne.u32 %p4, %r13, 0;
      @!%p4 bra next;

      atom.global.min.u64 %rd7, [%rd2], %rd3;

    next:
      add.u64 %rd3, %rd3, %rd4;
      bra loop_body;

    done:
      ret;
    }
"#;

// GPU kernel wrappers. Each receives device pointers prepared by
// `gpu::with_gpu_buffer_find` and launches the matching PTX kernel.
// `atom.min` reductions contend on one slot, so the reduction launch
// configuration is used.

#[cfg(has_cuda)]
pub(crate) unsafe fn first_match_u32_gpu(
    d_data: *const c_void,
    value: u32,
    table: u32,
    len: usize,
    d_result: *mut c_void,
) -> crate::types::Result<()> {
    let (blocks, threads) = LaunchConfig::reduction();
    let data_param = d_data as u64;
    let result_param = d_result as u64;
    let len_param = len as u64;
    launch_ptx(
        PTX_FIRST_MATCH_U32,
        "first_match_u32",
        blocks,
        threads,
        &[
            &data_param as *const u64 as *const u8,
            &value as *const u32 as *const u8,
            &table as *const u32 as *const u8,
            &len_param as *const u64 as *const u8,
            &result_param as *const u64 as *const u8,
        ],
    )
}

#[cfg(has_cuda)]
pub(crate) unsafe fn first_match_i32_gpu(
    d_data: *const c_void,
    value: i32,
    table: u32,
    len: usize,
    d_result: *mut c_void,
) -> crate::types::Result<()> {
    let (blocks, threads) = LaunchConfig::reduction();
    let data_param = d_data as u64;
    let result_param = d_result as u64;
    let len_param = len as u64;
    launch_ptx(
        PTX_FIRST_MATCH_I32,
        "first_match_i32",
        blocks,
        threads,
        &[
            &data_param as *const u64 as *const u8,
            &value as *const i32 as *const u8,
            &table as *const u32 as *const u8,
            &len_param as *const u64 as *const u8,
            &result_param as *const u64 as *const u8,
        ],
    )
}

#[cfg(has_cuda)]
pub(crate) unsafe fn first_match_u64_gpu(
    d_data: *const c_void,
    value: u64,
    table: u32,
    len: usize,
    d_result: *mut c_void,
) -> crate::types::Result<()> {
    let (blocks, threads) = LaunchConfig::reduction();
    let data_param = d_data as u64;
    let result_param = d_result as u64;
    let len_param = len as u64;
    launch_ptx(
        PTX_FIRST_MATCH_U64,
        "first_match_u64",
        blocks,
        threads,
        &[
            &data_param as *const u64 as *const u8,
            &value as *const u64 as *const u8,
            &table as *const u32 as *const u8,
            &len_param as *const u64 as *const u8,
            &result_param as *const u64 as *const u8,
        ],
    )
}

#[cfg(has_cuda)]
pub(crate) unsafe fn first_match_i64_gpu(
    d_data: *const c_void,
    value: i64,
    table: u32,
    len: usize,
    d_result: *mut c_void,
) -> crate::types::Result<()> {
    let (blocks, threads) = LaunchConfig::reduction();
    let data_param = d_data as u64;
    let result_param = d_result as u64;
    let len_param = len as u64;
    launch_ptx(
        PTX_FIRST_MATCH_I64,
        "first_match_i64",
        blocks,
        threads,
        &[
            &data_param as *const u64 as *const u8,
            &value as *const i64 as *const u8,
            &table as *const u32 as *const u8,
            &len_param as *const u64 as *const u8,
            &result_param as *const u64 as *const u8,
        ],
    )
}

#[cfg(has_cuda)]
pub(crate) unsafe fn first_match_f32_gpu(
    d_data: *const c_void,
    value: f32,
    table: u32,
    len: usize,
    d_result: *mut c_void,
) -> crate::types::Result<()> {
    let (blocks, threads) = LaunchConfig::reduction();
    let data_param = d_data as u64;
    let result_param = d_result as u64;
    let len_param = len as u64;
    launch_ptx(
        PTX_FIRST_MATCH_F32,
        "first_match_f32",
        blocks,
        threads,
        &[
            &data_param as *const u64 as *const u8,
            &value as *const f32 as *const u8,
            &table as *const u32 as *const u8,
            &len_param as *const u64 as *const u8,
            &result_param as *const u64 as *const u8,
        ],
    )
}

#[cfg(has_cuda)]
pub(crate) unsafe fn first_match_f64_gpu(
    d_data: *const c_void,
    value: f64,
    table: u32,
    len: usize,
    d_result: *mut c_void,
) -> crate::types::Result<()> {
    let (blocks, threads) = LaunchConfig::reduction();
    let data_param = d_data as u64;
    let result_param = d_result as u64;
    let len_param = len as u64;
    launch_ptx(
        PTX_FIRST_MATCH_F64,
        "first_match_f64",
        blocks,
        threads,
        &[
            &data_param as *const u64 as *const u8,
            &value as *const f64 as *const u8,
            &table as *const u32 as *const u8,
            &len_param as *const u64 as *const u8,
            &result_param as *const u64 as *const u8,
        ],
    )
}
