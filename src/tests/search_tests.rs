// SPDX-License-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::test_utils::{config_test_logger, get_random_data, get_sizes};
    use crate::types::Bound;
    use crate::{
        find, find_f32, find_f64, find_i16, find_i32, find_i64, find_if, find_if_i32,
        find_if_not, find_if_not_i32, find_if_not_u64, find_if_u64, find_u16, find_u32, find_u64,
        SearchValue,
    };
    use rand::distributions::uniform::SampleUniform;
    use std::fmt::Debug;

    // =============================================================================
    //   REFERENCE IMPLEMENTATIONS
    // =============================================================================

    fn reference_find<T: SearchValue>(data: &[T], value: T) -> usize {
        data.iter().position(|&x| x == value).unwrap_or(data.len())
    }

    fn reference_find_if<T: SearchValue>(data: &[T], pred: Bound<T>) -> usize {
        data.iter()
            .position(|&x| pred.eval(x))
            .unwrap_or(data.len())
    }

    fn reference_find_if_not<T: SearchValue>(data: &[T], pred: Bound<T>) -> usize {
        data.iter()
            .position(|&x| !pred.eval(x))
            .unwrap_or(data.len())
    }

    fn simple_vec<T: From<u8>>() -> Vec<T> {
        [1u8, 2, 3, 3, 5].iter().map(|&x| T::from(x)).collect()
    }

    // =============================================================================
    //   SIMPLE FIXED-VECTOR TESTS (all eight element types)
    // =============================================================================

    fn check_find_simple<T: SearchValue + From<u8> + Debug>() {
        let vec = simple_vec::<T>();

        assert_eq!(find(&vec, T::from(0)).unwrap(), 5);
        assert_eq!(find(&vec, T::from(1)).unwrap(), 0);
        assert_eq!(find(&vec, T::from(2)).unwrap(), 1);
        assert_eq!(find(&vec, T::from(3)).unwrap(), 2); // lowest duplicate index
        assert_eq!(find(&vec, T::from(4)).unwrap(), 5);
        assert_eq!(find(&vec, T::from(5)).unwrap(), 4);
    }

    #[test]
    fn find_simple_i16() {
        check_find_simple::<i16>();
    }

    #[test]
    fn find_simple_u16() {
        check_find_simple::<u16>();
    }

    #[test]
    fn find_simple_i32() {
        check_find_simple::<i32>();
    }

    #[test]
    fn find_simple_u32() {
        check_find_simple::<u32>();
    }

    #[test]
    fn find_simple_i64() {
        check_find_simple::<i64>();
    }

    #[test]
    fn find_simple_u64() {
        check_find_simple::<u64>();
    }

    #[test]
    fn find_simple_f32() {
        check_find_simple::<f32>();
    }

    #[test]
    fn find_simple_f64() {
        check_find_simple::<f64>();
    }

    fn check_find_if_simple<T: SearchValue + From<u8> + Debug>() {
        let vec = simple_vec::<T>();

        assert_eq!(find_if(&vec, Bound::eq(T::from(0))).unwrap(), 5);
        assert_eq!(find_if(&vec, Bound::eq(T::from(1))).unwrap(), 0);
        assert_eq!(find_if(&vec, Bound::eq(T::from(2))).unwrap(), 1);
        assert_eq!(find_if(&vec, Bound::eq(T::from(3))).unwrap(), 2);
        assert_eq!(find_if(&vec, Bound::eq(T::from(4))).unwrap(), 5);
        assert_eq!(find_if(&vec, Bound::eq(T::from(5))).unwrap(), 4);
    }

    #[test]
    fn find_if_simple_i16() {
        check_find_if_simple::<i16>();
    }

    #[test]
    fn find_if_simple_u16() {
        check_find_if_simple::<u16>();
    }

    #[test]
    fn find_if_simple_i32() {
        check_find_if_simple::<i32>();
    }

    #[test]
    fn find_if_simple_u32() {
        check_find_if_simple::<u32>();
    }

    #[test]
    fn find_if_simple_i64() {
        check_find_if_simple::<i64>();
    }

    #[test]
    fn find_if_simple_u64() {
        check_find_if_simple::<u64>();
    }

    #[test]
    fn find_if_simple_f32() {
        check_find_if_simple::<f32>();
    }

    #[test]
    fn find_if_simple_f64() {
        check_find_if_simple::<f64>();
    }

    // [0,1,2,3,4] with "< k": the first index where the predicate fails is k.
    fn check_find_if_not_simple<T: SearchValue + From<u8> + Debug>() {
        let vec: Vec<T> = [0u8, 1, 2, 3, 4].iter().map(|&x| T::from(x)).collect();

        for k in 0u8..=5 {
            let expected = (k as usize).min(5);
            assert_eq!(
                find_if_not(&vec, Bound::lt(T::from(k))).unwrap(),
                expected,
                "k={}",
                k
            );
        }
    }

    #[test]
    fn find_if_not_simple_i16() {
        check_find_if_not_simple::<i16>();
    }

    #[test]
    fn find_if_not_simple_u16() {
        check_find_if_not_simple::<u16>();
    }

    #[test]
    fn find_if_not_simple_i32() {
        check_find_if_not_simple::<i32>();
    }

    #[test]
    fn find_if_not_simple_u32() {
        check_find_if_not_simple::<u32>();
    }

    #[test]
    fn find_if_not_simple_i64() {
        check_find_if_not_simple::<i64>();
    }

    #[test]
    fn find_if_not_simple_u64() {
        check_find_if_not_simple::<u64>();
    }

    #[test]
    fn find_if_not_simple_f32() {
        check_find_if_not_simple::<f32>();
    }

    #[test]
    fn find_if_not_simple_f64() {
        check_find_if_not_simple::<f64>();
    }

    // =============================================================================
    //   TYPED ENTRY POINTS
    // =============================================================================

    #[test]
    fn typed_entry_points_match_generic() {
        let v16: Vec<i16> = simple_vec();
        assert_eq!(find_i16(&v16, 3).unwrap(), 2);
        let v16u: Vec<u16> = simple_vec();
        assert_eq!(find_u16(&v16u, 5).unwrap(), 4);

        let v32: Vec<i32> = simple_vec();
        assert_eq!(find_i32(&v32, 3).unwrap(), 2);
        assert_eq!(find_if_i32(&v32, Bound::gt(3)).unwrap(), 4);
        assert_eq!(find_if_not_i32(&v32, Bound::le(3)).unwrap(), 4);

        let v32u: Vec<u32> = simple_vec();
        assert_eq!(find_u32(&v32u, 2).unwrap(), 1);

        let v64: Vec<i64> = simple_vec();
        assert_eq!(find_i64(&v64, 9).unwrap(), 5);
        let v64u: Vec<u64> = simple_vec();
        assert_eq!(find_u64(&v64u, 1).unwrap(), 0);
        assert_eq!(find_if_u64(&v64u, Bound::ge(3)).unwrap(), 2);
        assert_eq!(find_if_not_u64(&v64u, Bound::ne(1)).unwrap(), 0);

        let vf32: Vec<f32> = simple_vec();
        assert_eq!(find_f32(&vf32, 3.0).unwrap(), 2);
        let vf64: Vec<f64> = simple_vec();
        assert_eq!(find_f64(&vf64, 5.0).unwrap(), 4);
    }

    // =============================================================================
    //   EDGE CASES
    // =============================================================================

    #[test]
    fn empty_sequence_returns_length() {
        let empty: Vec<u32> = vec![];
        assert_eq!(find(&empty, 7).unwrap(), 0);
        assert_eq!(find_if(&empty, Bound::lt(7)).unwrap(), 0);
        assert_eq!(find_if_not(&empty, Bound::lt(7)).unwrap(), 0);

        let empty: Vec<f64> = vec![];
        assert_eq!(find(&empty, 0.0).unwrap(), 0);
    }

    #[test]
    fn match_at_first_index() {
        let vec = vec![42u64, 1, 2, 42];
        assert_eq!(find(&vec, 42).unwrap(), 0);
        assert_eq!(find_if(&vec, Bound::ge(42)).unwrap(), 0);
    }

    #[test]
    fn absent_value_returns_length() {
        let vec = vec![1i32, 2, 3];
        assert_eq!(find(&vec, 99).unwrap(), 3);
        assert_eq!(find_if(&vec, Bound::gt(100)).unwrap(), 3);
    }

    #[test]
    fn duplicates_return_lowest_index() {
        let vec = vec![7u32, 3, 3, 3, 7];
        assert_eq!(find(&vec, 3).unwrap(), 1);
        assert_eq!(find(&vec, 7).unwrap(), 0);
    }

    #[test]
    fn nan_matches_only_ne() {
        let vec = vec![1.0f64, f64::NAN, 3.0];

        // NaN is unordered against everything
        assert_eq!(find(&vec, f64::NAN).unwrap(), 3);
        assert_eq!(find_if(&vec, Bound::lt(2.0)).unwrap(), 0);
        assert_eq!(find_if(&vec, Bound::gt(2.0)).unwrap(), 2);
        assert_eq!(find_if(&vec, Bound::ne(1.0)).unwrap(), 1);

        // !(x < 100) must match the NaN element, x >= 100 must not
        assert_eq!(find_if_not(&vec, Bound::lt(100.0)).unwrap(), 1);
        assert_eq!(find_if(&vec, Bound::ge(100.0)).unwrap(), 3);
    }

    #[test]
    fn negative_zero_equals_zero() {
        let vec = vec![-0.0f32, 1.0];
        assert_eq!(find(&vec, 0.0).unwrap(), 0);
        assert_eq!(find_if(&vec, Bound::eq(-0.0)).unwrap(), 0);
    }

    // =============================================================================
    //   TIER-AGREEMENT TESTS
    // =============================================================================
    //
    // Sizes chosen to land in each tier: below the SIMD threshold (scalar),
    // between the thresholds (SIMD where available), and above the GPU
    // threshold (CUDA where available). Whatever tier handles the call must
    // agree with the scalar reference.

    fn check_tiers_against_reference<T>(min: T, max: T, seed: u64)
    where
        T: SearchValue + SampleUniform + From<u8> + Debug,
    {
        config_test_logger();
        for size in [16usize, 256, 8192] {
            let data = get_random_data(size, min, max, seed);

            // Absent-leaning needle plus samples at power-of-two indices
            let needle = T::from(0);
            assert_eq!(
                find(&data, needle).unwrap(),
                reference_find(&data, needle),
                "find size={}",
                size
            );

            let mut i = 1;
            while i < size {
                let sample = data[i];
                assert_eq!(
                    find(&data, sample).unwrap(),
                    reference_find(&data, sample),
                    "find size={} i={}",
                    size,
                    i
                );
                assert_eq!(
                    find_if(&data, Bound::eq(sample)).unwrap(),
                    reference_find_if(&data, Bound::eq(sample)),
                    "find_if size={} i={}",
                    size,
                    i
                );
                assert_eq!(
                    find_if_not(&data, Bound::ne(sample)).unwrap(),
                    reference_find_if_not(&data, Bound::ne(sample)),
                    "find_if_not size={} i={}",
                    size,
                    i
                );
                i *= 2;
            }
        }
    }

    #[test]
    fn tiers_agree_u32() {
        check_tiers_against_reference::<u32>(u32::MIN, u32::MAX, 0xf1d0);
    }

    #[test]
    fn tiers_agree_i32() {
        check_tiers_against_reference::<i32>(i32::MIN, i32::MAX, 0xf1d1);
    }

    #[test]
    fn tiers_agree_u64() {
        check_tiers_against_reference::<u64>(u64::MIN, u64::MAX, 0xf1d2);
    }

    #[test]
    fn tiers_agree_i64() {
        check_tiers_against_reference::<i64>(i64::MIN, i64::MAX, 0xf1d3);
    }

    #[test]
    fn tiers_agree_u16() {
        check_tiers_against_reference::<u16>(u16::MIN, u16::MAX, 0xf1d4);
    }

    #[test]
    fn tiers_agree_i16() {
        check_tiers_against_reference::<i16>(i16::MIN, i16::MAX, 0xf1d5);
    }

    #[test]
    fn tiers_agree_f32() {
        check_tiers_against_reference::<f32>(-1.0e6, 1.0e6, 0xf1d6);
    }

    #[test]
    fn tiers_agree_f64() {
        check_tiers_against_reference::<f64>(-1.0e9, 1.0e9, 0xf1d7);
    }

    // Ordering predicates split the data at known points; every operator must
    // agree with the scalar reference through whichever tier runs.
    #[test]
    fn all_operators_agree_with_reference() {
        let sizes = [16usize, 256, 8192];
        for &size in &sizes {
            let data = get_random_data::<u32>(size, 0, 1000, 0xbeef);
            for value in [0u32, 1, 250, 500, 999, 1000] {
                for pred in [
                    Bound::eq(value),
                    Bound::ne(value),
                    Bound::lt(value),
                    Bound::le(value),
                    Bound::gt(value),
                    Bound::ge(value),
                ] {
                    assert_eq!(
                        find_if(&data, pred).unwrap(),
                        reference_find_if(&data, pred),
                        "find_if size={} pred={:?}",
                        size,
                        pred
                    );
                    assert_eq!(
                        find_if_not(&data, pred).unwrap(),
                        reference_find_if_not(&data, pred),
                        "find_if_not size={} pred={:?}",
                        size,
                        pred
                    );
                }
            }
        }
    }

    // =============================================================================
    //   SIZE LADDER (original random-data matrix)
    // =============================================================================

    fn check_size_ladder<T>(min: T, max: T, seed: u64)
    where
        T: SearchValue + SampleUniform + From<u8> + Debug,
    {
        for size in get_sizes() {
            let data = get_random_data(size, min, max, seed);

            let needle = T::from(0);
            assert_eq!(
                find(&data, needle).unwrap(),
                reference_find(&data, needle),
                "size={}",
                size
            );

            let mut i = 1;
            while i < size {
                let sample = data[i];
                assert_eq!(
                    find(&data, sample).unwrap(),
                    reference_find(&data, sample),
                    "size={} i={}",
                    size,
                    i
                );
                i *= 2;
            }
        }
    }

    #[test]
    fn size_ladder_u32() {
        check_size_ladder::<u32>(u32::MIN, u32::MAX, 0xa110);
    }

    #[test]
    fn size_ladder_i64() {
        check_size_ladder::<i64>(i64::MIN, i64::MAX, 0xa111);
    }

    #[test]
    fn size_ladder_f64() {
        check_size_ladder::<f64>(-1.0e12, 1.0e12, 0xa112);
    }
}
