// SPDX-License-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::types::{Bound, CmpOp};

    #[test]
    fn integer_operators() {
        let b = Bound::new(CmpOp::Eq, 5i32);
        assert!(b.eval(5));
        assert!(!b.eval(4));
        assert!(!b.eval(6));

        let b = Bound::ne(5i32);
        assert!(!b.eval(5));
        assert!(b.eval(4));
        assert!(b.eval(6));

        let b = Bound::lt(5i32);
        assert!(b.eval(4));
        assert!(!b.eval(5));
        assert!(!b.eval(6));

        let b = Bound::le(5i32);
        assert!(b.eval(4));
        assert!(b.eval(5));
        assert!(!b.eval(6));

        let b = Bound::gt(5i32);
        assert!(!b.eval(4));
        assert!(!b.eval(5));
        assert!(b.eval(6));

        let b = Bound::ge(5i32);
        assert!(!b.eval(4));
        assert!(b.eval(5));
        assert!(b.eval(6));
    }

    #[test]
    fn accessors() {
        let b = Bound::lt(7u64);
        assert_eq!(b.op(), CmpOp::Lt);
        assert_eq!(b.value(), 7);
    }

    #[test]
    fn unsigned_extremes() {
        assert!(Bound::ge(0u32).eval(u32::MAX));
        assert!(Bound::le(u32::MAX).eval(0));
        assert!(!Bound::lt(0u32).eval(0));
        assert!(!Bound::gt(u64::MAX).eval(u64::MAX));
    }

    // NaN is unordered against everything, so only Ne holds, on either side
    // of the comparison.
    #[test]
    fn nan_satisfies_only_ne() {
        let nan = f64::NAN;

        assert!(!Bound::eq(1.0).eval(nan));
        assert!(!Bound::lt(1.0).eval(nan));
        assert!(!Bound::le(1.0).eval(nan));
        assert!(!Bound::gt(1.0).eval(nan));
        assert!(!Bound::ge(1.0).eval(nan));
        assert!(Bound::ne(1.0).eval(nan));

        // NaN as the bound value
        assert!(!Bound::eq(nan).eval(1.0));
        assert!(!Bound::lt(nan).eval(1.0));
        assert!(Bound::ne(nan).eval(1.0));
        assert!(Bound::ne(nan).eval(nan));
    }

    #[test]
    fn negative_zero_compares_equal() {
        assert!(Bound::eq(0.0f64).eval(-0.0));
        assert!(Bound::eq(-0.0f64).eval(0.0));
        assert!(!Bound::lt(0.0f64).eval(-0.0));
        assert!(!Bound::gt(0.0f64).eval(-0.0));
        assert!(Bound::le(0.0f32).eval(-0.0));
        assert!(Bound::ge(0.0f32).eval(-0.0));
    }

    // table_not() must be the exact complement of table() over all four
    // ordering states, for every operator.
    #[test]
    fn complement_tables_disagree_on_every_state() {
        let ops = [CmpOp::Eq, CmpOp::Ne, CmpOp::Lt, CmpOp::Le, CmpOp::Gt, CmpOp::Ge];
        for op in ops {
            let b = Bound::new(op, 0i32);
            for state in 0..4u32 {
                let direct = (b.table() >> state) & 1;
                let negated = (b.table_not() >> state) & 1;
                assert_eq!(
                    direct ^ negated,
                    1,
                    "op={:?} state={} direct={} negated={}",
                    op,
                    state,
                    direct,
                    negated
                );
            }
        }
    }

    // eval() must agree with the native comparison operators on every
    // ordering outcome.
    #[test]
    fn eval_matches_native_operators() {
        let samples = [-3i64, -1, 0, 1, 2, 7];
        for &v in &samples {
            for &x in &samples {
                assert_eq!(Bound::eq(v).eval(x), x == v);
                assert_eq!(Bound::ne(v).eval(x), x != v);
                assert_eq!(Bound::lt(v).eval(x), x < v);
                assert_eq!(Bound::le(v).eval(x), x <= v);
                assert_eq!(Bound::gt(v).eval(x), x > v);
                assert_eq!(Bound::ge(v).eval(x), x >= v);
            }
        }
    }

    #[test]
    fn bound_serialization_round_trip() {
        let b = Bound::le(42u32);
        let json = serde_json::to_string(&b).unwrap();
        let back: Bound<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }
}
