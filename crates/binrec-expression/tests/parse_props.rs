//! Property tests: parse followed by eval is deterministic and matches
//! directly computed arithmetic for grammar-conforming inputs.

use binrec_expression::{eval, parse, Scope};
use proptest::prelude::*;

struct Empty;

impl Scope for Empty {
    fn resolve(&self, _path: &[&str]) -> Option<i64> {
        None
    }
}

fn run(text: &str) -> i64 {
    let node = parse(text).unwrap_or_else(|e| panic!("{text:?}: {e}"));
    eval(&Empty, &node).unwrap_or_else(|e| panic!("{text:?}: {e}"))
}

proptest! {
    #[test]
    fn single_op_matches_arithmetic(a in 0i64..1_000_000, b in 0i64..1_000_000) {
        prop_assert_eq!(run(&format!("{a}+{b}")), a + b);
        prop_assert_eq!(run(&format!("{a}-{b}")), a - b);
        prop_assert_eq!(run(&format!("{a}*{b}")), a.wrapping_mul(b));
        prop_assert_eq!(run(&format!("{a}&{b}")), a & b);
        prop_assert_eq!(run(&format!("{a}&^{b}")), a & !b);
        prop_assert_eq!(run(&format!("{a} == {b}")), (a == b) as i64);
        prop_assert_eq!(run(&format!("{a} < {b}")), (a < b) as i64);
    }

    #[test]
    fn explicit_grouping_nests(a in 0i64..10_000, b in 0i64..10_000, c in 0i64..10_000) {
        prop_assert_eq!(run(&format!("({a}+{b})*{c}")), (a + b).wrapping_mul(c));
        prop_assert_eq!(run(&format!("{c}+({a}*{b})")), c + a.wrapping_mul(b));
    }

    #[test]
    fn unparenthesized_chains_are_rejected(a in 0i64..1000, b in 0i64..1000, c in 0i64..1000) {
        let text = format!("{a}+{b}+{c}");
        prop_assert!(parse(&text).is_err());
    }

    #[test]
    fn hex_and_decimal_agree(v in 0i64..0x7fff_ffff) {
        prop_assert_eq!(run(&format!("{:#x}", v)), v);
        prop_assert_eq!(run(&v.to_string()), v);
    }
}
