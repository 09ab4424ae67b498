//! Property-based tests for the polynomial algebra and the parser.

use num_rational::BigRational;
use proptest::prelude::*;

use crate::{Polynomial, parse};

// Strategy for small rational coefficients, some of them proper fractions
fn small_coeff() -> impl Strategy<Value = BigRational> {
    (-20i64..20i64, 1i64..5i64).prop_map(|(n, d)| BigRational::new(n.into(), d.into()))
}

// Degree 0-4, trailing zeros allowed
fn small_poly() -> impl Strategy<Value = Polynomial> {
    proptest::collection::vec(small_coeff(), 1..=5).prop_map(Polynomial::new)
}

/// An expression tree together with its text and the polynomial it denotes.
#[derive(Debug, Clone)]
struct Expr {
    text: String,
    value: Polynomial,
}

fn leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![
        (0i64..10).prop_map(|n| Expr {
            text: n.to_string(),
            value: Polynomial::from_integers(&[n]),
        }),
        (0usize..4).prop_map(|e| {
            let mut coefficients = vec![0; e];
            coefficients.push(1);
            Expr {
                text: format!("x^{e}"),
                value: Polynomial::from_integers(&coefficients),
            }
        }),
    ]
}

fn expr() -> impl Strategy<Value = Expr> {
    leaf().prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr {
                text: format!("({} + {})", a.text, b.text),
                value: a.value.add(&b.value),
            }),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr {
                text: format!("({} - {})", a.text, b.text),
                value: a.value.add(&b.value.negate()),
            }),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr {
                text: format!("({} * {})", a.text, b.text),
                value: a.value.multiply(&b.value),
            }),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr {
                text: format!("({})({})", a.text, b.text),
                value: a.value.multiply(&b.value),
            }),
            inner.prop_map(|a| Expr {
                text: format!("-{}", a.text),
                value: a.value.negate(),
            }),
        ]
    })
}

// One flat signed term `c x^e` of an unparenthesized sum
fn term() -> impl Strategy<Value = (bool, i64, usize)> {
    (any::<bool>(), 1i64..10, 0usize..5)
}

proptest! {
    // Polynomial ring axioms

    #[test]
    fn add_commutative(a in small_poly(), b in small_poly()) {
        prop_assert_eq!(a.add(&b), b.add(&a));
    }

    #[test]
    fn add_associative(a in small_poly(), b in small_poly(), c in small_poly()) {
        prop_assert_eq!(a.add(&b).add(&c), a.add(&b.add(&c)));
    }

    #[test]
    fn multiply_commutative(a in small_poly(), b in small_poly()) {
        prop_assert_eq!(a.multiply(&b), b.multiply(&a));
    }

    #[test]
    fn multiply_associative(a in small_poly(), b in small_poly(), c in small_poly()) {
        prop_assert_eq!(a.multiply(&b).multiply(&c), a.multiply(&b.multiply(&c)));
    }

    #[test]
    fn distributive(a in small_poly(), b in small_poly(), c in small_poly()) {
        // a * (b + c) = a * b + a * c
        let left = a.multiply(&b.add(&c));
        let right = a.multiply(&b).add(&a.multiply(&c));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn identities(a in small_poly()) {
        prop_assert_eq!(a.add(&Polynomial::zero()), a.clone());
        prop_assert_eq!(a.multiply(&Polynomial::one()), a.clone());
        prop_assert!(a.multiply(&Polynomial::zero()).is_zero());
    }

    #[test]
    fn multiply_degree(a in small_poly(), b in small_poly()) {
        prop_assert_eq!(a.multiply(&b).degree(), a.degree() + b.degree());
    }

    #[test]
    fn additive_inverse(a in small_poly()) {
        prop_assert!(a.add(&a.negate()).is_zero());
    }

    #[test]
    fn trailing_zeros_do_not_matter(a in small_poly(), zeros in 0usize..4) {
        let mut padded = a.coefficients().to_vec();
        padded.extend(std::iter::repeat_n(BigRational::from_integer(0.into()), zeros));
        prop_assert_eq!(Polynomial::new(padded), a);
    }

    // Parser properties

    #[test]
    fn render_then_parse(a in small_poly()) {
        let text = a.to_string();
        let reparsed = parse(&text).map_err(|e| TestCaseError::fail(format!("{text}: {e}")))?;
        prop_assert_eq!(reparsed, a);
    }

    #[test]
    fn parse_agrees_with_algebra(e in expr()) {
        let parsed = parse(&e.text).map_err(|err| TestCaseError::fail(format!("{}: {err}", e.text)))?;
        prop_assert_eq!(parsed, e.value, "{}", e.text);
    }

    #[test]
    fn flat_sum_of_products(terms in proptest::collection::vec(term(), 1..6)) {
        let mut text = String::new();
        let mut expected = Polynomial::zero();
        for (negative, c, e) in terms {
            text.push_str(if negative { " - " } else { " + " });
            text.push_str(&format!("{c}x^{e}"));
            let mut coefficients = vec![0; e];
            coefficients.push(if negative { -c } else { c });
            expected = expected.add(&Polynomial::from_integers(&coefficients));
        }
        let parsed = parse(&text).map_err(|err| TestCaseError::fail(format!("{text}: {err}")))?;
        prop_assert_eq!(parsed, expected, "{}", text);
    }
}
