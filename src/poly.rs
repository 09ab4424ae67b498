use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    str::FromStr,
};

use miette::Error;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

/// A univariate polynomial with exact rational coefficients, stored densely:
/// `coefficients[i]` belongs to `x^i`.
///
/// Equality ignores trailing zero coefficients, so `[1, 2]` and `[1, 2, 0]`
/// are the same polynomial.
#[derive(Debug, Clone)]
pub struct Polynomial {
    coefficients: Vec<BigRational>,
}

/// A single term `coefficient * x^exponent`.
#[derive(Debug, Clone, PartialEq)]
pub struct Monomial {
    pub coefficient: BigRational,
    pub exponent: usize,
}

impl Monomial {
    pub fn new(coefficient: BigRational, exponent: usize) -> Self {
        Monomial {
            coefficient,
            exponent,
        }
    }

    pub fn constant(coefficient: BigRational) -> Self {
        Monomial::new(coefficient, 0)
    }

    /// Shifts `p` up by `exponent` places and scales it by `coefficient`.
    ///
    /// # Panics
    ///
    /// If the resulting degree does not fit in a `usize`.
    pub fn multiply(&self, p: &Polynomial) -> Polynomial {
        let len = self
            .exponent
            .checked_add(p.coefficients.len())
            .expect("polynomial degree overflows usize");
        let mut coefficients = Vec::with_capacity(len);
        coefficients.resize(self.exponent, BigRational::zero());
        coefficients.extend(p.coefficients.iter().map(|c| c * &self.coefficient));
        Polynomial::new(coefficients)
    }

    pub fn polynomial(&self) -> Polynomial {
        let mut coefficients = vec![BigRational::zero(); self.exponent];
        coefficients.push(self.coefficient.clone());
        Polynomial::new(coefficients)
    }
}

impl Polynomial {
    /// An empty vector is read as the zero polynomial.
    pub fn new(mut coefficients: Vec<BigRational>) -> Self {
        if coefficients.is_empty() {
            coefficients.push(BigRational::zero());
        }
        Polynomial { coefficients }
    }

    pub fn from_integers(coefficients: &[i64]) -> Self {
        Polynomial::new(
            coefficients
                .iter()
                .map(|&c| BigRational::from_integer(c.into()))
                .collect(),
        )
    }

    pub fn zero() -> Self {
        Polynomial::new(vec![BigRational::zero()])
    }

    pub fn one() -> Self {
        Polynomial::new(vec![BigRational::one()])
    }

    pub fn coefficients(&self) -> &[BigRational] {
        &self.coefficients
    }

    /// Zero for any exponent past the stored vector.
    pub fn coefficient(&self, i: usize) -> BigRational {
        self.coefficients
            .get(i)
            .cloned()
            .unwrap_or_else(BigRational::zero)
    }

    pub fn monomial(&self, i: usize) -> Monomial {
        Monomial::new(self.coefficient(i), i)
    }

    /// Length of the coefficient vector minus one, trailing zeros included.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(Zero::is_zero)
    }

    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let len = self.coefficients.len().max(other.coefficients.len());
        Polynomial::new(
            (0..len)
                .map(|i| self.coefficient(i) + other.coefficient(i))
                .collect(),
        )
    }

    pub fn multiply(&self, other: &Polynomial) -> Polynomial {
        (0..=self.degree())
            .map(|i| self.monomial(i).multiply(other))
            .fold(Polynomial::zero(), |acc, p| acc.add(&p))
    }

    pub fn scale(&self, factor: &BigRational) -> Polynomial {
        Polynomial::new(self.coefficients.iter().map(|c| c * factor).collect())
    }

    pub fn negate(&self) -> Polynomial {
        Polynomial::new(self.coefficients.iter().map(|c| -c).collect())
    }

    /// The coefficients without trailing zeros.
    fn significant(&self) -> &[BigRational] {
        let len = self
            .coefficients
            .iter()
            .rposition(|c| !c.is_zero())
            .map_or(0, |i| i + 1);
        &self.coefficients[..len]
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        let len = self.coefficients.len().max(other.coefficients.len());
        (0..len).all(|i| self.coefficient(i) == other.coefficient(i))
    }
}

impl Eq for Polynomial {}

impl Hash for Polynomial {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl FromStr for Polynomial {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}

impl Display for Polynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (i, coefficient) in self.coefficients.iter().enumerate().rev() {
            if coefficient.is_zero() {
                continue;
            }
            let sign = match (first, coefficient.is_negative()) {
                (true, false) => "",
                (_, true) => "- ",
                (false, false) => "+ ",
            };
            if !first {
                write!(f, " ")?;
            }
            first = false;

            let magnitude = coefficient.abs();
            write!(f, "{sign}")?;
            if i == 0 || !magnitude.is_one() {
                write!(f, "{magnitude}")?;
            }
            match i {
                0 => {}
                1 => write!(f, "x")?,
                _ => write!(f, "x^{i}")?,
            }
        }
        Ok(())
    }
}
