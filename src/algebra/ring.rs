// Copyright 2025 Cowboy AI, LLC.

//! Coefficient rings and their scalars
//!
//! Only the algebraic contract is modelled here: addition, multiplication,
//! negation, division where it exists, canonical embeddings and a total
//! order. Integer arithmetic is checked so overflow surfaces as an
//! [`AlgebraError`] instead of wrapping silently.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{AlgebraError, AlgebraResult};

/// A coefficient ring
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(tag = "kind", content = "modulus")]
pub enum Ring {
    /// The integers Z
    Integer,
    /// The integers modulo `n` (n >= 2)
    Modular(i64),
    /// The rationals Q
    Rational,
    /// The reals R, approximated by `f64`
    Real,
}

impl Ring {
    /// Additive identity of the ring
    pub fn zero(self) -> Scalar {
        match self {
            Ring::Integer => Scalar::Integer(0),
            Ring::Modular(modulus) => Scalar::Modular { value: 0, modulus },
            Ring::Rational => Scalar::Rational(Rational::ZERO),
            Ring::Real => Scalar::Real(0.0),
        }
    }

    /// Multiplicative identity of the ring
    pub fn one(self) -> Scalar {
        match self {
            Ring::Integer => Scalar::Integer(1),
            Ring::Modular(modulus) => Scalar::Modular { value: i64::from(modulus > 1), modulus },
            Ring::Rational => Scalar::Rational(Rational::ONE),
            Ring::Real => Scalar::Real(1.0),
        }
    }

    /// This ring, or an error for a modulus below 2
    pub fn validate(self) -> AlgebraResult<Self> {
        match self {
            Ring::Modular(modulus) if modulus < 2 => Err(AlgebraError::InvalidModulus(modulus)),
            ring => Ok(ring),
        }
    }

    /// True when a canonical ring homomorphism `self -> target` exists
    pub fn embeds_into(self, target: Ring) -> bool {
        match (self, target) {
            (a, b) if a == b => true,
            (Ring::Integer, _) => true,
            (Ring::Rational, Ring::Real) => true,
            _ => false,
        }
    }
}

impl Display for Ring {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Ring::Integer => f.write_str("Z"),
            Ring::Modular(n) => write!(f, "Z_{n}"),
            Ring::Rational => f.write_str("Q"),
            Ring::Real => f.write_str("R"),
        }
    }
}

/// A normalised fraction with positive denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Rational {
    numerator: i64,
    denominator: i64,
}

impl Rational {
    /// Zero
    pub const ZERO: Rational = Rational { numerator: 0, denominator: 1 };
    /// One
    pub const ONE: Rational = Rational { numerator: 1, denominator: 1 };

    /// Build `numerator / denominator`, reduced to lowest terms
    pub fn new(numerator: i64, denominator: i64) -> AlgebraResult<Self> {
        if denominator == 0 {
            return Err(AlgebraError::DivisionByZero);
        }
        let g = gcd(numerator, denominator).max(1);
        let (mut n, mut d) = (numerator / g, denominator / g);
        if d < 0 {
            n = n.checked_neg().ok_or(AlgebraError::Overflow)?;
            d = d.checked_neg().ok_or(AlgebraError::Overflow)?;
        }
        Ok(Self { numerator: n, denominator: d })
    }

    /// Integral rational
    pub fn from_integer(value: i64) -> Self {
        Self { numerator: value, denominator: 1 }
    }

    /// Numerator in lowest terms
    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    /// Positive denominator in lowest terms
    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    fn add(self, other: Self) -> AlgebraResult<Self> {
        let n = self
            .numerator
            .checked_mul(other.denominator)
            .and_then(|a| other.numerator.checked_mul(self.denominator).and_then(|b| a.checked_add(b)))
            .ok_or(AlgebraError::Overflow)?;
        let d = self
            .denominator
            .checked_mul(other.denominator)
            .ok_or(AlgebraError::Overflow)?;
        Rational::new(n, d)
    }

    fn mul(self, other: Self) -> AlgebraResult<Self> {
        let n = self
            .numerator
            .checked_mul(other.numerator)
            .ok_or(AlgebraError::Overflow)?;
        let d = self
            .denominator
            .checked_mul(other.denominator)
            .ok_or(AlgebraError::Overflow)?;
        Rational::new(n, d)
    }

    fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let left = i128::from(self.numerator) * i128::from(other.denominator);
        let right = i128::from(other.numerator) * i128::from(self.denominator);
        left.cmp(&right)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    i64::try_from(a).unwrap_or(i64::MAX)
}

/// An element of one of the supported rings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "ring", content = "value")]
pub enum Scalar {
    /// Integer value
    Integer(i64),
    /// Residue class `value mod modulus`, always reduced into `0..modulus`
    Modular {
        /// Representative in `0..modulus`
        value: i64,
        /// The modulus
        modulus: i64,
    },
    /// Rational value
    Rational(Rational),
    /// Real value
    Real(f64),
}

impl Scalar {
    /// Residue of `value` modulo `modulus`
    pub fn modular(value: i64, modulus: i64) -> AlgebraResult<Self> {
        residue(i128::from(value), modulus)
    }

    /// The ring this scalar belongs to
    pub fn ring(&self) -> Ring {
        match self {
            Scalar::Integer(_) => Ring::Integer,
            Scalar::Modular { modulus, .. } => Ring::Modular(*modulus),
            Scalar::Rational(_) => Ring::Rational,
            Scalar::Real(_) => Ring::Real,
        }
    }

    /// True for the additive identity
    pub fn is_zero(&self) -> bool {
        *self == self.ring().zero()
    }

    /// Sum of two scalars of the same ring
    pub fn add(&self, other: &Scalar) -> AlgebraResult<Scalar> {
        match (self, other) {
            (Scalar::Integer(a), Scalar::Integer(b)) => {
                a.checked_add(*b).map(Scalar::Integer).ok_or(AlgebraError::Overflow)
            }
            (Scalar::Modular { value: a, modulus: m }, Scalar::Modular { value: b, modulus: n })
                if m == n =>
            {
                residue(i128::from(*a) + i128::from(*b), *m)
            }
            (Scalar::Rational(a), Scalar::Rational(b)) => a.add(*b).map(Scalar::Rational),
            (Scalar::Real(a), Scalar::Real(b)) => Ok(Scalar::Real(a + b)),
            _ => Err(self.ring_mismatch(other)),
        }
    }

    /// Product of two scalars of the same ring
    pub fn mul(&self, other: &Scalar) -> AlgebraResult<Scalar> {
        match (self, other) {
            (Scalar::Integer(a), Scalar::Integer(b)) => {
                a.checked_mul(*b).map(Scalar::Integer).ok_or(AlgebraError::Overflow)
            }
            (Scalar::Modular { value: a, modulus: m }, Scalar::Modular { value: b, modulus: n })
                if m == n =>
            {
                residue(i128::from(*a) * i128::from(*b), *m)
            }
            (Scalar::Rational(a), Scalar::Rational(b)) => a.mul(*b).map(Scalar::Rational),
            (Scalar::Real(a), Scalar::Real(b)) => Ok(Scalar::Real(a * b)),
            _ => Err(self.ring_mismatch(other)),
        }
    }

    /// Additive inverse
    pub fn neg(&self) -> AlgebraResult<Scalar> {
        match self {
            Scalar::Integer(a) => a.checked_neg().map(Scalar::Integer).ok_or(AlgebraError::Overflow),
            Scalar::Modular { value, modulus } => Scalar::modular(-value, *modulus),
            Scalar::Rational(r) => Rational::new(
                r.numerator().checked_neg().ok_or(AlgebraError::Overflow)?,
                r.denominator(),
            )
            .map(Scalar::Rational),
            Scalar::Real(a) => Ok(Scalar::Real(-a)),
        }
    }

    /// Multiplicative inverse, failing for non-units
    pub fn inverse(&self) -> AlgebraResult<Scalar> {
        match self {
            Scalar::Integer(1) | Scalar::Integer(-1) => Ok(*self),
            Scalar::Integer(0) => Err(AlgebraError::DivisionByZero),
            Scalar::Integer(_) => Err(AlgebraError::NotInvertible(self.to_string())),
            Scalar::Modular { value, modulus } => {
                Ring::Modular(*modulus).validate()?;
                let (g, x) = extended_gcd(*value, *modulus);
                if g != 1 {
                    return Err(AlgebraError::NotInvertible(self.to_string()));
                }
                Scalar::modular(x, *modulus)
            }
            Scalar::Rational(r) => {
                Rational::new(r.denominator(), r.numerator()).map(Scalar::Rational)
            }
            Scalar::Real(a) if *a == 0.0 => Err(AlgebraError::DivisionByZero),
            Scalar::Real(a) => Ok(Scalar::Real(1.0 / a)),
        }
    }

    /// Quotient `self / other`
    pub fn div(&self, other: &Scalar) -> AlgebraResult<Scalar> {
        if self.ring() != other.ring() {
            return Err(self.ring_mismatch(other));
        }
        self.mul(&other.inverse()?)
    }

    /// Image of this scalar under the canonical homomorphism into `target`
    pub fn embed(&self, target: Ring) -> AlgebraResult<Scalar> {
        match (self, target) {
            (s, t) if s.ring() == t => Ok(*s),
            (Scalar::Integer(a), Ring::Modular(m)) => Scalar::modular(*a, m),
            (Scalar::Integer(a), Ring::Rational) => Ok(Scalar::Rational(Rational::from_integer(*a))),
            (Scalar::Integer(a), Ring::Real) => Ok(Scalar::Real(*a as f64)),
            (Scalar::Rational(r), Ring::Real) => Ok(Scalar::Real(r.to_f64())),
            _ => Err(AlgebraError::RingMismatch { expected: target, actual: self.ring() }),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Scalar::Integer(_) => 0,
            Scalar::Modular { .. } => 1,
            Scalar::Rational(_) => 2,
            Scalar::Real(_) => 3,
        }
    }

    fn ring_mismatch(&self, other: &Scalar) -> AlgebraError {
        AlgebraError::RingMismatch { expected: self.ring(), actual: other.ring() }
    }
}

/// Residue class of `value`; rejects moduli below 2, which deserialized
/// scalars may carry
fn residue(value: i128, modulus: i64) -> AlgebraResult<Scalar> {
    Ring::Modular(modulus).validate()?;
    let value = i64::try_from(value.rem_euclid(i128::from(modulus))).map_err(|_| AlgebraError::Overflow)?;
    Ok(Scalar::Modular { value, modulus })
}

fn extended_gcd(a: i64, b: i64) -> (i64, i64) {
    let (mut old_r, mut r) = (i128::from(a), i128::from(b));
    let (mut old_s, mut s) = (1i128, 0i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    (old_r.abs() as i64, (old_s.rem_euclid(i128::from(b))) as i64)
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Scalar::Integer(a), Scalar::Integer(b)) => a.cmp(b),
            (Scalar::Modular { value: a, modulus: m }, Scalar::Modular { value: b, modulus: n }) => {
                m.cmp(n).then(a.cmp(b))
            }
            (Scalar::Rational(a), Scalar::Rational(b)) => a.cmp(b),
            (Scalar::Real(a), Scalar::Real(b)) => a.total_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scalar {}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(a) => write!(f, "{a}"),
            Scalar::Modular { value, modulus } => write!(f, "{value}({modulus})"),
            Scalar::Rational(r) => write!(f, "{r}"),
            Scalar::Real(a) => write!(f, "{a}"),
        }
    }
}
