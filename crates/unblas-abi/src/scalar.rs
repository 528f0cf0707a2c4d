//! Element types accepted by the native kernels.

use crate::kernel::Precision;
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

pub use num_complex::{Complex32, Complex64};

/// Native Fortran integer.
#[cfg(not(feature = "ilp64"))]
pub type BlasInt = i32;
/// Native Fortran integer.
#[cfg(feature = "ilp64")]
pub type BlasInt = i64;

/// A scalar with its precision carried at run time, for boundaries that are
/// not generic (device providers, configuration, logging).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    Single(f32),
    Double(f64),
    ComplexSingle(Complex32),
    ComplexDouble(Complex64),
}

impl ScalarValue {
    pub fn precision(&self) -> Precision {
        match self {
            ScalarValue::Single(_) => Precision::Single,
            ScalarValue::Double(_) => Precision::Double,
            ScalarValue::ComplexSingle(_) => Precision::ComplexSingle,
            ScalarValue::ComplexDouble(_) => Precision::ComplexDouble,
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for super::Complex32 {}
    impl Sealed for super::Complex64 {}
}

/// One of the four BLAS element types.
pub trait FortranScalar:
    sealed::Sealed
    + Copy
    + Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + AddAssign
{
    type Real: RealScalar;

    const PRECISION: Precision;

    fn zero() -> Self {
        Self::default()
    }
    fn one() -> Self {
        Self::from_real(<Self::Real as RealScalar>::from_f64(1.0))
    }
    fn from_real(re: Self::Real) -> Self;
    fn re(self) -> Self::Real;
    fn im(self) -> Self::Real;
    fn conj(self) -> Self;
    /// `|re| + |im|`, the magnitude used by `asum` and `iamax`.
    fn abs1(self) -> Self::Real;
    fn norm_sqr(self) -> Self::Real;
    fn into_value(self) -> ScalarValue;
    fn from_value(value: ScalarValue) -> Option<Self>;
}

/// `f32` or `f64`.
pub trait RealScalar: FortranScalar<Real = Self> + PartialOrd {
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
}

/// `Complex32` or `Complex64`.
pub trait ComplexScalar: FortranScalar {
    fn new(re: Self::Real, im: Self::Real) -> Self;
}

macro_rules! impl_real {
    ($t:ty, $variant:ident, $precision:expr) => {
        impl FortranScalar for $t {
            type Real = $t;
            const PRECISION: Precision = $precision;

            fn from_real(re: $t) -> Self {
                re
            }
            fn re(self) -> $t {
                self
            }
            fn im(self) -> $t {
                0.0
            }
            fn conj(self) -> Self {
                self
            }
            fn abs1(self) -> $t {
                self.abs()
            }
            fn norm_sqr(self) -> $t {
                self * self
            }
            fn into_value(self) -> ScalarValue {
                ScalarValue::$variant(self)
            }
            fn from_value(value: ScalarValue) -> Option<Self> {
                match value {
                    ScalarValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl RealScalar for $t {
            fn from_f64(v: f64) -> Self {
                v as $t
            }
            fn to_f64(self) -> f64 {
                self as f64
            }
            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }
            fn abs(self) -> Self {
                <$t>::abs(self)
            }
        }
    };
}

macro_rules! impl_complex {
    ($t:ty, $real:ty, $variant:ident, $precision:expr) => {
        impl FortranScalar for $t {
            type Real = $real;
            const PRECISION: Precision = $precision;

            fn from_real(re: $real) -> Self {
                <$t>::new(re, 0.0)
            }
            fn re(self) -> $real {
                self.re
            }
            fn im(self) -> $real {
                self.im
            }
            fn conj(self) -> Self {
                <$t>::conj(&self)
            }
            fn abs1(self) -> $real {
                self.re.abs() + self.im.abs()
            }
            fn norm_sqr(self) -> $real {
                <$t>::norm_sqr(&self)
            }
            fn into_value(self) -> ScalarValue {
                ScalarValue::$variant(self)
            }
            fn from_value(value: ScalarValue) -> Option<Self> {
                match value {
                    ScalarValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl ComplexScalar for $t {
            fn new(re: $real, im: $real) -> Self {
                <$t>::new(re, im)
            }
        }
    };
}

impl_real!(f32, Single, Precision::Single);
impl_real!(f64, Double, Precision::Double);
impl_complex!(Complex32, f32, ComplexSingle, Precision::ComplexSingle);
impl_complex!(Complex64, f64, ComplexDouble, Precision::ComplexDouble);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_round_trip_keeps_precision() {
        let z = Complex64::new(1.0, -2.0);
        let v = z.into_value();
        assert_eq!(v.precision(), Precision::ComplexDouble);
        assert_eq!(Complex64::from_value(v), Some(z));
        assert_eq!(f64::from_value(v), None);
    }

    #[test]
    fn abs1_sums_component_magnitudes() {
        assert_eq!(Complex32::new(-3.0, 4.0).abs1(), 7.0);
        assert_eq!((-2.5f64).abs1(), 2.5);
    }
}
