//! Character option flags passed to Fortran kernels by address.

use std::os::raw::c_char;

/// Operation applied to a matrix operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transpose {
    NoTrans,
    Trans,
    ConjTrans,
}

impl Transpose {
    pub fn as_char(self) -> u8 {
        match self {
            Transpose::NoTrans => b'N',
            Transpose::Trans => b'T',
            Transpose::ConjTrans => b'C',
        }
    }
}

/// Which triangle of a symmetric, Hermitian or triangular matrix is referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uplo {
    Upper,
    Lower,
}

impl Uplo {
    pub fn as_char(self) -> u8 {
        match self {
            Uplo::Upper => b'U',
            Uplo::Lower => b'L',
        }
    }
}

/// Whether a triangular matrix has an implicit unit diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diag {
    NonUnit,
    Unit,
}

impl Diag {
    pub fn as_char(self) -> u8 {
        match self {
            Diag::NonUnit => b'N',
            Diag::Unit => b'U',
        }
    }
}

/// Side on which the special matrix multiplies in level-3 kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_char(self) -> u8 {
        match self {
            Side::Left => b'L',
            Side::Right => b'R',
        }
    }
}

#[inline]
pub(crate) fn fortran_char(flag: u8) -> c_char {
    flag as c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_use_reference_blas_letters() {
        assert_eq!(Transpose::ConjTrans.as_char(), b'C');
        assert_eq!(Uplo::Lower.as_char(), b'L');
        assert_eq!(Diag::Unit.as_char(), b'U');
        assert_eq!(Side::Right.as_char(), b'R');
    }
}
