//! Call-site shape of a kernel under a profile.

use crate::kernel::{KernelDescriptor, Precision, ResultKind};
use crate::profile::{AbiProfile, ComplexReturn, FloatReturn, StrlenConvention};

/// Value passed for each hidden string length: every flag is one character.
pub const FLAG_LENGTH: usize = 1;

/// How a complex-valued result comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexResult {
    NotApplicable,
    ReturnValue,
    HiddenArgument,
}

/// How a real-valued result comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealResult {
    NotApplicable,
    Native,
    /// Declared as returning `double`; narrow to `f32` after the call.
    WidenedDouble,
}

/// Everything the adapter needs to declare and call one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallShape {
    pub symbol: String,
    /// Trailing hidden `size_t` arguments, appended after all regular ones.
    pub hidden_lengths: usize,
    pub complex_result: ComplexResult,
    pub real_result: RealResult,
}

impl CallShape {
    pub fn has_hidden_lengths(&self) -> bool {
        self.hidden_lengths > 0
    }
}

impl AbiProfile {
    pub fn call_shape(&self, desc: &KernelDescriptor) -> CallShape {
        let hidden_lengths = match self.strlen {
            StrlenConvention::End => desc.char_flags(),
            StrlenConvention::None => 0,
        };
        let precision = desc.precision();
        let (complex_result, real_result) = match desc.result() {
            ResultKind::Scalar if precision.is_complex() => (
                match self.complex_return {
                    ComplexReturn::ReturnValue => ComplexResult::ReturnValue,
                    ComplexReturn::HiddenArgument => ComplexResult::HiddenArgument,
                },
                RealResult::NotApplicable,
            ),
            ResultKind::Scalar | ResultKind::Real => {
                (ComplexResult::NotApplicable, self.real_result(precision))
            }
            ResultKind::Index | ResultKind::None => {
                (ComplexResult::NotApplicable, RealResult::NotApplicable)
            }
        };
        CallShape {
            symbol: self.symbol(desc),
            hidden_lengths,
            complex_result,
            real_result,
        }
    }

    fn real_result(&self, precision: Precision) -> RealResult {
        match (precision.real(), self.float_return) {
            (Precision::Single, FloatReturn::Double) => RealResult::WidenedDouble,
            _ => RealResult::Native,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Operation;
    use crate::profile::Mangling;

    fn desc(op: Operation, p: Precision) -> KernelDescriptor {
        KernelDescriptor::new(op, p).unwrap()
    }

    #[test]
    fn two_flags_two_hidden_lengths() {
        let gemm = desc(Operation::Gemm, Precision::Single);
        let shape = AbiProfile::gnu().call_shape(&gemm);
        assert_eq!(shape.hidden_lengths, 2);
        assert!(shape.has_hidden_lengths());

        let none = AbiProfile {
            strlen: StrlenConvention::None,
            ..AbiProfile::gnu()
        };
        let shape = none.call_shape(&gemm);
        assert_eq!(shape.hidden_lengths, 0);
        assert!(!shape.has_hidden_lengths());
    }

    #[test]
    fn hidden_length_counts_by_family() {
        let gnu = AbiProfile::gnu();
        let count = |op| gnu.call_shape(&desc(op, Precision::Double)).hidden_lengths;
        assert_eq!(count(Operation::Axpy), 0);
        assert_eq!(count(Operation::Gemv), 1);
        assert_eq!(count(Operation::Syr2k), 2);
        assert_eq!(count(Operation::Trmv), 3);
        assert_eq!(count(Operation::Trmm), 4);
    }

    #[test]
    fn complex_dot_follows_return_convention() {
        let zdotc = desc(Operation::Dot, Precision::ComplexDouble);
        assert_eq!(
            AbiProfile::gnu().call_shape(&zdotc).complex_result,
            ComplexResult::ReturnValue
        );
        assert_eq!(
            AbiProfile::intel().call_shape(&zdotc).complex_result,
            ComplexResult::HiddenArgument
        );
        let ddot = desc(Operation::Dot, Precision::Double);
        assert_eq!(
            AbiProfile::intel().call_shape(&ddot).complex_result,
            ComplexResult::NotApplicable
        );
    }

    #[test]
    fn single_precision_reductions_widen_under_f2c() {
        let f2c = AbiProfile::f2c();
        for (op, p) in [
            (Operation::Dot, Precision::Single),
            (Operation::Nrm2, Precision::Single),
            (Operation::Nrm2, Precision::ComplexSingle),
            (Operation::Asum, Precision::ComplexSingle),
        ] {
            assert_eq!(
                f2c.call_shape(&desc(op, p)).real_result,
                RealResult::WidenedDouble,
                "{op:?} {p:?}"
            );
        }
        assert_eq!(
            f2c.call_shape(&desc(Operation::Nrm2, Precision::Double))
                .real_result,
            RealResult::Native
        );
        assert_eq!(
            AbiProfile::gnu()
                .call_shape(&desc(Operation::Asum, Precision::Single))
                .real_result,
            RealResult::Native
        );
    }

    #[test]
    fn shape_carries_mangled_symbol() {
        let profile = AbiProfile {
            mangling: Mangling::UpperUnderscore,
            ..AbiProfile::gnu()
        };
        let shape = profile.call_shape(&desc(Operation::Iamax, Precision::ComplexSingle));
        assert_eq!(shape.symbol, "ICAMAX_");
    }
}
