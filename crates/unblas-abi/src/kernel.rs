//! Kernel descriptors: which native routine, in which precision.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar precision of a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precision {
    Single,
    Double,
    ComplexSingle,
    ComplexDouble,
}

impl Precision {
    pub const ALL: [Precision; 4] = [
        Precision::Single,
        Precision::Double,
        Precision::ComplexSingle,
        Precision::ComplexDouble,
    ];

    /// Reference BLAS type letter.
    pub fn prefix(self) -> char {
        match self {
            Precision::Single => 's',
            Precision::Double => 'd',
            Precision::ComplexSingle => 'c',
            Precision::ComplexDouble => 'z',
        }
    }

    pub fn is_complex(self) -> bool {
        matches!(self, Precision::ComplexSingle | Precision::ComplexDouble)
    }

    /// Precision of the real part.
    pub fn real(self) -> Precision {
        match self {
            Precision::Single | Precision::ComplexSingle => Precision::Single,
            Precision::Double | Precision::ComplexDouble => Precision::Double,
        }
    }

    pub fn element_size(self) -> usize {
        match self {
            Precision::Single => 4,
            Precision::Double | Precision::ComplexSingle => 8,
            Precision::ComplexDouble => 16,
        }
    }
}

/// Every routine the dispatch layer knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Axpy,
    Scal,
    Copy,
    Swap,
    /// Conjugating dot product for complex types; plain dot for real.
    Dot,
    /// Unconjugated dot product; identical to `Dot` for real types.
    Dotu,
    Nrm2,
    Asum,
    Iamax,
    Rot,
    Rotg,
    Rotm,
    Rotmg,
    Gemv,
    /// Conjugating rank-1 update for complex types.
    Ger,
    Geru,
    Symv,
    Hemv,
    Syr,
    Her,
    Syr2,
    Her2,
    Trmv,
    Trsv,
    Gemm,
    Symm,
    Hemm,
    Syrk,
    Herk,
    Syr2k,
    Her2k,
    Trmm,
    Trsm,
}

impl Operation {
    pub const ALL: [Operation; 33] = [
        Operation::Axpy,
        Operation::Scal,
        Operation::Copy,
        Operation::Swap,
        Operation::Dot,
        Operation::Dotu,
        Operation::Nrm2,
        Operation::Asum,
        Operation::Iamax,
        Operation::Rot,
        Operation::Rotg,
        Operation::Rotm,
        Operation::Rotmg,
        Operation::Gemv,
        Operation::Ger,
        Operation::Geru,
        Operation::Symv,
        Operation::Hemv,
        Operation::Syr,
        Operation::Her,
        Operation::Syr2,
        Operation::Her2,
        Operation::Trmv,
        Operation::Trsv,
        Operation::Gemm,
        Operation::Symm,
        Operation::Hemm,
        Operation::Syrk,
        Operation::Herk,
        Operation::Syr2k,
        Operation::Her2k,
        Operation::Trmm,
        Operation::Trsm,
    ];

    /// Number of single-character option arguments the routine takes.
    pub fn char_flags(self) -> usize {
        match self {
            Operation::Gemv
            | Operation::Symv
            | Operation::Hemv
            | Operation::Syr
            | Operation::Her
            | Operation::Syr2
            | Operation::Her2 => 1,
            Operation::Gemm
            | Operation::Symm
            | Operation::Hemm
            | Operation::Syrk
            | Operation::Herk
            | Operation::Syr2k
            | Operation::Her2k => 2,
            Operation::Trmv | Operation::Trsv => 3,
            Operation::Trmm | Operation::Trsm => 4,
            _ => 0,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Operation::Axpy
            | Operation::Scal
            | Operation::Copy
            | Operation::Swap
            | Operation::Dot
            | Operation::Dotu
            | Operation::Nrm2
            | Operation::Asum
            | Operation::Iamax
            | Operation::Rot
            | Operation::Rotg
            | Operation::Rotm
            | Operation::Rotmg => 1,
            Operation::Gemv
            | Operation::Ger
            | Operation::Geru
            | Operation::Symv
            | Operation::Hemv
            | Operation::Syr
            | Operation::Her
            | Operation::Syr2
            | Operation::Her2
            | Operation::Trmv
            | Operation::Trsv => 2,
            _ => 3,
        }
    }

    /// Whether a native kernel exists for this precision.
    ///
    /// Complex `symv`, `syr` and `syr2` live in LAPACK rather than BLAS and
    /// are not provided; the Hermitian routines only exist for complex types.
    pub fn supports(self, precision: Precision) -> bool {
        match self {
            Operation::Rotm
            | Operation::Rotmg
            | Operation::Symv
            | Operation::Syr
            | Operation::Syr2 => !precision.is_complex(),
            Operation::Hemv
            | Operation::Her
            | Operation::Her2
            | Operation::Hemm
            | Operation::Herk
            | Operation::Her2k => precision.is_complex(),
            _ => true,
        }
    }

    fn stem(self) -> &'static str {
        match self {
            Operation::Axpy => "axpy",
            Operation::Scal => "scal",
            Operation::Copy => "copy",
            Operation::Swap => "swap",
            Operation::Dot | Operation::Dotu => "dot",
            Operation::Nrm2 => "nrm2",
            Operation::Asum => "asum",
            Operation::Iamax => "amax",
            Operation::Rot => "rot",
            Operation::Rotg => "rotg",
            Operation::Rotm => "rotm",
            Operation::Rotmg => "rotmg",
            Operation::Gemv => "gemv",
            Operation::Ger | Operation::Geru => "ger",
            Operation::Symv => "symv",
            Operation::Hemv => "hemv",
            Operation::Syr => "syr",
            Operation::Her => "her",
            Operation::Syr2 => "syr2",
            Operation::Her2 => "her2",
            Operation::Trmv => "trmv",
            Operation::Trsv => "trsv",
            Operation::Gemm => "gemm",
            Operation::Symm => "symm",
            Operation::Hemm => "hemm",
            Operation::Syrk => "syrk",
            Operation::Herk => "herk",
            Operation::Syr2k => "syr2k",
            Operation::Her2k => "her2k",
            Operation::Trmm => "trmm",
            Operation::Trsm => "trsm",
        }
    }
}

/// What a kernel hands back besides its in/out arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    None,
    /// A value of the kernel's own precision (real or complex).
    Scalar,
    /// A real value of the kernel's real precision.
    Real,
    /// A one-based native integer index.
    Index,
}

/// One native routine in one precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelDescriptor {
    op: Operation,
    precision: Precision,
}

impl KernelDescriptor {
    /// Returns `None` for combinations with no native kernel.
    pub fn new(op: Operation, precision: Precision) -> Option<Self> {
        op.supports(precision)
            .then_some(KernelDescriptor { op, precision })
    }

    pub fn op(&self) -> Operation {
        self.op
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn char_flags(&self) -> usize {
        self.op.char_flags()
    }

    pub fn result(&self) -> ResultKind {
        match self.op {
            Operation::Dot | Operation::Dotu => ResultKind::Scalar,
            Operation::Nrm2 | Operation::Asum => ResultKind::Real,
            Operation::Iamax => ResultKind::Index,
            _ => ResultKind::None,
        }
    }

    /// Canonical lowercase reference-BLAS name, e.g. `dgemm`, `scnrm2`, `izamax`.
    pub fn name(&self) -> String {
        let p = self.precision.prefix();
        let complex = self.precision.is_complex();
        let real = self.precision.real().prefix();
        match self.op {
            Operation::Nrm2 | Operation::Asum if complex => {
                format!("{real}{p}{}", self.op.stem())
            }
            Operation::Rot if complex => format!("{p}{real}rot"),
            Operation::Iamax => format!("i{p}amax"),
            Operation::Dot if complex => format!("{p}dotc"),
            Operation::Dotu if complex => format!("{p}dotu"),
            Operation::Ger if complex => format!("{p}gerc"),
            Operation::Geru if complex => format!("{p}geru"),
            op => format!("{p}{}", op.stem()),
        }
    }

    pub fn upper_name(&self) -> String {
        self.name().to_ascii_uppercase()
    }

    /// Every available descriptor.
    pub fn all() -> impl Iterator<Item = KernelDescriptor> {
        Operation::ALL.into_iter().flat_map(|op| {
            Precision::ALL
                .into_iter()
                .filter_map(move |precision| KernelDescriptor::new(op, precision))
        })
    }
}

impl fmt::Display for KernelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
