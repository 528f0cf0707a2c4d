//! ABI profiles: the calling-convention choices of one Fortran BLAS build.
//!
//! A profile is resolved once per process. The build default comes from cargo
//! features; a configuration layer may install a different one before the
//! first native call, after which it is fixed.

use crate::error::AbiError;
use crate::kernel::KernelDescriptor;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a Fortran compiler decorates external names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mangling {
    /// `dgemm`
    Lower,
    /// `dgemm_`
    LowerUnderscore,
    /// `DGEMM`
    Upper,
    /// `DGEMM_`
    UpperUnderscore,
    /// macOS Accelerate's new LAPACK table: `dgemm$NEWLAPACK`, with a
    /// `$ILP64` suffix for 64-bit integers.
    Accelerate,
}

/// Whether hidden `size_t` lengths follow the regular arguments, one per
/// character argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrlenConvention {
    None,
    End,
}

/// How complex-valued functions hand back their result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplexReturn {
    /// Returned by value (GNU Fortran).
    ReturnValue,
    /// Written through a hidden first pointer argument (Intel Fortran, f2c).
    HiddenArgument,
}

/// Declared return type of single-precision real functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FloatReturn {
    Float,
    /// f2c and g77 return `double` from `sdot`, `snrm2`, `sasum` and friends.
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntWidth {
    Lp64,
    Ilp64,
}

impl IntWidth {
    /// The width this crate was compiled for.
    pub const fn built() -> IntWidth {
        if cfg!(feature = "ilp64") {
            IntWidth::Ilp64
        } else {
            IntWidth::Lp64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbiProfile {
    pub mangling: Mangling,
    pub strlen: StrlenConvention,
    pub complex_return: ComplexReturn,
    pub float_return: FloatReturn,
    pub int_width: IntWidth,
}

impl AbiProfile {
    /// gfortran and most Linux distributions' reference BLAS/OpenBLAS.
    pub const fn gnu() -> Self {
        AbiProfile {
            mangling: Mangling::LowerUnderscore,
            strlen: StrlenConvention::End,
            complex_return: ComplexReturn::ReturnValue,
            float_return: FloatReturn::Float,
            int_width: IntWidth::built(),
        }
    }

    /// Intel Fortran / MKL's Fortran interface.
    pub const fn intel() -> Self {
        AbiProfile {
            complex_return: ComplexReturn::HiddenArgument,
            ..AbiProfile::gnu()
        }
    }

    /// f2c-translated BLAS and the legacy vecLib interface.
    pub const fn f2c() -> Self {
        AbiProfile {
            strlen: StrlenConvention::None,
            complex_return: ComplexReturn::HiddenArgument,
            float_return: FloatReturn::Double,
            ..AbiProfile::gnu()
        }
    }

    /// macOS Accelerate, new LAPACK interface.
    pub const fn accelerate() -> Self {
        AbiProfile {
            mangling: Mangling::Accelerate,
            strlen: StrlenConvention::None,
            ..AbiProfile::gnu()
        }
    }

    /// The profile selected by cargo features.
    pub const fn build_default() -> Self {
        let mangling = if cfg!(feature = "accelerate") {
            Mangling::Accelerate
        } else if cfg!(feature = "mangle-lower") {
            Mangling::Lower
        } else if cfg!(feature = "mangle-upper-underscore") {
            Mangling::UpperUnderscore
        } else if cfg!(feature = "mangle-upper") {
            Mangling::Upper
        } else {
            Mangling::LowerUnderscore
        };
        let strlen = if cfg!(feature = "no-fortran-strlen") || cfg!(feature = "accelerate") {
            StrlenConvention::None
        } else {
            StrlenConvention::End
        };
        let complex_return = if cfg!(feature = "complex-return-argument") {
            ComplexReturn::HiddenArgument
        } else {
            ComplexReturn::ReturnValue
        };
        let float_return = if cfg!(feature = "f2c-float-return") {
            FloatReturn::Double
        } else {
            FloatReturn::Float
        };
        AbiProfile {
            mangling,
            strlen,
            complex_return,
            float_return,
            int_width: IntWidth::built(),
        }
    }

    /// External symbol name of `desc` under this profile.
    pub fn symbol(&self, desc: &KernelDescriptor) -> String {
        let lower = desc.name();
        match self.mangling {
            Mangling::Lower => lower,
            Mangling::LowerUnderscore => format!("{lower}_"),
            Mangling::Upper => desc.upper_name(),
            Mangling::UpperUnderscore => format!("{}_", desc.upper_name()),
            Mangling::Accelerate => match self.int_width {
                IntWidth::Lp64 => format!("{lower}$NEWLAPACK"),
                IntWidth::Ilp64 => format!("{lower}$NEWLAPACK$ILP64"),
            },
        }
    }
}

impl Default for AbiProfile {
    fn default() -> Self {
        AbiProfile::build_default()
    }
}

impl fmt::Display for AbiProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mangling={:?} strlen={:?} complex-return={:?} float-return={:?} int={:?}",
            self.mangling, self.strlen, self.complex_return, self.float_return, self.int_width
        )
    }
}

static ACTIVE_PROFILE: OnceCell<AbiProfile> = OnceCell::new();

/// Fix the process-wide profile.
///
/// Succeeds if no profile has been resolved yet or if `profile` equals the
/// one already in force. The integer width cannot differ from the build's.
pub fn install_profile(profile: AbiProfile) -> Result<(), AbiError> {
    if profile.int_width != IntWidth::built() {
        return Err(AbiError::IntWidthMismatch {
            requested: profile.int_width,
            built: IntWidth::built(),
        });
    }
    let active = ACTIVE_PROFILE.get_or_init(|| profile);
    if *active != profile {
        return Err(AbiError::ProfileLocked {
            active: active.to_string(),
            requested: profile.to_string(),
        });
    }
    log::debug!("unblas: ABI profile {active}");
    Ok(())
}

/// The profile in force, resolving to the build default on first use.
pub fn active_profile() -> AbiProfile {
    *ACTIVE_PROFILE.get_or_init(AbiProfile::build_default)
}

fn parse_kebab<T>(value: &str) -> Result<T, String>
where
    T: for<'de> Deserialize<'de>,
{
    let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
    T::deserialize(serde::de::value::StrDeserializer::<serde::de::value::Error>::new(
        &normalized,
    ))
    .map_err(|e| format!("invalid value '{value}': {e}"))
}

macro_rules! impl_from_str {
    ($($t:ty),*) => {
        $(
            impl FromStr for $t {
                type Err = String;
                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    parse_kebab(s)
                }
            }
        )*
    };
}

impl_from_str!(Mangling, StrlenConvention, ComplexReturn, FloatReturn, IntWidth);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Operation, Precision};

    fn desc(op: Operation, p: Precision) -> KernelDescriptor {
        KernelDescriptor::new(op, p).unwrap()
    }

    #[test]
    fn mangling_styles() {
        let d = desc(Operation::Gemm, Precision::Double);
        let with = |mangling| AbiProfile {
            mangling,
            int_width: IntWidth::Lp64,
            ..AbiProfile::gnu()
        };
        assert_eq!(with(Mangling::Lower).symbol(&d), "dgemm");
        assert_eq!(with(Mangling::LowerUnderscore).symbol(&d), "dgemm_");
        assert_eq!(with(Mangling::Upper).symbol(&d), "DGEMM");
        assert_eq!(with(Mangling::UpperUnderscore).symbol(&d), "DGEMM_");
        assert_eq!(with(Mangling::Accelerate).symbol(&d), "dgemm$NEWLAPACK");
        let ilp = AbiProfile {
            int_width: IntWidth::Ilp64,
            ..with(Mangling::Accelerate)
        };
        assert_eq!(ilp.symbol(&d), "dgemm$NEWLAPACK$ILP64");
    }

    #[test]
    fn accelerate_drops_hidden_lengths() {
        assert_eq!(AbiProfile::accelerate().strlen, StrlenConvention::None);
        assert_eq!(AbiProfile::gnu().strlen, StrlenConvention::End);
    }

    #[test]
    fn parses_config_spellings() {
        assert_eq!("lower_underscore".parse(), Ok(Mangling::LowerUnderscore));
        assert_eq!("Hidden-Argument".parse(), Ok(ComplexReturn::HiddenArgument));
        assert_eq!("none".parse(), Ok(StrlenConvention::None));
        assert!("sideways".parse::<Mangling>().is_err());
    }

    #[test]
    fn profile_serializes_kebab_case() {
        let json = serde_json::to_string(&AbiProfile::intel()).unwrap();
        assert!(json.contains("\"lower-underscore\""));
        assert!(json.contains("\"hidden-argument\""));
    }

    #[test]
    fn install_rejects_foreign_int_width() {
        let foreign = match IntWidth::built() {
            IntWidth::Lp64 => IntWidth::Ilp64,
            IntWidth::Ilp64 => IntWidth::Lp64,
        };
        let err = install_profile(AbiProfile {
            int_width: foreign,
            ..AbiProfile::gnu()
        })
        .unwrap_err();
        assert!(matches!(err, AbiError::IntWidthMismatch { .. }));
    }
}
