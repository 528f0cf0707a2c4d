//! Runtime loading of the host Fortran BLAS library and symbol lookup.

use crate::error::AbiError;
use crate::kernel::KernelDescriptor;
use crate::profile::{active_profile, AbiProfile, Mangling};
use libloading::{Library, Symbol};
use once_cell::sync::{Lazy, OnceCell};
use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Library base names tried, in order, when no explicit path is configured.
pub const DEFAULT_CANDIDATES: &[&str] = &["openblas", "blas", "flexiblas", "mkl_rt", "blis"];

#[cfg(target_os = "macos")]
const ACCELERATE_FRAMEWORK: &str = "/System/Library/Frameworks/Accelerate.framework/Accelerate";

/// A loaded Fortran BLAS together with the profile its symbols follow.
pub struct NativeBlas {
    library: Library,
    path: String,
    profile: AbiProfile,
}

impl NativeBlas {
    /// Load a library from a path.
    pub fn load(path: impl AsRef<Path>, profile: AbiProfile) -> Result<Self, AbiError> {
        let path = path.as_ref();
        let library = unsafe { Library::new(path) }.map_err(|source| AbiError::LibraryLoad {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            library,
            path: path.display().to_string(),
            profile,
        })
    }

    /// Load a library by base name (e.g. `openblas`) from the system search path.
    pub fn load_by_name(name: &str, profile: AbiProfile) -> Result<Self, AbiError> {
        let mut last_err = None;
        for file in Self::platform_lib_names(name) {
            match Self::load(&file, profile) {
                Ok(lib) => return Ok(lib),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| AbiError::LibraryNotFound {
            tried: name.to_string(),
        }))
    }

    /// Platform file names for a base name; the unversioned name first.
    pub(crate) fn platform_lib_names(name: &str) -> Vec<String> {
        #[cfg(target_os = "windows")]
        {
            vec![format!("{}.dll", name), format!("lib{}.dll", name)]
        }
        #[cfg(target_os = "macos")]
        {
            vec![format!("lib{}.dylib", name)]
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            // Runtime-only packages ship the soname without the dev symlink.
            vec![
                format!("lib{}.so", name),
                format!("lib{}.so.0", name),
                format!("lib{}.so.3", name),
            ]
        }
    }

    /// Resolve the symbol for `desc` under this library's profile.
    ///
    /// # Safety
    ///
    /// `F` must be the exact function-pointer type of the symbol, including
    /// hidden arguments and return convention implied by the profile.
    pub unsafe fn resolve<F>(&self, desc: &KernelDescriptor) -> Result<Symbol<'_, F>, AbiError> {
        let symbol = self.profile.symbol(desc);
        let c_name = CString::new(symbol.as_str()).map_err(|_| AbiError::NoKernel {
            op: desc.op(),
            precision: desc.precision(),
        })?;
        self.library
            .get(c_name.as_bytes_with_nul())
            .map_err(|source| AbiError::MissingSymbol {
                symbol,
                path: self.path.clone(),
                source,
            })
    }

    /// Whether the library exports `desc` under this profile.
    pub fn provides(&self, desc: &KernelDescriptor) -> bool {
        unsafe { self.resolve::<unsafe extern "C" fn()>(desc) }.is_ok()
    }

    pub fn profile(&self) -> &AbiProfile {
        &self.profile
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Where to look for the host library.
#[derive(Debug, Clone, Default)]
pub struct HostLibraryOptions {
    /// Explicit library file; when set, no search is performed.
    pub path: Option<PathBuf>,
    /// Base names to search instead of [`DEFAULT_CANDIDATES`].
    pub candidates: Vec<String>,
}

static HOST_OPTIONS: Lazy<RwLock<HostLibraryOptions>> =
    Lazy::new(|| RwLock::new(HostLibraryOptions::default()));
static HOST_LIBRARY: OnceCell<NativeBlas> = OnceCell::new();

/// Set the host library search options.
///
/// Returns `false` when the library has already been loaded, in which case
/// the options have no effect.
pub fn configure_host_library(options: HostLibraryOptions) -> bool {
    if HOST_LIBRARY.get().is_some() {
        return false;
    }
    if let Ok(mut guard) = HOST_OPTIONS.write() {
        *guard = options;
    }
    true
}

/// The process-wide host library, loaded on first use with the active profile.
///
/// A failed load is not cached; the next call searches again.
pub fn host_library() -> Result<&'static NativeBlas, AbiError> {
    HOST_LIBRARY.get_or_try_init(|| {
        let options = HOST_OPTIONS
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default();
        let lib = load_host(&options, active_profile())?;
        log::info!(
            "unblas: using Fortran BLAS '{}' ({})",
            lib.path(),
            lib.profile()
        );
        Ok(lib)
    })
}

fn load_host(options: &HostLibraryOptions, profile: AbiProfile) -> Result<NativeBlas, AbiError> {
    if let Some(path) = &options.path {
        return NativeBlas::load(path, profile);
    }

    #[cfg(target_os = "macos")]
    if profile.mangling == Mangling::Accelerate {
        if let Ok(lib) = NativeBlas::load(ACCELERATE_FRAMEWORK, profile) {
            return Ok(lib);
        }
    }
    #[cfg(not(target_os = "macos"))]
    if profile.mangling == Mangling::Accelerate {
        log::warn!("unblas: Accelerate mangling requested on a non-Apple platform");
    }

    let candidates: Vec<String> = if options.candidates.is_empty() {
        DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect()
    } else {
        options.candidates.clone()
    };
    for name in &candidates {
        match NativeBlas::load_by_name(name, profile) {
            Ok(lib) => return Ok(lib),
            Err(e) => log::debug!("unblas: {e}"),
        }
    }
    Err(AbiError::LibraryNotFound {
        tried: candidates.join(", "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_lib_names() {
        let names = NativeBlas::platform_lib_names("openblas");
        #[cfg(target_os = "windows")]
        assert_eq!(names[0], "openblas.dll");
        #[cfg(target_os = "macos")]
        assert_eq!(names[0], "libopenblas.dylib");
        #[cfg(target_os = "linux")]
        assert_eq!(names[0], "libopenblas.so");
        assert!(!names.is_empty());
    }

    #[test]
    fn explicit_missing_path_reports_load_failure() {
        let options = HostLibraryOptions {
            path: Some(PathBuf::from("/nonexistent/libunblas-missing.so")),
            candidates: Vec::new(),
        };
        let err = load_host(&options, AbiProfile::gnu()).err().unwrap();
        assert!(matches!(err, AbiError::LibraryLoad { .. }));
    }

    #[test]
    fn exhausted_candidates_are_listed() {
        let options = HostLibraryOptions {
            path: None,
            candidates: vec!["unblas-missing-a".into(), "unblas-missing-b".into()],
        };
        match load_host(&options, AbiProfile::gnu()) {
            Err(AbiError::LibraryNotFound { tried }) => {
                assert_eq!(tried, "unblas-missing-a, unblas-missing-b")
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("a library with a made-up name loaded"),
        }
    }
}
