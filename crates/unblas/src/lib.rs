//! One validated BLAS API over Fortran BLAS libraries and GPU BLAS runtimes.
//!
//! [`host`] calls a Fortran BLAS loaded at run time, whose symbol mangling
//! and calling convention follow the active [`AbiProfile`]. [`device`] enqueues
//! the same operations on a [`Queue`](device::Queue) through whichever device
//! backend the build registered (`cuda`, `rocm` or `inprocess`). Both paths
//! take `i64` sizes, validate them, narrow them to the native integer and
//! report failures as [`Error`].
//!
//! ```no_run
//! let config = unblas::ConfigLoader::load()?;
//! let session = unblas::initialize(&config)?;
//! let x = [1.0f64, 2.0, 3.0];
//! let y = [4.0f64, 5.0, 6.0];
//! let d = unblas::host::dot(3, &x, 1, &y, 1)?;
//! println!("{d} ({} devices)", session.device_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod host;
mod validate;

pub use config::{AbiConfig, AccelerateConfig, BlasConfig, ConfigLoader, LibraryConfig, LoggingConfig};
pub use error::{Error, Result};
pub use unblas_abi::{
    AbiProfile, BlasInt, Complex32, Complex64, ComplexScalar, Diag, FortranScalar, Precision,
    RealScalar, Side, Transpose, Uplo,
};
pub use unblas_accelerate_api::{DeviceId, DeviceInt, DeviceKind};

use unblas_accelerate::AccelerateInitOptions;
use unblas_logging::{LoggingGuard, LoggingOptions};

/// What [`initialize`] set up.
pub struct Session {
    profile: AbiProfile,
    backend: Option<(DeviceKind, String)>,
    device_count: usize,
    _logging: Option<LoggingGuard>,
}

impl Session {
    /// ABI profile in force for the host path.
    pub fn profile(&self) -> AbiProfile {
        self.profile
    }

    pub fn backend(&self) -> Option<DeviceKind> {
        self.backend.as_ref().map(|(kind, _)| *kind)
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_ref().map(|(_, name)| name.as_str())
    }

    pub fn device_count(&self) -> usize {
        self.device_count
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("profile", &self.profile)
            .field("backend", &self.backend_name())
            .field("device_count", &self.device_count)
            .finish()
    }
}

/// Apply `config` to the process.
///
/// Installs the ABI profile (overrides on top of the build default), sets the
/// host library search, installs logging when asked, then registers the
/// compiled-in device backend and binds the default device. The profile and
/// library are fixed once first used; a later call with a different profile
/// fails with [`Error::Config`].
pub fn initialize(config: &BlasConfig) -> Result<Session> {
    const FUNC: &str = "initialize";

    let logging = config.logging.install.then(|| {
        unblas_logging::init_logging(LoggingOptions {
            filter: Some(config.logging.level.as_filter().to_string()),
            enable_traces: config.logging.traces,
            pid: std::process::id() as i64,
        })
    });

    let profile = if config.abi.is_empty() {
        unblas_abi::active_profile()
    } else {
        let profile = config.abi.resolve();
        unblas_abi::install_profile(profile).map_err(|e| Error::abi(FUNC, e))?;
        profile
    };

    if !unblas_abi::configure_host_library(config.library.to_options()) {
        log::debug!("unblas: host library already loaded; library settings ignored");
    }

    let provider = unblas_accelerate::initialize_with(&AccelerateInitOptions {
        enabled: config.accelerate.enabled,
    });
    let device_count = device::get_device_count();
    if provider.is_some() && device_count > 0 {
        device::set_device(config.accelerate.default_device)?;
    }

    let session = Session {
        profile,
        backend: provider.map(|p| (p.kind(), p.name().to_string())),
        device_count,
        _logging: logging,
    };
    log::info!(
        "unblas: profile {}; backend {}; {} device(s)",
        session.profile,
        session.backend_name().unwrap_or("none"),
        session.device_count
    );
    Ok(session)
}
