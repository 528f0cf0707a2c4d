use crate::error::{Error, Result};
use std::sync::Mutex;
use unblas_accelerate_api::{DeviceBlasProvider, DeviceId, DevicePtr, StreamHandle};

/// An execution context bound to one device and one native stream.
///
/// Work submitted through a queue runs in submission order. Dropping the
/// queue releases its workspace and destroys the stream after queued work
/// completes.
pub struct Queue {
    provider: &'static dyn DeviceBlasProvider,
    device: DeviceId,
    stream: StreamHandle,
    workspace: Mutex<Option<Workspace>>,
}

struct Workspace {
    ptr: DevicePtr,
    bytes: usize,
}

pub(crate) fn registered_provider(func: &'static str) -> Result<&'static dyn DeviceBlasProvider> {
    unblas_accelerate_api::provider()
        .ok_or_else(|| Error::unavailable(func, "no device backend is registered"))
}

impl Queue {
    pub fn new(device: DeviceId) -> Result<Self> {
        const FUNC: &str = "Queue::new";
        let provider = registered_provider(FUNC)?;
        let count = provider.device_count();
        if device < 0 || device as usize >= count {
            return Err(Error::Precondition {
                func: FUNC,
                condition: format!("device {device} out of range ({count} devices)"),
            });
        }
        provider
            .set_device(device)
            .map_err(|e| Error::provider(FUNC, format!("{}::set_device", provider.name()), e))?;
        let stream = provider
            .create_stream(device)
            .map_err(|e| Error::provider(FUNC, format!("{}::create_stream", provider.name()), e))?;
        log::debug!(
            "unblas: queue on {} device {device} (stream {})",
            provider.name(),
            stream.id
        );
        Ok(Self {
            provider,
            device,
            stream,
            workspace: Mutex::new(None),
        })
    }

    pub fn device(&self) -> DeviceId {
        self.device
    }

    /// Block until all work submitted to this queue has completed.
    pub fn sync(&self) -> Result<()> {
        self.bind("sync")?;
        self.provider
            .synchronize(&self.stream)
            .map_err(|e| self.error("sync", "synchronize", e))
    }

    /// A device scratch buffer of at least `bytes`, reused across calls.
    ///
    /// Growing the workspace drains the queue before the old buffer is freed.
    pub fn ensure_workspace(&self, bytes: usize) -> Result<DevicePtr> {
        const FUNC: &str = "Queue::ensure_workspace";
        let mut guard = self
            .workspace
            .lock()
            .map_err(|_| Error::unavailable(FUNC, "workspace lock poisoned"))?;
        if let Some(ws) = guard.as_ref() {
            if ws.bytes >= bytes {
                return Ok(ws.ptr);
            }
        }
        self.bind(FUNC)?;
        if let Some(old) = guard.take() {
            self.provider
                .synchronize(&self.stream)
                .map_err(|e| self.error(FUNC, "synchronize", e))?;
            self.provider
                .free(self.device, old.ptr)
                .map_err(|e| self.error(FUNC, "free", e))?;
        }
        let ptr = self
            .provider
            .malloc(self.device, bytes)
            .map_err(|e| self.error(FUNC, "malloc", e))?;
        *guard = Some(Workspace { ptr, bytes });
        Ok(ptr)
    }

    /// Make this queue's device current on the calling thread.
    pub(crate) fn bind(&self, func: &'static str) -> Result<()> {
        self.provider
            .set_device(self.device)
            .map_err(|e| self.error(func, "set_device", e))
    }

    pub(crate) fn provider(&self) -> &'static dyn DeviceBlasProvider {
        self.provider
    }

    pub(crate) fn stream(&self) -> &StreamHandle {
        &self.stream
    }

    pub(crate) fn error(&self, func: &'static str, call: &str, err: anyhow::Error) -> Error {
        Error::provider(func, format!("{}::{call}", self.provider.name()), err)
    }
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("backend", &self.provider.name())
            .field("device", &self.device)
            .field("stream", &self.stream.id)
            .finish()
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        if let Err(e) = self.provider.set_device(self.device) {
            log::warn!("unblas: binding device {} for queue teardown failed: {e:#}", self.device);
        }
        let workspace = self.workspace.get_mut().ok().and_then(|ws| ws.take());
        if let Some(ws) = workspace {
            if let Err(e) = self.provider.free(self.device, ws.ptr) {
                log::warn!("unblas: freeing queue workspace failed: {e:#}");
            }
        }
        if let Err(e) = self.provider.destroy_stream(self.stream) {
            log::warn!("unblas: destroying stream {} failed: {e:#}", self.stream.id);
        }
    }
}

/// Number of visible devices; 0 without a backend or when the runtime fails.
pub fn get_device_count() -> usize {
    unblas_accelerate_api::device_count()
}

/// Make `device` current for the calling thread.
pub fn set_device(device: DeviceId) -> Result<()> {
    const FUNC: &str = "set_device";
    let provider = registered_provider(FUNC)?;
    let count = provider.device_count();
    if device < 0 || device as usize >= count {
        return Err(Error::Precondition {
            func: FUNC,
            condition: format!("device {device} out of range ({count} devices)"),
        });
    }
    provider
        .set_device(device)
        .map_err(|e| Error::provider(FUNC, format!("{}::set_device", provider.name()), e))
}
