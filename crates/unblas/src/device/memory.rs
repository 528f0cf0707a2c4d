//! Device and pinned host buffers, and transfers through a queue.

use super::queue::Queue;
use crate::error::{Error, Result};
use std::marker::PhantomData;
use unblas_accelerate_api::{DeviceId, DevicePtr, MemcpyKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Residency {
    Device,
    PinnedHost,
}

/// `len` elements of `T` in device memory or pinned host memory.
///
/// Buffers are released explicitly with [`device_free`] or
/// [`host_free_pinned`]; a buffer dropped without that is leaked.
#[derive(Debug)]
pub struct DeviceBuffer<T> {
    ptr: DevicePtr,
    len: usize,
    device: DeviceId,
    residency: Residency,
    _marker: PhantomData<T>,
}

impl<T: Copy> DeviceBuffer<T> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn device(&self) -> DeviceId {
        self.device
    }

    pub fn residency(&self) -> Residency {
        self.residency
    }

    pub fn as_ptr(&self) -> DevicePtr {
        self.ptr
    }

    /// View a pinned host buffer as a slice; `None` for device memory.
    ///
    /// # Safety
    ///
    /// No queued work may be reading or writing the buffer.
    pub unsafe fn host_slice(&self) -> Option<&[T]> {
        (self.residency == Residency::PinnedHost)
            .then(|| std::slice::from_raw_parts(self.ptr.cast::<T>() as *const T, self.len))
    }

    /// Mutable view of a pinned host buffer; `None` for device memory.
    ///
    /// # Safety
    ///
    /// No queued work may be reading or writing the buffer.
    pub unsafe fn host_slice_mut(&mut self) -> Option<&mut [T]> {
        (self.residency == Residency::PinnedHost)
            .then(|| std::slice::from_raw_parts_mut(self.ptr.cast::<T>(), self.len))
    }

    /// Fail unless this is device memory on `queue`'s device.
    pub(crate) fn check_on(&self, func: &'static str, name: &str, queue: &Queue) -> Result<()> {
        if self.residency != Residency::Device {
            return Err(Error::Precondition {
                func,
                condition: format!("{name} is pinned host memory, not device memory"),
            });
        }
        if self.device != queue.device() {
            return Err(Error::Precondition {
                func,
                condition: format!(
                    "{name} lives on device {} but the queue is bound to device {}",
                    self.device,
                    queue.device()
                ),
            });
        }
        Ok(())
    }
}

impl<T> Drop for DeviceBuffer<T> {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            log::warn!(
                "unblas: {:?} buffer of {} elements on device {} dropped without being freed; leaking it",
                self.residency,
                self.len,
                self.device
            );
        }
    }
}

fn byte_len<T>(func: &'static str, n: usize) -> Result<usize> {
    n.checked_mul(std::mem::size_of::<T>())
        .ok_or_else(|| Error::Precondition {
            func,
            condition: format!("{n} elements overflow the address space"),
        })
}

/// Allocate `n` elements on `queue`'s device.
pub fn device_malloc<T: Copy>(n: usize, queue: &Queue) -> Result<DeviceBuffer<T>> {
    const FUNC: &str = "device_malloc";
    let bytes = byte_len::<T>(FUNC, n)?;
    queue.bind(FUNC)?;
    let ptr = queue
        .provider()
        .malloc(queue.device(), bytes)
        .map_err(|e| queue.error(FUNC, "malloc", e))?;
    Ok(DeviceBuffer {
        ptr,
        len: n,
        device: queue.device(),
        residency: Residency::Device,
        _marker: PhantomData,
    })
}

/// Release a device buffer through a queue bound to the buffer's device.
pub fn device_free<T: Copy>(mut buf: DeviceBuffer<T>, queue: &Queue) -> Result<()> {
    const FUNC: &str = "device_free";
    buf.check_on(FUNC, "buffer", queue)?;
    queue.bind(FUNC)?;
    queue
        .provider()
        .free(queue.device(), buf.ptr)
        .map_err(|e| queue.error(FUNC, "free", e))?;
    buf.ptr = DevicePtr::null();
    Ok(())
}

/// Allocate `n` elements of page-locked host memory.
pub fn host_malloc_pinned<T: Copy>(n: usize, queue: &Queue) -> Result<DeviceBuffer<T>> {
    const FUNC: &str = "host_malloc_pinned";
    let bytes = byte_len::<T>(FUNC, n)?;
    queue.bind(FUNC)?;
    let ptr = queue
        .provider()
        .malloc_pinned(bytes)
        .map_err(|e| queue.error(FUNC, "malloc_pinned", e))?;
    Ok(DeviceBuffer {
        ptr,
        len: n,
        device: queue.device(),
        residency: Residency::PinnedHost,
        _marker: PhantomData,
    })
}

pub fn host_free_pinned<T: Copy>(mut buf: DeviceBuffer<T>, queue: &Queue) -> Result<()> {
    const FUNC: &str = "host_free_pinned";
    if buf.residency != Residency::PinnedHost {
        return Err(Error::Precondition {
            func: FUNC,
            condition: "buffer is device memory, not pinned host memory".to_string(),
        });
    }
    queue.bind(FUNC)?;
    queue
        .provider()
        .free_pinned(buf.ptr)
        .map_err(|e| queue.error(FUNC, "free_pinned", e))?;
    buf.ptr = DevicePtr::null();
    Ok(())
}

/// Copy `host` into the front of `dst`. `host` may be reused on return.
pub fn device_copy_to<T: Copy>(host: &[T], dst: &mut DeviceBuffer<T>, queue: &Queue) -> Result<()> {
    const FUNC: &str = "device_copy_to";
    dst.check_on(FUNC, "dst", queue)?;
    if host.len() > dst.len() {
        return Err(Error::Precondition {
            func: FUNC,
            condition: format!("{} host elements into a buffer of {}", host.len(), dst.len()),
        });
    }
    let bytes = byte_len::<T>(FUNC, host.len())?;
    queue.bind(FUNC)?;
    queue
        .provider()
        .memcpy(
            queue.stream(),
            dst.ptr,
            DevicePtr(host.as_ptr() as *mut _),
            bytes,
            MemcpyKind::HostToDevice,
        )
        .map_err(|e| queue.error(FUNC, "memcpy", e))
}

/// Copy the front of `src` into `host` after all queued work has finished.
pub fn device_copy_from<T: Copy>(src: &DeviceBuffer<T>, host: &mut [T], queue: &Queue) -> Result<()> {
    const FUNC: &str = "device_copy_from";
    src.check_on(FUNC, "src", queue)?;
    if host.len() > src.len() {
        return Err(Error::Precondition {
            func: FUNC,
            condition: format!("{} host elements from a buffer of {}", host.len(), src.len()),
        });
    }
    let bytes = byte_len::<T>(FUNC, host.len())?;
    queue.bind(FUNC)?;
    queue
        .provider()
        .memcpy(
            queue.stream(),
            DevicePtr(host.as_mut_ptr().cast()),
            src.ptr,
            bytes,
            MemcpyKind::DeviceToHost,
        )
        .map_err(|e| queue.error(FUNC, "memcpy", e))
}

/// Enqueue a copy of all of `src` into the front of `dst`.
pub fn device_copy<T: Copy>(src: &DeviceBuffer<T>, dst: &mut DeviceBuffer<T>, queue: &Queue) -> Result<()> {
    const FUNC: &str = "device_copy";
    src.check_on(FUNC, "src", queue)?;
    dst.check_on(FUNC, "dst", queue)?;
    if src.len() > dst.len() {
        return Err(Error::Precondition {
            func: FUNC,
            condition: format!("{} elements into a buffer of {}", src.len(), dst.len()),
        });
    }
    let bytes = byte_len::<T>(FUNC, src.len())?;
    queue.bind(FUNC)?;
    queue
        .provider()
        .memcpy(queue.stream(), dst.ptr, src.ptr, bytes, MemcpyKind::DeviceToDevice)
        .map_err(|e| queue.error(FUNC, "memcpy", e))
}
