//! # Buffer State Module
//!
//! The registry of GPU buffers behind [`crate::WgpuContext`]. Buffers are referenced by
//! [`BufferHandle`] and their contents are always replaced whole.
//!
//! ## Key Features
//!
//! * Handle-based buffer management
//! * Orphan-and-refill for streamed or resized buffers
//! * Buffer usage analytics and memory tracking
//!
//! ## Architecture
//!
//! A handle is created without storage. The first write allocates a buffer sized to the
//! data. Later writes either go through `Queue::write_buffer` in place, or allocate a
//! fresh buffer and drop the old one. Recorded draws hold their own clone of the
//! `wgpu::Buffer`, so orphaned storage stays alive until the GPU is done with it.
//!
//! ## Performance Considerations
//!
//! * Static buffers of unchanged size are rewritten in place
//! * Stream buffers never wait on earlier draws that still read them

use std::collections::HashMap;

use wgpu::{util::DeviceExt, Buffer, Device, Queue};

use crate::{
    core::GpuError,
    engine_state::rendering::graphics_context::{BufferHandle, BufferKind, UsageHint},
};

/// Smallest allocation; wgpu copies work in 4-byte units.
const MIN_BUFFER_SIZE: u64 = wgpu::COPY_BUFFER_ALIGNMENT;

/// How a write lands in a buffer's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePlan {
    /// Copy into the current storage with `Queue::write_buffer`
    InPlace,
    /// Allocate fresh storage of `size` bytes, orphaning any previous storage
    Allocate {
        /// Allocation size in bytes
        size: u64,
    },
}

/// Decides how a write of `data_len` bytes is carried out.
///
/// # Arguments
///
/// * `data_len` - Length of the new contents
/// * `current_size` - Size of the current storage, `None` before the first write
/// * `hint` - `Stream` always orphans
/// * `in_use` - Whether a draw not yet executed still reads the current storage
///
/// # Returns
///
/// `InvalidArgument` when `data_len` is not a multiple of 4
pub fn plan_write(
    data_len: usize,
    current_size: Option<u64>,
    hint: UsageHint,
    in_use: bool,
) -> Result<WritePlan, GpuError> {
    if data_len as u64 % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
        return Err(GpuError::InvalidArgument(format!(
            "buffer write of {} bytes is not a multiple of {}",
            data_len,
            wgpu::COPY_BUFFER_ALIGNMENT
        )));
    }

    let size = (data_len as u64).max(MIN_BUFFER_SIZE);
    if hint == UsageHint::Static && !in_use && current_size == Some(size) {
        Ok(WritePlan::InPlace)
    } else {
        Ok(WritePlan::Allocate { size })
    }
}

/// Analytics data for a GPU buffer
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BufferAnalytics {
    /// Total memory allocated for the buffer in bytes
    pub allocated_memory: u64,
    /// Bytes of meaningful data from the last write
    pub used_memory: u64,
    /// Number of times the buffer has been written to
    pub times_written: u64,
    /// Number of times the storage was replaced instead of written in place
    pub times_orphaned: u64,
}

#[derive(Debug)]
struct ManagedBuffer {
    label: String,
    kind: BufferKind,
    buffer: Option<Buffer>,
}

/// Central manager for the renderer's GPU buffers.
pub struct BufferState {
    device: Device,
    queue: Queue,
    next_id: u32,
    buffers: HashMap<BufferHandle, ManagedBuffer>,
    buffer_analytics: HashMap<BufferHandle, BufferAnalytics>,
}

impl BufferState {
    /// Creates a new buffer state manager
    ///
    /// # Arguments
    ///
    /// * `device` - The GPU device buffers are allocated on
    /// * `queue` - The queue in-place writes are staged on
    pub fn new(device: Device, queue: Queue) -> Self {
        Self {
            device,
            queue,
            next_id: 0,
            buffers: HashMap::new(),
            buffer_analytics: HashMap::new(),
        }
    }

    /// Registers a buffer. Storage is allocated on the first write.
    pub fn create_buffer(&mut self, label: &str, kind: BufferKind) -> BufferHandle {
        let handle = BufferHandle::from_raw(self.next_id);
        self.next_id += 1;
        self.buffers.insert(
            handle,
            ManagedBuffer {
                label: label.to_string(),
                kind,
                buffer: None,
            },
        );
        self.buffer_analytics
            .insert(handle, BufferAnalytics::default());
        handle
    }

    /// Replaces the contents of a buffer.
    ///
    /// # Arguments
    ///
    /// * `handle` - Buffer to write
    /// * `data` - New contents; length must be a multiple of 4
    /// * `hint` - `Stream` always orphans the previous storage
    /// * `in_use` - Whether an unsubmitted draw still reads the current storage
    ///
    /// # Returns
    ///
    /// `InvalidOperation` for an unknown handle, `InvalidArgument` for unaligned data
    pub fn write_buffer(
        &mut self,
        handle: BufferHandle,
        data: &[u8],
        hint: UsageHint,
        in_use: bool,
    ) -> Result<(), GpuError> {
        let managed = self.buffers.get_mut(&handle).ok_or_else(|| {
            GpuError::InvalidOperation(format!("write to unknown buffer {:?}", handle))
        })?;
        let plan = plan_write(data.len(), managed.buffer.as_ref().map(Buffer::size), hint, in_use)?;
        let analytics = self.buffer_analytics.entry(handle).or_default();

        match plan {
            WritePlan::InPlace => {
                if let Some(buffer) = managed.buffer.as_ref().filter(|_| !data.is_empty()) {
                    self.queue.write_buffer(buffer, 0, data);
                }
            }
            WritePlan::Allocate { size } => {
                let usage = match managed.kind {
                    BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
                    BufferKind::Index => wgpu::BufferUsages::INDEX,
                } | wgpu::BufferUsages::COPY_DST;

                let buffer = if data.is_empty() {
                    self.device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some(&managed.label),
                        size,
                        usage,
                        mapped_at_creation: false,
                    })
                } else {
                    self.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some(&managed.label),
                            contents: data,
                            usage,
                        })
                };
                if managed.buffer.replace(buffer).is_some() {
                    analytics.times_orphaned += 1;
                }
                analytics.allocated_memory = size;
            }
        }

        analytics.used_memory = data.len() as u64;
        analytics.times_written += 1;
        Ok(())
    }

    /// Drops a buffer. Draws recorded earlier keep their own reference.
    pub fn destroy_buffer(&mut self, handle: BufferHandle) -> bool {
        self.buffer_analytics.remove(&handle);
        self.buffers.remove(&handle).is_some()
    }

    /// Gets the current storage of a buffer, if it has been written.
    pub fn get_buffer(&self, handle: BufferHandle) -> Option<&Buffer> {
        self.buffers.get(&handle)?.buffer.as_ref()
    }

    /// Analytics of one buffer.
    pub fn get_analytics(&self, handle: BufferHandle) -> Option<BufferAnalytics> {
        self.buffer_analytics.get(&handle).copied()
    }

    /// Number of registered buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Gets the total allocated memory across all buffers
    ///
    /// # Returns
    ///
    /// Total allocated memory in bytes
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffer_analytics
            .values()
            .fold(0, |acc, buffer_analytics| acc + buffer_analytics.allocated_memory)
    }

    /// Gets the total used memory across all buffers
    ///
    /// # Returns
    ///
    /// Total used memory in bytes
    pub fn get_total_used_memory(&self) -> u64 {
        self.buffer_analytics
            .values()
            .fold(0, |acc, buffer_analytics| acc + buffer_analytics.used_memory)
    }

    /// Logs a one-line summary of every buffer at `info`.
    pub fn log_analytics(&self) {
        log::info!(
            "{} buffers, {} bytes allocated, {} bytes used",
            self.buffer_count(),
            self.get_total_allocated_memory(),
            self.get_total_used_memory()
        );
        for (handle, managed) in &self.buffers {
            if let Some(analytics) = self.buffer_analytics.get(handle) {
                log::debug!("  {} ({:?}): {:?}", managed.label, handle, analytics);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_allocates() {
        assert_eq!(
            plan_write(48, None, UsageHint::Static, false),
            Ok(WritePlan::Allocate { size: 48 })
        );
    }

    #[test]
    fn test_static_same_size_idle_writes_in_place() {
        assert_eq!(
            plan_write(48, Some(48), UsageHint::Static, false),
            Ok(WritePlan::InPlace)
        );
    }

    #[test]
    fn test_stream_always_orphans() {
        assert_eq!(
            plan_write(32, Some(32), UsageHint::Stream, false),
            Ok(WritePlan::Allocate { size: 32 })
        );
    }

    #[test]
    fn test_size_change_orphans() {
        assert_eq!(
            plan_write(64, Some(48), UsageHint::Static, false),
            Ok(WritePlan::Allocate { size: 64 })
        );
    }

    #[test]
    fn test_storage_read_by_pending_draw_orphans() {
        assert_eq!(
            plan_write(48, Some(48), UsageHint::Static, true),
            Ok(WritePlan::Allocate { size: 48 })
        );
    }

    #[test]
    fn test_empty_write_keeps_minimum_allocation() {
        assert_eq!(
            plan_write(0, None, UsageHint::Static, false),
            Ok(WritePlan::Allocate { size: MIN_BUFFER_SIZE })
        );
        assert_eq!(
            plan_write(0, Some(MIN_BUFFER_SIZE), UsageHint::Static, false),
            Ok(WritePlan::InPlace)
        );
    }

    #[test]
    fn test_unaligned_write_is_invalid_argument() {
        for len in [1, 2, 3, 13] {
            assert!(matches!(
                plan_write(len, Some(16), UsageHint::Static, false),
                Err(GpuError::InvalidArgument(_))
            ));
        }
    }
}
