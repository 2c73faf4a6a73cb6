use crate::error::RenderError;

use super::RenderCtx;

/// Byte capacity of a GPU buffer that only ever grows.
///
/// Growth resizes to exactly the requested size (rounded up to the copy
/// alignment); shrinking never happens.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct BufferCapacity {
    bytes: u64,
}

impl BufferCapacity {
    #[inline]
    pub fn bytes(self) -> u64 {
        self.bytes
    }

    /// Makes room for `required` bytes. Returns true when the buffer must be
    /// reallocated at the new [`bytes`](Self::bytes).
    pub fn reserve(&mut self, required: u64) -> bool {
        if required <= self.bytes {
            return false;
        }
        self.bytes = wgpu::util::align_to(required, wgpu::COPY_BUFFER_ALIGNMENT);
        true
    }
}

/// Vertex buffer holding serialized instance records for one draw stream.
pub struct InstanceBuffer {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    capacity: BufferCapacity,
    reallocations: u32,
}

impl InstanceBuffer {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            buffer: None,
            capacity: BufferCapacity::default(),
            reallocations: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity.bytes()
    }

    /// Number of times the backing buffer was replaced.
    #[inline]
    pub fn reallocations(&self) -> u32 {
        self.reallocations
    }

    #[inline]
    pub fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    /// Writes `bytes` at offset 0, growing the buffer first when it is too small.
    ///
    /// Growth destroys the old buffer before allocating the replacement.
    pub fn upload(&mut self, ctx: &RenderCtx<'_>, bytes: &[u8]) -> Result<&wgpu::Buffer, RenderError> {
        let required = bytes.len() as u64;
        let max = ctx.device.limits().max_buffer_size;
        if required > max {
            return Err(RenderError::BufferTooLarge {
                label: self.label,
                requested: required,
                max,
            });
        }

        let mut next = self.capacity;
        if next.reserve(required) || self.buffer.is_none() {
            if let Some(old) = self.buffer.take() {
                old.destroy();
            }

            let size = next.bytes().max(wgpu::COPY_BUFFER_ALIGNMENT);
            log::debug!("{}: allocating {size} bytes (was {})", self.label, self.capacity.bytes());

            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = next;
            self.reallocations += 1;
        }

        let buffer = self.buffer.as_ref().ok_or(RenderError::BufferTooLarge {
            label: self.label,
            requested: required,
            max,
        })?;

        if !bytes.is_empty() {
            ctx.queue.write_buffer(buffer, 0, bytes);
        }
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_to_exact_aligned_size() {
        let mut c = BufferCapacity::default();
        assert!(c.reserve(96));
        assert_eq!(c.bytes(), 96);
        assert!(c.reserve(97));
        assert_eq!(c.bytes(), 100);
    }

    #[test]
    fn smaller_requests_keep_capacity() {
        let mut c = BufferCapacity::default();
        c.reserve(4096);
        assert!(!c.reserve(32));
        assert!(!c.reserve(4096));
        assert_eq!(c.bytes(), 4096);
    }

    #[test]
    fn capacity_never_decreases_across_fluctuating_frames() {
        let frames = [10u64, 5_000, 0, 120, 4_999, 80_000, 3, 80_000, 79_999, 1];
        let mut c = BufferCapacity::default();
        let mut last = 0;
        for bytes in frames {
            c.reserve(bytes);
            assert!(c.bytes() >= last);
            assert!(c.bytes() >= bytes);
            last = c.bytes();
        }
        assert_eq!(last, 80_000);
    }
}
