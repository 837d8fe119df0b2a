use core::num::NonZeroUsize;
use core::ptr::NonNull;

use crate::mm::{VirtAddr, PAGE_SIZE};

bitflags::bitflags! {
    /// Element type, layout and ownership of a buffer handed to the runtime.
    pub struct BufferKind: u32 {
        const UINT8         = 1 << 0;
        const C_LAYOUT      = 1 << 1;
        /// Memory is owned outside the runtime; the collector must not free it.
        const EXTERNAL      = 1 << 2;
        /// Memory is owned by the runtime and released on finalisation.
        const MANAGED       = 1 << 3;
    }
}

impl BufferKind {
    /// Kind of the shared I/O pages (Xenstore and console rings).
    pub const IO_PAGE: Self = Self::from_bits_truncate(
        Self::UINT8.bits() | Self::C_LAYOUT.bits() | Self::EXTERNAL.bits(),
    );

    /// Whether the collector may release the backing memory.
    pub fn is_collectable(self) -> bool {
        self.contains(Self::MANAGED) && !self.contains(Self::EXTERNAL)
    }
}

/// A byte view over memory owned by the hypervisor or the guest kernel.
///
/// The handle is plain data: it is `Copy`, carries no destructor and can
/// not be turned back into an owning allocation. Its bytes may be changed by
/// the other end at any time, so all accesses are volatile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalBuffer {
    base: NonNull<u8>,
    len: NonZeroUsize,
}

const _: () = assert!(!core::mem::needs_drop::<ExternalBuffer>());

/// Wraps `len` bytes at `base` into an [`ExternalBuffer`].
///
/// # Safety
///
/// `base..base + len` must be mapped for reads and writes for the rest of
/// the process lifetime, and must not be owned by any Rust allocator.
pub unsafe fn make_external_buffer(base: NonNull<u8>, len: NonZeroUsize) -> ExternalBuffer {
    debug!(
        "[xenbind] external buffer [{:#x}, {:#x})",
        base.as_ptr() as usize,
        base.as_ptr() as usize + len.get()
    );
    ExternalBuffer { base, len }
}

impl ExternalBuffer {
    /// Always [`BufferKind::IO_PAGE`].
    pub const fn kind(&self) -> BufferKind {
        BufferKind::IO_PAGE
    }

    /// Address of the first byte.
    pub fn base_addr(&self) -> VirtAddr {
        self.base.as_ptr() as VirtAddr
    }

    /// Raw pointer to the first byte; accesses through it must be volatile.
    pub fn as_ptr(&self) -> *mut u8 {
        self.base.as_ptr()
    }

    /// Length in bytes, never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len.get()
    }

    /// Number of whole pages covered by the buffer.
    pub fn pages(&self) -> usize {
        self.len.get() / PAGE_SIZE
    }

    /// Reads the byte at `offset`, or `None` past the end.
    pub fn read_volatile(&self, offset: usize) -> Option<u8> {
        if offset >= self.len() {
            return None;
        }
        Some(unsafe { self.base.as_ptr().add(offset).read_volatile() })
    }

    /// Writes the byte at `offset`; returns `false` past the end.
    pub fn write_volatile(&self, offset: usize, byte: u8) -> bool {
        if offset >= self.len() {
            return false;
        }
        unsafe { self.base.as_ptr().add(offset).write_volatile(byte) };
        true
    }

    /// Copies `dst.len()` bytes starting at `offset` out of the buffer.
    pub fn copy_to_slice(&self, offset: usize, dst: &mut [u8]) -> bool {
        if !self.contains(offset, dst.len()) {
            return false;
        }
        for (i, b) in dst.iter_mut().enumerate() {
            *b = unsafe { self.base.as_ptr().add(offset + i).read_volatile() };
        }
        true
    }

    /// Copies `src` into the buffer starting at `offset`.
    pub fn copy_from_slice(&self, offset: usize, src: &[u8]) -> bool {
        if !self.contains(offset, src.len()) {
            return false;
        }
        for (i, &b) in src.iter().enumerate() {
            unsafe { self.base.as_ptr().add(offset + i).write_volatile(b) };
        }
        true
    }

    fn contains(&self, offset: usize, len: usize) -> bool {
        matches!(offset.checked_add(len), Some(end) if end <= self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C, align(4096))]
    struct Page([u8; PAGE_SIZE]);

    fn page_buffer(page: &mut Page) -> ExternalBuffer {
        let base = NonNull::new(page.0.as_mut_ptr()).unwrap();
        unsafe { make_external_buffer(base, NonZeroUsize::new(PAGE_SIZE).unwrap()) }
    }

    #[test]
    fn io_page_kind_is_not_collectable() {
        let kind = BufferKind::IO_PAGE;
        assert!(kind.contains(BufferKind::EXTERNAL | BufferKind::UINT8 | BufferKind::C_LAYOUT));
        assert!(!kind.is_collectable());
        assert!((BufferKind::UINT8 | BufferKind::MANAGED).is_collectable());
    }

    #[test]
    fn accesses_are_bounds_checked() {
        let mut page = Page([0; PAGE_SIZE]);
        let buf = page_buffer(&mut page);
        assert_eq!(buf.len(), PAGE_SIZE);
        assert_eq!(buf.pages(), 1);
        assert!(buf.write_volatile(PAGE_SIZE - 1, 0xaa));
        assert_eq!(buf.read_volatile(PAGE_SIZE - 1), Some(0xaa));
        assert!(!buf.write_volatile(PAGE_SIZE, 0));
        assert_eq!(buf.read_volatile(PAGE_SIZE), None);

        let mut out = [0u8; 4];
        assert!(buf.copy_from_slice(8, b"ring"));
        assert!(buf.copy_to_slice(8, &mut out));
        assert_eq!(&out, b"ring");
        assert!(!buf.copy_to_slice(PAGE_SIZE - 2, &mut out));
        assert!(!buf.copy_from_slice(usize::MAX, b"x"));
    }

    #[test]
    fn copies_share_the_same_memory() {
        let mut page = Page([0; PAGE_SIZE]);
        let a = page_buffer(&mut page);
        let b = a;
        a.write_volatile(0, 7);
        assert_eq!(b.read_volatile(0), Some(7));
        assert_eq!(a, b);
    }
}
