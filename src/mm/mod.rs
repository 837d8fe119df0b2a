mod frame;

pub use frame::pfn_to_virt;

pub const PAGE_SHIFT: usize = 12;
pub const PAGE_SIZE: usize = 1 << PAGE_SHIFT;

/// Guest page frame number, as reported by the hypervisor.
pub type Pfn = u64;
/// Guest physical address.
pub type PhysAddr = u64;
/// Guest virtual address.
pub type VirtAddr = usize;

pub const fn is_aligned(addr: usize, align: usize) -> bool {
    (addr & (align - 1)) == 0
}
