use crate::{HvmParam, PhysAddr, QueryError, VirtAddr};

/// The interfaces which the underlying guest kernel must implement.
pub trait XenHal {
    /// Reads an HVM parameter of the current domain (`HVMOP_get_param`).
    fn hvm_get_param(&self, param: HvmParam) -> Result<u64, QueryError>;
    /// Converts a guest physical address to a virtual address which can access it,
    /// or `None` if the address is not mapped.
    fn phys_to_virt(&self, paddr: PhysAddr) -> Option<VirtAddr>;
    /// Exclusive upper bound of the guest physical address space.
    fn phys_addr_limit(&self) -> PhysAddr;
    /// Bytes currently handed out by the guest heap allocator.
    fn heap_allocated_bytes(&self) -> usize;
}
