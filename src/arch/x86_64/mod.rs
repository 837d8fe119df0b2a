mod cpuid;
mod hypercall;

use crate::{HvmParam, PhysAddr, QueryError, QueryFailure, VirtAddr, XenHal};

use self::hypercall::HypercallPage;

pub use self::cpuid::XenCpuid;

/// [`XenHal`] for an x86_64 HVM/PVH guest with identity-mapped memory.
pub struct XenHvm {
    hypercall: HypercallPage,
    phys_addr_limit: PhysAddr,
    heap_footprint: fn() -> usize,
}

impl XenHvm {
    /// Detects Xen and installs the hypercall page at `page_vaddr`/`page_paddr`.
    ///
    /// `heap_footprint` reports the bytes in use by the guest allocator.
    ///
    /// Fails with [`QueryFailure::NoHypervisor`] when not running on Xen.
    ///
    /// # Safety
    ///
    /// The page must satisfy the requirements of a hypercall page: page
    /// aligned, executable, identity of `page_paddr`, and unused otherwise.
    pub unsafe fn init(
        page_vaddr: VirtAddr,
        page_paddr: PhysAddr,
        heap_footprint: fn() -> usize,
    ) -> Result<Self, QueryFailure> {
        let Some(xen) = XenCpuid::detect() else {
            warn!("[xenbind] Xen CPUID leaves not found");
            return Err(QueryFailure::NoHypervisor);
        };
        let (major, minor) = xen.version();
        let (pages, msr) = xen.hypercall_msr();
        if pages == 0 {
            warn!("[xenbind] Xen reports no hypercall pages");
            return Err(QueryFailure::NoHypervisor);
        }
        info!(
            "[xenbind] Xen {}.{} at CPUID base {:#x}, hypercall MSR {:#x}",
            major,
            minor,
            xen.base(),
            msr
        );
        Ok(Self {
            hypercall: HypercallPage::install(msr, page_vaddr, page_paddr),
            phys_addr_limit: 1 << cpuid::phys_addr_bits(),
            heap_footprint,
        })
    }
}

impl XenHal for XenHvm {
    fn hvm_get_param(&self, param: HvmParam) -> Result<u64, QueryError> {
        self.hypercall
            .hvm_get_param(param as u32)
            .map_err(|rc| QueryError::new(param, QueryFailure::from_errno(rc)))
    }

    fn phys_to_virt(&self, paddr: PhysAddr) -> Option<VirtAddr> {
        let vaddr = ::x86_64::VirtAddr::try_new(paddr).ok()?;
        usize::try_from(vaddr.as_u64()).ok()
    }

    fn phys_addr_limit(&self) -> PhysAddr {
        self.phys_addr_limit
    }

    fn heap_allocated_bytes(&self) -> usize {
        (self.heap_footprint)()
    }
}
