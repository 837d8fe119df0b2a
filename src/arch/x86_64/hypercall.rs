use core::arch::asm;

use crate::{PhysAddr, VirtAddr};

const HYPERCALL_ENTRY_SIZE: usize = 32;
const HYPERVISOR_HVM_OP: usize = 34;
const HVMOP_GET_PARAM: u64 = 1;
const DOMID_SELF: u16 = 0x7ff0;

/// Argument of `HVMOP_get_param`. (`struct xen_hvm_param`)
#[repr(C)]
#[derive(Debug)]
#[allow(dead_code)]
struct XenHvmParam {
    domid: u16,
    index: u32,
    value: u64,
}

/// The page Xen fills with one 32-byte stub per hypercall.
#[derive(Debug)]
pub struct HypercallPage {
    vaddr: VirtAddr,
}

impl HypercallPage {
    /// Asks Xen to fill the page at `paddr` with hypercall stubs.
    ///
    /// # Safety
    ///
    /// `vaddr` must map `paddr`, be page aligned, executable, and reserved
    /// for hypercall stubs for the rest of the process lifetime. `msr` must
    /// be the hypercall MSR reported by CPUID.
    pub unsafe fn install(msr: u32, vaddr: VirtAddr, paddr: PhysAddr) -> Self {
        x86::msr::wrmsr(msr, paddr);
        Self { vaddr }
    }

    unsafe fn hypercall2(&self, nr: usize, arg1: u64, arg2: u64) -> i64 {
        let entry = self.vaddr + nr * HYPERCALL_ENTRY_SIZE;
        let ret: i64;
        asm!(
            "call {entry}",
            entry = in(reg) entry,
            inlateout("rdi") arg1 => _,
            inlateout("rsi") arg2 => _,
            lateout("rax") ret,
            clobber_abi("C"),
        );
        ret
    }

    /// Returns the parameter value, or the negative errno from Xen.
    pub fn hvm_get_param(&self, index: u32) -> Result<u64, i64> {
        let mut param = XenHvmParam {
            domid: DOMID_SELF,
            index,
            value: 0,
        };
        let rc = unsafe {
            self.hypercall2(
                HYPERVISOR_HVM_OP,
                HVMOP_GET_PARAM,
                &mut param as *mut XenHvmParam as u64,
            )
        };
        if rc == 0 {
            Ok(param.value)
        } else {
            Err(rc)
        }
    }
}
