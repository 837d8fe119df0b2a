use bit_field::BitField;
use raw_cpuid::{cpuid, CpuId};

/// "XenVMMXenVMM" in EBX, ECX, EDX.
const XEN_SIGNATURE: [u32; 3] = [0x566e_6558, 0x6558_4d4d, 0x4d4d_566e];

const LEAF_SEARCH_START: u32 = 0x4000_0000;
const LEAF_SEARCH_END: u32 = 0x4001_0000;
const LEAF_SEARCH_STEP: usize = 0x100;

/// Xen CPUID leaves. (xen/include/public/arch-x86/cpuid.h)
#[derive(Debug, Clone, Copy)]
pub struct XenCpuid {
    base: u32,
}

impl XenCpuid {
    /// Looks for the Xen leaves, which may be shifted by a viridian interface.
    pub fn detect() -> Option<Self> {
        (LEAF_SEARCH_START..LEAF_SEARCH_END)
            .step_by(LEAF_SEARCH_STEP)
            .find_map(|base| {
                let res = cpuid!(base);
                let found = [res.ebx, res.ecx, res.edx] == XEN_SIGNATURE && res.eax >= base + 2;
                found.then_some(Self { base })
            })
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    /// Hypervisor (major, minor) version.
    pub fn version(&self) -> (u16, u16) {
        let eax = cpuid!(self.base + 1).eax;
        (eax.get_bits(16..32) as u16, eax.get_bits(0..16) as u16)
    }

    /// Number of hypercall pages and the MSR through which they are installed.
    pub fn hypercall_msr(&self) -> (u32, u32) {
        let res = cpuid!(self.base + 2);
        (res.eax, res.ebx)
    }
}

/// Width of guest physical addresses.
pub fn phys_addr_bits() -> u8 {
    CpuId::new()
        .get_processor_capacity_feature_info()
        .map_or(36, |info| info.physical_address_bits())
}
