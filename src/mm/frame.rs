use core::ptr::NonNull;

use super::{is_aligned, Pfn, PhysAddr};
use crate::XenHal;

/// Translates a page frame number into the address of the page in this
/// address space.
///
/// Returns `None` for frame 0, for frames whose page would end beyond
/// [`XenHal::phys_addr_limit`], when the HAL has no mapping for the frame,
/// and when the mapped address is not aligned to `page_size`.
pub fn pfn_to_virt<H: XenHal>(hal: &H, pfn: Pfn, page_size: usize) -> Option<NonNull<u8>> {
    debug_assert!(page_size.is_power_of_two());
    if pfn == 0 {
        return None;
    }
    let paddr: PhysAddr = pfn.checked_mul(page_size as u64)?;
    let end = paddr.checked_add(page_size as u64)?;
    if end > hal.phys_addr_limit() {
        return None;
    }
    let vaddr = hal.phys_to_virt(paddr)?;
    if !is_aligned(vaddr, page_size) {
        warn!("[xenbind] pfn {:#x} mapped to unaligned vaddr {:#x}", pfn, vaddr);
        return None;
    }
    vaddr.checked_add(page_size)?;
    trace!("[xenbind] pfn {:#x} -> vaddr {:#x}", pfn, vaddr);
    NonNull::new(vaddr as *mut u8)
}
