use alloc::string::String;
use core::num::NonZeroUsize;

use crate::buffer::{make_external_buffer, ExternalBuffer};
use crate::mm::{pfn_to_virt, PAGE_SIZE};
use crate::{BootConfig, HvmParam, ParamKind, XenHal, XenResult};

const IO_PAGE_LEN: NonZeroUsize = match NonZeroUsize::new(PAGE_SIZE) {
    Some(len) => len,
    None => panic!("zero page size"),
};

/// Accessors the embedded runtime calls to obtain its boot-time resources.
pub struct Bindings<'a, H: XenHal> {
    hal: &'a H,
    boot: &'a BootConfig,
}

impl<'a, H: XenHal> Bindings<'a, H> {
    pub fn new(hal: &'a H, boot: &'a BootConfig) -> Self {
        Self { hal, boot }
    }

    pub fn get_command_line(&self) -> String {
        String::from(self.boot.command_line())
    }

    pub fn get_console_event_channel(&self) -> XenResult<i64> {
        self.event_channel(HvmParam::CONSOLE_EVTCHN)
    }

    /// The initial console ring page.
    pub fn get_console_page(&self) -> XenResult<ExternalBuffer> {
        self.io_page(HvmParam::CONSOLE_PFN)
    }

    pub fn get_xenstore_event_channel(&self) -> XenResult<i64> {
        self.event_channel(HvmParam::STORE_EVTCHN)
    }

    /// The Xenstore ring page.
    pub fn get_xenstore_page(&self) -> XenResult<ExternalBuffer> {
        self.io_page(HvmParam::STORE_PFN)
    }

    pub fn get_heap_total_bytes(&self) -> i64 {
        to_int64(self.boot.heap_size())
    }

    pub fn get_heap_allocated_bytes(&self) -> i64 {
        to_int64(self.hal.heap_allocated_bytes())
    }

    fn event_channel(&self, param: HvmParam) -> XenResult<i64> {
        debug_assert_eq!(param.kind(), ParamKind::EventChannel);
        let value = self.hal.hvm_get_param(param)?;
        trace!("[xenbind] {} = {}", param.name(), value);
        match i64::try_from(value) {
            Ok(port) => Ok(port),
            Err(_) => xen_err!(RepresentationOverflow { param, value }),
        }
    }

    fn io_page(&self, param: HvmParam) -> XenResult<ExternalBuffer> {
        debug_assert_eq!(param.kind(), ParamKind::PageFrame);
        let pfn = self.hal.hvm_get_param(param)?;
        trace!("[xenbind] {} = {:#x}", param.name(), pfn);
        let base = pfn_to_virt(self.hal, pfn, PAGE_SIZE)
            .ok_or_else(|| xen_err_type!(InvalidFrameNumber { param, pfn }))?;
        // The ring pages belong to the domain for its whole lifetime.
        Ok(unsafe { make_external_buffer(base, IO_PAGE_LEN) })
    }
}

fn to_int64(bytes: usize) -> i64 {
    match i64::try_from(bytes) {
        Ok(bytes) => bytes,
        Err(_) => panic!("byte count {:#x} exceeds i64", bytes),
    }
}
