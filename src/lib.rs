//! Boot-parameter bindings between a Xen guest and an embedded managed runtime.
//!
//! Values such as the console and Xenstore event channels are queried from the
//! hypervisor, and the shared ring pages are handed out as [`ExternalBuffer`]s:
//! views over hypervisor-owned memory that can never be freed by the runtime.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
extern crate log;

#[macro_use]
mod error;
mod bindings;
mod boot;
mod buffer;
mod hal;
mod mm;
mod param;

pub mod arch;

pub use bindings::Bindings;
pub use boot::{bootstrap, install, installed, BootConfig, StartInfo};
pub use buffer::{make_external_buffer, BufferKind, ExternalBuffer};
pub use error::{Stage, XenError, XenResult};
pub use hal::XenHal;
pub use mm::{pfn_to_virt, Pfn, PhysAddr, VirtAddr, PAGE_SHIFT, PAGE_SIZE};
pub use param::{HvmParam, ParamKind, QueryError, QueryFailure};
