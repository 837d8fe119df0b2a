use alloc::string::String;
use core::ffi::{c_char, CStr};

use spin::Once;

/// Start-of-day information passed by the boot code. (`struct solo5_start_info`)
#[repr(C)]
#[derive(Debug)]
pub struct StartInfo {
    pub cmdline: *const c_char,
    pub heap_start: usize,
    pub heap_size: usize,
}

/// Configuration captured once at boot, read-only afterwards.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BootConfig {
    command_line: String,
    heap_start: usize,
    heap_size: usize,
}

impl BootConfig {
    pub fn new(command_line: impl Into<String>, heap_start: usize, heap_size: usize) -> Self {
        Self {
            command_line: command_line.into(),
            heap_start,
            heap_size,
        }
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub fn heap_start(&self) -> usize {
        self.heap_start
    }

    pub fn heap_size(&self) -> usize {
        self.heap_size
    }
}

/// Builds the [`BootConfig`] from the boot code's start info.
///
/// # Safety
///
/// `si.cmdline` must be null or point to a NUL-terminated string.
pub unsafe fn bootstrap(si: &StartInfo) -> BootConfig {
    let command_line = if si.cmdline.is_null() {
        String::new()
    } else {
        let raw = CStr::from_ptr(si.cmdline);
        match raw.to_str() {
            Ok(s) => String::from(s),
            Err(_) => {
                warn!("[xenbind] command line is not valid UTF-8");
                String::from_utf8_lossy(raw.to_bytes()).into_owned()
            }
        }
    };
    info!(
        "[xenbind] boot: cmdline {:?}, heap [{:#x}, {:#x})",
        command_line,
        si.heap_start,
        si.heap_start.wrapping_add(si.heap_size)
    );
    BootConfig::new(command_line, si.heap_start, si.heap_size)
}

static BOOT_CONFIG: Once<BootConfig> = Once::new();

/// Publishes the process-wide [`BootConfig`].
///
/// Only the first call takes effect; later calls hand their record back.
pub fn install(config: BootConfig) -> Result<&'static BootConfig, BootConfig> {
    let mut pending = Some(config);
    let installed = BOOT_CONFIG.call_once(|| pending.take().unwrap_or_default());
    match pending {
        None => Ok(installed),
        Some(rejected) => {
            warn!("[xenbind] boot config already installed");
            Err(rejected)
        }
    }
}

/// The record published by [`install`], if any.
pub fn installed() -> Option<&'static BootConfig> {
    BOOT_CONFIG.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_copies_the_command_line() {
        let si = StartInfo {
            cmdline: b"root=/dev/xvda1\0".as_ptr() as *const c_char,
            heap_start: 0x20_0000,
            heap_size: 0x100_0000,
        };
        let config = unsafe { bootstrap(&si) };
        assert_eq!(config.command_line(), "root=/dev/xvda1");
        assert_eq!(config.heap_start(), 0x20_0000);
        assert_eq!(config.heap_size(), 0x100_0000);
    }

    #[test]
    fn null_command_line_is_empty() {
        let si = StartInfo {
            cmdline: core::ptr::null(),
            heap_start: 0,
            heap_size: 0,
        };
        assert_eq!(unsafe { bootstrap(&si) }.command_line(), "");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let raw = [b'a', 0xff, b'b', 0];
        let si = StartInfo {
            cmdline: raw.as_ptr() as *const c_char,
            heap_start: 0,
            heap_size: 0,
        };
        assert_eq!(unsafe { bootstrap(&si) }.command_line(), "a\u{fffd}b");
    }

    #[test]
    fn install_happens_once() {
        let first = install(BootConfig::new("console=hvc0", 0, 0x1000)).unwrap();
        assert_eq!(first.command_line(), "console=hvc0");
        let rejected = install(BootConfig::new("other", 0, 0)).unwrap_err();
        assert_eq!(rejected.command_line(), "other");
        assert_eq!(installed(), Some(first));
    }
}
