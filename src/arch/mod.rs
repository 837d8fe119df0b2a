cfg_if::cfg_if! {
    if #[cfg(all(feature = "hvm", target_arch = "x86_64"))] {
        mod x86_64;
        pub use self::x86_64::{XenCpuid, XenHvm};
    }
}
