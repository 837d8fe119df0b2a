numeric_enum_macro::numeric_enum! {
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[allow(non_camel_case_types)]
/// HVM parameters the guest reads at boot. (xen/include/public/hvm/params.h)
pub enum HvmParam {
    STORE_PFN = 1,
    STORE_EVTCHN = 2,
    CONSOLE_PFN = 17,
    CONSOLE_EVTCHN = 18,
}
}

/// What the 64-bit value of a parameter denotes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ParamKind {
    EventChannel,
    PageFrame,
}

impl HvmParam {
    pub const fn kind(self) -> ParamKind {
        match self {
            Self::STORE_PFN | Self::CONSOLE_PFN => ParamKind::PageFrame,
            Self::STORE_EVTCHN | Self::CONSOLE_EVTCHN => ParamKind::EventChannel,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::STORE_PFN => "HVM_PARAM_STORE_PFN",
            Self::STORE_EVTCHN => "HVM_PARAM_STORE_EVTCHN",
            Self::CONSOLE_PFN => "HVM_PARAM_CONSOLE_PFN",
            Self::CONSOLE_EVTCHN => "HVM_PARAM_CONSOLE_EVTCHN",
        }
    }
}

/// Why a parameter query failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum QueryFailure {
    NotPermitted,
    NoSuchDomain,
    InvalidArgument,
    NotImplemented,
    /// No Xen hypervisor (or no hypercall page) is available.
    NoHypervisor,
    /// Any other hypercall return value.
    Other(i64),
}

impl QueryFailure {
    /// Decodes a hypercall return value, which is a negated Xen errno.
    pub const fn from_errno(rc: i64) -> Self {
        match rc.wrapping_neg() {
            1 => Self::NotPermitted,
            3 => Self::NoSuchDomain,
            22 => Self::InvalidArgument,
            38 => Self::NotImplemented,
            _ => Self::Other(rc),
        }
    }
}

/// A failed query of one parameter.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct QueryError {
    pub param: HvmParam,
    pub reason: QueryFailure,
}

impl QueryError {
    pub const fn new(param: HvmParam, reason: QueryFailure) -> Self {
        Self { param, reason }
    }
}

impl From<QueryError> for crate::XenError {
    fn from(err: QueryError) -> Self {
        xen_err_type!(ParamUnavailable {
            param: err.param,
            reason: err.reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_index_round_trips() {
        assert_eq!(HvmParam::try_from(18u32), Ok(HvmParam::CONSOLE_EVTCHN));
        assert_eq!(HvmParam::try_from(1u32), Ok(HvmParam::STORE_PFN));
        assert!(HvmParam::try_from(3u32).is_err());
        assert_eq!(HvmParam::CONSOLE_PFN as u32, 17);
    }

    #[test]
    fn kinds() {
        assert_eq!(HvmParam::STORE_PFN.kind(), ParamKind::PageFrame);
        assert_eq!(HvmParam::STORE_EVTCHN.kind(), ParamKind::EventChannel);
    }

    #[test]
    fn errno_decoding() {
        assert_eq!(QueryFailure::from_errno(-22), QueryFailure::InvalidArgument);
        assert_eq!(QueryFailure::from_errno(-38), QueryFailure::NotImplemented);
        assert_eq!(QueryFailure::from_errno(-7), QueryFailure::Other(-7));
        let wide = -(1i64 << 40);
        assert_eq!(QueryFailure::from_errno(wide), QueryFailure::Other(wide));
    }
}
