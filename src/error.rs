use core::fmt;

use crate::param::{HvmParam, QueryFailure};

/// The error type for hypervisor boundary operations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum XenError {
    /// The `HVMOP_get_param` query failed.
    ParamUnavailable { param: HvmParam, reason: QueryFailure },
    /// The hypervisor handed out a page frame that cannot be mapped.
    InvalidFrameNumber { param: HvmParam, pfn: u64 },
    /// The value does not fit the runtime's integer representation.
    RepresentationOverflow { param: HvmParam, value: u64 },
}

/// The stage of an accessor at which an error was raised.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Stage {
    Query,
    Translate,
    Marshal,
}

/// A [`Result`] type with [`XenError`] as the error type.
pub type XenResult<T = ()> = Result<T, XenError>;

impl XenError {
    /// The parameter whose retrieval failed.
    pub fn param(&self) -> HvmParam {
        match *self {
            Self::ParamUnavailable { param, .. }
            | Self::InvalidFrameNumber { param, .. }
            | Self::RepresentationOverflow { param, .. } => param,
        }
    }

    /// The accessor stage that raised the error.
    pub fn stage(&self) -> Stage {
        match self {
            Self::ParamUnavailable { .. } => Stage::Query,
            Self::InvalidFrameNumber { .. } => Stage::Translate,
            Self::RepresentationOverflow { .. } => Stage::Marshal,
        }
    }
}

impl fmt::Display for XenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ParamUnavailable { param, reason } => {
                write!(f, "hvm_get_param {}: {:?}", param.name(), reason)
            }
            Self::InvalidFrameNumber { param, pfn } => {
                write!(f, "{}: invalid page frame number {:#x}", param.name(), pfn)
            }
            Self::RepresentationOverflow { param, value } => {
                write!(f, "{}: value {:#x} out of range", param.name(), value)
            }
        }
    }
}

macro_rules! xen_err_type {
    ($err: ident { $($field: ident $(: $value: expr)?),* $(,)? }) => {{
        let err = $crate::error::XenError::$err { $($field $(: $value)?),* };
        warn!("[XenError::{}] {}", stringify!($err), err);
        err
    }};
}

macro_rules! xen_err {
    ($err: ident { $($field: ident $(: $value: expr)?),* $(,)? }) => {
        Err(xen_err_type!($err { $($field $(: $value)?),* }))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_follows_variant() {
        let err = XenError::InvalidFrameNumber {
            param: HvmParam::STORE_PFN,
            pfn: 0,
        };
        assert_eq!(err.stage(), Stage::Translate);
        assert_eq!(err.param(), HvmParam::STORE_PFN);

        let err: XenResult<u64> = xen_err!(ParamUnavailable {
            param: HvmParam::CONSOLE_EVTCHN,
            reason: QueryFailure::InvalidArgument,
        });
        assert_eq!(err.unwrap_err().stage(), Stage::Query);
    }

    #[test]
    fn display_names_the_parameter() {
        let err = XenError::ParamUnavailable {
            param: HvmParam::CONSOLE_EVTCHN,
            reason: QueryFailure::NotPermitted,
        };
        assert_eq!(
            err.to_string(),
            "hvm_get_param HVM_PARAM_CONSOLE_EVTCHN: NotPermitted"
        );
    }
}
