//! Primitives exchanged with the LAPDm link layer

use core::fmt;

use gsm_core::AccessBurstType;

/// Which LAPDm entity of an lchan a block belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LapdmLink {
    /// Main dedicated channel: SDCCH or FACCH
    Dcch,
    /// Slow associated control channel
    Acch,
}

impl LapdmLink {
    pub fn from_link_id(link_id: u8) -> Self {
        if gsm_core::chan_nr::is_link_sacch(link_id) {
            LapdmLink::Acch
        } else {
            LapdmLink::Dcch
        }
    }
}

impl fmt::Display for LapdmLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LapdmLink::Dcch => write!(f, "DCCH"),
            LapdmLink::Acch => write!(f, "ACCH"),
        }
    }
}

/// Channel request burst handed to the CCCH LAPDm entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapdmRachInd {
    pub chan_nr: u8,
    pub ra: u16,
    pub acc_delay: u8,
    pub fn_nr: u32,
    pub is_11bit: bool,
    pub burst_type: AccessBurstType,
}

/// T200 values for both LAPDm entities of an lchan, milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct T200Set {
    pub dcch_sapi0_ms: u32,
    pub dcch_sapi3_ms: u32,
    pub acch_sapi0_ms: u32,
    pub acch_sapi3_ms: u32,
}

/// Index into the per-channel-type T200 table (TS 12.21 9.4.53)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum T200Chan {
    Sdcch = 0,
    FacchF = 1,
    FacchH = 2,
    SacchTchSapi0 = 3,
    SacchSdcch = 4,
    SdcchSapi3 = 5,
    SacchTchSapi3 = 6,
}

pub const T200_NUM: usize = 7;

/// Default T200 values in milliseconds, indexed by `T200Chan`
pub const T200_DEFAULT_MS: [u32; T200_NUM] = [1000, 1000, 1000, 2000, 2000, 1000, 2000];

impl T200Chan {
    pub fn idx(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_from_id() {
        assert_eq!(LapdmLink::from_link_id(0x40), LapdmLink::Acch);
        assert_eq!(LapdmLink::from_link_id(0x00), LapdmLink::Dcch);
        assert_eq!(LapdmLink::from_link_id(0x03), LapdmLink::Dcch);
    }

    #[test]
    fn test_t200_defaults() {
        assert_eq!(T200_DEFAULT_MS[T200Chan::SacchSdcch.idx()], 2000);
        assert_eq!(T200_DEFAULT_MS[T200Chan::SdcchSapi3.idx()], 1000);
    }
}
