//! RSL causes used at the L1SAP boundary (3GPP TS 48.058 9.3.26)

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RslCause {
    RadioIfFail = 0x00,
    RadioLinkFail = 0x01,
    HandoverAccFail = 0x02,
    NormalUnspec = 0x0f,
    EquipmentFail = 0x20,
    RrUnavail = 0x21,
    ServOptUnavail = 0x3f,
    ServOptUnimpl = 0x4f,
}

impl RslCause {
    pub fn into_raw(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RslCause {
    type Error = ();
    fn try_from(x: u8) -> Result<Self, Self::Error> {
        match x {
            0x00 => Ok(RslCause::RadioIfFail),
            0x01 => Ok(RslCause::RadioLinkFail),
            0x02 => Ok(RslCause::HandoverAccFail),
            0x0f => Ok(RslCause::NormalUnspec),
            0x20 => Ok(RslCause::EquipmentFail),
            0x21 => Ok(RslCause::RrUnavail),
            0x3f => Ok(RslCause::ServOptUnavail),
            0x4f => Ok(RslCause::ServOptUnimpl),
            _ => Err(()),
        }
    }
}

impl core::fmt::Display for RslCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RslCause::RadioIfFail => write!(f, "radio interface failure"),
            RslCause::RadioLinkFail => write!(f, "radio link failure"),
            RslCause::HandoverAccFail => write!(f, "handover access failure"),
            RslCause::NormalUnspec => write!(f, "normal event, unspecified"),
            RslCause::EquipmentFail => write!(f, "equipment failure"),
            RslCause::RrUnavail => write!(f, "radio resource not available"),
            RslCause::ServOptUnavail => write!(f, "service or option not available"),
            RslCause::ServOptUnimpl => write!(f, "service or option not implemented"),
        }
    }
}
