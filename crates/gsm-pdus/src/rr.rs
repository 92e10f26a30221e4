//! Layer 3 header peeking (3GPP TS 44.018 / TS 24.007)

use gsm_core::pdu_parse_error::{PduParseErr, octet};
use gsm_core::expect_pdu_type;

/// Protocol discriminator, low nibble of the first L3 octet (TS 24.007 11.2.3.1.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gsm48Pdisc {
    Cc = 0x03,
    Mm = 0x05,
    Rr = 0x06,
    Gmm = 0x08,
    Sms = 0x09,
    Sm = 0x0a,
    Ss = 0x0b,
}

impl TryFrom<u8> for Gsm48Pdisc {
    type Error = ();
    fn try_from(x: u8) -> Result<Self, Self::Error> {
        match x {
            0x03 => Ok(Gsm48Pdisc::Cc),
            0x05 => Ok(Gsm48Pdisc::Mm),
            0x06 => Ok(Gsm48Pdisc::Rr),
            0x08 => Ok(Gsm48Pdisc::Gmm),
            0x09 => Ok(Gsm48Pdisc::Sms),
            0x0a => Ok(Gsm48Pdisc::Sm),
            0x0b => Ok(Gsm48Pdisc::Ss),
            _ => Err(()),
        }
    }
}

impl Gsm48Pdisc {
    pub fn into_raw(self) -> u8 {
        self as u8
    }
}

/// RR message types relevant to ciphering (TS 44.018 10.4), 6 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RrMsgType {
    CiphModeCompl = 0x32,
    CiphModeCmd = 0x35,
    AssignCmd = 0x2e,
    HandoCmd = 0x2b,
    ChanRel = 0x0d,
}

impl TryFrom<u8> for RrMsgType {
    type Error = ();
    fn try_from(x: u8) -> Result<Self, Self::Error> {
        match x {
            0x32 => Ok(RrMsgType::CiphModeCompl),
            0x35 => Ok(RrMsgType::CiphModeCmd),
            0x2e => Ok(RrMsgType::AssignCmd),
            0x2b => Ok(RrMsgType::HandoCmd),
            0x0d => Ok(RrMsgType::ChanRel),
            _ => Err(()),
        }
    }
}

impl RrMsgType {
    pub fn into_raw(self) -> u8 {
        self as u8
    }
}

impl core::fmt::Display for RrMsgType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RrMsgType::CiphModeCompl => write!(f, "CIPHERING MODE COMPLETE"),
            RrMsgType::CiphModeCmd => write!(f, "CIPHERING MODE COMMAND"),
            RrMsgType::AssignCmd => write!(f, "ASSIGNMENT COMMAND"),
            RrMsgType::HandoCmd => write!(f, "HANDOVER COMMAND"),
            RrMsgType::ChanRel => write!(f, "CHANNEL RELEASE"),
        }
    }
}

/// Protocol discriminator and message type of an L3 message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L3Header {
    /// Low nibble of octet 0
    pub pdisc: u8,
    /// Low 6 bits of octet 1, the upper bits carry the send sequence number
    pub msg_type: u8,
}

impl L3Header {
    pub fn from_bytes(l3: &[u8]) -> Result<Self, PduParseErr> {
        Ok(L3Header {
            pdisc: octet(l3, 0, "pdisc")? & 0x0f,
            msg_type: octet(l3, 1, "msg_type")? & 0x3f,
        })
    }

    pub fn is_rr(&self) -> bool {
        self.pdisc == Gsm48Pdisc::Rr.into_raw()
    }

    /// Ok if this is the given RR message
    pub fn expect_rr(&self, msg_type: RrMsgType) -> Result<(), PduParseErr> {
        if !self.is_rr() {
            return Err(PduParseErr::InvalidValue { field: "pdisc", value: self.pdisc as u64 });
        }
        expect_pdu_type!(self.msg_type, msg_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ciph_mode_cmd_header() {
        // Skip indicator 0, pdisc RR, sequence bits set in the message type octet
        let hdr = L3Header::from_bytes(&[0x06, 0x75, 0x01]).unwrap();
        assert!(hdr.is_rr());
        assert_eq!(RrMsgType::try_from(hdr.msg_type), Ok(RrMsgType::CiphModeCmd));
        assert!(hdr.expect_rr(RrMsgType::CiphModeCmd).is_ok());
        assert_eq!(
            hdr.expect_rr(RrMsgType::ChanRel),
            Err(PduParseErr::InvalidPduType { expected: 0x0d, found: 0x35 })
        );
    }

    #[test]
    fn test_other_pdisc() {
        let hdr = L3Header::from_bytes(&[0x05, 0x35]).unwrap();
        assert!(!hdr.is_rr());
        assert!(hdr.expect_rr(RrMsgType::CiphModeCmd).is_err());
        assert_eq!(Gsm48Pdisc::try_from(hdr.pdisc), Ok(Gsm48Pdisc::Mm));
        assert!(L3Header::from_bytes(&[0x06]).is_err());
    }
}
