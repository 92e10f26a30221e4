//! LAPDm frame header (3GPP TS 44.006, clause 5)

use core::fmt;

use gsm_core::pdu_parse_error::{PduParseErr, octet};

/// Address octet, SAPI 0, command frame sent by the network
pub const ADDR_SAPI0_CMD_NET: u8 = 0x03;
/// Address octet, SAPI 0, response frame sent by the MS
pub const ADDR_SAPI0_RESP_MS: u8 = 0x01;

/// Address field (clause 3.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapdmAddress {
    /// Link protocol discriminator, 2 bits
    pub lpd: u8,
    /// Service access point identifier, 3 bits
    pub sapi: u8,
    /// Command/response bit
    pub cr: bool,
    /// Address field extension bit, always set on Um
    pub ea: bool,
}

impl LapdmAddress {
    pub fn from_raw(raw: u8) -> Self {
        LapdmAddress {
            lpd: (raw >> 5) & 0x03,
            sapi: (raw >> 2) & 0x07,
            cr: raw & 0x02 != 0,
            ea: raw & 0x01 != 0,
        }
    }

    pub fn into_raw(self) -> u8 {
        (self.lpd & 0x03) << 5 | (self.sapi & 0x07) << 2 | (self.cr as u8) << 1 | self.ea as u8
    }
}

/// Control field (clause 3.4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapdmControl {
    /// Information transfer, numbered
    I { n_s: u8, p: bool, n_r: u8 },
    /// Supervisory (RR, RNR, REJ)
    S { s: u8, pf: bool, n_r: u8 },
    /// Unnumbered, raw control octet with the P/F bit
    U { raw: u8 },
}

impl LapdmControl {
    pub fn from_raw(raw: u8) -> Self {
        if raw & 0x01 == 0 {
            LapdmControl::I { n_s: (raw >> 1) & 0x07, p: raw & 0x10 != 0, n_r: raw >> 5 }
        } else if raw & 0x03 == 0x01 {
            LapdmControl::S { s: (raw >> 2) & 0x03, pf: raw & 0x10 != 0, n_r: raw >> 5 }
        } else {
            LapdmControl::U { raw }
        }
    }

    pub fn is_i_frame(&self) -> bool {
        matches!(self, LapdmControl::I { .. })
    }
}

/// Address, control and length octets leading every LAPDm frame with a B/Bbis format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapdmHeader {
    pub addr_raw: u8,
    pub addr: LapdmAddress,
    pub control: LapdmControl,
}

impl LapdmHeader {
    /// Parses address and control octets
    pub fn from_bytes(data: &[u8]) -> Result<Self, PduParseErr> {
        let addr_raw = octet(data, 0, "address")?;
        let control_raw = octet(data, 1, "control")?;
        Ok(LapdmHeader {
            addr_raw,
            addr: LapdmAddress::from_raw(addr_raw),
            control: LapdmControl::from_raw(control_raw),
        })
    }

    /// Offset of the L3 payload in a frame with address, control and length octets
    pub const L3_OFFSET: usize = 3;
}

impl fmt::Display for LapdmHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.control {
            LapdmControl::I { n_s, p, n_r } => {
                write!(f, "I sapi={} cr={} N(S)={} N(R)={} P={}", self.addr.sapi, self.addr.cr as u8, n_s, n_r, p as u8)
            }
            LapdmControl::S { s, pf, n_r } => {
                write!(f, "S{} sapi={} N(R)={} PF={}", s, self.addr.sapi, n_r, pf as u8)
            }
            LapdmControl::U { raw } => write!(f, "U 0x{:02x} sapi={}", raw, self.addr.sapi),
        }
    }
}
