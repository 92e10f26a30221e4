//! GSMTAP version 2 pseudo-header for Um captures

use gsm_core::pdu_parse_error::PduParseErr;

pub const GSMTAP_VERSION: u8 = 0x02;
pub const GSMTAP_TYPE_UM: u8 = 0x01;
pub const GSMTAP_UDP_PORT: u16 = 4729;
/// Header length in octets; the header itself carries it in 32-bit words
pub const GSMTAP_HDR_LEN: usize = 16;

/// Set in the ARFCN field for uplink captures
pub const GSMTAP_ARFCN_F_UPLINK: u16 = 0x4000;
/// Or-ed onto a channel category for the associated control channel
pub const GSMTAP_CHANNEL_ACCH: u8 = 0x80;

/// Channel sub-type (GSMTAP_CHANNEL_*)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GsmtapChannel {
    Unknown = 0x00,
    Bcch = 0x01,
    Ccch = 0x02,
    Rach = 0x03,
    Agch = 0x04,
    Pch = 0x05,
    Sdcch = 0x06,
    Sdcch4 = 0x07,
    Sdcch8 = 0x08,
    TchF = 0x09,
    TchH = 0x0a,
    Pacch = 0x0b,
    Cbch52 = 0x0c,
    Pdtch = 0x0d,
    Ptcch = 0x0e,
    Cbch51 = 0x0f,
}

impl TryFrom<u8> for GsmtapChannel {
    type Error = ();
    fn try_from(x: u8) -> Result<Self, Self::Error> {
        match x {
            0x00 => Ok(GsmtapChannel::Unknown),
            0x01 => Ok(GsmtapChannel::Bcch),
            0x02 => Ok(GsmtapChannel::Ccch),
            0x03 => Ok(GsmtapChannel::Rach),
            0x04 => Ok(GsmtapChannel::Agch),
            0x05 => Ok(GsmtapChannel::Pch),
            0x06 => Ok(GsmtapChannel::Sdcch),
            0x07 => Ok(GsmtapChannel::Sdcch4),
            0x08 => Ok(GsmtapChannel::Sdcch8),
            0x09 => Ok(GsmtapChannel::TchF),
            0x0a => Ok(GsmtapChannel::TchH),
            0x0b => Ok(GsmtapChannel::Pacch),
            0x0c => Ok(GsmtapChannel::Cbch52),
            0x0d => Ok(GsmtapChannel::Pdtch),
            0x0e => Ok(GsmtapChannel::Ptcch),
            0x0f => Ok(GsmtapChannel::Cbch51),
            _ => Err(()),
        }
    }
}

impl GsmtapChannel {
    pub fn into_raw(self) -> u8 {
        self as u8
    }

    /// Operator-facing name, as used in the capture filter configuration
    pub fn sapi_name(self) -> &'static str {
        match self {
            GsmtapChannel::Unknown => "UNKNOWN",
            GsmtapChannel::Bcch => "BCCH",
            GsmtapChannel::Ccch => "CCCH",
            GsmtapChannel::Rach => "RACH",
            GsmtapChannel::Agch => "AGCH",
            GsmtapChannel::Pch => "PCH",
            GsmtapChannel::Sdcch | GsmtapChannel::Sdcch4 | GsmtapChannel::Sdcch8 => "SDCCH",
            GsmtapChannel::TchF => "TCH/F",
            GsmtapChannel::TchH => "TCH/H",
            GsmtapChannel::Pacch => "PACCH",
            GsmtapChannel::Pdtch => "PDTCH",
            GsmtapChannel::Ptcch => "PTCCH",
            GsmtapChannel::Cbch51 | GsmtapChannel::Cbch52 => "CBCH",
        }
    }
}

/// Categories that can be selected in the capture filter, by name
pub const GSMTAP_SAPIS: [GsmtapChannel; 12] = [
    GsmtapChannel::Bcch,
    GsmtapChannel::Ccch,
    GsmtapChannel::Rach,
    GsmtapChannel::Agch,
    GsmtapChannel::Pch,
    GsmtapChannel::Sdcch,
    GsmtapChannel::TchF,
    GsmtapChannel::TchH,
    GsmtapChannel::Pacch,
    GsmtapChannel::Pdtch,
    GsmtapChannel::Ptcch,
    GsmtapChannel::Cbch51,
];

/// Name used in configuration to select associated control channels
pub const GSMTAP_SAPI_ACCH_NAME: &str = "SACCH";

/// Looks up a filter category by its name, case-insensitive
pub fn sapi_by_name(name: &str) -> Option<GsmtapChannel> {
    GSMTAP_SAPIS.iter().copied().find(|c| c.sapi_name().eq_ignore_ascii_case(name))
}

/// Bit in the capture filter mask for a channel category
#[inline]
pub fn sapi_mask_bit(chan_type: u8) -> u32 {
    1u32 << (chan_type & 31)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GsmtapHeader {
    pub timeslot: u8,
    /// ARFCN, possibly or-ed with GSMTAP_ARFCN_F_UPLINK
    pub arfcn: u16,
    pub signal_dbm: i8,
    pub snr_db: i8,
    pub frame_number: u32,
    /// GsmtapChannel value, possibly or-ed with GSMTAP_CHANNEL_ACCH
    pub sub_type: u8,
    pub antenna_nr: u8,
    pub sub_slot: u8,
}

impl GsmtapHeader {
    pub fn to_bytes(&self) -> [u8; GSMTAP_HDR_LEN] {
        let mut b = [0u8; GSMTAP_HDR_LEN];
        b[0] = GSMTAP_VERSION;
        b[1] = (GSMTAP_HDR_LEN / 4) as u8;
        b[2] = GSMTAP_TYPE_UM;
        b[3] = self.timeslot;
        b[4..6].copy_from_slice(&self.arfcn.to_be_bytes());
        b[6] = self.signal_dbm as u8;
        b[7] = self.snr_db as u8;
        b[8..12].copy_from_slice(&self.frame_number.to_be_bytes());
        b[12] = self.sub_type;
        b[13] = self.antenna_nr;
        b[14] = self.sub_slot;
        b[15] = 0;
        b
    }

    pub fn from_bytes(b: &[u8]) -> Result<Self, PduParseErr> {
        if b.len() < GSMTAP_HDR_LEN {
            return Err(PduParseErr::InconsistentLength { expected: GSMTAP_HDR_LEN, found: b.len() });
        }
        if b[0] != GSMTAP_VERSION {
            return Err(PduParseErr::InvalidValue { field: "version", value: b[0] as u64 });
        }
        if b[2] != GSMTAP_TYPE_UM {
            return Err(PduParseErr::InvalidValue { field: "type", value: b[2] as u64 });
        }
        Ok(GsmtapHeader {
            timeslot: b[3],
            arfcn: u16::from_be_bytes([b[4], b[5]]),
            signal_dbm: b[6] as i8,
            snr_db: b[7] as i8,
            frame_number: u32::from_be_bytes([b[8], b[9], b[10], b[11]]),
            sub_type: b[12],
            antenna_nr: b[13],
            sub_slot: b[14],
        })
    }

    /// Header followed by the payload, ready for a UDP datagram
    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(GSMTAP_HDR_LEN + payload.len());
        out.extend_from_slice(&self.to_bytes());
        out.extend_from_slice(payload);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let hdr = GsmtapHeader {
            timeslot: 2,
            arfcn: 871 | GSMTAP_ARFCN_F_UPLINK,
            signal_dbm: -60,
            snr_db: 0,
            frame_number: 0x0001_0203,
            sub_type: GsmtapChannel::Sdcch.into_raw() | GSMTAP_CHANNEL_ACCH,
            antenna_nr: 0,
            sub_slot: 3,
        };
        let bytes = hdr.to_bytes();
        assert_eq!(&bytes[..4], &[0x02, 0x04, 0x01, 0x02]);
        assert_eq!(&bytes[4..6], &[0x43, 0x67]);
        assert_eq!(bytes[6], 0xc4);
        assert_eq!(&bytes[8..12], &[0x00, 0x01, 0x02, 0x03]);
        assert_eq!(bytes[12], 0x86);
        assert_eq!(bytes[14], 3);
        assert_eq!(GsmtapHeader::from_bytes(&bytes), Ok(hdr));

        let dgram = hdr.encapsulate(&[0xaa, 0xbb]);
        assert_eq!(dgram.len(), GSMTAP_HDR_LEN + 2);
    }

    #[test]
    fn test_sapi_names() {
        assert_eq!(sapi_by_name("tch/f"), Some(GsmtapChannel::TchF));
        assert_eq!(sapi_by_name("CBCH"), Some(GsmtapChannel::Cbch51));
        assert_eq!(sapi_by_name("SACCH"), None);
        assert_eq!(sapi_mask_bit(GsmtapChannel::Pdtch.into_raw()), 1 << 13);
        assert!(GsmtapHeader::from_bytes(&[0u8; 4]).is_err());
    }
}
