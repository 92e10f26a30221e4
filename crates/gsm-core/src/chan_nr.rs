//! Channel number and link identifier codec (3GPP TS 48.058, 9.3.1 and 9.3.2)
//!
//! The channel number byte carries the timeslot in its three low bits and a
//! five bit "C-bits" field selecting the channel kind and, for multiplexed
//! kinds, the subslot.

use core::fmt;

/// Set in the C-bits of all common (non-dedicated) channels
pub const CHAN_NR_C5: u8 = 0x80;
pub const CHAN_NR_MASK: u8 = 0xf8;

pub const CHAN_NR_BM_ACCHS: u8 = 0x08;
pub const CHAN_NR_LM_ACCHS: u8 = 0x10;
pub const CHAN_NR_SDCCH4_ACCH: u8 = 0x20;
pub const CHAN_NR_SDCCH8_ACCH: u8 = 0x40;
pub const CHAN_NR_BCCH: u8 = 0x80;
pub const CHAN_NR_RACH: u8 = 0x88;
pub const CHAN_NR_PCH_AGCH: u8 = 0x90;
/// Vendor extension addressing a PDCH on a dynamic timeslot
pub const CHAN_NR_OSMO_PDCH: u8 = 0xc0;

/// SACCH bit pattern in the link identifier
pub const LINK_ID_SACCH: u8 = 0x40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanKind {
    /// Bm + ACCHs, full rate traffic channel
    TchF,
    /// Lm + ACCHs, half rate traffic channel, subslot 0..1
    TchH,
    /// SDCCH/4 + ACCH, subslot 0..3
    Sdcch4,
    /// SDCCH/8 + ACCH, subslot 0..7
    Sdcch8,
    Bcch,
    Rach,
    PchAgch,
    OsmoPdch,
}

impl ChanKind {
    /// Number of subslots multiplexed on one timeslot, 0 if not sub-multiplexed
    pub fn num_subslots(self) -> u8 {
        match self {
            ChanKind::TchH => 2,
            ChanKind::Sdcch4 => 4,
            ChanKind::Sdcch8 => 8,
            _ => 0,
        }
    }

    /// Base C-bits pattern, already shifted into place
    fn base(self) -> u8 {
        match self {
            ChanKind::TchF => CHAN_NR_BM_ACCHS,
            ChanKind::TchH => CHAN_NR_LM_ACCHS,
            ChanKind::Sdcch4 => CHAN_NR_SDCCH4_ACCH,
            ChanKind::Sdcch8 => CHAN_NR_SDCCH8_ACCH,
            ChanKind::Bcch => CHAN_NR_BCCH,
            ChanKind::Rach => CHAN_NR_RACH,
            ChanKind::PchAgch => CHAN_NR_PCH_AGCH,
            ChanKind::OsmoPdch => CHAN_NR_OSMO_PDCH,
        }
    }

    /// Common channels (and the PDCH extension) have the C5 bit set
    pub fn is_common(self) -> bool {
        self.base() & CHAN_NR_C5 != 0
    }

    pub fn is_traffic(self) -> bool {
        matches!(self, ChanKind::TchF | ChanKind::TchH)
    }
}

impl fmt::Display for ChanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChanKind::TchF => "TCH/F",
            ChanKind::TchH => "TCH/H",
            ChanKind::Sdcch4 => "SDCCH/4",
            ChanKind::Sdcch8 => "SDCCH/8",
            ChanKind::Bcch => "BCCH",
            ChanKind::Rach => "RACH",
            ChanKind::PchAgch => "PCH/AGCH",
            ChanKind::OsmoPdch => "PDCH",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChanNrError {
    #[error("malformed chan_nr 0x{0:02x}")]
    Malformed(u8),
    #[error("timeslot {0} out of range")]
    Timeslot(u8),
    #[error("subslot {ss:?} not valid for {kind}")]
    Subslot { kind: ChanKind, ss: Option<u8> },
}

/// Decoded channel number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChanAddr {
    pub kind: ChanKind,
    pub tn: u8,
    /// Present only for sub-multiplexed kinds
    pub ss: Option<u8>,
}

impl ChanAddr {
    pub fn new(kind: ChanKind, tn: u8, ss: Option<u8>) -> Self {
        ChanAddr { kind, tn, ss }
    }

    /// Index of the addressed lchan within its timeslot
    pub fn lchan_idx(&self) -> usize {
        self.ss.unwrap_or(0) as usize
    }

    pub fn encode(&self) -> Result<u8, ChanNrError> {
        encode(*self)
    }
}

impl fmt::Display for ChanAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ss {
            Some(ss) => write!(f, "{} ts={} ss={}", self.kind, self.tn, ss),
            None => write!(f, "{} ts={}", self.kind, self.tn),
        }
    }
}

/// Decodes a channel number byte. Total over all 256 values: every byte either
/// maps to a kind or is rejected as malformed.
pub fn decode(chan_nr: u8) -> Result<ChanAddr, ChanNrError> {
    let tn = chan_nr & 0x07;
    let cbits = chan_nr >> 3;

    let (kind, ss) = match cbits {
        0b00001 => (ChanKind::TchF, None),
        0b00010..=0b00011 => (ChanKind::TchH, Some(cbits & 0x01)),
        0b00100..=0b00111 => (ChanKind::Sdcch4, Some(cbits & 0x03)),
        0b01000..=0b01111 => (ChanKind::Sdcch8, Some(cbits & 0x07)),
        0b10000 => (ChanKind::Bcch, None),
        0b10001 => (ChanKind::Rach, None),
        0b10010 => (ChanKind::PchAgch, None),
        0b11000 => (ChanKind::OsmoPdch, None),
        _ => return Err(ChanNrError::Malformed(chan_nr)),
    };
    Ok(ChanAddr { kind, tn, ss })
}

pub fn encode(addr: ChanAddr) -> Result<u8, ChanNrError> {
    if addr.tn > 7 {
        return Err(ChanNrError::Timeslot(addr.tn));
    }
    let num_ss = addr.kind.num_subslots();
    let ss_bits = match (num_ss, addr.ss) {
        (0, None) => 0,
        (n, Some(ss)) if n > 0 && ss < n => ss << 3,
        _ => return Err(ChanNrError::Subslot { kind: addr.kind, ss: addr.ss }),
    };
    Ok(addr.kind.base() | ss_bits | addr.tn)
}

#[inline]
pub fn chan_nr_tn(chan_nr: u8) -> u8 {
    chan_nr & 0x07
}

#[inline]
pub fn is_link_sacch(link_id: u8) -> bool {
    link_id & 0xc0 == LINK_ID_SACCH
}

/// Replaces the PDCH extension C-bits by plain TCH/F C-bits, leaving other values untouched
pub fn osmo_pdch_to_tchf(chan_nr: u8) -> u8 {
    if chan_nr & CHAN_NR_MASK == CHAN_NR_OSMO_PDCH {
        CHAN_NR_BM_ACCHS | (chan_nr & !CHAN_NR_MASK)
    } else {
        chan_nr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_known_values() {
        assert_eq!(decode(0x0a).unwrap(), ChanAddr::new(ChanKind::TchF, 2, None));
        assert_eq!(decode(0x1b).unwrap(), ChanAddr::new(ChanKind::TchH, 3, Some(1)));
        assert_eq!(decode(0x30).unwrap(), ChanAddr::new(ChanKind::Sdcch4, 0, Some(2)));
        assert_eq!(decode(0x79).unwrap(), ChanAddr::new(ChanKind::Sdcch8, 1, Some(7)));
        assert_eq!(decode(0x80).unwrap(), ChanAddr::new(ChanKind::Bcch, 0, None));
        assert_eq!(decode(0x88).unwrap(), ChanAddr::new(ChanKind::Rach, 0, None));
        assert_eq!(decode(0x90).unwrap(), ChanAddr::new(ChanKind::PchAgch, 0, None));
        assert_eq!(decode(0xc6).unwrap(), ChanAddr::new(ChanKind::OsmoPdch, 6, None));
    }

    #[test]
    fn test_reject_reserved_cbits() {
        for chan_nr in [0x00u8, 0x07, 0x98, 0xa0, 0xb8, 0xc8, 0xf8, 0xff] {
            assert_eq!(decode(chan_nr), Err(ChanNrError::Malformed(chan_nr)));
        }
    }

    #[test]
    fn test_c5_bit_only_for_common_channels() {
        for chan_nr in 0..=255u8 {
            if let Ok(addr) = decode(chan_nr) {
                assert_eq!(addr.kind.is_common(), chan_nr & CHAN_NR_C5 != 0, "chan_nr 0x{:02x}", chan_nr);
            }
        }
    }

    #[test]
    fn test_encode_rejects_bad_subslot() {
        assert!(encode(ChanAddr::new(ChanKind::TchH, 0, Some(2))).is_err());
        assert!(encode(ChanAddr::new(ChanKind::TchF, 0, Some(0))).is_err());
        assert!(encode(ChanAddr::new(ChanKind::Sdcch4, 0, None)).is_err());
        assert!(encode(ChanAddr::new(ChanKind::Bcch, 8, None)).is_err());
    }

    #[test]
    fn test_link_id_and_pdch_rewrite() {
        assert!(is_link_sacch(0x40));
        assert!(!is_link_sacch(0x00));
        assert!(!is_link_sacch(0xc0));
        assert_eq!(osmo_pdch_to_tchf(0xc3), 0x0b);
        assert_eq!(osmo_pdch_to_tchf(0x23), 0x23);
    }

    proptest! {
        #[test]
        fn prop_decode_total_and_reencodes(chan_nr in any::<u8>()) {
            match decode(chan_nr) {
                Ok(addr) => {
                    prop_assert_eq!(addr.tn, chan_nr & 7);
                    prop_assert_eq!(addr.ss.is_some(), addr.kind.num_subslots() > 0);
                    let reencoded = encode(addr).unwrap();
                    prop_assert_eq!(decode(reencoded).unwrap(), addr);
                    prop_assert_eq!(reencoded, chan_nr);
                }
                Err(e) => prop_assert_eq!(e, ChanNrError::Malformed(chan_nr)),
            }
            // Deterministic
            prop_assert_eq!(decode(chan_nr), decode(chan_nr));
        }
    }
}
