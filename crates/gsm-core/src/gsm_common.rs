use core::fmt;

/// Length of one GSM MAC block (a burst quadruple worth of L2 data)
pub const GSM_MACBLOCK_LEN: usize = 23;
pub const GSM_MACBLOCK_PADDING: u8 = 0x2b;

/// Number of timeslots per TRX
pub const NUM_TS: usize = 8;

/// Index of the CCCH lchan on timeslot 0 of the primary carrier
pub const CCCH_LCHAN: usize = 4;

/// Duration of one RTP voice frame, in 8 kHz samples
pub const GSM_RTP_DURATION: u32 = 160;

/// Largest timing advance a MS can be told to apply
pub const MAX_TA_DEFAULT: u8 = 63;

/// LAPDm UI frame with empty payload, followed by padding
pub const FILL_FRAME: [u8; GSM_MACBLOCK_LEN] = [
    0x03, 0x03, 0x01,
    0x2b, 0x2b, 0x2b, 0x2b, 0x2b, 0x2b, 0x2b, 0x2b, 0x2b, 0x2b,
    0x2b, 0x2b, 0x2b, 0x2b, 0x2b, 0x2b, 0x2b, 0x2b, 0x2b, 0x2b,
];

/// Addresses one logical channel within the BTS
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LchanId {
    pub trx: u8,
    pub tn: u8,
    pub ss: u8,
}

impl LchanId {
    pub fn new(trx: u8, tn: u8, ss: u8) -> Self {
        LchanId { trx, tn, ss }
    }
}

impl fmt::Display for LchanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(trx={},ts={},ss={})", self.trx, self.tn, self.ss)
    }
}

impl fmt::Debug for LchanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Formats bytes as space separated hex, for log output
pub fn hexdump(data: &[u8]) -> String {
    let mut s = String::with_capacity(data.len() * 3);
    for (i, b) in data.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        s.push_str(&format!("{:02x}", b));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_frame_layout() {
        assert_eq!(FILL_FRAME.len(), GSM_MACBLOCK_LEN);
        assert_eq!(&FILL_FRAME[..3], &[0x03, 0x03, 0x01]);
        assert!(FILL_FRAME[3..].iter().all(|&b| b == GSM_MACBLOCK_PADDING));
    }

    #[test]
    fn test_hexdump() {
        assert_eq!(hexdump(&[0x03, 0xab, 0x00]), "03 ab 00");
        assert_eq!(hexdump(&[]), "");
    }
}
