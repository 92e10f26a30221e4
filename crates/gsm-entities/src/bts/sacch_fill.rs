use gsm_core::GSM_MACBLOCK_LEN;

/// System information types, in the order the SACCH filling rotation visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SysinfoType {
    None = 0,
    Si1,
    Si2,
    Si3,
    Si4,
    Si5,
    Si6,
    Si7,
    Si8,
    Si9,
    Si13,
    Si16,
    Si17,
    Si18,
    Si19,
    Si20,
    Si2bis,
    Si2ter,
    Si2quater,
    Si5bis,
    Si5ter,
    Emo,
    MeasInfo,
}

pub const SYSINFO_TYPE_COUNT: usize = 23;

impl SysinfoType {
    pub fn idx(self) -> usize {
        self as usize
    }
}

/// Per-lchan SACCH filling: the system information blocks RSL installed for
/// this channel, and the last one sent
#[derive(Debug, Clone)]
pub struct SacchFill {
    /// Bit n set when type n has a buffer
    valid: u32,
    bufs: [[u8; GSM_MACBLOCK_LEN]; SYSINFO_TYPE_COUNT],
    last: usize,
}

impl Default for SacchFill {
    fn default() -> Self {
        SacchFill { valid: 0, bufs: [[0; GSM_MACBLOCK_LEN]; SYSINFO_TYPE_COUNT], last: 0 }
    }
}

impl SacchFill {
    /// Installs a filling block. Shorter input is padded with the MAC block padding octet.
    pub fn set(&mut self, si: SysinfoType, data: &[u8]) {
        let buf = &mut self.bufs[si.idx()];
        buf.fill(gsm_core::GSM_MACBLOCK_PADDING);
        let len = data.len().min(GSM_MACBLOCK_LEN);
        buf[..len].copy_from_slice(&data[..len]);
        self.valid |= 1 << si.idx();
    }

    pub fn clear(&mut self, si: SysinfoType) {
        self.valid &= !(1 << si.idx());
    }

    pub fn is_valid(&self, si: SysinfoType) -> bool {
        self.valid & (1 << si.idx()) != 0
    }

    pub fn last_sent(&self) -> usize {
        self.last
    }

    /// Next valid block after the last one sent, wrapping around. None if no
    /// type is valid.
    pub fn next(&mut self) -> Option<&[u8; GSM_MACBLOCK_LEN]> {
        for i in 0..SYSINFO_TYPE_COUNT {
            let tmp = (self.last + 1 + i) % SYSINFO_TYPE_COUNT;
            if self.valid & (1 << tmp) != 0 {
                self.last = tmp;
                return Some(&self.bufs[tmp]);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_yields_none() {
        let mut fill = SacchFill::default();
        assert!(fill.next().is_none());
    }

    #[test]
    fn test_rotation_starts_after_last_sent() {
        let mut fill = SacchFill::default();
        fill.set(SysinfoType::Si5, &[0x05]);
        fill.set(SysinfoType::Si6, &[0x06]);
        fill.set(SysinfoType::Si5ter, &[0x5c]);

        assert_eq!(fill.next().map(|b| b[0]), Some(0x05));
        assert_eq!(fill.next().map(|b| b[0]), Some(0x06));
        assert_eq!(fill.next().map(|b| b[0]), Some(0x5c));
        assert_eq!(fill.last_sent(), SysinfoType::Si5ter.idx());
        // Wraps around
        assert_eq!(fill.next().map(|b| b[0]), Some(0x05));

        fill.clear(SysinfoType::Si6);
        assert_eq!(fill.next().map(|b| b[0]), Some(0x5c));
    }

    #[test]
    fn test_short_block_padded() {
        let mut fill = SacchFill::default();
        fill.set(SysinfoType::Si5, &[0x49, 0x06]);
        let blk = fill.next().unwrap();
        assert_eq!(&blk[..3], &[0x49, 0x06, 0x2b]);
    }
}
