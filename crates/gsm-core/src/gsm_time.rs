use core::fmt;

/// Frames per 26-multiframe (traffic)
pub const GSM_TCH_MF: u32 = 26;
/// Frames per 51-multiframe (control)
pub const GSM_CCH_MF: u32 = 51;
/// Frames per 52-multiframe (packet data)
pub const GSM_PDCH_MF: u32 = 52;
/// Frame number value where it wraps back to 0
pub const GSM_HYPERFRAME: u32 = 2048 * GSM_TCH_MF * GSM_CCH_MF;

/// First frame of each CCCH block within the 51-multiframe (TS 45.002 clause 7, table 5)
const CCCH_BLOCK_START: [u32; 9] = [6, 12, 16, 22, 26, 32, 36, 42, 46];

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct GsmTime {
    /// Frame number, 0 to GSM_HYPERFRAME - 1
    pub fn_nr: u32,
    /// Superframe counter, fn / (26 * 51), 0 to 2047
    pub t1: u16,
    /// fn mod 26
    pub t2: u8,
    /// fn mod 51
    pub t3: u8,
    /// BCCH type counter, (fn / 51) mod 8
    pub tc: u8,
}

/// Difference a - b between two frame numbers, handling hyperframe wrap-around
pub fn fn_diff(a: u32, b: u32) -> i32 {
    let wrap = GSM_HYPERFRAME as i64;
    let mut diff = a as i64 - b as i64;
    while diff < -wrap / 2 { diff += wrap; }
    while diff >= wrap / 2 { diff -= wrap; }
    diff as i32
}

impl GsmTime {
    pub fn from_fn(fn_nr: u32) -> GsmTime {
        let fn_nr = fn_nr % GSM_HYPERFRAME;
        GsmTime {
            fn_nr,
            t1: (fn_nr / (GSM_TCH_MF * GSM_CCH_MF)) as u16,
            t2: (fn_nr % GSM_TCH_MF) as u8,
            t3: (fn_nr % GSM_CCH_MF) as u8,
            tc: ((fn_nr / GSM_CCH_MF) % 8) as u8,
        }
    }

    /// Reassembles the frame number from (T1, T2, T3), None if out of range
    pub fn from_t(t1: u16, t2: u8, t3: u8) -> Option<GsmTime> {
        if t1 >= 2048 || t2 as u32 >= GSM_TCH_MF || t3 as u32 >= GSM_CCH_MF {
            return None;
        }
        let t2 = t2 as i64;
        let t3 = t3 as i64;
        let fn_nr = 51 * (t3 - t2).rem_euclid(26) + t3 + 51 * 26 * t1 as i64;
        Some(GsmTime::from_fn(fn_nr as u32))
    }

    pub fn to_fn(self) -> u32 {
        self.fn_nr
    }

    /// Add a (possibly negative) number of frames
    pub fn add_frames(self, num_frames: i32) -> GsmTime {
        let fn_nr = (self.fn_nr as i64 + num_frames as i64).rem_euclid(GSM_HYPERFRAME as i64);
        GsmTime::from_fn(fn_nr as u32)
    }

    /// Difference between two times in frames
    pub fn diff(self, b: Self) -> i32 {
        fn_diff(self.fn_nr, b.fn_nr)
    }
}

impl fmt::Display for GsmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}/{:02}/{:02}/{:02}/{:02}", self.fn_nr, self.t1, self.t2, self.t3, self.fn_nr % GSM_PDCH_MF)
    }
}

impl fmt::Debug for GsmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// True if this frame of the 52-multiframe carries a PTCCH opportunity
#[inline]
pub fn is_ptcch(fn_nr: u32) -> bool {
    matches!(fn_nr % GSM_PDCH_MF, 12 | 38)
}

/// Radio block number (0..12) within the 52-multiframe
#[inline]
pub fn fn2macblock(fn_nr: u32) -> u8 {
    ((fn_nr % GSM_PDCH_MF) / 4) as u8
}

/// PTCCH block number (0..7) across eight consecutive 52-multiframes
#[inline]
pub fn fn2ptcchblock(fn_nr: u32) -> u8 {
    ((fn_nr / GSM_PDCH_MF) % 8) as u8
}

/// CCCH block index (0..8) of the 51-multiframe block containing this frame
pub fn fn2ccch_block(fn_nr: u32) -> Option<u8> {
    let bcch_fn = fn_nr % GSM_CCH_MF;
    CCCH_BLOCK_START
        .iter()
        .position(|&start| bcch_fn >= start && bcch_fn < start + 4)
        .map(|idx| idx as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn() {
        let t = GsmTime::from_fn(0);
        assert_eq!((t.t1, t.t2, t.t3, t.tc), (0, 0, 0, 0));

        let t = GsmTime::from_fn(1326 * 3 + 77);
        assert_eq!(t.t1, 3);
        assert_eq!(t.t2, (77 % 26) as u8);
        assert_eq!(t.t3, (77 % 51) as u8);
        assert_eq!(t.tc, 7);

        // Wraps at the hyperframe
        assert_eq!(GsmTime::from_fn(GSM_HYPERFRAME + 5), GsmTime::from_fn(5));
    }

    #[test]
    fn test_from_t_inverts_from_fn() {
        for fn_nr in [0, 1, 25, 26, 50, 51, 1325, 1326, 99_999, GSM_HYPERFRAME - 1] {
            let t = GsmTime::from_fn(fn_nr);
            assert_eq!(GsmTime::from_t(t.t1, t.t2, t.t3), Some(t), "fn {}", fn_nr);
        }
        assert_eq!(GsmTime::from_t(2048, 0, 0), None);
        assert_eq!(GsmTime::from_t(0, 26, 0), None);
    }

    #[test]
    fn test_add_frames_and_diff() {
        let mut time = GsmTime::default();
        let increment = 123_457;
        for _ in 0..100 {
            let time2 = time.add_frames(increment);
            assert_eq!(time2.diff(time), increment);
            assert_eq!(time.diff(time2), -increment);
            time = time2;
        }
        for _ in 0..100 {
            time = time.add_frames(-increment);
        }
        assert_eq!(time, GsmTime::default());
        assert_eq!(fn_diff(0, GSM_HYPERFRAME - 1), 1);
    }

    #[test]
    fn test_block_helpers() {
        assert!(is_ptcch(12));
        assert!(is_ptcch(52 + 38));
        assert!(!is_ptcch(13));
        assert_eq!(fn2macblock(0), 0);
        assert_eq!(fn2macblock(51), 12);
        assert_eq!(fn2ptcchblock(52 * 9 + 12), 1);

        assert_eq!(fn2ccch_block(6), Some(0));
        assert_eq!(fn2ccch_block(9), Some(0));
        assert_eq!(fn2ccch_block(12), Some(1));
        assert_eq!(fn2ccch_block(51 + 46), Some(8));
        assert_eq!(fn2ccch_block(2), None);
        assert_eq!(fn2ccch_block(10), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", GsmTime::from_fn(1327)), "001327/01/01/01/27");
    }
}
