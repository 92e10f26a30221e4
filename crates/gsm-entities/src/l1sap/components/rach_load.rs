use gsm_core::CcchConf;
use gsm_core::gsm_time::GSM_CCH_MF;

/// Access bursts fit into one burst period, four RACH slots per frame
const RACH_SLOTS_PER_FRAME: u64 = 4;

/// Signal level at or above which a RACH slot counts as busy
const RACH_BUSY_THRESH_DBM: i8 = -90;

pub fn is_busy(rssi: i8) -> bool {
    rssi >= RACH_BUSY_THRESH_DBM
}

/// RACH slots expiring with frame `fn_nr` (TS 44.018 10.5.2.11, table 10.5.2.11.1)
pub fn expired_rach_slots(ccch_conf: CcchConf, fn_nr: u32) -> u64 {
    let frames = match ccch_conf {
        // The CCCH shares its 51-multiframe with SDCCH/4, only some frames carry RACH
        CcchConf::OneCombined => match fn_nr % GSM_CCH_MF {
            4 | 5 | 15..=36 | 45 | 46 => 1,
            _ => 0,
        },
        CcchConf::Two => 2,
        CcchConf::Three => 3,
        CcchConf::Four => 4,
        CcchConf::One => 1,
    };
    frames * RACH_SLOTS_PER_FRAME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_ccch() {
        let slots: u64 = (0..51).map(|fn_nr| expired_rach_slots(CcchConf::OneCombined, fn_nr)).sum();
        // 2 + 22 + 2 RACH frames per 51-multiframe
        assert_eq!(slots, 26 * 4);
        assert_eq!(expired_rach_slots(CcchConf::OneCombined, 51 + 4), 4);
        assert_eq!(expired_rach_slots(CcchConf::OneCombined, 14), 0);
    }

    #[test]
    fn test_non_combined() {
        assert_eq!(expired_rach_slots(CcchConf::One, 14), 4);
        assert_eq!(expired_rach_slots(CcchConf::Two, 14), 8);
        assert_eq!(expired_rach_slots(CcchConf::Three, 0), 12);
        assert_eq!(expired_rach_slots(CcchConf::Four, 50), 16);
    }

    #[test]
    fn test_busy_threshold() {
        assert!(is_busy(-90));
        assert!(is_busy(-40));
        assert!(!is_busy(-91));
    }
}
