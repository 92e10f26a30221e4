//! Uplink measurement bookkeeping

use gsm_saps::mph::MeasInd;

use crate::bts::Lchan;
use crate::bts::lchan::{LC_UL_M_F_L1_VALID, UlMeas};

/// Bias applied to timing offsets before they go into RSL (TS 48.058 9.3.37)
pub const TOFFS_BIAS: i32 = 63;

/// Stores a timing offset in symbols, either as the MS timing offset or as
/// the access burst offset. Values the RSL field cannot carry are rejected
/// and leave the lchan untouched.
pub fn set_ms_to_data(lchan: &mut Lchan, data: i32, set_ms_to: bool) -> bool {
    let biased = data + TOFFS_BIAS;
    let Ok(biased) = u8::try_from(biased) else {
        tracing::error!(
            "{} attempting to set invalid timing offset {} (MS TO = {})",
            lchan.id, data, set_ms_to
        );
        return false;
    };

    if set_ms_to {
        lchan.meas.ms_t_offs = Some(biased);
        lchan.meas.p_offs = None;
    } else {
        lchan.meas.p_offs = Some(biased);
        lchan.meas.ms_t_offs = None;
    }
    true
}

/// Folds one per-burst measurement into the lchan
pub fn apply_meas_ind(lchan: &mut Lchan, ind: &MeasInd) {
    lchan.meas.push_ul(UlMeas {
        ta_offs_qbits: ind.ta_offs_qbits,
        ber10k: ind.ber10k,
        inv_rssi: ind.inv_rssi,
    });
    set_ms_to_data(lchan, ind.ta_offs_qbits as i32 / 4, true);
}

/// Captures the two octet SACCH L1 header of an uplink frame. Returns the
/// MS power level it reports.
pub fn store_sacch_l1_header(lchan: &mut Lchan, data: &[u8]) -> Option<u8> {
    let (&b0, &b1) = (data.first()?, data.get(1)?);
    // MS power level and FPC bit, rearranged into RSL order
    lchan.meas.l1_info[0] = b0 << 3 | ((b0 >> 5) & 0x01) << 2;
    lchan.meas.l1_info[1] = b1;
    lchan.meas.flags |= LC_UL_M_F_L1_VALID;
    Some(b0 & 0x1f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsm_core::LchanId;
    use crate::bts::LchanType;

    fn lchan() -> Lchan {
        Lchan::new(LchanId::new(0, 2, 0), LchanType::TchF)
    }

    #[test]
    fn test_timing_offsets_exclusive() {
        let mut lchan = lchan();
        assert!(set_ms_to_data(&mut lchan, 5, false));
        assert_eq!((lchan.meas.p_offs, lchan.meas.ms_t_offs), (Some(68), None));
        assert!(set_ms_to_data(&mut lchan, -3, true));
        assert_eq!((lchan.meas.p_offs, lchan.meas.ms_t_offs), (None, Some(60)));
    }

    #[test]
    fn test_timing_offset_range() {
        let mut lchan = lchan();
        assert!(set_ms_to_data(&mut lchan, 192, true));
        assert_eq!(lchan.meas.ms_t_offs, Some(255));
        // Rejected, previous value kept
        assert!(!set_ms_to_data(&mut lchan, 193, false));
        assert!(!set_ms_to_data(&mut lchan, -64, false));
        assert_eq!((lchan.meas.p_offs, lchan.meas.ms_t_offs), (None, Some(255)));
    }

    #[test]
    fn test_meas_ind() {
        let mut lchan = lchan();
        let ind = MeasInd { chan_nr: 0x0a, fn_nr: 100, ta_offs_qbits: 10, ber10k: 20, inv_rssi: 70 };
        apply_meas_ind(&mut lchan, &ind);
        assert_eq!(lchan.meas.ul_res.len(), 1);
        assert_eq!(lchan.meas.ul_res[0], UlMeas { ta_offs_qbits: 10, ber10k: 20, inv_rssi: 70 });
        assert_eq!(lchan.meas.ms_t_offs, Some(65));
    }

    #[test]
    fn test_sacch_l1_header() {
        let mut lchan = lchan();
        assert_eq!(store_sacch_l1_header(&mut lchan, &[0x05]), None);
        assert!(!lchan.meas.l1_valid());

        // Power level 5 with FPC set, TA 3
        assert_eq!(store_sacch_l1_header(&mut lchan, &[0x25, 0x03, 0x01]), Some(0x05));
        assert_eq!(lchan.meas.l1_info, [0x2c, 0x03]);
        assert!(lchan.meas.l1_valid());
    }
}
