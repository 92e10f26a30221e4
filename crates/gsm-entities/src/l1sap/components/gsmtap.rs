//! Classification of PH-SAP frames into GSMTAP records

use gsm_core::gsm_time::{fn2ccch_block, fn2ptcchblock, is_ptcch};
use gsm_core::{ChanKind, chan_nr};
use gsm_pdus::gsmtap::{GSMTAP_ARFCN_F_UPLINK, GSMTAP_CHANNEL_ACCH, GsmtapChannel, sapi_mask_bit};
use gsm_saps::ph::{PhDataParam, PhRachParam};

use crate::gsmtap::GsmtapRecord;

/// PTCCH/U indication carrying an access burst rather than a block
const PTCCH_UL_ACCESS_BURST: u8 = 7;

/// Category and subslot of a frame on a timeslot in circuit switched mode
pub fn classify_ph_data(chan_nr: u8, link_id: u8, fn_nr: u32, num_agch: u8) -> (u8, u8) {
    let (chan_type, ss) = match chan_nr::decode(chan_nr) {
        Ok(addr) => match addr.kind {
            ChanKind::TchF => (GsmtapChannel::TchF, 0),
            ChanKind::TchH => (GsmtapChannel::TchH, addr.ss.unwrap_or(0)),
            ChanKind::Sdcch4 | ChanKind::Sdcch8 => (GsmtapChannel::Sdcch, addr.ss.unwrap_or(0)),
            ChanKind::Bcch => (GsmtapChannel::Bcch, 0),
            ChanKind::PchAgch => {
                // Split by configuration, not by what SI3 announces
                match fn2ccch_block(fn_nr) {
                    Some(block) if block < num_agch => (GsmtapChannel::Agch, 0),
                    _ => (GsmtapChannel::Pch, 0),
                }
            }
            ChanKind::Rach | ChanKind::OsmoPdch => (GsmtapChannel::Unknown, 0),
        },
        Err(_) => (GsmtapChannel::Unknown, 0),
    };

    let mut chan_type = chan_type.into_raw();
    if chan_nr::is_link_sacch(link_id) {
        chan_type |= GSMTAP_CHANNEL_ACCH;
    }
    (chan_type, ss)
}

/// Record for a PH-DATA request or indication. None if nothing is to be
/// captured.
pub fn ph_data_record(
    data: &PhDataParam,
    arfcn: u16,
    is_pdch: bool,
    num_agch: u8,
    uplink: bool,
) -> Option<GsmtapRecord> {
    let tn = chan_nr::chan_nr_tn(data.chan_nr);
    let mut payload = data.msg.data();

    let (chan_type, ss) = if is_pdch {
        if is_ptcch(data.fn_nr) {
            if uplink {
                if payload.first() == Some(&PTCCH_UL_ACCESS_BURST) {
                    return None;
                }
                payload = payload.get(1..).unwrap_or(&[]);
            }
            (GsmtapChannel::Ptcch.into_raw(), fn2ptcchblock(data.fn_nr))
        } else {
            (GsmtapChannel::Pacch.into_raw(), 0)
        }
    } else {
        classify_ph_data(data.chan_nr, data.link_id, data.fn_nr, num_agch)
    };

    if payload.is_empty() {
        return None;
    }

    Some(GsmtapRecord {
        arfcn: if uplink { arfcn | GSMTAP_ARFCN_F_UPLINK } else { arfcn },
        tn,
        chan_type,
        ss,
        fn_nr: data.fn_nr,
        signal_dbm: 0,
        snr_db: 0,
        payload: payload.to_vec(),
    })
}

/// Record for an access burst, the payload is the RA code
pub fn ph_rach_record(ind: &PhRachParam, arfcn: u16) -> GsmtapRecord {
    let ss = match chan_nr::decode(ind.chan_nr) {
        Ok(addr) => addr.ss.unwrap_or(0),
        Err(_) => 0,
    };
    GsmtapRecord {
        arfcn: arfcn | GSMTAP_ARFCN_F_UPLINK,
        tn: chan_nr::chan_nr_tn(ind.chan_nr),
        chan_type: GsmtapChannel::Rach.into_raw(),
        ss,
        fn_nr: ind.fn_nr,
        signal_dbm: 0,
        snr_db: 0,
        payload: vec![ind.ra as u8],
    }
}

/// Capture filter
pub fn passes_filter(chan_type: u8, sapi_mask: u32, sapi_acch: bool) -> bool {
    if chan_type & GSMTAP_CHANNEL_ACCH != 0 {
        sapi_acch
    } else {
        sapi_mask & sapi_mask_bit(chan_type) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsm_core::Msgb;

    fn data(chan_nr: u8, link_id: u8, fn_nr: u32, payload: &[u8]) -> PhDataParam {
        PhDataParam::req(chan_nr, link_id, fn_nr, Msgb::from_l2(payload.to_vec()))
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify_ph_data(0x0a, 0, 0, 1), (9, 0));
        assert_eq!(classify_ph_data(0x1b, 0, 0, 1), (10, 1));
        assert_eq!(classify_ph_data(0x30, 0x40, 0, 1), (6 | 0x80, 2));
        assert_eq!(classify_ph_data(0x79, 0, 0, 1), (6, 7));
        assert_eq!(classify_ph_data(0x80, 0, 2, 1), (1, 0));
        // CCCH block 0 is AGCH with one reserved block, block 1 is PCH
        assert_eq!(classify_ph_data(0x90, 0, 6, 1), (4, 0));
        assert_eq!(classify_ph_data(0x90, 0, 12, 1), (5, 0));
        assert_eq!(classify_ph_data(0x90, 0, 12, 0), (5, 0));
    }

    #[test]
    fn test_pdch_records() {
        // PTCCH indication, first byte stripped
        let rec = ph_data_record(&data(0x0f, 0, 12, &[0x01, 0xaa]), 871, true, 1, true).unwrap();
        assert_eq!((rec.chan_type, rec.ss), (14, 0));
        assert_eq!(rec.payload, vec![0xaa]);
        assert_eq!(rec.arfcn, 871 | 0x4000);

        // Access burst on PTCCH/U is skipped
        assert!(ph_data_record(&data(0x0f, 0, 12, &[0x07, 0xaa]), 871, true, 1, true).is_none());

        // Downlink PTCCH keeps the payload, block nr from the 52-multiframe count
        let rec = ph_data_record(&data(0x0f, 0, 52 * 3 + 38, &[0x07, 0xaa]), 871, true, 1, false).unwrap();
        assert_eq!((rec.chan_type, rec.ss), (14, 3));
        assert_eq!(rec.payload.len(), 2);
        assert_eq!(rec.arfcn, 871);

        let rec = ph_data_record(&data(0x0f, 0, 13, &[0x01]), 871, true, 1, false).unwrap();
        assert_eq!(rec.chan_type, 11);
    }

    #[test]
    fn test_empty_never_recorded() {
        assert!(ph_data_record(&data(0x0a, 0, 0, &[]), 1, false, 1, false).is_none());
        // Stripping leaves nothing
        assert!(ph_data_record(&data(0x0f, 0, 12, &[0x01]), 1, true, 1, true).is_none());
    }

    #[test]
    fn test_rach_record() {
        let ind = PhRachParam {
            chan_nr: 0x88,
            ra: 0x23,
            acc_delay: 0,
            fn_nr: 42,
            is_11bit: false,
            burst_type: Default::default(),
            rssi: -60,
        };
        let rec = ph_rach_record(&ind, 10);
        assert_eq!(rec.chan_type, 3);
        assert_eq!(rec.payload, vec![0x23]);
        assert_eq!(rec.arfcn, 10 | 0x4000);
    }

    #[test]
    fn test_filter() {
        let mask = 1 << 1 | 1 << 6;
        assert!(passes_filter(1, mask, false));
        assert!(passes_filter(6, mask, false));
        assert!(!passes_filter(9, mask, false));
        assert!(!passes_filter(6 | 0x80, mask, false));
        assert!(passes_filter(9 | 0x80, 0, true));
    }
}
