//! In-process PHY without a radio
//!
//! Confirms every channel control request immediately and produces a fixed,
//! coarse RTS schedule from a local frame counter. The schedule only makes
//! sure every configured channel kind gets polled; it is not the TS 45.002
//! multiframe mapping.

use std::collections::VecDeque;

use gsm_config::BtsConfig;
use gsm_core::gsm_time::{GSM_CCH_MF, GSM_TCH_MF, fn2ccch_block};
use gsm_core::{NUM_TS, PchanKind, chan_nr};
use gsm_saps::L1sapPrim;
use gsm_saps::mph::{ActCnf, CiphCnf, MphInfo, TimeInd};
use gsm_saps::ph::{PhRtsParam, TchRtsParam};

use super::{PhyLink, PhyLinkError, PhyLinkState};

/// Frames of the 26-multiframe starting a TCH/F block
const TCH_BLOCK_START: [u32; 6] = [0, 4, 8, 13, 17, 21];
/// Frame of the 26-multiframe carrying the SACCH/T
const TCH_SACCH_FN: u32 = 12;
/// Frame of the 51-multiframe starting the BCCH norm block
const BCCH_FN: u32 = 2;

#[derive(Debug, Default)]
pub struct VirtualPhy {
    /// Timeslot configuration per carrier
    timeslots: Vec<[PchanKind; NUM_TS]>,
    /// Confirms and indications waiting to be sent up, with their carrier
    pending_up: VecDeque<(u8, L1sapPrim)>,
    /// Downlink data and voice requests seen so far
    pub num_tx: u64,
    pub num_disconnects: u64,
}

impl VirtualPhy {
    pub fn new(cfg: &BtsConfig) -> Self {
        VirtualPhy {
            timeslots: cfg.trx.iter().map(|trx| trx.timeslots).collect(),
            ..Default::default()
        }
    }

    /// Drains the primitives produced in response to downward requests
    pub fn take_pending_up(&mut self) -> Vec<(u8, L1sapPrim)> {
        self.pending_up.drain(..).collect()
    }

    /// Upward primitives for frame `fn_nr`: the time indication on carrier
    /// 0, then the RTS indications of all carriers
    pub fn frame_indications(&self, fn_nr: u32) -> Vec<(u8, L1sapPrim)> {
        let mut out = vec![(0, L1sapPrim::MphInfoInd(MphInfo::Time(TimeInd { fn_nr })))];
        for (trx, timeslots) in self.timeslots.iter().enumerate() {
            for (tn, pchan) in timeslots.iter().enumerate() {
                Self::ts_rts(&mut out, trx as u8, tn as u8, *pchan, fn_nr);
            }
        }
        out
    }

    fn ts_rts(out: &mut Vec<(u8, L1sapPrim)>, trx: u8, tn: u8, pchan: PchanKind, fn_nr: u32) {
        let ph_rts = |chan_nr: u8, link_id: u8| L1sapPrim::PhRtsInd(PhRtsParam { chan_nr, link_id, fn_nr });
        let fn51 = fn_nr % GSM_CCH_MF;
        let fn26 = fn_nr % GSM_TCH_MF;

        match pchan {
            PchanKind::Ccch | PchanKind::CcchSdcch4 => {
                if fn51 == BCCH_FN {
                    out.push((trx, ph_rts(chan_nr::CHAN_NR_BCCH | tn, 0)));
                } else if fn2ccch_block(fn_nr).is_some() && fn2ccch_block(fn_nr.wrapping_sub(1)) != fn2ccch_block(fn_nr) {
                    out.push((trx, ph_rts(chan_nr::CHAN_NR_PCH_AGCH | tn, 0)));
                }
                if pchan == PchanKind::CcchSdcch4 && fn51 == 0 {
                    for ss in 0..4u8 {
                        out.push((trx, ph_rts(chan_nr::CHAN_NR_SDCCH4_ACCH | ss << 3 | tn, 0)));
                    }
                }
            }
            PchanKind::Sdcch8 => {
                if fn51 == 0 {
                    for ss in 0..8u8 {
                        out.push((trx, ph_rts(chan_nr::CHAN_NR_SDCCH8_ACCH | ss << 3 | tn, 0)));
                    }
                }
            }
            PchanKind::TchF | PchanKind::TchFPdch | PchanKind::TchFTchHPdch => {
                let chan_nr = chan_nr::CHAN_NR_BM_ACCHS | tn;
                if TCH_BLOCK_START.contains(&fn26) {
                    out.push((trx, ph_rts(chan_nr, 0)));
                    out.push((trx, L1sapPrim::TchRtsInd(TchRtsParam { chan_nr, fn_nr })));
                } else if fn26 == TCH_SACCH_FN {
                    out.push((trx, ph_rts(chan_nr, chan_nr::LINK_ID_SACCH)));
                }
            }
            PchanKind::TchH => {
                if TCH_BLOCK_START.contains(&fn26) {
                    let ss = (fn26 & 1) as u8;
                    let chan_nr = chan_nr::CHAN_NR_LM_ACCHS | ss << 3 | tn;
                    out.push((trx, ph_rts(chan_nr, 0)));
                    out.push((trx, L1sapPrim::TchRtsInd(TchRtsParam { chan_nr, fn_nr })));
                }
            }
            PchanKind::Pdch => {
                if fn_nr % 4 == 0 {
                    out.push((trx, ph_rts(chan_nr::CHAN_NR_OSMO_PDCH | tn, 0)));
                }
            }
            PchanKind::None => {}
        }
    }
}

impl PhyLink for VirtualPhy {
    fn state(&self) -> PhyLinkState {
        PhyLinkState::Connected
    }

    fn l1sap_down(&mut self, trx: u8, prim: L1sapPrim) -> Result<(), PhyLinkError> {
        if trx as usize >= self.timeslots.len() {
            return Err(PhyLinkError::NotConnected);
        }
        match prim {
            L1sapPrim::PhDataReq(_) | L1sapPrim::TchReq(_) => {
                self.num_tx += 1;
            }
            L1sapPrim::MphInfoReq(MphInfo::ActivateReq(req)) => {
                let cnf = ActCnf { chan_nr: req.chan_nr, cause: 0 };
                self.pending_up.push_back((trx, L1sapPrim::MphInfoCnf(MphInfo::ActivateCnf(cnf))));
            }
            L1sapPrim::MphInfoReq(MphInfo::DeactivateReq(req)) => {
                let cnf = ActCnf { chan_nr: req.chan_nr, cause: 0 };
                self.pending_up.push_back((trx, L1sapPrim::MphInfoCnf(MphInfo::DeactivateCnf(cnf))));
            }
            L1sapPrim::MphInfoReq(MphInfo::CiphReq(req)) => {
                let cnf = CiphCnf { chan_nr: req.chan_nr, downlink: req.downlink, uplink: req.uplink, cause: 0 };
                self.pending_up.push_back((trx, L1sapPrim::MphInfoCnf(MphInfo::CiphCnf(cnf))));
            }
            L1sapPrim::MphInfoReq(MphInfo::ModifyReq(req)) => {
                gsm_core::unimplemented_log!("virtual phy trx={} mode modify chan_nr=0x{:02x}", trx, req.chan_nr);
            }
            other => return Err(PhyLinkError::Unsupported(other.to_string())),
        }
        Ok(())
    }

    fn ts_disconnect(&mut self, trx: u8, tn: u8) -> Result<(), PhyLinkError> {
        tracing::debug!("virtual phy trx={} ts={} disconnect", trx, tn);
        self.num_disconnects += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsm_config::PhyBackend;
    use gsm_core::CcchConf;
    use gsm_saps::mph::ActReq;

    fn phy() -> VirtualPhy {
        let mut cfg = BtsConfig::default();
        cfg.phy_link.backend = PhyBackend::Virtual;
        cfg.bts.ccch_conf = CcchConf::OneCombined;
        VirtualPhy::new(&cfg)
    }

    #[test]
    fn test_confirms_activation() {
        let mut phy = phy();
        let req = MphInfo::ActivateReq(ActReq { chan_nr: 0x09, sacch_only: false });
        phy.l1sap_down(0, L1sapPrim::MphInfoReq(req)).unwrap();
        let up = phy.take_pending_up();
        assert_eq!(up, vec![(0, L1sapPrim::MphInfoCnf(MphInfo::ActivateCnf(ActCnf { chan_nr: 0x09, cause: 0 })))]);
        assert!(phy.take_pending_up().is_empty());

        // Upward primitives are refused
        let time = L1sapPrim::MphInfoInd(MphInfo::Time(TimeInd { fn_nr: 0 }));
        assert!(matches!(phy.l1sap_down(0, time), Err(PhyLinkError::Unsupported(_))));
        assert_eq!(phy.l1sap_down(3, L1sapPrim::TchReq(Default::default())), Err(PhyLinkError::NotConnected));
    }

    #[test]
    fn test_schedule_polls_all_kinds() {
        let phy = phy();
        let mut chan_nrs = std::collections::HashSet::new();
        for fn_nr in 0..(51 * 26) {
            for (_, prim) in phy.frame_indications(fn_nr) {
                if let L1sapPrim::PhRtsInd(rts) = prim {
                    chan_nrs.insert((rts.chan_nr, rts.link_id));
                }
            }
        }
        assert!(chan_nrs.contains(&(0x80, 0)));
        assert!(chan_nrs.contains(&(0x90, 0)));
        assert!(chan_nrs.contains(&(0x38, 0)));
        assert!(chan_nrs.contains(&(0x09, 0)));
        assert!(chan_nrs.contains(&(0x0f, 0x40)));
    }

    #[test]
    fn test_time_ind_leads() {
        let phy = phy();
        let ind = phy.frame_indications(2);
        assert_eq!(ind[0], (0, L1sapPrim::MphInfoInd(MphInfo::Time(TimeInd { fn_nr: 2 }))));
        assert_eq!(ind[1], (0, L1sapPrim::PhRtsInd(PhRtsParam { chan_nr: 0x80, link_id: 0, fn_nr: 2 })));
    }
}
