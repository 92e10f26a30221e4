use gsm_core::{CCCH_LCHAN, LchanId, PchanKind};

use super::lchan::{Lchan, LchanType};

/// Dynamic TCH/F_PDCH: PDCH mode in use
pub const TS_F_PDCH_ACTIVE: u32 = 0x1000;
/// Dynamic TCH/F_PDCH: switch to PDCH requested, waiting for the PHY
pub const TS_F_PDCH_ACT_PENDING: u32 = 0x2000;
/// Dynamic TCH/F_PDCH: switch back to TCH/F requested, waiting for the PHY
pub const TS_F_PDCH_DEACT_PENDING: u32 = 0x4000;
pub const TS_F_PDCH_PENDING_MASK: u32 = TS_F_PDCH_ACT_PENDING | TS_F_PDCH_DEACT_PENDING;

#[derive(Debug, Clone)]
pub struct Timeslot {
    pub nr: u8,
    pub pchan: PchanKind,
    pub flags: u32,
    /// Mode currently in use on an Osmocom style dynamic timeslot
    pub dyn_pchan: PchanKind,
    pub lchans: Vec<Lchan>,
}

impl Timeslot {
    pub fn new(trx: u8, nr: u8, pchan: PchanKind) -> Self {
        let lchan_type = match pchan {
            PchanKind::CcchSdcch4 | PchanKind::Sdcch8 => LchanType::Sdcch,
            PchanKind::TchF | PchanKind::TchFPdch | PchanKind::TchFTchHPdch => LchanType::TchF,
            PchanKind::TchH => LchanType::TchH,
            PchanKind::Pdch => LchanType::Pdtch,
            PchanKind::Ccch | PchanKind::None => LchanType::None,
        };
        let mut lchans: Vec<Lchan> = (0..pchan.num_lchans())
            .map(|ss| Lchan::new(LchanId::new(trx, nr, ss as u8), lchan_type))
            .collect();

        // The CCCH lchan sits behind the dedicated ones at a fixed index
        if pchan.has_ccch() {
            while lchans.len() < CCCH_LCHAN {
                let ss = lchans.len() as u8;
                lchans.push(Lchan::new(LchanId::new(trx, nr, ss), LchanType::None));
            }
            lchans.push(Lchan::new(LchanId::new(trx, nr, CCCH_LCHAN as u8), LchanType::Ccch));
        }

        Timeslot { nr, pchan, flags: 0, dyn_pchan: PchanKind::None, lchans }
    }

    /// True if this timeslot currently carries packet data
    pub fn is_pdch(&self) -> bool {
        match self.pchan {
            PchanKind::Pdch => true,
            PchanKind::TchFPdch => {
                self.flags & TS_F_PDCH_ACTIVE != 0 && self.flags & TS_F_PDCH_DEACT_PENDING == 0
            }
            PchanKind::TchFTchHPdch => self.dyn_pchan == PchanKind::Pdch,
            _ => false,
        }
    }

    /// Starts switching a TCH/F_PDCH timeslot to PDCH mode. The activation
    /// confirm completes it.
    pub fn begin_pdch_act(&mut self) -> bool {
        if self.pchan != PchanKind::TchFPdch || self.flags & TS_F_PDCH_PENDING_MASK != 0 {
            return false;
        }
        self.flags |= TS_F_PDCH_ACT_PENDING;
        true
    }

    /// Starts switching a TCH/F_PDCH timeslot back to TCH/F. The deactivation
    /// confirm completes it.
    pub fn begin_pdch_deact(&mut self) -> bool {
        if self.pchan != PchanKind::TchFPdch
            || self.flags & TS_F_PDCH_PENDING_MASK != 0
            || self.flags & TS_F_PDCH_ACTIVE == 0
        {
            return false;
        }
        self.flags |= TS_F_PDCH_DEACT_PENDING;
        true
    }
}
