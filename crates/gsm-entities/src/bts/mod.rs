//! BTS data model: carriers, timeslots and logical channels
//!
//! The L1SAP is the only writer of the GSM time and of the per-lchan
//! protocol state held here. Everything is owned by value; lookups hand out
//! short-lived borrows that never outlive one primitive.

pub mod dl_queue;
pub mod lchan;
pub mod sacch_fill;
pub mod timeslot;

use gsm_config::BtsConfig;
use gsm_core::{CCCH_LCHAN, ChanKind, GsmTime, LchanId, NUM_TS, chan_nr};

pub use lchan::{CiphState, DtxHandle, HandoverState, Lchan, LchanState, LchanType, RslCmode};
pub use timeslot::Timeslot;

/// RACH load counters, in RACH slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RachLoad {
    /// Slots that expired since startup
    pub total: u64,
    /// Slots with energy detected
    pub busy: u64,
    /// Slots with a decoded access burst
    pub access: u64,
}

#[derive(Debug, Clone)]
pub struct Trx {
    pub nr: u8,
    pub arfcn: u16,
    pub ts: [Timeslot; NUM_TS],
}

impl Trx {
    /// Lchan addressed by a channel number, regardless of its state
    pub fn lchan_mut(&mut self, chan_nr: u8) -> Option<&mut Lchan> {
        let addr = chan_nr::decode(chan_nr).ok()?;
        let idx = match addr.kind {
            ChanKind::Bcch | ChanKind::Rach | ChanKind::PchAgch => CCCH_LCHAN,
            _ => addr.lchan_idx(),
        };
        self.ts[addr.tn as usize].lchans.get_mut(idx)
    }

    /// Lchan addressed by a channel number, only if it is active
    pub fn active_lchan_mut(&mut self, chan_nr: u8) -> Option<&mut Lchan> {
        self.lchan_mut(chan_nr).filter(|lchan| lchan.is_active())
    }
}

#[derive(Debug, Clone)]
pub struct Bts {
    pub bsic: u8,
    pub gsm_time: GsmTime,
    pub rach_load: RachLoad,
    /// Index 0 is the primary carrier
    pub trxs: Vec<Trx>,
}

impl Bts {
    pub fn from_config(cfg: &BtsConfig) -> Self {
        let trxs = cfg
            .trx
            .iter()
            .enumerate()
            .map(|(nr, trx_cfg)| {
                let nr = nr as u8;
                Trx {
                    nr,
                    arfcn: trx_cfg.arfcn,
                    ts: core::array::from_fn(|tn| Timeslot::new(nr, tn as u8, trx_cfg.timeslots[tn])),
                }
            })
            .collect();

        Bts {
            bsic: cfg.bts.bsic,
            gsm_time: GsmTime::default(),
            rach_load: RachLoad::default(),
            trxs,
        }
    }

    pub fn trx(&self, nr: u8) -> Option<&Trx> {
        self.trxs.get(nr as usize)
    }

    pub fn trx_mut(&mut self, nr: u8) -> Option<&mut Trx> {
        self.trxs.get_mut(nr as usize)
    }

    pub fn lchan(&self, id: LchanId) -> Option<&Lchan> {
        self.trx(id.trx)?.ts.get(id.tn as usize)?.lchans.get(id.ss as usize)
    }

    pub fn lchan_mut(&mut self, id: LchanId) -> Option<&mut Lchan> {
        self.trx_mut(id.trx)?.ts.get_mut(id.tn as usize)?.lchans.get_mut(id.ss as usize)
    }

    /// PDCH mode of all timeslots of a carrier
    pub fn pdch_map(&self, trx: u8) -> [bool; NUM_TS] {
        match self.trx(trx) {
            Some(trx) => core::array::from_fn(|tn| trx.ts[tn].is_pdch()),
            None => [false; NUM_TS],
        }
    }
}
