//! Access burst routing

use gsm_core::{ChanKind, chan_nr};
use gsm_pdus::rach::{RachClass, classify};
use gsm_saps::pcu::PcuRachInd;
use gsm_saps::ph::PhRachParam;

/// Where an access burst goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RachRoute {
    /// Access delay beyond the configured maximum
    Discard,
    /// Received on a dedicated channel awaiting handover access
    Handover,
    /// Packet channel request on the primary carrier
    Pcu,
    /// Ordinary channel request for the CCCH
    Lapdm,
}

pub fn is_rach_chan(chan_nr: u8) -> bool {
    matches!(chan_nr::decode(chan_nr), Ok(addr) if addr.kind == ChanKind::Rach)
}

pub fn route(ind: &PhRachParam, trx: u8, max_ta: u8) -> RachRoute {
    if ind.acc_delay > max_ta {
        return RachRoute::Discard;
    }
    if !is_rach_chan(ind.chan_nr) {
        return RachRoute::Handover;
    }
    if trx == 0 && classify(ind.ra, ind.is_11bit) == RachClass::Packet {
        return RachRoute::Pcu;
    }
    RachRoute::Lapdm
}

/// PCU notification for a packet access, delay converted to quarter bits
pub fn pcu_rach_ind(ind: &PhRachParam) -> PcuRachInd {
    PcuRachInd {
        qta: (ind.acc_delay as i16) << 2,
        ra: ind.ra,
        fn_nr: ind.fn_nr,
        is_11bit: ind.is_11bit,
        burst_type: ind.burst_type,
    }
}
