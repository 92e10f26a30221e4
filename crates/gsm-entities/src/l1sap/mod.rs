//! Layer 1 service access point of the BTS
//!
//! `L1sapBs` is the single entry point for primitives coming up from the PHY
//! and the single exit towards it. Per primitive it looks up the addressed
//! lchan, runs the per-lchan state machines in `components` and hands the
//! results to the upper layer collaborators.

pub mod components;
pub mod l1sap_bs;

use gsm_core::ChanNrError;
use gsm_saps::rsl::RslCause;

use crate::phy::PhyLinkError;

pub use l1sap_bs::L1sapBs;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum L1sapError {
    #[error("unknown primitive type {prim} op {op}")]
    UnknownPrimitive { prim: u8, op: u8 },
    #[error("no such trx {0}")]
    NoSuchTrx(u8),
    #[error(transparent)]
    ChanNr(#[from] ChanNrError),
    #[error("no lchan for chan_nr 0x{0:02x}")]
    NoLchan(u8),
    #[error("time indication from secondary trx {0}")]
    TimeFromSecondaryTrx(u8),
    #[error("bad frame")]
    BadFrame,
    #[error("SACCH frame too short ({0} bytes)")]
    SacchTooShort(usize),
    /// Channel activation refused, with the cause for the RSL NACK
    #[error("channel activation failed: {0}")]
    ChanAct(RslCause),
    #[error("trx {trx} ts {tn} cannot switch PDCH mode now")]
    PdchSwitchRefused { trx: u8, tn: u8 },
    #[error(transparent)]
    Phy(#[from] PhyLinkError),
}
