use core::fmt::Display;

use crate::mph::MphInfo;
use crate::ph::{PhDataParam, PhRachParam, PhRtsParam, TchParam, TchRtsParam};

/// Primitive type, first half of the (type, operation) tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PrimType {
    PhData = 0,
    PhRach = 1,
    PhConn = 2,
    PhEmpty = 3,
    PhRts = 4,
    MphInfo = 5,
    Tch = 6,
    TchRts = 7,
}

/// Primitive operation, second half of the (type, operation) tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PrimOp {
    Request = 0,
    Response = 1,
    Indication = 2,
    Confirm = 3,
}

impl PrimType {
    pub fn into_raw(self) -> u8 {
        self as u8
    }
}

impl PrimOp {
    pub fn into_raw(self) -> u8 {
        self as u8
    }
}

/// One primitive crossing the L1SAP. Attached frame buffers are owned by the
/// primitive and move along with it.
#[derive(Debug, Clone, PartialEq)]
pub enum L1sapPrim {
    // PHY -> L1SAP
    PhRtsInd(PhRtsParam),
    PhDataInd(PhDataParam),
    PhRachInd(PhRachParam),
    TchRtsInd(TchRtsParam),
    TchInd(TchParam),
    MphInfoInd(MphInfo),
    MphInfoCnf(MphInfo),

    // L1SAP -> PHY
    PhDataReq(PhDataParam),
    TchReq(TchParam),
    MphInfoReq(MphInfo),
}

impl L1sapPrim {
    /// The (type, operation) tag of this primitive
    pub fn hdr(&self) -> (PrimType, PrimOp) {
        match self {
            L1sapPrim::PhRtsInd(_) => (PrimType::PhRts, PrimOp::Indication),
            L1sapPrim::PhDataInd(_) => (PrimType::PhData, PrimOp::Indication),
            L1sapPrim::PhRachInd(_) => (PrimType::PhRach, PrimOp::Indication),
            L1sapPrim::TchRtsInd(_) => (PrimType::TchRts, PrimOp::Indication),
            L1sapPrim::TchInd(_) => (PrimType::Tch, PrimOp::Indication),
            L1sapPrim::MphInfoInd(_) => (PrimType::MphInfo, PrimOp::Indication),
            L1sapPrim::MphInfoCnf(_) => (PrimType::MphInfo, PrimOp::Confirm),
            L1sapPrim::PhDataReq(_) => (PrimType::PhData, PrimOp::Request),
            L1sapPrim::TchReq(_) => (PrimType::Tch, PrimOp::Request),
            L1sapPrim::MphInfoReq(_) => (PrimType::MphInfo, PrimOp::Request),
        }
    }

    pub fn is_upward(&self) -> bool {
        matches!(self.hdr().1, PrimOp::Indication | PrimOp::Confirm)
    }
}

impl Display for L1sapPrim {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            L1sapPrim::PhRtsInd(p) => write!(f, "PH-RTS.ind chan_nr=0x{:02x} link_id=0x{:02x}", p.chan_nr, p.link_id),
            L1sapPrim::PhDataInd(p) => write!(f, "PH-DATA.ind chan_nr=0x{:02x} link_id=0x{:02x} len={}", p.chan_nr, p.link_id, p.msg.len()),
            L1sapPrim::PhRachInd(p) => write!(f, "PH-RACH.ind chan_nr=0x{:02x} ra=0x{:02x}", p.chan_nr, p.ra),
            L1sapPrim::TchRtsInd(p) => write!(f, "TCH-RTS.ind chan_nr=0x{:02x}", p.chan_nr),
            L1sapPrim::TchInd(p) => write!(f, "TCH.ind chan_nr=0x{:02x}", p.chan_nr),
            L1sapPrim::MphInfoInd(i) => write!(f, "MPH-INFO.ind {:?}", i.info_type()),
            L1sapPrim::MphInfoCnf(i) => write!(f, "MPH-INFO.cnf {:?}", i.info_type()),
            L1sapPrim::PhDataReq(p) => write!(f, "PH-DATA.req chan_nr=0x{:02x} link_id=0x{:02x} len={}", p.chan_nr, p.link_id, p.msg.len()),
            L1sapPrim::TchReq(p) => write!(f, "TCH.req chan_nr=0x{:02x}", p.chan_nr),
            L1sapPrim::MphInfoReq(i) => write!(f, "MPH-INFO.req {:?}", i.info_type()),
        }
    }
}
