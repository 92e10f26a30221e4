//! PH-SAP parameters (3GPP TS 44.004 clause 7), as exchanged with the PHY

use gsm_core::{AccessBurstType, Msgb, PresInfo};

/// PH-DATA.ind / PH-DATA.req
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhDataParam {
    pub chan_nr: u8,
    pub link_id: u8,
    pub fn_nr: u32,
    /// Received signal level, dBm (indications only)
    pub rssi: i8,
    /// Bit error rate, per 10k
    pub ber10k: u16,
    /// Timing offset, quarter bits
    pub ta_offs_qbits: i16,
    /// Link quality, centi-Bel
    pub lqual_cb: i16,
    /// Which halves of a PDTCH block were decoded
    pub pdch_presence_info: PresInfo,
    /// Empty for a bad (undecodable) frame
    pub msg: Msgb,
}

impl PhDataParam {
    pub fn req(chan_nr: u8, link_id: u8, fn_nr: u32, msg: Msgb) -> Self {
        PhDataParam { chan_nr, link_id, fn_nr, msg, ..Default::default() }
    }
}

/// PH-RTS.ind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhRtsParam {
    pub chan_nr: u8,
    pub link_id: u8,
    pub fn_nr: u32,
}

/// PH-RACH.ind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhRachParam {
    pub chan_nr: u8,
    /// 8 or 11 bit random access code
    pub ra: u16,
    /// Access delay in symbols
    pub acc_delay: u8,
    pub fn_nr: u32,
    pub is_11bit: bool,
    pub burst_type: AccessBurstType,
    /// Received signal level in dBm
    pub rssi: i8,
}

/// TCH.ind / TCH.req
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TchParam {
    pub chan_nr: u8,
    pub fn_nr: u32,
    /// RTP marker for the first frame of a talk spurt
    pub marker: bool,
    /// None on a downlink underrun
    pub msg: Option<Msgb>,
}

/// TCH-RTS.ind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TchRtsParam {
    pub chan_nr: u8,
    pub fn_nr: u32,
}
