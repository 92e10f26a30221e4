//! PCU interface messages (packet data controller socket)

use gsm_core::AccessBurstType;

/// Transmit opportunity on a PDCH, PCU_IF_MSG_RTS_REQ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcuRtsReq {
    pub trx: u8,
    pub tn: u8,
    pub is_ptcch: bool,
    pub fn_nr: u32,
    pub arfcn: u16,
    pub block_nr: u8,
}

/// Uplink block received on a PDCH, PCU_IF_MSG_DATA_IND
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcuDataInd {
    pub trx: u8,
    pub tn: u8,
    pub is_ptcch: bool,
    pub fn_nr: u32,
    pub arfcn: u16,
    pub block_nr: u8,
    pub data: Vec<u8>,
    pub rssi: i8,
    pub ber10k: u16,
    pub ta_offs_qbits: i16,
    pub lqual_cb: i16,
}

/// Packet access burst, PCU_IF_MSG_RACH_IND
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcuRachInd {
    /// Access delay in quarter bits
    pub qta: i16,
    pub ra: u16,
    pub fn_nr: u32,
    pub is_11bit: bool,
    pub burst_type: AccessBurstType,
}

/// Downlink block from the PCU, PCU_IF_MSG_DATA_REQ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcuDataReq {
    pub trx: u8,
    pub tn: u8,
    pub is_ptcch: bool,
    pub fn_nr: u32,
    pub arfcn: u16,
    pub block_nr: u8,
    pub data: Vec<u8>,
}
