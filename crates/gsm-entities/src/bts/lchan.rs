use std::collections::VecDeque;

use gsm_core::{ChanKind, LchanId};

use super::dl_queue::DlQueue;
use super::sacch_fill::SacchFill;

/// Upper bound of buffered uplink measurement samples per lchan
pub const MAX_UL_MEAS: usize = 104;

/// `LchanMeas::flags`: the SACCH L1 header in `l1_info` is valid
pub const LC_UL_M_F_L1_VALID: u8 = 1 << 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LchanState {
    #[default]
    None,
    ActRequested,
    Active,
    RelRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LchanType {
    #[default]
    None,
    Sdcch,
    TchF,
    TchH,
    Pdtch,
    Cbch,
    Ccch,
}

impl LchanType {
    /// Type taken by an lchan activated under the given channel kind
    pub fn for_activation(kind: ChanKind, on_pdch: bool) -> Self {
        match kind {
            _ if on_pdch => LchanType::Pdtch,
            ChanKind::OsmoPdch => LchanType::Pdtch,
            ChanKind::TchF => LchanType::TchF,
            ChanKind::TchH => LchanType::TchH,
            ChanKind::Sdcch4 | ChanKind::Sdcch8 => LchanType::Sdcch,
            ChanKind::Bcch | ChanKind::Rach | ChanKind::PchAgch => LchanType::Ccch,
        }
    }
}

/// RSL channel mode (TS 48.058 9.3.6, speech or data indicator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RslCmode {
    #[default]
    Signalling,
    Speech,
    Data,
}

/// Ciphering bootstrap progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CiphState {
    #[default]
    None,
    /// Uplink deciphering requested from the PHY
    RxRequested,
    /// PHY confirmed uplink deciphering
    RxConfirmed,
    /// Downlink ciphering requested after the first ciphered uplink frame
    TxEnabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandoverState {
    #[default]
    None,
    /// Handover access received, waiting for the first decodable frame
    WaitFrame,
}

/// Opaque handle of a downlink DTX controller instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DtxHandle(pub u32);

/// One uplink measurement sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UlMeas {
    pub ta_offs_qbits: i16,
    pub ber10k: u16,
    pub inv_rssi: u8,
}

#[derive(Debug, Clone, Default)]
pub struct LchanMeas {
    pub ul_res: VecDeque<UlMeas>,
    /// SACCH L1 header in RSL order (power level, FPC, timing advance)
    pub l1_info: [u8; 2],
    pub flags: u8,
    /// MS timing offset from measurements, already biased by +63
    pub ms_t_offs: Option<u8>,
    /// Timing offset from the last access burst, already biased by +63
    pub p_offs: Option<u8>,
}

impl LchanMeas {
    /// Records one sample, dropping the oldest beyond `MAX_UL_MEAS`
    pub fn push_ul(&mut self, ulm: UlMeas) {
        if self.ul_res.len() >= MAX_UL_MEAS {
            self.ul_res.pop_front();
        }
        self.ul_res.push_back(ulm);
    }

    pub fn l1_valid(&self) -> bool {
        self.flags & LC_UL_M_F_L1_VALID != 0
    }
}

#[derive(Debug, Clone)]
pub struct Lchan {
    pub id: LchanId,
    pub lchan_type: LchanType,
    pub state: LchanState,
    pub rsl_cmode: RslCmode,

    pub ciph_state: CiphState,
    /// N(S) expected in the first ciphered uplink I-frame
    pub ciph_ns: u8,

    /// Radio link counter S
    pub s: i32,
    pub sacch_deact: bool,

    pub dtx_dl: Option<DtxHandle>,

    pub meas: LchanMeas,
    pub ms_power_current: u8,
    pub rqd_ta: u8,

    pub ho: HandoverState,

    pub dl_tch_queue: DlQueue,
    /// Frame number of the last uplink voice frame
    pub last_fn: Option<u32>,
    pub has_rtp: bool,
    pub rtp_tx_marker: bool,
    pub loopback: bool,

    /// RSL RELease INDication held back until the next TCH-RTS
    pub pending_rel_ind: Option<Vec<u8>>,

    pub sacch_fill: SacchFill,
}

impl Lchan {
    pub fn new(id: LchanId, lchan_type: LchanType) -> Self {
        Lchan {
            id,
            lchan_type,
            state: LchanState::None,
            rsl_cmode: RslCmode::Signalling,
            ciph_state: CiphState::None,
            ciph_ns: 0,
            s: 0,
            sacch_deact: false,
            dtx_dl: None,
            meas: LchanMeas::default(),
            ms_power_current: 0,
            rqd_ta: 0,
            ho: HandoverState::None,
            dl_tch_queue: DlQueue::default(),
            last_fn: None,
            has_rtp: false,
            rtp_tx_marker: false,
            loopback: false,
            pending_rel_ind: None,
            sacch_fill: SacchFill::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == LchanState::Active
    }

    /// Clears per-connection state once the PHY confirmed the release
    pub fn reset_after_release(&mut self) {
        self.state = LchanState::None;
        self.ciph_state = CiphState::None;
        self.ciph_ns = 0;
        self.ho = HandoverState::None;
        self.dl_tch_queue.clear();
        self.last_fn = None;
        self.rtp_tx_marker = false;
        self.meas = LchanMeas::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ul_meas_bounded() {
        let mut meas = LchanMeas::default();
        for i in 0..(MAX_UL_MEAS + 10) {
            meas.push_ul(UlMeas { ta_offs_qbits: i as i16, ..Default::default() });
        }
        assert_eq!(meas.ul_res.len(), MAX_UL_MEAS);
        assert_eq!(meas.ul_res.front().map(|m| m.ta_offs_qbits), Some(10));
    }

    #[test]
    fn test_type_for_activation() {
        assert_eq!(LchanType::for_activation(ChanKind::Sdcch8, false), LchanType::Sdcch);
        assert_eq!(LchanType::for_activation(ChanKind::TchF, true), LchanType::Pdtch);
        assert_eq!(LchanType::for_activation(ChanKind::OsmoPdch, false), LchanType::Pdtch);
    }
}
