use std::collections::{HashMap, VecDeque};

use gsm_core::{GSM_MACBLOCK_LEN, GsmTime, LchanId, Msgb};
use gsm_entities::bts::DtxHandle;
use gsm_entities::bts::lchan::LchanMeas;
use gsm_entities::phy::{PhyLink, PhyLinkError, PhyLinkState};
use gsm_entities::services::{
    AlarmSink, Broadcast, Dtx, Handover, LinkLayer, Measurement, PacketControl, RadioResource, VoiceTransport,
};
use gsm_saps::L1sapPrim;
use gsm_saps::lapdm::{LapdmLink, LapdmRachInd, T200Set};
use gsm_saps::oml::AlarmReport;
use gsm_saps::pcu::{PcuDataInd, PcuRachInd, PcuRtsReq};
use gsm_saps::ph::PhDataParam;
use gsm_saps::rsl::RslCause;
use gsm_saps::rtp::RtpTx;

/// Everything the L1SAP hands to its collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum Upcall {
    PhsapUp(LchanId, LapdmLink, PhDataParam),
    RachUp(LchanId, LapdmRachInd),
    SetT200(LchanId, T200Set),
    PcuRts(PcuRtsReq),
    PcuData(PcuDataInd),
    PcuRach(PcuRachInd),
    PcuTime(u32),
    ChanActAcknack(LchanId, u8),
    RfRelAck(LchanId),
    ConnFail(LchanId, RslCause),
    DynPdchComplete { trx: u8, tn: u8, ok: bool },
    RelInd(LchanId, Vec<u8>),
    HoRach(LchanId, u16, u8),
    HoFrame(LchanId),
    FailRep(AlarmReport),
    RtpPoll(LchanId),
    RtpAdvance(LchanId, u32),
    RtpSend(LchanId, RtpTx),
    MeasCompute(LchanId, u32),
    MsPwrCtrl(LchanId, u8),
    DtxAlloc(LchanId),
    DtxFree(DtxHandle),
    DtxFacch(DtxHandle),
}

/// Collaborator stand-in that records every call for later inspection.
/// Downlink queues and broadcast blocks can be preloaded.
#[derive(Default)]
pub struct Recorder {
    upcalls: Vec<Upcall>,
    next_dtx: u32,

    pub lapdm_queue: HashMap<(LchanId, LapdmLink), VecDeque<Msgb>>,
    pub bcch: Option<[u8; GSM_MACBLOCK_LEN]>,
    pub ccch: Option<[u8; GSM_MACBLOCK_LEN]>,
    /// Reply to handover access bursts
    pub ho_accept: bool,
    /// Reply to MS power control
    pub ms_power_level: Option<u8>,
    /// AGCH flag of each CCCH block request
    pub ccch_requests: Vec<bool>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_upcalls(&mut self) -> Vec<Upcall> {
        std::mem::take(&mut self.upcalls)
    }

    pub fn enqueue(&mut self, lchan: LchanId, link: LapdmLink, data: &[u8]) {
        self.lapdm_queue.entry((lchan, link)).or_default().push_back(Msgb::from_l2(data.to_vec()));
    }

    fn record(&mut self, upcall: Upcall) {
        tracing::debug!("upcall: {:?}", upcall);
        self.upcalls.push(upcall);
    }
}

impl LinkLayer for Recorder {
    fn dequeue(&mut self, lchan: LchanId, link: LapdmLink) -> Option<Msgb> {
        self.lapdm_queue.get_mut(&(lchan, link))?.pop_front()
    }
    fn phsap_up(&mut self, lchan: LchanId, link: LapdmLink, data: PhDataParam) {
        self.record(Upcall::PhsapUp(lchan, link, data));
    }
    fn rach_up(&mut self, lchan: LchanId, ind: LapdmRachInd) {
        self.record(Upcall::RachUp(lchan, ind));
    }
    fn set_t200(&mut self, lchan: LchanId, t200: T200Set) {
        self.record(Upcall::SetT200(lchan, t200));
    }
}

impl PacketControl for Recorder {
    fn rts_req(&mut self, req: PcuRtsReq) {
        self.record(Upcall::PcuRts(req));
    }
    fn data_ind(&mut self, ind: PcuDataInd) {
        self.record(Upcall::PcuData(ind));
    }
    fn rach_ind(&mut self, ind: PcuRachInd) {
        self.record(Upcall::PcuRach(ind));
    }
    fn time_ind(&mut self, fn_nr: u32) {
        self.record(Upcall::PcuTime(fn_nr));
    }
}

impl RadioResource for Recorder {
    fn chan_act_acknack(&mut self, lchan: LchanId, cause: u8) {
        self.record(Upcall::ChanActAcknack(lchan, cause));
    }
    fn rf_rel_ack(&mut self, lchan: LchanId) {
        self.record(Upcall::RfRelAck(lchan));
    }
    fn conn_fail(&mut self, lchan: LchanId, cause: RslCause) {
        self.record(Upcall::ConnFail(lchan, cause));
    }
    fn dyn_pdch_complete(&mut self, trx: u8, tn: u8, ok: bool) {
        self.record(Upcall::DynPdchComplete { trx, tn, ok });
    }
    fn send_rel_ind(&mut self, lchan: LchanId, msg: Vec<u8>) {
        self.record(Upcall::RelInd(lchan, msg));
    }
}

impl Handover for Recorder {
    fn rach(&mut self, lchan: LchanId, ra: u16, acc_delay: u8) -> bool {
        self.record(Upcall::HoRach(lchan, ra, acc_delay));
        self.ho_accept
    }
    fn frame(&mut self, lchan: LchanId) {
        self.record(Upcall::HoFrame(lchan));
    }
}

impl AlarmSink for Recorder {
    fn fail_rep(&mut self, report: AlarmReport) {
        self.record(Upcall::FailRep(report));
    }
}

impl VoiceTransport for Recorder {
    fn poll(&mut self, lchan: LchanId) {
        self.record(Upcall::RtpPoll(lchan));
    }
    fn advance_rx_ts(&mut self, lchan: LchanId, samples: u32) {
        self.record(Upcall::RtpAdvance(lchan, samples));
    }
    fn send_frame(&mut self, lchan: LchanId, frame: RtpTx) {
        self.record(Upcall::RtpSend(lchan, frame));
    }
}

impl Measurement for Recorder {
    fn check_compute(&mut self, lchan: LchanId, _meas: &mut LchanMeas, fn_nr: u32) {
        self.record(Upcall::MeasCompute(lchan, fn_nr));
    }
    fn ms_pwr_ctrl(&mut self, lchan: LchanId, ms_power: u8, _rssi: i8) -> Option<u8> {
        self.record(Upcall::MsPwrCtrl(lchan, ms_power));
        self.ms_power_level
    }
}

impl Dtx for Recorder {
    fn alloc(&mut self, lchan: LchanId) -> DtxHandle {
        self.record(Upcall::DtxAlloc(lchan));
        self.next_dtx += 1;
        DtxHandle(self.next_dtx)
    }
    fn free(&mut self, handle: DtxHandle) {
        self.record(Upcall::DtxFree(handle));
    }
    fn dispatch_facch(&mut self, handle: DtxHandle) {
        self.record(Upcall::DtxFacch(handle));
    }
}

impl Broadcast for Recorder {
    fn bcch_block(&mut self, _time: &GsmTime) -> Option<[u8; GSM_MACBLOCK_LEN]> {
        self.bcch
    }
    fn ccch_block(&mut self, _time: &GsmTime, is_agch: bool) -> Option<[u8; GSM_MACBLOCK_LEN]> {
        self.ccch_requests.push(is_agch);
        self.ccch
    }
}

/// PHY stand-in collecting every downward primitive
#[derive(Default)]
pub struct RecordingPhy {
    sent: Vec<(u8, L1sapPrim)>,
    pub disconnects: Vec<(u8, u8)>,
    /// Refuse every primitive as unsupported
    pub reject_all: bool,
    pub fail_disconnect: bool,
}

impl RecordingPhy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_sent(&mut self) -> Vec<(u8, L1sapPrim)> {
        std::mem::take(&mut self.sent)
    }
}

impl PhyLink for RecordingPhy {
    fn state(&self) -> PhyLinkState {
        PhyLinkState::Connected
    }

    fn l1sap_down(&mut self, trx: u8, prim: L1sapPrim) -> Result<(), PhyLinkError> {
        if self.reject_all {
            return Err(PhyLinkError::Unsupported(format!("{}", prim)));
        }
        tracing::debug!("-> trx {} {}", trx, prim);
        self.sent.push((trx, prim));
        Ok(())
    }

    fn ts_disconnect(&mut self, trx: u8, tn: u8) -> Result<(), PhyLinkError> {
        self.disconnects.push((trx, tn));
        if self.fail_disconnect {
            return Err(PhyLinkError::NotConnected);
        }
        Ok(())
    }
}
