//! Collaborators that only log, for running the L1SAP without upper layers

use gsm_core::{GSM_MACBLOCK_LEN, GsmTime, LchanId, Msgb};
use gsm_saps::lapdm::{LapdmLink, LapdmRachInd, T200Set};
use gsm_saps::oml::AlarmReport;
use gsm_saps::pcu::{PcuDataInd, PcuRachInd, PcuRtsReq};
use gsm_saps::ph::PhDataParam;
use gsm_saps::rsl::RslCause;
use gsm_saps::rtp::RtpTx;

use crate::bts::DtxHandle;
use crate::bts::lchan::LchanMeas;

use super::*;

#[derive(Debug, Default)]
pub struct LoggingServices {
    next_dtx: u32,
    /// Upcalls seen so far, for a summary at shutdown
    pub num_upcalls: u64,
}

impl LinkLayer for LoggingServices {
    fn dequeue(&mut self, _lchan: LchanId, _link: LapdmLink) -> Option<Msgb> {
        None
    }

    fn phsap_up(&mut self, lchan: LchanId, link: LapdmLink, data: PhDataParam) {
        self.num_upcalls += 1;
        tracing::debug!("lapdm {} {}: {:?}", lchan, link, data.msg);
    }

    fn rach_up(&mut self, lchan: LchanId, ind: LapdmRachInd) {
        self.num_upcalls += 1;
        tracing::info!("lapdm {} channel request ra=0x{:02x} acc_delay={}", lchan, ind.ra, ind.acc_delay);
    }

    fn set_t200(&mut self, lchan: LchanId, t200: T200Set) {
        tracing::debug!("lapdm {} T200 {:?}", lchan, t200);
    }
}

impl PacketControl for LoggingServices {
    fn rts_req(&mut self, req: PcuRtsReq) {
        tracing::trace!("pcu rts trx={} ts={} block={}", req.trx, req.tn, req.block_nr);
    }

    fn data_ind(&mut self, ind: PcuDataInd) {
        self.num_upcalls += 1;
        tracing::debug!("pcu data trx={} ts={} len={}", ind.trx, ind.tn, ind.data.len());
    }

    fn rach_ind(&mut self, ind: PcuRachInd) {
        self.num_upcalls += 1;
        tracing::info!("pcu rach ra=0x{:03x} qta={}", ind.ra, ind.qta);
    }

    fn time_ind(&mut self, _fn_nr: u32) {}
}

impl RadioResource for LoggingServices {
    fn chan_act_acknack(&mut self, lchan: LchanId, cause: u8) {
        self.num_upcalls += 1;
        tracing::info!("rsl {} chan act {}", lchan, if cause == 0 { "ack" } else { "nack" });
    }

    fn rf_rel_ack(&mut self, lchan: LchanId) {
        self.num_upcalls += 1;
        tracing::info!("rsl {} rf release ack", lchan);
    }

    fn conn_fail(&mut self, lchan: LchanId, cause: RslCause) {
        self.num_upcalls += 1;
        tracing::warn!("rsl {} connection failure: {}", lchan, cause);
    }

    fn dyn_pdch_complete(&mut self, trx: u8, tn: u8, ok: bool) {
        tracing::info!("rsl trx={} ts={} dynamic PDCH switch complete, ok={}", trx, tn, ok);
    }

    fn send_rel_ind(&mut self, lchan: LchanId, msg: Vec<u8>) {
        tracing::info!("rsl {} REL IND ({} bytes)", lchan, msg.len());
    }
}

impl Handover for LoggingServices {
    fn rach(&mut self, lchan: LchanId, ra: u16, acc_delay: u8) -> bool {
        tracing::info!("handover access on {} ra=0x{:02x} acc_delay={}, no handover expected", lchan, ra, acc_delay);
        false
    }

    fn frame(&mut self, lchan: LchanId) {
        tracing::info!("handover {} first frame", lchan);
    }
}

impl AlarmSink for LoggingServices {
    fn fail_rep(&mut self, report: AlarmReport) {
        tracing::error!("failure report: {}", report);
    }
}

impl VoiceTransport for LoggingServices {
    fn poll(&mut self, _lchan: LchanId) {}

    fn advance_rx_ts(&mut self, _lchan: LchanId, _samples: u32) {}

    fn send_frame(&mut self, lchan: LchanId, frame: RtpTx) {
        tracing::trace!("rtp {} tx {} bytes duration={}", lchan, frame.payload.len(), frame.duration);
    }
}

impl Measurement for LoggingServices {
    fn check_compute(&mut self, _lchan: LchanId, _meas: &mut LchanMeas, _fn_nr: u32) {}

    fn ms_pwr_ctrl(&mut self, _lchan: LchanId, _ms_power: u8, _rssi: i8) -> Option<u8> {
        None
    }
}

impl Dtx for LoggingServices {
    fn alloc(&mut self, lchan: LchanId) -> DtxHandle {
        self.next_dtx = self.next_dtx.wrapping_add(1);
        tracing::debug!("dtx {} allocated handle {}", lchan, self.next_dtx);
        DtxHandle(self.next_dtx)
    }

    fn free(&mut self, handle: DtxHandle) {
        tracing::debug!("dtx handle {} freed", handle.0);
    }

    fn dispatch_facch(&mut self, _handle: DtxHandle) {}
}

impl Broadcast for LoggingServices {
    fn bcch_block(&mut self, _time: &GsmTime) -> Option<[u8; GSM_MACBLOCK_LEN]> {
        None
    }

    fn ccch_block(&mut self, _time: &GsmTime, _is_agch: bool) -> Option<[u8; GSM_MACBLOCK_LEN]> {
        None
    }
}
