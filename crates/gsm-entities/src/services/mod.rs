//! Upper-layer collaborators of the L1SAP
//!
//! Each trait covers one external party. A BTS wires a single object
//! implementing all of them into the L1SAP; tests substitute a recorder.

pub mod logging;

pub use logging::LoggingServices;

use as_any::AsAny;

use gsm_core::{GSM_MACBLOCK_LEN, GsmTime, LchanId, Msgb};
use gsm_saps::lapdm::{LapdmLink, LapdmRachInd, T200Set};
use gsm_saps::oml::AlarmReport;
use gsm_saps::pcu::{PcuDataInd, PcuRachInd, PcuRtsReq};
use gsm_saps::ph::PhDataParam;
use gsm_saps::rsl::RslCause;
use gsm_saps::rtp::RtpTx;

use crate::bts::DtxHandle;
use crate::bts::lchan::LchanMeas;

/// LAPDm entities of all lchans
pub trait LinkLayer {
    /// Next downlink block pending on the given link, if any
    fn dequeue(&mut self, lchan: LchanId, link: LapdmLink) -> Option<Msgb>;
    /// Uplink block received on the given link
    fn phsap_up(&mut self, lchan: LchanId, link: LapdmLink, data: PhDataParam);
    /// Ordinary access burst, handed to the CCCH lchan
    fn rach_up(&mut self, lchan: LchanId, ind: LapdmRachInd);
    fn set_t200(&mut self, lchan: LchanId, t200: T200Set);
}

/// Packet control unit socket
pub trait PacketControl {
    fn rts_req(&mut self, req: PcuRtsReq);
    fn data_ind(&mut self, ind: PcuDataInd);
    fn rach_ind(&mut self, ind: PcuRachInd);
    fn time_ind(&mut self, fn_nr: u32);
}

/// RSL towards the BSC
pub trait RadioResource {
    fn chan_act_acknack(&mut self, lchan: LchanId, cause: u8);
    fn rf_rel_ack(&mut self, lchan: LchanId);
    fn conn_fail(&mut self, lchan: LchanId, cause: RslCause);
    /// TCH/F_PDCH switchover finished, `ok` false if the PHY rejected it
    fn dyn_pdch_complete(&mut self, trx: u8, tn: u8, ok: bool);
    /// Sends a previously held back RELease INDication
    fn send_rel_ind(&mut self, lchan: LchanId, msg: Vec<u8>);
}

pub trait Handover {
    /// Handover access burst. Returns true if it was accepted and the lchan
    /// should now wait for the first frame.
    fn rach(&mut self, lchan: LchanId, ra: u16, acc_delay: u8) -> bool;
    /// First decodable frame after an accepted handover access
    fn frame(&mut self, lchan: LchanId);
}

/// O&M failure reporting
pub trait AlarmSink {
    fn fail_rep(&mut self, report: AlarmReport);
}

/// RTP sockets of the voice lchans
pub trait VoiceTransport {
    fn poll(&mut self, lchan: LchanId);
    /// Advances the receive timestamp by `samples`
    fn advance_rx_ts(&mut self, lchan: LchanId, samples: u32);
    fn send_frame(&mut self, lchan: LchanId, frame: RtpTx);
}

/// Measurement processing and MS power control
pub trait Measurement {
    /// Closes the measurement period if `fn_nr` ends it
    fn check_compute(&mut self, lchan: LchanId, meas: &mut LchanMeas, fn_nr: u32);
    /// Returns the new MS power level to command, if it changes
    fn ms_pwr_ctrl(&mut self, lchan: LchanId, ms_power: u8, rssi: i8) -> Option<u8>;
}

/// Downlink DTX controllers
pub trait Dtx {
    fn alloc(&mut self, lchan: LchanId) -> DtxHandle;
    fn free(&mut self, handle: DtxHandle);
    /// A FACCH block is about to be sent
    fn dispatch_facch(&mut self, handle: DtxHandle);
}

/// System information and paging/access grant queues
pub trait Broadcast {
    fn bcch_block(&mut self, time: &GsmTime) -> Option<[u8; GSM_MACBLOCK_LEN]>;
    fn ccch_block(&mut self, time: &GsmTime, is_agch: bool) -> Option<[u8; GSM_MACBLOCK_LEN]>;
}

pub trait BtsServices:
    LinkLayer + PacketControl + RadioResource + Handover + AlarmSink + VoiceTransport + Measurement + Dtx + Broadcast + AsAny
{
}

impl<T> BtsServices for T where
    T: LinkLayer
        + PacketControl
        + RadioResource
        + Handover
        + AlarmSink
        + VoiceTransport
        + Measurement
        + Dtx
        + Broadcast
        + AsAny
{
}
