use gsm_config::SharedConfig;
use gsm_core::chan_nr::{self, CHAN_NR_BM_ACCHS, chan_nr_tn, is_link_sacch, osmo_pdch_to_tchf};
use gsm_core::gsm_time::{fn2ccch_block, fn2macblock, fn2ptcchblock, fn_diff, is_ptcch};
use gsm_core::{
    CCCH_LCHAN, CcchConf, ChanKind, FILL_FRAME, GSM_MACBLOCK_LEN, GSM_MACBLOCK_PADDING, GSM_RTP_DURATION, GsmTime, LchanId,
    Msgb, PchanKind, PresInfo,
};
use gsm_saps::L1sapPrim;
use gsm_saps::lapdm::{LapdmLink, LapdmRachInd, T200_NUM};
use gsm_saps::mph::{ActCnf, ActReq, CiphCnf, CiphReq, MeasInd, MphInfo, TimeInd};
use gsm_saps::oml::{AlarmKind, AlarmReport};
use gsm_saps::pcu::{PcuDataInd, PcuDataReq, PcuRtsReq};
use gsm_saps::ph::{PhDataParam, PhRachParam, PhRtsParam, TchParam, TchRtsParam};
use gsm_saps::rsl::RslCause;
use gsm_saps::rtp::{RtpFrame, RtpTx};

use crate::bts::timeslot::{TS_F_PDCH_ACT_PENDING, TS_F_PDCH_ACTIVE, TS_F_PDCH_DEACT_PENDING, TS_F_PDCH_PENDING_MASK};
use crate::bts::{Bts, HandoverState, LchanState, LchanType, RslCmode};
use crate::gsmtap::{GsmtapRecord, GsmtapTap};
use crate::l1sap::L1sapError;
use crate::l1sap::components::rach::RachRoute;
use crate::l1sap::components::{chan_ctrl, ciph, gsmtap, meas, rach, rach_load, radio_link, tch};
use crate::phy::{PhyLink, PhyLinkError};
use crate::services::BtsServices;

/// Number of SACCH L1 header octets (MS power level and timing advance)
const SACCH_L1_HDR_LEN: usize = 2;

pub struct L1sapBs {
    config: SharedConfig,

    /// Cached from global config
    tsc: u8,
    max_ta: u8,
    radio_link_timeout: i32,
    t200_ms: [u32; T200_NUM],
    dtx_dl: bool,
    dtx_ul: bool,
    num_agch: u8,
    ccch_conf: CcchConf,

    bts: Bts,
    phy: Box<dyn PhyLink>,
    svc: Box<dyn BtsServices>,
    gsmtap: Option<GsmtapTap>,
}

impl L1sapBs {
    pub fn new(config: SharedConfig, phy: Box<dyn PhyLink>, svc: Box<dyn BtsServices>) -> Self {
        let c = config.config();
        tracing::info!(
            "L1sapBs: initialized with bsic {} tsc {}, {} trx, rlt {}",
            c.bts.bsic,
            c.bts.tsc(),
            c.trx.len(),
            c.bts.radio_link_timeout
        );

        Self {
            tsc: c.bts.tsc(),
            max_ta: c.bts.max_ta,
            radio_link_timeout: c.bts.radio_link_timeout,
            t200_ms: c.bts.t200_ms,
            dtx_dl: c.bts.dtx_dl,
            dtx_ul: c.bts.dtx_ul,
            num_agch: c.bts.num_agch,
            ccch_conf: c.bts.ccch_conf,
            bts: Bts::from_config(&c),
            phy,
            svc,
            gsmtap: None,
            config,
        }
    }

    /// Enables capture of PH-SAP traffic
    pub fn set_gsmtap(&mut self, tap: GsmtapTap) {
        self.gsmtap = Some(tap);
    }

    pub fn bts(&self) -> &Bts {
        &self.bts
    }

    pub fn bts_mut(&mut self) -> &mut Bts {
        &mut self.bts
    }

    pub fn services(&self) -> &dyn BtsServices {
        &*self.svc
    }

    pub fn services_mut(&mut self) -> &mut dyn BtsServices {
        &mut *self.svc
    }

    pub fn phy(&self) -> &dyn PhyLink {
        &*self.phy
    }

    pub fn phy_mut(&mut self) -> &mut dyn PhyLink {
        &mut *self.phy
    }

    /// Entry point for everything the PHY sends up
    pub fn up(&mut self, trx: u8, prim: L1sapPrim) -> Result<(), L1sapError> {
        let result = match prim {
            L1sapPrim::MphInfoInd(MphInfo::Time(ind)) => self.rx_time_ind(trx, ind),
            L1sapPrim::MphInfoInd(MphInfo::Meas(ind)) => self.rx_meas_ind(trx, ind),
            L1sapPrim::MphInfoCnf(MphInfo::ActivateCnf(cnf)) => self.rx_act_cnf(trx, cnf),
            L1sapPrim::MphInfoCnf(MphInfo::DeactivateCnf(cnf)) => self.rx_deact_cnf(trx, cnf),
            L1sapPrim::MphInfoCnf(MphInfo::CiphCnf(cnf)) => self.rx_ciph_cnf(trx, cnf),
            L1sapPrim::MphInfoInd(info) | L1sapPrim::MphInfoCnf(info) => {
                tracing::info!("unknown MPH_INFO type {:?} from trx {}", info.info_type(), trx);
                Ok(())
            }
            L1sapPrim::PhRtsInd(rts) => self.rx_ph_rts_ind(trx, rts),
            L1sapPrim::TchRtsInd(rts) => self.rx_tch_rts_ind(trx, rts),
            L1sapPrim::PhDataInd(data) => {
                self.tap_ph_data(trx, &data, true);
                self.rx_ph_data_ind(trx, data)
            }
            L1sapPrim::TchInd(tch) => self.rx_tch_ind(trx, tch),
            L1sapPrim::PhRachInd(ind) => {
                self.tap_rach(trx, &ind);
                self.rx_ph_rach_ind(trx, ind)
            }
            prim @ (L1sapPrim::PhDataReq(_) | L1sapPrim::TchReq(_) | L1sapPrim::MphInfoReq(_)) => {
                Err(self.report_unknown_up(trx, &prim))
            }
        };

        if let Err(e) = &result {
            tracing::debug!("trx {}: {}", trx, e);
        }
        result
    }

    /// Exit point towards the PHY. Downlink data is captured on the way.
    pub fn down(&mut self, trx: u8, prim: L1sapPrim) -> Result<(), L1sapError> {
        if let L1sapPrim::PhDataReq(data) = &prim {
            self.tap_ph_data(trx, data, false);
        }
        let (prim_type, op) = prim.hdr();

        match self.phy.l1sap_down(trx, prim) {
            Ok(()) => Ok(()),
            Err(PhyLinkError::Unsupported(what)) => {
                let text = format!("unknown L1SAP down primitive {} op {}: {}", prim_type.into_raw(), op.into_raw(), what);
                tracing::error!("{}", text);
                self.svc.fail_rep(AlarmReport::new(AlarmKind::RxUnknL1sapDownMsg).with_trx(trx).with_text(text));
                Err(L1sapError::Phy(PhyLinkError::Unsupported(what)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn report_unknown_up(&mut self, trx: u8, prim: &L1sapPrim) -> L1sapError {
        let (prim_type, op) = prim.hdr();
        let text = format!("unknown L1SAP up primitive {} op {}", prim_type.into_raw(), op.into_raw());
        tracing::error!("{}", text);
        self.svc.fail_rep(AlarmReport::new(AlarmKind::RxUnknL1sapUpMsg).with_trx(trx).with_text(text));
        L1sapError::UnknownPrimitive { prim: prim_type.into_raw(), op: op.into_raw() }
    }

    // ---------------------------------------------------------------------
    // Downlink scheduling

    fn rx_ph_rts_ind(&mut self, trx: u8, rts: PhRtsParam) -> Result<(), L1sapError> {
        let PhRtsParam { chan_nr, link_id, fn_nr } = rts;
        let time = GsmTime::from_fn(fn_nr);
        let addr = match chan_nr::decode(chan_nr) {
            Ok(addr) => addr,
            Err(e) => panic!("PH-RTS.ind from trx {} with {}", trx, e),
        };
        tracing::trace!(ts=%time, "PH-RTS.ind chan_nr=0x{:02x} link_id=0x{:02x}", chan_nr, link_id);

        let Some(trx_ref) = self.bts.trx_mut(trx) else {
            panic!("PH-RTS.ind for unknown trx {}", trx);
        };
        let arfcn = trx_ref.arfcn;
        let is_pdch = trx_ref.ts[addr.tn as usize].is_pdch();

        let mut ciph_req = None;
        let msg = if is_pdch {
            match trx_ref.active_lchan_mut(chan_nr).filter(|lchan| lchan.loopback) {
                Some(lchan) => {
                    if is_ptcch(fn_nr) {
                        Msgb::new()
                    } else {
                        match lchan.dl_tch_queue.pop() {
                            Some(frame) => Msgb::from_l2(frame.payload),
                            None => Msgb::from_l2(vec![0u8; GSM_MACBLOCK_LEN]),
                        }
                    }
                }
                None => {
                    let is_ptcch = is_ptcch(fn_nr);
                    let block_nr = if is_ptcch { fn2ptcchblock(fn_nr) } else { fn2macblock(fn_nr) };
                    self.svc.rts_req(PcuRtsReq { trx, tn: addr.tn, is_ptcch, fn_nr, arfcn, block_nr });
                    return Ok(());
                }
            }
        } else {
            match addr.kind {
                ChanKind::Bcch => {
                    let block = self.svc.bcch_block(&time).unwrap_or(FILL_FRAME);
                    Msgb::from_l2(block.to_vec())
                }
                ChanKind::PchAgch => {
                    // The AGCH blocks come first in the multiframe
                    let is_agch = fn2ccch_block(fn_nr).is_some_and(|block| block < self.num_agch);
                    let block = self.svc.ccch_block(&time, is_agch).unwrap_or(FILL_FRAME);
                    Msgb::from_l2(block.to_vec())
                }
                kind if !kind.is_common() => {
                    let (msg, req) = self.dedicated_block(trx, kind, chan_nr, link_id);
                    ciph_req = req;
                    msg
                }
                _ => Msgb::new(),
            }
        };

        if let Some(req) = ciph_req {
            if let Err(e) = self.down(trx, L1sapPrim::MphInfoReq(MphInfo::CiphReq(req))) {
                tracing::warn!(ts=%time, "failed to request ciphering on chan_nr=0x{:02x}: {}", chan_nr, e);
            }
        }
        self.down(trx, L1sapPrim::PhDataReq(PhDataParam::req(chan_nr, link_id, fn_nr, msg)))
    }

    /// Next block for an SDCCH, FACCH or SACCH
    fn dedicated_block(&mut self, trx: u8, kind: ChanKind, chan_nr: u8, link_id: u8) -> (Msgb, Option<CiphReq>) {
        let dtx_dl = self.dtx_dl;
        let Some(lchan) = self.bts.trx_mut(trx).and_then(|t| t.active_lchan_mut(chan_nr)) else {
            return (Msgb::new(), None);
        };
        let id = lchan.id;

        if is_link_sacch(link_id) {
            let mut msg = Msgb::with_capacity(GSM_MACBLOCK_LEN);
            msg.put(&[lchan.ms_power_current, lchan.rqd_ta]);
            let body = GSM_MACBLOCK_LEN - SACCH_L1_HDR_LEN;
            match self.svc.dequeue(id, LapdmLink::Acch) {
                // LAPDm leaves room for the L1 header in front of its frame
                Some(pp) => put_padded(&mut msg, pp.data().get(SACCH_L1_HDR_LEN..).unwrap_or(&[]), body),
                None => match lchan.sacch_fill.next() {
                    Some(si) => msg.put(&si[..body]),
                    None => msg.put(&FILL_FRAME[..body]),
                },
            }
            msg.set_l1_len(SACCH_L1_HDR_LEN);
            return (msg, None);
        }

        match self.svc.dequeue(id, LapdmLink::Dcch) {
            Some(pp) => {
                let mut msg = Msgb::with_capacity(GSM_MACBLOCK_LEN);
                put_padded(&mut msg, pp.data(), GSM_MACBLOCK_LEN);
                let req = ciph::check_dl_block(lchan, chan_nr, pp.data());
                if let (true, Some(handle)) = (dtx_dl, lchan.dtx_dl) {
                    self.svc.dispatch_facch(handle);
                }
                (msg, req)
            }
            // Speech frames fill idle TCH blocks, only signalling needs the fill frame
            None if !kind.is_traffic() || lchan.rsl_cmode == RslCmode::Signalling => {
                (Msgb::from_l2(FILL_FRAME.to_vec()), None)
            }
            None => (Msgb::new(), None),
        }
    }

    fn rx_tch_rts_ind(&mut self, trx: u8, rts: TchRtsParam) -> Result<(), L1sapError> {
        let TchRtsParam { chan_nr, fn_nr } = rts;
        let time = GsmTime::from_fn(fn_nr);
        let trx_ref = self.bts.trx_mut(trx).ok_or(L1sapError::NoSuchTrx(trx))?;

        let Some(lchan) = trx_ref.active_lchan_mut(chan_nr) else {
            tracing::debug!(ts=%time, "TCH-RTS.ind on inactive chan_nr=0x{:02x}", chan_nr);
            let empty = TchParam { chan_nr, fn_nr, marker: false, msg: None };
            return self.down(trx, L1sapPrim::TchReq(empty));
        };
        let id = lchan.id;

        if !lchan.loopback && lchan.has_rtp {
            self.svc.poll(id);
            // The timestamp advances whether or not a frame arrives
            self.svc.advance_rx_ts(id, GSM_RTP_DURATION);
        }

        let frame = lchan.dl_tch_queue.pop();
        if frame.is_none() {
            tracing::debug!(ts=%time, "{} DL TCH underrun", id);
        }
        let rel_ind = lchan.pending_rel_ind.take();

        if let Some(msg) = rel_ind {
            tracing::info!(ts=%time, "{} sending held back RELease INDication", id);
            self.svc.send_rel_ind(id, msg);
        }

        let req = match frame {
            Some(frame) => TchParam { chan_nr, fn_nr, marker: frame.marker, msg: Some(Msgb::from_l2(frame.payload)) },
            None => TchParam { chan_nr, fn_nr, marker: false, msg: None },
        };
        self.down(trx, L1sapPrim::TchReq(req))
    }

    // ---------------------------------------------------------------------
    // Uplink traffic

    fn rx_ph_data_ind(&mut self, trx: u8, mut data: PhDataParam) -> Result<(), L1sapError> {
        let time = GsmTime::from_fn(data.fn_nr);
        let tn = chan_nr_tn(data.chan_nr);
        tracing::trace!(ts=%time, "PH-DATA.ind chan_nr=0x{:02x} link_id=0x{:02x} {:?}", data.chan_nr, data.link_id, data.msg);

        let ceiling = self.radio_link_timeout;
        let trx_ref = self.bts.trx_mut(trx).ok_or(L1sapError::NoSuchTrx(trx))?;
        let arfcn = trx_ref.arfcn;

        if trx_ref.ts[tn as usize].is_pdch() {
            match trx_ref.lchan_mut(data.chan_nr) {
                Some(lchan) if lchan.loopback => {
                    lchan.dl_tch_queue.push(RtpFrame::looped(data.msg.into_vec()));
                    return Ok(());
                }
                Some(_) => {}
                None => tracing::error!(ts=%time, "no lchan for PDCH chan_nr=0x{:02x}", data.chan_nr),
            }

            if data.msg.is_empty() {
                return Err(L1sapError::BadFrame);
            }
            let is_ptcch = is_ptcch(data.fn_nr);
            if !is_ptcch && data.pdch_presence_info != PresInfo::Both {
                tracing::debug!(ts=%time, "incomplete PDTCH block {:?}, dropped", data.pdch_presence_info);
                return Ok(());
            }
            let block_nr = if is_ptcch { fn2ptcchblock(data.fn_nr) } else { fn2macblock(data.fn_nr) };
            self.svc.data_ind(PcuDataInd {
                trx,
                tn,
                is_ptcch,
                fn_nr: data.fn_nr,
                arfcn,
                block_nr,
                data: data.msg.into_vec(),
                rssi: data.rssi,
                ber10k: data.ber10k,
                ta_offs_qbits: data.ta_offs_qbits,
                lqual_cb: data.lqual_cb,
            });
            return Ok(());
        }

        let Some(lchan) = trx_ref.active_lchan_mut(data.chan_nr) else {
            return Ok(());
        };
        let id = lchan.id;
        let is_sacch = is_link_sacch(data.link_id);

        if data.msg.is_empty() {
            if is_sacch {
                if let Some(cause) = radio_link::on_sacch_frame(lchan, ceiling, true) {
                    self.svc.conn_fail(id, cause);
                }
            }
            return Err(L1sapError::BadFrame);
        }

        if lchan.ho == HandoverState::WaitFrame {
            self.svc.frame(id);
            lchan.ho = HandoverState::None;
        }

        if is_sacch {
            if let Some(cause) = radio_link::on_sacch_frame(lchan, ceiling, false) {
                self.svc.conn_fail(id, cause);
            }
            let len = data.msg.l2_len();
            if len < SACCH_L1_HDR_LEN {
                tracing::info!(ts=%time, "{} SACCH frame too short ({} bytes)", id, len);
                return Err(L1sapError::SacchTooShort(len));
            }
            data.msg.set_l1_len(SACCH_L1_HDR_LEN);
            if let Some(ms_power) = meas::store_sacch_l1_header(lchan, data.msg.l1()) {
                if let Some(level) = self.svc.ms_pwr_ctrl(id, ms_power, data.rssi) {
                    lchan.ms_power_current = level;
                }
            }
        }

        if let Some(req) = ciph::check_ul_frame(lchan, data.chan_nr, data.msg.l2()) {
            if let Err(e) = self.down(trx, L1sapPrim::MphInfoReq(MphInfo::CiphReq(req))) {
                tracing::warn!(ts=%time, "{} failed to enable downlink ciphering: {}", id, e);
            }
        }

        data.msg.pull_l1();
        self.svc.phsap_up(id, LapdmLink::from_link_id(data.link_id), data);
        Ok(())
    }

    fn rx_tch_ind(&mut self, trx: u8, tch: TchParam) -> Result<(), L1sapError> {
        let time = GsmTime::from_fn(tch.fn_nr);
        let dtx_ul = self.dtx_ul;
        let trx_ref = self.bts.trx_mut(trx).ok_or(L1sapError::NoSuchTrx(trx))?;
        let Some(lchan) = trx_ref.active_lchan_mut(tch.chan_nr) else {
            return Ok(());
        };
        let id = lchan.id;

        let payload = match tch.msg {
            Some(mut msg) => {
                msg.pull_l1();
                msg.into_vec()
            }
            None => Vec::new(),
        };
        tracing::trace!(ts=%time, "{} TCH.ind {} bytes", id, payload.len());

        if lchan.has_rtp {
            let duration = tch::fn_ms_adj(tch.fn_nr, lchan.last_fn, dtx_ul);
            let frame = RtpTx { payload: payload.clone(), duration, marker: lchan.rtp_tx_marker };
            self.svc.send_frame(id, frame);
        }

        if lchan.loopback {
            let dropped = lchan.dl_tch_queue.push(RtpFrame::looped(payload));
            if dropped > 0 {
                tracing::debug!(ts=%time, "{} loopback queue full, dropped {} frames", id, dropped);
            }
            return Ok(());
        }

        lchan.rtp_tx_marker = false;
        lchan.last_fn = Some(tch.fn_nr);
        Ok(())
    }

    fn rx_ph_rach_ind(&mut self, trx: u8, ind: PhRachParam) -> Result<(), L1sapError> {
        let time = GsmTime::from_fn(ind.fn_nr);
        let route = rach::route(&ind, trx, self.max_ta);
        if rach::is_rach_chan(ind.chan_nr) && rach_load::is_busy(ind.rssi) {
            self.bts.rach_load.busy += 1;
        }
        if route == RachRoute::Discard {
            tracing::info!(ts=%time, "ignoring RACH request, access delay {} > max_ta {}", ind.acc_delay, self.max_ta);
            return Ok(());
        }

        let trx_ref = self.bts.trx_mut(trx).ok_or(L1sapError::NoSuchTrx(trx))?;
        let lchan_id = trx_ref.lchan_mut(ind.chan_nr).map(|lchan| {
            meas::set_ms_to_data(lchan, ind.acc_delay as i32, false);
            lchan.id
        });

        match route {
            RachRoute::Handover => {
                let id = lchan_id.ok_or(L1sapError::NoLchan(ind.chan_nr))?;
                tracing::info!(ts=%time, "{} handover RACH ra=0x{:02x} delay={}", id, ind.ra, ind.acc_delay);
                if self.svc.rach(id, ind.ra, ind.acc_delay) {
                    if let Some(lchan) = self.bts.lchan_mut(id) {
                        lchan.ho = HandoverState::WaitFrame;
                    }
                }
            }
            RachRoute::Pcu => {
                tracing::info!(ts=%time, "packet access ra=0x{:02x} delay={}", ind.ra, ind.acc_delay);
                self.bts.rach_load.access += 1;
                self.svc.rach_ind(rach::pcu_rach_ind(&ind));
            }
            RachRoute::Lapdm => {
                tracing::info!(ts=%time, "channel request ra=0x{:02x} delay={}", ind.ra, ind.acc_delay);
                self.bts.rach_load.access += 1;
                let ccch = LchanId::new(trx, 0, CCCH_LCHAN as u8);
                self.svc.rach_up(
                    ccch,
                    LapdmRachInd {
                        chan_nr: ind.chan_nr,
                        ra: ind.ra,
                        acc_delay: ind.acc_delay,
                        fn_nr: ind.fn_nr,
                        is_11bit: ind.is_11bit,
                        burst_type: ind.burst_type,
                    },
                );
            }
            RachRoute::Discard => {}
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // MPH-INFO

    fn rx_time_ind(&mut self, trx: u8, ind: TimeInd) -> Result<(), L1sapError> {
        if trx != 0 {
            tracing::info!("time indication from trx {} ignored, only trx 0 is a clock source", trx);
            return Err(L1sapError::TimeFromSecondaryTrx(trx));
        }

        let time = GsmTime::from_fn(ind.fn_nr);
        let frames_expired = fn_diff(ind.fn_nr, self.bts.gsm_time.fn_nr);
        if frames_expired > 1 {
            tracing::error!(ts=%time, "missed {} time indications", frames_expired - 1);
        }

        self.bts.gsm_time = time;
        self.svc.time_ind(ind.fn_nr);

        let slots = rach_load::expired_rach_slots(self.ccch_conf, ind.fn_nr);
        self.bts.rach_load.total += slots * frames_expired.max(0) as u64;
        Ok(())
    }

    fn rx_meas_ind(&mut self, trx: u8, ind: MeasInd) -> Result<(), L1sapError> {
        let trx_ref = self.bts.trx_mut(trx).ok_or(L1sapError::NoSuchTrx(trx))?;
        let Some(lchan) = trx_ref.active_lchan_mut(ind.chan_nr) else {
            return Ok(());
        };
        // The PCU measures packet channels itself
        if lchan.lchan_type == LchanType::Pdtch {
            return Ok(());
        }

        meas::apply_meas_ind(lchan, &ind);
        let id = lchan.id;
        self.svc.check_compute(id, &mut lchan.meas, ind.fn_nr);
        Ok(())
    }

    fn rx_act_cnf(&mut self, trx: u8, cnf: ActCnf) -> Result<(), L1sapError> {
        let tn = chan_nr_tn(cnf.chan_nr);
        let trx_ref = self.bts.trx_mut(trx).ok_or(L1sapError::NoSuchTrx(trx))?;
        let lchan = trx_ref.lchan_mut(cnf.chan_nr).ok_or(L1sapError::NoLchan(cnf.chan_nr))?;
        gsm_core::assert_warn!(
            lchan.state == LchanState::ActRequested,
            "{} activation confirm in state {:?}",
            lchan.id,
            lchan.state
        );
        let ok = cnf.cause == 0;
        lchan.state = if ok { LchanState::Active } else { LchanState::None };
        let (id, lchan_type) = (lchan.id, lchan.lchan_type);
        tracing::info!("{} activation confirmed, cause {}", id, cnf.cause);

        let ts = &mut trx_ref.ts[tn as usize];
        if ok && ts.pchan == PchanKind::TchFTchHPdch {
            ts.dyn_pchan = match lchan_type {
                LchanType::Pdtch => PchanKind::Pdch,
                LchanType::TchH => PchanKind::TchH,
                _ => PchanKind::TchF,
            };
            tracing::debug!("{} osmocom dynamic timeslot now {:?}", id, ts.dyn_pchan);
        }
        let pdch_switch = ts.pchan == PchanKind::TchFPdch && ts.flags & TS_F_PDCH_ACT_PENDING != 0;
        if pdch_switch {
            ts.flags &= !TS_F_PDCH_ACT_PENDING;
            if ok {
                ts.flags |= TS_F_PDCH_ACTIVE;
            }
        }

        self.svc.chan_act_acknack(id, cnf.cause);
        if pdch_switch {
            self.svc.dyn_pdch_complete(trx, tn, ok);
        }
        Ok(())
    }

    fn rx_deact_cnf(&mut self, trx: u8, cnf: ActCnf) -> Result<(), L1sapError> {
        let tn = chan_nr_tn(cnf.chan_nr);
        let trx_ref = self.bts.trx_mut(trx).ok_or(L1sapError::NoSuchTrx(trx))?;
        let lchan = trx_ref.lchan_mut(cnf.chan_nr).ok_or(L1sapError::NoLchan(cnf.chan_nr))?;
        let id = lchan.id;

        // A SACCH-only deactivation leaves the main channel running
        if lchan.sacch_deact && lchan.state != LchanState::RelRequested {
            tracing::info!("{} SACCH deactivation confirmed", id);
            return Ok(());
        }

        tracing::info!("{} deactivation confirmed, cause {}", id, cnf.cause);
        lchan.reset_after_release();

        let ts = &mut trx_ref.ts[tn as usize];
        if ts.pchan == PchanKind::TchFTchHPdch && ts.lchans.iter().all(|l| l.state == LchanState::None) {
            ts.dyn_pchan = PchanKind::None;
        }
        let pdch_switch = ts.pchan == PchanKind::TchFPdch && ts.flags & TS_F_PDCH_DEACT_PENDING != 0;
        if pdch_switch {
            ts.flags &= !(TS_F_PDCH_PENDING_MASK | TS_F_PDCH_ACTIVE);
        }

        self.svc.rf_rel_ack(id);
        if pdch_switch {
            let ok = match self.phy.ts_disconnect(trx, tn) {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!("trx {} ts {} disconnect after PDCH deactivation failed: {}", trx, tn, e);
                    false
                }
            };
            self.svc.dyn_pdch_complete(trx, tn, ok);
        }
        Ok(())
    }

    fn rx_ciph_cnf(&mut self, trx: u8, cnf: CiphCnf) -> Result<(), L1sapError> {
        let trx_ref = self.bts.trx_mut(trx).ok_or(L1sapError::NoSuchTrx(trx))?;
        let lchan = trx_ref.lchan_mut(cnf.chan_nr).ok_or(L1sapError::NoLchan(cnf.chan_nr))?;
        ciph::on_confirm(lchan, &cnf);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Channel control, driven by RSL

    /// Activates an lchan. `tsc` is the training sequence RSL asked for, if
    /// any; it has to match the one derived from the BSIC.
    pub fn chan_act(&mut self, trx: u8, chan_nr: u8, tsc: Option<u8>) -> Result<(), L1sapError> {
        let addr = chan_nr::decode(chan_nr)?;
        if let Err(cause) = chan_ctrl::check_tsc(tsc, self.tsc) {
            tracing::error!("chan_nr=0x{:02x}: lchan TSC {:?} != BSIC-TSC {}", chan_nr, tsc, self.tsc);
            return Err(L1sapError::ChanAct(cause));
        }

        let ceiling = self.radio_link_timeout;
        let trx_ref = self.bts.trx_mut(trx).ok_or(L1sapError::NoSuchTrx(trx))?;
        let ts = &trx_ref.ts[addr.tn as usize];
        let on_pdch = ts.is_pdch() || ts.flags & TS_F_PDCH_ACT_PENDING != 0;

        let lchan = trx_ref.lchan_mut(chan_nr).ok_or(L1sapError::NoLchan(chan_nr))?;
        lchan.sacch_deact = false;
        lchan.s = ceiling;
        lchan.state = LchanState::ActRequested;
        lchan.lchan_type = LchanType::for_activation(addr.kind, on_pdch);
        let (id, lchan_type, stale_dtx) = (lchan.id, lchan.lchan_type, lchan.dtx_dl.take());
        tracing::info!("{} activating as {:?}", id, lchan_type);

        // Left over from an activation the PHY refused
        if let Some(handle) = stale_dtx {
            self.svc.free(handle);
        }

        if lchan_type != LchanType::Pdtch {
            if let Some(t200) = chan_ctrl::t200_for(addr.kind, &self.t200_ms) {
                self.svc.set_t200(id, t200);
            }
        }

        let req = ActReq { chan_nr: osmo_pdch_to_tchf(chan_nr), sacch_only: false };
        if let Err(e) = self.down(trx, L1sapPrim::MphInfoReq(MphInfo::ActivateReq(req))) {
            tracing::error!("{} activation request failed: {}", id, e);
            return Err(L1sapError::ChanAct(RslCause::EquipmentFail));
        }

        if self.dtx_dl && lchan_type != LchanType::Sdcch {
            let handle = self.svc.alloc(id);
            if let Some(lchan) = self.bts.lchan_mut(id) {
                lchan.dtx_dl = Some(handle);
            }
        }
        Ok(())
    }

    pub fn chan_rel(&mut self, trx: u8, chan_nr: u8) -> Result<(), L1sapError> {
        let trx_ref = self.bts.trx_mut(trx).ok_or(L1sapError::NoSuchTrx(trx))?;
        let lchan = trx_ref.lchan_mut(chan_nr).ok_or(L1sapError::NoLchan(chan_nr))?;
        lchan.state = LchanState::RelRequested;
        let (id, dtx) = (lchan.id, lchan.dtx_dl.take());
        if let Some(handle) = dtx {
            self.svc.free(handle);
        }
        tracing::info!("{} releasing", id);

        let req = ActReq { chan_nr: osmo_pdch_to_tchf(chan_nr), sacch_only: false };
        self.down(trx, L1sapPrim::MphInfoReq(MphInfo::DeactivateReq(req)))
    }

    /// Stops the SACCH of an lchan, the main channel stays up
    pub fn chan_deact_sacch(&mut self, trx: u8, chan_nr: u8) -> Result<(), L1sapError> {
        let trx_ref = self.bts.trx_mut(trx).ok_or(L1sapError::NoSuchTrx(trx))?;
        let lchan = trx_ref.lchan_mut(chan_nr).ok_or(L1sapError::NoLchan(chan_nr))?;
        lchan.sacch_deact = true;

        let req = ActReq { chan_nr: osmo_pdch_to_tchf(chan_nr), sacch_only: true };
        self.down(trx, L1sapPrim::MphInfoReq(MphInfo::DeactivateReq(req)))
    }

    pub fn chan_modify(&mut self, trx: u8, chan_nr: u8) -> Result<(), L1sapError> {
        let req = ActReq { chan_nr: osmo_pdch_to_tchf(chan_nr), sacch_only: false };
        self.down(trx, L1sapPrim::MphInfoReq(MphInfo::ModifyReq(req)))
    }

    /// Starts switching a TCH/F_PDCH timeslot into or out of PDCH mode. The
    /// switch completes with the PHY confirm.
    pub fn dyn_pdch_switch(&mut self, trx: u8, tn: u8, to_pdch: bool) -> Result<(), L1sapError> {
        let trx_ref = self.bts.trx_mut(trx).ok_or(L1sapError::NoSuchTrx(trx))?;
        let ts = trx_ref.ts.get_mut(tn as usize).ok_or(L1sapError::PdchSwitchRefused { trx, tn })?;
        let started = if to_pdch { ts.begin_pdch_act() } else { ts.begin_pdch_deact() };
        if !started {
            return Err(L1sapError::PdchSwitchRefused { trx, tn });
        }
        tracing::info!("trx {} ts {} switching to {}", trx, tn, if to_pdch { "PDCH" } else { "TCH/F" });

        let chan_nr = CHAN_NR_BM_ACCHS | tn;
        let result = if to_pdch { self.chan_act(trx, chan_nr, None) } else { self.chan_rel(trx, chan_nr) };
        if result.is_err() {
            if let Some(trx_ref) = self.bts.trx_mut(trx) {
                trx_ref.ts[tn as usize].flags &= !TS_F_PDCH_PENDING_MASK;
            }
        }
        result
    }

    // ---------------------------------------------------------------------
    // Other upper layer inputs

    /// Downlink PDCH block from the PCU
    pub fn pdch_req(&mut self, req: PcuDataReq) -> Result<(), L1sapError> {
        let chan_nr = CHAN_NR_BM_ACCHS | req.tn;
        tracing::trace!(
            "PCU data req trx {} ts {} block {} ptcch {} arfcn {}",
            req.trx, req.tn, req.block_nr, req.is_ptcch, req.arfcn
        );
        let msg = Msgb::from_l2(req.data);
        self.down(req.trx, L1sapPrim::PhDataReq(PhDataParam::req(chan_nr, 0, req.fn_nr, msg)))
    }

    /// Voice frame received from the RTP socket of an lchan
    pub fn rtp_rx(&mut self, id: LchanId, frame: RtpFrame) {
        let Some(lchan) = self.bts.lchan_mut(id) else {
            tracing::warn!("RTP frame for unknown lchan {}", id);
            return;
        };
        // The loopback owns the queue
        if lchan.loopback {
            return;
        }
        let dropped = lchan.dl_tch_queue.push(frame);
        if dropped > 0 {
            tracing::debug!("{} DL TCH queue overflow, dropped {} frames", id, dropped);
        }
    }

    // ---------------------------------------------------------------------
    // Capture

    fn tap_ph_data(&self, trx: u8, data: &PhDataParam, uplink: bool) {
        if self.gsmtap.is_none() {
            return;
        }
        let Some(trx_ref) = self.bts.trx(trx) else {
            return;
        };
        let is_pdch = trx_ref.ts[chan_nr_tn(data.chan_nr) as usize].is_pdch();
        if let Some(record) = gsmtap::ph_data_record(data, trx_ref.arfcn, is_pdch, self.num_agch, uplink) {
            self.tap_send(record);
        }
    }

    fn tap_rach(&self, trx: u8, ind: &PhRachParam) {
        if self.gsmtap.is_none() {
            return;
        }
        if let Some(trx_ref) = self.bts.trx(trx) {
            self.tap_send(gsmtap::ph_rach_record(ind, trx_ref.arfcn));
        }
    }

    fn tap_send(&self, record: GsmtapRecord) {
        let Some(tap) = &self.gsmtap else {
            return;
        };
        let passes = {
            let state = self.config.state_read();
            gsmtap::passes_filter(record.chan_type, state.gsmtap_sapi_mask, state.gsmtap_sapi_acch)
        };
        if passes {
            tap.send(record);
        }
    }
}

/// Appends up to `len` octets of `src`, padding the rest
fn put_padded(msg: &mut Msgb, src: &[u8], len: usize) {
    let n = src.len().min(len);
    msg.put(&src[..n]);
    msg.put(&vec![GSM_MACBLOCK_PADDING; len - n]);
}
