use as_any::AsAny;
use crossbeam_channel::{Receiver, unbounded};

use gsm_config::{BtsConfig, PhyBackend, SharedConfig};
use gsm_core::{CcchConf, LchanId};
use gsm_entities::L1sapBs;
use gsm_entities::bts::Lchan;
use gsm_entities::gsmtap::{GsmtapRecord, GsmtapTap};
use gsm_saps::L1sapPrim;
use gsm_saps::mph::{ActCnf, MphInfo};
use gsm_saps::ph::{PhDataParam, PhRtsParam, TchParam, TchRtsParam};

use super::sink::{Recorder, RecordingPhy, Upcall};

/// Creates a default config for testing. It can still be modified as needed
/// before passing it to the ComponentTest constructor
pub fn default_test_config() -> BtsConfig {
    let mut cfg = BtsConfig::default();
    // BCC 2, so the derived TSC is 2
    cfg.bts.bsic = 0x3a;
    cfg.bts.ccch_conf = CcchConf::OneCombined;
    cfg.trx[0].arfcn = 871;

    // The L1SAP gets a recording PHY, the configured one is never created
    cfg.phy_link.backend = PhyBackend::None;
    cfg
}

/// One L1SAP wired to a recording PHY and recording collaborators
pub struct ComponentTest {
    pub config: SharedConfig,
    pub l1sap: L1sapBs,
}

impl ComponentTest {
    pub fn new(config: BtsConfig) -> Self {
        let shared_config = SharedConfig::from_config(config);
        let l1sap = L1sapBs::new(shared_config.clone(), Box::new(RecordingPhy::new()), Box::new(Recorder::new()));
        Self { config: shared_config, l1sap }
    }

    pub fn recorder(&mut self) -> &mut Recorder {
        self.l1sap.services_mut().as_any_mut().downcast_mut::<Recorder>().expect("services are a Recorder")
    }

    pub fn phy(&mut self) -> &mut RecordingPhy {
        self.l1sap.phy_mut().as_any_mut().downcast_mut::<RecordingPhy>().expect("phy is a RecordingPhy")
    }

    pub fn take_upcalls(&mut self) -> Vec<Upcall> {
        self.recorder().take_upcalls()
    }

    pub fn take_sent(&mut self) -> Vec<(u8, L1sapPrim)> {
        self.phy().take_sent()
    }

    /// Brings an lchan to the active state the way RSL and the PHY would,
    /// then forgets about the traffic this caused
    pub fn activate(&mut self, trx: u8, chan_nr: u8) {
        self.l1sap.chan_act(trx, chan_nr, None).expect("activation request");
        let cnf = ActCnf { chan_nr, cause: 0 };
        self.l1sap.up(trx, L1sapPrim::MphInfoCnf(MphInfo::ActivateCnf(cnf))).expect("activation confirm");
        self.take_sent();
        self.take_upcalls();
    }

    /// Enables capture and returns the receiving side
    pub fn capture(&mut self, sapi_mask: u32, sapi_acch: bool) -> Receiver<GsmtapRecord> {
        {
            let mut state = self.config.state_write();
            state.gsmtap_sapi_mask = sapi_mask;
            state.gsmtap_sapi_acch = sapi_acch;
        }
        let (sender, receiver) = unbounded();
        self.l1sap.set_gsmtap(GsmtapTap::new(sender));
        receiver
    }

    pub fn lchan_mut(&mut self, id: LchanId) -> &mut Lchan {
        self.l1sap.bts_mut().lchan_mut(id).expect("lchan exists")
    }

    /// Sends a PH-RTS.ind and returns what went down in response
    pub fn ph_rts(&mut self, trx: u8, chan_nr: u8, link_id: u8, fn_nr: u32) -> Vec<L1sapPrim> {
        let rts = PhRtsParam { chan_nr, link_id, fn_nr };
        self.l1sap.up(trx, L1sapPrim::PhRtsInd(rts)).expect("PH-RTS.ind");
        self.take_sent().into_iter().map(|(_, prim)| prim).collect()
    }

    /// Sends a TCH-RTS.ind and returns the TCH.req that went down
    pub fn tch_rts(&mut self, trx: u8, chan_nr: u8, fn_nr: u32) -> TchParam {
        let rts = TchRtsParam { chan_nr, fn_nr };
        self.l1sap.up(trx, L1sapPrim::TchRtsInd(rts)).expect("TCH-RTS.ind");
        match self.take_sent().pop() {
            Some((_, L1sapPrim::TchReq(req))) => req,
            other => panic!("expected TCH.req, got {:?}", other),
        }
    }
}

/// The PH-DATA.req among the primitives sent down
pub fn data_req(prims: &[L1sapPrim]) -> &PhDataParam {
    prims
        .iter()
        .find_map(|prim| match prim {
            L1sapPrim::PhDataReq(req) => Some(req),
            _ => None,
        })
        .expect("a PH-DATA.req")
}
