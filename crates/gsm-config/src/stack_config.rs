use serde::Deserialize;
use std::sync::{Arc, RwLock};

use gsm_core::{CcchConf, MAX_TA_DEFAULT, NUM_TS, PchanKind};
use gsm_saps::lapdm::{T200_DEFAULT_MS, T200_NUM};

/// The PHY backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PhyBackend {
    Undefined,
    /// No PHY attached, downward primitives are dropped. For testing
    None,
    /// In-process PHY driven by a local frame clock
    Virtual,
    Sysmobts,
    OsmoTrx,
    Octphy,
}

impl PhyBackend {
    /// Hardware backends have no driver in this build
    pub fn is_hardware(self) -> bool {
        matches!(self, PhyBackend::Sysmobts | PhyBackend::OsmoTrx | PhyBackend::Octphy)
    }
}

#[derive(Debug, Clone)]
pub struct CfgPhyLink {
    pub backend: PhyBackend,
}

impl Default for CfgPhyLink {
    fn default() -> Self {
        Self { backend: PhyBackend::Undefined }
    }
}

#[derive(Debug, Clone)]
pub struct CfgBts {
    /// 6 bits, NCC (3) and BCC (3)
    pub bsic: u8,
    /// Highest access delay accepted on the RACH, in symbols
    pub max_ta: u8,
    /// Radio link timeout ceiling in SACCH blocks, -1 disables supervision
    pub radio_link_timeout: i32,
    /// T200 per channel type, milliseconds, indexed by `T200Chan`
    pub t200_ms: [u32; T200_NUM],
    pub dtx_dl: bool,
    pub dtx_ul: bool,
    /// Number of CCCH blocks reserved for AGCH
    pub num_agch: u8,
    pub ccch_conf: CcchConf,
}

impl Default for CfgBts {
    fn default() -> Self {
        Self {
            bsic: 0,
            max_ta: MAX_TA_DEFAULT,
            radio_link_timeout: 32,
            t200_ms: T200_DEFAULT_MS,
            dtx_dl: false,
            dtx_ul: false,
            num_agch: 1,
            ccch_conf: CcchConf::default(),
        }
    }
}

impl CfgBts {
    /// Training sequence code derived from the BSIC (its BCC part)
    pub fn tsc(&self) -> u8 {
        self.bsic & 0x07
    }
}

#[derive(Debug, Clone)]
pub struct CfgTrx {
    pub arfcn: u16,
    pub timeslots: [PchanKind; NUM_TS],
}

impl Default for CfgTrx {
    fn default() -> Self {
        let mut timeslots = [PchanKind::TchF; NUM_TS];
        timeslots[0] = PchanKind::CcchSdcch4;
        Self { arfcn: 0, timeslots }
    }
}

#[derive(Debug, Clone)]
pub struct CfgGsmtap {
    pub enabled: bool,
    pub remote_host: String,
    pub remote_port: u16,
    /// Category names selected at startup, e.g. "BCCH" or "SACCH"
    pub sapis: Vec<String>,
}

impl Default for CfgGsmtap {
    fn default() -> Self {
        Self {
            enabled: false,
            remote_host: "127.0.0.1".to_string(),
            remote_port: gsm_pdus::gsmtap::GSMTAP_UDP_PORT,
            sapis: vec![],
        }
    }
}

#[derive(Debug, Clone)]
pub struct BtsConfig {
    pub debug_log: Option<String>,
    pub bts: CfgBts,
    /// At least one; entry 0 is the primary carrier (c0)
    pub trx: Vec<CfgTrx>,
    pub gsmtap: CfgGsmtap,
    pub phy_link: CfgPhyLink,
}

impl Default for BtsConfig {
    fn default() -> Self {
        Self {
            debug_log: None,
            bts: CfgBts::default(),
            trx: vec![CfgTrx::default()],
            gsmtap: CfgGsmtap::default(),
            phy_link: CfgPhyLink::default(),
        }
    }
}

impl BtsConfig {
    /// Validate that all required configuration fields are properly set.
    pub fn validate(&self) -> Result<(), &'static str> {
        match self.phy_link.backend {
            PhyBackend::Undefined => return Err("phy_link backend must be defined"),
            b if b.is_hardware() => return Err("phy_link backend is not available in this build"),
            _ => {}
        }

        if self.bts.bsic > 63 {
            return Err("bsic must be in range 0..=63");
        }
        if self.bts.max_ta > MAX_TA_DEFAULT {
            return Err("max_ta must not exceed 63");
        }
        let rlt = self.bts.radio_link_timeout;
        if rlt != -1 && !(4..=64).contains(&rlt) {
            return Err("radio_link_timeout must be -1 (disabled) or in range 4..=64");
        }
        if self.bts.num_agch > 7 {
            return Err("num_agch must be in range 0..=7");
        }
        if self.bts.t200_ms.iter().any(|&t| t == 0) {
            return Err("t200_ms entries must be non-zero");
        }

        let Some(c0) = self.trx.first() else {
            return Err("at least one trx must be configured");
        };
        if !c0.timeslots[0].has_ccch() {
            return Err("timeslot 0 of trx 0 must carry the CCCH");
        }
        let combined = c0.timeslots[0] == PchanKind::CcchSdcch4;
        if combined != (self.bts.ccch_conf == CcchConf::OneCombined) {
            return Err("ccch_conf must be \"1c\" exactly when timeslot 0 is ccch+sdcch4");
        }
        for trx in self.trx.iter().skip(1) {
            if trx.timeslots.iter().any(|ts| ts.has_ccch()) {
                return Err("only trx 0 may carry a CCCH");
            }
        }
        Ok(())
    }
}

/// Mutable, runtime-editable state (lock-protected).
#[derive(Debug, Clone, Default)]
pub struct BtsState {
    /// One bit per GSMTAP channel category selected for capture
    pub gsmtap_sapi_mask: u32,
    /// Capture associated control channels
    pub gsmtap_sapi_acch: bool,
}

/// Global shared configuration: immutable config + mutable state.
#[derive(Clone)]
pub struct SharedConfig {
    /// Read-only configuration (immutable after construction).
    cfg: Arc<BtsConfig>,
    /// Mutable state guarded with RwLock (write by operator commands, read by the tap).
    state: Arc<RwLock<BtsState>>,
}

impl SharedConfig {
    pub fn from_config(cfg: BtsConfig) -> Self {
        Self::from_parts(cfg, BtsState::default())
    }

    pub fn from_parts(cfg: BtsConfig, state: BtsState) -> Self {
        // Check config for validity before returning the SharedConfig object
        match cfg.validate() {
            Ok(_) => {}
            Err(e) => panic!("Invalid BTS configuration: {}", e),
        }

        Self {
            cfg: Arc::new(cfg),
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Access immutable config.
    pub fn config(&self) -> Arc<BtsConfig> {
        Arc::clone(&self.cfg)
    }

    /// Read guard for mutable state.
    pub fn state_read(&self) -> std::sync::RwLockReadGuard<'_, BtsState> {
        self.state.read().expect("BtsState RwLock blocked")
    }

    /// Write guard for mutable state.
    pub fn state_write(&self) -> std::sync::RwLockWriteGuard<'_, BtsState> {
        self.state.write().expect("BtsState RwLock blocked")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> BtsConfig {
        let mut cfg = BtsConfig::default();
        cfg.phy_link.backend = PhyBackend::Virtual;
        cfg.bts.ccch_conf = CcchConf::OneCombined;
        cfg
    }

    #[test]
    fn test_defaults_validate() {
        assert_eq!(valid().validate(), Ok(()));
        assert!(BtsConfig::default().validate().is_err());
    }

    #[test]
    fn test_radio_link_timeout_range() {
        for (rlt, ok) in [(-1, true), (0, false), (3, false), (4, true), (64, true), (65, false), (-2, false)] {
            let mut cfg = valid();
            cfg.bts.radio_link_timeout = rlt;
            assert_eq!(cfg.validate().is_ok(), ok, "rlt {}", rlt);
        }
    }

    #[test]
    fn test_hardware_backend_rejected() {
        let mut cfg = valid();
        cfg.phy_link.backend = PhyBackend::OsmoTrx;
        assert_eq!(cfg.validate(), Err("phy_link backend is not available in this build"));
    }

    #[test]
    fn test_ccch_conf_must_match_ts0() {
        let mut cfg = valid();
        cfg.bts.ccch_conf = CcchConf::One;
        assert!(cfg.validate().is_err());
        cfg.trx[0].timeslots[0] = PchanKind::Ccch;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_tsc_from_bsic() {
        let mut cfg = valid();
        cfg.bts.bsic = 0x2d;
        assert_eq!(cfg.bts.tsc(), 5);
    }

    #[test]
    fn test_shared_state_is_shared() {
        let shared = SharedConfig::from_config(valid());
        let clone = shared.clone();
        clone.state_write().gsmtap_sapi_mask = 0x42;
        assert_eq!(shared.state_read().gsmtap_sapi_mask, 0x42);
    }
}
