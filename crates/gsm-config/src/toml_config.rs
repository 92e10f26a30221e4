use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use gsm_core::{CcchConf, NUM_TS, PchanKind};
use gsm_pdus::gsmtap::{GSMTAP_SAPI_ACCH_NAME, sapi_by_name, sapi_mask_bit};
use gsm_saps::lapdm::T200_NUM;

use super::stack_config::{BtsConfig, BtsState, CfgBts, CfgGsmtap, CfgPhyLink, CfgTrx, PhyBackend, SharedConfig};

/// Build `SharedConfig` from a TOML configuration file
pub fn from_toml_str(toml_str: &str) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    // Various sanity checks
    let expected_config_version = "0.1";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }
    if let Some(ref phy) = root.phy_link {
        if !phy.extra.is_empty() {
            return Err(format!("Unrecognized fields: phy_link::{:?}", sorted_keys(&phy.extra)).into());
        }
    }
    if let Some(ref bts) = root.bts {
        if !bts.extra.is_empty() {
            return Err(format!("Unrecognized fields in bts: {:?}", sorted_keys(&bts.extra)).into());
        }
    }
    for (idx, trx) in root.trx.iter().enumerate() {
        if !trx.extra.is_empty() {
            return Err(format!("Unrecognized fields in trx {}: {:?}", idx, sorted_keys(&trx.extra)).into());
        }
        if trx.timeslots.len() != NUM_TS {
            return Err(format!("trx {} must list exactly {} timeslots, found {}", idx, NUM_TS, trx.timeslots.len()).into());
        }
    }
    if let Some(ref tap) = root.gsmtap {
        if !tap.extra.is_empty() {
            return Err(format!("Unrecognized fields in gsmtap: {:?}", sorted_keys(&tap.extra)).into());
        }
    }

    // Build config from required and optional values
    let mut cfg = BtsConfig {
        debug_log: root.debug_log,
        bts: CfgBts::default(),
        trx: vec![],
        gsmtap: CfgGsmtap::default(),
        phy_link: CfgPhyLink::default(),
    };

    if let Some(phy) = root.phy_link {
        cfg.phy_link.backend = phy.backend;
    }

    if let Some(bts) = root.bts {
        apply_bts_patch(&mut cfg.bts, bts)?;
    }

    for trx in root.trx {
        let mut timeslots = [PchanKind::None; NUM_TS];
        timeslots.copy_from_slice(&trx.timeslots);
        cfg.trx.push(CfgTrx { arfcn: trx.arfcn, timeslots });
    }

    // Runtime state: capture filter from the selected category names
    let mut state = BtsState::default();
    if let Some(tap) = root.gsmtap {
        apply_gsmtap_patch(&mut cfg.gsmtap, &mut state, tap)?;
    }

    cfg.validate()?;
    Ok(SharedConfig::from_parts(cfg, state))
}

/// Build `SharedConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build `SharedConfig` from a file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    let r = BufReader::new(f);
    let cfg = from_reader(r)?;
    Ok(cfg)
}

fn apply_bts_patch(dst: &mut CfgBts, src: BtsDto) -> Result<(), Box<dyn std::error::Error>> {
    dst.bsic = src.bsic;

    if let Some(v) = src.max_ta {
        dst.max_ta = v;
    }
    if let Some(v) = src.radio_link_timeout {
        dst.radio_link_timeout = v;
    }
    if let Some(v) = src.t200_ms {
        if v.len() != T200_NUM {
            return Err(format!("bts.t200_ms must list exactly {} values, found {}", T200_NUM, v.len()).into());
        }
        dst.t200_ms.copy_from_slice(&v);
    }
    if let Some(v) = src.dtx_dl {
        dst.dtx_dl = v;
    }
    if let Some(v) = src.dtx_ul {
        dst.dtx_ul = v;
    }
    if let Some(v) = src.num_agch {
        dst.num_agch = v;
    }
    if let Some(v) = src.ccch_conf {
        dst.ccch_conf = v;
    }
    Ok(())
}

fn apply_gsmtap_patch(dst: &mut CfgGsmtap, state: &mut BtsState, src: GsmtapDto) -> Result<(), Box<dyn std::error::Error>> {
    dst.enabled = src.enabled;
    if let Some(v) = src.remote_host {
        dst.remote_host = v;
    }
    if let Some(v) = src.remote_port {
        dst.remote_port = v;
    }
    if let Some(sapis) = src.sapis {
        for name in &sapis {
            if name.eq_ignore_ascii_case(GSMTAP_SAPI_ACCH_NAME) {
                state.gsmtap_sapi_acch = true;
            } else if let Some(chan) = sapi_by_name(name) {
                state.gsmtap_sapi_mask |= sapi_mask_bit(chan.into_raw());
            } else {
                return Err(format!("Unrecognized gsmtap sapi: {}", name).into());
            }
        }
        dst.sapis = sapis;
    }
    Ok(())
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&str> {
    let mut v: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

/// ----------------------- DTOs for input shape -----------------------

#[derive(Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    debug_log: Option<String>,

    #[serde(default)]
    phy_link: Option<PhyLinkDto>,

    #[serde(default)]
    bts: Option<BtsDto>,

    #[serde(default)]
    trx: Vec<TrxDto>,

    #[serde(default)]
    gsmtap: Option<GsmtapDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct PhyLinkDto {
    pub backend: PhyBackend,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Default, Deserialize)]
struct BtsDto {
    pub bsic: u8,
    pub max_ta: Option<u8>,
    pub radio_link_timeout: Option<i32>,
    pub t200_ms: Option<Vec<u32>>,
    pub dtx_dl: Option<bool>,
    pub dtx_ul: Option<bool>,
    pub num_agch: Option<u8>,
    pub ccch_conf: Option<CcchConf>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct TrxDto {
    pub arfcn: u16,
    pub timeslots: Vec<PchanKind>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Default, Deserialize)]
struct GsmtapDto {
    #[serde(default)]
    pub enabled: bool,
    pub remote_host: Option<String>,
    pub remote_port: Option<u16>,
    pub sapis: Option<Vec<String>>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}
