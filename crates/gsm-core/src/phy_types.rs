//! PHY-facing types that are used across multiple layers
//!
//! These originate at the radio interface but are referenced by the BTS data
//! model, the SAP primitives and the configuration, so they live in gsm-core.

use serde::Deserialize;

/// Physical channel configuration of a timeslot (TS 45.002 / TS 48.058)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PchanKind {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "ccch")]
    Ccch,
    #[serde(rename = "ccch+sdcch4")]
    CcchSdcch4,
    #[serde(rename = "tch/f")]
    TchF,
    #[serde(rename = "tch/h")]
    TchH,
    #[serde(rename = "sdcch8")]
    Sdcch8,
    #[serde(rename = "pdch")]
    Pdch,
    /// ip.access style dynamic TCH/F or PDCH
    #[serde(rename = "tch/f_pdch")]
    TchFPdch,
    /// Osmocom style dynamic TCH/F, TCH/H or PDCH
    #[serde(rename = "tch/f_tch/h_pdch")]
    TchFTchHPdch,
}

impl PchanKind {
    /// Number of dedicated lchans carried by this configuration. Dynamic
    /// timeslots reserve room for their densest mode.
    pub fn num_lchans(self) -> usize {
        match self {
            PchanKind::None => 0,
            PchanKind::CcchSdcch4 => 4,
            PchanKind::Sdcch8 => 8,
            PchanKind::TchH | PchanKind::TchFTchHPdch => 2,
            _ => 1,
        }
    }

    pub fn is_dynamic(self) -> bool {
        matches!(self, PchanKind::TchFPdch | PchanKind::TchFTchHPdch)
    }

    pub fn has_ccch(self) -> bool {
        matches!(self, PchanKind::Ccch | PchanKind::CcchSdcch4)
    }
}

/// CCCH configuration as broadcast in SI3 (TS 44.018 10.5.2.11)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum CcchConf {
    /// One CCCH combined with SDCCH/4
    #[serde(rename = "1c")]
    OneCombined,
    #[default]
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
}

/// Access burst training sequence (TS 45.002 5.2.7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessBurstType {
    #[default]
    Ts0 = 0,
    Ts1 = 1,
    Ts2 = 2,
}

impl TryFrom<u8> for AccessBurstType {
    type Error = ();
    fn try_from(x: u8) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(AccessBurstType::Ts0),
            1 => Ok(AccessBurstType::Ts1),
            2 => Ok(AccessBurstType::Ts2),
            _ => Err(()),
        }
    }
}

/// Which halves of an uplink PDTCH block were decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresInfo {
    #[default]
    Invalid,
    Header,
    First,
    Second,
    Both,
}
