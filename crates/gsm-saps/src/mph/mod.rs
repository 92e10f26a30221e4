//! MPH-INFO primitives: channel control, time and measurement reporting

/// Sub-type of an MPH-INFO primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MphInfoType {
    Time = 0,
    Meas = 1,
    Activate = 2,
    Deactivate = 3,
    Modify = 4,
    ActCiph = 5,
}

impl MphInfoType {
    pub fn into_raw(self) -> u8 {
        self as u8
    }
}

/// PRIM_INFO_TIME: frame number of the next frame to be transmitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInd {
    pub fn_nr: u32,
}

/// PRIM_INFO_MEAS: per-burst uplink measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasInd {
    pub chan_nr: u8,
    pub fn_nr: u32,
    pub ta_offs_qbits: i16,
    pub ber10k: u16,
    /// Received level as positive dB below 0 dBm
    pub inv_rssi: u8,
}

/// Activation / deactivation / modification request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActReq {
    pub chan_nr: u8,
    /// Only (de)activate the SACCH
    pub sacch_only: bool,
}

/// Activation / deactivation confirm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActCnf {
    pub chan_nr: u8,
    /// 0 on success, RSL cause otherwise
    pub cause: u8,
}

/// Ciphering activation request. Each flag enables that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CiphReq {
    pub chan_nr: u8,
    pub downlink: bool,
    pub uplink: bool,
}

/// Ciphering activation confirm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CiphCnf {
    pub chan_nr: u8,
    pub downlink: bool,
    pub uplink: bool,
    pub cause: u8,
}

/// MPH-INFO payload. Which variants are valid depends on the operation:
/// indications carry Time/Meas, confirms carry Activate/Deactivate/Ciph,
/// requests carry Activate/Deactivate/Modify/Ciph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MphInfo {
    Time(TimeInd),
    Meas(MeasInd),
    ActivateReq(ActReq),
    DeactivateReq(ActReq),
    ModifyReq(ActReq),
    CiphReq(CiphReq),
    ActivateCnf(ActCnf),
    DeactivateCnf(ActCnf),
    CiphCnf(CiphCnf),
}

impl MphInfo {
    pub fn info_type(&self) -> MphInfoType {
        match self {
            MphInfo::Time(_) => MphInfoType::Time,
            MphInfo::Meas(_) => MphInfoType::Meas,
            MphInfo::ActivateReq(_) | MphInfo::ActivateCnf(_) => MphInfoType::Activate,
            MphInfo::DeactivateReq(_) | MphInfo::DeactivateCnf(_) => MphInfoType::Deactivate,
            MphInfo::ModifyReq(_) => MphInfoType::Modify,
            MphInfo::CiphReq(_) | MphInfo::CiphCnf(_) => MphInfoType::ActCiph,
        }
    }
}
