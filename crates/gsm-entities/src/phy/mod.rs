//! PHY link: the opaque radio backend below the L1SAP

pub mod null_phy;
pub mod virtual_phy;

use as_any::AsAny;

use gsm_config::{BtsConfig, PhyBackend};
use gsm_saps::L1sapPrim;

pub use null_phy::NullPhy;
pub use virtual_phy::VirtualPhy;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhyLinkError {
    /// The backend does not handle this primitive
    #[error("unsupported primitive: {0}")]
    Unsupported(String),
    #[error("phy link not connected")]
    NotConnected,
    #[error("phy link i/o error: {0}")]
    Io(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhyLinkState {
    #[default]
    Shutdown,
    Connecting,
    Connected,
}

pub trait PhyLink: AsAny {
    fn state(&self) -> PhyLinkState;

    /// Hands one downward primitive to the PHY of carrier `trx`
    fn l1sap_down(&mut self, trx: u8, prim: L1sapPrim) -> Result<(), PhyLinkError>;

    /// Tears down the physical channel of a timeslot, after a dynamic
    /// TCH/F_PDCH switch was deactivated
    fn ts_disconnect(&mut self, trx: u8, tn: u8) -> Result<(), PhyLinkError>;
}

/// Instantiates the backend selected in the configuration
pub fn create_phy_link(cfg: &BtsConfig) -> Result<Box<dyn PhyLink>, PhyLinkError> {
    match cfg.phy_link.backend {
        PhyBackend::None => Ok(Box::new(NullPhy::new())),
        PhyBackend::Virtual => Ok(Box::new(VirtualPhy::new(cfg))),
        other => Err(PhyLinkError::Unsupported(format!("backend {:?}", other))),
    }
}
