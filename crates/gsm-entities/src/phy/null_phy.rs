use gsm_saps::L1sapPrim;

use super::{PhyLink, PhyLinkError, PhyLinkState};

/// Accepts and drops all primitives. Never produces anything upward.
#[derive(Debug, Default)]
pub struct NullPhy {
    dropped: u64,
}

impl NullPhy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl PhyLink for NullPhy {
    fn state(&self) -> PhyLinkState {
        PhyLinkState::Connected
    }

    fn l1sap_down(&mut self, trx: u8, prim: L1sapPrim) -> Result<(), PhyLinkError> {
        tracing::trace!("null phy trx={} drops {}", trx, prim);
        self.dropped += 1;
        Ok(())
    }

    fn ts_disconnect(&mut self, _trx: u8, _tn: u8) -> Result<(), PhyLinkError> {
        Ok(())
    }
}
