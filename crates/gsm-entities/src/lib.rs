pub mod bts;
pub mod gsmtap;
pub mod l1sap;
pub mod phy;
pub mod services;

// Re-export commonly used items
pub use bts::Bts;
pub use l1sap::{L1sapBs, L1sapError};
pub use phy::{PhyLink, PhyLinkError, PhyLinkState};
pub use services::BtsServices;
