//! Service access point primitives exchanged by the L1SAP bridge
//!
//! `l1sapmsg` holds the PHY facing primitive sum type; the other modules carry
//! the payloads handed to and received from the upper layer collaborators.

pub mod l1sapmsg;
pub mod lapdm;
pub mod mph;
pub mod oml;
pub mod pcu;
pub mod ph;
pub mod rsl;
pub mod rtp;

pub use l1sapmsg::*;
