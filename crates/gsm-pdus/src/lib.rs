//! Frame-level PDU views inspected at the L1SAP boundary
//!
//! The bridge never runs the link layer or RR itself; it only peeks at a few
//! header octets (LAPDm address/control, RR protocol discriminator and message
//! type), classifies random access codes, and builds GSMTAP headers.

pub mod gsmtap;
pub mod lapdm;
pub mod rach;
pub mod rr;
