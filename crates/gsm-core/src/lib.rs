//! Core utilities for the GSM L1SAP bridge
//!
//! This crate provides fundamental types and utilities used across the stack:
//! - Channel number / link identifier codec (RSL chan_nr)
//! - GsmTime for TDMA frame timing and frame-number derived block indices
//! - Msgb, an owned frame buffer with layer-2 offset bookkeeping
//! - PHY types (physical channel configuration, access bursts, presence info)
//! - Common constants, macros and debug utilities

pub mod chan_nr;
pub mod debug;
pub mod gsm_common;
pub mod gsm_time;
pub mod msgb;
pub mod pdu_parse_error;
pub mod phy_types;

// Re-export commonly used items
pub use chan_nr::{ChanAddr, ChanKind, ChanNrError};
pub use gsm_common::*;
pub use gsm_time::GsmTime;
pub use msgb::Msgb;
pub use pdu_parse_error::PduParseErr;
pub use phy_types::*;
