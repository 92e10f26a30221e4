//! Ciphering bootstrap
//!
//! The BTS does not parse RR. It recognizes the CIPHERING MODE COMMAND in the
//! downlink main channel block, enables uplink deciphering, and enables
//! downlink ciphering once the MS sends its first I-frame acknowledging the
//! command. The N(S)/N(R) match is a heuristic and may misfire on
//! retransmissions.

use gsm_pdus::lapdm::{ADDR_SAPI0_CMD_NET, ADDR_SAPI0_RESP_MS, LapdmHeader};
use gsm_pdus::rr::{L3Header, RrMsgType};
use gsm_saps::mph::{CiphCnf, CiphReq};

use crate::bts::{CiphState, Lchan};

/// Minimum frame length carrying the RR message type octet
const CMC_MIN_LEN: usize = LapdmHeader::L3_OFFSET + 2;

/// True for a SAPI 0 command frame carrying an RR CIPHERING MODE COMMAND
pub fn is_ciph_mode_cmd(data: &[u8]) -> bool {
    if data.len() < CMC_MIN_LEN || data[0] != ADDR_SAPI0_CMD_NET {
        return false;
    }
    match L3Header::from_bytes(&data[LapdmHeader::L3_OFFSET..]) {
        Ok(l3) => l3.expect_rr(RrMsgType::CiphModeCmd).is_ok(),
        Err(_) => false,
    }
}

/// Inspects a downlink main channel block. On a CIPHERING MODE COMMAND the
/// expected sequence number is stored and the uplink direction requested.
pub fn check_dl_block(lchan: &mut Lchan, chan_nr: u8, data: &[u8]) -> Option<CiphReq> {
    if !matches!(lchan.ciph_state, CiphState::None | CiphState::RxRequested) {
        return None;
    }
    if !is_ciph_mode_cmd(data) {
        return None;
    }

    let n_s = (data[1] >> 1) & 0x07;
    lchan.ciph_ns = (n_s + 1) % 8;
    lchan.ciph_state = CiphState::RxRequested;
    tracing::debug!("{} CIPHERING MODE COMMAND N(S)={}, enabling uplink deciphering", lchan.id, n_s);
    Some(CiphReq { chan_nr, downlink: false, uplink: true })
}

/// PHY confirmed a ciphering request. Returns true if the state advanced.
pub fn on_confirm(lchan: &mut Lchan, cnf: &CiphCnf) -> bool {
    if lchan.ciph_state == CiphState::RxRequested && cnf.uplink && cnf.cause == 0 {
        lchan.ciph_state = CiphState::RxConfirmed;
        tracing::debug!("{} uplink deciphering confirmed", lchan.id);
        return true;
    }
    tracing::info!(
        "{} ignoring ciphering confirm dl={} ul={} cause={} in state {:?}",
        lchan.id, cnf.downlink, cnf.uplink, cnf.cause, lchan.ciph_state
    );
    false
}

/// Inspects an uplink frame. The first I-frame whose sequence field matches
/// the stored value enables downlink ciphering.
pub fn check_ul_frame(lchan: &mut Lchan, chan_nr: u8, data: &[u8]) -> Option<CiphReq> {
    if lchan.ciph_state != CiphState::RxConfirmed || data.len() < 2 {
        return None;
    }
    if data[0] != ADDR_SAPI0_RESP_MS || data[1] & 0x01 != 0 {
        return None;
    }
    if data[1] >> 5 != lchan.ciph_ns {
        return None;
    }

    lchan.ciph_state = CiphState::TxEnabled;
    tracing::debug!("{} first ciphered uplink frame, enabling downlink ciphering", lchan.id);
    Some(CiphReq { chan_nr, downlink: true, uplink: false })
}
