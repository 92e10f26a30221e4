mod common;

use gsm_core::{LchanId, Msgb, debug};
use gsm_entities::bts::CiphState;
use gsm_saps::L1sapPrim;
use gsm_saps::lapdm::LapdmLink;
use gsm_saps::mph::{CiphCnf, CiphReq, MphInfo};
use gsm_saps::ph::PhDataParam;
use common::{ComponentTest, Upcall, data_req, default_test_config};

/// LAPDm I-frame with N(S)=3 carrying a CIPHERING MODE COMMAND
const CMC_NS3: [u8; 6] = [0x03, 0x06, 0x0d, 0x06, 0x35, 0x11];

#[test]
fn test_ciphering_bootstrap_on_sdcch() {
    debug::setup_logging_verbose();
    let mut test = ComponentTest::new(default_test_config());
    test.activate(0, 0x28);
    let id = LchanId::new(0, 0, 1);

    // Downlink CMC: uplink deciphering is requested ahead of the block itself
    test.recorder().enqueue(id, LapdmLink::Dcch, &CMC_NS3);
    let prims = test.ph_rts(0, 0x28, 0, 100);
    assert_eq!(prims.len(), 2);
    assert_eq!(
        prims[0],
        L1sapPrim::MphInfoReq(MphInfo::CiphReq(CiphReq { chan_nr: 0x28, downlink: false, uplink: true }))
    );
    assert_eq!(&data_req(&prims).msg.data()[..6], &CMC_NS3);
    assert_eq!(test.lchan_mut(id).ciph_state, CiphState::RxRequested);
    assert_eq!(test.lchan_mut(id).ciph_ns, 4);

    let cnf = CiphCnf { chan_nr: 0x28, downlink: false, uplink: true, cause: 0 };
    test.l1sap.up(0, L1sapPrim::MphInfoCnf(MphInfo::CiphCnf(cnf))).unwrap();
    assert_eq!(test.lchan_mut(id).ciph_state, CiphState::RxConfirmed);

    // An uplink I-frame with the wrong sequence number changes nothing
    let frame = PhDataParam::req(0x28, 0, 104, Msgb::from_l2(vec![0x01, 5 << 5, 0x01]));
    test.l1sap.up(0, L1sapPrim::PhDataInd(frame)).unwrap();
    assert!(test.take_sent().is_empty());

    // The acknowledging I-frame enables the downlink
    let frame = PhDataParam::req(0x28, 0, 108, Msgb::from_l2(vec![0x01, 4 << 5, 0x01]));
    test.l1sap.up(0, L1sapPrim::PhDataInd(frame)).unwrap();
    let sent = test.take_sent();
    assert_eq!(
        sent,
        vec![(0, L1sapPrim::MphInfoReq(MphInfo::CiphReq(CiphReq { chan_nr: 0x28, downlink: true, uplink: false })))]
    );
    assert_eq!(test.lchan_mut(id).ciph_state, CiphState::TxEnabled);

    // Both frames still reach LAPDm
    let upcalls = test.take_upcalls();
    let frames: Vec<Vec<u8>> = upcalls
        .into_iter()
        .filter_map(|u| match u {
            Upcall::PhsapUp(lchan, LapdmLink::Dcch, data) if lchan == id => Some(data.msg.into_vec()),
            _ => None,
        })
        .collect();
    assert_eq!(frames, vec![vec![0x01, 5 << 5, 0x01], vec![0x01, 4 << 5, 0x01]]);
}

#[test]
fn test_ciphering_state_cleared_by_release() {
    debug::setup_logging_verbose();
    let mut test = ComponentTest::new(default_test_config());
    test.activate(0, 0x28);
    let id = LchanId::new(0, 0, 1);
    test.recorder().enqueue(id, LapdmLink::Dcch, &CMC_NS3);
    test.ph_rts(0, 0x28, 0, 100);
    assert_eq!(test.lchan_mut(id).ciph_state, CiphState::RxRequested);

    test.l1sap.chan_rel(0, 0x28).unwrap();
    let cnf = gsm_saps::mph::ActCnf { chan_nr: 0x28, cause: 0 };
    test.l1sap.up(0, L1sapPrim::MphInfoCnf(MphInfo::DeactivateCnf(cnf))).unwrap();
    assert_eq!(test.lchan_mut(id).ciph_state, CiphState::None);
    assert_eq!(test.lchan_mut(id).ciph_ns, 0);
}
