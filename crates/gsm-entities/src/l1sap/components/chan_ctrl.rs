//! Helpers for channel activation

use gsm_core::ChanKind;
use gsm_saps::lapdm::{T200_NUM, T200Chan, T200Set};
use gsm_saps::rsl::RslCause;

/// T200 values for the LAPDm entities of a channel kind. None for kinds
/// without LAPDm.
pub fn t200_for(kind: ChanKind, t200_ms: &[u32; T200_NUM]) -> Option<T200Set> {
    let t = |chan: T200Chan| t200_ms[chan.idx()];
    match kind {
        ChanKind::Sdcch4 | ChanKind::Sdcch8 => Some(T200Set {
            dcch_sapi0_ms: t(T200Chan::Sdcch),
            dcch_sapi3_ms: t(T200Chan::SdcchSapi3),
            acch_sapi0_ms: t(T200Chan::SacchSdcch),
            acch_sapi3_ms: t(T200Chan::SacchSdcch),
        }),
        ChanKind::TchF => Some(T200Set {
            dcch_sapi0_ms: t(T200Chan::FacchF),
            dcch_sapi3_ms: t(T200Chan::FacchF),
            acch_sapi0_ms: t(T200Chan::SacchTchSapi0),
            acch_sapi3_ms: t(T200Chan::SacchTchSapi3),
        }),
        ChanKind::TchH => Some(T200Set {
            dcch_sapi0_ms: t(T200Chan::FacchH),
            dcch_sapi3_ms: t(T200Chan::FacchH),
            acch_sapi0_ms: t(T200Chan::SacchTchSapi0),
            acch_sapi3_ms: t(T200Chan::SacchTchSapi3),
        }),
        _ => None,
    }
}

/// The training sequence requested in a CHANNEL ACTIVATION must be the one
/// the carrier uses
pub fn check_tsc(tsc: Option<u8>, bts_tsc: u8) -> Result<(), RslCause> {
    match tsc {
        Some(tsc) if tsc != bts_tsc => Err(RslCause::ServOptUnimpl),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T200: [u32; T200_NUM] = [10, 11, 12, 13, 14, 15, 16];

    #[test]
    fn test_t200_selection() {
        assert_eq!(
            t200_for(ChanKind::Sdcch8, &T200),
            Some(T200Set { dcch_sapi0_ms: 10, dcch_sapi3_ms: 15, acch_sapi0_ms: 14, acch_sapi3_ms: 14 })
        );
        assert_eq!(
            t200_for(ChanKind::TchF, &T200),
            Some(T200Set { dcch_sapi0_ms: 11, dcch_sapi3_ms: 11, acch_sapi0_ms: 13, acch_sapi3_ms: 16 })
        );
        assert_eq!(t200_for(ChanKind::TchH, &T200).map(|t| t.dcch_sapi0_ms), Some(12));
        assert_eq!(t200_for(ChanKind::OsmoPdch, &T200), None);
    }

    #[test]
    fn test_tsc() {
        assert_eq!(check_tsc(None, 3), Ok(()));
        assert_eq!(check_tsc(Some(3), 3), Ok(()));
        assert_eq!(check_tsc(Some(2), 3), Err(RslCause::ServOptUnimpl));
    }
}
