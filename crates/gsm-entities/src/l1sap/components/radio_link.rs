//! Radio link supervision (TS 45.008 5.2): counter S per lchan, driven by
//! SACCH frame quality

use gsm_saps::rsl::RslCause;

use crate::bts::Lchan;

/// Updates S for one received SACCH frame. Returns the cause to report to
/// RSL when the link is declared failed.
pub fn on_sacch_frame(lchan: &mut Lchan, ceiling: i32, bad_frame: bool) -> Option<RslCause> {
    if ceiling < 0 {
        return None;
    }
    if lchan.s == 0 {
        tracing::debug!("{} radio link counter S already 0", lchan.id);
        return None;
    }

    if bad_frame {
        lchan.s -= 1;
        tracing::debug!("{} counting down radio link counter S={}", lchan.id, lchan.s);
        if lchan.s == 0 {
            tracing::warn!("{} radio link failure", lchan.id);
            return Some(RslCause::RadioLinkFail);
        }
        return None;
    }

    if lchan.s < ceiling {
        lchan.s = (lchan.s + 2).min(ceiling);
        tracing::debug!("{} counting up radio link counter S={}", lchan.id, lchan.s);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsm_core::LchanId;
    use proptest::prelude::*;
    use crate::bts::LchanType;

    fn lchan(s: i32) -> Lchan {
        let mut lchan = Lchan::new(LchanId::new(0, 1, 0), LchanType::TchF);
        lchan.s = s;
        lchan
    }

    #[test]
    fn test_count_down_to_failure() {
        let mut lchan = lchan(4);
        for expected in [3, 2, 1] {
            assert_eq!(on_sacch_frame(&mut lchan, 4, true), None);
            assert_eq!(lchan.s, expected);
        }
        assert_eq!(on_sacch_frame(&mut lchan, 4, true), Some(RslCause::RadioLinkFail));
        assert_eq!(lchan.s, 0);

        // Sticky, no repeated report and no recovery
        assert_eq!(on_sacch_frame(&mut lchan, 4, true), None);
        assert_eq!(on_sacch_frame(&mut lchan, 4, false), None);
        assert_eq!(lchan.s, 0);
    }

    #[test]
    fn test_count_up_clamped() {
        let mut lchan = lchan(31);
        on_sacch_frame(&mut lchan, 32, false);
        assert_eq!(lchan.s, 32);
        on_sacch_frame(&mut lchan, 32, false);
        assert_eq!(lchan.s, 32);
    }

    #[test]
    fn test_disabled() {
        let mut lchan = lchan(1);
        assert_eq!(on_sacch_frame(&mut lchan, -1, true), None);
        assert_eq!(lchan.s, 1);
    }

    proptest! {
        #[test]
        fn prop_s_within_bounds(ceiling in 4i32..=64, frames in proptest::collection::vec(any::<bool>(), 0..300)) {
            let mut lchan = lchan(ceiling);
            let mut failures = 0;
            for bad in frames {
                let was_zero = lchan.s == 0;
                if on_sacch_frame(&mut lchan, ceiling, bad).is_some() {
                    failures += 1;
                }
                prop_assert!(lchan.s >= 0 && lchan.s <= ceiling);
                if was_zero {
                    prop_assert_eq!(lchan.s, 0);
                }
            }
            prop_assert!(failures <= 1);
        }
    }
}
