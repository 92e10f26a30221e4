use gsm_core::GSM_RTP_DURATION;
use gsm_core::gsm_time::fn_diff;

/// RTP timestamp increment for an uplink voice frame. With uplink DTX the
/// MS may skip frames, so the elapsed TDMA frames are converted into samples
/// and rounded to whole RTP frames.
pub fn fn_ms_adj(fn_nr: u32, last_fn: Option<u32>, dtx_ul: bool) -> u32 {
    let Some(last_fn) = last_fn else {
        return GSM_RTP_DURATION;
    };
    if !dtx_ul {
        return GSM_RTP_DURATION;
    }

    // 12 of 13 frames carry speech, one RTP frame per 4 TDMA frames
    let frames = fn_diff(fn_nr, last_fn).max(0) as u32;
    let samples = frames * 12 * GSM_RTP_DURATION / (13 * 4);
    let r = samples + GSM_RTP_DURATION / 2;
    r - r % GSM_RTP_DURATION
}
