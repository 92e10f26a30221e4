//! Voice frames exchanged with the RTP transport

/// One downlink voice frame queued for the next TCH-RTS, together with the
/// RTP header fields it arrived with
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RtpFrame {
    pub payload: Vec<u8>,
    pub seq: u16,
    pub timestamp: u32,
    pub marker: bool,
}

impl RtpFrame {
    /// Frame looped back from the uplink, no RTP header fields
    pub fn looped(payload: Vec<u8>) -> Self {
        RtpFrame { payload, ..Default::default() }
    }
}

/// Uplink voice frame handed to the RTP transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpTx {
    pub payload: Vec<u8>,
    /// Timestamp increment since the previous frame, 8 kHz samples
    pub duration: u32,
    pub marker: bool,
}
