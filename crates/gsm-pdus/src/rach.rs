//! Random access code classification (TS 44.018 9.1.8, TS 44.060 11.2.5)

/// Class of an uplink access burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RachClass {
    /// Circuit switched access, answered by an immediate assignment on CCCH
    Rr,
    /// Packet channel request, handled by the PCU
    Packet,
}

/// 8-bit packet channel request: 0111xxxx, except 01111111
#[inline]
pub fn is_packet_ra8(ra: u8) -> bool {
    ra & 0xf0 == 0x70 && ra & 0x0f != 0x0f
}

/// 11-bit access bursts are only ever sent for packet access (EGPRS)
pub fn classify(ra: u16, is_11bit: bool) -> RachClass {
    if is_11bit || (ra <= 0xff && is_packet_ra8(ra as u8)) {
        RachClass::Packet
    } else {
        RachClass::Rr
    }
}
