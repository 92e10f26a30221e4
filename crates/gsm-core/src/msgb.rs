//! Owned frame buffer with layer-1 / layer-2 split bookkeeping.
//!
//! Frames crossing the L1SAP carry an optional L1 header (e.g. the two SACCH
//! header octets) in front of the L2 payload. Instead of headroom pointer
//! arithmetic, the buffer keeps the offset where L2 starts.

use core::fmt;

use crate::gsm_common::hexdump;

#[derive(Clone, PartialEq, Eq, Default)]
pub struct Msgb {
    data: Vec<u8>,
    /// Offset of the first L2 octet within `data`
    l2h: usize,
}

impl Msgb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Msgb { data: Vec::with_capacity(capacity), l2h: 0 }
    }

    /// Buffer holding only L2 data
    pub fn from_l2(l2: impl Into<Vec<u8>>) -> Self {
        Msgb { data: l2.into(), l2h: 0 }
    }

    /// Buffer with an L1 header followed by L2 data
    pub fn from_parts(l1: &[u8], l2: &[u8]) -> Self {
        let mut data = Vec::with_capacity(l1.len() + l2.len());
        data.extend_from_slice(l1);
        data.extend_from_slice(l2);
        Msgb { data, l2h: l1.len() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn l1(&self) -> &[u8] {
        &self.data[..self.l2h]
    }

    pub fn l2(&self) -> &[u8] {
        &self.data[self.l2h..]
    }

    pub fn l2_len(&self) -> usize {
        self.data.len() - self.l2h
    }

    /// Appends bytes at the tail
    pub fn put(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Appends `len` zero bytes and returns them for filling in
    pub fn put_zeroed(&mut self, len: usize) -> &mut [u8] {
        let start = self.data.len();
        self.data.resize(start + len, 0);
        &mut self.data[start..]
    }

    /// Marks the first `len` octets as L1 header. Clamped to the buffer length.
    pub fn set_l1_len(&mut self, len: usize) {
        self.l2h = len.min(self.data.len());
    }

    /// Drops the L1 header, leaving only L2 data
    pub fn pull_l1(&mut self) {
        self.data.drain(..self.l2h);
        self.l2h = 0;
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl fmt::Debug for Msgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.l2h > 0 {
            write!(f, "[{}] {}", hexdump(self.l1()), hexdump(self.l2()))
        } else {
            write!(f, "{}", hexdump(&self.data))
        }
    }
}
