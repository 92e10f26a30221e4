use std::collections::VecDeque;

use gsm_saps::rtp::RtpFrame;

/// Downlink frame queue of an lchan, shared by the RTP path and the loopback
/// modes. Holds at most `limit` frames; inserting into a full queue drops the
/// oldest first.
#[derive(Debug, Clone)]
pub struct DlQueue {
    frames: VecDeque<RtpFrame>,
    limit: usize,
}

impl Default for DlQueue {
    fn default() -> Self {
        Self::with_limit(1)
    }
}

impl DlQueue {
    pub fn with_limit(limit: usize) -> Self {
        DlQueue { frames: VecDeque::with_capacity(limit + 1), limit }
    }

    /// Enqueues a frame, returns how many older frames were dropped to make room
    pub fn push(&mut self, frame: RtpFrame) -> usize {
        let mut dropped = 0;
        while self.frames.len() >= self.limit && !self.frames.is_empty() {
            self.frames.pop_front();
            dropped += 1;
        }
        self.frames.push_back(frame);
        dropped
    }

    pub fn pop(&mut self) -> Option<RtpFrame> {
        self.frames.pop_front()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_keeps_most_recent() {
        let mut q = DlQueue::default();
        assert_eq!(q.push(RtpFrame { seq: 1, ..Default::default() }), 0);
        assert_eq!(q.push(RtpFrame { seq: 2, ..Default::default() }), 1);
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop().map(|f| f.seq), Some(2));
        assert!(q.pop().is_none());
    }

    proptest! {
        #[test]
        fn prop_depth_never_exceeds_one(seqs in proptest::collection::vec(any::<u16>(), 1..50), pops in 0usize..3) {
            let mut q = DlQueue::default();
            for (i, seq) in seqs.iter().enumerate() {
                q.push(RtpFrame { seq: *seq, ..Default::default() });
                prop_assert!(q.len() <= 1);
                if i % 7 == 0 {
                    for _ in 0..pops {
                        q.pop();
                    }
                }
            }
            if !q.is_empty() {
                prop_assert_eq!(q.pop().map(|f| f.seq), seqs.last().copied());
            }
        }
    }
}
