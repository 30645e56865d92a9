//! Rolling per-bin smoothing and the fixed-capacity waveform history ring.

use std::collections::VecDeque;

/// Per-bin exponential follower: v += (target - v) · factor.
/// Used by the waveform mode so the trace eases toward the signal instead of
/// jumping, with a time constant set by the configured smoothing factor.
#[derive(Clone, Debug, Default)]
pub struct SmoothedTrace {
    values: Vec<f32>,
}

impl SmoothedTrace {
    /// Resize (and re-center) when the buffer length changes; keeps the
    /// current values otherwise.
    pub fn ensure_len(&mut self, len: usize, initial: f32) {
        if self.values.len() != len {
            self.values = vec![initial; len];
        }
    }

    pub fn follow(&mut self, i: usize, target: f32, factor: f32) -> f32 {
        let v = &mut self.values[i];
        *v += (target - *v) * factor;
        *v
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// FIFO ring of byte-buffer snapshots, newest first, fixed capacity.
/// Shared by the sheet modes; eviction drops the oldest slice.
#[derive(Clone, Debug)]
pub struct HistoryRing {
    frames: VecDeque<Vec<u8>>,
    capacity: usize,
}

impl HistoryRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, snapshot: &[u8]) {
        self.frames.push_front(snapshot.to_vec());
        while self.frames.len() > self.capacity {
            self.frames.pop_back();
        }
    }

    /// Snapshots newest first.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.frames.iter().map(|f| f.as_slice())
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

    #[test]
    fn trace_converges_to_target() {
        let mut trace = SmoothedTrace::default();
        trace.ensure_len(1, 0.0);
        let mut last = 0.0;
        for _ in 0..60 {
            last = trace.follow(0, 10.0, 0.2);
        }
        assert!((last - 10.0).abs() < 1e-4);
    }

    #[test]
    fn ensure_len_preserves_values_when_unchanged() {
        let mut trace = SmoothedTrace::default();
        trace.ensure_len(4, 1.0);
        trace.follow(2, 3.0, 0.5);
        trace.ensure_len(4, 1.0);
        assert_eq!(trace.values()[2], 2.0);
    }

    #[test]
    fn ring_evicts_oldest_beyond_capacity() {
        let mut ring = HistoryRing::new(3);
        for i in 0..5u8 {
            ring.push(&[i]);
        }
        assert_eq!(ring.len(), 3);
        let newest_first: Vec<u8> = ring.iter().map(|f| f[0]).collect();
        assert_eq!(newest_first, vec![4, 3, 2]);
    }

    #[test]
    fn ring_survives_clear() {
        let mut ring = HistoryRing::new(2);
        ring.push(&[1]);
        ring.clear();
        assert!(ring.is_empty());
        ring.push(&[2]);
        assert_eq!(ring.len(), 1);
    }
}
