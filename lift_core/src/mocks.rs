//! Views for tests and headless runs.

use crate::status::Snapshot;
use crate::view::CarView;

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl CarView for NullView {
    fn render(&mut self, _snapshot: &Snapshot) {}
}

/// Keeps every snapshot whose visible state differs from the previous one.
#[derive(Debug, Default, Clone)]
pub struct RecordingView {
    pub frames: Vec<Snapshot>,
    pub finished: Option<Snapshot>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Floors the car stopped at, in order, with repeats collapsed.
    pub fn stops(&self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        for f in self.frames.iter().filter(|s| !s.is_moving) {
            if out.last() != Some(&f.current_floor) {
                out.push(f.current_floor);
            }
        }
        out
    }
}

impl CarView for RecordingView {
    fn render(&mut self, snapshot: &Snapshot) {
        let changed = self
            .frames
            .last()
            .is_none_or(|last| !last.same_state(snapshot));
        if changed {
            self.frames.push(snapshot.clone());
        }
    }

    fn finish(&mut self, snapshot: &Snapshot) {
        self.finished = Some(snapshot.clone());
    }
}
