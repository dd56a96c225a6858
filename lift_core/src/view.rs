//! Presentation seam. Renderers receive a snapshot after every tick and never
//! mutate controller state.

use crate::status::Snapshot;

pub trait CarView {
    fn render(&mut self, snapshot: &Snapshot);

    /// Called once when a run ends, with the last snapshot.
    fn finish(&mut self, _snapshot: &Snapshot) {}
}

impl<V: CarView + ?Sized> CarView for &mut V {
    fn render(&mut self, snapshot: &Snapshot) {
        (**self).render(snapshot);
    }

    fn finish(&mut self, snapshot: &Snapshot) {
        (**self).finish(snapshot);
    }
}
