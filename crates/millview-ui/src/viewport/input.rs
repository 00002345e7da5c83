//! Translation of GTK gesture signals into [`InputEvent`]s

use millview_visualizer::InputEvent;

/// GTK reports drag offsets relative to the drag start; the controls expect
/// per-event deltas.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DragTracker {
    last: (f64, f64),
}

impl DragTracker {
    pub(crate) fn begin(&mut self) {
        self.last = (0.0, 0.0);
    }

    /// Delta event for a drag that has moved `offset` from its start.
    /// Shift held means pan.
    pub(crate) fn update(&mut self, offset: (f64, f64), shift: bool) -> Option<InputEvent> {
        let dx = offset.0 - self.last.0;
        let dy = offset.1 - self.last.1;
        self.last = offset;

        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some(InputEvent::Drag {
            dx: dx as f32,
            dy: dy as f32,
            pan: shift,
        })
    }
}

pub(crate) fn scroll_event(dy: f64) -> Option<InputEvent> {
    (dy != 0.0).then_some(InputEvent::Scroll { delta: dy as f32 })
}
