//! Detail UI collaborator.
//!
//! The scene only calls these methods on interaction events and reads
//! `is_open` to suppress duplicate interact commands; everything else about
//! presentation is the collaborator's business.

use log::info;

use crate::content::BuoyContent;

pub trait DetailUi {
    /// Present a buoy's detail content. Stays open until [`DetailUi::close`].
    fn show_detail(&mut self, content: &BuoyContent);

    /// Present the controls reference.
    fn show_controls_help(&mut self);

    /// Whether a detail view is currently open.
    fn is_open(&self) -> bool;

    /// Dismiss the open detail view, if any. Returns true if one closed.
    fn close(&mut self) -> bool;
}

/// Terminal-backed implementation: detail views are logged and "stay open"
/// until dismissed, mirroring a modal's lifecycle.
#[derive(Default)]
pub struct LogUi {
    open: bool,
}

impl LogUi {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DetailUi for LogUi {
    fn show_detail(&mut self, content: &BuoyContent) {
        info!("=== {} ===", content.title);
        info!("problem:  {}", content.problem);
        info!("timeline: {}", content.timeline);
        info!("solution: {}", content.solution);
        info!("tags:     {}", content.tags.join(", "));
        info!("(press Escape to close)");
        self.open = true;
    }

    fn show_controls_help(&mut self) {
        info!("controls: WASD/arrows steer, Shift boost, E interact, C camera, Esc close/quit");
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) -> bool {
        std::mem::take(&mut self.open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::entries;

    #[test]
    fn detail_opens_and_closes() {
        let mut ui = LogUi::new();
        assert!(!ui.is_open());

        let content = entries().remove(0);
        ui.show_detail(&content);
        assert!(ui.is_open());

        assert!(ui.close());
        assert!(!ui.is_open());
        assert!(!ui.close());
    }
}
