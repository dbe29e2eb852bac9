use std::sync::Arc;

use tokio::sync::watch;

/// Values of the shared UI state at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiSnapshot {
    pub is_dark_mode: bool,
    pub is_sidebar_collapsed: bool,
}

/// UI state context, created once by the application and handed to each view.
/// Clones share the same state.
#[derive(Clone)]
pub struct UiState {
    state: Arc<watch::Sender<UiSnapshot>>,
}

impl UiState {
    pub fn new(initial: UiSnapshot) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn is_dark_mode(&self) -> bool {
        self.state.borrow().is_dark_mode
    }

    pub fn set_dark_mode(&self, enabled: bool) {
        self.state.send_modify(|s| s.is_dark_mode = enabled);
    }

    pub fn toggle_dark_mode(&self) -> bool {
        let mut enabled = false;
        self.state.send_modify(|s| {
            s.is_dark_mode = !s.is_dark_mode;
            enabled = s.is_dark_mode;
        });
        enabled
    }

    pub fn is_sidebar_collapsed(&self) -> bool {
        self.state.borrow().is_sidebar_collapsed
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.state.send_modify(|s| s.is_sidebar_collapsed = collapsed);
    }

    /// Observe changes, e.g. to repaint charts when the theme flips
    pub fn watch(&self) -> watch::Receiver<UiSnapshot> {
        self.state.subscribe()
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(UiSnapshot::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let ui = UiState::default();
        let view_handle = ui.clone();

        assert!(!view_handle.is_dark_mode());
        ui.set_dark_mode(true);
        assert!(view_handle.is_dark_mode());

        assert!(!view_handle.toggle_dark_mode());
        assert!(!ui.is_dark_mode());
    }

    #[test]
    fn test_separate_contexts_are_independent() {
        let first = UiState::default();
        let second = UiState::default();

        first.set_sidebar_collapsed(true);
        assert!(first.is_sidebar_collapsed());
        assert!(!second.is_sidebar_collapsed());
    }

    #[test]
    fn test_watchers_see_changes() {
        let ui = UiState::default();
        let mut rx = ui.watch();

        ui.set_dark_mode(true);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_dark_mode);
    }
}
