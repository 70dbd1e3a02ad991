use crate::ui::{OverlayChild, OverlayContainer};

/// Single-slot error flag. Last write wins; cleared exactly on a successful
/// load.
#[derive(Clone, Debug, Default)]
pub struct ErrorState {
    pub active: bool,
    pub message: String,
}

/// Owns the error state and the banner shown over the viewport.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    state: ErrorState,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn message(&self) -> Option<&str> {
        self.state.active.then_some(self.state.message.as_str())
    }

    /// Raise the flag and show the message as the first overlay child. An
    /// existing banner is updated in place rather than duplicated.
    pub fn display_error(&mut self, overlay: Option<&mut OverlayContainer>, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);

        self.state.active = true;
        self.state.message = message.clone();

        let Some(overlay) = overlay else {
            return;
        };
        let existing = overlay
            .children
            .iter_mut()
            .find_map(|c| match c {
                OverlayChild::Banner(text) => Some(text),
                _ => None,
            });
        match existing {
            Some(text) => *text = message,
            None => overlay.children.insert(0, OverlayChild::Banner(message)),
        }
    }

    /// Clear the flag. The banner is removed only when both it and the
    /// overlay still exist; either being gone already is not a failure.
    pub fn remove_error(&mut self, overlay: Option<&mut OverlayContainer>) {
        self.state.active = false;
        self.state.message.clear();

        if let Some(overlay) = overlay {
            overlay
                .children
                .retain(|c| !matches!(c, OverlayChild::Banner(_)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_inserted_as_first_child() {
        let mut reporter = ErrorReporter::new();
        let mut overlay = OverlayContainer::new();

        reporter.display_error(Some(&mut overlay), "boom");

        assert!(reporter.is_active());
        assert_eq!(overlay.children[0], OverlayChild::Banner("boom".into()));
        assert_eq!(overlay.children.len(), 2);
    }

    #[test]
    fn second_error_reuses_banner() {
        let mut reporter = ErrorReporter::new();
        let mut overlay = OverlayContainer::new();

        reporter.display_error(Some(&mut overlay), "first");
        reporter.display_error(Some(&mut overlay), "second");

        assert_eq!(overlay.children.len(), 2);
        assert_eq!(overlay.banner_text(), Some("second"));
        assert_eq!(reporter.message(), Some("second"));
    }

    #[test]
    fn remove_without_overlay_still_clears_flag() {
        let mut reporter = ErrorReporter::new();
        reporter.display_error(None, "boom");

        reporter.remove_error(None);

        assert!(!reporter.is_active());
        assert_eq!(reporter.message(), None);
    }

    #[test]
    fn remove_when_banner_already_detached() {
        let mut reporter = ErrorReporter::new();
        let mut overlay = OverlayContainer::new();
        reporter.display_error(Some(&mut overlay), "boom");
        overlay.children.retain(|c| !matches!(c, OverlayChild::Banner(_)));

        reporter.remove_error(Some(&mut overlay));

        assert!(!reporter.is_active());
        assert_eq!(overlay.banner_text(), None);
    }
}
