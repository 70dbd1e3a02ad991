/// Fraction of the space below the selector that the viewport occupies.
const VIEWPORT_FILL: f32 = 0.9;

/// File extension appended to exported model downloads.
pub const MODEL_FILE_EXTENSION: &str = ".gltf";

/// Label shown for the no-selection placeholder entry.
pub const PLACEHOLDER_LABEL: &str = "Select an Element";

/// Children stacked over the viewport. The canvas sits in the stack; the
/// error banner, when shown, is inserted in front of everything else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayChild {
    Banner(String),
    Canvas,
}

/// Ordered overlay child list for the viewport container. Index 0 renders
/// first (frontmost).
#[derive(Clone, Debug, Default)]
pub struct OverlayContainer {
    pub children: Vec<OverlayChild>,
}

impl OverlayContainer {
    pub fn new() -> Self {
        Self {
            children: vec![OverlayChild::Canvas],
        }
    }

    pub fn banner_text(&self) -> Option<&str> {
        self.children.iter().find_map(|c| match c {
            OverlayChild::Banner(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Viewport rectangle derived from the window: the selector keeps its own
/// height, the viewport takes 90% of what remains.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewportRect {
    pub width: f32,
    pub height: f32,
}

pub fn viewport_rect(window_width: f32, window_height: f32, selector_height: f32) -> ViewportRect {
    ViewportRect {
        width: window_width,
        height: ((window_height - selector_height) * VIEWPORT_FILL).max(0.0),
    }
}

/// Window geometry the viewport layout derives from.
#[derive(Copy, Clone, Debug)]
pub struct WindowLayout {
    pub width: f32,
    pub height: f32,
    pub selector_height: f32,
}

impl WindowLayout {
    pub fn viewport(&self) -> ViewportRect {
        viewport_rect(self.width, self.height, self.selector_height)
    }
}

/// Download filename for a selection label: anything outside
/// `[A-Za-z0-9_.-]` becomes `_`, then the model extension is appended.
pub fn download_filename(label: &str) -> String {
    let mut name: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    name.push_str(MODEL_FILE_EXTENSION);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_takes_ninety_percent_below_selector() {
        let rect = viewport_rect(800.0, 600.0, 40.0);
        assert_eq!(rect.width, 800.0);
        // (600 - 40) * 0.9 = 504
        assert!((rect.height - 504.0).abs() < 1e-3);
    }

    #[test]
    fn viewport_height_never_negative() {
        let rect = viewport_rect(800.0, 30.0, 40.0);
        assert_eq!(rect.height, 0.0);
    }

    #[test]
    fn filename_sanitizes_special_characters() {
        assert_eq!(
            download_filename("Bracket <rev 2> / left"),
            "Bracket__rev_2____left.gltf"
        );
    }

    #[test]
    fn filename_keeps_allowed_characters() {
        assert_eq!(download_filename("part_1.rev-3"), "part_1.rev-3.gltf");
    }
}
