use std::fmt;

use crate::api::ScreenPayload;

/// One entry of the screen selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenOption {
    pub label: String,
    pub value: String,
}

impl ScreenOption {
    pub fn blank() -> Self {
        Self {
            label: String::new(),
            value: String::new(),
        }
    }
}

/// Selector contents for a screen list: a blank default, then one entry per screen
pub fn screen_options(screens: &[ScreenPayload]) -> Vec<ScreenOption> {
    std::iter::once(ScreenOption::blank())
        .chain(screens.iter().map(|screen| ScreenOption {
            label: format!("Screen {}", i64::from(screen.index) + 1),
            value: screen.index.to_string(),
        }))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToggleLabel {
    #[default]
    Start,
    Stop,
}

impl fmt::Display for ToggleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleLabel::Start => f.write_str("Start"),
            ToggleLabel::Stop => f.write_str("Stop"),
        }
    }
}

/// The controls a viewer front end exposes to the session controller
pub trait ViewerSurface: Send + Sync {
    /// Replace the error area with `message`
    fn show_error(&self, message: &str);

    /// Replace the selector contents
    fn set_screen_options(&self, options: Vec<ScreenOption>);

    fn set_toggle_enabled(&self, enabled: bool);

    fn set_toggle_label(&self, label: ToggleLabel);

    fn set_video_visible(&self, visible: bool);
}

/// Snapshot of everything a surface displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceState {
    pub error: Option<String>,
    pub options: Vec<ScreenOption>,
    pub toggle_enabled: bool,
    pub toggle_label: ToggleLabel,
    pub video_visible: bool,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            error: None,
            options: Vec::new(),
            toggle_enabled: true,
            toggle_label: ToggleLabel::Start,
            video_visible: false,
        }
    }
}
