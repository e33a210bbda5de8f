use parking_lot::RwLock;

use super::surface::{ScreenOption, SurfaceState, ToggleLabel, ViewerSurface};

/// Terminal front end: prints every change and remembers the current state
#[derive(Default)]
pub struct ConsoleSurface {
    state: RwLock<SurfaceState>,
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SurfaceState {
        self.state.read().clone()
    }

    /// Print the selector, the toggle and the video area
    pub fn render(&self) {
        let state = self.state.read();
        println!("Screens:");
        for option in state.options.iter().filter(|o| !o.value.is_empty()) {
            println!("  [{}] {}", option.value, option.label);
        }
        if state.options.len() <= 1 {
            println!("  (none)");
        }
        println!(
            "Toggle: {}{}",
            state.toggle_label,
            if state.toggle_enabled { "" } else { " (disabled)" }
        );
        println!(
            "Video: {}",
            if state.video_visible { "visible" } else { "hidden" }
        );
        if let Some(error) = &state.error {
            println!("Last error: {}", error);
        }
    }
}

impl ViewerSurface for ConsoleSurface {
    fn show_error(&self, message: &str) {
        eprintln!("error: {}", message);
        self.state.write().error = Some(message.to_string());
    }

    fn set_screen_options(&self, options: Vec<ScreenOption>) {
        self.state.write().options = options;
        self.render();
    }

    fn set_toggle_enabled(&self, enabled: bool) {
        self.state.write().toggle_enabled = enabled;
    }

    fn set_toggle_label(&self, label: ToggleLabel) {
        let changed = {
            let mut state = self.state.write();
            let changed = state.toggle_label != label;
            state.toggle_label = label;
            changed
        };
        if changed {
            println!("[{}]", label);
        }
    }

    fn set_video_visible(&self, visible: bool) {
        self.state.write().video_visible = visible;
    }
}
