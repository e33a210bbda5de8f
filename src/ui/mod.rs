//! Viewer controls: screen selector, start/stop toggle, error area, video area

mod console;
mod surface;

pub use console::ConsoleSurface;
pub use surface::{screen_options, ScreenOption, SurfaceState, ToggleLabel, ViewerSurface};
