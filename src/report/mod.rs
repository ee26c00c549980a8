mod progress;
mod render;

pub use progress::ProgressReporter;
pub use render::{RenderOptions, render_json, render_text};
