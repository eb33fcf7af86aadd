/// TUI rendering module for rangepanel.
///
/// Provides layout and hit-testing, stylesheet resolution, and the frame draw.
pub mod layout;
pub mod theme;
pub mod ui;
