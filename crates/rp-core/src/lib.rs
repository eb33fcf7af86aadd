/// Panel model, selection logic, configuration and stylesheet for rangepanel.
///
/// Nothing in this crate touches the terminal: the rendering surface lives in
/// `rp-render`, the event loop in `rp-app`.

pub mod config;
pub mod error;
pub mod panel;
pub mod row;
pub mod selection;
pub mod style;
pub mod traits;
pub mod value;

pub use config::PanelConfig;
pub use error::PanelError;
pub use panel::Panel;
pub use row::{Row, RowId};
pub use selection::{ActivationRecord, SelectionController};
pub use style::Stylesheet;
pub use value::{IncrementPolicy, increment_leading_integer};
