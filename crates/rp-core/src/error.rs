use thiserror::Error;

use crate::row::RowId;

/// Errors originating from the panel model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    /// The handle does not resolve to a live row (never built, or removed).
    #[error("Ligne inconnue ou détruite : {0}")]
    UnknownRow(RowId),

    /// Display position outside the panel.
    #[error("Position de ligne hors limites : {index} (panneau de {len} lignes)")]
    RowIndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of rows in the panel.
        len: usize,
    },

    /// Stylesheet selector that is empty or contains invalid characters.
    #[error("Sélecteur invalide : {selector:?}")]
    InvalidSelector {
        /// The offending selector text.
        selector: String,
    },
}
