use std::borrow::Cow;
use std::fmt;

use crate::error::PanelError;
use crate::row::{RowArena, RowId};
use crate::value::{IncrementPolicy, increment_leading_integer};

/// Diagnostic emitted for every activation: which control, and its text afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivationRecord {
    /// Activated row.
    pub row: RowId,
    /// Tag of the control (the row title).
    pub tag: String,
    /// Display text after the increment attempt.
    pub text: String,
}

impl fmt::Display for ActivationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.tag, self.text)
    }
}

/// Tracks the single selected value control of a panel.
///
/// Holds a [`RowId`] rather than a reference: a row removed behind the
/// controller's back is simply treated as "nothing selected".
///
/// # Example
/// ```
/// use rp_core::row::{Row, RowArena};
/// use rp_core::selection::SelectionController;
/// use rp_core::value::IncrementPolicy;
///
/// let mut rows = RowArena::default();
/// let range = rows.insert(Row::new("RANGE", "100"));
/// let mut selection = SelectionController::new(IncrementPolicy::PreserveSuffix);
///
/// let record = selection.on_activate(&mut rows, range).unwrap();
/// assert_eq!(record.text, "101");
/// assert_eq!(selection.selected(), Some(range));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SelectionController {
    selected: Option<RowId>,
    policy: IncrementPolicy,
}

impl SelectionController {
    #[must_use]
    pub fn new(policy: IncrementPolicy) -> Self {
        Self {
            selected: None,
            policy,
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<RowId> {
        self.selected
    }

    #[must_use]
    pub fn policy(&self) -> IncrementPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: IncrementPolicy) {
        self.policy = policy;
    }

    /// Handle an activation of `id`: move the selection, then try the increment.
    ///
    /// Re-activating the selected control keeps it selected and increments again.
    ///
    /// # Errors
    /// Returns [`PanelError::UnknownRow`] if `id` does not resolve; the current
    /// selection is left untouched in that case.
    pub fn on_activate(
        &mut self,
        rows: &mut RowArena,
        id: RowId,
    ) -> Result<ActivationRecord, PanelError> {
        if !rows.contains(id) {
            return Err(PanelError::UnknownRow(id));
        }
        self.move_selection(rows, id);

        let control = rows
            .get_mut(id)
            .ok_or(PanelError::UnknownRow(id))?
            .control_mut();

        let next = match increment_leading_integer(control.text(), self.policy) {
            Cow::Owned(text) => Some(text),
            Cow::Borrowed(_) => None,
        };
        if let Some(text) = next {
            control.set_text(text);
        }

        Ok(ActivationRecord {
            row: id,
            tag: control.tag().to_string(),
            text: control.text().to_string(),
        })
    }

    /// Select `id` without an activation: no increment, no record.
    ///
    /// # Errors
    /// Returns [`PanelError::UnknownRow`] if `id` does not resolve.
    pub fn select_default(&mut self, rows: &mut RowArena, id: RowId) -> Result<(), PanelError> {
        if !rows.contains(id) {
            return Err(PanelError::UnknownRow(id));
        }
        self.move_selection(rows, id);
        Ok(())
    }

    /// Drop the selection, clearing the flag of the selected control if it still exists.
    pub fn clear(&mut self, rows: &mut RowArena) {
        if let Some(prev) = self.selected.take()
            && let Some(row) = rows.get_mut(prev)
        {
            row.control_mut().set_selected(false);
        }
    }

    fn move_selection(&mut self, rows: &mut RowArena, id: RowId) {
        if let Some(prev) = self.selected.take() {
            match rows.get_mut(prev) {
                Some(row) => row.control_mut().set_selected(false),
                None => log::debug!("Sélection précédente {prev} détruite, ignorée"),
            }
        }
        if let Some(row) = rows.get_mut(id) {
            row.control_mut().set_selected(true);
            self.selected = Some(id);
        }
    }
}
