use crate::config::PanelConfig;
use crate::error::PanelError;
use crate::row::{Row, RowArena, RowId};
use crate::selection::{ActivationRecord, SelectionController};
use crate::traits::ActivationObserver;
use crate::value::IncrementPolicy;

/// Vertical strip of title/value rows with one shared selection.
///
/// Owns the rows, their display order, the [`SelectionController`], and the
/// observers notified on each activation. Everything runs on the event thread.
///
/// # Example
/// ```
/// use rp_core::config::PanelConfig;
/// use rp_core::panel::Panel;
///
/// let mut panel = Panel::assemble(&PanelConfig::default());
/// let first = panel.row_id_at(0).unwrap();
/// assert!(panel.is_selected(first));
///
/// let record = panel.activate_index(1).unwrap();
/// assert_eq!(record.tag, "RANGE");
/// assert_eq!(record.text, "101");
/// assert!(!panel.is_selected(first));
/// ```
#[derive(Default)]
pub struct Panel {
    rows: RowArena,
    order: Vec<RowId>,
    selection: SelectionController,
    observers: Vec<Box<dyn ActivationObserver>>,
}

impl Panel {
    /// Empty panel using `policy` for increments.
    #[must_use]
    pub fn new(policy: IncrementPolicy) -> Self {
        Self {
            selection: SelectionController::new(policy),
            ..Self::default()
        }
    }

    /// Build every configured row in order and select the first one.
    ///
    /// The default selection does not increment the first row's value.
    #[must_use]
    pub fn assemble(config: &PanelConfig) -> Self {
        let mut panel = Self::new(config.increment_policy);
        for spec in &config.rows {
            panel.build_row(&spec.title, &spec.value);
        }
        if let Some(first) = panel.order.first().copied()
            && let Err(e) = panel.select_default(first)
        {
            log::warn!("Sélection par défaut impossible : {e}");
        }
        log::debug!("Panneau assemblé : {} lignes", panel.len());
        panel
    }

    /// Append a row (badge above value control) and wire it to activation dispatch.
    pub fn build_row(&mut self, title: &str, initial_value: &str) -> RowId {
        let id = self.rows.insert(Row::new(title, initial_value));
        self.order.push(id);
        id
    }

    /// Activate the value control of `id`.
    ///
    /// Moves the selection, applies the increment, logs the record and
    /// forwards it to every observer.
    ///
    /// # Errors
    /// Returns [`PanelError::UnknownRow`] if `id` was removed or never existed.
    pub fn activate(&mut self, id: RowId) -> Result<ActivationRecord, PanelError> {
        let record = self.selection.on_activate(&mut self.rows, id)?;
        log::info!("Clicked value for {} -> {}", record.tag, record.text);
        for observer in &mut self.observers {
            observer.on_activation(&record);
        }
        Ok(record)
    }

    /// Activate the row at display position `index`.
    ///
    /// # Errors
    /// Returns [`PanelError::RowIndexOutOfRange`] if there is no such row.
    pub fn activate_index(&mut self, index: usize) -> Result<ActivationRecord, PanelError> {
        let id = self.row_id_at(index).ok_or(PanelError::RowIndexOutOfRange {
            index,
            len: self.len(),
        })?;
        self.activate(id)
    }

    /// Select `id` directly, bypassing the increment and observers.
    ///
    /// # Errors
    /// Returns [`PanelError::UnknownRow`] if `id` does not resolve.
    pub fn select_default(&mut self, id: RowId) -> Result<(), PanelError> {
        self.selection.select_default(&mut self.rows, id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear(&mut self.rows);
    }

    /// Destroy a row. A selection pointing at it is left to go stale.
    pub fn remove_row(&mut self, id: RowId) -> Option<Row> {
        let row = self.rows.remove(id)?;
        self.order.retain(|&other| other != id);
        Some(row)
    }

    /// Subscribe to activation records.
    pub fn subscribe(&mut self, observer: impl ActivationObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Rows in display order.
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &Row)> {
        self.order
            .iter()
            .filter_map(|&id| self.rows.get(id).map(|row| (id, row)))
    }

    #[must_use]
    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.get(id)
    }

    #[must_use]
    pub fn row_id_at(&self, index: usize) -> Option<RowId> {
        self.order.get(index).copied()
    }

    /// Display position of `id`.
    #[must_use]
    pub fn position(&self, id: RowId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Currently selected row, if it still exists.
    #[must_use]
    pub fn selected(&self) -> Option<RowId> {
        self.selection
            .selected()
            .filter(|&id| self.rows.contains(id))
    }

    #[must_use]
    pub fn is_selected(&self, id: RowId) -> bool {
        self.rows
            .get(id)
            .is_some_and(|row| row.control().is_selected())
    }

    #[must_use]
    pub fn policy(&self) -> IncrementPolicy {
        self.selection.policy()
    }

    pub fn set_policy(&mut self, policy: IncrementPolicy) {
        self.selection.set_policy(policy);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::RowSpec;

    fn selected_ids(panel: &Panel) -> Vec<RowId> {
        panel
            .rows()
            .filter(|(_, row)| row.control().is_selected())
            .map(|(id, _)| id)
            .collect()
    }

    fn text_at(panel: &Panel, index: usize) -> String {
        let id = panel.row_id_at(index).unwrap();
        panel.row(id).unwrap().control().text().to_string()
    }

    #[test]
    fn assembly_selects_first_row_untouched() {
        let panel = Panel::assemble(&PanelConfig::default());
        let first = panel.row_id_at(0).unwrap();

        assert_eq!(selected_ids(&panel), vec![first]);
        assert_eq!(panel.selected(), Some(first));
        assert_eq!(text_at(&panel, 0), "7.81 us");
    }

    #[test]
    fn empty_config_has_no_selection() {
        let config = PanelConfig {
            rows: Vec::new(),
            ..PanelConfig::default()
        };
        let panel = Panel::assemble(&config);
        assert!(panel.is_empty());
        assert_eq!(panel.selected(), None);
    }

    #[test]
    fn build_row_keeps_order_and_tags() {
        let mut panel = Panel::default();
        let a = panel.build_row("ZERO", "7.81 us");
        let b = panel.build_row("RANGE", "100");

        let titles: Vec<&str> = panel.rows().map(|(_, row)| row.title()).collect();
        assert_eq!(titles, vec!["ZERO", "RANGE"]);
        assert_eq!(panel.position(b), Some(1));
        assert_eq!(panel.row(a).unwrap().control().tag(), "ZERO");
        assert_eq!(panel.selected(), None);
    }

    #[test]
    fn five_row_scenario() {
        let mut panel = Panel::assemble(&PanelConfig::default());
        let first = panel.row_id_at(0).unwrap();
        let third = panel.row_id_at(2).unwrap();
        assert!(panel.is_selected(first));

        let record = panel.activate(third).unwrap();

        assert!(!panel.is_selected(first));
        assert!(panel.is_selected(third));
        assert_eq!(selected_ids(&panel), vec![third]);
        assert_eq!(record.tag, "MTL VEL");
        assert_eq!(text_at(&panel, 2), "5921 M/S");
    }

    #[test]
    fn five_row_scenario_replace_policy() {
        let config = PanelConfig {
            increment_policy: IncrementPolicy::ReplaceLabel,
            ..PanelConfig::default()
        };
        let mut panel = Panel::assemble(&config);

        panel.activate_index(2).unwrap();
        panel.activate_index(4).unwrap();

        assert_eq!(text_at(&panel, 2), "5921");
        assert_eq!(text_at(&panel, 4), "26");
    }

    #[test]
    fn double_activation_increments_twice() {
        let mut panel = Panel::assemble(&PanelConfig::default());
        let range = panel.row_id_at(1).unwrap();

        panel.activate(range).unwrap();
        panel.activate(range).unwrap();

        assert!(panel.is_selected(range));
        assert_eq!(text_at(&panel, 1), "102");
        assert_eq!(selected_ids(&panel).len(), 1);
    }

    #[test]
    fn at_most_one_selected_over_any_sequence() {
        let mut panel = Panel::assemble(&PanelConfig::default());
        for index in [3, 1, 1, 4, 0, 2, 2, 3, 0] {
            panel.activate_index(index).unwrap();
            assert_eq!(selected_ids(&panel), vec![panel.row_id_at(index).unwrap()]);
        }
        panel.clear_selection();
        assert!(selected_ids(&panel).is_empty());
    }

    #[test]
    fn observers_receive_records() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut panel = Panel::assemble(&PanelConfig::default());
        panel.subscribe(move |record: &ActivationRecord| {
            sink.borrow_mut().push(record.to_string());
        });
        panel.activate_index(1).unwrap();
        panel.activate_index(4).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec!["RANGE -> 101".to_string(), "GAIN 1 -> 26.0 dB".to_string()]
        );
    }

    #[test]
    fn removing_selected_row_is_tolerated() {
        let mut panel = Panel::assemble(&PanelConfig::default());
        let first = panel.row_id_at(0).unwrap();

        assert!(panel.remove_row(first).is_some());
        assert_eq!(panel.selected(), None);
        assert_eq!(panel.len(), 4);

        let record = panel.activate_index(0).unwrap();
        assert_eq!(record.tag, "RANGE");
        assert_eq!(selected_ids(&panel).len(), 1);
    }

    #[test]
    fn removed_row_cannot_be_activated() {
        let mut panel = Panel::default();
        let id = panel.build_row("DELAY", "0.00 mm");
        panel.remove_row(id);

        assert_eq!(panel.activate(id), Err(PanelError::UnknownRow(id)));
        assert_eq!(
            panel.activate_index(0),
            Err(PanelError::RowIndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn policy_can_change_at_runtime() {
        let config = PanelConfig {
            rows: vec![RowSpec::new("GAIN 1", "25.0 dB")],
            ..PanelConfig::default()
        };
        let mut panel = Panel::assemble(&config);
        panel.activate_index(0).unwrap();
        panel.set_policy(IncrementPolicy::ReplaceLabel);
        panel.activate_index(0).unwrap();

        assert_eq!(panel.policy(), IncrementPolicy::ReplaceLabel);
        assert_eq!(text_at(&panel, 0), "27");
    }

    /// Logger de test : garde chaque message formaté.
    struct CaptureLogger {
        lines: std::sync::Mutex<Vec<String>>,
    }

    impl log::Log for CaptureLogger {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut lines) = self.lines.lock() {
                lines.push(format!("{} {}", record.level(), record.args()));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: CaptureLogger = CaptureLogger {
        lines: std::sync::Mutex::new(Vec::new()),
    };

    #[test]
    fn activation_logs_clicked_line() {
        // Seul test du binaire qui installe un logger.
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Trace);

        let config = PanelConfig {
            rows: vec![RowSpec::new("MTL VEL", "5920 M/S")],
            ..PanelConfig::default()
        };
        let mut panel = Panel::assemble(&config);
        panel.activate_index(0).unwrap();

        let lines = CAPTURE.lines.lock().unwrap();
        assert!(
            lines
                .iter()
                .any(|l| l == "INFO Clicked value for MTL VEL -> 5921 M/S"),
            "{lines:?}"
        );
    }
}
