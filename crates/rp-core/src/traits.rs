use crate::selection::ActivationRecord;

/// Receives one record per activation of a value control.
///
/// Implemented for any `FnMut(&ActivationRecord)`, so a closure can subscribe directly.
///
/// # Example
/// ```
/// use rp_core::panel::Panel;
/// use rp_core::traits::ActivationObserver;
/// use rp_core::selection::ActivationRecord;
///
/// struct Counter(usize);
/// impl ActivationObserver for Counter {
///     fn on_activation(&mut self, _record: &ActivationRecord) {
///         self.0 += 1;
///     }
/// }
///
/// let mut panel = Panel::default();
/// panel.subscribe(Counter(0));
/// panel.subscribe(|record: &ActivationRecord| println!("{record}"));
/// ```
pub trait ActivationObserver {
    /// Called after selection and text update, on the event thread.
    fn on_activation(&mut self, record: &ActivationRecord);
}

impl<F> ActivationObserver for F
where
    F: FnMut(&ActivationRecord),
{
    fn on_activation(&mut self, record: &ActivationRecord) {
        self(record);
    }
}
