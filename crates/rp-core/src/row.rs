use std::collections::BTreeSet;
use std::fmt;

use crate::style::classes;

/// Set of style classes carried by a panel element.
///
/// # Example
/// ```
/// use rp_core::row::ClassSet;
/// let mut set = ClassSet::from_iter(["value-rect"]);
/// set.add("selected");
/// assert!(set.contains("selected"));
/// set.remove("selected");
/// assert!(!set.contains("selected"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassSet(BTreeSet<String>);

impl ClassSet {
    /// Add a class. Adding twice is a no-op.
    pub fn add(&mut self, class: &str) {
        if !self.0.contains(class) {
            self.0.insert(class.to_string());
        }
    }

    /// Remove a class if present.
    pub fn remove(&mut self, class: &str) {
        self.0.remove(class);
    }

    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.0.contains(class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ClassSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(String::from).collect())
    }
}

/// Static title drawn above a value control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleBadge {
    text: String,
    classes: ClassSet,
}

impl TitleBadge {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn classes(&self) -> &ClassSet {
        &self.classes
    }
}

/// Clickable value of a row.
///
/// Only the display text and the `selected` class change after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueControl {
    text: String,
    /// Row title, kept next to the control for diagnostics.
    tag: String,
    classes: ClassSet,
}

impl ValueControl {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn classes(&self) -> &ClassSet {
        &self.classes
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.classes.contains(classes::SELECTED)
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        if selected {
            self.classes.add(classes::SELECTED);
        } else {
            self.classes.remove(classes::SELECTED);
        }
    }
}

/// One panel row: title badge stacked above its value control.
///
/// # Example
/// ```
/// use rp_core::row::Row;
/// let row = Row::new("RANGE", "100");
/// assert_eq!(row.title(), "RANGE");
/// assert_eq!(row.control().text(), "100");
/// assert_eq!(row.control().tag(), "RANGE");
/// assert!(!row.control().is_selected());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    badge: TitleBadge,
    control: ValueControl,
}

impl Row {
    #[must_use]
    pub fn new(title: &str, initial_value: &str) -> Self {
        Self {
            badge: TitleBadge {
                text: title.to_string(),
                classes: ClassSet::from_iter([classes::LABEL_BOX]),
            },
            control: ValueControl {
                text: initial_value.to_string(),
                tag: title.to_string(),
                classes: ClassSet::from_iter([classes::VALUE_RECT]),
            },
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.badge.text()
    }

    #[must_use]
    pub fn badge(&self) -> &TitleBadge {
        &self.badge
    }

    #[must_use]
    pub fn control(&self) -> &ValueControl {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut ValueControl {
        &mut self.control
    }
}

/// Stable handle to a row stored in a [`RowArena`].
///
/// A handle to a removed row never resolves again, even once its slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowId {
    index: usize,
    generation: u32,
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row#{}.{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    row: Option<Row>,
}

/// Generational arena owning every row of a panel.
///
/// # Example
/// ```
/// use rp_core::row::{Row, RowArena};
/// let mut arena = RowArena::default();
/// let id = arena.insert(Row::new("GAIN 1", "25.0 dB"));
/// assert!(arena.contains(id));
/// arena.remove(id);
/// assert!(arena.get(id).is_none());
/// ```
#[derive(Debug, Default)]
pub struct RowArena {
    slots: Vec<Slot>,
    free: Vec<usize>,
    len: usize,
}

impl RowArena {
    pub fn insert(&mut self, row: Row) -> RowId {
        self.len += 1;
        if let Some(index) = self.free.pop()
            && let Some(slot) = self.slots.get_mut(index)
        {
            slot.row = Some(row);
            return RowId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            row: Some(row),
        });
        RowId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Remove a row. The slot generation is bumped so old handles go stale.
    pub fn remove(&mut self, id: RowId) -> Option<Row> {
        let slot = self
            .slots
            .get_mut(id.index)
            .filter(|s| s.generation == id.generation)?;
        let row = slot.row.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(row)
    }

    #[must_use]
    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.slots
            .get(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.row.as_ref())
    }

    pub fn get_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.slots
            .get_mut(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.row.as_mut())
    }

    #[must_use]
    pub fn contains(&self, id: RowId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over live rows in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (RowId, &Row)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.row.as_ref().map(|row| {
                (
                    RowId {
                        index,
                        generation: slot.generation,
                    },
                    row,
                )
            })
        })
    }
}
