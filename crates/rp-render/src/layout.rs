use ratatui::layout::{Constraint, Layout, Margin, Position, Rect};
use rp_core::config::LayoutConfig;
use rp_core::panel::Panel;
use rp_core::row::RowId;

/// Screen rectangles of one row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRects {
    pub id: RowId,
    pub badge: Rect,
    pub value: Rect,
}

/// Result of laying the panel out on a terminal area.
///
/// Rows that do not fit entirely are left out and counted in `hidden`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PanelLayout {
    /// Outer panel frame (border included).
    pub panel: Rect,
    /// Area right of the panel, for the detail pane.
    pub detail: Rect,
    /// Visible rows, top to bottom.
    pub rows: Vec<RowRects>,
    /// Rows that did not fit.
    pub hidden: usize,
}

impl PanelLayout {
    /// Row whose value control covers the cell, if any. Badges are not clickable.
    #[must_use]
    pub fn hit_test(&self, column: u16, row: u16) -> Option<RowId> {
        let pos = Position::new(column, row);
        self.rows
            .iter()
            .find(|r| r.value.contains(pos))
            .map(|r| r.id)
    }

    #[must_use]
    pub fn rects(&self, id: RowId) -> Option<&RowRects> {
        self.rows.iter().find(|r| r.id == id)
    }
}

/// Stack the rows of `panel` top to bottom inside a bordered column.
#[must_use]
pub fn compute(area: Rect, panel: &Panel, config: &LayoutConfig) -> PanelLayout {
    // [panel(width) | detail]
    let h_chunks =
        Layout::horizontal([Constraint::Length(config.width), Constraint::Min(0)]).split(area);
    let panel_area = h_chunks[0];
    let inner = panel_area.inner(Margin::new(1, 1));

    let row_height = config.row_height();
    let bottom = inner.bottom();
    let mut y = inner.y;
    let mut rows = Vec::with_capacity(panel.len());
    let mut hidden = 0;

    for (id, _) in panel.rows() {
        if inner.width == 0 || y.saturating_add(row_height) > bottom {
            hidden += 1;
            continue;
        }
        rows.push(RowRects {
            id,
            badge: Rect::new(inner.x, y, inner.width, config.badge_height),
            value: Rect::new(
                inner.x,
                y + config.badge_height,
                inner.width,
                config.value_height,
            ),
        });
        y = y
            .saturating_add(row_height)
            .saturating_add(config.row_spacing);
    }

    PanelLayout {
        panel: panel_area,
        detail: h_chunks[1],
        rows,
        hidden,
    }
}
