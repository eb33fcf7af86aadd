use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use rp_core::panel::Panel;
use rp_core::row::{ClassSet, Row};
use rp_core::selection::ActivationRecord;
use rp_core::style::{Stylesheet, classes};
use rp_core::value::IncrementPolicy;

use crate::layout::PanelLayout;
use crate::theme::{self, ElementStyle};

/// Elements this tall or taller get a border; smaller ones are drawn as a filled strip.
const BORDER_MIN_HEIGHT: u16 = 3;

/// Application state enum (mirrored for rendering decisions).
///
/// # Example
/// ```
/// use rp_render::ui::RenderState;
/// let state = RenderState::Running;
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// Normal running state.
    Running,
    /// Help overlay visible.
    Help,
    /// Quitting (should not reach draw).
    Quitting,
}

/// Everything `draw` needs for one frame.
pub struct DrawContext<'a> {
    pub panel: &'a Panel,
    pub stylesheet: &'a Stylesheet,
    pub layout: &'a PanelLayout,
    pub last_record: Option<&'a ActivationRecord>,
    pub state: &'a RenderState,
}

/// Draw the full UI: panel strip + detail pane + optional help overlay.
pub fn draw(frame: &mut Frame, ctx: &DrawContext<'_>) {
    let area = frame.area();
    draw_panel(frame.buffer_mut(), ctx);
    draw_detail(frame, ctx);

    if *ctx.state == RenderState::Help {
        draw_help_overlay(frame, area);
    }
}

/// Panel frame and every visible row.
fn draw_panel(buf: &mut Buffer, ctx: &DrawContext<'_>) {
    let frame_style = theme::resolve(ctx.stylesheet, &ClassSet::from_iter([classes::MENU_PANEL]));
    Block::default()
        .borders(Borders::ALL)
        .title(" Menu ")
        .style(frame_style.body)
        .border_style(frame_style.border)
        .render(ctx.layout.panel, buf);

    for rects in &ctx.layout.rows {
        let Some(row) = ctx.panel.row(rects.id) else {
            continue;
        };
        draw_row(buf, ctx.stylesheet, row, rects.badge, rects.value);
    }
}

fn draw_row(buf: &mut Buffer, sheet: &Stylesheet, row: &Row, badge: Rect, value: Rect) {
    let badge_style = theme::resolve(sheet, row.badge().classes());
    draw_element(buf, badge, row.title(), badge_style);

    let value_style = theme::resolve(sheet, row.control().classes());
    draw_element(buf, value, row.control().text(), value_style);
}

/// Centered text, boxed when the element is tall enough.
fn draw_element(buf: &mut Buffer, area: Rect, text: &str, style: ElementStyle) {
    let mut block = Block::default().style(style.body);
    if area.height >= BORDER_MIN_HEIGHT {
        block = block.borders(Borders::ALL).border_style(style.border);
    }
    let inner = block.inner(area);
    block.render(area, buf);

    // Centrage vertical sur la zone intérieure
    let text_area = Rect::new(inner.x, inner.y + inner.height.saturating_sub(1) / 2, inner.width, 1);
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style.body)
        .render(text_area, buf);
}

/// Right-hand pane: selection, last activation, key hints.
fn draw_detail(frame: &mut Frame, ctx: &DrawContext<'_>) {
    let area = ctx.layout.detail;
    if area.width == 0 {
        return;
    }

    let (sel_title, sel_value) = ctx
        .panel
        .selected()
        .and_then(|id| ctx.panel.row(id))
        .map_or(("—", "—"), |row| (row.title(), row.control().text()));

    let policy_str = match ctx.panel.policy() {
        IncrementPolicy::PreserveSuffix => "preserve suffix",
        IncrementPolicy::ReplaceLabel => "replace label",
    };

    let last_str = ctx
        .last_record
        .map_or_else(|| "(none)".to_string(), ToString::to_string);

    let mut lines = vec![
        Line::from(Span::styled("─ Selection ──", Style::default().fg(Color::Yellow))),
        Line::from(format!(" Row:   {sel_title}")),
        Line::from(format!(" Value: {sel_value}")),
        Line::from(""),
        Line::from(Span::styled("─ Last click ─", Style::default().fg(Color::Yellow))),
        Line::from(format!(" {last_str}")),
        Line::from(""),
        Line::from(Span::styled("─ Panel ──────", Style::default().fg(Color::Yellow))),
        Line::from(format!(" Rows: {}", ctx.panel.len())),
        Line::from(format!(" Increment: {policy_str}")),
    ];

    if ctx.layout.hidden > 0 {
        lines.push(Line::from(Span::styled(
            format!(" {} row(s) hidden, enlarge terminal", ctx.layout.hidden),
            Style::default().fg(Color::Red),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" ? = help", Style::default().fg(Color::DarkGray))));

    let detail = Paragraph::new(lines).block(Block::default().title(" Status "));
    frame.render_widget(detail, area);
}

/// Draw a help overlay with all keybindings.
fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            " rangepanel — Controls ",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(" click    Activate value"),
        Line::from(" 1-9      Activate row N"),
        Line::from(" Enter    Activate selected"),
        Line::from(" ↑/↓      Activate prev/next"),
        Line::from(" c        Clear selection"),
        Line::from(" ?        Toggle help"),
        Line::from(" q/Esc    Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_width = 30u16.min(area.width);
    let help_height = (help_text.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(help_width) / 2;
    let y = area.y + area.height.saturating_sub(help_height) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );

    frame.render_widget(Clear, help_area);
    frame.render_widget(help, help_area);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use rp_core::config::{LayoutConfig, PanelConfig};

    use super::*;
    use crate::layout;

    fn render(panel: &Panel, state: &RenderState, width: u16, height: u16) -> (Buffer, PanelLayout) {
        let sheet = Stylesheet::builtin();
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut computed = PanelLayout::default();
        terminal
            .draw(|frame| {
                computed = layout::compute(frame.area(), panel, &LayoutConfig::default());
                let ctx = DrawContext {
                    panel,
                    stylesheet: &sheet,
                    layout: &computed,
                    last_record: None,
                    state,
                };
                draw(frame, &ctx);
            })
            .unwrap();
        (terminal.backend().buffer().clone(), computed)
    }

    fn row_text(buf: &Buffer, rect: Rect) -> String {
        (rect.x..rect.right())
            .map(|x| buf[(x, rect.y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn rows_render_titles_and_values() {
        let panel = Panel::assemble(&PanelConfig::default());
        let (buf, layout) = render(&panel, &RenderState::Running, 60, 30);

        assert!(row_text(&buf, layout.rows[1].badge).contains("RANGE"));
        let value = layout.rows[2].value;
        let middle = Rect::new(value.x, value.y + 1, value.width, 1);
        assert!(row_text(&buf, middle).contains("5920 M/S"));
    }

    #[test]
    fn selected_value_uses_selected_style() {
        let panel = Panel::assemble(&PanelConfig::default());
        let (buf, layout) = render(&panel, &RenderState::Running, 60, 30);

        let first = layout.rows[0].value;
        let second = layout.rows[1].value;
        assert_eq!(buf[(first.x + 1, first.y + 1)].bg, Color::White);
        assert_eq!(buf[(second.x + 1, second.y + 1)].bg, Color::Black);
    }

    #[test]
    fn help_overlay_drawn() {
        let panel = Panel::assemble(&PanelConfig::default());
        let (buf, _) = render(&panel, &RenderState::Help, 60, 30);

        let dump: String = (0..30)
            .map(|y| row_text(&buf, Rect::new(0, y, 60, 1)))
            .collect();
        assert!(dump.contains("Controls"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let panel = Panel::assemble(&PanelConfig::default());
        let (_, layout) = render(&panel, &RenderState::Help, 8, 3);
        assert!(layout.rows.is_empty());
    }
}
