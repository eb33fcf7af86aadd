use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwap;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::DefaultTerminal;
use rp_core::config::{LayoutConfig, PanelConfig};
use rp_core::panel::Panel;
use rp_core::row::RowId;
use rp_core::selection::ActivationRecord;
use rp_core::style::Stylesheet;
use rp_render::layout::{self, PanelLayout};
use rp_render::ui::{self, DrawContext, RenderState};

/// Délai max d'attente d'un événement avant de redessiner (reload de style).
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Application state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppState {
    /// Panneau actif, clics et touches routés vers le panneau.
    Running,
    /// Overlay d'aide affiché (touche ?).
    Help,
    /// Fermeture de l'application. doit se terminer au prochain tour de boucle.
    Quitting,
}

/// Main application struct holding all state.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Rows and selection.
    pub panel: Panel,
    /// Feuille de style courante (remplacée par le watcher).
    pub stylesheet: Arc<ArcSwap<Stylesheet>>,
    /// Panel geometry settings.
    pub layout_config: LayoutConfig,
    /// Layout of the last drawn frame, used for hit-testing clicks.
    pub layout: PanelLayout,
    /// Last activation, shown in the status pane.
    pub last_record: Option<ActivationRecord>,
}

impl App {
    /// Assemble the panel from `config`.
    #[must_use]
    pub fn new(config: &PanelConfig, stylesheet: Arc<ArcSwap<Stylesheet>>) -> Self {
        Self {
            state: AppState::Running,
            panel: Panel::assemble(config),
            stylesheet,
            layout_config: config.layout,
            layout: PanelLayout::default(),
            last_record: None,
        }
    }

    /// Main event loop: draw, then wait for one event.
    ///
    /// # Errors
    /// Returns an error if terminal operations fail.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        loop {
            if self.state == AppState::Quitting {
                break;
            }

            let sheet = self.stylesheet.load();
            let render_state = self.render_state();
            terminal.draw(|frame| {
                self.layout = layout::compute(frame.area(), &self.panel, &self.layout_config);
                let ctx = DrawContext {
                    panel: &self.panel,
                    stylesheet: &sheet,
                    layout: &self.layout,
                    last_record: self.last_record.as_ref(),
                    state: &render_state,
                };
                ui::draw(frame, &ctx);
            })?;
            drop(sheet);

            if event::poll(POLL_INTERVAL)? {
                self.handle_event(&event::read()?);
            }
        }

        Ok(())
    }

    /// Convert `AppState` to `RenderState` for the UI.
    fn render_state(&self) -> RenderState {
        match self.state {
            AppState::Running => RenderState::Running,
            AppState::Help => RenderState::Help,
            AppState::Quitting => RenderState::Quitting,
        }
    }

    /// Handle a terminal event by dispatching to focused sub-handlers.
    pub fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) if modifiers.contains(KeyModifiers::CONTROL) => self.state = AppState::Quitting,
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.state != AppState::Running {
            return;
        }
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind
            && let Some(id) = self.layout.hit_test(mouse.column, mouse.row)
        {
            self.activate(id);
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        if self.state == AppState::Help {
            if matches!(code, KeyCode::Esc | KeyCode::Char('?')) {
                self.state = AppState::Running;
            } else if code == KeyCode::Char('q') {
                self.state = AppState::Quitting;
            }
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.state = AppState::Quitting,
            KeyCode::Char('?') => self.state = AppState::Help,
            KeyCode::Char(c @ '1'..='9') => {
                let index = usize::from(c as u8 - b'1');
                match self.panel.row_id_at(index) {
                    Some(id) => self.activate(id),
                    None => log::debug!("Pas de ligne {}", index + 1),
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                match self.panel.selected() {
                    Some(id) => self.activate(id),
                    None => log::debug!("Aucune ligne sélectionnée"),
                }
            }
            KeyCode::Up => self.activate_neighbour(false),
            KeyCode::Down => self.activate_neighbour(true),
            KeyCode::Char('c') => self.panel.clear_selection(),
            _ => {}
        }
    }

    /// Activate the row above/below the selection, clamped to the ends.
    fn activate_neighbour(&mut self, forward: bool) {
        let current = self.panel.selected().and_then(|id| self.panel.position(id));
        let last = self.panel.len().saturating_sub(1);
        let target = match (current, forward) {
            (None, _) => 0,
            (Some(pos), true) => (pos + 1).min(last),
            (Some(pos), false) => pos.saturating_sub(1),
        };
        if let Some(id) = self.panel.row_id_at(target) {
            self.activate(id);
        }
    }

    fn activate(&mut self, id: RowId) {
        match self.panel.activate(id) {
            Ok(record) => self.last_record = Some(record),
            Err(e) => log::warn!("Activation ignorée : {e}"),
        }
    }
}
