use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use rp_core::config::PanelConfig;
use rp_core::style::Stylesheet;

pub mod app;
pub mod cli;
pub mod hotreload;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config + overrides CLI
    let mut config = resolve_config(&cli)?;
    if let Some(policy) = cli.increment_policy()? {
        config.increment_policy = policy;
    }
    if let Some(ref path) = cli.stylesheet {
        config.stylesheet = Some(path.clone());
    }

    // 4. Feuille de style (échec non fatal → style intégré)
    let stylesheet = Arc::new(ArcSwap::from_pointee(Stylesheet::load_or_builtin(
        config.stylesheet.as_deref(),
    )));

    // 5. Hot-reload de la feuille de style (thread interne notify)
    let _watcher = config.stylesheet.as_deref().and_then(|path| {
        hotreload::spawn_stylesheet_watcher(path, &stylesheet)
            .map_err(|e| log::warn!("Hot-reload indisponible : {e}"))
            .ok()
    });

    // 6. Construire l'App
    let mut app_instance = app::App::new(&config, stylesheet);

    // 7. Initialiser le terminal ratatui + souris
    let terminal = ratatui::init();
    if let Err(e) = crossterm::execute!(std::io::stdout(), EnableMouseCapture) {
        ratatui::restore();
        return Err(e.into());
    }

    // 8. Boucle principale
    let result = app_instance.run(terminal);

    // 9. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Load `--config` if it exists, otherwise fall back to the built-in rows.
fn resolve_config(cli: &cli::Cli) -> Result<PanelConfig> {
    if cli.config.exists() {
        rp_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(PanelConfig::default())
    }
}
