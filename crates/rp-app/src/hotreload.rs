use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rp_core::style::{Stylesheet, load_stylesheet};

/// Lance un thread qui surveille la feuille de style et met à jour l'ArcSwap.
///
/// Surveille le répertoire parent et filtre sur le nom du fichier, afin de
/// suivre aussi les sauvegardes par renommage.
/// Retourne le Watcher (doit rester vivant tant que l'app tourne).
/// A stylesheet that fails to parse is reported and the previous one is kept.
///
/// # Errors
/// Returns an error if the watcher cannot be created or the directory cannot be watched.
pub fn spawn_stylesheet_watcher(
    path: &Path,
    stylesheet: &Arc<ArcSwap<Stylesheet>>,
) -> Result<impl Watcher + use<>> {
    let stylesheet = Arc::clone(stylesheet);
    let watched = path.to_path_buf();
    let file_name = path
        .file_name()
        .with_context(|| format!("Pas de nom de fichier : {}", path.display()))?
        .to_os_string();
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res
            && matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
            && event
                .paths
                .iter()
                .any(|p| p.file_name() == Some(file_name.as_os_str()))
        {
            reload(&watched, &stylesheet);
        }
    })?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

fn reload(path: &Path, stylesheet: &ArcSwap<Stylesheet>) {
    match load_stylesheet(path) {
        Ok(sheet) => {
            stylesheet.store(Arc::new(sheet));
            log::info!("Feuille de style rechargée depuis {}", path.display());
        }
        Err(e) => {
            log::warn!("Erreur de rechargement de la feuille de style : {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::{Duration, Instant};

    use rp_core::row::ClassSet;

    use super::*;

    #[test]
    fn reload_swaps_valid_sheet() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rules.\"label-box\"]\nfg = \"red\"").unwrap();

        let shared = ArcSwap::from_pointee(Stylesheet::builtin());
        reload(file.path(), &shared);

        let rule = shared.load().resolve(&ClassSet::from_iter(["label-box"]));
        assert_eq!(rule.fg.as_deref(), Some("red"));
        assert_eq!(rule.bg, None);
    }

    #[test]
    fn reload_keeps_previous_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not toml [").unwrap();

        let shared = ArcSwap::from_pointee(Stylesheet::builtin());
        reload(file.path(), &shared);

        assert_eq!(shared.load().len(), Stylesheet::builtin().len());
    }

    fn label_fg(shared: &ArcSwap<Stylesheet>) -> Option<String> {
        shared
            .load()
            .resolve(&ClassSet::from_iter(["label-box"]))
            .fg
    }

    /// Attend que le watcher ait appliqué `expected` (5 s max).
    fn wait_for_fg(shared: &ArcSwap<Stylesheet>, expected: &str) -> Option<String> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let fg = label_fg(shared);
            if fg.as_deref() == Some(expected) || Instant::now() > deadline {
                return fg;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
    }

    fn sheet_with_fg(colour: &str) -> String {
        format!("[rules.\"label-box\"]\nfg = \"{colour}\"\n")
    }

    /// Écrit dans un fichier temporaire puis le renomme sur `path`.
    fn save_by_rename(path: &Path, content: &str) {
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, content).unwrap();
        std::fs::rename(&tmp, path).unwrap();
    }

    #[test]
    fn watcher_survives_rename_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.toml");
        std::fs::write(&path, sheet_with_fg("red")).unwrap();

        let shared = Arc::new(ArcSwap::from_pointee(load_stylesheet(&path).unwrap()));
        let _watcher = spawn_stylesheet_watcher(&path, &shared).unwrap();

        save_by_rename(&path, &sheet_with_fg("blue"));
        assert_eq!(wait_for_fg(&shared, "blue").as_deref(), Some("blue"));

        save_by_rename(&path, &sheet_with_fg("green"));
        assert_eq!(wait_for_fg(&shared, "green").as_deref(), Some("green"));

        std::fs::write(&path, sheet_with_fg("yellow")).unwrap();
        assert_eq!(wait_for_fg(&shared, "yellow").as_deref(), Some("yellow"));
    }

    #[test]
    fn watcher_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.toml");
        std::fs::write(&path, sheet_with_fg("red")).unwrap();

        let shared = Arc::new(ArcSwap::from_pointee(load_stylesheet(&path).unwrap()));
        let _watcher = spawn_stylesheet_watcher(&path, &shared).unwrap();

        std::fs::write(dir.path().join("other.toml"), sheet_with_fg("blue")).unwrap();
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(label_fg(&shared).as_deref(), Some("red"));
    }
}
