use std::path::PathBuf;

use clap::Parser;
use rp_core::value::IncrementPolicy;

/// rangepanel — terminal front panel for ranging parameters.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/panel.toml.
    #[arg(short, long, default_value = "config/panel.toml")]
    pub config: PathBuf,

    /// Feuille de style TOML (remplace celle de la config).
    #[arg(long)]
    pub stylesheet: Option<PathBuf>,

    /// Politique d'incrément : "preserve" (garde l'unité) ou "replace".
    #[arg(long)]
    pub policy: Option<String>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Map `--policy` to an [`IncrementPolicy`].
    ///
    /// # Errors
    /// Returns an error for anything other than `preserve` or `replace`.
    pub fn increment_policy(&self) -> anyhow::Result<Option<IncrementPolicy>> {
        match self.policy.as_deref() {
            None => Ok(None),
            Some("preserve") => Ok(Some(IncrementPolicy::PreserveSuffix)),
            Some("replace") => Ok(Some(IncrementPolicy::ReplaceLabel)),
            Some(other) => {
                anyhow::bail!("Politique inconnue '{other}'. Valeurs : preserve, replace.")
            }
        }
    }
}
