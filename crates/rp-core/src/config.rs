use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::value::IncrementPolicy;

/// One configured panel row.
///
/// # Example
/// ```
/// use rp_core::config::RowSpec;
/// let row = RowSpec::new("RANGE", "100");
/// assert_eq!(row.title, "RANGE");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RowSpec {
    /// Title shown in the badge.
    pub title: String,
    /// Initial text of the value control.
    pub value: String,
}

impl RowSpec {
    #[must_use]
    pub fn new(title: &str, value: &str) -> Self {
        Self {
            title: title.to_string(),
            value: value.to_string(),
        }
    }
}

/// Terminal geometry of the panel, in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LayoutConfig {
    /// Panel width including its border [12, 60].
    pub width: u16,
    /// Height of each title badge [1, 5]. Borders are drawn from 3 upwards.
    pub badge_height: u16,
    /// Height of each value control [1, 5].
    pub value_height: u16,
    /// Blank lines between rows [0, 3].
    pub row_spacing: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 20,
            badge_height: 1,
            value_height: 3,
            row_spacing: 0,
        }
    }
}

impl LayoutConfig {
    /// Clamp every field to its valid range.
    pub fn clamp_all(&mut self) {
        self.width = self.width.clamp(12, 60);
        self.badge_height = self.badge_height.clamp(1, 5);
        self.value_height = self.value_height.clamp(1, 5);
        self.row_spacing = self.row_spacing.min(3);
    }

    /// Lines taken by one row, spacing excluded.
    #[must_use]
    pub fn row_height(&self) -> u16 {
        self.badge_height + self.value_height
    }
}

/// Complete panel configuration.
///
/// # Example
/// ```
/// use rp_core::config::PanelConfig;
/// let config = PanelConfig::default();
/// assert_eq!(config.rows.len(), 5);
/// assert_eq!(config.rows[0].title, "ZERO");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PanelConfig {
    /// Rows in display order.
    pub rows: Vec<RowSpec>,
    /// What happens to the label suffix on increment.
    pub increment_policy: IncrementPolicy,
    /// Optional stylesheet file. `None` = built-in stylesheet.
    pub stylesheet: Option<PathBuf>,
    pub layout: LayoutConfig,
}

/// Rows of the ranging front panel.
#[must_use]
pub fn default_rows() -> Vec<RowSpec> {
    vec![
        RowSpec::new("ZERO", "7.81 us"),
        RowSpec::new("RANGE", "100"),
        RowSpec::new("MTL VEL", "5920 M/S"),
        RowSpec::new("DELAY", "0.00 mm"),
        RowSpec::new("GAIN 1", "25.0 dB"),
    ]
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            increment_policy: IncrementPolicy::default(),
            stylesheet: None,
            layout: LayoutConfig::default(),
        }
    }
}

/// Structure TOML intermédiaire, toutes les valeurs optionnelles.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    panel: Option<PanelSection>,
    layout: Option<LayoutSection>,
    rows: Option<Vec<RowSpec>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PanelSection {
    increment_policy: Option<IncrementPolicy>,
    stylesheet: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutSection {
    width: Option<u16>,
    badge_height: Option<u16>,
    value_height: Option<u16>,
    row_spacing: Option<u16>,
}

/// Parse a TOML document and merge it over the defaults.
///
/// A relative `stylesheet` path is kept as written.
///
/// # Errors
/// Returns an error if the document is not valid TOML or has unknown keys.
///
/// # Example
/// ```
/// use rp_core::config::parse_config;
/// use rp_core::value::IncrementPolicy;
///
/// let config = parse_config("[panel]\nincrement_policy = \"ReplaceLabel\"").unwrap();
/// assert_eq!(config.increment_policy, IncrementPolicy::ReplaceLabel);
/// assert_eq!(config.rows.len(), 5);
/// ```
pub fn parse_config(content: &str) -> Result<PanelConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = PanelConfig::default();

    if let Some(p) = file.panel {
        if let Some(v) = p.increment_policy {
            config.increment_policy = v;
        }
        if let Some(v) = p.stylesheet {
            config.stylesheet = Some(v);
        }
    }

    if let Some(l) = file.layout {
        if let Some(v) = l.width {
            config.layout.width = v;
        }
        if let Some(v) = l.badge_height {
            config.layout.badge_height = v;
        }
        if let Some(v) = l.value_height {
            config.layout.value_height = v;
        }
        if let Some(v) = l.row_spacing {
            config.layout.row_spacing = v;
        }
    }

    if let Some(rows) = file.rows {
        config.rows = rows;
    }

    config.layout.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// A relative `stylesheet` path is resolved against the config file's directory.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use rp_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/panel.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<PanelConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let mut config =
        parse_config(&content).with_context(|| format!("Config invalide : {}", path.display()))?;

    if let Some(sheet) = config.stylesheet.take() {
        config.stylesheet = Some(match path.parent() {
            Some(dir) if sheet.is_relative() => dir.join(sheet),
            _ => sheet,
        });
    }
    Ok(config)
}
