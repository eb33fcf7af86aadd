use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PanelError;
use crate::row::ClassSet;

/// Class names the panel puts on its elements.
pub mod classes {
    /// Outer panel frame.
    pub const MENU_PANEL: &str = "menu-panel";
    /// Title badge of a row.
    pub const LABEL_BOX: &str = "label-box";
    /// Value control of a row.
    pub const VALUE_RECT: &str = "value-rect";
    /// Added to the value control currently selected.
    pub const SELECTED: &str = "selected";
}

/// Stylesheet used when none is configured or the configured one fails to load.
pub const BUILTIN_STYLESHEET: &str = r##"
[rules."menu-panel"]
fg = "gray"
bg = "black"

[rules."label-box"]
fg = "white"
bg = "#2e3436"
bold = true

[rules."value-rect"]
fg = "#00ff66"
bg = "black"
border = "#3a3a3a"

[rules."value-rect.selected"]
fg = "#333333"
bg = "white"
border = "#e6b04d"
bold = true
"##;

/// Presentation attributes attached to a selector.
///
/// Colour strings are opaque at this level; the renderer decides what they mean.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StyleRule {
    #[serde(default)]
    pub fg: Option<String>,
    #[serde(default)]
    pub bg: Option<String>,
    #[serde(default)]
    pub border: Option<String>,
    #[serde(default)]
    pub bold: Option<bool>,
}

impl StyleRule {
    /// Overlay the attributes set in `other` on top of `self`.
    fn apply(&mut self, other: &StyleRule) {
        if other.fg.is_some() {
            self.fg.clone_from(&other.fg);
        }
        if other.bg.is_some() {
            self.bg.clone_from(&other.bg);
        }
        if other.border.is_some() {
            self.border.clone_from(&other.border);
        }
        if other.bold.is_some() {
            self.bold = other.bold;
        }
    }
}

/// Compound class selector, e.g. `value-rect.selected`.
///
/// A leading element name (`button.value-rect`) is not supported: every
/// dot-separated part is a class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    classes: Vec<String>,
}

impl Selector {
    /// Parse a selector. A leading dot is optional.
    ///
    /// # Errors
    /// Returns [`PanelError::InvalidSelector`] for an empty selector or a class
    /// containing anything other than ASCII alphanumerics, `-` and `_`.
    ///
    /// # Example
    /// ```
    /// use rp_core::style::Selector;
    /// let sel = Selector::parse(".value-rect.selected").unwrap();
    /// assert_eq!(sel.specificity(), 2);
    /// assert!(Selector::parse("value rect").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, PanelError> {
        let invalid = || PanelError::InvalidSelector {
            selector: text.to_string(),
        };
        let body = text.trim().strip_prefix('.').unwrap_or(text.trim());
        if body.is_empty() {
            return Err(invalid());
        }

        let mut classes = Vec::new();
        for part in body.split('.') {
            let valid = !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid {
                return Err(invalid());
            }
            classes.push(part.to_string());
        }

        Ok(Self { classes })
    }

    /// True when every class of the selector is on the element.
    #[must_use]
    pub fn matches(&self, element: &ClassSet) -> bool {
        self.classes.iter().all(|c| element.contains(c))
    }

    #[must_use]
    pub fn specificity(&self) -> usize {
        self.classes.len()
    }
}

/// On-disk form: one table per selector under `[rules]`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StylesheetFile {
    #[serde(default)]
    rules: BTreeMap<String, StyleRule>,
}

/// Ordered set of class-selector rules.
///
/// # Example
/// ```
/// use rp_core::row::ClassSet;
/// use rp_core::style::Stylesheet;
///
/// let sheet = Stylesheet::builtin();
/// let selected = sheet.resolve(&ClassSet::from_iter(["value-rect", "selected"]));
/// assert_eq!(selected.bg.as_deref(), Some("white"));
/// let idle = sheet.resolve(&ClassSet::from_iter(["value-rect"]));
/// assert_eq!(idle.bg.as_deref(), Some("black"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Stylesheet {
    rules: Vec<(Selector, StyleRule)>,
}

impl Stylesheet {
    /// Parse a TOML stylesheet.
    ///
    /// # Errors
    /// Returns an error on TOML syntax errors, unknown keys, or invalid selectors.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: StylesheetFile =
            toml::from_str(source).context("Erreur de parsing TOML de la feuille de style")?;

        let mut rules = Vec::with_capacity(file.rules.len());
        for (text, rule) in file.rules {
            rules.push((Selector::parse(&text)?, rule));
        }
        // Tri stable : à spécificité égale, l'ordre lexical des sélecteurs est conservé.
        rules.sort_by_key(|(sel, _)| sel.specificity());
        Ok(Self { rules })
    }

    /// Built-in stylesheet, or an unstyled one if it somehow fails to parse.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_STYLESHEET).unwrap_or_else(|e| {
            log::warn!("Feuille de style intégrée invalide, rendu sans style : {e:#}");
            Self::default()
        })
    }

    /// Load `path` if given, falling back to [`Stylesheet::builtin`] on any failure.
    #[must_use]
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };
        match load_stylesheet(path) {
            Ok(sheet) => {
                log::info!("Feuille de style chargée depuis {}", path.display());
                sheet
            }
            Err(e) => {
                log::warn!("Échec du chargement de la feuille de style : {e:#}");
                Self::builtin()
            }
        }
    }

    /// Cascade every matching rule, least specific first.
    #[must_use]
    pub fn resolve(&self, element: &ClassSet) -> StyleRule {
        let mut out = StyleRule::default();
        for (selector, rule) in &self.rules {
            if selector.matches(element) {
                out.apply(rule);
            }
        }
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Read and parse a stylesheet file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_stylesheet(path: &Path) -> Result<Stylesheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    Stylesheet::from_toml_str(&content)
        .with_context(|| format!("Feuille de style invalide : {}", path.display()))
}
