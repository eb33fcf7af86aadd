use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use rp_core::row::ClassSet;
use rp_core::style::{StyleRule, Stylesheet};

/// Terminal styles resolved for one element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ElementStyle {
    /// Text and fill.
    pub body: Style,
    /// Border line, falls back to the text colour.
    pub border: Style,
}

/// Parse a stylesheet colour: ratatui names (`white`, `darkgray`), `#rrggbb`, or an index.
///
/// Unknown colours are ignored so a typo does not break rendering.
#[must_use]
pub fn parse_color(text: &str) -> Option<Color> {
    match Color::from_str(text.trim()) {
        Ok(color) => Some(color),
        Err(_) => {
            log::debug!("Couleur inconnue ignorée : {text:?}");
            None
        }
    }
}

/// Convert a resolved rule into ratatui styles.
///
/// # Example
/// ```
/// use ratatui::style::Color;
/// use rp_core::style::StyleRule;
/// use rp_render::theme::to_element_style;
///
/// let rule = StyleRule { fg: Some("#00ff66".into()), bg: Some("black".into()), ..Default::default() };
/// let style = to_element_style(&rule);
/// assert_eq!(style.body.fg, Some(Color::Rgb(0, 255, 102)));
/// assert_eq!(style.border.fg, Some(Color::Rgb(0, 255, 102)));
/// ```
#[must_use]
pub fn to_element_style(rule: &StyleRule) -> ElementStyle {
    let mut body = Style::default();
    let fg = rule.fg.as_deref().and_then(parse_color);
    if let Some(fg) = fg {
        body = body.fg(fg);
    }
    if let Some(bg) = rule.bg.as_deref().and_then(parse_color) {
        body = body.bg(bg);
    }
    if rule.bold == Some(true) {
        body = body.add_modifier(Modifier::BOLD);
    }

    let border = match rule.border.as_deref().and_then(parse_color).or(fg) {
        Some(color) => body.fg(color).remove_modifier(Modifier::BOLD),
        None => body,
    };

    ElementStyle { body, border }
}

/// Cascade `classes` through the stylesheet and convert the result.
#[must_use]
pub fn resolve(sheet: &Stylesheet, classes: &ClassSet) -> ElementStyle {
    to_element_style(&sheet.resolve(classes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_selected_value_is_inverted() {
        let sheet = Stylesheet::builtin();
        let idle = resolve(&sheet, &ClassSet::from_iter(["value-rect"]));
        let selected = resolve(&sheet, &ClassSet::from_iter(["value-rect", "selected"]));

        assert_eq!(idle.body.bg, Some(Color::Black));
        assert_eq!(selected.body.bg, Some(Color::White));
        assert_eq!(selected.border.fg, Some(Color::Rgb(0xe6, 0xb0, 0x4d)));
        assert!(selected.body.add_modifier.contains(Modifier::BOLD));
        assert!(!selected.border.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn bad_colour_is_skipped() {
        let rule = StyleRule {
            fg: Some("not-a-colour".into()),
            bg: Some("blue".into()),
            ..StyleRule::default()
        };
        let style = to_element_style(&rule);
        assert_eq!(style.body.fg, None);
        assert_eq!(style.body.bg, Some(Color::Blue));
    }

    #[test]
    fn empty_sheet_is_unstyled() {
        let style = resolve(&Stylesheet::default(), &ClassSet::from_iter(["label-box"]));
        assert_eq!(style, ElementStyle::default());
    }
}
