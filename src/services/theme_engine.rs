//! Theme engine — maps reader themes to concrete palettes and the CSS
//! variables injected into reading-surface documents.

use std::collections::HashMap;

use crate::types::reader::{Palette, ReaderTheme};

/// Reading typeface shared by all themes.
const READER_FONT_FAMILY: &str = "Georgia, 'Iowan Old Style', 'Times New Roman', serif";

const LIGHT: Palette = Palette {
    background: "#ffffff",
    foreground: "#1a1a1a",
    muted: "#6b6b6b",
    border: "#e2e2e2",
    header_background: "#fafafa",
    selection_background: "#ffe9a8",
    selection_text: "#1a1a1a",
    highlight_button_background: "#ffd54f",
    highlight_button_text: "#1a1a1a",
    saved_highlight_background: "#fff3b0",
};

const SEPIA: Palette = Palette {
    background: "#f4ecd8",
    foreground: "#433422",
    muted: "#8a7a5c",
    border: "#e0d3b8",
    header_background: "#efe6cf",
    selection_background: "#e8d7a8",
    selection_text: "#433422",
    highlight_button_background: "#d9b86a",
    highlight_button_text: "#433422",
    saved_highlight_background: "#ecd9a2",
};

const DARK: Palette = Palette {
    background: "#1a1a1a",
    foreground: "#e8e6e3",
    muted: "#9e9e9e",
    border: "#333333",
    header_background: "#242424",
    selection_background: "#4a4224",
    selection_text: "#ffe082",
    highlight_button_background: "#caa53d",
    highlight_button_text: "#1a1a1a",
    saved_highlight_background: "#5c4d1f",
};

/// Resolves a theme to its palette. Total — every theme value maps to a
/// fully populated palette, so callers never handle a missing color.
pub fn resolve_theme(theme: ReaderTheme) -> Palette {
    match theme {
        ReaderTheme::Light => LIGHT,
        ReaderTheme::Sepia => SEPIA,
        ReaderTheme::Dark => DARK,
    }
}

/// Builds the CSS custom-property map for a theme. Used both by the
/// reading-surface document template and by the host chrome pages.
pub fn css_variables(theme: ReaderTheme) -> HashMap<String, String> {
    let palette = resolve_theme(theme);
    let mut vars = HashMap::new();
    vars.insert("--reader-bg".into(), palette.background.into());
    vars.insert("--reader-fg".into(), palette.foreground.into());
    vars.insert("--reader-muted".into(), palette.muted.into());
    vars.insert("--reader-border".into(), palette.border.into());
    vars.insert("--reader-header-bg".into(), palette.header_background.into());
    vars.insert(
        "--reader-selection-bg".into(),
        palette.selection_background.into(),
    );
    vars.insert("--reader-selection-fg".into(), palette.selection_text.into());
    vars.insert(
        "--reader-highlight-btn-bg".into(),
        palette.highlight_button_background.into(),
    );
    vars.insert(
        "--reader-highlight-btn-fg".into(),
        palette.highlight_button_text.into(),
    );
    vars.insert(
        "--reader-saved-highlight-bg".into(),
        palette.saved_highlight_background.into(),
    );
    vars.insert("--reader-font-family".into(), READER_FONT_FAMILY.into());
    vars
}

/// Colors for a theme's selector swatch: each swatch previews its own
/// highlight-button colors, not the colors of the theme currently shown.
pub fn swatch_colors(theme: ReaderTheme) -> (&'static str, &'static str) {
    let palette = resolve_theme(theme);
    (
        palette.highlight_button_background,
        palette.highlight_button_text,
    )
}
