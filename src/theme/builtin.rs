use super::{ResolvedTheme, Theme, ThemeColor, ThemeColors, ThemeVariant};

pub fn all_themes() -> Vec<Theme> {
    vec![default_dark(), default_light()]
}

/// Looks a theme up by full name, or by variant (`dark`, `light`).
pub fn by_name(name: &str) -> Option<Theme> {
    match name {
        "dark" => Some(default_dark()),
        "light" => Some(default_light()),
        _ => all_themes().into_iter().find(|t| t.name == name),
    }
}

pub fn default_for_variant(variant: ThemeVariant) -> ResolvedTheme {
    match variant {
        ThemeVariant::Dark => default_dark().into(),
        ThemeVariant::Light => default_light().into(),
    }
}

fn named(s: &str) -> ThemeColor {
    ThemeColor::Named(s.to_string())
}

pub fn default_dark() -> Theme {
    Theme {
        name: "default-dark".to_string(),
        variant: ThemeVariant::Dark,
        colors: ThemeColors {
            foreground: named("white"),
            foreground_dim: named("#8A8F98"),
            border: named("#5C6370"),
            primary: named("#E5484D"),
            error: named("lightred"),
            video_title: named("white"),
            channel: named("cyan"),
            views: named("yellow"),
            likes: named("#E5484D"),
            tag: named("#61AFEF"),
            progress: named("#E5484D"),
            dot_active: named("white"),
            dot_inactive: named("darkgray"),
            status_bar_bg: named("#E5484D"),
            status_bar_fg: named("white"),
            spinner: named("yellow"),
        },
    }
}

pub fn default_light() -> Theme {
    Theme {
        name: "default-light".to_string(),
        variant: ThemeVariant::Light,
        colors: ThemeColors {
            foreground: named("black"),
            foreground_dim: named("darkgray"),
            border: named("gray"),
            primary: named("#C62828"),
            error: named("red"),
            video_title: named("black"),
            channel: named("blue"),
            views: named("#B8860B"),
            likes: named("#C62828"),
            tag: named("blue"),
            progress: named("#C62828"),
            dot_active: named("black"),
            dot_inactive: named("gray"),
            status_bar_bg: named("#C62828"),
            status_bar_fg: named("white"),
            spinner: named("blue"),
        },
    }
}
