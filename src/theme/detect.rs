use super::ThemeVariant;

const LIGHT_LUMA_THRESHOLD: f32 = 0.6;

/// Guesses the terminal background from its reported luma, defaulting to dark
/// when the terminal does not answer.
pub fn detect_terminal_theme() -> ThemeVariant {
    match terminal_light::luma() {
        Ok(luma) => variant_for_luma(luma),
        Err(e) => {
            tracing::debug!(error = %e, "terminal background detection failed");
            ThemeVariant::Dark
        }
    }
}

fn variant_for_luma(luma: f32) -> ThemeVariant {
    if luma > LIGHT_LUMA_THRESHOLD {
        ThemeVariant::Light
    } else {
        ThemeVariant::Dark
    }
}
