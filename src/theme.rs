use ratatui::style::Color;

// Centralized theme colors. RGB values go through `crate::palette` so they
// degrade to the xterm-256 table on terminals without truecolor.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);
pub const ACCENT_ALT_RGB: (u8, u8, u8) = (255, 165, 0);

pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    crate::palette::map_rgb(rgb.0, rgb.1, rgb.2)
}

pub fn accent() -> Color {
    rgb_to_color(ACCENT_RGB)
}

pub fn accent_alt() -> Color {
    rgb_to_color(ACCENT_ALT_RGB)
}

// Rails
pub fn rail() -> Color {
    accent()
}

// Areas
pub fn area_border() -> Color {
    Color::DarkGray
}
pub fn area_active_border() -> Color {
    accent_alt()
}
pub fn area_label() -> Color {
    Color::Black
}

// Status bar
pub fn status_bg() -> Color {
    Color::DarkGray
}
pub fn status_fg() -> Color {
    Color::White
}

// Setup prompt
pub fn dialog_bg() -> Color {
    Color::Black
}
pub fn dialog_fg() -> Color {
    Color::White
}
pub fn dialog_separator() -> Color {
    Color::DarkGray
}
pub fn choice_selected_bg() -> Color {
    Color::Blue
}
pub fn choice_selected_fg() -> Color {
    Color::White
}
pub fn choice_bg() -> Color {
    Color::DarkGray
}

// Debug log highlight
pub fn debug_highlight() -> Color {
    accent_alt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_returns_a_color_variant() {
        match accent() {
            Color::Rgb(_, _, _) | Color::Indexed(_) => {}
            other => panic!("unexpected color variant {other:?}"),
        }
    }

    #[test]
    fn rail_uses_the_accent() {
        assert_eq!(rail(), accent());
    }
}
