use ratatui::style::{Color, Modifier, Style};

/// Semantic color roles for the sidebar shell.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    pub border: Color,
    pub text: Color,
    pub text_muted: Color,
    pub accent_primary: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub focus: Color,
}

impl Default for ThemeRoles {
    fn default() -> Self {
        Self {
            border: Color::DarkGray,
            text: Color::Gray,
            text_muted: Color::DarkGray,
            accent_primary: Color::Cyan,
            selection_bg: Color::Blue,
            selection_fg: Color::White,
            focus: Color::Cyan,
        }
    }
}

impl ThemeRoles {
    pub fn text_primary_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn text_muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.focus } else { self.border };
        Style::default().fg(color)
    }

    /// Rows whose route predicate matches the current path.
    pub fn active_style(&self) -> Style {
        Style::default().fg(self.accent_primary).add_modifier(Modifier::BOLD)
    }

    pub fn selection_style(&self) -> Style {
        Style::default().fg(self.selection_fg).bg(self.selection_bg)
    }
}
