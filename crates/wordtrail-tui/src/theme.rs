use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Background color
    pub bg: Color,
    /// Default letter color
    pub fg: Color,
    /// Grid border color
    pub border: Color,
    /// Cells in the live trace
    pub selected_bg: Color,
    /// Cells of a solved word
    pub solved_bg: Color,
    pub solved_fg: Color,
    /// First-letter hint flash
    pub highlight_bg: Color,
    /// Keyboard cursor
    pub cursor_bg: Color,
    /// Error color
    pub error: Color,
    /// Success color
    pub success: Color,
    /// Info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            name: "dark",
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            selected_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            solved_bg: Color::Rgb { r: 40, g: 120, b: 70 },
            solved_fg: Color::Rgb { r: 255, g: 255, b: 255 },
            highlight_bg: Color::Rgb { r: 200, g: 150, b: 40 },
            cursor_bg: Color::Rgb { r: 45, g: 50, b: 70 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            name: "light",
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 180, g: 180, b: 195 },
            selected_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            solved_bg: Color::Rgb { r: 150, g: 220, b: 160 },
            solved_fg: Color::Rgb { r: 0, g: 0, b: 0 },
            highlight_bg: Color::Rgb { r: 255, g: 220, b: 120 },
            cursor_bg: Color::Rgb { r: 225, g: 228, b: 240 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }
}
