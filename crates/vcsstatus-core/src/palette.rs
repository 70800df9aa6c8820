use console::Style;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    Plain,
    Red,
    Green,
    Yellow,
    Magenta,
    Cyan,
    White,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
}

impl Accent {
    fn style(self) -> Style {
        let style = Style::new().force_styling(true);
        match self {
            Accent::Plain => style,
            Accent::Red => style.red(),
            Accent::Green => style.green(),
            Accent::Yellow => style.yellow(),
            Accent::Magenta => style.magenta(),
            Accent::Cyan => style.cyan(),
            Accent::White => style.white(),
            Accent::BrightRed => style.red().bright(),
            Accent::BrightGreen => style.green().bright(),
            Accent::BrightYellow => style.yellow().bright(),
            Accent::BrightBlue => style.blue().bright(),
            Accent::BrightMagenta => style.magenta().bright(),
            Accent::BrightCyan => style.cyan().bright(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn paint(&self, accent: Accent, text: &str) -> String {
        if !self.enabled || accent == Accent::Plain || text.is_empty() {
            return text.to_string();
        }
        accent.style().apply_to(text).to_string()
    }
}

pub fn strip_ansi(text: &str) -> String {
    console::strip_ansi_codes(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_palette_leaves_text_alone() {
        let palette = Palette::new(false);
        assert_eq!(palette.paint(Accent::BrightRed, "main"), "main");
    }

    #[test]
    fn enabled_palette_strips_back_to_plain() {
        let palette = Palette::new(true);
        let painted = palette.paint(Accent::Green, "main");
        assert_ne!(painted, "main");
        assert!(painted.contains('\u{1b}'));
        assert_eq!(strip_ansi(&painted), "main");
    }
}
