use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for console output, split between status lines and catalog rows
#[derive(Debug, Clone)]
pub struct Theme {
    pub heading: Style,
    pub ok: Style,
    pub failure: Style,
    pub caution: Style,
    pub accent: Style,
    pub label: Style,
    pub muted: Style,

    pub category: Style,
    pub series: Style,
    pub designation: Style,
    pub file_type: Style,
    pub url: Style,
    pub count: Style,
}

impl Theme {
    /// Plain output when stdout is not a terminal or `NO_COLOR` is set
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if no_color || !console::Term::stdout().is_term() {
            Self::plain()
        } else {
            Self::colored()
        }
    }

    pub fn colored() -> Self {
        Self {
            heading: Style::new().blue().bold(),
            ok: Style::new().green().bold(),
            failure: Style::new().red().bold(),
            caution: Style::new().yellow().bold(),
            accent: Style::new().cyan(),
            label: Style::new().dimmed(),
            muted: Style::new().bright_black(),

            category: Style::new().blue().bold(),
            series: Style::new().cyan(),
            designation: Style::new().yellow().bold(),
            file_type: Style::new().magenta(),
            url: Style::new().underline(),
            count: Style::new().bold(),
        }
    }

    pub fn plain() -> Self {
        Self {
            heading: Style::new(),
            ok: Style::new(),
            failure: Style::new(),
            caution: Style::new(),
            accent: Style::new(),
            label: Style::new(),
            muted: Style::new(),
            category: Style::new(),
            series: Style::new(),
            designation: Style::new(),
            file_type: Style::new(),
            url: Style::new(),
            count: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_plain_theme_leaves_catalog_text_alone() {
        let plain = Theme::plain();
        assert_eq!("R1-1".style(plain.designation).to_string(), "R1-1");
        assert_eq!("svg".style(plain.file_type).to_string(), "svg");
    }

    #[test]
    fn test_colored_theme_marks_catalog_elements() {
        let colored = Theme::colored();
        let designation = "R1-1".style(colored.designation.clone()).to_string();
        let category = "Regulatory Signs".style(colored.category.clone()).to_string();
        assert!(designation.contains("\x1b[") && designation.contains("R1-1"));
        assert!(category.contains("\x1b["));
        assert_ne!(designation, "R1-1".style(colored.series).to_string());
    }
}
