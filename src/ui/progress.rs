use crate::importer::{ImportEvent, ImportReport};
use crate::ui::theme;
use crate::ui::Icons;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

/// Progress bar driven by [`ImportEvent`]s
pub struct ImportProgress {
    bar: ProgressBar,
}

impl ImportProgress {
    /// Hidden when stdout is not a terminal or `quiet` is set
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet || !console::Term::stdout().is_term() {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner} [{bar:30}] {pos}/{len} signs {msg}",
            ) {
                bar.set_style(style.progress_chars("=> "));
            }
            bar
        };
        Self { bar }
    }

    pub fn handle(&self, event: ImportEvent) {
        match event {
            ImportEvent::Started { total_signs } => {
                self.bar.set_length(total_signs as u64);
                self.bar.enable_steady_tick(Duration::from_millis(100));
            }
            ImportEvent::Sign { current, designation } => {
                self.bar.set_position(current as u64);
                self.bar.set_message(designation);
            }
            ImportEvent::Finished => {
                self.bar.finish_and_clear();
            }
        }
    }

    /// Clear the bar without finishing, e.g. after a failed import
    pub fn abandon(&self) {
        self.bar.finish_and_clear();
    }

    pub fn finish_with_summary(&self, duration: Duration, report: &ImportReport) {
        self.bar.finish_and_clear();
        println!();
        println!(
            "{} {}",
            Icons::CHECK.style(theme().ok.clone()),
            format!("Import committed in {}", HumanDuration(duration)).style(theme().ok.clone())
        );
        println!(
            "  {} {}  {} {}  {} {}  {} {}",
            Icons::FOLDER,
            report.categories.style(theme().count.clone()),
            Icons::PACKAGE,
            report.series.style(theme().count.clone()),
            Icons::SIGN,
            report.signs.style(theme().count.clone()),
            Icons::LINK,
            report.sign_files.style(theme().count.clone())
        );
    }
}

pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Hidden under `SIGNDB_QUIET`
    pub fn new(message: &str) -> Self {
        Self::with_quiet(message, crate::output::is_quiet())
    }

    /// Hidden when stdout is not a terminal or `quiet` is set
    pub fn with_quiet(message: &str, quiet: bool) -> Self {
        if quiet || !console::Term::stdout().is_term() {
            return Self { pb: ProgressBar::hidden() };
        }
        let pb = ProgressBar::new_spinner();
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    pub fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }
}
