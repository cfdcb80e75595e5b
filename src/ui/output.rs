use crate::catalog::{FileType, Sign};
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::ROCKET, text.style(theme().heading.clone()));
}

pub fn status(icon: &str, label: &str, value: &str) {
    println!("{} {}: {}", icon, label.style(theme().label.clone()), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().ok.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().failure.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().caution.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().accent.clone()),
        label.style(theme().label.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().heading.clone()));
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted.clone()).to_string()
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().label.clone()), value);
}

pub fn category_name(name: &str) -> String {
    name.style(theme().category.clone()).to_string()
}

pub fn series_code(code: &str) -> String {
    code.style(theme().series.clone()).to_string()
}

/// `🛑 R1-1  Stop`
pub fn sign_line(sign: &Sign) {
    println!(
        "{} {}  {}",
        Icons::SIGN,
        sign.designation.style(theme().designation.clone()),
        sign.name
    );
    if let Some(notes) = sign.notes.as_deref().filter(|n| !n.is_empty()) {
        println!("   {}", notes.style(theme().muted.clone()));
    }
}

/// `  🔗 svg       https://...`
pub fn file_line(file_type: FileType, url: &str) {
    println!(
        "  {} {:<9} {}",
        Icons::LINK.style(theme().accent.clone()),
        file_type.as_str().style(theme().file_type.clone()),
        url.style(theme().url.clone())
    );
}
