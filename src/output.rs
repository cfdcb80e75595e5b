use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `SIGNDB_QUIET=1` hides progress bars
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| quiet_from(std::env::var("SIGNDB_QUIET").ok().as_deref()))
}

fn quiet_from(value: Option<&str>) -> bool {
    value
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
