pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    category_name, error, file_line, header, info, muted, section, series_code, sign_line, status,
    success, summary_row, warn,
};
pub use progress::{ImportProgress, Spinner};
pub use table::{categories_table, report_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};
