use tabled::{settings::Style, Table, Tabled};

use crate::catalog::Category;
use crate::importer::ImportReport;
use crate::storage::DbStats;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Table")]
    pub metric: String,
    #[tabled(rename = "Rows")]
    pub value: String,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Series")]
    series: usize,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("categories", &stats.categories.to_string());
    builder.add_row("series", &stats.series.to_string());
    builder.add_row("signs", &stats.signs.to_string());
    builder.add_row("sign_files", &stats.sign_files.to_string());
    builder.build()
}

pub fn report_table(report: &ImportReport) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("categories", &report.categories.to_string());
    builder.add_row("series", &report.series.to_string());
    builder.add_row("signs", &report.signs.to_string());
    builder.add_row("sign_files (appended)", &report.sign_files.to_string());
    builder.build()
}

/// Categories with their series counts
pub fn categories_table(categories: &[(Category, usize)]) -> String {
    if categories.is_empty() {
        return String::new();
    }
    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|(category, series)| CategoryRow {
            id: category.id,
            name: category.name.clone(),
            series: *series,
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_table_lists_every_table() {
        let table = stats_table(&DbStats { categories: 2, series: 3, signs: 40, sign_files: 99 });
        for needle in ["categories", "series", "signs", "sign_files", "40", "99"] {
            assert!(table.contains(needle), "missing {} in\n{}", needle, table);
        }
    }

    #[test]
    fn test_empty_tables() {
        assert!(TableBuilder::new().build().is_empty());
        assert!(categories_table(&[]).is_empty());
    }

    #[test]
    fn test_categories_table() {
        let category = Category {
            id: 7,
            name: "Warning Signs".to_string(),
            description: None,
        };
        let table = categories_table(&[(category, 12)]);
        assert!(table.contains("Warning Signs"));
        assert!(table.contains("12"));
    }
}
