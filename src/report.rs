//! Plain-text tables for the walkthrough.
//!
//! Every writer takes any [`Write`] so the binary can print to stdout and tests
//! can capture into a `Vec<u8>`.

use crate::error::Result;
use crate::pipeline::{
    CategoryCount, CategoryRating, CleanDataset, CleanReport, GenreRevenue, InstallTier, Record,
};
use crate::utils::{fmt_currency, fmt_opt, fmt_thousands};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// A titled table with per-column alignment.
struct Table {
    title: String,
    columns: Vec<(&'static str, Align)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn new(title: impl Into<String>, columns: Vec<(&'static str, Align)>) -> Self {
        Self {
            title: title.into(),
            columns,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, (header, _))| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn write_to(&self, out: &mut impl Write) -> Result<()> {
        let widths = self.widths();
        writeln!(out, "{}", self.title)?;

        let headers: Vec<String> = self.columns.iter().map(|(h, _)| (*h).to_owned()).collect();
        self.write_row(out, &headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(out, "{}", rule.join("  "))?;

        if self.rows.is_empty() {
            writeln!(out, "(no rows)")?;
        }
        for row in &self.rows {
            self.write_row(out, row, &widths)?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_row(&self, out: &mut impl Write, cells: &[String], widths: &[usize]) -> Result<()> {
        let mut line = Vec::with_capacity(cells.len());
        for ((cell, width), (_, align)) in cells.iter().zip(widths).zip(&self.columns) {
            let pad = width.saturating_sub(cell.chars().count());
            line.push(match align {
                Align::Left => format!("{cell}{}", " ".repeat(pad)),
                Align::Right => format!("{}{cell}", " ".repeat(pad)),
            });
        }
        writeln!(out, "{}", line.join("  ").trim_end())?;
        Ok(())
    }
}

fn count(value: u64) -> String {
    fmt_thousands(value)
}

fn signed_count(value: i64) -> String {
    fmt_thousands(value.unsigned_abs())
}

/// Row accounting for Clean plus the resulting column types.
pub fn write_clean_report(
    out: &mut impl Write,
    duplicates_removed: usize,
    report: &CleanReport,
    cleaned: &CleanDataset,
) -> Result<()> {
    writeln!(out, "Duplicate records removed: {}", count(duplicates_removed as u64))?;
    writeln!(out, "{}", report.summary())?;
    for err in &report.parse_errors {
        writeln!(out, "  skipped: {err}")?;
    }
    writeln!(out)?;

    let mut table = Table::new(
        format!("Cleaned dataset: {} records", count(cleaned.height() as u64)),
        vec![("Column", Align::Left), ("Type", Align::Left)],
    );
    for column in cleaned.frame().get_columns() {
        table.push(vec![column.name().to_string(), column.dtype().to_string()]);
    }
    table.write_to(out)
}

pub fn write_category_counts(
    out: &mut impl Write,
    counts: &[CategoryCount],
    top_n: usize,
) -> Result<()> {
    let mut table = Table::new(
        "Number of Apps per Category",
        vec![("Category", Align::Left), ("Apps", Align::Right)],
    );
    for c in counts.iter().take(top_n) {
        table.push(vec![c.category.clone(), count(c.apps)]);
    }
    table.write_to(out)
}

pub fn write_category_ratings(
    out: &mut impl Write,
    ratings: &[CategoryRating],
    top_n: usize,
) -> Result<()> {
    let mut table = Table::new(
        "Average Rating per Category",
        vec![
            ("Category", Align::Left),
            ("Mean rating", Align::Right),
            ("Apps", Align::Right),
        ],
    );
    for r in ratings.iter().take(top_n) {
        table.push(vec![
            r.category.clone(),
            fmt_opt(Some(r.mean_rating)),
            count(r.apps),
        ]);
    }
    table.write_to(out)
}

/// Install tiers are ordered by Installs, so the table is never truncated.
pub fn write_install_tiers(out: &mut impl Write, tiers: &[InstallTier]) -> Result<()> {
    let mut table = Table::new(
        "Rating vs Installs",
        vec![
            ("Installs", Align::Right),
            ("Apps", Align::Right),
            ("Mean rating", Align::Right),
        ],
    );
    for t in tiers {
        table.push(vec![
            signed_count(t.installs),
            count(t.apps),
            fmt_opt(Some(t.mean_rating)),
        ]);
    }
    table.write_to(out)
}

pub fn write_genre_revenue(
    out: &mut impl Write,
    genres: &[GenreRevenue],
    top_n: usize,
) -> Result<()> {
    let mut table = Table::new(
        format!("Top {top_n} Genres by Revenue Potential"),
        vec![("Genres", Align::Left), ("Revenue", Align::Right)],
    );
    for g in genres.iter().take(top_n) {
        table.push(vec![g.genre.clone(), fmt_currency(g.revenue)]);
    }
    table.write_to(out)
}

/// One row per category, untruncated.
pub fn write_top_rated(out: &mut impl Write, winners: &[Record]) -> Result<()> {
    let mut table = Table::new(
        "Top Rated Apps by Category",
        vec![
            ("App", Align::Left),
            ("Category", Align::Left),
            ("Rating", Align::Right),
            ("Reviews", Align::Right),
            ("Installs", Align::Right),
        ],
    );
    for r in winners {
        table.push(vec![
            r.app.clone(),
            r.category.clone(),
            format!("{:.1}", r.rating),
            signed_count(r.reviews),
            signed_count(r.installs),
        ]);
    }
    table.write_to(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_table_alignment() {
        let counts = vec![
            CategoryCount {
                category: "FAMILY".to_owned(),
                apps: 1_832,
            },
            CategoryCount {
                category: "ART".to_owned(),
                apps: 64,
            },
        ];
        let text = render(|out| write_category_counts(out, &counts, 15));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Number of Apps per Category");
        assert_eq!(lines[1], "Category   Apps");
        assert_eq!(lines[2], "--------  -----");
        assert_eq!(lines[3], "FAMILY    1,832");
        assert_eq!(lines[4], "ART          64");
    }

    #[test]
    fn test_top_n_truncates_ranked_tables() {
        let genres: Vec<GenreRevenue> = (0..5_i32)
            .map(|i| GenreRevenue {
                genre: format!("Genre {i}"),
                revenue: f64::from(100 - i),
            })
            .collect();
        let text = render(|out| write_genre_revenue(out, &genres, 2));

        assert!(text.contains("Top 2 Genres by Revenue Potential"));
        assert!(text.contains("Genre 1"));
        assert!(!text.contains("Genre 2"));
        assert!(text.contains("$100"));
    }

    #[test]
    fn test_top_rated_columns() {
        let winners = vec![Record {
            app: "Hex Solver".to_owned(),
            category: "GAME".to_owned(),
            rating: 4.8,
            reviews: 1_500,
            installs: 10_000,
            price: 1.99,
            genres: "Puzzle".to_owned(),
            revenue: None,
        }];
        let text = render(|out| write_top_rated(out, &winners));

        assert!(text.contains("App         Category  Rating  Reviews  Installs"));
        assert!(text.contains("Hex Solver  GAME         4.8    1,500    10,000"));
    }

    #[test]
    fn test_empty_table() {
        let text = render(|out| write_install_tiers(out, &[]));
        assert!(text.contains("(no rows)"));
    }
}
