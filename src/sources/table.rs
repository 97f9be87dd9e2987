//! HTML table extraction shared by the scraped sources.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};

/// A table flattened into a grid of trimmed cell texts.
///
/// `colspan` cells are repeated so header labels line up with data columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlTable {
    pub rows: Vec<Vec<String>>,
}

impl HtmlTable {
    /// Flatten `table`, skipping rows that belong to nested tables.
    pub fn from_element(table: ElementRef<'_>) -> Result<Self> {
        let row_selector = selector("tr")?;
        let cell_selector = selector("th, td")?;

        let rows = table
            .select(&row_selector)
            .filter(|row| owning_table(*row).map(|t| t.id()) == Some(table.id()))
            .map(|row| {
                let mut cells = Vec::new();
                for cell in row.select(&cell_selector) {
                    if owning_row(cell).map(|r| r.id()) != Some(row.id()) {
                        continue;
                    }
                    let span = cell
                        .value()
                        .attr("colspan")
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(1)
                        .clamp(1, 64);
                    let text = cell_text(cell);
                    cells.extend(std::iter::repeat(text).take(span));
                }
                cells
            })
            .filter(|cells| !cells.is_empty())
            .collect();

        Ok(Self { rows })
    }

    /// Index of the first row with a cell equal to `token` (whitespace ignored).
    pub fn header_row(&self, token: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.iter().any(|cell| normalize_key(cell) == token))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.header_row(token).is_some()
    }
}

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Internal(format!("bad selector {}: {:?}", css, e)))
}

/// All top-level and nested tables under `root`, in document order.
pub fn tables_in(root: ElementRef<'_>) -> Result<Vec<HtmlTable>> {
    let table_selector = selector("table")?;
    root.select(&table_selector)
        .map(HtmlTable::from_element)
        .collect()
}

/// All tables in the document.
pub fn all_tables(document: &Html) -> Result<Vec<HtmlTable>> {
    tables_in(document.root_element())
}

/// Table whose `id` attribute equals `id` exactly.
///
/// Ids are compared literally, so ids with CSS-special characters work.
pub fn table_by_id(document: &Html, id: &str) -> Result<Option<HtmlTable>> {
    let table_selector = selector("table")?;
    document
        .select(&table_selector)
        .find(|t| t.value().id() == Some(id))
        .map(HtmlTable::from_element)
        .transpose()
}

/// First table carrying any of `classes`.
pub fn table_by_class(document: &Html, classes: &[&str]) -> Result<Option<HtmlTable>> {
    let table_selector = selector("table")?;
    document
        .select(&table_selector)
        .find(|t| t.value().classes().any(|c| classes.contains(&c)))
        .map(HtmlTable::from_element)
        .transpose()
}

/// Element with the given `id`, any tag.
pub fn element_by_id<'a>(document: &'a Html, id: &str) -> Result<Option<ElementRef<'a>>> {
    let any = selector("*")?;
    Ok(document.select(&any).find(|e| e.value().id() == Some(id)))
}

/// Cell text with runs of whitespace collapsed to one space.
pub fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Header key with all whitespace removed.
pub fn normalize_key(label: &str) -> String {
    label.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse a scraped number, tolerating thousands separators and a trailing `%`.
///
/// Blank, dash and non-finite cells are `None`.
pub fn coerce_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn owning_table(node: ElementRef<'_>) -> Option<ElementRef<'_>> {
    nearest_ancestor(node, "table")
}

fn owning_row(node: ElementRef<'_>) -> Option<ElementRef<'_>> {
    nearest_ancestor(node, "tr")
}

fn nearest_ancestor<'a>(node: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    node.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colspan_expands() {
        let html = Html::parse_document(
            "<table><tr><th colspan=\"2\">A</th><th>B</th></tr><tr><td>1</td><td>2</td><td>3</td></tr></table>",
        );
        let tables = all_tables(&html).unwrap();
        assert_eq!(tables[0].rows[0], vec!["A", "A", "B"]);
        assert_eq!(tables[0].rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_nested_rows_stay_with_inner_table() {
        let html = Html::parse_document(
            "<table id=\"outer\"><tr><td>x<table><tr><td>inner</td></tr></table></td></tr></table>",
        );
        let outer = table_by_id(&html, "outer").unwrap().unwrap();
        assert_eq!(outer.rows.len(), 1);
        assert_eq!(outer.rows[0].len(), 1);
    }

    #[test]
    fn test_id_with_special_characters() {
        let html = Html::parse_document(
            "<table id=\"a.(b)_1\"><tr><td>ok</td></tr></table>",
        );
        assert!(table_by_id(&html, "a.(b)_1").unwrap().is_some());
        assert!(table_by_id(&html, "missing").unwrap().is_none());
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("1,234"), Some(1234.0));
        assert_eq!(coerce_number(" -3.5% "), Some(-3.5));
        assert_eq!(coerce_number("+0.8"), Some(0.8));
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("-"), None);
        assert_eq!(coerce_number("N/A"), None);
    }

    #[test]
    fn test_header_row_ignores_whitespace() {
        let table = HtmlTable {
            rows: vec![
                vec!["title".into()],
                vec!["代 碼".into(), "名稱".into()],
            ],
        };
        assert_eq!(table.header_row("代碼"), Some(1));
        assert!(!table.contains("代號"));
    }
}
