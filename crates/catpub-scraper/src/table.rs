//! Specification table normalization.
//!
//! Product pages carry a two-column label/value table whose row labels vary
//! by product family. This module parses it, renames the labels we know to
//! their published wording, splits it in two for the article layout, and
//! derives a compact dimensional size string.

use scraper::{Html, Selector};

use crate::error::ScraperError;

/// Label forced onto the first row.
const MODEL_LABEL: &str = "Bearing Model";
/// Appended to the first row's value.
const MODEL_SUFFIX: &str = " Bearing";
/// Rows `[0, SPLIT_AT)` go to the head table, the rest to the tail.
const SPLIT_AT: usize = 12;
/// Separator between size components.
const SIZE_SEPARATOR: &str = "×";

/// Source label to published label. Each entry renames at most one row.
const LABEL_RENAMES: [(&str, &str); 8] = [
    ("System of Measurement", "Size Standards"),
    ("Ball", "Deep Groove Ball Bearing"),
    ("For Load Direction", "Load Direction"),
    ("Construction", "Number of Raceway Ring Rows"),
    ("Bore Dia", "Inner Dimension d(Ø)"),
    ("Outer Dia", "Outer Dimension D(Ø)"),
    ("Width", "Width B"),
    ("Ring Material", "Inner/Outer Ring Material"),
];

/// Label tuples tried in order when deriving the size string. Each product
/// family names its bore, outside diameter and width differently.
const SIZE_KEYS: &[&[&str]] = &[
    &["Bore diameter", "Outside diameter", "Width"],
    &["Bore Dia", "Outer Dia", "Height"],
    &["Bore Dia", "Outer Dia", "Width"],
    &[
        "Inside Diameter Of Inner Ring",
        "Outside Diameter Of Outer Ring",
        "Height Of Overall Bearing Assembly (H)",
    ],
    &["Roller OD", "Bore Dia", "Roller Width"],
    &["Bore diameter (d)", "Outside diameter (D)", "Nominal width"],
    &["Height M", "Width W", "Length L"],
    &["Maximum length", "Nominal rail size"],
    &["Bore Diameter", "Outside Diameter", "Width"],
    &["Bore(d)", "Cup Outer Diameter(D)", "Bearing Width(T)"],
    &[
        "Shoulder diameter of inner ring",
        "Permissible axial displacement",
        "Diameter of shaft abutment",
    ],
    &["Bore", "Outer Diameter", "Outer Ring Width"],
    &["b1", "c1", "d"],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRow {
    pub label: String,
    pub value: String,
}

impl SpecRow {
    #[must_use]
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_owned(),
            value: value.to_owned(),
        }
    }
}

/// Ordered label/value rows, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecTable {
    rows: Vec<SpecRow>,
}

/// A normalized table split into its head and tail halves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalSpecTable {
    pub head: SpecTable,
    pub tail: SpecTable,
    /// The trailing non-data row removed during normalization.
    pub dropped: Option<SpecRow>,
}

impl SpecTable {
    #[must_use]
    pub fn from_rows(rows: Vec<SpecRow>) -> Self {
        Self { rows }
    }

    /// Parses the first `<table>` in `html` into label/value rows.
    ///
    /// Cells are read from `th` and `td` alike; the first cell is the label,
    /// the second the value (empty when missing). Whitespace inside a cell is
    /// collapsed. Rows without cells are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Parse`] when there is no table or it has no
    /// rows with cells.
    pub fn parse(html: &str) -> Result<Self, ScraperError> {
        let fragment = Html::parse_fragment(html);
        let table_sel = selector("table")?;
        let row_sel = selector("tr")?;
        let cell_sel = selector("th, td")?;

        let table = fragment
            .select(&table_sel)
            .next()
            .ok_or_else(|| ScraperError::parse("specification table", "no <table> element"))?;

        let rows: Vec<SpecRow> = table
            .select(&row_sel)
            .filter_map(|tr| {
                let mut cells = tr.select(&cell_sel).map(|td| collapse_ws(td.text()));
                let label = cells.next()?;
                let value = cells.next().unwrap_or_default();
                Some(SpecRow { label, value })
            })
            .collect();

        if rows.is_empty() {
            return Err(ScraperError::parse("specification table", "table has no rows"));
        }

        Ok(Self { rows })
    }

    #[must_use]
    pub fn rows(&self) -> &[SpecRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of the first row labelled exactly `label`.
    #[must_use]
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }

    /// Drops the last row, relabels the first row as the model row, applies
    /// [`LABEL_RENAMES`] and splits at row 12.
    #[must_use]
    pub fn normalize(mut self) -> CanonicalSpecTable {
        let dropped = self.rows.pop();

        if let Some(first) = self.rows.first_mut() {
            MODEL_LABEL.clone_into(&mut first.label);
            first.value.push_str(MODEL_SUFFIX);
        }

        for (from, to) in LABEL_RENAMES {
            if let Some(row) = self.rows.iter_mut().find(|r| r.label == from) {
                to.clone_into(&mut row.label);
            }
        }

        let tail = self.rows.split_off(SPLIT_AT.min(self.rows.len()));

        CanonicalSpecTable {
            head: SpecTable { rows: self.rows },
            tail: SpecTable { rows: tail },
            dropped,
        }
    }

    /// Derives `A×B×C` (or `A×B`) from the first label tuple in
    /// [`SIZE_KEYS`] whose labels are all present. Empty when none match.
    ///
    /// Must run on the table as scraped, before [`SpecTable::normalize`]
    /// renames the dimension labels.
    #[must_use]
    pub fn derive_size(&self) -> String {
        SIZE_KEYS
            .iter()
            .find_map(|keys| {
                keys.iter()
                    .map(|key| self.value_of(key))
                    .collect::<Option<Vec<&str>>>()
            })
            .map(|values| values.join(SIZE_SEPARATOR))
            .unwrap_or_default()
    }

    /// Renders a headerless, borderless HTML table carrying `class`.
    #[must_use]
    pub fn render(&self, class: &str) -> String {
        let mut html = format!("<table class=\"dataframe {}\">\n  <tbody>\n", escape(class));
        for row in &self.rows {
            html.push_str("    <tr>\n");
            html.push_str(&format!("      <td>{}</td>\n", escape(&row.label)));
            html.push_str(&format!("      <td>{}</td>\n", escape(&row.value)));
            html.push_str("    </tr>\n");
        }
        html.push_str("  </tbody>\n</table>");
        html
    }
}

impl CanonicalSpecTable {
    /// Renders the head as `table1` and the tail as `table2`.
    #[must_use]
    pub fn render(&self) -> (String, String) {
        (self.head.render("table1"), self.tail.render("table2"))
    }
}

pub(crate) fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css)
        .map_err(|e| ScraperError::parse("CSS selector", format!("'{css}': {e}")))
}

pub(crate) fn collapse_ws<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
