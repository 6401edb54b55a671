// ABOUTME: Delimiter-separated text serialization of ranked records (CSV)
// Quoting rule: wrap and double quotes only when a value holds the delimiter or quote

use super::ranking::RankedExport;
use crate::models::TabularRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFormat {
    pub delimiter: char,
    pub quote: char,
    pub line_terminator: String,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            line_terminator: "\n".to_string(),
        }
    }
}

impl CsvFormat {
    /// Escape one field value
    pub fn escape(&self, value: &str) -> String {
        if !value.contains(self.delimiter) && !value.contains(self.quote) {
            return value.to_string();
        }

        let mut doubled = String::with_capacity(self.quote.len_utf8() * 2);
        doubled.push(self.quote);
        doubled.push(self.quote);

        let mut out = String::with_capacity(value.len() + 2);
        out.push(self.quote);
        out.push_str(&value.replace(self.quote, &doubled));
        out.push(self.quote);
        out
    }

    fn join<I: Iterator<Item = String>>(&self, cells: I) -> String {
        let mut delimiter = [0u8; 4];
        let delimiter: &str = self.delimiter.encode_utf8(&mut delimiter);
        cells.collect::<Vec<_>>().join(delimiter)
    }

    fn render_row(&self, record: &TabularRecord, headers: &[&str]) -> String {
        self.join(
            headers
                .iter()
                .map(|field| record.text(field).map(|v| self.escape(&v)).unwrap_or_default()),
        )
    }
}

/// Serialize `ranked` to text.
///
/// The header row is the first record's field names in their original
/// order, joined verbatim. Later rows follow that column order and render
/// absent or null fields as empty. No terminator follows the last row. An
/// empty export produces an empty string.
pub fn serialize(ranked: &RankedExport<'_>, format: &CsvFormat) -> String {
    let Some(first) = ranked.rows().first() else {
        return String::new();
    };

    let headers: Vec<&str> = first.fields().collect();
    let mut lines = Vec::with_capacity(ranked.len() + 1);
    lines.push(format.join(headers.iter().map(|h| (*h).to_string())));
    lines.extend(ranked.iter().map(|record| format.render_row(record, &headers)));

    lines.join(format.line_terminator.as_str())
}
