//! Header-led comma-separated table reader.
//!
//! Quoted fields may contain commas, newlines and `""` escapes. The first
//! record names the columns; every later record is zipped against it.

use std::collections::BTreeMap;

/// One data row keyed by column name. Cells missing from the end of a short
/// row are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// 1-based position among the data rows.
    pub number: usize,
    fields: BTreeMap<String, String>,
}

impl Row {
    pub fn new(number: usize, fields: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            number,
            fields: fields.into_iter().collect(),
        }
    }

    /// First non-blank value among `names`, trimmed.
    pub fn get(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
    }

    /// Whether any of `names` appears as a column in this row, blank or not.
    pub fn has(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.fields.contains_key(*name))
    }

    /// True when every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|value| value.trim().is_empty())
    }
}

/// Parse `text` into rows. Empty input yields no rows.
pub fn parse(text: &str) -> Vec<Row> {
    let mut records = split_records(text).into_iter();
    let Some(headers) = records.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();

    records
        .enumerate()
        .map(|(i, cells)| {
            if cells.len() > headers.len() {
                tracing::warn!(
                    "Row {} has {} cells for {} columns; extra cells ignored",
                    i + 1,
                    cells.len(),
                    headers.len()
                );
            }
            Row::new(i + 1, headers.iter().cloned().zip(cells))
        })
        .collect()
}

fn split_records(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut fields));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(fields);
    }

    records.retain(|cells| !(cells.len() == 1 && cells[0].trim().is_empty()));
    records
}
