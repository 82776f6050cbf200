//! Text renderings of query results for the command-line front end.
//!
//! Rendering is kept out of the engine: it only reads a [`ResultSet`] and writes to any
//! [`std::io::Write`].

use std::io::{self, Write};

use serde_json::Map;

use crate::processing::{CategoricalField, ResultSet, SelectorOptions};
use crate::types::Value;

/// Output format for [`write_results`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Column-aligned plain text table.
    #[default]
    Table,
    /// CSV with a header row.
    Csv,
    /// JSON array of objects, keys in column order.
    Json,
}

/// Options for [`write_results`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Output format.
    pub format: OutputFormat,
}

/// Write every column of every selected row, in dataset column order.
pub fn write_results<W: Write>(out: &mut W, rows: &ResultSet<'_>, options: &RenderOptions) -> io::Result<()> {
    match options.format {
        OutputFormat::Table => write_table(out, rows),
        OutputFormat::Csv => write_csv(out, rows),
        OutputFormat::Json => write_json(out, rows),
    }
}

/// Write the `All`-prefixed choices of each selector, one selector per line.
pub fn write_selectors<W: Write>(out: &mut W, selectors: &SelectorOptions) -> io::Result<()> {
    for field in CategoricalField::ALL {
        let choices: Vec<String> = selectors.choices(field).iter().map(|s| s.to_string()).collect();
        writeln!(out, "{field}: {}", choices.join(", "))?;
    }
    Ok(())
}

fn cells(rows: &ResultSet<'_>) -> Vec<Vec<Value>> {
    let columns = rows.dataset().columns();
    rows.iter()
        .map(|w| {
            columns
                .iter()
                .map(|c| w.get(c).unwrap_or(Value::Null))
                .collect()
        })
        .collect()
}

fn write_table<W: Write>(out: &mut W, rows: &ResultSet<'_>) -> io::Result<()> {
    let columns = rows.dataset().columns();
    let body: Vec<Vec<String>> = cells(rows)
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header: Vec<&str> = columns.iter().map(String::as_str).collect();
    write_table_line(out, &header, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_table_line(out, &rule, &widths)?;
    for row in &body {
        write_table_line(out, row, &widths)?;
    }
    Ok(())
}

fn write_table_line<W: Write, S: AsRef<str>>(out: &mut W, cells: &[S], widths: &[usize]) -> io::Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<w$}", c.as_ref(), w = *w))
        .collect();
    writeln!(out, "{}", padded.join("  ").trim_end())
}

fn write_csv<W: Write>(out: &mut W, rows: &ResultSet<'_>) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(rows.dataset().columns())?;
    for row in cells(rows) {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()
}

fn write_json<W: Write>(out: &mut W, rows: &ResultSet<'_>) -> io::Result<()> {
    let columns = rows.dataset().columns();
    let mut objects: Vec<serde_json::Value> = Vec::with_capacity(rows.len());
    for row in cells(rows) {
        let mut obj = Map::new();
        for (c, v) in columns.iter().zip(row) {
            obj.insert(c.clone(), serde_json::to_value(v)?);
        }
        objects.push(serde_json::Value::Object(obj));
    }
    serde_json::to_writer_pretty(&mut *out, &objects)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataSet, Workshop};

    fn sample_dataset() -> DataSet {
        DataSet::new(
            vec![
                "name".to_string(),
                "pincode".to_string(),
                "channel".to_string(),
                "body shop".to_string(),
                "state".to_string(),
                "rating".to_string(),
            ],
            vec![
                Workshop::new("110001")
                    .with_channel("Dealer")
                    .with_body_shop("Yes")
                    .with_state("DL")
                    .with_extra("name", Value::Utf8("Speedy, Motors".to_string()))
                    .with_extra("rating", Value::Float64(4.5)),
                Workshop::new("400001")
                    .with_state("MH")
                    .with_extra("name", Value::Utf8("Coastal".to_string()))
                    .with_extra("rating", Value::Null),
            ],
        )
    }

    fn render(format: OutputFormat) -> String {
        let ds = sample_dataset();
        let mut buf = Vec::new();
        write_results(&mut buf, &ResultSet::all(&ds), &RenderOptions { format }).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn csv_keeps_column_order_and_quotes() {
        let text = render(OutputFormat::Csv);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("name,pincode,channel,body shop,state,rating"));
        assert_eq!(lines.next(), Some("\"Speedy, Motors\",110001,Dealer,Yes,DL,4.5"));
        assert_eq!(lines.next(), Some("Coastal,400001,,,MH,"));
    }

    #[test]
    fn json_objects_follow_column_order() {
        let text = render(OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        let first = parsed[0].as_object().unwrap();
        let keys: Vec<&str> = first.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "pincode", "channel", "body shop", "state", "rating"]);
        assert_eq!(first["rating"], serde_json::json!(4.5));
        assert!(parsed[1]["channel"].is_null());
    }

    #[test]
    fn table_pads_columns() {
        let text = render(OutputFormat::Table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("name            pincode"));
        assert!(lines[1].starts_with("--------------  -------"));
        assert!(lines[3].starts_with("Coastal         400001"));
    }

    #[test]
    fn selectors_are_listed_with_all_first() {
        let ds = sample_dataset();
        let mut buf = Vec::new();
        write_selectors(&mut buf, &SelectorOptions::from_dataset(&ds)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "channel: All, Dealer\nbody shop: All, Yes\nstate: All, DL, MH\n");
    }
}
