//! CSV upload of clients.
//!
//! Each CSV row becomes a JSON object keyed by the camelCase field name, so
//! the upload goes through the same import validation as a JSON batch.

use std::fs::File;
use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Columns read as numbers; anything else is kept as text.
const NUMERIC_COLUMNS: &[&str] = &["area"];

#[derive(MultipartForm)]
pub struct UploadClientsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("cannot read uploaded file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV has no header row")]
    MissingHeader,
}

impl UploadClientsForm {
    pub fn parse_rows(&self) -> Result<Vec<Value>, UploadError> {
        let file = File::open(self.csv.file.path())?;
        parse_client_rows(file)
    }
}

/// `nome_conjuge`, `Nome Conjuge` and `nomeConjuge` all become `nomeConjuge`.
fn normalize_header(raw: &str) -> String {
    let cleaned = raw.trim().trim_start_matches('\u{feff}');
    let mut out = String::with_capacity(cleaned.len());
    let mut upper_next = false;
    for (index, ch) in cleaned.chars().enumerate() {
        if ch == '_' || ch == ' ' || ch == '-' {
            upper_next = !out.is_empty();
            continue;
        }
        if index == 0 {
            out.extend(ch.to_lowercase());
        } else if upper_next {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        upper_next = false;
    }
    out
}

fn cell_value(column: &str, cell: &str) -> Value {
    if NUMERIC_COLUMNS.contains(&column) {
        let parsed = cell
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64);
        if let Some(number) = parsed {
            return Value::Number(number);
        }
    }
    Value::String(cell.to_string())
}

/// Reads client rows from CSV. Empty cells are left out of the row.
pub fn parse_client_rows<R: Read>(reader: R) -> Result<Vec<Value>, UploadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
    if headers.iter().all(String::is_empty) {
        return Err(UploadError::MissingHeader);
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut row = Map::new();
        for (column, cell) in headers.iter().zip(record.iter()) {
            if column.is_empty() || cell.is_empty() {
                continue;
            }
            row.insert(column.clone(), cell_value(column, cell));
        }
        if !row.is_empty() {
            rows.push(Value::Object(row));
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn headers_become_camel_case() {
        assert_eq!(normalize_header("nome_conjuge"), "nomeConjuge");
        assert_eq!(normalize_header("\u{feff}Nome"), "nome");
        assert_eq!(normalize_header("data nascimento"), "dataNascimento");
        assert_eq!(normalize_header("numeroLote"), "numeroLote");
    }

    #[test]
    fn rows_skip_empty_cells_and_read_area_as_number() {
        let csv = "nome,email,area,cidade\nAna Paula,ana@example.com,\"360,5\",\nBruno,,abc,Campinas\n,,,\n";
        let rows = parse_client_rows(csv.as_bytes()).unwrap();

        assert_eq!(
            rows,
            vec![
                json!({"nome": "Ana Paula", "email": "ana@example.com", "area": 360.5}),
                json!({"nome": "Bruno", "area": "abc", "cidade": "Campinas"}),
            ]
        );
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let rows = parse_client_rows("nome,email\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }
}
