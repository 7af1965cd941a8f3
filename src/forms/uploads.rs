//! CSV upload plumbing shared by the bulk import forms.

use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use csv::{StringRecord, Trim};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadFormError {
    #[error("failed to read uploaded file")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("upload is missing required columns: {0}")]
    MissingHeaders(String),
    #[error("upload contains no rows")]
    Empty,
}

#[derive(MultipartForm)]
/// Multipart form carrying one CSV file.
pub struct UploadCsvForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl UploadCsvForm {
    /// Read the temporary file back into memory.
    pub fn into_upload(mut self) -> Result<UploadForm, UploadFormError> {
        let file_name = self.csv.file_name.take();
        let mut bytes = Vec::new();
        self.csv.file.rewind()?;
        self.csv.file.read_to_end(&mut bytes)?;
        Ok(UploadForm::new(file_name, bytes))
    }
}

/// Raw CSV upload detached from the multipart request.
#[derive(Debug, Clone)]
pub struct UploadForm {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadForm {
    pub fn new(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self { file_name, bytes }
    }
}

/// Rows that passed validation together with one message per rejected row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch<T> {
    pub rows: Vec<T>,
    pub errors: Vec<String>,
}

impl<T> Default for ImportBatch<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> ImportBatch<T> {
    pub fn reject(&mut self, line: usize, message: impl AsRef<str>) {
        self.errors.push(format!("Row {line}: {}", message.as_ref()));
    }
}

/// Parsed CSV document with case-insensitive column lookup.
#[derive(Debug)]
pub struct CsvSheet {
    headers: Vec<String>,
    records: Vec<StringRecord>,
}

impl CsvSheet {
    pub fn parse(bytes: &[u8]) -> Result<Self, UploadFormError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader
            .headers()?
            .iter()
            .map(|header| header.trim().to_ascii_lowercase())
            .collect();

        let mut records = Vec::new();
        for record in reader.records() {
            records.push(record?);
        }

        Ok(Self { headers, records })
    }

    /// Fail unless every `required` column is present.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), UploadFormError> {
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|column| self.column(column).is_none())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(UploadFormError::MissingHeaders(missing.join(", ")))
        }
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    }

    /// Non-blank rows with their 1-based line number in the file.
    pub fn rows(&self) -> impl Iterator<Item = CsvRow<'_>> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.iter().any(|cell| !cell.trim().is_empty()))
            .map(|(index, record)| CsvRow {
                sheet: self,
                record,
                // header occupies line 1
                line: index + 2,
            })
    }
}

pub struct CsvRow<'a> {
    sheet: &'a CsvSheet,
    record: &'a StringRecord,
    pub line: usize,
}

impl<'a> CsvRow<'a> {
    /// Trimmed cell of `column`, `None` when absent or blank.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self.sheet.column(column)?;
        self.record
            .get(index)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Names of `required` columns with no value in this row.
    pub fn missing<'c>(&self, required: &[&'c str]) -> Vec<&'c str> {
        required
            .iter()
            .copied()
            .filter(|column| self.get(column).is_none())
            .collect()
    }
}

/// Kinds of bulk upload with a downloadable template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Customers,
    Products,
    Prices,
}

impl UploadKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "customers" => Some(UploadKind::Customers),
            "products" => Some(UploadKind::Products),
            "prices" => Some(UploadKind::Prices),
            _ => None,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            UploadKind::Customers => "customer_upload_template.csv",
            UploadKind::Products => "product_upload_template.csv",
            UploadKind::Prices => "price_upload_template.csv",
        }
    }

    fn header(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Customers => super::customers::CSV_COLUMNS,
            UploadKind::Products => super::products::CSV_COLUMNS,
            UploadKind::Prices => super::price_list::CSV_COLUMNS,
        }
    }

    fn samples(&self) -> &'static [&'static [&'static str]] {
        match self {
            UploadKind::Customers => &[&[
                "CUST001",
                "ABC Enterprises",
                "John Doe",
                "9876543210",
                "john@abc.com",
                "27AABCU9603R1ZM",
                "AABCU9603R",
                "retail",
                "50000",
                "30",
                "John Smith",
                "123 Main Street",
                "Building A",
                "Suite 100",
                "Mumbai",
                "Maharashtra",
                "400001",
            ]],
            UploadKind::Products => &[&[
                "PROD001",
                "Product Name",
                "Category A",
                "Subcategory 1",
                "pcs",
                "1234",
                "18",
                "Product description",
            ]],
            UploadKind::Prices => &[
                &["PROD001", "retail", "1000", "5", "2025-01-01", ""],
                &["PROD001", "dealer", "900", "10", "2025-01-01", ""],
            ],
        }
    }

    /// Header row followed by sample rows.
    pub fn template_csv(&self) -> Result<Vec<u8>, UploadFormError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.header())?;
        for sample in self.samples() {
            writer.write_record(*sample)?;
        }
        writer
            .into_inner()
            .map_err(|err| UploadFormError::FileRead(err.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_match_case_insensitively() {
        let sheet = CsvSheet::parse(b"Product_Code , NAME\nP1,Widget\n").expect("parses");

        let row = sheet.rows().next().expect("one row");
        assert_eq!(row.get("product_code"), Some("P1"));
        assert_eq!(row.get("name"), Some("Widget"));
        assert_eq!(row.line, 2);
    }

    #[test]
    fn blank_rows_are_skipped_but_keep_line_numbers() {
        let sheet = CsvSheet::parse(b"code,name\n,\nP2,Gadget\n").expect("parses");

        let rows: Vec<usize> = sheet.rows().map(|row| row.line).collect();
        assert_eq!(rows, vec![3]);
    }

    #[test]
    fn short_rows_report_missing_cells() {
        let sheet = CsvSheet::parse(b"code,name,price\nP1\n").expect("parses");

        let row = sheet.rows().next().expect("one row");
        assert_eq!(row.missing(&["code", "name", "price"]), vec!["name", "price"]);
    }

    #[test]
    fn missing_columns_are_listed() {
        let sheet = CsvSheet::parse(b"code\nP1\n").expect("parses");

        let err = sheet.require_columns(&["code", "name"]).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn templates_carry_header_and_samples() {
        let bytes = UploadKind::Prices.template_csv().expect("template");
        let text = String::from_utf8(bytes).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "product_code,customer_type,price,discount_percentage,effective_from,effective_to"
        );
        assert_eq!(lines.len(), 3);
    }
}
