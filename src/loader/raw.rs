//! Raw source tables
//!
//! Every source is first read into string cells regardless of its format,
//! so the normalization rules are written once.

use std::path::{Path, PathBuf};

use arrow::array::{Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::util::{ensure_not_empty, safe_open_file};
use crate::error::{DashboardError, Result};
use crate::schema::headers::repair_headers;

/// Supported source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Delimited text
    Csv,
    /// Apache Parquet
    Parquet,
}

impl SourceFormat {
    /// Detect the format from the file extension; anything else is read as CSV
    #[must_use]
    pub fn detect(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("parquet" | "pq") => Self::Parquet,
            _ => Self::Csv,
        }
    }
}

/// A source read into nullable string cells
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Where the table was read from
    pub path: PathBuf,
    /// Column headers as found (or repaired)
    pub headers: Vec<String>,
    /// Data rows; blank cells are `None`
    pub rows: Vec<Vec<Option<String>>>,
    /// Rows skipped because every cell was blank
    pub empty_rows: usize,
}

impl RawTable {
    /// Read a source, choosing the reader by extension
    pub fn read(path: &Path, purpose: &str, delimiter: u8) -> Result<Self> {
        match SourceFormat::detect(path) {
            SourceFormat::Csv => Self::read_csv(path, purpose, delimiter),
            SourceFormat::Parquet => Self::read_parquet(path, purpose),
        }
    }

    /// Read a delimited text file
    ///
    /// Invalid UTF-8 is replaced rather than rejected; headers are repaired
    /// by the caller.
    pub fn read_csv(path: &Path, purpose: &str, delimiter: u8) -> Result<Self> {
        let file = safe_open_file(path, purpose)?;
        ensure_not_empty(path, &file)?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .has_headers(true)
            .from_reader(file);

        let headers: Vec<String> = reader
            .byte_headers()
            .map_err(|e| DashboardError::parse(path, format!("unreadable header row: {e}")))?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();

        let mut table = Self {
            path: path.to_path_buf(),
            headers,
            rows: Vec::new(),
            empty_rows: 0,
        };

        for (line, record) in reader.byte_records().enumerate() {
            let record = record.map_err(|e| {
                DashboardError::parse(path, format!("malformed row {}: {e}", line + 2))
            })?;
            let cells = record
                .iter()
                .map(|cell| blank_to_none(&String::from_utf8_lossy(cell)))
                .collect();
            table.push_row(cells);
        }

        table.validate()?;
        Ok(table)
    }

    /// Read a Parquet file, casting every column to text
    pub fn read_parquet(path: &Path, purpose: &str) -> Result<Self> {
        let file = safe_open_file(path, purpose)?;
        ensure_not_empty(path, &file)?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| DashboardError::parse(path, format!("not a readable parquet file: {e}")))?;
        let headers = builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        let reader = builder
            .build()
            .map_err(|e| DashboardError::parse(path, format!("failed to build reader: {e}")))?;

        let mut table = Self {
            path: path.to_path_buf(),
            headers,
            rows: Vec::new(),
            empty_rows: 0,
        };

        for batch in reader {
            let batch = batch.map_err(|e| {
                DashboardError::parse(path, format!("failed to read record batch: {e}"))
            })?;
            let columns = batch
                .columns()
                .iter()
                .map(|column| cast(column, &DataType::Utf8))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            let strings: Vec<&StringArray> = columns
                .iter()
                .filter_map(|c| c.as_any().downcast_ref::<StringArray>())
                .collect();
            for row in 0..batch.num_rows() {
                let cells = strings
                    .iter()
                    .map(|array| {
                        if array.is_null(row) {
                            None
                        } else {
                            blank_to_none(array.value(row))
                        }
                    })
                    .collect();
                table.push_row(cells);
            }
        }

        table.validate()?;
        Ok(table)
    }

    fn push_row(&mut self, mut cells: Vec<Option<String>>) {
        if cells.iter().all(Option::is_none) {
            self.empty_rows += 1;
            return;
        }
        cells.resize(self.headers.len().max(cells.len()), None);
        self.rows.push(cells);
    }

    fn validate(&self) -> Result<()> {
        if self.headers.iter().all(|h| h.trim().is_empty()) {
            return Err(DashboardError::parse(&self.path, "no header row"));
        }
        if self.rows.is_empty() {
            return Err(DashboardError::parse(&self.path, "no data rows"));
        }
        Ok(())
    }

    /// Repair headers in place (BOM, mangled `Ñ`, padding, optional upper-casing)
    pub fn repair_headers(&mut self, uppercase: bool) {
        self.headers = repair_headers(&self.headers, uppercase);
    }

    /// Index of a column by exact header
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Indexes of required columns, or `SourceParse` naming the absent ones
    pub fn require(&self, names: &[&str]) -> Result<Vec<usize>> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| self.column(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(DashboardError::parse(
                &self.path,
                format!("missing column(s) {}", missing.join(", ")),
            ));
        }
        Ok(names.iter().filter_map(|name| self.column(name)).collect())
    }

    /// Number of data rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Cell of a row by column index
#[must_use]
pub fn cell(row: &[Option<String>], index: Option<usize>) -> Option<&str> {
    index.and_then(|i| row.get(i)).and_then(Option::as_deref)
}

fn blank_to_none(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| raw.to_string())
}

/// Coerce a numeric cell to an integer; invalid or fractional values are `None`
#[must_use]
pub fn parse_integer(raw: Option<&str>) -> Option<i32> {
    let value: f64 = raw?.trim().parse().ok()?;
    if value.is_finite()
        && value.fract() == 0.0
        && value >= f64::from(i32::MIN)
        && value <= f64::from(i32::MAX)
    {
        #[allow(clippy::cast_possible_truncation)]
        Some(value as i32)
    } else {
        None
    }
}

/// Coerce a coordinate cell to a float, accepting a decimal comma
#[must_use]
pub fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    let normalized = if trimmed.contains('.') {
        trimmed.to_string()
    } else {
        trimmed.replace(',', ".")
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
