//! Core filtering of death-record batches
//!
//! A filter contributes a boolean mask over a batch; filters are combined by
//! AND-ing their masks, so the order in which they are listed does not
//! change the rows that survive.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray};
use arrow::compute::{and, filter as arrow_filter};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::schema::columns::TABLE_DEATHS;
use crate::schema::require_columns;

/// Filter a record batch based on a boolean mask
///
/// # Arguments
/// * `batch` - The record batch to filter
/// * `mask` - The boolean mask indicating which rows to keep
///
/// # Returns
/// A new record batch with only rows where mask is true; the input is untouched
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(ArrowError::InvalidArgumentError(format!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        ))
        .into());
    }

    let filtered_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| arrow_filter(col, mask))
        .collect::<std::result::Result<_, _>>()?;

    Ok(RecordBatch::try_new(batch.schema(), filtered_columns)?)
}

/// Trait for objects that can filter record batches
pub trait BatchFilter: std::fmt::Debug + Send + Sync {
    /// Rows of `batch` this filter keeps
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray>;

    /// Columns this filter reads
    fn required_columns(&self) -> Vec<&'static str>;

    /// Filter a record batch
    ///
    /// Fails with `SchemaMismatch` when a required column is absent.
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        require_columns(&batch.schema(), TABLE_DEATHS, &self.required_columns())?;
        let mask = self.mask(batch)?;
        filter_record_batch(batch, &mask)
    }
}

/// A filter that always includes all rows
#[derive(Debug, Clone, Default)]
pub struct IncludeAllFilter;

impl BatchFilter for IncludeAllFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        Ok(BooleanArray::from(vec![true; batch.num_rows()]))
    }

    fn required_columns(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

/// A filter that combines multiple filters with a logical AND
#[derive(Debug, Clone, Default)]
pub struct AndFilter {
    filters: Vec<Arc<dyn BatchFilter>>,
}

impl AndFilter {
    /// Create a new AND filter
    #[must_use]
    pub fn new(filters: Vec<Arc<dyn BatchFilter>>) -> Self {
        Self { filters }
    }

    /// Number of combined filters
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether no filter is combined (every row passes)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl BatchFilter for AndFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        let Some((first, rest)) = self.filters.split_first() else {
            return IncludeAllFilter.mask(batch);
        };
        let mut mask = first.mask(batch)?;
        for filter in rest {
            mask = and(&mask, &filter.mask(batch)?)?;
        }
        Ok(mask)
    }

    fn required_columns(&self) -> Vec<&'static str> {
        let mut columns: Vec<&'static str> = self
            .filters
            .iter()
            .flat_map(|f| f.required_columns())
            .collect();
        columns.sort_unstable();
        columns.dedup();
        columns
    }
}
