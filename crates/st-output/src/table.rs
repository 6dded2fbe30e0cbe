//! The in-memory row collection for one run.

use crate::row::ExportRow;

/// Every row collected during a run, in collection order until sorted.
#[derive(Debug, Clone)]
pub struct ExportTable<R> {
    rows: Vec<R>,
}

impl<R> Default for ExportTable<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: ExportRow> ExportTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: R) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Sort by vehicle id, then timestamp, both descending.  The sort is
    /// stable: rows with equal keys keep their collection order.
    pub fn sort_descending(&mut self) {
        self.rows.sort_by(|a, b| {
            b.vehicle_id()
                .cmp(a.vehicle_id())
                .then_with(|| b.timestamp().cmp(&a.timestamp()))
        });
    }

    /// The first `min(n, len)` rows.
    pub fn head(&self, n: usize) -> &[R] {
        &self.rows[..n.min(self.rows.len())]
    }
}
