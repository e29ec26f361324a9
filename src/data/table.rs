use super::model::{CellValue, FitnessDataset};

/// Rows per table page.
pub const PAGE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// DataTable – the unlabeled full table
// ---------------------------------------------------------------------------

/// Original columns of every record, cohort label dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    pub fn from_dataset(dataset: &FitnessDataset) -> Self {
        DataTable {
            columns: dataset.columns.clone(),
            rows: dataset.records.iter().map(|r| r.cells.clone()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// TableView – sort + pagination over a DataTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Presentation state of the table: column order, sort and current page.
#[derive(Debug, Clone)]
pub struct TableView {
    /// Column indices in display order (sorted by header name).
    pub display_columns: Vec<usize>,
    pub sort: Option<(usize, SortDirection)>,
    pub page: usize,
    /// Row indices in the current sort order.
    order: Vec<usize>,
}

impl TableView {
    pub fn new(table: &DataTable) -> Self {
        let mut display_columns: Vec<usize> = (0..table.columns.len()).collect();
        display_columns.sort_by(|&a, &b| table.columns[a].cmp(&table.columns[b]));
        TableView {
            display_columns,
            sort: None,
            page: 0,
            order: (0..table.len()).collect(),
        }
    }

    /// Cycle a column through ascending → descending → unsorted.
    pub fn toggle_sort(&mut self, table: &DataTable, column: usize) {
        self.sort = match self.sort {
            Some((c, SortDirection::Ascending)) if c == column => {
                Some((column, SortDirection::Descending))
            }
            Some((c, SortDirection::Descending)) if c == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
        self.resort(table);
    }

    fn resort(&mut self, table: &DataTable) {
        self.order = (0..table.len()).collect();
        if let Some((column, direction)) = self.sort {
            self.order.sort_by(|&a, &b| {
                let ord = table.rows[a][column].sort_cmp(&table.rows[b][column]);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        self.page = 0;
    }

    pub fn page_count(&self) -> usize {
        self.order.len().div_ceil(PAGE_SIZE).max(1)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    /// Row indices visible on the current page.
    pub fn page_rows(&self) -> &[usize] {
        let start = (self.page * PAGE_SIZE).min(self.order.len());
        let end = (start + PAGE_SIZE).min(self.order.len());
        &self.order[start..end]
    }
}
