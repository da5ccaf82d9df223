//! Categorical binning cache
//!
//! Bins every eligible case into a (primary, secondary) grid cell and
//! keeps a reverse index from case index to cell. Pure appends patch both
//! structures in place; any other mutation marks the cache dirty and the
//! next read rebuilds from the full table. Appends dominate in practice
//! (new data rows), so they get the incremental path; everything else is
//! rare enough that a simple full rebuild wins over differential updates.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::{BinningContext, ChartConfig};
use crate::data::{CaseId, CaseTable, DataChange};

/// One case's location in the cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinPosition {
    pub primary_cell: usize,
    pub secondary_cell: usize,
    /// Position within the cell's insertion order (the stacking order).
    pub index_in_cell: usize,
}

/// One entry of a cell: a case identity and its sequential table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEntry {
    pub id: CaseId,
    pub case_index: usize,
}

/// Per-cell count record. `cell_counts` returns these in row-major order
/// over the grid, primary axis major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCount {
    pub count: usize,
    pub primary_cell: usize,
    pub secondary_cell: usize,
}

/// Binning cache for a chart with two categorical axes.
///
/// Reads take `&mut self` because a read may rebuild the structures
/// first; this is part of the contract, and is safe in the
/// single-threaded host this engine is written for. A multi-threaded
/// host must guard the dirty check, rebuild, and access as one unit.
pub struct CellCache {
    /// cells[primary][secondary] holds that cell's entries in insertion
    /// order. Both levels grow lazily; an absent level is empty.
    cells: Vec<Vec<Vec<CellEntry>>>,
    /// Reverse lookup by case index. `None` means not binned.
    index: Vec<Option<BinPosition>>,
    /// Largest cell population since the last rebuild. Appends only ever
    /// raise it; removals rebuild.
    max_in_cell: usize,
    valid: bool,
    /// Config generation the structures were built against.
    seen_generation: Option<u64>,
}

impl Default for CellCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CellCache {
    /// Create an empty cache. It starts dirty; the first read builds it.
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            index: Vec::new(),
            max_in_cell: 0,
            valid: false,
            seen_generation: None,
        }
    }

    /// Handle one dataset change notice.
    ///
    /// Cases appended at the end are patched into the structures
    /// incrementally; every other mutation invalidates, deferring the
    /// rebuild to the next read.
    pub fn handle_change(&mut self, table: &CaseTable, config: &ChartConfig, change: &DataChange) {
        match change {
            DataChange::CasesAdded {
                ids,
                inserted_at_end: true,
            } => self.append_cases(table, config, ids),
            DataChange::CasesAdded { .. }
            | DataChange::CasesDeleted { .. }
            | DataChange::CasesChanged { .. }
            | DataChange::ConfigChanged
            | DataChange::ContextReset => self.invalidate(),
        }
    }

    /// Mark the cache dirty. The next read rebuilds before answering.
    pub fn invalidate(&mut self) {
        if self.valid {
            trace!("cell cache invalidated");
        }
        self.valid = false;
        self.seen_generation = None;
    }

    /// Per-cell case counts in row-major order over the full grid.
    ///
    /// Returns an empty vector while either axis is unconfigured: "not
    /// ready", callers retry once configuration completes.
    pub fn cell_counts(&mut self, table: &CaseTable, config: &ChartConfig) -> Vec<CellCount> {
        let (Some(primary), Some(secondary)) = (config.primary(), config.secondary()) else {
            return Vec::new();
        };
        let primary_cells = primary.classifier.cell_count().max(1);
        let secondary_cells = secondary.classifier.cell_count().max(1);
        self.ensure_valid(table, config);

        let mut counts: Vec<CellCount> = (0..primary_cells * secondary_cells)
            .map(|i| CellCount {
                count: 0,
                primary_cell: i / secondary_cells,
                secondary_cell: i % secondary_cells,
            })
            .collect();
        for (primary_cell, row) in self.cells.iter().enumerate() {
            for (secondary_cell, cell) in row.iter().enumerate() {
                if primary_cell < primary_cells && secondary_cell < secondary_cells {
                    counts[primary_cell * secondary_cells + secondary_cell].count = cell.len();
                }
            }
        }
        counts
    }

    /// Cell location of the case at `case_index`, or `None` if it is not
    /// currently binned (missing required value, unconfigured axes, or
    /// out-of-range index). Rebuilds first if dirty.
    pub fn lookup_cell_for_case(
        &mut self,
        table: &CaseTable,
        config: &ChartConfig,
        case_index: usize,
    ) -> Option<BinPosition> {
        self.ensure_valid(table, config);
        self.index.get(case_index).copied().flatten()
    }

    /// The largest number of cases in any one cell.
    pub fn max_in_cell(&mut self, table: &CaseTable, config: &ChartConfig) -> usize {
        self.ensure_valid(table, config);
        self.max_in_cell
    }

    /// The cases binned into one cell, in stacking order.
    pub fn cases_in_cell(
        &mut self,
        table: &CaseTable,
        config: &ChartConfig,
        primary_cell: usize,
        secondary_cell: usize,
    ) -> &[CellEntry] {
        self.ensure_valid(table, config);
        self.cells
            .get(primary_cell)
            .and_then(|row| row.get(secondary_cell))
            .map(|cell| cell.as_slice())
            .unwrap_or(&[])
    }

    /// Fast path for cases appended at the end of the table.
    ///
    /// Only current structures are patched; while dirty, or built against
    /// a stale configuration, the pending rebuild picks the new cases up
    /// instead.
    fn append_cases(&mut self, table: &CaseTable, config: &ChartConfig, ids: &[CaseId]) {
        if !self.valid || self.seen_generation != Some(config.generation()) {
            self.invalidate();
            return;
        }
        let Some(context) = config.context() else {
            // Axes unconfigured: the valid-but-empty state stays correct.
            return;
        };
        let mut indices: Vec<usize> = ids
            .iter()
            .filter_map(|id| table.index_of(*id))
            .collect();
        indices.sort_unstable();
        for case_index in indices {
            if let Some((primary_cell, secondary_cell)) = classify(&context, table, case_index) {
                if let Some(id) = table.case_id(case_index) {
                    self.insert(primary_cell, secondary_cell, id, case_index);
                }
            }
        }
    }

    /// Rebuild iff the structures are dirty or were built against a
    /// different configuration. The single entry point for every read.
    fn ensure_valid(&mut self, table: &CaseTable, config: &ChartConfig) {
        if self.valid && self.seen_generation == Some(config.generation()) {
            return;
        }
        self.rebuild(table, config);
    }

    /// Full rebuild: clear both structures and re-scan every case with
    /// the same classify-and-insert logic the append path uses. With no
    /// computation context (axes unconfigured) this yields valid but
    /// empty structures.
    fn rebuild(&mut self, table: &CaseTable, config: &ChartConfig) {
        profiling::scope!("cell_cache_rebuild");

        self.cells.clear();
        self.index.clear();
        self.index.resize(table.case_count(), None);
        self.max_in_cell = 0;

        if let Some(context) = config.context() {
            for case_index in 0..table.case_count() {
                if let Some((primary_cell, secondary_cell)) = classify(&context, table, case_index)
                {
                    if let Some(id) = table.case_id(case_index) {
                        self.insert(primary_cell, secondary_cell, id, case_index);
                    }
                }
            }
        }

        self.valid = true;
        self.seen_generation = Some(config.generation());
        debug!(
            "cell cache rebuilt: {} cases, max cell population {}",
            table.case_count(),
            self.max_in_cell
        );
    }

    /// Append one entry to a cell, growing levels lazily, and record its
    /// reverse-index position.
    fn insert(&mut self, primary_cell: usize, secondary_cell: usize, id: CaseId, case_index: usize) {
        if primary_cell >= self.cells.len() {
            self.cells.resize_with(primary_cell + 1, Vec::new);
        }
        let row = &mut self.cells[primary_cell];
        if secondary_cell >= row.len() {
            row.resize_with(secondary_cell + 1, Vec::new);
        }
        let cell = &mut row[secondary_cell];
        cell.push(CellEntry { id, case_index });
        let cell_len = cell.len();

        if case_index >= self.index.len() {
            self.index.resize(case_index + 1, None);
        }
        self.index[case_index] = Some(BinPosition {
            primary_cell,
            secondary_cell,
            index_in_cell: cell_len - 1,
        });
        self.max_in_cell = self.max_in_cell.max(cell_len);
    }
}

/// Classify one case against the computation context.
///
/// `None` when the case has a missing required value (primary, secondary,
/// or an assigned legend attribute) or a value no classifier cell covers.
/// A classifier answering outside its own cell range is a contract
/// violation: asserted in development, skipped in release so one bad
/// classifier cannot corrupt the structures for every case.
fn classify(
    context: &BinningContext<'_>,
    table: &CaseTable,
    case_index: usize,
) -> Option<(usize, usize)> {
    if let Some(legend_attr) = context.legend_attr {
        if table.value(case_index, legend_attr)?.is_missing() {
            return None;
        }
    }
    let primary_value = table.value(case_index, context.primary_attr)?;
    let secondary_value = table.value(case_index, context.secondary_attr)?;
    if primary_value.is_missing() || secondary_value.is_missing() {
        return None;
    }
    let primary_cell = context.primary.cell_index(primary_value)?;
    let secondary_cell = context.secondary.cell_index(secondary_value)?;

    let in_range = primary_cell < context.primary.cell_count()
        && secondary_cell < context.secondary.cell_count();
    debug_assert!(
        in_range,
        "classifier returned cell ({primary_cell},{secondary_cell}) outside its own range"
    );
    if !in_range {
        return None;
    }
    Some((primary_cell, secondary_cell))
}
