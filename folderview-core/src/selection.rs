use bitflags::bitflags;
use indexmap::IndexSet;

use crate::model::ModelIndex;

bitflags! {
    /// How a selection command combines with the existing selection.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SelectionFlags: u8 {
        /// Drop the existing selection first.
        const CLEAR = 0b0000_0001;
        /// Add the given cells.
        const SELECT = 0b0000_0010;
        /// Remove the given cells.
        const DESELECT = 0b0000_0100;
        /// Flip the state of each given cell.
        const TOGGLE = 0b0000_1000;
        /// Expand every cell to all columns of its row.
        const ROWS = 0b0001_0000;
        /// Also move the current index (and the range anchor) to the target.
        const CURRENT = 0b0010_0000;
        /// `CLEAR | SELECT`, the plain click.
        const CLEAR_AND_SELECT = Self::CLEAR.bits() | Self::SELECT.bits();
    }
}

/// How many items a view lets the user select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Selection is disabled.
    None,
    /// At most one item.
    Single,
    /// Clicking toggles items without clearing others.
    Multi,
    /// Click selects one, Ctrl+Click toggles, Shift+Click extends a range.
    #[default]
    Extended,
}

/// Whether user clicks select single cells or whole rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionBehavior {
    /// Select the clicked cell only.
    #[default]
    Items,
    /// Select every column of the clicked row.
    Rows,
}

/// Keeps track of the selected cells of a view.
///
/// Cells are stored in selection order, one entry per cell. The model
/// dimensions are needed to expand row selections and are refreshed through
/// [ItemSelectionModel::reset] whenever the view is bound to a model, or
/// through [ItemSelectionModel::remap_rows] when the model's rows move.
#[derive(Debug, Clone, Default)]
pub struct ItemSelectionModel {
    selected: IndexSet<ModelIndex>,
    current: Option<ModelIndex>,
    anchor: Option<ModelIndex>,
    rows: usize,
    columns: usize,
}

impl ItemSelectionModel {
    /// Create an empty selection model for a model of the given size.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            ..Default::default()
        }
    }

    /// Drop all state and adopt new model dimensions.
    pub fn reset(&mut self, rows: usize, columns: usize) {
        self.selected.clear();
        self.current = None;
        self.anchor = None;
        self.rows = rows;
        self.columns = columns;
    }

    /// Number of rows of the model this selection refers to.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of columns of the model this selection refers to.
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Move every cell to the row `map` gives for it and adopt new dimensions.
    ///
    /// Cells whose row maps to `None`, or that fall outside the new
    /// dimensions, are dropped. The current index and anchor follow the same
    /// mapping. Selection order is kept.
    pub fn remap_rows<F>(&mut self, rows: usize, columns: usize, map: F)
    where
        F: Fn(usize) -> Option<usize>,
    {
        self.rows = rows;
        self.columns = columns;
        let moved = |index: ModelIndex| {
            map(index.row())
                .map(|row| ModelIndex::new(row, index.column()))
                .filter(|index| index.row() < rows && index.column() < columns)
        };
        self.selected = self.selected.iter().filter_map(|index| moved(*index)).collect();
        self.current = self.current.and_then(moved);
        self.anchor = self.anchor.and_then(moved);
    }

    fn in_range(&self, index: &ModelIndex) -> bool {
        index.row() < self.rows && index.column() < self.columns
    }

    fn expand(&self, index: ModelIndex, flags: SelectionFlags) -> Vec<ModelIndex> {
        if flags.contains(SelectionFlags::ROWS) {
            (0..self.columns).map(|col| index.sibling(col)).collect()
        } else {
            vec![index]
        }
    }

    fn apply(&mut self, cells: Vec<ModelIndex>, flags: SelectionFlags) {
        if flags.contains(SelectionFlags::CLEAR) {
            self.selected.clear();
        }
        for cell in cells {
            if flags.contains(SelectionFlags::TOGGLE) {
                if !self.selected.shift_remove(&cell) {
                    self.selected.insert(cell);
                }
            } else if flags.contains(SelectionFlags::DESELECT) {
                self.selected.shift_remove(&cell);
            } else if flags.contains(SelectionFlags::SELECT) {
                self.selected.insert(cell);
            }
        }
    }

    /// Apply `flags` to a single cell.
    ///
    /// Out-of-range indexes are ignored apart from a `CLEAR`.
    pub fn select(&mut self, index: ModelIndex, flags: SelectionFlags) {
        if !self.in_range(&index) {
            if flags.contains(SelectionFlags::CLEAR) {
                self.selected.clear();
            }
            return;
        }

        let cells = self.expand(index, flags);
        self.apply(cells, flags);

        if flags.contains(SelectionFlags::CURRENT) {
            self.current = Some(index);
            self.anchor = Some(index);
        }
    }

    /// Apply `flags` to the rectangle spanned by `from` and `to`.
    ///
    /// With `CURRENT`, `to` becomes the current index but the anchor stays put.
    pub fn select_range(&mut self, from: ModelIndex, to: ModelIndex, flags: SelectionFlags) {
        if !self.in_range(&from) || !self.in_range(&to) {
            return;
        }

        let (top, bottom) = (from.row().min(to.row()), from.row().max(to.row()));
        let (left, right) = if flags.contains(SelectionFlags::ROWS) {
            (0, self.columns.saturating_sub(1))
        } else {
            (from.column().min(to.column()), from.column().max(to.column()))
        };

        let cells = (top..=bottom)
            .flat_map(|row| (left..=right).map(move |col| ModelIndex::new(row, col)))
            .collect();
        self.apply(cells, flags);

        if flags.contains(SelectionFlags::CURRENT) {
            self.current = Some(to);
        }
    }

    /// Select every cell of the model.
    pub fn select_all(&mut self) {
        if self.rows == 0 || self.columns == 0 {
            return;
        }
        let last = ModelIndex::new(self.rows - 1, self.columns - 1);
        self.select_range(ModelIndex::new(0, 0), last, SelectionFlags::CLEAR_AND_SELECT);
    }

    /// Deselect everything. The current index is kept.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Returns true if the cell is selected.
    pub fn is_selected(&self, index: &ModelIndex) -> bool {
        self.selected.contains(index)
    }

    /// Returns true if any cell of `row` is selected.
    pub fn is_row_selected(&self, row: usize) -> bool {
        self.selected.iter().any(|index| index.row() == row)
    }

    /// Returns true if at least one cell is selected.
    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// All selected cells, in selection order. A fully selected row yields one index per column.
    pub fn selected_indexes(&self) -> Vec<ModelIndex> {
        self.selected.iter().copied().collect()
    }

    /// One index per row with at least one selected cell, addressed to `column`.
    ///
    /// Rows appear in the order their first cell was selected.
    pub fn selected_rows(&self, column: usize) -> Vec<ModelIndex> {
        let rows: IndexSet<usize> = self.selected.iter().map(ModelIndex::row).collect();
        rows.into_iter()
            .map(|row| ModelIndex::new(row, column))
            .collect()
    }

    /// The item that has keyboard focus, if any.
    pub fn current_index(&self) -> Option<ModelIndex> {
        self.current
    }

    /// Move the current index without touching the selection.
    pub fn set_current_index(&mut self, index: Option<ModelIndex>) {
        self.current = index.filter(|index| self.in_range(index));
        self.anchor = self.current;
    }

    /// The fixed end of Shift+Click ranges.
    pub fn anchor(&self) -> Option<ModelIndex> {
        self.anchor
    }
}
