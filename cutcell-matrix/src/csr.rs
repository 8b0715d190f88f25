use crate::{ApplyPolicy, MatrixBase, MatrixScalar, MatrixVisitor, Operator};
use itertools::izip;
use std::cmp::{max, Ordering};

/// A sparse matrix in compressed sparse row format.
///
/// Column indices within each row are sorted and unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Csr<T: MatrixScalar> {
    base: MatrixBase,
    row_offsets: Vec<usize>,
    column_indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: MatrixScalar> Csr<T> {
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::from_csr_data(nrows, ncols, vec![0; nrows + 1], Vec::new(), Vec::new())
    }

    pub fn from_csr_data(
        nrows: usize,
        ncols: usize,
        row_offsets: Vec<usize>,
        column_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(nrows + 1, row_offsets.len(), "length of row offsets must be equal to nrows + 1");
        assert_eq!(column_indices.len(), values.len());
        assert_eq!(row_offsets.first(), Some(&0));
        assert_eq!(row_offsets.last(), Some(&column_indices.len()));
        for (begin, end) in row_offsets.iter().zip(&row_offsets[1..]) {
            assert!(begin <= end, "Row offsets must be non-decreasing.");
            let row_columns = &column_indices[*begin..*end];
            assert!(
                row_columns.windows(2).all(|pair| pair[0] < pair[1]),
                "Column indices must be sorted and unique within each row."
            );
            assert!(row_columns.iter().all(|j| *j < ncols), "Column index out of bounds.");
        }
        Self {
            base: MatrixBase::new(nrows, ncols),
            row_offsets,
            column_indices,
            values,
        }
    }

    pub fn with_placement(mut self, row_offset: usize, col_offset: usize, stride: usize) -> Self {
        self.base = self.base.placed(row_offset, col_offset, stride);
        self
    }

    pub fn base(&self) -> &MatrixBase {
        &self.base
    }

    pub fn nrows(&self) -> usize {
        self.base.rows
    }

    pub fn ncols(&self) -> usize {
        self.base.columns
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    pub fn column_indices(&self) -> &[usize] {
        &self.column_indices
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Column indices and values of row `i`.
    pub fn row(&self, i: usize) -> (&[usize], &[T]) {
        let range = self.row_offsets[i]..self.row_offsets[i + 1];
        (&self.column_indices[range.clone()], &self.values[range])
    }

    /// Gives an iterator over stored elements in row-major order, in local indices.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (usize, usize, T)> {
        (0..self.nrows()).flat_map(move |i| {
            let (columns, values) = self.row(i);
            izip!(columns, values).map(move |(j, v)| (i, *j, *v))
        })
    }
}

impl<T: MatrixScalar> Operator<T> for Csr<T> {
    /// Rows without stored entries are left untouched, also for [`ApplyPolicy::Assign`].
    fn apply(&self, input: &[T], output: &mut [T], policy: ApplyPolicy) {
        self.base.assert_fits(input, output);
        for i in 0..self.nrows() {
            let (columns, values) = self.row(i);
            if columns.is_empty() {
                continue;
            }
            let mut sum = T::zero();
            for (j, a_ij) in izip!(columns, values) {
                sum += *a_ij * input[self.base.col_index(*j)];
            }
            policy.store(&mut output[self.base.row_index(i)], sum);
        }
    }

    fn accept(&self, visitor: &mut dyn MatrixVisitor<T>) {
        for (i, j, v) in self.iter() {
            if v != T::zero() {
                visitor.visit_entry(self.base.row_index(i), self.base.col_index(j), v);
            }
        }
    }
}

/// Accumulates `(row, col, value)` triplets in any order and compresses them into a [`Csr`].
///
/// Duplicate entries are summed. The result only depends on the multiset of inserted triplets,
/// not on the order of insertion.
#[derive(Debug, Clone)]
pub struct CsrBuilder<T> {
    nrows: usize,
    ncols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<T>,
}

impl<T: MatrixScalar> CsrBuilder<T> {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            rows: Vec::new(),
            cols: Vec::new(),
            values: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn add(&mut self, row: usize, col: usize, value: T) {
        assert!(row < self.nrows, "Row index {} out of bounds ({} rows).", row, self.nrows);
        assert!(col < self.ncols, "Column index {} out of bounds ({} columns).", col, self.ncols);
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
    }

    /// Number of triplets added so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn build(self) -> Csr<T> {
        let (unsorted_offsets, unsorted_cols, unsorted_values) =
            triplets_to_unsorted_csr(self.nrows, &self.rows, &self.cols, &self.values);

        let mut row_offsets = Vec::with_capacity(self.nrows + 1);
        let mut column_indices = Vec::new();
        let mut values = Vec::new();
        row_offsets.push(0);

        // Rows usually hold very few entries, so the workspaces are reused across rows
        let mut idx_workspace = Vec::new();
        let mut values_workspace = Vec::new();
        let mut perm_workspace = Vec::new();

        for row in 0..self.nrows {
            let range = unsorted_offsets[row]..unsorted_offsets[row + 1];
            let count = range.len();

            perm_workspace.resize(max(count, perm_workspace.len()), 0);
            idx_workspace.resize(max(count, idx_workspace.len()), 0);
            values_workspace.resize(max(count, values_workspace.len()), T::zero());
            sort_row(
                &mut idx_workspace[..count],
                &mut values_workspace[..count],
                &unsorted_cols[range.clone()],
                &unsorted_values[range],
                &mut perm_workspace[..count],
            );

            combine_duplicates(
                |idx| column_indices.push(idx),
                |val| values.push(val),
                &idx_workspace[..count],
                &values_workspace[..count],
            );
            row_offsets.push(column_indices.len());
        }

        Csr::from_csr_data(self.nrows, self.ncols, row_offsets, column_indices, values)
    }
}

/// Groups triplets by row with a counting sort, retaining duplicates and the insertion order
/// within each row.
fn triplets_to_unsorted_csr<T: MatrixScalar>(
    nrows: usize,
    rows: &[usize],
    cols: &[usize],
    values: &[T],
) -> (Vec<usize>, Vec<usize>, Vec<T>) {
    let mut offsets = vec![0usize; nrows + 1];
    for row in rows {
        offsets[*row] += 1;
    }

    // Convert the counts to an offset
    let mut offset = 0;
    for row_offset in offsets.iter_mut() {
        let count = *row_offset;
        *row_offset = offset;
        offset += count;
    }

    let mut csr_cols = vec![0usize; values.len()];
    let mut csr_values = vec![T::zero(); values.len()];
    let mut current_counts = vec![0usize; nrows];
    for (i, j, v) in izip!(rows, cols, values) {
        let position = offsets[*i] + current_counts[*i];
        csr_cols[position] = *j;
        csr_values[position] = *v;
        current_counts[*i] += 1;
    }

    (offsets, csr_cols, csr_values)
}

/// Sorts one row by column index, breaking ties by value so that duplicates are later combined
/// in a canonical order.
fn sort_row<T: MatrixScalar>(
    col_idx_result: &mut [usize],
    values_result: &mut [T],
    col_idx: &[usize],
    values: &[T],
    permutation: &mut [usize],
) {
    for (i, p) in permutation.iter_mut().enumerate() {
        *p = i;
    }

    permutation.sort_unstable_by(|a, b| {
        col_idx[*a]
            .cmp(&col_idx[*b])
            .then_with(|| values[*a].partial_cmp(&values[*b]).unwrap_or(Ordering::Equal))
    });

    for (out_col, out_value, old_pos) in izip!(col_idx_result, values_result, permutation.iter()) {
        *out_col = col_idx[*old_pos];
        *out_value = values[*old_pos];
    }
}

/// Given *sorted* indices and corresponding values, sums duplicates and emits each index once.
fn combine_duplicates<T: MatrixScalar>(
    mut produce_idx: impl FnMut(usize),
    mut produce_value: impl FnMut(T),
    idx_array: &[usize],
    values: &[T],
) {
    let mut i = 0;
    while i < idx_array.len() {
        let idx = idx_array[i];
        let mut combined_value = values[i];
        let mut j = i + 1;
        while j < idx_array.len() && idx_array[j] == idx {
            combined_value += values[j];
            j += 1;
        }
        produce_idx(idx);
        produce_value(combined_value);
        i = j;
    }
}
