/// Shape and placement of a matrix inside the global index space.
///
/// Row `i` of a placed matrix corresponds to global index `row_offset + i * stride`, and
/// column `j` to `col_offset + j * stride`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MatrixBase {
    pub rows: usize,
    pub columns: usize,
    pub row_offset: usize,
    pub col_offset: usize,
    pub stride: usize,
}

impl MatrixBase {
    /// An unplaced matrix: zero offsets and unit stride.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            row_offset: 0,
            col_offset: 0,
            stride: 1,
        }
    }

    pub fn placed(self, row_offset: usize, col_offset: usize, stride: usize) -> Self {
        assert!(stride > 0, "Stride must be positive.");
        Self {
            row_offset,
            col_offset,
            stride,
            ..self
        }
    }

    #[inline(always)]
    pub fn row_index(&self, i: usize) -> usize {
        self.row_offset + i * self.stride
    }

    #[inline(always)]
    pub fn col_index(&self, j: usize) -> usize {
        self.col_offset + j * self.stride
    }

    /// The minimum length of an output slice.
    pub fn required_output_len(&self) -> usize {
        match self.rows {
            0 => 0,
            rows => self.row_index(rows - 1) + 1,
        }
    }

    /// The minimum length of an input slice.
    pub fn required_input_len(&self) -> usize {
        match self.columns {
            0 => 0,
            columns => self.col_index(columns - 1) + 1,
        }
    }

    pub(crate) fn assert_fits<T>(&self, input: &[T], output: &[T]) {
        assert!(
            input.len() >= self.required_input_len(),
            "Input of length {} is too short for matrix placement {:?}.",
            input.len(),
            self
        );
        assert!(
            output.len() >= self.required_output_len(),
            "Output of length {} is too short for matrix placement {:?}.",
            output.len(),
            self
        );
    }

    /// Maps a global row index back to the local row, if the index belongs to this matrix.
    pub fn local_row(&self, global: usize) -> Option<usize> {
        local_index(global, self.row_offset, self.stride, self.rows)
    }

    /// Maps a global column index back to the local column, if the index belongs to this matrix.
    pub fn local_col(&self, global: usize) -> Option<usize> {
        local_index(global, self.col_offset, self.stride, self.columns)
    }
}

/// Maps `offset + k * stride` to `k` for `k < count`, and any other index to `None`.
pub fn local_index(global: usize, offset: usize, stride: usize, count: usize) -> Option<usize> {
    let shifted = global.checked_sub(offset)?;
    (shifted % stride == 0 && shifted / stride < count).then(|| shifted / stride)
}
