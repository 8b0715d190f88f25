use cutcell_matrix::MatrixVisitor;

mod csr;

/// Records every visited entry together with whether it was reported as a Dirichlet entry.
#[derive(Debug, Default)]
pub struct EntryCollector<T> {
    pub entries: Vec<(usize, usize, T, bool)>,
}

impl<T> MatrixVisitor<T> for EntryCollector<T> {
    fn visit_entry(&mut self, row: usize, col: usize, value: T) {
        self.entries.push((row, col, value, false));
    }

    fn visit_dirichlet_entry(&mut self, row: usize, col: usize, value: T) {
        self.entries.push((row, col, value, true));
    }
}
