use super::EntryCollector;
use cutcell_matrix::{ApplyPolicy, Csr, CsrBuilder, Operator};
use proptest::collection::vec;
use proptest::prelude::*;
use util::assert_panics;

#[test]
fn csr_builder_sorts_and_sums_duplicates() {
    let mut builder = CsrBuilder::new(3, 4);
    builder.add(2, 3, 1.0);
    builder.add(0, 2, 2.0);
    builder.add(2, 0, -1.0);
    builder.add(0, 2, 0.5);
    builder.add(0, 1, 4.0);
    assert_eq!(builder.len(), 5);

    let csr = builder.build();
    assert_eq!(csr.nrows(), 3);
    assert_eq!(csr.ncols(), 4);
    assert_eq!(csr.nnz(), 4);
    assert_eq!(csr.row_offsets(), &[0, 2, 2, 4]);
    assert_eq!(csr.column_indices(), &[1, 2, 0, 3]);
    assert_eq!(csr.values(), &[4.0, 2.5, -1.0, 1.0]);
    assert_eq!(csr.row(1).0.len(), 0);
}

#[test]
fn csr_apply_leaves_empty_rows_untouched() {
    let mut builder = CsrBuilder::new(3, 3);
    builder.add(0, 2, 2.0);
    builder.add(2, 0, 3.0);
    let csr = builder.build();

    let x = [1.0, 10.0, 100.0];
    let mut y = [-1.0, -1.0, -1.0];
    csr.apply(&x, &mut y, ApplyPolicy::Assign);
    assert_eq!(y, [200.0, -1.0, 3.0]);
    csr.apply(&x, &mut y, ApplyPolicy::Accumulate);
    assert_eq!(y, [400.0, -1.0, 6.0]);
}

#[test]
fn csr_placement_and_accept() {
    let mut builder = CsrBuilder::new(2, 2);
    builder.add(1, 0, 5);
    builder.add(0, 1, 7);
    let csr = builder.build().with_placement(1, 0, 3);

    let mut collector = EntryCollector::default();
    csr.accept(&mut collector);
    assert_eq!(collector.entries, vec![(1, 3, 7, false), (4, 0, 5, false)]);

    let x = [2, 0, 0, 3];
    let mut y = [0; 5];
    csr.apply(&x, &mut y, ApplyPolicy::Assign);
    assert_eq!(y, [0, 21, 0, 0, 10]);
}

#[test]
fn csr_iter_is_row_major() {
    let mut builder = CsrBuilder::new(2, 3);
    builder.add(1, 1, 1);
    builder.add(0, 2, 2);
    builder.add(0, 0, 3);
    let entries: Vec<_> = builder.build().iter().collect();
    assert_eq!(entries, vec![(0, 0, 3), (0, 2, 2), (1, 1, 1)]);
}

#[test]
fn csr_rejects_invalid_input() {
    assert_panics!({
        let mut builder = CsrBuilder::new(2, 2);
        builder.add(2, 0, 1.0)
    });
    assert_panics!({
        let mut builder = CsrBuilder::new(2, 2);
        builder.add(0, 2, 1.0)
    });
    assert_panics!(Csr::from_csr_data(1, 3, vec![0, 2], vec![2, 1], vec![1.0, 1.0]));
    assert_panics!(Csr::from_csr_data(1, 3, vec![0, 2], vec![1, 1], vec![1.0, 1.0]));
    assert_panics!(Csr::<f64>::from_csr_data(2, 3, vec![0, 0], vec![], vec![]));
}

#[test]
fn csr_zeros_is_empty() {
    let csr = Csr::<f64>::zeros(4, 2);
    assert_eq!(csr.nnz(), 0);
    assert_eq!(csr.row_offsets(), &[0, 0, 0, 0, 0]);
    assert!(CsrBuilder::<f64>::new(4, 2).is_empty());
}

fn triplets() -> impl Strategy<Value = Vec<(usize, usize, i32)>> {
    vec((0usize..5, 0usize..6, -9i32..9), 0..24)
}

proptest! {
    #[test]
    fn csr_builder_is_independent_of_insertion_order(
        (triplets, shuffled) in triplets().prop_flat_map(|t| (Just(t.clone()), Just(t).prop_shuffle())),
        x in vec(-9i32..9, 6),
    ) {
        let build = |triplets: &[(usize, usize, i32)]| {
            let mut builder = CsrBuilder::new(5, 6);
            for (i, j, v) in triplets {
                builder.add(*i, *j, *v);
            }
            builder.build()
        };
        let a = build(&triplets);
        let b = build(&shuffled);
        prop_assert_eq!(&a, &b);

        let mut y_a = vec![0; 5];
        let mut y_b = vec![0; 5];
        a.apply(&x, &mut y_a, ApplyPolicy::Assign);
        b.apply(&x, &mut y_b, ApplyPolicy::Assign);
        prop_assert_eq!(y_a, y_b);
    }

    #[test]
    fn csr_apply_matches_triplet_sum(triplets in triplets(), x in vec(-9i32..9, 6)) {
        let mut builder = CsrBuilder::new(5, 6);
        let mut expected = vec![0; 5];
        for (i, j, v) in &triplets {
            builder.add(*i, *j, *v);
            expected[*i] += v * x[*j];
        }
        let mut y = vec![0; 5];
        builder.build().apply(&x, &mut y, ApplyPolicy::Accumulate);
        prop_assert_eq!(y, expected);
    }
}
