use weaklabel::prelude::*;


/// Tests for `LabelMatrix` and its one-hot expansion.
#[cfg(test)]
pub mod matrix_tests {
    use super::*;

    fn small() -> LabelMatrix {
        LabelMatrix::from_rows(vec![
            vec![1, 2],
            vec![2, 0],
            vec![1, 1],
        ]).unwrap()
    }


    #[test]
    fn accessors() {
        let labels = small();
        assert_eq!(labels.shape(), (3, 2));
        assert_eq!(labels.get(0, 1), 2);
        assert_eq!(labels.row(1), &[2, 0]);
        assert_eq!(labels.column(0), vec![1, 2, 1]);
        assert_eq!(labels.max_label(), 2);

        let rows = labels.rows().collect::<Vec<_>>();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], &[1, 1]);
    }


    #[test]
    fn empty_matrix_is_rejected() {
        let err = LabelMatrix::from_rows(Vec::new());
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));

        let err = LabelMatrix::from_rows(vec![Vec::new()]);
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));
    }


    #[test]
    fn ragged_rows_are_rejected() {
        let err = LabelMatrix::from_rows(vec![
            vec![1, 2],
            vec![1],
        ]);
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));
    }


    #[test]
    fn negative_labels_are_rejected() {
        let err = LabelMatrix::from_rows(vec![
            vec![1, -1],
        ]);
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));
    }


    #[test]
    fn base_expansion() {
        let labels = small();
        let l_aug = AugmentedMatrix::build(&labels, 2, &[]).unwrap();

        assert_eq!(l_aug.shape(), (3, 4));
        assert_eq!(l_aug.rows()[0], vec![1.0, 0.0, 0.0, 1.0]);
        assert_eq!(l_aug.rows()[1], vec![0.0, 1.0, 0.0, 0.0]);
        assert_eq!(l_aug.rows()[2], vec![1.0, 0.0, 1.0, 0.0]);

        let layout = l_aug.layout();
        assert_eq!(layout.width(), 4);
        assert_eq!(layout.base_column(0, 1), 0);
        assert_eq!(layout.base_column(1, 2), 3);
    }


    #[test]
    fn clique_columns_indicate_observed_patterns() {
        let labels = small();
        let cliques = vec![vec![0, 1]];
        let l_aug = AugmentedMatrix::build(&labels, 2, &cliques).unwrap();

        // Observed joint patterns of (lf 0, lf 1): (1, 1) and (1, 2).
        // Row 1 abstains on lf 1, so (2, _) yields no column.
        assert_eq!(l_aug.shape(), (3, 6));
        let layout = l_aug.layout();
        assert_eq!(layout.columns[4].lfs, vec![0, 1]);
        assert_eq!(layout.columns[4].classes, vec![1, 1]);
        assert_eq!(layout.columns[5].classes, vec![1, 2]);

        assert_eq!(&l_aug.rows()[0][4..], &[0.0, 1.0]);
        assert_eq!(&l_aug.rows()[1][4..], &[0.0, 0.0]);
        assert_eq!(&l_aug.rows()[2][4..], &[1.0, 0.0]);
    }


    #[test]
    fn clique_layout_ignores_row_order() {
        let shuffled = LabelMatrix::from_rows(vec![
            vec![1, 1],
            vec![1, 2],
            vec![2, 0],
        ]).unwrap();
        let cliques = vec![vec![0, 1]];

        let a = AugmentedMatrix::build(&small(), 2, &cliques).unwrap();
        let b = AugmentedMatrix::build(&shuffled, 2, &cliques).unwrap();
        assert_eq!(a.layout(), b.layout());
    }


    #[test]
    fn invalid_expansions_are_rejected() {
        let labels = small();

        let err = AugmentedMatrix::build(&labels, 1, &[]);
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));

        // The largest label exceeds the declared cardinality.
        let wide = LabelMatrix::from_rows(vec![vec![3, 1]]).unwrap();
        let err = AugmentedMatrix::build(&wide, 2, &[]);
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));

        let err = AugmentedMatrix::build(&labels, 2, &[vec![0]]);
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));

        let err = AugmentedMatrix::build(&labels, 2, &[vec![0, 7]]);
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));
    }


    #[test]
    fn moment_matrix_statistics() {
        let labels = small();
        let l_aug = AugmentedMatrix::build(&labels, 2, &[]).unwrap();
        let o = moment_matrix(&l_aug);

        let d = l_aug.shape().1;
        assert_eq!(o.len(), d);

        // Symmetric, with per-column coverage rates on the diagonal.
        for a in 0..d {
            for b in 0..d {
                assert!((o[a][b] - o[b][a]).abs() < 1e-12);
            }
        }
        assert!((o[0][0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((o[1][1] - 1.0 / 3.0).abs() < 1e-12);
        assert!((o[2][2] - 1.0 / 3.0).abs() < 1e-12);
        assert!((o[3][3] - 1.0 / 3.0).abs() < 1e-12);

        // Off-diagonal entries are co-occurrence rates.
        assert!((o[0][2] - 1.0 / 3.0).abs() < 1e-12);
        assert!((o[0][3] - 1.0 / 3.0).abs() < 1e-12);
        assert!((o[1][2]).abs() < 1e-12);

        // A Gram matrix is positive semi-definite.
        for x in [vec![1.0, 1.0, 1.0, 1.0], vec![1.0, -1.0, 2.0, -0.5]] {
            let quad = (0..d)
                .map(|a| {
                    x[a] * (0..d).map(|b| o[a][b] * x[b]).sum::<f64>()
                })
                .sum::<f64>();
            assert!(quad >= -1e-12);
        }
    }
}
