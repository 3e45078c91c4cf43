use weaklabel::prelude::*;


/// Tests for `LfAnalysis` over a fixed six-point,
/// six-function label matrix with three classes.
#[cfg(test)]
pub mod analysis_tests {
    use super::*;

    fn labels() -> LabelMatrix {
        LabelMatrix::from_rows(vec![
            vec![0, 0, 1, 0, 0, 1],
            vec![0, 0, 0, 3, 0, 0],
            vec![3, 0, 0, 0, 0, 1],
            vec![2, 0, 3, 0, 1, 1],
            vec![0, 0, 0, 0, 0, 0],
            vec![2, 0, 1, 3, 2, 1],
        ]).unwrap()
    }

    const GOLDS: [i64; 6] = [1, 2, 3, 1, 2, 3];

    fn assert_close(got: &[f64], want: &[f64]) {
        assert_eq!(got.len(), want.len());
        for (g, w) in got.iter().zip(want) {
            assert!((g - w).abs() < 1e-12, "got {g}, want {w}");
        }
    }


    #[test]
    fn matrix_level_statistics() {
        let labels = labels();
        let analysis = LfAnalysis::new(&labels);

        assert!((analysis.label_coverage() - 5.0 / 6.0).abs() < 1e-12);
        assert!((analysis.label_overlap() - 4.0 / 6.0).abs() < 1e-12);
        assert!((analysis.label_conflict() - 3.0 / 6.0).abs() < 1e-12);
    }


    #[test]
    fn polarities() {
        let labels = labels();
        let analysis = LfAnalysis::new(&labels);

        let expected: Vec<Vec<i64>> = vec![
            vec![2, 3],
            vec![],
            vec![1, 3],
            vec![3],
            vec![1, 2],
            vec![1],
        ];
        assert_eq!(analysis.lf_polarities(), expected);
    }


    #[test]
    fn coverages() {
        let labels = labels();
        let analysis = LfAnalysis::new(&labels);

        let sixths = [3.0, 0.0, 3.0, 2.0, 2.0, 4.0]
            .map(|c| c / 6.0);
        assert_close(&analysis.lf_coverages(), &sixths);
    }


    #[test]
    fn overlaps() {
        let labels = labels();
        let analysis = LfAnalysis::new(&labels);

        let sixths = [3.0, 0.0, 3.0, 1.0, 2.0, 4.0]
            .map(|c| c / 6.0);
        assert_close(&analysis.lf_overlaps(false), &sixths);

        // Normalizing by coverage never divides by zero;
        // the uncovered function reports 0.
        let by_coverage = [1.0, 0.0, 1.0, 0.5, 1.0, 1.0];
        assert_close(&analysis.lf_overlaps(true), &by_coverage);
    }


    #[test]
    fn conflicts() {
        let labels = labels();
        let analysis = LfAnalysis::new(&labels);

        let sixths = [3.0, 0.0, 2.0, 1.0, 2.0, 3.0]
            .map(|c| c / 6.0);
        assert_close(&analysis.lf_conflicts(false), &sixths);

        let by_overlaps = [1.0, 0.0, 2.0 / 3.0, 1.0, 1.0, 3.0 / 4.0];
        assert_close(&analysis.lf_conflicts(true), &by_overlaps);
    }


    #[test]
    fn empirical_accuracy() {
        let labels = labels();
        let analysis = LfAnalysis::new(&labels);

        let (correct, incorrect) = analysis.lf_correct_incorrect(&GOLDS).unwrap();
        assert_eq!(correct, vec![1, 0, 1, 1, 1, 2]);
        assert_eq!(incorrect, vec![2, 0, 2, 1, 1, 2]);

        let accs = [1.0 / 3.0, 0.0, 1.0 / 3.0, 0.5, 0.5, 0.5];
        assert_close(&analysis.lf_empirical_accuracies(&GOLDS).unwrap(), &accs);
    }


    #[test]
    fn empirical_probs() {
        let labels = labels();
        let analysis = LfAnalysis::new(&labels);

        let tables = analysis.lf_empirical_probs(&GOLDS, 3).unwrap();
        assert_eq!(tables.len(), 6);

        // Function 0 votes [0, 0, 3, 2, 0, 2] over
        // true classes [1, 2, 3, 1, 2, 3].
        assert_close(&tables[0][0], &[0.5, 0.0, 0.5, 0.0]);
        assert_close(&tables[0][1], &[1.0, 0.0, 0.0, 0.0]);
        assert_close(&tables[0][2], &[0.0, 0.0, 0.5, 0.5]);

        // Function 5 always votes 1 when it votes at all.
        assert_close(&tables[5][0], &[0.0, 1.0, 0.0, 0.0]);
        assert_close(&tables[5][1], &[1.0, 0.0, 0.0, 0.0]);
        assert_close(&tables[5][2], &[0.0, 1.0, 0.0, 0.0]);

        // Each row is a distribution over {abstain} ∪ classes.
        for table in &tables {
            for row in table {
                let total = row.iter().sum::<f64>();
                assert!((total - 1.0).abs() < 1e-12);
            }
        }
    }


    #[test]
    fn summary_without_golds() {
        let labels = labels();
        let analysis = LfAnalysis::new(&labels);

        let summary = analysis.lf_summary(None, None, None).unwrap();
        assert_eq!(summary.shape(), (6, 5));

        let polarity = summary.column("Polarity").unwrap()
            .utf8()
            .unwrap();
        assert_eq!(polarity.get(0).unwrap(), "[2, 3]");
        assert_eq!(polarity.get(1).unwrap(), "[]");

        let coverage = summary.column("Coverage").unwrap()
            .f64()
            .unwrap();
        assert!((coverage.get(5).unwrap() - 4.0 / 6.0).abs() < 1e-12);
    }


    #[test]
    fn summary_with_golds_and_estimates() {
        let labels = labels();
        let analysis = LfAnalysis::new(&labels);

        let names = ["a", "b", "c", "d", "e", "f"];
        let learned = [0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
        let summary = analysis
            .lf_summary(Some(&GOLDS), Some(&names), Some(&learned))
            .unwrap();

        assert_eq!(summary.shape(), (6, 10));
        assert_eq!(
            summary.get_column_names(),
            vec![
                "LF", "j", "Polarity", "Coverage", "Overlaps", "Conflicts",
                "Correct", "Incorrect", "Emp. Acc.", "Learned Acc.",
            ],
        );

        let correct = summary.column("Correct").unwrap()
            .u32()
            .unwrap();
        assert_eq!(correct.get(5).unwrap(), 2);

        let emp_acc = summary.column("Emp. Acc.").unwrap()
            .f64()
            .unwrap();
        assert!((emp_acc.get(0).unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }


    #[test]
    fn abstain_valued_golds_are_rejected() {
        let labels = LabelMatrix::from_rows(vec![
            vec![1, 0],
            vec![0, 2],
        ]).unwrap();
        let analysis = LfAnalysis::new(&labels);

        // `0` marks abstaining votes, never a true class.
        let golds = [0, 1];
        let err = analysis.lf_correct_incorrect(&golds);
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));
        let err = analysis.lf_empirical_accuracies(&golds);
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));
        let err = analysis.lf_empirical_probs(&golds, 2);
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));
        let err = analysis.lf_summary(Some(&golds), None, None);
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));

        // So is a class id beyond the declared cardinality.
        let too_big = [1, 3];
        let err = analysis.lf_empirical_probs(&too_big, 2);
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));
    }


    #[test]
    fn summary_rejects_misaligned_golds() {
        let labels = labels();
        let analysis = LfAnalysis::new(&labels);

        let too_short = [1, 2, 3];
        let err = analysis.lf_summary(Some(&too_short), None, None);
        assert!(matches!(err, Err(WeakLabelError::InvalidLabelMatrix(_))));
    }


    #[test]
    fn statistics_are_deterministic() {
        let labels = labels();
        let analysis = LfAnalysis::new(&labels);

        assert_eq!(analysis.lf_coverages(), analysis.lf_coverages());
        assert_eq!(analysis.lf_conflicts(true), analysis.lf_conflicts(true));
        assert_eq!(
            analysis.lf_empirical_accuracies(&GOLDS).unwrap(),
            analysis.lf_empirical_accuracies(&GOLDS).unwrap(),
        );
    }
}
