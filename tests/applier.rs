use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use polars::prelude::*;
use weaklabel::prelude::*;


fn reviews() -> Vec<Record> {
    vec![
        Record::from_pairs([("text", "a GOOD film"), ("stars", "5")]),
        Record::from_pairs([("text", "bad acting"), ("stars", "1")]),
        Record::from_pairs([("text", "so so"), ("stars", "3")]),
        Record::from_pairs([("text", "good but too long"), ("stars", "4")]),
    ]
}


fn keyword_lf(name: &str, keyword: &'static str, label: i64) -> LabelingFunction {
    LfBuilder::new(name)
        .label_space(&[0, label])
        .schema(&["text"])
        .build(move |x, _| {
            let hit = x.text("text")?.contains(keyword);
            Ok(if hit { label } else { ABSTAIN })
        })
}


/// Tests for the labeling function appliers.
#[cfg(test)]
pub mod applier_tests {
    use super::*;

    #[test]
    fn sequential_application() {
        let records = reviews();
        let lfs = vec![
            keyword_lf("good", "good", 1),
            keyword_lf("bad", "bad", 2),
        ];

        let (labels, diagnostics) = SequentialApplier::new(&records)
            .apply(&lfs)
            .unwrap();

        assert_eq!(labels.shape(), (4, 2));
        assert_eq!(labels.row(0), &[0, 0]);
        assert_eq!(labels.row(1), &[0, 2]);
        assert_eq!(labels.row(2), &[0, 0]);
        assert_eq!(labels.row(3), &[1, 0]);
        assert_eq!(diagnostics.failures(), &[0, 0]);
    }


    #[test]
    fn backends_agree() {
        let records = reviews();
        let data = df!(
            "text" => records.iter()
                .map(|x| x.text("text").unwrap().to_string())
                .collect::<Vec<_>>(),
            "stars" => records.iter()
                .map(|x| x.text("stars").unwrap().to_string())
                .collect::<Vec<_>>(),
        ).unwrap();

        let lfs = vec![
            keyword_lf("good", "good", 1),
            keyword_lf("bad", "bad", 2),
            keyword_lf("long", "long", 2),
        ];

        let (seq, seq_diag) = SequentialApplier::new(&records)
            .apply(&lfs)
            .unwrap();
        let (par, par_diag) = ParallelApplier::new(&records)
            .apply(&lfs)
            .unwrap();
        let (df_labels, df_diag) = DataFrameApplier::new(&data)
            .apply(&lfs)
            .unwrap();

        assert_eq!(seq, par);
        assert_eq!(seq, df_labels);
        assert_eq!(seq_diag, par_diag);
        assert_eq!(seq_diag, df_diag);
    }


    #[test]
    fn resources_parameterize_the_body() {
        let records = reviews();
        let lf = LfBuilder::new("short")
            .resource("max_len", 8_i64)
            .build(|x, res| {
                let max_len = match res.get("max_len") {
                    Some(FieldValue::Int(v)) => *v as usize,
                    _ => 0,
                };
                Ok(if x.text("text")?.len() <= max_len { 1 } else { ABSTAIN })
            });

        let (labels, _) = SequentialApplier::new(&records)
            .apply(&[lf])
            .unwrap();
        assert_eq!(labels.column(0), vec![0, 0, 1, 0]);
    }


    #[test]
    fn body_failure_aborts_the_run() {
        let records = reviews();
        let lf = LfBuilder::new("stars")
            .schema(&["stars"])
            .build(|x, _| Ok(if x.int("stars")? >= 4 { 1 } else { 2 }));

        // `stars` holds text, so the body fails on every record.
        let err = SequentialApplier::new(&records).apply(&[lf]);
        match err {
            Err(WeakLabelError::LfExecution { lf, source }) => {
                assert_eq!(lf, "stars");
                assert!(matches!(source, LfError::WrongType { .. }));
            },
            other => panic!("expected an execution error, got {other:?}"),
        }
    }


    #[test]
    fn votes_outside_the_label_space_abort_the_run() {
        let records = reviews();
        let lf = LfBuilder::new("overshoot")
            .label_space(&[0, 1])
            .build(|x, _| Ok(if x.text("text")?.contains("bad") { 2 } else { 1 }));

        let err = SequentialApplier::new(&records).apply(&[lf]);
        match err {
            Err(WeakLabelError::LfExecution { lf, source }) => {
                assert_eq!(lf, "overshoot");
                assert!(matches!(source, LfError::Custom(_)));
            },
            other => panic!("expected an execution error, got {other:?}"),
        }
    }


    #[test]
    fn fault_tolerant_out_of_space_votes_become_abstains() {
        let records = reviews();
        let lf = LfBuilder::new("overshoot")
            .label_space(&[0, 1])
            .fault_tolerant()
            .build(|x, _| Ok(if x.text("text")?.contains("bad") { 2 } else { 1 }));

        let (labels, diagnostics) = SequentialApplier::new(&records)
            .apply(&[lf])
            .unwrap();

        // Only "bad acting" votes outside the declared space.
        assert_eq!(labels.column(0), vec![1, 0, 1, 1]);
        assert_eq!(diagnostics.failures(), &[1]);
    }


    #[test]
    fn fault_tolerant_failures_become_abstains() {
        let records = reviews();
        let lfs = vec![
            keyword_lf("good", "good", 1),
            LfBuilder::new("stars")
                .fault_tolerant()
                .build(|x, _| Ok(if x.int("stars")? >= 4 { 1 } else { 2 })),
        ];

        let (labels, diagnostics) = SequentialApplier::new(&records)
            .apply(&lfs)
            .unwrap();

        assert_eq!(labels.column(1), vec![0, 0, 0, 0]);
        assert_eq!(diagnostics.failures(), &[0, 4]);
    }


    #[test]
    fn preprocessors_run_before_the_body() {
        let records = reviews();
        let lower = LambdaPreprocessor::new("lowercase", |x: &Record| {
            let text = x.text("text").ok()?.to_lowercase();
            Some(x.with("text", text))
        });

        let lf = LfBuilder::new("good")
            .preprocessor(lower)
            .build(|x, _| {
                Ok(if x.text("text")?.contains("good") { 1 } else { ABSTAIN })
            });

        let (labels, _) = SequentialApplier::new(&records)
            .apply(&[lf])
            .unwrap();

        // "a GOOD film" only matches after lowercasing.
        assert_eq!(labels.column(0), vec![1, 0, 0, 1]);
    }


    #[test]
    fn failing_preprocessor_is_fatal() {
        let records = reviews();
        let broken = LambdaPreprocessor::new("broken", |_: &Record| None);

        // Fault tolerance covers the body, not the preprocessors.
        let lf = LfBuilder::new("good")
            .preprocessor(broken)
            .fault_tolerant()
            .build(|_, _| Ok(ABSTAIN));

        let err = SequentialApplier::new(&records).apply(&[lf]);
        match err {
            Err(WeakLabelError::Preprocessor { preprocessor }) => {
                assert_eq!(preprocessor, "broken");
            },
            other => panic!("expected a preprocessor error, got {other:?}"),
        }
    }


    #[test]
    fn memoization_shares_work_across_functions() {
        let records = reviews();
        let cache = PreprocessCache::new();
        let invocations = Arc::new(AtomicUsize::new(0));

        let counted = |counter: Arc<AtomicUsize>| {
            LambdaPreprocessor::new("lowercase", move |x: &Record| {
                counter.fetch_add(1, Ordering::SeqCst);
                let text = x.text("text").ok()?.to_lowercase();
                Some(x.with("text", text))
            })
        };

        let lfs = vec![
            LfBuilder::new("good")
                .preprocessor(MemoizedPreprocessor::new(
                    counted(Arc::clone(&invocations)), cache.clone(),
                ))
                .build(|x, _| {
                    Ok(if x.text("text")?.contains("good") { 1 } else { 0 })
                }),
            LfBuilder::new("bad")
                .preprocessor(MemoizedPreprocessor::new(
                    counted(Arc::clone(&invocations)), cache.clone(),
                ))
                .build(|x, _| {
                    Ok(if x.text("text")?.contains("bad") { 2 } else { 0 })
                }),
        ];

        assert!(cache.is_empty());
        let (labels, _) = SequentialApplier::new(&records)
            .apply(&lfs)
            .unwrap();

        // One transform per record; the second function hits the cache.
        assert_eq!(invocations.load(Ordering::SeqCst), records.len());
        assert_eq!(cache.len(), records.len());
        assert_eq!(labels.column(0), vec![1, 0, 0, 1]);

        // A second run over the same handle reuses every entry.
        let (again, _) = SequentialApplier::new(&records)
            .apply(&lfs)
            .unwrap();
        assert_eq!(invocations.load(Ordering::SeqCst), records.len());
        assert_eq!(labels, again);

        cache.clear();
        assert!(cache.is_empty());
    }


    #[test]
    fn shared_cache_keys_by_name_and_record() {
        let records = reviews();
        let cache = PreprocessCache::new();

        // Two different transforms on one handle, distinct names.
        let upper = LambdaPreprocessor::new("uppercase", |x: &Record| {
            let text = x.text("text").ok()?.to_uppercase();
            Some(x.with("text", text))
        });
        let lower = LambdaPreprocessor::new("lowercase", |x: &Record| {
            let text = x.text("text").ok()?.to_lowercase();
            Some(x.with("text", text))
        });

        let lfs = vec![
            LfBuilder::new("shout")
                .preprocessor(MemoizedPreprocessor::new(upper, cache.clone()))
                .build(|x, _| {
                    Ok(if x.text("text")?.contains("GOOD") { 1 } else { 0 })
                }),
            LfBuilder::new("mutter")
                .preprocessor(MemoizedPreprocessor::new(lower, cache.clone()))
                .build(|x, _| {
                    Ok(if x.text("text")?.contains("good") { 1 } else { 0 })
                }),
        ];

        let (labels, _) = SequentialApplier::new(&records)
            .apply(&lfs)
            .unwrap();

        // Neither transform is served the other's result.
        assert_eq!(labels.column(0), vec![1, 0, 0, 1]);
        assert_eq!(labels.column(1), vec![1, 0, 0, 1]);
        assert_eq!(cache.len(), 2 * records.len());
    }


    #[test]
    fn dataframe_nulls_become_null_fields() {
        let data = df!(
            "text" => [Some("good"), None, Some("bad")],
        ).unwrap();

        let lf = LfBuilder::new("good")
            .fault_tolerant()
            .build(|x, _| {
                Ok(if x.text("text")?.contains("good") { 1 } else { 0 })
            });

        let (labels, diagnostics) = DataFrameApplier::new(&data)
            .apply(&[lf])
            .unwrap();

        // The null row fails the text lookup and abstains.
        assert_eq!(labels.column(0), vec![1, 0, 0]);
        assert_eq!(diagnostics.failures(), &[1]);
    }
}
