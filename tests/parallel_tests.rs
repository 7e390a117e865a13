// tests/parallel_tests.rs
use anyhow::anyhow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;
use yaptools::parallel::{plan_chunks, DataFrame, Label, PoolTransform, Series, Table, Transformed};
use yaptools::Error;

fn sample_frame(rows: usize) -> DataFrame<f64> {
    let rows = (0..rows).map(|i| vec![i as f64, (i * 10) as f64]).collect();
    DataFrame::new(vec!["a".to_string(), "b".to_string()], rows).unwrap()
}

#[test]
fn test_single_worker_matches_direct_call() {
    let frame = sample_frame(7);
    let direct: f64 = frame.rows().iter().map(|r| r[0] + r[1]).sum();

    let pool = PoolTransform::new(1).unwrap();
    let result = pool
        .transform(&frame, |f: DataFrame<f64>| {
            Ok(f.rows().iter().map(|r| r[0] + r[1]).sum::<f64>())
        })
        .unwrap();

    assert_eq!(result, Transformed::Direct(direct));
    assert!(!result.is_parallel());
}

#[test]
fn test_chunks_reconstruct_row_order() {
    let frame = sample_frame(11);
    let pool = PoolTransform::new(3).unwrap();
    let parts = pool
        .transform(&frame, |f: DataFrame<f64>| Ok(f))
        .unwrap()
        .into_parts();

    assert_eq!(parts.len(), 3);
    assert_eq!(parts.iter().map(|p| p.len()).collect::<Vec<_>>(), vec![4, 4, 3]);
    assert_eq!(DataFrame::concat(parts).unwrap(), frame);
}

#[test]
fn test_chunk_plan_covers_length() {
    for len in 1..40 {
        for workers in 1..=len.min(9) {
            let ranges = plan_chunks(len, workers);
            let chunk = (len + workers - 1) / workers;
            assert_eq!(ranges.len(), (len + chunk - 1) / chunk);
            assert_eq!(ranges.iter().map(|r| r.len()).sum::<usize>(), len);
            assert_eq!(ranges[0].start, 0);
            for pair in ranges.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
        }
    }
}

#[test]
fn test_aggregator_receives_parts_in_order() {
    let series = Series::new((1..=20).collect::<Vec<i64>>());
    let pool = PoolTransform::new(4)
        .unwrap()
        .with_aggregate(|parts: Vec<Vec<i64>>| Ok(parts.into_iter().flatten().collect()));

    let result = pool
        .transform(&series, |s: Series<i64>| Ok(s.into_values()))
        .unwrap();

    assert_eq!(result, Transformed::Aggregated((1..=20).collect()));
}

#[test]
fn test_aggregator_skipped_without_split() {
    let series = Series::new(vec![5i64]);
    let pool = PoolTransform::new(4)
        .unwrap()
        .with_aggregate(|_parts: Vec<i64>| Err(anyhow!("should not run")));

    let result = pool.transform(&series, |s: Series<i64>| Ok(s.values()[0])).unwrap();
    assert_eq!(result, Transformed::Direct(5));
}

#[test]
fn test_row_apply_keeps_labels() {
    let labels: Vec<Label> = ["x", "y", "z", "w", "v"].iter().map(|&l| Label::from(l)).collect();
    let rows = (0..5).map(|i| vec![i, i + 1]).collect();
    let frame = DataFrame::with_index(vec!["lo".into(), "hi".into()], labels.clone(), rows).unwrap();

    let pool = PoolTransform::new(2)
        .unwrap()
        .with_aggregate(|parts: Vec<Series<i32>>| Ok(Series::concat(parts)));
    let result = pool
        .apply(&frame, |row: &[i32]| row[0] * row[1])
        .unwrap()
        .into_value()
        .unwrap();

    assert_eq!(result.index(), labels.as_slice());
    assert_eq!(result.values(), &[0, 2, 6, 12, 20]);
    assert_eq!(result.get(&Label::from("z")), Some(&6));
}

#[test]
fn test_closure_may_borrow_caller_data() {
    let offsets = vec![100, 200];
    let series = Series::new(vec![1, 2, 3, 4]);
    let pool = PoolTransform::<Series<i32>>::new(2).unwrap();

    let parts = pool
        .apply(&series, |v: &i32| v + offsets[0])
        .unwrap()
        .into_parts();

    let values: Vec<i32> = parts.into_iter().flat_map(Series::into_values).collect();
    assert_eq!(values, vec![101, 102, 103, 104]);
}

#[test]
fn test_first_failing_chunk_error_is_returned() {
    let series = Series::new((0..8).collect::<Vec<i32>>());
    let pool = PoolTransform::new(4).unwrap();

    let err = pool
        .transform(&series, |s: Series<i32>| {
            let first = s.values()[0];
            if first >= 2 {
                Err(anyhow!("chunk starting at {} failed", first))
            } else {
                Ok(first)
            }
        })
        .unwrap_err();

    assert_eq!(err.to_string(), "chunk starting at 2 failed");
}

#[test]
fn test_error_returned_after_all_chunks_finish() {
    let series = Series::new((0..8).collect::<Vec<i32>>());
    let finished = AtomicUsize::new(0);
    let pool = PoolTransform::new(4).unwrap();

    let err = pool
        .transform(&series, |s: Series<i32>| {
            let first = s.values()[0];
            if first == 6 {
                thread::sleep(Duration::from_millis(100));
            }
            finished.fetch_add(1, Ordering::SeqCst);
            if first == 0 {
                Err(anyhow!("first chunk failed"))
            } else {
                Ok(first)
            }
        })
        .unwrap_err();

    assert_eq!(err.to_string(), "first chunk failed");
    assert_eq!(finished.load(Ordering::SeqCst), 4);
}

#[test]
fn test_crate_errors_survive_the_pool() {
    let series = Series::new(vec![1, 2, 3]);
    let pool = PoolTransform::<i32>::new(3).unwrap();

    let err = pool
        .transform(&series, |_s: Series<i32>| Err(Error::value_error("bad chunk").into()))
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Value(_))));
}

#[test]
fn test_worker_panic_is_reported() {
    let series = Series::new(vec![1, 2, 3, 4]);
    let pool = PoolTransform::new(2).unwrap();

    let err = pool
        .transform(&series, |s: Series<i32>| {
            if s.values().contains(&3) {
                panic!("boom");
            }
            Ok(s.len())
        })
        .unwrap_err();

    match err.downcast_ref::<Error>() {
        Some(Error::WorkerPanic { chunk, message, .. }) => {
            assert_eq!(*chunk, 1);
            assert_eq!(message, "boom");
        }
        other => panic!("expected a worker panic, got {:?}", other),
    }
}

#[test]
fn test_empty_table_runs_directly() {
    let series: Series<i32> = Series::new(Vec::new());
    let pool = PoolTransform::new(4).unwrap();
    let result = pool.transform(&series, |s: Series<i32>| Ok(s.len())).unwrap();
    assert_eq!(result, Transformed::Direct(0));
}
