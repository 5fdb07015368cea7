//! Aggregation tests against the public API.

use vow::{Promise, PromiseError, all, launch, launch_all};

use crate::common::{slow_err, slow_ok};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn wide_fan_out_keeps_input_order() {
    // Later inputs finish earlier; the assembled vector must not care.
    let works: Vec<_> = (0..32_u64).map(|i| slow_ok(3 * (32 - i), i)).collect();

    let combined = launch_all(works);
    let values = combined.result().await.expect("all inputs succeed");
    assert_eq!(values, (0..32).collect::<Vec<u64>>());
}

#[tokio::test]
async fn launch_all_matches_launch_then_all() {
    let works: Vec<fn() -> Result<u32, String>> = vec![|| Ok(10), || Ok(20)];

    let sugar = launch_all(works.clone());
    let spelled_out = all(works.into_iter().map(launch).collect());

    assert_eq!(sugar.result().await, spelled_out.result().await);
}

#[tokio::test]
async fn a_fast_failure_preempts_slow_successes() {
    type Work = Box<dyn FnOnce() -> Result<u64, String> + Send>;
    let works: Vec<Work> = vec![
        Box::new(slow_ok(80, 1)),
        Box::new(slow_err(5, "fast failure")),
        Box::new(slow_ok(80, 3)),
    ];

    let combined = launch_all(works);
    assert_eq!(
        combined.result().await,
        Err(PromiseError::Task("fast failure".to_string()))
    );
}

#[tokio::test]
async fn an_empty_batch_resolves_to_an_empty_vector() {
    let combined = all(Vec::<Promise<String, String>>::new());
    assert_eq!(combined.result().await, Ok(Vec::new()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn a_combined_handle_can_be_shared_like_any_other() {
    let combined = launch_all(vec![slow_ok(20, 1_u64), slow_ok(10, 2)]);

    let clone = combined.clone();
    let raced = tokio::spawn(async move { clone.result().await });

    assert_eq!(combined.result().await, Ok(vec![1, 2]));
    assert_eq!(raced.await.expect("awaiter task"), Ok(vec![1, 2]));
}

#[tokio::test]
async fn batches_nest_inside_a_further_aggregate() {
    let front = launch_all(vec![slow_ok(10, "b".to_string()), slow_ok(20, "c".to_string())]);
    let back = launch_all(vec![slow_ok(5, "d".to_string())]);

    let nested = all(vec![front, back]);
    assert_eq!(
        nested.result().await,
        Ok(vec![
            vec!["b".to_string(), "c".to_string()],
            vec!["d".to_string()],
        ])
    );
}
