//! Concurrent load against the user proxy.

use std::time::{Duration, Instant};

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    // 1. Setup mock upstream with a slow, ten-user collection
    let collection = serde_json::json!({
        "data": (1..=10)
            .map(|i| serde_json::json!({ "id": i, "email": format!("user{}@example.com", i) }))
            .collect::<Vec<_>>()
    })
    .to_string();
    let upstream = common::start_programmable_upstream(move |_| {
        let collection = collection.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            (200, collection)
        }
    })
    .await;

    // 2. Start proxy
    let proxy = common::start_proxy_for(&upstream).await;

    // 3. Run load
    let concurrency = 20;
    let requests_per_task = 10;
    let total_requests = concurrency * requests_per_task;

    let client = common::client();
    let start = Instant::now();
    let mut handles = Vec::new();

    for task in 0..concurrency {
        let client = client.clone();
        let base = proxy.url("/users");
        handles.push(tokio::spawn(async move {
            let mut ok = 0;
            for n in 0..requests_per_task {
                // ids 1..=10 exist, 11 and 12 do not
                let id = (task + n) % 12 + 1;
                let res = client.get(format!("{}/{}", base, id)).send().await.unwrap();
                let expected = if id <= 10 { StatusCode::OK } else { StatusCode::NOT_FOUND };
                assert_eq!(res.status(), expected, "id {id}");

                if id <= 10 {
                    let user: serde_json::Value = res.json().await.unwrap();
                    assert_eq!(user["id"], id);
                    assert_eq!(user["email"], format!("user{}@example.com", id));
                }
                ok += 1;
            }
            ok
        }));
    }

    let mut completed = 0;
    for handle in handles {
        completed += handle.await.unwrap();
    }
    let duration = start.elapsed();

    println!(
        "{} requests in {:?} ({:.0} req/s)",
        total_requests,
        duration,
        total_requests as f64 / duration.as_secs_f64()
    );

    assert_eq!(completed, total_requests);
    assert_eq!(upstream.hits(), total_requests, "exactly one upstream call per request");
    // Serial execution would take at least total_requests * 20ms.
    assert!(duration < Duration::from_millis(20 * total_requests as u64));
}
