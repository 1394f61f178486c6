//! Stress tests for JsonDB.
//!
//! These verify behavior under repeated and concurrent access. Every
//! operation rewrites the whole collection file, so counts are kept in
//! the hundreds rather than the millions.

use jsondb_core::{Collection, Database, Query};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of operations to perform.
    pub operations: usize,
    /// Number of concurrent threads or tasks.
    pub threads: usize,
    /// Length of the payload string in each record.
    pub payload_size: usize,
    /// Number of records to prepopulate for read tests.
    pub record_count: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 500,
            threads: 4,
            payload_size: 64,
            record_count: 100,
        }
    }
}

fn payload(config: &StressConfig) -> Value {
    json!({ "payload": "x".repeat(config.payload_size) })
}

fn tally(results: impl IntoIterator<Item = bool>) -> (usize, usize) {
    results
        .into_iter()
        .fold((0, 0), |(ok, err), success| if success { (ok + 1, err) } else { (ok, err + 1) })
}

/// Checks that the ids in `collection` are exactly `1..=n`.
pub fn assert_dense_ids(collection: &Collection, n: usize) {
    let ids: HashSet<u64> = collection
        .keys()
        .expect("Failed to read keys")
        .iter()
        .filter_map(|k| k.as_id())
        .collect();
    let expected: HashSet<u64> = (1..=n as u64).collect();
    assert_eq!(ids, expected, "ids must be unique and dense");
}

/// Run a sequential insert stress test.
pub fn stress_sequential_inserts(db: &Database, config: &StressConfig) -> StressTestResult {
    let collection = db.collection("stress_inserts").expect("Failed to open collection");
    let record = payload(config);

    let start = Instant::now();
    let (successful, failed) =
        tally((0..config.operations).map(|_| collection.insert(record.clone()).is_ok()));

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run a sequential read stress test.
pub fn stress_sequential_reads(db: &Database, config: &StressConfig) -> StressTestResult {
    let collection = db.collection("stress_reads").expect("Failed to open collection");
    let records = vec![payload(config); config.record_count];
    collection.bulk_insert(records).expect("Failed to populate");

    let start = Instant::now();
    let (successful, failed) = tally((0..config.operations).map(|i| {
        let id = (i % config.record_count) as u64 + 1;
        matches!(collection.find_by_id(id), Ok(Some(_)))
    }));

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run a mixed insert/update/read/remove stress test. Every fourth
/// operation removes the record inserted three operations earlier.
pub fn stress_mixed_operations(db: &Database, config: &StressConfig) -> StressTestResult {
    let collection = db.collection("stress_mixed").expect("Failed to open collection");
    let record = payload(config);
    let mut last_id = 0;

    let start = Instant::now();
    let (successful, failed) = tally((0..config.operations).map(|i| match i % 4 {
        0 => match collection.insert(record.clone()) {
            Ok(stored) => {
                last_id = stored["id"].as_u64().unwrap_or(0);
                true
            }
            Err(_) => false,
        },
        1 => matches!(collection.update(last_id, json!({ "touched": i })), Ok(Some(_))),
        2 => matches!(collection.find_by_id(last_id), Ok(Some(_))),
        _ => matches!(collection.remove(last_id), Ok(true)),
    }));

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run concurrent inserts from several threads on one collection.
pub fn stress_concurrent_inserts(db: &Database, config: &StressConfig) -> StressTestResult {
    let collection = db
        .collection("stress_concurrent")
        .expect("Failed to open collection");
    let record = payload(config);
    let successful = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let ops_per_thread = config.operations / config.threads;

    let start = Instant::now();

    thread::scope(|scope| {
        for _ in 0..config.threads {
            scope.spawn(|| {
                for _ in 0..ops_per_thread {
                    let counter = match collection.insert(record.clone()) {
                        Ok(_) => &successful,
                        Err(_) => &failed,
                    };
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Run readers concurrently with a single writer; readers must never see
/// a torn file.
pub fn stress_reads_during_writes(db: &Database, config: &StressConfig) -> StressTestResult {
    let collection = db
        .collection("stress_read_write")
        .expect("Failed to open collection");
    let record = payload(config);
    let successful = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let reads_per_thread = config.operations / config.threads;

    let start = Instant::now();

    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..config.record_count {
                let counter = match collection.insert(record.clone()) {
                    Ok(_) => &successful,
                    Err(_) => &failed,
                };
                counter.fetch_add(1, Ordering::Relaxed);
            }
        });
        for _ in 0..config.threads {
            scope.spawn(|| {
                for _ in 0..reads_per_thread {
                    let counter = match collection.count(Query::all()) {
                        Ok(_) => &successful,
                        Err(_) => &failed,
                    };
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Run concurrent inserts from several tokio tasks on one collection.
pub async fn stress_async_inserts(db: &Database, config: &StressConfig) -> StressTestResult {
    let collection = db
        .async_collection("stress_async")
        .expect("Failed to open collection");
    let record = payload(config);
    let ops_per_task = config.operations / config.threads;

    let start = Instant::now();

    let tasks: Vec<_> = (0..config.threads)
        .map(|_| {
            let collection = collection.clone();
            let record = record.clone();
            tokio::spawn(async move {
                let mut results = Vec::with_capacity(ops_per_task);
                for _ in 0..ops_per_task {
                    results.push(collection.insert(record.clone()).await.is_ok());
                }
                results
            })
        })
        .collect();

    let mut results = Vec::new();
    for task in tasks {
        results.extend(task.await.expect("Task panicked"));
    }
    let (successful, failed) = tally(results);

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run a batched insert stress test.
pub fn stress_bulk_inserts(db: &Database, config: &StressConfig) -> StressTestResult {
    let collection = db.collection("stress_bulk").expect("Failed to open collection");
    let batch_size = 50;
    let record = payload(config);

    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for _ in 0..(config.operations / batch_size) {
        match collection.bulk_insert(vec![record.clone(); batch_size]) {
            Ok(_) => successful += batch_size,
            Err(_) => failed += batch_size,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}
