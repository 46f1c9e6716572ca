//! Compare two ways of doing the same thing, procedurally and with
//! completion handles.
//!
//! Run with: cargo run --example compare --release
//! Set `RUST_LOG=provisnr=debug` to see per-run logging.

use provisnr::{CompareOptions, Mode, Provisnr, TestOptions, Work};
use std::hint::black_box;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let session = Provisnr::new();

    let single = session
        .test_function(
            TestOptions::new()
                .mode(Mode::Procedural)
                .timeout_ms(200)
                .generator(|| (0..10_000u64).collect::<Vec<_>>())
                .callback(Work::procedural(|v: &Vec<u64>| {
                    black_box(v.iter().sum::<u64>());
                })),
        )?
        .unwrap_or_default();
    println!("sum over 10k elements: {single} iterations in 200ms");

    let verdict = session
        .compare_performance(
            CompareOptions::new()
                .mode(Mode::Procedural)
                .timeout_ms(300)
                .generator(|| "alpha,beta,gamma,delta".repeat(32))
                .callback(
                    "split",
                    Work::procedural(|s: &String| {
                        black_box(s.split(',').count());
                    }),
                )
                .callback(
                    "bytes",
                    Work::procedural(|s: &String| {
                        black_box(s.bytes().filter(|b| *b == b',').count() + 1);
                    }),
                ),
        )?
        .unwrap_or_else(|| unreachable!("procedural comparisons return their verdict"));
    println!("{}", serde_json::to_string_pretty(&verdict)?);

    session.compare_performance(
        CompareOptions::<()>::new()
            .mode(Mode::Async)
            .timeout_ms(300)
            .callback(
                "inline",
                Work::callback(|done, _| {
                    black_box(());
                    done.complete();
                }),
            )
            .callback(
                "thread",
                Work::callback(|done, _| {
                    std::thread::spawn(move || {
                        std::thread::sleep(Duration::from_micros(50));
                        done.complete();
                    });
                }),
            )
            .complete(|verdict| {
                println!("async winner: {:?}", verdict.winner());
            }),
    )?;

    Ok(())
}
