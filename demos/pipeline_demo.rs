use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use the_sluice::transforms::{ChangeTextCase, ReverseText};
use the_sluice::{from_fn, ControlSignal, Pipeline, StageOptions, SubmitOptions};

/// Demo showing every control signal on a small text pipeline:
/// validate -> flaky lookup (retries) -> uppercase -> reverse
async fn run_pipeline_demo() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Sluice Pipeline Demo ===\n");

    let pipeline = Pipeline::<String>::new("demo");

    // Blank input is dropped, "shout:" input jumps straight to uppercase,
    // "bad:" input fails.
    pipeline.add_stage(
        "validate",
        from_fn(|s: String| {
            if s.trim().is_empty() {
                (s, ControlSignal::Abort)
            } else if let Some(rest) = s.strip_prefix("shout:") {
                (rest.to_string(), ControlSignal::jump_to("uppercase"))
            } else if s.starts_with("bad:") {
                (s, ControlSignal::fail(anyhow!("input marked bad")))
            } else {
                (s, ControlSignal::Continue)
            }
        }),
        StageOptions::default(),
    )?;

    // Fails every other call so each packet retries once.
    let calls = Arc::new(AtomicU32::new(0));
    pipeline.add_stage(
        "lookup",
        move |s: String| {
            let calls = Arc::clone(&calls);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                    (s, ControlSignal::retry(anyhow!("lookup service busy")))
                } else {
                    (format!("{} (looked up)", s), ControlSignal::Continue)
                }
            }
        },
        StageOptions::default().with_retry_backoff(Duration::from_millis(5)),
    )?;

    pipeline.add_stage(
        "uppercase",
        ChangeTextCase::upper(),
        StageOptions::default().with_concurrency(2),
    )?;
    pipeline.add_stage("reverse", ReverseText, StageOptions::default())?;

    pipeline.set_on_finish(|s| println!("✅ finished: '{}'", s));
    pipeline.set_on_fail(|stage, s, err| println!("❌ '{}' failed in {}: {}", s, stage, err));

    pipeline.run()?;
    for input in ["hello", "   ", "shout:skip the lookup", "bad:input", "world"] {
        println!("→ submitting '{}'", input);
        pipeline.send(input.to_string()).await?;
    }
    pipeline
        .submit(
            "late arrival".to_string(),
            SubmitOptions::new()
                .starting_at("reverse")
                .with_timeout(Duration::from_millis(100)),
        )
        .await?;
    pipeline.shutdown().await?;

    println!("\n📊 {:?}", pipeline.stats());
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run_pipeline_demo().await {
        eprintln!("Demo failed: {}", e);
        std::process::exit(1);
    }
}
