// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use the_sluice::config::{load_and_validate_config, PipelineBuilder};
use the_sluice::transforms::builtin_text_transforms;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <config.yaml|config.toml> <input> [input ...]", args[0]);
        eprintln!("Example: {} configs/text-cleanup.yaml \"  hello world  \" \"  \"", args[0]);
        eprintln!("Set RUST_LOG (e.g. RUST_LOG=debug) to see pipeline events on stderr.");
        std::process::exit(1);
    }

    init_tracing();

    let config_file = &args[1];
    let inputs = &args[2..];

    if let Err(e) = run(config_file, inputs).await {
        eprintln!("❌ Failed to execute {}: {}", config_file, e);
        std::process::exit(1);
    }
}

async fn run(config_file: &str, inputs: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    let config = load_and_validate_config(config_file)?;
    let pipeline = PipelineBuilder::from_config(&config, &builtin_text_transforms())?;
    let submit_options = config.submit_options();

    println!("📋 Configuration: {}", config_file);
    println!("🔧 Pipeline: {}", pipeline.name());
    println!("🧱 Stages: {}", pipeline.stage_names().join(" → "));
    println!();

    let finished = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&finished);
    pipeline.set_on_finish(move |value: String| sink.lock().push(value));

    let failed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&failed);
    pipeline.set_on_fail(move |stage, value: String, err| {
        sink.lock().push(format!("{:?} failed in '{}': {}", value, stage, err));
    });

    pipeline.run()?;
    for input in inputs {
        if let Err(e) = pipeline.submit(input.clone(), submit_options.clone()).await {
            eprintln!("⚠️  Rejected {:?}: {}", input, e);
        }
    }
    pipeline.shutdown().await?;

    for value in finished.lock().iter() {
        println!("✅ {:?}", value);
    }
    for failure in failed.lock().iter() {
        println!("❌ {}", failure);
    }

    println!();
    println!("📊 Stats:");
    println!("{}", serde_json::to_string_pretty(&pipeline.stats())?);
    println!("⏱️  Completed in {:.2?}", start_time.elapsed());
    Ok(())
}
