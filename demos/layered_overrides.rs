//! Layered configuration example
//!
//! Demonstrates a base configuration file with overrides bound from the
//! environment, a missing override being skipped, and a later reload.
//!
//! Run with: cargo run --example layered_overrides

use log_composer::prelude::*;
use std::fs;
use tempfile::TempDir;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== Log Composer - Layered Overrides Example ===\n");

    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("logging.json"),
        r#"{ "name": "service", "loggers": { "root": { "level": "warn" }, "com.shop": { "level": "info" } } }"#,
    )?;
    fs::write(
        dir.path().join("debug-payments.json"),
        r#"{ "loggers": { "com.shop.payments": { "level": "debug" } } }"#,
    )?;
    fs::write(
        dir.path().join("quiet-http.json"),
        r#"{ "loggers": { "com.shop.http": { "level": "error" } } }"#,
    )?;

    let system = LoggingSystem::builder()
        .resolver(FileResolver::with_base_dir(dir.path()))
        .build();

    let env = MapEnvironment::new()
        .with("logging.config.override[0]", "debug-payments.json")
        .with("logging.config.override[1]", "missing.json");
    let log_file = LogFile::new(None, Some(&dir.path().display().to_string()));
    system.initialize(&InitializationContext::new(env), None, log_file.as_ref())?;

    let active = system.context().active_configuration();
    println!("1. Active sources: {:?}", active.sources());
    println!("   LOG_FILE = {:?}", active.property("LOG_FILE"));
    for name in ["com.shop.payments.Gateway", "com.shop.http.Server", "org.other"] {
        println!("   {:<28} {}", name, system.context().effective_level(name));
    }

    println!("\n2. Layering another override over the running configuration:");
    let outcome = system.reinitialize(&InitializationContext::new(
        MapEnvironment::new().with("logging.config.override", "quiet-http.json"),
    ))?;
    println!("   applied: {:?}", outcome.applied);
    println!("   com.shop.http.Server -> {}", system.context().effective_level("com.shop.http.Server"));

    println!("\n3. Active configuration as JSON:");
    println!("{}", serde_json::to_string_pretty(&*system.context().active_configuration())?);

    (system.shutdown_handler())();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
