//! Basic logging system usage example
//!
//! Demonstrates initialization from an embedded configuration, runtime level
//! changes and the logger listing.
//!
//! Run with: cargo run --example basic_usage

use log_composer::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Log Composer - Basic Usage Example ===\n");

    let resolver = MemoryResolver::new();
    resolver.insert(
        "logging.json",
        Configuration::from_json_str(
            "logging.json",
            r#"{
                "name": "demo",
                "appenders": { "console": { "kind": "console", "pattern": "%d %p %c - %m%n" } },
                "loggers": {
                    "root": { "level": "info", "appenders": ["console"] },
                    "com.demo.db": { "level": "warn", "additive": false }
                }
            }"#,
        )?,
    );

    let system = LoggingSystem::builder().resolver(resolver).build();
    system.before_initialize();
    system.initialize(&InitializationContext::new(MapEnvironment::new()), None, None)?;

    let service = system.logger("com.demo.Service");
    let pool = system.logger("com.demo.db.Pool");

    println!("1. Levels from logging.json:");
    println!("   {} -> {}", service.name(), service.effective_level());
    println!("   {} -> {}", pool.name(), pool.effective_level());

    println!("\n2. Raising com.demo to DEBUG at runtime:");
    system.set_log_level_str("com.demo", Some("debug"))?;
    println!("   {} debug enabled: {}", service.name(), service.is_enabled(LogLevel::Debug));
    println!("   {} debug enabled: {}", pool.name(), pool.is_enabled(LogLevel::Debug));

    println!("\n3. Known loggers:");
    for row in system.logger_configurations() {
        let configured = row
            .configured_level()
            .map(|level| level.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("   {:<20} configured={:<6} effective={}", row.name(), configured, row.effective_level());
    }

    println!("\n4. Clearing the runtime level:");
    system.set_log_level("com.demo", None)?;
    println!("   {} -> {}", service.name(), service.effective_level());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
