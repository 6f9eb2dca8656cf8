//! Stress tests for concurrent level administration and reloads
//!
//! These tests verify:
//! - Level changes from many threads never lose updates
//! - Readers never observe a half-applied configuration swap
//! - Initialization runs once under concurrent callers
//! - Logger handles stay consistent across generations

use log_composer::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

fn init() -> InitializationContext {
    InitializationContext::new(MapEnvironment::new())
}

/// Test that concurrent set_log_level calls on distinct names all land
#[test]
fn test_concurrent_level_changes() {
    let system = Arc::new(
        LoggingSystem::builder()
            .resolver(MemoryResolver::new())
            .build(),
    );
    system.initialize(&init(), None, None).unwrap();

    let threads = 8;
    let per_thread = 50;
    let barrier = Arc::new(Barrier::new(threads + 1));
    let mut handles = vec![];

    for t in 0..threads {
        let system = Arc::clone(&system);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..per_thread {
                let name = format!("svc{}.component{}", t, i);
                system.set_log_level(&name, Some(LogLevel::Debug)).unwrap();
                assert_eq!(system.context().effective_level(&name), LogLevel::Debug);
            }
        }));
    }

    // listing while writers run must always see a well-formed table
    let reader = {
        let system = Arc::clone(&system);
        thread::spawn(move || {
            for _ in 0..200 {
                let rows = system.logger_configurations();
                assert_eq!(rows[0].name(), ROOT_LOGGER_NAME);
                assert_eq!(rows[0].effective_level(), LogLevel::Info);
            }
        })
    };

    barrier.wait();
    for handle in handles {
        handle.join().expect("writer thread panicked");
    }
    reader.join().expect("reader thread panicked");

    let configured = system
        .logger_configurations()
        .iter()
        .filter(|row| row.configured_level() == Some(LogLevel::Debug))
        .count();
    assert_eq!(configured, threads * per_thread);
}

/// Test that readers see either the old or the new configuration, never a mix
#[test]
fn test_swap_is_atomic_for_readers() {
    let old = Configuration::new("old")
        .with_root_level(LogLevel::Warn)
        .with_level("a", LogLevel::Warn)
        .with_level("a.b", LogLevel::Warn);
    let new = Configuration::new("new")
        .with_root_level(LogLevel::Debug)
        .with_level("a", LogLevel::Debug)
        .with_level("a.b", LogLevel::Debug);
    let context = LoggingContext::new(old.clone());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let context = context.clone();
            thread::spawn(move || {
                for _ in 0..2_000 {
                    let snapshot = context.active_configuration();
                    let levels = [
                        snapshot.effective_level(""),
                        snapshot.effective_level("a"),
                        snapshot.effective_level("a.b.c"),
                    ];
                    assert!(
                        levels.iter().all(|level| *level == levels[0]),
                        "mixed snapshot: {:?}",
                        levels
                    );
                }
            })
        })
        .collect();

    for i in 0..500 {
        let next = if i % 2 == 0 { new.clone() } else { old.clone() };
        context.activate(next).unwrap();
    }

    for reader in readers {
        reader.join().expect("reader thread panicked");
    }
}

/// Test that a reload never exposes a configuration missing the log file properties
#[test]
fn test_reconfigure_keeps_log_file_visible() {
    let resolver = Arc::new(MemoryResolver::new());
    resolver.insert("base.json", Configuration::new("base").with_root_level(LogLevel::Info));
    let shared: Arc<dyn ConfigurationResolver> = resolver;
    let system = Arc::new(LoggingSystem::builder().shared_resolver(shared).build());
    let log_file = LogFile::new(Some("service.log"), None).unwrap();
    system
        .initialize(&init(), Some("base.json"), Some(&log_file))
        .unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let missing = Arc::new(AtomicUsize::new(0));
    let reader = {
        let system = Arc::clone(&system);
        let done = Arc::clone(&done);
        let missing = Arc::clone(&missing);
        thread::spawn(move || {
            while !done.load(Ordering::Acquire) {
                let active = system.context().active_configuration();
                if active.property("LOG_FILE") != Some("service.log") {
                    missing.fetch_add(1, Ordering::Relaxed);
                }
            }
        })
    };

    for _ in 0..2_000 {
        system.reinitialize(&init()).unwrap();
    }
    done.store(true, Ordering::Release);
    reader.join().expect("reader thread panicked");

    assert_eq!(missing.load(Ordering::Relaxed), 0);
}

/// Test that concurrent initialize calls load the configuration exactly once
#[test]
fn test_concurrent_initialize_runs_once() {
    let resolver = Arc::new(MemoryResolver::new());
    resolver.insert("base.json", Configuration::new("base").with_root_level(LogLevel::Info));
    let shared: Arc<dyn ConfigurationResolver> = resolver;
    let system = Arc::new(LoggingSystem::builder().shared_resolver(shared).build());
    let events = system.context().subscribe();

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let system = Arc::clone(&system);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                system.initialize(&init(), Some("base.json"), None).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("initializer panicked");
    }

    let reconfigured = events
        .try_iter()
        .filter(|event| matches!(event, ContextEvent::Reconfigured { .. }))
        .count();
    assert_eq!(reconfigured, 1);
    assert!(system.context().is_initialized());
}

/// Test that handles recompute after every change made by another thread
#[test]
fn test_handles_follow_level_changes() {
    let context = LoggingContext::new(Configuration::new("base").with_root_level(LogLevel::Info));
    let handle = context.logger("worker.job");
    let observed_debug = Arc::new(AtomicUsize::new(0));

    let levels = [LogLevel::Debug, LogLevel::Error];
    for round in 0..100 {
        let level = levels[round % 2];
        let writer = {
            let context = context.clone();
            thread::spawn(move || {
                context
                    .configure(|config| config.loggers_mut().set_level("worker", Some(level)))
                    .unwrap();
            })
        };
        writer.join().expect("writer panicked");

        assert_eq!(handle.effective_level(), level);
        if handle.is_enabled(LogLevel::Debug) {
            observed_debug.fetch_add(1, Ordering::Relaxed);
        }
    }

    assert_eq!(observed_debug.load(Ordering::Relaxed), 50);
}
