//! Process logging context
//!
//! This module provides:
//! - `LoggingContext`: the shared holder of the active configuration
//! - `LoggerHandle`: a named logger whose effective level follows the context
//! - `ContextEvent`: notifications published on reconfiguration
//!
//! The context is an explicit handle rather than a global so that tests and
//! embedders can run isolated instances side by side.

use super::configuration::Configuration;
use super::error::{ComposerError, Result};
use super::hierarchy::LoggerTable;
use super::log_level::LogLevel;
use super::logger_name::normalize;
use chrono::{DateTime, Utc};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Notification sent to [`LoggingContext::subscribe`] receivers
#[derive(Debug, Clone, PartialEq)]
pub enum ContextEvent {
    /// A new configuration became active
    Reconfigured {
        generation: u64,
        sources: Vec<String>,
        at: DateTime<Utc>,
    },
    /// Levels changed inside the active configuration
    LevelsUpdated { generation: u64, at: DateTime<Utc> },
    /// The context was stopped
    Stopped { at: DateTime<Utc> },
}

struct ContextInner {
    active: RwLock<Arc<Configuration>>,
    initialized: Mutex<bool>,
    suppressed: AtomicBool,
    stopped: AtomicBool,
    generation: AtomicU64,
    live: RwLock<BTreeSet<String>>,
    subscribers: Mutex<Vec<Sender<ContextEvent>>>,
}

impl ContextInner {
    /// Invalidate cached effective levels and return the new generation
    fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn publish(&self, event: ContextEvent) {
        // receivers that went away are pruned on the way
        self.subscribers
            .lock()
            .retain(|sender| sender.send(event.clone()).is_ok());
    }
}

/// Shared handle to the process-wide logging state.
///
/// Cloning is cheap; every clone observes the same configuration.
///
/// # Example
///
/// ```
/// use log_composer::prelude::*;
///
/// let context = LoggingContext::new(Configuration::new("base").with_root_level(LogLevel::Warn));
/// let logger = context.logger("com.app.Service");
/// assert!(!logger.is_enabled(LogLevel::Info));
///
/// context.configure(|config| config.loggers_mut().set_level("com.app", Some(LogLevel::Debug))).unwrap();
/// assert!(logger.is_enabled(LogLevel::Info));
/// ```
#[derive(Clone)]
pub struct LoggingContext {
    inner: Arc<ContextInner>,
}

impl LoggingContext {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                active: RwLock::new(Arc::new(configuration)),
                initialized: Mutex::new(false),
                suppressed: AtomicBool::new(false),
                stopped: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                live: RwLock::new(BTreeSet::new()),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Snapshot of the active configuration
    pub fn active_configuration(&self) -> Arc<Configuration> {
        Arc::clone(&self.inner.active.read())
    }

    /// Atomically replace the active configuration
    pub fn activate(&self, configuration: Configuration) -> Result<()> {
        if self.is_stopped() {
            return Err(ComposerError::ContextStopped);
        }
        let sources = configuration.sources().to_vec();
        *self.inner.active.write() = Arc::new(configuration);

        let generation = self.inner.bump_generation();
        self.inner.publish(ContextEvent::Reconfigured {
            generation,
            sources,
            at: Utc::now(),
        });
        Ok(())
    }

    /// Mutate the active configuration in place, then signal a recompute.
    ///
    /// Readers holding an earlier snapshot keep seeing it unchanged; the write
    /// lock makes the mutation invisible until it is complete. A stopped
    /// context rejects the mutation with `ContextStopped`.
    pub fn configure<R>(&self, mutate: impl FnOnce(&mut Configuration) -> R) -> Result<R> {
        let result = {
            let mut active = self.inner.active.write();
            if self.is_stopped() {
                return Err(ComposerError::ContextStopped);
            }
            mutate(Arc::make_mut(&mut active))
        };
        self.update_loggers();
        Ok(result)
    }

    /// Tell every logger handle to recompute its effective level
    pub fn update_loggers(&self) {
        let generation = self.inner.bump_generation();
        self.inner.publish(ContextEvent::LevelsUpdated {
            generation,
            at: Utc::now(),
        });
    }

    /// Counter bumped on every activation and level update
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    /// Obtain a logger, registering its name as live
    pub fn logger(&self, name: &str) -> LoggerHandle {
        let name = normalize(name).to_string();
        self.inner.live.write().insert(name.clone());
        LoggerHandle {
            name,
            inner: Arc::clone(&self.inner),
            cache: Mutex::new(None),
        }
    }

    /// Names of every logger handed out so far
    pub fn live_logger_names(&self) -> Vec<String> {
        self.inner.live.read().iter().cloned().collect()
    }

    pub fn subscribe(&self) -> Receiver<ContextEvent> {
        let (sender, receiver) = unbounded();
        self.inner.subscribers.lock().push(sender);
        receiver
    }

    pub fn is_initialized(&self) -> bool {
        *self.inner.initialized.lock()
    }

    /// Run `init` unless the context is already initialized.
    ///
    /// The marker is checked and set under one lock held for the whole call, so
    /// concurrent callers run `init` at most once. The marker is only set when
    /// `init` succeeds. Returns whether `init` ran.
    pub fn initialize_once(&self, init: impl FnOnce() -> Result<()>) -> Result<bool> {
        let mut initialized = self.inner.initialized.lock();
        if *initialized {
            return Ok(false);
        }
        init()?;
        *initialized = true;
        Ok(true)
    }

    pub fn mark_uninitialized(&self) {
        *self.inner.initialized.lock() = false;
    }

    /// While suppressed every handle reports all levels disabled
    pub fn set_output_suppressed(&self, suppressed: bool) {
        self.inner.suppressed.store(suppressed, Ordering::Release);
    }

    pub fn is_output_suppressed(&self) -> bool {
        self.inner.suppressed.load(Ordering::Acquire)
    }

    /// Stop the context: loggers go quiet and subscribers are closed
    pub fn stop(&self) {
        if self.inner.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.publish(ContextEvent::Stopped { at: Utc::now() });
        self.inner.subscribers.lock().clear();
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::Acquire)
    }

    /// Resolve `name` against a consistent snapshot of the logger table
    pub fn effective_level(&self, name: &str) -> LogLevel {
        self.with_loggers(|loggers| loggers.resolve_effective_level(name))
    }

    fn with_loggers<R>(&self, read: impl FnOnce(&LoggerTable) -> R) -> R {
        let active = self.inner.active.read();
        read(active.loggers())
    }
}

impl Default for LoggingContext {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}

/// Named logger bound to a [`LoggingContext`].
///
/// The effective level is cached per context generation and recomputed after
/// any activation or level change.
pub struct LoggerHandle {
    name: String,
    inner: Arc<ContextInner>,
    cache: Mutex<Option<(u64, LogLevel)>>,
}

impl LoggerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effective_level(&self) -> LogLevel {
        // read the generation first: a concurrent bump makes the next call recompute
        let generation = self.inner.generation.load(Ordering::Acquire);
        let mut cache = self.cache.lock();
        if let Some((cached_generation, level)) = *cache {
            if cached_generation == generation {
                return level;
            }
        }
        let level = self.inner.active.read().effective_level(&self.name);
        *cache = Some((generation, level));
        level
    }

    /// Whether a record at `level` would be emitted by this logger
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        if self.inner.suppressed.load(Ordering::Acquire) || self.inner.stopped.load(Ordering::Acquire) {
            return false;
        }
        self.effective_level().permits(level)
    }
}
