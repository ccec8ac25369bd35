//! Read-through / write-through cache over a small resource file.
//!
//! The backing file is only read when its modification time moved past the
//! last cache update. A write that failed is remembered and retried on a
//! later `read_and_get()` as long as nobody replaced the file in between.
//! Nothing here returns errors: failures are logged and reported through
//! the optional diagnostics callback, and the cached value stays usable.

use std::time::SystemTime;
use tracing::{debug, warn};

/// Storage collaborator behind a `CachedResource`.
pub trait ResourceFile<R> {
    /// Parse the file. `prior` is the currently cached value. `None` means
    /// the file could not be read and the cache is kept as is.
    fn read(&self, prior: &R) -> Option<R>;

    /// Persist `value`, returning false on any failure.
    fn write(&self, value: &R) -> bool;

    /// Modification time, or `None` when the file is missing or unusable.
    fn last_modified(&self) -> Option<SystemTime>;

    /// Label used in log lines.
    fn name(&self) -> &str {
        "resource"
    }
}

/// Notable cache outcomes reported to the diagnostics callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEvent {
    ReadFailed,
    WriteFailed,
    WriteRetried { success: bool },
}

type Diagnostics = Box<dyn FnMut(&CacheEvent)>;

pub struct CachedResource<R, F: ResourceFile<R>> {
    file: F,
    cached: R,
    last_cache_update: Option<SystemTime>,
    last_failed_write: Option<SystemTime>,
    diagnostics: Option<Diagnostics>,
}

impl<R, F: ResourceFile<R>> CachedResource<R, F> {
    /// `initial` is served until the file is read for the first time.
    pub fn new(file: F, initial: R) -> Self {
        Self {
            file,
            cached: initial,
            last_cache_update: None,
            last_failed_write: None,
            diagnostics: None,
        }
    }

    pub fn with_diagnostics(mut self, callback: impl FnMut(&CacheEvent) + 'static) -> Self {
        self.diagnostics = Some(Box::new(callback));
        self
    }

    /// The cached value without touching the file.
    pub fn cached(&self) -> &R {
        &self.cached
    }

    pub fn file(&self) -> &F {
        &self.file
    }

    /// True while a failed write waits to be retried.
    pub fn has_pending_write(&self) -> bool {
        self.last_failed_write.is_some()
    }

    /// Current value, re-reading the file only if it changed since the last
    /// cache update.
    pub fn read_and_get(&mut self) -> &R {
        let Some(modified) = self.file.last_modified() else {
            if self.last_failed_write.is_some() {
                self.retry_failed_write();
            }
            return &self.cached;
        };

        if self.last_cache_update.is_some_and(|t| t >= modified) {
            if let Some(failed_at) = self.last_failed_write
                && modified < failed_at
            {
                self.retry_failed_write();
            }
            return &self.cached;
        }

        match self.file.read(&self.cached) {
            Some(value) => {
                debug!(resource = self.file.name(), "cache: adopted newer file contents");
                self.cached = value;
                self.last_cache_update = Some(modified);
                self.last_failed_write = None;
            }
            None => {
                warn!(resource = self.file.name(), "cache: reading file failed, serving cached value");
                self.emit(CacheEvent::ReadFailed);
            }
        }
        &self.cached
    }

    /// Replace the cached value and write it through. Returns whether the
    /// write succeeded; the new value is kept either way.
    pub fn set_and_write(&mut self, value: R) -> bool {
        self.cached = value;
        self.write_through()
    }

    /// Refresh from the file, mutate the value in place, then write it
    /// through.
    pub fn read_and_write(&mut self, f: impl FnOnce(&mut R)) -> bool {
        self.read_and_get();
        f(&mut self.cached);
        self.write_through()
    }

    fn write_through(&mut self) -> bool {
        if self.file.write(&self.cached) {
            self.mark_written();
            true
        } else {
            let now = SystemTime::now();
            self.last_cache_update = Some(now);
            self.last_failed_write = Some(now);
            warn!(resource = self.file.name(), "cache: write failed, will retry on next read");
            self.emit(CacheEvent::WriteFailed);
            false
        }
    }

    fn retry_failed_write(&mut self) {
        let success = self.file.write(&self.cached);
        if success {
            self.mark_written();
            debug!(resource = self.file.name(), "cache: pending write flushed");
        } else {
            self.last_failed_write = Some(SystemTime::now());
            debug!(resource = self.file.name(), "cache: pending write failed again");
        }
        self.emit(CacheEvent::WriteRetried { success });
    }

    fn mark_written(&mut self) {
        self.last_cache_update = Some(self.file.last_modified().unwrap_or_else(SystemTime::now));
        self.last_failed_write = None;
    }

    fn emit(&mut self, event: CacheEvent) {
        if let Some(cb) = self.diagnostics.as_mut() {
            cb(&event);
        }
    }
}
