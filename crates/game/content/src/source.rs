//! Generic hot-reloadable snapshot machinery shared by all loaders.

use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use crate::error::Result;
use crate::store::{DocumentSource, Marker};

/// The validated, typed view of a document plus the marker it was built from.
pub struct LoadedSnapshot<T> {
    pub data: Arc<T>,
    pub marker: Marker,
}

impl<T> Clone for LoadedSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            marker: self.marker,
        }
    }
}

type BuildFn<T> = Box<dyn Fn(&Value) -> Result<T> + Send + Sync>;

/// A document source paired with its current snapshot and build function.
///
/// The build function is the whole pipeline from untyped document to typed
/// catalog: schema validation, decoding, index derivation, and any
/// cross-document checks. It runs once at construction (where failure is
/// fatal) and once per accepted reload.
///
/// The snapshot is replaced, never mutated: readers either see the old value
/// in its entirety or the new one, and handed-out `Arc`s stay valid across
/// swaps.
pub struct ContentSource<T> {
    domain: &'static str,
    source: DocumentSource,
    build: BuildFn<T>,
    snapshot: RwLock<LoadedSnapshot<T>>,
}

impl<T> ContentSource<T> {
    /// Reads, validates, and snapshots the source. Fail-fast: a missing
    /// source, a parse error, or a validation failure is returned as-is and
    /// the host should treat it as fatal at startup.
    pub fn new(
        domain: &'static str,
        source: DocumentSource,
        build: impl Fn(&Value) -> Result<T> + Send + Sync + 'static,
    ) -> Result<Self> {
        let (document, marker) = source.read()?;
        let data = build(&document)?;
        Ok(Self {
            domain,
            source,
            build: Box::new(build),
            snapshot: RwLock::new(LoadedSnapshot {
                data: Arc::new(data),
                marker,
            }),
        })
    }

    pub fn domain(&self) -> &'static str {
        self.domain
    }

    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    /// Current snapshot after a reload check.
    pub fn snapshot(&self) -> Arc<T> {
        self.reload_if_changed();
        self.peek()
    }

    /// Current snapshot without touching the backing store.
    pub fn peek(&self) -> Arc<T> {
        let guard = self
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard.data)
    }

    /// Compares the live modification marker against the snapshot's and, on a
    /// change, runs the full read → validate → swap sequence.
    ///
    /// Returns `true` only when a new snapshot was published. Unchanged
    /// markers cost one metadata check and nothing else. Failures of any kind
    /// are logged and leave the previous snapshot in service — availability
    /// of a slightly stale ruleset beats an outage mid-game.
    pub fn reload_if_changed(&self) -> bool {
        let current = {
            let guard = self
                .snapshot
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            guard.marker
        };

        let live = match self.source.marker() {
            Ok(marker) => marker,
            Err(err) => {
                tracing::warn!(
                    "Marker check failed for {} ({}): {}",
                    self.domain,
                    self.source.path().display(),
                    err
                );
                return false;
            }
        };
        if live == current {
            return false;
        }

        let rebuilt = self
            .source
            .read()
            .and_then(|(document, marker)| (self.build)(&document).map(|data| (data, marker)));

        match rebuilt {
            Ok((data, marker)) => {
                let mut guard = self
                    .snapshot
                    .write()
                    .unwrap_or_else(PoisonError::into_inner);
                *guard = LoadedSnapshot {
                    data: Arc::new(data),
                    marker,
                };
                tracing::debug!(
                    "Reloaded {} from {}",
                    self.domain,
                    self.source.path().display()
                );
                true
            }
            Err(err) => {
                tracing::warn!(
                    "Reload of {} failed, keeping previous snapshot: {}",
                    self.domain,
                    err
                );
                false
            }
        }
    }
}
