use dsgrid_core::{ColumnMetadata, DataProvider, DataType, RawColumn};
use futures::future::join_all;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use super::{ColumnSet, MetadataMap, derive_columns};
use crate::config::GridConfig;
use crate::logging::TimingGuard;

/// Snapshot taken when a column refresh starts
///
/// Carries the generation it was issued under; completing a derivation whose
/// generation is no longer current discards the result.
#[derive(Debug, Clone)]
pub struct PendingDerivation {
    generation: u64,
    raw: Vec<RawColumn>,
}

impl PendingDerivation {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The derivation was applied; `changed` is false when it deep-equals the previous set
    Applied { changed: bool },
    /// A later refresh started before this one finished
    Stale,
    /// The grid was unmounted while metadata was in flight
    Unmounted,
}

#[derive(Default)]
struct ColumnState {
    raw: Vec<RawColumn>,
    metadata: MetadataMap,
    columns: ColumnSet,
}

/// Keeps the current column derivation and applies asynchronous refreshes
pub struct ColumnController {
    generation: AtomicU64,
    mounted: Arc<AtomicBool>,
    state: RwLock<ColumnState>,
}

impl ColumnController {
    pub fn new(mounted: Arc<AtomicBool>) -> Self {
        Self {
            generation: AtomicU64::new(0),
            mounted,
            state: RwLock::new(ColumnState::default()),
        }
    }

    pub fn columns(&self) -> ColumnSet {
        self.state.read().columns.clone()
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Re-derive from the last fetched raw columns and metadata
    ///
    /// Used when only the grid configuration changed. Returns whether the set changed.
    pub fn derive(&self, config: &GridConfig) -> bool {
        let mut state = self.state.write();
        let columns = derive_columns(&state.raw, &state.metadata, config);
        replace_if_changed(&mut state.columns, columns)
    }

    /// Start a refresh: bump the generation and snapshot the raw columns
    pub fn begin_refresh(&self, provider: &dyn DataProvider) -> PendingDerivation {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let raw = provider.columns();
        tracing::debug!(generation, columns = raw.len(), "Column refresh started");
        PendingDerivation { generation, raw }
    }

    /// Fetch metadata for the snapshot and apply the derivation if still current
    #[tracing::instrument(skip(self, pending, provider, config), fields(generation = pending.generation))]
    pub async fn complete_refresh(
        &self,
        pending: PendingDerivation,
        provider: &dyn DataProvider,
        config: &GridConfig,
    ) -> RefreshOutcome {
        let _timing = TimingGuard::new("column_refresh");
        let (metadata, errors) = fetch_metadata(&pending.raw, provider).await;

        if !self.mounted.load(Ordering::SeqCst) {
            tracing::debug!("Grid unmounted, discarding column metadata");
            return RefreshOutcome::Unmounted;
        }
        let current = self.current_generation();
        if pending.generation != current {
            tracing::debug!(current, "Superseded column refresh discarded");
            return RefreshOutcome::Stale;
        }

        if errors.is_empty() {
            provider.set_error(None);
        } else {
            tracing::warn!(failed = errors.len(), "Column metadata unavailable, using conservative flags");
            provider.set_error(Some(errors.join("\n")));
        }

        let columns = derive_columns(&pending.raw, &metadata, config);
        let mut state = self.state.write();
        state.raw = pending.raw;
        state.metadata = metadata;
        let changed = replace_if_changed(&mut state.columns, columns);
        tracing::debug!(changed, "Column refresh applied");
        RefreshOutcome::Applied { changed }
    }

    pub async fn refresh(&self, provider: &dyn DataProvider, config: &GridConfig) -> RefreshOutcome {
        let pending = self.begin_refresh(provider);
        self.complete_refresh(pending, provider, config).await
    }
}

fn replace_if_changed(current: &mut ColumnSet, next: ColumnSet) -> bool {
    if *current == next {
        return false;
    }
    *current = next;
    true
}

/// Metadata per column plus the messages of failed fetches
///
/// Action and virtual columns have no platform attribute and are skipped.
async fn fetch_metadata(
    raw: &[RawColumn],
    provider: &dyn DataProvider,
) -> (MetadataMap, Vec<String>) {
    let names: Vec<&str> = raw
        .iter()
        .filter(|c| c.data_type != DataType::Action && !c.is_virtual())
        .map(|c| c.name.as_str())
        .collect();

    let results = join_all(names.iter().map(|name| provider.column_metadata(name))).await;

    let mut metadata = MetadataMap::new();
    let mut errors = Vec::new();
    for (name, result) in names.into_iter().zip(results) {
        match result {
            Ok(meta) => {
                metadata.insert(name.to_string(), meta);
            }
            Err(e) => {
                tracing::warn!(column = %name, error = %e, "Failed to fetch column metadata");
                errors.push(format!("{}: {}", name, e));
                metadata.insert(name.to_string(), ColumnMetadata::default());
            }
        }
    }
    (metadata, errors)
}
