use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use super::sequencer::sequence;
use crate::affinity::{AffinityCache, AffinityStore};
use crate::collect::{
    AccessibilityPermission, AccessibilitySource, BundleResolver, GeometrySource,
    ProcessBundleResolver, SystemPermission, WindowSource, collect_sources,
};
use crate::config::WindockConfig;
use crate::display::{
    Assignment, DisplayLayout, DisplayPolicy, DisplayProvider, SystemDisplays, assign_displays,
};
use crate::errors::WindockError;
use crate::matching::{IouMatchPolicy, MatchPolicy, group_records, link_sources, merge_groups};
use crate::window::WindowInfo;

/// One snapshot's windows together with the layout they were assigned on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub windows: Vec<WindowInfo>,
    pub layout: DisplayLayout,
}

/// Produces deduplicated, display-attributed window lists on demand.
///
/// Holds the only state that outlives a snapshot: the affinity cache.
/// Snapshots take `&mut self`, so they are serialized by construction.
pub struct WindowInventory {
    geometry: Box<dyn WindowSource>,
    accessibility: Box<dyn WindowSource>,
    permission: Box<dyn AccessibilityPermission>,
    displays: Box<dyn DisplayProvider>,
    match_policy: Box<dyn MatchPolicy>,
    display_policy: DisplayPolicy,
    cache: AffinityCache,
    store: Option<AffinityStore>,
}

impl WindowInventory {
    pub fn builder(
        geometry: impl WindowSource + 'static,
        accessibility: impl WindowSource + 'static,
    ) -> WindowInventoryBuilder {
        WindowInventoryBuilder {
            geometry: Box::new(geometry),
            accessibility: Box::new(accessibility),
            permission: None,
            displays: None,
            match_policy: None,
            display_policy: None,
            cache: None,
            store: None,
        }
    }

    /// Engine wired to the operating system, configured from `config`.
    pub fn system(config: &WindockConfig) -> Self {
        let resolver: Arc<dyn BundleResolver> = Arc::new(ProcessBundleResolver::new());
        let builder = Self::builder(
            GeometrySource::from_config(&config.geometry, Arc::clone(&resolver)),
            AccessibilitySource::from_config(&config.accessibility, resolver),
        )
        .match_policy(IouMatchPolicy::from_config(&config.matching))
        .display_policy(DisplayPolicy::from_config(&config.display));

        let builder = if config.cache.enabled() {
            builder.store(AffinityStore::from_config(&config.cache))
        } else {
            info!(event = "core.inventory.cache_disabled");
            builder
        };

        builder.build()
    }

    /// Take a snapshot: every real window, each on exactly one display,
    /// sorted. Never fails; unavailable sources only shrink the result.
    pub fn snapshot(&mut self) -> Vec<WindowInfo> {
        self.snapshot_with_layout().windows
    }

    /// Like [`snapshot`](Self::snapshot), also returning the display layout.
    pub fn snapshot_with_layout(&mut self) -> Snapshot {
        let started = Instant::now();
        info!(
            event = "core.inventory.snapshot_started",
            policy = self.match_policy.name()
        );

        let collected = collect_sources(
            self.geometry.as_ref(),
            self.accessibility.as_ref(),
            self.permission.as_ref(),
        );
        let linked = link_sources(
            &collected.geometry,
            &collected.accessibility,
            self.match_policy.as_ref(),
        );

        let mut pool = collected.geometry;
        pool.extend(linked);

        let groups = group_records(&pool, self.match_policy.as_ref());
        let merged = merge_groups(&pool, &groups);

        let layout = match self.displays.layout() {
            Ok(layout) => layout,
            Err(e) => {
                warn!(
                    event = "core.inventory.displays_unavailable",
                    error = %e,
                    error_code = e.error_code()
                );
                DisplayLayout::empty()
            }
        };

        let Assignment {
            mut windows,
            updates,
        } = assign_displays(merged, &layout, &self.display_policy, &self.cache);

        if self.cache.apply(&updates)
            && let Some(store) = &self.store
        {
            store.persist_in_background(self.cache.clone());
        }

        sequence(&mut windows);

        info!(
            event = "core.inventory.snapshot_completed",
            raw_count = pool.len(),
            count = windows.len(),
            displays = layout.displays.len(),
            cache_updates = updates.len(),
            duration_ms = started.elapsed().as_millis() as u64
        );

        Snapshot { windows, layout }
    }

    /// Current display layout, without taking a snapshot.
    pub fn displays(&self) -> DisplayLayout {
        self.displays.layout().unwrap_or_else(|e| {
            warn!(
                event = "core.inventory.displays_unavailable",
                error = %e,
                error_code = e.error_code()
            );
            DisplayLayout::empty()
        })
    }

    pub fn cache(&self) -> &AffinityCache {
        &self.cache
    }

    pub fn store(&self) -> Option<&AffinityStore> {
        self.store.as_ref()
    }

    /// Block until background cache writes have finished.
    pub fn flush_persistence(&self) {
        if let Some(store) = &self.store {
            store.flush();
        }
    }
}

/// Builder for [`WindowInventory`]. Unset collaborators default to the
/// system implementations.
pub struct WindowInventoryBuilder {
    geometry: Box<dyn WindowSource>,
    accessibility: Box<dyn WindowSource>,
    permission: Option<Box<dyn AccessibilityPermission>>,
    displays: Option<Box<dyn DisplayProvider>>,
    match_policy: Option<Box<dyn MatchPolicy>>,
    display_policy: Option<DisplayPolicy>,
    cache: Option<AffinityCache>,
    store: Option<AffinityStore>,
}

impl WindowInventoryBuilder {
    pub fn permission(mut self, permission: impl AccessibilityPermission + 'static) -> Self {
        self.permission = Some(Box::new(permission));
        self
    }

    pub fn displays(mut self, displays: impl DisplayProvider + 'static) -> Self {
        self.displays = Some(Box::new(displays));
        self
    }

    pub fn match_policy(mut self, policy: impl MatchPolicy + 'static) -> Self {
        self.match_policy = Some(Box::new(policy));
        self
    }

    pub fn display_policy(mut self, policy: DisplayPolicy) -> Self {
        self.display_policy = Some(policy);
        self
    }

    /// Start from this cache instead of loading the store's file.
    pub fn cache(mut self, cache: AffinityCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn store(mut self, store: AffinityStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> WindowInventory {
        let cache = match (self.cache, &self.store) {
            (Some(cache), _) => cache,
            (None, Some(store)) => store.load(),
            (None, None) => AffinityCache::default(),
        };

        WindowInventory {
            geometry: self.geometry,
            accessibility: self.accessibility,
            permission: self
                .permission
                .unwrap_or_else(|| Box::new(SystemPermission)),
            displays: self.displays.unwrap_or_else(|| Box::new(SystemDisplays)),
            match_policy: self
                .match_policy
                .unwrap_or_else(|| Box::new(IouMatchPolicy::default())),
            display_policy: self.display_policy.unwrap_or_default(),
            cache,
            store: self.store,
        }
    }
}
