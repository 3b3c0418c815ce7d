/// Content context - owns the asset registry and resource store of a process

use std::sync::Arc;
use crate::asset::{AssetHandle, AssetRegistry, AssetType};
use crate::config::ContentConfig;
use crate::engine_info;
use crate::error::Result;
use crate::resource::{RenderBackend, ResourceId, ResourceStore};

/// Single owner of the content pipeline state
///
/// Construct one at startup and share it by reference (or `Arc`). It is
/// `Send + Sync`: every component synchronizes internally.
pub struct ContentContext {
    config: ContentConfig,
    registry: AssetRegistry,
    store: ResourceStore,
}

impl ContentContext {
    pub fn new(config: ContentConfig, backend: Arc<dyn RenderBackend>) -> Self {
        engine_info!("galaxy3d::ContentContext",
            "Content context rooted at '{}'", config.asset_root.display());
        Self {
            registry: AssetRegistry::new(&config),
            store: ResourceStore::new(backend),
            config,
        }
    }

    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    /// Load the registry file (or rescan the asset root)
    pub fn load(&self) -> Result<usize> {
        self.registry.load()
    }

    /// Save the registry file
    pub fn save(&self) -> Result<()> {
        self.registry.save()
    }

    /// Resource of an asset, created on first request
    pub fn get_resource_from_asset(
        &self,
        handle: AssetHandle,
        asset_type: AssetType,
        create_if_missing: bool,
    ) -> Result<Option<ResourceId>> {
        self.registry
            .get_resource_from_asset(handle, asset_type, create_if_missing, &self.store)
    }

    /// Unpair and destroy the resource of an asset; `false` if none was paired
    pub fn release_resource(&self, handle: AssetHandle, asset_type: AssetType) -> bool {
        match self.registry.unpair_resource(handle, asset_type) {
            Some(id) => {
                self.store.destroy_resource(id, asset_type);
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
