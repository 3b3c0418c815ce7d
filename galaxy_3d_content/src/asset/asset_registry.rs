//! Asset registry.
//!
//! Maps persistent [`AssetHandle`]s to [`Asset`] records and pairs assets
//! with the backend resources created from them.
//!
//! # Locking
//!
//! - the asset map is behind one `RwLock`
//! - each `(handle, type)` pairing has its own `Mutex`, so creating a
//!   resource for one asset never blocks lookups or creations for others
//! - listeners are called after every registry lock is released

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::{Deserialize, Serialize};
use crate::asset::{imported_path_for, Asset, AssetHandle, AssetType};
use crate::config::ContentConfig;
use crate::content::read_blob_file;
use crate::error::{Error, Result};
use crate::resource::{ResourceId, ResourceStore};
use crate::{engine_debug, engine_error, engine_info, engine_warn};

/// Prefix of registry-file paths that are relative to the asset root
const ASSET_ROOT_MARKER: &str = "$root/";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// LISTENER
// ============================================================================

/// Observer of registry changes (e.g. a content browser)
///
/// Called on the thread that made the change, with no registry lock held.
/// Callbacks cannot fail the operation that triggered them.
pub trait AssetRegistryListener: Send + Sync {
    fn on_asset_added(&self, _handle: AssetHandle, _asset: &Asset) {}
    fn on_asset_deleted(&self, _handle: AssetHandle, _asset: &Asset) {}
}

// ============================================================================
// REGISTRY FILE
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct RegistryEntry {
    #[serde(rename = "Type")]
    asset_type: u32,
    #[serde(rename = "OriginalFilePath")]
    original_file_path: String,
    #[serde(rename = "ImportedFilePath")]
    imported_file_path: String,
}

/// Handle value -> entry, in registration order
type RegistryDocument = IndexMap<u64, RegistryEntry>;

// ============================================================================
// ASSET REGISTRY
// ============================================================================

type PairingSlot = Arc<Mutex<Option<ResourceId>>>;

/// Source of truth for asset identity
pub struct AssetRegistry {
    asset_root: PathBuf,
    registry_file: PathBuf,
    assets: RwLock<IndexMap<AssetHandle, Asset, FxBuildHasher>>,
    pairings: Mutex<FxHashMap<(AssetHandle, AssetType), PairingSlot>>,
    resource_owners: Mutex<FxHashMap<(ResourceId, AssetType), AssetHandle>>,
    listeners: RwLock<Vec<Arc<dyn AssetRegistryListener>>>,
}

impl AssetRegistry {
    /// Create an empty registry for the given configuration
    ///
    /// Nothing is read from disk until [`load`](Self::load).
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            asset_root: config.asset_root.clone(),
            registry_file: config.registry_file.clone(),
            assets: RwLock::new(IndexMap::default()),
            pairings: Mutex::new(FxHashMap::default()),
            resource_owners: Mutex::new(FxHashMap::default()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    pub fn registry_file(&self) -> &Path {
        &self.registry_file
    }

    // ===== LISTENERS =====

    pub fn add_listener(&self, listener: Arc<dyn AssetRegistryListener>) {
        write(&self.listeners).push(listener);
    }

    fn listeners(&self) -> Vec<Arc<dyn AssetRegistryListener>> {
        read(&self.listeners).clone()
    }

    // ===== ASSETS =====

    /// Register an asset under a freshly drawn random handle
    pub fn register_asset(&self, asset: Asset) -> AssetHandle {
        let handle = {
            let mut assets = write(&self.assets);
            let mut handle = AssetHandle::generate();
            while assets.contains_key(&handle) {
                handle = AssetHandle::generate();
            }
            assets.insert(handle, asset.clone());
            handle
        };

        engine_debug!("galaxy3d::AssetRegistry",
            "Registered {:?} asset '{}' as {}", asset.asset_type, asset.name, handle);
        for listener in self.listeners() {
            listener.on_asset_added(handle, &asset);
        }
        handle
    }

    /// Copy of the asset record, `None` for unknown handles
    pub fn get_asset(&self, handle: AssetHandle) -> Option<Asset> {
        read(&self.assets).get(&handle).cloned()
    }

    /// Edit an asset record in place; `false` for unknown handles
    pub fn update_asset(&self, handle: AssetHandle, f: impl FnOnce(&mut Asset)) -> bool {
        match write(&self.assets).get_mut(&handle) {
            Some(asset) => {
                f(asset);
                true
            }
            None => false,
        }
    }

    /// Remove an asset record
    ///
    /// Resource pairings are left untouched: the caller releases them with
    /// [`unpair_resource`](Self::unpair_resource) and destroys the resources.
    pub fn delete_asset(&self, handle: AssetHandle) -> Option<Asset> {
        let asset = write(&self.assets).shift_remove(&handle)?;
        engine_debug!("galaxy3d::AssetRegistry", "Deleted asset '{}' ({})", asset.name, handle);
        for listener in self.listeners() {
            listener.on_asset_deleted(handle, &asset);
        }
        Some(asset)
    }

    /// Whether an asset with this original path is registered
    pub fn is_registered(&self, original_path: &Path) -> bool {
        self.find_by_path(original_path).is_some()
    }

    /// Earliest registered asset with this original path (linear scan)
    pub fn find_by_path(&self, original_path: &Path) -> Option<AssetHandle> {
        read(&self.assets)
            .iter()
            .find(|(_, asset)| asset.original_path == original_path)
            .map(|(handle, _)| *handle)
    }

    /// Snapshot of every asset, in registration order
    pub fn assets(&self) -> Vec<(AssetHandle, Asset)> {
        read(&self.assets).iter().map(|(h, a)| (*h, a.clone())).collect()
    }

    pub fn len(&self) -> usize {
        read(&self.assets).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.assets).is_empty()
    }

    // ===== PERSISTENCE =====

    fn stored_path(&self, path: &Path) -> String {
        match path.strip_prefix(&self.asset_root) {
            Ok(relative) if !path.as_os_str().is_empty() => {
                format!("{}{}", ASSET_ROOT_MARKER, relative.to_string_lossy())
            }
            _ => path.to_string_lossy().into_owned(),
        }
    }

    fn resolve_stored_path(&self, stored: &str) -> PathBuf {
        match stored.strip_prefix(ASSET_ROOT_MARKER) {
            Some(relative) => self.asset_root.join(relative),
            None => PathBuf::from(stored),
        }
    }

    /// Write every asset to the registry file
    ///
    /// Paths under the asset root are stored relative to it, behind the
    /// `$root/` marker. Any other path is stored as given.
    pub fn save(&self) -> Result<()> {
        let document: RegistryDocument = read(&self.assets)
            .iter()
            .map(|(handle, asset)| {
                let entry = RegistryEntry {
                    asset_type: asset.asset_type as u32,
                    original_file_path: self.stored_path(&asset.original_path),
                    imported_file_path: self.stored_path(&asset.imported_path),
                };
                (handle.raw(), entry)
            })
            .collect();

        let text = ron::ser::to_string_pretty(&document, ron::ser::PrettyConfig::default())?;
        if let Some(parent) = self.registry_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.registry_file, text)?;

        engine_info!("galaxy3d::AssetRegistry",
            "Saved {} assets to '{}'", document.len(), self.registry_file.display());
        Ok(())
    }

    /// Read the registry file, keeping the stored handles
    ///
    /// A missing or empty registry file triggers
    /// [`rescan_asset_directory`](Self::rescan_asset_directory) instead.
    /// Entries with an unknown type are skipped. Returns the number of
    /// assets added.
    pub fn load(&self) -> Result<usize> {
        let text = match fs::read_to_string(&self.registry_file) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => {
                engine_error!("galaxy3d::AssetRegistry",
                    "Failed to read '{}': {}", self.registry_file.display(), e);
                return Err(e.into());
            }
        };

        if text.trim().is_empty() {
            engine_info!("galaxy3d::AssetRegistry",
                "Registry file '{}' missing or empty, rescanning '{}'",
                self.registry_file.display(), self.asset_root.display());
            return self.rescan_asset_directory();
        }

        let document: RegistryDocument = ron::from_str(&text).map_err(|e| {
            engine_error!("galaxy3d::AssetRegistry",
                "Malformed registry file '{}': {}", self.registry_file.display(), e);
            Error::from(e)
        })?;

        let mut loaded = Vec::with_capacity(document.len());
        for (raw_handle, entry) in document {
            let handle = AssetHandle::from_raw(raw_handle);
            let Some(asset_type) = AssetType::from_u32(entry.asset_type) else {
                engine_warn!("galaxy3d::AssetRegistry",
                    "Skipping asset {} with unknown type {}", handle, entry.asset_type);
                continue;
            };
            if !handle.is_valid() {
                engine_warn!("galaxy3d::AssetRegistry", "Skipping asset with invalid handle");
                continue;
            }
            let asset = Asset::new(
                asset_type,
                self.resolve_stored_path(&entry.original_file_path),
                self.resolve_stored_path(&entry.imported_file_path),
            );
            loaded.push((handle, asset));
        }

        {
            let mut assets = write(&self.assets);
            for (handle, asset) in &loaded {
                assets.insert(*handle, asset.clone());
            }
        }

        let listeners = self.listeners();
        for (handle, asset) in &loaded {
            for listener in &listeners {
                listener.on_asset_added(*handle, asset);
            }
        }

        engine_info!("galaxy3d::AssetRegistry",
            "Loaded {} assets from '{}'", loaded.len(), self.registry_file.display());
        Ok(loaded.len())
    }

    /// Register every file under the asset root whose extension is a known
    /// source extension and whose path is not registered yet
    ///
    /// The imported path is set when the engine-facing file already exists
    /// next to the source. Returns the number of assets added.
    pub fn rescan_asset_directory(&self) -> Result<usize> {
        if !self.asset_root.is_dir() {
            engine_warn!("galaxy3d::AssetRegistry",
                "Asset root '{}' does not exist, nothing to scan", self.asset_root.display());
            return Ok(0);
        }

        let mut files = Vec::new();
        collect_files(&self.asset_root, &mut files)?;
        files.sort();

        let mut added = 0;
        for path in files {
            let Some(asset_type) = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(AssetType::from_source_extension)
            else {
                continue;
            };
            if self.is_registered(&path) {
                continue;
            }

            let imported = imported_path_for(&path, asset_type);
            let imported = if imported.is_file() { imported } else { PathBuf::new() };
            self.register_asset(Asset::new(asset_type, path, imported));
            added += 1;
        }

        engine_info!("galaxy3d::AssetRegistry",
            "Rescan of '{}' registered {} assets", self.asset_root.display(), added);
        Ok(added)
    }

    // ===== RESOURCE PAIRING =====

    /// Record that `resource_id` is the `asset_type` resource of `handle`
    ///
    /// Replaces an existing pairing for the same handle and type.
    pub fn pair_asset_with_resource(
        &self,
        handle: AssetHandle,
        resource_id: ResourceId,
        asset_type: AssetType,
    ) -> Result<()> {
        if !resource_id.is_valid() {
            return Err(Error::InvalidResource(format!(
                "cannot pair asset {} with an invalid resource id", handle
            )));
        }
        if !read(&self.assets).contains_key(&handle) {
            engine_error!("galaxy3d::AssetRegistry", "Cannot pair unknown asset {}", handle);
            return Err(Error::InvalidResource(format!("asset {} is not registered", handle)));
        }

        let slot = Arc::clone(lock(&self.pairings).entry((handle, asset_type)).or_default());
        let mut paired = lock(&slot);
        let mut owners = lock(&self.resource_owners);
        if let Some(previous) = paired.replace(resource_id) {
            owners.remove(&(previous, asset_type));
        }
        owners.insert((resource_id, asset_type), handle);
        Ok(())
    }

    /// Resource of type `asset_type` created from `handle`
    ///
    /// With `create_if_missing`, a missing resource is created from the
    /// asset's imported file and paired. Creation happens at most once per
    /// handle and type: concurrent callers wait for the first one and get
    /// the same id.
    ///
    /// Returns `Ok(None)` when nothing is paired and `create_if_missing` is
    /// false, or when `handle` is not registered. Read and creation failures
    /// are errors and leave no pairing behind.
    pub fn get_resource_from_asset(
        &self,
        handle: AssetHandle,
        asset_type: AssetType,
        create_if_missing: bool,
        store: &ResourceStore,
    ) -> Result<Option<ResourceId>> {
        if !create_if_missing {
            let slot = lock(&self.pairings).get(&(handle, asset_type)).cloned();
            return Ok(slot.and_then(|slot| *lock(&slot)));
        }

        let Some(asset) = self.get_asset(handle) else {
            return Ok(None);
        };

        let slot = Arc::clone(lock(&self.pairings).entry((handle, asset_type)).or_default());
        let mut paired = lock(&slot);
        if let Some(id) = *paired {
            return Ok(Some(id));
        }

        if asset.asset_type != asset_type {
            engine_error!("galaxy3d::AssetRegistry",
                "Asset '{}' is a {:?}, requested as {:?}", asset.name, asset.asset_type, asset_type);
            return Err(Error::InvalidResource(format!(
                "asset {} is a {:?}, not a {:?}", handle, asset.asset_type, asset_type
            )));
        }
        if !asset.is_imported() {
            engine_error!("galaxy3d::AssetRegistry", "Asset '{}' has not been imported", asset.name);
            return Err(Error::InvalidResource(format!("asset {} has no imported file", handle)));
        }

        let blob = read_blob_file(&asset.imported_path)?;
        let id = store.create_resource_from_blob(&blob, asset_type)?;

        *paired = Some(id);
        lock(&self.resource_owners).insert((id, asset_type), handle);
        engine_debug!("galaxy3d::AssetRegistry",
            "Created {:?} resource {} for asset '{}'", asset_type, id, asset.name);
        Ok(Some(id))
    }

    /// Whether a `asset_type` resource is currently paired with `handle`
    pub fn has_resource(&self, handle: AssetHandle, asset_type: AssetType) -> bool {
        let slot = lock(&self.pairings).get(&(handle, asset_type)).cloned();
        slot.is_some_and(|slot| lock(&slot).is_some())
    }

    /// Asset a resource was paired with
    pub fn get_asset_from_resource(&self, resource_id: ResourceId, asset_type: AssetType) -> Option<AssetHandle> {
        lock(&self.resource_owners).get(&(resource_id, asset_type)).copied()
    }

    /// Remove a pairing and return the resource id so the caller can destroy it
    pub fn unpair_resource(&self, handle: AssetHandle, asset_type: AssetType) -> Option<ResourceId> {
        let slot = lock(&self.pairings).remove(&(handle, asset_type))?;
        let id = lock(&slot).take()?;
        lock(&self.resource_owners).remove(&(id, asset_type));
        Some(id)
    }
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "asset_registry_tests.rs"]
mod tests;
