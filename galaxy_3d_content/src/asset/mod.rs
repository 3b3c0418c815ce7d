//! Asset identity, registry and importer front-end

mod asset_types;
mod asset_registry;
pub mod import;

pub use asset_types::{
    AssetType, AssetHandle, Asset,
    METADATA_EXTENSION, imported_path_for, metadata_path_for,
};
pub use asset_registry::{AssetRegistry, AssetRegistryListener};
pub use import::{import_texture, import_geometry, import_material, import_shader_group};
