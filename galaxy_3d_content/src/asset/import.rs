//! Importer front-end.
//!
//! Source decoding (FBX, PNG, HLSL compilation, ...) happens elsewhere;
//! these functions take the decoded result, write the engine-facing file
//! (plus the `.mt` metadata file for meshes and textures) next to the
//! original, and register the asset. Importing a path that is already
//! registered updates that asset instead of adding a second one; a
//! resource already created for it keeps the old content until it is
//! released.

use std::path::{Path, PathBuf};
use crate::asset::{imported_path_for, metadata_path_for, Asset, AssetHandle, AssetRegistry, AssetType};
use crate::content::geometry::{pack_geometry, pack_geometry_metadata};
use crate::content::material::pack_material;
use crate::content::shader::pack_shader_group;
use crate::content::texture::{pack_texture, pack_texture_metadata};
use crate::content::{
    write_blob_file, CompiledShader, GeometryDesc, GeometryImportSettings, GeometryMetadata,
    MaterialInitInfo, TextureDesc,
};
use crate::{engine_info, engine_warn};
use crate::error::Result;

/// Register `original_path` or point its existing record at `imported_path`
///
/// A reimport does not touch an existing pairing: the paired resource was
/// built from the previous engine file and stays memoized until the caller
/// releases it (`ContentContext::release_resource`).
fn register_or_update(
    registry: &AssetRegistry,
    asset_type: AssetType,
    original_path: &Path,
    imported_path: PathBuf,
) -> AssetHandle {
    if let Some(handle) = registry.find_by_path(original_path) {
        let updated = registry.update_asset(handle, |asset| {
            asset.asset_type = asset_type;
            asset.imported_path = imported_path.clone();
        });
        if updated {
            engine_info!("galaxy3d::Import",
                "Reimported '{}' ({})", original_path.display(), handle);
            if registry.has_resource(handle, asset_type) {
                engine_warn!("galaxy3d::Import",
                    "Asset {} still has a {:?} resource built before the reimport, release it to reload",
                    handle, asset_type);
            }
            return handle;
        }
    }

    let handle = registry.register_asset(Asset::new(asset_type, original_path, imported_path));
    engine_info!("galaxy3d::Import",
        "Imported '{}' as {:?} asset {}", original_path.display(), asset_type, handle);
    handle
}

/// Write `.tex` and `.mt` for a decoded texture and register it
pub fn import_texture(registry: &AssetRegistry, original_path: &Path, desc: &TextureDesc) -> Result<AssetHandle> {
    let engine_blob = pack_texture(desc)?;
    let metadata_blob = pack_texture_metadata(desc)?;

    let imported_path = imported_path_for(original_path, AssetType::Texture);
    write_blob_file(&metadata_path_for(&imported_path), &metadata_blob)?;
    write_blob_file(&imported_path, &engine_blob)?;

    Ok(register_or_update(registry, AssetType::Texture, original_path, imported_path))
}

/// Write `.mesh` and `.mt` for a decoded mesh and register it
pub fn import_geometry(
    registry: &AssetRegistry,
    original_path: &Path,
    desc: &GeometryDesc,
    settings: GeometryImportSettings,
) -> Result<AssetHandle> {
    let engine_blob = pack_geometry(desc)?;
    let metadata_blob = pack_geometry_metadata(&GeometryMetadata::from_desc(desc, settings));

    let imported_path = imported_path_for(original_path, AssetType::Mesh);
    write_blob_file(&metadata_path_for(&imported_path), &metadata_blob)?;
    write_blob_file(&imported_path, &engine_blob)?;

    Ok(register_or_update(registry, AssetType::Mesh, original_path, imported_path))
}

/// Write the `.mat` file of a material and register it
pub fn import_material(registry: &AssetRegistry, original_path: &Path, info: &MaterialInitInfo) -> Result<AssetHandle> {
    let imported_path = imported_path_for(original_path, AssetType::Material);
    write_blob_file(&imported_path, &pack_material(info))?;
    Ok(register_or_update(registry, AssetType::Material, original_path, imported_path))
}

/// Write the `.sd` file of compiled shaders and register it
pub fn import_shader_group(
    registry: &AssetRegistry,
    original_path: &Path,
    shaders: &[(u32, CompiledShader)],
) -> Result<AssetHandle> {
    let imported_path = imported_path_for(original_path, AssetType::Shader);
    write_blob_file(&imported_path, &pack_shader_group(shaders))?;
    Ok(register_or_update(registry, AssetType::Shader, original_path, imported_path))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "import_tests.rs"]
mod tests;
