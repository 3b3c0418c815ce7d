//! Binary blob formats of imported content.
//!
//! Every imported asset produces an engine-facing blob (`.mesh`, `.tex`,
//! `.mat`, `.sd`) and, for meshes and textures, an editor metadata blob
//! (`.mt`) next to it.

pub mod blob_stream;
pub mod geometry;
pub mod texture;
pub mod material;
pub mod shader;

use std::fs;
use std::path::Path;
use crate::engine_error;
use crate::error::Result;

pub use blob_stream::{BlobReader, BlobWriter};
pub use geometry::{
    ElementType, PrimitiveTopology,
    GeometryDesc, LodGroupDesc, SubmeshDesc,
    LodGroupView, SubmeshView,
    GeometryImportSettings, GeometryMetadata,
};
pub use texture::{
    TextureFormat, TextureFlags, TextureDimension,
    TextureImportSettings, TextureInfo, TextureSlice, TextureDesc,
    TextureView, SubresourceView,
};
pub use material::{MaterialInitInfo, MaterialType, ShaderStage};
pub use shader::CompiledShader;

/// Write a blob to disk, creating missing parent directories
pub fn write_blob_file(path: &Path, blob: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, blob).map_err(|e| {
        engine_error!("galaxy3d::Content", "Failed to write '{}': {}", path.display(), e);
        e.into()
    })
}

/// Read a whole blob file
pub fn read_blob_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        engine_error!("galaxy3d::Content", "Failed to read '{}': {}", path.display(), e);
        e.into()
    })
}
