/// Render backend trait - GPU-side storage for submeshes, textures and materials

use crate::content::{MaterialInitInfo, SubmeshView, TextureView};
use crate::error::Result;
use crate::resource::{MaterialId, SubmeshId, TextureId};

/// Backend that owns the GPU copies of content
///
/// Methods take `&self` and may be called from any thread: implementations
/// synchronize internally, one lock per kind of resource, so a texture
/// upload never waits on a submesh upload.
///
/// Views borrow the blob being loaded; implementations copy what they keep.
pub trait RenderBackend: Send + Sync {
    /// Upload one submesh
    fn add_submesh(&self, submesh: &SubmeshView<'_>) -> Result<SubmeshId>;

    /// Release a submesh. Panics if `id` is not live.
    fn remove_submesh(&self, id: SubmeshId);

    /// Upload a texture with all its subresources
    fn add_texture(&self, texture: &TextureView<'_>) -> Result<TextureId>;

    /// Release a texture. Panics if `id` is not live.
    fn remove_texture(&self, id: TextureId);

    /// Create a material
    fn add_material(&self, info: &MaterialInitInfo) -> Result<MaterialId>;

    /// Release a material. Panics if `id` is not live.
    fn remove_material(&self, id: MaterialId);
}
