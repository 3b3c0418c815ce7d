//! Backend-resident resources
//!
//! Turns content blobs into resources living in a [`RenderBackend`], and
//! provides a CPU-only [`HeadlessBackend`].

mod render_backend;
mod headless_backend;
mod resource_store;

pub use render_backend::RenderBackend;
pub use headless_backend::{HeadlessBackend, HeadlessSubmesh, HeadlessTexture};
pub use resource_store::{GeometryInfo, LodOffset, ResourceStore};

crate::typed_id! {
    /// Id of a resource created from an asset, interpreted per `AssetType`
    pub struct ResourceId;
}

crate::typed_id! {
    /// Backend id of one uploaded submesh
    pub struct SubmeshId;
}

crate::typed_id! {
    /// Backend id of an uploaded texture
    pub struct TextureId;
}

crate::typed_id! {
    /// Backend id of a material
    pub struct MaterialId;
}

crate::typed_id! {
    /// Id of a shader group in the resource store
    pub struct ShaderGroupId;
}
