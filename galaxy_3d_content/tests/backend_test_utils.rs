#![allow(dead_code)]
//! Backend test utilities - counting wrapper around the headless backend
//!
//! Integration tests use [`CountingBackend`] to check how many times the
//! content pipeline actually reached the backend, e.g. that a memoized
//! asset lookup uploads its texture once.

use galaxy_3d_content::galaxy3d::content::{MaterialInitInfo, SubmeshView, TextureView};
use galaxy_3d_content::galaxy3d::resource::{
    HeadlessBackend, MaterialId, RenderBackend, SubmeshId, TextureId,
};
use galaxy_3d_content::galaxy3d::Result;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Headless backend that counts every add/remove call
#[derive(Default)]
pub struct CountingBackend {
    pub inner: HeadlessBackend,
    pub submeshes_added: AtomicU32,
    pub submeshes_removed: AtomicU32,
    pub textures_added: AtomicU32,
    pub textures_removed: AtomicU32,
    pub materials_added: AtomicU32,
    pub materials_removed: AtomicU32,
}

impl CountingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(counter: &AtomicU32) -> u32 {
        counter.load(Ordering::SeqCst)
    }
}

impl RenderBackend for CountingBackend {
    fn add_submesh(&self, submesh: &SubmeshView<'_>) -> Result<SubmeshId> {
        self.submeshes_added.fetch_add(1, Ordering::SeqCst);
        self.inner.add_submesh(submesh)
    }

    fn remove_submesh(&self, id: SubmeshId) {
        self.submeshes_removed.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_submesh(id)
    }

    fn add_texture(&self, texture: &TextureView<'_>) -> Result<TextureId> {
        self.textures_added.fetch_add(1, Ordering::SeqCst);
        self.inner.add_texture(texture)
    }

    fn remove_texture(&self, id: TextureId) {
        self.textures_removed.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_texture(id)
    }

    fn add_material(&self, info: &MaterialInitInfo) -> Result<MaterialId> {
        self.materials_added.fetch_add(1, Ordering::SeqCst);
        self.inner.add_material(info)
    }

    fn remove_material(&self, id: MaterialId) {
        self.materials_removed.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_material(id)
    }
}
