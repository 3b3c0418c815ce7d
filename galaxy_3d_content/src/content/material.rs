//! Material blob format.
//!
//! A material blob is the raw bytes of one [`MaterialInitInfo`]: a
//! fixed-size plain-old-data struct copied by value. The layout is the
//! host's, which is little-endian on every supported target.

use bytemuck::{Pod, Zeroable};
use crate::error::{Error, Result};

/// Maximum textures a material can bind
pub const MAX_MATERIAL_TEXTURES: usize = 8;

/// Raw id value meaning "no shader / no texture"
pub const NO_ID: u32 = u32::MAX;

/// Programmable stages a material assigns shaders to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ShaderStage {
    Vertex = 0,
    Hull = 1,
    Domain = 2,
    Geometry = 3,
    Pixel = 4,
}

impl ShaderStage {
    pub const COUNT: usize = 5;
}

/// Surface model of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum MaterialType {
    #[default]
    Opaque = 0,
    AlphaTested = 1,
    Transparent = 2,
}

impl MaterialType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Opaque),
            1 => Some(Self::AlphaTested),
            2 => Some(Self::Transparent),
            _ => None,
        }
    }
}

/// Everything needed to create a material on the backend
///
/// Shader and texture slots hold raw resource ids ([`NO_ID`] when unused).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialInitInfo {
    pub material_type: u32,
    pub texture_count: u32,
    /// Shader group id per [`ShaderStage`]
    pub shader_ids: [u32; ShaderStage::COUNT],
    /// First `texture_count` entries are used
    pub texture_ids: [u32; MAX_MATERIAL_TEXTURES],
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub ambient_occlusion: f32,
    pub metallic: f32,
    pub roughness: f32,
}

impl Default for MaterialInitInfo {
    fn default() -> Self {
        Self {
            material_type: MaterialType::Opaque as u32,
            texture_count: 0,
            shader_ids: [NO_ID; ShaderStage::COUNT],
            texture_ids: [NO_ID; MAX_MATERIAL_TEXTURES],
            base_color: [1.0, 1.0, 1.0, 1.0],
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 1.0,
            ambient_occlusion: 1.0,
            metallic: 0.0,
            roughness: 1.0,
        }
    }
}

impl MaterialInitInfo {
    /// Size of a material blob in bytes
    pub const BLOB_SIZE: usize = std::mem::size_of::<Self>();

    pub fn shader_id(&self, stage: ShaderStage) -> u32 {
        self.shader_ids[stage as usize]
    }

    pub fn set_shader_id(&mut self, stage: ShaderStage, id: u32) {
        self.shader_ids[stage as usize] = id;
    }

    /// Texture ids actually bound (`texture_count` clamped to the array)
    pub fn textures(&self) -> &[u32] {
        let count = (self.texture_count as usize).min(MAX_MATERIAL_TEXTURES);
        &self.texture_ids[..count]
    }
}

/// Serialize a material to its blob
pub fn pack_material(info: &MaterialInitInfo) -> Vec<u8> {
    bytemuck::bytes_of(info).to_vec()
}

/// Read a material blob
///
/// The blob must be exactly [`MaterialInitInfo::BLOB_SIZE`] bytes. Its
/// alignment does not matter.
pub fn unpack_material(blob: &[u8]) -> Result<MaterialInitInfo> {
    if blob.len() != MaterialInitInfo::BLOB_SIZE {
        return Err(Error::InvalidData(format!(
            "material blob is {} bytes, expected {}",
            blob.len(),
            MaterialInitInfo::BLOB_SIZE
        )));
    }
    let info: MaterialInitInfo = bytemuck::pod_read_unaligned(blob);
    if MaterialType::from_u32(info.material_type).is_none() {
        return Err(Error::InvalidData(format!("unknown material type {}", info.material_type)));
    }
    if info.texture_count as usize > MAX_MATERIAL_TEXTURES {
        return Err(Error::InvalidData(format!(
            "material binds {} textures, max is {}",
            info.texture_count, MAX_MATERIAL_TEXTURES
        )));
    }
    Ok(info)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
