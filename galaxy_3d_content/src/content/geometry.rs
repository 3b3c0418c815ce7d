//! Geometry blob format.
//!
//! A geometry is a list of LOD groups (LOD 0 = most detailed), each holding
//! one or more submeshes. The engine-facing blob (`.mesh`) is:
//!
//! ```text
//! u32 lod_count
//! per LOD:
//!     f32 threshold
//!     u32 submesh_count
//!     u32 size_of_submeshes        (bytes of all submeshes of this LOD)
//!     per submesh:
//!         u32 element_size
//!         u32 vertex_count
//!         u32 index_count
//!         u32 element_type
//!         u32 primitive_topology
//!         bytes positions           (12 * vertex_count, padded to 4)
//!         bytes elements            (element_size * vertex_count, padded to 4)
//!         bytes indices             (index_size * index_count)
//! ```
//!
//! `index_size` is 2 when `vertex_count < 65536`, else 4. The writer always
//! stores [`LOD_THRESHOLD_UNSET`] as threshold; the reader returns whatever
//! the blob holds.
//!
//! The editor-side metadata blob (`.mt`) keeps what the engine blob drops:
//! import settings and LOD/submesh names.

use crate::content::blob_stream::{align_size_up_4, BlobReader, BlobWriter};
use crate::engine_bail;
use crate::error::{Error, Result};

/// Threshold written for every LOD by [`pack_geometry`]
pub const LOD_THRESHOLD_UNSET: f32 = 0.0;

/// Bytes per position (3 x f32)
pub const POSITION_SIZE: u32 = 12;

/// Fixed header bytes in front of each submesh's payload
const SUBMESH_HEADER_SIZE: usize = 5 * 4;

/// Index width for a submesh with `vertex_count` vertices (2 or 4 bytes)
pub const fn index_size_for(vertex_count: u32) -> u32 {
    if vertex_count < (1 << 16) {
        2
    } else {
        4
    }
}

// ============================================================================
// ENUMS
// ============================================================================

/// Primitive topology of a submesh (values match the D3D topology enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PrimitiveTopology {
    PointList = 1,
    LineList = 2,
    LineStrip = 3,
    TriangleList = 4,
    TriangleStrip = 5,
}

impl PrimitiveTopology {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::PointList),
            2 => Some(Self::LineList),
            3 => Some(Self::LineStrip),
            4 => Some(Self::TriangleList),
            5 => Some(Self::TriangleStrip),
            _ => None,
        }
    }
}

/// Layout of the per-vertex element stream stored next to positions.
///
/// The value is a bit combination: normals `0x01`, texture coordinates
/// `0x02`, vertex colors `0x04`, skinning `0x08`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ElementType {
    PositionOnly = 0x00,
    StaticNormal = 0x01,
    StaticNormalTexture = 0x03,
    StaticColor = 0x04,
    Skeletal = 0x08,
    SkeletalNormal = 0x09,
    SkeletalNormalTexture = 0x0B,
    SkeletalColor = 0x0C,
    SkeletalNormalColor = 0x0D,
    SkeletalNormalTextureColor = 0x0F,
}

impl ElementType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0x00 => Some(Self::PositionOnly),
            0x01 => Some(Self::StaticNormal),
            0x03 => Some(Self::StaticNormalTexture),
            0x04 => Some(Self::StaticColor),
            0x08 => Some(Self::Skeletal),
            0x09 => Some(Self::SkeletalNormal),
            0x0B => Some(Self::SkeletalNormalTexture),
            0x0C => Some(Self::SkeletalColor),
            0x0D => Some(Self::SkeletalNormalColor),
            0x0F => Some(Self::SkeletalNormalTextureColor),
            _ => None,
        }
    }

    pub fn is_skinned(self) -> bool {
        (self as u32) & 0x08 != 0
    }
}

// ============================================================================
// DESCRIPTORS (owned, import side)
// ============================================================================

/// One submesh as produced by a mesh importer
#[derive(Debug, Clone, PartialEq)]
pub struct SubmeshDesc {
    /// Editor name (kept in the metadata blob only)
    pub name: String,
    pub element_type: ElementType,
    pub primitive_topology: PrimitiveTopology,
    /// Bytes per vertex in `elements` (0 for `PositionOnly`)
    pub element_size: u32,
    pub positions: Vec<[f32; 3]>,
    /// Packed per-vertex elements, `element_size * positions.len()` bytes
    pub elements: Vec<u8>,
    /// Indices into `positions`, narrowed to 16 bits on write when possible
    pub indices: Vec<u32>,
}

impl SubmeshDesc {
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// One LOD group
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LodGroupDesc {
    pub name: String,
    pub submeshes: Vec<SubmeshDesc>,
}

/// Whole geometry, LOD 0 first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryDesc {
    pub lods: Vec<LodGroupDesc>,
}

// ============================================================================
// VIEWS (borrowed, upload side)
// ============================================================================

/// Borrowed view of one submesh inside a geometry blob
///
/// This is what the render backend receives: the byte ranges point straight
/// into the blob, nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct SubmeshView<'a> {
    pub element_size: u32,
    pub vertex_count: u32,
    pub index_count: u32,
    pub element_type: ElementType,
    pub primitive_topology: PrimitiveTopology,
    /// `12 * vertex_count` bytes (padding excluded)
    pub positions: &'a [u8],
    /// `element_size * vertex_count` bytes (padding excluded)
    pub elements: &'a [u8],
    /// `index_size * index_count` bytes
    pub indices: &'a [u8],
}

impl SubmeshView<'_> {
    /// Width in bytes of one index (2 or 4)
    pub fn index_size(&self) -> u32 {
        index_size_for(self.vertex_count)
    }

    /// Positions decoded to floats
    pub fn decode_positions(&self) -> Vec<[f32; 3]> {
        self.positions
            .chunks_exact(POSITION_SIZE as usize)
            .map(|p| {
                [
                    f32::from_le_bytes([p[0], p[1], p[2], p[3]]),
                    f32::from_le_bytes([p[4], p[5], p[6], p[7]]),
                    f32::from_le_bytes([p[8], p[9], p[10], p[11]]),
                ]
            })
            .collect()
    }

    /// Indices widened to u32
    pub fn decode_indices(&self) -> Vec<u32> {
        if self.index_size() == 2 {
            self.indices
                .chunks_exact(2)
                .map(|i| u16::from_le_bytes([i[0], i[1]]) as u32)
                .collect()
        } else {
            self.indices
                .chunks_exact(4)
                .map(|i| u32::from_le_bytes([i[0], i[1], i[2], i[3]]))
                .collect()
        }
    }
}

/// Borrowed view of one LOD group inside a geometry blob
#[derive(Debug, Clone)]
pub struct LodGroupView<'a> {
    pub threshold: f32,
    pub submeshes: Vec<SubmeshView<'a>>,
}

// ============================================================================
// WRITE
// ============================================================================

fn submesh_blob_size(submesh: &SubmeshDesc) -> usize {
    let vertex_count = submesh.vertex_count() as usize;
    SUBMESH_HEADER_SIZE
        + align_size_up_4(POSITION_SIZE as usize * vertex_count)
        + align_size_up_4(submesh.element_size as usize * vertex_count)
        + index_size_for(submesh.vertex_count()) as usize * submesh.indices.len()
}

fn validate_submesh(lod_index: usize, submesh_index: usize, submesh: &SubmeshDesc) -> Result<()> {
    let vertex_count = submesh.vertex_count();
    let expected_elements = submesh.element_size as usize * vertex_count as usize;
    if submesh.elements.len() != expected_elements {
        engine_bail!("galaxy3d::Geometry",
            "LOD {} submesh {}: elements hold {} bytes, expected {} ({} vertices x {} bytes)",
            lod_index, submesh_index, submesh.elements.len(), expected_elements,
            vertex_count, submesh.element_size);
    }
    if submesh.element_type == ElementType::PositionOnly && submesh.element_size != 0 {
        engine_bail!("galaxy3d::Geometry",
            "LOD {} submesh {}: position-only submesh has element size {}",
            lod_index, submesh_index, submesh.element_size);
    }
    if let Some(&index) = submesh.indices.iter().find(|&&i| i >= vertex_count) {
        engine_bail!("galaxy3d::Geometry",
            "LOD {} submesh {}: index {} out of range ({} vertices)",
            lod_index, submesh_index, index, vertex_count);
    }
    Ok(())
}

/// Pack a geometry into the engine blob format
///
/// Fails if the geometry has no LOD, a LOD has no submesh, element bytes do
/// not match `element_size * vertex_count`, or an index is out of range.
pub fn pack_geometry(desc: &GeometryDesc) -> Result<Vec<u8>> {
    if desc.lods.is_empty() {
        engine_bail!("galaxy3d::Geometry", "Geometry has no LOD group");
    }

    let mut total_size = 4;
    for (lod_index, lod) in desc.lods.iter().enumerate() {
        if lod.submeshes.is_empty() {
            engine_bail!("galaxy3d::Geometry", "LOD {} has no submesh", lod_index);
        }
        for (submesh_index, submesh) in lod.submeshes.iter().enumerate() {
            validate_submesh(lod_index, submesh_index, submesh)?;
            total_size += submesh_blob_size(submesh);
        }
        total_size += 12;
    }

    let mut writer = BlobWriter::with_capacity(total_size);
    writer.write_u32(desc.lods.len() as u32);

    for lod in &desc.lods {
        let size_of_submeshes: usize = lod.submeshes.iter().map(submesh_blob_size).sum();
        writer.write_f32(LOD_THRESHOLD_UNSET);
        writer.write_u32(lod.submeshes.len() as u32);
        writer.write_u32(size_of_submeshes as u32);

        for submesh in &lod.submeshes {
            let vertex_count = submesh.vertex_count();
            writer.write_u32(submesh.element_size);
            writer.write_u32(vertex_count);
            writer.write_u32(submesh.index_count());
            writer.write_u32(submesh.element_type as u32);
            writer.write_u32(submesh.primitive_topology as u32);

            let mut positions = Vec::with_capacity(POSITION_SIZE as usize * vertex_count as usize);
            for position in &submesh.positions {
                for component in position {
                    positions.extend_from_slice(&component.to_le_bytes());
                }
            }
            writer.write_padded_bytes(&positions);
            writer.write_padded_bytes(&submesh.elements);

            if index_size_for(vertex_count) == 2 {
                for &index in &submesh.indices {
                    writer.write_u16(index as u16);
                }
            } else {
                for &index in &submesh.indices {
                    writer.write_u32(index);
                }
            }
        }
    }

    debug_assert_eq!(writer.position(), total_size);
    Ok(writer.finish())
}

// ============================================================================
// READ
// ============================================================================

fn read_submesh<'a>(reader: &mut BlobReader<'a>) -> Result<SubmeshView<'a>> {
    let element_size = reader.read_u32()?;
    let vertex_count = reader.read_u32()?;
    let index_count = reader.read_u32()?;
    let raw_element_type = reader.read_u32()?;
    let raw_topology = reader.read_u32()?;

    let element_type = ElementType::from_u32(raw_element_type).ok_or_else(|| {
        Error::InvalidData(format!("unknown element type {:#x}", raw_element_type))
    })?;
    let primitive_topology = PrimitiveTopology::from_u32(raw_topology)
        .ok_or_else(|| Error::InvalidData(format!("unknown primitive topology {}", raw_topology)))?;

    let positions_size = (vertex_count as usize)
        .checked_mul(POSITION_SIZE as usize)
        .ok_or_else(|| Error::InvalidData(format!("vertex count {} overflows", vertex_count)))?;
    let elements_size = (vertex_count as usize)
        .checked_mul(element_size as usize)
        .ok_or_else(|| Error::InvalidData(format!("element size {} overflows", element_size)))?;
    let indices_size = (index_count as usize)
        .checked_mul(index_size_for(vertex_count) as usize)
        .ok_or_else(|| Error::InvalidData(format!("index count {} overflows", index_count)))?;

    Ok(SubmeshView {
        element_size,
        vertex_count,
        index_count,
        element_type,
        primitive_topology,
        positions: reader.read_padded_bytes(positions_size)?,
        elements: reader.read_padded_bytes(elements_size)?,
        indices: reader.read_bytes(indices_size)?,
    })
}

/// Parse a geometry blob into borrowed LOD views
///
/// Each LOD's `size_of_submeshes` must match the bytes its submeshes
/// actually occupy, and the blob must end right after the last LOD.
pub fn read_geometry_blob(blob: &[u8]) -> Result<Vec<LodGroupView<'_>>> {
    let mut reader = BlobReader::new(blob);
    let lod_count = reader.read_u32()?;
    if lod_count == 0 {
        return Err(Error::InvalidData("geometry blob has no LOD group".to_string()));
    }

    let mut lods = Vec::with_capacity(lod_count.min(64) as usize);
    for lod_index in 0..lod_count {
        let threshold = reader.read_f32()?;
        let submesh_count = reader.read_u32()?;
        let size_of_submeshes = reader.read_u32()? as usize;
        if submesh_count == 0 {
            return Err(Error::InvalidData(format!("LOD {} has no submesh", lod_index)));
        }

        let start = reader.position();
        let mut submeshes = Vec::with_capacity(submesh_count.min(1024) as usize);
        for _ in 0..submesh_count {
            submeshes.push(read_submesh(&mut reader)?);
        }
        let consumed = reader.position() - start;
        if consumed != size_of_submeshes {
            return Err(Error::InvalidData(format!(
                "LOD {} declares {} submesh bytes but holds {}",
                lod_index, size_of_submeshes, consumed
            )));
        }

        lods.push(LodGroupView { threshold, submeshes });
    }
    reader.expect_end()?;
    Ok(lods)
}

/// Decode a geometry blob into an owned descriptor
///
/// Names are not part of the engine blob and come back empty.
pub fn unpack_geometry(blob: &[u8]) -> Result<GeometryDesc> {
    let lods = read_geometry_blob(blob)?;
    Ok(GeometryDesc {
        lods: lods
            .iter()
            .map(|lod| LodGroupDesc {
                name: String::new(),
                submeshes: lod
                    .submeshes
                    .iter()
                    .map(|view| SubmeshDesc {
                        name: String::new(),
                        element_type: view.element_type,
                        primitive_topology: view.primitive_topology,
                        element_size: view.element_size,
                        positions: view.decode_positions(),
                        elements: view.elements.to_vec(),
                        indices: view.decode_indices(),
                    })
                    .collect(),
            })
            .collect(),
    })
}

// ============================================================================
// IMPORT SETTINGS AND METADATA
// ============================================================================

/// Settings the mesh importer ran with, kept so a reimport is reproducible
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryImportSettings {
    /// Angle in degrees under which adjacent faces share normals
    pub smoothing_angle: f32,
    pub calculate_normals: bool,
    pub calculate_tangents: bool,
    pub reverse_handedness: bool,
    pub import_embedded_textures: bool,
    pub import_animations: bool,
}

impl Default for GeometryImportSettings {
    fn default() -> Self {
        Self {
            smoothing_angle: 178.0,
            calculate_normals: false,
            calculate_tangents: true,
            reverse_handedness: false,
            import_embedded_textures: true,
            import_animations: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmeshMetadata {
    pub name: String,
    pub element_type: ElementType,
    pub primitive_topology: PrimitiveTopology,
    pub vertex_count: u32,
    pub index_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LodMetadata {
    pub name: String,
    pub submeshes: Vec<SubmeshMetadata>,
}

/// Editor-side description of an imported mesh (`.mt` next to the `.mesh`)
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryMetadata {
    pub settings: GeometryImportSettings,
    pub lods: Vec<LodMetadata>,
}

impl GeometryMetadata {
    /// Summarize `desc` for the metadata file
    pub fn from_desc(desc: &GeometryDesc, settings: GeometryImportSettings) -> Self {
        Self {
            settings,
            lods: desc
                .lods
                .iter()
                .map(|lod| LodMetadata {
                    name: lod.name.clone(),
                    submeshes: lod
                        .submeshes
                        .iter()
                        .map(|submesh| SubmeshMetadata {
                            name: submesh.name.clone(),
                            element_type: submesh.element_type,
                            primitive_topology: submesh.primitive_topology,
                            vertex_count: submesh.vertex_count(),
                            index_count: submesh.index_count(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Write the mesh metadata blob
pub fn pack_geometry_metadata(metadata: &GeometryMetadata) -> Vec<u8> {
    let mut writer = BlobWriter::new();
    let settings = &metadata.settings;
    writer.write_f32(settings.smoothing_angle);
    writer.write_bool(settings.calculate_normals);
    writer.write_bool(settings.calculate_tangents);
    writer.write_bool(settings.reverse_handedness);
    writer.write_bool(settings.import_embedded_textures);
    writer.write_bool(settings.import_animations);

    writer.write_u32(metadata.lods.len() as u32);
    for lod in &metadata.lods {
        writer.write_str(&lod.name);
        writer.write_u32(lod.submeshes.len() as u32);
        for submesh in &lod.submeshes {
            writer.write_str(&submesh.name);
            writer.write_u32(submesh.element_type as u32);
            writer.write_u32(submesh.primitive_topology as u32);
            writer.write_u32(submesh.vertex_count);
            writer.write_u32(submesh.index_count);
        }
    }
    writer.finish()
}

/// Read the mesh metadata blob
pub fn unpack_geometry_metadata(blob: &[u8]) -> Result<GeometryMetadata> {
    let mut reader = BlobReader::new(blob);
    let settings = GeometryImportSettings {
        smoothing_angle: reader.read_f32()?,
        calculate_normals: reader.read_bool()?,
        calculate_tangents: reader.read_bool()?,
        reverse_handedness: reader.read_bool()?,
        import_embedded_textures: reader.read_bool()?,
        import_animations: reader.read_bool()?,
    };

    let lod_count = reader.read_u32()?;
    let mut lods = Vec::new();
    for _ in 0..lod_count {
        let name = reader.read_string()?;
        let submesh_count = reader.read_u32()?;
        let mut submeshes = Vec::new();
        for _ in 0..submesh_count {
            let name = reader.read_string()?;
            let raw_element_type = reader.read_u32()?;
            let raw_topology = reader.read_u32()?;
            submeshes.push(SubmeshMetadata {
                name,
                element_type: ElementType::from_u32(raw_element_type).ok_or_else(|| {
                    Error::InvalidData(format!("unknown element type {:#x}", raw_element_type))
                })?,
                primitive_topology: PrimitiveTopology::from_u32(raw_topology).ok_or_else(|| {
                    Error::InvalidData(format!("unknown primitive topology {}", raw_topology))
                })?,
                vertex_count: reader.read_u32()?,
                index_count: reader.read_u32()?,
            });
        }
        lods.push(LodMetadata { name, submeshes });
    }
    reader.expect_end()?;
    Ok(GeometryMetadata { settings, lods })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
