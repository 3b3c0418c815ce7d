//! Texture blob formats.
//!
//! Two blobs describe an imported texture:
//!
//! - the editor metadata blob (`.mt`): import settings, texture info, the
//!   IBL pair handle and every subresource with its dimensions
//! - the engine blob (`.tex`): texture info and the subresource bytes only
//!
//! Subresources are stored array-major: all mips of array slice 0, then all
//! mips of slice 1, and so on. Cube maps store 6 slices per cube, volume
//! maps store one slice per depth layer.
//!
//! Engine blob layout:
//!
//! ```text
//! u32 width, u32 height, u32 array_size, u32 flags, u32 mip_levels, u32 format
//! per (array slice, mip):
//!     u32 row_pitch
//!     u32 slice_pitch
//!     bytes pixels[slice_pitch]
//! ```

use bitflags::bitflags;
use crate::asset::AssetHandle;
use crate::content::blob_stream::{BlobReader, BlobWriter};
use crate::engine_bail;
use crate::error::{Error, Result};

// ============================================================================
// FORMAT AND FLAGS
// ============================================================================

/// Pixel format of a texture (values match DXGI_FORMAT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum TextureFormat {
    #[default]
    Unknown = 0,
    R32G32B32A32Float = 2,
    R16G16B16A16Float = 10,
    R8G8B8A8Unorm = 28,
    R8G8B8A8UnormSrgb = 29,
    R32Float = 41,
    R8G8Unorm = 49,
    R8Unorm = 61,
    Bc1Unorm = 71,
    Bc1UnormSrgb = 72,
    Bc3Unorm = 77,
    Bc3UnormSrgb = 78,
    Bc4Unorm = 80,
    Bc5Unorm = 83,
    B8G8R8A8Unorm = 87,
    B8G8R8A8UnormSrgb = 91,
    Bc6hUf16 = 95,
    Bc7Unorm = 98,
    Bc7UnormSrgb = 99,
}

impl TextureFormat {
    pub fn from_u32(value: u32) -> Option<Self> {
        use TextureFormat::*;
        let format = match value {
            0 => Unknown,
            2 => R32G32B32A32Float,
            10 => R16G16B16A16Float,
            28 => R8G8B8A8Unorm,
            29 => R8G8B8A8UnormSrgb,
            41 => R32Float,
            49 => R8G8Unorm,
            61 => R8Unorm,
            71 => Bc1Unorm,
            72 => Bc1UnormSrgb,
            77 => Bc3Unorm,
            78 => Bc3UnormSrgb,
            80 => Bc4Unorm,
            83 => Bc5Unorm,
            87 => B8G8R8A8Unorm,
            91 => B8G8R8A8UnormSrgb,
            95 => Bc6hUf16,
            98 => Bc7Unorm,
            99 => Bc7UnormSrgb,
            _ => return None,
        };
        Some(format)
    }

    /// Block-compressed formats store 4x4 pixel blocks
    pub fn is_block_compressed(self) -> bool {
        matches!(
            self,
            Self::Bc1Unorm
                | Self::Bc1UnormSrgb
                | Self::Bc3Unorm
                | Self::Bc3UnormSrgb
                | Self::Bc4Unorm
                | Self::Bc5Unorm
                | Self::Bc6hUf16
                | Self::Bc7Unorm
                | Self::Bc7UnormSrgb
        )
    }

    pub fn is_srgb(self) -> bool {
        matches!(
            self,
            Self::R8G8B8A8UnormSrgb | Self::Bc1UnormSrgb | Self::Bc3UnormSrgb
                | Self::B8G8R8A8UnormSrgb | Self::Bc7UnormSrgb
        )
    }
}

bitflags! {
    /// Texture property bits stored in the blob header
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextureFlags: u32 {
        const IS_HDR = 0x01;
        const HAS_ALPHA = 0x02;
        const IS_PREMULTIPLIED_ALPHA = 0x04;
        const IS_IMPORTED_AS_NORMAL_MAP = 0x08;
        const IS_CUBE_MAP = 0x10;
        const IS_VOLUME_MAP = 0x20;
        const IS_SRGB = 0x40;
    }
}

/// Texture shape requested at import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum TextureDimension {
    Texture1D = 0,
    #[default]
    Texture2D = 1,
    Texture2DArray = 2,
    TextureCube = 3,
    Texture3D = 4,
}

impl TextureDimension {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Texture1D),
            1 => Some(Self::Texture2D),
            2 => Some(Self::Texture2DArray),
            3 => Some(Self::TextureCube),
            4 => Some(Self::Texture3D),
            _ => None,
        }
    }
}

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// Settings the texture importer ran with
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImportSettings {
    /// Source image paths, `;`-separated (several for arrays and cube faces)
    pub sources: String,
    pub dimension: TextureDimension,
    /// 0 = full mip chain
    pub mip_levels: u32,
    pub alpha_threshold: f32,
    pub prefer_bc7: bool,
    pub output_format: TextureFormat,
    pub compress: bool,
}

impl Default for TextureImportSettings {
    fn default() -> Self {
        Self {
            sources: String::new(),
            dimension: TextureDimension::Texture2D,
            mip_levels: 0,
            alpha_threshold: 0.5,
            prefer_bc7: true,
            output_format: TextureFormat::Bc7Unorm,
            compress: true,
        }
    }
}

impl TextureImportSettings {
    /// Individual source paths
    pub fn source_list(&self) -> impl Iterator<Item = &str> {
        self.sources.split(';').filter(|s| !s.is_empty())
    }
}

/// Texture header shared by both blobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub array_size: u32,
    pub flags: TextureFlags,
    pub mip_levels: u32,
    pub format: TextureFormat,
}

impl TextureInfo {
    /// Number of subresources (`array_size * mip_levels`)
    ///
    /// Blob readers reject headers where this product overflows.
    pub fn subresource_count(&self) -> u32 {
        self.array_size * self.mip_levels
    }

    /// Position of (array slice, mip) in the array-major subresource list
    pub fn subresource_index(&self, array_slice: u32, mip: u32) -> u32 {
        array_slice * self.mip_levels + mip
    }
}

/// One subresource of an imported texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSlice {
    pub width: u32,
    pub height: u32,
    pub row_pitch: u32,
    pub slice_pitch: u32,
    /// `slice_pitch` bytes
    pub pixels: Vec<u8>,
}

/// Complete imported texture (what the metadata blob holds)
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    pub info: TextureInfo,
    pub import_settings: TextureImportSettings,
    /// Diffuse/specular IBL counterpart, [`AssetHandle::INVALID`] if none
    pub ibl_pair: AssetHandle,
    /// Array-major subresources
    pub slices: Vec<TextureSlice>,
}

/// Borrowed subresource inside an engine blob
#[derive(Debug, Clone, Copy)]
pub struct SubresourceView<'a> {
    pub row_pitch: u32,
    pub slice_pitch: u32,
    pub pixels: &'a [u8],
}

/// Borrowed view of an engine texture blob, handed to the render backend
#[derive(Debug, Clone)]
pub struct TextureView<'a> {
    pub info: TextureInfo,
    pub subresources: Vec<SubresourceView<'a>>,
}

// ============================================================================
// HELPERS
// ============================================================================

fn write_info(writer: &mut BlobWriter, info: &TextureInfo) {
    writer.write_u32(info.width);
    writer.write_u32(info.height);
    writer.write_u32(info.array_size);
    writer.write_u32(info.flags.bits());
    writer.write_u32(info.mip_levels);
    writer.write_u32(info.format as u32);
}

fn read_info(reader: &mut BlobReader<'_>) -> Result<TextureInfo> {
    let width = reader.read_u32()?;
    let height = reader.read_u32()?;
    let array_size = reader.read_u32()?;
    let raw_flags = reader.read_u32()?;
    let mip_levels = reader.read_u32()?;
    let raw_format = reader.read_u32()?;

    let flags = TextureFlags::from_bits(raw_flags)
        .ok_or_else(|| Error::InvalidData(format!("unknown texture flags {:#x}", raw_flags)))?;
    let format = TextureFormat::from_u32(raw_format)
        .ok_or_else(|| Error::InvalidData(format!("unknown texture format {}", raw_format)))?;
    if width == 0 || height == 0 || array_size == 0 || mip_levels == 0 {
        return Err(Error::InvalidData(format!(
            "degenerate texture {}x{} ({} slices, {} mips)",
            width, height, array_size, mip_levels
        )));
    }
    if array_size.checked_mul(mip_levels).is_none() {
        return Err(Error::InvalidData(format!(
            "texture subresource count overflows ({} slices x {} mips)", array_size, mip_levels
        )));
    }
    Ok(TextureInfo { width, height, array_size, flags, mip_levels, format })
}

fn validate_desc(desc: &TextureDesc) -> Result<()> {
    let info = &desc.info;
    if info.width == 0 || info.height == 0 || info.array_size == 0 || info.mip_levels == 0 {
        engine_bail!("galaxy3d::Texture",
            "Degenerate texture {}x{} ({} slices, {} mips)",
            info.width, info.height, info.array_size, info.mip_levels);
    }
    if info.array_size.checked_mul(info.mip_levels).is_none() {
        engine_bail!("galaxy3d::Texture",
            "Texture subresource count overflows ({} slices x {} mips)", info.array_size, info.mip_levels);
    }
    if desc.slices.len() != info.subresource_count() as usize {
        engine_bail!("galaxy3d::Texture",
            "Texture has {} subresources, expected {} ({} slices x {} mips)",
            desc.slices.len(), info.subresource_count(), info.array_size, info.mip_levels);
    }
    if info.flags.contains(TextureFlags::IS_CUBE_MAP) && info.array_size % 6 != 0 {
        engine_bail!("galaxy3d::Texture",
            "Cube map array size {} is not a multiple of 6", info.array_size);
    }
    for (index, slice) in desc.slices.iter().enumerate() {
        if slice.pixels.len() != slice.slice_pitch as usize {
            engine_bail!("galaxy3d::Texture",
                "Subresource {} holds {} bytes, slice pitch is {}",
                index, slice.pixels.len(), slice.slice_pitch);
        }
    }
    Ok(())
}

// ============================================================================
// METADATA BLOB
// ============================================================================

/// Write the editor metadata blob
pub fn pack_texture_metadata(desc: &TextureDesc) -> Result<Vec<u8>> {
    validate_desc(desc)?;

    let mut writer = BlobWriter::new();
    let settings = &desc.import_settings;
    writer.write_str(&settings.sources);
    writer.write_u32(settings.dimension as u32);
    writer.write_u32(settings.mip_levels);
    writer.write_f32(settings.alpha_threshold);
    writer.write_bool(settings.prefer_bc7);
    writer.write_u32(settings.output_format as u32);
    writer.write_bool(settings.compress);

    write_info(&mut writer, &desc.info);
    writer.write_u64(desc.ibl_pair.raw());

    for slice in &desc.slices {
        writer.write_u32(slice.width);
        writer.write_u32(slice.height);
        writer.write_u32(slice.row_pitch);
        writer.write_u32(slice.slice_pitch);
        writer.write_bytes(&slice.pixels);
    }
    Ok(writer.finish())
}

/// Read the editor metadata blob
pub fn unpack_texture_metadata(blob: &[u8]) -> Result<TextureDesc> {
    let mut reader = BlobReader::new(blob);

    let sources = reader.read_string()?;
    let raw_dimension = reader.read_u32()?;
    let mip_levels = reader.read_u32()?;
    let alpha_threshold = reader.read_f32()?;
    let prefer_bc7 = reader.read_bool()?;
    let raw_output_format = reader.read_u32()?;
    let compress = reader.read_bool()?;
    let import_settings = TextureImportSettings {
        sources,
        dimension: TextureDimension::from_u32(raw_dimension)
            .ok_or_else(|| Error::InvalidData(format!("unknown texture dimension {}", raw_dimension)))?,
        mip_levels,
        alpha_threshold,
        prefer_bc7,
        output_format: TextureFormat::from_u32(raw_output_format)
            .ok_or_else(|| Error::InvalidData(format!("unknown texture format {}", raw_output_format)))?,
        compress,
    };

    let info = read_info(&mut reader)?;
    let ibl_pair = AssetHandle::from_raw(reader.read_u64()?);

    let mut slices = Vec::with_capacity(info.subresource_count().min(1024) as usize);
    for _ in 0..info.subresource_count() {
        let width = reader.read_u32()?;
        let height = reader.read_u32()?;
        let row_pitch = reader.read_u32()?;
        let slice_pitch = reader.read_u32()?;
        let pixels = reader.read_bytes(slice_pitch as usize)?.to_vec();
        slices.push(TextureSlice { width, height, row_pitch, slice_pitch, pixels });
    }
    reader.expect_end()?;

    Ok(TextureDesc { info, import_settings, ibl_pair, slices })
}

// ============================================================================
// ENGINE BLOB
// ============================================================================

/// Write the engine blob (`.tex`)
pub fn pack_texture(desc: &TextureDesc) -> Result<Vec<u8>> {
    validate_desc(desc)?;

    let pixel_bytes: usize = desc.slices.iter().map(|s| s.pixels.len() + 8).sum();
    let mut writer = BlobWriter::with_capacity(24 + pixel_bytes);
    write_info(&mut writer, &desc.info);
    for slice in &desc.slices {
        writer.write_u32(slice.row_pitch);
        writer.write_u32(slice.slice_pitch);
        writer.write_bytes(&slice.pixels);
    }
    Ok(writer.finish())
}

/// Parse an engine blob into a borrowed view
pub fn read_texture_blob(blob: &[u8]) -> Result<TextureView<'_>> {
    let mut reader = BlobReader::new(blob);
    let info = read_info(&mut reader)?;

    let count = info.subresource_count();
    let mut subresources = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        let row_pitch = reader.read_u32()?;
        let slice_pitch = reader.read_u32()?;
        let pixels = reader.read_bytes(slice_pitch as usize)?;
        subresources.push(SubresourceView { row_pitch, slice_pitch, pixels });
    }
    reader.expect_end()?;

    Ok(TextureView { info, subresources })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
