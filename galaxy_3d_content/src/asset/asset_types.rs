use std::path::{Path, PathBuf};
use crate::resource::ResourceId;

// ============================================================================
// ASSET TYPE
// ============================================================================

/// Kind of content an asset holds
///
/// The set is closed: every `match` on it is exhaustive, so adding a kind
/// forces every dispatch site to decide what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum AssetType {
    Unknown = 0,
    Mesh = 1,
    Texture = 2,
    PhysicsShape = 3,
    Animation = 4,
    Audio = 5,
    Material = 6,
    Shader = 7,
    Skeleton = 8,
}

impl AssetType {
    pub const COUNT: usize = 9;

    pub const ALL: [AssetType; Self::COUNT] = [
        AssetType::Unknown,
        AssetType::Mesh,
        AssetType::Texture,
        AssetType::PhysicsShape,
        AssetType::Animation,
        AssetType::Audio,
        AssetType::Material,
        AssetType::Shader,
        AssetType::Skeleton,
    ];

    pub fn from_u32(value: u32) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Extension (with dot) of the engine-facing file for this kind
    pub fn engine_extension(self) -> &'static str {
        match self {
            AssetType::Unknown => "",
            AssetType::Mesh => ".mesh",
            AssetType::Texture => ".tex",
            AssetType::PhysicsShape => ".phys",
            AssetType::Animation => ".anim",
            AssetType::Audio => ".audio",
            AssetType::Material => ".mat",
            AssetType::Shader => ".sd",
            AssetType::Skeleton => ".skel",
        }
    }

    /// Source file extensions (lowercase, no dot) an asset scan recognizes
    pub fn source_extensions(self) -> &'static [&'static str] {
        match self {
            AssetType::Mesh => &["fbx", "obj", "gltf", "glb"],
            AssetType::Texture => &["png", "jpg", "jpeg", "tga", "bmp", "dds", "hdr", "tif", "tiff"],
            AssetType::Audio => &["wav", "ogg", "mp3"],
            AssetType::Material => &["mat"],
            AssetType::Shader => &["hlsl"],
            AssetType::Unknown
            | AssetType::PhysicsShape
            | AssetType::Animation
            | AssetType::Skeleton => &[],
        }
    }

    /// Kind whose source extensions include `extension` (case-insensitive)
    pub fn from_source_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|ty| ty.source_extensions().contains(&extension.as_str()))
    }
}

/// Extension (with dot) of editor metadata files paired with imported files
pub const METADATA_EXTENSION: &str = ".mt";

/// Path of the metadata file paired with an engine-facing file
pub fn metadata_path_for(imported_path: &Path) -> PathBuf {
    imported_path.with_extension(&METADATA_EXTENSION[1..])
}

/// Path of the engine-facing file for `original_path` imported as `asset_type`
pub fn imported_path_for(original_path: &Path, asset_type: AssetType) -> PathBuf {
    let extension = asset_type.engine_extension();
    original_path.with_extension(extension.strip_prefix('.').unwrap_or(extension))
}

// ============================================================================
// ASSET HANDLE
// ============================================================================

/// Persistent identity of an asset across editor sessions
///
/// Handles are uniformly random 64-bit values, stored in the registry file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct AssetHandle(u64);

impl AssetHandle {
    /// "No asset" sentinel
    pub const INVALID: Self = Self(u64::MAX);

    /// Draw a fresh random handle
    pub fn generate() -> Self {
        loop {
            let handle = Self(rand::random::<u64>());
            if handle.is_valid() {
                return handle;
            }
        }
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl Default for AssetHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl std::fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

// ============================================================================
// ASSET
// ============================================================================

/// Registry record of one asset
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub asset_type: AssetType,
    /// Display name (file stem of the original file)
    pub name: String,
    /// Source file the asset was imported from
    pub original_path: PathBuf,
    /// Engine-facing file, empty until imported
    pub imported_path: PathBuf,
    /// Optional secondary resource (editor thumbnail)
    pub auxiliary_id: ResourceId,
    /// Assets generated from this one (e.g. textures embedded in a mesh)
    pub related_count: u32,
}

impl Asset {
    pub fn new(asset_type: AssetType, original_path: impl Into<PathBuf>, imported_path: impl Into<PathBuf>) -> Self {
        let original_path = original_path.into();
        let name = original_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            asset_type,
            name,
            original_path,
            imported_path: imported_path.into(),
            auxiliary_id: ResourceId::INVALID,
            related_count: 0,
        }
    }

    /// Whether an engine-facing file has been produced
    pub fn is_imported(&self) -> bool {
        !self.imported_path.as_os_str().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "asset_types_tests.rs"]
mod tests;
