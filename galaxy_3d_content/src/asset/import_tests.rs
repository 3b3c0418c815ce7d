use super::*;
use std::fs;
use crate::config::ContentConfig;
use crate::content::geometry::{read_geometry_blob, unpack_geometry_metadata};
use crate::content::material::unpack_material;
use crate::content::shader::unpack_shader_group;
use crate::content::texture::{read_texture_blob, unpack_texture_metadata};
use crate::content::{
    ElementType, LodGroupDesc, PrimitiveTopology, SubmeshDesc, TextureFlags, TextureFormat,
    TextureImportSettings, TextureInfo, TextureSlice,
};

fn texture_desc(fill: u8) -> TextureDesc {
    TextureDesc {
        info: TextureInfo {
            width: 2,
            height: 1,
            array_size: 1,
            flags: TextureFlags::HAS_ALPHA,
            mip_levels: 1,
            format: TextureFormat::R8G8B8A8Unorm,
        },
        import_settings: TextureImportSettings { sources: "rock.png".to_string(), ..Default::default() },
        ibl_pair: AssetHandle::INVALID,
        slices: vec![TextureSlice { width: 2, height: 1, row_pitch: 8, slice_pitch: 8, pixels: vec![fill; 8] }],
    }
}

fn quad_desc() -> GeometryDesc {
    GeometryDesc {
        lods: vec![LodGroupDesc {
            name: "lod0".to_string(),
            submeshes: vec![SubmeshDesc {
                name: "quad".to_string(),
                element_type: ElementType::PositionOnly,
                primitive_topology: PrimitiveTopology::TriangleList,
                element_size: 0,
                positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
                elements: Vec::new(),
                indices: vec![0, 1, 2, 0, 2, 3],
            }],
        }],
    }
}

#[test]
fn test_import_texture_writes_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let registry = AssetRegistry::new(&ContentConfig::with_asset_root(dir.path()));
    let original = dir.path().join("textures/rock.png");

    let handle = import_texture(&registry, &original, &texture_desc(9)).unwrap();
    let asset = registry.get_asset(handle).unwrap();
    assert_eq!(asset.asset_type, AssetType::Texture);
    assert_eq!(asset.imported_path, dir.path().join("textures/rock.tex"));

    let engine = fs::read(&asset.imported_path).unwrap();
    assert_eq!(read_texture_blob(&engine).unwrap().subresources[0].pixels, &[9; 8]);

    let metadata = fs::read(dir.path().join("textures/rock.mt")).unwrap();
    assert_eq!(unpack_texture_metadata(&metadata).unwrap(), texture_desc(9));
}

#[test]
fn test_reimport_updates_existing_asset() {
    let dir = tempfile::tempdir().unwrap();
    let registry = AssetRegistry::new(&ContentConfig::with_asset_root(dir.path()));
    let original = dir.path().join("rock.png");

    let first = import_texture(&registry, &original, &texture_desc(1)).unwrap();
    let second = import_texture(&registry, &original, &texture_desc(2)).unwrap();

    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);
    let engine = fs::read(dir.path().join("rock.tex")).unwrap();
    assert_eq!(read_texture_blob(&engine).unwrap().subresources[0].pixels, &[2; 8]);
}

#[test]
fn test_import_rediscovered_asset_keeps_handle() {
    let dir = tempfile::tempdir().unwrap();
    let registry = AssetRegistry::new(&ContentConfig::with_asset_root(dir.path()));
    let original = dir.path().join("rock.png");
    let scanned = registry.register_asset(Asset::new(AssetType::Texture, original.clone(), ""));

    let imported = import_texture(&registry, &original, &texture_desc(0)).unwrap();
    assert_eq!(imported, scanned);
    assert!(registry.get_asset(scanned).unwrap().is_imported());
}

#[test]
fn test_invalid_texture_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let registry = AssetRegistry::new(&ContentConfig::with_asset_root(dir.path()));
    let mut desc = texture_desc(0);
    desc.slices.clear();

    assert!(import_texture(&registry, &dir.path().join("bad.png"), &desc).is_err());
    assert!(!dir.path().join("bad.tex").exists());
    assert!(registry.is_empty());
}

#[test]
fn test_import_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let registry = AssetRegistry::new(&ContentConfig::with_asset_root(dir.path()));
    let original = dir.path().join("quad.fbx");

    let handle = import_geometry(&registry, &original, &quad_desc(), GeometryImportSettings::default()).unwrap();
    let asset = registry.get_asset(handle).unwrap();
    assert_eq!(asset.imported_path, dir.path().join("quad.mesh"));

    let engine = fs::read(&asset.imported_path).unwrap();
    let lods = read_geometry_blob(&engine).unwrap();
    assert_eq!(lods[0].submeshes[0].index_count, 6);

    let metadata = unpack_geometry_metadata(&fs::read(dir.path().join("quad.mt")).unwrap()).unwrap();
    assert_eq!(metadata.lods[0].submeshes[0].name, "quad");
}

#[test]
fn test_import_material_and_shader_group() {
    let dir = tempfile::tempdir().unwrap();
    let registry = AssetRegistry::new(&ContentConfig::with_asset_root(dir.path()));

    let info = MaterialInitInfo { metallic: 0.5, ..Default::default() };
    let material = import_material(&registry, &dir.path().join("stone.mat"), &info).unwrap();
    let material = registry.get_asset(material).unwrap();
    assert_eq!(material.original_path, material.imported_path);
    assert_eq!(unpack_material(&fs::read(&material.imported_path).unwrap()).unwrap(), info);

    let shaders = vec![(0, CompiledShader::new(vec![1, 2, 3], [0; 16]))];
    let shader = import_shader_group(&registry, &dir.path().join("lit.hlsl"), &shaders).unwrap();
    let shader = registry.get_asset(shader).unwrap();
    assert_eq!(shader.imported_path, dir.path().join("lit.sd"));
    assert_eq!(unpack_shader_group(&fs::read(&shader.imported_path).unwrap()).unwrap(), shaders);
}
