use super::*;
use crate::content::{SubresourceView, TextureFlags, TextureFormat};

fn triangle_view(positions: &[u8]) -> SubmeshView<'_> {
    SubmeshView {
        element_size: 0,
        vertex_count: 3,
        index_count: 3,
        element_type: ElementType::PositionOnly,
        primitive_topology: PrimitiveTopology::TriangleList,
        positions,
        elements: &[],
        indices: &[0, 0, 1, 0, 2, 0],
    }
}

fn texture_view(pixels: &[u8]) -> TextureView<'_> {
    TextureView {
        info: TextureInfo {
            width: 1,
            height: 1,
            array_size: 1,
            flags: TextureFlags::empty(),
            mip_levels: 1,
            format: TextureFormat::R8G8B8A8Unorm,
        },
        subresources: vec![SubresourceView { row_pitch: 4, slice_pitch: 4, pixels }],
    }
}

#[test]
fn test_submesh_is_copied() {
    let backend = HeadlessBackend::new();
    let positions = vec![1u8; 36];
    let id = backend.add_submesh(&triangle_view(&positions)).unwrap();
    drop(positions);

    let stored = backend.submesh(id).unwrap();
    assert_eq!(stored.vertex_count, 3);
    assert_eq!(stored.positions, vec![1u8; 36]);
    assert_eq!(stored.indices, vec![0, 0, 1, 0, 2, 0]);
    assert_eq!(backend.submesh_count(), 1);

    backend.remove_submesh(id);
    assert!(backend.submesh(id).is_none());
    assert_eq!(backend.submesh_count(), 0);
}

#[test]
fn test_texture_add_remove() {
    let backend = HeadlessBackend::new();
    let id = backend.add_texture(&texture_view(&[1, 2, 3, 4])).unwrap();
    assert_eq!(backend.texture_info(id).unwrap().width, 1);
    assert_eq!(backend.texture(id).unwrap().subresources, vec![vec![1, 2, 3, 4]]);
    backend.remove_texture(id);
    assert_eq!(backend.texture_count(), 0);
}

#[test]
fn test_material_requires_loaded_textures() {
    let backend = HeadlessBackend::new();
    let texture = backend.add_texture(&texture_view(&[0; 4])).unwrap();

    let mut info = MaterialInitInfo::default();
    info.texture_count = 1;
    info.texture_ids[0] = texture.id().raw();
    let material = backend.add_material(&info).unwrap();
    assert_eq!(backend.material(material), Some(info));

    backend.remove_texture(texture);
    assert!(matches!(backend.add_material(&info), Err(Error::BackendError(_))));
    assert_eq!(backend.material_count(), 1);
}

#[test]
fn test_kinds_have_separate_id_spaces() {
    let backend = HeadlessBackend::new();
    let positions = [0u8; 36];
    let submesh = backend.add_submesh(&triangle_view(&positions)).unwrap();
    let texture = backend.add_texture(&texture_view(&[0; 4])).unwrap();
    assert_eq!(submesh.id().index(), 0);
    assert_eq!(texture.id().index(), 0);
}

#[test]
#[should_panic(expected = "double remove")]
fn test_double_remove_panics() {
    let backend = HeadlessBackend::new();
    let id = backend.add_texture(&texture_view(&[0; 4])).unwrap();
    backend.remove_texture(id);
    backend.remove_texture(id);
}

#[test]
fn test_remove_recovers_poisoned_lock() {
    let backend = HeadlessBackend::new();
    let pixels = [7u8; 4];
    let id = backend.add_texture(&texture_view(&pixels)).unwrap();

    let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _guard = backend.textures.lock().unwrap();
        panic!("poison the texture list");
    }));
    assert!(poisoned.is_err());
    assert!(backend.textures.is_poisoned());

    backend.remove_texture(id);
    assert_eq!(backend.texture_count(), 0);
    assert!(backend.texture(id).is_none());
}
