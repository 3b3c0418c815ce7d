use super::*;

#[test]
fn test_blob_size_is_fixed() {
    // 2 + 5 + 8 + 4 + 3 + 4 scalars of 4 bytes, no padding
    assert_eq!(MaterialInitInfo::BLOB_SIZE, 26 * 4);
    assert_eq!(pack_material(&MaterialInitInfo::default()).len(), MaterialInitInfo::BLOB_SIZE);
}

#[test]
fn test_blob_starts_with_material_type() {
    let info = MaterialInitInfo { material_type: MaterialType::Transparent as u32, ..Default::default() };
    let blob = pack_material(&info);
    assert_eq!(&blob[0..4], &2u32.to_le_bytes());
}

#[test]
fn test_unpack_from_unaligned_buffer() {
    let mut info = MaterialInitInfo::default();
    info.texture_count = 2;
    info.texture_ids[0] = 4;
    info.texture_ids[1] = 9;
    info.set_shader_id(ShaderStage::Pixel, 3);
    info.metallic = 0.25;

    // Offset by one byte so the slice is not 4-byte aligned
    let mut buffer = vec![0u8];
    buffer.extend_from_slice(&pack_material(&info));
    let read = unpack_material(&buffer[1..]).unwrap();

    assert_eq!(read, info);
    assert_eq!(read.textures(), &[4, 9]);
    assert_eq!(read.shader_id(ShaderStage::Pixel), 3);
    assert_eq!(read.shader_id(ShaderStage::Vertex), NO_ID);
}

#[test]
fn test_unpack_rejects_wrong_size() {
    let blob = pack_material(&MaterialInitInfo::default());
    assert!(matches!(unpack_material(&blob[..blob.len() - 4]), Err(Error::InvalidData(_))));
}

#[test]
fn test_unpack_rejects_bad_fields() {
    let info = MaterialInitInfo { material_type: 7, ..Default::default() };
    assert!(unpack_material(&pack_material(&info)).is_err());

    let info = MaterialInitInfo { texture_count: 9, ..Default::default() };
    assert!(unpack_material(&pack_material(&info)).is_err());
}

#[test]
fn test_default_has_no_bindings() {
    let info = MaterialInitInfo::default();
    assert!(info.textures().is_empty());
    assert!(info.shader_ids.iter().all(|&id| id == NO_ID));
    assert_eq!(info.roughness, 1.0);
}
