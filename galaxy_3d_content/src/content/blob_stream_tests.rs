use super::*;

#[test]
fn test_align_size_up_4() {
    assert_eq!(align_size_up_4(0), 0);
    assert_eq!(align_size_up_4(1), 4);
    assert_eq!(align_size_up_4(4), 4);
    assert_eq!(align_size_up_4(5), 8);
    assert_eq!(align_size_up_4(12), 12);
}

#[test]
fn test_scalars_are_little_endian() {
    let mut writer = BlobWriter::new();
    writer.write_u32(0x0403_0201);
    writer.write_u16(0x0605);
    writer.write_u8(7);
    let blob = writer.finish();
    assert_eq!(blob, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_scalar_sequence_reads_back() {
    let mut writer = BlobWriter::new();
    writer.write_u32(42);
    writer.write_f32(-1.5);
    writer.write_u64(u64::MAX - 1);
    writer.write_bool(true);
    writer.write_str("albedo");
    let blob = writer.finish();

    let mut reader = BlobReader::new(&blob);
    assert_eq!(reader.read_u32().unwrap(), 42);
    assert_eq!(reader.read_f32().unwrap(), -1.5);
    assert_eq!(reader.read_u64().unwrap(), u64::MAX - 1);
    assert!(reader.read_bool().unwrap());
    assert_eq!(reader.read_string().unwrap(), "albedo");
    reader.expect_end().unwrap();
}

#[test]
fn test_padded_bytes() {
    let mut writer = BlobWriter::new();
    writer.write_padded_bytes(&[9, 9, 9, 9, 9]);
    writer.write_u32(1);
    let blob = writer.finish();
    assert_eq!(blob.len(), 8 + 4);
    assert_eq!(&blob[5..8], &[0, 0, 0]);

    let mut reader = BlobReader::new(&blob);
    assert_eq!(reader.read_padded_bytes(5).unwrap(), &[9, 9, 9, 9, 9]);
    assert_eq!(reader.read_u32().unwrap(), 1);
    reader.expect_end().unwrap();
}

#[test]
fn test_truncated_read_is_invalid_data() {
    let blob = [1u8, 2, 3];
    let mut reader = BlobReader::new(&blob);
    match reader.read_u32() {
        Err(Error::InvalidData(msg)) => assert!(msg.contains("truncated")),
        other => panic!("expected InvalidData, got {:?}", other),
    }
    // Failed read does not advance
    assert_eq!(reader.position(), 0);
}

#[test]
fn test_expect_end_reports_trailing_bytes() {
    let blob = [0u8; 6];
    let mut reader = BlobReader::new(&blob);
    reader.read_u32().unwrap();
    assert_eq!(reader.remaining(), 2);
    assert!(matches!(reader.expect_end(), Err(Error::InvalidData(_))));
    reader.skip(2).unwrap();
    reader.expect_end().unwrap();
}

#[test]
fn test_invalid_utf8_string() {
    let mut writer = BlobWriter::new();
    writer.write_u32(2);
    writer.write_bytes(&[0xC3, 0x28]);
    let blob = writer.finish();
    assert!(BlobReader::new(&blob).read_string().is_err());
}
