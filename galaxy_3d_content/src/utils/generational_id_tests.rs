use super::*;

// ============================================================================
// Packing tests
// ============================================================================

#[test]
fn test_pack_round_trip_bounds() {
    let max_index = GenerationalId::INDEX_MASK - 1;
    for &index in &[0, 1, 2, 1000, 65_535, 65_536, max_index] {
        for generation in [0, 1, 127, 128, GenerationalId::MAX_GENERATION] {
            let id = GenerationalId::new(index, generation);
            assert_eq!(id.index(), index);
            assert_eq!(id.generation(), generation);
            assert!(id.is_valid());
        }
    }
}

#[test]
fn test_bit_layout() {
    assert_eq!(GenerationalId::INDEX_BITS, 24);
    assert_eq!(GenerationalId::MAX_GENERATION, 255);

    let id = GenerationalId::new(5, 2);
    assert_eq!(id.raw(), (2 << 24) | 5);
    assert_eq!(GenerationalId::from_raw(id.raw()), id);
}

#[test]
fn test_invalid_sentinel() {
    assert!(!GenerationalId::INVALID.is_valid());
    assert_eq!(GenerationalId::INVALID.raw(), u32::MAX);
    assert_eq!(GenerationalId::default(), GenerationalId::INVALID);
    assert_eq!(format!("{}", GenerationalId::INVALID), "invalid");
}

#[test]
fn test_max_generation_never_yields_invalid() {
    let id = GenerationalId::new(GenerationalId::INDEX_MASK - 1, GenerationalId::MAX_GENERATION);
    assert!(id.is_valid());
    assert_ne!(id, GenerationalId::INVALID);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_reserved_index_pattern_rejected() {
    GenerationalId::new(GenerationalId::INDEX_MASK, 0);
}

#[test]
#[should_panic(expected = "generation 256 out of range")]
fn test_generation_overflow_rejected() {
    GenerationalId::new(0, 256);
}

// ============================================================================
// Generation tests
// ============================================================================

#[test]
fn test_next_generation_keeps_index() {
    let id = GenerationalId::new(9, 0);
    let next = id.next_generation();
    assert_eq!(next.index(), 9);
    assert_eq!(next.generation(), 1);
    assert_ne!(id, next);
}

#[test]
fn test_next_generation_wraps() {
    let id = GenerationalId::new(3, GenerationalId::MAX_GENERATION);
    let wrapped = id.next_generation();
    assert_eq!(wrapped.generation(), 0);
    assert_eq!(wrapped.index(), 3);
}

#[test]
fn test_display() {
    assert_eq!(format!("{}", GenerationalId::new(12, 4)), "12v4");
}

// ============================================================================
// Typed id tests
// ============================================================================

crate::typed_id! {
    struct LightId;
}

#[test]
fn test_typed_id_conversions() {
    let raw = GenerationalId::new(11, 1);
    let typed = LightId::from(raw);
    assert_eq!(typed.id(), raw);
    assert_eq!(GenerationalId::from(typed), raw);
    assert!(typed.is_valid());
    assert!(!LightId::default().is_valid());
    assert_eq!(LightId::INVALID, LightId::default());
    assert_eq!(format!("{}", typed), "LightId(11v1)");
}
