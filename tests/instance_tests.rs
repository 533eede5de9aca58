//! Instance tests: field access, buffer binding and nested views

use std::mem::{offset_of, size_of};

use memlayout::{
    types::{
        array_of, bool_type, char, double, float32, float64, int, int16, int32, int64, int8,
        ref_type, size_t, uint16, uint32, uint64, uint8,
    },
    ByteBuffer, LayoutError, Result, StructInstance, StructType, TypeRef, Value,
};

#[cfg(test)]
mod instance_tests {
    use super::*;

    fn all_primitives() -> StructType {
        StructType::new(
            "Primitives",
            vec![
                ("flag", bool_type()),
                ("i8_field", int8()),
                ("u8_field", uint8()),
                ("i16_field", int16()),
                ("u16_field", uint16()),
                ("i32_field", int32()),
                ("u32_field", uint32()),
                ("i64_field", int64()),
                ("u64_field", uint64()),
                ("f32_field", float32()),
                ("f64_field", float64()),
                ("size", size_t()),
            ],
        )
        .unwrap()
    }

    /// Test: both bounds of every primitive survive a write and read
    #[test]
    fn test_primitive_extremes() -> Result<()> {
        let ty = all_primitives();
        let instance = ty.instantiate();

        let lower: Vec<(&str, Value)> = vec![
            ("flag", Value::Bool(false)),
            ("i8_field", Value::I8(i8::MIN)),
            ("u8_field", Value::U8(u8::MIN)),
            ("i16_field", Value::I16(i16::MIN)),
            ("u16_field", Value::U16(u16::MIN)),
            ("i32_field", Value::I32(i32::MIN)),
            ("u32_field", Value::U32(u32::MIN)),
            ("i64_field", Value::I64(i64::MIN)),
            ("u64_field", Value::U64(u64::MIN)),
            ("f32_field", Value::F32(f32::MIN)),
            ("f64_field", Value::F64(f64::MIN)),
            ("size", Value::U64(0)),
        ];
        let upper: Vec<(&str, Value)> = vec![
            ("flag", Value::Bool(true)),
            ("i8_field", Value::I8(i8::MAX)),
            ("u8_field", Value::U8(u8::MAX)),
            ("i16_field", Value::I16(i16::MAX)),
            ("u16_field", Value::U16(u16::MAX)),
            ("i32_field", Value::I32(i32::MAX)),
            ("u32_field", Value::U32(u32::MAX)),
            ("i64_field", Value::I64(i64::MAX)),
            ("u64_field", Value::U64(u64::MAX)),
            ("f32_field", Value::F32(f32::MAX)),
            ("f64_field", Value::F64(f64::MAX)),
            ("size", Value::U64(usize::MAX as u64)),
        ];

        for cases in [upper, lower] {
            for (name, value) in &cases {
                instance.set(name, value.clone())?;
            }
            for (name, value) in &cases {
                assert_eq!(&instance.get(name)?, value, "field {}", name);
            }
        }

        instance.set("f64_field", f64::MIN_POSITIVE)?;
        assert_eq!(instance.get("f64_field")?, Value::F64(f64::MIN_POSITIVE));
        Ok(())
    }

    /// Test: integer values convert across widths when they fit
    #[test]
    fn test_integer_conversions() -> Result<()> {
        let ty = all_primitives();
        let instance = ty.instantiate();

        instance.set("u8_field", 200i32)?;
        assert_eq!(instance.get_as::<u8>("u8_field")?, 200);

        instance.set("i64_field", -5i8)?;
        assert_eq!(instance.get_as::<i64>("i64_field")?, -5);

        instance.set("f64_field", 3)?;
        assert_eq!(instance.get_as::<f64>("f64_field")?, 3.0);

        instance.set("flag", 1)?;
        assert!(instance.get_as::<bool>("flag")?);
        Ok(())
    }

    /// Test: values that do not fit or have the wrong kind are rejected
    #[test]
    fn test_rejected_values_leave_bytes_alone() -> Result<()> {
        let ty = all_primitives();
        let instance = ty.instantiate();
        instance.set("i8_field", 5)?;

        assert!(matches!(
            instance.set("i8_field", 300),
            Err(LayoutError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            instance.set("u32_field", -1),
            Err(LayoutError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            instance.set("i32_field", 1.5f64),
            Err(LayoutError::TypeMismatch { .. })
        ));
        assert_eq!(instance.get("i8_field")?, Value::I8(5));
        assert_eq!(instance.get("u32_field")?, Value::U32(0));
        Ok(())
    }

    /// Test: unknown names fail on both read and write
    #[test]
    fn test_unknown_field() {
        let ty = all_primitives();
        let instance = ty.instantiate();

        assert!(matches!(
            instance.get("missing"),
            Err(LayoutError::UnknownField { .. })
        ));
        assert!(matches!(
            instance.set("missing", 1),
            Err(LayoutError::UnknownField { .. })
        ));
        assert!(matches!(
            StructInstance::with_values(&ty, [("i8_field", 1), ("missing", 2)]),
            Err(LayoutError::UnknownField { .. })
        ));
    }

    /// Test: instances bind to caller buffers without copying
    #[test]
    fn test_with_buffer_shares_bytes() -> Result<()> {
        let ty = StructType::new("Pair", [("a", char()), ("b", int())])?;
        let buffer = ByteBuffer::zeroed(16);
        let instance = StructInstance::with_buffer(&ty, buffer.clone())?;

        instance.set("b", 0x1234_5678)?;
        let mut raw = [0u8; 4];
        buffer.read_bytes(4, &mut raw)?;
        assert_eq!(i32::from_ne_bytes(raw), 0x1234_5678);

        buffer.write_bytes(0, &[42])?;
        assert_eq!(instance.get("a")?, Value::I8(42));

        assert!(instance.pointer().shares_storage(&buffer));
        assert_eq!(instance.to_bytes().len(), ty.size());
        Ok(())
    }

    /// Test: a short buffer is refused before the type freezes
    #[test]
    fn test_buffer_too_small() -> Result<()> {
        let mut ty = StructType::new("Wide", [("a", double())])?;
        let result = StructInstance::with_buffer(&ty, ByteBuffer::zeroed(ty.size() - 1));
        match result {
            Err(LayoutError::BufferTooSmall {
                required, actual, ..
            }) => {
                assert_eq!(required, 8);
                assert_eq!(actual, 7);
            }
            other => panic!("expected BufferTooSmall, got {:?}", other),
        }
        assert!(!ty.is_frozen());
        ty.define_field("b", char())?;
        assert_eq!(ty.size(), 16);
        Ok(())
    }

    /// Test: initial values are applied in order at construction
    #[test]
    fn test_with_values() -> Result<()> {
        let ty = StructType::new("Point", [("x", int32()), ("y", int32())])?;
        let point = StructInstance::with_values(&ty, [("y", 2), ("x", 1), ("y", 3)])?;
        assert_eq!(point.get("x")?, Value::I32(1));
        assert_eq!(point.get("y")?, Value::I32(3));

        let buffer = ByteBuffer::zeroed(ty.size());
        let view = StructInstance::with_buffer_and_values(&ty, buffer.clone(), [("x", -1)])?;
        assert_eq!(view.get_as::<i32>("x")?, -1);
        assert_eq!(buffer.to_vec()[..4], (-1i32).to_ne_bytes());
        Ok(())
    }

    /// Test: bytes written by memlayout read back as the equivalent C struct
    #[test]
    fn test_bytes_match_repr_c() -> Result<()> {
        #[repr(C)]
        struct Sample {
            tag: i8,
            count: i32,
            ratio: f64,
            small: u16,
        }

        let ty = StructType::new(
            "Sample",
            vec![
                ("tag", char()),
                ("count", int32()),
                ("ratio", double()),
                ("small", uint16()),
            ],
        )?;
        assert_eq!(ty.size(), size_of::<Sample>());
        assert_eq!(ty.offset_of("ratio"), Some(offset_of!(Sample, ratio)));

        let instance = StructInstance::with_values(
            &ty,
            vec![
                ("tag", Value::I8(-3)),
                ("count", Value::I32(77)),
                ("ratio", Value::F64(0.25)),
                ("small", Value::U16(9)),
            ],
        )?;
        let bytes = instance.to_bytes();
        // SAFETY: the buffer holds size_of::<Sample>() initialized bytes
        let sample: Sample = unsafe { std::ptr::read_unaligned(bytes.as_ptr() as *const Sample) };
        assert_eq!(sample.tag, -3);
        assert_eq!(sample.count, 77);
        assert_eq!(sample.ratio, 0.25);
        assert_eq!(sample.small, 9);
        Ok(())
    }

    /// Test: pointer fields hold raw addresses
    #[test]
    fn test_pointer_fields() -> Result<()> {
        let ty = StructType::new("Node", [("value", int()), ("next", ref_type(int()))])?;
        let node = ty.instantiate();
        node.set("next", Value::Pointer(0xdead_beef))?;
        assert_eq!(node.get("next")?, Value::Pointer(0xdead_beef));
        assert_eq!(ty.offset_of("next"), Some(size_of::<usize>().max(4)));
        Ok(())
    }

    /// Test: array fields read and write element lists
    #[test]
    fn test_array_fields() -> Result<()> {
        let ty = StructType::new("Samples", [("count", uint8()), ("data", array_of(int16(), 4))])?;
        let instance = ty.instantiate();
        instance.set("data", vec![1i16, -2, 3])?;

        let data = instance.get("data")?.into_array()?;
        assert_eq!(
            data,
            vec![Value::I16(1), Value::I16(-2), Value::I16(3), Value::I16(0)]
        );
        assert!(matches!(
            instance.set("data", vec![0i16; 5]),
            Err(LayoutError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            instance.set("data", 1),
            Err(LayoutError::TypeMismatch { .. })
        ));
        Ok(())
    }

    /// Test: snapshots and debug output list every field
    #[test]
    fn test_snapshot_and_debug() -> Result<()> {
        let ty = StructType::new("Pair", [("a", char()), ("b", int())])?;
        let instance = StructInstance::with_values(&ty, [("a", 1), ("b", 2)])?;
        let values = instance.to_values()?;
        assert_eq!(
            values,
            vec![
                ("a".to_string(), Value::I8(1)),
                ("b".to_string(), Value::I32(2)),
            ]
        );
        let rendered = format!("{:?}", instance);
        assert!(rendered.contains("a: I8(1)"));
        Ok(())
    }
}

#[cfg(test)]
mod nested_view_tests {
    use super::*;

    fn inner() -> StructType {
        StructType::new("Inner", [("x", int32()), ("y", char())]).unwrap()
    }

    fn outer(inner: &StructType) -> StructType {
        let fields: Vec<(&str, TypeRef)> = vec![("tag", char()), ("inner", inner.as_type_ref())];
        StructType::new("Outer", fields).unwrap()
    }

    /// Test: writes through a nested view land in the parent's buffer
    #[test]
    fn test_nested_view_writes_through() -> Result<()> {
        let inner_ty = inner();
        let outer_ty = outer(&inner_ty);
        assert_eq!(outer_ty.offset_of("inner"), Some(4));
        assert_eq!(outer_ty.size(), 12);

        let parent = outer_ty.instantiate();
        let view = parent.get_struct("inner")?;
        view.set("x", 99)?;

        assert!(view.pointer().shares_storage(parent.pointer()));
        assert_eq!(view.pointer().storage_offset(), 4);
        assert_eq!(parent.to_bytes()[4..8], 99i32.to_ne_bytes());

        // a second, independently created view sees the same bytes
        let offset = outer_ty.offset_of("inner").unwrap_or_default();
        let again = StructInstance::with_buffer(&inner_ty, parent.pointer().slice(offset)?)?;
        assert_eq!(again.get("x")?, Value::I32(99));

        again.set("y", 7)?;
        assert_eq!(view.get("y")?, Value::I8(7));
        Ok(())
    }

    /// Test: nested fields accept records, same-type instances and foreign instances
    #[test]
    fn test_assign_nested_struct() -> Result<()> {
        let inner_ty = inner();
        let outer_ty = outer(&inner_ty);
        let parent = outer_ty.instantiate();

        parent.set("inner", Value::record([("y", 3)]))?;
        assert_eq!(parent.get_struct("inner")?.get("y")?, Value::I8(3));

        let source = StructInstance::with_values(&inner_ty, [("x", 11), ("y", 12)])?;
        parent.set("inner", source)?;
        let view = parent.get_struct("inner")?;
        assert_eq!(view.get("x")?, Value::I32(11));
        assert_eq!(view.get("y")?, Value::I8(12));

        let lookalike = StructType::new("Lookalike", [("x", int64())])?;
        let foreign = StructInstance::with_values(&lookalike, [("x", 5)])?;
        parent.set("inner", foreign)?;
        assert_eq!(parent.get_struct("inner")?.get("x")?, Value::I32(5));
        assert_eq!(parent.get_struct("inner")?.get("y")?, Value::I8(12));

        let unrelated = StructType::new("Unrelated", [("z", int32())])?;
        assert!(matches!(
            parent.set("inner", unrelated.instantiate()),
            Err(LayoutError::UnknownField { .. })
        ));
        assert!(matches!(
            parent.set("inner", 1),
            Err(LayoutError::TypeMismatch { .. })
        ));
        Ok(())
    }

    /// Test: a rejected nested assignment leaves the parent's bytes alone
    #[test]
    fn test_failed_nested_assignment_is_atomic() -> Result<()> {
        let inner_ty = inner();
        let outer_ty = outer(&inner_ty);
        let parent = StructInstance::with_values(&outer_ty, [("tag", 1)])?;
        let before = parent.to_bytes();

        let result = parent.set("inner", Value::record([("x", 5), ("y", 1000)]));
        assert!(matches!(result, Err(LayoutError::ValueOutOfRange { .. })));
        assert_eq!(parent.get_struct("inner")?.get("x")?, Value::I32(0));
        assert_eq!(parent.to_bytes(), before);

        // same for arrays of structs
        let table_ty =
            StructType::new("Table", [("rows", array_of(inner_ty.as_type_ref(), 2))])?;
        let table = table_ty.instantiate();
        let rows = vec![
            Value::record([("x", 1)]),
            Value::record([("x", 2), ("y", 999)]),
        ];
        assert!(table.set("rows", rows).is_err());
        assert!(table.to_bytes().iter().all(|&b| b == 0));
        Ok(())
    }

    /// Test: a rejected initial value leaves a caller buffer and the type as they were
    #[test]
    fn test_failed_initialiser_leaves_buffer() -> Result<()> {
        let ty = StructType::new("P", [("a", int32()), ("b", char())])?;
        let buffer = ByteBuffer::zeroed(ty.size());
        let result =
            StructInstance::with_buffer_and_values(&ty, buffer.clone(), [("a", 7), ("b", 300)]);
        assert!(matches!(result, Err(LayoutError::ValueOutOfRange { .. })));
        assert_eq!(buffer.to_vec(), vec![0u8; ty.size()]);
        assert!(!ty.is_frozen());
        Ok(())
    }

    /// Test: arrays of structs yield one view per element
    #[test]
    fn test_struct_array_elements_are_views() -> Result<()> {
        let inner_ty = inner();
        let ty = StructType::new("Table", [("rows", array_of(inner_ty.as_type_ref(), 3))])?;
        assert_eq!(ty.size(), 3 * inner_ty.size());

        let table = ty.instantiate();
        let rows = table.get("rows")?.into_array()?;
        assert_eq!(rows.len(), 3);
        rows[1].clone().into_struct()?.set("x", 21)?;

        let offset = inner_ty.size() + inner_ty.offset_of("x").unwrap_or_default();
        assert_eq!(table.to_bytes()[offset..offset + 4], 21i32.to_ne_bytes());
        Ok(())
    }

    /// Test: nesting two levels deep keeps offsets relative to the root
    #[test]
    fn test_two_level_nesting() -> Result<()> {
        let inner_ty = inner();
        let middle_ty = outer(&inner_ty);
        let root_ty = StructType::new("Root", [("head", double()), ("body", middle_ty.as_type_ref())])?;

        let root = root_ty.instantiate();
        root.get_struct("body")?.get_struct("inner")?.set("x", -8)?;

        let absolute = root_ty.offset_of("body").unwrap_or_default()
            + middle_ty.offset_of("inner").unwrap_or_default();
        assert_eq!(absolute, 12);
        assert_eq!(root.to_bytes()[absolute..absolute + 4], (-8i32).to_ne_bytes());
        Ok(())
    }
}
