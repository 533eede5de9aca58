//! Basic usage example of memlayout
//!
//! Run with `RUST_LOG=debug` to see every field placement as it happens.

use memlayout::{
    types::{array_of, char, double, int, ref_type, uchar},
    ByteBuffer, LayoutDescription, Result, StructInstance, StructType, Value,
};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    println!("memlayout Example");
    println!("=================");

    // Declare a small struct field by field
    let mut point = StructType::builder("Point");
    point.define_field("x", int())?;
    point.define_field("y", int())?;
    let point = point.build();

    // Nest it in a larger one with padding on both sides
    let sprite = StructType::new(
        "Sprite",
        vec![
            ("visible", char()),
            ("position", point.as_type_ref()),
            ("scale", double()),
            ("palette", array_of(uchar(), 3)),
            ("texture", ref_type(uchar())),
        ],
    )?;

    let description = sprite.describe();
    println!("\n{}", description);
    println!("Padding bytes: {}", description.padding());

    // Write fields, including through a nested view
    let instance = StructInstance::with_values(
        &sprite,
        vec![
            ("visible", Value::I8(1)),
            ("scale", Value::F64(2.5)),
            ("palette", Value::from(vec![255u8, 128, 0])),
        ],
    )?;
    let position = instance.get_struct("position")?;
    position.set("x", 10)?;
    position.set("y", -4)?;

    println!("Instance: {:?}", instance);
    println!("Raw bytes: {:02x?}", instance.to_bytes());

    // Reinterpret the same bytes through a second view
    let copy = ByteBuffer::from_vec(instance.to_bytes());
    let reread = sprite.view(copy)?;
    println!(
        "Re-read position: ({}, {})",
        reread.get_struct("position")?.get_as::<i32>("x")?,
        reread.get_struct("position")?.get_as::<i32>("y")?
    );

    // Layout descriptions travel as bincode
    let encoded = description.to_bytes()?;
    let decoded = LayoutDescription::from_bytes(&encoded)?;
    println!(
        "Description round trip: {} bytes, compatible: {}",
        encoded.len(),
        decoded.is_compatible_with(&sprite.describe())
    );

    Ok(())
}
