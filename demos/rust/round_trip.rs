use varfloat::{bits_for_int_range, BoundedIntCodec, Config};

fn main() -> Result<(), varfloat::VarfloatError> {
    // Pick the width from the error we can live with
    let config = Config::from_max_relative_error(0.001)?;

    let value = 3.14159;
    let bytes = config.encode(value)?;
    let (decoded, _) = config.decode(&bytes)?;
    println!(
        "{value} -> {bytes:02x?} -> {decoded} ({} bits, rel err {:.2e})",
        config.mantissa_bits(),
        (decoded - value).abs() / value
    );

    // Integers in a known range round trip exactly with enough bits
    let bits = bits_for_int_range(-1000, 1000)?;
    let codec = BoundedIntCodec::new(-1000, 1000, bits)?;
    let bytes = codec.encode(-321)?;
    let (n, _) = codec.decode(&bytes)?;
    println!("-321 -> {bytes:02x?} -> {n} ({bits} bits)");

    // Errors are values
    if let Err(e) = codec.encode(5000) {
        println!("encoding 5000 failed: {e}");
    }
    Ok(())
}
