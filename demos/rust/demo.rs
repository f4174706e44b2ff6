//! Size comparisons between fixed-width, signed varint and varfloat encodings
//! for a handful of typical payloads.
//!
//! Run with `RUST_LOG=varfloat=trace` to see the advisor's decisions.

use std::error::Error;

use num_format::{Locale, ToFormattedString};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing_subscriber::EnvFilter;
use varfloat::{
    bits_for_max_relative_error,
    bounded::append_bounded_int,
    decode_floats, encode_floats,
    fixed::encode_i64_fixed,
    quantize_int_down,
    varint::append_varint,
    Vec3,
};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("varfloat demo");
    println!("=============");

    sparse_pixel_coords()?;
    percentages()?;
    time_series_deltas()?;
    bucketed_counts()?;
    vectors()?;
    Ok(())
}

fn bytes(n: usize) -> String {
    n.to_formatted_string(&Locale::en)
}

fn ratio(baseline: usize, n: usize) -> f64 {
    baseline as f64 / n as f64
}

/// Mostly-empty 4K image, positions only needed to the nearest 8px block.
fn sparse_pixel_coords() -> Result<(), Box<dyn Error>> {
    println!("\n1) Sparse pixel coordinates with block-level precision");

    const WIDTH: i64 = 3840;
    const HEIGHT: i64 = 2160;
    const BLOCK: i64 = 8;
    const BITS: u32 = 12;

    let mut rng = StdRng::seed_from_u64(1);
    let positions: Vec<[f64; 2]> = (0..10_000)
        .map(|_| {
            if rng.gen::<f64>() < 0.9 {
                [0.0, 0.0]
            } else {
                [
                    rng.gen::<f64>() * WIDTH as f64,
                    rng.gen::<f64>() * HEIGHT as f64,
                ]
            }
        })
        .collect();

    let fixed = positions.len() * 2 * core::mem::size_of::<f64>();
    let mut vf = Vec::new();
    let mut varint = Vec::new();
    for [x, y] in &positions {
        let qx = ((x / BLOCK as f64).round() as i64 * BLOCK).clamp(0, WIDTH);
        let qy = ((y / BLOCK as f64).round() as i64 * BLOCK).clamp(0, HEIGHT);
        append_bounded_int(&mut vf, qx, 0, WIDTH, BITS)?;
        append_bounded_int(&mut vf, qy, 0, HEIGHT, BITS)?;
        append_varint(&mut varint, qx);
        append_varint(&mut varint, qy);
    }

    println!("10,000 positions in a {WIDTH}x{HEIGHT} image, 90% at (0, 0)");
    println!("  fixed (2 x f64):          {:>7} bytes", bytes(fixed));
    println!("  varint (block-quantized): {:>7} bytes", bytes(varint.len()));
    println!("  varfloat ({BITS} bits):       {:>7} bytes", bytes(vf.len()));
    println!(
        "  vs f64: varint {:.2}x, varfloat {:.2}x, error <= ~{:.1}px",
        ratio(fixed, varint.len()),
        ratio(fixed, vf.len()),
        BLOCK as f64 / 2.0
    );

    for [x, y] in positions.iter().filter(|p| p[0] != 0.0 || p[1] != 0.0).take(5) {
        let qx = (x / BLOCK as f64).round() * BLOCK as f64;
        let qy = (y / BLOCK as f64).round() * BLOCK as f64;
        println!(
            "  ({x:.1}, {y:.1}) -> ({qx:.1}, {qy:.1}) [err ({:.2}px, {:.2}px)]",
            (qx - x).abs(),
            (qy - y).abs()
        );
    }
    Ok(())
}

/// Probabilities in [0, 1] at 0.01% steps, 70% of them exactly zero.
fn percentages() -> Result<(), Box<dyn Error>> {
    println!("\n2) Percentages in [0, 1]");

    const MAX: i64 = 10_000;
    const BITS: u32 = 10;

    let mut rng = StdRng::seed_from_u64(2);
    let values: Vec<f64> = (0..10_000)
        .map(|_| {
            let p = rng.gen::<f64>();
            if p < 0.7 {
                0.0
            } else {
                p
            }
        })
        .collect();

    let fixed = values.len() * core::mem::size_of::<f64>();
    let mut vf = Vec::new();
    let mut varint = Vec::new();
    for p in &values {
        let n = (p.clamp(0.0, 1.0) * MAX as f64).round() as i64;
        append_bounded_int(&mut vf, n, 0, MAX, BITS)?;
        append_varint(&mut varint, n);
    }

    println!("10,000 percentages, 70% zero, 0.01% steps");
    println!("  fixed (f64):              {:>7} bytes", bytes(fixed));
    println!("  varint (buckets):         {:>7} bytes", bytes(varint.len()));
    println!("  varfloat [0,{MAX}] {BITS} bits: {:>7} bytes", bytes(vf.len()));
    println!(
        "  vs f64: varint {:.2}x, varfloat {:.2}x",
        ratio(fixed, varint.len()),
        ratio(fixed, vf.len())
    );
    Ok(())
}

/// Random walk with small steps; the first sample is stored fixed-width and
/// the deltas as bounded ints.
fn time_series_deltas() -> Result<(), Box<dyn Error>> {
    println!("\n3) Time series deltas");

    const DELTA: i64 = 1000;
    const BITS: u32 = 8;

    let mut rng = StdRng::seed_from_u64(3);
    let mut cur = 0i64;
    let samples: Vec<i64> = (0..10_000)
        .map(|_| {
            cur += rng.gen_range(-5..=5);
            cur
        })
        .collect();

    let fixed = samples.len() * core::mem::size_of::<i64>();
    let mut vf = encode_i64_fixed(samples[0]).to_vec();
    let mut varint = Vec::new();
    append_varint(&mut varint, samples[0]);
    for w in samples.windows(2) {
        let delta = (w[1] - w[0]).clamp(-DELTA, DELTA);
        append_bounded_int(&mut vf, delta, -DELTA, DELTA, BITS)?;
        append_varint(&mut varint, delta);
    }

    println!("10,000 i64 samples, steps in [-5, 5]");
    println!("  fixed (i64):              {:>7} bytes", bytes(fixed));
    println!("  varint (first + deltas):  {:>7} bytes", bytes(varint.len()));
    println!("  varfloat ({BITS} bits):        {:>7} bytes", bytes(vf.len()));
    println!(
        "  vs i64: varint {:.2}x, varfloat {:.2}x",
        ratio(fixed, varint.len()),
        ratio(fixed, vf.len())
    );
    Ok(())
}

/// Request counts where being off by up to one bucket is fine.
fn bucketed_counts() -> Result<(), Box<dyn Error>> {
    println!("\n4) Lossy integers via integer buckets");

    const MAX: i64 = 100_000;
    const STEP: i64 = 10;
    const BITS: u32 = 12;

    println!("range [0, {MAX}], bucket size {STEP}");
    let mut vf = Vec::new();
    for v in [0, 3, 7, 9, 10, 17, 123, 999, 12_345, 87_654] {
        let q = quantize_int_down(v, STEP);
        append_bounded_int(&mut vf, q, 0, MAX, BITS)?;
        println!("  {v:>6} -> {q:>6} (err {:>2})", (v - q).abs());
    }
    println!("  10 bucketed values in {} bytes", vf.len());
    Ok(())
}

/// Roughly normal vectors scaled to ~1000 at 0.1% relative precision.
fn vectors() -> Result<(), Box<dyn Error>> {
    println!("\n5) 3D vectors with limited precision");

    let mut rng = StdRng::seed_from_u64(5);
    let vectors: Vec<Vec3> = (0..5_000)
        .map(|_| Vec3::from([(); 3].map(|_| normal(&mut rng) * 1000.0)))
        .collect();

    let bits = bits_for_max_relative_error(0.001)?;
    let fixed = vectors.len() * core::mem::size_of::<Vec3>();
    let mut vf = Vec::new();
    for v in &vectors {
        vf.extend(encode_floats(&v.to_array(), bits)?);
    }

    println!("5,000 vectors, components ~N(0, 1000)");
    println!("  fixed (3 x f64):          {:>7} bytes", bytes(fixed));
    println!("  varfloat ({bits} bits):       {:>7} bytes", bytes(vf.len()));
    println!("  {:.2}x smaller", ratio(fixed, vf.len()));

    for v in vectors.iter().take(3) {
        let (dec, _) = decode_floats(&encode_floats(&v.to_array(), bits)?, bits)?;
        let dec = Vec3::from([dec[0], dec[1], dec[2]]);
        let rel = (dec.length() - v.length()).abs() / v.length();
        println!(
            "  ({:.1}, {:.1}, {:.1}) |{:.1}| -> ({:.1}, {:.1}, {:.1}) |{:.1}| rel err {rel:.4}",
            v.x,
            v.y,
            v.z,
            v.length(),
            dec.x,
            dec.y,
            dec.z,
            dec.length()
        );
    }
    Ok(())
}

/// Box-Muller standard normal sample.
fn normal(rng: &mut StdRng) -> f64 {
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * core::f64::consts::PI * u2).cos()
}
