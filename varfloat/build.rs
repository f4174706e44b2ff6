use std::{env, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=src/ffi.rs");

    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR");
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("cargo sets OUT_DIR"));

    // Generate C header for the extern "C" surface in src/ffi.rs
    match cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("VARFLOAT_H")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(out_dir.join("varfloat.h"));
        }
        // Not fatal for Rust-only builds
        Err(err) => println!("cargo:warning=failed to generate varfloat.h: {err}"),
    }
}
