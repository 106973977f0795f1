// Build script that tries to generate the C header with `cbindgen`.
// If `cbindgen` is not installed, it copies the checked-in
// `include/patchdrift.h` to $OUT_DIR instead.
//
// Consumers can include the header from:
//   - <repo>/patchdrift-ffi/include/patchdrift.h   (checked-in)
//   - $OUT_DIR/patchdrift.h

use std::{env, fs, path::PathBuf, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=include/patchdrift.h");

    let (Ok(crate_dir), Ok(out_dir)) = (env::var("CARGO_MANIFEST_DIR"), env::var("OUT_DIR")) else {
        return;
    };
    let crate_dir = PathBuf::from(crate_dir);
    let header_repo = crate_dir.join("include").join("patchdrift.h");
    let header_out = PathBuf::from(out_dir).join("patchdrift.h");

    let generated = Command::new("cbindgen")
        .args(["--crate", "patchdrift-ffi", "--lang", "C", "--output"])
        .arg(&header_out)
        .current_dir(&crate_dir)
        .status()
        .is_ok_and(|s| s.success());

    if generated {
        println!("cargo:warning=patchdrift-ffi: generated header with cbindgen -> {}", header_out.display());
        return;
    }

    if let Err(e) = fs::copy(&header_repo, &header_out) {
        println!("cargo:warning=patchdrift-ffi: no cbindgen and no checked-in header ({e})");
    }
}
