#![allow(missing_docs)]

use std::{env, error::Error};
use vergen::{BuildBuilder, CargoBuilder, Emitter};

fn main() -> Result<(), Box<dyn Error>> {
    let build = BuildBuilder::default().build_timestamp(true).build()?;
    let cargo = CargoBuilder::default().features(true).target_triple(true).build()?;

    Emitter::default().add_instructions(&build)?.add_instructions(&cargo)?.emit_and_set()?;

    // Set the build profile
    let out_dir = env::var("OUT_DIR")?;
    let profile = out_dir.rsplit(std::path::MAIN_SEPARATOR).nth(3).unwrap_or("unknown");
    println!("cargo:rustc-env=BATCH_BUILD_PROFILE={profile}");

    let pkg_version = env!("CARGO_PKG_VERSION");

    // The short version information.
    // Example: 0.1.0 (release)
    println!("cargo:rustc-env=BATCH_SHORT_VERSION={pkg_version} ({profile})");

    // LONG_VERSION
    //
    // Example:
    //
    // ```text
    // Version: 0.1.0
    // Build Timestamp: 2023-05-19T01:47:19.815651705Z
    // Build Features: default
    // Target Triple: x86_64-unknown-linux-gnu
    // Build Profile: release
    // ```
    println!("cargo:rustc-env=BATCH_LONG_VERSION_0=Version: {pkg_version}");
    println!(
        "cargo:rustc-env=BATCH_LONG_VERSION_1=Build Timestamp: {}",
        env::var("VERGEN_BUILD_TIMESTAMP")?
    );
    println!(
        "cargo:rustc-env=BATCH_LONG_VERSION_2=Build Features: {}",
        env::var("VERGEN_CARGO_FEATURES")?
    );
    println!(
        "cargo:rustc-env=BATCH_LONG_VERSION_3=Target Triple: {}",
        env::var("VERGEN_CARGO_TARGET_TRIPLE")?
    );
    println!("cargo:rustc-env=BATCH_LONG_VERSION_4=Build Profile: {profile}");

    Ok(())
}
