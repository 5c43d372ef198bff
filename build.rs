#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use anyhow::Result;
use vergen::EmitBuilder;

fn main() -> Result<()> {
    EmitBuilder::builder().all_build().all_git().emit()?;
    println!("cargo:rerun-if-changed=build.rs");

    return Ok(());
}
