use std::{env, fs, path::PathBuf};

fn main() {
    // Pick the linker memory layout for the target chip.
    let target = env::var("TARGET").unwrap_or_default();
    let memory_file = if target.starts_with("thumbv8m") {
        "memory-pico2.x" // Pico 2 ARM
    } else if target.starts_with("thumbv6m") {
        "memory-pico1.x" // Pico 1
    } else {
        // Host builds (tests) link without a memory layout.
        return;
    };

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let memory_x =
        fs::read_to_string(memory_file).unwrap_or_else(|_| panic!("Failed to read {memory_file}"));
    fs::write(out_dir.join("memory.x"), memory_x).expect("Failed to write memory.x");
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed={memory_file}");
    println!("cargo:rerun-if-changed=build.rs");
}
