fn main() {
    // Itanium mangling spells size_t as `m` (unsigned long) on wasm32 and LP64
    // targets and as `j` (unsigned int) on other 32-bit targets.
    let arch = std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    println!("cargo::rustc-check-cfg=cfg(cxxrt_size_t_uint)");
    let width = std::env::var("CARGO_CFG_TARGET_POINTER_WIDTH").unwrap_or_default();
    if width == "32" && arch != "wasm32" {
        println!("cargo:rustc-cfg=cxxrt_size_t_uint");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
