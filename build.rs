//! Build script for the Zeytin AI desktop shell.
//!
//! Only the `desktop` feature needs Tauri codegen. Headless builds of the
//! core library skip it entirely so they don't require tauri.conf.json
//! or the webview toolchain.

fn main() {
    println!("cargo:rerun-if-changed=tauri.conf.json");
    println!("cargo:rerun-if-changed=capabilities");

    #[cfg(feature = "desktop")]
    tauri_build::build();
}
