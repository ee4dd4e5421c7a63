use std::process::Command;

/// Embed `git describe` output so `compta --version` names the exact build.
fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let repo_root = format!("{manifest_dir}/..");

    let describe = Command::new("git")
        .args(["-C", &repo_root, "describe", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=COMPTA_BUILD_DESCRIBE={describe}");
    println!("cargo:rerun-if-changed={repo_root}/.git/HEAD");
}
