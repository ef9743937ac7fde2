use std::path::{Path, PathBuf};

use anyhow::Context;
use walkdir::WalkDir;

/// Read an LC-3 source file. Invalid UTF-8 is replaced rather than rejected.
pub fn read_asm_file(path: &Path) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Check if a file path has an `.asm` extension, case-insensitive.
pub fn is_asm_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("asm"))
        .unwrap_or(false)
}

/// Expand directories into the `.asm` files beneath them. Plain file paths pass through.
pub fn collect_asm_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .flat_map(|p| {
            if p.is_dir() {
                WalkDir::new(p)
                    .follow_links(true)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file() && is_asm_file(e.path()))
                    .map(|e| e.into_path())
                    .collect::<Vec<_>>()
            } else {
                vec![p.clone()]
            }
        })
        .collect()
}
