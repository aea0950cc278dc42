use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Sibling temp path used while writing `path`.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("export");
    path.parent()
        .unwrap_or(Path::new("."))
        .join(format!("{name}.tmp"))
}

/// Replace `path` with `contents`: write a temp sibling, then rename over the target.
/// Readers see either the previous file or the complete new one.
pub fn write_replacing(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let temp_path = temp_path_for(path);
    fs::write(&temp_path, contents)
        .with_context(|| format!("write {}", temp_path.display()))?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("rename onto {}", path.display()));
    }
    Ok(())
}
