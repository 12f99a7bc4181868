use anyhow::{Context, bail};
use std::fs;
use std::path::{Path, PathBuf};

/// Find the catalog file for one trait under a snapshot root.
///
/// A file matches when its name or its stem equals the trait name, so both
/// `Import` and `Import.txt` serve trait `Import`. Each directory's files
/// are visited before its subdirectories, both in sorted order, which
/// keeps the chosen file stable across platforms.
pub fn find_trait_file(root: &Path, trait_name: &str) -> anyhow::Result<PathBuf> {
    match walk(root, trait_name)? {
        Some(path) => Ok(path),
        None => bail!("could not find {} under {}", trait_name, root.display()),
    }
}

fn walk(dir: &Path, trait_name: &str) -> anyhow::Result<Option<PathBuf>> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    let entries =
        fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            subdirs.push(path);
        } else {
            files.push(path);
        }
    }
    files.sort();
    subdirs.sort();

    for path in files {
        if matches_trait(&path, trait_name) {
            return Ok(Some(path));
        }
    }
    for path in subdirs {
        if let Some(found) = walk(&path, trait_name)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

fn matches_trait(path: &Path, trait_name: &str) -> bool {
    let name = path.file_name().and_then(|n| n.to_str());
    let stem = path.file_stem().and_then(|s| s.to_str());
    name == Some(trait_name) || stem == Some(trait_name)
}
