use std::collections::BTreeSet;
use std::path::Path;

/// reads a plain-text OSM way id list: one integer per line, `#` comments
/// and blank lines ignored. a missing file is not an error, manual
/// intervention lists are optional.
pub fn read_way_ids(path: &Path) -> BTreeSet<i64> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => {
            log::warn!("way id list not found: {}", path.display());
            return BTreeSet::new();
        }
    };

    let mut ids = BTreeSet::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.parse::<i64>() {
            Ok(id) => {
                ids.insert(id);
            }
            Err(_) => log::warn!("invalid way id in {}: '{}'", path.display(), line),
        }
    }
    ids
}

/// writes the matched way ids of a data source, one per line.
pub fn write_way_ids(path: &Path, ids: &BTreeSet<i64>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = String::new();
    for id in ids {
        out.push_str(&id.to_string());
        out.push('\n');
    }
    std::fs::write(path, out)
}
