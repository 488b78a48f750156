use crate::app::paths::absolutize;
use crate::app::rules::RuleSet;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const FILES_HEADER: &str = "# Files to ignore/include (full paths)";
const FOLDERS_HEADER: &str = "# Folders to ignore/include (full paths)";

/// Parses the line-oriented `file:` / `folder:` format.
///
/// Relative paths are resolved against `base`. Lines with an unknown prefix
/// are skipped with a warning.
pub fn parse_rules(text: &str, base: &Path) -> RuleSet {
    let mut rules = RuleSet::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((kind, rest)) = line.split_once(':') else {
            log::warn!("Skipping rule line {}: missing ':' in {:?}", idx + 1, line);
            continue;
        };
        let rest = rest.trim();
        if rest.is_empty() {
            continue;
        }
        let path = absolutize(Path::new(rest), base);

        match kind.trim().to_ascii_lowercase().as_str() {
            "file" => {
                rules.files.insert(path);
            }
            "folder" => {
                rules.folders.insert(path);
            }
            other => log::warn!("Skipping rule line {}: unknown kind {:?}", idx + 1, other),
        }
    }

    rules
}

/// Renders rules back to text: files first, then folders, each sorted.
pub fn render_rules(rules: &RuleSet) -> String {
    let mut out = format!("{}\n", FILES_HEADER);
    for path in &rules.files {
        out.push_str(&format!("file: {}\n", path.display()));
    }
    out.push_str(&format!("\n{}\n", FOLDERS_HEADER));
    for path in &rules.folders {
        out.push_str(&format!("folder: {}\n", path.display()));
    }
    out
}

pub fn load_rules(path: &Path, base: &Path) -> Result<RuleSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file {:?}", path))?;
    let rules = parse_rules(&content, base);
    log::debug!(
        "Loaded {} file and {} folder rules from {:?}",
        rules.files.len(),
        rules.folders.len(),
        path
    );
    Ok(rules)
}

pub fn save_rules(path: &Path, rules: &RuleSet) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    fs::write(path, render_rules(rules))
        .with_context(|| format!("Failed to write rules file {:?}", path))
}
