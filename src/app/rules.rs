use crate::app::models::FilterMode;
use crate::app::paths::is_within;
use std::collections::BTreeSet;
use std::ops::Bound;
use std::path::{Path, PathBuf};

/// File and folder rules as normalized absolute paths.
///
/// A folder rule covers the folder itself and everything nested beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    pub files: BTreeSet<PathBuf>,
    pub folders: BTreeSet<PathBuf>,
}

impl RuleSet {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.folders.is_empty()
    }

    pub fn extend(&mut self, other: RuleSet) {
        self.files.extend(other.files);
        self.folders.extend(other.folders);
    }

    /// Decides whether an item is processed under `mode`.
    ///
    /// `ancestors` holds the folders already confirmed as whitelisted on the
    /// way down; anything inside one of them is included in whitelist mode no
    /// matter what the other rules say.
    pub fn should_process(
        &self,
        item: &Path,
        is_file: bool,
        mode: FilterMode,
        ancestors: &[PathBuf],
    ) -> bool {
        match mode {
            FilterMode::Blacklist => {
                if is_file && self.files.contains(item) {
                    return false;
                }
                if !is_file && self.folders.contains(item) {
                    return false;
                }
                !self.is_under_folder_rule(item)
            }
            FilterMode::Whitelist => {
                if ancestors.iter().any(|a| is_within(item, a)) {
                    return true;
                }
                if is_file {
                    self.files.contains(item)
                } else {
                    self.folders.contains(item)
                }
            }
        }
    }

    /// Strictly nested under some folder rule (the folder itself does not count).
    fn is_under_folder_rule(&self, item: &Path) -> bool {
        item.ancestors()
            .skip(1)
            .any(|parent| self.folders.contains(parent))
    }

    /// Whether a directory is covered by the whitelist on its own: listed as a
    /// folder rule, or nested beneath an already whitelisted ancestor.
    pub fn is_in_scope(&self, dir: &Path, ancestors: &[PathBuf]) -> bool {
        self.folders.contains(dir) || ancestors.iter().any(|a| is_within(dir, a))
    }

    /// True when some file or folder rule lies strictly beneath `dir`, so the
    /// directory has to be entered even though it is not whitelisted itself.
    pub fn may_contain_rules(&self, dir: &Path) -> bool {
        has_descendant(&self.files, dir) || has_descendant(&self.folders, dir)
    }

    /// Ancestor list for the children of `dir`: a copy of `ancestors`, plus
    /// `dir` itself when it matches a whitelist folder rule.
    pub fn extend_ancestors(
        &self,
        dir: &Path,
        mode: FilterMode,
        ancestors: &[PathBuf],
    ) -> Vec<PathBuf> {
        let mut next = ancestors.to_vec();
        if mode == FilterMode::Whitelist
            && self.folders.contains(dir)
            && !next.iter().any(|a| a == dir)
        {
            next.push(dir.to_path_buf());
        }
        next
    }
}

/// `Path` orders component-wise, so every path nested under `dir` sorts
/// directly after it; checking the first successor is enough.
fn has_descendant(set: &BTreeSet<PathBuf>, dir: &Path) -> bool {
    set.range::<Path, _>((Bound::Excluded(dir), Bound::Unbounded))
        .next()
        .is_some_and(|p| p.starts_with(dir))
}
