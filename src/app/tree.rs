//! Directory-only preview drawn with box-drawing connectors.

use crate::app::listing::{list_dir, EntryKind};
use crate::app::paths::display_name;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Renders the directory structure under `root`, directories only.
///
/// A directory whose path is exactly in `blacklist` is dropped together with
/// everything below it; descendants are never visited, so they need no entry
/// of their own. Unreadable directories render as leaves, and so does a
/// symlinked directory that leads back onto the path being drawn. Returns an
/// empty string when `root` has no subdirectory left to show.
pub fn render_tree(root: &Path, blacklist: &BTreeSet<PathBuf>) -> String {
    if blacklist.contains(root) || child_dirs(root, blacklist).is_empty() {
        return String::new();
    }
    let mut out = String::new();
    let mut active = HashSet::new();
    render_node(root, blacklist, "", true, &mut active, &mut out);
    out
}

fn render_node(
    dir: &Path,
    blacklist: &BTreeSet<PathBuf>,
    prefix: &str,
    is_last: bool,
    active: &mut HashSet<PathBuf>,
    out: &mut String,
) {
    let (connector, extension) = if is_last {
        ("└── ", "    ")
    } else {
        ("├── ", "│   ")
    };
    out.push_str(&format!("{prefix}{connector}{}/\n", display_name(dir)));

    // Canonical paths on the current branch; a link back into it stops here.
    let real = fs::canonicalize(dir).ok();
    if let Some(real) = &real {
        if !active.insert(real.clone()) {
            log::debug!("Tree preview skips {:?}: cycles back to {:?}", dir, real);
            return;
        }
    }

    let children = child_dirs(dir, blacklist);
    let child_prefix = format!("{prefix}{extension}");
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        render_node(child, blacklist, &child_prefix, last, active, out);
    }

    if let Some(real) = &real {
        active.remove(real);
    }
}

fn child_dirs(dir: &Path, blacklist: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
    match list_dir(dir) {
        Ok(entries) => entries
            .into_iter()
            .filter(|e| e.kind == EntryKind::Dir && !blacklist.contains(&e.path))
            .map(|e| e.path)
            .collect(),
        Err(err) => {
            log::debug!("Tree preview cannot list {:?}: {}", dir, err);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::paths::normalize;
    use std::fs;

    fn layout(dirs: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        for d in dirs {
            fs::create_dir_all(tmp.path().join(d)).unwrap();
        }
        let root = normalize(tmp.path());
        (tmp, root)
    }

    #[test]
    fn draws_nested_directories_with_connectors() {
        let (_tmp, root) = layout(&["src/app", "src/bin", "docs"]);
        fs::write(root.join("README.md"), "files are not drawn").unwrap();

        let expected = format!(
            "└── {}/\n    ├── docs/\n    └── src/\n        ├── app/\n        └── bin/\n",
            display_name(&root)
        );
        assert_eq!(render_tree(&root, &BTreeSet::new()), expected);
    }

    #[test]
    fn vertical_bar_continues_under_non_last_children() {
        let (_tmp, root) = layout(&["a/inner", "b"]);

        let tree = render_tree(&root, &BTreeSet::new());
        assert!(tree.contains("    ├── a/\n    │   └── inner/\n    └── b/\n"), "{tree}");
    }

    #[test]
    fn blacklisted_directory_and_subtree_are_omitted() {
        let (_tmp, root) = layout(&["keep", "node_modules/pkg/lib"]);
        let blacklist: BTreeSet<PathBuf> = [root.join("node_modules")].into();

        let tree = render_tree(&root, &blacklist);
        assert!(tree.contains("keep/"));
        assert!(!tree.contains("node_modules"));
        assert!(!tree.contains("── pkg/"));
        assert!(!tree.contains("── lib/"));
    }

    #[test]
    fn blacklist_matches_exact_paths_only() {
        let (_tmp, root) = layout(&["build", "build-tools"]);
        let blacklist: BTreeSet<PathBuf> = [root.join("build")].into();

        let tree = render_tree(&root, &blacklist);
        assert!(tree.contains("build-tools/"));
        assert!(!tree.contains("build/\n"));
    }

    #[test]
    fn empty_when_nothing_to_show() {
        let (_tmp, root) = layout(&["only"]);
        assert_eq!(render_tree(&root, &[root.join("only")].into()), "");
        assert_eq!(render_tree(&root, &[root.clone()].into()), "");

        let (_tmp2, bare) = layout(&[]);
        assert_eq!(render_tree(&bare, &BTreeSet::new()), "");
    }

    #[test]
    fn unreadable_root_renders_nothing() {
        let (_tmp, root) = layout(&[]);
        assert_eq!(render_tree(&root.join("missing"), &BTreeSet::new()), "");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_back_to_root_is_drawn_once() {
        let (tmp, root) = layout(&["real"]);
        std::os::unix::fs::symlink(tmp.path(), root.join("real/loop")).unwrap();

        let tree = render_tree(&root, &BTreeSet::new());
        let expected = format!(
            "└── {}/\n    └── real/\n        └── loop/\n",
            display_name(&root)
        );
        assert_eq!(tree, expected);
        assert_eq!(tree.lines().count(), 3);
    }
}
