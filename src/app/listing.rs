use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Broken links, sockets and the like: counted, never emitted.
    Other,
}

/// A single child of a listed directory.
#[derive(Debug)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Lists the direct children of `dir`, sorted by file name.
///
/// All of the walker's implicit filtering (hidden files, ignore files) is
/// turned off: which entries count is decided by the rule set alone. Kinds
/// are resolved through symlinks. A child that cannot be read is logged and
/// left out rather than failing the whole directory.
pub fn list_dir(dir: &Path) -> Result<Vec<Entry>, ignore::Error> {
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(Some(1))
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut entries = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) if fails_listing(&err) => return Err(err),
            Err(err) => {
                log::warn!("Skipping entry in {:?}: {}", dir, err);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let path = entry.path().to_path_buf();
        let kind = if path.is_file() {
            EntryKind::File
        } else if path.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::Other
        };
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            kind,
        });
    }

    Ok(entries)
}

/// Errors on `dir` itself (missing, unreadable) fail the listing; errors on a
/// single child carry a depth of at least one and only drop that child.
fn fails_listing(err: &ignore::Error) -> bool {
    err.depth().map_or(true, |depth| depth == 0)
}
