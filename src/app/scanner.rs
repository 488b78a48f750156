use crate::app::language::language_hint;
use crate::app::listing::{list_dir, Entry, EntryKind};
use crate::app::models::FilterMode;
use crate::app::paths::display_name;
use crate::app::rules::RuleSet;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const EMPTY_FOLDER_NOTE: &str =
    "*This folder is empty or all its contents were excluded/not included by rules.*";

/// Recursive directory walker that writes the per-directory sections of the
/// scan document.
///
/// Output is pre-order: a directory's heading and files come before any of
/// its subdirectories. A directory with no files of its own only gets a
/// heading if something below it produces output, so its heading is held in
/// `pending` and written by the first descendant that emits anything.
pub struct Scanner<'a> {
    rules: &'a RuleSet,
    mode: FilterMode,
    progress: &'a mut dyn FnMut(&str),
    pending: Vec<String>,
    active: HashSet<PathBuf>,
}

impl<'a> Scanner<'a> {
    pub fn new(rules: &'a RuleSet, mode: FilterMode, progress: &'a mut dyn FnMut(&str)) -> Self {
        Self {
            rules,
            mode,
            progress,
            pending: Vec::new(),
            active: HashSet::new(),
        }
    }

    /// Walks `dir` and everything below it, returning whether anything was
    /// written for this subtree.
    ///
    /// `ancestors` are the whitelisted folders above `dir`. Only failures of
    /// `out` itself are returned as errors; unreadable directories and files
    /// become annotations in the document.
    pub fn walk<W: Write>(
        &mut self,
        dir: &Path,
        out: &mut W,
        depth: usize,
        ancestors: &[PathBuf],
    ) -> io::Result<bool> {
        // Symlinked directories are followed, so guard against cycles.
        let real = fs::canonicalize(dir).ok();
        if let Some(real) = &real {
            if !self.active.insert(real.clone()) {
                log::debug!("Skipping {:?}: already being walked via {:?}", dir, real);
                return Ok(false);
            }
        }

        let result = self.visit(dir, out, depth, ancestors);

        if let Some(real) = &real {
            self.active.remove(real);
        }
        result
    }

    fn visit<W: Write>(
        &mut self,
        dir: &Path,
        out: &mut W,
        depth: usize,
        ancestors: &[PathBuf],
    ) -> io::Result<bool> {
        let current = self.rules.extend_ancestors(dir, self.mode, ancestors);
        let heading = "#".repeat(depth + 2);
        let in_scope =
            self.mode == FilterMode::Whitelist && self.rules.is_in_scope(dir, ancestors);

        (self.progress)(&format!("Processing: {}", dir.display()));

        let entries = match list_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                (self.progress)(&format!("Error reading: {} - {}", dir.display(), err));
                log::warn!("Cannot read directory {:?}: {}", dir, err);
                if self.mode == FilterMode::Blacklist || in_scope {
                    self.flush_pending(out)?;
                    write!(
                        out,
                        "{heading} Error Reading Directory\n\n**Path:** `{}`\n\n**Error:** `{}`\n\n",
                        dir.display(),
                        err
                    )?;
                    return Ok(true);
                }
                return Ok(false);
            }
        };

        let mut files: Vec<&Entry> = Vec::new();
        let mut subdirs: Vec<&Entry> = Vec::new();
        for entry in &entries {
            match entry.kind {
                EntryKind::File => {
                    if self
                        .rules
                        .should_process(&entry.path, true, self.mode, &current)
                    {
                        files.push(entry);
                    }
                }
                EntryKind::Dir => {
                    if self.should_recurse(&entry.path, &current) {
                        subdirs.push(entry);
                    }
                }
                EntryKind::Other => log::debug!("Skipping {:?}: not a file or directory", entry.path),
            }
        }

        // Everything except "a child produced output" is known before recursing.
        let shows_empty = entries.is_empty()
            && match self.mode {
                FilterMode::Blacklist => depth == 0,
                FilterMode::Whitelist => in_scope,
            };
        let section = format!(
            "{heading} Directory: {}\n\n**Path:** `{}`\n\n",
            display_name(dir),
            dir.display()
        );

        if !files.is_empty() || shows_empty {
            self.flush_pending(out)?;
            out.write_all(section.as_bytes())?;
            if files.is_empty() {
                writeln!(out, "{}\n", EMPTY_FOLDER_NOTE)?;
            } else {
                writeln!(out, "{heading}# Files\n")?;
                for file in &files {
                    self.write_file(file, out)?;
                }
            }
            for sub in &subdirs {
                self.walk(&sub.path, out, depth + 1, &current)?;
            }
            return Ok(true);
        }

        let mark = self.pending.len();
        self.pending.push(section);
        let mut child_content = false;
        for sub in &subdirs {
            child_content |= self.walk(&sub.path, out, depth + 1, &current)?;
        }
        self.pending.truncate(mark);
        Ok(child_content)
    }

    /// Whether a subdirectory is entered at all.
    ///
    /// In whitelist mode this is looser than `should_process`: a directory
    /// that is not whitelisted itself is still entered when a rule points
    /// somewhere inside it.
    fn should_recurse(&self, dir: &Path, ancestors: &[PathBuf]) -> bool {
        match self.mode {
            FilterMode::Blacklist => self.rules.should_process(dir, false, self.mode, ancestors),
            FilterMode::Whitelist => {
                self.rules.should_process(dir, false, self.mode, ancestors)
                    || self.rules.may_contain_rules(dir)
            }
        }
    }

    fn write_file<W: Write>(&mut self, file: &Entry, out: &mut W) -> io::Result<()> {
        writeln!(out, "**File:** `{}`", file.name)?;
        match fs::read(&file.path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                write!(
                    out,
                    "```{}\n{}\n```\n\n",
                    language_hint(&file.name),
                    content
                )?;
            }
            Err(err) => {
                (self.progress)(&format!(
                    "Error reading file: {} - {}",
                    file.path.display(),
                    err
                ));
                log::warn!("Cannot read file {:?}: {}", file.path, err);
                write!(out, "**Error reading file:** `{}`\n\n", err)?;
            }
        }
        Ok(())
    }

    fn flush_pending<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for section in self.pending.drain(..) {
            out.write_all(section.as_bytes())?;
        }
        Ok(())
    }
}
