use crate::app::models::{FilterMode, RulesSource, ScanConfig};
use crate::app::paths::display_name;
use crate::app::scanner::Scanner;
use crate::app::tree::render_tree;
use std::io::{self, Write};

pub struct DocumentWriter;

impl DocumentWriter {
    /// Writes the whole scan document for `config` to `out` in a single pass.
    ///
    /// Returns whether the walk produced any directory section.
    pub fn write<W: Write>(
        config: &ScanConfig,
        out: &mut W,
        progress: &mut dyn FnMut(&str),
    ) -> io::Result<bool> {
        if config.generate_tree {
            progress("Generating directory tree...");
            out.write_all(Self::tree_section(config).as_bytes())?;
        }
        out.write_all(Self::header(config).as_bytes())?;

        let mut ancestors = Vec::new();
        if config.mode == FilterMode::Whitelist && config.rules.folders.contains(&config.root) {
            ancestors.push(config.root.clone());
        }

        let mut scanner = Scanner::new(&config.rules, config.mode, progress);
        scanner.walk(&config.root, out, 0, &ancestors)
    }

    pub fn tree_section(config: &ScanConfig) -> String {
        let name = display_name(&config.root);
        let tree = render_tree(&config.root, &config.tree_blacklist);

        let mut out = format!("# Directory Tree for: {}\n\n", name);
        if tree.is_empty() {
            out.push_str(&format!(
                "{}/\n (No subdirectories found or all were blacklisted)\n",
                name
            ));
        } else {
            out.push_str(&tree);
        }
        out.push_str("\n\n---\n\n");
        out
    }

    pub fn header(config: &ScanConfig) -> String {
        let rules_from = match &config.rules_source {
            RulesSource::File(path) => {
                format!("`{}` (from `{}`)", display_name(path), path.display())
            }
            RulesSource::Inline => "`Command-line rules (no rules file)`".to_string(),
        };
        format!(
            "# Codebase Scan: {}\n\n**Mode:** `{}`\n**Rules From:** {}\n\n",
            display_name(&config.root),
            config.mode.description(),
            rules_from
        )
    }
}
