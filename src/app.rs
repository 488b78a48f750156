// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;
pub mod language;
pub mod listing;
pub mod models;
pub mod paths;
pub mod rules;
pub mod rules_file;
pub mod scanner;
pub mod tree;

use anyhow::{bail, Context, Result};
use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};

use self::cli::Cli;
use self::config::{resolve_config, save_profile};
use self::formatter::DocumentWriter;
use self::rules_file::save_rules;

/// Initializes components and orchestrates data flow.
pub fn run(args: Cli) -> Result<()> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;

    let config = resolve_config(args, &current_dir)?;
    let scan = &config.scan;

    if !scan.root.is_dir() {
        bail!("Scan directory {:?} is not a directory", scan.root);
    }
    if scan.rules.is_empty() && scan.mode == models::FilterMode::Whitelist {
        log::warn!("Whitelist mode without any rules: the document will have no content.");
    }

    if let Some((name, profile)) = config.save_profile.clone() {
        save_profile(&config.profiles_path, &name, profile)?;
        log::info!("Saved profile {:?} to {:?}", name, config.profiles_path);
    }
    if let Some(path) = &config.write_rules {
        save_rules(path, &scan.rules)?;
        log::info!("Wrote rules to {:?}", path);
    }

    log::info!(
        "Starting {} scan of {:?} ({} file rules, {} folder rules)",
        scan.mode,
        scan.root,
        scan.rules.files.len(),
        scan.rules.folders.len()
    );
    let mut progress = |msg: &str| log::debug!("{}", msg);

    let wrote = match &config.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Could not create save directory {:?}", parent))?;
            }
            let file = File::create(path)
                .with_context(|| format!("Could not open output file {:?}", path))?;
            let mut out = BufWriter::new(file);
            let wrote = DocumentWriter::write(scan, &mut out, &mut progress)
                .and_then(|wrote| out.flush().map(|_| wrote))
                .with_context(|| format!("Failed writing to {:?}", path))?;
            log::info!("Scan complete. Output saved to: {}", path.display());
            wrote
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            DocumentWriter::write(scan, &mut out, &mut progress)
                .and_then(|wrote| out.flush().map(|_| wrote))
                .context("Failed writing to stdout")?
        }
    };

    if !wrote {
        log::warn!("⚠️ No content matched the current rules.");
    }

    Ok(())
}
