use crate::app::models::FilterMode;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Concatenate a directory tree into a single Markdown document, filtered by path rules"
)]
pub struct Cli {
    /// Directory to scan (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// How rules are applied
    #[arg(long, value_enum)]
    pub mode: Option<FilterMode>,

    /// Rules file with `file:` / `folder:` lines
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Additional file rules
    #[arg(long = "file", num_args = 1..)]
    pub files: Option<Vec<PathBuf>>,

    /// Additional folder rules
    #[arg(long = "folder", num_args = 1..)]
    pub folders: Option<Vec<PathBuf>>,

    /// Folders to leave out of the directory tree preview
    #[arg(long, num_args = 1..)]
    pub tree_exclude: Option<Vec<PathBuf>>,

    /// Skip the directory tree preview
    #[arg(long)]
    pub no_tree: bool,

    /// Write the document here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Use a named profile from the profiles file
    #[arg(long)]
    pub profile: Option<String>,

    /// Store the resolved settings as a named profile
    #[arg(long)]
    pub save_profile: Option<String>,

    /// Save the merged rule set to a rules file
    #[arg(long)]
    pub write_rules: Option<PathBuf>,

    /// Profiles file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log progress for every directory visited
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
