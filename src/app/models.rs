use crate::app::rules::RuleSet;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// How the rule set is interpreted during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Rules name what to exclude.
    #[default]
    Blacklist,
    /// Rules name what to include; whitelisted folders include their whole subtree.
    Whitelist,
}

impl FilterMode {
    pub fn description(self) -> &'static str {
        match self {
            FilterMode::Blacklist => "Blacklist (Excluding listed paths)",
            FilterMode::Whitelist => "Whitelist (Including only listed paths)",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Blacklist => f.write_str("blacklist"),
            FilterMode::Whitelist => f.write_str("whitelist"),
        }
    }
}

/// Where the rules of a scan came from, for the document header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesSource {
    File(PathBuf),
    Inline,
}

/// Everything the core needs for one scan. Built once, never mutated while scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub rules: RuleSet,
    pub mode: FilterMode,
    pub tree_blacklist: BTreeSet<PathBuf>,
    pub generate_tree: bool,
    pub rules_source: RulesSource,
}

/// A named set of scan settings as stored in the profiles file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<FilterMode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folders: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tree_blacklist: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_tree: Option<bool>,
}

/// Represents the final configuration after merging the profile and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub scan: ScanConfig,
    pub output: Option<PathBuf>,
    pub write_rules: Option<PathBuf>,
    pub profiles_path: PathBuf,
    /// Profile to store under the given name once the scan settings are resolved.
    pub save_profile: Option<(String, Profile)>,
}
