use crate::app::cli::Cli;
use crate::app::models::{Profile, RulesSource, RuntimeConfig, ScanConfig};
use crate::app::paths::{absolutize, display_name};
use crate::app::rules::RuleSet;
use crate::app::rules_file::load_rules;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Default)]
struct ProfilesFile {
    #[serde(flatten)]
    profiles: BTreeMap<String, Profile>,
}

/// `--config` if given, otherwise `~/.config/codebase_scan/profiles.toml`.
pub fn profiles_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join(".config")
        .join("codebase_scan")
        .join("profiles.toml"))
}

pub fn load_profiles(path: &Path) -> Result<BTreeMap<String, Profile>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profiles at {:?}", path))?;
    let parsed: ProfilesFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse profiles file {:?}", path))?;

    Ok(parsed.profiles)
}

/// Stores `profile` under `name`, replacing any existing entry.
pub fn save_profile(path: &Path, name: &str, profile: Profile) -> Result<()> {
    let mut profiles = load_profiles(path)?;
    profiles.insert(name.to_string(), profile);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    let content = toml::to_string_pretty(&ProfilesFile { profiles })
        .context("Failed to serialize profiles")?;
    fs::write(path, content).with_context(|| format!("Failed to write profiles to {:?}", path))
}

/// Concatenates profile and CLI values, dropping duplicates but keeping order.
fn merge_vecs<T: Clone + Eq + std::hash::Hash>(preset: Vec<T>, cli: Option<Vec<T>>) -> Vec<T> {
    let mut combined = preset;
    if let Some(mut cli_items) = cli {
        combined.append(&mut cli_items);
    }
    let mut seen = HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

fn resolve_all(paths: Vec<PathBuf>, base: &Path) -> Vec<PathBuf> {
    paths.iter().map(|p| absolutize(p, base)).collect()
}

/// Merges the selected profile with the command line.
///
/// Profile choice: `--profile` > a profile named after the scan root > none.
/// Paths given on the command line resolve against `cwd`, paths from a
/// profile or rules file against the scan root.
pub fn resolve_config(cli: Cli, cwd: &Path) -> Result<RuntimeConfig> {
    let profiles_path = profiles_path(cli.config.as_deref())?;
    let mut profiles = load_profiles(&profiles_path)?;

    let cli_root = cli.root.as_deref().map(|r| absolutize(r, cwd));
    let profile = match &cli.profile {
        Some(name) => match profiles.remove(name) {
            Some(profile) => profile,
            None => bail!("Profile {:?} not found in {:?}", name, profiles_path),
        },
        None => {
            let auto = display_name(cli_root.as_deref().unwrap_or(cwd));
            match profiles.remove(&auto) {
                Some(profile) => {
                    log::info!("Using profile {:?} matching the scan directory", auto);
                    profile
                }
                None => Profile::default(),
            }
        }
    };

    let root = cli_root
        .or_else(|| profile.root.as_deref().map(|r| absolutize(r, cwd)))
        .unwrap_or_else(|| absolutize(cwd, cwd));

    let mode = cli.mode.or(profile.mode).unwrap_or_default();

    let rules_file = cli
        .rules
        .as_deref()
        .map(|p| absolutize(p, cwd))
        .or_else(|| profile.rules_file.as_deref().map(|p| absolutize(p, &root)));

    let inline_files = merge_vecs(
        resolve_all(profile.files, &root),
        cli.files.map(|v| resolve_all(v, cwd)),
    );
    let inline_folders = merge_vecs(
        resolve_all(profile.folders, &root),
        cli.folders.map(|v| resolve_all(v, cwd)),
    );
    let tree_blacklist = merge_vecs(
        resolve_all(profile.tree_blacklist, &root),
        cli.tree_exclude.map(|v| resolve_all(v, cwd)),
    );
    let generate_tree = !cli.no_tree && profile.generate_tree.unwrap_or(true);
    let output = cli
        .output
        .as_deref()
        .map(|p| absolutize(p, cwd))
        .or_else(|| profile.output.as_deref().map(|p| absolutize(p, &root)));

    let mut rules = match &rules_file {
        Some(path) => load_rules(path, &root)?,
        None => RuleSet::default(),
    };
    rules.extend(RuleSet {
        files: inline_files.iter().cloned().collect(),
        folders: inline_folders.iter().cloned().collect(),
    });

    let save_profile = cli.save_profile.map(|name| {
        let snapshot = Profile {
            root: Some(root.clone()),
            output: output.clone(),
            rules_file: rules_file.clone(),
            mode: Some(mode),
            files: inline_files,
            folders: inline_folders,
            tree_blacklist: tree_blacklist.clone(),
            generate_tree: Some(generate_tree),
        };
        (name, snapshot)
    });

    Ok(RuntimeConfig {
        scan: ScanConfig {
            root,
            rules,
            mode,
            tree_blacklist: tree_blacklist.into_iter().collect(),
            generate_tree,
            rules_source: rules_file.map_or(RulesSource::Inline, RulesSource::File),
        },
        output,
        write_rules: cli.write_rules.as_deref().map(|p| absolutize(p, cwd)),
        profiles_path,
        save_profile,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::FilterMode;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("codebase_scan").chain(args.iter().copied()))
    }

    fn write_profiles(tmp: &TempDir, body: &str) -> String {
        let path = tmp.path().join("profiles.toml");
        fs::write(&path, body).unwrap();
        path.display().to_string()
    }

    #[test]
    fn merge_vecs_keeps_order_and_drops_duplicates() {
        let merged = merge_vecs(vec!["a", "b"], Some(vec!["b", "c", "a"]));
        assert_eq!(merged, vec!["a", "b", "c"]);
        assert_eq!(merge_vecs(vec![1], None), vec![1]);
    }

    #[test]
    fn defaults_without_profiles_file() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("none.toml").display().to_string();

        let config = resolve_config(cli(&["--config", &missing]), Path::new("/work/proj")).unwrap();
        assert_eq!(config.scan.root, PathBuf::from("/work/proj"));
        assert_eq!(config.scan.mode, FilterMode::Blacklist);
        assert!(config.scan.rules.is_empty());
        assert!(config.scan.generate_tree);
        assert_eq!(config.scan.rules_source, RulesSource::Inline);
        assert!(config.output.is_none());
        assert!(config.save_profile.is_none());
    }

    #[test]
    fn cli_paths_resolve_against_cwd() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("none.toml").display().to_string();

        let config = resolve_config(
            cli(&[
                "proj",
                "--config",
                &missing,
                "--mode",
                "whitelist",
                "--folder",
                "proj/src",
                "proj/./lib/",
                "--file",
                "proj/main.rs",
                "--tree-exclude",
                "proj/target",
                "--no-tree",
            ]),
            Path::new("/work"),
        )
        .unwrap();

        assert_eq!(config.scan.root, PathBuf::from("/work/proj"));
        assert_eq!(config.scan.mode, FilterMode::Whitelist);
        assert!(config.scan.rules.folders.contains(Path::new("/work/proj/src")));
        assert!(config.scan.rules.folders.contains(Path::new("/work/proj/lib")));
        assert!(config.scan.rules.files.contains(Path::new("/work/proj/main.rs")));
        assert!(config.scan.tree_blacklist.contains(Path::new("/work/proj/target")));
        assert!(!config.scan.generate_tree);
    }

    #[test]
    fn named_profile_is_merged_under_cli() {
        let tmp = tempfile::tempdir().unwrap();
        let rules = tmp.path().join("rules.txt");
        fs::write(&rules, "folder: src\nfile: /abs/x.rs\n").unwrap();
        let profiles = write_profiles(
            &tmp,
            &format!(
                r#"
[web]
root = "/srv/web"
rules_file = "{}"
mode = "whitelist"
tree_blacklist = ["node_modules"]
generate_tree = false
"#,
                rules.display()
            ),
        );

        let config = resolve_config(
            cli(&["--config", &profiles, "--profile", "web", "--mode", "blacklist"]),
            Path::new("/elsewhere"),
        )
        .unwrap();

        assert_eq!(config.scan.root, PathBuf::from("/srv/web"));
        assert_eq!(config.scan.mode, FilterMode::Blacklist);
        assert!(!config.scan.generate_tree);
        assert!(config.scan.rules.folders.contains(Path::new("/srv/web/src")));
        assert!(config.scan.rules.files.contains(Path::new("/abs/x.rs")));
        assert!(config
            .scan
            .tree_blacklist
            .contains(Path::new("/srv/web/node_modules")));
        assert_eq!(config.scan.rules_source, RulesSource::File(rules));
    }

    #[test]
    fn profile_is_picked_by_root_name() {
        let tmp = tempfile::tempdir().unwrap();
        let profiles = write_profiles(&tmp, "[proj]\nmode = \"whitelist\"\n");

        let config = resolve_config(cli(&["--config", &profiles]), Path::new("/work/proj")).unwrap();
        assert_eq!(config.scan.mode, FilterMode::Whitelist);
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let profiles = write_profiles(&tmp, "[proj]\n");

        let err = resolve_config(cli(&["--config", &profiles, "--profile", "nope"]), Path::new("/w"))
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn saved_profile_round_trips_through_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sub").join("profiles.toml");
        let profile = Profile {
            root: Some(PathBuf::from("/srv/app")),
            mode: Some(FilterMode::Whitelist),
            folders: vec![PathBuf::from("/srv/app/src")],
            generate_tree: Some(true),
            ..Default::default()
        };

        save_profile(&path, "app", profile.clone()).unwrap();
        save_profile(&path, "other", Profile::default()).unwrap();

        let loaded = load_profiles(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["app"], profile);
    }

    #[test]
    fn save_profile_snapshot_reflects_resolved_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("none.toml").display().to_string();

        let config = resolve_config(
            cli(&["--config", &missing, "--save-profile", "mine", "--folder", "src"]),
            Path::new("/work/proj"),
        )
        .unwrap();

        let (name, snapshot) = config.save_profile.unwrap();
        assert_eq!(name, "mine");
        assert_eq!(snapshot.root, Some(PathBuf::from("/work/proj")));
        assert_eq!(snapshot.folders, vec![PathBuf::from("/work/proj/src")]);
        assert_eq!(snapshot.mode, Some(FilterMode::Blacklist));
    }
}
