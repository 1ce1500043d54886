use globset::{Glob, GlobSetBuilder};
use itertools::Itertools;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use std::{
    fs,
    io::Error,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, error, warn};

/// thread count used to locate report files when none was given
pub const DEFAULT_THREADS: &str = "4";

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("Globs were invalid")]
    InvalidGlobs(#[from] globset::Error),
    #[error("File not found")]
    FileNotFound,
    #[error("Failed to read config file")]
    ReadFailed(#[from] Error),
    #[error("Failed to deserialize config")]
    Deserialize(#[from] serde_yaml::Error),
    #[error("Config failed preflight checks")]
    FailedPreflight,
}

/// A benchmarked proving system and the hashes it has reports for
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PackageEntry {
    pub name: String,
    #[serde(default)]
    pub hashes: Vec<String>,
}

impl PackageEntry {
    pub fn new<S: Into<String>>(name: impl Into<String>, hashes: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            hashes: hashes.into_iter().map(Into::into).collect(),
        }
    }
}

/// packages rendered when no config file overrides the catalog
pub static DEFAULT_CATALOG: Lazy<Vec<PackageEntry>> = Lazy::new(|| {
    vec![
        PackageEntry::new("binius", ["groestl", "keccak"]),
        PackageEntry::new("plonky3", ["blake3", "keccak", "poseidon2"]),
        PackageEntry::new("stwo", ["blake2s", "poseidon2"]),
    ]
});

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    // kept as text, it only ever ends up in file names
    #[serde(default = "default_threads", deserialize_with = "threads_as_text")]
    pub threads: String,
    #[serde(default)]
    pub strict_line_count: bool,
    // directory containing one sub directory per package
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_catalog")]
    pub packages: Vec<PackageEntry>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            strict_line_count: false,
            root: default_root(),
            packages: default_catalog(),
        }
    }
}

impl ReportConfig {
    /// load a config from a yaml file
    pub fn load(path: &Path) -> Result<Self, ConfigErrors> {
        if !path.is_file() {
            return Err(ConfigErrors::FileNotFound);
        }

        let contents = fs::read_to_string(path)?;
        debug!(path = ?path, "Loaded report config");

        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigErrors> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Check and normalize the catalog, returns true if any error was found
    pub fn preflight_checks(&mut self) -> bool {
        // collect every problem before bailing to make fixing a config a single pass
        let mut contains_error = false;

        if self.packages.is_empty() {
            error!("No package was defined, there is nothing to render");
            contains_error = true;
        }

        if self.threads.trim().is_empty() {
            warn!("threads is empty, report files will be looked up as `t_<hash>_lp<n>`");
        } else if has_separator(&self.threads) {
            warn!(
                "threads ({}) contains a path separator, report files will likely not be found",
                self.threads
            );
        }

        for package in self.packages.iter_mut() {
            package.name = package.name.trim().to_string();

            if package.name.is_empty() {
                error!("packages contains an entry with an empty name");
                contains_error = true;
            } else if has_separator(&package.name) {
                error!(
                    "packages.{} must be a single directory name, not a path",
                    package.name
                );
                contains_error = true;
            }

            if package.hashes.is_empty() {
                warn!(
                    "packages.{} has no hashes, only the table header will be rendered",
                    package.name
                );
            }

            for hash in package.hashes.iter_mut() {
                *hash = hash.trim().to_string();

                if hash.is_empty() {
                    error!("packages.{} contains an empty hash name", package.name);
                    contains_error = true;
                } else if has_separator(hash) {
                    error!(
                        "packages.{}.hashes contains {hash} which is not a plain name",
                        package.name
                    );
                    contains_error = true;
                }
            }

            for hash in package.hashes.iter().duplicates() {
                error!("packages.{} lists {hash} more than once", package.name);
                contains_error = true;
            }
        }

        for name in self
            .packages
            .iter()
            .map(|package| &package.name)
            .filter(|name| !name.is_empty())
            .duplicates()
        {
            error!("Package {name} is defined more than once");
            contains_error = true;
        }

        contains_error
    }

    /// Select all packages matching any of the globs, keeping catalog order.
    /// An empty selection keeps the whole catalog.
    pub fn select_packages<S: AsRef<str>>(
        &self,
        globs: &[S],
    ) -> Result<Vec<PackageEntry>, ConfigErrors> {
        if globs.is_empty() {
            return Ok(self.packages.clone());
        }

        let mut builder = GlobSetBuilder::new();
        for glob in globs {
            builder.add(Glob::new(glob.as_ref())?);
        }
        let matcher = builder.build()?;

        let selected = self
            .packages
            .iter()
            .filter(|package| matcher.is_match(&package.name))
            .cloned()
            .collect_vec();

        if selected.is_empty() {
            warn!("No package matched the selection, only a blank line will be rendered");
        }

        Ok(selected)
    }
}

fn has_separator(name: &str) -> bool {
    name.contains(['/', '\\'])
}

fn default_threads() -> String {
    DEFAULT_THREADS.to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_catalog() -> Vec<PackageEntry> {
    DEFAULT_CATALOG.clone()
}

// accept both `threads: 4` and `threads: "4"`
fn threads_as_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Threads {
        Text(String),
        Number(u64),
    }

    Ok(match Threads::deserialize(deserializer)? {
        Threads::Text(text) => text,
        Threads::Number(number) => number.to_string(),
    })
}
