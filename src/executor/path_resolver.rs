use std::fs::{self, ReadDir};
use std::io;
use std::path::{Path, PathBuf};

use crate::environment::{Environment, split_search_path};

/// Finds the preferred executable for a name fragment by scanning `PATH`.
///
/// Directories are visited in `PATH` order and each one's entries in listing
/// order. The first entry whose file name contains the fragment wins.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResolver {
    dirs: Vec<PathBuf>,
}

enum DirScan {
    Listed(ReadDir),
    Skipped(io::Error),
}

impl DirScan {
    fn open(dir: &Path) -> Self {
        match fs::read_dir(dir) {
            Ok(listing) => DirScan::Listed(listing),
            Err(e) => DirScan::Skipped(e),
        }
    }
}

impl PathResolver {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        PathResolver { dirs }
    }

    pub fn from_path_var(path: &str) -> Self {
        PathResolver::new(split_search_path(path))
    }

    pub fn from_env(env: &Environment) -> Self {
        PathResolver::new(env.search_path())
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn resolve(&self, fragment: &str) -> Option<PathBuf> {
        if fragment.is_empty() {
            return None;
        }

        for dir in &self.dirs {
            let listing = match DirScan::open(dir) {
                DirScan::Listed(listing) => listing,
                DirScan::Skipped(e) => {
                    log::debug!("skipping {}: {}", dir.display(), e);
                    continue;
                }
            };

            let found = listing
                .filter_map(Result::ok)
                .find(|entry| entry.file_name().to_string_lossy().contains(fragment));

            if let Some(entry) = found {
                let path = entry.path();
                log::debug!("resolved {} to {}", fragment, path.display());
                return Some(path);
            }
        }

        None
    }
}
