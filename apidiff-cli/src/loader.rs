//! JSON symbol index: declaration trees stored as one `*.json` file per module.
//!
//! A module's name is its file name without the `.json` suffix, so
//! `System.Runtime.dll.json` holds the module `System.Runtime.dll`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use apidiff_core::types::Module;
use apidiff_core::{DiffError, SymbolIndex};
use thiserror::Error;

/// Errors raised while discovering or reading module files.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid module file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Symbol index over a directory of module files, or a single file.
#[derive(Debug, Clone)]
pub struct JsonIndex {
    root: PathBuf,
    files: BTreeMap<String, PathBuf>,
}

impl JsonIndex {
    /// Discover module files under `path`. Loading happens lazily, per module.
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let mut files = BTreeMap::new();
        if path.is_file() {
            if let Some(name) = module_name(path) {
                files.insert(name, path.to_path_buf());
            }
        } else {
            let entries = std::fs::read_dir(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            for entry in entries {
                let entry = entry.map_err(|source| LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                let file = entry.path();
                if !file.is_file() {
                    continue;
                }
                if let Some(name) = module_name(&file) {
                    files.insert(name, file);
                }
            }
        }

        tracing::debug!("Found {} module files in {}", files.len(), path.display());
        Ok(Self {
            root: path.to_path_buf(),
            files,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    fn read(&self, path: &Path) -> Result<Module, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl SymbolIndex for JsonIndex {
    fn module_names(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn load(&self, module: &str) -> apidiff_core::Result<Module> {
        let path = self.files.get(module).ok_or_else(|| DiffError::SymbolIndex {
            module: module.to_string(),
            message: "module not found".to_string(),
        })?;
        let mut loaded = self.read(path).map_err(|e| DiffError::SymbolIndex {
            module: module.to_string(),
            message: e.to_string(),
        })?;
        if loaded.name != module {
            tracing::debug!(
                "Module file {} names itself {}, using {}",
                path.display(),
                loaded.name,
                module
            );
            loaded.name = module.to_string();
        }
        Ok(loaded)
    }
}

/// Module name of a `*.json` file, or `None` for any other file.
fn module_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(".json")?;
    (!stem.is_empty()).then(|| stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MODULE_JSON: &str = r#"{
        "name": "Lib.dll",
        "namespaces": [
            { "name": "N", "symbol": { "kind": "namespace" } }
        ]
    }"#;

    #[test]
    fn test_module_name() {
        assert_eq!(
            module_name(Path::new("dir/Lib.dll.json")),
            Some("Lib.dll".to_string())
        );
        assert_eq!(module_name(Path::new("dir/readme.md")), None);
        assert_eq!(module_name(Path::new(".json")), None);
    }

    #[test]
    fn test_open_directory_and_load() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Lib.dll.json"), MODULE_JSON).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let index = JsonIndex::open(dir.path()).unwrap();
        assert_eq!(index.module_names(), vec!["Lib.dll".to_string()]);

        let module = index.load("Lib.dll").unwrap();
        assert_eq!(module.namespaces.len(), 1);
    }

    #[test]
    fn test_invalid_file_is_symbol_index_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Bad.dll.json"), "{ not json").unwrap();

        let index = JsonIndex::open(dir.path()).unwrap();
        assert!(matches!(
            index.load("Bad.dll"),
            Err(DiffError::SymbolIndex { .. })
        ));
    }

    #[test]
    fn test_single_file_renames_module() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Other.dll.json");
        fs::write(&path, MODULE_JSON).unwrap();

        let index = JsonIndex::open(&path).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.load("Other.dll").unwrap().name, "Other.dll");
    }

    #[test]
    fn test_missing_path() {
        let result = JsonIndex::open(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }
}
