//! Integration test utilities for the Lijs compiler

pub mod project;

pub use project::LijsProject;

use anyhow::{Context, Result};
use lj_driver::{Compilation, Compiler, Config, is_source_file};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One compiled source file of a fixture
#[derive(Debug)]
pub struct CompiledFile {
    /// Path relative to the fixture root
    pub path: PathBuf,
    /// Compilation result
    pub compilation: Compilation,
}

/// Test fixture holding every source file of a directory
#[derive(Debug)]
pub struct TestFixture {
    /// Configuration read from `lijs.toml`, or the default
    pub config: Config,
    /// Sources keyed by path relative to the fixture root, sorted by path
    pub files: Vec<(PathBuf, String)>,
}

impl TestFixture {
    /// Loads an entire directory as a test fixture
    ///
    /// Recursively walks the directory and loads all `.lijs` files. A
    /// `lijs.toml` at the root replaces the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if directory traversal, file reading or the
    /// configuration fails
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let base_path = dir.as_ref();
        let config = if base_path.join(Config::FILE_NAME).is_file() {
            Config::find_in_dir(base_path)?
        } else {
            Config::default()
        };

        let mut fixture = Self {
            config,
            files: Vec::new(),
        };
        fixture.load_dir_recursive(base_path, base_path)?;
        fixture.files.sort_by(|left, right| left.0.cmp(&right.0));

        Ok(fixture)
    }

    fn load_dir_recursive(&mut self, base_path: &Path, current_path: &Path) -> Result<()> {
        let entries = fs::read_dir(current_path)
            .with_context(|| format!("Failed to read directory: {}", current_path.display()))?;

        for entry in entries {
            let path = entry?.path();

            if path.is_dir() {
                self.load_dir_recursive(base_path, &path)?;
            } else if path.is_file() && is_source_file(&path) {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read source file: {}", path.display()))?;
                let relative_path = path.strip_prefix(base_path)?.to_path_buf();
                self.files.push((relative_path, contents));
            }
        }

        Ok(())
    }

    /// Compiles every file with the fixture's configuration
    ///
    /// # Errors
    ///
    /// Returns the first file that fails to compile, with its path as context
    pub fn compile(&self) -> Result<Vec<CompiledFile>> {
        let compiler = Compiler::new(self.config.clone());
        self.files
            .iter()
            .map(|(path, source)| {
                let compilation = compiler
                    .compile(source)
                    .with_context(|| format!("Failed to compile {}", path.display()))?;
                Ok(CompiledFile {
                    path: path.clone(),
                    compilation,
                })
            })
            .collect()
    }
}

/// Compiles `source` with the default configuration into compact ESTree JSON
///
/// # Errors
///
/// Fails when the source does not compile.
pub fn compile_to_json(source: &str) -> Result<String> {
    let compilation = lj_driver::compile(source)?;
    Ok(compilation.to_json()?)
}

/// Checks that every introduced name is unique and a usable identifier
///
/// # Errors
///
/// Describes the first offending name.
pub fn check_names(names: &[String]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for name in names {
        if name.starts_with(|first: char| first.is_ascii_digit()) {
            return Err(format!("name `{name}` starts with a digit"));
        }
        if !seen.insert(name.as_str()) {
            return Err(format!("name `{name}` is introduced twice"));
        }
    }
    Ok(())
}
