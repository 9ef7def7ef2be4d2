//! Multi-file project infrastructure
//!
//! Writes a project of Lijs sources and an optional `lijs.toml` into a
//! temporary directory, then compiles it through [`TestFixture::from_dir`].

use crate::{CompiledFile, TestFixture};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use lj_driver::Config;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A multi-file test project
#[derive(Debug)]
pub struct LijsProject {
    /// Name of the project directory
    pub name: String,
    /// File paths and their contents, in insertion order
    pub files: IndexMap<PathBuf, String>,
    /// Contents of `lijs.toml`, if any
    pub config: Option<String>,
}

impl LijsProject {
    /// Creates an empty project
    ///
    /// # Examples
    ///
    /// ```
    /// # use integration_tests::LijsProject;
    /// let project = LijsProject::new("my-project");
    /// assert!(project.files.is_empty());
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: IndexMap::new(),
            config: None,
        }
    }

    /// Adds a file to the project
    ///
    /// # Examples
    ///
    /// ```
    /// # use integration_tests::LijsProject;
    /// let mut project = LijsProject::new("test");
    /// project.add_file("main.lijs", "(echo hello)");
    /// ```
    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Sets the project's `lijs.toml`
    pub fn with_config(&mut self, contents: impl Into<String>) {
        self.config = Some(contents.into());
    }

    /// Writes the project to a temporary directory and compiles every source
    ///
    /// Files are returned sorted by path.
    ///
    /// # Errors
    ///
    /// Fails when the project cannot be written, the configuration is invalid
    /// or a source does not compile.
    pub fn compile(&self) -> Result<Vec<CompiledFile>> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let project_root = temp_dir.path().join(&self.name);
        fs::create_dir_all(&project_root).with_context(|| {
            format!("Failed to create project root: {}", project_root.display())
        })?;

        if let Some(config) = &self.config {
            fs::write(project_root.join(Config::FILE_NAME), config)
                .context("Failed to write configuration")?;
        }

        for (path, content) in &self.files {
            let full_path = project_root.join(path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
            fs::write(&full_path, content)
                .with_context(|| format!("Failed to write file: {}", full_path.display()))?;
        }

        TestFixture::from_dir(&project_root)?.compile()
    }
}
