use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @const: Document extensions, in lookup order
pub const DOCUMENT_EXTENSIONS: [&str; 2] = ["html", "htm"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Read a newline-delimited list of item codes.
    ///
    /// Blank lines and `#` comments are ignored; duplicates keep their first position.
    pub fn read_item_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read item list: {:?}", path.as_ref()))?;
        Ok(Self::parse_item_list(&content))
    }

    /// Parse item codes from the text of an item list
    pub fn parse_item_list(content: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        content
            .lines()
            .map(|line| line.trim().trim_start_matches('\u{feff}').trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter(|line| seen.insert(line.to_string()))
            .map(str::to_string)
            .collect()
    }

    // @generates: Document file name for an item and language code
    pub fn document_file_name(item: &str, language_code: &str, extension: &str) -> String {
        format!("{}-table-{}.{}", item, language_code, extension)
    }

    /// Find the document of `item` in `language_code` inside `dir`, trying `.html` then `.htm`
    pub fn resolve_document<P: AsRef<Path>>(dir: P, item: &str, language_code: &str) -> Option<PathBuf> {
        DOCUMENT_EXTENSIONS
            .iter()
            .map(|ext| dir.as_ref().join(Self::document_file_name(item, language_code, ext)))
            .find(|path| Self::file_exists(path))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
