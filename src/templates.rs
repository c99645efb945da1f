/*!
 * Document-pair generation from per-language templates.
 *
 * Each template is loaded with the encoding-preserving loader, the item
 * token is substituted, and the result is saved with the template's
 * encoding and trailing line breaks.
 */

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::file_utils::{FileManager, DOCUMENT_EXTENSIONS};

/// Default token replaced by the item code
pub const DEFAULT_TOKEN: &str = "{{CODE}}";

/// Template file name for a language code
pub fn template_file_name(language_code: &str, extension: &str) -> String {
    format!("template-{}.{}", language_code, extension)
}

/// Find the template for `language_code` in `dir`, trying `.html` then `.htm`
pub fn find_template<P: AsRef<Path>>(dir: P, language_code: &str) -> Option<(PathBuf, &'static str)> {
    DOCUMENT_EXTENSIONS.iter().find_map(|ext| {
        let path = dir.as_ref().join(template_file_name(language_code, ext));
        FileManager::file_exists(&path).then_some((path, *ext))
    })
}

/// Generates item documents from templates
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    /// Token replaced by the item code
    token: String,
    /// Overwrite documents that already exist
    force: bool,
}

impl TemplateGenerator {
    pub fn new(token: impl Into<String>, force: bool) -> Self {
        Self { token: token.into(), force }
    }

    /// Generate documents for every item in every language; returns the written paths
    pub fn generate_pairs<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        template_dir: P1,
        items: &[String],
        language_codes: &[&str],
        out_dir: P2,
    ) -> Result<Vec<PathBuf>> {
        if self.token.is_empty() {
            return Err(anyhow!("Template token must not be empty"));
        }
        FileManager::ensure_dir(&out_dir)?;

        let mut written = Vec::new();
        for code in language_codes {
            let (template_path, extension) = find_template(&template_dir, code).ok_or_else(|| {
                anyhow!("No template for language '{}' in {:?}", code, template_dir.as_ref())
            })?;
            let template = Document::load(&template_path)
                .with_context(|| format!("Failed to load template {:?}", template_path))?;
            if !template.text.contains(&self.token) {
                warn!("Template {:?} does not contain the token '{}'", template_path, self.token);
            }

            for item in items {
                let target = out_dir
                    .as_ref()
                    .join(FileManager::document_file_name(item, code, extension));
                if target.exists() && !self.force {
                    debug!("Keeping existing {:?}", target);
                    continue;
                }

                let text = template.text.replace(&self.token, item);
                crate::document::save(&target, &text, template.encoding, &template.trailing_newline)?;
                written.push(target);
            }
        }

        info!("Generated {} document(s) for {} item(s)", written.len(), items.len());
        Ok(written)
    }
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN, false)
    }
}
