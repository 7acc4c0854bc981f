//! Static profile page generation.
//!
//! [`ProfileWriter`] owns the I/O half of profile generation: it reads
//! the operator-supplied template, renders it through
//! [`tavern_core::profile`], and writes one HTML file per approved
//! character into the configured output directory. The directory is
//! served as static files under `/profiles/`.
//!
//! The template is re-read on every render so operators can edit it
//! without restarting the server; approvals are rare enough that the
//! extra read does not matter.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tavern_core::profile::{escape_html, render_list, render_paragraphs, render_template};
use tavern_db::models::character::Character;

/// Error type for profile generation failures.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Failed to read profile template {path}: {source}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write profile page {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Renders and writes static profile pages.
pub struct ProfileWriter {
    template_path: PathBuf,
    output_dir: PathBuf,
}

impl ProfileWriter {
    pub fn new(template_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Create the output directory if it does not exist yet.
    ///
    /// Called once at startup so approval-time writes never race
    /// directory creation.
    pub async fn ensure_output_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.output_dir).await
    }

    /// The on-disk path a character's profile page is written to.
    pub fn page_path(&self, slug: &str) -> PathBuf {
        self.output_dir.join(format!("{slug}.html"))
    }

    /// Render and write the profile page for an approved character.
    ///
    /// The write is atomic (temp file + rename) so a crash mid-write
    /// never leaves a half-rendered page being served. Re-approval of
    /// the same slug overwrites the previous page.
    pub async fn write(&self, character: &Character) -> Result<PathBuf, ProfileError> {
        let template = tokio::fs::read_to_string(&self.template_path)
            .await
            .map_err(|source| ProfileError::Template {
                path: self.template_path.clone(),
                source,
            })?;

        let html = render_template(&template, &template_vars(character));

        let final_path = self.page_path(&character.slug);
        let tmp_path = self.output_dir.join(format!("{}.html.tmp", character.slug));

        let write_result = async {
            tokio::fs::write(&tmp_path, html.as_bytes()).await?;
            tokio::fs::rename(&tmp_path, &final_path).await
        }
        .await;

        write_result.map_err(|source| ProfileError::Write {
            path: final_path.clone(),
            source,
        })?;

        tracing::info!(path = %final_path.display(), "Profile page written");
        Ok(final_path)
    }

    /// Remove a character's profile page if it exists.
    ///
    /// Returns `Ok(true)` if a page was removed, `Ok(false)` if none
    /// existed.
    pub async fn remove(&self, slug: &str) -> std::io::Result<bool> {
        let path = self.page_path(slug);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Profile page removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Build the substitution map for a character.
///
/// Everything is escaped here; the template receives ready-to-insert
/// HTML fragments.
fn template_vars(character: &Character) -> HashMap<&'static str, String> {
    let mut vars = HashMap::new();
    vars.insert("name", escape_html(&character.name));
    vars.insert("player_name", escape_html(&character.player_name));
    vars.insert("ancestry", escape_html(&character.ancestry));
    vars.insert("class", escape_html(&character.class));
    vars.insert("level", character.level.to_string());
    vars.insert(
        "alignment",
        escape_html(character.alignment.as_deref().unwrap_or("")),
    );
    vars.insert("backstory", render_paragraphs(&character.backstory));
    vars.insert(
        "appearance",
        render_paragraphs(character.appearance.as_deref().unwrap_or("")),
    );
    vars.insert("skills", render_list(&character.skills));
    vars.insert("inventory", render_list(&character.inventory));
    vars.insert(
        "approved_at",
        character
            .reviewed_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    );
    vars
}
