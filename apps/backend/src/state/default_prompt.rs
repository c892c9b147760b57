//! Process-wide default system preamble.
//!
//! New accounts are created with it, and callers without a stored preamble
//! fall back to it. It lives in memory and is mirrored to a text file so an
//! admin edit survives restarts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

/// Built-in preamble used when no file exists or an admin clears it.
pub const BUILTIN_PROMPT: &str = "\
## LANGUAGE AND ANSWER RULES

1. **Language**
   - Always answer in German, even when the question is in English.
   - Translate technical terms: \"AI\" becomes \"KI\", \"Machine Learning\" becomes \"ML\".

2. **Legal references**
   - When context documents are used, name the document title in parentheses.
   - If the context holds nothing relevant, say so: (Keine passenden Informationen gefunden.)

3. **Style**
   - Structure answers with paragraphs or lists.
   - Stay factual and easy to follow.
";

#[derive(Debug)]
struct Inner {
    text: RwLock<String>,
    path: PathBuf,
    // Serializes replace() so the file always matches the last swap.
    persist: Mutex<()>,
}

#[derive(Debug, Clone)]
pub struct DefaultPrompt {
    inner: Arc<Inner>,
}

impl DefaultPrompt {
    /// In-memory prompt backed by `path`, without touching the filesystem.
    pub fn new(text: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                text: RwLock::new(text.into()),
                path: path.into(),
                persist: Mutex::new(()),
            }),
        }
    }

    /// Read the preamble from `path`.
    ///
    /// A missing, unreadable or empty file falls back to [`BUILTIN_PROMPT`],
    /// which is then written to `path`. A failed write is logged and ignored.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match tokio::fs::read_to_string(&path).await {
            Ok(text) if !text.is_empty() => {
                tracing::info!(path = %path.display(), "default prompt loaded");
                return Self::new(text, path);
            }
            Ok(_) => tracing::warn!(path = %path.display(), "default prompt file is empty"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "default prompt file unreadable")
            }
        }

        if let Err(e) = write_file(&path, BUILTIN_PROMPT).await {
            tracing::warn!(path = %path.display(), error = %e, "could not write built-in default prompt");
        }
        Self::new(BUILTIN_PROMPT, path)
    }

    pub fn current(&self) -> String {
        self.inner.text.read().clone()
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Replace the preamble and persist it. Empty text restores the built-in one.
    pub async fn replace(&self, text: &str) -> std::io::Result<()> {
        let text = if text.is_empty() { BUILTIN_PROMPT } else { text };

        let _guard = self.inner.persist.lock().await;
        *self.inner.text.write() = text.to_string();
        write_file(&self.inner.path, text).await
    }
}

async fn write_file(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, text).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_falls_back_and_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("default_prompt.txt");

        let prompt = DefaultPrompt::load(&path).await;

        assert_eq!(prompt.current(), BUILTIN_PROMPT);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), BUILTIN_PROMPT);
    }

    #[tokio::test]
    async fn empty_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default_prompt.txt");
        std::fs::write(&path, "").unwrap();

        let prompt = DefaultPrompt::load(&path).await;
        assert_eq!(prompt.current(), BUILTIN_PROMPT);
    }

    #[tokio::test]
    async fn existing_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default_prompt.txt");
        std::fs::write(&path, "Be brief.").unwrap();

        let prompt = DefaultPrompt::load(&path).await;
        assert_eq!(prompt.current(), "Be brief.");
    }

    #[tokio::test]
    async fn replace_persists_and_empty_restores_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default_prompt.txt");
        let prompt = DefaultPrompt::new("old", &path);

        prompt.replace("new rules").await.unwrap();
        assert_eq!(prompt.current(), "new rules");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new rules");

        prompt.replace("").await.unwrap();
        assert_eq!(prompt.current(), BUILTIN_PROMPT);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), BUILTIN_PROMPT);
    }
}
