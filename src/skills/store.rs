// Directory-backed skill store
// Each skill lives in <root>/<name>/<file_name>

use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::name::{normalize_name, validate_name};
use super::StoreError;
use crate::logger;

/// Listing entry for a single skill
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkillSummary {
    pub name: String,
}

/// A skill together with its markdown document
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Skill {
    pub name: String,
    pub content: String,
}

/// Skill collection rooted at a directory
#[derive(Debug, Clone)]
pub struct SkillStore {
    root: PathBuf,
    file_name: String,
}

impl SkillStore {
    pub fn new(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn skill_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn skill_file(&self, name: &str) -> PathBuf {
        self.skill_dir(name).join(&self.file_name)
    }

    /// List every skill, sorted by name.
    ///
    /// A missing root is created and reported as an empty collection.
    /// Directories without a skill document are not skills and are skipped.
    pub async fn list(&self) -> Result<Vec<SkillSummary>, StoreError> {
        if !path_exists(&self.root).await? {
            fs::create_dir_all(&self.root)
                .await
                .map_err(|e| StoreError::io(&self.root, e))?;
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| StoreError::io(&self.root, e))?;

        let mut skills = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.root, e))?
        {
            let path = entry.path();
            if !is_dir(&path).await || !is_file(&path.join(&self.file_name)).await {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => skills.push(SkillSummary { name }),
                Err(raw) => {
                    logger::log_warning(&format!("Skipping non UTF-8 skill directory: {raw:?}"));
                }
            }
        }

        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    /// Read a skill document
    pub async fn get(&self, name: &str) -> Result<Skill, StoreError> {
        validate_name(name)?;
        let file = self.skill_file(name);
        if !is_file(&file).await {
            return Err(StoreError::NotFound(name.to_string()));
        }

        let content = fs::read_to_string(&file)
            .await
            .map_err(|e| StoreError::io(&file, e))?;

        Ok(Skill {
            name: name.to_string(),
            content,
        })
    }

    /// Create a new skill and return its normalized name.
    ///
    /// Fails with [`StoreError::AlreadyExists`] when anything already occupies
    /// the skill's directory path.
    pub async fn create(&self, raw_name: &str, content: &str) -> Result<String, StoreError> {
        let name = normalize_name(raw_name)?;
        let dir = self.skill_dir(&name);

        if path_exists(&dir).await? {
            return Err(StoreError::AlreadyExists(name));
        }

        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::io(&dir, e))?;

        let file = dir.join(&self.file_name);
        fs::write(&file, content)
            .await
            .map_err(|e| StoreError::io(&file, e))?;

        logger::log_info(&format!("[Skills] Created '{name}'"));
        Ok(name)
    }

    /// Replace the document of an existing skill
    pub async fn update(&self, name: &str, content: &str) -> Result<(), StoreError> {
        validate_name(name)?;
        let file = self.skill_file(name);
        if !is_file(&file).await {
            return Err(StoreError::NotFound(name.to_string()));
        }

        fs::write(&file, content)
            .await
            .map_err(|e| StoreError::io(&file, e))?;

        logger::log_info(&format!("[Skills] Updated '{name}'"));
        Ok(())
    }

    /// Remove a skill directory and everything in it.
    ///
    /// The directory does not need to hold a skill document to be removed.
    pub async fn delete(&self, name: &str) -> Result<(), StoreError> {
        validate_name(name)?;
        let dir = self.skill_dir(name);
        if !path_exists(&dir).await? {
            return Err(StoreError::NotFound(name.to_string()));
        }

        fs::remove_dir_all(&dir)
            .await
            .map_err(|e| StoreError::io(&dir, e))?;

        logger::log_info(&format!("[Skills] Deleted '{name}'"));
        Ok(())
    }
}

async fn path_exists(path: &Path) -> Result<bool, StoreError> {
    fs::try_exists(path)
        .await
        .map_err(|e| StoreError::io(path, e))
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SkillStore {
        SkillStore::new(dir.path().join("skills"), "SKILL.md")
    }

    async fn write_skill(store: &SkillStore, name: &str, content: &str) {
        let dir = store.root().join(name);
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(dir.join("SKILL.md"), content).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_creates_missing_root() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        assert!(store.list().await.unwrap().is_empty());
        assert!(store.root().is_dir());
    }

    #[tokio::test]
    async fn test_list_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        write_skill(&store, "zeta", "z").await;
        write_skill(&store, "alpha", "a").await;
        fs::create_dir_all(store.root().join("empty-dir")).await.unwrap();
        fs::write(store.root().join("stray.md"), "not a skill").await.unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_get_returns_content() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        write_skill(&store, "writer", "# Writer\n\nBody").await;

        let skill = store.get("writer").await.unwrap();
        assert_eq!(skill.name, "writer");
        assert_eq!(skill.content, "# Writer\n\nBody");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::create_dir_all(store.root().join("hollow")).await.unwrap();

        assert!(matches!(
            store.get("ghost").await,
            Err(StoreError::NotFound(name)) if name == "ghost"
        ));
        assert!(matches!(
            store.get("hollow").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_normalizes_and_writes() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        let name = store.create("  Code Review ", "# Review").await.unwrap();
        assert_eq!(name, "code-review");

        let on_disk = fs::read_to_string(store.root().join("code-review/SKILL.md"))
            .await
            .unwrap();
        assert_eq!(on_disk, "# Review");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates_and_blank_names() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.create("docs", "v1").await.unwrap();

        assert!(matches!(
            store.create("Docs", "v2").await,
            Err(StoreError::AlreadyExists(name)) if name == "docs"
        ));
        assert!(matches!(
            store.create("   ", "x").await,
            Err(StoreError::NameRequired)
        ));
        assert_eq!(store.get("docs").await.unwrap().content, "v1");
    }

    #[tokio::test]
    async fn test_create_conflicts_with_existing_directory() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::create_dir_all(store.root().join("taken")).await.unwrap();

        assert!(matches!(
            store.create("taken", "x").await,
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_update_overwrites_existing() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        write_skill(&store, "notes", "a much longer original body").await;

        store.update("notes", "short").await.unwrap();
        assert_eq!(store.get("notes").await.unwrap().content, "short");

        assert!(matches!(
            store.update("missing", "x").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(!store.root().join("missing").exists());
    }

    #[tokio::test]
    async fn test_delete_removes_directory_tree() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        write_skill(&store, "gone", "bye").await;
        fs::write(store.root().join("gone/extra.txt"), "asset").await.unwrap();
        fs::create_dir_all(store.root().join("no-doc")).await.unwrap();

        store.delete("gone").await.unwrap();
        assert!(!store.root().join("gone").exists());

        store.delete("no-doc").await.unwrap();
        assert!(!store.root().join("no-doc").exists());

        assert!(matches!(
            store.delete("gone").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_names_cannot_escape_root() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.list().await.unwrap();
        fs::write(tmp.path().join("SKILL.md"), "outside").await.unwrap();

        assert!(matches!(store.get("..").await, Err(StoreError::InvalidName(_))));
        assert!(matches!(
            store.delete("..").await,
            Err(StoreError::InvalidName(_))
        ));
        assert!(matches!(
            store.update("../skills", "x").await,
            Err(StoreError::InvalidName(_))
        ));
        assert!(tmp.path().join("SKILL.md").exists());
    }
}
