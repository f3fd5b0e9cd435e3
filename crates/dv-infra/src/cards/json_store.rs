use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use dv_core::card::next_z_index;
use dv_core::geometry::PercentPoint;
use dv_core::ports::CardRepositoryPort;
use dv_core::{Card, CardId, CardPatch, NewCard, ProjectId};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProjectCards {
    #[serde(default)]
    file_cards: Vec<Card>,
}

/// Card store keeping one JSON file per project.
///
/// Every write goes through a temp file and a rename, so a crash leaves either
/// the old or the new file. Writes are serialized by an internal lock.
pub struct JsonCardStore {
    dir: PathBuf,
    default_position: PercentPoint,
    write_lock: Mutex<()>,
}

impl JsonCardStore {
    pub fn new(dir: impl Into<PathBuf>, default_position: PercentPoint) -> Self {
        Self {
            dir: dir.into(),
            default_position,
            write_lock: Mutex::new(()),
        }
    }

    /// `<dir>/<escaped project id>.json`. Bytes outside `[A-Za-z0-9-]` become
    /// `_XX`, so distinct ids never share a file.
    fn project_path(&self, project_id: &ProjectId) -> PathBuf {
        let mut name = String::with_capacity(project_id.as_str().len());
        for byte in project_id.as_str().bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("_{byte:02X}"));
            }
        }
        self.dir.join(format!("{name}.json"))
    }

    async fn load(&self, path: &Path) -> Result<ProjectCards> {
        match fs::read_to_string(path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("parse cards failed: {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ProjectCards::default()),
            Err(e) => {
                Err(e).with_context(|| format!("read cards failed: {}", path.display()))
            }
        }
    }

    async fn atomic_write(&self, path: &Path, cards: &ProjectCards) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create cards dir failed: {}", self.dir.display()))?;

        let content = serde_json::to_string_pretty(cards).context("serialize cards failed")?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp cards failed: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).await.with_context(|| {
            format!(
                "rename temp cards to target failed: {} -> {}",
                tmp_path.display(),
                path.display()
            )
        })?;
        Ok(())
    }

    /// Project files currently on disk.
    async fn project_files(&self) -> Result<Vec<PathBuf>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("list cards dir failed: {}", self.dir.display()))
            }
        };
        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("list cards dir failed: {}", self.dir.display()))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl CardRepositoryPort for JsonCardStore {
    async fn list(&self, project_id: &ProjectId) -> Result<Vec<Card>> {
        let mut cards = self.load(&self.project_path(project_id)).await?.file_cards;
        cards.retain(|c| &c.project_id == project_id);
        cards.sort_by_key(|c| c.z_index);
        Ok(cards)
    }

    async fn create(&self, card: NewCard) -> Result<Card> {
        let _guard = self.write_lock.lock().await;
        let path = self.project_path(&card.project_id);
        let mut project = self.load(&path).await?;

        let now = Utc::now();
        let position = card.position.unwrap_or(self.default_position);
        let created = Card {
            id: CardId::new(),
            z_index: next_z_index(
                project
                    .file_cards
                    .iter()
                    .filter(|c| c.project_id == card.project_id),
            ),
            project_id: card.project_id,
            filename: card.filename,
            source: card.source,
            position_x: position.x,
            position_y: position.y,
            is_expanded: false,
            is_minimized: false,
            created_at: now,
            updated_at: now,
        };
        project.file_cards.push(created.clone());
        self.atomic_write(&path, &project).await?;

        debug!(card_id = %created.id, z_index = created.z_index, "card created");
        Ok(created)
    }

    async fn update(&self, id: &CardId, patch: CardPatch) -> Result<Option<Card>> {
        let _guard = self.write_lock.lock().await;
        for path in self.project_files().await? {
            let mut project = self.load(&path).await?;
            let Some(card) = project.file_cards.iter_mut().find(|c| &c.id == id) else {
                continue;
            };
            card.apply(&patch);
            card.updated_at = Utc::now();
            let updated = card.clone();
            self.atomic_write(&path, &project).await?;
            return Ok(Some(updated));
        }
        Ok(None)
    }

    async fn delete(&self, id: &CardId) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        for path in self.project_files().await? {
            let mut project = self.load(&path).await?;
            let before = project.file_cards.len();
            project.file_cards.retain(|c| &c.id != id);
            if project.file_cards.len() < before {
                self.atomic_write(&path, &project).await?;
                debug!(card_id = %id, "card deleted");
                return Ok(true);
            }
        }
        Ok(false)
    }
}
