/// Local message template store.
///
/// Each template is stored in a redb table keyed by its id, with the value
/// bincode-serialized. The store is the "simple create/update/delete
/// collection" the editor is embedded in; the editor itself never touches it.
use std::path::Path;

use anyhow::{bail, Context, Result};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use template_pad_core::highlight::variable_names;

/// Template table: id → bincode(`MessageTemplate`).
const TEMPLATES: TableDefinition<&str, &[u8]> = TableDefinition::new("templates");

/// Delivery channel a template is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Channel {
    #[default]
    WhatsApp,
    Email,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::WhatsApp, Channel::Email];

    pub fn label(self) -> &'static str {
        match self {
            Channel::WhatsApp => "WhatsApp",
            Channel::Email => "E-mail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub id: String,
    pub name: String,
    pub channel: Channel,
    /// Plain text with `{{variable}}` placeholders.
    pub body: String,
    /// Unix epoch milliseconds of the last write.
    pub updated_at_ms: i64,
}

impl MessageTemplate {
    /// Distinct variable names used in the body, in order of first use.
    pub fn variables(&self) -> Vec<String> {
        variable_names(&self.body)
    }
}

/// Persistence layer for templates, backed by redb.
pub struct TemplateStore {
    db: Database,
}

impl std::fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateStore").finish()
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn validated_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Template name must not be empty");
    }
    Ok(name.to_string())
}

impl TemplateStore {
    /// Opens or creates the store at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }
        let db = Database::create(path)
            .with_context(|| format!("Failed to open template database: {}", path.display()))?;

        let write_txn = db
            .begin_write()
            .context("Failed to begin initial write transaction")?;
        {
            let _ = write_txn
                .open_table(TEMPLATES)
                .context("Failed to create templates table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initial transaction")?;

        Ok(Self { db })
    }

    /// Stores a new template under a fresh v4 UUID.
    pub fn create(&self, name: &str, channel: Channel, body: &str) -> Result<MessageTemplate> {
        let template = MessageTemplate {
            id: uuid::Uuid::new_v4().to_string(),
            name: validated_name(name)?,
            channel,
            body: body.to_string(),
            updated_at_ms: now_ms(),
        };
        self.put(&template)?;
        tracing::info!(id = %template.id, name = %template.name, "template created");
        Ok(template)
    }

    /// Replaces name and body of an existing template.
    pub fn update(&self, id: &str, name: &str, body: &str) -> Result<MessageTemplate> {
        let Some(mut template) = self.get(id)? else {
            bail!("Template not found: {id}");
        };
        template.name = validated_name(name)?;
        template.body = body.to_string();
        template.updated_at_ms = now_ms();
        self.put(&template)?;
        tracing::debug!(id, "template updated");
        Ok(template)
    }

    /// Removes a template. Returns false if it did not exist.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        let existed = {
            let mut table = write_txn
                .open_table(TEMPLATES)
                .context("Failed to open templates table")?;
            let removed = table.remove(id).context("Failed to remove template")?;
            removed.is_some()
        };
        write_txn
            .commit()
            .context("Failed to commit template deletion")?;
        if existed {
            tracing::info!(id, "template deleted");
        }
        Ok(existed)
    }

    pub fn get(&self, id: &str) -> Result<Option<MessageTemplate>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(TEMPLATES)
            .context("Failed to open templates table")?;

        match table.get(id).context("Failed to read template")? {
            Some(guard) => {
                let template: MessageTemplate = bincode::deserialize(guard.value())
                    .with_context(|| format!("Failed to deserialize template {id}"))?;
                Ok(Some(template))
            }
            None => Ok(None),
        }
    }

    /// All templates, sorted by name (case-insensitive), then id.
    pub fn list(&self) -> Result<Vec<MessageTemplate>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(TEMPLATES)
            .context("Failed to open templates table")?;

        let mut templates = Vec::new();
        for entry in table.iter().context("Failed to iterate templates")? {
            let (key, value) = entry.context("Failed to read template entry")?;
            match bincode::deserialize::<MessageTemplate>(value.value()) {
                Ok(template) => templates.push(template),
                Err(e) => tracing::warn!("Skipping unreadable template {}: {e}", key.value()),
            }
        }
        templates.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(templates)
    }

    fn put(&self, template: &MessageTemplate) -> Result<()> {
        let bytes = bincode::serialize(template).context("Failed to serialize template")?;

        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(TEMPLATES)
                .context("Failed to open templates table")?;
            table
                .insert(template.id.as_str(), bytes.as_slice())
                .context("Failed to insert template")?;
        }
        write_txn.commit().context("Failed to commit template")?;
        Ok(())
    }
}
