//! Manage saved sessions.

use chrono::Local;
use photobooth_common::config::AppConfig;
use photobooth_model::{group_by_month, sort_newest_first};
use photobooth_session_store::{JsonDirStore, SessionStore};

use crate::GalleryCommand;

pub async fn run(config: &AppConfig, command: GalleryCommand) -> anyhow::Result<()> {
    let store = JsonDirStore::open(&config.store_dir).await?;

    match command {
        GalleryCommand::List { json } => {
            let mut records = store.list_all().await?;
            sort_newest_first(&mut records);

            if json {
                let entries: Vec<_> = records
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "id": r.id,
                            "timestamp": r.timestamp,
                            "layout_id": r.layout_id,
                            "filter_id": r.filter_id,
                            "format": r.composite.format,
                            "bytes": r.composite.bytes.len(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            if records.is_empty() {
                println!("No saved sessions in {}", store.root().display());
                return Ok(());
            }
            for group in group_by_month(&records, &Local) {
                println!("{}", group.label);
                for record in group.records {
                    println!("  #{:<5} {}", record.id.to_string(), record.meta_line(&Local));
                }
            }
        }
        GalleryCommand::Export { id, path } => {
            let record = store.get(id).await?;
            let path = if path.is_dir() {
                path.join(format!("session-{id}.{}", record.composite.format.extension()))
            } else {
                path
            };
            tokio::fs::write(&path, &record.composite.bytes).await?;
            println!("Wrote {}", path.display());
        }
        GalleryCommand::Delete { id } => {
            store.delete(id).await?;
            println!("Deleted session #{id}");
        }
        GalleryCommand::Clear { yes } => {
            if !yes {
                anyhow::bail!("Refusing to delete every session without --yes");
            }
            store.clear_all().await?;
            println!("Cleared all sessions");
        }
    }
    Ok(())
}
