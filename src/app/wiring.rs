use anyhow::{Context, Result};

use crate::{context, storage::SqliteStorage};

pub fn init_data_dir(ctx: &context::Context) -> Result<()> {
    std::fs::create_dir_all(&ctx.data_dir)?;
    Ok(())
}

pub fn init_storage(ctx: &context::Context) -> Result<SqliteStorage> {
    let sqlite = SqliteStorage::new(ctx.db_path());
    if ctx.reset {
        log::warn!("🧹 Resetting database {}", sqlite.path);
        sqlite.reset_all().context("resetting storage")?;
    }
    sqlite.init().context("initializing storage")?;
    Ok(sqlite)
}
