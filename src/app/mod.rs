mod wiring;

use crate::{cli, context, rest, storage::SqliteStorage};
use anyhow::{Context as AnyhowContext, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct App {
    pub ctx: context::Context,
    pub storage: SqliteStorage,
    shutdown: CancellationToken,
}

impl App {
    pub fn from_cli() -> Result<(Self, cli::Cli)> {
        let cli = crate::cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::tracing::init(ctx.log_file.as_deref());
        log::info!("🚀 Starting maintenance");
        log::info!("📂 Data dir: {}", ctx.data_dir.to_string_lossy());

        wiring::init_data_dir(&ctx).context("initializing data dir")?;
        let storage = wiring::init_storage(&ctx)?;
        log::info!("🗄️ Database: {}", storage.path);

        Ok((Self::new(ctx, storage), cli))
    }

    fn new(ctx: context::Context, storage: SqliteStorage) -> Self {
        Self {
            ctx,
            storage,
            shutdown: CancellationToken::new(),
        }
    }

    pub async fn run_daemon(&self) -> Result<()> {
        if let Some(path) = self.ctx.log_file.as_deref() {
            log::info!("📝 Log file: {}", path.to_string_lossy());
        }

        let mut rest_handle = self.spawn_rest_server();
        self.wait_for_shutdown(&mut rest_handle).await
    }

    fn spawn_rest_server(&self) -> JoinHandle<Result<()>> {
        let addr = self.ctx.api_listen;
        let storage = self.storage.clone();
        let token = self.shutdown.clone();

        tokio::spawn(async move {
            let result = rest::serve(addr, storage, token).await;
            if let Err(e) = &result {
                log::error!("REST server failed: {:#}", e);
            }
            result
        })
    }

    async fn wait_for_shutdown(&self, rest_task: &mut JoinHandle<Result<()>>) -> Result<()> {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => log::info!("🧨 Ctrl-C received, shutting down"),
            _ = &mut *rest_task => log::error!("REST task exited unexpectedly"),
        }

        self.shutdown.cancel();

        // Polling a finished JoinHandle again panics.
        if !rest_task.is_finished() {
            rest_task.await.context("joining REST task")??;
        }

        log::info!("✅ Shutdown complete");
        Ok(())
    }
}

pub async fn run() -> Result<()> {
    let (app, cli) = App::from_cli()?;

    if let Some(cmd) = &cli.cmd {
        // one-shot command mode
        return cmd.run(&app.storage);
    }

    app.run_daemon().await
}
