mod app;
mod cli;
mod commands;
mod context;
mod rest;
mod service;
mod storage;
mod tracing;
mod types;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
