use anyhow::Result;
use calsync_core::SyncResult;
use calsync_core::config::CalsyncConfig;
use owo_colors::OwoColorize;
use tracing::info;

use crate::render::Render;
use crate::utils::tui;

pub async fn run(config: &CalsyncConfig) -> Result<()> {
    let reconciler = super::reconciler(config)?;

    println!("{}", reconciler.config().render());

    let spinner = tui::create_spinner("   Syncing");
    let result = reconciler.sync().await;
    spinner.finish_and_clear();

    let result = result?;
    log_summary(&result);
    println!("{}", result.render());

    if result.is_partial() {
        println!(
            "\n{}",
            "Some events were not accepted by the target calendar; the next run will retry them.".yellow()
        );
    }

    Ok(())
}

fn log_summary(result: &SyncResult) {
    info!(
        copied = result.copied(),
        deleted = result.deleted(),
        partial = result.is_partial(),
        "Sync finished"
    );
}
