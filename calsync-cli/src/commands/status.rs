use anyhow::Result;
use calsync_core::config::CalsyncConfig;
use tracing::info;

use crate::render::{PlanRender, Render};
use crate::utils::tui;

pub async fn run(config: &CalsyncConfig, verbose: bool) -> Result<()> {
    let reconciler = super::reconciler(config)?;

    println!("{}", reconciler.config().render());

    let spinner = tui::create_spinner("   Comparing calendars");
    let plan = reconciler.plan().await;
    spinner.finish_and_clear();

    let plan = plan?;
    info!(
        to_copy = plan.to_copy.len(),
        to_delete = plan.to_delete.len(),
        "Compared calendars"
    );
    println!("{}", plan.render(verbose));

    Ok(())
}
