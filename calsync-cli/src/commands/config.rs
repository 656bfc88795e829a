use std::path::Path;

use anyhow::Result;
use calsync_core::config::CalsyncConfig;
use owo_colors::OwoColorize;

pub fn run(config_path: &Path) -> Result<()> {
    let created = !config_path.exists();
    if created {
        CalsyncConfig::create_default(config_path)?;
    }

    println!("{}", "Paths".bold());
    print!("  Config:  {}", config_path.display());
    if created {
        print!(" {}", "(created)".green());
    }
    println!();

    if created {
        println!("\nFill in the [remote], [calendars] and [copy_criteria] sections, then run `calsync auth`.");
        return Ok(());
    }

    let config = CalsyncConfig::load(config_path)?;
    match config.logging.file_path() {
        Some(path) => println!("  Log:     {}", path.display()),
        None => println!("  Log:     {}", "stderr".dimmed()),
    }

    Ok(())
}
