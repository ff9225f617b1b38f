use anyhow::{Context, Result, bail};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;

/// Present a single-choice menu and return the chosen item. The choice is
/// final; re-running the command is the only way to pick again.
pub fn select_one(prompt: &str, items: &[String]) -> Result<String> {
    if items.is_empty() {
        bail!("nothing to select from for '{prompt}'");
    }

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()
        .context("selection prompt failed")?;

    match choice {
        Some(idx) => Ok(items[idx].clone()),
        None => bail!("selection cancelled"),
    }
}
