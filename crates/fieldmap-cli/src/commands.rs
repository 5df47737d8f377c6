use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use fieldmap_client::MappingClient;
use fieldmap_editor::{MappingApi, MappingEditor};

use fieldmap_cli::config::ResolvedConfig;
use fieldmap_cli::edit::EditPlan;

use crate::cli::{EditArgs, SettingsArgs};
use crate::summary::{print_catalog, print_grouped, print_report, print_rows, print_settings};

pub fn run_fields(config: &ResolvedConfig) -> Result<()> {
    let client = MappingClient::new(&config.client).context("create HTTP client")?;
    let catalog = client
        .fetch_fields(&config.scope)
        .with_context(|| format!("fetch fields for {}", config.scope))?;
    print_catalog(&config.scope, &catalog);
    Ok(())
}

pub fn run_show(config: &ResolvedConfig) -> Result<()> {
    let client = MappingClient::new(&config.client).context("create HTTP client")?;
    let mut editor = MappingEditor::new(config.editor);
    // rows stay usable without a catalog; targets show as not loaded
    if let Err(error) = editor.load_fields(&client, &config.scope) {
        warn!(%error, "continuing without field catalog");
    }
    editor
        .load_existing(&client, &config.scope)
        .with_context(|| format!("load mappings for {}", config.scope))?;
    print_rows(&editor);
    println!();
    print_grouped(&editor.payload());
    Ok(())
}

/// Loads the stored mappings, applies the plan and saves the full list.
pub fn run_edit(config: &ResolvedConfig, args: &EditArgs) -> Result<()> {
    let span = info_span!("edit", scope = %config.scope);
    let _guard = span.enter();

    let client = MappingClient::new(&config.client).context("create HTTP client")?;
    let mut editor = MappingEditor::new(config.editor);
    editor
        .load_fields(&client, &config.scope)
        .with_context(|| format!("fetch fields for {}", config.scope))?;
    editor
        .load_existing(&client, &config.scope)
        .with_context(|| format!("load mappings for {}", config.scope))?;

    let plan = EditPlan {
        removals: args.remove.clone(),
        additions: args.add.clone(),
    };
    let report = plan.apply(&mut editor)?;
    print_rows(&editor);
    print_report(&report);

    if args.dry_run {
        println!("Dry run: nothing saved.");
        return Ok(());
    }
    if plan.is_empty() {
        info!("no changes requested, saving current rows");
    }
    let saved = editor
        .save(&client, &config.scope)
        .with_context(|| format!("save mappings for {}", config.scope))?;
    println!("Saved {saved} mappings.");
    Ok(())
}

pub fn run_settings(config: &ResolvedConfig, args: &SettingsArgs) -> Result<()> {
    let settings = args.settings();
    let client = MappingClient::new(&config.client).context("create HTTP client")?;
    client
        .save_sync_settings(&settings)
        .context("save sync settings")?;
    print_settings(&settings);
    Ok(())
}
