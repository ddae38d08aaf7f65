//! One-shot subcommands. Each builds a fresh orchestrator, runs a single
//! operation and prints the outcome.

use anyhow::{Result, bail};
use colored::Colorize;
use ragwidget_application::{AutoConfirm, ClearOutcome, ConfirmationPrompt};
use std::path::Path;

use super::{ask_yes_no, print_replies, read_upload, upload_with_progress};
use crate::context::{self, GlobalArgs};
use crate::render;

pub async fn query(args: &GlobalArgs, text: &str) -> Result<()> {
    let orchestrator = context::build(args)?;
    let seen = orchestrator.entries().len();
    if render::dispatch(orchestrator.submit_query(text).await) {
        print_replies(&orchestrator, seen);
    }
    Ok(())
}

pub async fn scrape(args: &GlobalArgs, url: &str) -> Result<()> {
    let orchestrator = context::build(args)?;
    if render::dispatch(orchestrator.scrape_url(url).await) {
        render::status(orchestrator.scrape_status().as_ref());
    }
    Ok(())
}

pub async fn bulk_scrape(args: &GlobalArgs, base_url: &str) -> Result<()> {
    let orchestrator = context::build(args)?;
    if render::dispatch(orchestrator.bulk_scrape(base_url).await) {
        render::status(orchestrator.scrape_status().as_ref());
        println!(
            "{}",
            "Ingestion continues on the server; run `ragwidget stats` to follow it.".bright_black()
        );
    }
    Ok(())
}

pub async fn upload(args: &GlobalArgs, path: &Path) -> Result<()> {
    let file = read_upload(path).await?;
    let orchestrator = context::build(args)?;
    upload_with_progress(&orchestrator, file).await;
    let state = orchestrator.snapshot().upload;
    render::upload(&state);
    if let Some(error) = state.error {
        bail!(error);
    }
    Ok(())
}

pub async fn stats(args: &GlobalArgs) -> Result<()> {
    let orchestrator = context::build(args)?;
    if !orchestrator.refresh_knowledge_stats().await {
        bail!("Failed to load knowledge base statistics");
    }
    render::knowledge(&orchestrator.knowledge());
    Ok(())
}

pub async fn clear(args: &GlobalArgs, yes: bool) -> Result<()> {
    let orchestrator = context::build(args)?;
    let auto = AutoConfirm(true);
    let interactive = |message: &str| ask_yes_no(message);
    let confirmer: &dyn ConfirmationPrompt = if yes { &auto } else { &interactive };

    let seen = orchestrator.entries().len();
    let outcome = orchestrator.clear_knowledge(confirmer).await;
    render::clear(&outcome);
    match outcome {
        ClearOutcome::Cleared => {
            print_replies(&orchestrator, seen);
            Ok(())
        }
        ClearOutcome::Declined => Ok(()),
        ClearOutcome::Failed { alert } => bail!(alert),
    }
}
