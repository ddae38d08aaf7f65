pub mod account;
pub mod chat;
pub mod embed;
pub mod operations;

use anyhow::{Context, Result};
use colored::Colorize;
use ragwidget_application::WidgetOrchestrator;
use ragwidget_core::backend::UploadFile;
use ragwidget_core::conversation::ChatEntry;
use ragwidget_core::event::WidgetEvent;
use ragwidget_core::operation::Dispatch;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tokio::sync::broadcast;

use crate::render;

/// Bot entries appended after the first `seen` entries.
pub(crate) fn new_replies(orchestrator: &WidgetOrchestrator, seen: usize) -> Vec<ChatEntry> {
    orchestrator
        .entries()
        .into_iter()
        .skip(seen)
        .filter(|e| e.is_bot())
        .collect()
}

pub(crate) fn print_replies(orchestrator: &WidgetOrchestrator, seen: usize) {
    for entry in new_replies(orchestrator, seen) {
        render::entry(&entry);
    }
}

pub(crate) async fn read_upload(path: &Path) -> Result<UploadFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file: {}", path.display()))?;
    Ok(UploadFile::new(file_name, bytes))
}

/// Runs an upload while drawing its progress on stderr. The final state is
/// left for the caller to render.
pub(crate) async fn upload_with_progress(
    orchestrator: &WidgetOrchestrator,
    file: UploadFile,
) -> Dispatch {
    let printer = tokio::spawn(print_progress(orchestrator.subscribe()));
    let dispatch = orchestrator.upload_file(file).await;
    if dispatch == Dispatch::Completed {
        let _ = printer.await;
    } else {
        printer.abort();
    }
    dispatch
}

async fn print_progress(mut events: broadcast::Receiver<WidgetEvent>) {
    while let Ok(event) = events.recv().await {
        match event {
            WidgetEvent::UploadProgress { percent } => {
                eprint!("\r{}", format!("Uploading... {:>3}%", percent).bright_black());
            }
            WidgetEvent::UploadFinished { .. } => {
                eprintln!();
                break;
            }
            _ => {}
        }
    }
}

/// Asks a yes/no question on stdin. Anything but `y`/`yes` is a no.
pub(crate) fn ask_yes_no(message: &str) -> bool {
    print!("{} {} ", message.yellow(), "[y/N]".bright_black());
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
