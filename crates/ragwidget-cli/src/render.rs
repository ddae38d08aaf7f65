use colored::Colorize;
use ragwidget_application::ClearOutcome;
use ragwidget_core::conversation::{ChatEntry, ChatRole};
use ragwidget_core::knowledge::KnowledgeState;
use ragwidget_core::operation::{Dispatch, StatusRecord, UploadState};

pub fn entry(entry: &ChatEntry) {
    match entry.role {
        ChatRole::User => println!("{}", format!("> {}", entry.content).green()),
        ChatRole::Bot => {
            for line in entry.content.lines() {
                println!("{}", line.bright_blue());
            }
            for (index, source) in entry.sources.iter().enumerate() {
                let title = source.title.as_deref().unwrap_or(&source.url);
                println!(
                    "{}",
                    format!(
                        "  [{}] {} ({}, score {:.2})",
                        index + 1,
                        title,
                        source.url,
                        source.relevance_score
                    )
                    .bright_black()
                );
            }
        }
    }
}

pub fn status(status: Option<&StatusRecord>) {
    let Some(status) = status else {
        return;
    };
    println!("{}", status.title.bright_magenta().bold());
    println!("{}", status.message);
    if let Some(details) = &status.details {
        println!("{}", details.bright_black());
    }
}

pub fn knowledge(state: &KnowledgeState) {
    println!("{}", "Knowledge base".bright_magenta().bold());
    println!("  Documents:    {}", state.document_count);
    println!("  Status:       {}", state.status);
    if !state.last_updated.is_empty() {
        println!("  Last updated: {}", state.last_updated);
    }
}

pub fn upload(state: &UploadState) {
    if let Some(status) = &state.status {
        println!("{}", status.green());
    }
    if let Some(error) = &state.error {
        println!("{}", error.red());
    }
}

pub fn clear(outcome: &ClearOutcome) {
    match outcome {
        ClearOutcome::Declined => println!("{}", "Cancelled.".yellow()),
        ClearOutcome::Cleared => {}
        ClearOutcome::Failed { alert } => eprintln!("{}", alert.red()),
    }
}

/// Explains a dispatch that did not run. Returns `true` if it did.
pub fn dispatch(dispatch: Dispatch) -> bool {
    match dispatch {
        Dispatch::Completed => true,
        Dispatch::Ignored => {
            println!("{}", "Nothing to send.".bright_black());
            false
        }
        Dispatch::Busy => {
            println!("{}", "Still working on the previous request.".yellow());
            false
        }
    }
}
