use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;

use ragwidget_application::WidgetOrchestrator;
use ragwidget_core::conversation::ChatEntry;
use ragwidget_core::identity::Role;
use ragwidget_core::knowledge::KnowledgeState;
use ragwidget_core::operation::{Dispatch, StatusRecord, UploadState};

use super::{ask_yes_no, new_replies, print_replies, read_upload, upload_with_progress};
use crate::context::{self, GlobalArgs};
use crate::render;

/// A slash command as offered by `/help` and completion.
struct CommandInfo {
    name: &'static str,
    argument: Option<&'static str>,
    description: &'static str,
    admin_only: bool,
}

static COMMANDS: [CommandInfo; 9] = [
    CommandInfo {
        name: "/scrape",
        argument: Some("<url>"),
        description: "Scrape one page into the knowledge base",
        admin_only: true,
    },
    CommandInfo {
        name: "/bulk",
        argument: Some("<url>"),
        description: "Crawl a site and ingest what it finds",
        admin_only: true,
    },
    CommandInfo {
        name: "/upload",
        argument: Some("<path>"),
        description: "Upload a document",
        admin_only: true,
    },
    CommandInfo {
        name: "/stats",
        argument: None,
        description: "Show knowledge base statistics",
        admin_only: false,
    },
    CommandInfo {
        name: "/clear",
        argument: None,
        description: "Delete every document",
        admin_only: true,
    },
    CommandInfo {
        name: "/whoami",
        argument: None,
        description: "Show your role",
        admin_only: false,
    },
    CommandInfo {
        name: "/logout",
        argument: None,
        description: "Remove the stored token and exit",
        admin_only: false,
    },
    CommandInfo {
        name: "/help",
        argument: None,
        description: "List commands",
        admin_only: false,
    },
    CommandInfo {
        name: "/quit",
        argument: None,
        description: "Exit",
        admin_only: false,
    },
];

fn commands_for(role: Role) -> impl Iterator<Item = &'static CommandInfo> {
    COMMANDS
        .iter()
        .filter(move |command| role.is_admin() || !command.admin_only)
}

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChatCommand {
    Query(String),
    Scrape(String),
    Bulk(String),
    Upload(PathBuf),
    Stats,
    Clear,
    Whoami,
    Logout,
    Help,
    Quit,
    Unknown(String),
}

impl ChatCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if !line.starts_with('/') {
            return Self::Query(line.to_string());
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        match command {
            "/scrape" => Self::Scrape(rest.to_string()),
            "/bulk" => Self::Bulk(rest.to_string()),
            "/upload" => Self::Upload(PathBuf::from(rest)),
            "/stats" => Self::Stats,
            "/clear" => Self::Clear,
            "/whoami" => Self::Whoami,
            "/logout" => Self::Logout,
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Parses a line, treating ingestion commands as unknown for non-admins.
    fn parse_for(line: &str, role: Role) -> Self {
        match Self::parse(line) {
            Self::Scrape(_) | Self::Bulk(_) | Self::Upload(_) | Self::Clear if !role.is_admin() => {
                Self::Unknown(line.split_whitespace().next().unwrap_or_default().to_string())
            }
            command => command,
        }
    }
}

/// Completes paths below the directory named in `partial`.
///
/// Directories get a trailing `/`. Dotfiles are listed only once the name
/// being completed starts with a dot.
fn complete_path(partial: &str) -> Vec<String> {
    let (dir_part, name_part) = match partial.rfind('/') {
        Some(index) => partial.split_at(index + 1),
        None => ("", partial),
    };
    let dir = if dir_part.is_empty() {
        Path::new(".")
    } else {
        Path::new(dir_part)
    };
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut matches: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(name_part) || (name.starts_with('.') && !name_part.starts_with('.'))
            {
                return None;
            }
            let suffix = if entry.path().is_dir() { "/" } else { "" };
            Some(format!("{}{}{}", dir_part, name, suffix))
        })
        .collect();
    matches.sort();
    matches
}

/// rustyline helper for the chat prompt.
///
/// Offers only the commands the role may use and completes file paths after
/// `/upload`.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<&'static CommandInfo>,
}

impl CliHelper {
    fn new(role: Role) -> Self {
        Self {
            commands: commands_for(role).collect(),
        }
    }

    fn candidates(&self, line: &str) -> (usize, Vec<Pair>) {
        if let Some(rest) = line.strip_prefix("/upload ") {
            if !self.commands.iter().any(|c| c.name == "/upload") {
                return (0, Vec::new());
            }
            let partial = rest.trim_start();
            let start = line.len() - partial.len();
            let pairs = complete_path(partial)
                .into_iter()
                .map(|path| Pair {
                    display: path
                        .trim_end_matches('/')
                        .rsplit('/')
                        .next()
                        .unwrap_or_default()
                        .to_string(),
                    replacement: path,
                })
                .collect();
            return (start, pairs);
        }

        if line.starts_with('/') && !line.contains(' ') {
            let pairs = self
                .commands
                .iter()
                .filter(|c| c.name.starts_with(line))
                .map(|c| Pair {
                    display: c.name.to_string(),
                    replacement: c.name.to_string(),
                })
                .collect();
            (0, pairs)
        } else {
            (0, Vec::new())
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(&line[..pos]))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match line.split_once(' ') {
            Some((command, rest)) if line.starts_with('/') => {
                Owned(format!("{} {}", command.bright_cyan(), rest))
            }
            _ if line.starts_with('/') => Owned(line.bright_cyan().to_string()),
            _ => Borrowed(line),
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }

        // Exact match: show the argument it expects
        if let Some(command) = self.commands.iter().find(|c| c.name == line) {
            return command.argument.map(|argument| format!(" {}", argument));
        }
        self.commands
            .iter()
            .find(|c| c.name.starts_with(line))
            .map(|c| c.name[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}

fn print_help(role: Role) {
    println!("  {:<16} {}", "<text>".bright_cyan(), "Ask a question".bright_black());
    for command in commands_for(role) {
        let usage = match command.argument {
            Some(argument) => format!("{} {}", command.name, argument),
            None => command.name.to_string(),
        };
        println!(
            "  {:<16} {}",
            usage.bright_cyan(),
            command.description.bright_black()
        );
    }
}

/// Result of a background request, printed by the response handler.
enum ChatResponse {
    Replies(Vec<ChatEntry>),
    Status(Option<StatusRecord>),
    Upload(UploadState),
    Knowledge(KnowledgeState),
    NotRun(Dispatch),
    Error(String),
}

fn print_response(response: ChatResponse) {
    match response {
        ChatResponse::Replies(entries) => entries.iter().for_each(render::entry),
        ChatResponse::Status(status) => render::status(status.as_ref()),
        ChatResponse::Upload(state) => render::upload(&state),
        ChatResponse::Knowledge(knowledge) => render::knowledge(&knowledge),
        ChatResponse::NotRun(dispatch) => {
            render::dispatch(dispatch);
        }
        ChatResponse::Error(message) => eprintln!("{}", message.red()),
    }
}

/// Runs one backend request and describes its outcome.
async fn execute(orchestrator: WidgetOrchestrator, command: ChatCommand) -> ChatResponse {
    let dispatch = match command {
        ChatCommand::Query(text) => {
            let seen = orchestrator.entries().len();
            match orchestrator.submit_query(&text).await {
                Dispatch::Completed => return ChatResponse::Replies(new_replies(&orchestrator, seen)),
                other => other,
            }
        }
        ChatCommand::Scrape(url) => orchestrator.scrape_url(&url).await,
        ChatCommand::Bulk(url) => orchestrator.bulk_scrape(&url).await,
        ChatCommand::Upload(path) => {
            let file = match read_upload(&path).await {
                Ok(file) => file,
                Err(e) => return ChatResponse::Error(format!("{:#}", e)),
            };
            match upload_with_progress(&orchestrator, file).await {
                Dispatch::Completed => {
                    return ChatResponse::Upload(orchestrator.snapshot().upload);
                }
                other => other,
            }
        }
        ChatCommand::Stats => {
            orchestrator.refresh_knowledge_stats().await;
            return ChatResponse::Knowledge(orchestrator.knowledge());
        }
        other => return ChatResponse::Error(format!("Not a background command: {:?}", other)),
    };

    match dispatch {
        Dispatch::Completed => ChatResponse::Status(orchestrator.scrape_status()),
        other => ChatResponse::NotRun(other),
    }
}

/// Handles the commands that run on the prompt itself. Returns `None` for
/// commands that belong on a background task and `Some(false)` to end the
/// session.
async fn handle_inline(
    orchestrator: &WidgetOrchestrator,
    command: &ChatCommand,
) -> Result<Option<bool>> {
    match command {
        ChatCommand::Clear => {
            // Confirmation reads stdin, so this cannot share the prompt
            let seen = orchestrator.entries().len();
            let outcome = orchestrator
                .clear_knowledge(&|message: &str| ask_yes_no(message))
                .await;
            render::clear(&outcome);
            print_replies(orchestrator, seen);
        }
        ChatCommand::Whoami => {
            println!("{}", orchestrator.role().to_string().bright_magenta().bold());
        }
        ChatCommand::Logout => {
            orchestrator.logout()?;
            println!("{}", "Logged out.".green());
            return Ok(Some(false));
        }
        ChatCommand::Help => print_help(orchestrator.role()),
        ChatCommand::Quit => return Ok(Some(false)),
        ChatCommand::Unknown(command) => {
            println!("{}", format!("Unknown command: {}", command).bright_black());
        }
        ChatCommand::Query(_)
        | ChatCommand::Scrape(_)
        | ChatCommand::Bulk(_)
        | ChatCommand::Upload(_)
        | ChatCommand::Stats => return Ok(None),
    }
    Ok(Some(true))
}

/// Runs the interactive chat until `/quit`, `/logout` or end of input.
///
/// Backend requests run on spawned tasks so the prompt stays responsive; a
/// second request of a kind already in flight comes back as busy.
pub async fn run(args: &GlobalArgs) -> Result<()> {
    let orchestrator = context::connect(args).await?;
    let role = orchestrator.role();

    let (response_tx, mut response_rx) = mpsc::channel::<ChatResponse>(32);
    let response_handler = tokio::spawn(async move {
        while let Some(response) = response_rx.recv().await {
            print_response(response);
        }
    });

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new(role)));

    println!("{}", "=== RAG Widget ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a question, '/help' for commands, or '/quit' to exit.".bright_black()
    );
    println!();
    for entry in orchestrator.entries() {
        render::entry(&entry);
    }

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let command = ChatCommand::parse_for(&line, role);
                match handle_inline(&orchestrator, &command).await? {
                    Some(true) => {}
                    Some(false) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    None => {
                        let tx = response_tx.clone();
                        let orchestrator = orchestrator.clone();
                        tokio::spawn(async move {
                            let response = execute(orchestrator, command).await;
                            let _ = tx.send(response).await;
                        });
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // In-flight requests still hold senders; the handler drains them first
    drop(response_tx);
    let _ = response_handler.await;

    Ok(())
}
