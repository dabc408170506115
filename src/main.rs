//! Studia CLI - learning assistant for text, documents and YouTube videos
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments, rendering output, and handling top-level errors.

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;
use studia::format::{self, Section, SectionBody};
use studia::persist::{self, ProcessingRecord};
use studia::pipeline::{self, InputKind, SummaryLength, SummaryOptions, SummaryRequest};
use studia::storage::StoredResult;
use studia::{gemini::GeminiClient, input, youtube, Config, Storage};

#[derive(Parser)]
#[command(name = "studia")]
#[command(author, version, about = "CLI learning assistant for summarising text and videos", long_about = None)]
struct Cli {
    /// Path to a config file (default: studia.toml in cwd or ~/.config/studia/)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise pasted text, stdin, or a document file
    Summarize {
        /// Document file to summarise (.txt/.csv/.json/.md/.pdf/.docx)
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Text to summarise (reads stdin when neither --file nor --text is given)
        #[arg(long)]
        text: Option<String>,
        /// Summary length
        #[arg(long, value_enum, default_value_t = LengthArg::Medium)]
        length: LengthArg,
        /// Include a Key Points section
        #[arg(long)]
        key_points: bool,
        /// Include a Questions and Answers section
        #[arg(long)]
        qa: bool,
        /// Include a Code Explanation section
        #[arg(long)]
        code: bool,
        /// Print the raw concatenated response instead of formatted sections
        #[arg(long)]
        raw: bool,
    },
    /// Summarise a YouTube video from its URL
    Video {
        /// YouTube video URL (youtu.be/<id> or watch?v=<id>)
        url: String,
        /// Include a Key Points section
        #[arg(long)]
        key_points: bool,
        /// Include a Questions and Answers section
        #[arg(long)]
        qa: bool,
        /// Include a Code Explanation section
        #[arg(long)]
        code: bool,
        /// Print the raw concatenated response instead of formatted sections
        #[arg(long)]
        raw: bool,
    },
    /// List locally stored results, newest first
    History,
    /// Manage the todo list
    Todo {
        #[command(subcommand)]
        action: TodoAction,
    },
}

#[derive(Subcommand)]
enum TodoAction {
    /// Add a task
    Add { text: Vec<String> },
    /// List tasks
    List,
    /// Toggle a task's completed state
    Done { id: u64 },
    /// Remove a task
    Rm { id: u64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum LengthArg {
    Short,
    Medium,
    Long,
}

impl From<LengthArg> for SummaryLength {
    fn from(arg: LengthArg) -> Self {
        match arg {
            LengthArg::Short => SummaryLength::Short,
            LengthArg::Medium => SummaryLength::Medium,
            LengthArg::Long => SummaryLength::Long,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config;

    match cli.command {
        Commands::Summarize {
            file,
            text,
            length,
            key_points,
            qa,
            code,
            raw,
        } => {
            let input = match (&file, text) {
                (Some(path), _) => {
                    println!("Reading: {}", path.display());
                    input::read_document(path)?
                }
                (None, Some(text)) => text,
                (None, None) => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };

            let config = load_config(config_path.as_ref())?;
            let options = SummaryOptions {
                key_points,
                qa,
                code_explanation: code,
            };
            let request = SummaryRequest {
                input: &input,
                kind: InputKind::Text,
                length: length.into(),
                options,
            };
            summarise_and_render(&config, &request, &input, raw).await?;
        }
        Commands::Video {
            url,
            key_points,
            qa,
            code,
            raw,
        } => {
            let config = load_config(config_path.as_ref())?;

            let video_id = youtube::extract_video_id(&url)?;
            println!("Fetching transcript for video: {}", video_id);
            let client = youtube::YoutubeClient::new(config.youtube_key()?)?;
            let transcript = client.fetch_transcript(video_id).await?;

            let options = SummaryOptions {
                key_points,
                qa,
                code_explanation: code,
            };
            let request = SummaryRequest {
                input: &transcript,
                kind: InputKind::Url,
                length: SummaryLength::default(),
                options,
            };
            // The record keeps the URL, not the fetched transcript
            summarise_and_render(&config, &request, &url, raw).await?;
        }
        Commands::History => {
            let config = load_config(config_path.as_ref())?;
            let storage = Storage::open(&config.storage.path)?;
            let results = storage.list_results()?;

            if results.is_empty() {
                println!("No stored results found.");
            } else {
                println!("Stored results ({}):\n", results.len());
                for stored in results {
                    println!(
                        "📄 {} ({})",
                        stored.input_kind.bold(),
                        stored.created_at.format("%Y-%m-%d %H:%M")
                    );
                    println!("   {}", excerpt(&stored.original_content, 72));
                    if let Some(line) = summary_excerpt(&stored.processed_content) {
                        println!("   {}", excerpt(&line, 72).dimmed());
                    }
                    println!();
                }
            }
        }
        Commands::Todo { action } => {
            let config = load_config(config_path.as_ref())?;
            let storage = Storage::open(&config.storage.path)?;
            match action {
                TodoAction::Add { text } => {
                    let text = text.join(" ");
                    if text.trim().is_empty() {
                        anyhow::bail!("please provide a task description");
                    }
                    let item = storage.add_todo(text.trim())?;
                    println!("Added task {}: {}", item.id, item.text);
                }
                TodoAction::List => {
                    let items = storage.list_todos()?;
                    if items.is_empty() {
                        println!("No tasks.");
                    } else {
                        for item in items {
                            let marker = if item.completed { "✓" } else { " " };
                            let text = if item.completed {
                                item.text.strikethrough().dimmed().to_string()
                            } else {
                                item.text.clone()
                            };
                            println!("[{}] {:>4}  {}", marker, item.id, text);
                        }
                    }
                }
                TodoAction::Done { id } => match storage.toggle_todo(id)? {
                    Some(true) => println!("Task {} completed.", id),
                    Some(false) => println!("Task {} reopened.", id),
                    None => anyhow::bail!("no task with id {}", id),
                },
                TodoAction::Rm { id } => {
                    if storage.remove_todo(id)? {
                        println!("Removed task {}.", id);
                    } else {
                        anyhow::bail!("no task with id {}", id);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Load config from an explicit path, or from the standard locations
fn load_config(path: Option<&PathBuf>) -> Result<Config, studia::config::ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Run the completion pipeline, render the result, and persist it
/// best-effort both remotely and to the local history.
async fn summarise_and_render(
    config: &Config,
    request: &SummaryRequest<'_>,
    original: &str,
    raw: bool,
) -> anyhow::Result<()> {
    println!("Summarising {} characters...\n", request.input.len());

    let client = GeminiClient::new(config.gemini_key()?, &config.gemini.model)?;
    let result = pipeline::run(&client, request).await?;

    if raw {
        println!("{}", result);
    } else {
        print_sections(&format::split_sections(&result));
    }

    // Best-effort persistence: failures warn on stderr and never touch the
    // result already on screen.
    let record = ProcessingRecord::summary(
        request.kind.as_str(),
        original,
        &result,
        config.persistence.user_id.as_deref(),
    );
    persist::store_best_effort(&config.persistence, &record).await;

    match Storage::open(&config.storage.path) {
        Ok(storage) => {
            let stored = StoredResult::new(request.kind.as_str(), original, &result);
            if let Err(e) = storage.record_result(&stored) {
                eprintln!("Warning: failed to record result locally: {}", e);
            }
        }
        Err(e) => eprintln!("Warning: failed to open local storage: {}", e),
    }

    Ok(())
}

/// Render formatted sections to the terminal, one layout per section kind.
fn print_sections(sections: &[Section]) {
    for section in sections {
        println!("{}", section.title.bold().blue());
        match &section.body {
            SectionBody::List(items) => {
                for item in items {
                    println!("  • {}", item);
                }
            }
            SectionBody::Qa(pairs) => {
                for pair in pairs {
                    println!("  {} {}", "Q:".bold(), pair.question);
                    println!("  {} {}", "A:".bold(), pair.answer);
                    println!();
                }
            }
            SectionBody::Code(segments) => {
                for segment in segments {
                    if segment.text.is_empty() {
                        continue;
                    }
                    if segment.is_code {
                        for line in segment.text.lines() {
                            println!("    {}", line.yellow());
                        }
                    } else {
                        println!("{}", segment.text);
                    }
                }
            }
            SectionBody::Prose(text) => println!("{}", text),
        }
        println!();
    }
}

/// First line of the Summary section body, for compact history listings
fn summary_excerpt(processed: &str) -> Option<String> {
    format::split_sections(processed)
        .into_iter()
        .find_map(|section| match section.body {
            SectionBody::Prose(text) => text.lines().next().map(str::to_string),
            _ => None,
        })
}

/// Truncate to at most `max` characters, appending an ellipsis when cut
fn excerpt(text: &str, max: usize) -> String {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= max {
        flattened
    } else {
        let cut: String = flattened.chars().take(max).collect();
        format!("{}…", cut)
    }
}
