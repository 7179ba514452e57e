use chrono::Utc;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use notez::api::NotezApi;
use notez::commands::view::ViewMode;
use notez::commands::{CmdMessage, CmdResult, DisplayNote, MessageLevel};
use notez::config::NotezConfig;
use notez::draft::{parse_tags, NoteDraft};
use notez::error::{NotezError, Result};
use notez::extract::{CommandExtractor, UnconfiguredExtractor};
use notez::ingest::{Extractor, InputFile, Ingestor, MessageSink, Uploader};
use notez::model::Session;
use notez::preview::PreviewDescriptor;
use notez::render::render;
use notez::store::fs::FileStore;
use notez::upload::{DirectoryUploader, UploadPolicy};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

const HOME_ENV: &str = "NOTEZ_HOME";
const OWNER_ENV: &str = "NOTEZ_OWNER";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: NotezApi<FileStore>,
    ingestor: Ingestor,
    sink: Arc<MessageSink>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = data_dir()?;
    let config = NotezConfig::load(&data_dir)?;
    init_tracing(cli.verbose, &config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(NotezError::Io)?;

    let env_owner = std::env::var(OWNER_ENV).ok();
    let owner = config.resolve_owner(cli.owner.as_deref(), env_owner.as_deref());
    let mut ctx = init_context(data_dir, &config, owner);

    match cli.command {
        Commands::Add {
            files,
            title,
            text,
            tags,
        } => runtime.block_on(handle_add(&mut ctx, files, title, text, tags)),
        Commands::Preview { files } => runtime.block_on(handle_preview(&ctx, files)),
        Commands::List { search } => handle_list(&ctx, search),
        Commands::View { selector, raw } => handle_view(&ctx, &selector, raw),
        Commands::Delete { selector } => handle_delete(&mut ctx, &selector),
        Commands::Render { file } => handle_render(file),
    }
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "notez", "notez")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| NotezError::Store("Could not determine data dir".to_string()))
}

fn init_tracing(verbose: bool, config: &NotezConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("notez=debug")
        } else {
            EnvFilter::new(&config.log_filter)
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init_context(data_dir: PathBuf, config: &NotezConfig, owner: Option<String>) -> AppContext {
    let blob_root = data_dir.join("blobs");
    let mut uploader = DirectoryUploader::new(blob_root, owner.clone())
        .with_policy(UploadPolicy::new(config.max_upload_bytes));
    if let Some(base_url) = &config.blob_base_url {
        uploader = uploader.with_base_url(base_url.clone());
    }
    let uploader: Arc<dyn Uploader> = Arc::new(uploader);

    let extractor: Arc<dyn Extractor> = match CommandExtractor::new(
        &config.extract_command,
        owner.clone(),
        Arc::clone(&uploader),
    ) {
        Some(extractor) => Arc::new(extractor),
        None => Arc::new(UnconfiguredExtractor),
    };

    let sink = Arc::new(MessageSink::new());
    let ingestor = Ingestor::new(extractor, uploader, sink.clone());
    let api = NotezApi::new(FileStore::new(data_dir), owner.map(Session::new));

    AppContext {
        api,
        ingestor,
        sink,
    }
}

async fn input_files(paths: Vec<PathBuf>) -> Result<Vec<InputFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = InputFile::from_path(&path).await.map_err(|e| {
            NotezError::BadRequest(format!("cannot open {}: {}", path.display(), e))
        })?;
        files.push(file);
    }
    Ok(files)
}

async fn handle_add(
    ctx: &mut AppContext,
    files: Vec<PathBuf>,
    title: Option<String>,
    text: Option<String>,
    tags: Option<String>,
) -> Result<()> {
    let files = input_files(files).await?;
    let draft = NoteDraft::new(
        title.unwrap_or_default(),
        text.unwrap_or_default(),
        tags.as_deref().map(parse_tags).unwrap_or_default(),
    );

    let outcome = ctx.api.add_files(&ctx.ingestor, draft, files).await;
    // Per-file failures are reported even when nothing could be stored.
    print_messages(&ctx.sink.take());
    let result = outcome?;
    print_previews(&result.previews);
    print_messages(&result.messages);
    Ok(())
}

async fn handle_preview(ctx: &AppContext, files: Vec<PathBuf>) -> Result<()> {
    let files = input_files(files).await?;
    let outcome = ctx
        .api
        .preview_files(&ctx.ingestor, NoteDraft::default(), files)
        .await;
    print_messages(&ctx.sink.take());
    let result = outcome?;

    if let Some(draft) = &result.draft {
        println!("{}", draft.title.bold());
        println!("--------------------------------");
        println!("{}", draft.content);
    }
    print_previews(&result.previews);
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, search: Option<String>) -> Result<()> {
    let result = ctx.api.list_notes(search.as_deref())?;
    print_notes(&result.listed_notes);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &AppContext, selector: &str, raw: bool) -> Result<()> {
    let mode = if raw { ViewMode::Raw } else { ViewMode::Preview };
    let result = ctx.api.view_note(selector, mode)?;
    print_full_note(&result);
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, selector: &str) -> Result<()> {
    let result = ctx.api.delete_note(selector)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_render(file: Option<PathBuf>) -> Result<()> {
    let source = match file {
        Some(path) => std::fs::read_to_string(path).map_err(NotezError::Io)?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(NotezError::Io)?;
            buf
        }
    };
    println!("{}", render(&source));
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_full_note(result: &CmdResult) {
    for dn in &result.listed_notes {
        println!(
            "{} {}",
            dn.index.to_string().yellow(),
            dn.note.metadata.title.bold()
        );
        if !dn.note.metadata.tags.is_empty() {
            println!("{}", dn.note.metadata.tags.join(", ").dimmed());
        }
        println!("--------------------------------");
    }
    if let Some(body) = &result.rendered {
        println!("{}", body);
    }
}

fn print_previews(previews: &[PreviewDescriptor]) {
    for preview in previews {
        let target = preview.viewer_url().unwrap_or_default();
        println!(
            "  {} {} {}",
            format!("[{}]", preview.kind()).cyan(),
            preview.name,
            target.dimmed()
        );
    }
}

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

fn print_notes(notes: &[DisplayNote]) {
    if notes.is_empty() {
        println!("No notes found.");
        return;
    }

    for dn in notes {
        let idx_str = format!("{}. ", dn.index);
        let time_ago = format_time_ago(dn.note.metadata.created_at);

        let title = &dn.note.metadata.title;
        let tags = if dn.note.metadata.tags.is_empty() {
            String::new()
        } else {
            format!(" #{}", dn.note.metadata.tags.join(" #"))
        };
        let line = format!("{}{}", title, tags);

        let fixed_width = 4 + idx_str.width() + 2 + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let shown = truncate_to_width(&line, available);
        let padding = available.saturating_sub(shown.width());

        println!(
            "    {}{}{}  {}",
            idx_str,
            shown,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
