use chrono::NaiveDate;
use clap::Parser;
use colored::*;
use promptz::api::{
    CmdMessage, ExportFormat, FolderInfo, ListedPrompt, MessageLevel, NewPrompt, PromptPatch,
    PromptzApp, TagInfo,
};
use promptz::decide::StdinDecider;
use promptz::error::{PromptzError, Result};
use promptz::filter::{ListQuery, SortDir, SortKey, View};
use promptz::init;
use promptz::model::{Prompt, TRASH_FOLDER};
use promptz::store::FsBackend;
use promptz::sync::HttpStore;
use promptz::timer::Repeat;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands, FileCmd, FolderCmd, ListArgs, RemoteCmd, TagCmd};

type App = PromptzApp<FsBackend>;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init::initialize();
    if let Some(token) = ctx.app.stored_token() {
        let store = HttpStore::new(&token, ctx.app.config());
        ctx.app.attach_remote(Box::new(store));
    }
    let mut decider = StdinDecider;
    let app = &mut ctx.app;

    match cli.command {
        Some(Commands::New {
            content,
            title,
            description,
            folder,
            tags,
        }) => handle_new(app, content, title, description, folder, tags)?,
        Some(Commands::List(list)) => handle_list(app, list)?,
        Some(Commands::View { selectors }) => handle_view(app, selectors)?,
        Some(Commands::Edit {
            selector,
            title,
            description,
            content,
            folder,
            tags,
            clear_tags,
        }) => handle_edit(
            app, selector, title, description, content, folder, tags, clear_tags,
        )?,
        Some(Commands::Delete { selectors }) => {
            print_messages(&app.delete_prompts(&selectors)?.messages)
        }
        Some(Commands::Restore { selectors }) => {
            print_messages(&app.restore_prompts(&selectors)?.messages)
        }
        Some(Commands::Duplicate { selector }) => {
            print_messages(&app.duplicate_prompt(&selector)?.messages)
        }
        Some(Commands::Favorite { selectors }) => {
            print_messages(&app.favorite_prompts(&selectors)?.messages)
        }
        Some(Commands::Move { selectors, folder }) => {
            print_messages(&app.move_prompts(&selectors, &folder)?.messages)
        }
        Some(Commands::Purge { selectors }) => {
            print_messages(&app.purge_prompts(&selectors, &mut decider, cli.yes)?.messages)
        }
        Some(Commands::Folder { action }) => handle_folder(app, action)?,
        Some(Commands::Tag { action }) => handle_tag(app, action)?,
        Some(Commands::Export { format, out }) => handle_export(app, format, out)?,
        Some(Commands::Import { path }) => {
            print_messages(&app.import_backup(&path, &mut decider, cli.yes)?.messages)
        }
        Some(Commands::File { action }) => handle_file(app, action, &mut decider, cli.yes)?,
        Some(Commands::Remote { action }) => handle_remote(app, action, &mut decider)?,
        None => handle_list(app, ListArgs::default())?,
    }

    // One-shot invocation: the debounce windows will never elapse in this
    // process, so flush whatever the command armed before exiting.
    print_messages(&app.flush_pending(&mut decider));
    Ok(())
}

fn handle_new(
    app: &mut App,
    content: String,
    title: Option<String>,
    description: Option<String>,
    folder: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    let fields = NewPrompt {
        title,
        description,
        content,
        folder,
        tags,
    };
    let result = app.create_prompt(fields)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(app: &App, list: ListArgs) -> Result<()> {
    let view = if list.trash {
        View::Folder(TRASH_FOLDER.to_string())
    } else if list.favorites {
        View::Favorites
    } else if let Some(folder) = list.folder {
        View::Folder(folder)
    } else {
        View::All
    };
    let query = ListQuery {
        view,
        tags: list.tags,
        search: list.search,
        from: parse_date(list.from.as_deref())?,
        to: parse_date(list.to.as_deref())?,
        sort: parse_sort(&list.sort)?,
        dir: if list.asc { SortDir::Asc } else { SortDir::Desc },
    };
    let result = app.list_prompts(&query)?;
    print_prompt_lines(&result.listed_prompts, app.now_ms());
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(app: &App, selectors: Vec<String>) -> Result<()> {
    let result = app.view_prompts(&selectors)?;
    print_full_prompts(app, &result.affected_prompts);
    print_messages(&result.messages);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_edit(
    app: &mut App,
    selector: String,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    folder: Option<String>,
    tags: Vec<String>,
    clear_tags: bool,
) -> Result<()> {
    let tags = if clear_tags {
        Some(Vec::new())
    } else if tags.is_empty() {
        None
    } else {
        Some(tags)
    };
    let patch = PromptPatch {
        title,
        description,
        content,
        folder,
        tags,
    };
    let result = app.update_prompt(&selector, patch)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_folder(app: &mut App, action: FolderCmd) -> Result<()> {
    let result = match action {
        FolderCmd::List => {
            let result = app.list_folders()?;
            print_folders(&result.folders);
            result
        }
        FolderCmd::Add { name } => app.add_folder(&name)?,
        FolderCmd::Rename { old, new } => app.rename_folder(&old, &new)?,
        FolderCmd::Delete { name } => app.delete_folder(&name)?,
        FolderCmd::Favorite { name } => app.favorite_folder(&name)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_tag(app: &mut App, action: TagCmd) -> Result<()> {
    let result = match action {
        TagCmd::List => {
            let result = app.list_tags()?;
            print_tags(&result.tags);
            result
        }
        TagCmd::Rename { old, new } => app.rename_tag(&old, &new)?,
        TagCmd::Delete { name } => app.delete_tag(&name)?,
        TagCmd::Color { name, color } => app.color_tag(&name, &color)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(app: &App, format: String, out: Option<PathBuf>) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let result = app.export_prompts(format, out.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_file(
    app: &mut App,
    action: FileCmd,
    decider: &mut StdinDecider,
    skip_confirm: bool,
) -> Result<()> {
    let result = match action {
        FileCmd::Bind { path } => app.bind_file(&path)?,
        FileCmd::Create { path } => app.create_file(&path, decider, skip_confirm)?,
        FileCmd::Save => app.save_file()?,
        FileCmd::Check => app.check_file(decider)?,
        FileCmd::Watch => return handle_watch(app, decider),
        FileCmd::Unbind => app.unbind_file()?,
        FileCmd::Status => app.file_status()?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_remote(app: &mut App, action: RemoteCmd, decider: &mut StdinDecider) -> Result<()> {
    let result = match action {
        RemoteCmd::Connect { token } => {
            let token = match token.or_else(|| app.stored_token()) {
                Some(token) => token,
                None => {
                    println!(
                        "{}",
                        "No token stored. Run: promptz remote connect --token <TOKEN>".yellow()
                    );
                    return Ok(());
                }
            };
            app.save_token(&token)?;
            let store = HttpStore::new(&token, app.config());
            app.attach_remote(Box::new(store));
            app.connect_remote(decider)?
        }
        RemoteCmd::Load => app.load_remote(decider)?,
        RemoteCmd::Sync => app.sync_remote(decider)?,
        RemoteCmd::Disconnect => app.disconnect_remote()?,
        RemoteCmd::Status => app.remote_status()?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_watch(app: &mut App, decider: &mut StdinDecider) -> Result<()> {
    let mut poll = Repeat::new(app.config().poll_interval_ms);
    poll.start(app.now_ms());
    println!("{}", "Watching for changes. Press Ctrl-C to stop.".dimmed());
    loop {
        thread::sleep(Duration::from_millis(250));
        let now = app.now_ms();
        if app.has_file_binding() && poll.fire_if_due(now) {
            let result = app.check_file(decider)?;
            // The quiet poll result stays off the screen; reloads, losses
            // and keep-local decisions still show.
            let interesting: Vec<CmdMessage> = result
                .messages
                .into_iter()
                .filter(|m| m.content != "File is unchanged.")
                .collect();
            print_messages(&interesting);
        }
        print_messages(&app.fire_due(now, decider));
    }
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Some).map_err(|_| {
            PromptzError::Validation(format!("Invalid date \"{}\": expected YYYY-MM-DD", s))
        }),
        None => Ok(None),
    }
}

fn parse_sort(value: &str) -> Result<SortKey> {
    match value {
        "date" => Ok(SortKey::Date),
        "folder" => Ok(SortKey::Folder),
        "tag" => Ok(SortKey::Tag),
        other => Err(PromptzError::Validation(format!(
            "Unknown sort key \"{}\": expected date, folder or tag",
            other
        ))),
    }
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

fn print_full_prompts(app: &App, prompts: &[Prompt]) {
    for (i, prompt) in prompts.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        let star = if prompt.favorite { "★ " } else { "" };
        println!(
            "{}{} {}",
            star.yellow(),
            prompt.id.to_string().yellow(),
            prompt.title.bold()
        );
        if !prompt.description.is_empty() {
            println!("{}", prompt.description.italic());
        }
        let tags: Vec<String> = prompt
            .tags
            .iter()
            .map(|t| colorize_tag(app, t).to_string())
            .collect();
        println!("{}  {}", prompt.category.cyan(), tags.join(" "));
        println!("--------------------------------");
        println!("{}", prompt.content);
    }
}

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const FAV_MARKER: &str = "★";

fn print_prompt_lines(listed: &[ListedPrompt], now_ms: i64) {
    for lp in listed {
        let is_trash = lp.label.starts_with('t');
        let label_str = format!("{}. ", lp.label);

        let left_prefix = if lp.prompt.favorite {
            format!("  {} ", FAV_MARKER)
        } else {
            "    ".to_string()
        };

        let time_ago = format_time_ago(now_ms, lp.prompt.id);

        let preview: String = lp
            .prompt
            .content
            .chars()
            .take(50)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        let title_content = if preview.is_empty() {
            lp.prompt.title.clone()
        } else {
            format!("{} {}", lp.prompt.title, preview)
        };

        let fixed_width = left_prefix.width() + label_str.width() + 2 + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title_display = truncate_to_width(&title_content, available);
        let padding = available.saturating_sub(title_display.width());

        let label_colored = if is_trash {
            label_str.red()
        } else if lp.prompt.favorite {
            label_str.yellow()
        } else {
            label_str.normal()
        };

        println!(
            "{}{}{}{}  {}",
            left_prefix,
            label_colored,
            title_display,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

fn print_folders(folders: &[FolderInfo]) {
    for folder in folders {
        let marker = if folder.favorite { "★ " } else { "  " };
        let name = if folder.reserved {
            folder.name.cyan()
        } else {
            folder.name.normal()
        };
        println!(
            "{}{} {}",
            marker.yellow(),
            name,
            format!("({})", folder.count).dimmed()
        );
    }
}

fn print_tags(tags: &[TagInfo]) {
    for tag in tags {
        let swatch = match parse_hex(&tag.color) {
            Some((r, g, b)) => "●".truecolor(r, g, b),
            None => "●".normal(),
        };
        println!(
            "{} {} {}",
            swatch,
            tag.name,
            format!("({})", tag.count).dimmed()
        );
    }
}

fn colorize_tag(app: &App, name: &str) -> ColoredString {
    match parse_hex(app.tag_color(name)) {
        Some((r, g, b)) => name.truecolor(r, g, b),
        None => name.normal(),
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
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

fn format_time_ago(now_ms: i64, then_ms: i64) -> String {
    let elapsed = Duration::from_millis((now_ms - then_ms).max(0) as u64);
    let formatter = timeago::Formatter::new();
    format!("{:>width$}", formatter.convert(elapsed), width = TIME_WIDTH)
}
