use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "promptz")]
#[command(about = "Personal prompt manager with file and remote sync", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new prompt
    #[command(alias = "n")]
    New {
        /// Prompt content (the title is derived from it when omitted)
        content: String,

        /// Title
        #[arg(long)]
        title: Option<String>,

        /// Short description
        #[arg(long = "desc")]
        description: Option<String>,

        /// Folder to file the prompt under
        #[arg(short, long)]
        folder: Option<String>,

        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// List prompts
    #[command(alias = "ls")]
    List(ListArgs),

    /// View one or more prompts in full
    #[command(alias = "v")]
    View {
        /// Selectors (listing position, t-position or id, e.g. 1 t2 17)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Edit fields of a prompt
    #[command(alias = "e")]
    Edit {
        /// Selector (listing position, t-position or id)
        selector: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long = "desc")]
        description: Option<String>,

        /// New content
        #[arg(long)]
        content: Option<String>,

        /// Move to this folder
        #[arg(short, long)]
        folder: Option<String>,

        /// Replace the tag set (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Remove every tag
        #[arg(long)]
        clear_tags: bool,
    },

    /// Move one or more prompts to the Trash
    #[command(alias = "rm")]
    Delete {
        /// Selectors (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Restore prompts from the Trash
    Restore {
        /// Selectors (e.g. t1 t2)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Duplicate a prompt
    #[command(alias = "dup")]
    Duplicate {
        /// Selector
        selector: String,
    },

    /// Toggle favorite on one or more prompts
    #[command(alias = "fav")]
    Favorite {
        /// Selectors (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Move prompts into a folder
    #[command(alias = "mv")]
    Move {
        /// Selectors (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,

        /// Destination folder
        #[arg(long = "to")]
        folder: String,
    },

    /// Permanently delete trashed prompts (expired ones when no selector given)
    Purge {
        /// Selectors (e.g. t1 t2); empty means every expired prompt
        selectors: Vec<String>,
    },

    /// Manage folders
    Folder {
        #[command(subcommand)]
        action: FolderCmd,
    },

    /// Manage tags
    Tag {
        #[command(subcommand)]
        action: TagCmd,
    },

    /// Export prompts to a file
    Export {
        /// Format: json, csv or txt
        #[arg(default_value = "json")]
        format: String,

        /// Output path (defaults to a format-specific name in the cwd)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Import a JSON backup, replacing the current database
    Import {
        /// Backup file
        path: PathBuf,
    },

    /// Manage the bound sync file
    File {
        #[command(subcommand)]
        action: FileCmd,
    },

    /// Manage the remote drive connection
    Remote {
        #[command(subcommand)]
        action: RemoteCmd,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only prompts in this folder
    #[arg(short, long)]
    pub folder: Option<String>,

    /// Only favorites
    #[arg(long)]
    pub favorites: bool,

    /// Show the Trash instead
    #[arg(long)]
    pub trash: bool,

    /// Only prompts carrying this tag (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Case-insensitive title/description/content search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Created on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Created on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Sort key: date, folder or tag
    #[arg(long, default_value = "date")]
    pub sort: String,

    /// Reverse the sort order
    #[arg(long)]
    pub asc: bool,
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            folder: None,
            favorites: false,
            trash: false,
            tags: Vec::new(),
            search: None,
            from: None,
            to: None,
            sort: "date".to_string(),
            asc: false,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum FolderCmd {
    /// List folders with prompt counts
    #[command(alias = "ls")]
    List,

    /// Create a folder
    Add {
        name: String,
    },

    /// Rename a folder, refiling its prompts
    Rename {
        old: String,
        new: String,
    },

    /// Delete a folder, moving its prompts to the Trash
    #[command(alias = "rm")]
    Delete {
        name: String,
    },

    /// Toggle a folder as favorite
    #[command(alias = "fav")]
    Favorite {
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagCmd {
    /// List tags with usage counts and colors
    #[command(alias = "ls")]
    List,

    /// Rename a tag everywhere it appears
    Rename {
        old: String,
        new: String,
    },

    /// Remove a tag from the registry and every prompt
    #[command(alias = "rm")]
    Delete {
        name: String,
    },

    /// Pin a tag to a hex color, e.g. #ff8800
    Color {
        name: String,
        color: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum FileCmd {
    /// Bind an existing file and load it
    Bind {
        path: PathBuf,
    },

    /// Create (or overwrite) a file from the current data and bind it
    Create {
        path: PathBuf,
    },

    /// Write the bound file now
    Save,

    /// Poll the bound file once and offer to reload on external change
    Check,

    /// Poll and flush debounced writes in a loop until interrupted
    Watch,

    /// Drop the file binding
    Unbind,

    /// Show the binding state
    Status,
}

#[derive(Subcommand, Debug)]
pub enum RemoteCmd {
    /// Connect to the remote drive and load or merge its database
    Connect {
        /// Bearer token; remembered for later sessions
        #[arg(long)]
        token: Option<String>,
    },

    /// Fetch the remote database and choose load, merge or keep
    Load,

    /// Save to the remote now (guarded when the remote holds much more)
    Sync,

    /// Disconnect and revoke the token
    Disconnect,

    /// Show the connection state
    Status,
}
