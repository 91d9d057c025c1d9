use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sift_core::{ContentTier, SortKey};

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Seed and search a permission-aware wiki index")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the CLI config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add an article, category or file page
    #[command(alias = "new")]
    Add(AddArgs),
    /// Import items from a JSON file
    Import {
        /// JSON array of items
        path: PathBuf,
    },
    /// Export all live items as JSON
    Export {
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// List recent items
    List {
        /// Only list this tier
        #[arg(long, value_enum)]
        tier: Option<TierArg>,
        /// Number of items to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Soft delete an item
    Delete {
        /// Item ID
        id: String,
    },
    /// Search items as a given user
    Search(SearchArgs),
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct AddArgs {
    /// Page title
    #[arg(long)]
    pub title: String,
    /// Content tier
    #[arg(long, value_enum, default_value_t = TierArg::Article)]
    pub tier: TierArg,
    /// Namespace (defaults to the tier's namespace)
    #[arg(long)]
    pub namespace: Option<String>,
    #[arg(long)]
    pub domain: Option<String>,
    #[arg(long)]
    pub owner: Option<String>,
    /// Restrict viewing to these users/groups (repeatable)
    #[arg(long = "viewer", value_name = "ID")]
    pub viewers: Vec<String>,
    /// Users/groups allowed to edit (repeatable)
    #[arg(long = "editor", value_name = "ID")]
    pub editors: Vec<String>,
    /// Uploader, required for file pages
    #[arg(long)]
    pub uploader: Option<String>,
    /// Markdown body; read from piped stdin when omitted
    #[arg(trailing_var_arg = true)]
    pub body: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Search text
    #[arg(default_value = "")]
    pub query: String,
    /// Namespace filter, e.g. "Help;!Talk"
    #[arg(long)]
    pub namespace: Option<String>,
    /// Restrict to one domain
    #[arg(long)]
    pub domain: Option<String>,
    /// Owner filter, e.g. "alice;!bob"
    #[arg(long)]
    pub owner: Option<String>,
    /// Uploader filter; selects file pages
    #[arg(long)]
    pub uploader: Option<String>,
    #[arg(long, value_enum, default_value_t = SortArg::Relevance)]
    pub sort: SortArg,
    /// Reverse the sort order
    #[arg(long)]
    pub desc: bool,
    /// 1-based page number
    #[arg(long, default_value = "1")]
    pub page: u32,
    /// Page size (0 uses the configured default)
    #[arg(long, default_value = "0")]
    pub page_size: u32,
    /// Match the query against titles only
    #[arg(long)]
    pub title_only: bool,
    /// Search as this user (anonymous when omitted)
    #[arg(long)]
    pub user: Option<String>,
    /// Groups of the user (repeatable)
    #[arg(long = "group", value_name = "ID")]
    pub groups: Vec<String>,
    /// Search as an admin
    #[arg(long)]
    pub admin: bool,
    /// Domains the user may view (repeatable)
    #[arg(long = "view-domain", value_name = "DOMAIN")]
    pub view_domains: Vec<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum TierArg {
    #[default]
    Article,
    Category,
    File,
}

impl From<TierArg> for ContentTier {
    fn from(value: TierArg) -> Self {
        match value {
            TierArg::Article => Self::Article,
            TierArg::Category => Self::Category,
            TierArg::File => Self::File,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum SortArg {
    #[default]
    Relevance,
    Timestamp,
    Title,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Relevance => Self::Relevance,
            SortArg::Timestamp => Self::Timestamp,
            SortArg::Title => Self::Title,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
