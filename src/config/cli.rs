use crate::domain::media::ResourceType;
use crate::utils::error::{AdminError, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "content-admin")]
#[command(about = "Manage blogs, highlights, study materials and messages")]
pub struct Cli {
    /// TOML config file. Without it, FIREBASE_* and CLOUDINARY_* variables are used.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, env = "ADMIN_EMAIL", global = true)]
    pub email: Option<String>,

    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Print records as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[arg(long, global = true)]
    pub json_logs: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Email and password when both are given. One without the other is an error.
    pub fn credentials(&self) -> Result<Option<(&str, &str)>> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Ok(Some((email.as_str(), password.as_str()))),
            (Some(_), None) => Err(AdminError::MissingConfig {
                field: "--password (ADMIN_PASSWORD)".to_string(),
            }),
            (None, Some(_)) => Err(AdminError::MissingConfig {
                field: "--email (ADMIN_EMAIL)".to_string(),
            }),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Blogs {
        #[command(subcommand)]
        action: BlogAction,
    },
    Highlights {
        #[command(subcommand)]
        action: HighlightAction,
    },
    Materials {
        #[command(subcommand)]
        action: MaterialAction,
    },
    Messages {
        #[command(subcommand)]
        action: MessageAction,
    },
    /// Upload a file without creating a record
    Upload {
        path: PathBuf,
        #[arg(long, value_enum, default_value = "auto")]
        resource_type: ResourceTypeArg,
        /// Print only the secure URL
        #[arg(long)]
        url_only: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum BlogAction {
    List,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        subtitle: String,
        #[arg(long)]
        content: String,
        #[arg(long = "hashtag")]
        hashtags: Vec<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum HighlightAction {
    List,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        year: String,
        #[arg(long)]
        location: String,
        /// workshop, event, research or travel
        #[arg(long)]
        category: String,
        #[arg(long = "hashtag")]
        hashtags: Vec<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum MaterialAction {
    List,
    Upload { path: PathBuf },
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum MessageAction {
    List,
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResourceTypeArg {
    Image,
    Raw,
    Auto,
}

impl From<ResourceTypeArg> for ResourceType {
    fn from(arg: ResourceTypeArg) -> Self {
        match arg {
            ResourceTypeArg::Image => ResourceType::Image,
            ResourceTypeArg::Raw => ResourceType::Raw,
            ResourceTypeArg::Auto => ResourceType::Auto,
        }
    }
}
