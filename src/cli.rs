use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shorts")]
#[command(about = "A terminal player for The Cliff News video bytes", long_about = None)]
pub struct Cli {
    /// Backend API base URL (overrides settings)
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Items requested per page (overrides settings)
    #[arg(long, value_name = "N", global = true)]
    pub page_size: Option<usize>,

    /// Only show shorts in this category
    #[arg(long, global = true)]
    pub category: Option<String>,

    /// Only show shorts matching this search query
    #[arg(long, global = true)]
    pub search: Option<String>,

    /// Only show featured shorts
    #[arg(long, global = true)]
    pub featured: bool,

    /// Force dark mode (overrides auto-detection)
    #[arg(long, conflicts_with = "light")]
    pub dark: bool,

    /// Force light mode (overrides auto-detection)
    #[arg(long, conflicts_with = "dark")]
    pub light: bool,

    /// Custom config directory (default: ~/.config/cliff-shorts)
    #[arg(long, value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging (prints log path, sets DEBUG level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the first page of the feed
    List {
        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
    /// Print a single short
    Show {
        /// Short id
        id: String,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
    /// Show the settings file location
    Config {
        /// Write a settings file with the current defaults if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {s}. Use 'text' or 'json'")),
        }
    }
}
