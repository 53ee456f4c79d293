mod api;
mod app;
mod cli;
mod event;
mod feed;
mod help;
mod keys;
mod logging;
mod settings;
mod theme;
mod time;
mod tui;
mod views;

#[cfg(test)]
mod test_utils;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use api::{ClientConfig, ShortsClient, ShortsFilter, VideoItem};
use app::{App, FeedConfig, Message};
use cli::{Cli, Commands, OutputFormat};
use event::Event;
use settings::Settings;
use theme::{ResolvedTheme, ThemeVariant, by_name, default_for_variant, detect_terminal_theme};
use tui::EventHandler;

const TICK_MS: u64 = 250;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = settings::config_dir(cli.config_dir.as_ref());
    let settings = load_settings(&cli, config_dir.as_deref());

    if let Some(Commands::Config { init }) = &cli.command {
        return handle_config_command(*init, config_dir.as_deref(), &settings);
    }

    let client = ShortsClient::new(client_config(&cli, &settings))
        .context("Failed to create API client")?;

    match &cli.command {
        Some(Commands::List { format }) => list_shorts(&client, *format).await,
        Some(Commands::Show { id, format }) => show_short(&client, id, *format).await,
        Some(Commands::Config { .. }) | None => run_tui(&cli, &settings, config_dir, client).await,
    }
}

fn load_settings(cli: &Cli, config_dir: Option<&Path>) -> Settings {
    let mut settings = config_dir
        .map(|dir| {
            let path = settings::settings_path(dir);
            Settings::load(&path).unwrap_or_else(|e| {
                eprintln!("Warning: {}", e);
                Settings::default()
            })
        })
        .unwrap_or_default();

    if let Some(url) = &cli.api_url {
        settings.api_base_url = url.clone();
    }
    if let Some(page_size) = cli.page_size.filter(|n| *n > 0) {
        settings.page_size = page_size;
    }
    settings
}

fn client_config(cli: &Cli, settings: &Settings) -> ClientConfig {
    ClientConfig {
        base_url: settings.api_base_url.clone(),
        page_size: settings.page_size,
        filter: ShortsFilter {
            category: cli.category.clone(),
            search: cli.search.clone(),
            featured: cli.featured,
        },
    }
}

fn handle_config_command(init: bool, config_dir: Option<&Path>, settings: &Settings) -> Result<()> {
    let Some(config_dir) = config_dir else {
        anyhow::bail!("Could not determine config directory");
    };
    let path = settings::settings_path(config_dir);
    if init && !path.exists() {
        settings.save(&path)?;
        println!("Wrote {}", path.display());
    } else {
        println!("{}", path.display());
    }
    Ok(())
}

async fn list_shorts(client: &ShortsClient, format: OutputFormat) -> Result<()> {
    let page = client
        .fetch_shorts_page(None)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&page.items)
                .context("Failed to serialize shorts to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for item in &page.items {
                print_summary(item);
            }
            if let Some(cursor) = &page.next_cursor {
                println!("(more available, cursor {})", cursor);
            }
        }
    }
    Ok(())
}

async fn show_short(client: &ShortsClient, id: &str, format: OutputFormat) -> Result<()> {
    let item = client
        .fetch_short(id)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&item)
                .context("Failed to serialize short to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            print_summary(&item);
            if !item.description.is_empty() {
                println!();
                println!("{}", textwrap::fill(&item.description, 78));
            }
            if !item.tags.is_empty() {
                let tags: Vec<String> = item.tags.iter().map(|t| format!("#{t}")).collect();
                println!("{}", tags.join(" "));
            }
        }
    }
    Ok(())
}

fn print_summary(item: &VideoItem) {
    println!(
        "{:<24} {:>6}  {}",
        item.id,
        time::format_duration(item.duration()),
        item.title
    );
    println!("{:<24} {}", "", item.media_url);
}

fn resolve_theme(cli: &Cli, settings: &Settings) -> ResolvedTheme {
    // Priority: --dark/--light > settings file > terminal detection
    if cli.dark {
        return default_for_variant(ThemeVariant::Dark);
    }
    if cli.light {
        return default_for_variant(ThemeVariant::Light);
    }
    if let Some(name) = &settings.theme {
        match by_name(name) {
            Some(theme) => return theme.into(),
            None => eprintln!("Warning: unknown theme '{}', using auto-detection", name),
        }
    }
    default_for_variant(detect_terminal_theme())
}

async fn run_tui(
    cli: &Cli,
    settings: &Settings,
    config_dir: Option<std::path::PathBuf>,
    client: ShortsClient,
) -> Result<()> {
    let _log_guard = match &config_dir {
        Some(dir) => {
            let guard = logging::init(dir, cli.verbose)?;
            if cli.verbose {
                eprintln!("Logging to {}", logging::log_path(dir).display());
            }
            Some(guard)
        }
        None => None,
    };

    let resolved_theme = resolve_theme(cli, settings);
    let mut terminal = tui::init()?;
    let mut app = App::new(client, FeedConfig::from(settings), resolved_theme);
    let mut events = EventHandler::new(TICK_MS);
    let mut last_height: Option<u16> = None;

    app.load_feed();

    loop {
        terminal.draw(|frame| views::render(frame, &app))?;

        // The card shrinks while the debug pane is open
        let height = terminal.size()?.height;
        let feed_height = if app.debug.visible {
            height.saturating_sub(views::DEBUG_PANE_ROWS)
        } else {
            height
        };
        if last_height != Some(feed_height) {
            last_height = Some(feed_height);
            app.update(Message::UpdateViewportHeight(feed_height));
        }

        while let Some(result) = app.feed.try_recv() {
            app.handle_page_result(result);
        }

        if app.should_quit {
            break;
        }

        match events.next().await? {
            Event::Key(key) => {
                if let Some(msg) = keys::handle_key(key, &app) {
                    app.update(msg);
                }
            }
            Event::Mouse(mouse) => {
                if let Some(msg) = keys::handle_mouse(mouse, &app) {
                    app.update(msg);
                }
            }
            Event::Tick => app.update(Message::Tick(Duration::from_millis(TICK_MS))),
            Event::Resize => {}
        }
    }

    tui::restore()?;
    tracing::info!("shorts exiting");
    Ok(())
}
