//! dishcache - browse recipes from the terminal.
//!
//! A thin front end over `dishcache-core`: every command maps to one app
//! flow, and favorites/history keep working from the local store when the
//! backend is unreachable.

mod cook;
mod login;

use std::io;
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use dishcache_core::app::{App, Listing};
use dishcache_core::models::{Dish, DishSort, StepCursor, UserProfile};
use dishcache_core::notify::Notifier;
use dishcache_core::utils::{format_relative_time, truncate_string};
use dishcache_core::Config;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cook::CookState;
use login::PromptLogin;

/// Width used when listing dish descriptions
const DESCRIPTION_WIDTH: usize = 40;

#[derive(Parser)]
#[command(name = "dishcache")]
#[command(about = "Browse recipes, keep favorites and history offline")]
#[command(version)]
struct Cli {
    /// One-time login code; prompted for when absent
    #[arg(long, global = true, env = "DISHCACHE_LOGIN_CODE", hide_env_values = true)]
    login_code: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in (caches the profile for later sessions)
    Login {
        /// Nickname for the first login; later logins reuse the cached profile
        nickname: Option<String>,
    },

    /// Banners, categories and the first page of dishes
    Home {
        #[arg(long, value_enum, default_value_t = SortArg::Collect)]
        sort: SortArg,
    },

    /// List dish categories
    Categories,

    /// Dishes in a category
    Category {
        id: i64,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,
    },

    /// Hot dishes
    Hot {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,
    },

    /// Show a recipe and count the view
    Dish { id: i64 },

    /// Walk through a recipe's steps one at a time
    Cook { id: i64 },

    /// Search dishes by keyword
    Search {
        keyword: String,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,
    },

    /// Toggle a favorite
    Favorite { id: i64 },

    /// Remove a favorite
    Unfavorite { id: i64 },

    /// List local favorites
    Favorites {
        /// Remove every local favorite
        #[arg(long)]
        clear: bool,
    },

    /// Search and view history
    History {
        /// Forget recent searches
        #[arg(long)]
        clear_searches: bool,

        /// Forget recently viewed dishes
        #[arg(long)]
        clear_views: bool,
    },

    /// Local and remote statistics
    Stats,

    /// Show or change the saved configuration
    Config {
        #[arg(long)]
        base_url: Option<String>,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page_size: Option<u32>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Remove everything stored locally
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Collect,
    View,
    Latest,
}

impl From<SortArg> for DishSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Collect => DishSort::MostCollected,
            SortArg::View => DishSort::MostViewed,
            SortArg::Latest => DishSort::Latest,
        }
    }
}

/// Prints notifications to stderr so they don't mix with command output.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("! {}", message);
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    let config = Config::load()?;
    info!(base_url = %config.base_url, "dishcache starting");
    let app = App::open(
        config,
        Arc::new(PromptLogin::new(cli.login_code)),
        Arc::new(StderrNotifier),
    )?;

    if !matches!(
        cli.command,
        Commands::Login { .. } | Commands::Clear | Commands::Config { .. }
    ) {
        app.auto_login().await;
    }

    match cli.command {
        Commands::Login { nickname } => login(&app, nickname).await,
        Commands::Home { sort } => home(&app, sort.into()).await,
        Commands::Categories => categories(&app).await,
        Commands::Category { id, page } => {
            listing(&app, Listing::Category(id), page.unwrap_or(1)).await
        }
        Commands::Hot { page } => listing(&app, Listing::Hot, page.unwrap_or(1)).await,
        Commands::Dish { id } => dish(&app, id).await,
        Commands::Cook { id } => cook(&app, id).await,
        Commands::Search { keyword, page } => search(&app, &keyword, page.unwrap_or(1)).await,
        Commands::Favorite { id } => favorite(&app, id).await,
        Commands::Unfavorite { id } => unfavorite(&app, id).await,
        Commands::Favorites { clear } => favorites(&app, clear),
        Commands::History {
            clear_searches,
            clear_views,
        } => history(&app, clear_searches, clear_views),
        Commands::Stats => stats(&app).await,
        Commands::Clear => {
            app.clear_cache()?;
            println!("Local data cleared");
            Ok(())
        }
        Commands::Config {
            base_url,
            page_size,
            timeout,
        } => configure(base_url.as_deref(), page_size, timeout),
    }
}

fn configure(base_url: Option<&str>, page_size: Option<u32>, timeout: Option<u64>) -> Result<()> {
    // Edit the file's own values; environment overrides stay out of it.
    let mut config = Config::load_file()?;
    let changed = base_url.is_some() || page_size.is_some() || timeout.is_some();

    if let Some(url) = base_url {
        config.set_base_url(url);
    }
    if let Some(size) = page_size {
        config.page_size = size;
    }
    if let Some(secs) = timeout {
        config.request_timeout_secs = Some(secs);
    }
    if changed {
        config.save()?;
        println!("Saved {}", Config::config_path()?.display());
    }

    println!("base_url:  {}", config.base_url);
    println!("page_size: {}", config.page_size);
    match config.request_timeout_secs {
        Some(secs) => println!("timeout:   {}s", secs),
        None => println!("timeout:   none"),
    }
    println!("store_dir: {}", config.store_dir()?.display());
    Ok(())
}

fn print_dish_line(app: &App, dish: &Dish) {
    let description = dish.description.as_deref().unwrap_or("");
    let marker = if app.cache().is_favorite(dish.id) { "*" } else { " " };
    println!(
        "{} {:>6}  {:<20} {:<8} {:>7}  {}",
        marker,
        dish.id,
        truncate_string(&dish.name, 20),
        dish.difficulty().display_name(),
        dish.cooking_time_display(),
        truncate_string(description, DESCRIPTION_WIDTH)
    );
}

async fn login(app: &App, nickname: Option<String>) -> Result<()> {
    let profile = match (nickname, app.profile()) {
        (Some(name), _) => UserProfile {
            nick_name: Some(name),
            ..Default::default()
        },
        (None, Some(profile)) => profile,
        (None, None) => bail!("first login needs a nickname: dishcache login <nickname>"),
    };

    app.login(profile).await?;
    println!(
        "Logged in as {}",
        app.profile().map(|p| p.display_name().to_string()).unwrap_or_default()
    );
    Ok(())
}

async fn home(app: &App, sort: DishSort) -> Result<()> {
    let home = app.load_home(sort).await?;

    for banner in &home.banners {
        println!("[{}]", banner.title.as_deref().unwrap_or("banner"));
    }
    let names: Vec<&str> = home.categories.iter().map(|c| c.name.as_str()).collect();
    println!("Categories: {}\n", names.join(" | "));

    if home.dishes_error.is_some() {
        println!("(dishes unavailable, try again later)");
    }
    for dish in home.dishes.items() {
        print_dish_line(app, dish);
    }
    Ok(())
}

async fn categories(app: &App) -> Result<()> {
    for category in app.api().categories().await? {
        println!("{:>6}  {}", category.id, category.name);
    }
    Ok(())
}

/// Walk to `page` and print it.
async fn listing(app: &App, listing: Listing, page: u32) -> Result<()> {
    let mut pager = app.new_pager();
    while pager.current_page() < page {
        if !app.load_more(&listing, &mut pager).await? {
            break;
        }
    }
    let size = app.config().page_size as usize;
    let start = (pager.current_page().saturating_sub(1)) as usize * size;
    for dish in pager.items().iter().skip(start) {
        print_dish_line(app, dish);
    }
    println!(
        "\npage {} ({} total){}",
        pager.current_page(),
        pager.total(),
        if pager.has_more() { ", more available" } else { "" }
    );
    Ok(())
}

async fn dish(app: &App, id: i64) -> Result<()> {
    let detail = app.dish_detail(id).await?;
    let dish = &detail.dish;

    println!("{}{}", dish.name, if detail.is_favorite { " *" } else { "" });
    if let Some(category) = &dish.category_name {
        println!("{}", category);
    }
    println!(
        "{} | {} | {} views | {} favorites",
        dish.difficulty().display_name(),
        dish.cooking_time_display(),
        dish.view_count.unwrap_or(0),
        dish.collect_count.unwrap_or(0)
    );
    if let Some(url) = app.image_url(dish.image.as_deref()) {
        println!("{}", url);
    }
    if let Some(description) = &dish.description {
        println!("\n{}", description);
    }

    if !detail.ingredients.is_empty() {
        println!("\nIngredients:");
        for ingredient in &detail.ingredients {
            println!("  - {} {}", ingredient.name, ingredient.quantity_display());
        }
    }
    if !detail.steps.is_empty() {
        println!("\nSteps:");
        for (i, step) in detail.steps.iter().enumerate() {
            let number = step.step_number.unwrap_or(i as i32 + 1);
            println!("  {}. {}", number, step.description.as_deref().unwrap_or(""));
        }
    }

    if let Err(e) = app.record_view(dish).await {
        tracing::debug!(error = %e, "View not recorded");
    }
    Ok(())
}

async fn cook(app: &App, id: i64) -> Result<()> {
    let detail = app.dish_detail(id).await?;
    let Some(cursor) = StepCursor::new(detail.steps) else {
        println!("{} has no steps to follow", detail.dish.name);
        return Ok(());
    };

    println!("Cooking {} ({} steps)", detail.dish.name, cursor.len());
    match cook::run(cursor)? {
        CookState::Finished => println!("\nDone. Enjoy!"),
        _ => println!("\nStopped"),
    }
    Ok(())
}

async fn search(app: &App, keyword: &str, page: u32) -> Result<()> {
    if page == 1 {
        let Some(pager) = app.search(keyword).await? else {
            bail!("search needs a keyword");
        };
        for dish in pager.items() {
            print_dish_line(app, dish);
        }
        println!("\n{} results", pager.total());
        return Ok(());
    }
    listing(app, Listing::Search(keyword.trim().to_string()), page).await
}

async fn favorite(app: &App, id: i64) -> Result<()> {
    let dish = app.api().dish(id).await?;
    let outcome = app.toggle_favorite(&dish).await;
    println!(
        "{} ({} favorites){}",
        outcome.message,
        outcome.collect_count,
        if outcome.synced { "" } else { " [saved locally]" }
    );
    Ok(())
}

async fn unfavorite(app: &App, id: i64) -> Result<()> {
    let (message, remaining) = app.remove_favorite(id).await;
    println!("{} ({} left)", message, remaining.len());
    Ok(())
}

fn favorites(app: &App, clear: bool) -> Result<()> {
    if clear {
        app.clear_favorites()?;
        println!("Favorites cleared");
        return Ok(());
    }

    let favorites = app.favorites();
    if favorites.is_empty() {
        println!("No favorites yet");
        return Ok(());
    }
    let now = Utc::now();
    for item in favorites {
        println!(
            "{:>6}  {:<20} {}",
            item.id,
            truncate_string(&item.name, 20),
            format_relative_time(item.create_time, now)
        );
    }
    Ok(())
}

fn history(app: &App, clear_searches: bool, clear_views: bool) -> Result<()> {
    if clear_searches {
        app.clear_search_history()?;
        println!("Search history cleared");
    }
    if clear_views {
        app.clear_view_history()?;
        println!("View history cleared");
    }
    if clear_searches || clear_views {
        return Ok(());
    }

    let searches = app.cache().search_history();
    println!(
        "Recent searches: {}",
        if searches.is_empty() { "-".to_string() } else { searches.join(", ") }
    );

    let now = Utc::now();
    println!("\nRecently viewed:");
    for item in app.cache().view_history() {
        println!(
            "{:>6}  {:<20} x{:<3} {}",
            item.id,
            truncate_string(&item.name, 20),
            item.view_count,
            format_relative_time(item.view_time, now)
        );
    }
    Ok(())
}

/// Nickname from the backend's user record, if it has one.
fn remote_nickname(info: &Value) -> Option<&str> {
    info.get("nickName")
        .or_else(|| info.get("nickname"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}

async fn stats(app: &App) -> Result<()> {
    let local = app.local_stats();

    let remote_name = if app.session().has_token() {
        match app.user_info().await {
            Ok(info) => remote_nickname(&info).map(str::to_string),
            Err(e) => {
                tracing::debug!(error = %e, "User info unavailable");
                None
            }
        }
    } else {
        None
    };
    let local_name = app.profile().map(|p| p.display_name().to_string());
    if let Some(name) = remote_name.or(local_name) {
        println!("{}", name);
    }

    println!(
        "favorites: {}  viewed: {}  searches: {}",
        local.favorites, local.views, local.searches
    );

    // Remote stats are optional; show zeros when they can't be fetched.
    let remote = app.user_stats().await.unwrap_or_default().unwrap_or_default();
    println!("fans: {}  following: {}", remote.fans_count, remote.follow_count);
    Ok(())
}
