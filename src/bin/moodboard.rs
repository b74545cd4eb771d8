//! moodboard CLI: log moods, manage the backlog, get recommendations.

use std::time::Instant;

use chrono::Utc;
use clap::{Parser, Subcommand};
use moodboard::activity::Calendar;
use moodboard::board::Board;
use moodboard::config::Config;
use moodboard::filter::{CategoryFilter, FilterState, StatusFilter};
use moodboard::model::{CatalogItem, Category, MoodId, NewCatalogItem, SmartTag, Status, TagGroup};
use moodboard::storage::Storage;
use moodboard::telemetry::{TelemetryConfig, command, init_telemetry};

#[derive(Parser)]
#[command(name = "moodboard", about = "Mood journal and media backlog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Backlog operations
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },
    /// Today's moods
    Mood {
        #[command(subcommand)]
        action: MoodAction,
    },
    /// Context tags used for recommendations
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },
    /// Rank the backlog against today's moods and tags
    Recommend {
        /// Maximum items to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Mark shown items as suggested (they lose points for 24h)
        #[arg(long)]
        mark: bool,
        #[arg(long)]
        json: bool,
    },
    /// Per-day activity summaries
    Heatmap {
        /// How many days back to show
        #[arg(long, default_value_t = 365)]
        days: i64,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ItemAction {
    /// Add an item to the backlog
    Add {
        title: String,
        /// book, movie, series, video-game, music, other
        #[arg(long, default_value = "book")]
        category: Category,
        /// Mood id this item suits (repeatable)
        #[arg(long = "mood")]
        moods: Vec<MoodId>,
        /// Smart tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<SmartTag>,
        #[arg(long)]
        favorite: bool,
        #[arg(long)]
        notes: Option<String>,
        /// Cover image
        #[arg(long)]
        image_url: Option<String>,
    },
    /// List the backlog
    List {
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        favorites: bool,
        /// Case-insensitive search in title and notes
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show an item
    Show {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Start an item without recording progress
    Start { id: String },
    /// Set progress (0-100)
    Progress { id: String, progress: u8 },
    /// Mark or unmark as favorite
    Favorite {
        id: String,
        #[arg(long)]
        off: bool,
    },
    /// Remove an item
    Delete { id: String },
}

#[derive(Subcommand)]
enum MoodAction {
    /// List known moods and today's selection
    List,
    /// Toggle a mood for today
    Toggle { mood_id: MoodId },
    /// Clear today's moods
    Reset,
}

#[derive(Subcommand)]
enum TagAction {
    /// List tags and which are active
    List,
    /// Toggle a tag
    Toggle { tag: SmartTag },
    /// Deactivate every tag
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "moodboard".to_string(),
        log_level: config.log_level.clone(),
    })?;

    let name = command_name(&cli.command);
    let span = command::start_command_span(name);
    let started = Instant::now();

    let storage = Storage::new(&config.data_path);
    let snapshot = storage.load()?;
    let now = Utc::now();
    let mut board = Board::from_snapshot(
        snapshot,
        config.mood_catalog()?,
        config.timezone,
        config.timezone.date_key(now),
    );
    board.commit_moods_if_new_day(board.day_of(now));

    {
        let _enter = span.enter();
        run(&mut board, cli.command)?;
    }

    let events = board.drain_events();
    command::record_events(&span, events.len());
    for event in &events {
        tracing::debug!(seq = event.seq, kind = ?event.kind, "event");
    }
    if !events.is_empty() {
        storage.save(&board.snapshot())?;
    }

    command::record_duration(name, started);
    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Item { .. } => "item",
        Command::Mood { .. } => "mood",
        Command::Tag { .. } => "tag",
        Command::Recommend { .. } => "recommend",
        Command::Heatmap { .. } => "heatmap",
    }
}

fn run(board: &mut Board, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Item { action } => cmd_item(board, action),
        Command::Mood { action } => cmd_mood(board, action),
        Command::Tag { action } => cmd_tag(board, action),
        Command::Recommend { limit, mark, json } => cmd_recommend(board, limit, mark, json),
        Command::Heatmap { days, json } => cmd_heatmap(board, days, json),
    }
}

fn cmd_item(board: &mut Board, action: ItemAction) -> anyhow::Result<()> {
    match action {
        ItemAction::Add {
            title,
            category,
            moods,
            tags,
            favorite,
            notes,
            image_url,
        } => {
            if let Some(unknown) = moods.iter().find(|id| !board.moods().contains(**id)) {
                anyhow::bail!("unknown mood id {unknown}");
            }
            let mut new = NewCatalogItem::new(title, category)
                .moods(moods)
                .tags(tags)
                .favorite(favorite);
            if let Some(notes) = notes {
                new = new.notes(notes);
            }
            if let Some(url) = image_url {
                new = new.image_url(url);
            }
            let item = board.add_item(new);
            println!("Added: {} ({})", item.id, item.title);
        }
        ItemAction::List {
            status,
            category,
            favorites,
            search,
        } => {
            board.set_filter(FilterState {
                status: status.map_or(StatusFilter::All, StatusFilter::Only),
                category: category.map_or(CategoryFilter::All, CategoryFilter::Only),
                favorites_only: favorites,
                search,
            });
            let items = board.backlog(Utc::now());
            if items.is_empty() {
                println!("No items found.");
                return Ok(());
            }

            println!(
                "{:<8}  {:<11}  {:<11}  {:>4}  {:<3}  TITLE",
                "ID", "CATEGORY", "STATUS", "PCT", "FAV"
            );
            println!("{}", "-".repeat(72));
            for item in &items {
                println!(
                    "{:<8}  {:<11}  {:<11}  {:>3}%  {:<3}  {}",
                    item.id,
                    item.category,
                    item.status,
                    item.progress,
                    if item.is_favorite { "*" } else { "" },
                    item.title
                );
            }
            println!("\n{} item(s)", items.len());
        }
        ItemAction::Show { id } => {
            let item = board.find_by_prefix(&id)?;
            print_item(board, item);
        }
        ItemAction::Start { id } => {
            let id = board.find_by_prefix(&id)?.id;
            let item = board.start_item(id)?;
            println!("{}: {}", item.title, item.status);
        }
        ItemAction::Progress { id, progress } => {
            let id = board.find_by_prefix(&id)?.id;
            let item = board.set_progress(id, progress)?;
            println!("{}: {}% ({})", item.title, item.progress, item.status);
        }
        ItemAction::Favorite { id, off } => {
            let id = board.find_by_prefix(&id)?.id;
            let item = board.set_favorite(id, !off)?;
            println!(
                "{}: {}",
                item.title,
                if item.is_favorite { "favorite" } else { "not favorite" }
            );
        }
        ItemAction::Delete { id } => {
            let item = board.find_by_prefix(&id)?;
            let (id, title) = (item.id, item.title.clone());
            board.delete_item(id)?;
            println!("Deleted: {id} ({title})");
        }
    }
    Ok(())
}

fn print_item(board: &Board, item: &CatalogItem) {
    let mood_labels: Vec<&str> = item
        .mood_ids
        .iter()
        .filter_map(|id| board.moods().get(*id))
        .map(|m| m.label.as_str())
        .collect();
    let tags: Vec<&str> = item.smart_tags.iter().map(|t| t.as_str()).collect();

    println!("ID:         {}", item.id.0);
    println!("Title:      {}", item.title);
    println!("Category:   {}", item.category);
    println!("Status:     {}", item.status);
    println!("Progress:   {}%", item.progress);
    println!("Favorite:   {}", if item.is_favorite { "yes" } else { "no" });
    println!("Moods:      {}", mood_labels.join(", "));
    println!("Tags:       {}", tags.join(", "));
    println!("Notes:      {}", item.notes.as_deref().unwrap_or("-"));
    if let Some(url) = &item.image_url {
        println!("Image:      {url}");
    }
    println!("Created:    {}", item.created_at);
    if let Some(completed) = item.completed_at {
        println!("Completed:  {completed}");
    }
    if let Some(suggested) = item.last_suggested_at {
        println!("Suggested:  {suggested}");
    }
}

fn cmd_mood(board: &mut Board, action: MoodAction) -> anyhow::Result<()> {
    match action {
        MoodAction::List => {
            let today = &board.today().moods;
            for mood in board.moods().iter() {
                let mark = if today.contains(&mood.id) { "x" } else { " " };
                println!("[{mark}] {:>2}  {} {}", mood.id, mood.emoji, mood.label);
            }
        }
        MoodAction::Toggle { mood_id } => {
            let active = board.toggle_today_mood(mood_id)?;
            println!(
                "Mood {mood_id} {}",
                if active { "added" } else { "removed" }
            );
        }
        MoodAction::Reset => {
            board.reset_today_moods();
            println!("Today's moods cleared.");
        }
    }
    Ok(())
}

fn cmd_tag(board: &mut Board, action: TagAction) -> anyhow::Result<()> {
    match action {
        TagAction::List => {
            for group in [TagGroup::Time, TagGroup::Social] {
                println!("{group}:");
                for tag in SmartTag::ALL.into_iter().filter(|t| t.group() == group) {
                    let mark = if board.active_tags().contains(&tag) { "x" } else { " " };
                    println!("  [{mark}] {tag}");
                }
            }
        }
        TagAction::Toggle { tag } => {
            let active = board.toggle_smart_tag(tag);
            println!("{tag} {}", if active { "on" } else { "off" });
        }
        TagAction::Reset => {
            board.reset_filters();
            println!("All tags off.");
        }
    }
    Ok(())
}

fn cmd_recommend(board: &mut Board, limit: usize, mark: bool, json: bool) -> anyhow::Result<()> {
    let now = Utc::now();
    let Some(recs) = board.recommendations(now) else {
        println!("Log a mood or activate a tag to get recommendations.");
        return Ok(());
    };

    let top: Vec<_> = recs.ranked().iter().take(limit).copied().collect();

    if json {
        let out: Vec<serde_json::Value> = top
            .iter()
            .filter_map(|id| {
                let item = board.get_item(*id).ok()?;
                let rec = recs.get(id)?;
                Some(serde_json::json!({
                    "id": item.id,
                    "title": item.title,
                    "score": rec.score,
                    "breakdown": rec.breakdown,
                }))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if top.is_empty() {
        println!("Nothing in the backlog matches today.");
    } else {
        for id in &top {
            let (Ok(item), Some(rec)) = (board.get_item(*id), recs.get(id)) else {
                continue;
            };
            println!("{:>4}  {}  {}", rec.score, item.id, item.title);
            for line in &rec.breakdown {
                println!("        {line}");
            }
        }
    }

    if mark {
        for id in top {
            board.mark_suggested(id, now)?;
        }
    }
    Ok(())
}

fn cmd_heatmap(board: &mut Board, days: i64, json: bool) -> anyhow::Result<()> {
    let today = board.day_of(Utc::now());
    let since = today.days_back(days);
    let activity = board.daily_activities();
    let shown: Vec<_> = activity
        .values()
        .filter(|d| d.date > since && d.date <= today)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No activity recorded.");
        return Ok(());
    }

    println!(
        "{:<10}  {:>5}  {:<12}  {:>5}  {:>5}  {:>5}",
        "DATE", "MOODS", "DOMINANT", "ADDED", "DONE", "PROG"
    );
    println!("{}", "-".repeat(54));
    for day in shown {
        let dominant = day
            .moods
            .dominant_mood_id
            .and_then(|id| board.moods().get(id))
            .map_or("-", |m| m.label.as_str());
        println!(
            "{:<10}  {:>5}  {:<12}  {:>5}  {:>5}  {:>5}",
            day.date.to_string(),
            day.moods.count,
            dominant,
            day.works.added,
            day.works.completed,
            day.works.progressed
        );
    }
    Ok(())
}
