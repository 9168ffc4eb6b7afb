//! Growth Tracker CLI
//!
//! Command-line interface for the tracker:
//! - Weekly dashboards per domain
//! - Add, edit, list and delete entries
//! - AI analysis, nutrition lookup and free-text log parsing

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use growth_tracker::analysis::nutrition::NOT_IDENTIFIED_MESSAGE;
use growth_tracker::analysis::prompts::coach_title;
use growth_tracker::analysis::{
    apply_nutrition, AnalysisProvider, AnalysisSession, GeminiClient, MockProvider, NutritionMode,
};
use growth_tracker::config::{generate_default_config, Config, LoggingConfig};
use growth_tracker::storage::{
    extract_number, Domain, Entity, EntityStore, FileBackend, MindLog, MindLogDraft, MuscleLog,
    MuscleLogDraft, Transaction, TransactionDraft, TransactionType, MONEY_CATEGORIES,
    WORKOUT_OPTIONS,
};
use growth_tracker::summary::{self, DomainSummary, MindSummary, MoneySummary, MuscleSummary};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "growth")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Muscle, Mind and Money: a personal weekly tracker")]
#[command(long_about = "Log training, wellbeing and spending, see the latest week at a glance,\nand ask an AI coach for feedback.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overriding the config
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Use the offline mock model instead of Gemini
    #[arg(long, global = true)]
    pub mock: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the latest week for a domain
    Dashboard { domain: Domain },

    /// List every entry of a domain, newest first
    List { domain: Domain },

    /// Add an entry
    #[command(subcommand)]
    Add(AddCommand),

    /// Edit an entry; fields not given keep their value
    #[command(subcommand)]
    Edit(EditCommand),

    /// Delete an entry
    Delete { domain: Domain, id: String },

    /// Ask the AI coach about a domain (needs at least 3 entries)
    Analyze { domain: Domain },

    /// Estimate nutrition for a food description
    Nutrition {
        /// What was eaten, e.g. "2 eggs and a yogabar"
        text: String,
        /// Muscle entry to write the result into
        #[arg(long)]
        apply: Option<String>,
        /// Overwrite the entry's nutrition instead of adding to it
        #[arg(long, requires = "apply")]
        replace: bool,
    },

    /// Turn a free-text description of the day into a muscle entry
    Parse {
        text: String,
        /// Save the parsed entry instead of only printing it
        #[arg(long)]
        save: bool,
    },

    /// Show workout presets and money categories
    Options,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AddCommand {
    Muscle(MuscleArgs),
    Mind(MindArgs),
    Money(MoneyArgs),
}

#[derive(Subcommand)]
pub enum EditCommand {
    Muscle {
        id: String,
        #[command(flatten)]
        fields: MuscleArgs,
    },
    Mind {
        id: String,
        #[command(flatten)]
        fields: MindArgs,
    },
    Money {
        id: String,
        #[command(flatten)]
        fields: MoneyArgs,
    },
}

#[derive(Args, Debug)]
pub struct MuscleArgs {
    /// YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Body weight in kg
    #[arg(long)]
    weight: Option<f64>,
    /// Workout preset (see `growth options`) or a custom name
    #[arg(long)]
    workout: Option<String>,
    /// Minutes trained
    #[arg(long)]
    duration: Option<u32>,
    /// Hours slept
    #[arg(long)]
    sleep: Option<f64>,
    /// Liters of water
    #[arg(long)]
    water: Option<u32>,
    /// Accepts text such as "1,950kcal"
    #[arg(long, value_parser = parse_quantity)]
    calories: Option<f64>,
    #[arg(long, value_parser = parse_quantity)]
    protein: Option<f64>,
    #[arg(long, value_parser = parse_quantity)]
    carbs: Option<f64>,
    #[arg(long, value_parser = parse_quantity)]
    fat: Option<f64>,
    #[arg(long, value_parser = parse_quantity)]
    fiber: Option<f64>,
}

impl MuscleArgs {
    fn apply(self, draft: &mut MuscleLogDraft) {
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(weight) = self.weight {
            draft.weight = weight;
        }
        if let Some(workout) = self.workout {
            draft.set_workout(&workout);
        }
        if let Some(duration) = self.duration {
            draft.workout_duration = duration;
        }
        if let Some(sleep) = self.sleep {
            draft.sleep_hours = sleep;
        }
        if let Some(water) = self.water {
            draft.water_intake = water;
        }
        if let Some(calories) = self.calories {
            draft.calories = calories;
        }
        if let Some(protein) = self.protein {
            draft.protein = protein;
        }
        if let Some(carbs) = self.carbs {
            draft.carbs = carbs;
        }
        if let Some(fat) = self.fat {
            draft.fat = fat;
        }
        if let Some(fiber) = self.fiber {
            draft.fiber = fiber;
        }
    }
}

#[derive(Args, Debug)]
pub struct MindArgs {
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Self-rated 1-10
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    score: Option<u8>,
    /// Minutes meditated
    #[arg(long)]
    meditation: Option<u32>,
    #[arg(long)]
    book: Option<String>,
    #[arg(long)]
    pages: Option<u32>,
    /// Minutes of screen time
    #[arg(long)]
    screen_time: Option<u32>,
    /// Comma-separated, e.g. "Instagram, YouTube"
    #[arg(long)]
    apps: Option<String>,
    /// Whether the day was a digital detox
    #[arg(long, value_name = "BOOL")]
    detox: Option<bool>,
    #[arg(long)]
    podcast: Option<String>,
}

impl MindArgs {
    fn apply(self, draft: &mut MindLogDraft) {
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(score) = self.score {
            draft.mind_score = score;
        }
        if let Some(meditation) = self.meditation {
            draft.meditation_minutes = meditation;
        }
        if let Some(book) = self.book {
            draft.book_name = book;
        }
        if let Some(pages) = self.pages {
            draft.pages_read = pages;
        }
        if let Some(screen_time) = self.screen_time {
            draft.screen_time_minutes = screen_time;
        }
        if let Some(apps) = self.apps {
            draft.top_apps = apps;
        }
        if let Some(detox) = self.detox {
            draft.digital_detox = detox;
        }
        if let Some(podcast) = self.podcast {
            draft.podcast = podcast;
        }
    }
}

#[derive(Args, Debug)]
pub struct MoneyArgs {
    #[arg(long)]
    date: Option<NaiveDate>,
    /// income or expense (default: expense)
    #[arg(long = "type")]
    kind: Option<TransactionType>,
    /// Magnitude; the sign follows the type
    #[arg(long, value_parser = parse_quantity)]
    amount: Option<f64>,
    /// See `growth options`
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    details: Option<String>,
    #[arg(long)]
    subcategory: Option<String>,
}

impl MoneyArgs {
    fn apply(self, draft: &mut TransactionDraft) {
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(kind) = self.kind {
            draft.kind = kind;
        }
        if let Some(amount) = self.amount {
            draft.amount = amount;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(details) = self.details {
            draft.details = details;
        }
        if let Some(subcategory) = self.subcategory {
            draft.subcategory = Some(subcategory);
        }
    }
}

fn parse_quantity(s: &str) -> Result<f64, String> {
    Ok(extract_number(s))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.to_string_lossy().to_string();
    }
    init_tracing(&config.logging);
    tracing::debug!(data_dir = %config.storage.data_dir, "growth v{}", env!("CARGO_PKG_VERSION"));

    let format = cli.format;
    let mut store = EntityStore::open(
        FileBackend::new(config.storage.data_path()),
        config.storage.store_options(),
    );

    match cli.command {
        Commands::Dashboard { domain } => {
            match summary::summarize(store.entries(domain)) {
                Some(summary) => print_summary(format, &summary)?,
                None if format == OutputFormat::Json => println!("null"),
                None => println!("No {} entries yet", domain),
            }
        }

        Commands::List { domain } => match domain {
            Domain::Muscle => {
                let rows = newest_first(store.muscle().entries());
                print_rows(format, &rows, print_muscle_table)?;
            }
            Domain::Mind => {
                let rows = newest_first(store.mind().entries());
                print_rows(format, &rows, print_mind_table)?;
            }
            Domain::Money => {
                let rows: Vec<TransactionRow> = newest_first(store.money().entries())
                    .into_iter()
                    .map(TransactionRow::from)
                    .collect();
                print_rows(format, &rows, print_money_table)?;
            }
        },

        Commands::Add(add) => match add {
            AddCommand::Muscle(fields) => {
                let mut draft = MuscleLogDraft::default();
                fields.apply(&mut draft);
                let log = store.create_muscle(draft);
                println!("Added muscle entry {} for {}", log.id, log.date);
            }
            AddCommand::Mind(fields) => {
                let mut draft = MindLogDraft::default();
                fields.apply(&mut draft);
                let log = store.create_mind(draft);
                println!("Added mind entry {} for {}", log.id, log.date);
            }
            AddCommand::Money(fields) => {
                let mut draft = TransactionDraft::default();
                fields.apply(&mut draft);
                let tx = store.create_transaction(draft);
                println!("Added {} of {:.2} ({}) as {}", tx.kind, tx.amount, tx.category, tx.id);
            }
        },

        Commands::Edit(edit) => match edit {
            EditCommand::Muscle { id, fields } => {
                let Some(existing) = store.muscle().find(&id) else {
                    bail!("No muscle entry with id {id}");
                };
                let mut draft = existing.to_draft();
                fields.apply(&mut draft);
                store.update_muscle(&id, draft);
                println!("Updated muscle entry {id}");
            }
            EditCommand::Mind { id, fields } => {
                let Some(existing) = store.mind().find(&id) else {
                    bail!("No mind entry with id {id}");
                };
                let mut draft = existing.to_draft();
                fields.apply(&mut draft);
                store.update_mind(&id, draft);
                println!("Updated mind entry {id}");
            }
            EditCommand::Money { id, fields } => {
                let Some(existing) = store.money().find(&id) else {
                    bail!("No money entry with id {id}");
                };
                let mut draft = existing.to_draft();
                fields.apply(&mut draft);
                store.update_transaction(&id, draft);
                println!("Updated money entry {id}");
            }
        },

        Commands::Delete { domain, id } => {
            if store.delete(domain, &id) {
                println!("Deleted {domain} entry {id}");
            } else {
                println!("No {domain} entry with id {id}");
            }
        }

        Commands::Analyze { domain } => {
            let provider = provider(cli.mock, &config)?;
            let mut session = AnalysisSession::new();

            println!("{}", coach_title(domain));
            println!("{}", "-".repeat(40));

            match session.run(provider.as_ref(), store.entries(domain)).await {
                Ok(analysis) => match format {
                    OutputFormat::Table => {
                        println!("{}\n", analysis.summary);
                        for (i, tip) in analysis.tips.iter().enumerate() {
                            println!("{}. {}", i + 1, tip);
                        }
                    }
                    _ => println!("{}", serde_json::to_string_pretty(&analysis)?),
                },
                Err(e) => bail!(e.user_message()),
            }
        }

        Commands::Nutrition {
            text,
            apply,
            replace,
        } => {
            let provider = provider(cli.mock, &config)?;
            let facts = provider
                .lookup_nutrition(&text)
                .await
                .context("Failed to calculate nutrition. Please try again.")?;

            if facts.is_unidentified() {
                bail!(NOT_IDENTIFIED_MESSAGE);
            }

            match format {
                OutputFormat::Table => println!(
                    "Calories {:.1} | Protein {:.1}g | Carbs {:.1}g | Fat {:.1}g | Fiber {:.1}g",
                    facts.calories, facts.protein, facts.carbs, facts.fat, facts.fiber
                ),
                _ => println!("{}", serde_json::to_string_pretty(&facts)?),
            }

            if let Some(id) = apply {
                let Some(existing) = store.muscle().find(&id) else {
                    bail!("No muscle entry with id {id}");
                };
                let mut draft = existing.to_draft();
                let mode = if replace {
                    NutritionMode::Replace
                } else {
                    NutritionMode::Add
                };
                apply_nutrition(&mut draft, &facts, mode);
                store.update_muscle(&id, draft);
                println!("Updated nutrition on muscle entry {id}");
            }
        }

        Commands::Parse { text, save } => {
            let provider = provider(cli.mock, &config)?;
            let today = Local::now().date_naive();
            let patch = provider
                .parse_muscle_log(&text, today)
                .await
                .context("Failed to parse with AI. Please check your API key or try again.")?;

            let mut draft = MuscleLogDraft::default();
            draft.apply_patch(&patch);

            if save {
                let log = store.create_muscle(draft);
                print_rows(format, &[&log], print_muscle_table)?;
            } else {
                let preview = MuscleLog::from_draft("(unsaved)".to_string(), draft);
                print_rows(format, &[&preview], print_muscle_table)?;
            }
        }

        Commands::Options => {
            println!("Workouts:");
            for workout in WORKOUT_OPTIONS {
                println!("  {workout}");
            }
            println!("\nMoney categories:");
            for category in MONEY_CATEGORIES {
                println!("  {category}");
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "growth_tracker={level},growth={level}",
            level = logging.level
        ))
    });
    let json = logging.format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn provider(mock: bool, config: &Config) -> anyhow::Result<Box<dyn AnalysisProvider>> {
    if mock {
        return Ok(Box::new(MockProvider::new()));
    }
    let client = GeminiClient::from_env(config.analysis.gemini()).with_context(|| {
        format!(
            "Set {} to use AI features, or pass --mock",
            config.analysis.api_key_env
        )
    })?;
    Ok(Box::new(client))
}

fn newest_first<E: Entity>(entries: &[E]) -> Vec<&E> {
    let mut rows: Vec<&E> = entries.iter().collect();
    rows.sort_by(|a, b| b.date().cmp(&a.date()));
    rows
}

fn print_rows<T: Serialize>(
    format: OutputFormat,
    rows: &[T],
    table: impl FnOnce(&[T]),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => write_csv(rows)?,
        OutputFormat::Table => table(rows),
    }
    Ok(())
}

fn write_csv<T: Serialize>(rows: &[T]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Flat transaction record, so every CSV row has the same columns
#[derive(Serialize)]
struct TransactionRow<'a> {
    id: &'a str,
    date: NaiveDate,
    #[serde(rename = "type")]
    kind: TransactionType,
    amount: f64,
    category: &'a str,
    subcategory: &'a str,
    details: &'a str,
}

impl<'a> From<&'a Transaction> for TransactionRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            id: &tx.id,
            date: tx.date,
            kind: tx.kind,
            amount: tx.amount,
            category: &tx.category,
            subcategory: tx.subcategory.as_deref().unwrap_or(""),
            details: &tx.details,
        }
    }
}

fn print_muscle_table(rows: &[&MuscleLog]) {
    if rows.is_empty() {
        println!("No muscle entries");
        return;
    }

    println!(
        "{:<12} | {:<24} | {:>4} | {:>6} | {:>5} | {:>3} | {:>7} | {:>6} | {:>6} | {:>6} | {:>5} | {}",
        "Date", "Workout", "Min", "Kg", "Sleep", "L", "Kcal", "P", "C", "F", "Fiber", "ID"
    );
    println!("{}", "-".repeat(130));
    for log in rows {
        println!(
            "{:<12} | {:<24} | {:>4} | {:>6.1} | {:>5.1} | {:>3} | {:>7.0} | {:>6.1} | {:>6.1} | {:>6.1} | {:>5.1} | {}",
            log.date.to_string(),
            truncate(&log.workout_type, 24),
            log.workout_duration,
            log.weight,
            log.sleep_hours,
            log.water_intake,
            log.calories,
            log.protein,
            log.carbs,
            log.fat,
            log.fiber,
            log.id
        );
    }
}

fn print_mind_table(rows: &[&MindLog]) {
    if rows.is_empty() {
        println!("No mind entries");
        return;
    }

    println!(
        "{:<12} | {:>5} | {:>4} | {:<20} | {:>5} | {:>6} | {:<20} | {:<5} | {}",
        "Date", "Score", "Med", "Book", "Pages", "Screen", "Top apps", "Detox", "ID"
    );
    println!("{}", "-".repeat(120));
    for log in rows {
        println!(
            "{:<12} | {:>5} | {:>4} | {:<20} | {:>5} | {:>6} | {:<20} | {:<5} | {}",
            log.date.to_string(),
            log.mind_score,
            log.meditation_minutes,
            truncate(&log.book_name, 20),
            log.pages_read,
            summary::format_screen_time(f64::from(log.screen_time_minutes)),
            truncate(&log.top_apps, 20),
            if log.digital_detox { "yes" } else { "no" },
            log.id
        );
    }
}

fn print_money_table(rows: &[TransactionRow<'_>]) {
    if rows.is_empty() {
        println!("No money entries");
        return;
    }

    println!(
        "{:<12} | {:<10} | {:>10} | {:<20} | {:<24} | {}",
        "Date", "Type", "Amount", "Category", "Details", "ID"
    );
    println!("{}", "-".repeat(110));
    for tx in rows {
        println!(
            "{:<12} | {:<10} | {:>10.2} | {:<20} | {:<24} | {}",
            tx.date.to_string(),
            tx.kind.to_string(),
            tx.amount,
            truncate(tx.category, 20),
            truncate(tx.details, 24),
            tx.id
        );
    }
}

fn print_summary(format: OutputFormat, summary: &DomainSummary) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Csv => match summary {
            DomainSummary::Muscle(s) => write_csv(&s.chart)?,
            DomainSummary::Mind(s) => write_csv(&s.chart)?,
            DomainSummary::Money(s) => write_csv(&s.daily)?,
        },
        OutputFormat::Table => match summary {
            DomainSummary::Muscle(s) => print_muscle_dashboard(s),
            DomainSummary::Mind(s) => print_mind_dashboard(s),
            DomainSummary::Money(s) => print_money_dashboard(s),
        },
    }
    Ok(())
}

fn print_muscle_dashboard(s: &MuscleSummary) {
    println!("Muscle: {} .. {}", s.start_date, s.end_date);
    println!("{}", "-".repeat(60));
    println!(
        "{:<16} {:.1} kg ({}{:.1} kg this week)",
        "Avg weight",
        s.avg_weight,
        if s.weight_change > 0.0 { "+" } else { "" },
        s.weight_change
    );
    println!(
        "{:<16} {} ({:.0} min total, {:.0} min/day)",
        "Workouts", s.total_workouts, s.total_duration, s.avg_duration
    );
    println!("{:<16} {:.1} hrs", "Avg sleep", s.avg_sleep);
    println!("{:<16} {:.1} L", "Avg water", s.avg_water_intake);
    println!("{:<16} {:.0} kcal", "Avg calories", s.avg_calories);
    println!(
        "{:<16} P {:.1}g  C {:.1}g  F {:.1}g  Fiber {:.1}g",
        "Avg macros", s.avg_protein, s.avg_carbs, s.avg_fat, s.avg_fiber
    );

    println!();
    println!("{:<4} {:<12} {:>6} {:>7} {:>6}", "Day", "Date", "Kg", "Kcal", "Sleep");
    for point in &s.chart {
        println!(
            "{:<4} {:<12} {:>6.1} {:>7.0} {:>6.1}",
            point.day, point.date.to_string(), point.weight, point.calories, point.sleep_hours
        );
    }
}

fn print_mind_dashboard(s: &MindSummary) {
    println!("Mind: {} .. {}", s.start_date, s.end_date);
    println!("{}", "-".repeat(60));
    println!("{:<18} {:.1}/10", "Avg mind score", s.avg_score);
    println!("{:<18} {} min", "Meditation", s.total_meditation);
    println!(
        "{:<18} {}{:.1} pts",
        "Meditation impact",
        if s.meditation_impact > 0.0 { "+" } else { "" },
        s.meditation_impact
    );
    println!("{:<18} {}", "Pages read", s.total_pages);
    println!("{:<18} {} per day", "Screen time", s.screen_time_display);
    println!("{:<18} {}", "Top app", s.top_app);
    println!("{:<18} {}", "Detox days", s.detox_days);

    println!();
    println!("{:<4} {:<12} {:>5} {:>4} {:>6}", "Day", "Date", "Score", "Med", "Screen");
    for point in &s.chart {
        println!(
            "{:<4} {:<12} {:>5} {:>4} {:>5.1}h",
            point.day, point.date.to_string(), point.mind_score, point.meditation_minutes, point.screen_time_hours
        );
    }
}

fn print_money_dashboard(s: &MoneySummary) {
    println!("Money: {} .. {}", s.start_date, s.end_date);
    println!("{}", "-".repeat(60));
    println!("{:<14} {:>10.2}", "Income", s.income);
    println!("{:<14} {:>10.2}", "Expense", s.expense);
    println!("{:<14} {:>10.2}", "Balance", s.balance);
    println!("{:<14} {:>9.1}%", "Savings rate", s.savings_rate);
    println!("{:<14} {:>10.2}", "Daily spend", s.daily_avg_spend);

    println!();
    println!("{:<4} {:<12} {:>10} {:>10}", "Day", "Date", "Income", "Expense");
    for day in &s.daily {
        println!(
            "{:<4} {:<12} {:>10.2} {:>10.2}",
            day.day, day.date.to_string(), day.income, day.expense
        );
    }

    if !s.categories.is_empty() {
        println!();
        let total = if s.expense > 0.0 { s.expense } else { 1.0 };
        for cat in &s.categories {
            println!(
                "{:<22} {:>10.2} {:>4.0}%",
                cat.category,
                cat.amount,
                cat.amount / total * 100.0
            );
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
