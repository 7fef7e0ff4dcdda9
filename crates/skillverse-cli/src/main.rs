//! Skillverse CLI - skill tracker with connector recommendations

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use skillverse_core::api::{self, AppState, health};
use skillverse_core::config::Config;
use skillverse_core::galaxy;
use skillverse_core::progress;
use skillverse_core::recommend;
use skillverse_core::skills::{SkillCategory, SkillId, SkillStore, User};
use skillverse_core::storage::Database;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "skillverse")]
#[command(author, version, about = "Track skills and discover the connectors between them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database file (overrides database.path from the config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind (defaults to server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Browse the skill catalog
    Skills {
        #[command(subcommand)]
        action: SkillAction,
    },

    /// Mark a skill as acquired
    Learn {
        /// Skill name (case-insensitive)
        name: String,
    },

    /// Remove an acquired skill
    Forget {
        /// Skill name (case-insensitive)
        name: String,
    },

    /// List acquired skills
    Mine,

    /// Suggest connector skills for what you already know
    Recommend,

    /// Show the galaxy graph of acquired skills
    Galaxy,

    /// Show experience and level
    Progress,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,
}

#[derive(Subcommand)]
enum SkillAction {
    /// List catalog skills
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show skill details
    Show { name: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

/// Open database plus the learner commands act for
struct Session {
    db: Database,
    store: SkillStore,
    user: User,
}

impl Session {
    async fn open(db_override: Option<PathBuf>, config: &Config) -> anyhow::Result<Self> {
        let path = db_override.unwrap_or_else(|| config.database.resolved_path());
        debug!(path = %path.display(), "Opening database");

        let db = Database::open(path).await?;
        let store = SkillStore::new(db.pool().clone());
        let user = store.ensure_user(&config.user.username).await?;

        Ok(Self { db, store, user })
    }

    /// Open using the saved configuration
    async fn load(db_override: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = Config::load()?;
        Self::open(db_override, &config).await
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skillverse=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let out = Output {
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Config { action } => cmd_config(action, out),
        Commands::Serve { host, port } => cmd_serve(cli.db, Config::load()?, host, port).await,
        Commands::Skills { action } => cmd_skills(&Session::load(cli.db).await?, action, out).await,
        Commands::Learn { name } => cmd_learn(&Session::load(cli.db).await?, &name, out).await,
        Commands::Forget { name } => cmd_forget(&Session::load(cli.db).await?, &name, out).await,
        Commands::Mine => cmd_mine(&Session::load(cli.db).await?, out).await,
        Commands::Recommend => cmd_recommend(&Session::load(cli.db).await?, out).await,
        Commands::Galaxy => cmd_galaxy(&Session::load(cli.db).await?, out).await,
        Commands::Progress => cmd_progress(&Session::load(cli.db).await?, out).await,
        Commands::Doctor => cmd_doctor(&Session::load(cli.db).await?, out).await,
    }
}

#[derive(Clone, Copy)]
struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    fn print_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_serve(
    db_override: Option<PathBuf>,
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let addr = config.server.socket_addr()?;

    let path = db_override.unwrap_or_else(|| config.database.resolved_path());
    let db = Database::open(path).await?;
    let mut state = AppState::new(db, &config.user.username).await?;
    if let Ok(path) = Config::config_path() {
        state = state.with_config_path(path);
    }

    info!(%addr, "Starting server");
    api::serve(state, addr).await?;
    Ok(())
}

async fn cmd_skills(session: &Session, action: SkillAction, out: Output) -> anyhow::Result<()> {
    match action {
        SkillAction::List { category } => {
            let skills = match category.as_deref() {
                Some(category) => {
                    session
                        .store
                        .list_by_category(&SkillCategory::parse(category))
                        .await?
                }
                None => session.store.list().await?,
            };

            if out.json() {
                return out.print_json(&skills);
            }
            if skills.is_empty() {
                if !out.quiet {
                    println!("No skills found.");
                }
                return Ok(());
            }

            let mut current: Option<&SkillCategory> = None;
            for skill in &skills {
                if !out.quiet && current != Some(&skill.category) {
                    println!("{}:", skill.category);
                    current = Some(&skill.category);
                }
                println!("  {} - {}", skill.name, skill.description);
            }
        }
        SkillAction::Show { name } => {
            let skill = session.store.require_by_name(&name).await?;
            let connections = session.store.list_connections().await?;
            let catalog = session.store.list().await?;
            let name_of = |id: SkillId| {
                catalog
                    .iter()
                    .find(|s| s.id == id)
                    .map(|s| s.name.as_str())
                    .unwrap_or("?")
            };
            let bridges: Vec<[&str; 2]> = connections
                .iter()
                .filter(|c| c.connector_skill_id == skill.id)
                .map(|c| [name_of(c.skill1_id), name_of(c.skill2_id)])
                .collect();

            if out.json() {
                return out.print_json(&serde_json::json!({
                    "skill": skill,
                    "connects": bridges,
                }));
            }

            println!("Skill: {}", skill.name);
            println!("  ID: {}", skill.id);
            println!("  Category: {}", skill.category);
            println!("  Description: {}", skill.description);
            println!("  Learn: {}", skill.learning_resources);
            for [a, b] in bridges {
                println!("  Connects: {} + {}", a, b);
            }
        }
    }
    Ok(())
}

async fn cmd_learn(session: &Session, name: &str, out: Output) -> anyhow::Result<()> {
    let skill = session.store.require_by_name(name).await?;
    let added = session.store.add_skill(session.user.id, skill.id).await?;

    if out.json() {
        return out.print_json(&serde_json::json!({ "success": true, "added": added }));
    }
    if !out.quiet {
        if added {
            println!("Learned '{}' (+{} XP)", skill.name, progress::XP_PER_SKILL);
        } else {
            println!("'{}' is already in your skills.", skill.name);
        }
    }
    Ok(())
}

async fn cmd_forget(session: &Session, name: &str, out: Output) -> anyhow::Result<()> {
    let skill = session.store.require_by_name(name).await?;
    let removed = session.store.remove_skill(session.user.id, skill.id).await?;

    if out.json() {
        return out.print_json(&serde_json::json!({ "success": true, "removed": removed }));
    }
    if !out.quiet {
        if removed {
            println!("Forgot '{}'.", skill.name);
        } else {
            println!("'{}' was not in your skills.", skill.name);
        }
    }
    Ok(())
}

async fn cmd_mine(session: &Session, out: Output) -> anyhow::Result<()> {
    let acquired = session.store.list_acquired(session.user.id).await?;

    if out.json() {
        return out.print_json(&acquired);
    }
    if acquired.is_empty() {
        if !out.quiet {
            println!("No skills yet.");
            println!("\nAdd one with: skillverse learn <name>");
        }
        return Ok(());
    }

    if !out.quiet {
        println!("Skills of {}:", session.user.username);
    }
    for a in acquired {
        println!(
            "  {} ({}) - since {}",
            a.skill.name,
            a.skill.category,
            a.acquired_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

async fn cmd_recommend(session: &Session, out: Output) -> anyhow::Result<()> {
    let recommendations = recommend::recommendations_for(&session.store, session.user.id).await?;

    if out.json() {
        return out.print_json(&recommendations);
    }
    if recommendations.is_empty() {
        if !out.quiet {
            println!("No recommendations yet. Learn at least two related skills.");
        }
        return Ok(());
    }

    if !out.quiet {
        println!("Recommended connectors:");
    }
    for r in recommendations {
        println!("  {} - connects {} + {}", r.name, r.connects[0], r.connects[1]);
        if !out.quiet {
            println!("      {}", r.learning_resources);
        }
    }
    Ok(())
}

async fn cmd_galaxy(session: &Session, out: Output) -> anyhow::Result<()> {
    let galaxy = galaxy::galaxy_for(&session.store, session.user.id).await?;

    if out.json() {
        return out.print_json(&galaxy);
    }

    let name_of = |id: SkillId| {
        galaxy
            .nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.name.as_str())
            .unwrap_or("?")
    };

    if !out.quiet {
        println!("Stars: {}", galaxy.nodes.len());
    }
    for node in &galaxy.nodes {
        println!("  * {} ({})", node.name, node.category);
    }
    if !out.quiet {
        println!("Links: {}", galaxy.links.len());
    }
    for link in &galaxy.links {
        println!(
            "  {} <-> {} via {}",
            name_of(link.source),
            name_of(link.target),
            link.connector
        );
    }
    Ok(())
}

async fn cmd_progress(session: &Session, out: Output) -> anyhow::Result<()> {
    let summary = progress::progress_for(&session.store, session.user.id).await?;

    if out.json() {
        return out.print_json(&summary);
    }

    println!("Level {} ({} XP)", summary.level, summary.xp);
    if !out.quiet {
        println!(
            "  {} / {} XP to next level",
            summary.xp_into_level,
            summary.xp_into_level + summary.xp_to_next_level
        );
        println!(
            "  Skills: {} of {} ({} connectors)",
            summary.acquired_count, summary.catalog_size, summary.connector_count
        );
        for (category, count) in &summary.by_category {
            println!("    {}: {}", category, count);
        }
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, out: Output) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !out.quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list();
            if out.json() {
                let map: serde_json::Map<String, serde_json::Value> = items
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v)))
                    .collect();
                return out.print_json(&map);
            }
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !out.quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(session: &Session, out: Output) -> anyhow::Result<()> {
    let config_path = Config::config_path().ok();
    let report = health::doctor(&session.db, config_path.as_deref()).await;

    if out.json() {
        return out.print_json(&report);
    }

    if !out.quiet {
        println!("Skillverse Health Check");
        println!("=======================");
        println!();
    }

    for check in &report.checks {
        let marker = match check.status {
            health::HealthStatus::Ok => "[OK]",
            health::HealthStatus::Warning => "[--]",
            health::HealthStatus::Error => "[!!]",
        };
        match &check.message {
            Some(message) => println!("{} {}: {}", marker, check.name, message),
            None => println!("{} {}", marker, check.name),
        }
    }

    if !out.quiet {
        println!();
        match report.overall_status {
            health::HealthStatus::Error => println!("Some checks failed. See above for details."),
            _ => println!("All checks passed!"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "skillverse",
            "recommend",
            "--format",
            "json",
            "--db",
            "/tmp/x.db",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Recommend));
        assert!(cli.format == OutputFormat::Json);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from(["skillverse", "serve", "--host", "0.0.0.0", "-p", "8080"])
            .unwrap();

        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_learn_requires_name() {
        assert!(Cli::try_parse_from(["skillverse", "learn"]).is_err());
    }
}
