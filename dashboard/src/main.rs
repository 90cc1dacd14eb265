mod analyzer;
mod app;
mod config;
mod email;
mod error;
mod input;
mod insight;
mod render;

use crate::analyzer::GeminiClient;
use crate::app::AppState;
use crate::config::{Config, ConfigStore, SelectedTeams};
use crate::email::ShareMailer;
use crate::error::{DashboardError, Notice};
use crate::insight::TeamKey;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

#[derive(Parser)]
#[command(
    name = "insights",
    about = "AI Analytics Insights Dashboard — per-team Gemini analysis of uploaded analytics data"
)]
struct Cli {
    /// Analytics data file (csv, json, xlsx, xls)
    file: Option<PathBuf>,

    /// Where to write the HTML report
    #[arg(long, default_value = "insights-report.html")]
    out: PathBuf,

    /// Gemini model id (overrides stored config)
    #[arg(long)]
    model: Option<String>,

    /// Gemini API key (overrides stored config and GEMINI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Comma-separated team selection: product,business,tech,marketing
    #[arg(long)]
    teams: Option<String>,

    /// Persist the effective key/model/team selection to the config store
    #[arg(long)]
    save_config: bool,

    /// Clear the stored config
    #[arg(long)]
    reset_config: bool,

    /// Use an alternate config store path
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Also write a printable single-card export for this team
    #[arg(long)]
    export_team: Option<String>,

    /// Email this team's card (requires --share-to and SMTP_* env vars)
    #[arg(long)]
    share_team: Option<String>,

    /// Recipient address for --share-team
    #[arg(long)]
    share_to: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let store = match &cli.config_file {
        Some(path) => ConfigStore::at(path.clone()),
        None => ConfigStore::new(),
    };

    if cli.reset_config {
        store.clear();
        info!("Cleared stored config at {}", store.path().display());
    }

    let mut config = store.load();
    if let Some(key) = &cli.api_key {
        config.api_key = key.trim().to_string();
    }
    if let Some(model) = &cli.model {
        config.selected_model = model.clone();
    }
    if let Some(teams) = &cli.teams {
        config.selected_teams = SelectedTeams::from_list(&parse_team_list(teams)?);
    }

    if cli.save_config {
        if store.save(&config) {
            info!("Config saved to {}", store.path().display());
        } else {
            error!("Could not save config to {}", store.path().display());
        }
    }

    let Some(file) = cli.file.clone() else {
        if cli.save_config || cli.reset_config {
            return Ok(());
        }
        anyhow::bail!("no data file given (see --help)");
    };

    banner(&config);

    let mut state = AppState::new(config);

    let upload = match input::read_upload(&file) {
        Ok(upload) => upload,
        Err(e) => {
            show_notice(&e);
            std::process::exit(1);
        }
    };
    let upload_info = upload.clone();
    state.attach_file(upload);

    if !state.can_analyze() {
        debug!("Analyze trigger disabled in phase {:?}", state.phase());
    }

    let client = GeminiClient::new(&state.config.api_key, &state.config.selected_model);

    let (result, duration) = match state.analyze(&client).await {
        Ok(outcome) => outcome,
        Err(e) => {
            show_notice(&e);
            state.reset();
            std::process::exit(1);
        }
    };

    info!("Analysis done in {:.2} seconds", duration.as_secs_f64());

    let cards = render::build_cards(&result, &state.config.selected_teams);
    if cards.is_empty() {
        warn!("No insight cards to render — check the team selection");
    }

    for card in &cards {
        println!("\n{} {}", card.team.icon(), card.team.display_name());
        println!("────────────────────────────────────────");
        println!("{}", card.text);
    }
    println!();

    let report = render::render_report(&cards, &upload_info, duration);
    std::fs::write(&cli.out, report)
        .with_context(|| format!("write report to {}", cli.out.display()))?;
    info!("Report written to {}", cli.out.display());

    if let Some(team_arg) = &cli.export_team {
        let team = parse_team(team_arg)?;
        match cards.iter().find(|c| c.team == team) {
            Some(card) => {
                let path = PathBuf::from(format!("insights-{}.html", team.key()));
                std::fs::write(&path, render::export_card(card))
                    .with_context(|| format!("write export to {}", path.display()))?;
                info!("Export written to {}", path.display());
            }
            None => warn!("No {team} card to export"),
        }
    }

    if let Some(team_arg) = &cli.share_team {
        let team = parse_team(team_arg)?;
        let to = cli
            .share_to
            .as_deref()
            .context("--share-team requires --share-to")?;
        match cards.iter().find(|c| c.team == team) {
            Some(card) => {
                let mailer = ShareMailer::from_env();
                mailer.share_insight(to, team, &card.text).await?;
            }
            None => warn!("No {team} card to share"),
        }
    }

    Ok(())
}

fn banner(config: &Config) {
    let teams: Vec<&str> = TeamKey::ALL
        .iter()
        .filter(|t| config.selected_teams.is_selected(**t))
        .map(|t| t.key())
        .collect();

    info!("══════════════════════════════════════════");
    info!("  AI ANALYTICS INSIGHTS DASHBOARD");
    info!("  Model: {}", config.selected_model);
    info!("  Teams: {}", teams.join(", "));
    info!(
        "  API key: {}",
        if config.api_key.trim().is_empty() {
            "NOT SET"
        } else {
            "configured"
        }
    );
    info!("══════════════════════════════════════════");
}

fn show_notice(err: &DashboardError) {
    let notice = Notice::from_error(err);
    error!("{} {} — {}", notice.icon, notice.title, notice.message);
}

fn parse_team(s: &str) -> Result<TeamKey> {
    TeamKey::parse(s).ok_or_else(|| {
        anyhow::anyhow!("unknown team: {s} (expected product, business, tech, or marketing)")
    })
}

fn parse_team_list(s: &str) -> Result<Vec<TeamKey>> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(parse_team)
        .collect()
}
