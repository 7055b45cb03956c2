//! Matchedge CLI - Command-line interface for checklist match analysis

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use matchedge::core::checklist::default_factors;
use matchedge::data::{list_matches, load_match, load_request, save_report};
use matchedge::error::validate_staking;
use matchedge::report::{format_odds, format_risk, render_text};
use matchedge::{
    AggregationPolicy, AnalysisReport, ChecklistSession, DecisionEngine, EngineConfig,
    MarketQuote, Outcome, Polarity, Side, ValueSignal,
};

/// Default match directory (relative to project root)
const DEFAULT_MATCH_DIR: &str = "data/matches";

#[derive(Parser)]
#[command(name = "matchedge")]
#[command(author, version, about = "Checklist-driven match analysis CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Path to match request directory
    #[arg(long, default_value = DEFAULT_MATCH_DIR)]
    match_dir: PathBuf,

    /// Engine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Aggregation policy (overrides the configuration file)
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Kelly multiplier (1.0 = full Kelly, overrides the configuration file)
    #[arg(long)]
    kelly: Option<f64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a match request
    Evaluate {
        /// Request file (JSON). Takes precedence over --match-id
        #[arg(long)]
        input: Option<PathBuf>,

        /// Match id to load from the match directory
        #[arg(short, long)]
        match_id: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Write a plain-text report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Write the JSON report to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List match requests in the match directory
    List,

    /// Show the built-in checklist
    Checklist,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Additive,
    Ratio,
    Confidence,
}

impl From<PolicyArg> for AggregationPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Additive => AggregationPolicy::additive_clamp(),
            PolicyArg::Ratio => AggregationPolicy::ratio_normalize(),
            PolicyArg::Confidence => AggregationPolicy::confidence_score(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    println!("{}", format!("Matchedge CLI v{}", env!("CARGO_PKG_VERSION")).cyan().bold());
    println!();

    let engine = build_engine(&cli)?;

    if cli.interactive {
        run_interactive(&engine)?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Evaluate {
                input,
                match_id,
                json,
                report,
                output,
            } => {
                let request = match (input, match_id) {
                    (Some(path), _) => load_request(&path)
                        .with_context(|| format!("Failed to load request from {:?}", path))?,
                    (None, Some(id)) => load_match(&cli.match_dir, &id)
                        .with_context(|| format!("Failed to load match {}", id))?,
                    (None, None) => anyhow::bail!("Either --input or --match-id is required"),
                };

                let analysis = engine
                    .evaluate(&request)
                    .with_context(|| format!("Failed to evaluate match {}", request.match_id))?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&analysis)?);
                } else {
                    print_report(&analysis);
                }

                if let Some(path) = output {
                    save_report(&path, &analysis)
                        .with_context(|| format!("Failed to write report to {:?}", path))?;
                    println!("{} {:?}", "JSON report written to".green(), path);
                }

                if let Some(path) = report {
                    write_text_report(&path, &analysis)?;
                }
            }
            Commands::List => {
                list_match_requests(&cli.match_dir)?;
            }
            Commands::Checklist => {
                show_checklist();
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

/// Build the engine from the configuration file and CLI overrides
fn build_engine(cli: &Cli) -> Result<DecisionEngine> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => EngineConfig::default(),
    };

    if let Some(policy) = cli.policy {
        config = config.with_policy(policy.into());
    }
    if let Some(kelly) = cli.kelly {
        config = config.with_kelly_multiplier(kelly);
    }
    validate_staking(&config.staking).context("Invalid staking configuration")?;

    Ok(DecisionEngine::new(config))
}

fn print_report(report: &AnalysisReport) {
    println!(
        "{}: {} x {} ({}) / {}",
        "Analysis".green(),
        report.home_team,
        report.away_team,
        report.match_id,
        report.policy.name()
    );
    println!();

    // Probability construction
    println!("{}", "Probability construction:".yellow().bold());
    if report.contributions.is_empty() {
        println!("{}", "(no answers recorded)".dimmed());
    }
    for c in &report.contributions {
        let line = match c.side() {
            Side::Home => format!("+{:.0} {} -> {}", c.weight, c.factor, report.home_team).green(),
            Side::Away => format!("-{:.0} {} -> {}", c.weight, c.factor, report.away_team).red(),
            Side::Draw => format!(" 0 {} -> no advantage", c.factor).normal(),
        };
        println!("  {}", line);
    }
    println!(
        "Advantage balance: {} {:.1} | {} {:.1}",
        report.home_team, report.home_balance, report.away_team, report.away_balance
    );
    println!();

    // Probabilities and odds
    println!("{}", "Probabilities and odds:".yellow().bold());
    println!(
        "{:<10} {:>8} {:>10} {:>10} {:>10} {:>14}",
        "Outcome", "Prob", "Fair", "Market", "Market %", "Risk"
    );
    println!("{}", "-".repeat(67));

    for comparison in &report.market.outcomes {
        let risk_str = format_risk(comparison.risk);
        let risk_color = match comparison.risk {
            Some(r) if r > 0.0 => risk_str.green(),
            Some(_) => risk_str.red(),
            None => risk_str.dimmed(),
        };

        println!(
            "{:<10} {:>7.1}% {:>10} {:>10.2} {:>9.2}% {:>14}",
            outcome_name(report, comparison.outcome),
            report.probabilities.get(comparison.outcome),
            format_odds(comparison.fair_odds),
            comparison.market_odds,
            comparison.normalized,
            risk_color
        );
    }
    println!(
        "{}",
        format!("Market overround: {:.2}%", report.market.overround).dimmed()
    );
    println!();

    // Stakes
    println!("{}", "Expected value and Kelly stake:".yellow().bold());
    println!(
        "{:<10} {:>8} {:>10} {:>12}",
        "Outcome", "EV", "Kelly", "Stake"
    );
    println!("{}", "-".repeat(43));

    for stake in &report.stakes {
        let ev_str = format!("{:.2}", stake.expected_value);
        let ev_color = match stake.signal {
            ValueSignal::Positive => ev_str.green(),
            ValueSignal::Neutral => ev_str.yellow(),
            ValueSignal::Negative => ev_str.red(),
        };
        let stake_str = if stake.stake > 0.0 {
            format!("{:.2}", stake.stake)
        } else {
            "-".to_string()
        };

        println!(
            "{:<10} {:>8} {:>9.1}% {:>12}",
            outcome_name(report, stake.outcome),
            ev_color,
            stake.recommended_fraction * 100.0,
            stake_str
        );
    }
    println!();

    if let Some(home) = report.stake(Outcome::Home) {
        let verdict = match home.signal {
            ValueSignal::Positive => "Positive value bet. It may be worth staking.".green(),
            ValueSignal::Neutral => "Neutral bet. No expected value.".yellow(),
            ValueSignal::Negative => "Negative value bet. Avoid it.".red(),
        };
        println!("{} {}", "→".green(), verdict);
    }

    println!("{}", "Alternative markets:".yellow().bold());
    for (name, risk) in [
        ("Draw No Bet", report.alternatives.draw_no_bet),
        ("Double Chance", report.alternatives.double_chance),
        ("Handicap", report.alternatives.handicap),
    ] {
        println!("  {:<14} {}", name, format_risk(risk));
    }
    println!();
}

fn outcome_name(report: &AnalysisReport, outcome: Outcome) -> String {
    match outcome {
        Outcome::Home => truncate_name(&report.home_team, 10),
        Outcome::Draw => "Draw".to_string(),
        Outcome::Away => truncate_name(&report.away_team, 10),
    }
}

fn write_text_report(path: &Path, report: &AnalysisReport) -> Result<()> {
    let text = render_text(report, &Local::now());
    std::fs::write(path, text).with_context(|| format!("Failed to write report to {:?}", path))?;
    println!("{} {:?}", "Text report written to".green(), path);
    Ok(())
}

fn list_match_requests(match_dir: &Path) -> Result<()> {
    println!("{}: {:?}", "Listing matches in".green(), match_dir);
    println!();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Scanning match directory...");

    let ids = list_matches(match_dir);
    let mut rows = Vec::with_capacity(ids.len());
    for id in &ids {
        match load_match(match_dir, id) {
            Ok(request) => rows.push((
                id.clone(),
                format!("{} x {}", request.home_team, request.away_team),
                format!("{}/{}", request.answers.len(), request.factors.len()),
            )),
            Err(e) => rows.push((id.clone(), format!("{}", e).red().to_string(), "-".to_string())),
        }
    }

    pb.finish_and_clear();

    if rows.is_empty() {
        println!("{}", "No match requests found.".yellow());
        return Ok(());
    }

    println!("{:<20} {:<40} {:>8}", "Match", "Teams", "Answered");
    println!("{}", "-".repeat(70));
    for (id, teams, answered) in &rows {
        println!("{:<20} {:<40} {:>8}", truncate_name(id, 20), teams, answered);
    }
    println!();
    println!("Total: {} matches", rows.len());

    Ok(())
}

fn show_checklist() {
    println!("{}", "Built-in checklist:".yellow().bold());
    println!("{:>3} {:>6} {:<8} {}", "#", "Weight", "Kind", "Question");
    println!("{}", "-".repeat(70));

    for (i, factor) in default_factors().iter().enumerate() {
        let kind = if factor.adverse { "adverse" } else { "edge" };
        println!("{:>3} {:>6.0} {:<8} {}", i + 1, factor.weight, kind, factor.name);
    }
}

fn run_interactive(engine: &DecisionEngine) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!();

    let theme = ColorfulTheme::default();

    let home_team: String = Input::with_theme(&theme)
        .with_prompt("Home team")
        .default("Home".to_string())
        .interact_text()?;
    let away_team: String = Input::with_theme(&theme)
        .with_prompt("Away team")
        .default("Away".to_string())
        .interact_text()?;

    let odds_home: f64 = Input::with_theme(&theme)
        .with_prompt("Market odds - home win")
        .default(1.80)
        .interact_text()?;
    let odds_draw: f64 = Input::with_theme(&theme)
        .with_prompt("Market odds - draw")
        .default(3.20)
        .interact_text()?;
    let odds_away: f64 = Input::with_theme(&theme)
        .with_prompt("Market odds - away win")
        .default(4.00)
        .interact_text()?;
    let quote = MarketQuote::new(odds_home, odds_draw, odds_away)?;

    let bankroll: f64 = Input::with_theme(&theme)
        .with_prompt("Bankroll")
        .default(100.0)
        .interact_text()?;

    let match_id = format!("{}-{}", home_team, away_team);
    let mut session = ChecklistSession::new(
        match_id,
        home_team.clone(),
        away_team.clone(),
        default_factors(),
        quote,
        bankroll,
    );

    let (_, total) = session.progress();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} {msg}")?);

    while let Some(factor) = session.next_factor().cloned() {
        let mut options = vec![("Neither", Side::Draw)];
        if factor.polarity != Polarity::Away {
            options.push((home_team.as_str(), Side::Home));
        }
        if factor.polarity != Polarity::Home {
            options.push((away_team.as_str(), Side::Away));
        }
        let labels: Vec<&str> = options.iter().map(|(label, _)| *label).collect();

        let choice = pb.suspend(|| {
            Select::with_theme(&theme)
                .with_prompt(format!("{} - who holds the edge?", factor.name))
                .items(&labels)
                .default(0)
                .interact()
        })?;
        session.answer(&factor.name, options[choice].1)?;

        // Re-run the full pipeline on the answers so far
        let running = session.evaluate(engine)?;
        pb.inc(1);
        pb.set_message(format!(
            "{} {:.1}% / draw {:.1}% / {} {:.1}%",
            home_team,
            running.probabilities.home,
            running.probabilities.draw,
            away_team,
            running.probabilities.away
        ));
    }
    pb.finish_and_clear();
    println!();

    let analysis = session.evaluate(engine)?;
    print_report(&analysis);

    let export = Select::with_theme(&theme)
        .with_prompt("Export a text report?")
        .items(&["No", "Yes"])
        .default(0)
        .interact()?
        == 1;

    if export {
        let path: String = Input::with_theme(&theme)
            .with_prompt("Report file")
            .default(format!("report_{}.txt", analysis.match_id.to_lowercase().replace(' ', "_")))
            .interact_text()?;
        write_text_report(Path::new(&path), &analysis)?;
    }

    Ok(())
}

/// Truncate name to fit display width
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        name.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}
