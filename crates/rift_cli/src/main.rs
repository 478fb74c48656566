//! Rift CLI
//!
//! Headless driver for the match engine: autopilot runs, balance batches and
//! a line-based JSON command loop for external front ends.

mod autopilot;
mod demo;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use rift_core::config::ResolutionParams;
use rift_core::simulation::{home_win_probability, Matchup};
use rift_core::{
    ChoiceCatalog, CommandSurface, MatchResult, MatchSetup, MatchSimulator, Phase, Roster,
    SeriesFormat, SimulationConfig, TeamId, TeamLookup,
};

use autopilot::{net_effect, Autopilot, Strategy};

#[derive(Parser)]
#[command(name = "rift")]
#[command(about = "Decision-driven esports match simulation", long_about = None)]
#[command(version = rift_core::VERSION)]
struct Cli {
    /// Simulation config JSON (overrides RIFT_SIM_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Roster JSON file; the built-in demo teams are used when omitted
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match with an autopilot making every decision
    Play {
        #[arg(long, default_value = "azure")]
        home: String,

        #[arg(long, default_value = "crimson")]
        away: String,

        /// Team the autopilot manages (defaults to home)
        #[arg(long)]
        managed: Option<String>,

        /// Series length (odd)
        #[arg(long, default_value_t = 1)]
        best_of: u8,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, value_enum, default_value_t = Strategy::Greedy)]
        strategy: Strategy,

        /// Print the match result as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Run many seeded matches and report the series win rate
    Batch {
        #[arg(long, default_value = "azure")]
        home: String,

        #[arg(long, default_value = "crimson")]
        away: String,

        #[arg(long, default_value_t = 1)]
        best_of: u8,

        #[arg(long, default_value_t = 100)]
        matches: u32,

        /// First seed; match n uses seed + n
        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[arg(long, value_enum, default_value_t = Strategy::Greedy)]
        strategy: Strategy,
    },

    /// List the choice catalog per phase
    Choices,

    /// Home win probability for given strengths and adjustments
    Odds {
        #[arg(long)]
        home_strength: f64,

        #[arg(long)]
        away_strength: f64,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        home_adj: f64,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        away_adj: f64,
    },

    /// Read JSON commands from stdin, one per line, and print each response
    Serve,
}

#[derive(Debug, Serialize)]
struct BatchSummary {
    matches: u32,
    home: TeamId,
    away: TeamId,
    home_series_wins: u32,
    away_series_wins: u32,
    home_win_rate: f64,
    average_set_minutes: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rift_core=info,warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Play { home, away, managed, best_of, seed, strategy, json } => {
            let mut simulator = MatchSimulator::new(load_roster(cli.roster.as_deref())?, config)?;
            let mut setup = MatchSetup::new("cli-match", TeamId::new(home), TeamId::new(away))
                .with_format(series_format(best_of)?);
            if let Some(managed) = managed {
                setup = setup.managed_by(TeamId::new(managed));
            }
            let seed = seed.unwrap_or(simulator.config().default_seed);
            setup = setup.with_seed(seed);

            let result = Autopilot::new(strategy, seed)
                .play_match(&mut simulator, setup)
                .context("match aborted")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(simulator.lookup(), &result);
            }
        }

        Commands::Batch { home, away, best_of, matches, seed, strategy } => {
            let mut simulator = MatchSimulator::new(load_roster(cli.roster.as_deref())?, config)?;
            let (home, away) = (TeamId::new(home), TeamId::new(away));
            let format = series_format(best_of)?;

            let mut home_series_wins = 0;
            let mut set_minutes = 0u64;
            let mut sets = 0u64;
            for n in 0..matches {
                let match_seed = seed.wrapping_add(n as u64);
                let setup = MatchSetup::new(format!("batch-{n}"), home.clone(), away.clone())
                    .with_format(format)
                    .with_seed(match_seed);
                let result = Autopilot::new(strategy, match_seed).play_match(&mut simulator, setup)?;
                if result.winner == home {
                    home_series_wins += 1;
                }
                set_minutes += result.total_duration_minutes() as u64;
                sets += result.sets.len() as u64;
                simulator.abandon();
            }

            let summary = BatchSummary {
                matches,
                home,
                away,
                home_series_wins,
                away_series_wins: matches - home_series_wins,
                home_win_rate: ratio(home_series_wins as f64, matches as f64),
                average_set_minutes: ratio(set_minutes as f64, sets as f64),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Choices => print_catalog(ChoiceCatalog::standard()),

        Commands::Odds { home_strength, away_strength, home_adj, away_adj } => {
            let matchup = Matchup {
                base_home: home_strength,
                adj_home: home_adj,
                base_away: away_strength,
                adj_away: away_adj,
            };
            print_odds(&matchup, &config.resolution);
        }

        Commands::Serve => {
            let simulator = MatchSimulator::new(load_roster(cli.roster.as_deref())?, config)?;
            serve(CommandSurface::new(simulator), io::stdin().lock(), io::stdout().lock())?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(path) => {
            let path = path.to_string_lossy();
            SimulationConfig::load(&path).with_context(|| format!("loading config {path}"))
        }
        None => Ok(SimulationConfig::from_env_or_default()?),
    }
}

fn load_roster(path: Option<&Path>) -> Result<Roster> {
    match path {
        Some(path) => {
            Roster::load(path).with_context(|| format!("loading roster {}", path.display()))
        }
        None => Ok(demo::demo_roster()),
    }
}

fn series_format(best_of: u8) -> Result<SeriesFormat> {
    Ok(SeriesFormat::best_of(best_of)?)
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Pump commands from `input` through the surface, one response line each.
fn serve<L, R, W>(mut surface: CommandSurface<L>, input: R, mut output: W) -> Result<()>
where
    L: TeamLookup,
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(output, "{}", surface.send_command(&line))?;
        output.flush()?;
    }
    Ok(())
}

fn team_label(lookup: &impl TeamLookup, id: &TeamId) -> String {
    lookup
        .team_by_id(id)
        .map(|t| t.display_name().to_string())
        .unwrap_or_else(|| id.to_string())
}

fn print_result(lookup: &impl TeamLookup, result: &MatchResult) {
    let home = team_label(lookup, &result.home);
    let away = team_label(lookup, &result.away);

    println!("🏆 {} {} - {} {}", home, result.score.home_wins, result.score.away_wins, away);
    for set in &result.sets {
        println!(
            "   Game {}: {:<6} {:>2} min  p(home)={:.2}  adj {:+.1}/{:+.1}{}",
            set.set_number,
            team_label(lookup, &set.winner),
            set.duration_minutes,
            set.home_win_probability,
            set.home_adjustment,
            set.away_adjustment,
            set.player_of_the_game
                .as_deref()
                .map(|p| format!("  POG: {p}"))
                .unwrap_or_default(),
        );
    }
    println!("   Winner: {}  ({} min total)", team_label(lookup, &result.winner), result.total_duration_minutes());
}

fn print_catalog(catalog: &ChoiceCatalog) {
    for phase in Phase::ALL {
        let choices = catalog.choices_for(phase);
        if choices.is_empty() {
            continue;
        }
        println!("[{}] {}", phase.icon(), phase.label());
        for choice in choices {
            println!("   {:<22} {:<24} net {:+.1}", choice.id, choice.label, net_effect(choice));
        }
    }
}

fn print_odds(matchup: &Matchup, params: &ResolutionParams) {
    let p = home_win_probability(matchup, params);
    println!("   Strength diff: {:+.2}", matchup.strength_diff());
    println!("   Home win:      {:.1}%", p * 100.0);
    println!("   Away win:      {:.1}%", (1.0 - p) * 100.0);
}
