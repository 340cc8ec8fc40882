//! Demo driver: runs stable and greedy matching over the configured
//! preference-file pairs and prints the narration and final pairings.

use std::process::ExitCode;

use stable_match::config::{DemoRun, Settings};
use stable_match::core::find_blocking_pairs;
use stable_match::models::{AgentPreferences, MatchMode};
use stable_match::services::{load_preferences, render_report, render_stability, Narrator, RoleLabels};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    stable_match::logging::init(&settings.logging);

    if settings.demo.runs.is_empty() {
        warn!("No demo runs configured; add [[demo.runs]] entries to config/default.toml");
        return ExitCode::SUCCESS;
    }

    let mut failed = false;
    for run in &settings.demo.runs {
        let (proposers, proposees) = match load_pair(run) {
            Some(pair) => pair,
            None => {
                failed = true;
                continue;
            }
        };

        for mode in [MatchMode::Stable, MatchMode::Greedy] {
            if !run_once(&settings, run, mode, &proposers, &proposees) {
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn load_pair(run: &DemoRun) -> Option<(Vec<AgentPreferences>, Vec<AgentPreferences>)> {
    let proposers = load_preferences(&run.proposers)
        .map_err(|e| error!("Skipping run: {}", e))
        .ok()?;
    let proposees = load_preferences(&run.proposees)
        .map_err(|e| error!("Skipping run: {}", e))
        .ok()?;
    Some((proposers, proposees))
}

fn run_once(
    settings: &Settings,
    run: &DemoRun,
    mode: MatchMode,
    proposers: &[AgentPreferences],
    proposees: &[AgentPreferences],
) -> bool {
    let labels: &RoleLabels = &settings.roles;
    let heading = match mode {
        MatchMode::Stable => "propose",
        MatchMode::Greedy => "greedy propose",
    };
    println!(
        "\n\n{}s {} working with files {} and {}",
        labels.proposer,
        heading,
        run.proposers.display(),
        run.proposees.display()
    );

    let matcher = settings.matching.matcher(mode);
    let result = if run.verbose {
        let mut narrator = Narrator::new(labels);
        matcher.run_traced(proposers.to_vec(), proposees.to_vec(), |engine, event| {
            if let Some(text) = narrator.narrate(event, || engine.report()) {
                println!("{}", text);
            }
        })
    } else {
        matcher.run(proposers.to_vec(), proposees.to_vec())
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            error!("{} matching failed: {}", mode, e);
            return false;
        }
    };

    println!("Final Pairings are as follows:");
    print!("{}", render_report(&report, labels));

    let blocking = find_blocking_pairs(proposers, proposees, &report);
    println!("{}", render_stability(&blocking, labels));

    info!(
        "{} run over {} finished: {} matches, {} proposals",
        mode,
        run.proposers.display(),
        report.utility.match_count,
        report.proposals
    );
    true
}
