// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! `densrepair`: repair a random density grid and seed a population from it.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueHint};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use density_repair::evolve::Population;
use density_repair::statistics::Counters;
use density_repair::telemetry::init_tracing;
use density_repair::{CellState, Constraints, Densities, DensityGrid, Settings};
use strum::IntoEnumIterator;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Repair a random density grid into a single connected structure"
)]
struct Cli {
    /// Grid width in cells
    #[arg(long, default_value_t = 24)]
    dim_x: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 12)]
    dim_y: usize,

    /// Probability that a random cell starts filled
    #[arg(long, default_value_t = 0.6)]
    fill: f64,

    /// Seed for the random grid and the population
    #[arg(long)]
    seed: Option<u64>,

    /// Number of individuals to seed (0 to skip seeding)
    #[arg(long)]
    population: Option<usize>,

    /// Filled-neighbor threshold for void filling (1-4)
    #[arg(long)]
    threshold: Option<u8>,

    /// JSON settings file
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Keep the bottom row filled as a support
    #[arg(long)]
    support_row: bool,

    /// Print the repaired grid view as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut settings = match &cli.config {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings::default(),
    };
    if let Some(threshold) = cli.threshold {
        settings.repair.void_neighbor_threshold = threshold;
    }
    if let Some(seed) = cli.seed {
        settings.population.seed = seed;
    }
    if let Some(size) = cli.population {
        settings.population.size = size;
    }
    settings.repair.validate()?;
    if !(0.0..=1.0).contains(&cli.fill) {
        return Err(format!("--fill must be in [0, 1], got {}", cli.fill).into());
    }

    let grid = random_grid(&cli, settings.population.seed)?;
    let mut constraints = Constraints::builder();
    if cli.support_row {
        let bottom = cli.dim_y - 1;
        let support: Vec<usize> = (0..cli.dim_x)
            .filter_map(|x| grid.coord(x, bottom))
            .collect();
        constraints = constraints.keep(support);
    }
    let constraints = Arc::new(constraints.build(&grid)?);
    let mut densities = Densities::new(grid, constraints)?;

    println!("Initial grid ({} filled):", densities.count());
    print!("{}", densities.visualize_keep_cells());

    match densities.repair_with(&settings.repair) {
        Ok(report) => {
            println!("\nRepaired grid:");
            print!("{}", densities.visualize_keep_cells());
            println!("\n{}", serde_json::to_string_pretty(&report)?);
        }
        Err(err) if err.is_recoverable() => println!("\nBase grid rejected: {err}"),
        Err(err) => return Err(err.into()),
    }
    for counter in Counters::iter() {
        println!("{counter:>16}: {}", densities.statistics().get(counter));
    }

    if settings.population.size > 0 {
        let population = Population::seed(&densities, &settings.population, &settings.repair)?;
        println!(
            "\nPopulation: {} of {} valid",
            population.valid_count(),
            population.len()
        );
        for individual in population.individuals() {
            println!(
                "  #{:<3} {:<7} filled {}",
                individual.id(),
                if individual.is_valid() { "valid" } else { "invalid" },
                individual.densities().count()
            );
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&densities.view())?);
    }
    Ok(())
}

fn random_grid(cli: &Cli, seed: u64) -> Result<DensityGrid> {
    let mut grid = DensityGrid::new(cli.dim_x, cli.dim_y)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for coord in 0..grid.cell_count() {
        if rng.gen_bool(cli.fill) {
            grid.set(coord, CellState::Filled)?;
        }
    }
    info!(
        dim_x = cli.dim_x,
        dim_y = cli.dim_y,
        filled = grid.count(),
        seed,
        "generated random grid"
    );
    Ok(grid)
}
