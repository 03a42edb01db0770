// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Population seeding and parallel repair for genetic-algorithm optimizers.
//!
//! Every [`Individual`] owns its own [`Densities`]; only the `Arc`'d
//! constraints are shared. Seeding and repair therefore run on the rayon
//! pool with no locking. Selection, crossover and fitness evaluation belong
//! to the caller.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::{PopulationConfig, RepairConfig};
use crate::densities::Densities;
use crate::error::GridError;
use crate::grid::CellState;
use crate::repair::RepairReport;
use crate::statistics::Statistics;

/// One GA candidate.
#[derive(Debug, Clone)]
pub struct Individual {
    id: usize,
    densities: Densities,
    fitness: Option<f64>,
    valid: bool,
}

impl Individual {
    /// A fresh candidate copied from `base`. It is not valid until repaired.
    pub fn new(id: usize, base: &Densities) -> Self {
        Self {
            id,
            densities: base.fork(),
            fitness: None,
            valid: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn densities(&self) -> &Densities {
        &self.densities
    }

    pub fn densities_mut(&mut self) -> &mut Densities {
        &mut self.densities
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// True if the last repair produced a single piece.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Flip each editable cell with probability `flip_rate`.
    ///
    /// Constrained cells are never touched. Edit memory is flushed first and
    /// piece bookkeeping is dropped, since flips are not undoable. Returns the
    /// number of cells flipped.
    pub fn perturb<R: Rng + ?Sized>(&mut self, rng: &mut R, flip_rate: f64) -> usize {
        let densities = &mut self.densities;
        densities.flush_edit_memory();
        let mut flipped = 0;
        for coord in 0..densities.grid.cell_count() {
            if !densities.constraints.is_editable(coord) || !rng.gen_bool(flip_rate) {
                continue;
            }
            let next = if densities.grid.is_filled(coord) {
                CellState::Empty
            } else {
                CellState::Filled
            };
            densities.grid.put(coord, next);
            flipped += 1;
        }
        densities.forget_pieces();
        self.valid = false;
        self.fitness = None;
        flipped
    }

    /// Repair in place and record whether the result is a single piece.
    pub fn repair(&mut self, config: &RepairConfig) -> Result<RepairReport, GridError> {
        self.fitness = None;
        match self.densities.repair_with(config) {
            Ok(report) => {
                self.valid = report.single_piece;
                Ok(report)
            }
            Err(err) => {
                self.valid = false;
                Err(err)
            }
        }
    }

    /// Run only the isolated-material gate; see [`Densities::remove_isolated_material`].
    pub fn remove_isolated_material(&mut self) -> bool {
        self.valid = self.densities.remove_isolated_material();
        self.valid
    }
}

/// A set of independently owned candidates.
#[derive(Debug, Clone, Default)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Seed `config.size` individuals from `base`.
    ///
    /// Individual `i` draws from a ChaCha8 stream seeded with
    /// `config.seed + i`, so seeding is reproducible regardless of thread
    /// scheduling. A candidate whose repair is rejected is perturbed again
    /// from a fresh copy of `base`, up to `config.max_attempts` times; after
    /// that it is kept but marked invalid. Counters from every attempt are
    /// kept.
    pub fn seed(
        base: &Densities,
        config: &PopulationConfig,
        repair: &RepairConfig,
    ) -> Result<Self, GridError> {
        config.validate()?;
        repair.validate()?;

        let individuals = (0..config.size)
            .into_par_iter()
            .map(|id| seed_individual(id, base, config, repair))
            .collect::<Result<Vec<_>, GridError>>()?;

        let population = Self { individuals };
        info!(
            size = population.len(),
            valid = population.valid_count(),
            seed = config.seed,
            "seeded population"
        );
        Ok(population)
    }

    /// Repair every individual in parallel. Returns the number now valid.
    ///
    /// Rejected candidates are marked invalid; any other error is returned.
    pub fn repair_all(&mut self, config: &RepairConfig) -> Result<usize, GridError> {
        config.validate()?;
        self.individuals
            .par_iter_mut()
            .map(|individual| match individual.repair(config) {
                Ok(_) => Ok(()),
                Err(err) if err.is_recoverable() => Ok(()),
                Err(err) => Err(err),
            })
            .collect::<Result<(), GridError>>()?;
        Ok(self.valid_count())
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn individuals_mut(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn valid_count(&self) -> usize {
        self.individuals.iter().filter(|i| i.is_valid()).count()
    }

    /// Repair counters summed over all individuals.
    pub fn statistics(&self) -> Statistics {
        let mut total = Statistics::new();
        for individual in &self.individuals {
            total.merge(individual.densities.statistics());
        }
        total
    }
}

fn seed_individual(
    id: usize,
    base: &Densities,
    config: &PopulationConfig,
    repair: &RepairConfig,
) -> Result<Individual, GridError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(id as u64));
    let mut individual = Individual::new(id, base);
    for attempt in 1..=config.max_attempts {
        if attempt > 1 {
            let earlier = individual.densities.statistics.clone();
            individual = Individual::new(id, base);
            individual.densities.statistics.merge(&earlier);
        }
        individual.perturb(&mut rng, config.flip_rate);
        match individual.repair(repair) {
            Ok(_) if individual.is_valid() => return Ok(individual),
            Ok(_) => {}
            Err(err) if err.is_recoverable() => {}
            Err(err) => return Err(err),
        }
        debug!(id, attempt, "candidate rejected, reseeding");
    }
    Ok(individual)
}
