//! End-to-end simulation driver.
//!
//! Builds a population of arrivals, admits each one from its own task so
//! admissions race the dispatch loop the way independent aircraft would,
//! waits for every landing to finish, and summarizes the samples.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::config::{SimulationConfig, TowerConfig};
use crate::core::{Aircraft, AircraftId, Category, ControlTower, EventSink, Spawn, TowerError};

/// Largest passenger count drawn by [`Population::random`].
pub const MAX_PASSENGERS: u32 = 150;

/// An aircraft yet to connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Arrival {
    /// Identifier.
    pub id: AircraftId,
    /// Passenger count; determines the category.
    pub passengers: u32,
}

impl Arrival {
    /// Category this arrival will be assigned.
    #[must_use]
    pub const fn category(&self) -> Category {
        Category::from_passengers(self.passengers)
    }
}

/// Set of arrivals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Population {
    arrivals: Vec<Arrival>,
}

impl Population {
    /// Wrap an explicit list of arrivals.
    #[must_use]
    pub const fn from_arrivals(arrivals: Vec<Arrival>) -> Self {
        Self { arrivals }
    }

    /// `count` arrivals with passenger counts uniform in `1..=150`.
    pub fn random<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let arrivals = (0..count as AircraftId)
            .map(|id| Arrival {
                id,
                passengers: rng.random_range(1..=MAX_PASSENGERS),
            })
            .collect();
        Self { arrivals }
    }

    /// Fixed numbers of each category with typical loads, in shuffled order.
    pub fn by_category<R: Rng + ?Sized>(a: usize, b: usize, c: usize, rng: &mut R) -> Self {
        let mut categories: Vec<Category> = std::iter::repeat_n(Category::A, a)
            .chain(std::iter::repeat_n(Category::B, b))
            .chain(std::iter::repeat_n(Category::C, c))
            .collect();
        categories.shuffle(rng);

        let arrivals = categories
            .into_iter()
            .zip(0..)
            .map(|(category, id)| Arrival {
                id,
                passengers: category.typical_passengers(),
            })
            .collect();
        Self { arrivals }
    }

    /// A single arrival of `category`.
    #[must_use]
    pub fn single(category: Category) -> Self {
        Self::from_arrivals(vec![Arrival {
            id: 0,
            passengers: category.typical_passengers(),
        }])
    }

    /// Random population sized and seeded from `config`.
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::random(config.population, &mut StdRng::seed_from_u64(seed))
    }

    /// Arrivals in id order.
    #[must_use]
    pub fn arrivals(&self) -> &[Arrival] {
        &self.arrivals
    }

    /// Number of arrivals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    /// Whether there are no arrivals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    /// Number of arrivals in `category`.
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.arrivals.iter().filter(|a| a.category() == category).count()
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// Aircraft admitted.
    pub aircraft: usize,
    /// Aircraft that finished the runway stage.
    pub landed: usize,
    /// Aircraft that finished the gate stage.
    pub departed: usize,
    /// Mean seconds from connecting to landing.
    pub mean_connect_to_landed_secs: f64,
    /// Mean seconds spent at the gate.
    pub mean_landed_to_departed_secs: f64,
    /// Slowest connect-to-landed time.
    pub max_connect_to_landed_secs: Option<f64>,
    /// Slowest gate time.
    pub max_landed_to_departed_secs: Option<f64>,
    /// Most runways held at once.
    pub peak_runways_in_use: usize,
    /// Most gates held at once.
    pub peak_gates_in_use: usize,
    /// Largest active set observed.
    pub peak_active: usize,
    /// Wall time of the run in seconds.
    pub wall_secs: f64,
}

impl SimulationReport {
    /// Summarize the current state of `tower`.
    #[must_use]
    pub fn from_tower(tower: &ControlTower, run_id: Uuid, aircraft: usize, wall_secs: f64) -> Self {
        let metrics = tower.metrics();
        Self {
            run_id,
            aircraft,
            landed: metrics.connect_to_landed.len(),
            departed: metrics.landed_to_departed.len(),
            mean_connect_to_landed_secs: metrics.connect_to_landed.mean(),
            mean_landed_to_departed_secs: metrics.landed_to_departed.mean(),
            max_connect_to_landed_secs: metrics.connect_to_landed.max(),
            max_landed_to_departed_secs: metrics.landed_to_departed.max(),
            peak_runways_in_use: tower.runway_stats().peak_in_use,
            peak_gates_in_use: tower.gate_stats().peak_in_use,
            peak_active: tower.snapshot().peak_active,
            wall_secs,
        }
    }
}

/// Run `population` through a fresh tower and report once every aircraft departed.
///
/// # Errors
///
/// Returns `TowerError::InvalidConfig` for a degenerate configuration and
/// `TowerError::Runtime` if an arrival task or the final wait fails.
pub async fn run_simulation<S>(
    config: TowerConfig,
    population: Population,
    spawner: S,
    events: Box<dyn EventSink>,
) -> Result<SimulationReport, TowerError>
where
    S: Spawn + Send + 'static,
{
    let run_id = Uuid::new_v4();
    let started = Instant::now();
    let tower = Arc::new(ControlTower::start(config, spawner, events)?);
    tracing::info!(%run_id, aircraft = population.len(), "simulation started");

    let mut arrivals = JoinSet::new();
    for arrival in population.arrivals().iter().copied() {
        let tower = Arc::clone(&tower);
        arrivals.spawn(async move {
            tower.admit(Aircraft::connect(arrival.id, arrival.passengers));
        });
    }
    while let Some(joined) = arrivals.join_next().await {
        joined.map_err(|e| TowerError::Runtime(format!("arrival task failed: {e}")))?;
    }

    tower.wait_until_idle_async().await?;

    let report = SimulationReport::from_tower(
        &tower,
        run_id,
        population.len(),
        started.elapsed().as_secs_f64(),
    );
    tower.shutdown();
    tracing::info!(
        %run_id,
        mean_connect_to_landed_secs = report.mean_connect_to_landed_secs,
        mean_landed_to_departed_secs = report.mean_landed_to_departed_secs,
        "simulation completed"
    );
    Ok(report)
}
