//! Run one tower simulation configured from `CONTROL_TOWER_*` environment variables.

use control_tower::config::SimulationConfig;
use control_tower::core::{AppResult, TracingEventSink};
use control_tower::runtime::{run_simulation, Population, TokioSpawner};
use control_tower::util::init_tracing;

fn main() -> AppResult<()> {
    init_tracing();

    let config = SimulationConfig::from_env()?;
    let population = Population::from_config(&config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get().max(2))
        .enable_all()
        .build()?;

    let report = runtime.block_on(async {
        let spawner = TokioSpawner::current()?;
        run_simulation(config.tower, population, spawner, Box::new(TracingEventSink)).await
    })?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
