//! Builders to construct a control tower from configuration.

use crate::config::TowerConfig;
use crate::core::{ControlTower, EventSink, Spawn, TowerError, TracingEventSink};

/// Fluent construction of a [`ControlTower`].
///
/// Events go to a [`TracingEventSink`] unless another sink is supplied.
pub struct TowerBuilder {
    config: TowerConfig,
    events: Option<Box<dyn EventSink>>,
}

impl TowerBuilder {
    /// Start from `config`.
    #[must_use]
    pub fn new(config: TowerConfig) -> Self {
        Self { config, events: None }
    }

    /// Route events to `sink`.
    #[must_use]
    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.events = Some(Box::new(sink));
        self
    }

    /// Validate the configuration and start the tower on `spawner`.
    ///
    /// # Errors
    ///
    /// See [`ControlTower::start`].
    pub fn build<S>(self, spawner: S) -> Result<ControlTower, TowerError>
    where
        S: Spawn + Send + 'static,
    {
        let events = self.events.unwrap_or_else(|| Box::new(TracingEventSink));
        ControlTower::start(self.config, spawner, events)
    }
}

/// Parse a JSON tower configuration and start a tower with the tracing sink.
///
/// # Errors
///
/// Returns `TowerError::InvalidConfig` when the JSON does not parse or
/// validate, otherwise see [`ControlTower::start`].
pub fn build_tower_from_json<S>(input: &str, spawner: S) -> Result<ControlTower, TowerError>
where
    S: Spawn + Send + 'static,
{
    let config = TowerConfig::from_json_str(input)?;
    TowerBuilder::new(config).build(spawner)
}
