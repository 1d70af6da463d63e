//! Scenario runner
//!
//! Every scenario gets its own session, runs inside its own tracing span,
//! leaves a `fail_<name>_<timestamp>.png` behind when it fails, and always
//! quits its session.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info_span, warn, Instrument};

use super::scenario::{Scenario, ScenarioOutcome};
use super::session::{SessionFactory, SessionFixture};
use crate::artifacts::ScreenshotRecorder;
use crate::config::Config;
use crate::pages::BasePage;

/// Runs scenarios against sessions from one factory
pub struct ScenarioRunner {
    config: Config,
    factory: Arc<dyn SessionFactory>,
}

impl ScenarioRunner {
    pub fn new(config: Config, factory: Arc<dyn SessionFactory>) -> Self {
        Self { config, factory }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(&self, scenario: Scenario) -> ScenarioOutcome {
        run_scenario(self.factory.as_ref(), &self.config, scenario).await
    }

    /// Run scenarios one after another, in order
    pub async fn run_all(&self, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
        stream::iter(scenarios.iter().copied())
            .then(|scenario| self.run(scenario))
            .collect::<Vec<_>>()
            .await
    }
}

/// Run one scenario on a fresh session
pub async fn run_scenario(
    factory: &dyn SessionFactory,
    config: &Config,
    scenario: Scenario,
) -> ScenarioOutcome {
    let span = info_span!("scenario", name = scenario.name());
    let started = Instant::now();

    let (result, screenshot) = async {
        let fixture = match SessionFixture::open(factory, config).await {
            Ok(fixture) => fixture,
            Err(e) => {
                error!("Failed to open session: {}", e);
                return (Err(e), None);
            }
        };

        let client = fixture.client();
        let base = BasePage::new(client.clone(), config);
        let result = scenario.execute(base, config).await;

        let screenshot = match &result {
            Ok(()) => None,
            Err(e) => {
                error!("Scenario failed: {}", e);
                let recorder = ScreenshotRecorder::new(config.screenshot_dir.clone());
                match recorder
                    .capture(client.as_ref(), &format!("fail_{}", scenario.name()))
                    .await
                {
                    Ok(path) => Some(path),
                    Err(shot) => {
                        warn!("Failed to capture failure screenshot: {}", shot);
                        None
                    }
                }
            }
        };

        if let Err(e) = fixture.close().await {
            warn!("Failed to quit session: {}", e);
        }

        (result, screenshot)
    }
    .instrument(span)
    .await;

    let outcome = ScenarioOutcome {
        name: scenario.name().to_string(),
        passed: result.is_ok(),
        error: result.err().map(|e| e.to_string()),
        screenshot,
        duration: started.elapsed(),
    };
    outcome.log();
    outcome
}
