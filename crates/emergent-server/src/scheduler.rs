//! The cooperative job scheduler (§4.J): owns `(Job, interval)` pairs, each
//! tick spawned as its own cancellable Tokio task. Runs only in stdio mode
//! (§9: "HTTP mode explicitly omits background jobs so multi-tenant
//! boundaries hold") — `emergent-cli` never calls this module when
//! `transport.mode = http`.
//!
//! The only job today is the janitor sweep; the `(Job, interval)` shape is
//! kept general so a second periodic job would slot in the same way.

use crate::janitor;
use emergent_client::BackendClient;
use emergent_config::JanitorConfig;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Spawns the janitor job on its configured interval. Returns `None`
/// without spawning anything when the janitor is disabled. The caller
/// should cancel `cancellation` and await the returned handle on shutdown.
pub fn spawn_janitor(
    client: BackendClient,
    config: JanitorConfig,
    cancellation: CancellationToken,
) -> Option<JoinHandle<()>> {
    if !config.enabled {
        info!("janitor disabled; scheduler will not run it");
        return None;
    }

    let interval = Duration::from_secs(config.interval_hours.max(1) * 3600);
    info!(interval_hours = config.interval_hours, "janitor scheduler starting");

    Some(tokio::spawn(async move {
        // tokio::time::interval's first tick fires immediately (the
        // default MissedTickBehavior::Burst), so the janitor runs once at
        // startup rather than waiting a full interval for its first sweep.
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => run_once(&client, &config).await,
                _ = cancellation.cancelled() => {
                    info!("janitor scheduler stopping");
                    return;
                }
            }
        }
    }))
}

async fn run_once(client: &BackendClient, config: &JanitorConfig) {
    match janitor::run(client, config).await {
        Ok(report) => info!(
            issues_found = report.issues_found,
            proposal_id = ?report.proposal_id,
            improvements_created = report.improvement_ids.len(),
            "scheduled janitor sweep complete"
        ),
        Err(e) => {
            // A scheduled sweep failing must not bring the process down;
            // the next tick tries again.
            error!(error = %e, "scheduled janitor sweep failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emergent_client::ClientFactory;
    use emergent_client::RequestContext;

    #[tokio::test]
    async fn disabled_janitor_spawns_nothing() {
        let factory = ClientFactory::new("http://127.0.0.1:0", Default::default());
        let parent = CancellationToken::new();
        let ctx = RequestContext::new("tok", &parent);
        let client = factory.client_for(&ctx).unwrap();

        let config = JanitorConfig {
            enabled: false,
            ..Default::default()
        };

        let handle = spawn_janitor(client, config, parent.clone());
        assert!(handle.is_none());
    }
}
