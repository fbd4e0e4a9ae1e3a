//! Lendfund consolidation trigger.
//!
//! Ticks on a fixed interval and runs the consolidation cycle on the 8th and
//! 23rd of each month in the configured time zone.
//!
//! Usage:
//!   consolidator        - Run until interrupted
//!   consolidator once   - Run a single cycle for the current instant and exit

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lendfund_core::consolidation::{ConsolidationScheduler, CycleOutcome, PeriodConsolidationManager};
use lendfund_core::period::PeriodBoundaryResolver;
use lendfund_core::{Clock, SystemClock};
use lendfund_db::{SeaOrmLendingStore, connect_with};
use lendfund_shared::AppConfig;

/// Log filter used when `RUST_LOG` is unset; covers the engine crates and this binary.
const DEFAULT_LOG_FILTER: &str = "lendfund=debug,consolidator=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    let resolver = PeriodBoundaryResolver::from_name(&config.scheduler.timezone)?;
    info!(timezone = %resolver.timezone(), "Cut days evaluated in configured time zone");

    let store = Arc::new(SeaOrmLendingStore::new(db));
    let manager = PeriodConsolidationManager::new(store, SystemClock, resolver);

    if std::env::args().nth(1).as_deref() == Some("once") {
        let outcome = manager.run_cycle(SystemClock.now()).await?;
        report(outcome.as_ref());
        return Ok(());
    }

    let mut scheduler = ConsolidationScheduler::new(manager);
    let mut interval =
        tokio::time::interval(Duration::from_secs(config.scheduler.tick_interval_secs.max(1)));
    info!(
        every_secs = config.scheduler.tick_interval_secs,
        "Consolidation scheduler started"
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match scheduler.tick().await {
                    Ok(outcome) => report(outcome.as_ref()),
                    Err(err) => error!(error = %err, code = err.error_code(), "Consolidation cycle failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

fn report(outcome: Option<&CycleOutcome>) {
    let Some(outcome) = outcome else {
        return;
    };
    info!(
        period_id = %outcome.period.id,
        created = outcome.created,
        carried_forward = %outcome.carried_forward,
        registered = outcome.expenses.registered.len(),
        already_recorded = outcome.expenses.already_recorded.len(),
        failed = outcome.expenses.failed.len(),
        "Consolidation cycle finished"
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tracing::{Event, Subscriber};
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::DEFAULT_LOG_FILTER;

    #[derive(Clone, Default)]
    struct EventCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for EventCounter {
        fn on_event(&self, _event: &Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_default_filter_keeps_binary_events() {
        let counter = EventCounter::default();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new(DEFAULT_LOG_FILTER))
            .with(counter.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Consolidation scheduler started");
            tracing::debug!(target: "lendfund_core::consolidation", "cycle skipped");
            tracing::trace!("tick");
            tracing::info!(target: "sqlx::query", "statement");
        });

        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }
}
