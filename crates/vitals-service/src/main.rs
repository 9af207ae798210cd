//! `vitalsd`: the single-process daemon wiring every stage together.
//!
//! `tracing_subscriber` is initialized once at startup; shutdown is
//! `ctrl_c`-driven, wrapped in `tokio::select!`, and propagated to every
//! spawned stage task through a single shared `ShutdownSignal`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info, Instrument};

use vitals_aggregator::AggregatorStage;
use vitals_baseline::InMemoryBaselineStore;
use vitals_bus::memory::InMemoryBus;
use vitals_bus::{MessageBus, ShutdownSignal};
use vitals_config::Settings;
use vitals_pipeline::{NormalizerStage, ScoringStage};
use vitals_query::AppState;
use vitals_scorer::{ScorerClient, ScorerServiceImpl};
use vitals_schemas::registry::NullPatientResolver;

#[cfg(feature = "redis-backend")]
use vitals_aggregator::redis_store::RedisAggregateStore;
#[cfg(not(feature = "redis-backend"))]
use vitals_aggregator::InMemoryAggregateStore;

#[cfg(feature = "kafka")]
use vitals_bus::kafka::KafkaBus;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env();
    let service_span = vitals_telemetry::init(&settings.service_name, "info");

    info!(parent: &service_span, version = env!("CARGO_PKG_VERSION"), "starting vitals-pipeline daemon");

    let bus = build_bus(&settings)?;
    let baseline = InMemoryBaselineStore::new(settings.baseline.window_size, settings.baseline.min_samples);
    let aggregate_store = build_aggregate_store(&settings).await?;
    let shutdown = ShutdownSignal::new();

    let scorer_handle = spawn_in_process_scorer(baseline);
    // Give the loopback scorer a moment to start accepting before the
    // scoring stage's first connect attempt.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let scorer = Arc::new(
        ScorerClient::connect("http://127.0.0.1:50051", settings.scorer.timeout())
            .await
            .context("connect to scorer")?,
    );

    let normalizer =
        NormalizerStage::new(bus.clone(), Arc::new(NullPatientResolver), settings.bus.consumer_group.as_str());
    let scoring =
        ScoringStage::new(bus.clone(), scorer, settings.rules, settings.bus.consumer_group.as_str());
    let aggregator =
        AggregatorStage::new(bus.clone(), aggregate_store.clone(), settings.bus.consumer_group.as_str());

    let query_router = vitals_query::router(AppState::new(aggregate_store));
    let listener = TcpListener::bind(&settings.query.bind_addr)
        .await
        .with_context(|| format!("bind query surface on {}", settings.query.bind_addr))?;
    info!(addr = %settings.query.bind_addr, "query surface listening");

    let normalizer_handle = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(error) = normalizer.run(shutdown).await {
                error!(%error, "normalizer stage exited with an error");
            }
        }
        .instrument(service_span.clone())
    });
    let scoring_handle = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(error) = scoring.run(shutdown).await {
                error!(%error, "scoring stage exited with an error");
            }
        }
        .instrument(service_span.clone())
    });
    let aggregator_handle = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(error) = aggregator.run(shutdown).await {
                error!(%error, "aggregator stage exited with an error");
            }
        }
        .instrument(service_span.clone())
    });
    let query_handle = tokio::spawn(
        async move {
            if let Err(error) = axum::serve(listener, query_router).await {
                error!(%error, "query surface exited with an error");
            }
        }
        .instrument(service_span.clone()),
    );

    tokio::signal::ctrl_c().await.context("install ctrl-c handler")?;
    info!(parent: &service_span, "received shutdown signal");
    shutdown.trigger();
    query_handle.abort();

    let _ = tokio::join!(normalizer_handle, scoring_handle, aggregator_handle);
    scorer_handle.abort();

    info!(parent: &service_span, "vitals-pipeline daemon stopped");
    Ok(())
}

fn build_bus(settings: &Settings) -> Result<Arc<dyn MessageBus>> {
    #[cfg(feature = "kafka")]
    {
        let bus = KafkaBus::connect(&settings.bus.brokers).context("connect to kafka")?;
        return Ok(Arc::new(bus));
    }

    #[cfg(not(feature = "kafka"))]
    {
        let _ = settings;
        Ok(Arc::new(InMemoryBus::new()))
    }
}

async fn build_aggregate_store(
    settings: &Settings,
) -> Result<Arc<dyn vitals_aggregator::AggregateStore>> {
    #[cfg(feature = "redis-backend")]
    {
        let store = RedisAggregateStore::connect(
            &settings.aggregate_store.connection_url(),
            settings.aggregator.rolling_window_15m_seconds,
            settings.aggregator.rolling_window_1h_seconds,
        )
        .await
        .context("connect to redis aggregate store")?;
        return Ok(Arc::new(store));
    }

    #[cfg(not(feature = "redis-backend"))]
    {
        let store = InMemoryAggregateStore::new(
            settings.aggregator.rolling_window_15m_seconds,
            settings.aggregator.rolling_window_1h_seconds,
        );
        store.spawn_ttl_sweeper(std::time::Duration::from_secs(60));
        Ok(store)
    }
}

/// Runs the scorer's gRPC server in-process, loopback-only. The scoring
/// and rules stages both call through [`vitals_scorer::ScorerClient`]
/// rather than holding scoring state directly; wiring it on a fixed
/// loopback port here is the single-binary shape — a multi-process
/// deployment would run it as its own service and point `SCORER_URL` at
/// it instead.
fn spawn_in_process_scorer(baseline: Arc<InMemoryBaselineStore>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let service = ScorerServiceImpl::new(baseline);
        let addr = std::net::SocketAddr::from(([127, 0, 0, 1], 50051));
        if let Err(error) = tonic::transport::Server::builder()
            .add_service(vitals_scorer::proto::scorer_service_server::ScorerServiceServer::new(service))
            .serve(addr)
            .await
        {
            error!(%error, "in-process scorer server exited with an error");
        }
    })
}
