use {
    crate::{
        config::RunOptions,
        server::{
            EXIT_CHECK_INTERVAL,
            SHOULD_EXIT,
        },
    },
    anyhow::Result,
    axum::{
        routing::get,
        Router,
    },
    axum_prometheus::{
        metrics,
        metrics_exporter_prometheus::{
            Matcher,
            PrometheusBuilder,
            PrometheusHandle,
        },
        PrometheusMetricLayerBuilder,
    },
    std::{
        fmt::Debug,
        sync::atomic::Ordering,
        time::Instant,
    },
    tracing::{
        field::{
            Field,
            Visit,
        },
        span::Record,
        Id,
        Metadata,
    },
    tracing_subscriber::{
        layer::Context,
        Layer,
    },
};

pub const SWEEP_DURATION_METRIC: &str = "expiration_sweep_latency_seconds";
pub const SWEEP_DURATION_BUCKETS: &[f64; 12] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];
pub const AUCTIONS_COMPLETED_TOTAL: &str = "auctions_completed_total";
pub const AUCTION_COMPLETION_FAILURES_TOTAL: &str = "auction_completion_failures_total";

const DB_QUERY_DURATION_BUCKETS: &[f64; 10] =
    &[0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0];

/// Timing data attached to spans with a `metrics` target.
#[derive(Debug, Clone)]
pub struct MetricsLayerData {
    category:   String,
    started_at: Instant,
    result:     String,
    name:       String,
}

/// Turns `metrics` spans into a `<category>_duration_seconds` histogram and a
/// `<category>_total` counter labelled by span name and result.
pub struct MetricsLayer;

impl Visit for MetricsLayerData {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "result" {
            self.result = format!("{:?}", value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "category" => self.category = value.to_string(),
            "result" => self.result = value.to_string(),
            "name" => self.name = value.to_string(),
            _ => {}
        }
    }
}

impl Default for MetricsLayerData {
    fn default() -> MetricsLayerData {
        MetricsLayerData {
            category:   "unknown".to_string(),
            started_at: Instant::now(),
            result:     "unknown".to_string(),
            name:       "unknown".to_string(),
        }
    }
}

impl MetricsLayerData {
    fn new(name: String) -> MetricsLayerData {
        MetricsLayerData {
            name,
            ..MetricsLayerData::default()
        }
    }
}

pub fn is_metrics(metadata: &Metadata) -> bool {
    metadata.target().starts_with("metrics")
        && metadata
            .fields()
            .iter()
            .any(|f| f.name() == "tracing_enabled")
}

impl<S> Layer<S> for MetricsLayer
where
    S: tracing::Subscriber,
    S: for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &tracing::span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if !is_metrics(attrs.metadata()) {
            return;
        }
        match ctx.span(id) {
            Some(span) => {
                let mut data = MetricsLayerData::new(span.metadata().name().to_string());
                attrs.record(&mut data);
                span.extensions_mut().replace(data);
            }
            None => tracing::error!("span not found: {:?}", id),
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        match ctx.span(id) {
            Some(span) => {
                if let Some(data) = span.extensions_mut().get_mut::<MetricsLayerData>() {
                    values.record(data);
                }
            }
            None => tracing::error!("span not found: {:?}", id),
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        match ctx.span(&id) {
            Some(span) => {
                if let Some(data) = span.extensions().get::<MetricsLayerData>() {
                    let latency = data.started_at.elapsed().as_secs_f64();
                    let labels = [("name", data.name.clone()), ("result", data.result.clone())];
                    metrics::histogram!(format!("{}_duration_seconds", data.category), &labels)
                        .record(latency);
                    metrics::counter!(format!("{}_total", data.category), &labels).increment(1);
                }
            }
            None => tracing::error!("span not found: {:?}", id),
        }
    }
}

/// Installs the global Prometheus recorder.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle> {
    Ok(PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(SWEEP_DURATION_METRIC.to_string()),
            SWEEP_DURATION_BUCKETS,
        )?
        .set_buckets_for_metric(
            Matcher::Suffix("_duration_seconds".to_string()),
            DB_QUERY_DURATION_BUCKETS,
        )?
        .install_recorder()?)
}

pub async fn start_metrics(run_options: RunOptions, metrics_recorder: PrometheusHandle) -> Result<()> {
    tracing::info!("Starting Metrics Server...");

    let (_, metric_handle) = PrometheusMetricLayerBuilder::new()
        .with_metrics_from_fn(|| metrics_recorder)
        .build_pair();
    let app = Router::new();
    let app = app.route("/metrics", get(|| async move { metric_handle.render() }));

    let listener = tokio::net::TcpListener::bind(&run_options.server.metrics_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            while !SHOULD_EXIT.load(Ordering::Acquire) {
                tokio::time::sleep(EXIT_CHECK_INTERVAL).await;
            }
            tracing::info!("Shutting down metrics server...");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        tracing_subscriber::layer::SubscriberExt,
    };

    #[test]
    fn test_layer_records_db_query_metrics() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let subscriber = tracing_subscriber::registry().with(MetricsLayer);

        metrics::with_local_recorder(&recorder, || {
            tracing::subscriber::with_default(subscriber, || {
                let span = tracing::info_span!(
                    target: "metrics",
                    "db_get_auction",
                    category = "db_queries",
                    result = "success",
                    name = "get_auction",
                    tracing_enabled = tracing::field::Empty,
                );
                span.record("result", "error");
                drop(span);
            });
        });

        let rendered = handle.render();
        let line = rendered
            .lines()
            .find(|line| line.starts_with("db_queries_total{"))
            .unwrap();
        assert!(line.contains(r#"name="get_auction""#));
        assert!(line.contains(r#"result="error""#));
        assert!(line.ends_with(" 1"));
    }

    #[test]
    fn test_spans_without_metrics_target_are_ignored() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let subscriber = tracing_subscriber::registry().with(MetricsLayer);

        metrics::with_local_recorder(&recorder, || {
            tracing::subscriber::with_default(subscriber, || {
                let span = tracing::info_span!("plain", category = "db_queries");
                drop(span);
            });
        });

        assert!(!handle.render().contains("db_queries_total"));
    }
}
