use std::{collections::HashMap, time::Instant};

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    clients::recipients::RecipientStore,
    config::ConfigSource,
    models::health::{HealthCheckResponse, HealthStatus, ServiceHealth},
    utils::build_http_client,
};

pub struct HealthChecker {
    config_source: ConfigSource,
}

impl HealthChecker {
    pub fn new(config_source: ConfigSource) -> Self {
        Self { config_source }
    }

    pub async fn check_all(&self) -> HealthCheckResponse {
        let mut checks = HashMap::new();

        let store = match self.config_source.resolve() {
            Ok(config) => {
                checks.insert("configuration".to_string(), ServiceHealth::healthy(0));
                build_http_client(&config)
                    .and_then(|http_client| RecipientStore::from_config(&config, http_client))
            }
            Err(e) => {
                warn!(error = %e, "Configuration check failed");
                checks.insert(
                    "configuration".to_string(),
                    ServiceHealth::unhealthy(e.to_string()),
                );
                Err(e)
            }
        };

        let store_health = match store {
            Ok(store) => self.check_store(&store).await,
            Err(e) => ServiceHealth::unhealthy(format!("Store not configured: {}", e)),
        };
        checks.insert("recipient_store".to_string(), store_health);

        let status = if checks
            .values()
            .any(|health| health.status == HealthStatus::Unhealthy)
        {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Healthy
        };

        HealthCheckResponse {
            status,
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            checks,
        }
    }

    async fn check_store(&self, store: &RecipientStore) -> ServiceHealth {
        let start = Instant::now();

        match store.health_check().await {
            Ok(_) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(response_time_ms = elapsed, "Recipient store health check passed");
                ServiceHealth::healthy(elapsed)
            }
            Err(e) => {
                warn!(error = %e, "Recipient store health check failed");
                ServiceHealth::unhealthy(e.to_string())
            }
        }
    }
}
