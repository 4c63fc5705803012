use reqwest::Client;
use serde_json::Value;
use tokio_postgres::NoTls;
use tracing::{debug, error, info};

use crate::{config::Config, error::DispatchError};

/// Backing store for device tokens, selected by the scheme of the store URL.
pub enum RecipientStore {
    Rest(RestTokenStore),
    Postgres(PostgresTokenStore),
}

pub struct RestTokenStore {
    http_client: Client,
    base_url: String,
    service_key: String,
    table: String,
    column: String,
}

pub struct PostgresTokenStore {
    database_url: String,
    table: String,
    column: String,
}

impl RecipientStore {
    pub fn from_config(config: &Config, http_client: Client) -> Result<Self, DispatchError> {
        validate_identifier(&config.recipient_table)?;
        validate_identifier(&config.recipient_column)?;

        let url = config.supabase_url.trim();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(RecipientStore::Postgres(PostgresTokenStore {
                database_url: url.to_string(),
                table: config.recipient_table.clone(),
                column: config.recipient_column.clone(),
            }))
        } else {
            Ok(RecipientStore::Rest(RestTokenStore {
                http_client,
                base_url: url.trim_end_matches('/').to_string(),
                service_key: config.supabase_service_role_key.clone(),
                table: config.recipient_table.clone(),
                column: config.recipient_column.clone(),
            }))
        }
    }

    /// Non-empty tokens in store order. Duplicates are kept.
    pub async fn fetch_tokens(&self) -> Result<Vec<String>, DispatchError> {
        let raw = match self {
            RecipientStore::Rest(store) => store.fetch_raw().await?,
            RecipientStore::Postgres(store) => store.fetch_raw().await?,
        };

        let tokens = filter_tokens(raw);
        info!(recipients = tokens.len(), "Recipient tokens loaded");

        Ok(tokens)
    }

    pub async fn health_check(&self) -> Result<(), DispatchError> {
        match self {
            RecipientStore::Rest(store) => store.health_check().await,
            RecipientStore::Postgres(store) => store.health_check().await,
        }
    }
}

impl RestTokenStore {
    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    async fn fetch_raw(&self) -> Result<Vec<Option<String>>, DispatchError> {
        debug!(table = %self.table, "Querying recipient tokens over REST");

        let response = self
            .http_client
            .get(self.table_url())
            .query(&[("select", self.column.as_str()), (self.column.as_str(), "not.is.null")])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| DispatchError::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Recipient store query failed");
            return Err(DispatchError::SourceUnavailable(format!(
                "store returned status {}: {}",
                status, body
            )));
        }

        let rows: Vec<Value> = response.json().await.map_err(|e| {
            DispatchError::SourceUnavailable(format!("Unreadable store response: {}", e))
        })?;

        Ok(rows
            .iter()
            .map(|row| row.get(self.column.as_str()).and_then(Value::as_str).map(str::to_string))
            .collect())
    }

    async fn health_check(&self) -> Result<(), DispatchError> {
        let response = self
            .http_client
            .get(self.table_url())
            .query(&[("select", self.column.as_str()), ("limit", "1")])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| DispatchError::SourceUnavailable(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(DispatchError::SourceUnavailable(format!(
                "store returned status {}",
                response.status()
            )))
        }
    }
}

impl PostgresTokenStore {
    async fn connect(&self) -> Result<tokio_postgres::Client, DispatchError> {
        let (client, connection) = tokio_postgres::connect(&self.database_url, NoTls)
            .await
            .map_err(|e| {
                DispatchError::SourceUnavailable(format!("Failed to connect to database: {}", e))
            })?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection closed with error");
            }
        });

        Ok(client)
    }

    async fn fetch_raw(&self) -> Result<Vec<Option<String>>, DispatchError> {
        let client = self.connect().await?;

        let query = format!(
            "SELECT {column} FROM {table} WHERE {column} IS NOT NULL",
            column = self.column,
            table = self.table
        );

        debug!(table = %self.table, "Querying recipient tokens from PostgreSQL");

        let rows = client
            .query(query.as_str(), &[])
            .await
            .map_err(|e| DispatchError::SourceUnavailable(format!("Query failed: {}", e)))?;

        rows.iter()
            .map(|row| {
                row.try_get::<_, Option<String>>(0)
                    .map_err(|e| DispatchError::SourceUnavailable(format!("Bad token row: {}", e)))
            })
            .collect()
    }

    async fn health_check(&self) -> Result<(), DispatchError> {
        let client = self.connect().await?;

        client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| DispatchError::SourceUnavailable(format!("Health query failed: {}", e)))?;

        Ok(())
    }
}

/// Drops absent and empty tokens, keeping order and duplicates.
pub fn filter_tokens(raw: Vec<Option<String>>) -> Vec<String> {
    raw.into_iter()
        .flatten()
        .filter(|token| !token.is_empty())
        .collect()
}

fn validate_identifier(name: &str) -> Result<(), DispatchError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(DispatchError::Configuration(format!(
            "Invalid recipient store identifier '{}'",
            name
        )))
    }
}
