//! Server settings loaded via OrthoConfig, and the server configuration
//! object derived from them.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use salon_booking::domain::SalonId;
use salon_booking::outbound::classifier::{ClassifierHttpSettings, DEFAULT_CLASSIFIER_MODEL};
use salon_booking::outbound::persistence::DbPool;
use salon_booking::outbound::whatsapp::{DEFAULT_GRAPH_API_BASE, WhatsAppSettings};

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TIMEZONE: &str = "UTC";
const DEFAULT_CLASSIFIER_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Invalid values in [`ServerSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("bind address {value:?} is not a socket address")]
    BindAddr { value: String },
    #[error("salon id {value:?} is not a UUID")]
    SalonId { value: String },
    #[error("timezone {value:?} is not an IANA timezone name")]
    Timezone { value: String },
    #[error("{field} {value:?} is not a valid URL")]
    Url { field: &'static str, value: String },
}

/// Runtime settings, from CLI flags, `SALON_*` environment variables or a
/// configuration file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SALON")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the in-memory store is used.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Salon served by the messaging channel.
    pub salon_id: Option<String>,
    /// IANA timezone of the salon's wall clock.
    pub timezone: Option<String>,
    /// Chat completions endpoint of the intent classifier.
    pub classifier_endpoint: Option<String>,
    /// API key for the classifier. Without it a fixture classifier is used.
    pub classifier_api_key: Option<String>,
    pub classifier_model: Option<String>,
    /// WhatsApp Cloud API base URL.
    pub whatsapp_api_base: Option<String>,
    pub whatsapp_access_token: Option<String>,
    pub whatsapp_phone_number_id: Option<String>,
    /// Request timeout for outbound HTTP adapters, in seconds.
    #[ortho_config(default = 10)]
    pub http_timeout_secs: u64,
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|_| SettingsError::Url {
        field,
        value: value.to_owned(),
    })
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = non_blank(self.bind_addr.as_ref()).unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_ref())
    }

    pub fn db_max_connections(&self) -> u32 {
        if self.db_max_connections > 0 {
            self.db_max_connections
        } else {
            DEFAULT_DB_MAX_CONNECTIONS
        }
    }

    /// Configured salon, or the nil UUID for single-salon development setups.
    pub fn salon_id(&self) -> Result<SalonId, SettingsError> {
        match non_blank(self.salon_id.as_ref()) {
            Some(raw) => Uuid::parse_str(raw)
                .map(SalonId::from_uuid)
                .map_err(|_| SettingsError::SalonId {
                    value: raw.to_owned(),
                }),
            None => Ok(SalonId::from_uuid(Uuid::nil())),
        }
    }

    pub fn timezone(&self) -> Result<Tz, SettingsError> {
        let raw = non_blank(self.timezone.as_ref()).unwrap_or(DEFAULT_TIMEZONE);
        Tz::from_str(raw).map_err(|_| SettingsError::Timezone {
            value: raw.to_owned(),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        let secs = if self.http_timeout_secs > 0 {
            self.http_timeout_secs
        } else {
            DEFAULT_HTTP_TIMEOUT_SECS
        };
        Duration::from_secs(secs)
    }

    /// Classifier settings, present once an API key is configured.
    pub fn classifier(&self) -> Result<Option<ClassifierHttpSettings>, SettingsError> {
        let Some(api_key) = non_blank(self.classifier_api_key.as_ref()) else {
            return Ok(None);
        };
        let endpoint = non_blank(self.classifier_endpoint.as_ref())
            .unwrap_or(DEFAULT_CLASSIFIER_ENDPOINT);
        Ok(Some(ClassifierHttpSettings {
            endpoint: parse_url("classifier endpoint", endpoint)?,
            api_key: api_key.to_owned(),
            model: non_blank(self.classifier_model.as_ref())
                .unwrap_or(DEFAULT_CLASSIFIER_MODEL)
                .to_owned(),
            timeout: self.http_timeout(),
        }))
    }

    /// WhatsApp settings, present once a token and phone number id are set.
    pub fn whatsapp(&self) -> Result<Option<WhatsAppSettings>, SettingsError> {
        let (Some(token), Some(phone_number_id)) = (
            non_blank(self.whatsapp_access_token.as_ref()),
            non_blank(self.whatsapp_phone_number_id.as_ref()),
        ) else {
            return Ok(None);
        };
        let base = non_blank(self.whatsapp_api_base.as_ref()).unwrap_or(DEFAULT_GRAPH_API_BASE);
        Ok(Some(WhatsAppSettings {
            api_base: parse_url("WhatsApp API base", base)?,
            access_token: token.to_owned(),
            phone_number_id: phone_number_id.to_owned(),
            timeout: self.http_timeout(),
        }))
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) salon_id: SalonId,
    pub(crate) timezone: Tz,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) classifier: Option<ClassifierHttpSettings>,
    pub(crate) whatsapp: Option<WhatsAppSettings>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Validate settings into a server configuration without a database pool.
    pub fn from_settings(settings: &ServerSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            salon_id: settings.salon_id()?,
            timezone: settings.timezone()?,
            db_pool: None,
            classifier: settings.classifier()?,
            whatsapp: settings.whatsapp()?,
            #[cfg(feature = "metrics")]
            prometheus: None,
        })
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses the Diesel repositories instead of the
    /// in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
