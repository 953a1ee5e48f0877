//! Client layer for the remote time-series API.
//!
//! The API has a single operation: submit a timestamped point with numeric
//! fields and string tags. The importer records one `Deployments` point per
//! run; the optional background emitter records a demo gauge.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEPLOYMENT_MEASUREMENT: &str = "Deployments";
pub const DEMO_MEASUREMENT: &str = "demoMeasurement";

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics API request failed")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("metrics API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// One timestamped measurement submitted to the metrics API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub measurement: String,
    pub workspace_id: String,

    /// Milliseconds since the Unix epoch.
    pub time: u64,

    pub fields: Vec<Field>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub k: String,
    pub v: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub k: String,
    pub v: String,
}

impl Point {
    /// The point recorded at the end of every successful import run.
    pub fn deployment(workspace_id: &str, application_id: &str, duration: Duration) -> Point {
        Point {
            measurement: DEPLOYMENT_MEASUREMENT.to_owned(),
            workspace_id: workspace_id.to_owned(),
            time: epoch_millis(),
            fields: vec![
                Field {
                    k: "deployments".to_owned(),
                    v: 1.0,
                },
                Field {
                    k: "duration".to_owned(),
                    v: duration.as_millis() as f64,
                },
            ],
            tags: vec![Tag {
                k: "application".to_owned(),
                v: application_id.to_owned(),
            }],
        }
    }

    /// The gauge point emitted by the background demo loop.
    pub fn demo_gauge(workspace_id: &str, fact_sheet_id: &str, visitors_per_day: f64) -> Point {
        Point {
            measurement: DEMO_MEASUREMENT.to_owned(),
            workspace_id: workspace_id.to_owned(),
            time: epoch_millis(),
            fields: vec![Field {
                k: "visitors_per_day".to_owned(),
                v: visitors_per_day,
            }],
            tags: vec![Tag {
                k: "factSheetId".to_owned(),
                v: fact_sheet_id.to_owned(),
            }],
        }
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Destination for metric points, a trait so that tests and the background
/// emitter can run without the real API.
pub trait MetricsSink {
    fn create_point(&self, point: &Point) -> Result<(), MetricsError>;
}

pub struct HttpMetricsSink {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpMetricsSink {
    pub fn new(base_url: &str, token: &str) -> HttpMetricsSink {
        HttpMetricsSink {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        }
    }
}

impl MetricsSink for HttpMetricsSink {
    fn create_point(&self, point: &Point) -> Result<(), MetricsError> {
        let response = self
            .client
            .post(format!("{}/points", self.base_url))
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .json(point)
            .send()?;

        if !response.status().is_success() {
            return Err(MetricsError::Api {
                status: response.status(),
                body: response.text()?,
            });
        }

        Ok(())
    }
}
