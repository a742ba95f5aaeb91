// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Fit gateway.
//!
//! Handles:
//! - OAuth2 code exchange and token refresh against the Google token endpoint
//! - Daily step aggregation via the Fitness REST API
//! - Absorbing malformed aggregate buckets as zero-step days

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::ActivitySample;
use crate::provider::{ProviderError, ProviderGateway, TokenGrant};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const AGGREGATE_URL: &str = "https://www.googleapis.com/fitness/v1/users/me/dataset:aggregate";

/// One calendar day, the aggregation bucket size.
const DAY_MILLIS: i64 = 86_400_000;

const REQUIRED_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/fitness.activity.read",
    "https://www.googleapis.com/auth/fitness.location.read",
];

/// Google Fit API client.
#[derive(Clone)]
pub struct GoogleFitGateway {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

impl GoogleFitGateway {
    /// Create a new gateway with OAuth credentials.
    pub fn new(client_id: String, client_secret: String, redirect_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
            redirect_url,
        }
    }

    /// POST a grant request to the token endpoint and parse the response.
    async fn token_grant(&self, form: &[(&str, &str)]) -> Result<TokenGrant, ProviderError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(form)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let payload: TokenResponse = check_response_json(response).await?;

        Ok(TokenGrant {
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
            expires_in_secs: payload.expires_in,
        })
    }
}

#[async_trait]
impl ProviderGateway for GoogleFitGateway {
    fn required_scopes(&self) -> &[&'static str] {
        REQUIRED_SCOPES
    }

    fn authorization_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&response_type=code&access_type=offline&include_granted_scopes=true",
            AUTH_URL,
            self.client_id,
            urlencoding::encode(&self.redirect_url),
            urlencoding::encode(&REQUIRED_SCOPES.join(" ")),
        )
    }

    async fn exchange_authorization_code(
        &self,
        code: &str,
    ) -> Result<TokenGrant, ProviderError> {
        self.token_grant(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_url.as_str()),
        ])
        .await
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenGrant, ProviderError> {
        self.token_grant(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .await
    }

    async fn fetch_daily_activity(
        &self,
        access_token: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ActivitySample>, ProviderError> {
        let body = serde_json::json!({
            "aggregateBy": [{
                "dataTypeName": "com.google.step_count.delta",
                "dataSourceId":
                    "derived:com.google.step_count.delta:com.google.android.gms:estimated_steps"
            }],
            "bucketByTime": { "durationMillis": DAY_MILLIS },
            "startTimeMillis": start.timestamp_millis(),
            "endTimeMillis": end.timestamp_millis(),
        });

        let response = self
            .http
            .post(AGGREGATE_URL)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let payload: AggregateResponse = check_response_json(response).await?;

        Ok(parse_aggregate(payload))
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 401 {
            tracing::warn!("Google API rejected the access token (401)");
        }

        return Err(ProviderError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::Malformed(e.to_string()))
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
}

/// Aggregate response shape. Every nesting level defaults to empty so a
/// sparse day deserializes instead of failing the whole fetch.
#[derive(Debug, Default, Deserialize)]
struct AggregateResponse {
    #[serde(default)]
    bucket: Vec<AggregateBucket>,
}

#[derive(Debug, Default, Deserialize)]
struct AggregateBucket {
    #[serde(default, rename = "startTimeMillis")]
    start_time_millis: String,
    #[serde(default)]
    dataset: Vec<AggregateDataset>,
}

#[derive(Debug, Default, Deserialize)]
struct AggregateDataset {
    #[serde(default)]
    point: Vec<AggregatePoint>,
}

#[derive(Debug, Default, Deserialize)]
struct AggregatePoint {
    #[serde(default)]
    value: Vec<AggregateValue>,
}

#[derive(Debug, Default, Deserialize)]
struct AggregateValue {
    #[serde(rename = "intVal")]
    int_val: Option<i64>,
}

/// Flatten the aggregate response into per-day samples.
///
/// A bucket with no data points, or with a value of the wrong shape, counts
/// as zero steps for that day; a bucket whose timestamp is unparsable is
/// dropped. A single bad day never aborts the aggregation.
fn parse_aggregate(response: AggregateResponse) -> Vec<ActivitySample> {
    response
        .bucket
        .into_iter()
        .filter_map(|bucket| {
            let millis: i64 = match bucket.start_time_millis.parse() {
                Ok(v) => v,
                Err(_) => {
                    tracing::debug!(
                        start = %bucket.start_time_millis,
                        "Dropping aggregate bucket with unparsable timestamp"
                    );
                    return None;
                }
            };
            let day_start = DateTime::from_timestamp_millis(millis)?;

            let steps = bucket
                .dataset
                .first()
                .and_then(|d| d.point.first())
                .and_then(|p| p.value.first())
                .and_then(|v| v.int_val)
                .unwrap_or(0)
                .max(0) as u64;

            Some(ActivitySample {
                day_start,
                step_count: steps,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> GoogleFitGateway {
        GoogleFitGateway::new(
            "id".to_string(),
            "secret".to_string(),
            "https://example.com/auth/callback".to_string(),
        )
    }

    #[test]
    fn test_authorization_url_contains_scopes_and_redirect() {
        let url = gateway().authorization_url();

        assert!(url.starts_with(AUTH_URL));
        assert!(url.contains("client_id=id"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains(&*urlencoding::encode("https://example.com/auth/callback")));
        assert!(url.contains(&*urlencoding::encode(
            "https://www.googleapis.com/auth/fitness.activity.read"
        )));
    }

    #[test]
    fn test_parse_aggregate_happy_path() {
        let json = serde_json::json!({
            "bucket": [
                {
                    "startTimeMillis": "1704067200000",
                    "dataset": [{ "point": [{ "value": [{ "intVal": 4200 }] }] }]
                },
                {
                    "startTimeMillis": "1704153600000",
                    "dataset": [{ "point": [{ "value": [{ "intVal": 8100 }] }] }]
                }
            ]
        });

        let samples = parse_aggregate(serde_json::from_value(json).unwrap());
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].step_count, 4200);
        assert_eq!(samples[1].step_count, 8100);
        assert!(samples[0].day_start < samples[1].day_start);
    }

    #[test]
    fn test_parse_aggregate_absorbs_malformed_buckets() {
        // Day 2 has no data points, day 3 has a float-only value: both are
        // zero-step days. Day 4 has a garbage timestamp and is dropped.
        let json = serde_json::json!({
            "bucket": [
                {
                    "startTimeMillis": "1704067200000",
                    "dataset": [{ "point": [{ "value": [{ "intVal": 4200 }] }] }]
                },
                { "startTimeMillis": "1704153600000", "dataset": [{ "point": [] }] },
                {
                    "startTimeMillis": "1704240000000",
                    "dataset": [{ "point": [{ "value": [{ "fpVal": 12.5 }] }] }]
                },
                {
                    "startTimeMillis": "not-a-number",
                    "dataset": [{ "point": [{ "value": [{ "intVal": 999 }] }] }]
                }
            ]
        });

        let samples = parse_aggregate(serde_json::from_value(json).unwrap());
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].step_count, 4200);
        assert_eq!(samples[1].step_count, 0);
        assert_eq!(samples[2].step_count, 0);
    }

    #[test]
    fn test_parse_aggregate_empty_response() {
        let samples = parse_aggregate(AggregateResponse::default());
        assert!(samples.is_empty());
    }
}
