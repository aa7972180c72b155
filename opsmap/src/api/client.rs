//! Reqwest-backed backend client

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::types::{ApiError, GeofenceQuery, HeatmapQuery, MapApi, PointQuery};
use crate::model::{AttendancePoint, Campus, GeofenceArea, HeatmapSample};

/// HTTP implementation of [`MapApi`] over a REST base URL.
///
/// Stateless apart from the connection pool; cheap to clone.
#[derive(Debug, Clone)]
pub struct ReqwestMapApi {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestMapApi {
    /// Creates a client for the given base URL (trailing slash tolerated).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Creates a client reusing an existing connection pool.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    async fn get_json<T>(
        &self,
        endpoint: &'static str,
        pairs: &[(&'static str, String)],
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        trace!(url = %url, params = pairs.len(), "GET");

        let response = self
            .client
            .get(&url)
            .query(pairs)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(endpoint, status = status.as_u16(), "non-2xx response");
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| ApiError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}

impl MapApi for ReqwestMapApi {
    async fn campus_options(&self) -> Result<Vec<Campus>, ApiError> {
        self.get_json("campuses", &[]).await
    }

    async fn geofences(&self, query: &GeofenceQuery) -> Result<Vec<GeofenceArea>, ApiError> {
        self.get_json("geofences", &query.query_pairs()).await
    }

    async fn attendance_points(
        &self,
        query: &PointQuery,
    ) -> Result<Vec<AttendancePoint>, ApiError> {
        self.get_json("attendance-points", &query.query_pairs())
            .await
    }

    async fn heatmap_samples(&self, query: &HeatmapQuery) -> Result<Vec<HeatmapSample>, ApiError> {
        self.get_json("heatmap-samples", &query.query_pairs()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = ReqwestMapApi::new("https://ops.example.com/api/");
        assert_eq!(api.base_url, "https://ops.example.com/api");
    }
}
