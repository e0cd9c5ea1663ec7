// This module fetches single pages of traffic records from the data endpoint.
use common_utils::date_utils::DateWindow;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::{
    authenticating::Token,
    error::{ExtractError, Result},
    records::PageData,
};

/// How often a failed page request is repeated before the run gives up.
pub const FETCH_RETRIES: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DataRequest<'a> {
    start_date: &'a str,
    end_date: &'a str,
    fields: &'a [&'a str],
    page: u32,
}

/// Issues authorized page requests against the data endpoint.
pub struct PageFetcher<'a> {
    http: &'a Client,
    data_url: &'a str,
    token: &'a Token,
}

impl<'a> PageFetcher<'a> {
    pub fn new(http: &'a Client, data_url: &'a str, token: &'a Token) -> Self {
        Self {
            http,
            data_url,
            token,
        }
    }

    /// Fetches `page` of the records within `date_window`.
    ///
    /// Any failed attempt (transport error, non-success status, unreadable body) is repeated
    /// identically while `retries` remain. When the last attempt fails the result is an
    /// [`ExtractError::Fetch`] carrying the page and the response body, or the error message
    /// when no response was received.
    pub async fn fetch_page(
        &self,
        date_window: &DateWindow,
        fields: &[&str],
        page: u32,
        retries: u32,
    ) -> Result<PageData> {
        let request = DataRequest {
            start_date: date_window.start_date(),
            end_date: date_window.end_date(),
            fields,
            page,
        };
        let mut retries_remaining = retries;
        loop {
            match self.attempt(&request).await {
                Ok(page_data) => return Ok(page_data),
                Err(payload) if retries_remaining > 0 => {
                    warn!(page, error = %payload, "Retrying... {} attempts left", retries_remaining);
                    retries_remaining -= 1;
                }
                Err(payload) => {
                    error!("Error getting data for page {}: {}", page, payload);
                    return Err(ExtractError::Fetch { page, payload });
                }
            }
        }
    }

    // A single request. The error is the payload to report upstream.
    async fn attempt(&self, request: &DataRequest<'_>) -> std::result::Result<PageData, String> {
        debug!(page = request.page, url = self.data_url, "requesting page");
        let response = self
            .http
            .post(self.data_url)
            .bearer_auth(self.token.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;
        if !status.is_success() {
            return Err(if body.is_empty() {
                status.to_string()
            } else {
                body
            });
        }
        serde_json::from_str(&body).map_err(|e| format!("unreadable page ({}): {}", e, body))
    }
}
