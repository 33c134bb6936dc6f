use reqwest::header::CONTENT_TYPE;

use crate::error::FormsError;
use crate::notifications::model::{ApiAck, MarkReadRequest, Notification};
use crate::ui::notice::{AlertKind, FlashAlert};
use crate::ui::services::Services;

pub const NOTIFICATIONS_PATH: &str = "/api/notifications";
pub const MARK_READ_PATH: &str = "/api/notifications/mark-read";
pub const MARK_ALL_READ_PATH: &str = "/api/notifications/mark-all-read";
pub const CSRF_HEADER: &str = "X-CSRFToken";

pub const ALL_READ_MESSAGE: &str = "Tüm bildirimler okundu olarak işaretlendi";

/// Anything that can produce the current notification list.
pub trait NotificationSource {
    fn fetch(&self) -> Result<Vec<Notification>, FormsError>;
}

/// Blocking client for the backend's notification API.
pub struct NotificationClient {
    base_url: String,
    csrf_token: Option<String>,
    client: reqwest::blocking::Client,
}

impl NotificationClient {
    pub fn new(base_url: &str, csrf_token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf_token,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Client for the page the services belong to; state-changing requests
    /// carry the page's CSRF token.
    pub fn from_services(base_url: &str, services: &Services) -> Self {
        Self::new(base_url, services.csrf_token.clone())
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn mark_read(&self, notification_id: u64) -> Result<(), FormsError> {
        let body = MarkReadRequest { notification_id };
        let ack = self.post(MARK_READ_PATH, Some(&body))?;
        if !ack.success {
            return Err(FormsError::Api {
                endpoint: self.endpoint(MARK_READ_PATH),
                message: ack.message.unwrap_or_else(|| "success=false".into()),
            });
        }
        Ok(())
    }

    /// Mark everything read; the alert is what the page shows on success.
    pub fn mark_all_read(&self) -> Result<FlashAlert, FormsError> {
        let ack = self.post::<MarkReadRequest>(MARK_ALL_READ_PATH, None)?;
        if !ack.success {
            return Err(FormsError::Api {
                endpoint: self.endpoint(MARK_ALL_READ_PATH),
                message: ack.message.unwrap_or_else(|| "success=false".into()),
            });
        }
        Ok(FlashAlert::new(AlertKind::Success, ALL_READ_MESSAGE))
    }

    fn post<B: serde::Serialize>(&self, path: &str, body: Option<&B>) -> Result<ApiAck, FormsError> {
        let url = self.endpoint(path);

        let mut request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| FormsError::Http {
                endpoint: url.clone(),
                source: e,
            })?;

        response.json::<ApiAck>().map_err(|e| FormsError::Http {
            endpoint: url,
            source: e,
        })
    }
}

impl NotificationSource for NotificationClient {
    fn fetch(&self) -> Result<Vec<Notification>, FormsError> {
        let url = self.endpoint(NOTIFICATIONS_PATH);

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| FormsError::Http {
                endpoint: url.clone(),
                source: e,
            })?;

        response
            .json::<Vec<Notification>>()
            .map_err(|e| FormsError::Http {
                endpoint: url,
                source: e,
            })
    }
}
