//! HTTP adapter for the calendar/preferences store
//!
//! All reads are by (user, date-range) or id. The store authenticates with
//! an admin secret header; responses are plain JSON records. 404 on a
//! single-record lookup means "absent", not an error.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tessera_core::assembly::ports::SchedulingStore;
use tessera_domain::{
    Category, Event, MeetingAssist, MeetingAssistAttendee, Result, StoreConfig, UserPreference,
};

use crate::errors::InfraError;
use crate::http::HttpClient;

const ADMIN_SECRET_HEADER: &str = "X-Admin-Secret";
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Calendar/preferences store client
pub struct SchedulingStoreClient {
    http_client: HttpClient,
    base_url: String,
    admin_secret: String,
}

impl SchedulingStoreClient {
    pub fn new(config: &StoreConfig, http_client: HttpClient) -> Self {
        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            admin_secret: config.admin_secret.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let request = self
            .http_client
            .request(Method::GET, self.url(path))
            .header(ADMIN_SECRET_HEADER, &self.admin_secret);

        let response = self.http_client.send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check_status(response).await?;
        let value =
            response.json::<T>().await.map_err(|err| InfraError::from(err))?;
        Ok(Some(value))
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        timezone: Tz,
    ) -> Result<Vec<T>> {
        let request = self
            .http_client
            .request(Method::GET, self.url(path))
            .header(ADMIN_SECRET_HEADER, &self.admin_secret)
            .query(&[
                ("startDate", start.format(DATE_FORMAT).to_string()),
                ("endDate", end.format(DATE_FORMAT).to_string()),
                ("timezone", timezone.name().to_string()),
            ]);

        let response = Self::check_status(self.http_client.send(request).await?).await?;
        let values =
            response.json::<Vec<T>>().await.map_err(|err| InfraError::from(err))?;
        Ok(values)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let request = self
            .http_client
            .request(Method::POST, self.url(path))
            .header(ADMIN_SECRET_HEADER, &self.admin_secret)
            .json(body);

        Self::check_status(self.http_client.send(request).await?).await?;
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
        Err(InfraError::Status { status: status.as_u16(), message }.into())
    }
}

#[async_trait]
impl SchedulingStore for SchedulingStoreClient {
    async fn get_user_preference(&self, user_id: &str) -> Result<Option<UserPreference>> {
        self.get_json(&format!("/v1/users/{user_id}/preference")).await
    }

    async fn get_primary_calendar_id(&self, user_id: &str) -> Result<Option<String>> {
        #[derive(serde::Deserialize)]
        struct PrimaryCalendar {
            id: String,
        }

        let calendar: Option<PrimaryCalendar> =
            self.get_json(&format!("/v1/users/{user_id}/calendars/primary")).await?;
        Ok(calendar.map(|c| c.id))
    }

    async fn list_events_for_date(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        timezone: Tz,
    ) -> Result<Vec<Event>> {
        self.get_list(&format!("/v1/users/{user_id}/events"), start, end, timezone).await
    }

    async fn list_events_for_window(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        timezone: Tz,
    ) -> Result<Vec<Event>> {
        self.get_list(&format!("/v1/users/{user_id}/events"), start, end, timezone).await
    }

    async fn list_meeting_events_for_attendee(
        &self,
        attendee_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        timezone: Tz,
    ) -> Result<Vec<Event>> {
        self.get_list(&format!("/v1/attendees/{attendee_id}/events"), start, end, timezone).await
    }

    async fn get_meeting_assist(&self, meeting_id: &str) -> Result<Option<MeetingAssist>> {
        self.get_json(&format!("/v1/meeting-assists/{meeting_id}")).await
    }

    async fn list_attendees(&self, meeting_id: &str) -> Result<Vec<MeetingAssistAttendee>> {
        let attendees: Option<Vec<MeetingAssistAttendee>> =
            self.get_json(&format!("/v1/meeting-assists/{meeting_id}/attendees")).await?;
        Ok(attendees.unwrap_or_default())
    }

    async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>> {
        let categories: Option<Vec<Category>> =
            self.get_json(&format!("/v1/users/{user_id}/categories")).await?;
        Ok(categories.unwrap_or_default())
    }

    async fn link_categories_to_event(
        &self,
        event_id: &str,
        category_ids: &[String],
    ) -> Result<()> {
        self.post_json(
            &format!("/v1/events/{event_id}/categories"),
            &json!({ "categoryIds": category_ids }),
        )
        .await
    }

    async fn decrement_usage(&self, user_id: &str) -> Result<()> {
        self.post_json(&format!("/v1/users/{user_id}/usage/decrement"), &json!({})).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tessera_domain::{DayTime, TesseraError};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_client(base_url: String) -> SchedulingStoreClient {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(5))
            .max_attempts(1)
            .build()
            .expect("http client");

        let config = StoreConfig { base_url, admin_secret: "secret-1".into() };
        SchedulingStoreClient::new(&config, http_client)
    }

    fn preference_json() -> serde_json::Value {
        let start_times: Vec<DayTime> =
            (1..=7).map(|day| DayTime { day, hour: 9, minutes: 0 }).collect();
        let end_times: Vec<DayTime> =
            (1..=7).map(|day| DayTime { day, hour: 17, minutes: 0 }).collect();
        serde_json::json!({
            "userId": "user-1",
            "startTimes": start_times,
            "endTimes": end_times,
            "breakLength": 15,
            "minNumberOfBreaks": 2,
            "maxWorkLoadPercent": 80,
            "maxNumberOfMeetings": 6,
            "backToBackMeetings": false,
            "breakColor": null
        })
    }

    #[tokio::test]
    async fn fetches_preference_with_admin_secret() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/users/user-1/preference"))
            .and(header("X-Admin-Secret", "secret-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(preference_json()))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let preference = client.get_user_preference("user-1").await.expect("preference");

        let preference = preference.expect("present");
        assert_eq!(preference.user_id, "user-1");
        assert_eq!(preference.break_length, 15);
    }

    #[tokio::test]
    async fn missing_preference_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/users/ext-1/preference"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        assert!(client.get_user_preference("ext-1").await.expect("ok").is_none());
    }

    #[tokio::test]
    async fn lists_events_with_window_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/users/user-1/events"))
            .and(query_param("startDate", "2023-06-06T09:00:00"))
            .and(query_param("endDate", "2023-06-07T17:00:00"))
            .and(query_param("timezone", "UTC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let events = client
            .list_events_for_window(
                "user-1",
                chrono::NaiveDate::from_ymd_opt(2023, 6, 6)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
                chrono::NaiveDate::from_ymd_opt(2023, 6, 7)
                    .unwrap()
                    .and_hms_opt(17, 0, 0)
                    .unwrap(),
                chrono_tz::UTC,
            )
            .await
            .expect("events");

        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn auth_failure_surfaces_as_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad secret"))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let result = client.list_categories("user-1").await;
        assert!(matches!(result, Err(TesseraError::Auth(_))));
    }

    #[tokio::test]
    async fn links_categories_with_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/events/e-1/categories"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        client
            .link_categories_to_event("e-1", &["c-1".to_string(), "c-2".to_string()])
            .await
            .expect("link");
    }
}
