use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::{
    domain::{
        Exercise, ExerciseId, Journal, JournalEntry, JournalEntryId, JournalId, NewJournalEntry,
    },
    ApiError, ApiUrl, JournalStore,
};

/// HTTP client for the journal service.
#[derive(Debug, Clone)]
pub struct JournalApiClient {
    client: reqwest::Client,
    base_url: ApiUrl,
}

#[derive(Serialize)]
struct CreateJournalRequest<'a> {
    author: &'a str,
}

impl JournalApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: ApiUrl::new(base_url),
        })
    }

    fn request(&self, method: Method, url: ApiUrl) -> RequestBuilder {
        self.client
            .request(method, url.as_ref())
            .header(CONTENT_TYPE, "application/json")
    }

    async fn send(&self, request: RequestBuilder, call: &str) -> Result<Response, ApiError> {
        debug!(call, "calling journal service");

        let response = request.send().await.map_err(|e| {
            warn!(call, error = %e, "journal service unreachable");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(call.to_string()));
        }
        if !status.is_success() {
            warn!(call, status = status.as_u16(), "journal service returned error");
            return Err(ApiError::Status {
                call: call.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, call).await?;
        response.json::<T>().await.map_err(|e| {
            ApiError::Parsing(format!("Failed to parse {} response as JSON: {}", call, e))
        })
    }

    async fn fetch_text(&self, request: RequestBuilder, call: &str) -> Result<String, ApiError> {
        let response = self.send(request, call).await?;
        response
            .text()
            .await
            .map_err(|e| ApiError::Parsing(format!("Failed to read {} response: {}", call, e)))
    }
}

#[async_trait]
impl JournalStore for JournalApiClient {
    async fn create_journal(&self, author: &str) -> Result<Journal, ApiError> {
        let url = self.base_url.append_path("/journals");
        self.fetch_json(
            self.request(Method::POST, url)
                .json(&CreateJournalRequest { author }),
            "POST /journals",
        )
        .await
    }

    async fn journals_by_author(&self, author: &str) -> Result<Vec<Journal>, ApiError> {
        let url = self
            .base_url
            .append_path("/journals/authors")
            .append_segment(author);
        self.fetch_json(
            self.request(Method::GET, url),
            "GET /journals/authors/:author",
        )
        .await
    }

    async fn update_journal(&self, journal: &Journal) -> Result<Journal, ApiError> {
        let url = self
            .base_url
            .append_path("/journals")
            .append_segment(journal.id);
        self.fetch_json(
            self.request(Method::PUT, url).json(journal),
            "PUT /journals/:id",
        )
        .await
    }

    async fn delete_journal(&self, id: JournalId) -> Result<String, ApiError> {
        let url = self.base_url.append_path("/journals").append_segment(id);
        self.fetch_text(self.request(Method::DELETE, url), "DELETE /journals/:id")
            .await
    }

    async fn create_entry(&self, entry: &NewJournalEntry) -> Result<JournalEntry, ApiError> {
        let url = self.base_url.append_path("/entries");
        self.fetch_json(
            self.request(Method::POST, url).json(entry),
            "POST /entries",
        )
        .await
    }

    async fn entries_for_journal(&self, id: JournalId) -> Result<Vec<JournalEntry>, ApiError> {
        let url = self
            .base_url
            .append_path("/journals")
            .append_segment(id)
            .append_path("entries");
        self.fetch_json(
            self.request(Method::GET, url),
            "GET /journals/:id/entries",
        )
        .await
    }

    async fn update_entry(&self, entry: &JournalEntry) -> Result<JournalEntry, ApiError> {
        let url = self
            .base_url
            .append_path("/entries")
            .append_segment(entry.id);
        self.fetch_json(
            self.request(Method::PUT, url).json(entry),
            "PUT /entries/:id",
        )
        .await
    }

    async fn delete_entry(&self, id: JournalEntryId) -> Result<JournalEntry, ApiError> {
        let url = self.base_url.append_path("/entries").append_segment(id);
        self.fetch_json(self.request(Method::DELETE, url), "DELETE /entries/:id")
            .await
    }

    async fn list_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        let url = self.base_url.append_path("/exercises");
        self.fetch_json(self.request(Method::GET, url), "GET /exercises")
            .await
    }

    async fn exercises_for_entry(&self, id: JournalEntryId) -> Result<Vec<Exercise>, ApiError> {
        let url = self
            .base_url
            .append_path("/entries")
            .append_segment(id)
            .append_path("exercises");
        self.fetch_json(
            self.request(Method::GET, url),
            "GET /entries/:id/exercises",
        )
        .await
    }

    async fn create_exercise(&self, exercise: &Exercise) -> Result<Exercise, ApiError> {
        let url = self.base_url.append_path("/exercises");
        self.fetch_json(
            self.request(Method::POST, url).json(exercise),
            "POST /exercises",
        )
        .await
    }

    async fn update_exercise(&self, exercise: &Exercise) -> Result<Exercise, ApiError> {
        let id = exercise.id.ok_or(ApiError::MissingId("exercise"))?;
        let url = self.base_url.append_path("/exercises").append_segment(id);
        self.fetch_json(
            self.request(Method::PUT, url).json(exercise),
            "PUT /exercises/:id",
        )
        .await
    }

    async fn fetch_exercise(&self, id: ExerciseId) -> Result<Exercise, ApiError> {
        let url = self.base_url.append_path("/exercises").append_segment(id);
        self.fetch_json(
            self.request(Method::DELETE, url),
            "DELETE /exercises/:id",
        )
        .await
    }
}
