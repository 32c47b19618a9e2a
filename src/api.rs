//! HTTP client for the user endpoints of the CRM backend.
//!
//! Each call is attempted exactly once. Whatever goes wrong underneath
//! (connection, status, body) is logged here and surfaced as the single
//! `ApiError` for that operation.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use crate::error::{ApiError, ConfigError};
use crate::models::{EntityId, NewUser, User, UserPatch};

pub struct UserApi {
    client: Client,
    base_url: String,
}

impl UserApi {
    /// `base_url` is the full API root, prefix included (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: EntityId) -> String {
        format!("{}/users/{}", self.base_url, id)
    }

    /// `GET /users`
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        let users: Vec<User> = fetch_json(self.client.get(self.users_url()))
            .await
            .map_err(|e| {
                error!(error = %e, "Error fetching users");
                ApiError::Fetch
            })?;
        debug!(count = users.len(), "fetched users");
        Ok(users)
    }

    /// `POST /users`; returns the record as created by the server.
    #[instrument(skip(self, payload), fields(name = %payload.name))]
    pub async fn create(&self, payload: &NewUser) -> Result<User, ApiError> {
        fetch_json(self.client.post(self.users_url()).json(payload))
            .await
            .map_err(|e| {
                error!(error = %e, "Error adding user");
                ApiError::Add
            })
    }

    /// `PUT /users/{id}` with only the fields present in `patch`.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: EntityId, patch: &UserPatch) -> Result<User, ApiError> {
        fetch_json(self.client.put(self.user_url(id)).json(patch))
            .await
            .map_err(|e| {
                error!(error = %e, "Error updating user {}", id);
                ApiError::Update
            })
    }

    /// `DELETE /users/{id}`; the response body is ignored.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        send(self.client.delete(self.user_url(id)))
            .await
            .map_err(|e| {
                error!(error = %e, "Error deleting user {}", id);
                ApiError::Delete
            })
    }
}

async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, reqwest::Error> {
    request.send().await?.error_for_status()?.json().await
}

async fn send(request: RequestBuilder) -> Result<(), reqwest::Error> {
    request.send().await?.error_for_status()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserStatus;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_json(id: u32, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "email": format!("{}@company.com", name.to_lowercase()),
            "phone": "+91 98765 43210",
            "role": "Sales Executive",
            "department": "Sales",
            "status": "active",
            "joinDate": "2024-01-17",
            "leadsAssigned": 0,
            "leadsConverted": 0
        })
    }

    fn api(server: &MockServer) -> UserApi {
        UserApi::new(format!("{}/api", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_list_decodes_users_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([user_json(2, "Priya"), user_json(1, "Rahul")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let users = api(&server).list().await.unwrap();
        let ids: Vec<u32> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_list_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = api(&server).list().await.unwrap_err();
        assert_eq!(err, ApiError::Fetch);
        assert_eq!(err.to_string(), "Failed to fetch users from the server.");
    }

    #[tokio::test]
    async fn test_list_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        assert_eq!(api(&server).list().await.unwrap_err(), ApiError::Fetch);
    }

    #[tokio::test]
    async fn test_create_posts_payload_and_returns_server_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "name": "Neha",
                "email": "neha@company.com",
                "phone": "",
                "role": "Sales Executive",
                "department": "Sales",
                "status": "active"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(user_json(42, "Neha")))
            .expect(1)
            .mount(&server)
            .await;

        let payload = NewUser {
            name: "Neha".into(),
            email: "neha@company.com".into(),
            role: "Sales Executive".into(),
            ..Default::default()
        };
        let created = api(&server).create(&payload).await.unwrap();
        assert_eq!(created.id, 42);
        assert_eq!(created.leads_assigned, 0);
    }

    #[tokio::test]
    async fn test_create_failure_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = api(&server)
            .create(&NewUser::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to add the user on the server.");
    }

    #[tokio::test]
    async fn test_update_puts_partial_payload() {
        let server = MockServer::start().await;
        let mut updated = user_json(3, "Amit");
        updated["status"] = json!("on-leave");
        Mock::given(method("PUT"))
            .and(path("/api/users/3"))
            .and(body_json(json!({ "status": "on-leave" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated))
            .expect(1)
            .mount(&server)
            .await;

        let patch = UserPatch {
            status: Some(UserStatus::OnLeave),
            ..Default::default()
        };
        let user = api(&server).update(3, &patch).await.unwrap();
        assert_eq!(user.status, UserStatus::OnLeave);
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = api(&server)
            .update(99, &UserPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Update);
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/4"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        api(&server).delete(4).await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = UserApi::new(format!("http://{}", addr)).unwrap();
        assert_eq!(api.delete(1).await.unwrap_err(), ApiError::Delete);
        assert_eq!(api.list().await.unwrap_err(), ApiError::Fetch);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let api = UserApi::new("http://localhost:5000/api/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000/api");
        assert_eq!(api.users_url(), "http://localhost:5000/api/users");
        assert_eq!(api.user_url(7), "http://localhost:5000/api/users/7");
    }
}
