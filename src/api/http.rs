use super::{AdminApi, ApiError};
use crate::model::{AvailableTests, Health, NewUser, RunStarted, TestExecution, User};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// reqwest-backed [`AdminApi`]. No timeout and no retry: a hung request simply
/// never reports back.
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    pub fn new(base: Url) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("adminw/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base })
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status(status))
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl AdminApi for HttpApi {
    async fn health(&self) -> Result<Health, ApiError> {
        self.send_json(self.client.get(self.endpoint(&["health"])))
            .await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.send_json(self.client.get(self.endpoint(&["users"])))
            .await
    }

    async fn create_user(&self, user: &NewUser) -> Result<(), ApiError> {
        self.send(self.client.post(self.endpoint(&["users"])).json(user))
            .await
            .map(|_| ())
    }

    async fn delete_user(&self, id: u64) -> Result<(), ApiError> {
        let id = id.to_string();
        self.send(self.client.delete(self.endpoint(&["users", &id])))
            .await
            .map(|_| ())
    }

    async fn find_user(&self, username: &str) -> Result<User, ApiError> {
        let request = self
            .client
            .get(self.endpoint(&["users", "search"]))
            .query(&[("username", username)]);
        self.send_json(request).await
    }

    async fn available_tests(&self) -> Result<AvailableTests, ApiError> {
        self.send_json(self.client.get(self.endpoint(&["tests", "available"])))
            .await
    }

    async fn run_all(&self) -> Result<RunStarted, ApiError> {
        let request = self
            .client
            .post(self.endpoint(&["tests", "run"]))
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        self.send_json(request).await
    }

    async fn run_one(&self, class: &str, method: &str) -> Result<RunStarted, ApiError> {
        let request = self
            .client
            .post(self.endpoint(&["tests", "run", class, method]))
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        self.send_json(request).await
    }

    async fn execution(&self, id: &str) -> Result<TestExecution, ApiError> {
        self.send_json(self.client.get(self.endpoint(&["tests", "execution", id])))
            .await
    }

    async fn executions(&self) -> Result<Vec<TestExecution>, ApiError> {
        self.send_json(self.client.get(self.endpoint(&["tests", "executions"])))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpApi {
        HttpApi::new(base.parse().unwrap()).unwrap()
    }

    #[test]
    fn endpoint_appends_segments() {
        let api = api("http://localhost:9080/openliberty-demo/api");
        assert_eq!(
            api.endpoint(&["tests", "execution", "abc"]).as_str(),
            "http://localhost:9080/openliberty-demo/api/tests/execution/abc"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let api = api("http://localhost:9080/openliberty-demo/api/");
        assert_eq!(
            api.endpoint(&["users"]).as_str(),
            "http://localhost:9080/openliberty-demo/api/users"
        );
    }

    #[test]
    fn endpoint_encodes_segments() {
        let api = api("http://localhost/api");
        assert_eq!(
            api.endpoint(&["tests", "run", "My Test", "a/b"]).as_str(),
            "http://localhost/api/tests/run/My%20Test/a%2Fb"
        );
    }
}
