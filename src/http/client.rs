//! HTTP client with authentication and error classification.

use std::io::Write;
use std::path::Path;

use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Header carrying the API token on every metadata request.
const API_TOKEN_HEADER: &str = "X-API-Token";

/// HTTP client for the App Center API.
///
/// Attaches the authentication headers to metadata requests and maps
/// non-success statuses onto the crate's error kinds. Requests are never
/// retried; every failure is reported to the caller as it happened.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    api_token: String,
}

impl HttpClient {
    /// Creates a client that authenticates with the given API token.
    /// The token is trimmed of surrounding whitespace.
    pub fn new(client: Client, api_token: &str) -> Self {
        Self {
            client,
            api_token: api_token.trim().to_string(),
        }
    }

    /// Performs an authenticated GET and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Performs an authenticated GET and returns the raw response body.
    #[tracing::instrument(skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}...", url);

        let response = self
            .client
            .get(url)
            .header(API_TOKEN_HEADER, &self.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.text().await?)
    }

    /// Streams a binary into `dest`, returning the number of bytes written.
    ///
    /// Download URLs are pre-signed by the service, so no auth header is
    /// attached. A failure to create or write the file maps to
    /// [`Error::FileSystem`] with the offending path.
    #[tracing::instrument(skip(self))]
    pub async fn download_file(&self, url: &str, dest: &Path) -> Result<u64> {
        debug!("Downloading file from {}...", url);

        let response = self.client.get(url).send().await?;
        let mut response = check_status(response).await?;

        let mut file = std::fs::File::create(dest).map_err(|e| Error::FileSystem {
            path: dest.to_path_buf(),
            source: e,
        })?;
        let mut downloaded: u64 = 0;

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).map_err(|e| Error::FileSystem {
                path: dest.to_path_buf(),
                source: e,
            })?;
            downloaded += chunk.len() as u64;
        }

        debug!(
            "Downloaded {:.2} MB",
            downloaded as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded)
    }
}

/// Maps a non-success response onto the crate's error kinds, consuming the
/// body for the error message.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::UNAUTHORIZED => Error::Auth { body },
        StatusCode::NOT_FOUND => Error::NotFound(format!(
            "check the owner, app, release or device identifiers: {body}"
        )),
        StatusCode::BAD_REQUEST => Error::BadRequest { body },
        _ => Error::Http { status, body },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(token: &str) -> HttpClient {
        HttpClient::new(Client::new(), token)
    }

    #[tokio::test]
    async fn test_get_json_sends_auth_headers() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/info")
            .match_header("x-api-token", "secret-token")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "test", "value": 42}"#)
            .create_async()
            .await;

        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct TestResponse {
            name: String,
            value: i32,
        }

        let result: TestResponse = client("secret-token")
            .get_json(&format!("{}/info", url))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.name, "test");
        assert_eq!(result.value, 42);
    }

    #[tokio::test]
    async fn test_token_is_trimmed() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/info")
            .match_header("x-api-token", "secret-token")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let _: serde_json::Value = client("  secret-token \n")
            .get_json(&format!("{}/info", url))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _m = server
            .mock("GET", "/info")
            .with_status(401)
            .with_body("token expired")
            .create_async()
            .await;

        let result = client("bad").get_text(&format!("{}/info", url)).await;
        assert!(matches!(result, Err(Error::Auth { body }) if body == "token expired"));
    }

    #[tokio::test]
    async fn test_not_found_maps_to_not_found_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _m = server
            .mock("GET", "/info")
            .with_status(404)
            .create_async()
            .await;

        let result = client("t").get_text(&format!("{}/info", url)).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_bad_request_maps_to_bad_request_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _m = server
            .mock("GET", "/info")
            .with_status(400)
            .with_body("malformed")
            .create_async()
            .await;

        let result = client("t").get_text(&format!("{}/info", url)).await;
        assert!(matches!(result, Err(Error::BadRequest { body }) if body == "malformed"));
    }

    #[tokio::test]
    async fn test_other_status_passes_body_through() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _m = server
            .mock("GET", "/info")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let result = client("t").get_text(&format!("{}/info", url)).await;
        match result {
            Err(Error::Http { status, body }) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected Http error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_maps_to_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _m = server
            .mock("GET", "/info")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result: Result<serde_json::Value> =
            client("t").get_json(&format!("{}/info", url)).await;
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn test_download_file_writes_bytes() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/app.apk")
            .with_status(200)
            .with_body("binary content")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("app.apk");

        let bytes = client("t")
            .download_file(&format!("{}/app.apk", url), &dest)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(bytes, 14);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "binary content");
    }

    #[tokio::test]
    async fn test_download_into_missing_directory_is_a_file_system_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _m = server
            .mock("GET", "/app.apk")
            .with_status(200)
            .with_body("binary content")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("no-such-subdir").join("app.apk");

        let result = client("t")
            .download_file(&format!("{}/app.apk", url), &dest)
            .await;
        assert!(matches!(result, Err(Error::FileSystem { .. })));
    }
}
