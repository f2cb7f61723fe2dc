//! Trello REST client.
//!
//! Only two read endpoints are used:
//! - `GET /boards/{board}/cards` for the tasks
//! - `GET /cards/{card}/actions?filter=commentCard` for the comments
//!
//! Requests run on a private current-thread runtime so the source traits
//! stay synchronous.

use std::fmt;

use http::{header, Request, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use otjlog_core::{BoardTask, CommentSource, RawComment, SourceError, TaskSource};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// Public Trello API root
pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

type HttpsClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, String>;

/// Key, token and board to read from
#[derive(Clone, PartialEq, Eq)]
pub struct TrelloCredentials {
    pub api_key: String,
    pub token: String,
    pub board_id: String,
}

impl TrelloCredentials {
    pub fn new(
        api_key: impl Into<String>,
        token: impl Into<String>,
        board_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            token: token.into(),
            board_id: board_id.into(),
        }
    }
}

impl fmt::Debug for TrelloCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrelloCredentials")
            .field("api_key", &"<redacted>")
            .field("token", &"<redacted>")
            .field("board_id", &self.board_id)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardDto {
    id: String,
    name: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    short_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ActionDto {
    data: ActionData,
}

#[derive(Debug, Deserialize)]
struct ActionData {
    #[serde(default)]
    text: Option<String>,
}

/// Blocking Trello board client
pub struct TrelloClient {
    credentials: TrelloCredentials,
    base_url: String,
    client: HttpsClient,
    runtime: Runtime,
}

impl TrelloClient {
    /// `base_url` is the API root, normally [`DEFAULT_BASE_URL`]
    pub fn new(
        credentials: TrelloCredentials,
        base_url: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SourceError::Transport(format!("cannot start runtime: {e}")))?;

        let builder = match HttpsConnectorBuilder::new().with_native_roots() {
            Ok(builder) => builder,
            Err(e) => {
                warn!("native root certificates unavailable ({e}); using bundled roots");
                HttpsConnectorBuilder::new().with_webpki_roots()
            }
        };
        let connector = builder.https_or_http().enable_http1().build();

        let client = {
            let _guard = runtime.enter();
            Client::builder(TokioExecutor::new()).build(connector)
        };

        Ok(Self {
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            runtime,
        })
    }

    pub fn board_id(&self) -> &str {
        &self.credentials.board_id
    }

    /// Full URL for `path` with credentials and `extra` query pairs
    fn url(&self, path: &str, extra: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{}?key={}&token={}",
            self.base_url,
            path,
            encode_query_value(&self.credentials.api_key),
            encode_query_value(&self.credentials.token),
        );
        for (name, value) in extra {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&encode_query_value(value));
        }
        url
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        // Errors report the path only; the query carries the credentials
        let shown = format!("{}{}", self.base_url, path);
        let uri: Uri = self
            .url(path, extra)
            .parse()
            .map_err(|e: http::uri::InvalidUri| SourceError::InvalidUrl(format!("{shown}: {e}")))?;

        let request = Request::get(uri)
            .header(header::ACCEPT, "application/json")
            .body(String::new())
            .map_err(|e| SourceError::InvalidUrl(format!("{shown}: {e}")))?;

        debug!(url = %shown, "GET");
        self.runtime.block_on(async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| SourceError::Transport(format!("{shown}: {e}")))?;

            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| SourceError::Transport(format!("{shown}: {e}")))?
                .to_bytes();

            if !status.is_success() {
                return Err(SourceError::Status {
                    status: status.as_u16(),
                    url: shown,
                });
            }

            serde_json::from_slice(&body).map_err(|e| SourceError::Decode(format!("{shown}: {e}")))
        })
    }
}

impl fmt::Debug for TrelloClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrelloClient")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TaskSource for TrelloClient {
    fn tasks(&self) -> Result<Vec<BoardTask>, SourceError> {
        let path = format!("/boards/{}/cards", self.credentials.board_id);
        let cards: Vec<CardDto> = self.get_json(&path, &[])?;
        Ok(cards
            .into_iter()
            .map(|card| BoardTask {
                id: card.id,
                title: card.name,
                description: card.desc,
                url: card.short_url,
            })
            .collect())
    }
}

impl CommentSource for TrelloClient {
    fn comments(&self, task_id: &str) -> Result<Vec<RawComment>, SourceError> {
        let path = format!("/cards/{task_id}/actions");
        let actions: Vec<ActionDto> = self.get_json(&path, &[("filter", "commentCard")])?;
        Ok(actions
            .into_iter()
            .filter_map(|action| action.data.text)
            .map(|text| RawComment::new(task_id, text))
            .collect())
    }
}

/// Percent-encode a query value, keeping RFC 3986 unreserved characters
fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TrelloClient {
        TrelloClient::new(
            TrelloCredentials::new("key 1", "tok&en", "board42"),
            "https://example.test/1/",
        )
        .unwrap()
    }

    #[test]
    fn url_carries_encoded_credentials() {
        let url = client().url("/cards/c1/actions", &[("filter", "commentCard")]);
        assert_eq!(
            url,
            "https://example.test/1/cards/c1/actions?key=key%201&token=tok%26en&filter=commentCard"
        );
    }

    #[test]
    fn debug_output_hides_secrets() {
        let shown = format!("{:?}", client());
        assert!(!shown.contains("tok&en"));
        assert!(!shown.contains("key 1"));
        assert!(shown.contains("board42"));
    }

    #[test]
    fn encode_keeps_unreserved() {
        assert_eq!(encode_query_value("aZ09-._~"), "aZ09-._~");
        assert_eq!(encode_query_value("a/b"), "a%2Fb");
    }
}
