//! REST client for Jira Server / Data Center (API v2).

use super::wire::{
    AssignRequest, CommentRequest, IdRef, IssueTypeBody, SearchResponse, TransitionRequest,
    TransitionsResponse, UserBody, WorklogRequest, SEARCH_FIELDS,
};
use super::IssueTracker;
use crate::domain::{IssueType, JiraflowError, Result, Ticket, Transition, User};
use crate::Config;
use futures_util::future::BoxFuture;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Header in which Jira explains a 403, e.g. `CAPTCHA_CHALLENGE; login-url=...`.
const DENIED_REASON_HEADER: &str = "x-authentication-denied-reason";

/// Upper bound on tickets returned by one search.
const MAX_RESULTS: &str = "100";

/// [`IssueTracker`] over HTTP basic auth.
///
/// Requests fail with [`JiraflowError::Configuration`] when the credentials
/// are missing, [`JiraflowError::Unauthorized`] when Jira rejects them (HTTP
/// 401) and [`JiraflowError::AccessDenied`] on HTTP 403. Any other
/// non-success status becomes [`JiraflowError::Network`] carrying the status
/// line.
#[derive(Debug, Clone)]
pub struct JiraClient {
    base_url: String,
    username: String,
    token: String,
    client: reqwest::Client,
}

impl JiraClient {
    /// Creates a client from the workflow configuration.
    ///
    /// Missing credentials are not an error here; they are reported by the
    /// first request.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("jiraflow/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            username: config.username.clone(),
            token: config.token.clone(),
            client,
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        if self.base_url.is_empty() || self.username.is_empty() || self.token.is_empty() {
            return Err(JiraflowError::Configuration(
                "url, username and token must be set".to_string(),
            ));
        }

        Ok(self
            .client
            .request(method, format!("{}/rest/api/2{path}", self.base_url))
            .basic_auth(&self.username, Some(&self.token)))
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let denied_reason = response
            .headers()
            .get(DENIED_REASON_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "(no body)".to_string());
        tracing::warn!(%status, reason = ?denied_reason, body = %body, "jira request failed");

        Err(status_error(status, denied_reason.as_deref()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        tracing::debug!(path, "GET");
        let response = self.request(Method::GET, path)?.query(query).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn send<B: Serialize + Sync>(&self, method: Method, path: &str, body: &B) -> Result<()> {
        tracing::debug!(path, %method, "sending");
        let response = self.request(method, path)?.json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn search_jql(&self, jql: &str) -> Result<Vec<Ticket>> {
        let response: SearchResponse = self
            .get(
                "/search",
                &[
                    ("jql", jql),
                    ("fields", SEARCH_FIELDS),
                    ("maxResults", MAX_RESULTS),
                ],
            )
            .await?;
        let tickets: Vec<Ticket> = response.issues.into_iter().map(Ticket::from).collect();
        tracing::debug!(jql, count = tickets.len(), "listed tickets");
        Ok(tickets)
    }
}

/// Classifies a non-success status.
fn status_error(status: StatusCode, denied_reason: Option<&str>) -> JiraflowError {
    match status {
        StatusCode::UNAUTHORIZED => {
            JiraflowError::Unauthorized("Jira rejected the credentials".to_string())
        }
        StatusCode::FORBIDDEN => JiraflowError::AccessDenied(
            denied_reason.map_or_else(|| "403 Forbidden".to_string(), str::to_string),
        ),
        _ => JiraflowError::Network(format!(
            "{}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("request failed")
        )),
    }
}

/// Escapes a free-text term for use inside a quoted JQL string.
fn quote_jql(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

impl IssueTracker for JiraClient {
    fn list_tickets<'a>(&'a self, jql: &'a str) -> BoxFuture<'a, Result<Vec<Ticket>>> {
        Box::pin(self.search_jql(jql))
    }

    fn search<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<Ticket>>> {
        Box::pin(async move {
            let jql = format!("text ~ \"{}\" ORDER BY updated DESC", quote_jql(text));
            self.search_jql(&jql).await
        })
    }

    fn list_users(&self) -> BoxFuture<'_, Result<Vec<User>>> {
        Box::pin(async move {
            let users: Vec<UserBody> = self
                .get("/user/search", &[("username", "."), ("maxResults", "1000")])
                .await?;
            Ok(users.into_iter().map(User::from).collect())
        })
    }

    fn transitions<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Vec<Transition>>> {
        Box::pin(async move {
            let response: TransitionsResponse =
                self.get(&format!("/issue/{key}/transitions"), &[]).await?;
            Ok(response
                .transitions
                .into_iter()
                .map(Transition::from)
                .collect())
        })
    }

    fn transition<'a>(
        &'a self,
        key: &'a str,
        transition_id: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let body = TransitionRequest {
                transition: IdRef { id: transition_id },
            };
            self.send(Method::POST, &format!("/issue/{key}/transitions"), &body)
                .await
        })
    }

    fn assign<'a>(&'a self, key: &'a str, username: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let body = AssignRequest { name: username };
            self.send(Method::PUT, &format!("/issue/{key}/assignee"), &body)
                .await
        })
    }

    fn comment<'a>(&'a self, key: &'a str, body: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let body = CommentRequest { body };
            self.send(Method::POST, &format!("/issue/{key}/comment"), &body)
                .await
        })
    }

    fn issue_types(&self) -> BoxFuture<'_, Result<Vec<IssueType>>> {
        Box::pin(async move {
            let kinds: Vec<IssueTypeBody> = self.get("/issuetype", &[]).await?;
            Ok(kinds.into_iter().map(IssueType::from).collect())
        })
    }

    fn add_worklog<'a>(&'a self, key: &'a str, seconds: u64) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let body = WorklogRequest {
                time_spent_seconds: seconds,
            };
            self.send(Method::POST, &format!("/issue/{key}/worklog"), &body)
                .await
        })
    }

    fn watch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        // The body is the bare username as a JSON string.
        Box::pin(async move {
            self.send(Method::POST, &format!("/issue/{key}/watchers"), &self.username)
                .await
        })
    }

    fn unwatch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let path = format!("/issue/{key}/watchers");
            tracing::debug!(path, "DELETE");
            let response = self
                .request(Method::DELETE, &path)?
                .query(&[("username", self.username.as_str())])
                .send()
                .await?;
            Self::check(response).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jql_quoting_escapes_quotes_and_backslashes() {
        assert_eq!(quote_jql(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(quote_jql(r"a\b"), r"a\\b");
    }

    #[test]
    fn rejected_and_forbidden_statuses_are_distinct() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, None),
            JiraflowError::Unauthorized(_)
        ));

        let denied = status_error(StatusCode::FORBIDDEN, Some("CAPTCHA_CHALLENGE"));
        assert_eq!(denied.to_string(), "Access denied: CAPTCHA_CHALLENGE");

        let other = status_error(StatusCode::BAD_GATEWAY, None);
        assert_eq!(other.to_string(), "Network error: 502: Bad Gateway");
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_a_request() {
        let client = JiraClient::new(&Config::default()).unwrap();
        let err = client.list_users().await.unwrap_err();
        assert!(matches!(err, JiraflowError::Configuration(_)));
    }
}
