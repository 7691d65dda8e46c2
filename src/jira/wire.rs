//! Request and response bodies of the Jira REST API v2.
//!
//! Only the fields the workflow reads are modelled; serde ignores the rest.

use crate::domain::{IssueType, Ticket, Transition, User};
use serde::{Deserialize, Serialize};

/// Fields requested from the search endpoint.
pub const SEARCH_FIELDS: &str = "summary,status,assignee,issuetype,watches";

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<IssueBody>,
}

#[derive(Debug, Deserialize)]
pub struct IssueBody {
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Debug, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    pub status: Option<Named>,
    pub assignee: Option<UserBody>,
    pub issuetype: Option<Named>,
    pub watches: Option<Watches>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watches {
    #[serde(default)]
    pub is_watching: bool,
}

#[derive(Debug, Deserialize)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub display_name: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TransitionsResponse {
    #[serde(default)]
    pub transitions: Vec<TransitionBody>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionBody {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct IssueTypeBody {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subtask: bool,
}

#[derive(Debug, Serialize)]
pub struct TransitionRequest<'a> {
    pub transition: IdRef<'a>,
}

#[derive(Debug, Serialize)]
pub struct IdRef<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AssignRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CommentRequest<'a> {
    pub body: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklogRequest {
    pub time_spent_seconds: u64,
}

impl From<IssueBody> for Ticket {
    fn from(issue: IssueBody) -> Self {
        Self {
            key: issue.key,
            summary: issue.fields.summary,
            status: issue
                .fields
                .status
                .map_or_else(String::new, |status| status.name),
            assignee: issue.fields.assignee.map(|user| user.display_name),
            issue_type: issue.fields.issuetype.map(|kind| kind.name),
            watching: issue.fields.watches.is_some_and(|watches| watches.is_watching),
        }
    }
}

impl From<UserBody> for User {
    fn from(user: UserBody) -> Self {
        Self {
            name: user.display_name,
            username: user.name,
        }
    }
}

impl From<TransitionBody> for Transition {
    fn from(transition: TransitionBody) -> Self {
        Self {
            id: transition.id,
            name: transition.name,
        }
    }
}

impl From<IssueTypeBody> for IssueType {
    fn from(kind: IssueTypeBody) -> Self {
        Self {
            id: kind.id,
            name: kind.name,
            subtask: kind.subtask,
        }
    }
}
