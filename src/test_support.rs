//! Shared fixtures for unit tests: a scripted tracker, a manual clock, a
//! recording launcher and a harness that builds a [`Workflow`] over in-memory
//! stores.

use crate::app::Workflow;
use crate::domain::{IssueType, JiraflowError, Result, Ticket, Transition, User};
use crate::infrastructure::{Clock, Launcher};
use crate::jira::IssueTracker;
use crate::storage::{KeyValueStore, MemoryStore};
use crate::ui::{Emission, Feedback};
use crate::{Bookmark, Config};
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures_util::future::BoxFuture;
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::Barrier;

/// A cloneable in-memory sink.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl Default for ManualClock {
    fn default() -> Self {
        Self(Mutex::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()))
    }
}

impl ManualClock {
    pub fn advance(&self, seconds: i64) {
        *self.0.lock().unwrap() += Duration::seconds(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    tickets: HashMap<String, Vec<Ticket>>,
    search_results: Vec<Ticket>,
    users: Vec<User>,
    transitions: HashMap<String, Vec<Transition>>,
    issue_types: Vec<IssueType>,
    failing_jql: HashSet<String>,
    fail_worklogs: bool,
    rejects_credentials: bool,
    list_barrier: Option<Arc<Barrier>>,
    watched: HashSet<String>,
    calls: Vec<String>,
    worklogs: Vec<(String, u64)>,
    assignments: Vec<(String, String)>,
    comments: Vec<(String, String)>,
    transitioned: Vec<(String, String)>,
}

/// Scripted [`IssueTracker`] recording every call.
///
/// Unknown JQL returns an empty list; JQL registered with
/// [`failing_jql`](Self::failing_jql) returns a network error.
#[derive(Debug, Default)]
pub struct FakeTracker(Mutex<TrackerState>);

impl FakeTracker {
    pub fn with_tickets(self, jql: &str, tickets: Vec<Ticket>) -> Self {
        self.state().tickets.insert(jql.to_string(), tickets);
        self
    }

    pub fn with_search_results(self, tickets: Vec<Ticket>) -> Self {
        self.state().search_results = tickets;
        self
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        self.state().users = users;
        self
    }

    pub fn with_transitions(self, key: &str, transitions: Vec<Transition>) -> Self {
        self.state().transitions.insert(key.to_string(), transitions);
        self
    }

    pub fn with_issue_types(self, issue_types: Vec<IssueType>) -> Self {
        self.state().issue_types = issue_types;
        self
    }

    pub fn failing_jql(self, jql: &str) -> Self {
        self.state().failing_jql.insert(jql.to_string());
        self
    }

    /// Every ticket list and issue type lookup answers like a 401.
    pub fn rejecting_credentials(self) -> Self {
        self.state().rejects_credentials = true;
        self
    }

    /// `list_tickets` only returns once `parties` calls are waiting at once.
    pub fn with_list_barrier(self, parties: usize) -> Self {
        self.state().list_barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    pub fn fail_worklogs(&self, fail: bool) {
        self.state().fail_worklogs = fail;
    }

    /// Every call made, as `"<method> <args>"`.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn worklogs(&self) -> Vec<(String, u64)> {
        self.state().worklogs.clone()
    }

    pub fn assignments(&self) -> Vec<(String, String)> {
        self.state().assignments.clone()
    }

    pub fn comments(&self) -> Vec<(String, String)> {
        self.state().comments.clone()
    }

    pub fn transitioned(&self) -> Vec<(String, String)> {
        self.state().transitioned.clone()
    }

    pub fn watched(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.state().watched.iter().cloned().collect();
        keys.sort();
        keys
    }

    fn state(&self) -> std::sync::MutexGuard<'_, TrackerState> {
        self.0.lock().unwrap()
    }

    fn record(&self, call: String) -> std::sync::MutexGuard<'_, TrackerState> {
        let mut state = self.state();
        state.calls.push(call);
        state
    }
}

impl IssueTracker for FakeTracker {
    fn list_tickets<'a>(&'a self, jql: &'a str) -> BoxFuture<'a, Result<Vec<Ticket>>> {
        let state = self.record(format!("list_tickets {jql}"));
        let result = if state.rejects_credentials {
            Err(rejected())
        } else if state.failing_jql.contains(jql) {
            Err(JiraflowError::Network(format!("400: bad jql {jql}")))
        } else {
            Ok(state.tickets.get(jql).cloned().unwrap_or_default())
        };
        let barrier = state.list_barrier.clone();
        drop(state);
        Box::pin(async move {
            if let Some(barrier) = barrier {
                barrier.wait().await;
            }
            result
        })
    }

    fn search<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<Ticket>>> {
        let result = self.record(format!("search {text}")).search_results.clone();
        Box::pin(async move { Ok(result) })
    }

    fn list_users(&self) -> BoxFuture<'_, Result<Vec<User>>> {
        let result = self.record("list_users".to_string()).users.clone();
        Box::pin(async move { Ok(result) })
    }

    fn transitions<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Vec<Transition>>> {
        let state = self.record(format!("transitions {key}"));
        let result = state.transitions.get(key).cloned().unwrap_or_default();
        drop(state);
        Box::pin(async move { Ok(result) })
    }

    fn transition<'a>(
        &'a self,
        key: &'a str,
        transition_id: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        self.record(format!("transition {key} {transition_id}"))
            .transitioned
            .push((key.to_string(), transition_id.to_string()));
        Box::pin(async move { Ok(()) })
    }

    fn assign<'a>(&'a self, key: &'a str, username: &'a str) -> BoxFuture<'a, Result<()>> {
        self.record(format!("assign {key} {username}"))
            .assignments
            .push((key.to_string(), username.to_string()));
        Box::pin(async move { Ok(()) })
    }

    fn comment<'a>(&'a self, key: &'a str, body: &'a str) -> BoxFuture<'a, Result<()>> {
        self.record(format!("comment {key}"))
            .comments
            .push((key.to_string(), body.to_string()));
        Box::pin(async move { Ok(()) })
    }

    fn issue_types(&self) -> BoxFuture<'_, Result<Vec<IssueType>>> {
        let state = self.record("issue_types".to_string());
        let result = if state.rejects_credentials {
            Err(rejected())
        } else {
            Ok(state.issue_types.clone())
        };
        drop(state);
        Box::pin(async move { result })
    }

    fn add_worklog<'a>(&'a self, key: &'a str, seconds: u64) -> BoxFuture<'a, Result<()>> {
        let mut state = self.record(format!("add_worklog {key} {seconds}"));
        let result = if state.fail_worklogs {
            Err(JiraflowError::Network("503: worklog rejected".to_string()))
        } else {
            state.worklogs.push((key.to_string(), seconds));
            Ok(())
        };
        drop(state);
        Box::pin(async move { result })
    }

    fn watch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        self.record(format!("watch {key}")).watched.insert(key.to_string());
        Box::pin(async move { Ok(()) })
    }

    fn unwatch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        self.record(format!("unwatch {key}")).watched.remove(key);
        Box::pin(async move { Ok(()) })
    }
}

fn rejected() -> JiraflowError {
    JiraflowError::Unauthorized("Jira rejected the credentials".to_string())
}

/// Launcher that records instead of spawning.
#[derive(Debug, Default)]
pub struct FakeLauncher {
    refreshes: AtomicUsize,
    opened: Mutex<Vec<String>>,
}

impl FakeLauncher {
    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl Launcher for FakeLauncher {
    fn spawn_refresh(&self) -> Result<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub fn ticket(key: &str, summary: &str) -> Ticket {
    Ticket {
        key: key.to_string(),
        summary: summary.to_string(),
        status: "Open".to_string(),
        assignee: None,
        issue_type: Some("Task".to_string()),
        watching: false,
    }
}

pub fn user(name: &str, username: &str) -> User {
    User {
        name: name.to_string(),
        username: username.to_string(),
    }
}

/// A logged-in configuration with two bookmarks, `mine` and `team`.
pub fn configured() -> Config {
    Config {
        url: "https://jira.example.com".to_string(),
        username: "jdoe".to_string(),
        token: "secret".to_string(),
        bookmarks: vec![
            Bookmark {
                name: "Mine".to_string(),
                jql: "mine".to_string(),
                icon: Some("mine.png".to_string()),
            },
            Bookmark {
                name: "Team".to_string(),
                jql: "team".to_string(),
                icon: None,
            },
        ],
        ..Config::default()
    }
}

/// Owns the fakes and stores shared by successive invocations of a test.
pub struct Harness {
    pub config: Config,
    pub tracker: Arc<FakeTracker>,
    pub clock: Arc<ManualClock>,
    pub launcher: Arc<FakeLauncher>,
    pub data: Arc<MemoryStore>,
    pub session: Arc<MemoryStore>,
    dir: TempDir,
}

impl Harness {
    pub fn new(config: Config, tracker: FakeTracker) -> Self {
        Self {
            config,
            tracker: Arc::new(tracker),
            clock: Arc::new(ManualClock::default()),
            launcher: Arc::new(FakeLauncher::default()),
            data: Arc::new(MemoryStore::new()),
            session: Arc::new(MemoryStore::new()),
            dir: TempDir::new().unwrap(),
        }
    }

    /// Where invocations read and write `config.toml`. Nothing is written
    /// there until a command or the router saves the config.
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    /// A fresh workflow (one invocation) over the shared stores.
    ///
    /// Like a new process, it reads the saved config if one exists and
    /// otherwise starts from `self.config`.
    pub fn workflow(&self) -> Workflow {
        let path = self.config_path();
        let config = std::fs::read_to_string(&path)
            .map(|source| Config::from_toml(&source).unwrap())
            .unwrap_or_else(|_| self.config.clone());
        Workflow {
            config,
            config_path: path,
            tracker: self.tracker.clone(),
            data: self.data.clone(),
            session: self.session.clone(),
            feedback: Feedback::new(Box::new(SharedBuffer::default())),
            launcher: self.launcher.clone(),
            clock: self.clock.clone(),
        }
    }

    /// Runs one script-filter invocation through the standard router.
    pub async fn invoke(&self, query: &str) -> Emission {
        let router = crate::app::Router::standard().unwrap();
        let mut workflow = self.workflow();
        router.run(&mut workflow, query).await.unwrap();
        workflow.feedback.emission().cloned().unwrap()
    }

    /// Tracker calls made so far.
    pub fn network_calls(&self) -> usize {
        self.tracker.calls().len()
    }

    pub fn session_keys(&self) -> Vec<String> {
        self.session.keys().unwrap()
    }
}
