//! In-memory stand-ins for the user directory and FCM.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use rissala_firebase::{FcmMessage, FirebaseError, PushSender, UserDirectory, UserRecord};
use rissala_notifications::{routes, NotificationState};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const CHANNEL_ID: &str = "rissala_channel";

#[derive(Default)]
pub struct InMemoryDirectory {
    users: Mutex<BTreeMap<String, UserRecord>>,
    writes: Mutex<Vec<(String, String)>>,
    reads: AtomicUsize,
    fail_reads: bool,
    fail_writes: bool,
}

impl InMemoryDirectory {
    pub fn with_users<'a>(users: impl IntoIterator<Item = (&'a str, Option<&'a str>)>) -> Self {
        let directory = Self::default();
        {
            let mut map = directory.users.lock().unwrap();
            for (user_id, token) in users {
                map.insert(
                    user_id.to_string(),
                    UserRecord {
                        fcm_token: token.map(str::to_string),
                    },
                );
            }
        }
        directory
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn token_of(&self, user_id: &str) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .get(user_id)
            .and_then(|record| record.fcm_token.clone())
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, FirebaseError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(FirebaseError::DatabaseError("503 Service Unavailable".into()));
        }
        Ok(self.users.lock().unwrap().get(user_id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<(String, UserRecord)>, FirebaseError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(FirebaseError::DatabaseError("503 Service Unavailable".into()));
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect())
    }

    async fn set_device_token(&self, user_id: &str, token: &str) -> Result<(), FirebaseError> {
        self.writes
            .lock()
            .unwrap()
            .push((user_id.to_string(), token.to_string()));
        if self.fail_writes {
            return Err(FirebaseError::DatabaseError("401 Permission denied".into()));
        }
        self.users.lock().unwrap().insert(
            user_id.to_string(),
            UserRecord::with_token(token),
        );
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPush {
    sent: Mutex<Vec<FcmMessage>>,
    failing_tokens: HashSet<String>,
    fail_all: bool,
}

impl RecordingPush {
    pub fn failing_all() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn failing_for(tokens: &[&str]) -> Self {
        Self {
            failing_tokens: tokens.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<FcmMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_tokens(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .map(|message| message.message.token)
            .collect()
    }
}

#[async_trait]
impl PushSender for RecordingPush {
    async fn send(&self, message: &FcmMessage) -> Result<String, FirebaseError> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail_all || self.failing_tokens.contains(&message.message.token) {
            return Err(FirebaseError::ApiError("404 UNREGISTERED".into()));
        }
        let index = self.sent.lock().unwrap().len();
        Ok(format!("projects/liptako-commerce/messages/{}", index))
    }
}

pub struct TestApp {
    pub router: Router,
    pub directory: Arc<InMemoryDirectory>,
    pub push: Arc<RecordingPush>,
}

impl TestApp {
    pub fn new(directory: InMemoryDirectory, push: RecordingPush) -> Self {
        let directory = Arc::new(directory);
        let push = Arc::new(push);
        let state = Arc::new(NotificationState::new(
            directory.clone(),
            push.clone(),
            CHANNEL_ID,
        ));
        let router = Router::new().nest("/api", routes(state));
        Self {
            router,
            directory,
            push,
        }
    }

    /// POSTs a raw body and returns the status and parsed JSON response.
    pub async fn post_raw(&self, uri: &str, body: &str) -> (u16, serde_json::Value) {
        let request = Request::builder()
            .uri(uri)
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    pub async fn post(&self, uri: &str, body: serde_json::Value) -> (u16, serde_json::Value) {
        self.post_raw(uri, &body.to_string()).await
    }
}
