use super::{AttemptError, GenerationRequest, StructuredBackend};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub type MockReply = Result<Option<String>, AttemptError>;

/// Scripted in-process backend.
///
/// Replies are queued per model and consumed in order; once a model's queue
/// holds a single reply it is repeated. Models with no scripted reply answer
/// with a 404. Clones share state, so a clone kept by the test can inspect
/// the calls made through the client.
#[derive(Clone, Default)]
pub struct MockBackend {
    replies: Arc<Mutex<HashMap<String, VecDeque<MockReply>>>>,
    calls: Arc<Mutex<Vec<String>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, model: &str, reply: MockReply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn with_json<T: Serialize>(self, model: &str, value: &T) -> Self {
        let text = serde_json::to_string(value).unwrap();
        self.with_reply(model, Ok(Some(text)))
    }

    pub fn with_error(self, model: &str, error: AttemptError) -> Self {
        self.with_reply(model, Err(error))
    }

    pub fn with_empty(self, model: &str) -> Self {
        self.with_reply(model, Ok(None))
    }

    /// Models called so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl StructuredBackend for MockBackend {
    async fn generate_json(&self, model: &str, request: &GenerationRequest) -> MockReply {
        self.calls.lock().unwrap().push(model.to_string());
        self.requests.lock().unwrap().push(request.clone());

        let mut replies = self.replies.lock().unwrap();
        match replies.get_mut(model) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(AttemptError::Status {
                status: 404,
                body: format!("models/{} is not found", model),
            }),
        }
    }
}
