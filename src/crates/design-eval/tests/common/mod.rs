//! Common test utilities and setup

use async_trait::async_trait;
use design_eval::DesignImage;
use llm::{ChatModel, ChatRequest, ChatResponse, LlmError, Message};
use std::sync::{Arc, Mutex};

/// What a [`StubModel`] answers with.
pub enum Reply {
    Text(String),
    Fail(fn() -> LlmError),
}

/// Chat model that returns a canned reply and records every request.
pub struct StubModel {
    reply: Reply,
    requests: Mutex<Vec<ChatRequest>>,
}

impl StubModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Text(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: fn() -> LlmError) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Fail(err),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// System prompt text of the last request.
    pub fn last_system_prompt(&self) -> String {
        let requests = self.requests.lock().unwrap();
        let request = requests.last().expect("no request recorded");
        request
            .system_message()
            .expect("no system message")
            .text()
    }
}

#[async_trait]
impl ChatModel for StubModel {
    async fn chat(&self, request: ChatRequest) -> llm::Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Reply::Text(text) => Ok(ChatResponse::new(Message::assistant(text.clone()))),
            Reply::Fail(make) => Err(make()),
        }
    }

    fn model_name(&self) -> &str {
        "stub-vision"
    }
}

/// A small solid-colour PNG.
pub fn test_image() -> DesignImage {
    let image = image::DynamicImage::new_rgb8(8, 8);
    DesignImage::from_dynamic_image(&image).expect("encode test image")
}
