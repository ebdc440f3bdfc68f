//! Shared test helpers for orchestration tests.

use async_trait::async_trait;
use chatrelay_core::error::ProviderError;
use chatrelay_core::provider::{
    Provider, ProviderRequest, ProviderResponse, StreamChunk, ToolCallDelta,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// One scripted item: a chunk to deliver or an error to inject.
pub type ScriptedChunk = Result<StreamChunk, ProviderError>;

/// A mock provider that replays scripted chunk sequences, one per round.
///
/// Each call to `stream` pops the next round's script and records the
/// request for later assertions. Panics if more rounds are requested than
/// scripted.
pub struct ScriptedStreamProvider {
    rounds: Mutex<VecDeque<Vec<ScriptedChunk>>>,
    requests: Mutex<Vec<ProviderRequest>>,
    chunks_sent: Arc<AtomicUsize>,
    producer_exited: Arc<Notify>,
}

impl ScriptedStreamProvider {
    pub fn new(rounds: Vec<Vec<ScriptedChunk>>) -> Self {
        Self {
            rounds: Mutex::new(rounds.into()),
            requests: Mutex::new(Vec::new()),
            chunks_sent: Arc::new(AtomicUsize::new(0)),
            producer_exited: Arc::new(Notify::new()),
        }
    }

    /// The requests this provider has received, in order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// How many chunks were successfully delivered to a consumer.
    pub fn chunks_sent(&self) -> usize {
        self.chunks_sent.load(Ordering::SeqCst)
    }

    /// Wait until the most recent round's producer task has stopped.
    pub async fn wait_for_producer_exit(&self) {
        self.producer_exited.notified().await;
    }
}

#[async_trait]
impl Provider for ScriptedStreamProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        _request: ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::NotConfigured(
            "scripted provider is stream-only".into(),
        ))
    }

    async fn stream(
        &self,
        request: ProviderRequest,
    ) -> Result<
        tokio::sync::mpsc::Receiver<Result<StreamChunk, ProviderError>>,
        ProviderError,
    > {
        self.requests.lock().unwrap().push(request);

        let script = self
            .rounds
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedStreamProvider: no more scripted rounds");

        // Capacity 1 so a stalled or vanished consumer blocks the producer,
        // which is exactly what the cancellation tests observe.
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        let chunks_sent = self.chunks_sent.clone();
        let producer_exited = self.producer_exited.clone();

        tokio::spawn(async move {
            for item in script {
                if tx.send(item).await.is_err() {
                    break; // receiver dropped
                }
                chunks_sent.fetch_add(1, Ordering::SeqCst);
            }
            producer_exited.notify_one();
        });

        Ok(rx)
    }
}

/// A chunk carrying only a text increment.
pub fn text_chunk(text: &str) -> ScriptedChunk {
    Ok(StreamChunk {
        content: Some(text.to_string()),
        ..StreamChunk::default()
    })
}

/// A chunk carrying one tool-call delta fragment.
pub fn delta_chunk(
    index: u32,
    id: Option<&str>,
    name: Option<&str>,
    arguments: Option<&str>,
) -> ScriptedChunk {
    Ok(StreamChunk {
        tool_call_deltas: vec![ToolCallDelta {
            index,
            id: id.map(String::from),
            name: name.map(String::from),
            arguments: arguments.map(String::from),
        }],
        ..StreamChunk::default()
    })
}

/// The terminal chunk of a round.
pub fn done_chunk() -> ScriptedChunk {
    Ok(StreamChunk {
        done: true,
        ..StreamChunk::default()
    })
}

/// An injected upstream failure.
pub fn error_chunk(error: ProviderError) -> ScriptedChunk {
    Err(error)
}
