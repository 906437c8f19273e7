//! Message pipeline
//!
//! Validate, persist, then fan out. Each room owns one writer task fed by a
//! bounded queue, so within a room the delivery order equals the commit
//! order. A full queue makes submitters wait.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chat_core::{ConnectionId, Message, NewMessage};
use chat_service::{MessageService, ServiceContext, ServiceError, ServiceResult};
use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::PresenceBroadcaster;
use crate::protocol::ServerEvent;

/// One queued write
struct WriteJob {
    draft: NewMessage,
    reply: oneshot::Sender<ServiceResult<Message>>,
}

/// Queue and task serving one room
struct RoomWriter {
    queue: mpsc::Sender<WriteJob>,
    task: JoinHandle<()>,
}

/// Persist-then-fanout pipeline
pub struct MessagePipeline {
    ctx: ServiceContext,
    presence: Arc<PresenceBroadcaster>,
    writers: DashMap<String, RoomWriter>,
    queue_capacity: usize,
    closed: AtomicBool,
}

impl MessagePipeline {
    pub fn new(
        ctx: ServiceContext,
        presence: Arc<PresenceBroadcaster>,
        queue_capacity: usize,
    ) -> Self {
        Self {
            ctx,
            presence,
            writers: DashMap::new(),
            queue_capacity: queue_capacity.max(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Submit chat text on behalf of a joined connection
    ///
    /// The room is taken from the session now; a room switch while the write
    /// is queued does not redirect it. Invalid text is rejected before it is
    /// queued, so it is never stored or broadcast.
    pub async fn submit(&self, id: &ConnectionId, raw_text: &str) -> ServiceResult<Message> {
        let session = self.presence.registry().lookup(id)?;
        let draft = MessageService::new(&self.ctx).prepare(&session, raw_text)?;

        let (reply, done) = oneshot::channel();
        let queue = self.queue_for(&draft.room)?;

        queue
            .send(WriteJob { draft, reply })
            .await
            .map_err(|_| ServiceError::internal("message pipeline is shut down"))?;

        done.await
            .map_err(|_| ServiceError::internal("message writer stopped"))?
    }

    /// Most recent `limit` messages of `room`, oldest first
    pub async fn history(&self, room: &str, limit: i64) -> ServiceResult<Vec<Message>> {
        MessageService::new(&self.ctx).history(room, limit).await
    }

    /// Rooms with a running writer
    pub fn active_rooms(&self) -> usize {
        self.writers.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stop accepting writes and wait for queued ones to finish
    pub async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let rooms: Vec<String> = self.writers.iter().map(|w| w.key().clone()).collect();
        let tasks: Vec<JoinHandle<()>> = rooms
            .iter()
            .filter_map(|room| self.writers.remove(room))
            .map(|(_, writer)| {
                // Dropping the sender lets the writer drain and exit
                drop(writer.queue);
                writer.task
            })
            .collect();

        let count = tasks.len();
        for result in futures::future::join_all(tasks).await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Room writer panicked");
            }
        }

        tracing::info!(writers = count, "Message pipeline drained");
    }

    fn queue_for(&self, room: &str) -> ServiceResult<mpsc::Sender<WriteJob>> {
        if self.is_closed() {
            return Err(ServiceError::internal("message pipeline is shut down"));
        }

        let writer = self
            .writers
            .entry(room.to_string())
            .or_insert_with(|| self.spawn_writer(room));

        Ok(writer.queue.clone())
    }

    fn spawn_writer(&self, room: &str) -> RoomWriter {
        let (queue, jobs) = mpsc::channel(self.queue_capacity);
        let task = tokio::spawn(run_writer(
            room.to_string(),
            jobs,
            self.ctx.clone(),
            Arc::clone(&self.presence),
        ));

        tracing::debug!(room = %room, "Room writer started");
        RoomWriter { queue, task }
    }
}

impl std::fmt::Debug for MessagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagePipeline")
            .field("writers", &self.active_rooms())
            .field("queue_capacity", &self.queue_capacity)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Writer loop: one message at a time, broadcast only after commit
async fn run_writer(
    room: String,
    mut jobs: mpsc::Receiver<WriteJob>,
    ctx: ServiceContext,
    presence: Arc<PresenceBroadcaster>,
) {
    let service = MessageService::new(&ctx);

    while let Some(WriteJob { draft, reply }) = jobs.recv().await {
        let result = service.persist(&draft).await;

        if let Ok(message) = &result {
            let event = ServerEvent::NewMessage(message.clone());
            presence.notify(&room, &event, None);
        }

        // Submitter may have gone away; the message is stored regardless
        let _ = reply.send(result);
    }

    tracing::debug!(room = %room, "Room writer stopped");
}
