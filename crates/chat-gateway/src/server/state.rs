//! Gateway state
//!
//! Process-scoped coordination state, created at startup and passed to every
//! handler explicitly.

use std::sync::Arc;
use std::time::Instant;

use chat_common::AppConfig;
use chat_service::{RoomDirectory, ServiceContext};

use crate::broadcast::{MessagePipeline, PresenceBroadcaster, TypingRelay};
use crate::connection::{Connection, ConnectionRegistry, RoomMembershipIndex};

/// Shared state for the gateway server
#[derive(Clone)]
pub struct GatewayState {
    service_context: ServiceContext,
    registry: Arc<ConnectionRegistry>,
    membership: Arc<RoomMembershipIndex>,
    presence: Arc<PresenceBroadcaster>,
    pipeline: Arc<MessagePipeline>,
    typing: Arc<TypingRelay>,
    directory: Arc<RoomDirectory>,
    config: Arc<AppConfig>,
    started_at: Instant,
}

impl GatewayState {
    /// Wire up the coordination core
    ///
    /// The directory should already be loaded.
    pub fn new(
        service_context: ServiceContext,
        directory: Arc<RoomDirectory>,
        config: AppConfig,
    ) -> Self {
        let registry = ConnectionRegistry::new_shared();
        let membership = Arc::new(RoomMembershipIndex::new());
        let presence = Arc::new(PresenceBroadcaster::new(
            Arc::clone(&registry),
            Arc::clone(&membership),
        ));
        let pipeline = Arc::new(MessagePipeline::new(
            service_context.clone(),
            Arc::clone(&presence),
            config.gateway.room_queue_capacity,
        ));
        let typing = Arc::new(TypingRelay::new(Arc::clone(&presence)));

        Self {
            service_context,
            registry,
            membership,
            presence,
            pipeline,
            typing,
            directory,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn membership(&self) -> &RoomMembershipIndex {
        &self.membership
    }

    pub fn presence(&self) -> &PresenceBroadcaster {
        &self.presence
    }

    pub fn pipeline(&self) -> &Arc<MessagePipeline> {
        &self.pipeline
    }

    pub fn typing(&self) -> &TypingRelay {
        &self.typing
    }

    pub fn directory(&self) -> &RoomDirectory {
        &self.directory
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Check that a resumed handler may still act for `connection`
    ///
    /// False once teardown has started or the session is gone.
    pub fn is_live(&self, connection: &Connection) -> bool {
        connection.is_alive() && self.registry.is_registered(connection.id())
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("registry", &self.registry)
            .field("pipeline", &self.pipeline)
            .field("directory", &self.directory)
            .finish()
    }
}
