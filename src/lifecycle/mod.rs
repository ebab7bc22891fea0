//! Post lifecycle transitions.
//!
//! Which actions a post offers is decided by `CAPABILITY_TABLE` alone. The
//! engine never guesses a post's next status: a successful action triggers a
//! full reload and the server's snapshot is what the board shows.

pub mod board;
pub mod gateway;
pub mod schedule;

use console_common::{BrandId, PostId, PostStatus};

use crate::errors::{GatewayError, TransitionError};
use crate::gateway::RequestGateway;
use crate::mount::Mounted;

pub use board::{ActionError, PostBoard};
pub use gateway::PostGateway;
pub use schedule::{ClientTimezone, ScheduleRequest, parse_local_input, resolve_schedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Publish,
    Schedule,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Publish => "publish",
            Action::Schedule => "schedule",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action controls exposed for a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub publish: bool,
    pub schedule: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        publish: false,
        schedule: false,
    };

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Publish => self.publish,
            Action::Schedule => self.schedule,
        }
    }
}

/// Status label → exposed controls. Labels missing here get none.
pub const CAPABILITY_TABLE: &[(&str, Capabilities)] = &[
    ("review_ready", Capabilities { publish: true, schedule: true }),
    ("approved", Capabilities { publish: true, schedule: true }),
    ("scheduled", Capabilities { publish: true, schedule: false }),
    ("posted", Capabilities::NONE),
    ("failed", Capabilities::NONE),
];

pub fn capabilities_for(status: &PostStatus) -> Capabilities {
    CAPABILITY_TABLE
        .iter()
        .find(|(label, _)| *label == status.as_str())
        .map(|(_, capabilities)| *capabilities)
        .unwrap_or(Capabilities::NONE)
}

/// Runs publish/schedule against one brand's post board.
pub struct LifecycleEngine<G> {
    gateway: PostGateway<G>,
    board: Mounted<PostBoard>,
    timezone: ClientTimezone,
}

impl<G: RequestGateway> LifecycleEngine<G> {
    pub fn new(brand_id: BrandId, gateway: G, timezone: ClientTimezone) -> Self {
        Self {
            gateway: PostGateway::new(gateway),
            board: Mounted::new(PostBoard::new(brand_id)),
            timezone,
        }
    }

    /// Shared handle to the board.
    pub fn board(&self) -> Mounted<PostBoard> {
        self.board.clone()
    }

    pub fn gateway(&self) -> &PostGateway<G> {
        &self.gateway
    }

    /// Tear down the board. In-flight completions are ignored afterwards.
    pub fn close(&self) {
        self.board.unmount();
    }

    /// Replace the board with the server's current post list.
    pub async fn reload(&self) -> Result<(), TransitionError> {
        let (brand_id, ticket) = self
            .board
            .with(|board| (board.brand_id(), board.begin_reload()))
            .ok_or(TransitionError::Detached)?;
        let posts = self.gateway.list(brand_id).await?;
        let count = posts.len();
        match self.board.with(|board| board.replace_all(ticket, posts)) {
            Some(true) => {
                tracing::info!(brand_id, posts = count, "post board reloaded");
                Ok(())
            }
            Some(false) => {
                tracing::debug!(brand_id, ticket, "stale post reload dropped");
                Ok(())
            }
            None => {
                tracing::debug!(brand_id, "post reload arrived after board closed; ignored");
                Err(TransitionError::Detached)
            }
        }
    }

    pub async fn publish(&self, post_id: PostId) -> Result<(), TransitionError> {
        self.precheck(post_id, Action::Publish)?;
        let outcome = self.gateway.publish(post_id).await;
        self.finish(post_id, Action::Publish, outcome).await
    }

    /// Schedule `post_id` at the operator's local wall-clock `local` time.
    pub async fn schedule(&self, post_id: PostId, local: Option<&str>) -> Result<(), TransitionError> {
        self.precheck(post_id, Action::Schedule)?;
        let request = resolve_schedule(&self.timezone, local)?;
        tracing::info!(
            post_id,
            scheduled_for = %request.scheduled_for,
            timezone = %request.scheduled_timezone,
            "scheduling post"
        );
        let outcome = self.gateway.schedule(post_id, &request).await;
        self.finish(post_id, Action::Schedule, outcome).await
    }

    fn precheck(&self, post_id: PostId, action: Action) -> Result<(), TransitionError> {
        self.board
            .read(|board| board.check(post_id, action))
            .ok_or(TransitionError::Detached)?
    }

    async fn finish(
        &self,
        post_id: PostId,
        action: Action,
        outcome: Result<(), GatewayError>,
    ) -> Result<(), TransitionError> {
        match outcome {
            Ok(()) => {
                tracing::info!(post_id, action = %action, "post transition accepted");
                self.board.with(|board| board.clear_error(post_id));
                match self.reload().await {
                    Err(TransitionError::Gateway(err)) => {
                        tracing::warn!(
                            post_id,
                            action = %action,
                            error = %err,
                            "post transition accepted but reload failed"
                        );
                        Err(TransitionError::ReloadFailed {
                            action: action.as_str(),
                            source: err,
                        })
                    }
                    other => other,
                }
            }
            Err(err) => {
                tracing::warn!(post_id, action = %action, error = %err, "post transition failed");
                let message = err.user_message();
                if self
                    .board
                    .with(|board| board.record_error(post_id, action, message))
                    .is_none()
                {
                    tracing::debug!(post_id, "transition failure arrived after board closed; ignored");
                }
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn test_post(id: PostId, status: &str) -> console_common::PostRecord {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "status": status,
        "created_at": "2024-05-01T09:00:00Z"
    }))
    .unwrap()
}
