//! Orchestration of resolve, permission check, cooldown, and invocation.

use crate::command::Action;
use crate::context::CommandContext;
use crate::index::CommandIndex;
use crate::resolver::CommandResolver;
use crate::services::{IdentityLookup, Services};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, trace};
use warden_common::ChatMessage;

/// Turns inbound chat messages into at most one authorized, rate-limited
/// command invocation.
///
/// Rejections along the way are silent: an unauthorized or throttled
/// attempt is indistinguishable from an unrecognized command, so chatters
/// learn nothing about commands they may not run.
pub struct Dispatcher {
    index: Arc<CommandIndex>,
    resolver: CommandResolver,
    identity: Arc<dyn IdentityLookup>,
    services: Arc<Services>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given index and collaborators.
    #[must_use]
    pub fn new(
        index: Arc<CommandIndex>,
        identity: Arc<dyn IdentityLookup>,
        services: Arc<Services>,
    ) -> Self {
        let resolver = CommandResolver::new(services.prefix.clone());
        Self {
            index,
            resolver,
            identity,
            services,
        }
    }

    /// Handles one inbound message: resolve, gate, invoke.
    pub async fn handle(&self, message: ChatMessage) {
        let Some(resolution) = self.resolver.resolve(&self.index, &message.text) else {
            return;
        };
        let command = resolution.command;

        let caller_weight = self.identity.effective_weight(&message).await;
        if !command.level().allows(caller_weight) {
            trace!(
                "'{}' denied '{}': weight {} below {}",
                message.author.login,
                command.name(),
                caller_weight,
                command.level()
            );
            return;
        }

        if !command.cooldown().check_and_start(Instant::now()) {
            debug!("command '{}' is on cooldown", command.name());
            return;
        }

        match command.action() {
            Action::Custom { response } => {
                if let Err(e) = self
                    .services
                    .sink
                    .send(&message.channel, response)
                    .await
                {
                    error!("failed to send custom command response: {e}");
                }
            }
            Action::Native(handler) => {
                let context = CommandContext {
                    command: Arc::clone(&command),
                    args: resolution.args,
                    message,
                    caller_weight,
                    services: Arc::clone(&self.services),
                };
                if let Err(e) = handler(context).await {
                    error!("command '{}' failed: {e}", command.name());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::HandlerFuture;
    use crate::level::CommandLevel;
    use crate::registry::NativeCommand;
    use crate::services::{ChannelControl, ChatSink, ProfileService};
    use crate::store::{CustomCommandRecord, MemoryStore};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use parking_lot::Mutex;
    use warden_common::{Author, ChannelName, Result};

    /// Sink that records every outbound line.
    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingSink {
        fn lines(&self) -> Vec<String> {
            self.sent.lock().iter().map(|(_, t)| t.clone()).collect()
        }
    }

    #[async_trait]
    impl ChatSink for RecordingSink {
        async fn send(&self, channel: &ChannelName, text: &str) -> Result<()> {
            self.sent
                .lock()
                .push((channel.as_str().to_string(), text.to_string()));
            Ok(())
        }
    }

    struct NoopChannels;

    #[async_trait]
    impl ChannelControl for NoopChannels {
        async fn join(&self, _channel: &ChannelName, _permanent: bool) -> Result<()> {
            Ok(())
        }
        async fn part(&self, _channel: &ChannelName, _permanent: bool) -> Result<()> {
            Ok(())
        }
    }

    struct NoopProfile;

    #[async_trait]
    impl ProfileService for NoopProfile {
        async fn user_exists(&self, _login: &str) -> Result<bool> {
            Ok(false)
        }
        async fn is_follower(&self, _user_id: &str, _room_id: &str) -> Result<bool> {
            Ok(false)
        }
        async fn follower_count(&self, _room_id: &str) -> Result<u64> {
            Ok(0)
        }
        async fn stream_started_at(&self, _room_id: &str) -> Result<Option<DateTime<Utc>>> {
            Ok(None)
        }
    }

    /// Identity that always resolves to a fixed weight.
    struct FixedIdentity(i64);

    #[async_trait]
    impl IdentityLookup for FixedIdentity {
        async fn effective_weight(&self, _message: &ChatMessage) -> i64 {
            self.0
        }
    }

    fn pong(ctx: CommandContext) -> HandlerFuture {
        Box::pin(async move { ctx.mention("Pong!").await })
    }

    fn message(text: &str) -> ChatMessage {
        ChatMessage {
            channel: ChannelName::new("#sep"),
            room_id: Some("123".to_string()),
            author: Author {
                login: "viewer".to_string(),
                display_name: "Viewer".to_string(),
                user_id: Some("456".to_string()),
                is_moderator: false,
                is_subscriber: false,
            },
            text: text.to_string(),
            sent_at: Utc::now(),
        }
    }

    async fn dispatcher_with(
        natives: Vec<NativeCommand>,
        records: Vec<CustomCommandRecord>,
        caller_weight: i64,
    ) -> (Dispatcher, Arc<RecordingSink>) {
        let store = Arc::new(MemoryStore::with_records(records));
        let index = Arc::new(CommandIndex::build(natives, store).await.unwrap());
        let sink = Arc::new(RecordingSink::default());
        let services = Arc::new(Services {
            index: Arc::clone(&index),
            sink: Arc::clone(&sink) as Arc<dyn ChatSink>,
            channels: Arc::new(NoopChannels),
            profile: Arc::new(NoopProfile),
            prefix: "+".to_string(),
        });
        let dispatcher = Dispatcher::new(index, Arc::new(FixedIdentity(caller_weight)), services);
        (dispatcher, sink)
    }

    fn ping_decl(level: CommandLevel, cooldown_secs: u64) -> NativeCommand {
        NativeCommand {
            name: "ping",
            aliases: &[],
            description: "Replies with Pong!",
            level,
            cooldown_secs,
            visible: true,
            handler: pong,
        }
    }

    #[tokio::test]
    async fn test_authorized_command_replies() {
        let (dispatcher, sink) =
            dispatcher_with(vec![ping_decl(CommandLevel::All, 0)], Vec::new(), 0).await;

        dispatcher.handle(message("+ping")).await;
        assert_eq!(sink.lines(), vec!["@Viewer Pong!"]);
    }

    #[tokio::test]
    async fn test_insufficient_weight_is_silent() {
        let (dispatcher, sink) = dispatcher_with(
            vec![ping_decl(CommandLevel::Moderator, 0)],
            Vec::new(),
            150,
        )
        .await;

        dispatcher.handle(message("+ping")).await;
        assert!(sink.lines().is_empty());
    }

    #[tokio::test]
    async fn test_boundary_weight_authorizes() {
        let (dispatcher, sink) = dispatcher_with(
            vec![ping_decl(CommandLevel::Moderator, 0)],
            Vec::new(),
            CommandLevel::Moderator.weight(),
        )
        .await;

        dispatcher.handle(message("+ping")).await;
        assert_eq!(sink.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_cooldown_throttles_second_call() {
        let (dispatcher, sink) =
            dispatcher_with(vec![ping_decl(CommandLevel::All, 600)], Vec::new(), 0).await;

        dispatcher.handle(message("+ping")).await;
        dispatcher.handle(message("+ping")).await;
        assert_eq!(sink.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_attempt_does_not_start_cooldown() {
        let decl = ping_decl(CommandLevel::Moderator, 600);
        let store = Arc::new(MemoryStore::new());
        let index = Arc::new(CommandIndex::build(vec![decl], store).await.unwrap());
        let sink = Arc::new(RecordingSink::default());
        let services = Arc::new(Services {
            index: Arc::clone(&index),
            sink: Arc::clone(&sink) as Arc<dyn ChatSink>,
            channels: Arc::new(NoopChannels),
            profile: Arc::new(NoopProfile),
            prefix: "+".to_string(),
        });

        // A viewer bounces off the permission gate...
        let viewer = Dispatcher::new(
            Arc::clone(&index),
            Arc::new(FixedIdentity(0)),
            Arc::clone(&services),
        );
        viewer.handle(message("+ping")).await;
        assert!(sink.lines().is_empty());

        // ...and the cooldown window has not been consumed by the attempt.
        let moderator = Dispatcher::new(
            index,
            Arc::new(FixedIdentity(CommandLevel::Moderator.weight())),
            services,
        );
        moderator.handle(message("+ping")).await;
        assert_eq!(sink.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_command_emits_response_verbatim() {
        let record = CustomCommandRecord::new("hug", "puts its arms around chat", i64::MIN);
        let (dispatcher, sink) = dispatcher_with(Vec::new(), vec![record], 0).await;

        dispatcher.handle(message("+hug")).await;
        assert_eq!(sink.lines(), vec!["puts its arms around chat"]);
    }

    #[tokio::test]
    async fn test_unresolved_and_unprefixed_are_silent() {
        let (dispatcher, sink) =
            dispatcher_with(vec![ping_decl(CommandLevel::All, 0)], Vec::new(), 0).await;

        dispatcher.handle(message("ping")).await;
        dispatcher.handle(message("+nosuch")).await;
        dispatcher.handle(message("hello chat")).await;
        assert!(sink.lines().is_empty());
    }
}
