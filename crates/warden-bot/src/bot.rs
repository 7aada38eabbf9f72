//! Bot wiring: startup order, channel management, and the read loop.

use crate::helix::{DisabledProfile, HelixClient};
use crate::identity::TwitchIdentity;
use crate::irc::{self, IrcEvent, IrcWriter};
use crate::persistence::JsonFileStore;
use anyhow::{bail, Context};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tracing::{debug, error, info, warn};
use warden_commands::{
    native_commands, ChannelControl, ChatSink, CommandIndex, CustomCommandStore, Dispatcher,
    ProfileService, Services,
};
use warden_common::{ChannelName, Result};
use warden_config::Config;

/// Joins and parts channels on the transport, keeping the permanent
/// roster in sync for restarts.
struct ChannelManager {
    writer: Arc<IrcWriter>,
    store: Arc<JsonFileStore>,
}

#[async_trait]
impl ChannelControl for ChannelManager {
    async fn join(&self, channel: &ChannelName, permanent: bool) -> Result<()> {
        self.writer.join(channel).await?;
        if permanent {
            self.store.add_channel(channel.as_str())?;
        }
        Ok(())
    }

    async fn part(&self, channel: &ChannelName, permanent: bool) -> Result<()> {
        self.writer.part(channel).await?;
        if permanent {
            self.store.remove_channel(channel.as_str())?;
        }
        Ok(())
    }
}

/// The assembled bot.
pub struct WardenBot {
    config: Config,
}

impl WardenBot {
    /// Creates a bot for the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the bot until the connection drops or a fatal startup error
    /// occurs.
    ///
    /// A duplicate built-in command aborts startup here, before the
    /// transport ever connects.
    pub async fn run(&self) -> anyhow::Result<()> {
        let store = Arc::new(JsonFileStore::open(&self.config.storage.data_file));

        let index = CommandIndex::build(
            native_commands(),
            Arc::clone(&store) as Arc<dyn CustomCommandStore>,
        )
        .await
        .context("duplicate built-in command, refusing to start")?;
        let index = Arc::new(index);

        let profile: Arc<dyn ProfileService> = match &self.config.twitch.api {
            Some(api) => Arc::new(HelixClient::new(api)?),
            None => {
                warn!("twitch.api is not configured; profile lookups are disabled");
                Arc::new(DisabledProfile)
            }
        };

        let connection = irc::connect(&self.config.twitch).await?;
        let writer = Arc::clone(&connection.writer);

        let services = Arc::new(Services {
            index: Arc::clone(&index),
            sink: Arc::clone(&writer) as Arc<dyn ChatSink>,
            channels: Arc::new(ChannelManager {
                writer: Arc::clone(&writer),
                store: Arc::clone(&store),
            }),
            profile: Arc::clone(&profile),
            prefix: self.config.bot.prefix.clone(),
        });
        let identity = Arc::new(TwitchIdentity::new(
            self.config.bot.owners.iter().cloned(),
            profile,
        ));
        let dispatcher = Arc::new(Dispatcher::new(index, identity, services));

        // The bot always sits in its own channel, plus every channel the
        // roster says to rejoin.
        let mut initial: BTreeSet<String> = store.channels();
        initial.insert(self.config.twitch.nickname.to_lowercase());
        for channel in &initial {
            writer.join(&ChannelName::new(channel)).await?;
        }
        info!("startup complete, {} channels joined", initial.len());

        self.read_loop(connection.reader, writer, dispatcher).await
    }

    async fn read_loop(
        &self,
        reader: BufReader<OwnedReadHalf>,
        writer: Arc<IrcWriter>,
        dispatcher: Arc<Dispatcher>,
    ) -> anyhow::Result<()> {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await.context("IRC read failed")? {
            match irc::parse_line(&line) {
                IrcEvent::Ping(token) => {
                    writer.send_raw(&format!("PONG :{token}")).await?;
                }
                IrcEvent::Message(message) => {
                    debug!(
                        "[{}] {}: {}",
                        message.channel, message.author.login, message.text
                    );
                    if message.text.starts_with(&self.config.bot.prefix) {
                        // Handlers may block on external calls; keep the
                        // read loop responsive.
                        let dispatcher = Arc::clone(&dispatcher);
                        tokio::spawn(async move {
                            dispatcher.handle(message).await;
                        });
                    }
                }
                IrcEvent::Other => {}
            }
        }
        error!("IRC connection closed by the server");
        bail!("IRC connection closed")
    }
}
