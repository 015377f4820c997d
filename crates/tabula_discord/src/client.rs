//! Typed REST client.
//!
//! Two families of calls live here:
//!
//! - Collaborator calls (identity, listings, relationships, cleanup) return
//!   `TabulaResult<T>` and treat any unexpected status as an error.
//! - Purge primitives return `TabulaResult<Outcome<T>>`; the outcome carries
//!   the business classification of the status code while `Err` is reserved
//!   for transport failures and exhausted rate-limit budgets.

use crate::outcome::classify_removal;
use crate::{
    ApiResponse, Channel, Emoji, Failure, Guild, Message, Outcome, Relationship, RequestExecutor,
    ReqwestTransport, SearchResults, SkipReason, ThreadList, Transport, User,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tabula_error::{DiscordError, DiscordErrorKind, TabulaResult};
use tabula_rate_limit::{Pace, PacingConfig, PagingConfig, TabulaConfig};
use tracing::{debug, instrument};

/// Where a message search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchScope<'a> {
    /// Every channel of a server
    Guild(&'a str),
    /// One direct or group conversation
    Conversation(&'a str),
}

impl SearchScope<'_> {
    /// ID of the searched container.
    pub fn id(&self) -> &str {
        match self {
            Self::Guild(id) | Self::Conversation(id) => id,
        }
    }
}

/// The three archived-thread listings of a parent channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ArchiveScope {
    /// Public archived threads
    Public,
    /// Private archived threads
    Private,
    /// Private archived threads the caller has joined
    JoinedPrivate,
}

impl ArchiveScope {
    fn route(self, channel_id: &str) -> String {
        match self {
            Self::Public => format!("/channels/{}/threads/archived/public", channel_id),
            Self::Private => format!("/channels/{}/threads/archived/private", channel_id),
            Self::JoinedPrivate => {
                format!("/channels/{}/users/@me/threads/archived/private", channel_id)
            }
        }
    }

    /// Statuses that end a listing quietly: no access or not applicable.
    fn skip_reason(status: u16, body: &str) -> Option<SkipReason> {
        match status {
            403 => Some(SkipReason::Forbidden),
            404 => Some(SkipReason::NotFound),
            400 => Some(SkipReason::Rejected(crate::format_api_error(body))),
            _ => None,
        }
    }
}

/// REST client bound to one credential.
///
/// Cheap to clone; clones share the underlying executor.
#[derive(Debug, Clone)]
pub struct DiscordClient {
    executor: Arc<RequestExecutor>,
    paging: PagingConfig,
    pacing: PacingConfig,
}

impl DiscordClient {
    /// Create a client over an existing executor.
    pub fn new(executor: RequestExecutor, paging: PagingConfig, pacing: PacingConfig) -> Self {
        Self {
            executor: Arc::new(executor),
            paging,
            pacing,
        }
    }

    /// Create a client over any transport using `config`.
    pub fn with_transport(transport: Arc<dyn Transport>, config: &TabulaConfig) -> Self {
        Self::new(
            RequestExecutor::new(transport, config.retry.clone()),
            config.paging,
            config.pacing.clone(),
        )
    }

    /// Create a client that talks to the live API with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be built.
    pub fn connect(token: &str, config: &TabulaConfig) -> TabulaResult<Self> {
        let transport = ReqwestTransport::new(token, &config.api)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Page sizes in effect.
    pub fn paging(&self) -> &PagingConfig {
        &self.paging
    }

    async fn get(&self, path: &str) -> TabulaResult<ApiResponse> {
        self.executor.execute(Method::GET, path, None).await
    }

    async fn delete(&self, path: &str) -> TabulaResult<ApiResponse> {
        self.executor.execute(Method::DELETE, path, None).await
    }

    /// Require a 200 and decode it.
    fn expect_ok<T: DeserializeOwned>(response: ApiResponse, context: &str) -> TabulaResult<T> {
        if response.status != 200 {
            return Err(DiscordError::unexpected_status(
                context,
                response.status,
                response.body.trim(),
            )
            .into());
        }
        response.json(context)
    }

    /// Decode a 200 body, turning malformed JSON into a hard failure.
    fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Outcome<T> {
        match serde_json::from_str(&response.body) {
            Ok(value) => Outcome::Success(value),
            Err(e) => Outcome::HardFail(Failure {
                status: response.status,
                detail: format!("invalid response body: {}", e),
            }),
        }
    }

    // ---------------------------------------------------------------------
    // Collaborator calls
    // ---------------------------------------------------------------------

    /// Identity of the credential's owner.
    ///
    /// # Errors
    ///
    /// [`DiscordErrorKind::InvalidToken`] on HTTP 401, an unexpected-status
    /// error for anything else but 200.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> TabulaResult<User> {
        let response = self.get("/users/@me").await?;
        if response.status == 401 {
            return Err(DiscordError::new(DiscordErrorKind::InvalidToken).into());
        }
        Self::expect_ok(response, "Fetching current user")
    }

    /// Every server the caller belongs to, following the ID cursor.
    #[instrument(skip(self))]
    pub async fn guilds(&self) -> TabulaResult<Vec<Guild>> {
        let page_size = self.paging.guild_page_size;
        let mut guilds: Vec<Guild> = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut path = format!("/users/@me/guilds?limit={}", page_size);
            if let Some(after) = &after {
                path.push_str(&format!("&after={}", after));
            }

            let page: Vec<Guild> = Self::expect_ok(self.get(&path).await?, "Fetching servers")?;
            let Some(last) = page.last() else {
                break;
            };
            after = Some(last.id().clone());
            let short = page.len() < page_size;
            guilds.extend(page);

            if short {
                break;
            }
            self.pacing.pause(Pace::Batch).await;
        }

        debug!(count = guilds.len(), "Fetched servers");
        Ok(guilds)
    }

    /// Conversations currently visible to the caller.
    #[instrument(skip(self))]
    pub async fn dm_channels(&self) -> TabulaResult<Vec<Channel>> {
        Self::expect_ok(self.get("/users/@me/channels").await?, "Fetching conversations")
    }

    /// Friends, blocks and pending requests.
    #[instrument(skip(self))]
    pub async fn relationships(&self) -> TabulaResult<Vec<Relationship>> {
        Self::expect_ok(
            self.get("/users/@me/relationships").await?,
            "Fetching relationships",
        )
    }

    /// Open, or re-open, the one-to-one conversation with `recipient_id`.
    #[instrument(skip(self))]
    pub async fn open_dm(&self, recipient_id: &str) -> TabulaResult<Channel> {
        let body = serde_json::json!({ "recipient_id": recipient_id });
        let response = self
            .executor
            .execute(Method::POST, "/users/@me/channels", Some(&body))
            .await?;
        Self::expect_ok(response, "Opening conversation")
    }

    /// Remove the relationship with `user_id`.
    #[instrument(skip(self))]
    pub async fn remove_relationship(&self, user_id: &str) -> TabulaResult<()> {
        let path = format!("/users/@me/relationships/{}", user_id);
        Self::expect_removed(self.delete(&path).await?, "Removing relationship")
    }

    /// Leave the server `guild_id`.
    #[instrument(skip(self))]
    pub async fn leave_guild(&self, guild_id: &str) -> TabulaResult<()> {
        let path = format!("/users/@me/guilds/{}", guild_id);
        Self::expect_removed(self.delete(&path).await?, "Leaving server")
    }

    fn expect_removed(response: ApiResponse, context: &str) -> TabulaResult<()> {
        match response.status {
            200 | 204 => Ok(()),
            status => Err(DiscordError::unexpected_status(
                context,
                status,
                crate::format_api_error(&response.body),
            )
            .into()),
        }
    }

    // ---------------------------------------------------------------------
    // Purge primitives
    // ---------------------------------------------------------------------

    /// One newest-first page of `author_id`'s messages, bounded by `max_id`.
    ///
    /// 202 or a `retry` flag mean the index is still building.
    #[instrument(skip(self), fields(scope_id = scope.id()))]
    pub async fn search(
        &self,
        scope: SearchScope<'_>,
        author_id: &str,
        max_id: Option<&str>,
    ) -> TabulaResult<Outcome<SearchResults>> {
        let mut path = match scope {
            SearchScope::Guild(guild_id) => format!(
                "/guilds/{}/messages/search?author_id={}&include_nsfw=true&sort_by=timestamp&sort_order=desc",
                guild_id, author_id
            ),
            SearchScope::Conversation(channel_id) => format!(
                "/channels/{}/messages/search?author_id={}&sort_by=timestamp&sort_order=desc",
                channel_id, author_id
            ),
        };
        if let Some(max_id) = max_id {
            path.push_str(&format!("&max_id={}", max_id));
        }

        let response = self.get(&path).await?;
        Ok(match response.status {
            202 => Outcome::RetryLater,
            403 => Outcome::Skip(SkipReason::Forbidden),
            200 => match Self::decode::<SearchResults>(&response) {
                Outcome::Success(results) if *results.retry() => Outcome::RetryLater,
                other => other,
            },
            status => Outcome::HardFail(Failure::from_body(status, &response.body)),
        })
    }

    /// Delete one message.
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> TabulaResult<Outcome<()>> {
        let path = format!("/channels/{}/messages/{}", channel_id, message_id);
        let response = self.delete(&path).await?;
        Ok(match response.status {
            403 => Outcome::Skip(SkipReason::Forbidden),
            400 => Outcome::Skip(SkipReason::Rejected(crate::format_api_error(
                &response.body,
            ))),
            status => classify_removal(status, &response.body),
        })
    }

    /// Up to one page of history older than `before`, newest first.
    #[instrument(skip(self))]
    pub async fn history_page(
        &self,
        channel_id: &str,
        before: Option<&str>,
    ) -> TabulaResult<Outcome<Vec<Message>>> {
        let mut path = format!(
            "/channels/{}/messages?limit={}",
            channel_id, self.paging.history_page_size
        );
        if let Some(before) = before {
            path.push_str(&format!("&before={}", before));
        }

        let response = self.get(&path).await?;
        Ok(match response.status {
            200 => Self::decode(&response),
            403 => Outcome::Skip(SkipReason::Forbidden),
            404 => Outcome::Skip(SkipReason::NotFound),
            status => Outcome::HardFail(Failure::from_body(status, &response.body)),
        })
    }

    /// Remove the caller's own `emoji` reaction from a message.
    #[instrument(skip(self, emoji), fields(emoji = %emoji.url_segment()))]
    pub async fn remove_own_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &Emoji,
    ) -> TabulaResult<Outcome<()>> {
        let path = format!(
            "/channels/{}/messages/{}/reactions/{}/@me",
            channel_id,
            message_id,
            emoji.url_segment()
        );
        let response = self.delete(&path).await?;
        Ok(classify_removal(response.status, &response.body))
    }

    /// Top-level channels of a server.
    #[instrument(skip(self))]
    pub async fn guild_channels(&self, guild_id: &str) -> TabulaResult<Outcome<Vec<Channel>>> {
        let path = format!("/guilds/{}/channels", guild_id);
        let response = self.get(&path).await?;
        Ok(Self::classify_listing(&response))
    }

    /// Active threads across a server.
    #[instrument(skip(self))]
    pub async fn active_threads(&self, guild_id: &str) -> TabulaResult<Outcome<Vec<Channel>>> {
        let path = format!("/guilds/{}/threads/active", guild_id);
        let response = self.get(&path).await?;
        Ok(Self::classify_listing::<ThreadList>(&response).map(ThreadList::into_threads))
    }

    /// One page of an archived-thread listing, older than `before`.
    #[instrument(skip(self))]
    pub async fn archived_threads(
        &self,
        channel_id: &str,
        scope: ArchiveScope,
        before: Option<&str>,
    ) -> TabulaResult<Outcome<ThreadList>> {
        let mut path = format!(
            "{}?limit={}",
            scope.route(channel_id),
            self.paging.thread_page_size
        );
        if let Some(before) = before {
            path.push_str(&format!("&before={}", urlencoding::encode(before)));
        }

        let response = self.get(&path).await?;
        if let Some(reason) = ArchiveScope::skip_reason(response.status, &response.body) {
            return Ok(Outcome::Skip(reason));
        }
        Ok(Self::classify_listing(&response))
    }

    fn classify_listing<T: DeserializeOwned>(response: &ApiResponse) -> Outcome<T> {
        match response.status {
            200 => Self::decode(response),
            403 => Outcome::Skip(SkipReason::Forbidden),
            status => Outcome::HardFail(Failure::from_body(status, &response.body)),
        }
    }
}
