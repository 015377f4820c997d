//! Wire models for the REST API.
//!
//! Only the fields the purge engine reads are modelled; everything else in
//! the payloads is ignored. Every field defaults so partial or `null`-free
//! payloads still decode.

use serde::{Deserialize, Serialize};

/// An account.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(default)]
#[builder(setter(into), default)]
pub struct User {
    /// Snowflake ID
    id: String,
    /// Account name
    username: String,
    /// Legacy four-digit tag, `"0"` for migrated accounts
    discriminator: String,
}

impl User {
    /// `name#1234` for legacy tags, plain `name` otherwise.
    pub fn tag(&self) -> String {
        if self.discriminator.is_empty() || self.discriminator == "0" {
            self.username.clone()
        } else {
            format!("{}#{}", self.username, self.discriminator)
        }
    }
}

/// A server the caller belongs to.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(default)]
pub struct Guild {
    /// Snowflake ID
    id: String,
    /// Server name
    name: String,
}

impl Guild {
    /// Create a guild record.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Name, falling back to the ID when the name is blank.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Channel type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ChannelKind {
    /// 0
    GuildText,
    /// 1
    #[strum(to_string = "DM")]
    Dm,
    /// 2
    GuildVoice,
    /// 3
    #[strum(to_string = "Group DM")]
    GroupDm,
    /// 4
    GuildCategory,
    /// 5
    GuildAnnouncement,
    /// 10
    AnnouncementThread,
    /// 11
    PublicThread,
    /// 12
    PrivateThread,
    /// 13
    GuildStageVoice,
    /// 15
    GuildForum,
    /// 16
    GuildMedia,
    /// Any code this client does not know
    Other(u8),
}

impl From<u8> for ChannelKind {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::GuildText,
            1 => Self::Dm,
            2 => Self::GuildVoice,
            3 => Self::GroupDm,
            4 => Self::GuildCategory,
            5 => Self::GuildAnnouncement,
            10 => Self::AnnouncementThread,
            11 => Self::PublicThread,
            12 => Self::PrivateThread,
            13 => Self::GuildStageVoice,
            15 => Self::GuildForum,
            16 => Self::GuildMedia,
            other => Self::Other(other),
        }
    }
}

impl ChannelKind {
    /// Whether messages can be posted directly in this kind of channel.
    pub fn holds_messages(self) -> bool {
        matches!(
            self,
            Self::GuildText
                | Self::GuildAnnouncement
                | Self::GuildVoice
                | Self::GuildStageVoice
                | Self::AnnouncementThread
                | Self::PublicThread
                | Self::PrivateThread
        )
    }

    /// Whether this kind of channel can parent threads or posts.
    ///
    /// Forum and media channels hold no messages themselves but their posts do.
    pub fn hosts_threads(self) -> bool {
        matches!(
            self,
            Self::GuildText | Self::GuildAnnouncement | Self::GuildForum | Self::GuildMedia
        )
    }
}

/// Archive state of a thread.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(default)]
pub struct ThreadMetadata {
    /// Whether the thread is archived
    archived: bool,
    /// ISO-8601 time the thread was archived
    archive_timestamp: Option<String>,
}

/// A channel, thread or conversation.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(default)]
#[builder(setter(into), default)]
pub struct Channel {
    /// Snowflake ID
    id: String,
    /// Raw type code, see [`ChannelKind`]
    #[serde(rename = "type")]
    channel_type: u8,
    /// Channel name, absent for conversations
    name: Option<String>,
    /// Owning server, absent for conversations
    guild_id: Option<String>,
    /// Conversation participants other than the caller
    recipients: Vec<User>,
    /// Present for threads
    thread_metadata: Option<ThreadMetadata>,
}

impl Channel {
    /// Decoded type code.
    pub fn kind(&self) -> ChannelKind {
        ChannelKind::from(self.channel_type)
    }

    /// Human-readable label for a conversation.
    pub fn label(&self) -> String {
        match self.recipients.as_slice() {
            [] => format!("Channel {}", self.id),
            [single] => single.tag(),
            many => {
                let names: Vec<&str> = many.iter().map(|user| user.username.as_str()).collect();
                format!("Group: {}", names.join(", "))
            }
        }
    }

    /// Timestamp to page archived listings past this thread.
    pub fn archive_timestamp(&self) -> Option<&str> {
        self.thread_metadata
            .as_ref()
            .and_then(|meta| meta.archive_timestamp.as_deref())
            .filter(|ts| !ts.is_empty())
    }
}

/// One page of a thread listing.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(default)]
pub struct ThreadList {
    /// Threads on this page
    threads: Vec<Channel>,
    /// Whether older pages exist
    has_more: bool,
}

impl ThreadList {
    /// Consume the listing, keeping only the threads.
    pub fn into_threads(self) -> Vec<Channel> {
        self.threads
    }
}

/// Emoji attached to a reaction.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(default)]
#[builder(setter(into, strip_option), default)]
pub struct Emoji {
    /// Snowflake ID for custom emoji, absent for built-in characters
    id: Option<String>,
    /// Custom emoji name or the unicode character itself
    name: Option<String>,
}

impl Emoji {
    /// Path segment identifying this emoji in a reaction route.
    ///
    /// Custom emoji render as `name:id` verbatim; built-in characters are
    /// percent-encoded.
    pub fn url_segment(&self) -> String {
        let name = self.name.as_deref().unwrap_or_default();
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => format!("{}:{}", name, id),
            _ => urlencoding::encode(name).into_owned(),
        }
    }
}

/// A reaction summary on a message.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(default)]
#[builder(setter(into), default)]
pub struct Reaction {
    /// Total reactions with this emoji
    count: u32,
    /// Whether the caller placed one of them
    me: bool,
    /// The emoji
    emoji: Emoji,
}

/// A message.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(default)]
#[builder(setter(into), default)]
pub struct Message {
    /// Snowflake ID
    id: String,
    /// Containing channel
    channel_id: String,
    /// Author
    author: User,
    /// Set on search results that matched the query
    hit: bool,
    /// Reaction summaries
    reactions: Vec<Reaction>,
}

impl Message {
    /// Whether `user_id` wrote this message.
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.author.id == user_id
    }
}

/// One page of search results.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(default)]
pub struct SearchResults {
    /// Matches remaining, including this page
    total_results: u64,
    /// Each hit surrounded by context messages
    messages: Vec<Vec<Message>>,
    /// Set while the index is still being built
    retry: bool,
}

impl SearchResults {
    /// True when nothing is left to process.
    pub fn is_exhausted(&self) -> bool {
        self.total_results == 0 || self.messages.is_empty()
    }

    /// Matching messages written by `user_id`, context messages dropped.
    pub fn hits_by<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages
            .iter()
            .flatten()
            .filter(move |message| message.hit && message.is_authored_by(user_id))
    }
}

/// Relationship type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RelationshipKind {
    /// 1
    Friend,
    /// 2
    Blocked,
    /// 3
    #[strum(to_string = "incoming request")]
    IncomingRequest,
    /// 4
    #[strum(to_string = "outgoing request")]
    OutgoingRequest,
    /// 5
    Implicit,
    /// 6
    Suggestion,
    /// Any code this client does not know
    #[strum(to_string = "related")]
    Other(u8),
}

impl From<u8> for RelationshipKind {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Friend,
            2 => Self::Blocked,
            3 => Self::IncomingRequest,
            4 => Self::OutgoingRequest,
            5 => Self::Implicit,
            6 => Self::Suggestion,
            other => Self::Other(other),
        }
    }
}

/// A relationship with another account.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(default)]
pub struct Relationship {
    /// Relationship ID (the counterpart's user ID)
    id: String,
    /// Raw type code, see [`RelationshipKind`]
    #[serde(rename = "type")]
    relationship_type: u8,
    /// Counterpart account
    user: User,
}

impl Relationship {
    /// Decoded type code.
    pub fn kind(&self) -> RelationshipKind {
        RelationshipKind::from(self.relationship_type)
    }
}
