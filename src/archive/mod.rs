//! Archival of group text channels before teardown.
//!
//! The channel's full history is rendered into plain-text transcript parts,
//! each at most `max_bytes` long. A summary embed listing the human
//! participants goes to the archive channel first, followed by one file per
//! part.

pub mod format;

use std::collections::BTreeMap;

use futures::StreamExt;

use crate::platform::{
    Channel, ChannelId, Embed, FileUpload, HistoryMessage, Member, MemberId, Outgoing, Platform,
    PlatformResult, Role,
};

/// Default maximum transcript part size in bytes.
pub const DEFAULT_MAX_BYTES: usize = 8_000_000;

/// Where transcripts go and how large each part may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveTarget {
    pub channel: ChannelId,
    pub max_bytes: usize,
}

impl ArchiveTarget {
    pub fn new(channel: ChannelId) -> Self {
        Self {
            channel,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Set the maximum transcript part size.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

/// A transcript being accumulated from channel history.
#[derive(Debug)]
pub struct Transcript {
    max_bytes: usize,
    parts: Vec<Vec<u8>>,
    participants: BTreeMap<MemberId, Member>,
    last: Option<HistoryMessage>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            parts: vec![Vec::new()],
            participants: BTreeMap::new(),
            last: None,
        }
    }

    /// Create a transcript with a custom part size.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Append a message, oldest first.
    pub fn push(&mut self, message: HistoryMessage) {
        for line in format::render(&message, self.last.as_ref()) {
            self.write_line(&line);
        }
        if !message.author.bot {
            self.participants
                .entry(message.author.id)
                .or_insert_with(|| message.author.clone());
        }
        self.last = Some(message);
    }

    // The current part is sealed before a line that would push it past the
    // limit. A line longer than the limit gets a part of its own.
    fn write_line(&mut self, line: &str) {
        let needed = line.len() + 1;
        let sealed = match self.parts.last() {
            Some(part) => !part.is_empty() && part.len() + needed > self.max_bytes,
            None => true,
        };
        if sealed {
            self.parts.push(Vec::new());
        }
        if let Some(part) = self.parts.last_mut() {
            part.extend_from_slice(line.as_bytes());
            part.push(b'\n');
        }
    }

    /// Whether no message has been pushed.
    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    /// Rendered parts in order.
    pub fn parts(&self) -> &[Vec<u8>] {
        &self.parts
    }

    /// Non-bot authors, highest role first, then most recent id first.
    pub fn participants(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.participants.values().collect();
        members.sort_by(|a, b| {
            b.top_role_position
                .cmp(&a.top_role_position)
                .then(b.id.cmp(&a.id))
        });
        members
    }

    /// Summary embed for the archive channel.
    pub fn summary(&self, channel: &Channel, role: &Role, icon: Option<String>) -> Embed {
        let roster = self
            .participants()
            .iter()
            .map(|m| format!("{} ({})", m.display_name, m.id))
            .collect::<Vec<_>>();
        let description = if roster.is_empty() {
            "*Nobody*".to_string()
        } else {
            roster.join("\n")
        };
        Embed {
            title: format::title(&channel.name),
            description,
            colour: role.colour,
            thumbnail_url: icon,
        }
    }

    /// File uploads named after the channel.
    pub fn into_uploads(self, channel_name: &str) -> Vec<FileUpload> {
        if self.parts.len() == 1 {
            return self
                .parts
                .into_iter()
                .map(|bytes| FileUpload {
                    filename: format!("{}.md", channel_name),
                    bytes,
                })
                .collect();
        }
        self.parts
            .into_iter()
            .enumerate()
            .map(|(i, bytes)| FileUpload {
                filename: format!("{}_part-{}.md", channel_name, i),
                bytes,
            })
            .collect()
    }
}

/// Archive `channel` to `target`.
///
/// Does nothing when the channel has no history or only bot messages.
pub async fn log<P: Platform + ?Sized>(
    platform: &P,
    role: &Role,
    channel: &Channel,
    target: ArchiveTarget,
) -> PlatformResult<()> {
    let mut transcript = Transcript::new().with_max_bytes(target.max_bytes);
    let mut history = platform.history(channel.id);
    while let Some(message) = history.next().await {
        transcript.push(message?);
    }
    drop(history);

    if transcript.is_empty() || transcript.participants.is_empty() {
        log::info!("Nothing to log.");
        return Ok(());
    }

    let summary = transcript.summary(channel, role, platform.guild_icon_url());
    platform
        .send(target.channel, Outgoing::Embed(summary))
        .await?;
    let uploads = transcript.into_uploads(&channel.name);
    log::info!(
        "archiving {} to channel {} in {} part(s)",
        channel.name,
        target.channel,
        uploads.len()
    );
    for upload in uploads {
        platform.send(target.channel, Outgoing::File(upload)).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Colour;
    use crate::platform::{ChannelKind, InMemoryPlatform, MessageId, RoleId};
    use chrono::{TimeZone, Utc};

    fn setup() -> (InMemoryPlatform, Channel, Role, ChannelId) {
        let platform = InMemoryPlatform::new().with_icon("https://cdn.example/icon.png");
        let text = platform.add_text_channel("team-1");
        let channel = platform.channel(text).unwrap();
        let archive = platform.add_text_channel("archive");
        let role = Role {
            id: RoleId(5),
            name: "Team 1".to_string(),
            colour: Colour(0x123456),
        };
        (platform, channel, role, archive)
    }

    fn files(platform: &InMemoryPlatform, channel: ChannelId) -> Vec<FileUpload> {
        platform
            .sent_to(channel)
            .into_iter()
            .filter_map(|m| match m {
                Outgoing::File(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_empty_history_sends_nothing() {
        let (platform, channel, role, archive) = setup();
        log(&platform, &role, &channel, ArchiveTarget::new(archive))
            .await
            .unwrap();
        assert!(platform.sent_to(archive).is_empty());
    }

    #[tokio::test]
    async fn test_bot_only_history_sends_nothing() {
        let (platform, channel, role, archive) = setup();
        let helper = platform.add_bot("Helper");
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        platform.post(channel.id, helper, "beep", at);
        log(&platform, &role, &channel, ArchiveTarget::new(archive))
            .await
            .unwrap();
        assert!(platform.sent_to(archive).is_empty());
    }

    #[tokio::test]
    async fn test_summary_then_single_file() {
        let (platform, channel, role, archive) = setup();
        let low = platform.add_member_with("Low", false, 1);
        let high = platform.add_member_with("High", false, 5);
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap();
        platform.post(channel.id, low, "hi", at);
        platform.post(channel.id, high, "hello", at);
        platform.post(channel.id, low, "again", at);

        log(&platform, &role, &channel, ArchiveTarget::new(archive))
            .await
            .unwrap();

        let sent = platform.sent_to(archive);
        assert_eq!(sent.len(), 2);
        let Outgoing::Embed(embed) = &sent[0] else {
            panic!("expected summary embed first");
        };
        assert_eq!(embed.title, "Team 1");
        assert_eq!(
            embed.description,
            format!("High ({})\nLow ({})", high, low)
        );
        assert_eq!(embed.colour, Colour(0x123456));
        assert_eq!(
            embed.thumbnail_url.as_deref(),
            Some("https://cdn.example/icon.png")
        );

        let uploads = files(&platform, archive);
        assert_eq!(uploads[0].filename, "team-1.md");
        let text = String::from_utf8(uploads[0].bytes.clone()).unwrap();
        assert_eq!(
            text,
            "Jan 2, 2024\n[3:00:00 PM] Low: hi\n[3:00:00 PM] High: hello\n[3:00:00 PM] Low: again\n"
        );
    }

    #[tokio::test]
    async fn test_equal_rank_sorts_recent_id_first() {
        let (platform, channel, role, archive) = setup();
        let first = platform.add_member("First");
        let second = platform.add_member("Second");
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap();
        platform.post(channel.id, first, "a", at);
        platform.post(channel.id, second, "b", at);

        log(&platform, &role, &channel, ArchiveTarget::new(archive))
            .await
            .unwrap();
        let Outgoing::Embed(embed) = &platform.sent_to(archive)[0] else {
            panic!("expected summary embed first");
        };
        assert_eq!(
            embed.description,
            format!("Second ({})\nFirst ({})", second, first)
        );
    }

    #[tokio::test]
    async fn test_large_history_splits_into_ordered_parts() {
        let (platform, channel, role, archive) = setup();
        let aaron = platform.add_member("Aaron");
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap();
        for i in 0..20 {
            platform.post(channel.id, aaron, &format!("message number {:02}", i), at);
        }

        let target = ArchiveTarget::new(archive).with_max_bytes(120);
        log(&platform, &role, &channel, target).await.unwrap();

        let uploads = files(&platform, archive);
        assert!(uploads.len() > 1);
        for (i, upload) in uploads.iter().enumerate() {
            assert_eq!(upload.filename, format!("team-1_part-{}.md", i));
            assert!(upload.bytes.len() <= 120);
        }
        let joined: String = uploads
            .iter()
            .map(|u| String::from_utf8(u.bytes.clone()).unwrap())
            .collect();
        let numbers: Vec<_> = joined
            .lines()
            .filter_map(|l| l.strip_prefix("[3:00:00 PM] Aaron: message number "))
            .collect();
        let expected: Vec<String> = (0..20).map(|i| format!("{:02}", i)).collect();
        assert_eq!(numbers, expected);
    }

    #[tokio::test]
    async fn test_edits_and_attachments_reach_the_file() {
        let (platform, channel, role, archive) = setup();
        let aaron = platform.add_member("Aaron");
        let author = platform.member(aaron).await.unwrap();
        platform.push_history(
            channel.id,
            HistoryMessage {
                id: MessageId(1),
                author,
                created_at: Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(),
                edited_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 9, 1, 0).unwrap()),
                clean_content: "score".to_string(),
                attachments: vec![crate::platform::Attachment {
                    url: "https://cdn.example/score.png".to_string(),
                }],
            },
        );

        log(&platform, &role, &channel, ArchiveTarget::new(archive))
            .await
            .unwrap();

        let uploads = files(&platform, archive);
        assert_eq!(
            String::from_utf8(uploads[0].bytes.clone()).unwrap(),
            "Jan 2, 2024\n[9:00:00 AM] Aaron: score (edited 9:01:00 AM)\nhttps://cdn.example/score.png\n"
        );
    }

    #[test]
    fn test_oversized_line_gets_own_part() {
        let author = Member {
            id: MemberId(3),
            display_name: "Aaron".to_string(),
            bot: false,
            roles: vec![],
            top_role_position: 0,
            voice: None,
        };
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap();
        let mut transcript = Transcript::new().with_max_bytes(40);
        transcript.push(HistoryMessage {
            id: MessageId(1),
            author,
            created_at: at,
            edited_at: None,
            clean_content: "x".repeat(100),
            attachments: vec![],
        });
        assert_eq!(transcript.parts().len(), 2);
        assert_eq!(transcript.parts()[0], b"Jan 2, 2024\n".to_vec());
    }

    #[test]
    fn test_summary_without_participants_says_nobody() {
        let transcript = Transcript::new();
        let channel = Channel {
            id: ChannelId(1),
            name: "lobby".to_string(),
            kind: ChannelKind::Text,
        };
        let role = Role {
            id: RoleId(2),
            name: "Lobby".to_string(),
            colour: Colour::RED,
        };
        let embed = transcript.summary(&channel, &role, None);
        assert_eq!(embed.description, "*Nobody*");
        assert_eq!(embed.title, "Lobby");
    }
}
