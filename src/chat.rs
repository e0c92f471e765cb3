//! User-facing chat lines.
//!
//! Every message the engine posts to a channel is built here so wording stays
//! consistent between the engine, the commands and the tests.

use crate::platform::Member;

/// Emoji members react with to join a lobby.
pub const JOIN_EMOJI: &str = "\u{2705}";

/// Reason attached to deletions during teardown.
pub const TEARDOWN_REASON: &str = "PUG has ended.";

/// How members are listed in welcome/goodbye notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Welcome {
    /// List members by display name.
    #[default]
    Names,
    /// Mention (ping) each member.
    Mention,
    /// Post nothing.
    Silent,
}

impl Welcome {
    /// Render the member list, or `None` when notifications are suppressed.
    pub fn render(self, members: &[Member]) -> Option<String> {
        let items: Vec<String> = match self {
            Self::Names => members.iter().map(|m| m.display_name.clone()).collect(),
            Self::Mention => members.iter().map(Member::mention).collect(),
            Self::Silent => return None,
        };
        Some(humanize_list(&items))
    }
}

/// Join items the way a person would: `a`, `a and b`, `a, b, and c`.
///
/// # Examples
/// ```
/// use pug::chat::humanize_list;
/// let items = vec!["Aaron".to_string(), "Betty".to_string(), "Carlos".to_string()];
/// assert_eq!(humanize_list(&items), "Aaron, Betty, and Carlos");
/// ```
pub fn humanize_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{} and {}", a, b),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}

/// Posted to the group a member leaves.
pub fn goodbye(list: &str) -> String {
    format!("Goodbye, {}!", list)
}

/// Posted to the group a member arrives in (`noun` is "team" or "lobby").
pub fn welcome(noun: &str, list: &str) -> String {
    format!("Welcome to the {}, {}!", noun, list)
}

/// Announcement members react to in order to join.
pub fn pug_opened(opener: &str, prefix: &str) -> String {
    format!(
        "{} has opened a PUG!\nReact below or use `{}pug join` to join!",
        opener, prefix
    )
}

pub fn teams_full() -> &'static str {
    "Sorry, all teams are full."
}

pub fn already_joined() -> &'static str {
    "You have already joined this PUG."
}

/// Welcome posted to the lobby channel for a member who joined.
pub fn joined_lobby(mention: &str) -> String {
    format!("Welcome to the lobby, {}!", mention)
}

/// Welcome replied to the member when the lobby has no text channel.
pub fn joined_lobby_reply() -> &'static str {
    "Welcome to the lobby!"
}

/// Reply to a text/voice auto-create toggle.
pub fn channel_toggle(kind: &str, on: bool) -> String {
    format!(
        "{} channels will {} be created for teams and lobbies.",
        kind,
        if on { "now" } else { "no longer" }
    )
}

pub fn archive_unset() -> &'static str {
    "Archive unset."
}

/// Reply to an archive query (`channel` is a mention, if set).
pub fn archive_status(channel: Option<&str>) -> String {
    format!(
        "Archive channel is currently {}.",
        channel.unwrap_or("not set")
    )
}

pub fn archive_set(channel: &str) -> String {
    format!("Archive channel set to {}.", channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemberId;

    fn member(id: u64, name: &str) -> Member {
        Member {
            id: MemberId(id),
            display_name: name.to_string(),
            bot: false,
            roles: vec![],
            top_role_position: 0,
            voice: None,
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_humanize_list() {
        assert_eq!(humanize_list(&[]), "");
        assert_eq!(humanize_list(&strings(&["Aaron"])), "Aaron");
        assert_eq!(humanize_list(&strings(&["Aaron", "Betty"])), "Aaron and Betty");
        assert_eq!(
            humanize_list(&strings(&["Aaron", "Betty", "Carlos", "Dana"])),
            "Aaron, Betty, Carlos, and Dana"
        );
    }

    #[test]
    fn test_welcome_render_modes() {
        let members = vec![member(1, "Aaron"), member(2, "Betty")];
        assert_eq!(Welcome::Names.render(&members).unwrap(), "Aaron and Betty");
        assert_eq!(Welcome::Mention.render(&members).unwrap(), "<@1> and <@2>");
        assert!(Welcome::Silent.render(&members).is_none());
        assert_eq!(Welcome::default(), Welcome::Names);
    }

    #[test]
    fn test_notification_lines() {
        assert_eq!(goodbye("Aaron"), "Goodbye, Aaron!");
        assert_eq!(welcome("team", "Aaron"), "Welcome to the team, Aaron!");
        assert_eq!(
            pug_opened("Mod", "!"),
            "Mod has opened a PUG!\nReact below or use `!pug join` to join!"
        );
    }

    #[test]
    fn test_settings_replies() {
        assert_eq!(
            channel_toggle("Text", true),
            "Text channels will now be created for teams and lobbies."
        );
        assert_eq!(
            channel_toggle("Voice", false),
            "Voice channels will no longer be created for teams and lobbies."
        );
        assert_eq!(archive_status(None), "Archive channel is currently not set.");
        assert_eq!(
            archive_status(Some("<#5>")),
            "Archive channel is currently <#5>."
        );
    }
}
