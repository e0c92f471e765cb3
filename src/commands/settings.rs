//! Per-scope setting toggles. Each returns the reply for the frontend.

use crate::chat;
use crate::config::Settings;
use crate::platform::ChannelId;

/// Argument of the archive command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveArg {
    /// Turn archival off.
    Off,
    /// Report the current archive channel.
    Show,
    /// Archive to this channel.
    Set(ChannelId),
}

/// Set (or flip, when `on` is `None`) text channel creation.
pub fn set_team_text(settings: &mut Settings, on: Option<bool>) -> String {
    let on = on.unwrap_or(!settings.team_text);
    settings.team_text = on;
    chat::channel_toggle("Text", on)
}

/// Set (or flip, when `on` is `None`) voice channel creation.
pub fn set_team_voice(settings: &mut Settings, on: Option<bool>) -> String {
    let on = on.unwrap_or(!settings.team_voice);
    settings.team_voice = on;
    chat::channel_toggle("Voice", on)
}

pub fn set_archive(settings: &mut Settings, arg: ArchiveArg) -> String {
    match arg {
        ArchiveArg::Off => {
            settings.archive = None;
            chat::archive_unset().to_string()
        }
        ArchiveArg::Show => {
            let mention = settings.archive.map(mention);
            chat::archive_status(mention.as_deref())
        }
        ArchiveArg::Set(channel) => {
            settings.archive = Some(channel);
            chat::archive_set(&mention(channel))
        }
    }
}

fn mention(channel: ChannelId) -> String {
    format!("<#{}>", channel)
}
