//! Transcript line rendering.

use chrono::{DateTime, Utc};

use crate::platform::HistoryMessage;

const DATE: &str = "%b %-d, %Y";
const TIME: &str = "%-I:%M:%S %p";
const DATE_TIME: &str = "%b %-d, %Y, %-I:%M:%S %p";

pub fn date(at: &DateTime<Utc>) -> String {
    at.format(DATE).to_string()
}

pub fn time(at: &DateTime<Utc>) -> String {
    at.format(TIME).to_string()
}

pub fn date_time(at: &DateTime<Utc>) -> String {
    at.format(DATE_TIME).to_string()
}

/// Render one message as transcript lines, without trailing newlines.
///
/// A date line opens the transcript, and a blank line plus date line
/// precede the first message of each new calendar day. Attachment URLs
/// follow the message line, one per line.
pub fn render(message: &HistoryMessage, previous: Option<&HistoryMessage>) -> Vec<String> {
    let mut lines = Vec::with_capacity(2 + message.attachments.len());
    match previous {
        None => lines.push(date(&message.created_at)),
        Some(prev) if prev.created_at.date_naive() != message.created_at.date_naive() => {
            lines.push(String::new());
            lines.push(date(&message.created_at));
        }
        Some(_) => {}
    }

    let author = if message.author.bot {
        format!("BOT {}", message.author.display_name)
    } else {
        message.author.display_name.clone()
    };
    let edited = match &message.edited_at {
        Some(at) if at.date_naive() == message.created_at.date_naive() => {
            format!(" (edited {})", time(at))
        }
        Some(at) => format!(" (edited {})", date_time(at)),
        None => String::new(),
    };
    lines.push(format!(
        "[{}] {}: {}{}",
        time(&message.created_at),
        author,
        message.clean_content,
        edited
    ));
    lines.extend(message.attachments.iter().map(|a| a.url.clone()));
    lines
}

/// Title for an archive summary: `team-1` becomes `Team 1`.
pub fn title(channel_name: &str) -> String {
    channel_name
        .replace('-', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Attachment, Member, MemberId, MessageId};
    use chrono::TimeZone;

    fn message(bot: bool, at: DateTime<Utc>, content: &str) -> HistoryMessage {
        HistoryMessage {
            id: MessageId(1),
            author: Member {
                id: MemberId(7),
                display_name: "Aaron".to_string(),
                bot,
                roles: vec![],
                top_role_position: 0,
                voice: None,
            },
            created_at: at,
            edited_at: None,
            clean_content: content.to_string(),
            attachments: vec![],
        }
    }

    #[test]
    fn test_first_message_opens_with_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let lines = render(&message(false, at, "gg"), None);
        assert_eq!(lines, vec!["Mar 5, 2024", "[2:07:09 PM] Aaron: gg"]);
    }

    #[test]
    fn test_same_day_has_no_separator() {
        let first = message(false, Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap(), "a");
        let second = message(false, Utc.with_ymd_and_hms(2024, 3, 5, 23, 0, 0).unwrap(), "b");
        assert_eq!(render(&second, Some(&first)), vec!["[11:00:00 PM] Aaron: b"]);
    }

    #[test]
    fn test_day_change_inserts_blank_and_date() {
        let first = message(false, Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 0).unwrap(), "a");
        let second = message(false, Utc.with_ymd_and_hms(2024, 3, 6, 0, 1, 0).unwrap(), "b");
        assert_eq!(
            render(&second, Some(&first)),
            vec!["", "Mar 6, 2024", "[12:01:00 AM] Aaron: b"]
        );
    }

    #[test]
    fn test_bot_prefix_and_attachments() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        let mut msg = message(true, at, "look");
        msg.attachments.push(Attachment {
            url: "https://cdn.example/a.png".to_string(),
        });
        let lines = render(&msg, Some(&msg.clone()));
        assert_eq!(
            lines,
            vec!["[10:00:00 AM] BOT Aaron: look", "https://cdn.example/a.png"]
        );
    }

    #[test]
    fn test_edit_annotations() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        let mut same_day = message(false, at, "x");
        same_day.edited_at = Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 5, 0).unwrap());
        assert_eq!(
            render(&same_day, Some(&same_day.clone()))[0],
            "[10:00:00 AM] Aaron: x (edited 10:05:00 AM)"
        );

        let mut later = message(false, at, "x");
        later.edited_at = Some(Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap());
        assert_eq!(
            render(&later, Some(&later.clone()))[0],
            "[10:00:00 AM] Aaron: x (edited Apr 1, 2024, 8:00:00 AM)"
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title("team-1"), "Team 1");
        assert_eq!(title("ranked-pug"), "Ranked Pug");
        assert_eq!(title("OVERWATCH-pug"), "Overwatch Pug");
    }
}
