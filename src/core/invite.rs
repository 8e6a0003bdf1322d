use crate::utils::error::{Result, RosterError};
use chrono::NaiveDateTime;

const REPLY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %I:%M %p";

/// 組織者回信中的原始欄位
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingReply {
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
}

impl MeetingReply {
    /// Picks `Date:`, `Time:` and `Location:` lines out of a reply body.
    /// The first occurrence of each field wins.
    pub fn parse(body: &str) -> Self {
        let mut reply = MeetingReply::default();

        for line in body.lines().map(str::trim_start) {
            let (slot, value) = if let Some(rest) = line.strip_prefix("Date:") {
                (&mut reply.date, rest)
            } else if let Some(rest) = line.strip_prefix("Time:") {
                (&mut reply.time, rest)
            } else if let Some(rest) = line.strip_prefix("Location:") {
                (&mut reply.location, rest)
            } else {
                continue;
            };

            if slot.is_none() {
                *slot = Some(value.trim().to_string());
            }
        }

        reply
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingDetails {
    pub starts_at: NaiveDateTime,
    pub location: String,
}

impl MeetingDetails {
    pub fn from_reply(reply: &MeetingReply) -> Result<Self> {
        let date = required(&reply.date, "Date")?;
        let time = required(&reply.time, "Time")?;
        let location = required(&reply.location, "Location")?;

        let stamp = format!("{} {}", date, time);
        let starts_at = NaiveDateTime::parse_from_str(&stamp, REPLY_TIMESTAMP_FORMAT).map_err(
            |e| RosterError::ReplyParseError {
                message: format!("'{}' does not match YYYY-MM-DD HH:MM AM/PM: {}", stamp, e),
            },
        )?;

        Ok(Self {
            starts_at,
            location: location.to_string(),
        })
    }

    /// e.g. `Wednesday, October 21`
    pub fn date_label(&self) -> String {
        self.starts_at.format("%A, %B %d").to_string()
    }

    /// e.g. `07:30 PM`
    pub fn time_label(&self) -> String {
        self.starts_at.format("%I:%M %p").to_string()
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RosterError::ReplyParseError {
            message: format!("missing '{}:' line", field),
        })
}

/// Body of the message asking the organizer where and when to meet.
pub fn details_request_body() -> String {
    "Where and when would you like to meet for the upcoming small group dinner?\n\
     \n\
     Please reply to this message in the following format:\n\
     Date: YYYY-MM-DD (zero-padded numbers)\n\
     Time: HH:MM AM/PM\n\
     Location: [Location Name]\n"
        .to_string()
}

pub fn compose_invitation(
    details: &MeetingDetails,
    location_notes: Option<&str>,
    topics: &[String],
) -> String {
    let mut body = String::new();
    body.push_str("Hi everyone,\n\n");
    body.push_str(
        "You have been randomly selected for this week's small-group dinner. \
         Details below, hope to see you there!\n\n",
    );
    body.push_str(&format!("Date: {}\n", details.date_label()));
    body.push_str(&format!("Time: {}\n", details.time_label()));
    body.push_str(&format!("Location: {}\n", details.location));

    if let Some(notes) = location_notes.filter(|n| !n.trim().is_empty()) {
        body.push_str("\nLocation Details:\n");
        body.push_str(notes.trim());
        body.push('\n');
    }

    if !topics.is_empty() {
        body.push_str("\nA few conversation starters:\n");
        for topic in topics {
            body.push_str(&format!("- {}\n", topic));
        }
    }

    body
}

/// Used when no reply is available yet: names the group and promises details.
pub fn compose_announcement(members: &[(String, String)]) -> String {
    let mut body = String::new();
    body.push_str("Hi everyone,\n\n");
    body.push_str("You have been randomly selected for this week's small-group dinner with:\n\n");
    for (identity, name) in members {
        body.push_str(&format!("- {} <{}>\n", name, identity));
    }
    body.push_str("\nDate, time and location will follow shortly.\n");
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "Sounds good!\n\n    Date: 2026-10-21\n    Time: 07:30 PM\n    Location: Luigi's\n\n> Where and when would you like to meet?\n> Date: YYYY-MM-DD\n";

    #[test]
    fn test_parse_reply_fields() {
        let reply = MeetingReply::parse(REPLY);
        assert_eq!(reply.date.as_deref(), Some("2026-10-21"));
        assert_eq!(reply.time.as_deref(), Some("07:30 PM"));
        assert_eq!(reply.location.as_deref(), Some("Luigi's"));
    }

    #[test]
    fn test_details_labels() {
        let details = MeetingDetails::from_reply(&MeetingReply::parse(REPLY)).unwrap();
        assert_eq!(details.date_label(), "Wednesday, October 21");
        assert_eq!(details.time_label(), "07:30 PM");
    }

    #[test]
    fn test_missing_field_is_reported() {
        let reply = MeetingReply::parse("Date: 2026-10-21\nLocation: Somewhere\n");
        let err = MeetingDetails::from_reply(&reply).unwrap_err();
        assert!(err.to_string().contains("Time"));
    }

    #[test]
    fn test_bad_time_format_is_reported() {
        let reply = MeetingReply::parse("Date: 2026-10-21\nTime: 19:30\nLocation: X\n");
        assert!(matches!(
            MeetingDetails::from_reply(&reply),
            Err(RosterError::ReplyParseError { .. })
        ));
    }

    #[test]
    fn test_compose_invitation_includes_optional_sections() {
        let details = MeetingDetails::from_reply(&MeetingReply::parse(REPLY)).unwrap();
        let topics = vec!["Weather".to_string(), "Sports".to_string()];

        let body = compose_invitation(&details, Some("Back room, ask for the group"), &topics);
        assert!(body.contains("Date: Wednesday, October 21"));
        assert!(body.contains("Location Details:\nBack room"));
        assert!(body.contains("- Sports\n"));

        let bare = compose_invitation(&details, None, &[]);
        assert!(!bare.contains("Location Details"));
        assert!(!bare.contains("conversation starters"));
    }

    #[test]
    fn test_request_body_lists_expected_format() {
        let body = details_request_body();
        assert!(body.contains("Date: YYYY-MM-DD"));
        assert!(body.contains("Location:"));
    }
}
