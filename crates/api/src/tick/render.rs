use calendar_notifier_domain::{GroupedMatches, NotificationRule, TickMatches, Trigger};
use calendar_notifier_infra::{escape_mrkdwn, Block};
use chrono_tz::Tz;

/// Slack rejects section texts longer than 3000 characters
const MAX_SECTION_LEN: usize = 3000;

/// A rendered message ready to be handed to the messenger
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub channel: String,
    pub display_name: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Copy)]
enum Digest {
    Today,
    ThisWeek,
}

impl Digest {
    fn header(&self, count: usize) -> String {
        match self {
            Self::Today => format!("Today's events: {}", count),
            Self::ThisWeek => format!("This week's events: {}", count),
        }
    }

    fn start_format(&self) -> &'static str {
        match self {
            Self::Today => "%H:%M",
            Self::ThisWeek => "%m/%d (%a) %H:%M",
        }
    }
}

/// Renders the matches of one tick: a digest message per daily and weekly
/// rule set and a message per before rule
pub fn render_matches(matches: &TickMatches, timezone: Tz) -> Vec<OutgoingMessage> {
    let mut messages = render_digests(&matches.daily, Digest::Today, timezone);
    messages.extend(render_digests(&matches.weekly, Digest::ThisWeek, timezone));
    messages.extend(
        matches
            .before
            .values()
            .filter_map(|rule| render_before(rule, timezone)),
    );
    messages
}

fn render_digests(groups: &GroupedMatches, digest: Digest, timezone: Tz) -> Vec<OutgoingMessage> {
    // Counts the events of every group, not only the ones of the message
    let header = digest.header(groups.total());

    groups
        .iter()
        .filter_map(|(_, rules)| {
            let first = rules.first()?;
            let lines = rules
                .iter()
                .map(|rule| {
                    format!(
                        "• {}  {}",
                        event_link(rule),
                        time_range(rule, digest.start_format(), timezone)
                    )
                })
                .collect::<Vec<_>>();

            let mut blocks = vec![Block::header(header.clone())];
            blocks.extend(chunk_lines(&lines).into_iter().map(Block::section));
            Some(OutgoingMessage {
                channel: first.channel.clone(),
                display_name: first.calendar_title.clone(),
                blocks,
            })
        })
        .collect()
}

fn render_before(rule: &NotificationRule, timezone: Tz) -> Option<OutgoingMessage> {
    let minutes = match rule.trigger() {
        Ok(Trigger::Before(lead)) => lead.num_minutes(),
        _ => return None,
    };
    let unit = if minutes == 1 { "minute" } else { "minutes" };

    Some(OutgoingMessage {
        channel: rule.channel.clone(),
        display_name: rule.calendar_title.clone(),
        blocks: vec![
            Block::section(format!(
                "Starting in {} {}: {}",
                minutes,
                unit,
                event_link(rule)
            )),
            Block::context(time_range(rule, "%H:%M", timezone)),
        ],
    })
}

fn event_link(rule: &NotificationRule) -> String {
    format!("<{}|{}>", rule.url(), escape_mrkdwn(&rule.event.title))
}

fn time_range(rule: &NotificationRule, start_format: &str, timezone: Tz) -> String {
    format!(
        "{} - {}",
        rule.event.start.with_timezone(&timezone).format(start_format),
        rule.event.end.with_timezone(&timezone).format("%H:%M")
    )
}

/// Joins `lines` with newlines into as few texts as possible that each fit
/// in a section
fn chunk_lines(lines: &[String]) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    for line in lines {
        match chunks.last_mut() {
            Some(chunk) if chunk.chars().count() + 1 + line.chars().count() <= MAX_SECTION_LEN => {
                chunk.push('\n');
                chunk.push_str(line);
            }
            _ => chunks.push(line.clone()),
        }
    }
    chunks
}
