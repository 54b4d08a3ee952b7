use serde::{Deserialize, Serialize};

/// Identity of a feed message. Assigned once by the registry, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cosmetic category used by the renderer to pick a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Pink,
    Blue,
    Purple,
    Green,
    Yellow,
    Indigo,
    Teal,
    Rose,
}

impl ColorTag {
    pub const ALL: [ColorTag; 8] = [
        ColorTag::Pink,
        ColorTag::Blue,
        ColorTag::Purple,
        ColorTag::Green,
        ColorTag::Yellow,
        ColorTag::Indigo,
        ColorTag::Teal,
        ColorTag::Rose,
    ];

    /// Palette position wraps, so any index maps to a tag.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

impl std::fmt::Display for ColorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ColorTag::Pink => "pink",
            ColorTag::Blue => "blue",
            ColorTag::Purple => "purple",
            ColorTag::Green => "green",
            ColorTag::Yellow => "yellow",
            ColorTag::Indigo => "indigo",
            ColorTag::Teal => "teal",
            ColorTag::Rose => "rose",
        };
        write!(f, "{}", s)
    }
}

/// Admission path a message came through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    /// Seeded from the preset catalog at startup
    Preset,
    /// Submitted by a user
    Live,
    /// Synthesised by the ambient ticker
    Ambient,
}

impl std::fmt::Display for MessageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageSource::Preset => write!(f, "preset"),
            MessageSource::Live => write!(f, "live"),
            MessageSource::Ambient => write!(f, "ambient"),
        }
    }
}

/// Slack for comparing times rebuilt from `admitted_at + start_delay`.
pub const TIME_EPSILON: f64 = 1e-9;

/// A scheduled feed message.
///
/// All timing is in seconds on the feed clock. The visible interval is
/// half-open: `[start_at, end_at)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub origin_label: String,
    pub action_label: String,
    pub recency_label: String,
    pub color_tag: ColorTag,
    pub source: MessageSource,
    pub admitted_at_secs: f64,
    pub start_delay_secs: f64,
    pub duration_secs: f64,
    pub lane: usize,
    pub vertical_offset: f64,
}

impl Message {
    pub fn start_at(&self) -> f64 {
        self.admitted_at_secs + self.start_delay_secs
    }

    pub fn end_at(&self) -> f64 {
        self.start_at() + self.duration_secs
    }

    /// Whether the message is on screen at `now`.
    pub fn is_active_at(&self, now: f64) -> bool {
        self.start_at() <= now && now < self.end_at()
    }

    /// Whether two messages' visible intervals intersect by more than
    /// [`TIME_EPSILON`].
    pub fn overlaps(&self, other: &Message) -> bool {
        self.start_at() < other.end_at() - TIME_EPSILON
            && other.start_at() < self.end_at() - TIME_EPSILON
    }
}

/// The read contract handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub id: MessageId,
    pub lane: usize,
    pub vertical_offset: f64,
    pub start_delay_seconds: f64,
    pub duration_seconds: f64,
    pub origin_label: String,
    pub action_label: String,
    pub recency_label: String,
    pub color_tag: ColorTag,
    pub endorsement_count: u64,
}

impl FeedEntry {
    pub fn new(message: &Message, endorsement_count: u64) -> Self {
        Self {
            id: message.id,
            lane: message.lane,
            vertical_offset: message.vertical_offset,
            start_delay_seconds: message.start_delay_secs,
            duration_seconds: message.duration_secs,
            origin_label: message.origin_label.clone(),
            action_label: message.action_label.clone(),
            recency_label: message.recency_label.clone(),
            color_tag: message.color_tag,
            endorsement_count,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_message(id: u64, lane: usize, start: f64, duration: f64) -> Message {
    Message {
        id: MessageId(id),
        origin_label: "Shanghai".to_string(),
        action_label: "had a full-sugar milk tea".to_string(),
        recency_label: "just now".to_string(),
        color_tag: ColorTag::Pink,
        source: MessageSource::Preset,
        admitted_at_secs: 0.0,
        start_delay_secs: start,
        duration_secs: duration,
        lane,
        vertical_offset: lane as f64 * 60.0,
    }
}
