//! Static content pool for synthesised messages.

use rand::Rng;

/// One (origin, action, recency) tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub origin: &'static str,
    pub action: &'static str,
    pub recency: &'static str,
}

pub const ORIGINS: [&str; 24] = [
    "Shanghai", "Beijing", "Guangzhou", "Shenzhen", "Hangzhou", "Chengdu",
    "Chongqing", "Wuhan", "Xi'an", "Nanjing", "Suzhou", "Tianjin",
    "Changsha", "Zhengzhou", "Jinan", "Qingdao", "Xiamen", "Fuzhou",
    "Kunming", "Dalian", "Shenyang", "Harbin", "Taipei", "Hong Kong",
];

pub const ACTIONS: [&str; 30] = [
    "had a full-sugar milk tea",
    "decided to leave work early",
    "bought themselves a bouquet",
    "went to see a movie",
    "took an afternoon nap",
    "treated themselves to a feast",
    "skipped a party they didn't want to go to",
    "muted the work group chat",
    "walked in the park for an hour",
    "played their favourite playlist",
    "bought themselves new clothes",
    "took a long hot bath",
    "ordered their favourite takeout",
    "deleted a contact that made them unhappy",
    "put the phone down and read a book",
    "did some yoga",
    "painted a picture",
    "wrote a diary entry",
    "made themselves breakfast",
    "tidied up their room",
    "turned off the alarm and slept in",
    "said no to overtime",
    "gave themselves a day off",
    "spent the afternoon in a cafe",
    "bought a book they had wanted for ages",
    "booked a massage",
    "changed their phone wallpaper",
    "unfollowed the negativity",
    "wrote themselves a letter",
    "learned to say \"no\"",
];

pub const RECENCY_LABELS: [&str; 9] = [
    "just now",
    "1 min ago",
    "2 min ago",
    "3 min ago",
    "5 min ago",
    "10 min ago",
    "15 min ago",
    "30 min ago",
    "1 hour ago",
];

/// Recency label given to live submissions.
pub const LIVE_RECENCY: &str = "just now";

/// Origin label used when a submitter leaves it blank.
pub const DEFAULT_LIVE_ORIGIN: &str = "You";

const fn entry(origin: &'static str, action: &'static str, recency: &'static str) -> CatalogEntry {
    CatalogEntry { origin, action, recency }
}

/// Ordered preset feed seeded at startup.
pub const PRESETS: [CatalogEntry; 48] = [
    entry("Shanghai", "had a full-sugar milk tea", "just now"),
    entry("Beijing", "decided to leave work early", "1 min ago"),
    entry("Guangzhou", "bought themselves a bouquet", "2 min ago"),
    entry("Shenzhen", "went to see a movie", "3 min ago"),
    entry("Hangzhou", "took an afternoon nap", "5 min ago"),
    entry("Chengdu", "treated themselves to a feast", "10 min ago"),
    entry("Chongqing", "skipped a party they didn't want to go to", "15 min ago"),
    entry("Wuhan", "muted the work group chat", "30 min ago"),
    entry("Xi'an", "walked in the park for an hour", "1 hour ago"),
    entry("Nanjing", "played their favourite playlist", "just now"),
    entry("Suzhou", "bought themselves new clothes", "1 min ago"),
    entry("Tianjin", "took a long hot bath", "2 min ago"),
    entry("Changsha", "ordered their favourite takeout", "3 min ago"),
    entry("Zhengzhou", "deleted a contact that made them unhappy", "5 min ago"),
    entry("Jinan", "put the phone down and read a book", "10 min ago"),
    entry("Qingdao", "did some yoga", "15 min ago"),
    entry("Xiamen", "painted a picture", "30 min ago"),
    entry("Fuzhou", "wrote a diary entry", "1 hour ago"),
    entry("Kunming", "made themselves breakfast", "just now"),
    entry("Dalian", "tidied up their room", "1 min ago"),
    entry("Shenyang", "turned off the alarm and slept in", "2 min ago"),
    entry("Harbin", "said no to overtime", "3 min ago"),
    entry("Taipei", "gave themselves a day off", "5 min ago"),
    entry("Hong Kong", "spent the afternoon in a cafe", "10 min ago"),
    entry("Shanghai", "bought a book they had wanted for ages", "15 min ago"),
    entry("Beijing", "went to a concert", "30 min ago"),
    entry("Guangzhou", "bought themselves fresh flowers", "1 hour ago"),
    entry("Shenzhen", "switched off the phone to enjoy the quiet", "just now"),
    entry("Hangzhou", "went to the seaside for the breeze", "1 min ago"),
    entry("Chengdu", "had a hotpot dinner", "2 min ago"),
    entry("Chongqing", "watched a sunset", "3 min ago"),
    entry("Wuhan", "bought a piece of clothing they loved", "5 min ago"),
    entry("Xi'an", "cooked a great meal at home", "10 min ago"),
    entry("Nanjing", "turned off all notifications", "15 min ago"),
    entry("Suzhou", "went to an art exhibition", "30 min ago"),
    entry("Tianjin", "bought a bunch of sunflowers", "1 hour ago"),
    entry("Changsha", "took a long, long nap", "just now"),
    entry("Zhengzhou", "deleted photos they didn't like", "1 min ago"),
    entry("Jinan", "spent the afternoon in a bookshop", "2 min ago"),
    entry("Qingdao", "strolled along the beach", "3 min ago"),
    entry("Xiamen", "bought themselves new shoes", "5 min ago"),
    entry("Fuzhou", "listened to a whole album", "10 min ago"),
    entry("Kunming", "refused to do something they didn't want to", "15 min ago"),
    entry("Dalian", "rewatched a favourite film", "30 min ago"),
    entry("Shenyang", "made breakfast for themselves", "1 hour ago"),
    entry("Harbin", "sorted out the wardrobe", "just now"),
    entry("Taipei", "zoned out in a coffee shop", "1 min ago"),
    entry("Hong Kong", "bought the perfume they had their eye on", "2 min ago"),
];

/// Draw a random (origin, action, recency) tuple from the pools.
pub fn random_entry<R: Rng>(rng: &mut R) -> CatalogEntry {
    CatalogEntry {
        origin: ORIGINS[rng.random_range(0..ORIGINS.len())],
        action: ACTIONS[rng.random_range(0..ACTIONS.len())],
        recency: RECENCY_LABELS[rng.random_range(0..RECENCY_LABELS.len())],
    }
}
