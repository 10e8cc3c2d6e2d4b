// Favorites: an ordered list of saved audio URLs, most recent first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const FALLBACK_TITLE: &str = "Audio";
pub const UNTITLED: &str = "Untitled audio";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: String,
    pub url: String,
    pub title: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Favorites {
    entries: Vec<FavoriteEntry>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<FavoriteEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|e| e.url == url)
    }

    /// Add `url` if absent, remove it if present. Returns true when the URL
    /// is a favorite afterwards.
    pub fn toggle(&mut self, url: &str, now: DateTime<Utc>) -> bool {
        if self.contains(url) {
            self.entries.retain(|e| e.url != url);
            return false;
        }

        let mut millis = now.timestamp_millis();
        while self.entries.iter().any(|e| e.id == millis.to_string()) {
            millis += 1;
        }
        self.entries.insert(
            0,
            FavoriteEntry {
                id: millis.to_string(),
                url: url.to_string(),
                title: audio_title(url),
                added_at: now,
            },
        );
        true
    }

    /// Remove by id. Returns the removed entry, if any.
    pub fn remove_by_id(&mut self, id: &str) -> Option<FavoriteEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }
}

/// Display title for an audio URL: the last path segment without its
/// extension. Strings that are not absolute URLs get a generic title.
pub fn audio_title(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return UNTITLED.to_string();
    };
    let scheme_ok = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok {
        return UNTITLED.to_string();
    }

    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    let path = rest.find('/').map_or("", |i| &rest[i..]);
    let filename = path.rsplit('/').next().unwrap_or_default();
    if filename.is_empty() {
        return FALLBACK_TITLE.to_string();
    }
    match filename.rfind('.') {
        Some(dot) if dot + 1 < filename.len() => filename[..dot].to_string(),
        _ => filename.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn title_is_filename_without_extension() {
        assert_eq!(audio_title("https://example.com/music/song.mp3"), "song");
        assert_eq!(audio_title("https://example.com/a/track.v2.flac?x=1#t"), "track.v2");
        assert_eq!(audio_title("https://example.com/noext"), "noext");
    }

    #[test]
    fn title_falls_back_for_bare_paths() {
        assert_eq!(audio_title("https://example.com/"), FALLBACK_TITLE);
        assert_eq!(audio_title("https://example.com"), FALLBACK_TITLE);
        assert_eq!(audio_title("https://example.com/dir/"), FALLBACK_TITLE);
    }

    #[test]
    fn title_for_non_url_is_untitled() {
        assert_eq!(audio_title("not a url"), UNTITLED);
        assert_eq!(audio_title("1http://x/y.mp3"), UNTITLED);
        assert_eq!(audio_title(""), UNTITLED);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut favs = Favorites::new();
        assert!(favs.toggle("https://a.test/one.mp3", at(1_000)));
        assert!(favs.contains("https://a.test/one.mp3"));
        assert_eq!(favs.entries()[0].title, "one");
        assert_eq!(favs.entries()[0].id, "1000");

        assert!(!favs.toggle("https://a.test/one.mp3", at(2_000)));
        assert!(favs.is_empty());
    }

    #[test]
    fn newest_first_and_ids_unique() {
        let mut favs = Favorites::new();
        favs.toggle("https://a.test/one.mp3", at(5_000));
        favs.toggle("https://a.test/two.mp3", at(5_000));
        assert_eq!(favs.entries()[0].url, "https://a.test/two.mp3");
        assert_eq!(favs.entries()[0].id, "5001");
        assert_eq!(favs.entries()[1].id, "5000");
    }

    #[test]
    fn remove_by_id_only_touches_match() {
        let mut favs = Favorites::new();
        favs.toggle("https://a.test/one.mp3", at(1));
        favs.toggle("https://a.test/two.mp3", at(2));
        assert!(favs.remove_by_id("missing").is_none());
        let removed = favs.remove_by_id("1").unwrap();
        assert_eq!(removed.url, "https://a.test/one.mp3");
        assert_eq!(favs.len(), 1);
    }
}
