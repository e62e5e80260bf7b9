//! YouTube link mapping for the video course library.
//!
//! Maps lesson numbers to base video URLs and builds deep links that start
//! playback at a chunk's timestamp.

use std::collections::BTreeMap;
use url::Url;

/// Read-only mapping from lesson number to base video URL.
#[derive(Debug, Clone)]
pub struct VideoLibrary {
    videos: BTreeMap<u32, String>,
}

impl Default for VideoLibrary {
    /// The built-in SQL course library.
    fn default() -> Self {
        let videos = [
            (1, "https://youtu.be/yH1zCq-iaeU"),  // What is SQL
            (2, "https://youtu.be/HmH-76_2Ak8"),  // Data types, Primary Key
            (3, "https://youtu.be/v-2cIUgx_jw"),  // Create database, Create table
            (4, "https://youtu.be/4YAAgrm8_ZI"),  // Insert, Update, Delete
            (5, "https://youtu.be/eiLqDeDp7Oc"),  // Select, Where
            (6, "https://youtu.be/rfWYbMd3ApA"),  // Import Excel
            (7, "https://youtu.be/55_UN5gVARs"),  // String functions
            (8, "https://youtu.be/9NfthspfXEo"),  // Aggregate functions
            (9, "https://youtu.be/SvJLXj05cow"),  // Group By
            (10, "https://youtu.be/kwGh6XvLrEk"), // Timestamp & Extract
            (11, "https://youtu.be/H6988OpZKTU"), // SQL Joins
        ]
        .into_iter()
        .map(|(n, u)| (n, u.to_string()))
        .collect();

        Self { videos }
    }
}

impl VideoLibrary {
    /// Build a library from config overrides, falling back to the built-in
    /// map when no overrides are given. Keys that aren't lesson numbers are
    /// ignored.
    pub fn from_overrides(overrides: &BTreeMap<String, String>) -> Self {
        if overrides.is_empty() {
            return Self::default();
        }

        let videos = overrides
            .iter()
            .filter_map(|(k, v)| k.parse::<u32>().ok().map(|n| (n, v.clone())))
            .collect();

        Self { videos }
    }

    /// Base URL for a lesson number, if known.
    pub fn base_url(&self, video_number: u32) -> Option<&str> {
        self.videos.get(&video_number).map(String::as_str)
    }

    /// Deep link starting playback at `start_seconds` into the video.
    ///
    /// Returns None for unknown lesson numbers or unparseable base URLs.
    pub fn timestamp_link(&self, video_number: u32, start_seconds: f64) -> Option<String> {
        let base = self.base_url(video_number)?;
        let mut url = Url::parse(base).ok()?;
        url.query_pairs_mut()
            .append_pair("t", &format!("{}s", start_seconds as u64));
        Some(url.to_string())
    }

    /// Number of videos in the library.
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

/// Format a start offset in seconds for display.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_library() {
        let library = VideoLibrary::default();
        assert_eq!(library.len(), 11);
        assert_eq!(library.base_url(11), Some("https://youtu.be/H6988OpZKTU"));
        assert_eq!(library.base_url(99), None);
    }

    #[test]
    fn test_timestamp_link() {
        let library = VideoLibrary::default();
        let link = library.timestamp_link(1, 90.7).unwrap();
        assert_eq!(link, "https://youtu.be/yH1zCq-iaeU?t=90s");
    }

    #[test]
    fn test_timestamp_link_unknown_video() {
        let library = VideoLibrary::default();
        assert!(library.timestamp_link(42, 10.0).is_none());
    }

    #[test]
    fn test_overrides_replace_builtin_map() {
        let mut overrides = BTreeMap::new();
        overrides.insert("1".to_string(), "https://youtu.be/custom".to_string());
        overrides.insert("not-a-number".to_string(), "https://youtu.be/x".to_string());

        let library = VideoLibrary::from_overrides(&overrides);
        assert_eq!(library.len(), 1);
        assert_eq!(library.base_url(1), Some("https://youtu.be/custom"));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(125.0), "02:05");
        assert_eq!(format_timestamp(3725.0), "01:02:05");
    }
}
