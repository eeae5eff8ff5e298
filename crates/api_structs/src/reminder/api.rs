use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod send_reminders {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub success: bool,
        pub message: String,
        /// Number of reminders found per window, keyed `found<label>` (e.g. `found24h`)
        #[serde(flatten)]
        pub found: BTreeMap<String, usize>,
        /// RFC 3339 timestamp of the sweep
        pub timestamp: String,
    }

    impl APIResponse {
        pub fn found_key(label: &str) -> String {
            format!("found{}", label)
        }

        pub fn found_for(&self, label: &str) -> Option<usize> {
            self.found.get(&Self::found_key(label)).copied()
        }
    }
}

pub mod get_reminder_preview {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WindowPreviewDTO {
        /// Instant the window points at, RFC 3339 in UTC
        pub target_date_time: String,
        /// First appointment date the sweep matches, `YYYY-MM-DD`
        pub date_string: String,
        /// Every appointment date the sweep matches
        pub date_strings: Vec<String>,
        /// `target_date_time` in the reminder timezone
        pub local_time: String,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub current_time: String,
        pub timezone: String,
        pub local_time: String,
        pub strategy: String,
        /// Keyed by window label
        pub looking_for: BTreeMap<String, WindowPreviewDTO>,
    }
}
