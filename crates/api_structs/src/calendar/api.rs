use serde::{Deserialize, Serialize};

pub mod oauth_start {
    use super::*;

    #[derive(Debug, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        #[serde(default)]
        pub business_id: Option<String>,
    }
}

pub mod oauth_callback {
    use super::*;

    /// Query the provider redirects back with
    #[derive(Debug, Default, Deserialize, Serialize)]
    pub struct QueryParams {
        #[serde(default)]
        pub code: Option<String>,
        /// The business id passed along when starting the flow
        #[serde(default)]
        pub state: Option<String>,
        #[serde(default)]
        pub error: Option<String>,
        #[serde(default)]
        pub error_description: Option<String>,
    }
}

pub mod sync_calendars {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub success: bool,
        pub message: String,
        /// Number of businesses that were synced
        pub businesses: usize,
        pub created: usize,
        pub updated: usize,
        /// Number of businesses whose sync failed
        pub failed: usize,
    }
}
