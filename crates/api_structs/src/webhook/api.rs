use serde::{Deserialize, Serialize};

// Twilio posts webhooks as `application/x-www-form-urlencoded` with PascalCase keys.
// Every field is optional so a malformed webhook still gets a protocol answer.

pub mod incoming_call {
    use super::*;

    #[derive(Debug, Default, Deserialize, Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct RequestBody {
        /// The business number that was dialed
        #[serde(default)]
        pub to: String,
        /// The caller
        #[serde(default)]
        pub from: String,
    }
}

pub mod appointment_reply {
    use super::*;

    #[derive(Debug, Default, Deserialize, Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub to: String,
        #[serde(default)]
        pub from: String,
        #[serde(default)]
        pub body: String,
    }
}

pub mod sms_reply {
    use super::*;

    pub type RequestBody = appointment_reply::RequestBody;
}
