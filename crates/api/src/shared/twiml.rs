use actix_web::{http::header, HttpResponse};
use quick_xml::escape::partial_escape;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const VOICE: &str = "alice";

/// A TwiML document. Twilio executes the verbs in order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TwimlResponse {
    verbs: Vec<String>,
}

impl TwimlResponse {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn say(mut self, text: &str) -> Self {
        self.verbs
            .push(format!(r#"<Say voice="{}">{}</Say>"#, VOICE, partial_escape(text)));
        self
    }

    pub fn message(mut self, text: &str) -> Self {
        self.verbs.push(format!("<Message>{}</Message>", partial_escape(text)));
        self
    }

    pub fn hangup(mut self) -> Self {
        self.verbs.push("<Hangup/>".into());
        self
    }

    pub fn render(&self) -> String {
        format!(
            "{}<Response>{}</Response>",
            XML_DECLARATION,
            self.verbs.concat()
        )
    }

    /// Twilio requires a 200 for every webhook, also when nothing is to be done
    pub fn into_http_response(self) -> HttpResponse {
        HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, "text/xml"))
            .body(self.render())
    }
}
