use reqwest::{header, redirect::Policy, Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

pub(crate) struct BaseClient {
    address: String,
    client: Client,
}

#[derive(Debug)]
pub enum APIError {
    Network,
    MalformedResponse,
    BadClientData,
    NotFound,
    UnexpectedStatusCode(StatusCode),
}
pub type APIResponse<T> = Result<T, APIError>;

/// A response that is not JSON, e.g. TwiML, html or a redirect
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub location: Option<String>,
    pub body: String,
}

impl BaseClient {
    pub fn new(address: String) -> Self {
        // Redirects are part of the oauth flow and are inspected, not followed
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { address, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.address, path)
    }

    fn check_status_code(
        &self,
        res: &Response,
        expected_status_code: StatusCode,
    ) -> Result<(), APIError> {
        let status = res.status();
        if status == expected_status_code {
            return Ok(());
        }
        Err(match status {
            StatusCode::BAD_REQUEST => APIError::BadClientData,
            StatusCode::NOT_FOUND => APIError::NotFound,
            status => APIError::UnexpectedStatusCode(status),
        })
    }

    async fn get_json_response<T: for<'de> Deserialize<'de>>(
        &self,
        res: Response,
    ) -> APIResponse<T> {
        res.json::<T>()
            .await
            .map_err(|_| APIError::MalformedResponse)
    }

    async fn send(&self, builder: RequestBuilder) -> APIResponse<Response> {
        builder.send().await.map_err(|_| APIError::Network)
    }

    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self.send(self.client.get(&self.url(&path))).await?;
        self.check_status_code(&res, expected_status_code)?;
        self.get_json_response(res).await
    }

    /// Any status code is accepted so that error bodies can be inspected
    pub async fn get_raw(&self, path: String) -> APIResponse<RawResponse> {
        let res = self.send(self.client.get(&self.url(&path))).await?;
        Self::into_raw(res).await
    }

    pub async fn post_form<S: Serialize>(
        &self,
        body: &S,
        path: String,
    ) -> APIResponse<RawResponse> {
        let res = self.send(self.client.post(&self.url(&path)).form(body)).await?;
        Self::into_raw(res).await
    }

    async fn into_raw(res: Response) -> APIResponse<RawResponse> {
        let header_value = |name: header::HeaderName| {
            res.headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(String::from)
        };
        let status = res.status();
        let content_type = header_value(header::CONTENT_TYPE);
        let location = header_value(header::LOCATION);
        let body = res.text().await.map_err(|_| APIError::MalformedResponse)?;

        Ok(RawResponse {
            status,
            content_type,
            location,
            body,
        })
    }
}
