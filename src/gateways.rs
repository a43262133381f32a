use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{
    blocking::{Client, Response},
    StatusCode,
};
use serde::de::DeserializeOwned;

use blendlife_boundary::{Comment, CommentEnvelope, NewComment, Recipe, RecipeId};
use blendlife_core::repositories::{self, CommentRepository, RecipeRepository};

use crate::config;

/// Blocking HTTP client of the BlendLife REST API.
///
/// The futures returned by the repository implementations complete
/// within their first poll, so they must not be driven by an async
/// runtime that forbids blocking (e.g. tokio).
#[derive(Debug, Clone)]
pub struct HttpApi {
    url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(cfg: &config::Api) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(cfg.request_timeout)
            .user_agent(concat!("blendlife/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            url: cfg.base_url.clone(),
            client,
        })
    }

    fn recipe_url(&self, id: &RecipeId) -> String {
        let encoded_id = utf8_percent_encode(id.as_str(), NON_ALPHANUMERIC);
        format!("{}/recipes/{encoded_id}", self.url)
    }

    fn comments_url(&self) -> String {
        format!("{}/comments", self.url)
    }
}

#[async_trait(?Send)]
impl RecipeRepository for HttpApi {
    async fn get_recipe(&self, id: &RecipeId) -> repositories::Result<Recipe> {
        let url = self.recipe_url(id);
        log::debug!("GET {url}");
        let response = self.client.get(&url).send().map_err(transport_error)?;
        into_json(response)
    }
}

#[async_trait(?Send)]
impl CommentRepository for HttpApi {
    async fn create_comment(&self, comment: &NewComment) -> repositories::Result<Comment> {
        let url = self.comments_url();
        log::debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .json(&CommentEnvelope { comment })
            .send()
            .map_err(transport_error)?;
        into_json(response)
    }
}

fn transport_error(err: reqwest::Error) -> repositories::Error {
    repositories::Error::Transport(err.to_string())
}

fn into_json<T>(response: Response) -> repositories::Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .map_err(|err| repositories::Error::Other(err.into()));
    }
    let body = response.text().unwrap_or_default();
    Err(error_response(status, &body))
}

fn error_response(status: StatusCode, body: &str) -> repositories::Error {
    if status == StatusCode::NOT_FOUND {
        return repositories::Error::NotFound;
    }
    let message = serde_json::from_str::<blendlife_boundary::Error>(body)
        .map(|err| err.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_owned()
        });
    repositories::Error::Rejected(format!("{message} ({})", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn api() -> HttpApi {
        HttpApi::new(&config::Api {
            base_url: "http://localhost:3000/api".into(),
            request_timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[test]
    fn encode_recipe_id_in_url() {
        let api = api();
        assert_eq!(
            api.recipe_url(&"42".into()),
            "http://localhost:3000/api/recipes/42"
        );
        assert_eq!(
            api.recipe_url(&"a/b c".into()),
            "http://localhost:3000/api/recipes/a%2Fb%20c"
        );
        assert_eq!(api.comments_url(), "http://localhost:3000/api/comments");
    }

    #[test]
    fn map_error_responses() {
        assert!(matches!(
            error_response(StatusCode::NOT_FOUND, ""),
            repositories::Error::NotFound
        ));
        assert!(matches!(
            error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                r#"{"http_status":422,"message":"Text can't be blank"}"#
            ),
            repositories::Error::Rejected(msg) if msg == "Text can't be blank (422)"
        ));
        assert!(matches!(
            error_response(StatusCode::BAD_GATEWAY, "<html>"),
            repositories::Error::Rejected(msg) if msg == "Bad Gateway (502)"
        ));
    }
}
