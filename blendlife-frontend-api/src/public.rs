use async_trait::async_trait;
use gloo_net::http::Request;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use blendlife_boundary::{Comment, CommentEnvelope, NewComment, Recipe, RecipeId};
use blendlife_core::repositories::{self, CommentRepository, RecipeRepository};

use crate::{into_json, Result};

/// Public BlendLife API
#[derive(Clone)]
pub struct PublicApi {
    url: String,
}

impl PublicApi {
    #[must_use]
    pub const fn new(url: String) -> Self {
        Self { url }
    }

    pub async fn recipe(&self, id: &RecipeId) -> Result<Recipe> {
        let encoded_id = utf8_percent_encode(id.as_str(), NON_ALPHANUMERIC);
        let url = format!("{}/recipes/{encoded_id}", self.url);
        let response = Request::get(&url).send().await?;
        into_json(response).await
    }

    pub async fn create_comment(&self, comment: &NewComment) -> Result<Comment> {
        let url = format!("{}/comments", self.url);
        let response = Request::post(&url)
            .json(&CommentEnvelope { comment })?
            .send()
            .await?;
        into_json(response).await
    }
}

#[async_trait(?Send)]
impl RecipeRepository for PublicApi {
    async fn get_recipe(&self, id: &RecipeId) -> repositories::Result<Recipe> {
        Ok(self.recipe(id).await?)
    }
}

#[async_trait(?Send)]
impl CommentRepository for PublicApi {
    async fn create_comment(&self, comment: &NewComment) -> repositories::Result<Comment> {
        Ok(PublicApi::create_comment(self, comment).await?)
    }
}
