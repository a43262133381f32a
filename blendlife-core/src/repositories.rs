// Remote resource access traits.
// Each repository is responsible for a single resource
// of the backend. All calls are asynchronous and are
// expected to run on a single thread, i.e. the returned
// futures do not need to be `Send`.

use crate::entities::*;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The requested recipe could not be found")]
    NotFound,
    #[error("The request was rejected: {0}")]
    Rejected(String),
    #[error("The server could not be reached: {0}")]
    Transport(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[async_trait(?Send)]
pub trait RecipeRepository {
    async fn get_recipe(&self, id: &RecipeId) -> Result<Recipe>;
}

#[async_trait(?Send)]
pub trait CommentRepository {
    async fn create_comment(&self, comment: &NewComment) -> Result<Comment>;
}
