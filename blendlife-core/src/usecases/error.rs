use crate::repositories;
use futures::task::SpawnError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The route does not contain a recipe ID")]
    MissingRecipeId,
    #[error("The recipe view has already been closed")]
    Destroyed,
    #[error("Unable to run a background task: {0}")]
    Spawn(#[from] SpawnError),
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}
