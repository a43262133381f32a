use gloo_net::http::Response;
use serde::de::DeserializeOwned;
use thiserror::Error;

use blendlife_core::repositories;

mod public;

pub use self::public::*;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Fetch(String),

    #[error("{0}")]
    Api(#[from] blendlife_boundary::Error),
}

impl From<gloo_net::Error> for Error {
    fn from(err: gloo_net::Error) -> Self {
        Self::Fetch(format!("{err}"))
    }
}

impl From<Error> for repositories::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Fetch(msg) => Self::Transport(msg),
            Error::Api(err) if err.http_status == 404 => Self::NotFound,
            Error::Api(err) => Self::Rejected(err.message),
        }
    }
}

pub async fn into_json<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    // ensure we've got 2xx status
    if response.ok() {
        Ok(response.json().await?)
    } else {
        let http_status = response.status();
        match response.json::<blendlife_boundary::Error>().await {
            Ok(err) => Err(err.into()),
            Err(_) => Err(blendlife_boundary::Error {
                http_status,
                message: response.status_text(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_api_errors_into_repository_errors() {
        let not_found = Error::Api(blendlife_boundary::Error {
            http_status: 404,
            message: "Recipe not found".into(),
        });
        assert!(matches!(
            repositories::Error::from(not_found),
            repositories::Error::NotFound
        ));
        let rejected = Error::Api(blendlife_boundary::Error {
            http_status: 422,
            message: "Text can't be blank".into(),
        });
        assert!(matches!(
            repositories::Error::from(rejected),
            repositories::Error::Rejected(msg) if msg == "Text can't be blank"
        ));
        assert!(matches!(
            repositories::Error::from(Error::Fetch("offline".into())),
            repositories::Error::Transport(_)
        ));
    }
}
