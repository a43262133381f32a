mod create_comment;
mod error;
mod load_recipe;

pub type Result<T> = std::result::Result<T, Error>;

pub use self::{create_comment::*, error::Error, load_recipe::*};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{entities::*, repositories::*};
}
