pub mod controller;
pub mod events;
pub mod repositories;
pub mod route;
pub mod usecases;

pub mod entities {
    pub use blendlife_boundary::{
        Comment, CommentDraft, CommentId, NewComment, Recipe, RecipeId,
    };
}
