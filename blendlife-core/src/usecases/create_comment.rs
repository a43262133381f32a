use super::prelude::*;

/// Binds the draft to `recipe_id` and stores it.
///
/// The draft itself is left untouched so that the caller
/// can offer it for resubmission if the request fails.
pub async fn create_comment<R>(
    repo: &R,
    recipe_id: &RecipeId,
    draft: &CommentDraft,
) -> Result<Comment>
where
    R: CommentRepository + ?Sized,
{
    let new_comment = NewComment::new(draft, recipe_id.clone());
    log::debug!("Creating comment for recipe {recipe_id}");
    Ok(repo.create_comment(&new_comment).await?)
}
