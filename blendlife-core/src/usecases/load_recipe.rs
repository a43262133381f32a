use super::prelude::*;

pub async fn load_recipe<R>(repo: &R, id: &RecipeId) -> Result<Recipe>
where
    R: RecipeRepository + ?Sized,
{
    log::debug!("Loading recipe {id}");
    Ok(repo.get_recipe(id).await?)
}
