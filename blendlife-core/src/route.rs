use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

use crate::entities::RecipeId;

/// Name of the path parameter that holds the recipe ID,
/// e.g. `/recipes/:id`.
pub const RECIPE_ID_PARAM: &str = "id";

/// Read-only access to the parameters of the current route.
pub trait RouteParams {
    fn param(&self, key: &str) -> Option<String>;
}

impl<S: BuildHasher> RouteParams for HashMap<String, String, S> {
    fn param(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl RouteParams for BTreeMap<String, String> {
    fn param(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl RouteParams for [(&str, &str)] {
    fn param(&self, key: &str) -> Option<String> {
        self.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_owned())
    }
}

pub fn recipe_id<P>(params: &P) -> Option<RecipeId>
where
    P: RouteParams + ?Sized,
{
    params
        .param(RECIPE_ID_PARAM)
        .map(|id| id.trim().to_owned())
        .filter(|id| !id.is_empty())
        .map(RecipeId::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_recipe_id() {
        let params: &[(&str, &str)] = &[("id", "42")];
        assert_eq!(recipe_id(params), Some("42".into()));
    }

    #[test]
    fn ignore_blank_recipe_id() {
        let mut params = HashMap::new();
        params.insert("id".to_string(), "  ".to_string());
        assert_eq!(recipe_id(&params), None);
        assert_eq!(recipe_id(&BTreeMap::<String, String>::new()), None);
    }
}
