use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Identifiers are sent as strings but the backend
/// may answer with numeric tokens.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(from: RawId) -> Self {
        match from {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }

        impl $name {
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(from: $name) -> Self {
                from.0
            }
        }

        impl From<String> for $name {
            fn from(from: String) -> Self {
                Self(from)
            }
        }

        impl From<&str> for $name {
            fn from(from: &str) -> Self {
                Self(from.to_owned())
            }
        }

        impl From<u64> for $name {
            fn from(from: u64) -> Self {
                Self(from.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(RecipeId);
string_id!(CommentId);

/// A recipe as delivered by the backend.
///
/// Only the fields the detail view renders are modelled,
/// everything else is kept as is in `extra`.
#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Recipe {
    pub id          : RecipeId,
    pub title       : String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description : Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image       : Option<String>,
    #[serde(default)]
    pub comments    : Vec<Comment>,
    #[serde(flatten)]
    pub extra       : Map<String, Value>,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Comment {
    pub id         : CommentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id  : Option<RecipeId>,
    pub text       : String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author     : Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at : Option<String>,
}

/// User input of the comment form.
#[derive(Serialize, Deserialize, Default)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct CommentDraft {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A draft bound to the recipe it comments on.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct NewComment {
    #[serde(flatten)]
    draft: CommentDraft,
    recipe_id: RecipeId,
}

impl NewComment {
    #[must_use]
    pub fn new(draft: &CommentDraft, recipe_id: RecipeId) -> Self {
        let CommentDraft {
            text,
            author,
            extra,
        } = draft;
        let mut extra = extra.clone();
        // The foreign key always wins over a field of the same name.
        extra.remove("recipe_id");
        Self {
            draft: CommentDraft {
                text: text.clone(),
                author: author.clone(),
                extra,
            },
            recipe_id,
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &CommentDraft {
        &self.draft
    }

    #[must_use]
    pub const fn recipe_id(&self) -> &RecipeId {
        &self.recipe_id
    }
}

/// Request body wrapper expected by the comments endpoint.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct CommentEnvelope<T> {
    pub comment: T,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(
    feature = "extra-derive",
    derive(Debug, Clone, PartialEq, Eq, thiserror::Error)
)]
#[cfg_attr(feature = "extra-derive", error("{message} ({http_status})"))]
pub struct Error {
    pub http_status: u16,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_numeric_recipe_id() {
        let recipe: Recipe = serde_json::from_value(json!({
            "id": 42,
            "title": "Soup"
        }))
        .unwrap();
        assert_eq!(recipe.id.as_str(), "42");
        assert!(recipe.comments.is_empty());
        assert!(recipe.extra.is_empty());
    }

    #[test]
    fn keep_unknown_recipe_fields() {
        let recipe: Recipe = serde_json::from_value(json!({
            "id": "42",
            "title": "Soup",
            "ingredients": ["water", "salt"],
            "comments": [{ "id": 7, "text": "Yummy" }]
        }))
        .unwrap();
        assert_eq!(recipe.comments.len(), 1);
        assert_eq!(recipe.comments[0].id.as_str(), "7");
        assert_eq!(recipe.extra["ingredients"], json!(["water", "salt"]));
        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["ingredients"], json!(["water", "salt"]));
        assert_eq!(value["id"], json!("42"));
    }

    #[test]
    fn new_comment_carries_the_recipe_id() {
        let draft = CommentDraft {
            text: "Great!".into(),
            ..Default::default()
        };
        let new_comment = NewComment::new(&draft, "42".into());
        assert_eq!(
            serde_json::to_value(&new_comment).unwrap(),
            json!({ "text": "Great!", "recipe_id": "42" })
        );
        assert_eq!(draft.text, "Great!");
        assert!(draft.extra.is_empty());
    }

    #[test]
    fn new_comment_overrides_a_foreign_recipe_id() {
        let mut draft = CommentDraft {
            text: "Great!".into(),
            author: Some("Jo".into()),
            ..Default::default()
        };
        draft.extra.insert("recipe_id".into(), json!("1"));
        draft.extra.insert("rating".into(), json!(5));
        let new_comment = NewComment::new(&draft, 42_u64.into());
        assert_eq!(
            serde_json::to_value(CommentEnvelope {
                comment: &new_comment
            })
            .unwrap(),
            json!({
                "comment": {
                    "text": "Great!",
                    "author": "Jo",
                    "rating": 5,
                    "recipe_id": "42"
                }
            })
        );
        // the caller's draft stays untouched
        assert_eq!(draft.extra["recipe_id"], json!("1"));
    }
}
