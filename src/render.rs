use std::fmt::Write as _;

use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    OffsetDateTime,
};

use blendlife_boundary::{Comment, Recipe};

const DATE_TIME_FORMAT: &[FormatItem] = format_description!("[year]-[month]-[day] [hour]:[minute]");

pub fn recipe(recipe: &Recipe) -> String {
    let Recipe {
        id,
        title,
        description,
        image,
        comments,
        ..
    } = recipe;
    let mut out = format!("{title} (#{id})\n");
    if let Some(description) = description {
        _ = writeln!(out, "\n{}", description.trim());
    }
    if let Some(image) = image {
        _ = writeln!(out, "\nImage: {image}");
    }
    if comments.is_empty() {
        out.push_str("\nNo comments yet.\n");
    } else {
        _ = writeln!(out, "\nComments ({}):", comments.len());
        for c in comments {
            _ = writeln!(out, "  - {}", comment(c));
        }
    }
    out
}

pub fn comment(comment: &Comment) -> String {
    let mut line = comment.text.trim().to_owned();
    if let Some(author) = &comment.author {
        _ = write!(line, " by {author}");
    }
    if let Some(created_at) = &comment.created_at {
        _ = write!(line, " on {}", timestamp(created_at));
    }
    line
}

fn timestamp(created_at: &str) -> String {
    OffsetDateTime::parse(created_at, &Rfc3339)
        .ok()
        .and_then(|dt| dt.format(DATE_TIME_FORMAT).ok())
        .unwrap_or_else(|| created_at.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soup() -> Recipe {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "title": "Soup",
            "description": "Hot and salty. ",
            "comments": [
                {
                    "id": 1,
                    "text": "Great!",
                    "author": "Jo",
                    "created_at": "2024-05-01T12:30:00Z"
                },
                { "id": 2, "text": "Too salty", "created_at": "yesterday" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn render_recipe_with_comments() {
        assert_eq!(
            recipe(&soup()),
            "Soup (#42)\n\
             \n\
             Hot and salty.\n\
             \n\
             Comments (2):\n  \
             - Great! by Jo on 2024-05-01 12:30\n  \
             - Too salty on yesterday\n"
        );
    }

    #[test]
    fn render_recipe_without_comments() {
        let mut soup = soup();
        soup.comments.clear();
        soup.description = None;
        assert_eq!(recipe(&soup), "Soup (#42)\n\nNo comments yet.\n");
    }
}
