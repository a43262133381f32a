use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use futures::executor::{LocalPool, LocalSpawner};

use blendlife_boundary::CommentDraft;
use blendlife_core::{
    controller::{RecipeDetailController, ViewState},
    events::CommentEvents,
    route::RECIPE_ID_PARAM,
};

use crate::{config::Config, gateways::HttpApi, render};

#[derive(Parser)]
#[command(author, version, about = "Show BlendLife recipes and comment on them")]
pub struct Args {
    /// Configuration file (defaults to ./blendlife.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a recipe and its comments
    Show {
        /// ID of the recipe
        id: String,
    },
    /// Comment on a recipe
    Comment {
        /// ID of the recipe
        id: String,
        /// The comment
        text: String,
        /// Name of the author
        #[arg(long)]
        author: Option<String>,
    },
}

type Controller = RecipeDetailController<HttpApi, HttpApi, LocalSpawner>;

pub fn run() -> Result<()> {
    let args = Args::parse();
    let cfg = Config::try_load_from_file_or_default(args.config.as_ref())?;
    log::debug!("Use API at {}", cfg.api.base_url);
    let api = HttpApi::new(&cfg.api)?;
    let mut pool = LocalPool::new();
    let events = CommentEvents::new();

    match args.command {
        Command::Show { id } => {
            let controller = open(&pool, &api, &events, &id)?;
            pool.run_until_stalled();
            print_recipe(&controller.state())
        }
        Command::Comment { id, text, author } => {
            let controller = open(&pool, &api, &events, &id)?;
            pool.run_until_stalled();
            let draft = CommentDraft {
                text,
                author,
                ..Default::default()
            };
            let comment = pool.run_until(controller.submit_comment(&draft))?;
            log::info!(
                "Your comment on recipe {} has been saved (#{})",
                controller.recipe_id(),
                comment.id
            );
            // wait for the reload triggered by the new comment
            pool.run_until_stalled();
            print_recipe(&controller.state())
        }
    }
}

fn open(pool: &LocalPool, api: &HttpApi, events: &CommentEvents, id: &str) -> Result<Controller> {
    let route: &[(&str, &str)] = &[(RECIPE_ID_PARAM, id)];
    let controller = RecipeDetailController::new(
        route,
        api.clone(),
        api.clone(),
        events.clone(),
        pool.spawner(),
    )?;
    Ok(controller)
}

fn print_recipe(state: &ViewState) -> Result<()> {
    if let Some(recipe) = &state.recipe {
        print!("{}", render::recipe(recipe));
    }
    match &state.load_error {
        Some(err) => Err(anyhow!("Unable to load recipe: {err}")),
        None if state.recipe.is_none() => Err(anyhow!("Unable to load recipe")),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_comment_command() {
        let args = Args::try_parse_from([
            "blendlife", "comment", "42", "Great!", "--author", "Jo",
        ])
        .unwrap();
        assert!(args.config.is_none());
        let Command::Comment { id, text, author } = args.command else {
            panic!("unexpected command");
        };
        assert_eq!(id, "42");
        assert_eq!(text, "Great!");
        assert_eq!(author.as_deref(), Some("Jo"));
    }

    #[test]
    fn fail_without_loaded_recipe() {
        assert!(print_recipe(&ViewState::default()).is_err());
        let state = ViewState {
            load_error: Some("connection refused".into()),
            ..Default::default()
        };
        assert!(print_recipe(&state).is_err());
    }
}
