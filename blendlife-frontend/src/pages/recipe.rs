use std::rc::Rc;

use leptos::*;
use leptos_router::*;

use blendlife_boundary::{Comment, CommentDraft, Recipe};
use blendlife_core::{
    controller::{RecipeDetailController, ViewState},
    events::CommentEvents,
    route::RECIPE_ID_PARAM,
};
use blendlife_frontend_api::PublicApi;

use crate::{components::CommentForm, BrowserSpawner};

type Controller = RecipeDetailController<PublicApi, PublicApi, BrowserSpawner>;

#[component]
pub fn RecipePage(public_api: PublicApi) -> impl IntoView {
    let params = use_params_map();
    let recipe_id = create_memo(move |_| params.with(|p| p.get(RECIPE_ID_PARAM).cloned()));

    // A new ID replaces the whole detail view including its controller.
    move || match recipe_id.get() {
        Some(id) => view! { <RecipeDetail public_api = public_api.clone() id /> }.into_view(),
        None => view! { <p>"Recipe not found"</p> }.into_view(),
    }
}

#[component]
fn RecipeDetail(public_api: PublicApi, id: String) -> impl IntoView {
    // -- signals -- //

    let state = create_rw_signal(ViewState::default());
    let text = create_rw_signal(String::new());
    let author = create_rw_signal(String::new());

    // -- controller -- //

    let events = expect_context::<CommentEvents>();
    let route = [(RECIPE_ID_PARAM, id.as_str())];
    let controller: Rc<Controller> = match RecipeDetailController::new(
        &route[..],
        public_api.clone(),
        public_api,
        events,
        BrowserSpawner,
    ) {
        Ok(controller) => Rc::new(controller),
        Err(err) => {
            log::error!("Unable to open recipe {id}: {err}");
            return view! { <p>"Unable to load recipe."</p> }.into_view();
        }
    };
    controller.on_change(move |s| state.set(s.clone()));
    state.set(controller.state());

    on_cleanup({
        let controller = Rc::clone(&controller);
        move || controller.destroy()
    });

    // -- callbacks -- //

    let on_submit = Callback::new({
        let controller = Rc::clone(&controller);
        move |()| {
            let author = author.get_untracked();
            let draft = CommentDraft {
                text: text.get_untracked(),
                author: Some(author.trim().to_owned()).filter(|a| !a.is_empty()),
                ..Default::default()
            };
            let controller = Rc::clone(&controller);
            spawn_local(async move {
                // The input is kept for another attempt if this fails.
                if controller.submit_comment(&draft).await.is_ok() {
                    text.set(String::new());
                }
            });
        }
    });

    let on_retry = Callback::new(move |()| {
        if let Err(err) = controller.reload() {
            log::warn!("Unable to reload recipe: {err}");
        }
    });

    let submitting = Signal::derive(move || state.with(|s| s.submitting));
    let submit_error = Signal::derive(move || state.with(|s| s.submit_error.clone()));

    view! {
      <section>
        <div class="container p-6 mx-auto">
          { move || state.with(|s| recipe_view(s, on_retry)) }
          <CommentForm text author disabled = submitting error = submit_error on_submit />
        </div>
      </section>
    }
    .into_view()
}

fn recipe_view(state: &ViewState, on_retry: Callback<()>) -> View {
    match (&state.recipe, &state.load_error) {
        (Some(recipe), load_error) => view! {
          { load_error.as_ref().map(|_| view! {
              <p class="mb-4 text-red-700">"Unable to refresh the recipe."</p>
          }) }
          <RecipeProfile recipe = recipe.clone() />
        }
        .into_view(),
        (None, Some(err)) => view! {
          <p>"Unable to load recipe."</p>
          <p class="text-sm text-gray-500">{ err.clone() }</p>
          <button
            class="mt-4 px-4 py-2 border rounded"
            on:click = move |_| on_retry.call(())
          >
            "Try again"
          </button>
        }
        .into_view(),
        (None, None) => view! { <p>"Loading recipe ..."</p> }.into_view(),
    }
}

#[component]
fn RecipeProfile(recipe: Recipe) -> impl IntoView {
    let Recipe {
        title,
        description,
        image,
        comments,
        ..
    } = recipe;

    view! {
      <div class="bg-white">
        { image.map(|src| view! {
            <img src = src alt="" class="h-96 w-full object-cover object-center" />
        }) }
        <div class="mx-auto max-w-2xl text-center lg:max-w-4xl">
          <h2 class="text-3xl font-bold tracking-tight text-gray-900 sm:text-4xl">{ title }</h2>
          <p class="mt-4 text-gray-500">{ description }</p>
        </div>
        <CommentList comments />
      </div>
    }
}

#[component]
fn CommentList(comments: Vec<Comment>) -> impl IntoView {
    if comments.is_empty() {
        return view! { <p class="mt-8 text-gray-500">"No comments yet."</p> }.into_view();
    }
    view! {
      <ul role="list" class="mt-8 divide-y divide-gray-100">
        { comments
            .into_iter()
            .map(|Comment { text, author, .. }| view! {
              <li class="py-4">
                <p class="text-sm text-gray-900">{ text }</p>
                { author.map(|a| view! { <p class="mt-1 text-xs text-gray-500">{ a }</p> }) }
              </li>
            })
            .collect_view() }
      </ul>
    }
    .into_view()
}
