use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use leptos::*;
use leptos_router::*;

use blendlife_core::events::CommentEvents;
use blendlife_frontend_api::PublicApi;

mod components;
mod pages;
use pages::*;

const DEFAULT_API_URL: &str = "/api";

/// The API is served from the same origin unless
/// `BLENDLIFE_API_URL` was set at build time.
fn api_url() -> String {
    option_env!("BLENDLIFE_API_URL")
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_owned()
}

/// Runs background tasks on the browser's event loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

#[component]
#[must_use]
pub fn App() -> impl IntoView {
    let public_api = PublicApi::new(api_url());
    log::debug!("Use API at {}", api_url());

    // All recipe views of this app share one bus.
    provide_context(CommentEvents::new());

    view! {
      <Router>
        <main>
          <Routes>
            <Route
              path=Page::Home.path()
              view=|| view! { <Home /> }
            />
            <Route
              path=format!("{}/:id", Page::Recipes.path())
              view=move || view! { <RecipePage public_api = public_api.clone() /> }
            />
            <Route
              path="/*any"
              view=|| view! { <NotFound /> }
            />
          </Routes>
        </main>
      </Router>
    }
}

pub fn run() {
    mount_to_body(|| view! { <App /> });
}
