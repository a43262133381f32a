use leptos::*;

mod recipe;

#[derive(Debug, Clone, Copy, Default)]
pub enum Page {
    #[default]
    Home,
    Recipes,
}

impl Page {
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Recipes => "/recipes",
        }
    }
}

#[component]
pub fn Home() -> impl IntoView {
    view! {
      <div class="mx-auto text-center max-w-7xl px-4 mt-12 pb-16">
        <h2 class="text-3xl font-bold tracking-tight text-gray-900">"BlendLife"</h2>
        <p class="mt-4 text-gray-500">"Open a recipe to see what people think about it."</p>
      </div>
    }
}

#[component]
pub fn NotFound() -> impl IntoView {
    view! {
      <div class="mx-auto text-center max-w-7xl px-4 mt-12 pb-16">
        <h2 class="text-3xl font-bold tracking-tight text-gray-900">"Page not found"</h2>
      </div>
    }
}

pub use self::recipe::*;
