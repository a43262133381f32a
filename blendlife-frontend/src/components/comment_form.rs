use leptos::{ev, *};

#[component]
pub fn CommentForm(
    text: RwSignal<String>,
    author: RwSignal<String>,
    disabled: Signal<bool>,
    error: Signal<Option<String>>,
    on_submit: Callback<()>,
) -> impl IntoView {
    view! {
      <form
        class="mt-12"
        on:submit = move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            on_submit.call(());
        }
      >
        <h3 class="text-xl font-semibold mb-4">"Leave a comment"</h3>
        <input
          type="text"
          placeholder="Your name"
          class="block w-full mb-4 px-3 py-1.5 border rounded"
          prop:value = move || author.get()
          on:input = move |ev| author.set(event_target_value(&ev))
        />
        <textarea
          rows="4"
          placeholder="What do you think?"
          class="block w-full mb-4 px-3 py-1.5 border rounded"
          prop:value = move || text.get()
          on:input = move |ev| text.set(event_target_value(&ev))
        ></textarea>
        { move || error.get().map(|err| view! {
            <p class="mb-4 text-red-700">"Unable to save your comment: " { err }</p>
        }) }
        <button
          type="submit"
          class="px-6 py-2.5 bg-kvm-raspberry text-white font-medium text-xs uppercase rounded"
          prop:disabled = move || disabled.get()
        >
          "Comment"
        </button>
      </form>
    }
}
