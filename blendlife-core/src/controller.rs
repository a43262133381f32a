//! View model of the recipe detail page.
//!
//! [`RecipeDetailController`] loads one recipe, submits comments on it
//! and reloads the recipe whenever a comment was created on the shared
//! [`CommentEvents`] bus. It is meant to live exactly as long as the view
//! that owns it: dropping (or [destroying](RecipeDetailController::destroy))
//! the controller releases its subscription and makes it ignore all
//! responses that are still in flight.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use futures::task::{LocalSpawn, LocalSpawnExt};

use crate::{
    entities::*,
    events::{CommentEvent, CommentEvents, Subscription},
    repositories::{CommentRepository, RecipeRepository},
    route::{self, RouteParams},
    usecases::{self, Error, Result},
};

/// Everything the view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub recipe: Option<Recipe>,
    pub loading: bool,
    /// Reason why the latest load failed.
    pub load_error: Option<String>,
    pub submitting: bool,
    /// Reason why the latest comment could not be created.
    pub submit_error: Option<String>,
}

impl ViewState {
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.recipe.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response has been applied to the view state.
    Applied,
    /// The response has been dropped because the response of a newer
    /// load has already been applied or the view has been closed.
    Stale,
}

type Observer = Rc<dyn Fn(&ViewState)>;

struct Shared<R, C, S> {
    recipe_id: RecipeId,
    recipes: R,
    comments: C,
    events: CommentEvents,
    spawner: S,
    state: RefCell<ViewState>,
    /// Generation of the most recently started load.
    started: Cell<u64>,
    /// Generation of the most recently applied load.
    completed: Cell<u64>,
    pending_loads: Cell<usize>,
    pending_submits: Cell<usize>,
    destroyed: Cell<bool>,
    observer: RefCell<Option<Observer>>,
}

#[derive(Debug, Clone, Copy)]
enum Activity {
    Loading,
    Submitting,
}

/// Counts an activity as pending until it is finished or dropped.
///
/// Dropping covers futures that are cancelled before completion.
struct Pending<'a, R, C, S> {
    shared: &'a Shared<R, C, S>,
    activity: Activity,
    finished: bool,
}

impl<R, C, S> Pending<'_, R, C, S> {
    /// Ends the activity and applies `modify` within the same update.
    fn finish<F>(mut self, modify: F)
    where
        F: FnOnce(&mut ViewState),
    {
        self.finished = true;
        self.shared.leave(self.activity);
        self.shared.update(modify);
    }
}

impl<R, C, S> Drop for Pending<'_, R, C, S> {
    fn drop(&mut self) {
        if !self.finished {
            self.shared.leave(self.activity);
            self.shared.update(|_| {});
        }
    }
}

impl<R, C, S> Shared<R, C, S> {
    fn update<F>(&self, modify: F)
    where
        F: FnOnce(&mut ViewState),
    {
        {
            let mut state = self.state.borrow_mut();
            modify(&mut state);
            state.loading = self.pending_loads.get() > 0;
            state.submitting = self.pending_submits.get() > 0;
        }
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            let snapshot = self.state.borrow().clone();
            observer(&snapshot);
        }
    }

    const fn counter(&self, activity: Activity) -> &Cell<usize> {
        match activity {
            Activity::Loading => &self.pending_loads,
            Activity::Submitting => &self.pending_submits,
        }
    }

    fn enter(&self, activity: Activity) -> Pending<'_, R, C, S> {
        let counter = self.counter(activity);
        counter.set(counter.get() + 1);
        self.update(|_| {});
        Pending {
            shared: self,
            activity,
            finished: false,
        }
    }

    fn leave(&self, activity: Activity) {
        let counter = self.counter(activity);
        counter.set(counter.get().saturating_sub(1));
    }
}

impl<R, C, S> Shared<R, C, S>
where
    R: RecipeRepository + 'static,
    C: CommentRepository + 'static,
    S: LocalSpawn + 'static,
{
    fn dispatch_load(self: &Rc<Self>) -> Result<()> {
        let shared = Rc::clone(self);
        self.spawner.spawn_local(async move {
            // Failures end up in the view state
            _ = shared.load().await;
        })?;
        Ok(())
    }

    async fn load(&self) -> Result<LoadOutcome> {
        if self.destroyed.get() {
            return Err(Error::Destroyed);
        }
        let generation = self.started.get() + 1;
        self.started.set(generation);
        let pending = self.enter(Activity::Loading);

        let result = usecases::load_recipe(&self.recipes, &self.recipe_id).await;

        if self.destroyed.get() {
            log::debug!("Discard recipe {}: view closed", self.recipe_id);
            return Ok(LoadOutcome::Stale);
        }
        let completed = self.completed.get();
        if generation <= completed {
            log::debug!(
                "Discard stale response #{generation} for recipe {}: #{completed} already applied",
                self.recipe_id
            );
            return Ok(LoadOutcome::Stale);
        }
        self.completed.set(generation);
        match result {
            Ok(recipe) => {
                pending.finish(|state| {
                    state.recipe = Some(recipe);
                    state.load_error = None;
                });
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                log::warn!("Unable to load recipe {}: {err}", self.recipe_id);
                pending.finish(|state| state.load_error = Some(err.to_string()));
                Err(err)
            }
        }
    }
}

pub struct RecipeDetailController<R, C, S> {
    shared: Rc<Shared<R, C, S>>,
    subscription: RefCell<Option<Subscription>>,
}

impl<R, C, S> RecipeDetailController<R, C, S>
where
    R: RecipeRepository + 'static,
    C: CommentRepository + 'static,
    S: LocalSpawn + 'static,
{
    /// Binds a new controller to the recipe of the current route.
    ///
    /// The controller immediately subscribes to `events` and
    /// starts loading the recipe on `spawner`.
    pub fn new<P>(
        route: &P,
        recipes: R,
        comments: C,
        events: CommentEvents,
        spawner: S,
    ) -> Result<Self>
    where
        P: RouteParams + ?Sized,
    {
        let recipe_id = route::recipe_id(route).ok_or(Error::MissingRecipeId)?;
        let shared = Rc::new(Shared {
            recipe_id,
            recipes,
            comments,
            events,
            spawner,
            state: RefCell::default(),
            started: Cell::new(0),
            completed: Cell::new(0),
            pending_loads: Cell::new(0),
            pending_submits: Cell::new(0),
            destroyed: Cell::new(false),
            observer: RefCell::new(None),
        });
        let subscription = {
            let weak = Rc::downgrade(&shared);
            shared.events.subscribe(move |event: &CommentEvent| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let CommentEvent::Created { recipe_id } = event;
                log::debug!(
                    "Comment created on recipe {recipe_id}: reload recipe {}",
                    shared.recipe_id
                );
                if let Err(err) = shared.dispatch_load() {
                    log::error!("Unable to reload recipe {}: {err}", shared.recipe_id);
                }
            })
        };
        let controller = Self {
            shared,
            subscription: RefCell::new(Some(subscription)),
        };
        controller.shared.dispatch_load()?;
        Ok(controller)
    }

    #[must_use]
    pub fn recipe_id(&self) -> &RecipeId {
        &self.shared.recipe_id
    }

    #[must_use]
    pub fn state(&self) -> ViewState {
        self.shared.state.borrow().clone()
    }

    /// Registers a callback that receives every new view state.
    ///
    /// Replaces the previous observer.
    pub fn on_change<F>(&self, observer: F)
    where
        F: Fn(&ViewState) + 'static,
    {
        *self.shared.observer.borrow_mut() = Some(Rc::new(observer));
    }

    /// Fetches the recipe and applies the response unless it got stale.
    pub async fn load_recipe(&self) -> Result<LoadOutcome> {
        self.shared.load().await
    }

    /// Same as [`Self::load_recipe`] but runs in the background.
    pub fn reload(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(Error::Destroyed);
        }
        self.shared.dispatch_load()
    }

    /// Creates a comment on the current recipe.
    ///
    /// On success all subscribers of the comment events are notified,
    /// including this controller which then reloads its recipe.
    /// On failure the reason is kept in [`ViewState::submit_error`]
    /// and nothing is published.
    pub async fn submit_comment(&self, draft: &CommentDraft) -> Result<Comment> {
        let shared = &self.shared;
        if shared.destroyed.get() {
            return Err(Error::Destroyed);
        }
        let pending = shared.enter(Activity::Submitting);
        let result = usecases::create_comment(&shared.comments, &shared.recipe_id, draft).await;
        match result {
            Ok(comment) => {
                log::info!(
                    "Created comment {} on recipe {}",
                    comment.id,
                    shared.recipe_id
                );
                pending.finish(|state| state.submit_error = None);
                let notified = shared.events.publish(&CommentEvent::Created {
                    recipe_id: shared.recipe_id.clone(),
                });
                log::debug!("Notified {notified} subscriber(s) about the new comment");
                Ok(comment)
            }
            Err(err) => {
                log::error!(
                    "Unable to create comment on recipe {}: {err}",
                    shared.recipe_id
                );
                pending.finish(|state| state.submit_error = Some(err.to_string()));
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.shared.destroyed.get()
    }

    /// Detaches the controller from its view.
    ///
    /// Releases the event subscription and the observer. Responses
    /// that arrive afterwards are ignored. Calling it twice is a no-op.
    pub fn destroy(&self) {
        if self.shared.destroyed.replace(true) {
            return;
        }
        log::debug!("Closing view of recipe {}", self.shared.recipe_id);
        if let Some(subscription) = self.subscription.borrow_mut().take() {
            subscription.unsubscribe();
        }
        self.shared.observer.borrow_mut().take();
    }
}

impl<R, C, S> Drop for RecipeDetailController<R, C, S> {
    fn drop(&mut self) {
        self.shared.destroyed.set(true);
        self.subscription.get_mut().take();
        self.shared.observer.borrow_mut().take();
    }
}

impl<R, C, S> fmt::Debug for RecipeDetailController<R, C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeDetailController")
            .field("recipe_id", &self.shared.recipe_id)
            .field("state", &self.shared.state.borrow())
            .field("destroyed", &self.shared.destroyed.get())
            .finish_non_exhaustive()
    }
}
