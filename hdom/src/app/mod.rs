//! The render loop: state, a view function and a mount point that is
//! rebuilt on every state change.

mod merge;

pub use self::merge::Merge;

use std::{
    cell::{Cell, Ref, RefCell},
    rc::{Rc, Weak},
};

use crate::{
    dom::{Element, Handler},
    host::Host,
    render, Config, Error,
};

type Update<S> = Box<dyn FnOnce(&mut S)>;
type ViewFn<S> = Box<dyn Fn(&S, &Handle<S>) -> Element>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// The view function is running or its result is being attached.
    Rendering,
}

struct Inner<H: Host, S> {
    host: H,
    mount: H::Node,
    state: RefCell<S>,
    view: ViewFn<S>,

    queue: RefCell<Vec<Update<S>>>,
    // Set while updates are applied or a render runs. Updates scheduled in
    // that window are queued and picked up before the cycle ends.
    busy: Cell<bool>,
    phase: Cell<Phase>,
    renders: Cell<u64>,
}

trait Schedule<S> {
    fn schedule(self: Rc<Self>, update: Update<S>) -> Result<(), Error>;

    fn phase(&self) -> Phase;
}

/// Clears the busy flag and phase when a cycle ends, including by unwinding.
struct CycleGuard<'a> {
    busy: &'a Cell<bool>,
    phase: &'a Cell<Phase>,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.busy.set(false);
        self.phase.set(Phase::Idle);
    }
}

impl<H, S> Schedule<S> for Inner<H, S>
where
    H: Host + 'static,
    H::Node: 'static,
    S: 'static,
{
    fn schedule(self: Rc<Self>, update: Update<S>) -> Result<(), Error> {
        self.queue.borrow_mut().push(update);
        self.drive(false)
    }

    fn phase(&self) -> Phase {
        self.phase.get()
    }
}

impl<H, S> Inner<H, S>
where
    H: Host + 'static,
    H::Node: 'static,
    S: 'static,
{
    fn drive(self: &Rc<Self>, force_render: bool) -> Result<(), Error> {
        if self.busy.replace(true) {
            return Ok(());
        }
        let _guard = CycleGuard {
            busy: &self.busy,
            phase: &self.phase,
        };
        self.cycle(force_render)
    }

    fn cycle(self: &Rc<Self>, mut render_pending: bool) -> Result<(), Error> {
        loop {
            let updates = std::mem::take(&mut *self.queue.borrow_mut());
            if !updates.is_empty() {
                let mut state = self.state.borrow_mut();
                for update in updates {
                    update(&mut *state);
                }
                render_pending = true;
            }

            if !render_pending {
                return Ok(());
            }
            render_pending = false;
            self.render()?;
        }
    }

    fn render(self: &Rc<Self>) -> Result<(), Error> {
        self.phase.set(Phase::Rendering);
        let result = self.render_inner();
        self.phase.set(Phase::Idle);
        result
    }

    fn render_inner(self: &Rc<Self>) -> Result<(), Error> {
        self.host.clear_children(&self.mount)?;

        let handle = Handle::new(self);
        let element = {
            let state = self.state.borrow();
            (self.view)(&*state, &handle)
        };
        render::render(&self.host, &self.mount, &element)?;

        let renders = self.renders.get() + 1;
        self.renders.set(renders);
        tracing::trace!(renders, "rendered");
        Ok(())
    }
}

/// A weak state setter handed to view functions.
///
/// Every change runs a full render before the call returns. Changes
/// requested while a render is in flight are applied after it.
pub struct Handle<S> {
    inner: Weak<dyn Schedule<S>>,
}

impl<S> Clone for Handle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: 'static> Handle<S> {
    fn new<H>(inner: &Rc<Inner<H, S>>) -> Self
    where
        H: Host + 'static,
        H::Node: 'static,
    {
        let inner: Weak<Inner<H, S>> = Rc::downgrade(inner);
        Self { inner }
    }

    /// Returns `false` once the render loop was dropped.
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn update(&self, f: impl FnOnce(&mut S) + 'static) {
        if let Some(inner) = self.inner.upgrade() {
            if let Err(error) = inner.schedule(Box::new(f)) {
                tracing::error!(
                    state=%std::any::type_name::<S>(),
                    %error,
                    "render failed"
                );
            }
        } else {
            tracing::warn!(
                state=%std::any::type_name::<S>(),
                "Tried to update a dropped render loop"
            );
        }
    }

    /// The phase of the render loop, or `None` once it was dropped.
    pub fn phase(&self) -> Option<Phase> {
        self.inner.upgrade().map(|inner| inner.phase())
    }

    /// Replaces the state.
    pub fn set(&self, value: S) {
        self.update(move |state| *state = value);
    }

    pub fn merge(&self, patch: S::Patch)
    where
        S: Merge,
        S::Patch: 'static,
    {
        self.update(move |state| state.merge(patch));
    }

    /// A handler that applies `f` to the state.
    pub fn on(&self, f: impl Fn(&mut S) + 'static) -> Handler {
        let f = Rc::new(f);
        let handle = self.clone();
        Handler::from_fn(move || {
            let f = f.clone();
            handle.update(move |state| f(state));
        })
    }

    /// A handler that replaces the state with `value`.
    pub fn on_set(&self, value: S) -> Handler
    where
        S: Clone,
    {
        let handle = self.clone();
        Handler::from_fn(move || handle.set(value.clone()))
    }

    /// A handler that merges `patch` into the state.
    pub fn on_merge(&self, patch: S::Patch) -> Handler
    where
        S: Merge,
        S::Patch: Clone + 'static,
    {
        let handle = self.clone();
        Handler::from_fn(move || handle.merge(patch.clone()))
    }
}

/// Owns the application state and keeps the mount point in sync with it.
///
/// The mount point always holds exactly one element tree: the one built by
/// the view function from the current state.
pub struct RenderLoop<H, S>
where
    H: Host + 'static,
    H::Node: 'static,
    S: 'static,
{
    inner: Rc<Inner<H, S>>,
}

impl<H, S> RenderLoop<H, S>
where
    H: Host + 'static,
    H::Node: 'static,
    S: 'static,
{
    /// Renders `initial` into `mount`, replacing whatever it contained.
    pub fn mount<V>(host: H, mount: H::Node, initial: S, view: V) -> Result<Self, Error>
    where
        V: Fn(&S, &Handle<S>) -> Element + 'static,
    {
        let inner = Rc::new(Inner {
            host,
            mount,
            state: RefCell::new(initial),
            view: Box::new(view),
            queue: RefCell::new(Vec::new()),
            busy: Cell::new(false),
            phase: Cell::new(Phase::Idle),
            renders: Cell::new(0),
        });
        inner.drive(true)?;
        Ok(Self { inner })
    }

    /// Like [`Self::mount`], with the mount point looked up by
    /// [`Config::mount_selector`].
    pub fn launch<V>(host: H, config: &Config, initial: S, view: V) -> Result<Self, Error>
    where
        V: Fn(&S, &Handle<S>) -> Element + 'static,
    {
        let mount = host
            .query_selector(&config.mount_selector)?
            .ok_or_else(|| Error::MountNotFound(config.mount_selector.clone()))?;
        tracing::debug!(selector=%config.mount_selector, "mounting");
        Self::mount(host, mount, initial, view)
    }

    pub fn handle(&self) -> Handle<S> {
        Handle::new(&self.inner)
    }

    pub fn update(&self, f: impl FnOnce(&mut S) + 'static) -> Result<(), Error> {
        self.inner.clone().schedule(Box::new(f))
    }

    pub fn set(&self, value: S) -> Result<(), Error> {
        self.update(move |state| *state = value)
    }

    pub fn merge(&self, patch: S::Patch) -> Result<(), Error>
    where
        S: Merge,
        S::Patch: 'static,
    {
        self.update(move |state| state.merge(patch))
    }

    /// Rebuilds the view without changing the state.
    pub fn rerender(&self) -> Result<(), Error> {
        self.inner.drive(true)
    }

    pub fn state(&self) -> Ref<'_, S> {
        self.inner.state.borrow()
    }

    pub fn snapshot(&self) -> S
    where
        S: Clone,
    {
        self.inner.state.borrow().clone()
    }

    pub fn render_count(&self) -> u64 {
        self.inner.renders.get()
    }

    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }

    pub fn mount_node(&self) -> &H::Node {
        &self.inner.mount
    }

    /// Keeps the loop alive for the rest of the program.
    pub fn detach(self) {
        // TODO: figure out proper shutdown without leaking.
        std::mem::forget(self);
    }
}
