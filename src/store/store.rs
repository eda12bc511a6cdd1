use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::action::{Action, ActionEnvelope};
use crate::error::StoreError;
use crate::reducer::{BoxedReducer, Reducer};
use crate::store::subscription::Subscription;

/// The store's dispatch capability as a shareable function handle.
pub type DispatchFn<A> = Arc<dyn Fn(A) -> Result<A, StoreError> + Send + Sync>;

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Copy-on-write listener registry.
///
/// `next` is the working list mutated by subscribe/unsubscribe; `current`
/// is the snapshot a notification pass iterates. `Arc::make_mut` duplicates
/// the working list only while it still aliases a snapshot, so mutations
/// during a pass affect the next pass, never the running one.
struct ListenerSet {
    next: Arc<Vec<(usize, Listener)>>,
    current: Arc<Vec<(usize, Listener)>>,
}

impl Default for ListenerSet {
    fn default() -> Self {
        let empty: Arc<Vec<(usize, Listener)>> = Arc::new(Vec::new());
        Self {
            next: Arc::clone(&empty),
            current: empty,
        }
    }
}

/// Clears a flag when dropped, so the store unlocks even if a reducer or a
/// listener panics.
struct FlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

pub(crate) struct StoreInner<S, A> {
    state: RwLock<S>,
    reducer: RwLock<BoxedReducer<S, A>>,
    listeners: Mutex<ListenerSet>,
    dispatching: AtomicBool,
    notifying: AtomicBool,
    next_listener_id: AtomicUsize,
}

impl<S, A> StoreInner<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Action,
{
    fn guard_idle(&self, violation: StoreError) -> Result<(), StoreError> {
        if self.dispatching.load(Ordering::SeqCst) {
            return Err(violation);
        }
        Ok(())
    }

    fn guard_dispatchable(&self) -> Result<(), StoreError> {
        if self.dispatching.load(Ordering::SeqCst) || self.notifying.load(Ordering::SeqCst) {
            return Err(StoreError::NestedDispatch);
        }
        Ok(())
    }

    pub(crate) fn snapshot(&self) -> Result<S, StoreError> {
        self.guard_idle(StoreError::StateReadDuringDispatch)?;
        Ok(self.state.read().unwrap().clone())
    }

    /// Run one transition: lock, reduce, commit. The lock is released by
    /// the drop guard even when the reducer fails, leaving the previous
    /// state in place.
    fn run_transition(&self, envelope: &ActionEnvelope<A>) -> Result<(), StoreError> {
        if self.dispatching.swap(true, Ordering::SeqCst) {
            return Err(StoreError::NestedDispatch);
        }
        let guard = FlagGuard {
            flag: &self.dispatching,
        };
        let next = {
            let previous = self.state.read().unwrap().clone();
            let reducer = self.reducer.read().unwrap();
            reducer.reduce(Some(previous), envelope)?
        };
        *self.state.write().unwrap() = next;
        drop(guard);
        Ok(())
    }

    fn dispatch_app(&self, action: A) -> Result<A, StoreError> {
        self.guard_dispatchable()?;
        let envelope = ActionEnvelope::app(action);
        self.run_transition(&envelope)?;
        self.notify();
        match envelope.into_action() {
            Some(action) => Ok(action),
            // app envelopes always carry their action back out
            None => unreachable!(),
        }
    }

    /// Alias the active snapshot to the working list, then walk it in
    /// subscription order. Listeners may read state and manage
    /// subscriptions here; dispatching stays illegal for the whole pass.
    fn notify(&self) {
        let snapshot = {
            let mut listeners = self.listeners.lock().unwrap();
            listeners.current = Arc::clone(&listeners.next);
            Arc::clone(&listeners.current)
        };
        self.notifying.store(true, Ordering::SeqCst);
        let guard = FlagGuard {
            flag: &self.notifying,
        };
        for (_, listener) in snapshot.iter() {
            listener();
        }
        drop(guard);
    }

    fn add_listener(&self, listener: Listener) -> Result<usize, StoreError> {
        self.guard_idle(StoreError::SubscribeDuringDispatch)?;
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        let mut listeners = self.listeners.lock().unwrap();
        Arc::make_mut(&mut listeners.next).push((id, listener));
        Ok(id)
    }

    fn remove_listener(&self, id: usize) -> Result<(), StoreError> {
        self.guard_idle(StoreError::UnsubscribeDuringDispatch)?;
        let mut listeners = self.listeners.lock().unwrap();
        Arc::make_mut(&mut listeners.next).retain(|(listener_id, _)| *listener_id != id);
        Ok(())
    }
}

/// A predictable state container.
///
/// The store owns a single state cell, updated only by dispatching actions
/// through a pure reducer, and notifies subscribed listeners after every
/// committed transition. Handles are cheap clones sharing the same cell.
///
/// ```
/// use canister::{Action, ActionEnvelope, Store};
///
/// #[derive(Debug)]
/// enum Counter {
///     Increment,
/// }
///
/// impl Action for Counter {
///     fn kind(&self) -> &str {
///         "increment"
///     }
/// }
///
/// fn counter(state: Option<i64>, action: &ActionEnvelope<Counter>) -> Option<i64> {
///     let state = state.unwrap_or(0);
///     match action.action() {
///         Some(Counter::Increment) => Some(state + 1),
///         None => Some(state),
///     }
/// }
///
/// let store = Store::new(counter).unwrap();
/// store.dispatch(Counter::Increment).unwrap();
/// store.dispatch(Counter::Increment).unwrap();
/// assert_eq!(store.get_state().unwrap(), 2);
/// ```
pub struct Store<S, A> {
    inner: Arc<StoreInner<S, A>>,
    dispatch: DispatchFn<A>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

impl<S, A> std::fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl<S, A> Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Action,
{
    /// Create a store with no preloaded state and no enhancer.
    pub fn new(reducer: impl Reducer<S, A> + 'static) -> Result<Self, StoreError> {
        Self::builder(reducer).build()
    }

    /// Configure a store with a preloaded state and/or an enhancer.
    pub fn builder(reducer: impl Reducer<S, A> + 'static) -> super::builder::StoreBuilder<S, A> {
        super::builder::StoreBuilder::new(Box::new(reducer))
    }

    /// The unenhanced construction path: establish initial state by running
    /// the reducer once against the (possibly absent) preloaded state.
    pub(crate) fn create(
        reducer: BoxedReducer<S, A>,
        preloaded: Option<S>,
    ) -> Result<Self, StoreError> {
        let initial = reducer.reduce(preloaded, &ActionEnvelope::init())?;
        let inner = Arc::new(StoreInner {
            state: RwLock::new(initial),
            reducer: RwLock::new(reducer),
            listeners: Mutex::new(ListenerSet::default()),
            dispatching: AtomicBool::new(false),
            notifying: AtomicBool::new(false),
            next_listener_id: AtomicUsize::new(0),
        });
        let raw: DispatchFn<A> = {
            let inner = Arc::clone(&inner);
            Arc::new(move |action| inner.dispatch_app(action))
        };
        Ok(Self {
            inner,
            dispatch: raw,
        })
    }

    /// A clone of the current state.
    pub fn get_state(&self) -> Result<S, StoreError> {
        self.inner.snapshot()
    }

    /// Read the current state without cloning it.
    pub fn read<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&S) -> R,
    {
        self.inner.guard_idle(StoreError::StateReadDuringDispatch)?;
        let state = self.inner.state.read().unwrap();
        Ok(f(&state))
    }

    /// Apply an action to the reducer, commit the new state, and notify
    /// listeners in subscription order. Returns the action unchanged.
    ///
    /// Routes through the store's current dispatch capability, so an
    /// installed middleware chain sees the action first.
    pub fn dispatch(&self, action: A) -> Result<A, StoreError> {
        (self.dispatch)(action)
    }

    /// The current dispatch capability as a shareable handle.
    pub fn dispatch_fn(&self) -> DispatchFn<A> {
        Arc::clone(&self.dispatch)
    }

    /// A state-reading capability that holds no dispatch handle, so it
    /// cannot keep an augmented dispatch alive.
    pub(crate) fn state_reader(&self) -> Arc<dyn Fn() -> Result<S, StoreError> + Send + Sync> {
        let inner = Arc::clone(&self.inner);
        Arc::new(move || inner.snapshot())
    }

    /// This store with its dispatch capability replaced; state, reducer and
    /// listeners stay shared. Enhancers use this to install an augmented
    /// dispatch.
    pub fn with_dispatch(&self, dispatch: DispatchFn<A>) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            dispatch,
        }
    }

    /// Register a listener called with no arguments after every committed
    /// dispatch.
    ///
    /// Dropping the returned [`Subscription`] does not remove the
    /// listener; only calling [`Subscription::unsubscribe`] does.
    pub fn subscribe<F>(&self, listener: F) -> Result<Subscription, StoreError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.inner.add_listener(Arc::new(listener))?;
        let weak = Arc::downgrade(&self.inner);
        Ok(Subscription::new(move || match weak.upgrade() {
            Some(inner) => inner.remove_listener(id),
            None => Ok(()),
        }))
    }

    /// Swap the reducer and re-derive the state shape under it, keeping the
    /// existing state. Supports hot-swapping transition logic without
    /// rebuilding the store.
    pub fn replace_reducer(&self, next: impl Reducer<S, A> + 'static) -> Result<(), StoreError> {
        self.inner.guard_dispatchable()?;
        *self.inner.reducer.write().unwrap() = Box::new(next);
        self.inner.run_transition(&ActionEnvelope::replace())?;
        self.inner.notify();
        Ok(())
    }

    /// Minimal observable adapter over [`subscribe`](Store::subscribe):
    /// delivers the current state immediately, then every state the store
    /// settles on.
    pub fn observe(
        &self,
        observer: impl StateObserver<S> + 'static,
    ) -> Result<Subscription, StoreError> {
        let observer = Arc::new(observer);
        observer.next(&self.get_state()?);
        let weak = Arc::downgrade(&self.inner);
        self.subscribe(move || {
            if let Some(inner) = weak.upgrade() {
                if let Ok(state) = inner.snapshot() {
                    observer.next(&state);
                }
            }
        })
    }
}

/// Receives every state a store settles on.
///
/// Implemented for closures taking `&S`.
pub trait StateObserver<S>: Send + Sync {
    fn next(&self, state: &S);
}

impl<S, F> StateObserver<S> for F
where
    F: Fn(&S) + Send + Sync,
{
    fn next(&self, state: &S) {
        self(state)
    }
}
