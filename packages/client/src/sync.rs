//! Shared, de-duplicated view of the remote job collection.
//!
//! [`JobSync`] owns the query caches for the job collection (one entry per
//! recency window), single job details, per-job history and the credits
//! balance. Reads are served from cache; mutations rewrite the cache
//! optimistically where the board shows the change, then invalidate and
//! refetch so server truth wins in the end.
//!
//! The engine is single-threaded. Handles are cheap clones sharing one
//! cache, and a change listener lets a UI re-render after every write.

use std::cell::RefCell;
use std::future::Future;
use std::hash::Hash;
use std::rc::Rc;

use futures_util::future::join;
use tracker_core::{
    Credits, Job, JobId, JobState, QueryCache, QueryState, RecencyWindow, StateHistoryEntry,
};

use crate::{JobsApi, NetworkError};

type Cache<K, V> = QueryCache<K, V, NetworkError>;

pub type CollectionState = QueryState<Vec<Job>, NetworkError>;
pub type JobQueryState = QueryState<Job, NetworkError>;
pub type HistoryState = QueryState<Vec<StateHistoryEntry>, NetworkError>;
pub type CreditsState = QueryState<Credits, NetworkError>;

#[derive(Default)]
struct Caches {
    collections: Cache<RecencyWindow, Vec<Job>>,
    jobs: Cache<JobId, Job>,
    history: Cache<JobId, Vec<StateHistoryEntry>>,
    credits: Cache<(), Credits>,
    /// Window the board most recently asked for.
    active_window: RecencyWindow,
}

fn collections(c: &mut Caches) -> &mut Cache<RecencyWindow, Vec<Job>> {
    &mut c.collections
}

fn jobs(c: &mut Caches) -> &mut Cache<JobId, Job> {
    &mut c.jobs
}

fn history(c: &mut Caches) -> &mut Cache<JobId, Vec<StateHistoryEntry>> {
    &mut c.history
}

fn credits(c: &mut Caches) -> &mut Cache<(), Credits> {
    &mut c.credits
}

type Listener = Rc<dyn Fn()>;

pub struct JobSync<A> {
    api: Rc<A>,
    caches: Rc<RefCell<Caches>>,
    listener: Rc<RefCell<Option<Listener>>>,
}

impl<A> Clone for JobSync<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            caches: self.caches.clone(),
            listener: self.listener.clone(),
        }
    }
}

impl<A: JobsApi> JobSync<A> {
    pub fn new(api: A) -> Self {
        Self {
            api: Rc::new(api),
            caches: Rc::new(RefCell::new(Caches::default())),
            listener: Rc::new(RefCell::new(None)),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Called after every cache write.
    pub fn set_listener(&self, listener: impl Fn() + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    fn notify(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }

    async fn run_query<K, V, Fut>(
        &self,
        select: fn(&mut Caches) -> &mut Cache<K, V>,
        key: K,
        request: impl FnOnce() -> Fut,
    ) where
        K: Eq + Hash + Clone,
        Fut: Future<Output = Result<V, NetworkError>>,
    {
        let ticket = select(&mut self.caches.borrow_mut()).begin_fetch(&key);
        let Some(ticket) = ticket else {
            return;
        };
        self.notify();

        let result = request().await;
        if let Err(e) = &result {
            tracing::warn!("Query failed: {}", e);
        }

        let applied = select(&mut self.caches.borrow_mut()).complete(ticket, result);
        if applied {
            self.notify();
        } else {
            tracing::debug!("Dropping superseded query result");
        }
    }

    // Job collection

    pub fn collection(&self, window: RecencyWindow) -> CollectionState {
        self.caches.borrow().collections.state(&window)
    }

    pub fn active_window(&self) -> RecencyWindow {
        self.caches.borrow().active_window
    }

    /// Fetch the collection for `window` unless cached data is still fresh
    /// or a fetch is already running. Marks `window` as the board's filter.
    pub async fn load_collection(&self, window: RecencyWindow) {
        self.caches.borrow_mut().active_window = window;
        self.fetch_collection(window).await;
    }

    async fn fetch_collection(&self, window: RecencyWindow) {
        self.run_query(collections, window, || self.api.list_jobs(window))
            .await;
    }

    /// Explicit user retry.
    pub async fn refresh_collection(&self, window: RecencyWindow) {
        self.caches.borrow_mut().collections.invalidate(&window);
        self.load_collection(window).await;
    }

    // Single job

    pub fn job(&self, id: &JobId) -> JobQueryState {
        self.caches.borrow().jobs.state(id)
    }

    pub async fn load_job(&self, id: &JobId) {
        self.run_query(jobs, id.clone(), || self.api.get_job(id)).await;
    }

    pub async fn refresh_job(&self, id: &JobId) {
        self.caches.borrow_mut().jobs.invalidate(id);
        self.load_job(id).await;
    }

    pub fn history(&self, id: &JobId) -> HistoryState {
        self.caches.borrow().history.state(id)
    }

    pub async fn load_history(&self, id: &JobId) {
        self.run_query(history, id.clone(), || self.api.job_history(id))
            .await;
    }

    // Credits

    pub fn credits(&self) -> CreditsState {
        self.caches.borrow().credits.state(&())
    }

    pub async fn load_credits(&self) {
        self.run_query(credits, (), || self.api.credits()).await;
    }

    /// Polling entry point: always asks the server again.
    pub async fn refresh_credits(&self) {
        self.caches.borrow_mut().credits.invalidate(&());
        self.load_credits().await;
    }

    // Mutations

    /// Move a job to `state`.
    ///
    /// Every cached copy of the job shows the new stage before the request is
    /// sent. Once the server answers, successfully or not, cached collections
    /// and the job's detail are invalidated and the default collection is
    /// refetched. A failed request is not rolled back here; the refetch
    /// replaces the optimistic guess with whatever the server holds.
    pub async fn commit_stage(
        &self,
        id: &JobId,
        state: JobState,
    ) -> Result<Option<Job>, NetworkError> {
        {
            let mut caches = self.caches.borrow_mut();
            caches.collections.update_all(|list| {
                for job in list.iter_mut().filter(|job| &job.id == id) {
                    job.state = Some(state);
                }
            });
            caches.jobs.update(id, |job| job.state = Some(state));
        }
        self.notify();

        tracing::info!("Moving job {} to {}", id, state);
        let result = self.api.set_job_state(id, state).await;
        if let Err(e) = &result {
            tracing::warn!("Failed to move job {} to {}: {}", id, state, e);
        }

        self.settle(id).await;
        result
    }

    /// Replace the notes of a job. Nothing is rewritten before the server
    /// answers; the caller keeps the typed text until it succeeds.
    pub async fn commit_notes(&self, id: &JobId, notes: &str) -> Result<Option<Job>, NetworkError> {
        tracing::info!("Saving notes for job {}", id);
        let result = self.api.set_job_notes(id, notes).await;
        if let Err(e) = &result {
            tracing::warn!("Failed to save notes for job {}: {}", id, e);
        }

        self.settle(id).await;
        result
    }

    async fn settle(&self, id: &JobId) {
        let active = {
            let mut caches = self.caches.borrow_mut();
            caches.collections.invalidate_all();
            caches.jobs.invalidate(id);
            caches.history.invalidate(id);
            caches.active_window
        };
        self.notify();

        if active == RecencyWindow::All {
            self.fetch_collection(RecencyWindow::All).await;
        } else {
            join(
                self.fetch_collection(RecencyWindow::All),
                self.fetch_collection(active),
            )
            .await;
        }
    }

    pub fn is_job_stale(&self, id: &JobId) -> bool {
        self.caches.borrow().jobs.is_stale(id)
    }
}
