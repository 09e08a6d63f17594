//! A fixed pool of reusable path workers with an overflow queue.
//!
//! # Request flow
//!
//! ```text
//!  request(agent, goal)
//!      │
//!      ├─ agent already has a search running ──▶ deferred (latest goal wins)
//!      ├─ agent already waiting in overflow ───▶ goal updated in place
//!      ├─ idle worker available ───────────────▶ dispatched
//!      └─ otherwise ───────────────────────────▶ overflow FIFO
//!
//!  update()          once per tick: one overflow entry → free worker
//!  poll_completed()  on the tick thread: recycle workers, drop stale
//!                    results, issue deferred requests
//! ```
//!
//! At most one worker is ever bound to a given agent, so an agent's routes
//! always arrive in request order.  Every request bumps the agent's
//! generation; a finished search whose generation is no longer current is
//! discarded ("last request wins").
//!
//! # Threads
//!
//! With `background_search` enabled, searches run on a dedicated Rayon
//! thread pool and report back over an `mpsc` channel.  Otherwise they run
//! inline in the call that dispatches them and their results wait in the
//! same channel, so both modes share one completion path.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use gw_core::{AgentId, Cell, SimConfig, WorkerId};
use tracing::{debug, trace};

use crate::search::{PathJob, PathSearch, Route};
use crate::{PathError, PathResult, TerrainCost};

#[cfg(feature = "fx-hash")]
type AgentMap<V> = rustc_hash::FxHashMap<AgentId, V>;
#[cfg(not(feature = "fx-hash"))]
type AgentMap<V> = std::collections::HashMap<AgentId, V>;

// ── JobSource ─────────────────────────────────────────────────────────────────

/// Builds search jobs from the live world at the moment of dispatch.
///
/// Queued requests may wait several ticks for a worker; the agent's start
/// cell and the occupancy snapshot must reflect the world when the search
/// actually starts, not when it was requested.
pub trait JobSource {
    /// `None` if `agent` no longer exists.
    fn job_for(&self, agent: AgentId, goal: Cell) -> Option<PathJob>;
}

// ── Worker ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum WorkerState {
    Idle,
    Assigned,
    Running,
}

/// A reusable search context bound to at most one request at a time.
#[derive(Debug)]
pub struct PathWorker {
    id:     WorkerId,
    state:  WorkerState,
    search: PathSearch,
}

impl PathWorker {
    pub fn new(id: WorkerId, max_expansions: Option<u32>) -> Self {
        Self { id, state: WorkerState::Idle, search: PathSearch::new(max_expansions) }
    }

    #[inline]
    pub fn id(&self) -> WorkerId {
        self.id
    }

    #[inline]
    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub(crate) fn assign(&mut self) {
        debug_assert_eq!(self.state, WorkerState::Idle);
        self.state = WorkerState::Assigned;
    }

    pub(crate) fn run<T: TerrainCost + ?Sized>(&mut self, terrain: &T, job: &PathJob) -> PathResult<Route> {
        self.state = WorkerState::Running;
        self.search.find_path(terrain, job)
    }

    pub(crate) fn recycle(&mut self) {
        debug_assert_eq!(self.state, WorkerState::Running);
        self.state = WorkerState::Idle;
    }
}

/// A search that has come back from a worker.
struct Finished {
    worker:     PathWorker,
    agent:      AgentId,
    goal:       Cell,
    generation: u64,
    outcome:    PathResult<Route>,
}

// ── Public result types ───────────────────────────────────────────────────────

/// What happened to a request at the moment it was made.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RequestStatus {
    Dispatched(WorkerId),
    /// Waiting in the overflow FIFO for a free worker.
    Queued,
    /// Waiting for the agent's in-flight search to return.
    Deferred,
    /// The job source no longer knows the agent.
    Rejected,
}

/// A current (non-stale) search result, ready to install on its agent.
#[derive(Debug)]
pub struct CompletedPath {
    pub agent:   AgentId,
    pub goal:    Cell,
    pub worker:  WorkerId,
    pub outcome: PathResult<Route>,
}

// ── PathPool ──────────────────────────────────────────────────────────────────

pub struct PathPool<T: TerrainCost + 'static> {
    terrain:      Arc<T>,
    threads:      Option<rayon::ThreadPool>,
    worker_count: usize,
    idle:         VecDeque<PathWorker>,
    overflow:     VecDeque<(AgentId, Cell)>,
    deferred:     AgentMap<Cell>,
    in_flight:    AgentMap<u64>,
    generations:  AgentMap<u64>,
    tx:           Sender<Finished>,
    rx:           Receiver<Finished>,
}

impl<T: TerrainCost + 'static> PathPool<T> {
    /// Build a pool of `config.worker_count` workers over `terrain`.
    ///
    /// # Errors
    ///
    /// - [`PathError::Config`] if `config` fails [`SimConfig::validate`].
    /// - [`PathError::ThreadPool`] if the background threads cannot start.
    pub fn new(terrain: Arc<T>, config: &SimConfig) -> PathResult<Self> {
        config.validate().map_err(PathError::Config)?;

        let threads = if config.background_search {
            let n = config.search_threads.unwrap_or(config.worker_count);
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .thread_name(|i| format!("path-search-{i}"))
                .build()
                .map_err(|e| PathError::ThreadPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        // `validate` caps worker_count at u16::MAX, so every id is below INVALID.
        let idle = (0..config.worker_count as u16)
            .map(|i| PathWorker::new(WorkerId(i), config.max_search_expansions))
            .collect();

        let (tx, rx) = mpsc::channel();
        Ok(Self {
            terrain,
            threads,
            worker_count: config.worker_count,
            idle,
            overflow:     VecDeque::new(),
            deferred:     AgentMap::default(),
            in_flight:    AgentMap::default(),
            generations:  AgentMap::default(),
            tx,
            rx,
        })
    }

    pub fn terrain(&self) -> &Arc<T> {
        &self.terrain
    }

    // ── Introspection ─────────────────────────────────────────────────────

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    #[inline]
    pub fn idle_workers(&self) -> usize {
        self.idle.len()
    }

    #[inline]
    pub fn queued(&self) -> usize {
        self.overflow.len()
    }

    #[inline]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    #[inline]
    pub fn is_searching(&self, agent: AgentId) -> bool {
        self.in_flight.contains_key(&agent)
    }

    /// `true` if `agent` has any request not yet returned: running,
    /// deferred behind a running one, or queued.
    pub fn is_pending(&self, agent: AgentId) -> bool {
        self.in_flight.contains_key(&agent)
            || self.deferred.contains_key(&agent)
            || self.overflow.iter().any(|(a, _)| *a == agent)
    }

    /// No search running, deferred, or queued.
    pub fn is_quiet(&self) -> bool {
        self.in_flight.is_empty() && self.deferred.is_empty() && self.overflow.is_empty()
    }

    // ── Requests ──────────────────────────────────────────────────────────

    /// Ask for a route for `agent` to `goal`, superseding any earlier request.
    pub fn request<S: JobSource + ?Sized>(
        &mut self,
        agent:  AgentId,
        goal:   Cell,
        source: &S,
    ) -> RequestStatus {
        *self.generations.entry(agent).or_insert(0) += 1;

        if self.in_flight.contains_key(&agent) {
            trace!(%agent, %goal, "search in flight; deferring request");
            self.deferred.insert(agent, goal);
            return RequestStatus::Deferred;
        }
        if let Some(entry) = self.overflow.iter_mut().find(|(a, _)| *a == agent) {
            trace!(%agent, %goal, "already queued; goal updated");
            entry.1 = goal;
            return RequestStatus::Queued;
        }
        self.issue(agent, goal, source)
    }

    /// Forget every pending request for `agent` and mark its running search
    /// stale.  Used on despawn.
    pub fn cancel(&mut self, agent: AgentId) {
        if let Some(g) = self.generations.get_mut(&agent) {
            *g += 1;
        }
        self.deferred.remove(&agent);
        self.overflow.retain(|(a, _)| *a != agent);
    }

    /// Service at most one overflow entry if a worker is free.  Call once per
    /// tick.
    pub fn update<S: JobSource + ?Sized>(&mut self, source: &S) -> Option<RequestStatus> {
        if self.idle.is_empty() {
            return None;
        }
        let (agent, goal) = self.overflow.pop_front()?;
        Some(self.issue(agent, goal, source))
    }

    fn issue<S: JobSource + ?Sized>(
        &mut self,
        agent:  AgentId,
        goal:   Cell,
        source: &S,
    ) -> RequestStatus {
        let Some(mut worker) = self.idle.pop_front() else {
            debug!(%agent, %goal, queued = self.overflow.len() + 1, "all path workers busy; queued");
            self.overflow.push_back((agent, goal));
            return RequestStatus::Queued;
        };
        let Some(job) = source.job_for(agent, goal) else {
            self.idle.push_front(worker);
            return RequestStatus::Rejected;
        };

        let generation = self.generations.get(&agent).copied().unwrap_or(0);
        let worker_id = worker.id();
        worker.assign();
        self.in_flight.insert(agent, generation);
        debug!(%agent, from = %job.start, %goal, worker = %worker_id, "path search dispatched");

        let tx = self.tx.clone();
        match &self.threads {
            Some(threads) => {
                let terrain = Arc::clone(&self.terrain);
                threads.spawn(move || {
                    let outcome = worker.run(terrain.as_ref(), &job);
                    let _ = tx.send(Finished { worker, agent, goal, generation, outcome });
                });
            }
            None => {
                let outcome = worker.run(self.terrain.as_ref(), &job);
                let _ = tx.send(Finished { worker, agent, goal, generation, outcome });
            }
        }
        RequestStatus::Dispatched(worker_id)
    }

    // ── Completion ────────────────────────────────────────────────────────

    /// Collect every search that has finished, without blocking.
    pub fn poll_completed<S: JobSource + ?Sized>(&mut self, source: &S) -> Vec<CompletedPath> {
        let mut done = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            self.finish(msg, source, &mut done);
        }
        done
    }

    /// Block until no search is running or deferred, collecting results.
    /// Overflow entries are left for [`update`](Self::update).
    pub fn wait_completed<S: JobSource + ?Sized>(&mut self, source: &S) -> Vec<CompletedPath> {
        let mut done = self.poll_completed(source);
        while !self.in_flight.is_empty() {
            match self.rx.recv() {
                Ok(msg) => self.finish(msg, source, &mut done),
                Err(_) => break,
            }
        }
        done
    }

    fn finish<S: JobSource + ?Sized>(
        &mut self,
        msg:    Finished,
        source: &S,
        done:   &mut Vec<CompletedPath>,
    ) {
        let Finished { mut worker, agent, goal, generation, outcome } = msg;
        let worker_id = worker.id();
        worker.recycle();
        self.idle.push_back(worker);
        self.in_flight.remove(&agent);

        let current = self.generations.get(&agent).copied().unwrap_or(0);
        if generation == current {
            match &outcome {
                Ok(route) => debug!(
                    %agent, %goal, steps = route.directions.len(), expanded = route.expanded,
                    "path found"
                ),
                Err(e) => debug!(%agent, %goal, error = %e, "path search failed"),
            }
            done.push(CompletedPath { agent, goal, worker: worker_id, outcome });
        } else {
            trace!(%agent, %goal, generation, current, "stale path result dropped");
        }

        if let Some(next_goal) = self.deferred.remove(&agent) {
            self.issue(agent, next_goal, source);
        }
    }
}
