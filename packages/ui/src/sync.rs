//! Dioxus bindings for the job sync engine.
//!
//! [`SyncProvider`] owns one [`JobSync`] for the whole app. The engine
//! reports every cache write by bumping a revision signal; the reading
//! hooks depend on that signal, so their components re-render and ask the
//! engine to refetch whatever went stale while on screen.

use client::sync::{CollectionState, CreditsState, HistoryState, JobQueryState};
use client::{ApiClient, ClientConfig, JobSync};
use dioxus::prelude::*;
use tracker_core::{JobId, NotesDraft, RecencyWindow, StageChange};

/// Credits poll interval in milliseconds (1 minute).
const CREDITS_REFRESH_MS: u32 = 60_000;

/// Context value shared by every hook in this module.
#[derive(Clone)]
pub struct SyncHandle {
    engine: JobSync<ApiClient>,
    revision: Signal<u64>,
}

impl SyncHandle {
    pub fn engine(&self) -> &JobSync<ApiClient> {
        &self.engine
    }

    /// Make the current reactive scope depend on cache writes.
    fn subscribe(&self) {
        let _ = (self.revision)();
    }
}

/// Installs the sync engine for its children.
#[component]
pub fn SyncProvider(children: Element) -> Element {
    let revision = use_signal(|| 0u64);

    use_context_provider(|| {
        let engine = JobSync::new(ApiClient::new(ClientConfig::from_env()));
        tracing::info!("Job board API at {}", engine.api().config().base_url());

        engine.set_listener(move || {
            let mut revision = revision;
            revision += 1;
        });

        SyncHandle { engine, revision }
    });

    rsx! {
        {children}
    }
}

pub fn use_sync() -> SyncHandle {
    use_context::<SyncHandle>()
}

/// Jobs for the board, filtered by `window`.
///
/// Changing the window loads that window's own cache entry.
pub fn use_job_collection(window: Signal<RecencyWindow>) -> Memo<CollectionState> {
    let sync = use_sync();

    let loader = sync.clone();
    use_effect(move || {
        loader.subscribe();
        let window = window();
        let engine = loader.engine.clone();
        spawn(async move {
            engine.load_collection(window).await;
        });
    });

    use_memo(move || {
        sync.subscribe();
        sync.engine.collection(window())
    })
}

/// A single job by id.
pub fn use_job(id: JobId) -> Memo<JobQueryState> {
    let sync = use_sync();

    let loader = sync.clone();
    let load_id = id.clone();
    use_effect(move || {
        loader.subscribe();
        let engine = loader.engine.clone();
        let id = load_id.clone();
        spawn(async move {
            engine.load_job(&id).await;
        });
    });

    use_memo(move || {
        sync.subscribe();
        sync.engine.job(&id)
    })
}

/// Recorded stage and notes changes of a job.
pub fn use_job_history(id: JobId) -> Memo<HistoryState> {
    let sync = use_sync();

    let loader = sync.clone();
    let load_id = id.clone();
    use_effect(move || {
        loader.subscribe();
        let engine = loader.engine.clone();
        let id = load_id.clone();
        spawn(async move {
            engine.load_history(&id).await;
        });
    });

    use_memo(move || {
        sync.subscribe();
        sync.engine.history(&id)
    })
}

/// Remaining API credits, refreshed every minute while mounted.
pub fn use_credits() -> Memo<CreditsState> {
    let sync = use_sync();

    let poller = sync.engine.clone();
    let _poll = use_coroutine(move |_rx: UnboundedReceiver<()>| {
        let engine = poller.clone();
        async move {
            loop {
                engine.refresh_credits().await;
                sleep_ms(CREDITS_REFRESH_MS).await;
            }
        }
    });

    use_memo(move || {
        sync.subscribe();
        sync.engine.credits()
    })
}

async fn sleep_ms(ms: u32) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(ms).await;

    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_millis(ms as u64)).await;
}

/// Stage changes with optimistic board updates.
#[derive(Clone, Copy)]
pub struct StageMutation {
    pub commit: Callback<StageChange>,
    /// Last failure, until dismissed.
    pub error: Signal<Option<String>>,
}

pub fn use_stage_mutation() -> StageMutation {
    let sync = use_sync();
    let mut error = use_signal(|| None::<String>);

    let commit = use_callback(move |change: StageChange| {
        let engine = sync.engine.clone();
        spawn(async move {
            if let Err(e) = engine.commit_stage(&change.id, change.to).await {
                error.set(Some(format!("Failed to move job: {}", e)));
            }
        });
    });

    StageMutation { commit, error }
}

/// Saving of a notes draft.
#[derive(Clone, Copy)]
pub struct NotesMutation {
    pub save: Callback<()>,
    pub saving: Signal<bool>,
    pub error: Signal<Option<String>>,
}

/// Saves `draft` for job `id`. The draft keeps its text on failure and is
/// marked saved on success.
pub fn use_notes_mutation(id: JobId, mut draft: Signal<NotesDraft>) -> NotesMutation {
    let sync = use_sync();
    let mut saving = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let save = use_callback(move |()| {
        if *saving.peek() || !draft.peek().is_dirty() {
            return;
        }
        let text = draft.peek().text().to_string();
        let engine = sync.engine.clone();
        let id = id.clone();

        saving.set(true);
        error.set(None);
        spawn(async move {
            match engine.commit_notes(&id, &text).await {
                Ok(_) => draft.write().mark_saved(text),
                Err(e) => error.set(Some(format!("Failed to save notes: {}", e))),
            }
            saving.set(false);
        });
    });

    NotesMutation {
        save,
        saving,
        error,
    }
}
