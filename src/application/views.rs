//! View Composition
//!
//! Each view wires a list cache, a form and an error slot to one resource
//! client. Every user action is one task: it runs its network chain under
//! the view's lifetime and applies the result only if the view is still
//! open.

use crate::application::form::{Draft, FormState, RouteDraft, UpstreamDraft};
use crate::application::list_cache::ListCache;
use crate::domain::entities::{Resource, Route, Upstream};
use crate::domain::ports::ResourceClient;
use crate::domain::services::{overview, routes_for_upstream, UpstreamOverview};
use crate::domain::value_objects::Mutation;
use crate::infrastructure::ViewLifetime;
use std::sync::Arc;

/// How a user-initiated task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Server state changed or loaded, and local state reflects it
    Completed,
    /// The task failed; the view carries a message
    Failed,
    /// The view closed before the response could be applied
    Discarded,
}

/// Operator-facing messages for one kind of view.
pub trait ViewText {
    const FETCH_FAILED: &'static str;
    const CREATE_FAILED: &'static str;
    const DELETE_FAILED: &'static str;
}

impl ViewText for UpstreamDraft {
    const FETCH_FAILED: &'static str = "Failed to fetch upstreams";
    const CREATE_FAILED: &'static str = "Failed to create upstream";
    const DELETE_FAILED: &'static str =
        "Failed to delete upstream, Try to delete all route to this upstream";
}

impl ViewText for RouteDraft {
    const FETCH_FAILED: &'static str = "Failed to fetch routes";
    const CREATE_FAILED: &'static str = "Failed to create route";
    const DELETE_FAILED: &'static str = "Failed to delete route";
}

/// List + form view over one collection.
pub struct ResourceView<D: Draft> {
    client: Arc<dyn ResourceClient>,
    cache: ListCache<D::Record>,
    form: FormState<D>,
    error: Option<String>,
    lifetime: ViewLifetime,
}

impl<D: Draft + ViewText> ResourceView<D> {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self {
            client,
            cache: ListCache::new(),
            form: FormState::new(),
            error: None,
            lifetime: ViewLifetime::new(),
        }
    }

    pub fn cache(&self) -> &ListCache<D::Record> {
        &self.cache
    }

    pub fn records(&self) -> &[D::Record] {
        self.cache.records()
    }

    pub fn form(&self) -> &FormState<D> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState<D> {
        &mut self.form
    }

    /// Message to show in a blocking prompt, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    /// Tear the view down; pending responses will be discarded.
    pub fn close(&self) {
        self.lifetime.close();
    }

    /// Initial load.
    pub async fn mount(&mut self) -> TaskOutcome {
        self.refresh().await
    }

    /// Re-list the collection (the reconcile half of every write).
    pub async fn refresh(&mut self) -> TaskOutcome {
        self.cache.begin_loading();
        let fetched = self
            .lifetime
            .run(ListCache::<D::Record>::fetch(self.client.as_ref()))
            .await;

        match fetched {
            None => TaskOutcome::Discarded,
            Some(result) => match self.cache.finish(result) {
                Ok(()) => TaskOutcome::Completed,
                Err(_) => {
                    self.error = Some(D::FETCH_FAILED.to_string());
                    TaskOutcome::Failed
                }
            },
        }
    }

    /// Click-to-edit: copy a listed record into the form.
    pub fn select(&mut self, id: &str) -> bool {
        match self.cache.find(id) {
            Some(record) => {
                self.form.load_from(record);
                true
            }
            None => false,
        }
    }

    /// Validate the draft, PUT it, then reconcile.
    pub async fn submit(&mut self) -> TaskOutcome {
        let record = match self.form.prepare() {
            Ok(record) => record,
            Err(e) => {
                self.error = Some(e.to_string());
                return TaskOutcome::Failed;
            }
        };

        let id = record.resource_id().to_string();
        let put = Mutation::Put(record);
        match self.lifetime.run(put.execute(self.client.as_ref())).await {
            None => TaskOutcome::Discarded,
            Some(Err(e)) => {
                tracing::error!("create error for {}: {}", id, e);
                self.error = Some(D::CREATE_FAILED.to_string());
                TaskOutcome::Failed
            }
            Some(Ok(())) => {
                tracing::info!("saved {} {}", <D::Record as Resource>::COLLECTION, id);
                self.form.blank();
                self.refresh().await
            }
        }
    }

    /// Force-delete a record, then reconcile.
    pub async fn delete(&mut self, id: &str) -> TaskOutcome {
        let delete = Mutation::<D::Record>::Delete {
            id: id.to_string(),
            force: true,
        };
        match self.lifetime.run(delete.execute(self.client.as_ref())).await {
            None => TaskOutcome::Discarded,
            Some(Err(e)) => {
                tracing::error!("delete error for {}: {}", id, e);
                self.error = Some(D::DELETE_FAILED.to_string());
                TaskOutcome::Failed
            }
            Some(Ok(())) => {
                tracing::info!("deleted {} {}", <D::Record as Resource>::COLLECTION, id);
                self.refresh().await
            }
        }
    }
}

/// Routes page.
pub type RoutesView = ResourceView<RouteDraft>;

/// Upstreams page: the upstream list plus the routes needed for the join.
pub struct UpstreamsView {
    inner: ResourceView<UpstreamDraft>,
    routes: ListCache<Route>,
}

impl UpstreamsView {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self {
            inner: ResourceView::new(client),
            routes: ListCache::new(),
        }
    }

    pub fn upstreams(&self) -> &ResourceView<UpstreamDraft> {
        &self.inner
    }

    pub fn upstreams_mut(&mut self) -> &mut ResourceView<UpstreamDraft> {
        &mut self.inner
    }

    pub fn routes(&self) -> &ListCache<Route> {
        &self.routes
    }

    /// Load upstreams, then the routes used for the linked-route join.
    ///
    /// A route listing failure only empties the join; it is not surfaced.
    pub async fn mount(&mut self) -> TaskOutcome {
        let outcome = self.inner.mount().await;
        if outcome == TaskOutcome::Discarded {
            return outcome;
        }

        self.routes.begin_loading();
        let client = self.inner.client.clone();
        match self
            .inner
            .lifetime
            .run(ListCache::<Route>::fetch(client.as_ref()))
            .await
        {
            None => return TaskOutcome::Discarded,
            Some(result) => {
                if let Err(e) = self.routes.finish(result) {
                    tracing::warn!("linked routes unavailable: {}", e);
                }
            }
        }

        outcome
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.inner.select(id)
    }

    pub async fn submit(&mut self) -> TaskOutcome {
        self.inner.submit().await
    }

    pub async fn delete(&mut self, id: &str) -> TaskOutcome {
        self.inner.delete(id).await
    }

    /// Routes that reference `upstream_id`, recomputed on every call.
    pub fn linked_routes(&self, upstream_id: &str) -> Vec<&Route> {
        routes_for_upstream(self.routes.records(), upstream_id)
    }

    pub fn error(&self) -> Option<&str> {
        self.inner.error()
    }

    pub fn dismiss_error(&mut self) {
        self.inner.dismiss_error();
    }

    pub fn close(&self) {
        self.inner.close();
    }
}

/// Home page overview: every upstream with the routes pointing at it.
pub struct OverviewView {
    client: Arc<dyn ResourceClient>,
    upstreams: ListCache<Upstream>,
    routes: ListCache<Route>,
    error: Option<String>,
    lifetime: ViewLifetime,
}

impl OverviewView {
    pub const FETCH_FAILED: &'static str = "Cannot fetch upstream overview";

    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self {
            client,
            upstreams: ListCache::new(),
            routes: ListCache::new(),
            error: None,
            lifetime: ViewLifetime::new(),
        }
    }

    pub async fn mount(&mut self) -> TaskOutcome {
        self.upstreams.begin_loading();
        self.routes.begin_loading();

        let client = self.client.as_ref();
        let fetched = self
            .lifetime
            .run(async {
                let upstreams = ListCache::<Upstream>::fetch(client).await;
                let routes = ListCache::<Route>::fetch(client).await;
                (upstreams, routes)
            })
            .await;

        let Some((upstreams, routes)) = fetched else {
            return TaskOutcome::Discarded;
        };

        let upstreams_ok = self.upstreams.finish(upstreams).is_ok();
        let routes_ok = self.routes.finish(routes).is_ok();
        if upstreams_ok && routes_ok {
            TaskOutcome::Completed
        } else {
            self.error = Some(Self::FETCH_FAILED.to_string());
            TaskOutcome::Failed
        }
    }

    /// Recomputed from the current snapshots on every call.
    pub fn overview(&self) -> Vec<UpstreamOverview> {
        overview(self.upstreams.records(), self.routes.records())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }
}
