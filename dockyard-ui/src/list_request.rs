//! Request list view
//!
//! Headless controller behind the request grid: paging, search, selection
//! and confirmed batch deletion. It owns the list state; the Leptos page
//! mirrors it through [`RequestListView::watch`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use dockyard_common::paging::{
    self, calculate_page, parse_total_count, sorting_string, DEFAULT_PAGE_SIZE, TOTAL_COUNT_HEADER,
};
use dockyard_common::{GridState, PageDescriptor, Request};
use futures::future::join_all;
use futures::task::{LocalSpawn, LocalSpawnExt};
use tracing::{debug, error, info, warn};

use crate::confirmation::{
    ConfirmationAcknowledgement, ConfirmationDialogService, ConfirmationMessage, ConfirmationState,
    ConfirmationTarget, Subscription,
};
use crate::error::{error_message_key, ApiError};
use crate::operation::{OperateInfo, OperationService, OperationState};
use crate::services::{AppConfigService, MessageHandler, RequestService, SessionService, Translator};

pub const DELETION_TITLE: &str = "REQUEST.DELETION_TITLE";
pub const DELETION_SUMMARY: &str = "REQUEST.DELETION_SUMMARY";
const DELETE_OPERATION: &str = "OPERATION.DELETE_REQUEST";
const DELETED_SUCCESS: &str = "BATCH.DELETED_SUCCESS";

/// Everything the view renders
#[derive(Clone, Debug, PartialEq)]
pub struct ListState {
    pub loading: bool,
    pub requests: Vec<Request>,
    pub search_keyword: String,
    pub selected: Vec<Request>,
    pub current_page: u32,
    pub total_count: u64,
    pub page_size: u32,
    /// Last grid state, kept so reloads preserve sorting and filters
    pub current_state: Option<GridState>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            loading: true,
            requests: Vec::new(),
            search_keyword: String::new(),
            selected: Vec::new(),
            current_page: 1,
            total_count: 0,
            page_size: DEFAULT_PAGE_SIZE,
            current_state: None,
        }
    }
}

/// Collaborators of the request list
#[derive(Clone)]
pub struct ListServices {
    pub requests: Rc<dyn RequestService>,
    pub session: Rc<dyn SessionService>,
    pub app_config: Rc<dyn AppConfigService>,
    pub messages: Rc<dyn MessageHandler>,
    pub translate: Rc<dyn Translator>,
    pub operations: Rc<OperationService>,
    pub confirmation: ConfirmationDialogService<Vec<Request>>,
}

type Watcher = Rc<dyn Fn(&ListState)>;

struct Inner {
    services: ListServices,
    state: RefCell<ListState>,
    /// Bumped by every page load; responses of older loads are dropped
    generation: Cell<u64>,
    watcher: RefCell<Option<Watcher>>,
    on_add_request: RefCell<Option<Rc<dyn Fn()>>>,
}

/// Clears the loading flag when a page load settles, unless a newer load
/// has taken over.
struct LoadingGuard<'a> {
    inner: &'a Inner,
    generation: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.inner.generation.get() == self.generation {
            self.inner.update(|state| state.loading = false);
        }
    }
}

pub struct RequestListView {
    inner: Rc<Inner>,
    confirmation: RefCell<Option<Subscription>>,
}

impl RequestListView {
    /// Creates the view and subscribes it to confirmed `Request` deletions.
    ///
    /// Deletions run on `spawner`. The subscription ends on [`close`] or
    /// when the view is dropped, whichever comes first.
    ///
    /// [`close`]: RequestListView::close
    pub fn new(services: ListServices, spawner: Rc<dyn LocalSpawn>) -> Self {
        let confirmation = services.confirmation.clone();
        let inner = Rc::new(Inner {
            services,
            state: RefCell::new(ListState::default()),
            generation: Cell::new(0),
            watcher: RefCell::new(None),
            on_add_request: RefCell::new(None),
        });

        let weak: Weak<Inner> = Rc::downgrade(&inner);
        let subscription = confirmation.subscribe(move |ack: &ConfirmationAcknowledgement<Vec<Request>>| {
            if ack.state != ConfirmationState::Confirmed || ack.source != ConfirmationTarget::Request {
                return;
            }
            let Some(inner) = weak.upgrade() else {
                return;
            };

            let rows = ack.data.clone();
            if let Err(e) = spawner.spawn_local(async move { inner.confirmed_delete(rows).await }) {
                error!("Failed to schedule request deletion: {}", e);
            }
        });

        Self {
            inner,
            confirmation: RefCell::new(Some(subscription)),
        }
    }

    /// Tears the view down: releases the confirmation subscription and the
    /// state observer. Later calls do nothing.
    pub fn close(&self) {
        if let Some(subscription) = self.confirmation.borrow_mut().take() {
            subscription.unsubscribe();
            self.inner.watcher.borrow_mut().take();
            debug!("request list closed");
        }
    }

    /// Observer called with a snapshot after every state change.
    pub fn watch(&self, watcher: impl Fn(&ListState) + 'static) {
        *self.inner.watcher.borrow_mut() = Some(Rc::new(watcher));
    }

    /// Handler for the "new request" action.
    pub fn on_add_request(&self, handler: impl Fn() + 'static) {
        *self.inner.on_add_request.borrow_mut() = Some(Rc::new(handler));
    }

    pub fn add_new_request(&self) {
        let handler = self.inner.on_add_request.borrow().clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    pub fn snapshot(&self) -> ListState {
        self.inner.state.borrow().clone()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.inner.state.borrow().requests.clone()
    }

    pub fn selected(&self) -> Vec<Request> {
        self.inner.state.borrow().selected.clone()
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn total_count(&self) -> u64 {
        self.inner.state.borrow().total_count
    }

    pub fn current_page(&self) -> u32 {
        self.inner.state.borrow().current_page
    }

    pub fn page_size(&self) -> u32 {
        self.inner.state.borrow().page_size
    }

    pub fn search_keyword(&self) -> String {
        self.inner.state.borrow().search_keyword.clone()
    }

    /// Replaces the grid selection.
    pub fn select(&self, rows: Vec<Request>) {
        self.inner.update(|state| state.selected = rows);
    }

    pub async fn load_page(&self, state: GridState) {
        self.inner.load_page(state).await
    }

    /// Asks for confirmation before deleting `rows`.
    pub fn request_deletion(&self, rows: Vec<Request>) {
        self.inner.request_deletion(rows)
    }

    pub async fn confirmed_delete(&self, rows: Vec<Request>) {
        self.inner.confirmed_delete(rows).await
    }

    pub fn state_after_deletion(&self) -> Option<GridState> {
        self.inner.state_after_deletion()
    }

    pub async fn refresh(&self) {
        self.inner.refresh().await
    }

    pub async fn filter_changed(&self) {
        self.inner.update(|state| state.current_page = 1);
        self.inner.reload().await
    }

    pub async fn search_changed(&self, keyword: &str) {
        let keyword = keyword.to_string();
        self.inner.update(move |state| {
            state.current_page = 1;
            state.search_keyword = keyword;
        });
        self.inner.reload().await
    }

    /// Whether the "new request" action is offered to the signed-in account.
    pub fn can_create_request(&self) -> bool {
        let account = self.inner.services.session.current_user();
        self.inner
            .services
            .app_config
            .config()
            .project_creation_restriction
            .allows_request(account.as_ref())
    }

    pub fn is_admin(&self) -> bool {
        self.inner
            .services
            .session
            .current_user()
            .map_or(false, |account| account.has_admin_role)
    }

    pub fn can_delete(&self) -> bool {
        // no role check: any non-empty selection is deletable
        !self.inner.state.borrow().selected.is_empty()
    }
}

impl Inner {
    fn update<R>(&self, mutate: impl FnOnce(&mut ListState) -> R) -> R {
        let result = {
            let mut state = self.state.borrow_mut();
            mutate(&mut *state)
        };

        let watcher = self.watcher.borrow().clone();
        if let Some(watcher) = watcher {
            let snapshot = self.state.borrow().clone();
            watcher(&snapshot);
        }
        result
    }

    async fn load_page(&self, grid: GridState) {
        let Some(page) = grid.page else {
            return;
        };

        let page_size = if page.size == 0 { DEFAULT_PAGE_SIZE } else { page.size };
        let page_number = calculate_page(&grid);
        let sort = sorting_string(&grid);

        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let keyword = self.update(|state| {
            state.page_size = page_size;
            state.selected.clear();
            state.current_state = Some(grid);
            state.current_page = page_number;
            state.loading = true;
            state.search_keyword.clone()
        });
        let _loading = LoadingGuard {
            inner: self,
            generation,
        };

        debug!(page = page_number, page_size, keyword = %keyword, ?sort, "loading requests");
        let result = self
            .services
            .requests
            .list_requests(&keyword, page_number, page_size, sort.as_deref())
            .await;

        if self.generation.get() != generation {
            debug!(page = page_number, "discarding superseded request list response");
            return;
        }

        match result {
            Ok(response) => {
                let total = parse_total_count(response.header(TOTAL_COUNT_HEADER)).unwrap_or_else(|e| {
                    debug!("treating total count as 0: {}", e);
                    0
                });
                self.update(move |state| {
                    state.total_count = total;
                    state.requests = response.body;
                });
            }
            Err(error) => {
                warn!("Failed to load requests: {}", error);
                self.services.messages.handle_error(&error);
            }
        }
    }

    fn request_deletion(&self, rows: Vec<Request>) {
        if rows.is_empty() {
            return;
        }

        let names = rows
            .iter()
            .map(|row| row.name.as_str())
            .collect::<Vec<_>>()
            .join(",");

        self.services.confirmation.open_confirm_dialog(ConfirmationMessage {
            title: DELETION_TITLE.to_string(),
            message: DELETION_SUMMARY.to_string(),
            param: names,
            data: rows,
            target: ConfirmationTarget::Request,
        });
    }

    async fn confirmed_delete(&self, rows: Vec<Request>) {
        if rows.is_empty() {
            return;
        }

        info!(count = rows.len(), "deleting requests");
        let outcomes = join_all(rows.iter().map(|row| self.delete_one(row))).await;

        match outcomes.into_iter().filter_map(Result::err).last() {
            Some(error) => {
                warn!("Request deletion failed: {}", error);
                self.services.messages.handle_error(&error);
            }
            None => {
                let message = self.services.translate.get(DELETED_SUCCESS).await;
                self.services.messages.show_success(&message);
            }
        }

        let next = self.state_after_deletion();
        self.update(|state| state.selected.clear());

        match next {
            Some(grid) => self.load_page(grid).await,
            None => self.refresh().await,
        }
    }

    async fn delete_one(&self, request: &Request) -> Result<(), ApiError> {
        let record = self.services.operations.publish_info(OperateInfo::progressing(
            DELETE_OPERATION,
            request.request_id,
            request.name.clone(),
        ));

        match self.services.requests.delete_request(request.request_id).await {
            Ok(()) => {
                self.services
                    .operations
                    .operate_changes(&record, OperationState::Success, None);
                Ok(())
            }
            Err(error) => {
                let detail = self.services.translate.get(&error_message_key(&error)).await;
                self.services
                    .operations
                    .operate_changes(&record, OperationState::Failure, Some(detail));
                Err(error)
            }
        }
    }

    fn state_after_deletion(&self) -> Option<GridState> {
        let state = self.state.borrow();
        paging::state_after_deletion(
            state.total_count,
            state.selected.len(),
            state.page_size,
            state.current_page,
            state.current_state.as_ref(),
        )
    }

    async fn refresh(&self) {
        self.update(|state| {
            state.current_page = 1;
            state.search_keyword.clear();
        });
        self.reload().await
    }

    /// Reloads the first page, keeping sort and filters.
    async fn reload(&self) {
        let grid = {
            let state = self.state.borrow();
            let first = PageDescriptor::first(state.page_size);
            match &state.current_state {
                Some(current) => current.at_page(first),
                None => GridState::with_page(first),
            }
        };
        self.load_page(grid).await
    }
}
