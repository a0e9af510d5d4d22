//! Dockyard registry console front end

use std::rc::Rc;

use futures::future::LocalFutureObj;
use futures::task::{LocalSpawn, SpawnError};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

pub mod api;
pub mod confirmation;
pub mod error;
pub mod i18n;
pub mod list_request;
pub mod logging;
pub mod message;
pub mod operation;
mod pages;
pub mod services;

use api::{load_app_config, ApiConfig, HttpRequestService};
use confirmation::ConfirmationDialogService;
use i18n::Catalog;
use list_request::ListServices;
use message::MessageQueue;
use operation::OperationService;
use pages::{GlobalMessages, ListRequest, OperationPanel};
use services::{MessageHandler, SessionStore, StaticAppConfig};

/// Runs futures on the Leptos local executor
pub struct LeptosSpawner;

impl LocalSpawn for LeptosSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        spawn_local(future);
        Ok(())
    }
}

/// Application-wide service instances
#[derive(Clone)]
pub struct AppServices {
    pub api: ApiConfig,
    pub session: Rc<SessionStore>,
    pub app_config: Rc<StaticAppConfig>,
    pub messages: Rc<MessageQueue>,
    pub operations: Rc<OperationService>,
    pub list: ListServices,
}

impl AppServices {
    pub fn new(api: ApiConfig) -> Self {
        let session = Rc::new(SessionStore::default());
        let app_config = Rc::new(StaticAppConfig::default());
        let messages = Rc::new(MessageQueue::new());
        let operations = Rc::new(OperationService::new());

        let list = ListServices {
            requests: Rc::new(HttpRequestService::new(api.clone())),
            session: session.clone(),
            app_config: app_config.clone(),
            messages: messages.clone(),
            translate: Rc::new(Catalog::en_us()),
            operations: operations.clone(),
            confirmation: ConfirmationDialogService::new(),
        };

        Self {
            api,
            session,
            app_config,
            messages,
            operations,
            list,
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let services = AppServices::new(ApiConfig::default());
    {
        let api = services.api.clone();
        let app_config = services.app_config.clone();
        let messages = services.messages.clone();
        spawn_local(async move {
            match load_app_config(&api).await {
                Ok(config) => app_config.replace(config),
                Err(e) => messages.handle_error(&e),
            }
        });
    }

    let list = services.list.clone();
    let requests_view = move || view! { <ListRequest services=list.clone()/> };

    view! {
        <Stylesheet id="leptos" href="/pkg/dockyard-ui.css"/>
        <Title text="Dockyard - Container Registry"/>
        <Router>
            <nav class="top-nav">
                <div class="nav-brand">
                    <h2>"Dockyard"</h2>
                </div>
                <div class="nav-links">
                    <A href="/requests" class="nav-link">"Requests"</A>
                </div>
            </nav>
            <GlobalMessages queue=services.messages.clone()/>
            <main class="main-content">
                <Routes>
                    <Route path="" view=requests_view.clone()/>
                    <Route path="/requests" view=requests_view/>
                </Routes>
            </main>
            <OperationPanel operations=services.operations.clone()/>
        </Router>
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = logging::LoggingConfig::default().init() {
        web_sys::console::warn_1(&format!("logging already initialized: {}", e).into());
    }
    mount_to_body(App);
}
