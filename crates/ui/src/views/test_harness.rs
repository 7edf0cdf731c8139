use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable, Router, use_navigator};
use exam_core::SampleGenerator;
use exam_core::model::{AssessmentId, QuestionSet};
use exam_core::time::fixed_now;
use services::{AssessmentCatalog, AttemptHistoryService, Clock, ConfigOverrides};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::routes::Route;
use crate::views::assessment::AssessmentTestHandles;
use crate::views::{AssessmentView, HistoryView};
use crate::webview::use_session_host_provider;

pub const SAMPLE_SEED: u64 = 7;
pub const SAMPLE_QUESTIONS: u32 = 3;

#[derive(Clone)]
struct TestApp {
    assessment_id: AssessmentId,
    clock: Clock,
    catalog: Arc<AssessmentCatalog>,
    history: Arc<AttemptHistoryService>,
}

impl UiApp for TestApp {
    fn assessment_id(&self) -> AssessmentId {
        self.assessment_id
    }

    fn clock(&self) -> Clock {
        self.clock
    }

    fn catalog(&self) -> Arc<AssessmentCatalog> {
        Arc::clone(&self.catalog)
    }

    fn history(&self) -> Arc<AttemptHistoryService> {
        Arc::clone(&self.history)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Assessment,
    History,
    /// The app's own routes and topbar.
    Shell,
}

/// Pushes a harness route from test code.
#[derive(Clone, Default)]
pub struct NavHandle(Rc<RefCell<Option<Callback<TestRoute>>>>);

impl NavHandle {
    fn register(&self, go: Callback<TestRoute>) {
        *self.0.borrow_mut() = Some(go);
    }

    fn get(&self) -> Callback<TestRoute> {
        (*self.0.borrow()).expect("harness shell mounted")
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    handles: Option<AssessmentTestHandles>,
    nav: NavHandle,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| props.nav.clone());
    use_session_host_provider();
    if let Some(handles) = props.handles.clone() {
        use_context_provider(|| handles);
    }
    match props.view {
        ViewKind::Shell => rsx! { Router::<Route> {} },
        _ => rsx! { Router::<TestRoute> {} },
    }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum TestRoute {
    #[layout(HarnessShell)]
        #[route("/")]
        Root {},
        #[route("/history")]
        History {},
}

#[component]
fn HarnessShell() -> Element {
    let nav = use_context::<NavHandle>();
    let navigator = use_navigator();
    let go = use_callback(move |route: TestRoute| {
        let _ = navigator.push(route);
    });
    nav.register(go);
    rsx! { Outlet::<TestRoute> {} }
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::History => rsx! { HistoryView {} },
        _ => rsx! { AssessmentView {} },
    }
}

#[component]
fn History() -> Element {
    rsx! { HistoryView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub assessment_id: AssessmentId,
    pub handles: Option<AssessmentTestHandles>,
    nav: NavHandle,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Let spawned tasks (resources, the session loop) run to quiescence.
    pub async fn settle(&mut self) {
        for _ in 0..6 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn handles(&self) -> AssessmentTestHandles {
        self.handles.clone().expect("assessment handles")
    }

    /// Switch harness routes, unmounting the current view.
    pub fn navigate(&mut self, route: TestRoute) {
        let go = self.nav.get();
        self.act(|| go.call(route));
    }

    /// Run `f` inside the dom's runtime, as an event handler would.
    pub fn act<O>(&mut self, f: impl FnOnce() -> O) -> O {
        let out = self.dom.in_runtime(f);
        drive_dom(&mut self.dom);
        out
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// The question set the harness catalog falls back to.
pub fn sample_questions() -> QuestionSet {
    SampleGenerator::new(SAMPLE_SEED)
        .generate(SAMPLE_QUESTIONS)
        .expect("sample questions")
}

pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_storage(view, Storage::in_memory()).await
}

pub async fn setup_view_harness_with_storage(view: ViewKind, storage: Storage) -> ViewHarness {
    let assessment_id = AssessmentId::new(1);
    let clock = Clock::fixed(fixed_now());
    let catalog = AssessmentCatalog::new(Arc::clone(&storage.assessments))
        .with_generator(SampleGenerator::new(SAMPLE_SEED))
        .with_overrides(ConfigOverrides {
            total_questions: Some(SAMPLE_QUESTIONS),
            ..ConfigOverrides::default()
        });
    let history = AttemptHistoryService::new(Arc::clone(&storage.attempts));

    let handles = match view {
        ViewKind::History => None,
        _ => Some(AssessmentTestHandles::default()),
    };
    let nav = NavHandle::default();

    let app = Arc::new(TestApp {
        assessment_id,
        clock,
        catalog: Arc::new(catalog),
        history: Arc::new(history),
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            handles: handles.clone(),
            nav: nav.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        assessment_id,
        handles,
        nav,
    }
}
