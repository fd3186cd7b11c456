#![allow(dead_code)]

use purl::{
    DataSource, DiffTemplate, Element, Knit, KnitError, MemoryDom, MountConfig, Node, Payload,
    Scope, View,
    knit::{expect_object, field_or},
    testing::RecordingBoundary,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Test Element
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Profile {
    pub name: String,
    pub unread: u32,
}

impl Knit for Profile {
    fn knit(_previous: Option<&Self>, payload: &Payload) -> Result<Self, KnitError> {
        let object = expect_object(payload)?;
        Ok(Profile {
            name: field_or(object, "name", String::new),
            unread: field_or(object, "unreadCount", || 0),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageAttrs {
    pub theme: String,
}

#[derive(Debug, Default)]
pub struct PageState {
    pub expanded: bool,
}

/// A profile page that counts calls to its two hooks.
#[derive(Default, Clone)]
pub struct ProfilePage {
    pub reconciles: Arc<AtomicUsize>,
    pub renders: Arc<AtomicUsize>,
}

impl ProfilePage {
    pub fn reconciles(&self) -> usize {
        self.reconciles.load(Ordering::SeqCst)
    }

    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl Element for ProfilePage {
    type Attributes = PageAttrs;
    type Model = Profile;
    type State = PageState;

    const TAG: &'static str = "profile-page";

    fn reconcile(&self, previous: Option<&Profile>, payload: &Payload) -> Result<Profile, KnitError> {
        self.reconciles.fetch_add(1, Ordering::SeqCst);
        Profile::knit(previous, payload)
    }

    fn render(&self, scope: Scope<'_, Self>) -> Node {
        self.renders.fetch_add(1, Ordering::SeqCst);
        let profile = scope.model.cloned().unwrap_or_default();

        let mut section = Node::element("section")
            .attr("class", "profile")
            .child(Node::element("h1").child(Node::text(profile.name)));
        if !scope.attributes.theme.is_empty() {
            section = section.attr("data-theme", &scope.attributes.theme);
        }
        if scope.state.expanded {
            section = section.child(
                Node::element("p").child(Node::text(format!("{} unread", profile.unread))),
            );
        }
        section
    }
}

pub type ProfileView<S> = View<ProfilePage, DiffTemplate, S>;

/// Route lifecycle logs to the test harness output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Build a profile view reporting into a fresh recording boundary.
pub fn profile_view<S: DataSource>(
    source: S,
) -> (ProfileView<S>, ProfilePage, RecordingBoundary) {
    profile_view_with(source, MountConfig::default())
}

/// Like [`profile_view`], with an explicit mount configuration.
pub fn profile_view_with<S: DataSource>(
    source: S,
    config: MountConfig,
) -> (ProfileView<S>, ProfilePage, RecordingBoundary) {
    init_tracing();
    let page = ProfilePage::default();
    let boundary = RecordingBoundary::new();
    let view = View::builder(page.clone(), DiffTemplate, MemoryDom::new(), source)
        .boundary(boundary.clone())
        .config(config)
        .build()
        .expect("valid tag");
    (view, page, boundary)
}

/// Count hydration events delivered to a listener attached now.
pub fn count_hydrations<S: DataSource>(view: &ProfileView<S>) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    view.on_hydrated(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    count
}

pub fn text<S: DataSource>(view: &ProfileView<S>) -> String {
    view.inspect(|i| i.root().text_content())
}

pub fn mutations<S: DataSource>(view: &ProfileView<S>) -> usize {
    view.inspect(|i| i.root().mutation_count())
}
