//! A parent page and the content it embeds, wired through the in-memory host.
//!
//! Nothing is delivered until [`Pair::pump`] runs, which routes every posted
//! message to the other side the way a browser would: only when the target
//! origin matches the receiving window.

use bridge_core::content::IframeContent;
use bridge_core::host::memory::{MemoryWindow, NodeId};
use bridge_core::host::{HostWindow, MessageEvent};
use bridge_core::loader::{IframeLoader, LoaderOptionsBuilder};

use models::LoaderEventType;

use std::cell::RefCell;
use std::rc::Rc;

pub const PARENT_URL: &str = "http://localhost:81/app/index.html";
pub const PARENT_ORIGIN: &str = "http://localhost:81";
pub const CONTENT_URL: &str = "http://localhost:82/content.html";

pub type Journal = Rc<RefCell<Vec<LoaderEventType>>>;

pub struct Pair {
    pub parent: MemoryWindow,
    pub child: MemoryWindow,
    pub loader: IframeLoader<MemoryWindow>,
    pub content: IframeContent<MemoryWindow>,
    pub journal: Journal,
}

impl Pair {
    /// Loader first, then the content as the iframe's document would create it.
    pub fn new() -> Self {
        let parent = MemoryWindow::top_level(PARENT_URL);
        let child = MemoryWindow::embedded(CONTENT_URL);
        let journal = Journal::default();

        let mut builder = LoaderOptionsBuilder::<NodeId>::new()
            .with_url(CONTENT_URL)
            .with_parent_selector("body");
        for kind in LoaderEventType::ALL {
            let journal = Rc::clone(&journal);
            builder = builder.with_event(kind, move |event| {
                journal.borrow_mut().push(event.kind);
                Ok(())
            });
        }

        let loader = IframeLoader::new(parent.clone(), builder.build().unwrap()).unwrap();
        let content = IframeContent::new(child.clone(), PARENT_ORIGIN).unwrap();

        Self {
            parent,
            child,
            loader,
            content,
            journal,
        }
    }

    /// Deliver posted messages until both sides are quiet. Returns how many were delivered.
    pub fn pump(&mut self) -> usize {
        let mut delivered = 0;

        loop {
            let mut progressed = false;

            for post in self.child.take_parent_posts() {
                if post.target_origin == self.parent.origin() {
                    self.loader
                        .handle_message(&MessageEvent::new(self.child.origin(), post.message));
                    delivered += 1;
                }
                progressed = true;
            }

            for post in self.parent.document().take_frame_posts() {
                if post.target_origin == self.child.origin() {
                    self.content
                        .handle_message(&MessageEvent::new(self.parent.origin(), post.message));
                    delivered += 1;
                }
                progressed = true;
            }

            if !progressed {
                return delivered;
            }
        }
    }

    pub fn events(&self) -> Vec<LoaderEventType> {
        self.journal.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.journal.borrow_mut().clear();
    }
}
