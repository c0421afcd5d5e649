//! UI capability injected into the session
//!
//! The session never touches a display. It hands a `SessionSnapshot` to
//! `GameUi::render` after every state change and asks `GameUi::confirm`
//! before committing an exchange.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::paytable::REEL_COUNT;
use crate::prizes::PrizeView;
use crate::purchase::PurchaseView;
use crate::reel::ReelView;

/// Everything a front-end needs to draw the machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub coins: u64,
    pub reels: [ReelView; REEL_COUNT],
    /// GOGO lamp
    pub lamp_active: bool,
    pub insert_enabled: bool,
    pub lever_enabled: bool,
    /// Last message line
    pub message: String,
    /// Prizes still on offer
    pub purchasable: Vec<PrizeView>,
    /// Names of exchanged prizes
    pub collected: Vec<String>,
    pub purchase: PurchaseView,
}

impl SessionSnapshot {
    pub fn any_spinning(&self) -> bool {
        self.reels.iter().any(|r| r.spinning)
    }
}

/// Front-end callbacks
pub trait GameUi {
    /// Draw the current state
    fn render(&mut self, snapshot: &SessionSnapshot);

    /// Ask the player a yes/no question
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// UI that draws nothing and answers every confirmation the same way
#[derive(Debug, Clone, Copy)]
pub struct HeadlessUi {
    pub auto_confirm: bool,
}

impl HeadlessUi {
    pub fn new(auto_confirm: bool) -> Self {
        Self { auto_confirm }
    }
}

impl Default for HeadlessUi {
    fn default() -> Self {
        Self::new(true)
    }
}

impl GameUi for HeadlessUi {
    fn render(&mut self, _snapshot: &SessionSnapshot) {}

    fn confirm(&mut self, _prompt: &str) -> bool {
        self.auto_confirm
    }
}

#[derive(Debug, Default)]
struct Recording {
    renders: Vec<SessionSnapshot>,
    prompts: Vec<String>,
    answers: Vec<bool>,
}

/// UI that records everything and answers from a script
///
/// Clones share the recording, so one handle can be boxed into the session
/// while another inspects it.
#[derive(Debug, Clone, Default)]
pub struct ScriptedUi {
    inner: Arc<Mutex<Recording>>,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a confirmation answer; unanswered prompts decline
    pub fn answer(&self, yes: bool) {
        self.inner.lock().answers.push(yes);
    }

    /// Number of renders so far
    pub fn render_count(&self) -> usize {
        self.inner.lock().renders.len()
    }

    /// Most recent snapshot
    pub fn last(&self) -> Option<SessionSnapshot> {
        self.inner.lock().renders.last().cloned()
    }

    /// Prompts shown so far
    pub fn prompts(&self) -> Vec<String> {
        self.inner.lock().prompts.clone()
    }
}

impl GameUi for ScriptedUi {
    fn render(&mut self, snapshot: &SessionSnapshot) {
        self.inner.lock().renders.push(snapshot.clone());
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        let mut inner = self.inner.lock();
        inner.prompts.push(prompt.to_string());
        if inner.answers.is_empty() {
            false
        } else {
            inner.answers.remove(0)
        }
    }
}
