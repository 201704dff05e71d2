use crate::config::NavigationConfig;
use crate::navigation::{resolve_view, NavigationState, Transition, ViewDescriptor};
use crate::results::{Item, ResultSet};

/// What a front-end should do after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// Render the current view.
    Render,
    /// The user left the results; drop the conversation.
    Reset,
    /// Hand this item to the download client.
    Download(Item),
    /// The payload refers to a result set that no longer exists.
    Stale,
}

/// The search a chat is currently browsing.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub query: String,
    pub results: ResultSet,
    pub nav: NavigationState,
}

impl Conversation {
    pub fn new(query: impl Into<String>, results: ResultSet) -> Self {
        let nav = NavigationState::new().resolve_auto(&results);
        Self {
            query: query.into(),
            results,
            nav,
        }
    }

    pub fn view(&self, config: &NavigationConfig) -> ViewDescriptor {
        resolve_view(&self.nav, &self.results, config)
    }

    /// Apply a transition, keeping the result set and the navigation state
    /// consistent with each other.
    pub fn apply(&mut self, transition: &Transition) -> TransitionOutcome {
        match transition {
            Transition::Back => return TransitionOutcome::Reset,
            Transition::Download { revision, index } => {
                if *revision != self.results.revision() {
                    return TransitionOutcome::Stale;
                }
                return match self.results.get(*index) {
                    Some(item) => TransitionOutcome::Download(item.clone()),
                    None => TransitionOutcome::Stale,
                };
            }
            Transition::Sort(mode) => self.results.set_sort(*mode),
            Transition::Indexer(id) => self.results.set_indexer_filter(Some(id.clone())),
            Transition::IndexerAll | Transition::AllRaw => self.results.set_indexer_filter(None),
            _ => {}
        }

        self.nav = self.nav.apply(transition);
        TransitionOutcome::Render
    }
}
