use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use super::Conversation;

/// Sequence number of a search within one chat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Default)]
struct Slot {
    latest: Generation,
    conversation: Option<Conversation>,
}

/// Conversations keyed by chat id.
///
/// A search takes a generation with [`begin_search`](Self::begin_search)
/// and installs its result with [`complete_search`](Self::complete_search);
/// results of a superseded search are dropped whole.
#[derive(Default)]
pub struct SessionStore {
    slots: RwLock<HashMap<i64, Slot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin_search(&self, chat_id: i64) -> Generation {
        let mut slots = self.slots.write().await;
        let slot = slots.entry(chat_id).or_default();
        slot.latest = slot.latest.next();
        slot.latest
    }

    /// Install `conversation` if `generation` is still the chat's latest.
    pub async fn complete_search(
        &self,
        chat_id: i64,
        generation: Generation,
        conversation: Conversation,
    ) -> bool {
        let mut slots = self.slots.write().await;
        let slot = slots.entry(chat_id).or_default();

        if slot.latest != generation {
            debug!(
                chat_id = chat_id,
                generation = generation.value(),
                latest = slot.latest.value(),
                "Dropping stale search response"
            );
            return false;
        }

        slot.conversation = Some(conversation);
        true
    }

    /// Drop the chat's conversation. The generation counter is kept.
    pub async fn clear(&self, chat_id: i64) {
        if let Some(slot) = self.slots.write().await.get_mut(&chat_id) {
            slot.conversation = None;
        }
    }

    /// Run `f` on the chat's conversation, if there is one.
    pub async fn with_conversation<R>(
        &self,
        chat_id: i64,
        f: impl FnOnce(&mut Conversation) -> R,
    ) -> Option<R> {
        let mut slots = self.slots.write().await;
        slots
            .get_mut(&chat_id)
            .and_then(|slot| slot.conversation.as_mut())
            .map(f)
    }

    pub async fn snapshot(&self, chat_id: i64) -> Option<Conversation> {
        let slots = self.slots.read().await;
        slots
            .get(&chat_id)
            .and_then(|slot| slot.conversation.clone())
    }

    /// Number of chats with an active conversation.
    pub async fn active(&self) -> usize {
        let slots = self.slots.read().await;
        slots.values().filter(|s| s.conversation.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Transition;
    use crate::results::{aggregate, SortMode};
    use crate::testing::fixtures;

    fn conversation(query: &str) -> Conversation {
        Conversation::new(
            query,
            aggregate(vec![fixtures::raw(query, 1)], SortMode::SeedersDesc),
        )
    }

    #[tokio::test]
    async fn test_complete_latest_search() {
        let store = SessionStore::new();
        let generation = store.begin_search(1).await;

        assert!(store.complete_search(1, generation, conversation("a")).await);
        assert_eq!(store.snapshot(1).await.unwrap().query, "a");
        assert_eq!(store.active().await, 1);
    }

    #[tokio::test]
    async fn test_stale_generation_is_dropped() {
        let store = SessionStore::new();
        let older = store.begin_search(1).await;
        let newer = store.begin_search(1).await;

        assert!(store.complete_search(1, newer, conversation("new")).await);
        store
            .with_conversation(1, |c| c.apply(&Transition::AllRaw))
            .await;
        let before = store.snapshot(1).await.unwrap();

        assert!(!store.complete_search(1, older, conversation("old")).await);

        let after = store.snapshot(1).await.unwrap();
        assert_eq!(after.query, "new");
        assert_eq!(after.nav, before.nav);
        assert_eq!(after.results.revision(), before.results.revision());
    }

    #[tokio::test]
    async fn test_chats_are_independent() {
        let store = SessionStore::new();
        let a = store.begin_search(1).await;
        let b = store.begin_search(2).await;

        assert!(store.complete_search(2, b, conversation("b")).await);
        assert!(store.complete_search(1, a, conversation("a")).await);
        assert_eq!(store.snapshot(1).await.unwrap().query, "a");
        assert_eq!(store.snapshot(2).await.unwrap().query, "b");
    }

    #[tokio::test]
    async fn test_clear() {
        let store = SessionStore::new();
        let generation = store.begin_search(1).await;
        store.complete_search(1, generation, conversation("a")).await;

        store.clear(1).await;
        assert!(store.snapshot(1).await.is_none());
        assert!(store.with_conversation(1, |_| ()).await.is_none());
    }
}
