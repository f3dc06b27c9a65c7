use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use uuid::Uuid;

/// Key presses the presenters react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
}

/// Who holds a key subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerOwner {
    Point(Uuid),
    Creation,
}

type Listeners = Mutex<Vec<(u64, ListenerOwner)>>;

/// Registry of active key listeners.
///
/// Listeners are only added through [`Keyboard::subscribe`] and removed when the
/// returned handle is dropped.
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    listeners: Arc<Listeners>,
    next_token: Arc<AtomicU64>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, owner: ListenerOwner) -> KeySubscription {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).push((token, owner));
        tracing::trace!("Key listener {} registered for {:?}", token, owner);

        KeySubscription {
            token,
            owner,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Current holders, oldest first
    pub fn listeners(&self) -> Vec<ListenerOwner> {
        lock(&self.listeners).iter().map(|(_, owner)| *owner).collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.listeners).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle of a registered key listener; dropping it unregisters the listener
#[derive(Debug)]
pub struct KeySubscription {
    token: u64,
    owner: ListenerOwner,
    listeners: Weak<Listeners>,
}

impl KeySubscription {
    pub fn owner(&self) -> ListenerOwner {
        self.owner
    }
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            lock(&listeners).retain(|(token, _)| *token != self.token);
            tracing::trace!("Key listener {} released", self.token);
        }
    }
}

fn lock(listeners: &Listeners) -> MutexGuard<'_, Vec<(u64, ListenerOwner)>> {
    listeners.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_released_on_drop() {
        let keyboard = Keyboard::new();
        let id = Uuid::new_v4();

        let first = keyboard.subscribe(ListenerOwner::Point(id));
        let second = keyboard.subscribe(ListenerOwner::Creation);
        assert_eq!(
            keyboard.listeners(),
            vec![ListenerOwner::Point(id), ListenerOwner::Creation]
        );

        drop(first);
        assert_eq!(keyboard.listeners(), vec![ListenerOwner::Creation]);
        assert_eq!(second.owner(), ListenerOwner::Creation);

        drop(second);
        assert!(keyboard.is_empty());
    }

    #[test]
    fn test_subscription_outliving_keyboard() {
        let keyboard = Keyboard::new();
        let subscription = keyboard.subscribe(ListenerOwner::Creation);
        drop(keyboard);
        drop(subscription);
    }
}
