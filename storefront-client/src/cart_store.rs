//! Session cart store
//!
//! Wraps the pure reducer from `shared::cart` and publishes every new
//! state on a watch channel. Dispatch is synchronous and has no side
//! effects beyond publishing.

use serde_json::Value;
use shared::cart::{self, CartAction, CartError, CartState, CartSummary};
use tokio::sync::watch;

pub struct CartStore {
    state_tx: watch::Sender<CartState>,
}

impl CartStore {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(CartState::new());
        Self { state_tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of the current cart
    pub fn state(&self) -> CartState {
        self.state_tx.borrow().clone()
    }

    pub fn summary(&self) -> CartSummary {
        self.state_tx.borrow().summary()
    }

    /// Apply an action and publish the result
    ///
    /// A rejected action leaves the published cart untouched. Subscribers
    /// are only woken when the cart actually changed.
    pub fn dispatch(&self, action: CartAction) -> Result<CartState, CartError> {
        self.commit(|state| cart::reduce(state, &action))
            .inspect(|_| tracing::debug!(action = action.name(), "Cart updated"))
            .inspect_err(|e| tracing::warn!(action = action.name(), error = %e, "Cart action rejected"))
    }

    /// Apply an action received as JSON; malformed actions are no-ops
    pub fn dispatch_raw(&self, raw: &Value) -> Result<CartState, CartError> {
        self.commit(|state| cart::reduce_raw(state, raw))
    }

    fn commit<F>(&self, reducer: F) -> Result<CartState, CartError>
    where
        F: FnOnce(&CartState) -> Result<CartState, CartError>,
    {
        let mut outcome = None;
        self.state_tx.send_if_modified(|state| {
            let result = reducer(state);
            let changed = match &result {
                Ok(next) if *next != *state => {
                    *state = next.clone();
                    true
                }
                _ => false,
            };
            outcome = Some(result);
            changed
        });
        outcome.unwrap_or_else(|| Ok(self.state()))
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}
