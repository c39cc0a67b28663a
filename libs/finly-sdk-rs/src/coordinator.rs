//! Single-flight refresh gate.
//!
//! At most one token-renewal network call is in flight per client at any
//! instant. The first request that observes an expired token becomes the
//! leader and performs the call; every other request that fails during
//! that window parks on a queue slot and is woken, in arrival order,
//! when the leader settles.

use std::sync::Mutex;

use tokio::sync::oneshot;

/// How a refresh window ended, broadcast to every queued waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefreshOutcome {
    Renewed,
    Failed,
}

pub(crate) enum JoinOutcome {
    /// This caller owns the refresh call and must `settle` the gate.
    Leader,
    /// Another caller is refreshing; await the receiver for the outcome.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

#[derive(Default)]
struct GateState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

#[derive(Default)]
pub(crate) struct RefreshGate {
    state: Mutex<GateState>,
}

impl RefreshGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Atomic check-and-set on the refreshing flag. Exactly one caller per
    /// window observes `refreshing == false` and flips it; the lock is
    /// released before any awaiting happens.
    pub(crate) fn join(&self) -> JoinOutcome {
        let mut state = self.state.lock().expect("refresh gate lock poisoned");
        if !state.refreshing {
            state.refreshing = true;
            JoinOutcome::Leader
        } else {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            JoinOutcome::Follower(rx)
        }
    }

    /// Ends the window and wakes queued waiters in arrival order. The gate
    /// is reusable immediately; a later expiry starts a fresh window.
    pub(crate) fn settle(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self.state.lock().expect("refresh gate lock poisoned");
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            // A dropped receiver means that caller went away; fine.
            let _ = waiter.send(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn first_joiner_leads_rest_follow() {
        let gate = RefreshGate::new();

        assert!(matches!(gate.join(), JoinOutcome::Leader));
        assert!(matches!(gate.join(), JoinOutcome::Follower(_)));
        assert!(matches!(gate.join(), JoinOutcome::Follower(_)));
    }

    #[test]
    fn gate_reopens_after_settle() {
        let gate = RefreshGate::new();

        assert!(matches!(gate.join(), JoinOutcome::Leader));
        gate.settle(RefreshOutcome::Renewed);
        assert!(matches!(gate.join(), JoinOutcome::Leader));
    }

    #[tokio::test]
    async fn settle_broadcasts_outcome_to_all_waiters() {
        let gate = RefreshGate::new();

        let JoinOutcome::Leader = gate.join() else {
            panic!("first joiner must lead");
        };
        let followers: Vec<_> = (0..3)
            .map(|_| match gate.join() {
                JoinOutcome::Follower(rx) => rx,
                JoinOutcome::Leader => panic!("only one leader per window"),
            })
            .collect();

        gate.settle(RefreshOutcome::Failed);

        for rx in followers {
            assert_eq!(rx.await.unwrap(), RefreshOutcome::Failed);
        }
    }

    #[tokio::test]
    async fn waiters_resolve_in_arrival_order() {
        let gate = Arc::new(RefreshGate::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        let JoinOutcome::Leader = gate.join() else {
            panic!("first joiner must lead");
        };

        let mut handles = Vec::new();
        for i in 0..5 {
            let JoinOutcome::Follower(rx) = gate.join() else {
                panic!("gate is refreshing, joiners must follow");
            };
            let order = order.clone();
            handles.push(tokio::spawn(async move {
                rx.await.unwrap();
                order.lock().unwrap().push(i);
            }));
        }

        gate.settle(RefreshOutcome::Renewed);
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }
}
