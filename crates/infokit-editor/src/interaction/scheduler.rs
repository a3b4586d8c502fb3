//! Exclusive gesture scheduling.
//!
//! At most one gesture holds the interaction lock. Acquisition is a typed
//! outcome: [`InteractionScheduler::try_acquire`] returns a guard or
//! [`InteractionError::Busy`]. The lock is released when the guard settles
//! (complete, cancel or drop, including drop during unwinding), when the
//! host cancels the active gesture, or when a new request finds the holder
//! older than the configured gesture timeout.

use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use uuid::Uuid;

use infokit_core::InteractionError;

/// Default age after which a held lock may be reclaimed.
pub const DEFAULT_GESTURE_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Lock state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockState {
    Idle,
    Locked {
        owner: String,
        token: Uuid,
        generation: u64,
        since: Instant,
    },
}

/// How a gesture settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Completed,
    Cancelled,
}

#[derive(Debug)]
struct LockCell {
    state: LockState,
    generation: u64,
    completion: Option<oneshot::Sender<GestureOutcome>>,
}

impl LockCell {
    fn is_current(&self, generation: u64) -> bool {
        matches!(self.state, LockState::Locked { generation: g, .. } if g == generation)
    }

    fn settle(&mut self, outcome: GestureOutcome) {
        self.state = LockState::Idle;
        if let Some(tx) = self.completion.take() {
            let _ = tx.send(outcome);
        }
    }
}

/// Grants mutually exclusive gesture sessions.
#[derive(Debug, Clone)]
pub struct InteractionScheduler {
    cell: Arc<Mutex<LockCell>>,
    timeout: Duration,
}

impl Default for InteractionScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_GESTURE_TIMEOUT)
    }
}

impl InteractionScheduler {
    pub fn new(timeout: Duration) -> Self {
        Self {
            cell: Arc::new(Mutex::new(LockCell {
                state: LockState::Idle,
                generation: 0,
                completion: None,
            })),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn state(&self) -> LockState {
        self.cell.lock().state.clone()
    }

    pub fn is_locked(&self) -> bool {
        !matches!(self.cell.lock().state, LockState::Idle)
    }

    /// Name of the interaction holding the lock.
    pub fn owner(&self) -> Option<String> {
        match &self.cell.lock().state {
            LockState::Locked { owner, .. } => Some(owner.clone()),
            LockState::Idle => None,
        }
    }

    /// Claims the lock for `owner`.
    ///
    /// A holder older than the gesture timeout is cancelled and the lock
    /// handed over; otherwise a held lock refuses the request.
    pub fn try_acquire(&self, owner: &str) -> Result<ExclusiveGuard, InteractionError> {
        let mut cell = self.cell.lock();
        if let LockState::Locked {
            owner: holder,
            since,
            ..
        } = &cell.state
        {
            if since.elapsed() < self.timeout {
                tracing::debug!("Lock request from '{}' refused, held by '{}'", owner, holder);
                return Err(InteractionError::Busy {
                    owner: holder.clone(),
                });
            }
            tracing::warn!(
                "Reclaiming interaction lock from '{}' after {:?}",
                holder,
                since.elapsed()
            );
            cell.settle(GestureOutcome::Cancelled);
        }

        cell.generation += 1;
        let generation = cell.generation;
        let token = Uuid::new_v4();
        let (tx, rx) = oneshot::channel();
        cell.state = LockState::Locked {
            owner: owner.to_string(),
            token,
            generation,
            since: Instant::now(),
        };
        cell.completion = Some(tx);
        tracing::debug!("Interaction lock granted to '{}' ({})", owner, generation);

        Ok(ExclusiveGuard {
            cell: self.cell.clone(),
            owner: owner.to_string(),
            token,
            generation,
            completion: Some(GestureCompletion { rx }),
            settled: false,
        })
    }

    /// Cancels whatever gesture holds the lock. Returns its owner.
    pub fn cancel_active(&self) -> Option<String> {
        let mut cell = self.cell.lock();
        let owner = match &cell.state {
            LockState::Locked { owner, .. } => owner.clone(),
            LockState::Idle => return None,
        };
        cell.settle(GestureOutcome::Cancelled);
        tracing::debug!("Cancelled active gesture '{}'", owner);
        Some(owner)
    }

    /// Runs a synchronous gesture body under the lock.
    ///
    /// The lock is released however the body exits.
    pub fn run_exclusive<T, F>(&self, owner: &str, body: F) -> Result<T, InteractionError>
    where
        F: FnOnce(&ExclusiveGuard) -> T,
    {
        let guard = self.try_acquire(owner)?;
        let value = body(&guard);
        if !guard.is_active() {
            return Err(InteractionError::Cancelled {
                owner: owner.to_string(),
            });
        }
        guard.complete();
        Ok(value)
    }
}

/// Proof of holding the interaction lock.
///
/// Settling a guard whose lock was already cancelled or reclaimed does
/// nothing; the generation check keeps it from releasing a later holder.
#[derive(Debug)]
pub struct ExclusiveGuard {
    cell: Arc<Mutex<LockCell>>,
    owner: String,
    token: Uuid,
    generation: u64,
    completion: Option<GestureCompletion>,
    settled: bool,
}

impl ExclusiveGuard {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn token(&self) -> Uuid {
        self.token
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether this guard still holds the lock.
    pub fn is_active(&self) -> bool {
        !self.settled && self.cell.lock().is_current(self.generation)
    }

    /// Future resolved when the gesture settles. Can be taken once.
    pub fn take_completion(&mut self) -> Option<GestureCompletion> {
        self.completion.take()
    }

    pub fn complete(mut self) {
        self.settle(GestureOutcome::Completed);
    }

    pub fn cancel(mut self) {
        self.settle(GestureOutcome::Cancelled);
    }

    fn settle(&mut self, outcome: GestureOutcome) {
        if self.settled {
            return;
        }
        self.settled = true;
        let mut cell = self.cell.lock();
        if cell.is_current(self.generation) {
            cell.settle(outcome);
            tracing::debug!("Interaction lock released by '{}' ({:?})", self.owner, outcome);
        }
    }
}

impl Drop for ExclusiveGuard {
    fn drop(&mut self) {
        self.settle(GestureOutcome::Cancelled);
    }
}

/// Deferred completion of a gesture, for hosts that await the release.
///
/// Resolves to [`GestureOutcome::Cancelled`] if the lock is dropped without
/// an outcome.
#[derive(Debug)]
pub struct GestureCompletion {
    rx: oneshot::Receiver<GestureOutcome>,
}

impl Future for GestureCompletion {
    type Output = GestureOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(GestureOutcome::Cancelled))
    }
}
