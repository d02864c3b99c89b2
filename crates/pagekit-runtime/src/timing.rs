#![forbid(unsafe_code)]

//! Rate limiting on page time: leading-edge throttle and last-call-wins
//! debounce.
//!
//! Both primitives are plain state machines over a caller-supplied `now`, so
//! they behave identically under a [`VirtualClock`](crate::clock::VirtualClock)
//! and a real clock. [`Throttled`] and [`Debounced`] wrap a closure for the
//! common "rate-limited callback" shape.
//!
//! # Invariants
//!
//! 1. Throttle accepts the first call immediately, then rejects calls until
//!    `interval` has elapsed since the last *accepted* call. Rejected calls
//!    are dropped; there is no trailing invocation.
//! 2. Debounce keeps only the most recent arguments and fires once, no
//!    earlier than `delay` after the most recent call.
//! 3. Neither primitive queues or merges arguments.

use std::time::Duration;

/// Leading-edge throttle gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    interval: Duration,
    last: Option<Duration>,
}

impl Throttle {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Time of the last accepted call.
    #[must_use]
    pub const fn last_accepted(&self) -> Option<Duration> {
        self.last
    }

    /// Accept or reject a call at `now`.
    pub fn try_acquire(&mut self, now: Duration) -> bool {
        let ready = match self.last {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval,
        };
        if ready {
            self.last = Some(now);
        }
        ready
    }
}

/// Closure guarded by a [`Throttle`].
pub struct Throttled<F> {
    gate: Throttle,
    f: F,
}

impl<F> std::fmt::Debug for Throttled<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttled")
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl<F> Throttled<F> {
    pub const fn new(interval: Duration, f: F) -> Self {
        Self {
            gate: Throttle::new(interval),
            f,
        }
    }

    /// Invoke the closure if the gate accepts the call.
    pub fn call<A, R>(&mut self, now: Duration, args: A) -> Option<R>
    where
        F: FnMut(A) -> R,
    {
        self.gate.try_acquire(now).then(|| (self.f)(args))
    }
}

/// Trailing-edge debounce holding the latest arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debounce<A> {
    delay: Duration,
    deadline: Option<Duration>,
    pending: Option<A>,
}

impl<A> Debounce<A> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            pending: None,
        }
    }

    /// Record a call, replacing any pending one.
    pub fn call(&mut self, now: Duration, args: A) {
        self.pending = Some(args);
        self.deadline = Some(now.saturating_add(self.delay));
    }

    /// When the pending call becomes due.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending arguments if the quiet period has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<A> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Drop the pending call.
    pub fn cancel(&mut self) -> Option<A> {
        self.deadline = None;
        self.pending.take()
    }
}

/// Closure driven by a [`Debounce`].
pub struct Debounced<F, A> {
    state: Debounce<A>,
    f: F,
}

impl<F, A: std::fmt::Debug> std::fmt::Debug for Debounced<F, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debounced")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<F: FnMut(A), A> Debounced<F, A> {
    pub const fn new(delay: Duration, f: F) -> Self {
        Self {
            state: Debounce::new(delay),
            f,
        }
    }

    pub fn call(&mut self, now: Duration, args: A) {
        self.state.call(now, args);
    }

    /// Run the closure if due. Returns whether it ran.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.state.poll(now) {
            Some(args) => {
                (self.f)(args);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.state.deadline()
    }

    pub fn cancel(&mut self) {
        self.state.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn throttle_leading_edge_without_trailing_call() {
        // Calls at t0, t0 + 0.3T, t0 + 1.2T with T = 100ms.
        let mut hits = Vec::new();
        let mut throttled = Throttled::new(ms(100), |t: u64| hits.push(t));
        throttled.call(ms(1000), 1000);
        throttled.call(ms(1030), 1030);
        throttled.call(ms(1120), 1120);
        drop(throttled);
        assert_eq!(hits, vec![1000, 1120]);
    }

    #[test]
    fn throttle_interval_counts_from_last_accepted() {
        let mut gate = Throttle::new(ms(200));
        assert!(gate.try_acquire(ms(0)));
        assert!(!gate.try_acquire(ms(150)));
        assert!(!gate.try_acquire(ms(199)));
        assert!(gate.try_acquire(ms(200)));
        assert_eq!(gate.last_accepted(), Some(ms(200)));
    }

    #[test]
    fn debounce_uses_last_arguments() {
        let mut seen = Vec::new();
        let mut debounced = Debounced::new(ms(50), |v: &str| seen.push(v));
        debounced.call(ms(0), "a");
        debounced.call(ms(20), "b");
        debounced.call(ms(40), "c");
        assert!(!debounced.poll(ms(89)));
        assert!(debounced.poll(ms(90)));
        assert!(!debounced.poll(ms(500)));
        drop(debounced);
        assert_eq!(seen, vec!["c"]);
    }

    #[test]
    fn debounce_cancel_drops_pending_call() {
        let mut state = Debounce::new(ms(10));
        state.call(ms(0), 7);
        assert_eq!(state.cancel(), Some(7));
        assert_eq!(state.poll(ms(100)), None);
        assert!(!state.is_pending());
    }

    proptest! {
        #[test]
        fn debounce_collapses_bursts(offsets in proptest::collection::vec(0u64..99, 1..30)) {
            let delay = ms(100);
            let mut sorted = offsets.clone();
            sorted.sort_unstable();
            let mut state = Debounce::new(delay);
            for (i, offset) in sorted.iter().enumerate() {
                state.call(ms(*offset), i);
                prop_assert_eq!(state.poll(ms(*offset)), None);
            }
            let last = *sorted.last().unwrap();
            let fired = state.poll(ms(last) + delay);
            prop_assert_eq!(fired, Some(sorted.len() - 1));
            prop_assert_eq!(state.poll(ms(10_000)), None);
        }

        #[test]
        fn throttle_accepts_at_most_once_per_interval(times in proptest::collection::vec(0u64..2_000, 1..60)) {
            let mut sorted = times.clone();
            sorted.sort_unstable();
            let mut gate = Throttle::new(ms(100));
            let accepted: Vec<u64> = sorted
                .iter()
                .copied()
                .filter(|t| gate.try_acquire(ms(*t)))
                .collect();
            prop_assert_eq!(accepted.first().copied(), sorted.first().copied());
            for pair in accepted.windows(2) {
                prop_assert!(pair[1] - pair[0] >= 100);
            }
        }
    }
}
