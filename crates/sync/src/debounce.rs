//! Leading + trailing call coalescing
//!
//! A [`Debouncer`] wraps a target function and bounds how often it runs:
//! - The first call of a burst runs promptly (leading edge)
//! - Calls made during the cooldown window are merged, latest wins
//! - The merged call runs when the window closes (trailing edge)
//!
//! A trailing call re-arms the window without a leading call of its own,
//! so a change arriving right after a flush waits for the next window
//! instead of producing a back-to-back duplicate. A window that closes
//! with nothing pending ends the cooldown.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

type Target<T> = Box<dyn Fn(T) + Send + Sync>;

/// Coalescing caller for a single target function
pub struct Debouncer<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    /// Window length
    cooldown: Duration,
    /// Function being rate limited
    target: Target<T>,
    /// Held while arguments are taken and handed to the target, so calls
    /// reach the target in the order their arguments were taken
    calls: Mutex<()>,
    /// Mutable window state
    window: Mutex<Window<T>>,
}

struct Window<T> {
    /// True while a cooldown window is open
    in_cooldown: bool,
    /// Leading-edge arguments not yet handed to the target
    leading: Option<T>,
    /// Latest arguments received during the window
    pending: Option<T>,
    /// Timer task driving the window
    timer: Option<JoinHandle<()>>,
    /// Bumped whenever a window opens or is cancelled; a timer task only
    /// touches the window whose generation it was spawned with
    generation: u64,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer around `target` with the given cooldown window
    pub fn new<F>(cooldown: Duration, target: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                cooldown,
                target: Box::new(target),
                calls: Mutex::new(()),
                window: Mutex::new(Window {
                    in_cooldown: false,
                    leading: None,
                    pending: None,
                    timer: None,
                    generation: 0,
                }),
            }),
        }
    }

    /// Request a call to the target with `args`
    ///
    /// Outside a cooldown window this opens one and runs the target on the
    /// next scheduling opportunity. Inside a window, `args` replaces any
    /// previously pending arguments and runs when the window closes.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn schedule(&self, args: T) {
        let mut window = self.inner.window.lock();

        if window.in_cooldown {
            window.pending = Some(args);
            return;
        }

        window.in_cooldown = true;
        window.leading = Some(args);
        window.generation = window.generation.wrapping_add(1);

        let deadline = Instant::now() + self.inner.cooldown;
        let inner = Arc::clone(&self.inner);
        window.timer = Some(tokio::spawn(inner.run(deadline, window.generation)));
    }

    /// Run the target now with any arguments still waiting
    ///
    /// The open cooldown window keeps running. Returns true if the target
    /// was called.
    pub fn flush(&self) -> bool {
        let _calls = self.inner.calls.lock();
        let (leading, pending) = {
            let mut window = self.inner.window.lock();
            (window.leading.take(), window.pending.take())
        };

        let mut called = false;
        for args in [leading, pending].into_iter().flatten() {
            (self.inner.target)(args);
            called = true;
        }
        called
    }

    /// Abort the window and drop anything pending
    pub fn cancel(&self) {
        let mut window = self.inner.window.lock();
        if let Some(timer) = window.timer.take() {
            timer.abort();
        }
        window.in_cooldown = false;
        window.leading = None;
        window.pending = None;
        window.generation = window.generation.wrapping_add(1);
    }

    /// Whether a cooldown window is currently open
    pub fn is_cooling_down(&self) -> bool {
        self.inner.window.lock().in_cooldown
    }

    /// Whether a trailing call is waiting for the window to close
    pub fn has_pending(&self) -> bool {
        self.inner.window.lock().pending.is_some()
    }
}

impl<T> Inner<T> {
    /// Drive one burst: leading call, then windows until one closes empty
    async fn run(self: Arc<Self>, mut deadline: Instant, generation: u64) {
        self.run_leading(generation);

        loop {
            sleep_until(deadline).await;

            if !self.close_window(generation) {
                return;
            }
            deadline = Instant::now() + self.cooldown;
        }
    }

    /// Leading call, unless a flush already took its arguments
    fn run_leading(&self, generation: u64) {
        let _calls = self.calls.lock();
        let leading = {
            let mut window = self.window.lock();
            if window.generation != generation {
                return;
            }
            window.leading.take()
        };
        if let Some(args) = leading {
            (self.target)(args);
        }
    }

    /// End of a window: run the trailing call if one is pending, otherwise
    /// leave cooldown. Returns true if the window was re-armed.
    ///
    /// A stale timer, one whose window was cancelled and possibly replaced,
    /// leaves the window alone and returns false.
    fn close_window(&self, generation: u64) -> bool {
        let _calls = self.calls.lock();
        let trailing = {
            let mut window = self.window.lock();
            if window.generation != generation {
                return false;
            }
            let pending = window.pending.take();
            if pending.is_none() {
                window.in_cooldown = false;
                window.timer = None;
            }
            pending
        };

        match trailing {
            Some(args) => {
                (self.target)(args);
                true
            }
            None => false,
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(timer) = self.inner.window.lock().timer.take() {
            timer.abort();
        }
    }
}
