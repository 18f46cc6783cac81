//! Periodic drivers for the runtime: a fast clock tick and a slower prompt tick.
//!
//! Each worker thread waits on its own shutdown channel with `recv_timeout`, so
//! dropping the senders stops both workers together. `Ticker` never leaves one
//! tick running without the other.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::coaching::CoachingPrompt;
use crate::error::{Result, SessionError};
use crate::state::SessionRuntime;

pub const DEFAULT_CLOCK_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_PROMPT_INTERVAL: Duration = Duration::from_secs(5);

/// Receives coaching prompts. Display and dismissal belong to the implementor.
pub trait PromptSink: Send + Sync {
    fn deliver(&self, prompt: &CoachingPrompt);
}

/// Writes prompts to the tracing log.
#[derive(Debug, Default)]
pub struct LogSink;

impl PromptSink for LogSink {
    fn deliver(&self, prompt: &CoachingPrompt) {
        info!(session = %prompt.session, tip = prompt.tip, "Coaching prompt");
    }
}

/// Forwards prompts to a channel, typically drained by a UI loop.
#[derive(Debug)]
pub struct ChannelSink {
    tx: Sender<CoachingPrompt>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<CoachingPrompt>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl PromptSink for ChannelSink {
    fn deliver(&self, prompt: &CoachingPrompt) {
        if self.tx.send(prompt.clone()).is_err() {
            debug!(session = %prompt.session, "Prompt receiver gone; dropping prompt");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerConfig {
    pub clock_interval: Duration,
    pub prompt_interval: Duration,
    /// When false, latches still advance but nothing reaches the sink.
    pub prompts_enabled: bool,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            clock_interval: DEFAULT_CLOCK_INTERVAL,
            prompt_interval: DEFAULT_PROMPT_INTERVAL,
            prompts_enabled: true,
        }
    }
}

pub struct Ticker {
    shutdown: Vec<Sender<()>>,
    workers: Vec<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn<C, S>(
        runtime: Arc<SessionRuntime<C>>,
        sink: Arc<S>,
        config: TickerConfig,
    ) -> Result<Self>
    where
        C: Clock + 'static,
        S: PromptSink + ?Sized + 'static,
    {
        let mut ticker = Self {
            shutdown: Vec::with_capacity(2),
            workers: Vec::with_capacity(2),
        };

        let clock_runtime = Arc::clone(&runtime);
        ticker.spawn_worker("fx-clock-tick", config.clock_interval, move || {
            clock_runtime.refresh_clock();
        })?;

        ticker.spawn_worker("fx-prompt-tick", config.prompt_interval, move || {
            for prompt in runtime.check_prompts() {
                if config.prompts_enabled {
                    sink.deliver(&prompt);
                } else {
                    debug!(session = %prompt.session, "Prompts disabled; latch advanced silently");
                }
            }
        })?;

        info!(
            clock_interval_ms = config.clock_interval.as_millis() as u64,
            prompt_interval_ms = config.prompt_interval.as_millis() as u64,
            prompts_enabled = config.prompts_enabled,
            "Session ticker started"
        );
        Ok(ticker)
    }

    fn spawn_worker(
        &mut self,
        name: &str,
        interval: Duration,
        mut tick: impl FnMut() + Send + 'static,
    ) -> Result<()> {
        let (tx, rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || loop {
                tick();
                match rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(|source| SessionError::Io {
                context: format!("Failed to spawn {} thread", name),
                source,
            })?;

        self.shutdown.push(tx);
        self.workers.push(handle);
        Ok(())
    }

    /// True while both workers are alive.
    pub fn is_running(&self) -> bool {
        !self.workers.is_empty() && self.workers.iter().all(|w| !w.is_finished())
    }

    /// Stops both ticks and waits for them to finish.
    pub fn stop(mut self) {
        self.shutdown_workers();
    }

    fn shutdown_workers(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.shutdown.clear();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("Session ticker worker panicked");
            }
        }
        info!("Session ticker stopped");
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown_workers();
    }
}
