//! The push mixer: a background worker reconciling the local model with its
//! peers through the three-call exchange.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use colored::Colorize;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, warn};

use super::candidate::CandidateSelector;
use super::communication::Communication;
use super::constants::MIXER_WAIT;
use super::mixable::MixableHandle;
use crate::peer::Peer;
use crate::registry::Membership;
use crate::util;
use crate::Result;

/// Byte totals exchanged during one mix round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MixStats {
    pub pulled: usize,
    pub pushed: usize,
}

struct MixerState {
    /// Local model updates since the last mix.
    counter: u64,
    /// Monotonic instant of the last mix, for threshold arithmetic.
    tick_at: Instant,
    /// Wall clock seconds of the last mix, surfaced through the status map.
    tick_unix_secs: u64,
    /// Successful mixes since start.
    mix_count: u64,
    running: bool,
}

/// The mixer owns the exchange loop and its lifecycle.
///
/// Constructed stopped; [start](PushMixer::start) launches the worker and
/// [stop](PushMixer::stop) joins it. `counter` and the tick are reset together
/// whenever a mix begins, whether scheduled or kicked explicitly.
pub struct PushMixer {
    communication: Arc<dyn Communication>,
    membership: Arc<Membership>,
    adapter: MixableHandle,
    selector: CandidateSelector,
    count_threshold: u64,
    tick_threshold: Duration,
    my_id: Peer,
    state: Mutex<MixerState>,
    notify: Notify,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl PushMixer {
    /// A zero `count_threshold` or `tick_threshold` disables that trigger; if
    /// both are zero the worker only mixes on explicit kicks.
    pub fn new(
        communication: Arc<dyn Communication>,
        membership: Arc<Membership>,
        adapter: MixableHandle,
        selector: CandidateSelector,
        count_threshold: u64,
        tick_threshold: Duration,
        my_id: Peer,
    ) -> Arc<PushMixer> {
        let state = MixerState {
            counter: 0,
            tick_at: Instant::now(),
            tick_unix_secs: util::unix_time_secs(),
            mix_count: 0,
            running: false,
        };
        Arc::new(PushMixer {
            communication,
            membership,
            adapter,
            selector,
            count_threshold,
            tick_threshold,
            my_id,
            state: Mutex::new(state),
            notify: Notify::new(),
            worker: Mutex::new(None),
        })
    }

    /// Launches the background worker. No-op while already running.
    pub fn start(self: &Arc<Self>) {
        {
            let mut state = self.state.lock().unwrap();
            if state.running {
                return;
            }
            state.running = true;
        }
        let mixer = Arc::clone(self);
        let handle = tokio::spawn(mixer.mixer_loop());
        *self.worker.lock().unwrap() = Some(handle);
        debug!("[{}] started", "mixer".magenta());
    }

    /// Signals the worker and joins it. No-op while already stopped; in-flight
    /// peer calls run to their natural timeout.
    pub async fn stop(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if !state.running {
                return;
            }
            state.running = false;
        }
        self.notify.notify_waiters();
        let handle = self.worker.lock().unwrap().take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                error!("[{}] failed to join worker: {}", "mixer".magenta(), err);
            }
        }
        debug!("[{}] stopped", "mixer".magenta());
    }

    /// Records one local model update and wakes the worker once a configured
    /// threshold is crossed.
    pub fn updated(&self) {
        let mut state = self.state.lock().unwrap();
        state.counter += 1;
        if self.threshold_crossed(&state) {
            self.notify.notify_one();
        }
    }

    /// Runs one mix round synchronously, resetting the counter and tick
    /// first. Returns `true` iff the round completed without failure.
    pub async fn do_mix(&self) -> bool {
        self.reset_tick();
        info!("[{}] forced to mix by operator request", "mixer".magenta());
        match self.mix().await {
            Ok(_) => true,
            Err(err) => {
                error!("[{}] {}", "mixer".magenta(), err);
                false
            }
        }
    }

    /// Read-only status for the external aggregator. The pair is read under
    /// one critical section and cannot tear.
    pub fn get_status(&self) -> HashMap<String, String> {
        let state = self.state.lock().unwrap();
        let mut status = HashMap::new();
        status.insert("push_mixer.count".to_owned(), state.counter.to_string());
        status.insert("push_mixer.ticktime".to_owned(), state.tick_unix_secs.to_string());
        status
    }

    pub fn mix_count(&self) -> u64 {
        self.state.lock().unwrap().mix_count
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().unwrap().running
    }

    /// Serves `pull` for a remote peer: her argument in, my diff out.
    pub async fn handle_pull(&self, arg: Vec<u8>) -> Result<Vec<u8>> {
        self.adapter.pull(&arg).await
    }

    /// Serves `get_pull_argument` for a remote peer.
    pub async fn handle_get_pull_argument(&self) -> Result<Vec<u8>> {
        self.adapter.get_argument().await
    }

    /// Serves `push` for a remote peer: applies her diff under the writer
    /// lock, then resets the update counter since an externally driven mix
    /// has occurred.
    pub async fn handle_push(&self, diff: Vec<u8>) -> Result<i32> {
        self.adapter.push(&diff).await?;
        self.reset_tick();
        Ok(0)
    }

    fn reset_tick(&self) {
        let mut state = self.state.lock().unwrap();
        state.counter = 0;
        state.tick_at = Instant::now();
        state.tick_unix_secs = util::unix_time_secs();
    }

    fn threshold_crossed(&self, state: &MixerState) -> bool {
        let by_count = self.count_threshold > 0 && state.counter >= self.count_threshold;
        let by_tick =
            !self.tick_threshold.is_zero() && state.tick_at.elapsed() > self.tick_threshold;
        by_count || by_tick
    }

    async fn mixer_loop(self: Arc<Self>) {
        loop {
            {
                let state = self.state.lock().unwrap();
                if !state.running {
                    return;
                }
            }

            // Waits are bounded so that stale thresholds and stop requests are
            // observed within one cycle.
            let _ = timeout(MIXER_WAIT, self.notify.notified()).await;

            let crossed = {
                let mut state = self.state.lock().unwrap();
                if !state.running {
                    return;
                }
                if self.threshold_crossed(&state) {
                    let trigger = if self.count_threshold > 0
                        && state.counter >= self.count_threshold
                    {
                        "counter"
                    } else {
                        "tick_time"
                    };
                    debug!("[{}] starting mix because of {} threshold", "mixer".magenta(), trigger);
                    state.counter = 0;
                    state.tick_at = Instant::now();
                    state.tick_unix_secs = util::unix_time_secs();
                    true
                } else {
                    false
                }
            };

            if crossed {
                match self.mix().await {
                    Ok(_) => {
                        let mix_count = self.state.lock().unwrap().mix_count;
                        debug!("[{}] .... {}th mix done", "mixer".magenta(), mix_count);
                    }
                    Err(err) => error!("[{}] {}", "mixer".magenta(), err),
                }
            }
        }
    }

    /// One mix round: refresh membership, select candidates, run the
    /// exchange against each in order.
    async fn mix(&self) -> Result<MixStats> {
        let start = Instant::now();
        let mut stats = MixStats::default();

        let servers_size = self.membership.refresh().await;
        if servers_size == 0 {
            warn!("[{}] no other server", "mixer".magenta());
            return Ok(stats);
        }

        let peers = self.membership.snapshot();
        let candidates = (self.selector)(&peers, &self.my_id);
        if candidates.is_empty() {
            warn!("[{}] no peer selected", "mixer".magenta());
        }

        if let Err(err) = self.exchange(&candidates, &mut stats).await {
            warn!("[{}] {} : mix failed", "mixer".magenta(), err);
            return Err(err);
        }

        let mix_count = {
            let mut state = self.state.lock().unwrap();
            state.mix_count += 1;
            state.mix_count
        };
        info!(
            "[{}] {}ms elapsed, {} bytes pulled, {} bytes pushed ({} mixes)",
            "mixer".magenta(),
            start.elapsed().as_millis(),
            stats.pulled,
            stats.pushed,
            mix_count
        );
        Ok(stats)
    }

    /// The first failing call aborts the round; later candidates are not
    /// contacted and the local model keeps its pre-round state for them.
    async fn exchange(&self, candidates: &[Peer], stats: &mut MixStats) -> Result<()> {
        for she in candidates {
            // pull from her
            let my_arg = self.adapter.get_argument().await?;
            let her_diff = self.communication.pull(she, my_arg).await?;

            // pull from me
            let her_arg = self.communication.get_pull_argument(she).await?;
            let my_diff = self.adapter.pull(&her_arg).await?;

            // push to her and me
            stats.pushed += my_diff.len();
            let _ = self.communication.push(she, my_diff).await?;
            self.adapter.push(&her_diff).await?;

            stats.pulled += her_diff.len();
        }
        Ok(())
    }
}
