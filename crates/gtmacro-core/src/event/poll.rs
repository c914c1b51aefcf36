// Gtmacro Poll Loop
// Fixed-interval sampling of mouse/modifier level state on a background thread

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::event::EdgeDetector;
use crate::host::Host;
use crate::hotkey::{Hotkey, MouseButton};

/// Default sampling interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A mouse combination an add-on wants to hear about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollBinding {
    /// Identifier handed back to the owning add-on
    pub id: String,
    pub hotkey: Hotkey,
}

impl PollBinding {
    pub fn new(id: impl Into<String>, hotkey: Hotkey) -> Self {
        Self {
            id: id.into(),
            hotkey,
        }
    }

    /// Whether every modifier of the combination is held right now
    fn modifiers_held(&self, host: &dyn Host) -> bool {
        self.hotkey
            .modifiers()
            .iter()
            .all(|&modifier| host.modifier_held(modifier))
    }
}

/// Edge-tracking state for a set of poll bindings
///
/// Edges are taken on the mouse buttons alone. Modifiers are only checked
/// on the sample where a button goes down, so pressing a modifier while a
/// button is already held never fires anything.
#[derive(Debug, Default)]
pub struct PollSampler {
    bindings: Vec<PollBinding>,
    buttons: Vec<(MouseButton, EdgeDetector)>,
}

impl PollSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, binding: PollBinding) {
        match binding.hotkey.mouse_button() {
            Some(button) => {
                if !self.buttons.iter().any(|(known, _)| *known == button) {
                    self.buttons.push((button, EdgeDetector::new()));
                }
            }
            None => log::warn!(
                "poll binding '{}' uses keyboard key {}; it will never fire",
                binding.id,
                binding.hotkey
            ),
        }
        self.bindings.push(binding);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Take one sample of every tracked button
    ///
    /// A binding fires when its button went down on this sample and all of
    /// its modifiers are held. When several match, the one with the most
    /// modifiers wins (Alt+Shift+Right beats a bare Right).
    pub fn sample(&mut self, host: &dyn Host) -> Option<&PollBinding> {
        let pressed: Vec<MouseButton> = self
            .buttons
            .iter_mut()
            .filter_map(|(button, edge)| edge.update(host.mouse_down(*button)).then_some(*button))
            .collect();
        if pressed.is_empty() {
            return None;
        }

        let mut winner: Option<(&PollBinding, usize)> = None;
        for binding in &self.bindings {
            let rose = binding
                .hotkey
                .mouse_button()
                .map_or(false, |button| pressed.contains(&button));
            if !rose || !binding.modifiers_held(host) {
                continue;
            }
            let specificity = binding.hotkey.modifiers().len();
            if winner.map_or(true, |(_, best)| specificity > best) {
                winner = Some((binding, specificity));
            }
        }
        winner.map(|(binding, _)| binding)
    }
}

/// Background thread calling `tick` once per interval until stopped
pub struct PollLoop;

impl PollLoop {
    /// Start the loop; the interval is clamped to at least one millisecond
    pub fn spawn<F>(interval: Duration, mut tick: F) -> PollHandle
    where
        F: FnMut() + Send + 'static,
    {
        let interval = interval.max(Duration::from_millis(1));
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::spawn(move || {
            log::debug!("poll loop started ({}ms)", interval.as_millis());
            while flag.load(Ordering::SeqCst) {
                tick();
                thread::sleep(interval);
            }
            log::debug!("poll loop stopped");
        });
        PollHandle {
            running,
            handle: Some(handle),
        }
    }
}

/// Owner of a running poll loop; stopping is cooperative
pub struct PollHandle {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Ask the loop to exit after its current sleep
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Stop the loop and wait for the thread to finish
    pub fn join(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("poll loop thread panicked");
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
