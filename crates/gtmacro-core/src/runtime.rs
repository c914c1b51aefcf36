// Gtmacro Runtime
// Wires add-ons to the host: command registry, hotkeys, chat and poll dispatch

use std::sync::Arc;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::addon::{
    Addon, Assist, Booster, Context, Healer, HealerItem, Macros, Numpad, Progress, Ranger,
};
use crate::config::{AddonKind, Config, ConfigError};
use crate::emitter::ActionEmitter;
use crate::event::{PollBinding, PollHandle, PollLoop, PollSampler, DEFAULT_POLL_INTERVAL};
use crate::host::Host;
use crate::hotkey::{parse_hotkey, Hotkey};
use crate::savelog::ConsoleLog;

/// Errors returned when dispatching a command line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("not a command: '{0}'")]
    NotACommand(String),

    #[error("unknown command: /{0}")]
    UnknownCommand(String),
}

struct Registered {
    addon: usize,
    /// Name as the add-on declared it
    name: String,
}

struct PollOwner {
    addon: usize,
    /// Binding id local to the add-on
    id: String,
}

/// The add-on host: every entry point the game client calls goes through here
pub struct Runtime {
    emitter: ActionEmitter,
    addons: Vec<Arc<dyn Addon>>,
    /// Lowercased command name -> owner
    commands: IndexMap<String, Registered>,
    /// Lowercased hotkey -> (hotkey, command line)
    hotkeys: IndexMap<String, (Hotkey, String)>,
    sampler: Mutex<PollSampler>,
    poll_owners: IndexMap<String, PollOwner>,
    interval: Duration,
}

impl Runtime {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            emitter: ActionEmitter::new(host),
            addons: Vec::new(),
            commands: IndexMap::new(),
            hotkeys: IndexMap::new(),
            sampler: Mutex::new(PollSampler::new()),
            poll_owners: IndexMap::new(),
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Build a runtime with the add-ons the configuration enables
    ///
    /// Opens the console log when `general.log_dir` is set; a log that
    /// cannot be opened is reported to the player and otherwise ignored.
    pub fn from_config(config: &Config, host: Arc<dyn Host>) -> Result<Self, ConfigError> {
        let player = host.player_name();
        let mut runtime = Self::new(Arc::clone(&host)).with_interval(config.general.poll_interval());
        if let Some(dir) = &config.general.log_dir {
            let log = ConsoleLog::open_or_notify(dir, &player, host.as_ref());
            runtime = runtime.with_log(Arc::new(log));
        }

        let healer_item = Arc::new(HealerItem::new(&config.healer));
        let healer_enabled = config.general.is_enabled(AddonKind::Healer);
        for kind in &config.general.addons {
            let addon: Arc<dyn Addon> = match kind {
                AddonKind::Healer => {
                    Arc::new(Healer::new(&config.healer, Arc::clone(&healer_item))?)
                }
                AddonKind::Numpad => Arc::new(Numpad::new(
                    &config.numpad,
                    Arc::clone(&healer_item),
                    !healer_enabled,
                )?),
                AddonKind::Ranger => Arc::new(Ranger::new(&config.ranger, &player)?),
                AddonKind::Booster => Arc::new(Booster::new(&config.booster)),
                AddonKind::Assist => Arc::new(Assist::new(&config.assist, &player)?),
                AddonKind::Progress => Arc::new(Progress::new(&player)?),
                AddonKind::Macros => Arc::new(Macros::new(&config.macros)),
            };
            runtime.register(addon);
        }

        for (text, command) in &config.hotkeys {
            let hotkey = parse_hotkey(text).map_err(|source| ConfigError::InvalidHotkey {
                hotkey: text.clone(),
                source,
            })?;
            runtime.override_hotkey(hotkey, command.trim());
        }
        Ok(runtime)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_log(mut self, log: Arc<ConsoleLog>) -> Self {
        self.emitter = self.emitter.with_log(log);
        self
    }

    pub fn emitter(&self) -> &ActionEmitter {
        &self.emitter
    }

    pub fn addon_names(&self) -> Vec<&'static str> {
        self.addons.iter().map(|addon| addon.name()).collect()
    }

    /// Registered command names, in registration order
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.values().map(|entry| entry.name.as_str()).collect()
    }

    /// Hotkeys that `start` will bind
    pub fn hotkey_bindings(&self) -> Vec<(Hotkey, String)> {
        self.hotkeys.values().cloned().collect()
    }

    /// Add an add-on; on conflicts the earlier registration wins
    pub fn register(&mut self, addon: Arc<dyn Addon>) {
        let index = self.addons.len();
        for name in addon.commands() {
            let key = name.to_lowercase();
            if let Some(existing) = self.commands.get(&key) {
                log::warn!(
                    "command /{} from {} already registered by {}; ignored",
                    name,
                    addon.name(),
                    self.addons[existing.addon].name()
                );
                continue;
            }
            self.commands.insert(key, Registered { addon: index, name });
        }

        for binding in addon.hotkeys() {
            let key = binding.hotkey.to_string().to_lowercase();
            if self.hotkeys.contains_key(&key) {
                log::warn!(
                    "hotkey {} from {} already bound; ignored",
                    binding.hotkey,
                    addon.name()
                );
                continue;
            }
            self.hotkeys.insert(key, (binding.hotkey, binding.command));
        }

        let mut sampler = self.sampler.lock();
        for binding in addon.poll_bindings() {
            let qualified = format!("{}:{}", addon.name(), binding.id);
            self.poll_owners.insert(
                qualified.clone(),
                PollOwner {
                    addon: index,
                    id: binding.id,
                },
            );
            sampler.add(PollBinding::new(qualified, binding.hotkey));
        }
        drop(sampler);

        log::debug!("registered add-on {}", addon.name());
        self.addons.push(addon);
    }

    /// Bind a key to a command line, replacing any default for that key
    pub fn override_hotkey(&mut self, hotkey: Hotkey, command: &str) {
        let key = hotkey.to_string().to_lowercase();
        match self.hotkeys.get_mut(&key) {
            Some((bound, previous)) => {
                log::info!("hotkey {} rebound from {} to {}", bound, previous, command);
                *previous = command.to_string();
            }
            None => {
                self.hotkeys.insert(key, (hotkey, command.to_string()));
            }
        }
    }

    fn context(&self) -> Context<'_> {
        Context::new(self.emitter.host().as_ref())
    }

    /// Run start-up hooks and bind every hotkey
    pub fn start(&self) {
        for addon in &self.addons {
            let actions = addon.on_start(&self.context());
            self.emitter.apply(actions);
        }
        let host = self.emitter.host();
        for (hotkey, command) in self.hotkeys.values() {
            host.bind_hotkey(hotkey, command);
        }
        log::info!(
            "started {} add-ons, {} commands, {} hotkeys",
            self.addons.len(),
            self.commands.len(),
            self.hotkeys.len()
        );
    }

    /// Dispatch a command line such as "/healSlot 3"
    pub fn dispatch(&self, line: &str) -> Result<(), DispatchError> {
        let line = line.trim();
        let body = line
            .strip_prefix('/')
            .ok_or_else(|| DispatchError::NotACommand(line.to_string()))?;
        let (name, args) = match body.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (body, ""),
        };
        let entry = self
            .commands
            .get(&name.to_lowercase())
            .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))?;
        let addon = &self.addons[entry.addon];
        log::debug!("/{} {} -> {}", entry.name, args, addon.name());
        let actions = addon.on_command(&self.context(), &entry.name, args);
        self.emitter.apply(actions);
        Ok(())
    }

    /// Feed one incoming chat/log line to every add-on, in registration order
    pub fn on_chat_line(&self, line: &str) {
        for addon in &self.addons {
            let actions = addon.on_chat(&self.context(), line);
            self.emitter.apply(actions);
        }
    }

    /// One poll tick: sample input edges, then run every add-on's tick
    pub fn poll_once(&self, now: Instant) {
        let mut sampler = self.sampler.lock();
        let fired = sampler
            .sample(self.emitter.host().as_ref())
            .and_then(|binding| self.poll_owners.get(&binding.id))
            .map(|owner| (owner.addon, owner.id.clone()));
        drop(sampler);

        if let Some((index, id)) = fired {
            let addon = &self.addons[index];
            log::debug!("poll edge {} -> {}", id, addon.name());
            let actions = addon.on_poll(&self.context(), &id);
            self.emitter.apply(actions);
        }
        for addon in &self.addons {
            let actions = addon.on_tick(&self.context(), now);
            self.emitter.apply(actions);
        }
    }

    /// Run `poll_once` on a background thread at the configured interval
    pub fn spawn_poll_loop(self: &Arc<Self>) -> PollHandle {
        let runtime = Arc::clone(self);
        PollLoop::spawn(self.interval, move || runtime.poll_once(Instant::now()))
    }

    /// Block until pending deferred restorations have run
    pub fn wait_for_restores(&self) {
        self.emitter.wait_for_restores();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::host::{HostCall, RecordingHost};

    struct Echo;

    impl Addon for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn commands(&self) -> Vec<String> {
            vec!["say".to_string()]
        }

        fn on_command(&self, _cx: &Context<'_>, _command: &str, args: &str) -> Vec<Action> {
            vec![Action::console(args)]
        }
    }

    struct Shout;

    impl Addon for Shout {
        fn name(&self) -> &'static str {
            "shout"
        }

        fn commands(&self) -> Vec<String> {
            vec!["SAY".to_string(), "yell".to_string()]
        }

        fn on_command(&self, _cx: &Context<'_>, command: &str, args: &str) -> Vec<Action> {
            vec![Action::command(format!("/{} {}", command, args))]
        }
    }

    fn runtime() -> (Arc<RecordingHost>, Runtime) {
        let host = Arc::new(RecordingHost::new("Alice"));
        let runtime = Runtime::new(host.clone());
        (host, runtime)
    }

    #[test]
    fn test_dispatch_routes_with_args() {
        let (host, mut runtime) = runtime();
        runtime.register(Arc::new(Echo));
        runtime.dispatch("/say hello there").unwrap();
        runtime.dispatch("  /SAY again ").unwrap();
        assert_eq!(host.console_lines(), vec!["hello there", "again"]);
    }

    #[test]
    fn test_dispatch_errors() {
        let (_host, mut runtime) = runtime();
        runtime.register(Arc::new(Echo));
        assert_eq!(
            runtime.dispatch("say hi"),
            Err(DispatchError::NotACommand("say hi".into()))
        );
        assert_eq!(
            runtime.dispatch("/dance"),
            Err(DispatchError::UnknownCommand("dance".into()))
        );
    }

    #[test]
    fn test_first_registration_wins() {
        let (host, mut runtime) = runtime();
        runtime.register(Arc::new(Echo));
        runtime.register(Arc::new(Shout));
        assert_eq!(runtime.command_names(), vec!["say", "yell"]);

        runtime.dispatch("/say hi").unwrap();
        runtime.dispatch("/yell hey").unwrap();
        assert_eq!(
            host.calls(),
            vec![
                HostCall::Console("hi".into()),
                HostCall::Command("/yell hey".into()),
            ]
        );
    }

    #[test]
    fn test_from_config_default_addons() {
        let host = Arc::new(RecordingHost::new("Alice"));
        let runtime = Runtime::from_config(&Config::default(), host).unwrap();
        assert_eq!(
            runtime.addon_names(),
            vec!["healer", "numpad", "ranger", "assist", "progress", "macros"]
        );
        let commands = runtime.command_names();
        assert!(commands.contains(&"healSlot"));
        assert!(commands.contains(&"_toggleHeartwood"));
        assert_eq!(commands.iter().filter(|c| **c == "hi").count(), 1);
    }

    #[test]
    fn test_hotkey_override_replaces_default() {
        let host = Arc::new(RecordingHost::new("Alice"));
        let mut config = Config::default();
        config
            .hotkeys
            .insert("ctrl+num0".to_string(), "/healSlot 9".to_string());
        config
            .hotkeys
            .insert("F12".to_string(), "/ranger".to_string());
        let runtime = Runtime::from_config(&config, host.clone()).unwrap();
        runtime.start();

        let binds: Vec<(String, String)> = host
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Bind { hotkey, command } => Some((hotkey, command)),
                _ => None,
            })
            .collect();
        assert!(binds.contains(&("Ctrl+Num0".to_string(), "/healSlot 9".to_string())));
        assert!(!binds.contains(&("Ctrl+Num0".to_string(), "/healSlot 0".to_string())));
        assert!(binds.contains(&("F12".to_string(), "/ranger".to_string())));
        assert!(binds.contains(&("F1".to_string(), "/_firstMorph".to_string())));
    }

    #[test]
    fn test_log_dir_records_console() {
        let dir = tempfile::tempdir().unwrap();
        let host = Arc::new(RecordingHost::new("Alice"));
        let mut config = Config::default();
        config.general.log_dir = Some(dir.path().to_path_buf());
        let runtime = Runtime::from_config(&config, host).unwrap();
        runtime.start();

        let content = std::fs::read_to_string(dir.path().join("Alice.log")).unwrap();
        assert!(content.contains("* No healer item equipped"));
    }
}
