// Gtmacro CLI
// Replays a scripted game session against an in-memory host and prints every
// command, console line and notification the add-ons produce

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use gtmacro_core::{
    default_config_content, Config, HostCall, Modifier, MouseButton, RecordingHost, Runtime,
};

/// Chat-driven game client add-ons
#[derive(Parser, Debug)]
#[command(name = "gtmacro")]
#[command(version)]
#[command(about = "Replay a game session through the gtmacro add-ons", long_about = None)]
struct Args {
    /// TOML configuration file (default: ~/.config/gtmacro/config.toml)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Name of the simulated player character
    #[arg(short, long, value_name = "NAME", default_value = "Player")]
    player: String,

    /// Replay script (reads stdin when omitted)
    #[arg(short, long, value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config and exit
    #[arg(long)]
    check_config: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

/// A level-state input the poll loop samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Button(MouseButton),
    Modifier(Modifier),
}

/// One line of a replay script
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    /// Wear an item outside the main hand
    Equip(String),
    /// Put an item in the main hand
    Hold(String),
    /// Add an item to the inventory
    Carry(u32, String),
    Unequip(String),
    Chat(String),
    Command(String),
    Click(Option<String>),
    Press(Input, bool),
    Tick,
    Wait(Duration),
}

fn parse_input(token: &str) -> Result<Input> {
    if let Ok(button) = token.parse::<MouseButton>() {
        return Ok(Input::Button(button));
    }
    Modifier::from_alias(token)
        .map(Input::Modifier)
        .ok_or_else(|| anyhow!("unknown button or modifier '{}'", token))
}

fn required<'a>(verb: &str, rest: &'a str) -> Result<&'a str> {
    if rest.is_empty() {
        bail!("'{}' needs an argument", verb);
    }
    Ok(rest)
}

/// Parse one script line; blank lines and `#` comments yield `None`
fn parse_step(line: &str) -> Result<Option<Step>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let step = match verb.to_lowercase().as_str() {
        "equip" => Step::Equip(required(verb, rest)?.to_string()),
        "hold" => Step::Hold(required(verb, rest)?.to_string()),
        "unequip" => Step::Unequip(required(verb, rest)?.to_string()),
        "carry" => {
            let (id, name) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("usage: carry <id> <name>"))?;
            let id = id
                .parse()
                .with_context(|| format!("invalid item id '{}'", id))?;
            Step::Carry(id, name.trim().to_string())
        }
        "chat" => Step::Chat(required(verb, rest)?.to_string()),
        "cmd" => Step::Command(required(verb, rest)?.to_string()),
        "click" => Step::Click(Some(required(verb, rest)?.to_string())),
        "click-none" => Step::Click(None),
        "down" => Step::Press(parse_input(required(verb, rest)?)?, true),
        "up" => Step::Press(parse_input(required(verb, rest)?)?, false),
        "tick" => Step::Tick,
        "wait" => {
            let ms: u64 = required(verb, rest)?
                .parse()
                .with_context(|| format!("invalid wait '{}'", rest))?;
            Step::Wait(Duration::from_millis(ms))
        }
        other => bail!("unknown step '{}'", other),
    };
    Ok(Some(step))
}

fn parse_script(script: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (number, line) in script.lines().enumerate() {
        let step = parse_step(line).with_context(|| format!("script line {}", number + 1))?;
        steps.extend(step);
    }
    Ok(steps)
}

fn render(call: &HostCall) -> String {
    match call {
        HostCall::Command(command) => format!("command  {}", command),
        HostCall::Equip(id) => format!("equip    {}", id),
        HostCall::Unequip(id) => format!("unequip  {}", id),
        HostCall::Console(text) => format!("console  {}", text),
        HostCall::Notify(text) => format!("notify   {}", text),
        HostCall::Bind { hotkey, command } => format!("bind     {} -> {}", hotkey, command),
    }
}

/// Session state for one replay
struct Replay {
    host: Arc<RecordingHost>,
    runtime: Runtime,
}

impl Replay {
    fn new(config: &Config, player: &str) -> Result<Self> {
        let host = Arc::new(RecordingHost::new(player));
        let runtime = Runtime::from_config(config, host.clone())
            .context("failed to set up add-ons")?;
        Ok(Self { host, runtime })
    }

    fn flush(&self) {
        for call in self.host.take_calls() {
            println!("{}", render(&call));
        }
    }

    fn step(&self, step: &Step) {
        log::debug!("step {:?}", step);
        match step {
            Step::Equip(name) => self.host.wear(name),
            Step::Hold(name) => self.host.hold(name),
            Step::Carry(id, name) => self.host.carry(*id, name),
            Step::Unequip(name) => self.host.remove(name),
            Step::Chat(line) => self.runtime.on_chat_line(line),
            Step::Command(line) => {
                if let Err(e) = self.runtime.dispatch(line) {
                    log::warn!("{}", e);
                }
            }
            Step::Click(target) => self.host.set_click(target.as_deref()),
            Step::Press(Input::Button(button), down) => self.host.set_button(*button, *down),
            Step::Press(Input::Modifier(modifier), down) => {
                self.host.set_modifier(*modifier, *down)
            }
            Step::Tick => self.runtime.poll_once(Instant::now()),
            Step::Wait(delay) => thread::sleep(*delay),
        }
    }

    fn run(&self, steps: &[Step]) {
        self.runtime.start();
        self.flush();
        for step in steps {
            self.step(step);
            self.flush();
        }
        self.runtime.wait_for_restores();
        self.flush();
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Config::load_default().context("failed to load default config"),
    }
}

fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display())),
        None => {
            let mut script = String::new();
            io::stdin()
                .read_to_string(&mut script)
                .context("failed to read script from stdin")?;
            Ok(script)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.print_config {
        print!("{}", default_config_content());
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    if args.check_config {
        println!("Configuration is valid");
        return Ok(());
    }

    let steps = parse_script(&read_script(args.script.as_deref())?)?;
    log::info!("replaying {} steps as {}", steps.len(), args.player);
    let replay = Replay::new(&config, &args.player)?;
    replay.run(&steps);
    Ok(())
}
