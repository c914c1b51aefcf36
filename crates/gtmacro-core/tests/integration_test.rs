// Gtmacro Integration Tests
//
// These tests verify the complete pipeline without a game client:
// TOML config -> Runtime -> add-ons -> ActionEmitter -> RecordingHost
//
// Run with: cargo test -p gtmacro-core --test integration_test

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use gtmacro_core::{
    default_config_content, Config, DispatchError, HostCall, Modifier, MouseButton,
    RecordingHost, Runtime,
};

fn runtime_from(toml: &str, player: &str) -> (Arc<RecordingHost>, Runtime) {
    let config = Config::from_toml(toml).unwrap();
    let host = Arc::new(RecordingHost::new(player));
    let runtime = Runtime::from_config(&config, host.clone()).unwrap();
    runtime.start();
    host.take_calls();
    (host, runtime)
}

fn default_runtime() -> (Arc<RecordingHost>, Runtime) {
    runtime_from("", "Alice")
}

fn command(text: &str) -> HostCall {
    HostCall::Command(text.to_string())
}

fn console(text: &str) -> HostCall {
    HostCall::Console(text.to_string())
}

// ==================== Configuration ====================

#[test]
fn test_default_template_builds_default_runtime() {
    let config = Config::from_toml(default_config_content()).unwrap();
    assert_eq!(config, Config::default());

    let host = Arc::new(RecordingHost::new("Alice"));
    let runtime = Runtime::from_config(&config, host).unwrap();
    assert_eq!(
        runtime.addon_names(),
        vec!["healer", "numpad", "ranger", "assist", "progress", "macros"]
    );
}

#[test]
fn test_invalid_config_rejected() {
    assert!(Config::from_toml("[hotkeys]\n\"Ctrl+\" = \"/hi\"\n").is_err());
    assert!(Config::from_toml("[general]\npoll_interval_ms = 0\n").is_err());
    assert!(Config::from_toml("[assist]\ntrade_pattern = \"(\"\n").is_err());
    assert!(Config::from_toml("[healer]\nunknown = 1\n").is_err());
}

#[test]
fn test_start_binds_default_hotkeys() {
    let host = Arc::new(RecordingHost::new("Alice"));
    let runtime = Runtime::from_config(&Config::default(), host.clone()).unwrap();
    runtime.start();

    let binds: Vec<(String, String)> = host
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            HostCall::Bind { hotkey, command } => Some((hotkey, command)),
            _ => None,
        })
        .collect();
    for slot in 0..10 {
        let expected = (format!("Ctrl+Num{}", slot), format!("/healSlot {}", slot));
        assert!(binds.contains(&expected), "missing {:?}", expected);
    }
    assert!(binds.contains(&("F3".to_string(), "/_toggleHeartwood".to_string())));
    assert!(binds.contains(&("Ctrl+1".to_string(), "/wave".to_string())));
    assert_eq!(binds.len(), runtime.hotkey_bindings().len());
}

// ==================== Command Registry ====================

#[test]
fn test_unknown_and_malformed_commands() {
    let (host, runtime) = default_runtime();
    assert_eq!(
        runtime.dispatch("/fly"),
        Err(DispatchError::UnknownCommand("fly".into()))
    );
    assert_eq!(
        runtime.dispatch("hello"),
        Err(DispatchError::NotACommand("hello".into()))
    );
    assert!(host.calls().is_empty());
}

#[test]
fn test_duplicate_command_first_addon_wins() {
    let (host, runtime) = runtime_from(
        "[general]\naddons = [\"healer\", \"booster\"]\n",
        "Alice",
    );
    host.hold("Caduceus");
    runtime.dispatch("/hi").unwrap();
    host.take_calls();

    // f1 belongs to the healer (radium), not the booster (quiet boost)
    runtime.dispatch("/f1").unwrap();
    assert_eq!(
        host.take_calls(),
        vec![console("* Your healer item isn't capable of that")]
    );
    // set is booster-only and still reachable
    runtime.dispatch("/set range 75").unwrap();
    assert_eq!(host.take_calls(), vec![console("* Range set to 75")]);
}

#[test]
fn test_numpad_owns_rescan_without_healer() {
    let (host, runtime) = runtime_from("[general]\naddons = [\"numpad\"]\n", "Alice");
    host.hold("Mercurial Staff");
    runtime.dispatch("/hi").unwrap();
    assert_eq!(
        host.take_calls(),
        vec![console("* Healer Item set to Mercurial Staff")]
    );
}

#[test]
fn test_macro_alias_with_args() {
    let (host, runtime) = default_runtime();
    runtime.dispatch("/bow Bob").unwrap();
    runtime.dispatch("/f9").unwrap();
    assert_eq!(
        host.commands(),
        vec!["/pose bow Bob".to_string(), "/whisper Go home".to_string()]
    );
}

// ==================== Mode Laws ====================

#[test]
fn test_toggle_parity_over_sequences() {
    for presses in 1..=7 {
        let (host, runtime) = default_runtime();
        for _ in 0..presses {
            runtime.dispatch("/atz").unwrap();
        }
        let last = host.console_lines().pop().unwrap();
        let expected = if presses % 2 == 1 { "ON" } else { "OFF" };
        assert_eq!(last, format!("* Auto Trade Zero {}", expected));
    }
}

#[test]
fn test_forced_reset_emits_nothing_and_next_select_activates() {
    let (host, runtime) = default_runtime();
    host.wear("Belt of the Wild");
    runtime.dispatch("/_firstMorph").unwrap();
    host.take_calls();

    runtime.on_chat_line("You return to your normal form.");
    assert!(host.take_calls().is_empty());

    // Local state was reset, so the same selection activates again
    runtime.dispatch("/_firstMorph").unwrap();
    assert_eq!(
        host.take_calls(),
        vec![command(
            "/useitem beltofthewild /shape \"Giant Carnivorous Plankton\""
        )]
    );
}

#[test]
fn test_first_matching_rule_wins() {
    let (host, runtime) = default_runtime();
    host.carry(7, "Heartwood Charm");
    runtime.dispatch("/_toggleHeartwood").unwrap();
    host.take_calls();

    // Matches both "cannot possibly use" and "you return"; the earlier rule
    // also ends the speed boost
    runtime.on_chat_line("You cannot possibly use that now, you return to normal.");
    assert_eq!(
        host.take_calls(),
        vec![HostCall::Unequip(gtmacro_core::ItemId(7))]
    );
}

#[test]
fn test_link_keeps_speed_when_morphed() {
    let (host, runtime) = default_runtime();
    host.wear("Belt of the Wild");
    host.carry(7, "Heartwood Charm");
    runtime.dispatch("/_firstMorph").unwrap();
    runtime.dispatch("/_toggleHeartwood").unwrap();
    host.take_calls();

    runtime.on_chat_line("Alice has fallen to a Maha Ruknee.");
    assert!(host.take_calls().is_empty());

    runtime.on_chat_line("Alice has fallen to a Maha Ruknee.");
    assert!(host.take_calls().is_empty());
}

#[test]
fn test_equip_precedes_use_for_slot_heal() {
    let (host, runtime) = default_runtime();
    host.wear("Caduceus");
    host.hold("Sword");
    runtime.dispatch("/hi").unwrap();
    runtime.dispatch("/num 0 Bob the Brave").unwrap();
    host.take_calls();

    runtime.dispatch("/healSlot 0").unwrap();
    assert_eq!(
        host.take_calls(),
        vec![
            command("/equip Caduceus"),
            console("* healing Bob the Brave"),
            command("/use Bob the Brave"),
        ]
    );

    runtime.dispatch("/healSlot 4").unwrap();
    assert_eq!(
        host.take_calls(),
        vec![console("* No name stored in Numpad 4")]
    );
}

// ==================== Poll Loop ====================

#[test]
fn test_held_button_fires_once() {
    let (host, runtime) = default_runtime();
    host.hold("Caduceus");
    runtime.dispatch("/hi").unwrap();
    host.set_click(Some("Bob"));
    host.take_calls();

    host.set_button(MouseButton::Right, true);
    for _ in 0..5 {
        runtime.poll_once(Instant::now());
    }
    assert_eq!(host.commands(), vec!["/use Bob".to_string()]);
}

#[test]
fn test_modifiers_added_during_held_click_do_not_capture() {
    let (host, runtime) = default_runtime();
    host.hold("Caduceus");
    runtime.dispatch("/hi").unwrap();
    host.set_click(Some("Bob"));
    host.take_calls();

    host.set_button(MouseButton::Right, true);
    runtime.poll_once(Instant::now());
    host.set_modifier(Modifier::Alt, true);
    host.set_modifier(Modifier::Shift, true);
    runtime.poll_once(Instant::now());
    runtime.poll_once(Instant::now());

    assert_eq!(
        host.take_calls(),
        vec![command("/use Bob"), console("* Healing Bob")]
    );
}

#[test]
fn test_capture_wraps_after_ten_slots() {
    let (host, runtime) = default_runtime();
    host.set_modifier(Modifier::Alt, true);
    host.set_modifier(Modifier::Shift, true);

    for round in 0..11 {
        host.set_click(Some(&format!("Target{}", round)));
        host.set_button(MouseButton::Right, true);
        runtime.poll_once(Instant::now());
        host.set_button(MouseButton::Right, false);
        runtime.poll_once(Instant::now());
    }

    let lines = host.console_lines();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "Target0 assigned to Numpad 0");
    assert_eq!(lines[9], "Target9 assigned to Numpad 9");
    assert_eq!(lines[10], "Target10 assigned to Numpad 0");
    // The plain right-click heal never fired alongside the capture
    assert!(host.commands().is_empty());

    host.take_calls();
    runtime.dispatch("/wn").unwrap();
    let listing = host.console_lines();
    assert_eq!(listing[1], "0: Target10");
    assert_eq!(listing[2], "1: Target1");
}

#[test]
fn test_auto_mate_from_tick() {
    let (host, runtime) = default_runtime();
    let start = Instant::now();
    runtime.dispatch("/at").unwrap();
    runtime.poll_once(start);
    runtime.poll_once(start + Duration::from_secs(10));
    runtime.poll_once(start + Duration::from_secs(281));
    assert_eq!(
        host.commands(),
        vec!["/money".to_string(), "/money".to_string()]
    );
}

#[test]
fn test_spawned_poll_loop_heals_once_per_press() {
    let (host, runtime) = runtime_from("[general]\npoll_interval_ms = 2\n", "Alice");
    host.hold("Caduceus");
    runtime.dispatch("/hi").unwrap();
    host.set_click(Some("Bob"));
    host.take_calls();

    let runtime = Arc::new(runtime);
    let handle = runtime.spawn_poll_loop();
    host.set_button(MouseButton::Right, true);
    thread::sleep(Duration::from_millis(100));
    handle.join();

    assert_eq!(host.commands(), vec!["/use Bob".to_string()]);
}

// ==================== Deferred Restoration ====================

const FAST_BOOSTER: &str = "[general]\naddons = [\"booster\"]\n\n[booster]\nrestore_delay_ms = 20\nbalance_lead_ms = 0\nbalance_delay_ms = 0\n";

#[test]
fn test_boost_restores_previous_item() {
    let (host, runtime) = runtime_from(FAST_BOOSTER, "Alice");
    host.hold("Sword");
    runtime.dispatch("/f1").unwrap();
    runtime.wait_for_restores();

    assert_eq!(
        host.calls(),
        vec![
            command("/equip staffofballou"),
            command("/use /QUIET"),
            console("* switched: Sword"),
            command("/equip Sword"),
        ]
    );
}

#[test]
fn test_overlapping_boosts_restore_once() {
    let (host, runtime) = runtime_from(FAST_BOOSTER, "Alice");
    host.carry(3, "Staff of Ballou");
    host.hold("Sword");
    runtime.dispatch("/f1").unwrap();
    runtime.dispatch("/f1").unwrap();
    runtime.wait_for_restores();

    assert_eq!(
        host.calls(),
        vec![
            command("/equip staffofballou"),
            command("/use /QUIET"),
            command("/use /QUIET"),
            console("* switched: Sword"),
            command("/equip Sword"),
        ]
    );
}

#[test]
fn test_boost_from_empty_hand_unequips_staff() {
    let (host, runtime) = runtime_from(FAST_BOOSTER, "Alice");
    runtime.dispatch("/f3").unwrap();
    runtime.wait_for_restores();

    assert_eq!(
        host.calls(),
        vec![
            command("/equip staffofballou"),
            command("/narr Balance-Boost in 0 seconds"),
            command("/use r25% 100%/QUIET"),
            console("* Boosted Range: 25% Power: 100%"),
            command("/unequip staffofballou"),
        ]
    );
}

// ==================== Concurrency ====================

#[test]
fn test_concurrent_toggles_never_interleave() {
    for _ in 0..100 {
        let (host, runtime) = default_runtime();
        host.wear("Belt of the Wild");
        let runtime = Arc::new(runtime);

        let workers: Vec<_> = (0..2)
            .map(|_| {
                let runtime = Arc::clone(&runtime);
                thread::spawn(move || runtime.dispatch("/_firstMorph").unwrap())
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let commands = host.commands();
        assert_eq!(commands.len(), 2, "{:?}", commands);
        assert_eq!(
            commands.iter().filter(|c| c.contains("/shape")).count(),
            1,
            "{:?}",
            commands
        );
        assert_eq!(
            commands.iter().filter(|c| c.ends_with("/return")).count(),
            1,
            "{:?}",
            commands
        );
    }
}
