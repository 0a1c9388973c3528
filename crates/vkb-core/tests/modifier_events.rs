//! Integration tests: virtual modifier keys → event modifier snapshots.
//!
//! Mirrors how the keyboard drives the pointer layer: taps on modifier
//! keys change the snapshot attached to the next synthetic events.

use pretty_assertions::assert_eq;
use vkb_core::{
    EventKind, ModifierKey, ModifierSnapshot, ModifierStateProvider, Point, SyntheticEventSpec,
    VirtualModifiers,
};

fn click_with(provider: &impl ModifierStateProvider) -> SyntheticEventSpec {
    SyntheticEventSpec::new(EventKind::Click, Point::new(1.0, 1.0), provider.snapshot())
        .with_detail(1)
}

#[test]
fn latched_shift_applies_to_next_click_only() {
    let mut mods = VirtualModifiers::new();
    mods.tap(ModifierKey::Shift);

    let first = click_with(&mods);
    mods.consume_latched();
    let second = click_with(&mods);

    assert!(first.modifiers.shift);
    assert_eq!(second.modifiers, ModifierSnapshot::NONE);
}

#[test]
fn locked_ctrl_survives_regular_keys() {
    let mut mods = VirtualModifiers::new();
    mods.tap(ModifierKey::Ctrl);
    mods.tap(ModifierKey::Ctrl);
    for _ in 0..3 {
        mods.consume_latched();
        assert!(click_with(&mods).modifiers.ctrl);
    }
}

#[test]
fn combined_modifiers_in_snapshot() {
    let mut mods = VirtualModifiers::new();
    for key in ["Control", "Alt", "Meta"] {
        mods.tap(key.parse().unwrap());
    }
    assert_eq!(
        click_with(&mods).modifiers,
        ModifierSnapshot {
            ctrl: true,
            alt: true,
            shift: false,
            meta: true,
        }
    );
}

#[test]
fn snapshot_provider_is_constant() {
    let fixed = ModifierSnapshot {
        alt: true,
        ..ModifierSnapshot::NONE
    };
    assert_eq!(click_with(&fixed).modifiers, fixed);
}
