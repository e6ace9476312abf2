//! Integration tests for registration rules

mod common;
use common::*;

use strip_app_manager::{
    AppDescriptor, AppFlags, DEFAULT_SLOTS, RegistrationError, Registry,
};

#[test]
fn registering_up_to_capacity_succeeds() {
    let probes: [Probe; 7] = Default::default();
    let mut apps = probes.each_ref().map(ProbeApp::new);
    let names = ["a", "b", "c", "d", "e", "f", "g"];
    let timer = MockTimeSource::new();
    let mut manager = new_manager(&timer);

    for (app, name) in apps.iter_mut().zip(names) {
        manager.register(AppDescriptor::new(name, "Probe", app));
    }

    assert_eq!(manager.count(), DEFAULT_SLOTS);
    assert_eq!(manager.name(7), "g");
}

#[test]
#[should_panic(expected = "app slots are registered")]
fn registering_past_capacity_panics() {
    let probes: [Probe; 8] = Default::default();
    let mut apps = probes.each_ref().map(ProbeApp::new);
    let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
    let timer = MockTimeSource::new();
    let mut manager = new_manager(&timer);

    for (app, name) in apps.iter_mut().zip(names) {
        manager.register(AppDescriptor::new(name, "Probe", app));
    }
}

#[test]
fn indices_follow_registration_order() {
    let probe = Probe::default();
    let mut first = ProbeApp::new(&probe);
    let mut second = ProbeApp::new(&probe);
    let mut registry = Registry::<4>::new();

    registry.register(AppDescriptor::new("swflag", "Switch flag", &mut first));
    registry.register(AppDescriptor::new("runled", "Running LEDs", &mut second).hints("dim", "bright"));

    assert_eq!(registry.count(), 3);
    assert_eq!(registry.name(1), "swflag");
    assert_eq!(registry.name(2), "runled");
    assert_eq!(registry.display_label(2), "Running LEDs");
    assert_eq!(registry.get(2).button_hints(), ("dim", "bright"));
    assert_eq!(registry.get(1).button_hints(), ("--", "--"));
}

#[test]
#[should_panic(expected = "non-alphanumeric")]
fn name_with_space_panics() {
    let probe = Probe::default();
    let mut app = ProbeApp::new(&probe);
    let mut registry = Registry::<4>::new();
    registry.register(AppDescriptor::new("run led", "Running LEDs", &mut app));
}

#[test]
#[should_panic(expected = "must not be empty")]
fn empty_name_panics() {
    let probe = Probe::default();
    let mut app = ProbeApp::new(&probe);
    let mut registry = Registry::<4>::new();
    registry.register(AppDescriptor::new("", "Nameless", &mut app));
}

#[test]
#[should_panic(expected = "unknown app flags")]
fn unknown_flag_bits_panic() {
    let probe = Probe::default();
    let mut app = ProbeApp::new(&probe);
    let mut registry = Registry::<4>::new();
    registry.register(
        AppDescriptor::new("runled", "Running LEDs", &mut app)
            .flags(AppFlags::WITH_REPAIR | AppFlags::from_bits_retain(0x40)),
    );
}

#[test]
fn non_ascii_name_is_rejected_by_validate() {
    let probe = Probe::default();
    let mut app = ProbeApp::new(&probe);
    let mut descriptor = AppDescriptor::new("dimmé", "Dimmer", &mut app);
    assert_eq!(
        descriptor.validate(),
        Err(RegistrationError::InvalidNameChar { position: 4 })
    );
}

#[test]
fn configurable_apps_always_carry_help() {
    let plain_probe = Probe::default();
    let dim_probe = Probe::default();
    let mut plain = ProbeApp::new(&plain_probe);
    let mut dimmable = DimmableApp::new(&dim_probe);
    let mut registry = Registry::<4>::new();
    registry.register(AppDescriptor::new("plain", "Plain", &mut plain));
    registry.register(AppDescriptor::new("dimmer", "Dimmer", &mut dimmable));

    assert!(!registry.is_configurable(0));
    assert!(!registry.is_configurable(1));
    assert!(registry.is_configurable(2));

    for appix in 0..registry.count() {
        if let Some(config) = registry.config_mut(appix) {
            assert!(!config.help().is_empty());
        }
    }
}

#[test]
#[should_panic(expected = "must provide help text")]
fn configurable_app_without_help_panics() {
    let mut app = HelplessApp;
    let mut registry = Registry::<4>::new();
    registry.register(AppDescriptor::new("helpless", "Helpless", &mut app));
}
