//! Controller placement and resolution integration tests.
//!
//! Maps are built in code, loaded through `load_map` and walked with
//! `enter_room`, so resolution is checked the way the game sees it.

use bevy_ecs::prelude::*;
use glam::Vec2;

use gravityflip::components::gravity::{GravityComponent, GravityType};
use gravityflip::components::scale::{LightOffset, Scale};
use gravityflip::components::persistent::RoomScoped;
use gravityflip::controllers::altmode::{AltModeController, is_alt_mode_active};
use gravityflip::controllers::behavior::BehaviorController;
use gravityflip::controllers::sound::SoundController;
use gravityflip::controllers::timed::{TimedGravityController, TimedSequenceState};
use gravityflip::controllers::{
    ActiveController, Controller, ControllerRegistry, PersistentController, active_config,
    persistent_controller,
};
use gravityflip::events::audio::AudioCmd;
use gravityflip::game::setup;
use gravityflip::resources::gravityconfig::GravityConfig;
use gravityflip::resources::mapdata::{EntityData, MapData, RoomData};
use gravityflip::resources::playergravity::player_gravity;
use gravityflip::resources::room::current_room;
use gravityflip::resources::session::SessionStore;
use gravityflip::systems::audio::drain_audio_cmds;
use gravityflip::systems::gravity::{attach_gravity, request_gravity};
use gravityflip::systems::room::{enter_room, load_map};
use gravityflip::systems::session::spawn_player;

// =============================================================================
// Helpers
// =============================================================================

fn make_world() -> World {
    let mut world = World::new();
    setup(&mut world, GravityConfig::new());
    world
}

fn sound(normal: &str, persistent: bool) -> EntityData {
    EntityData::new("gravitySoundController")
        .with_attr("normal_sound", normal)
        .with_attr("persistent", persistent)
}

fn count<T: Component>(world: &mut World) -> usize {
    world.query::<&T>().iter(world).count()
}

fn sound_map() -> MapData {
    MapData::default()
        .with_room(RoomData::new("room-a").with_entity(sound("a_sound", false)))
        .with_room(RoomData::new("room-b").with_entity(sound("b_sound", false)))
        .with_room(RoomData::new("room-p").with_entity(sound("p_sound", true)))
        .with_room(RoomData::new("room-c"))
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn room_child_overrides_persistent_instance() {
    let mut world = make_world();
    load_map(&mut world, sound_map());

    assert!(enter_room(&mut world, "room-a"));
    assert_eq!(active_config::<SoundController>(&world).normal_sound, "a_sound");

    assert!(enter_room(&mut world, "room-c"));
    assert_eq!(active_config::<SoundController>(&world).normal_sound, "p_sound");

    assert!(enter_room(&mut world, "room-b"));
    assert_eq!(active_config::<SoundController>(&world).normal_sound, "b_sound");

    // The room holding the persistent placement has no child of its own.
    assert!(enter_room(&mut world, "room-p"));
    assert_eq!(active_config::<SoundController>(&world).normal_sound, "p_sound");
}

#[test]
fn resolution_reports_which_instance_applies() {
    let mut world = make_world();
    load_map(&mut world, sound_map());
    let persistent = persistent_controller::<SoundController>(&world).unwrap();

    let registry = world.resource::<ControllerRegistry<SoundController>>();
    assert!(matches!(registry.resolve("room-a"), ActiveController::RoomChild(c) if c.normal_sound == "a_sound"));
    assert_eq!(registry.resolve("room-c"), ActiveController::Persistent(persistent));
}

#[test]
fn no_placement_resolves_defaults() {
    let mut world = make_world();
    load_map(
        &mut world,
        MapData::default().with_room(RoomData::new("empty")),
    );
    assert!(enter_room(&mut world, "empty"));

    assert_eq!(active_config::<SoundController>(&world), SoundController::default());
    assert_eq!(active_config::<BehaviorController>(&world), BehaviorController::default());
    assert_eq!(persistent_controller::<SoundController>(&world), None);
}

#[test]
fn room_child_applies_without_persistent_instance() {
    let mut world = make_world();
    load_map(
        &mut world,
        MapData::default()
            .with_room(RoomData::new("a").with_entity(
                EntityData::new("gravityBehaviorController").with_attr("holdable_reset_time", 5.0),
            ))
            .with_room(RoomData::new("b")),
    );

    enter_room(&mut world, "a");
    assert_eq!(active_config::<BehaviorController>(&world).holdable_reset_time, 5.0);
    enter_room(&mut world, "b");
    assert_eq!(active_config::<BehaviorController>(&world).holdable_reset_time, 2.0);
}

// =============================================================================
// Placement rules
// =============================================================================

#[test]
fn duplicate_persistent_keeps_the_last_one() {
    let mut world = make_world();
    load_map(
        &mut world,
        MapData::default()
            .with_room(RoomData::new("one").with_entity(sound("first", true)))
            .with_room(RoomData::new("two").with_entity(sound("second", true))),
    );

    assert_eq!(count::<Controller<SoundController>>(&mut world), 1);
    enter_room(&mut world, "one");
    assert_eq!(active_config::<SoundController>(&world).normal_sound, "second");
}

#[test]
fn duplicate_child_in_room_keeps_the_last_one() {
    let mut world = make_world();
    load_map(
        &mut world,
        MapData::default().with_room(
            RoomData::new("one")
                .with_entity(sound("first", false))
                .with_entity(sound("second", false)),
        ),
    );
    enter_room(&mut world, "one");
    assert_eq!(active_config::<SoundController>(&world).normal_sound, "second");
}

#[test]
fn persistent_instance_survives_room_changes() {
    let mut world = make_world();
    load_map(&mut world, sound_map());
    let persistent = persistent_controller::<SoundController>(&world).unwrap();

    for room in ["room-a", "room-b", "room-c", "room-a"] {
        enter_room(&mut world, room);
        assert_eq!(persistent_controller::<SoundController>(&world), Some(persistent));
    }
    // Controllers are never spawned as room entities.
    let mut scoped = world.query_filtered::<Entity, (With<RoomScoped>, With<PersistentController>)>();
    assert_eq!(scoped.iter(&world).count(), 0);
}

#[test]
fn loading_another_map_drops_old_controllers() {
    let mut world = make_world();
    load_map(&mut world, sound_map());
    let old = persistent_controller::<SoundController>(&world).unwrap();

    load_map(&mut world, MapData::default().with_room(RoomData::new("fresh")));
    assert!(world.get_entity(old).is_err());
    assert_eq!(persistent_controller::<SoundController>(&world), None);
    assert_eq!(current_room(&world), "");
}

#[test]
fn unknown_room_is_refused() {
    let mut world = make_world();
    load_map(&mut world, sound_map());
    enter_room(&mut world, "room-a");
    assert!(!enter_room(&mut world, "nowhere"));
    assert_eq!(current_room(&world), "room-a");
}

// =============================================================================
// Transition hooks
// =============================================================================

fn alt_mode(setting: &str, persistent: bool) -> EntityData {
    EntityData::new("gravityAltModeController")
        .with_attr("setting", setting)
        .with_attr("persistent", persistent)
}

#[test]
fn alt_mode_setting_follows_the_room() {
    let mut world = make_world();
    load_map(
        &mut world,
        MapData::default()
            .with_room(RoomData::new("hub").with_entity(alt_mode("Enabled", true)))
            .with_room(RoomData::new("calm").with_entity(alt_mode("Disabled", false)))
            .with_room(RoomData::new("keep").with_entity(alt_mode("Unchanged", false))),
    );

    enter_room(&mut world, "hub");
    assert!(world.resource::<SessionStore>().alt_mode_enabled());
    assert!(is_alt_mode_active(&world));

    enter_room(&mut world, "calm");
    assert!(!world.resource::<SessionStore>().alt_mode_enabled());
    assert!(!is_alt_mode_active(&world));

    enter_room(&mut world, "keep");
    assert!(!world.resource::<SessionStore>().alt_mode_enabled());

    enter_room(&mut world, "hub");
    enter_room(&mut world, "keep");
    assert!(world.resource::<SessionStore>().alt_mode_enabled());
}

#[test]
fn alt_mode_child_without_persistent_does_nothing() {
    let mut world = make_world();
    load_map(
        &mut world,
        MapData::default().with_room(RoomData::new("only").with_entity(alt_mode("Enabled", false))),
    );
    enter_room(&mut world, "only");

    assert!(!world.resource::<SessionStore>().alt_mode_enabled());
    assert!(!is_alt_mode_active(&world));
    assert!(persistent_controller::<AltModeController>(&world).is_none());
}

#[test]
fn timed_sequence_restarts_on_transition() {
    let mut world = make_world();
    load_map(
        &mut world,
        MapData::default()
            .with_room(RoomData::new("slow").with_entity(
                EntityData::new("gravityTimedController")
                    .with_attr("persistent", true)
                    .with_attr("sequence", "Inverted:4.0"),
            ))
            .with_room(RoomData::new("fast").with_entity(
                EntityData::new("gravityTimedController").with_attr("sequence", "Toggle:0.5,Normal:1"),
            )),
    );
    let persistent = persistent_controller::<TimedGravityController>(&world).unwrap();

    enter_room(&mut world, "slow");
    let state = *world.get::<TimedSequenceState>(persistent).unwrap();
    assert_eq!((state.index, state.remaining, state.finished), (0, 4.0, false));

    world.get_mut::<TimedSequenceState>(persistent).unwrap().index = 3;
    enter_room(&mut world, "fast");
    let state = *world.get::<TimedSequenceState>(persistent).unwrap();
    assert_eq!((state.index, state.remaining), (0, 0.5));
}

#[test]
fn player_flip_plays_room_sound() {
    let mut world = make_world();
    load_map(&mut world, sound_map());
    enter_room(&mut world, "room-a");
    let player = spawn_player(&mut world, Vec2::new(16.0, 64.0));
    drain_audio_cmds(&mut world);

    request_gravity(&mut world, player, GravityType::Normal);
    assert!(drain_audio_cmds(&mut world).is_empty());

    request_gravity(&mut world, player, GravityType::Inverted);
    request_gravity(&mut world, player, GravityType::Normal);
    assert_eq!(
        drain_audio_cmds(&mut world),
        vec![AudioCmd::play_fx("gravity_inverted"), AudioCmd::play_fx("a_sound")]
    );
}

#[test]
fn player_keeps_its_slot_across_map_reload() {
    let mut world = make_world();
    load_map(&mut world, sound_map());
    enter_room(&mut world, "room-p");
    let player = spawn_player(&mut world, Vec2::new(16.0, 64.0));

    load_map(&mut world, sound_map());
    assert_eq!(player_gravity(&world), Some(player));

    enter_room(&mut world, "room-p");
    drain_audio_cmds(&mut world);
    request_gravity(&mut world, player, GravityType::Inverted);
    assert_eq!(
        drain_audio_cmds(&mut world),
        vec![AudioCmd::play_fx("gravity_inverted")]
    );
}

#[test]
fn visual_settings_follow_the_room() {
    let mut world = make_world();
    load_map(
        &mut world,
        MapData::default()
            .with_room(RoomData::new("plain"))
            .with_room(RoomData::new("upright").with_entity(
                EntityData::new("gravityVisualController").with_attr("flip_sprite", false),
            )),
    );
    enter_room(&mut world, "plain");
    let lamp = world
        .spawn((Scale::default(), LightOffset::new(0.0, -6.0)))
        .id();
    attach_gravity(&mut world, lamp, GravityComponent::new(), GravityType::Inverted);
    assert_eq!(world.get::<Scale>(lamp).unwrap().scale.y, -1.0);
    assert_eq!(world.get::<LightOffset>(lamp).unwrap().offset.y, 6.0);

    // Entering the room re-applies visuals without a flip.
    enter_room(&mut world, "upright");
    assert_eq!(world.get::<Scale>(lamp).unwrap().scale.y, 1.0);
    assert_eq!(world.get::<LightOffset>(lamp).unwrap().offset.y, 6.0);

    request_gravity(&mut world, lamp, GravityType::Normal);
    request_gravity(&mut world, lamp, GravityType::Inverted);
    assert_eq!(world.get::<Scale>(lamp).unwrap().scale.y, 1.0);

    enter_room(&mut world, "plain");
    assert_eq!(world.get::<Scale>(lamp).unwrap().scale.y, -1.0);
    request_gravity(&mut world, lamp, GravityType::Normal);
    assert_eq!(world.get::<Scale>(lamp).unwrap().scale.y, 1.0);
    assert_eq!(world.get::<LightOffset>(lamp).unwrap().offset.y, -6.0);
}

#[test]
fn json_placement_is_recognized_by_name() {
    let map = MapData::from_json(
        r#"{
          "rooms": [
            {
              "name": "a-00",
              "entities": [
                { "name": "gravityBehaviorController",
                  "attributes": { "persistent": true, "holdable_reset_time": 3.0 } }
              ]
            }
          ]
        }"#,
    )
    .unwrap();
    let mut world = make_world();
    load_map(&mut world, map);
    enter_room(&mut world, "a-00");

    assert!(persistent_controller::<BehaviorController>(&world).is_some());
    assert_eq!(active_config::<BehaviorController>(&world).holdable_reset_time, 3.0);
}
