//! Headless gravity simulation.
//!
//! Loads a JSON map, enters a room, spawns the player and runs the gravity
//! schedule for a number of fixed frames, pressing jump periodically and
//! feeding beats to the cassette sequencer. Useful for checking map
//! placements without the game.
use std::path::PathBuf;

use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec2;
use log::{error, info, warn};

use gravityflip::components::actor::GroundContact;
use gravityflip::controllers::altmode::set_alt_mode;
use gravityflip::events::beat::BeatMessage;
use gravityflip::game::{build_update_schedule, setup};
use gravityflip::resources::gravityconfig::GravityConfig;
use gravityflip::resources::input::InputState;
use gravityflip::resources::mapdata::MapData;
use gravityflip::systems::audio::drain_audio_cmds;
use gravityflip::systems::gravity::current_gravity;
use gravityflip::systems::room::{enter_room, load_map};
use gravityflip::systems::session::{save_session, spawn_player};
use gravityflip::systems::time::update_world_time;

const FRAME_TIME: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(version, about = "Headless gravity flip simulation", long_about = None)]
struct Cli {
    /// Map file to load.
    #[arg(long, value_name = "PATH", default_value = "demos/map.json")]
    map: PathBuf,

    /// Gravity configuration file.
    #[arg(long, value_name = "PATH", default_value = "./gravity.ini")]
    config: PathBuf,

    /// Room to start in. Defaults to the first room of the map.
    #[arg(long)]
    room: Option<String>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Frames between simulated jump presses. Zero disables jumping.
    #[arg(long, default_value_t = 30)]
    jump_every: u32,

    /// Frames between beats. Zero disables beats.
    #[arg(long, default_value_t = 60)]
    beat_every: u32,

    /// Enable the alternate mode in the session before starting.
    #[arg(long)]
    alt_mode: bool,

    /// Write the final session to this file.
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GravityConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }

    let map = match MapData::load(&cli.map) {
        Ok(map) => map,
        Err(e) => {
            error!("Failed to load map {:?}: {}", cli.map, e);
            std::process::exit(1);
        }
    };
    let Some(start_room) = cli
        .room
        .clone()
        .or_else(|| map.rooms.first().map(|room| room.name.clone()))
    else {
        error!("Map {:?} has no rooms", cli.map);
        std::process::exit(1);
    };

    let mut world = World::new();
    setup(&mut world, config);
    load_map(&mut world, map);
    if cli.alt_mode {
        set_alt_mode(&mut world, true);
    }
    if !enter_room(&mut world, &start_room) {
        std::process::exit(1);
    }

    let player = spawn_player(&mut world, Vec2::new(16.0, 160.0));
    let mut schedule = build_update_schedule();

    let mut beat = 0usize;
    let mut flips = 0u32;
    let mut last = current_gravity(&world, player);

    for frame in 1..=cli.frames {
        update_world_time(&mut world, FRAME_TIME);

        let jump = cli.jump_every > 0 && frame % cli.jump_every == 0;
        world.resource_mut::<InputState>().update(jump);
        // The player lands every other jump interval.
        let grounded = cli.jump_every == 0 || (frame / cli.jump_every.max(1)) % 2 == 0;
        if let Some(mut contact) = world.get_mut::<GroundContact>(player) {
            *contact = if grounded {
                GroundContact::solid()
            } else {
                GroundContact::airborne()
            };
        }

        if cli.beat_every > 0 {
            let mut beats = world.resource_mut::<Messages<BeatMessage>>();
            // Precursor of beat n previews beat n + 1.
            if beat > 0 && frame % cli.beat_every == cli.beat_every / 2 {
                beats.write(BeatMessage::Precursor {
                    index: beat - 1,
                    tempo: 1.0,
                });
            }
            if frame % cli.beat_every == 0 {
                beats.write(BeatMessage::Activate { index: beat });
                beat += 1;
            }
        }

        schedule.run(&mut world);

        for cmd in drain_audio_cmds(&mut world) {
            info!("frame {}: audio {:?}", frame, cmd);
        }
        let now = current_gravity(&world, player);
        if now != last {
            flips += 1;
            info!("frame {}: player gravity {:?}", frame, now);
            last = now;
        }
    }

    info!(
        "Simulated {} frames in room '{}': {} flips, final gravity {:?}",
        cli.frames, start_room, flips, last
    );

    if let Some(path) = cli.save {
        if let Err(e) = save_session(&world, &path) {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
