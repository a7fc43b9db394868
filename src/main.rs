//! Kasane - Entry Point
//!
//! Interactive driver for the scene. Stands in for the camera: cards are
//! placed, moved, hidden and removed by hand, and each tick feeds the
//! resulting snapshot to the scene and prints what happened.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kasane::cards::{CardSample, ColorStateSource, EntitySnapshot};
use kasane::color::Color;
use kasane::core::error::Result;
use kasane::core::{EntityId, KasaneConfig, Seconds, Vec3};
use kasane::simulation::{Scene, SceneEvent};
use kasane::tracker::MixEvent;

/// Kasane - mix colors by bringing cards together
#[derive(Parser, Debug)]
#[command(name = "kasane")]
struct Args {
    /// TOML config file (defaults are used for anything it leaves out)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print events as JSON lines instead of text
    #[arg(long)]
    json: bool,

    /// Default tick length in seconds
    #[arg(long, default_value_t = 0.1)]
    dt: Seconds,

    /// Also print per-tick effect position updates
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug)]
enum Command {
    Place(EntityId, Vec3),
    Show(EntityId),
    Hide(EntityId),
    Remove(EntityId),
    Paint(EntityId, Color),
    Pot(Color, Vec3),
    Tick(Option<Seconds>),
    Run(u32, Option<Seconds>),
    Status,
    Clear,
    Reset,
    Quit,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kasane=info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => KasaneConfig::load(path)?,
        None => KasaneConfig::default(),
    };
    tracing::info!(
        "Kasane starting ({:?} policy, overlap {:.3}, dwell {:.2}s)",
        config.mixing.policy,
        config.tracker.overlap_distance,
        config.tracker.dwell_duration
    );

    let mut scene = Scene::new(config)?;
    let mut detections = EntitySnapshot::new();
    let mut now: Seconds = 0.0;

    print_help();

    loop {
        print!("[{:.2}s] > ", now);
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let command = match parse_command(input) {
            Ok(command) => command,
            Err(usage) => {
                println!("{}", usage);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Place(id, position) => {
                detections.insert(id, CardSample::tracked(position));
            }
            Command::Show(id) | Command::Hide(id) => {
                let tracked = matches!(command, Command::Show(_));
                match detections.get_mut(id) {
                    Some(sample) => sample.tracked = tracked,
                    None => println!("No card {}", id),
                }
            }
            Command::Remove(id) => {
                if detections.remove(id).is_none() {
                    println!("No card {}", id);
                }
            }
            Command::Paint(id, color) => {
                if !scene.cards().contains(id) {
                    println!("Card {} is not in the scene yet, run a tick first", id);
                } else if !scene.cards_mut().apply_color(id, color, now) {
                    println!("Card {} is already {}", id, color);
                }
            }
            Command::Pot(color, position) => {
                let index = scene.add_pot(color, position);
                println!("Pot {} ({}) placed", index, color);
            }
            Command::Tick(dt) => {
                now += dt.unwrap_or(args.dt);
                let events = scene.step(now, &detections);
                print_events(&events, &args)?;
            }
            Command::Run(n, dt) => {
                for _ in 0..n {
                    now += dt.unwrap_or(args.dt);
                    let events = scene.step(now, &detections);
                    print_events(&events, &args)?;
                }
            }
            Command::Status => display_status(&scene, &detections),
            Command::Clear => {
                let (_, event) = scene.clear_spawned();
                print_events(&[event], &args)?;
            }
            Command::Reset => {
                let events = scene.reset_sessions();
                print_events(&events, &args)?;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn print_help() {
    println!("\n=== KASANE ===");
    println!("Bring colored cards together to mix them");
    println!();
    println!("Commands:");
    println!("  place <id> <x> <y> <z>  - Place or move a card (tracked)");
    println!("  show <id> / hide <id>   - Toggle tracking of a card");
    println!("  remove <id>             - Take a card off the table");
    println!("  color <id> <color>      - Paint a card directly");
    println!("  pot <color> <x> <y> <z> - Place a color pot");
    println!("  tick [dt] / t           - Advance one tick");
    println!("  run <n> [dt]            - Advance n ticks");
    println!("  status / s              - Show cards, sessions and objects");
    println!("  clear                   - Remove all spawned objects");
    println!("  reset                   - End all mix sessions");
    println!("  quit / q                - Exit");
    println!();
}

fn parse_command(input: &str) -> std::result::Result<Command, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let (name, rest) = parts
        .split_first()
        .ok_or_else(|| "Empty command".to_string())?;

    match (*name, rest) {
        ("quit" | "q", []) => Ok(Command::Quit),
        ("status" | "s", []) => Ok(Command::Status),
        ("clear", []) => Ok(Command::Clear),
        ("reset", []) => Ok(Command::Reset),
        ("tick" | "t", []) => Ok(Command::Tick(None)),
        ("tick" | "t", [dt]) => Ok(Command::Tick(Some(parse_seconds(dt)?))),
        ("run", [n]) => Ok(Command::Run(parse_count(n)?, None)),
        ("run", [n, dt]) => Ok(Command::Run(parse_count(n)?, Some(parse_seconds(dt)?))),
        ("place", [id, x, y, z]) => Ok(Command::Place(parse_id(id)?, parse_vec3(x, y, z)?)),
        ("show", [id]) => Ok(Command::Show(parse_id(id)?)),
        ("hide", [id]) => Ok(Command::Hide(parse_id(id)?)),
        ("remove", [id]) => Ok(Command::Remove(parse_id(id)?)),
        ("color", [id, color]) => Ok(Command::Paint(parse_id(id)?, parse_color(color)?)),
        ("pot", [color, x, y, z]) => Ok(Command::Pot(parse_color(color)?, parse_vec3(x, y, z)?)),
        _ => Err(format!("Unknown command: {} (see the list above)", input)),
    }
}

fn parse_id(text: &str) -> std::result::Result<EntityId, String> {
    text.trim_start_matches('#')
        .parse::<u64>()
        .map(EntityId)
        .map_err(|_| format!("Invalid card id: {}", text))
}

fn parse_count(text: &str) -> std::result::Result<u32, String> {
    text.parse::<u32>()
        .map_err(|_| format!("Invalid tick count: {}", text))
}

fn parse_seconds(text: &str) -> std::result::Result<Seconds, String> {
    match text.parse::<Seconds>() {
        Ok(dt) if dt >= 0.0 && dt.is_finite() => Ok(dt),
        _ => Err(format!("Invalid duration: {}", text)),
    }
}

fn parse_vec3(x: &str, y: &str, z: &str) -> std::result::Result<Vec3, String> {
    let coord = |s: &str| {
        s.parse::<f32>()
            .map_err(|_| format!("Invalid coordinate: {}", s))
    };
    Ok(Vec3::new(coord(x)?, coord(y)?, coord(z)?))
}

fn parse_color(text: &str) -> std::result::Result<Color, String> {
    Color::parse(text).map_err(|e| e.to_string())
}

fn print_events(events: &[SceneEvent], args: &Args) -> Result<()> {
    for event in events {
        if !args.verbose && matches!(event, SceneEvent::Mix(MixEvent::SessionMoved { .. })) {
            continue;
        }
        if args.json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("  {}", describe(event));
        }
    }
    Ok(())
}

fn describe(event: &SceneEvent) -> String {
    match event {
        SceneEvent::FirstCardDetected { card } => format!("First card detected: {}", card),
        SceneEvent::CardAdded { card } => format!("Card {} entered the table", card),
        SceneEvent::CardRemoved { card } => format!("Card {} left the table", card),
        SceneEvent::CardRecolored(recolor) => format!(
            "Card {} dipped in pot {}: {} -> {}",
            recolor.card, recolor.pot, recolor.from, recolor.to
        ),
        SceneEvent::Mix(MixEvent::SessionStarted { pair, color, .. }) => {
            format!("Mixing {} -> {}", pair, color)
        }
        SceneEvent::Mix(MixEvent::SessionMoved { pair, position }) => {
            format!("Effect {} at {:.3?}", pair, position)
        }
        SceneEvent::Mix(MixEvent::DwellCompleted(spawn)) => format!(
            "Mix {} finished: {} ({})",
            spawn.pair,
            spawn.color,
            spawn.category.map_or("no matching object", |c| c.name())
        ),
        SceneEvent::Mix(MixEvent::SessionEnded {
            pair,
            reason,
            spawned,
        }) => format!(
            "Mix {} ended: {:?}{}",
            pair,
            reason,
            if *spawned { "" } else { " before finishing" }
        ),
        SceneEvent::ObjectSpawned {
            id,
            category,
            position,
        } => format!("Spawned {} {} at {:.3?}", category, id, position),
        SceneEvent::ObjectsCleared { count } => format!("Cleared {} objects", count),
    }
}

fn display_status(scene: &Scene, detections: &EntitySnapshot) {
    println!();
    println!("Time: {:.2}s", scene.now());
    println!("Cards ({}):", detections.len());
    for (id, sample) in detections.iter() {
        let partners: Vec<String> = scene
            .tracker()
            .sessions()
            .filter_map(|(pair, _)| pair.other(id))
            .map(|partner| partner.to_string())
            .collect();
        println!(
            "  {} at {:.3?} {} - {}{}",
            id,
            sample.position,
            if sample.tracked { "tracked" } else { "hidden" },
            scene.cards().color_state(id),
            if partners.is_empty() {
                String::new()
            } else {
                format!(", mixing with {}", partners.join(", "))
            }
        );
    }
    println!("Pots ({}):", scene.pots().len());
    for (i, pot) in scene.pots().iter().enumerate() {
        println!("  {} {} at {:.3?}", i, pot.color, pot.position);
    }
    println!("Sessions ({}):", scene.tracker().session_count());
    for (pair, session) in scene.tracker().sessions() {
        println!(
            "  {} -> {} for {:.2}s{}",
            pair,
            session.mixed_color(),
            session.age(scene.now()),
            if session.spawned() { " (spawned)" } else { "" }
        );
    }
    println!("Objects ({}):", scene.spawned().len());
    for object in scene.spawned().iter() {
        println!(
            "  {} {} at {:.3?} scale {:.3}",
            object.id,
            object.category,
            object.position,
            object.scale_at(scene.now())
        );
    }
    println!();
}
