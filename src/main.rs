//! Automata CLI - Run Conway's Game of Life from JSON configuration.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use automata::{
    Automaton, EngineConfig, PixelSurface, Rgb, Seed,
    rules::conway,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [generations] [frames-dir]", args[0]);
        eprintln!();
        eprintln!("Run a Game of Life simulation from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to engine configuration file");
        eprintln!("  generations  Number of generations to run (default: 100)");
        eprintln!("  frames-dir   Directory to write one PPM frame per generation");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let generations: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let frames_dir = args.get(3).map(PathBuf::from);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: EngineConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    // Load or create seed
    let seed_path = config_path.with_extension("seed.json");
    let seed: Seed = if seed_path.exists() {
        let seed_str = fs::read_to_string(&seed_path).unwrap_or_else(|e| {
            eprintln!("Error reading seed file: {}", e);
            std::process::exit(1);
        });
        serde_json::from_str(&seed_str).unwrap_or_else(|e| {
            eprintln!("Error parsing seed: {}", e);
            std::process::exit(1);
        })
    } else {
        Seed::default()
    };

    if let Some(dir) = &frames_dir {
        fs::create_dir_all(dir).unwrap_or_else(|e| {
            eprintln!("Error creating frames directory: {}", e);
            std::process::exit(1);
        });
    }

    println!("Automata Simulation");
    println!("===================");
    println!("Grid: {}x{}", config.width, config.height);
    println!("Generations: {}", generations);
    println!();

    let surface = frames_dir
        .as_ref()
        .map(|_| Rc::new(RefCell::new(PixelSurface::new(0, 0))));

    let mut builder = Automaton::builder(config, conway)
        .initializer(seed.initializer())
        .color_map(|alive: bool, _, _| alive.then_some(Rgb::BLACK));
    if let Some(surface) = &surface {
        builder = builder.surface(Rc::clone(surface));
    }

    let mut automaton = builder.build().unwrap_or_else(|e| {
        eprintln!("Error building automaton: {}", e);
        std::process::exit(1);
    });

    println!("Initial population: {}", automaton.grid().population());
    println!();
    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..generations {
        automaton.tick();

        if let (Some(surface), Some(dir)) = (&surface, &frames_dir) {
            let path = dir.join(format!("gen_{:05}.ppm", automaton.generations()));
            surface.borrow().save_ppm(&path).unwrap_or_else(|e| {
                eprintln!("Error writing frame {}: {}", path.display(), e);
                std::process::exit(1);
            });
        }

        // Print progress every 10%
        if (i + 1) % (generations / 10).max(1) == 0 {
            let elapsed = start.elapsed().as_secs_f32();
            let per_sec = (i + 1) as f32 / elapsed;
            println!(
                "  Generation {}/{}: population={}, {:.1} gen/s",
                automaton.generations(),
                generations,
                automaton.grid().population(),
                per_sec
            );
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("Final population: {}", automaton.grid().population());
    println!(
        "Time: {:.2}s ({:.1} gen/s)",
        elapsed.as_secs_f32(),
        generations as f32 / elapsed.as_secs_f32()
    );
}

fn print_example_config() {
    let config = EngineConfig::default();
    let seed = Seed::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
    println!();
    println!("Example seed (config.seed.json):");
    println!("{}", serde_json::to_string_pretty(&seed).unwrap());
}
