//! Ledge Runner entry point
//!
//! The browser build is driven from `ledge_runner::web`. Natively this runs a
//! short scripted run headless and logs what happened, which is handy for
//! checking a tuning file or a seed without a browser.
//!
//! Usage: `ledge-runner [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ledge_runner::consts::MAX_FRAME_DT;
    use ledge_runner::sim::{GameEvent, LayoutPolicy, Simulation, Viewport};
    use ledge_runner::{TickInput, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Ledge Runner (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed_arg = args.next();
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Failed to read {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };
    // Seed argument wins over the tuning file
    let seed = match seed_arg.map(|s| s.parse::<u32>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Bad seed ({}); using {}", e, tuning.layout.seed);
            tuning.layout.seed
        }
        None => tuning.layout.seed,
    };

    let reach = tuning.reach();
    log::info!(
        "Reach: jump height {:.1}, hang time {:.2}s, max gap {:.1}",
        reach.single_jump_height,
        reach.hang_time,
        reach.max_gap
    );

    let policy = LayoutPolicy::Procedural { seed };
    let mut sim = Simulation::new(tuning, Viewport::new(1280.0, 720.0), &policy);
    sim.start();

    // Hold right, double jump every 45 frames
    let dt = MAX_FRAME_DT / 2.0;
    for frame in 0..1800u32 {
        let input = TickInput {
            right: true,
            jump: frame % 45 == 0 || frame % 45 == 12,
            ..Default::default()
        };
        sim.advance(&input, dt);
        for event in sim.drain_events() {
            match event {
                GameEvent::CoinCollected { index } => {
                    log::info!("frame {}: coin {} collected", frame, index)
                }
                GameEvent::LifeLost { lives_left } => {
                    log::info!("frame {}: life lost, {} left", frame, lives_left)
                }
                GameEvent::GameOver => log::info!("frame {}: game over", frame),
                other => log::debug!("frame {}: {:?}", frame, other),
            }
        }
        if sim.is_game_over() {
            break;
        }
    }

    println!(
        "seed {}: x = {:.1} / {:.1}, coins {}/{}, lives {}",
        seed,
        sim.hero.pos.x,
        sim.world.width,
        sim.progress.coins_collected,
        sim.coins.len(),
        sim.progress.lives
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_main, this is just to satisfy the compiler
}
