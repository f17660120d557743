//! histimage demo host
//!
//! Drives a Pixmap node with points from a Peter de Jong attractor while a
//! second thread keeps refreshing snapshots, then prints an ASCII preview.

use histimage::constants::pixmap::{COLOR_PAD, HEIGHT_PAD, POINT_PAD, WIDTH_PAD};
use histimage::{builtin_registry, Config, ImagerNode, NodeGraph, PadValue, Snapshot};
use log::{error, info, warn};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const WIDTH: i64 = 72;
const HEIGHT: i64 = 36;
const DEFAULT_SAMPLES: u64 = 500_000;
const RAMP: &[u8] = b" .:-=+*#%@";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> histimage::Result<()> {
    let config = Config::load_or_default()?;
    let samples = match std::env::args().nth(1) {
        Some(arg) => arg.parse().map_err(|_| {
            histimage::NodeError::Config(format!("sample count must be a number, got {}", arg))
        })?,
        None => DEFAULT_SAMPLES,
    };

    let registry = builtin_registry();
    if let Some(meta) = registry.get_node_metadata("Pixmap") {
        info!(
            "{} [{}] {} (icon {})",
            meta.display_name,
            meta.category.display_string(),
            meta.description,
            meta.icon
        );
    }

    let node = ImagerNode::new(config.imager.clone())?;
    let display = node.display_handle();
    let mut graph = NodeGraph::new();
    let id = graph.add_node("Pixmap", Box::new(node));

    let hosted = graph.node_mut(id)?;
    hosted.connect(WIDTH_PAD, PadValue::Integer(WIDTH))?;
    hosted.connect(HEIGHT_PAD, PadValue::Integer(HEIGHT))?;
    hosted.connect(POINT_PAD, PadValue::point(0, 0))?;
    hosted.connect(COLOR_PAD, PadValue::Color(vec![1.0; config.imager.channels]))?;

    let mut rng = rand::rng();
    let [a, b, c, d]: [f64; 4] = std::array::from_fn(|_| rng.random_range(-3.0..3.0));
    info!("de Jong parameters a={:.3} b={:.3} c={:.3} d={:.3}", a, b, c, d);

    let running = Arc::new(AtomicBool::new(true));
    let viewer = {
        let running = Arc::clone(&running);
        let display = Arc::clone(&display);
        std::thread::spawn(move || {
            let mut refreshes = 0u64;
            while running.load(Ordering::Relaxed) {
                let _ = display.snapshot();
                refreshes += 1;
                std::thread::sleep(Duration::from_millis(20));
            }
            refreshes
        })
    };

    let (mut x, mut y) = (0.0f64, 0.0f64);
    for _ in 0..samples {
        let nx = (a * y).sin() - (b * x).cos();
        let ny = (c * x).sin() - (d * y).cos();
        x = nx;
        y = ny;

        let px = ((x + 2.0) / 4.0 * WIDTH as f64) as i64;
        let py = ((y + 2.0) / 4.0 * HEIGHT as f64) as i64;
        hosted.value_mut(POINT_PAD)?.set_point(px, py);
        hosted.tick()?;
    }

    running.store(false, Ordering::Relaxed);
    let refreshes = viewer.join().unwrap_or_else(|_| {
        warn!("Display thread panicked");
        0
    });

    if let Some(snapshot) = hosted.snapshot() {
        print_preview(&snapshot);
    }
    let stats = display.stats();
    info!(
        "{} samples applied, {} dropped, {} display refreshes",
        stats.applied, stats.dropped, refreshes
    );
    Ok(())
}

fn print_preview(snapshot: &Snapshot) {
    let lit = snapshot.channels().min(3);
    for y in 0..snapshot.height() {
        let row: String = (0..snapshot.width())
            .map(|x| {
                let cell = snapshot.cell(x, y).unwrap_or(&[]);
                let level = cell.iter().take(lit).sum::<f32>() / lit.max(1) as f32;
                let index = (level * (RAMP.len() - 1) as f32).round() as usize;
                RAMP[index.min(RAMP.len() - 1)] as char
            })
            .collect();
        println!("{}", row);
    }
}
