//! Measures how evenly the polynomial string hash spreads keys over a fixed number of slots.
//!
//! For increasing load factors the table is filled with sequential (`key0`, `key1`, ...)
//! and random lowercase keys, and the mean and longest chain lengths are logged and plotted
//! to `chain_lengths.png`. Set `RUST_LOG=debug` for per-run detail.

#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::error::Error;

use chained_table::{ChainStats, ChainedHashTable, ConfigError, TableConfig};
use env_logger::Builder;
use log::{LevelFilter, debug, info};
use plotters::{coord::Shift, prelude::*};
use rand::Rng;

const TABLE_SIZE: usize = 10_000;
// Create load factors from 0.1 to 0.95 with 10 steps
const NUM_LOAD_FACTORS: usize = 10;
const KEY_LEN: usize = 12;
// keeps the slot count fixed for every load factor measured
const NO_GROWTH: f64 = 1_000.0;
const OUTPUT: &str = "chain_lengths.png";

const FONT_FAMILY: &str = "sans-serif";
const TITLE_SIZE: i32 = 30;
const TEXT_SIZE: i32 = 16;
const LINE_WIDTH: u32 = 2;
const MARKER_SIZE: i32 = 4;
const COLORS: [RGBColor; 2] = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];

/// Chain statistics of one key workload across all load factors
struct Series {
    name: &'static str,
    mean_chain: Vec<f64>,
    longest_chain: Vec<f64>,
}

fn init_logger() {
    let mut builder = Builder::new();

    builder.filter_level(LevelFilter::Info).format_timestamp_millis().parse_default_env();

    // Avoid panicking if the logger was already initialized elsewhere.
    let _ = builder.try_init();
}

fn sequential_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key{i}")).collect()
}

fn random_keys(rng: &mut impl Rng, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| (0..KEY_LEN).map(|_| char::from(rng.random_range(b'a'..=b'z'))).collect())
        .collect()
}

/// Fills a `TABLE_SIZE`-slot table with `keys` and reports its chain lengths
fn measure(keys: &[String]) -> Result<ChainStats, ConfigError> {
    let config = TableConfig::default()
        .with_initial_capacity(TABLE_SIZE)
        .with_load_factor_threshold(NO_GROWTH);
    let mut table = ChainedHashTable::with_config(config)?;
    table.extend(keys.iter().map(|key| (key.as_str(), ())));

    debug!(
        "{} keys over {} slots, load factor {:.2}",
        table.len(),
        table.capacity(),
        table.load_factor()
    );
    Ok(table.chain_stats())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    caption: &str,
    y_desc: &str,
    load_factors: &[f64],
    series: &[(&str, &[f64])],
) -> Result<(), Box<dyn Error>> {
    let max_y = series
        .iter()
        .flat_map(|(_, ys)| ys.iter())
        .fold(1.0, |max: f64, &y| max.max(y)) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (FONT_FAMILY, TITLE_SIZE))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0.0..1.0, 0.0..max_y)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor")
        .y_desc(y_desc)
        .axis_desc_style((FONT_FAMILY, TEXT_SIZE))
        .draw()?;

    for (&(name, ys), color) in series.iter().zip(COLORS.iter()) {
        let line_style = ShapeStyle::from(color).stroke_width(LINE_WIDTH);
        let points: Vec<(f64, f64)> =
            load_factors.iter().copied().zip(ys.iter().copied()).collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), line_style))?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            points.iter().map(|&point| Circle::new(point, MARKER_SIZE, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logger();

    let load_factors: Vec<f64> = (0..NUM_LOAD_FACTORS)
        .map(|i| 0.1 + (0.95 - 0.1) * (i as f64) / ((NUM_LOAD_FACTORS - 1) as f64))
        .collect();
    let num_keys: Vec<usize> =
        load_factors.iter().map(|&load| (TABLE_SIZE as f64 * load) as usize).collect();
    let max_keys = num_keys.iter().copied().max().unwrap_or(0);

    info!("Load factors: {load_factors:?}");
    info!("Number of keys: {num_keys:?}");

    // Generate keys once so every load factor measures a prefix of the same workload
    let mut rng = rand::rng();
    let workloads = [
        ("Sequential keys", sequential_keys(max_keys)),
        ("Random keys", random_keys(&mut rng, max_keys)),
    ];

    let mut results = Vec::with_capacity(workloads.len());
    for &(name, ref keys) in &workloads {
        let keys = keys.as_slice();
        let mut series = Series { name, mean_chain: Vec::new(), longest_chain: Vec::new() };

        for &n_keys in &num_keys {
            let stats = measure(keys.get(..n_keys).unwrap_or(keys))?;
            info!(
                "{name}, {n_keys} keys: mean chain = {:.2}, longest = {}, buckets = {}",
                stats.mean_chain_len, stats.longest_chain, stats.occupied_buckets
            );
            series.mean_chain.push(stats.mean_chain_len);
            series.longest_chain.push(stats.longest_chain as f64);
        }

        results.push(series);
    }

    let root = BitMapBackend::new(OUTPUT, (1200, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically(450);

    let means: Vec<(&str, &[f64])> =
        results.iter().map(|s| (s.name, s.mean_chain.as_slice())).collect();
    draw_panel(&upper, "Mean Chain Length", "Entries per occupied bucket", &load_factors, &means)?;

    let longest: Vec<(&str, &[f64])> =
        results.iter().map(|s| (s.name, s.longest_chain.as_slice())).collect();
    draw_panel(&lower, "Longest Chain", "Entries in longest bucket", &load_factors, &longest)?;

    root.present()?;
    info!("Generated plot image: {OUTPUT}");

    Ok(())
}
