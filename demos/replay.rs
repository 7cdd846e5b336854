use linecount::counter::builder::CounterBuilder;
use linecount::counter::options::{CounterOptions, DeadZonePolicy};
use linecount::line::{LineGeometry, DEFAULT_LINE_MARGIN, DEFAULT_LINE_X_RATIOS, DEFAULT_LINE_Y_RATIO};
use linecount::test_stuff::TrackGen;
use linecount::track::notify::ChannelNotifier;
use std::thread;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let (width, height) = (1280, 720);
    let line = LineGeometry::from_ratios(
        width,
        height,
        DEFAULT_LINE_Y_RATIO,
        DEFAULT_LINE_X_RATIOS.0,
        DEFAULT_LINE_X_RATIOS.1,
        Some(DEFAULT_LINE_MARGIN),
    )?;

    let (notifier, events) = ChannelNotifier::unbounded();
    let counter = CounterBuilder::new(line)
        .options(CounterOptions::default().dead_zone(DeadZonePolicy::Hold))
        .notifier(notifier)
        .build();

    let sink = thread::spawn(move || {
        for e in events {
            eprintln!(
                "[{}] track {} {} crossed {} (conf {:.2})",
                e.tick, e.track_id, e.class_label, e.direction, e.confidence
            );
        }
    });

    let labels = ["car", "bus", "truck", "motorcycle", "van"];
    let mut tracks = (0..10_u64)
        .map(|i| {
            let down = i % 3 != 0;
            let (y, step) = if down { (150.0, 6.0) } else { (650.0, -6.0) };
            TrackGen::new(
                i + 1,
                labels[i as usize % labels.len()],
                0.5 + 0.04 * i as f32,
                100.0 + 100.0 * i as f32,
                y,
                step,
                3.0,
            )
        })
        .collect::<Vec<_>>();

    for _ in 0..120 {
        let frame = tracks.iter_mut().flat_map(|t| t.next()).collect::<Vec<_>>();
        counter.process_frame(&frame);
    }
    for _ in 0..40 {
        counter.process_frame(&[]);
    }

    let snapshot = counter.snapshot();
    drop(counter);
    sink.join().expect("Event sink must finish");

    eprintln!(
        "Total: {}, frames: {}, tracks kept: {}, lost: {}",
        snapshot.total, snapshot.tick, snapshot.active_tracks, snapshot.lost_crossings
    );
    let mut by_class = snapshot
        .by_class
        .iter()
        .filter(|(_, count)| **count > 0)
        .collect::<Vec<_>>();
    by_class.sort();
    for (label, count) in by_class {
        eprintln!("  {}: {}", label, count);
    }
    Ok(())
}
