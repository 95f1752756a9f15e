//! Build-mode walkthrough: enters a session, drags and commits one
//! segment, then exits, with the crate's tracing output on stderr.
//!
//! ```text
//! cargo run --example walkthrough
//! ```
//!
//! Override the log filter with `RUST_LOG` (e.g. `RUST_LOG=gridspan=debug`).

use std::f64::consts::FRAC_PI_2;

use tracing::info;

use gridspan::constructor::{PointerButton, PointerEvent};
use gridspan::graph::ConnectivityGraph;
use gridspan::grid::GridConfig;
use gridspan::math::{CameraLens, Point2, Point3, Pose, Vector3};
use gridspan::session::{BuildLocation, BuildSession, CameraRig, Collaborators, PlayerRig};

fn main() -> gridspan::Result<()> {
    // Default: WARN for everything, DEBUG for gridspan.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("walkthrough=info".parse().unwrap_or_default())
        .add_directive("gridspan=debug".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut collaborators = Collaborators::new();
    collaborators.player = Some(PlayerRig::new(Pose::identity()));
    let lens = CameraLens::new(FRAC_PI_2, 800.0, 800.0)?;
    let overhead = Pose::looking_at(
        Point3::new(0.0, 10.0, 0.0),
        Point3::origin(),
        &Vector3::z(),
    )?;
    collaborators.camera = Some(CameraRig::new(overhead, lens));
    collaborators.ui.register("joystick", true);
    collaborators.ui.register("dialogue", true);

    let mut graph = ConnectivityGraph::new();
    let mut session = BuildSession::new(GridConfig::default(), None)?;

    session.enter(
        BuildLocation::new("bridge gap", Pose::identity()),
        &mut collaborators,
    )?;

    // Start a segment at the screen center, drag the free end to the
    // right over one tick, then commit it with a second click.
    let click = |at| PointerEvent::new(PointerButton::Primary, at);
    session.pointer_event(&click(Point2::new(400.0, 400.0)), &collaborators, &mut graph)?;
    session.tick(
        0.016,
        &mut collaborators,
        &mut graph,
        Some(&Point2::new(560.0, 400.0)),
    );
    session.pointer_event(&click(Point2::new(560.0, 400.0)), &collaborators, &mut graph)?;

    session.exit(&mut collaborators, &mut graph)?;

    for event in session.drain_events() {
        info!(?event, "session event");
    }
    info!(
        points = graph.point_count(),
        bars = graph.bar_count(),
        "committed structure"
    );
    Ok(())
}
