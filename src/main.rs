use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use ride_navigator::config::RideConfig;
use ride_navigator::controller::{EventKind, RideController, RideEvent};
use ride_navigator::coordinate::Coordinate;
use ride_navigator::directions::DirectionsClient;
use ride_navigator::haversine::StraightLineRoute;
use ride_navigator::map::MapProjection;
use ride_navigator::position::{ReplaySource, spawn_feed};
use ride_navigator::refresh::RefreshPolicy;
use ride_navigator::session::RideState;
use ride_navigator::traits::{MapSurface, RouteProvider};

/// Replays a recorded track as a bicycle ride towards a destination.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Destination as `lat,lng`
    #[arg(short = 'D', long, allow_hyphen_values = true)]
    destination: Coordinate,

    /// Track file with one `lat,lng` pair per line
    #[arg(short, long)]
    track: PathBuf,

    /// Time between replayed fixes in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    interval_ms: u64,

    /// Estimate straight-line routes instead of calling the directions API
    #[arg(long)]
    offline: bool,

    #[arg(short, long)]
    debug: bool,
}

/// Logs what a map would draw.
#[derive(Default)]
struct ConsoleSurface {
    last: Option<MapProjection>,
}

impl MapSurface for ConsoleSurface {
    fn render(&mut self, projection: &MapProjection) {
        if self.last.as_ref() == Some(projection) {
            return;
        }
        info!(
            destination = ?projection.destination_marker,
            planned_points = projection.planned_route.as_ref().map_or(0, |route| route.len()),
            traveled_points = projection.traveled_path.len(),
            camera = ?projection.camera,
            taps_enabled = projection.taps_enabled,
            "map updated"
        );
        self.last = Some(projection.clone());
    }
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let (provider, refresh): (Box<dyn RouteProvider>, RefreshPolicy) = if cli.offline {
        (Box::new(StraightLineRoute::default()), RefreshPolicy::default())
    } else {
        let config = RideConfig::from_env()?;
        (
            Box::new(DirectionsClient::new(config.directions)?),
            config.refresh,
        )
    };

    let interval = Duration::from_millis(cli.interval_ms);
    let source = ReplaySource::from_file(&cli.track, interval)?;
    info!(fixes = source.remaining(), track = %cli.track.display(), "replaying track");

    let mut controller = RideController::new(provider).with_refresh_policy(refresh);
    let mut surface = ConsoleSurface::default();
    let mut last_status = String::new();

    controller.set_destination(cli.destination);
    let mailbox = controller.mailbox();
    let feed = spawn_feed(source, controller.mailbox(), interval);

    controller.run(|controller, kind| {
        if kind == EventKind::Position && controller.state() == RideState::Idle {
            match controller.toggle() {
                Ok(()) => info!(control = controller.toggle_label(), "ride started from first fix"),
                Err(err) => warn!(error = %err, "could not start ride"),
            }
        }

        surface.render(&controller.projection());
        let status = controller.status_text();
        if status != last_status {
            println!("{}\n", status);
            last_status = status;
        }

        if matches!(kind, EventKind::FeedEnded | EventKind::PositionUnavailable) {
            controller.stop_ride();
            let _ = mailbox.send(RideEvent::Shutdown);
        }
    });

    if feed.join().is_err() {
        warn!("position feed panicked");
    }
    Ok(())
}
