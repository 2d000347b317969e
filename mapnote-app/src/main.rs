use anyhow::{bail, Context};
use clap::Parser;
use mapnote::{
    ControllerBuilder, ControllerEvent, ControllerHandle, FixedPosition, GeolocationError,
    GeolocationProvider, HeadlessMap, LatLng, MapnoteConfig, MarkerId, NoGeolocation, Point,
    PopupState, SavedLocation, Viewport,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "commands: click <lon> <lat> | marker <id> | save <description> \
                    | cancel | close | list | quit";

/// Drive the map interaction core from the terminal
#[derive(Parser)]
#[command(name = "mapnote-app")]
#[command(about = "Annotate map locations from the console")]
#[command(version)]
struct Args {
    /// JSON config file (defaults are used for missing keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reverse geocoding endpoint, overrides the config file
    #[arg(long)]
    endpoint: Option<String>,

    /// Latitude reported by geolocation
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude reported by geolocation
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Map container width in pixels
    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    /// Map container height in pixels
    #[arg(long, default_value_t = 800.0)]
    height: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            MapnoteConfig::from_json_str(&json)?
        }
        None => MapnoteConfig::default(),
    };
    if let Some(endpoint) = args.endpoint {
        config.geocoding.endpoint = endpoint;
    }

    let map = HeadlessMap::new(Viewport::new(
        config.view.default_center,
        config.view.default_zoom,
        Point::new(args.width, args.height),
    ));
    let saved = Arc::new(Mutex::new(Vec::<SavedLocation>::new()));
    let sink = saved.clone();

    let mut controller = ControllerBuilder::new()
        .with_config(config)
        .with_map(map.clone())
        .on_popup(print_popup)
        .on_locations(move |locations| {
            println!("{} saved location(s)", locations.len());
            if let Ok(mut saved) = sink.lock() {
                *saved = locations.to_vec();
            }
        })
        .build()?;

    let provider: Arc<dyn GeolocationProvider> = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Arc::new(FixedPosition(LatLng::from_lon_lat(lon, lat))),
        _ => Arc::new(NoGeolocation(GeolocationError::Unavailable)),
    };
    controller.locate(provider);

    let handle = controller.handle();
    let runner = tokio::spawn(async move { controller.run().await });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        match run_command(line.trim(), &handle, &map, &saved) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => log::warn!("{:#}", e),
        }
    }

    handle.shutdown();
    runner.await?;
    Ok(())
}

/// Executes one console command. Returns false when the user asked to quit.
fn run_command(
    line: &str,
    handle: &ControllerHandle,
    map: &HeadlessMap,
    saved: &Mutex<Vec<SavedLocation>>,
) -> anyhow::Result<bool> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "" => {}
        "click" => {
            let mut parts = rest.split_whitespace();
            let (Some(lon), Some(lat)) = (parts.next(), parts.next()) else {
                bail!("usage: click <lon> <lat>");
            };
            let lon: f64 = lon.parse().context("longitude must be a number")?;
            let lat: f64 = lat.parse().context("latitude must be a number")?;
            handle.click(map.click_at(LatLng::from_lon_lat(lon, lat)));
        }
        "marker" => {
            let id: u64 = rest.trim().parse().context("usage: marker <id>")?;
            handle.send(ControllerEvent::FeatureHit {
                marker: MarkerId(id),
            });
        }
        "save" => {
            handle.save(rest);
        }
        "cancel" => {
            handle.cancel();
        }
        "close" => {
            handle.dismiss();
        }
        "list" => {
            let saved = saved
                .lock()
                .map_err(|_| anyhow::anyhow!("location list unavailable"))?;
            if saved.is_empty() {
                println!("no saved locations");
            }
            for (i, location) in saved.iter().enumerate() {
                println!("{}", location.display_line(i + 1));
            }
        }
        "quit" | "exit" => return Ok(false),
        "help" => println!("{HELP}"),
        other => bail!("unknown command '{other}'; {HELP}"),
    }
    Ok(true)
}

fn print_popup(state: &PopupState) {
    match state {
        PopupState::Closed => println!("[popup closed]"),
        PopupState::InputPrompt { .. } => {
            for line in state.lines() {
                println!("[prompt] {line}");
            }
            println!("[prompt] enter 'save <description>' or 'cancel'");
        }
        _ => {
            if let Some(title) = state.title() {
                println!("[{title}]");
            }
            for line in state.lines() {
                println!("  {line}");
            }
        }
    }
}
