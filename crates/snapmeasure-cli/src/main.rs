//! snapmeasure CLI: calibrate photos, convert measurements and replay
//! recorded orientation streams.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use snapmeasure::calibration::{BlueprintInput, CoinInput, DroneInput, VerbalScaleInput};
use snapmeasure::{
    drone_preset, reference_object, AlignmentClassifier, AlignmentEvent, AlignmentResult,
    Calibration, CalibrationInput, CameraSensor, EngineConfig, LengthUnit, OrientationSample,
    ScreenUnit, DRONE_PRESETS, REFERENCE_OBJECTS,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "snapmeasure")]
#[command(about = "Calibrate photos for real-world measurement and replay alignment sensor logs")]
#[command(version)]
struct Cli {
    /// Engine config file (schema snapmeasure.config.v1).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a calibration from one reference modality.
    Calibrate(CalibrateArgs),

    /// Convert a pixel distance using a saved calibration.
    Measure(MeasureArgs),

    /// Run a recorded orientation stream through the alignment classifier.
    Replay(ReplayArgs),

    /// List built-in coin references and drone presets.
    References,
}

#[derive(Debug, Args)]
struct CalibrateArgs {
    /// Path to write the calibration (JSON). Printed to stdout when omitted.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    kind: CalibrateKind,
}

#[derive(Debug, Subcommand)]
enum CalibrateKind {
    /// Circle fitted around a coin or other object of known diameter.
    Coin {
        /// Circle center in image pixels, e.g. 812,604.
        #[arg(long, value_parser = parse_point)]
        center: [f64; 2],

        /// Circle radius in image pixels.
        #[arg(long)]
        radius: f64,

        /// Real diameter in millimetres.
        #[arg(long, conflicts_with = "reference", required_unless_present = "reference")]
        diameter_mm: Option<f64>,

        /// Built-in reference key (see `references`).
        #[arg(long)]
        reference: Option<String>,
    },

    /// Map scale such as "1 cm on screen = 1 km".
    Verbal {
        #[arg(long)]
        screen_distance: f64,

        /// cm or in.
        #[arg(long, default_value = "cm")]
        screen_unit: ScreenUnit,

        #[arg(long)]
        real_distance: f64,

        /// mm, cm, in, m, ft, km or mi.
        #[arg(long)]
        real_unit: LengthUnit,

        /// Image width in pixels.
        #[arg(long, conflicts_with = "image", required_unless_present = "image")]
        image_width: Option<u32>,

        /// Photo to read the image width from.
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Drone altitude plus camera sensor geometry.
    Drone {
        /// Flight altitude above ground in metres.
        #[arg(long)]
        altitude_m: f64,

        /// Built-in drone preset key (see `references`).
        #[arg(long)]
        preset: Option<String>,

        #[arg(long, required_unless_present = "preset")]
        sensor_width_mm: Option<f64>,

        #[arg(long, required_unless_present = "preset")]
        focal_length_mm: Option<f64>,

        /// Photo whose dimensions override the sensor's image size.
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Two points with a known real distance between them.
    Blueprint {
        #[arg(long, value_parser = parse_point)]
        p1: [f64; 2],

        #[arg(long, value_parser = parse_point)]
        p2: [f64; 2],

        #[arg(long)]
        distance: f64,

        #[arg(long, default_value = "mm")]
        unit: LengthUnit,

        /// Magnetic declination in degrees (East positive).
        #[arg(long, allow_hyphen_values = true)]
        declination: Option<f64>,
    },
}

#[derive(Debug, Clone, Args)]
struct MeasureArgs {
    /// Calibration JSON written by `calibrate`.
    #[arg(long)]
    calibration: PathBuf,

    /// Start point in image pixels, e.g. 10,20.
    #[arg(long, value_parser = parse_point)]
    from: [f64; 2],

    /// End point in image pixels.
    #[arg(long, value_parser = parse_point)]
    to: [f64; 2],

    /// Output unit. Picked automatically when omitted.
    #[arg(long)]
    unit: Option<LengthUnit>,

    #[arg(long, default_value = "2")]
    decimals: usize,
}

#[derive(Debug, Clone, Args)]
struct ReplayArgs {
    /// JSON array of orientation samples.
    #[arg(long)]
    samples: PathBuf,

    /// Print only status and guidance changes.
    #[arg(long)]
    events_only: bool,

    /// Path to write per-sample results (JSON).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_point(s: &str) -> Result<[f64; 2], String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{}': {}", v.trim(), e))
    };
    Ok([parse(x)?, parse(y)?])
}

fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    match path {
        Some(path) => {
            tracing::info!("Loading config: {}", path.display());
            Ok(EngineConfig::from_json_file(path)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Calibrate(args) => run_calibrate(&args, &config),
        Commands::Measure(args) => run_measure(&args),
        Commands::Replay(args) => run_replay(&args, &config),
        Commands::References => run_references(),
    }
}

// ── calibrate ──────────────────────────────────────────────────────────

fn image_size(path: &Path) -> CliResult<(u32, u32)> {
    let (w, h) = image::image_dimensions(path).map_err(|e| -> CliError {
        format!("Failed to read image {}: {}", path.display(), e).into()
    })?;
    tracing::info!("Image size: {}x{}", w, h);
    Ok((w, h))
}

fn calibration_input(kind: &CalibrateKind) -> CliResult<CalibrationInput> {
    let input = match kind {
        CalibrateKind::Coin {
            center,
            radius,
            diameter_mm,
            reference,
        } => match (reference, diameter_mm) {
            (Some(key), _) => {
                let object = reference_object(key)
                    .ok_or_else(|| -> CliError { format!("unknown reference '{}'", key).into() })?;
                tracing::info!("Reference: {} ({} mm)", object.name, object.diameter_mm);
                CalibrationInput::Coin(object.coin_input(*center, *radius))
            }
            (None, Some(d)) => CalibrationInput::Coin(CoinInput {
                center_px: *center,
                radius_px: *radius,
                known_diameter_mm: *d,
                reference: None,
            }),
            (None, None) => return Err("either --diameter-mm or --reference is required".into()),
        },

        CalibrateKind::Verbal {
            screen_distance,
            screen_unit,
            real_distance,
            real_unit,
            image_width,
            image,
        } => {
            let image_width_px = match (image_width, image) {
                (Some(w), _) => *w,
                (None, Some(path)) => image_size(path)?.0,
                (None, None) => return Err("either --image-width or --image is required".into()),
            };
            CalibrationInput::Verbal(VerbalScaleInput {
                screen_distance: *screen_distance,
                screen_unit: *screen_unit,
                real_distance: *real_distance,
                real_unit: *real_unit,
                image_width_px,
            })
        }

        CalibrateKind::Drone {
            altitude_m,
            preset,
            sensor_width_mm,
            focal_length_mm,
            image,
        } => {
            let mut sensor = match preset {
                Some(key) => {
                    let preset = drone_preset(key)
                        .ok_or_else(|| -> CliError { format!("unknown drone preset '{}'", key).into() })?;
                    tracing::info!("Drone preset: {}", preset.name);
                    preset.sensor
                }
                None => CameraSensor {
                    sensor_width_mm: sensor_width_mm.ok_or("--sensor-width-mm is required")?,
                    focal_length_mm: focal_length_mm.ok_or("--focal-length-mm is required")?,
                    image_width_px: 0,
                    image_height_px: 0,
                },
            };
            if let Some(w) = sensor_width_mm {
                sensor.sensor_width_mm = *w;
            }
            if let Some(f) = focal_length_mm {
                sensor.focal_length_mm = *f;
            }
            match image {
                Some(path) => {
                    let (w, h) = image_size(path)?;
                    sensor.image_width_px = w;
                    sensor.image_height_px = h;
                }
                None if sensor.image_width_px == 0 => {
                    return Err("--image is required without --preset".into());
                }
                None => {}
            }
            CalibrationInput::Drone(DroneInput {
                sensor,
                altitude_m: *altitude_m,
            })
        }

        CalibrateKind::Blueprint {
            p1,
            p2,
            distance,
            unit,
            declination,
        } => CalibrationInput::Blueprint(BlueprintInput {
            p1_px: *p1,
            p2_px: *p2,
            distance: *distance,
            unit: *unit,
            declination_deg: *declination,
        }),
    };
    Ok(input)
}

fn run_calibrate(args: &CalibrateArgs, config: &EngineConfig) -> CliResult<()> {
    let input = calibration_input(&args.kind)?;
    let engine = config.calibration_engine();
    let calibration = engine.compute(&input)?;

    tracing::info!(
        "Calibration ({}): {:.6} px/mm, {:.4} mm/px",
        calibration.calibration_type(),
        calibration.pixels_per_unit(),
        calibration.mm_per_pixel()
    );

    let json = serde_json::to_string_pretty(&calibration)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Calibration written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

// ── measure ────────────────────────────────────────────────────────────

fn run_measure(args: &MeasureArgs) -> CliResult<()> {
    let data = std::fs::read_to_string(&args.calibration).map_err(|e| -> CliError {
        format!(
            "Failed to read calibration {}: {}",
            args.calibration.display(),
            e
        )
        .into()
    })?;
    let calibration: Calibration = serde_json::from_str(&data)?;
    let m = calibration.measure(args.from, args.to)?;

    let unit = match args.unit {
        Some(unit) => unit,
        None => m
            .best_unit(&[
                LengthUnit::Millimeter,
                LengthUnit::Centimeter,
                LengthUnit::Meter,
                LengthUnit::Kilometer,
            ])
            .unwrap_or(LengthUnit::Millimeter),
    };

    println!("{:.2} px = {}", m.pixels, m.format(unit, args.decimals));
    Ok(())
}

// ── replay ─────────────────────────────────────────────────────────────

struct ReplaySummary {
    results: Vec<AlignmentResult>,
    first_ready: Option<usize>,
    pulses_played: usize,
}

fn replay_stream(
    clf: &mut AlignmentClassifier,
    samples: &[OrientationSample],
    events_only: bool,
) -> ReplaySummary {
    let mut results = Vec::with_capacity(samples.len());
    let mut first_ready: Option<usize> = None;
    let mut pulses_played = 0usize;

    for (i, sample) in samples.iter().enumerate() {
        let r = clf.ingest(sample);
        if first_ready.is_none() && r.auto_capture_ready() {
            first_ready = Some(i);
        }

        if !events_only {
            println!(
                "{:>5} t={:>7}ms tilt={:>6.2} {:<10} {:<7} stable={:<5} bubble=({:>6.1},{:>6.1}) {}",
                i,
                sample.timestamp_ms,
                r.tilt_angle,
                format!("{:?}", r.orientation).to_lowercase(),
                r.status,
                r.is_stable,
                r.bubble_offset.x,
                r.bubble_offset.y,
                r.guidance.map(|g| g.text()).unwrap_or(""),
            );
        }

        for event in clf.take_events() {
            match event {
                AlignmentEvent::StatusChanged { from, to } => println!(
                    "{:>5} status   {} -> {}",
                    i,
                    from.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                    to
                ),
                AlignmentEvent::GuidanceChanged { to, .. } => println!(
                    "{:>5} guidance {}",
                    i,
                    to.map(|g| g.text()).unwrap_or("(none)")
                ),
            }
        }
        for pulse in clf.due_haptics(sample.timestamp_ms) {
            tracing::debug!(sample = i, ?pulse, "haptic pulse");
            pulses_played += 1;
        }

        results.push(r);
    }

    // Pulses of the final burst fall after the last sample.
    for pulse in clf.due_haptics(u64::MAX) {
        tracing::debug!(?pulse, "haptic pulse (end of stream)");
        pulses_played += 1;
    }

    ReplaySummary {
        results,
        first_ready,
        pulses_played,
    }
}

fn run_replay(args: &ReplayArgs, config: &EngineConfig) -> CliResult<()> {
    tracing::info!("Loading samples: {}", args.samples.display());
    let data = std::fs::read_to_string(&args.samples)?;
    let samples: Vec<OrientationSample> = serde_json::from_str(&data)?;
    tracing::info!("Replaying {} samples", samples.len());

    let mut clf = config.classifier();
    let summary = replay_stream(&mut clf, &samples, args.events_only);

    let haptics = clf.haptics();
    tracing::info!(
        "Replay done: {} bursts scheduled, {} pulses played, {} pulses cancelled",
        haptics.bursts_scheduled(),
        summary.pulses_played,
        haptics.pulses_cancelled()
    );
    match summary.first_ready {
        Some(i) => tracing::info!("Auto-capture ready at sample {}", i),
        None => tracing::info!("Auto-capture never became ready"),
    }

    if let Some(path) = &args.out {
        let json = serde_json::to_string_pretty(&summary.results)?;
        std::fs::write(path, &json)?;
        tracing::info!("Results written to {}", path.display());
    }
    Ok(())
}

// ── references ─────────────────────────────────────────────────────────

fn run_references() -> CliResult<()> {
    println!("Coin references");
    for r in REFERENCE_OBJECTS {
        println!("  {:<18} {:>7.2} mm  {}", r.key, r.diameter_mm, r.name);
    }

    println!();
    println!("Drone presets");
    for d in DRONE_PRESETS {
        let s = &d.sensor;
        println!(
            "  {:<18} sensor {:>5.2} mm  focal {:>5.2} mm  {}x{}  {}",
            d.key,
            s.sensor_width_mm,
            s.focal_length_mm,
            s.image_width_px,
            s.image_height_px,
            d.name
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points_with_spaces_and_signs() {
        assert_eq!(parse_point("10,20").unwrap(), [10.0, 20.0]);
        assert_eq!(parse_point(" -1.5 , 3e2 ").unwrap(), [-1.5, 300.0]);
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn coin_reference_resolves_diameter() {
        let input = calibration_input(&CalibrateKind::Coin {
            center: [100.0, 100.0],
            radius: 50.0,
            diameter_mm: None,
            reference: Some("us_quarter".to_string()),
        })
        .unwrap();
        match input {
            CalibrationInput::Coin(coin) => {
                assert_eq!(coin.known_diameter_mm, 24.26);
                assert_eq!(coin.reference.as_deref(), Some("us_quarter"));
            }
            other => panic!("unexpected input {:?}", other),
        }
    }

    #[test]
    fn drone_preset_keeps_sensor_dimensions() {
        let input = calibration_input(&CalibrateKind::Drone {
            altitude_m: 50.0,
            preset: Some("dji_mini_2".to_string()),
            sensor_width_mm: None,
            focal_length_mm: None,
            image: None,
        })
        .unwrap();
        match input {
            CalibrationInput::Drone(d) => assert_eq!(d.sensor.image_width_px, 4000),
            other => panic!("unexpected input {:?}", other),
        }
    }

    #[test]
    fn drone_without_preset_or_image_is_rejected() {
        let err = calibration_input(&CalibrateKind::Drone {
            altitude_m: 50.0,
            preset: None,
            sensor_width_mm: Some(6.3),
            focal_length_mm: Some(4.5),
            image: None,
        });
        assert!(err.is_err());
    }

    #[test]
    fn cli_parses_blueprint_with_negative_declination() {
        let cli = Cli::try_parse_from([
            "snapmeasure",
            "calibrate",
            "blueprint",
            "--p1",
            "0,0",
            "--p2",
            "100,0",
            "--distance",
            "10",
            "--unit",
            "cm",
            "--declination",
            "-3.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Calibrate(args) => match args.kind {
                CalibrateKind::Blueprint { declination, unit, .. } => {
                    assert_eq!(declination, Some(-3.5));
                    assert_eq!(unit, LengthUnit::Centimeter);
                }
                other => panic!("unexpected kind {:?}", other),
            },
            _ => panic!("expected calibrate"),
        }
    }

    #[test]
    fn replay_plays_trailing_burst_without_timestamps() {
        let samples = vec![OrientationSample::new(0.0, 0.0, [0.0, 0.0, 9.81])];
        let mut clf = AlignmentClassifier::default();
        let summary = replay_stream(&mut clf, &samples, true);
        assert_eq!(summary.results.len(), 1);
        assert_eq!(summary.pulses_played, 7);
        assert!(clf.haptics().pending().is_empty());
    }
}
