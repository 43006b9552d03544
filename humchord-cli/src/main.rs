mod input;

use std::path::PathBuf;

use humchord_core::analysis::Analysis;
use humchord_core::config::Config;
use humchord_core::session::Session;
use humchord_types::{Key, TimeSignature};

const USAGE: &str = "\
usage: humchord [OPTIONS] <INPUT>

Reads pitch-tracker readings (`frequency amplitude` per line, `-` for stdin)
and prints the detected key and a chord progression.

options:
  --bpm <BPM>        tempo in quarter notes per minute
  --time <N/D>       time signature, e.g. 3/4
  --key <KEY>        harmonize in this key instead of detecting one (C, Am, F#m)
  --json             print the full analysis as JSON
  -v, --verbose      debug logging on stderr
  -h, --help         show this message";

#[derive(Debug, PartialEq)]
struct Args {
    input: PathBuf,
    bpm: Option<f64>,
    time_signature: Option<TimeSignature>,
    key: Option<Key>,
    json: bool,
    verbose: bool,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut input = None;
    let mut bpm = None;
    let mut time_signature = None;
    let mut key = None;
    let mut json = false;
    let mut verbose = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", flag))
        };
        match arg.as_str() {
            "--bpm" => {
                let v = value("--bpm")?;
                let parsed: f64 = v.parse().map_err(|_| format!("bad --bpm: {}", v))?;
                if !(parsed > 0.0) {
                    return Err(format!("--bpm must be positive: {}", v));
                }
                bpm = Some(parsed);
            }
            "--time" => time_signature = Some(value("--time")?.parse()?),
            "--key" => key = Some(value("--key")?.parse()?),
            "--json" => json = true,
            "--verbose" | "-v" => verbose = true,
            other if other.starts_with('-') && other != "-" => {
                return Err(format!("unknown option: {}", other))
            }
            other => {
                if input.is_some() {
                    return Err(format!("unexpected argument: {}", other));
                }
                input = Some(PathBuf::from(other));
            }
        }
    }

    Ok(Args {
        input: input.ok_or_else(|| "missing <INPUT>".to_string())?,
        bpm,
        time_signature,
        key,
        json,
        verbose,
    })
}

fn init_logging(verbose: bool) {
    use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    if let Err(e) = TermLogger::init(
        log_level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("humchord: logging disabled: {}", e);
        return;
    }

    log::info!("humchord starting (log level: {:?})", log_level);
}

fn run(args: &Args) -> Result<(), String> {
    let config = Config::load();
    let mut session = Session::from_config(&config);

    let mut settings = *session.settings();
    if let Some(bpm) = args.bpm {
        settings.bpm = bpm;
    }
    if let Some(ts) = args.time_signature {
        settings.time_signature = ts;
    }
    settings.key_override = args.key;
    session.set_settings(settings);

    let readings = input::read_readings(&args.input)?;

    session.start();
    let sink = session.sink();
    for reading in &readings {
        sink.add(reading.frequency, reading.amplitude);
    }
    let analysis = session
        .stop()
        .ok_or_else(|| "session was not recording".to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(analysis)
            .map_err(|e| format!("cannot encode analysis: {}", e))?;
        println!("{}", json);
    } else {
        print!("{}", render_text(analysis));
    }
    Ok(())
}

fn render_text(analysis: &Analysis) -> String {
    let Some(key) = analysis.key else {
        return "No notes detected.\n".to_string();
    };

    let mut out = format!("Key: {}\n", key);
    for (i, measure) in analysis.measures.iter().enumerate() {
        let melody: Vec<&str> = measure.notes.iter().map(|n| n.pitch_class.name()).collect();
        let (name, numeral) = match measure.chord {
            Some(chord) => (
                chord.name(),
                key.degree_of(&chord)
                    .map(|d| d.roman(chord.quality))
                    .unwrap_or_default(),
            ),
            None => ("-".to_string(), String::new()),
        };
        out.push_str(&format!(
            "{:>4}  {:<4} {:<5} {}\n",
            i + 1,
            name,
            numeral,
            melody.join(" ")
        ));
    }

    let names: Vec<String> = analysis.progression().iter().map(|c| c.name()).collect();
    out.push_str(&format!("Progression: {}\n", names.join(" | ")));
    out
}

fn main() {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    if raw.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return;
    }

    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("humchord: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("humchord: {}", e);
        std::process::exit(1);
    }
}
