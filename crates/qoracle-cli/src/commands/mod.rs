pub mod bytes;
pub mod cast;
pub mod sources;
pub mod table;

use std::error::Error;
use std::fmt::Display;

use qoracle_core::{FallbackProvider, Hexagram, Settings, timeout_from_secs};

/// Backend options collected from global CLI flags.
pub struct BackendOptions<'a> {
    pub env_file: &'a str,
    pub allow_fallback: bool,
    pub timeout_secs: Option<f64>,
}

/// Print an error and exit with status 1.
pub fn fail(message: impl Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Settings sources in precedence order: process environment, then the
/// settings file. A missing file is skipped.
fn settings_sources(env_file: &str) -> Result<[config::Config; 2], config::ConfigError> {
    let environment = config::Config::builder()
        .add_source(config::Environment::default())
        .build()?;
    let file = config::Config::builder()
        .add_source(config::File::new(env_file, config::FileFormat::Ini).required(false))
        .build()?;
    Ok([environment, file])
}

/// First source holding `key`. Sources may normalise keys to lowercase.
fn lookup(sources: &[config::Config], key: &str) -> Option<String> {
    sources.iter().find_map(|source| {
        source
            .get_string(&key.to_ascii_lowercase())
            .or_else(|_| source.get_string(key))
            .ok()
    })
}

/// Resolve settings: process environment first, then the settings file,
/// then defaults. CLI flags override the result.
pub fn resolve_settings(options: &BackendOptions) -> Result<Settings, Box<dyn Error>> {
    let sources = settings_sources(options.env_file)?;
    let mut settings = Settings::from_lookup(|key| lookup(&sources, key))?;

    if options.allow_fallback {
        settings.allow_fallback = true;
    }
    if let Some(secs) = options.timeout_secs {
        settings.timeout = timeout_from_secs("--timeout", secs)?;
    }
    Ok(settings)
}

pub fn load_settings(options: &BackendOptions) -> Settings {
    resolve_settings(options).unwrap_or_else(|e| fail(e))
}

/// Build the provider chain for one command invocation.
pub fn make_provider(options: &BackendOptions) -> FallbackProvider {
    let settings = load_settings(options);
    FallbackProvider::from_settings(&settings).unwrap_or_else(|e| fail(e))
}

const YANG: &str = "-----";
const YIN: &str = "-- --";

/// Render a hexagram top line first. The moving line, if any, is marked
/// with `*`.
pub fn render_hexagram(hexagram: &Hexagram, moving_line: Option<u8>) -> String {
    let bits = hexagram.bits();
    (0..Hexagram::LINES)
        .rev()
        .map(|index| {
            let line = if bits[index] == 1 { YANG } else { YIN };
            if moving_line == Some(index as u8 + 1) {
                format!("{line}  *")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Heading for a hexagram: name, symbol and King Wen number when known.
pub fn heading(hexagram: &Hexagram) -> String {
    match (hexagram.symbol(), hexagram.king_wen_number()) {
        (Some(symbol), Some(number)) => {
            format!("{} {symbol} #{number}", hexagram.display_name())
        }
        _ => hexagram.display_name(),
    }
}
