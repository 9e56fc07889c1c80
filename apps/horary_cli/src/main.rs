use anyhow::Context;
use clap::Parser;
use horary::{HoraryEngine, JudgeRequest, JudgmentOverrides};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Judge a horary question with traditional rules")]
struct Args {
    /// The question as asked.
    #[arg(required_unless_present = "request")]
    question: Option<String>,

    /// Place name from the configured table, or "lat, lon".
    #[arg(long, default_value = "London")]
    location: String,

    /// Local date, DD/MM/YYYY or YYYY-MM-DD.
    #[arg(long, requires = "time")]
    date: Option<String>,

    /// Local time, HH:MM.
    #[arg(long, requires = "date")]
    time: Option<String>,

    /// "UTC" or a fixed offset such as +02:00. Defaults to the place's offset.
    #[arg(long)]
    timezone: Option<String>,

    /// Cast for the current moment instead of --date/--time.
    #[arg(long, conflicts_with_all = ["date", "time"])]
    now: bool,

    /// Querent and quesited houses, e.g. --manual-houses 1,7.
    #[arg(long, value_delimiter = ',')]
    manual_houses: Option<Vec<u8>>,

    #[arg(long)]
    ignore_radicality: bool,

    #[arg(long)]
    ignore_void_moon: bool,

    #[arg(long)]
    ignore_combustion: bool,

    #[arg(long)]
    ignore_saturn_7th: bool,

    /// Confidence added for mutual exaltation.
    #[arg(long)]
    exaltation_boost: Option<f64>,

    /// Read the whole request from a JSON file instead of the flags above.
    #[arg(long)]
    request: Option<PathBuf>,

    /// horary.toml to use (otherwise HORARY_CONFIG, then configs/horary.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding Swiss Ephemeris data files.
    #[arg(long)]
    ephe_path: Option<PathBuf>,

    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn to_request(&self) -> anyhow::Result<JudgeRequest> {
        if let Some(path) = &self.request {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read request {}", path.display()))?;
            return serde_json::from_str(&text)
                .with_context(|| format!("Invalid request JSON in {}", path.display()));
        }

        let mut request = JudgeRequest::new(self.question.clone().unwrap_or_default(), &self.location);
        request = match (&self.date, &self.time) {
            (Some(date), Some(time)) if !self.now => request.at(date, time),
            _ => request.now(),
        };
        request.timezone = self.timezone.clone();
        request.manual_houses = self.manual_houses.clone();
        request.overrides = JudgmentOverrides {
            ignore_radicality: self.ignore_radicality,
            ignore_void_moon: self.ignore_void_moon,
            ignore_combustion: self.ignore_combustion,
            ignore_saturn_7th: self.ignore_saturn_7th,
            exaltation_boost: self.exaltation_boost,
        };
        Ok(request)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => horary_config::load_horary_settings_from(path)?,
        None => horary_config::load_horary_settings()?,
    };
    let engine = HoraryEngine::new(settings, args.ephe_path.clone()).context("Failed to open the ephemeris")?;

    let request = args.to_request()?;
    log::debug!("request: {request:?}");

    let result = engine.judge(&request);
    println!("{}", result.to_json(args.pretty)?);
    Ok(())
}
