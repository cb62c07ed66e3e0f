use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use trainerpack::{Settings, SettingsOverrides, TemplateSet, TrainerPackError};

#[derive(Parser)]
#[command(name = "trainerpack")]
#[command(about = "Convert trainer spreadsheets into a JSON trainer pack")]
#[command(version)]
struct Cli {
    /// Settings file (TOML); command line flags take precedence
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Workbook to convert
    #[arg(short = 'e', long = "excel-file")]
    excel_file: Option<PathBuf>,

    /// Sheet to convert (repeatable; default or `all`: the 18 type sheets)
    #[arg(short, long = "sheet")]
    sheets: Vec<String>,

    /// Output directory
    #[arg(short, long)]
    outdir: Option<PathBuf>,

    /// Gym leader (roster) template
    #[arg(short = 'l', long = "leader-template")]
    leader_template: Option<PathBuf>,

    /// Pokemon (entity) template
    #[arg(short = 'p', long = "pokemon-template")]
    pokemon_template: Option<PathBuf>,

    /// Mob trainer group (squad) template
    #[arg(short = 'm', long = "mobs-template")]
    mobs_template: Option<PathBuf>,

    /// Advancement (progression) template
    #[arg(short = 'a', long = "advancement-template")]
    advancement_template: Option<PathBuf>,

    /// Trainer type template, copied verbatim
    #[arg(short = 't', long = "trainer-type-template")]
    trainer_type_template: Option<PathBuf>,

    /// Also package the output into this ZIP archive
    #[arg(long)]
    zip: Option<PathBuf>,

    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            input: self.excel_file.clone(),
            sheets: self.sheets.clone(),
            output_dir: self.outdir.clone(),
            zip: self.zip.clone(),
            roster_template: self.leader_template.clone(),
            entity_template: self.pokemon_template.clone(),
            squad_template: self.mobs_template.clone(),
            progression_template: self.advancement_template.clone(),
            trainer_type_template: self.trainer_type_template.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), TrainerPackError> {
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    }
    .with_overrides(cli.overrides());

    let converter = settings.to_builder().build()?;
    let templates = TemplateSet::load(&settings.templates)?;

    if !settings.input.is_file() {
        return Err(TrainerPackError::MissingInput {
            kind: "workbook",
            path: settings.input.clone(),
        });
    }
    let input = File::open(&settings.input)?;

    let summary = converter.convert(input, &templates, &settings.sinks())?;
    info!(
        "Successfully created {} JSON files in the '{}' directory",
        summary.files,
        settings.output_dir.display()
    );
    Ok(())
}

fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    let base_level = match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    // RUST_LOGが設定されていればそちらを優先
    builder.parse_default_env();
    builder.init();
}
