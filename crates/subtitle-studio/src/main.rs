use std::fs;
use std::io::{self, Write};

use clap::CommandFactory;
use subtitle_studio::cli::{CliArgs, CliSources, parse_cli};
use subtitle_studio::error::AppError;
use subtitle_studio::formats::{self, Format};
use subtitle_studio::settings::{EffectiveSettings, resolve_settings};
use subtitle_studio::{logging, pipeline, script, store};
use tracing::info;

fn main() -> Result<(), AppError> {
    logging::init();

    let (cli_args, cli_sources): (CliArgs, CliSources) = parse_cli();

    if cli_args.list_formats {
        display_available_formats();
        return Ok(());
    }

    let Some(input) = cli_args.input.clone() else {
        usage();
        return Ok(());
    };

    if !input.exists() {
        return Err(AppError::InputNotFound { path: input });
    }

    let resolved = resolve_settings(&cli_args, &cli_sources)?;
    let settings = resolved.settings;

    let input_format = Format::from_extension(&input)
        .filter(|format| format.readable())
        .ok_or_else(|| AppError::UnreadableInput {
            path: input.clone(),
        })?;
    let contents = fs::read_to_string(&input).map_err(|source| AppError::Io {
        path: input.clone(),
        source,
    })?;
    let mut subtitles = formats::parse(input_format, &contents)?;
    info!(
        count = subtitles.len(),
        format = %input_format,
        "loaded subtitles"
    );

    subtitles = pipeline::run(subtitles, &settings.normalize);

    if let Some(script_path) = cli_args.apply.as_deref() {
        let ops = script::load_script(script_path)?;
        let (edited, applied) = script::replay(subtitles, &ops);
        info!(applied, total = ops.len(), "replayed edit script");
        subtitles = edited;
    }

    if cli_args.save {
        let sidecar = store::default_sidecar_path(&input);
        store::save_subtitles(&sidecar, &subtitles)?;
        info!(path = %sidecar.display(), "saved editing progress");
    }

    let output_format = output_format(&cli_args, &cli_sources, &settings);
    let rendered = formats::render(output_format, &subtitles, &settings.display)?;

    match cli_args.output.as_deref() {
        Some(path) => {
            fs::write(path, rendered).map_err(|source| AppError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            info!(
                count = subtitles.len(),
                format = %output_format,
                path = %path.display(),
                "wrote subtitles"
            );
        }
        None => {
            io::stdout()
                .write_all(rendered.as_bytes())
                .map_err(|source| AppError::Io {
                    path: "<stdout>".into(),
                    source,
                })?;
        }
    }

    Ok(())
}

// An explicit --format wins; otherwise the output extension, then the
// config file, then SRT.
fn output_format(cli: &CliArgs, sources: &CliSources, settings: &EffectiveSettings) -> Format {
    if sources.format_from_cli
        && let Some(format) = settings.output.format
    {
        return format;
    }
    cli.output
        .as_deref()
        .and_then(Format::from_extension)
        .or(settings.output.format)
        .unwrap_or(Format::Srt)
}

fn usage() {
    let mut command = CliArgs::command();
    command.print_help().ok();
    println!();
    display_available_formats();
}

fn display_available_formats() {
    println!("supported formats:");
    for format in Format::available() {
        let direction = if format.readable() {
            "read / write"
        } else {
            "write only"
        };
        println!("  {format:<5} {direction}");
    }
}
