use archsketch_core::svg::primitives::extract_primitives_from_str;
use archsketch_core::{Diagram, EndpointPolicy, LayerPolicy, SvgImportOptions, SvgImporter};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;

const LOG_ENV: &str = "ARCHSKETCH_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(archsketch_core::Error),
    Json(serde_json::Error),
    Config(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Config(msg) => write!(f, "Invalid config: {msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<archsketch_core::Error> for CliError {
    fn from(value: archsketch_core::Error) -> Self {
        Self::Core(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Import,
    Primitives,
    Normalize,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    compact: bool,
    config: Option<String>,
    layer_policy: Option<LayerPolicy>,
    endpoint_policy: Option<EndpointPolicy>,
    merge_into: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "archsketch-cli\n\
\n\
USAGE:\n\
  archsketch-cli [import] [--pretty] [--compact] [--config <path>] [--layer-policy first|smallest] [--endpoint-policy first|nearest] [--merge-into <diagram.json>] [--out <path>] [<path>|-]\n\
  archsketch-cli primitives [--pretty] [<path>|-]\n\
  archsketch-cli normalize [--pretty] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - import reconstructs a diagram from SVG and prints it as JSON.\n\
  - --config reads import options from a JSON5 file; flags override it.\n\
  - --merge-into appends the imported diagram to an existing diagram file.\n\
  - primitives prints the raw rect/text/path records found in the SVG.\n\
  - normalize loads diagram JSON, drops dangling references and prints it again.\n\
  - Set ARCHSKETCH_LOG (e.g. ARCHSKETCH_LOG=debug) to see pipeline logs on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "import" => args.command = Command::Import,
            "primitives" => args.command = Command::Primitives,
            "normalize" => args.command = Command::Normalize,
            "--pretty" => args.pretty = true,
            "--compact" => args.compact = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--layer-policy" => {
                let Some(policy) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.layer_policy = Some(
                    policy
                        .parse::<LayerPolicy>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--endpoint-policy" => {
                let Some(policy) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.endpoint_policy = Some(
                    policy
                        .parse::<EndpointPolicy>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--merge-into" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.merge_into = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            let stdout = std::io::stdout().lock();
            if pretty {
                serde_json::to_writer_pretty(stdout, value)?;
            } else {
                serde_json::to_writer(stdout, value)?;
            }
            println!();
        }
        Some(path) => {
            let text = if pretty {
                serde_json::to_string_pretty(value)?
            } else {
                serde_json::to_string(value)?
            };
            std::fs::write(path, text)?;
        }
    }
    Ok(())
}

/// Overlays the keys of a JSON5 config object onto `base`.
fn apply_config_file(base: SvgImportOptions, path: &str) -> Result<SvgImportOptions, CliError> {
    let text = std::fs::read_to_string(path)?;
    let overrides: Value =
        json5::from_str(&text).map_err(|err| CliError::Config(format!("{path}: {err}")))?;
    let Value::Object(overrides) = overrides else {
        return Err(CliError::Config(format!("{path}: expected an object")));
    };

    let mut merged = serde_json::to_value(base)?;
    if let Value::Object(map) = &mut merged {
        map.extend(overrides);
    }
    serde_json::from_value(merged).map_err(|err| CliError::Config(format!("{path}: {err}")))
}

fn build_options(args: &Args) -> Result<SvgImportOptions, CliError> {
    let mut options = if args.compact {
        SvgImportOptions::compact()
    } else {
        SvgImportOptions::standard()
    };
    if let Some(path) = args.config.as_deref() {
        options = apply_config_file(options, path)?;
    }
    if let Some(policy) = args.layer_policy {
        options.layer_policy = policy;
    }
    if let Some(policy) = args.endpoint_policy {
        options.endpoint_policy = policy;
    }
    tracing::debug!(?options, "import options");
    Ok(options)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;

    match args.command {
        Command::Import => {
            let importer = SvgImporter::new().with_options(build_options(&args)?);
            let imported = importer.import_str(&text)?;

            let diagram = match args.merge_into.as_deref() {
                Some(path) => {
                    let mut base = Diagram::from_json(&std::fs::read_to_string(path)?)?;
                    base.merge(imported);
                    base
                }
                None => imported,
            };
            write_json(&diagram, args.pretty, args.out.as_deref())
        }
        Command::Primitives => {
            let primitives = extract_primitives_from_str(&text)?;
            write_json(&primitives, args.pretty, args.out.as_deref())
        }
        Command::Normalize => {
            let mut diagram: Diagram = serde_json::from_str(&text)?;
            let dropped = diagram.prune_dangling();
            if dropped > 0 {
                tracing::warn!(dropped, "removed connections with missing endpoints");
            }
            write_json(&diagram, args.pretty, args.out.as_deref())
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
