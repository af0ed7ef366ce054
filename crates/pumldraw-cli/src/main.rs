use pumldraw::{ConvertError, Converter, LayoutConfig, ParseOptions, RenderOptions, XmlMode};
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Convert(ConvertError),
    Config(pumldraw_render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Convert(err) => write!(f, "{err}"),
            CliError::Config(err) => write!(f, "invalid --config: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ConvertError> for CliError {
    fn from(value: ConvertError) -> Self {
        Self::Convert(value)
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
    Parse,
    Detect,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Drawio,
    Svg,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drawio" | "xml" => Ok(Self::Drawio),
            "svg" => Ok(Self::Svg),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    with_meta: bool,
    strict: bool,
    compressed: bool,
    render_format: RenderFormat,
    config: Option<String>,
    name: Option<String>,
    out: Option<String>,
}

#[derive(Serialize)]
struct ParseOut<'a> {
    kind: &'a str,
    title: Option<&'a str>,
    diagnostics: &'a [pumldraw::Diagnostic],
    model: &'a pumldraw::DiagramModel,
}

fn usage() -> &'static str {
    "pumldraw-cli\n\
\n\
USAGE:\n\
  pumldraw-cli [parse] [--pretty] [--meta] [--strict] [<path>|-]\n\
  pumldraw-cli detect [<path>|-]\n\
  pumldraw-cli render [--format drawio|svg] [--compressed] [--strict] [--config <file.json>] [--name <page>] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - parse prints the typed JSON model; --meta adds kind, title and skipped-line diagnostics.\n\
  - render prints the draw.io document to stdout by default; use --out to write a file.\n\
  - --config reads a JSON object of layout settings; missing keys keep their defaults.\n\
  - Set PUMLDRAW_LOG (e.g. debug, pumldraw_core=trace) to see pipeline logs on stderr.\n\
\n\
EXIT CODES:\n\
  1 on I/O, parse or render errors, 2 on usage errors, 3 when nothing drawable was found.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "detect" => args.command = Command::Detect,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--meta" => args.with_meta = true,
            "--strict" => args.strict = true,
            "--compressed" => args.compressed = true,
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--name" => {
                let name = next_value(&mut it)?;
                if !name.trim().is_empty() {
                    args.name = Some(name.trim().to_string());
                }
            }
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
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
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
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

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn load_layout_config(path: Option<&str>) -> Result<LayoutConfig, CliError> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let text = std::fs::read_to_string(path)?;
    LayoutConfig::from_json_str(&text).map_err(CliError::Config)
}

fn build_converter(args: &Args) -> Result<Converter, CliError> {
    let parse = if args.strict {
        ParseOptions::strict()
    } else {
        ParseOptions::lenient()
    };
    let mut render = RenderOptions {
        layout: load_layout_config(args.config.as_deref())?,
        ..Default::default()
    };
    if args.compressed {
        render.xml_mode = XmlMode::Compressed;
    }
    if let Some(name) = &args.name {
        render.diagram_name = name.clone();
    }
    Ok(Converter::new()
        .with_parse_options(parse)
        .with_render_options(render))
}

fn run(args: Args) -> Result<(), CliError> {
    let converter = build_converter(&args)?;
    let text = read_input(args.input.as_deref())?;

    match args.command {
        Command::Detect => {
            println!("{}", converter.engine.detect(&text));
            Ok(())
        }
        Command::Parse => {
            let parsed = converter.parse_diagram_sync(&text)?;
            if args.with_meta {
                let out = ParseOut {
                    kind: parsed.kind.as_str(),
                    title: parsed.title.as_deref(),
                    diagnostics: &parsed.diagnostics,
                    model: &parsed.model,
                };
                write_json(&out, args.pretty)?;
            } else {
                write_json(&parsed.model, args.pretty)?;
            }
            Ok(())
        }
        Command::Render => {
            let rendered = converter.convert_sync(&text)?;
            tracing::info!(
                elements = rendered.element_count,
                relations = rendered.relation_count,
                "rendered diagram"
            );
            match args.render_format {
                RenderFormat::Drawio => write_text(&rendered.xml, args.out.as_deref()),
                RenderFormat::Svg => write_text(&rendered.preview, args.out.as_deref()),
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PUMLDRAW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
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

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::Convert(ConvertError::NoValidElements)) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
