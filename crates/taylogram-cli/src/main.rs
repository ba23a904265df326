use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use taylogram::render::raster::{self, RasterOptions};
use taylogram::render::{ChartGeometry, HeadlessRenderer, SvgRenderOptions, sanitize_svg_id};
use taylogram::{DiagramOptions, SampleSet, Series, StyleConfig, TaylorDiagram};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Csv(String),
    Model(taylogram::Error),
    Render(taylogram_render::Error),
    Raster(raster::RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Csv(msg) => write!(f, "CSV error: {msg}"),
            CliError::Model(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<taylogram::Error> for CliError {
    fn from(value: taylogram::Error) -> Self {
        Self::Model(value)
    }
}

impl From<taylogram_render::Error> for CliError {
    fn from(value: taylogram_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<taylogram::render::HeadlessError> for CliError {
    fn from(value: taylogram::render::HeadlessError) -> Self {
        match value {
            taylogram::render::HeadlessError::Model(e) => Self::Model(e),
            taylogram::render::HeadlessError::Render(e) => Self::Render(e),
        }
    }
}

impl From<raster::RasterError> for CliError {
    fn from(value: raster::RasterError) -> Self {
        Self::Raster(value)
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
    Render,
    Stats,
    Layout,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    Pdf,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    reference: Option<String>,
    samples: Option<Vec<String>>,
    config: Option<String>,
    scale: Option<f64>,
    marker_size: Option<f64>,
    legend: bool,
    pretty: bool,
    render_format: RenderFormat,
    raster_scale: f32,
    background: Option<String>,
    diagram_id: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "taylogram-cli\n\
\n\
USAGE:\n\
  taylogram-cli [render] [--ref <column>] [--samples <col,col,...>] [--format svg|png|jpg|pdf] [--scale <n>] [--marker-size <n>] [--raster-scale <n>] [--background <css-color>] [--config <options.json>] [--legend] [--id <diagram-id>] [--out <path>] [<path.csv>|-]\n\
  taylogram-cli stats [--ref <column>] [--samples <col,col,...>] [--pretty] [<path.csv>|-]\n\
  taylogram-cli layout [--ref <column>] [--samples <col,col,...>] [--config <options.json>] [--pretty] [<path.csv>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - The CSV must have a header row; without --ref/--samples the first\n\
    column is the reference and every other column is a sample.\n\
  - --config points at a JSON file of diagram options (scale, marker size,\n\
    contour levels); omitted fields keep their defaults.\n\
  - --scale and --marker-size are diagram options and override --config;\n\
    --raster-scale multiplies the pixel size of PNG/JPG output.\n\
  - render prints SVG to stdout by default; use --out for a file.\n\
  - PNG/JPG/PDF output defaults to writing next to the input file\n\
    (or ./out.<ext> for stdin).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        raster_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "stats" => args.command = Command::Stats,
            "layout" => args.command = Command::Layout,
            "--legend" => args.legend = true,
            "--pretty" => args.pretty = true,
            "--ref" => {
                let Some(column) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.reference = Some(column.clone());
            }
            "--samples" => {
                let Some(columns) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let columns: Vec<String> = columns
                    .split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect();
                if columns.is_empty() {
                    return Err(CliError::Usage(usage()));
                }
                args.samples = Some(columns);
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let scale = scale.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                args.scale = Some(scale);
            }
            "--marker-size" => {
                let Some(size) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let size = size.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                args.marker_size = Some(size);
            }
            "--raster-scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.raster_scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.raster_scale.is_finite() && args.raster_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram_id = Some(id.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
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

/// A parsed CSV: header row plus one f64 column per header entry.
/// Plain comma separation, no quoted-field support; this is caller glue,
/// not a general CSV reader.
#[derive(Debug)]
struct Table {
    columns: Vec<(String, Vec<f64>)>,
}

impl Table {
    fn parse(text: &str) -> Result<Self, CliError> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let Some(header) = lines.next() else {
            return Err(CliError::Csv("input is empty".to_string()));
        };
        let names: Vec<String> = header.split(',').map(|h| h.trim().to_string()).collect();
        let mut columns: Vec<(String, Vec<f64>)> =
            names.into_iter().map(|n| (n, Vec::new())).collect();

        for (row, line) in lines.enumerate() {
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            if cells.len() != columns.len() {
                return Err(CliError::Csv(format!(
                    "row {} has {} cells, header has {}",
                    row + 2,
                    cells.len(),
                    columns.len()
                )));
            }
            for (col, cell) in columns.iter_mut().zip(cells) {
                let value = cell.parse::<f64>().map_err(|_| {
                    CliError::Csv(format!(
                        "row {}, column '{}': '{}' is not a number",
                        row + 2,
                        col.0,
                        cell
                    ))
                })?;
                col.1.push(value);
            }
        }
        Ok(Self { columns })
    }

    fn take(&self, name: &str) -> Result<(String, Vec<f64>), CliError> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(n, v)| (n.clone(), v.clone()))
            .ok_or_else(|| CliError::Csv(format!("no column named '{name}'")))
    }
}

fn build_diagram(args: &Args, text: &str) -> Result<TaylorDiagram, CliError> {
    let table = Table::parse(text)?;
    if table.columns.len() < 2 {
        return Err(CliError::Csv(
            "need at least a reference column and one sample column".to_string(),
        ));
    }

    let (ref_name, ref_values) = match args.reference.as_deref() {
        Some(name) => table.take(name)?,
        None => table.columns[0].clone(),
    };

    let mut samples = SampleSet::new();
    match &args.samples {
        Some(names) => {
            for name in names {
                let (n, v) = table.take(name)?;
                samples.insert(n, v);
            }
        }
        None => {
            for (n, v) in &table.columns {
                if *n != ref_name {
                    samples.insert(n.clone(), v.clone());
                }
            }
        }
    }

    let mut options: DiagramOptions = match args.config.as_deref() {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => DiagramOptions::default(),
    };
    // Flag overrides beat the config file; the model validates the result.
    if let Some(scale) = args.scale {
        options.scale = scale;
    }
    if let Some(size) = args.marker_size {
        options.marker_size = size;
    }

    Ok(TaylorDiagram::new(
        Series::new(ref_name, ref_values),
        samples,
        StyleConfig::default(),
        options,
    )?)
}

#[derive(Serialize)]
struct StatsRow<'a> {
    name: &'a str,
    correlation: f64,
    theta: f64,
    stddev: f64,
}

#[derive(Serialize)]
struct StatsOut<'a> {
    reference: &'a str,
    refstd: f64,
    samples: Vec<StatsRow<'a>>,
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn write_bytes(bytes: &[u8], out: &str) -> Result<(), CliError> {
    if out == "-" {
        use std::io::Write;
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let diagram = build_diagram(&args, &text)?;

    match args.command {
        Command::Stats => {
            let out = StatsOut {
                reference: diagram.reference().name(),
                refstd: diagram.refstd(),
                samples: diagram
                    .samples()
                    .iter()
                    .map(|p| StatsRow {
                        name: &p.name,
                        correlation: p.correlation,
                        theta: p.theta,
                        stddev: p.radius,
                    })
                    .collect(),
            };
            write_json(&out, args.pretty)?;
            Ok(())
        }
        Command::Layout => {
            let renderer = HeadlessRenderer::new().with_legend(args.legend);
            let layout = renderer.layout(&diagram)?;
            write_json(&layout.to_json()?, args.pretty)?;
            Ok(())
        }
        Command::Render => {
            let mut renderer = HeadlessRenderer {
                geometry: ChartGeometry::default(),
                svg: SvgRenderOptions {
                    diagram_id: args.diagram_id.as_deref().map(sanitize_svg_id),
                    ..Default::default()
                },
                legend: args.legend,
            };
            if let Some(bg) = &args.background {
                renderer.svg.background = bg.clone();
            }
            let svg = renderer.render_svg(&diagram)?;

            let raster_options = RasterOptions {
                scale: args.raster_scale,
                background: args.background.clone().or(Some("white".to_string())),
                ..Default::default()
            };

            match args.render_format {
                RenderFormat::Svg => write_text(&svg, args.out.as_deref()),
                RenderFormat::Png => {
                    let bytes = raster::svg_to_png(&svg, &raster_options)?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(args.input.as_deref(), "png")
                            .to_string_lossy()
                            .to_string()
                    });
                    write_bytes(&bytes, &out)
                }
                RenderFormat::Jpeg => {
                    let bytes = raster::svg_to_jpeg(&svg, &raster_options)?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(args.input.as_deref(), "jpg")
                            .to_string_lossy()
                            .to_string()
                    });
                    write_bytes(&bytes, &out)
                }
                RenderFormat::Pdf => {
                    let bytes = raster::svg_to_pdf(&svg)?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(args.input.as_deref(), "pdf")
                            .to_string_lossy()
                            .to_string()
                    });
                    write_bytes(&bytes, &out)
                }
            }
        }
    }
}

fn main() {
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
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        std::iter::once("taylogram-cli")
            .chain(parts.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parse_args_defaults_to_render_svg() {
        let args = parse_args(&argv(&["data.csv"])).unwrap();
        assert!(matches!(args.command, Command::Render));
        assert!(matches!(args.render_format, RenderFormat::Svg));
        assert_eq!(args.input.as_deref(), Some("data.csv"));
    }

    #[test]
    fn parse_args_rejects_unknown_flags() {
        assert!(matches!(
            parse_args(&argv(&["--frobnicate"])),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn table_parse_reports_bad_cells() {
        let err = Table::parse("a,b\n1,2\n3,oops").unwrap_err();
        match err {
            CliError::Csv(msg) => {
                assert!(msg.contains("row 3"));
                assert!(msg.contains('b'));
            }
            other => panic!("expected Csv error, got {other:?}"),
        }
    }

    #[test]
    fn scale_and_marker_size_flags_set_diagram_options() {
        let args = parse_args(&argv(&[
            "render",
            "--scale",
            "1.5",
            "--marker-size",
            "14",
            "--raster-scale",
            "2",
            "data.csv",
        ]))
        .unwrap();
        assert_eq!(args.scale, Some(1.5));
        assert_eq!(args.marker_size, Some(14.0));
        assert_eq!(args.raster_scale, 2.0);

        let csv = "obs,m1\n1,1.1\n2,2.2\n3,2.9\n4,4.1\n5,5.2\n";
        let diagram = build_diagram(&args, csv).unwrap();
        assert_eq!(diagram.options().scale, 1.5);
        assert_eq!(diagram.options().marker_size, 14.0);
    }

    #[test]
    fn build_diagram_uses_first_column_as_reference_by_default() {
        let args = Args {
            raster_scale: 1.0,
            ..Default::default()
        };
        let csv = "obs,m1,m2\n1,1.1,0.9\n2,2.2,2.1\n3,2.9,3.2\n4,4.1,3.8\n5,5.2,5.1\n";
        let diagram = build_diagram(&args, csv).unwrap();
        assert_eq!(diagram.reference().name(), "obs");
        let names: Vec<&str> = diagram.samples().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["m1", "m2"]);
    }

    #[test]
    fn build_diagram_selects_named_columns() {
        let args = Args {
            raster_scale: 1.0,
            reference: Some("m1".to_string()),
            samples: Some(vec!["obs".to_string()]),
            ..Default::default()
        };
        let csv = "obs,m1\n1,1.1\n2,2.2\n3,2.9\n4,4.1\n5,5.2\n";
        let diagram = build_diagram(&args, csv).unwrap();
        assert_eq!(diagram.reference().name(), "m1");
        assert_eq!(diagram.samples()[0].name, "obs");
    }
}
