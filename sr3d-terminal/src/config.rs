//! Command-line configuration.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use sr3d_core::color::rgb;
use sr3d_core::SpinningModel;

pub const USAGE: &str = "\
Usage: sr3d-terminal [OPTIONS] [MESH]

Renders MESH (.obj or .stl) in the terminal. Without MESH, or if it fails
to load, a cube is shown.

Options:
  --fps <N>             Frame rate cap [default: 30]
  --spin <RAD/S>        Turn rate about the vertical axis [default: 0.6]
  --color <RRGGBB>      Model color as hex [default: cccccc]
  --ascii               Draw with characters instead of colored half blocks
  --wireframe           Start with the edge overlay shown
  --unlit               Start with lighting disabled
  --snapshot <FILE>     Render one frame to a PPM file and exit
  --depth <FILE>        With --snapshot, also write the depth buffer as PGM
  --size <WxH>          Snapshot size in pixels [default: 320x240]
  --log <FILTER>        Log filter, e.g. `debug` or `sr3d_core=trace`
  --log-file <FILE>     Log destination while the terminal is in use
                        [default: renderer.log]
  -h, --help            Print this help

Keys: WASD/arrows rotate, E/R roll, space pause, F wireframe, L lighting,
Q or Esc quit.
";

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(AppConfig),
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub mesh: Option<PathBuf>,
    pub fps: u32,
    pub spin: f32,
    pub color: u32,
    pub ascii: bool,
    pub wireframe: bool,
    pub unlit: bool,
    pub snapshot: Option<PathBuf>,
    pub depth: Option<PathBuf>,
    pub size: (u32, u32),
    pub log_filter: Option<String>,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mesh: None,
            fps: 30,
            spin: 0.6,
            color: SpinningModel::DEFAULT_COLOR,
            ascii: false,
            wireframe: false,
            unlit: false,
            snapshot: None,
            depth: None,
            size: (320, 240),
            log_filter: None,
            log_file: PathBuf::from("renderer.log"),
        }
    }
}

impl AppConfig {
    /// Parses arguments, not including the program name.
    pub fn from_args<I>(args: I) -> Result<Command>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .with_context(|| format!("missing value for {name}"))
            };
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "--fps" => {
                    config.fps = parse_num(&value("--fps")?, "--fps")?;
                    if config.fps == 0 {
                        bail!("--fps must be at least 1");
                    }
                }
                "--spin" => config.spin = parse_num(&value("--spin")?, "--spin")?,
                "--color" => config.color = parse_color(&value("--color")?)?,
                "--ascii" => config.ascii = true,
                "--wireframe" => config.wireframe = true,
                "--unlit" => config.unlit = true,
                "--snapshot" => config.snapshot = Some(value("--snapshot")?.into()),
                "--depth" => config.depth = Some(value("--depth")?.into()),
                "--size" => config.size = parse_size(&value("--size")?)?,
                "--log" => config.log_filter = Some(value("--log")?),
                "--log-file" => config.log_file = value("--log-file")?.into(),
                flag if flag.starts_with('-') => bail!("unknown option {flag}\n\n{USAGE}"),
                path => {
                    if config.mesh.is_some() {
                        bail!("more than one mesh given: {path}");
                    }
                    config.mesh = Some(path.into());
                }
            }
        }
        if config.depth.is_some() && config.snapshot.is_none() {
            bail!("--depth requires --snapshot");
        }
        Ok(Command::Run(config))
    }
}

fn parse_num<T: std::str::FromStr>(s: &str, name: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.parse()
        .with_context(|| format!("invalid value for {name}: {s}"))
}

/// `RRGGBB`, with or without a leading `#`.
fn parse_color(s: &str) -> Result<u32> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        bail!("invalid color {s}, expected RRGGBB");
    }
    let v = u32::from_str_radix(hex, 16).with_context(|| format!("invalid color {s}"))?;
    let [_, r, g, b] = v.to_be_bytes();
    Ok(rgb(r, g, b))
}

/// `WIDTHxHEIGHT`, both non-zero.
fn parse_size(s: &str) -> Result<(u32, u32)> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("invalid size {s}, expected WxH"))?;
    let size = (parse_num(w, "--size")?, parse_num(h, "--size")?);
    if size.0 == 0 || size.1 == 0 {
        bail!("invalid size {s}, both dimensions must be non-zero");
    }
    Ok(size)
}
