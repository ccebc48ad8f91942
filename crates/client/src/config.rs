//! Client configuration: defaults, an optional JSON file, then command-line
//! flags on top.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub version: String,
    /// Simulation ticks per second.
    pub tick_rate: u32,
    /// Frame pacing target for the headless surface.
    pub target_fps: u32,
    /// Close the window after this many frames. `None` runs until stopped.
    pub max_frames: Option<u64>,
    /// Directory holding `<texture>.png` files.
    pub texture_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "AbyssCraft".into(),
            version: "Alpha 0.0.1".into(),
            tick_rate: 20,
            target_fps: 60,
            max_frames: Some(600),
            texture_dir: "assets/textures/blocks".into(),
        }
    }
}

impl ClientConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Build from command-line arguments (program name already stripped).
    ///
    /// `--config <file>` is read first; `--width`, `--height`, `--title`,
    /// `--tick-rate`, `--fps`, `--frames` (0 = unlimited) and `--textures`
    /// override it.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();

        let mut config = match flag_value(&args, "--config") {
            Some(path) => Self::load(Path::new(path))?,
            None => Self::default(),
        };

        if let Some(width) = parse_flag(&args, "--width")? {
            config.width = width;
        }
        if let Some(height) = parse_flag(&args, "--height")? {
            config.height = height;
        }
        if let Some(title) = flag_value(&args, "--title") {
            config.title = title.to_string();
        }
        if let Some(rate) = parse_flag(&args, "--tick-rate")? {
            config.tick_rate = rate;
        }
        if let Some(fps) = parse_flag(&args, "--fps")? {
            config.target_fps = fps;
        }
        if let Some(frames) = parse_flag::<u64>(&args, "--frames")? {
            config.max_frames = (frames > 0).then_some(frames);
        }
        if let Some(dir) = flag_value(&args, "--textures") {
            config.texture_dir = dir.into();
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the loops cannot run with. Window dimensions are
    /// checked when the window is opened.
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate == 0 {
            bail!("tick rate must be at least 1");
        }
        if self.target_fps == 0 {
            bail!("target fps must be at least 1");
        }
        Ok(())
    }
}

/// The argument following `flag`, if the flag is present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter().skip_while(|a| *a != flag).nth(1).map(String::as_str)
}

fn parse_flag<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    flag_value(args, flag)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("invalid value {raw:?} for {flag}"))
        })
        .transpose()
}
