use std::path::PathBuf;

use lumen_engine::device::GpuInit;
use lumen_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

use crate::Cli;

/// Largest initial window the framebuffer is scaled up to, in logical pixels.
const MAX_INITIAL_WINDOW: (u32, u32) = (1280, 960);

/// Viewer settings resolved from the command line.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub log_filter: Option<String>,
    pub vsync: bool,
    pub snapshot: Option<PathBuf>,
    pub headless: bool,
    pub keep_going: bool,
}

impl From<Cli> for ViewerConfig {
    fn from(cli: Cli) -> Self {
        let title = cli.title.unwrap_or_else(|| default_title(&cli.path));
        Self {
            path: cli.path,
            width: cli.width,
            height: cli.height,
            title,
            log_filter: cli.log_filter,
            vsync: !cli.no_vsync,
            snapshot: cli.snapshot,
            headless: cli.headless,
            keep_going: cli.keep_going,
        }
    }
}

impl ViewerConfig {
    pub fn runtime(&self) -> RuntimeConfig {
        let scale = window_scale(self.width, self.height) as f64;
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width as f64 * scale, self.height as f64 * scale),
        }
    }

    pub fn gpu_init(&self) -> GpuInit {
        GpuInit {
            present_mode: if self.vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            ..GpuInit::default()
        }
    }
}

fn default_title(path: &std::path::Path) -> String {
    match path.file_name() {
        Some(name) => format!("lumen - {}", name.to_string_lossy()),
        None => "lumen".to_string(),
    }
}

/// Integer upscale that keeps the window within `MAX_INITIAL_WINDOW`.
fn window_scale(width: u32, height: u32) -> u32 {
    let (max_w, max_h) = MAX_INITIAL_WINDOW;
    (max_w / width.max(1)).min(max_h / height.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> ViewerConfig {
        let argv = std::iter::once("lumen-viewer").chain(args.iter().copied());
        ViewerConfig::from(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn defaults() {
        let c = parse(&["models/cube.obj"]);
        assert_eq!((c.width, c.height), (320, 240));
        assert_eq!(c.title, "lumen - cube.obj");
        assert!(c.vsync);
        assert!(!c.headless);
        assert!(!c.keep_going);
        assert_eq!(c.gpu_init().present_mode, wgpu::PresentMode::Fifo);
    }

    #[test]
    fn no_vsync_selects_auto_no_vsync() {
        let c = parse(&["a.obj", "--no-vsync"]);
        assert_eq!(c.gpu_init().present_mode, wgpu::PresentMode::AutoNoVsync);
    }

    #[test]
    fn explicit_title_wins() {
        let c = parse(&["a.obj", "--title", "hello"]);
        assert_eq!(c.title, "hello");
    }

    #[test]
    fn missing_path_is_a_usage_error() {
        assert!(Cli::try_parse_from(["lumen-viewer"]).is_err());
    }

    #[test]
    fn extra_positional_is_a_usage_error() {
        assert!(Cli::try_parse_from(["lumen-viewer", "a.obj", "b.obj"]).is_err());
    }

    #[test]
    fn headless_requires_snapshot() {
        assert!(Cli::try_parse_from(["lumen-viewer", "a.obj", "--headless"]).is_err());
        let c = parse(&["a.obj", "--headless", "--snapshot", "out.png"]);
        assert!(c.headless);
    }

    #[test]
    fn zero_width_is_rejected() {
        assert!(Cli::try_parse_from(["lumen-viewer", "a.obj", "--width", "0"]).is_err());
    }

    #[test]
    fn dimensions_above_the_texture_limit_are_rejected() {
        assert!(Cli::try_parse_from(["lumen-viewer", "a.obj", "--width", "8193"]).is_err());
        assert!(Cli::try_parse_from(["lumen-viewer", "a.obj", "--height", "4294967295"]).is_err());
        let c = parse(&["a.obj", "--width", "8192", "--height", "8192"]);
        assert_eq!((c.width, c.height), (8192, 8192));
    }

    #[test]
    fn window_scale_fits_within_the_cap() {
        assert_eq!(window_scale(320, 240), 4);
        assert_eq!(window_scale(640, 480), 2);
        assert_eq!(window_scale(4000, 3000), 1);
    }

    #[test]
    fn initial_window_keeps_aspect() {
        let c = parse(&["a.obj", "--width", "100", "--height", "50"]);
        let rt = c.runtime();
        assert_eq!(rt.initial_size.width / rt.initial_size.height, 2.0);
    }
}
