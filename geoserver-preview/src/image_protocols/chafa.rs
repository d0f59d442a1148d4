// ABOUTME: chafa-backed render tiers for kitty graphics and colour symbol output
// ABOUTME: Writes the map to a temporary PNG and asks chafa to draw it at the grid size

use super::helper::{HelperRunner, printable_output};
use super::{GridSize, ImageProtocol};
use crate::constants::helpers;
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChafaMode {
    /// Kitty graphics escape sequences in full RGB
    Kitty,
    /// Unicode symbols with truecolor, used when kitty output fails
    Symbols,
    /// chafa's own format choice
    Color,
}

pub struct ChafaProtocol {
    mode: ChafaMode,
    runner: Arc<dyn HelperRunner>,
}

impl ChafaProtocol {
    pub fn new(mode: ChafaMode, runner: Arc<dyn HelperRunner>) -> Self {
        Self { mode, runner }
    }

    fn args(&self, grid: GridSize, file: &str) -> Vec<String> {
        let mut args = Vec::new();
        match self.mode {
            ChafaMode::Kitty => args.extend(["--format".to_string(), "kitty".to_string()]),
            ChafaMode::Symbols => args.extend(["--format".to_string(), "symbols".to_string()]),
            ChafaMode::Color => {}
        }
        args.extend([
            "--size".to_string(),
            grid.as_size_arg(),
            "--colors".to_string(),
            "full".to_string(),
        ]);
        if self.mode == ChafaMode::Kitty {
            args.extend(["--color-space".to_string(), "rgb".to_string()]);
        }
        args.push(file.to_string());
        args
    }
}

impl ImageProtocol for ChafaProtocol {
    fn name(&self) -> &'static str {
        match self.mode {
            ChafaMode::Kitty => "chafa-kitty",
            ChafaMode::Symbols => "chafa-symbols",
            ChafaMode::Color => "chafa",
        }
    }

    fn render_image(&self, data: &[u8], grid: GridSize) -> Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("gspreview-")
            .suffix(".png")
            .tempfile()
            .context("Failed to create temporary image file")?;
        file.write_all(data)
            .and_then(|_| file.flush())
            .context("Failed to write temporary image file")?;

        let path = file.path().to_string_lossy().to_string();
        let output = self
            .runner
            .run(helpers::CHAFA, &self.args(grid, &path), None)?;

        printable_output(helpers::CHAFA, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_protocols::helper::fake::FakeRunner;

    const GRID: GridSize = GridSize { cols: 96, rows: 32 };

    fn last_args(runner: &FakeRunner) -> Vec<String> {
        runner.calls.lock().unwrap().last().unwrap().1.clone()
    }

    #[test]
    fn test_kitty_mode_arguments() {
        let runner = Arc::new(FakeRunner::default().respond("kitty", Ok("\x1b_Ga=T;AAAA\x1b\\")));
        let protocol = ChafaProtocol::new(ChafaMode::Kitty, runner.clone());

        let frame = protocol.render_image(b"png", GRID).unwrap();
        assert!(frame.starts_with("\x1b_G"));

        let args = last_args(&runner);
        assert_eq!(
            args[..8].to_vec(),
            vec![
                "--format",
                "kitty",
                "--size",
                "96x32",
                "--colors",
                "full",
                "--color-space",
                "rgb"
            ]
        );
        assert!(args[8].ends_with(".png"));
    }

    #[test]
    fn test_symbols_mode_arguments() {
        let runner = Arc::new(FakeRunner::default().respond("symbols", Ok("##")));
        let protocol = ChafaProtocol::new(ChafaMode::Symbols, runner.clone());

        protocol.render_image(b"png", GRID).unwrap();
        let args = last_args(&runner);
        assert_eq!(
            args[..6].to_vec(),
            vec!["--format", "symbols", "--size", "96x32", "--colors", "full"]
        );
        assert_eq!(args.len(), 7);
    }

    #[test]
    fn test_color_mode_arguments() {
        let runner = Arc::new(FakeRunner::default().respond("chafa", Ok("##")));
        let protocol = ChafaProtocol::new(ChafaMode::Color, runner.clone());

        protocol.render_image(b"png", GRID).unwrap();
        let args = last_args(&runner);
        assert_eq!(args[..4].to_vec(), vec!["--size", "96x32", "--colors", "full"]);
        assert_eq!(args.len(), 5);
    }

    #[test]
    fn test_image_is_written_to_temp_file() {
        let runner = Arc::new(FakeRunner::default().respond("chafa", Ok("##")));
        let protocol = ChafaProtocol::new(ChafaMode::Color, runner.clone());

        protocol.render_image(b"png bytes", GRID).unwrap();
        let path = last_args(&runner).pop().unwrap();
        assert!(path.contains("gspreview-"));
        // Removed once the render finishes
        assert!(!std::path::Path::new(&path).exists());
    }

    #[test]
    fn test_empty_output_is_an_error() {
        let runner = Arc::new(FakeRunner::default().respond("chafa", Ok("")));
        let protocol = ChafaProtocol::new(ChafaMode::Color, runner);
        assert!(protocol.render_image(b"png", GRID).is_err());
    }

    #[test]
    fn test_helper_failure_is_an_error() {
        let runner = Arc::new(FakeRunner::default().respond("kitty", Err("chafa exited with 1")));
        let protocol = ChafaProtocol::new(ChafaMode::Kitty, runner);
        let err = protocol.render_image(b"png", GRID).unwrap_err();
        assert_eq!(err.to_string(), "chafa exited with 1");
    }
}
