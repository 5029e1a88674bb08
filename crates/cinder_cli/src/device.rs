//! Device selection and diagnostic rendering shared by every subcommand.

use std::path::Path;

use cinder_arch::{Arch, ArchArgs};
use cinder_config::{load_config, load_config_file, CONFIG_FILE_NAME};
use cinder_diagnostics::{DiagnosticRenderer, TerminalRenderer};

use crate::{DeviceArgs, GlobalArgs};

/// Resolves the device arguments: explicit flags first, then the config file
/// named by `--config`, then a `cinder.toml` in the current directory.
pub fn resolve_args(device: &DeviceArgs, global: &GlobalArgs) -> Result<ArchArgs, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => Some(load_config_file(Path::new(path))?),
        None if Path::new(CONFIG_FILE_NAME).is_file() => Some(load_config(Path::new("."))?),
        None => None,
    };
    let mut args = config.as_ref().map(ArchArgs::from_config).unwrap_or_default();
    if let Some(part) = &device.part {
        args.device = part.clone();
        args.grid = None;
    } else if let Some(grid) = device.grid {
        args.grid = Some(grid);
    } else if config.is_none() {
        return Err(format!("no device selected: pass --part or --grid, or provide {CONFIG_FILE_NAME}").into());
    }
    args.debug |= global.verbose;
    Ok(args)
}

/// Builds the device model and reports what construction logged.
pub fn load(device: &DeviceArgs, global: &GlobalArgs) -> Result<Arch, Box<dyn std::error::Error>> {
    let args = resolve_args(device, global)?;
    let arch = Arch::new(args)?;
    render_diagnostics(&arch, global);
    Ok(arch)
}

/// Drains the model's diagnostics to stderr, filtered by `--quiet` and
/// `--verbose`, then prints the error and warning tally.
pub fn render_diagnostics(arch: &Arch, global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in arch.diagnostics.take_all() {
        if diag.severity.is_shown(global.quiet, global.verbose) {
            eprint!("{}", renderer.render(&diag));
        }
    }
    if let Some(summary) = arch.diagnostics.summary() {
        if !global.quiet {
            eprintln!("{}: {summary}", arch.chip_name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: false,
            verbose: false,
            color: false,
            config,
        }
    }

    #[test]
    fn flags_select_the_device() {
        let device = DeviceArgs {
            part: None,
            grid: Some((6, 4)),
        };
        let args = resolve_args(&device, &global(None)).unwrap();
        assert_eq!(args.grid, Some((6, 4)));
        assert!(!args.debug);
    }

    #[test]
    fn config_file_with_part_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.toml");
        std::fs::write(
            &path,
            "[device]\ngrid = [5, 3]\n\n[options]\ndebug = true\n\n[io.\"led[0]\"]\nPIN = \"PIN_L1\"\n",
        )
        .unwrap();
        let global = global(Some(path.display().to_string()));

        let args = resolve_args(&DeviceArgs::default(), &global).unwrap();
        assert_eq!(args.grid, Some((5, 3)));
        assert!(args.debug);
        assert!(args.io_attr.contains_key("led[0]"));

        let device = DeviceArgs {
            part: Some("5CEBA2F17C8".to_string()),
            grid: None,
        };
        let args = resolve_args(&device, &global).unwrap();
        assert_eq!(args.grid, None);
        assert_eq!(args.device, "5CEBA2F17C8");
        assert!(args.io_attr.contains_key("led[0]"));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let global = global(Some("/nonexistent/cinder.toml".to_string()));
        let err = resolve_args(&DeviceArgs::default(), &global).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn load_builds_the_model() {
        let device = DeviceArgs {
            part: None,
            grid: Some((4, 3)),
        };
        let arch = load(&device, &global(None)).unwrap();
        assert_eq!(arch.labs().len(), 5);
        assert!(arch.diagnostics.diagnostics().is_empty());
    }
}
