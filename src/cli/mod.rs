//! Command implementations.

pub mod args;

pub use args::{Cli, Commands, DataArgs};

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use partview::config::{CONFIG_FILE, find_config_file};
use partview::view::loader::normalize_extension;
use partview::{Renderer, RendererConfig, debug, log};
use serde_json::Value;

/// How often `watch` checks for a new snapshot.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Load the config file (if any) and apply CLI overrides.
pub fn load_config(cli: &Cli) -> Result<RendererConfig> {
    let cwd = std::env::current_dir().context("cannot read current directory")?;
    let mut config = match find_config_file(&cli.config, &cwd) {
        Some(path) => {
            debug!("config"; "using {}", path.display());
            RendererConfig::from_path(&path)?
        }
        None if cli.config != Path::new(CONFIG_FILE) => {
            anyhow::bail!("config file `{}` not found", cli.config.display())
        }
        None => {
            let mut config = RendererConfig::default();
            config.resolve_paths(&cwd);
            config
        }
    };

    if let Some(components) = &cli.components {
        config.components = cwd.join(components);
    }
    if let Some(views) = &cli.views {
        config.views = cwd.join(views);
    }
    if let Some(ext) = &cli.ext {
        config.extension = normalize_extension(ext);
    }
    Ok(config)
}

/// Parse `--data` / `--data-file` into JSON (null when absent).
pub fn read_data(args: &DataArgs) -> Result<Value> {
    if let Some(inline) = &args.data {
        return serde_json::from_str(inline).context("invalid --data JSON");
    }
    if let Some(path) = &args.data_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read `{}`", path.display()))?;
        return serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in `{}`", path.display()));
    }
    Ok(Value::Null)
}

pub fn render(config: &RendererConfig, address: &str, data: &DataArgs) -> Result<()> {
    let data = read_data(data)?;
    let renderer = Renderer::from_config(config)?;

    let html = renderer.render_to_string(address, &data)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(html.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

pub fn list(config: &RendererConfig) -> Result<()> {
    let renderer = Renderer::from_config(config)?;
    let mut stdout = io::stdout().lock();
    for name in renderer.view_names() {
        writeln!(stdout, "{name}")?;
    }
    Ok(())
}

pub fn check(config: &RendererConfig) -> Result<()> {
    let renderer = Renderer::from_config(config)?;
    let count = renderer.view_names().len();
    log!("check"; "{} view{} loaded from {}",
        count, if count == 1 { "" } else { "s" }, config.views.display());
    Ok(())
}

/// Render once, then again after every successful reload, until Ctrl+C.
pub fn watch(config: &RendererConfig, address: &str, data: &DataArgs) -> Result<()> {
    let data = read_data(data)?;
    let renderer = Renderer::from_config(config)?;
    let _watcher = renderer.watch()?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))?;

    log!("watch"; "watching {} and {}", config.components.display(), config.views.display());
    let mut shown = None;
    while !shutdown.load(Ordering::SeqCst) {
        let generation = renderer.generation();
        if shown != Some(generation) {
            shown = Some(generation);
            match renderer.render_to_string(address, &data) {
                Ok(html) => {
                    println!("{html}");
                    log!("watch"; "rendered {} (generation {})", address, generation);
                }
                Err(e) => log!("error"; "{:#}", anyhow::Error::new(e)),
            }
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    log!("watch"; "stopped");
    Ok(())
}
