//! LithoLicht preview binary.
//!
//! Loads config, seeds the scene from CLI selections, and hands control to
//! the winit event loop; see [`app::PreviewApp`] for everything after
//! startup.
//!
//! Run with `cargo run -p litho-app -- --image photo.png --product sphere`.

mod app;
mod input;
mod renderer;

use clap::Parser;
use litho_catalog::Catalog;
use litho_config::{CliArgs, Config};
use litho_mesh::ProductKind;
use litho_scene::Command;
use tracing::warn;

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(|| {
        litho_config::default_config_dir().expect("Failed to resolve config directory")
    });

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    litho_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let catalog = Catalog::demo();
    let startup = startup_commands(&args, &catalog);
    app::run(config, catalog, startup);
}

/// Resolves CLI selections against the catalog into startup commands.
///
/// Selections that match nothing are dropped with a warning; the preview
/// still opens on the catalog defaults.
fn startup_commands(args: &CliArgs, catalog: &Catalog) -> Vec<Command> {
    let mut commands = Vec::new();

    if let Some(tag) = &args.product {
        match tag.parse::<ProductKind>() {
            Ok(kind) => match input::product_of_kind(catalog, kind) {
                Some(id) => commands.push(Command::SelectProduct(id)),
                None => warn!("--product: no catalog product renders as \"{kind}\""),
            },
            Err(error) => warn!("--product: {error}"),
        }
    }

    if let Some(size) = &args.size {
        // Sizes belong to the product picked above, or to the default
        // first product when none was.
        let product = commands
            .iter()
            .find_map(|command| match command {
                Command::SelectProduct(id) => catalog.get(*id),
                _ => None,
            })
            .or_else(|| catalog.products().first());
        match product.and_then(|p| p.variants.iter().find(|v| v.size == *size)) {
            Some(variant) => commands.push(Command::SelectVariant(variant.id)),
            None => warn!("--size: no variant sized \"{size}\""),
        }
    }

    if let Some(path) = &args.image {
        commands.push(Command::LoadImage(path.clone()));
    }

    commands
}
