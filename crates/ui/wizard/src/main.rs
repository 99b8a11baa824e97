use std::io;

use app::AppBuilder;
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use keymap::ClientConfig;
use locator::{resolve_installation, FilePathStore, PathStore, ResolveError};
use tracing::{info, warn};
use w101_keys::{
    cli::Cli, config::Config, editor::EditorApp, errors, prompts::TerminalPrompter, tui::Tui,
    KeysApp,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    let cli = Cli::parse();
    errors::init()?;

    let config = Config::new(cli.config.as_deref())?.with_cli(&cli);
    let context = AppBuilder::<KeysApp>::new(VERSION, config.log_level.as_deref())
        .map_err(|e| eyre!("could not initialize logging: {e}"))?
        .build();
    errors::set_log_file(&context.log_file);

    let mut store = FilePathStore::new(
        context
            .path_context()
            .path_cache_file(Some(config.cache_file.as_path())),
    );
    if cli.forget_path {
        if let Err(e) = store.clear() {
            warn!(error = %e, "could not clear the remembered path");
        }
    }

    let mut tui = Tui::new()?;
    let resolved = {
        let mut prompter = TerminalPrompter::new(&mut tui, config.tick_rate());
        resolve_installation(
            &config.resolver_options(cli.install_dir.clone()),
            &mut store,
            &mut prompter,
        )
    };
    let install = match resolved {
        Ok(resolved) => {
            info!(
                dir = %resolved.install.dir().display(),
                source = ?resolved.source,
                "installation found"
            );
            resolved.install
        }
        Err(ResolveError::NotFound) => {
            tui.exit()?;
            println!("{}", ResolveError::NotFound);
            return Ok(());
        }
        Err(ResolveError::Interaction(e)) if e.kind() == io::ErrorKind::Interrupted => {
            tui.exit()?;
            info!("installation lookup cancelled");
            println!("Cancelled.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // a malformed document ends the run with a report
    let client = ClientConfig::load(&install)?;
    if client.records().is_empty() {
        tui.exit()?;
        warn!(path = %client.path().display(), "no editable records");
        println!("No valid records found in XML.");
        return Ok(());
    }

    tui.enter()?;
    let mut editor = EditorApp::new(client, config.protection());
    let result = editor.run(&mut *tui, config.tick_rate());
    tui.exit()?;
    result?;

    info!(log = %context.log_file.display(), "editor closed");
    Ok(())
}
