use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use color_eyre::Result;
use tracing::error;

static INIT: OnceLock<()> = OnceLock::new();
static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

/// Remembers this run's log file so a panic report can point at it.
pub fn set_log_file(path: &Path) {
    let _ = LOG_FILE.set(path.to_path_buf());
}

/// Panic section text. It is rendered when the panic is printed, so it picks
/// up the log file even though the hooks are installed before logging starts.
struct LogHint;

impl fmt::Display for LogHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            "This is a bug. config.xml is only ever replaced by a complete write, \
             so your bindings are unchanged since the last save.\n",
        )?;
        match LOG_FILE.get() {
            Some(path) => write!(
                f,
                "Please report it and attach the log of this run:\n{}",
                path.display()
            ),
            None => f.write_str(
                "Please report it and attach the newest log file from the logs folder.",
            ),
        }
    }
}

/// Installs the color-eyre report handler and a panic hook that gives the
/// terminal back before anything is printed.
pub fn init() -> Result<()> {
    // idempotent: wenn schon initialisiert, tue nichts
    if INIT.get().is_some() {
        return Ok(());
    }

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section(LogHint)
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .try_into_hooks()?;
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |panic_info| {
        if let Ok(mut t) = crate::tui::Tui::new() {
            if let Err(r) = t.exit() {
                error!("Unable to exit Terminal: {:?}", r);
            }
        }

        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, metadata, print_msg};
            let metadata = metadata!().support(LogHint.to_string());
            let file_path = handle_dump(&metadata, panic_info);
            // ohne Konsole bleibt nur das Log
            if print_msg(file_path, &metadata).is_err() {
                error!("human-panic: could not print the panic message");
            }
            eprintln!("{}", panic_hook.panic_report(panic_info));
        }
        let msg = format!("{}", panic_hook.panic_report(panic_info));
        error!("Error: {}", strip_ansi_escapes::strip_str(msg));

        #[cfg(debug_assertions)]
        {
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        std::process::exit(libc::EXIT_FAILURE);
    }));

    let _ = INIT.set(());
    Ok(())
}
