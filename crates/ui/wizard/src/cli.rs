use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    name = "w101-keys",
    version,
    about = "Edit the Wizard101 client's keybindings (config.xml)"
)]
pub struct Cli {
    /// Wizard101 `Bin` folder; skips the lookup entirely
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Where the full-drive search starts
    #[arg(long, value_name = "DIR")]
    pub scan_root: Option<PathBuf>,

    /// Read settings from this TOML file instead of the default location
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Leave config.xml read-only after every save
    #[arg(long)]
    pub lock_after_save: bool,

    /// Forget the remembered installation folder before starting
    #[arg(long)]
    pub forget_path: bool,
}
