use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cr-unblocker")]
#[command(about = "Obtain a US session for crunchyroll and re-login the saved user")]
pub struct CliConfig {
    /// 網域後綴，例如 ".com"
    #[arg(long, default_value = ".com")]
    pub extension: String,

    #[arg(long, help = "TOML configuration file (defaults are used when omitted)")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "./preferences.json")]
    pub preferences: PathBuf,

    #[arg(long, default_value = "./cookies.json")]
    pub cookies: PathBuf,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}
