use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use resolvgen_config::Config;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to resolvgen.toml (defaults to ./resolvgen.toml)
    #[arg(short, long, default_value = "resolvgen.toml")]
    pub config: PathBuf,

    /// Object model to validate alongside the config
    #[arg(short, long)]
    pub model: Option<PathBuf>,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let config = Config::from_file(&self.config).unwrap_or_exit();
        let schema = self.model.as_deref().map(ops::load_model).transpose()?;

        let report = ops::check(
            &config,
            &self.config,
            schema.as_ref(),
            &ops::base_dir(&self.config),
        )?;
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
