use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use resolvgen_config::Config;

use super::UnwrapOrExit;
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to resolvgen.toml (defaults to ./resolvgen.toml)
    #[arg(short, long, default_value = "resolvgen.toml")]
    pub config: PathBuf,

    /// Object model produced by the schema compiler
    #[arg(short, long, default_value = "model.json")]
    pub model: PathBuf,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let config = Config::from_file(&self.config).unwrap_or_exit();
        let schema = ops::load_model(&self.model)?;

        let report = ops::generate(
            &config,
            &schema,
            GenerateOptions {
                base_dir: &ops::base_dir(&self.config),
                dry_run: self.dry_run,
            },
        )?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
