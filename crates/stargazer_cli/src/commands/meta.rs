//! Shell completion generation.

use clap::CommandFactory;

use crate::Cli;

/// Generate completions for the given shell on stdout.
pub fn handle_completions(shell: clap_complete::Shell) -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
