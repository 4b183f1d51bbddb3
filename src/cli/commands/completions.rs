//! `fieldseal completions`: generate shell completion scripts.
//!
//! Usage:
//!   fieldseal completions bash > ~/.bash_completion.d/fieldseal
//!   fieldseal completions zsh
//!   fieldseal completions fish

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::cli::{Cli, Commands};
    use clap_complete::Shell;

    fn parse_shell(name: &str) -> Option<Shell> {
        match Cli::try_parse_from(["fieldseal", "completions", name]) {
            Ok(Cli {
                command: Commands::Completions { shell },
                ..
            }) => Some(shell),
            _ => None,
        }
    }

    #[test]
    fn accepts_supported_shells() {
        assert_eq!(parse_shell("bash"), Some(Shell::Bash));
        assert_eq!(parse_shell("zsh"), Some(Shell::Zsh));
        assert_eq!(parse_shell("fish"), Some(Shell::Fish));
        assert_eq!(parse_shell("powershell"), Some(Shell::PowerShell));
        assert_eq!(parse_shell("elvish"), Some(Shell::Elvish));
    }

    #[test]
    fn rejects_unknown_shell() {
        assert_eq!(parse_shell("csh"), None);
    }
}
