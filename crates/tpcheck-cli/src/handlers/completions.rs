//! Shell completions command handler

use crate::cli::{Cli, CompletionsArgs};
use crate::error::Result;
use clap::CommandFactory;
use std::io::Write;

/// Print a completion script for the requested shell
pub fn handle_completions(args: CompletionsArgs, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    clap_complete::generate(args.shell.to_clap_shell(), &mut cmd, bin_name, out);
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Shell;

    #[test]
    fn test_scripts_mention_subcommands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
            let mut buffer = Vec::new();
            handle_completions(CompletionsArgs { shell }, &mut buffer).unwrap();
            let script = String::from_utf8(buffer).unwrap();
            assert!(script.contains("tpcheck"), "{:?}", shell);
            assert!(script.contains("validate"), "{:?}", shell);
        }
    }
}
