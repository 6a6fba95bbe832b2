// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command, ValueEnum, arg, value_parser};
use clap_complete::generate;

use crate::Cli;

#[derive(Debug, Clone, Copy)]
pub struct CmdCompletion {
    pub shell: Shell,
}

impl CmdCompletion {
    pub const NAME: &str = "completion";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Print the shell completion script")
            .hide(true)
            .arg(arg!(shell: <SHELL> "Target shell").value_parser(value_parser!(Shell)))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            shell: matches.get_one("shell").copied().unwrap_or(Shell::Bash),
        }
    }

    pub fn run(self) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "generating shell completion...");
        self.generate(&mut io::stdout());
        Ok(())
    }

    pub fn generate(self, buf: &mut impl io::Write) {
        use clap_complete::Shell as ClapShell;

        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        match self.shell {
            Shell::Bash => generate(ClapShell::Bash, &mut cmd, name, buf),
            Shell::Elvish => generate(ClapShell::Elvish, &mut cmd, name, buf),
            Shell::Fish => generate(ClapShell::Fish, &mut cmd, name, buf),
            Shell::Nushell => generate(clap_complete_nushell::Nushell, &mut cmd, name, buf),
            Shell::PowerShell => generate(ClapShell::PowerShell, &mut cmd, name, buf),
            Shell::Zsh => generate(ClapShell::Zsh, &mut cmd, name, buf),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Elvish,
    Fish,
    Nushell,
    #[clap(name = "powershell")]
    #[allow(clippy::enum_variant_names)]
    PowerShell,
    Zsh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_script_mentions_commands() {
        let matches = Cli::command()
            .try_get_matches_from(["isyourday", "completion", "bash"])
            .unwrap();
        let parsed = CmdCompletion::from(matches.subcommand_matches("completion").unwrap());
        assert_eq!(parsed.shell, Shell::Bash);

        let mut output = vec![];
        parsed.generate(&mut output);
        let script = String::from_utf8(output).unwrap();
        assert!(script.contains("isyourday"));
        assert!(script.contains("upload"));
    }

    #[test]
    fn test_parse_shell_variants() {
        let cases = [
            ("bash", Shell::Bash),
            ("elvish", Shell::Elvish),
            ("fish", Shell::Fish),
            ("nushell", Shell::Nushell),
            ("powershell", Shell::PowerShell),
            ("zsh", Shell::Zsh),
        ];
        for (name, expected) in cases {
            let matches = Cli::command()
                .try_get_matches_from(["isyourday", "completion", name])
                .unwrap_or_else(|e| panic!("Failed to parse for shell '{name}': {e}"));
            let parsed = CmdCompletion::from(matches.subcommand_matches("completion").unwrap());
            assert_eq!(parsed.shell, expected);
        }
    }
}
