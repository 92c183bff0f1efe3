//! Generates the Icinga2 `CheckCommand` object for this check straight from its clap
//! definition, so the monitoring config never drifts from the real flags.

pub struct CommandDescription {
    arguments: Vec<ArgumentDescription>,
}

pub struct ArgumentDescription {
    flag: String,
    var: String,
    description: Option<String>,
    is_flag: bool,
    default_value: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ToIcingaCommandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid executable path")]
    InvalidExecutablePath,
    #[error("error converting to command description: {0}")]
    CommandDescriptionFromError(#[from] CommandDescriptionFromError),
}

impl CommandDescription {
    /// Renders the CheckCommand `name` running `command`. Custom variables are named
    /// `<name>_<long flag>`.
    pub fn to_icinga_command(&self, name: &str, command: &str) -> String {
        let prefix = name.replace('-', "_");
        let mut out = format!("object CheckCommand \"{name}\" {{\n");

        out.push_str(&format!("  command = [ \"{}\" ]\n", escape_string(command)));
        out.push_str("  arguments = {\n");
        for arg in &self.arguments {
            out.push_str(&format!("    \"{}\" = {{\n", arg.flag));

            if arg.is_flag {
                out.push_str(&format!("      set_if = \"${}_{}$\"\n", prefix, arg.var));
            } else {
                out.push_str(&format!("      value = \"${}_{}$\"\n", prefix, arg.var));
            }

            if let Some(description) = &arg.description {
                out.push_str(&format!(
                    "      description = \"{}\"\n",
                    escape_string(description)
                ));
            }

            out.push_str("    }\n");
        }
        out.push_str("  }\n");

        let defaults: Vec<_> = self
            .arguments
            .iter()
            .filter_map(|arg| arg.default_value.as_ref().map(|v| (arg, v)))
            .collect();
        if !defaults.is_empty() {
            out.push('\n');
        }
        for (arg, default_value) in defaults {
            out.push_str(&format!(
                "  vars.{}_{} = \"{}\"\n",
                prefix,
                arg.var,
                escape_string(default_value)
            ));
        }

        out.push_str("}\n");
        out
    }
}

fn escape_string(s: &str) -> String {
    ["\"", "$"]
        .iter()
        .fold(s.to_string(), |acc, c| acc.replace(c, &format!("\\{}", c)))
}

#[derive(Debug, thiserror::Error)]
pub enum CommandDescriptionFromError {
    #[error("missing long argument for {0}")]
    MissingLongArgument(String),
}

impl TryFrom<&clap::Command> for CommandDescription {
    type Error = CommandDescriptionFromError;

    fn try_from(cmd: &clap::Command) -> Result<Self, Self::Error> {
        let mut arguments = Vec::new();

        for arg in cmd.get_arguments().filter(|arg| !arg.is_hide_set()) {
            let long = arg.get_long().ok_or_else(|| {
                CommandDescriptionFromError::MissingLongArgument(arg.get_id().to_string())
            })?;

            let description = arg.get_help().map(|s| s.to_string());
            let is_flag = !arg.get_action().takes_values();

            let default_value = arg
                .get_default_values()
                .first()
                .and_then(|v| v.to_str())
                .map(|s| s.to_string());

            arguments.push(ArgumentDescription {
                flag: format!("--{long}"),
                var: long.replace('-', "_"),
                description,
                is_flag,
                default_value,
            });
        }

        Ok(CommandDescription { arguments })
    }
}

/// Print the Icinga command configuration for `cmd`, pointing at the running executable.
pub fn print_icinga_command_config(
    name: &str,
    cmd: &clap::Command,
) -> Result<(), ToIcingaCommandError> {
    let current_exe = std::env::current_exe()?
        .to_str()
        .ok_or(ToIcingaCommandError::InvalidExecutablePath)?
        .to_owned();

    let description = CommandDescription::try_from(cmd)?;
    println!("{}", description.to_icinga_command(name, &current_exe).trim());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::cli::Cli;

    #[test]
    fn test_check_command_from_cli() {
        let description = CommandDescription::try_from(&Cli::command()).unwrap();
        let out = description.to_icinga_command("check-ups", "/usr/lib/nagios/plugins/check_ups");

        assert!(out.starts_with("object CheckCommand \"check-ups\" {\n"));
        assert!(out.contains("  command = [ \"/usr/lib/nagios/plugins/check_ups\" ]\n"));
        assert!(out.contains("    \"--host\" = {\n      value = \"$check_ups_host$\"\n"));
        assert!(out.contains("      description = \"Host address of the UPS\"\n"));
        assert!(out.contains("    \"--unknown-on-error\" = {\n      set_if = \"$check_ups_unknown_on_error$\"\n"));
        assert!(out.contains("  vars.check_ups_community = \"public\"\n"));
        assert!(out.contains("  vars.check_ups_timeout = \"5\"\n"));
        assert!(!out.contains("print-icinga-command"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_missing_long_argument() {
        let cmd = clap::Command::new("x").arg(clap::Arg::new("positional"));
        assert!(matches!(
            CommandDescription::try_from(&cmd),
            Err(CommandDescriptionFromError::MissingLongArgument(_))
        ));
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("say \"hi\" $user"), "say \\\"hi\\\" \\$user");
    }
}
