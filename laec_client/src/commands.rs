//! Command-line and shell command parsing.

use laec::auth::Role;
use pico_args::Arguments;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No command given.
    MissingCommand,
    /// Unrecognized command.
    UnrecognizedCommand(String),
    /// Required option not given.
    MissingOption(&'static str),
    /// Option or argument value could not be parsed.
    InvalidValue { option: &'static str, value: String },
    /// Leftover arguments after parsing.
    UnexpectedArguments(Vec<String>),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCommand => write!(f, "No command given. Use --help to see commands"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Use --help to see commands",
                cmd
            ),
            Self::MissingOption(option) => write!(f, "Missing required option {}", option),
            Self::InvalidValue { option, value } => {
                write!(f, "Invalid value '{}' for {}", value, option)
            }
            Self::UnexpectedArguments(args) => {
                write!(f, "Unexpected arguments: {}", args.join(" "))
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Registration details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterArgs {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub role: Role,
    pub curso: Option<String>,
    pub periodo: Option<String>,
    pub telefone: Option<String>,
}

/// Top-level commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login {
        username: Option<String>,
        password: Option<String>,
        remember: bool,
    },
    Register(RegisterArgs),
    Logout,
    Whoami,
    Open { path: String },
    Turmas { ano: Option<i32> },
    Grupos { turma: i64 },
    Prioridade { turma: i64 },
    Aulas { turma: i64 },
    Usuarios { tipo: Option<Role> },
    Shell,
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub api_url: Option<String>,
    pub storage: Option<PathBuf>,
    pub command: Command,
}

fn map_err(option: &'static str) -> impl Fn(pico_args::Error) -> ParseError {
    move |e| match e {
        pico_args::Error::MissingOption(_) | pico_args::Error::MissingArgument => {
            ParseError::MissingOption(option)
        }
        pico_args::Error::Utf8ArgumentParsingFailed { value, .. }
        | pico_args::Error::ArgumentParsingFailed { cause: value } => {
            ParseError::InvalidValue { option, value }
        }
        other => ParseError::InvalidValue {
            option,
            value: other.to_string(),
        },
    }
}

fn required<T>(args: &mut Arguments, option: &'static str) -> Result<T, ParseError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    args.value_from_str(option).map_err(map_err(option))
}

fn optional<T>(args: &mut Arguments, option: &'static str) -> Result<Option<T>, ParseError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    args.opt_value_from_str(option).map_err(map_err(option))
}

/// Parse the command line (without the program name).
///
/// # Examples
///
/// ```
/// use laec_client::commands::{Command, parse_args};
///
/// let args = ["aulas", "--turma", "4"].map(std::ffi::OsString::from).to_vec();
/// let cli = parse_args(pico_args::Arguments::from_vec(args)).unwrap();
/// assert_eq!(cli.command, Command::Aulas { turma: 4 });
/// ```
pub fn parse_args(mut args: Arguments) -> Result<Cli, ParseError> {
    let api_url = optional(&mut args, "--api")?;
    let storage = optional::<String>(&mut args, "--storage")?.map(PathBuf::from);

    let name = args
        .subcommand()
        .map_err(map_err("COMMAND"))?
        .ok_or(ParseError::MissingCommand)?;

    let command = match name.as_str() {
        "login" => Command::Login {
            username: optional(&mut args, "--username")?,
            password: optional(&mut args, "--password")?,
            remember: args.contains("--remember"),
        },
        "register" => Command::Register(RegisterArgs {
            name: required(&mut args, "--nome")?,
            email: required(&mut args, "--email")?,
            password: optional(&mut args, "--password")?,
            role: optional(&mut args, "--tipo")?.unwrap_or(Role::Aluno),
            curso: optional(&mut args, "--curso")?,
            periodo: optional(&mut args, "--periodo")?,
            telefone: optional(&mut args, "--telefone")?,
        }),
        "logout" => Command::Logout,
        "whoami" => Command::Whoami,
        "open" => Command::Open {
            path: args
                .free_from_str()
                .map_err(map_err("PATH"))?,
        },
        "turmas" => Command::Turmas {
            ano: optional(&mut args, "--ano")?,
        },
        "grupos" => Command::Grupos {
            turma: required(&mut args, "--turma")?,
        },
        "prioridade" => Command::Prioridade {
            turma: required(&mut args, "--turma")?,
        },
        "aulas" => Command::Aulas {
            turma: required(&mut args, "--turma")?,
        },
        "usuarios" => Command::Usuarios {
            tipo: optional(&mut args, "--tipo")?,
        },
        "shell" => Command::Shell,
        other => return Err(ParseError::UnrecognizedCommand(other.to_string())),
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        return Err(ParseError::UnexpectedArguments(
            remaining
                .into_iter()
                .map(|arg: OsString| arg.to_string_lossy().into_owned())
                .collect(),
        ));
    }

    Ok(Cli {
        api_url,
        storage,
        command,
    })
}

/// Commands typed at the interactive shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Empty line: activity only
    Noop,
    Open(String),
    /// Stay signed in
    Extend,
    Whoami,
    Logout,
    Help,
    Quit,
}

/// Parse one shell line
///
/// # Examples
///
/// ```
/// use laec_client::commands::{ShellCommand, parse_shell_line};
///
/// assert_eq!(parse_shell_line("open /sessoes"), Ok(ShellCommand::Open("/sessoes".to_string())));
/// assert_eq!(parse_shell_line(""), Ok(ShellCommand::Noop));
/// ```
pub fn parse_shell_line(line: &str) -> Result<ShellCommand, ParseError> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(ShellCommand::Noop);
    };

    let command = match command.to_lowercase().as_str() {
        "open" | "go" => ShellCommand::Open(
            parts
                .next()
                .ok_or(ParseError::MissingOption("PATH"))?
                .to_string(),
        ),
        "extend" | "continue" => ShellCommand::Extend,
        "whoami" => ShellCommand::Whoami,
        "logout" => ShellCommand::Logout,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(ParseError::UnrecognizedCommand(other.to_string())),
    };

    let extra: Vec<String> = parts.map(str::to_string).collect();
    if !extra.is_empty() {
        return Err(ParseError::UnexpectedArguments(extra));
    }
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, ParseError> {
        parse_args(Arguments::from_vec(
            args.iter().map(OsString::from).collect(),
        ))
    }

    #[test]
    fn test_parse_login() {
        let cli = parse(&["--api", "http://laec:8080", "login", "--username", "ana", "--remember"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://laec:8080"));
        assert_eq!(
            cli.command,
            Command::Login {
                username: Some("ana".to_string()),
                password: None,
                remember: true,
            }
        );
    }

    #[test]
    fn test_parse_register_defaults_to_aluno() {
        let cli = parse(&["register", "--nome", "Bruno", "--email", "b@laec.edu"]).unwrap();
        match cli.command {
            Command::Register(args) => {
                assert_eq!(args.role, Role::Aluno);
                assert_eq!(args.email, "b@laec.edu");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_open_and_lookup_commands() {
        assert_eq!(
            parse(&["open", "/sessoes"]).unwrap().command,
            Command::Open {
                path: "/sessoes".to_string()
            }
        );
        assert_eq!(
            parse(&["prioridade", "--turma", "7"]).unwrap().command,
            Command::Prioridade { turma: 7 }
        );
        assert_eq!(
            parse(&["usuarios", "--tipo", "Monitor"]).unwrap().command,
            Command::Usuarios {
                tipo: Some(Role::Monitor)
            }
        );
        assert_eq!(parse(&["turmas"]).unwrap().command, Command::Turmas { ano: None });
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(&[]), Err(ParseError::MissingCommand));
        assert_eq!(
            parse(&["dance"]),
            Err(ParseError::UnrecognizedCommand("dance".to_string()))
        );
        assert_eq!(
            parse(&["grupos"]),
            Err(ParseError::MissingOption("--turma"))
        );
        assert!(matches!(
            parse(&["aulas", "--turma", "quatro"]),
            Err(ParseError::InvalidValue { option: "--turma", .. })
        ));
        assert!(matches!(
            parse(&["whoami", "extra"]),
            Err(ParseError::UnexpectedArguments(_))
        ));
    }

    #[test]
    fn test_parse_shell_lines() {
        assert_eq!(parse_shell_line("   "), Ok(ShellCommand::Noop));
        assert_eq!(parse_shell_line("EXTEND"), Ok(ShellCommand::Extend));
        assert_eq!(parse_shell_line("quit"), Ok(ShellCommand::Quit));
        assert_eq!(
            parse_shell_line("open"),
            Err(ParseError::MissingOption("PATH"))
        );
        assert!(parse_shell_line("open /a /b").is_err());
        assert!(parse_shell_line("fly").is_err());
    }
}
