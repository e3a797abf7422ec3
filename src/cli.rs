use clap::Parser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: String,
    pub server_args: Vec<String>,
    pub interpreter: Option<String>,
    pub verbose: u8,
}

impl Config {
    /// Program and arguments used to launch the wrapped server.
    pub fn command_line(&self) -> (String, Vec<String>) {
        match &self.interpreter {
            Some(interpreter) => {
                let mut args = Vec::with_capacity(self.server_args.len() + 1);
                args.push(self.server.clone());
                args.extend(self.server_args.iter().cloned());
                (interpreter.clone(), args)
            }
            None => (self.server.clone(), self.server_args.clone()),
        }
    }

    /// Default log filter for the verbosity level; `RUST_LOG` takes precedence.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lsp_shim", version)]
#[command(
    about = "Stdio proxy that repairs Windows URIs and logMessage payloads between an LSP client and server",
    long_about = None
)]
pub struct Cli {
    /// Server entry point followed by arguments forwarded verbatim
    #[arg(
        value_name = "SERVER [ARGS]",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,

    /// Runtime used to launch SERVER (e.g. `node`)
    #[arg(long, env = "LSP_SHIM_INTERPRETER")]
    interpreter: Option<String>,

    /// Verbose logging to stderr (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    pub fn into_config(self) -> Config {
        let mut command = self.command.into_iter();
        Config {
            server: command.next().unwrap_or_default(),
            server_args: command.collect(),
            interpreter: self.interpreter.filter(|s| !s.is_empty()),
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        Cli::try_parse_from(args.iter().copied()).map(Cli::into_config)
    }

    #[test]
    fn server_and_args_are_split() {
        let config = parse(&["lsp_shim", "server.js", "--stdio", "-v", "x"]).unwrap();
        assert_eq!(config.server, "server.js");
        assert_eq!(config.server_args, vec!["--stdio", "-v", "x"]);
        assert_eq!(config.verbose, 0);
    }

    #[test]
    fn own_flags_before_server() {
        let config = parse(&["lsp_shim", "-vv", "--interpreter", "node", "main.js"]).unwrap();
        assert_eq!(config.verbose, 2);
        assert_eq!(config.log_filter(), "debug");
        assert_eq!(
            config.command_line(),
            ("node".to_string(), vec!["main.js".to_string()])
        );
    }

    #[test]
    fn without_interpreter_server_is_the_program() {
        let config = parse(&["lsp_shim", "marksman", "server"]).unwrap();
        assert_eq!(
            config.command_line(),
            ("marksman".to_string(), vec!["server".to_string()])
        );
    }

    #[test]
    fn missing_server_is_a_usage_error() {
        let err = parse(&["lsp_shim"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(err.use_stderr());
    }
}
