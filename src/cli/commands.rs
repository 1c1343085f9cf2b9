use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "costrelay", version, about = "Cloud cost and Defender plan relay for subscription dashboards")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP relay
    Serve(ServeArgs),
    /// Verify credentials by acquiring a token and listing subscriptions
    Check(CheckArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long, default_value = "3001")]
    pub port: u16,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
}

#[derive(Args, Clone)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["costrelay", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, 3001);
                assert_eq!(args.host, "0.0.0.0");
            }
            _ => panic!("expected serve"),
        }
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["costrelay", "check", "--json", "-vv", "--no-color"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
        assert!(matches!(cli.command, Commands::Check(CheckArgs { json: true })));
    }
}
