use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "phpwrap",
    version,
    about = "Run PHP apps without installing PHP"
)]
pub struct Cli {
    /// Verbose output.
    #[arg(long, short)]
    pub verbose: bool,

    /// Print the resolved command instead of running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Directory holding the bundled interpreter and composer.phar.
    #[arg(long)]
    pub bundle_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run a PHP script.
    Run {
        /// Script path, relative to the current directory.
        script: PathBuf,
    },
    /// Start the built-in development server.
    Serve {
        /// Port to listen on (overrides phpwrap.json).
        #[arg(long, short)]
        port: Option<String>,
    },
    /// Run a composer command.
    #[command(disable_help_flag = true)]
    Composer {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run a Laravel artisan command (alias: artisan).
    #[command(visible_alias = "artisan", disable_help_flag = true)]
    Laravel {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run a Symfony console command.
    #[command(disable_help_flag = true)]
    Symfony {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run a CodeIgniter spark command.
    #[command(disable_help_flag = true)]
    Ci {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Create a new project in the current directory.
    Init {
        /// One of: laravel, symfony, codeigniter.
        framework: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_args_keep_leading_dashes() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["phpwrap", "composer", "install", "--no-dev"])?;
        assert_eq!(
            cli.command,
            Command::Composer {
                args: vec!["install".to_owned(), "--no-dev".to_owned()]
            }
        );
        Ok(())
    }

    #[test]
    fn artisan_is_an_alias_for_laravel() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["phpwrap", "artisan", "migrate", "--force"])?;
        assert_eq!(
            cli.command,
            Command::Laravel {
                args: vec!["migrate".to_owned(), "--force".to_owned()]
            }
        );
        Ok(())
    }

    #[test]
    fn serve_port_short_flag() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["phpwrap", "serve", "-p", "7000"])?;
        assert_eq!(
            cli.command,
            Command::Serve {
                port: Some("7000".to_owned())
            }
        );
        Ok(())
    }

    #[test]
    fn launcher_flags_go_before_the_subcommand() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["phpwrap", "-v", "--dry-run", "serve"])?;
        assert!(cli.dry_run);
        assert!(cli.verbose);
        assert_eq!(cli.command, Command::Serve { port: None });
        Ok(())
    }

    #[test]
    fn launcher_flag_names_reach_forwarded_args() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["phpwrap", "laravel", "-v"])?;
        assert!(!cli.verbose);
        assert_eq!(
            cli.command,
            Command::Laravel {
                args: vec!["-v".to_owned()]
            }
        );

        let cli = Cli::try_parse_from(["phpwrap", "symfony", "--dry-run"])?;
        assert!(!cli.dry_run);
        assert_eq!(
            cli.command,
            Command::Symfony {
                args: vec!["--dry-run".to_owned()]
            }
        );

        let cli = Cli::try_parse_from(["phpwrap", "composer", "--bundle-dir", "vendor"])?;
        assert_eq!(cli.bundle_dir, None);
        assert_eq!(
            cli.command,
            Command::Composer {
                args: vec!["--bundle-dir".to_owned(), "vendor".to_owned()]
            }
        );
        Ok(())
    }

    #[test]
    fn help_flags_are_forwarded_to_the_tool() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["phpwrap", "composer", "--help"])?;
        assert_eq!(
            cli.command,
            Command::Composer {
                args: vec!["--help".to_owned()]
            }
        );

        let cli = Cli::try_parse_from(["phpwrap", "ci", "-h"])?;
        assert_eq!(
            cli.command,
            Command::Ci {
                args: vec!["-h".to_owned()]
            }
        );

        let cli = Cli::try_parse_from(["phpwrap", "artisan", "migrate", "--help"])?;
        assert_eq!(
            cli.command,
            Command::Laravel {
                args: vec!["migrate".to_owned(), "--help".to_owned()]
            }
        );
        Ok(())
    }

    #[test]
    fn init_accepts_any_name_for_later_validation() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["phpwrap", "init", "rails"])?;
        assert_eq!(
            cli.command,
            Command::Init {
                framework: "rails".to_owned()
            }
        );
        Ok(())
    }

    #[test]
    fn run_requires_script() {
        assert!(Cli::try_parse_from(["phpwrap", "run"]).is_err());
    }
}
