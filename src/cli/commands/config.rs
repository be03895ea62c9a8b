use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{error, success};

use crate::cli::parser::Commands;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        // ---- PRINT CONFIG ----
        if *print_config {
            println!("📄 Current configuration:\n");
            println!("{}", serde_yaml::to_string(&cfg).unwrap_or_default());

            match cfg.load_policy() {
                Ok(policy) => {
                    println!("📄 Attendance policy:\n");
                    println!("{}", serde_yaml::to_string(&policy).unwrap_or_default());
                }
                Err(e) => error(format!("Policy not loadable: {e}")),
            }
        }

        // ---- CHECK POLICY ----
        if *check {
            match cfg.load_policy() {
                Ok(_) => success("Attendance policy is valid."),
                Err(e) => {
                    error(format!("Attendance policy is invalid: {e}"));
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
