use clap::Parser;
use dof_forms::cli::commands::{cmd_clear_cache, cmd_inspect, cmd_notifications, cmd_replay};
use dof_forms::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Replay {
            page,
            script,
            session_file,
            format,
            output,
        } => {
            let all_passed = cmd_replay(
                &page,
                &script,
                session_file.as_deref(),
                &format,
                output.as_deref(),
                &config,
                cli.trace.as_deref(),
                cli.verbose,
            )?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Inspect { page, format } => {
            cmd_inspect(&page, &format, &config)?;
        }
        Commands::ClearCache { session_file, form } => {
            cmd_clear_cache(&session_file, form.as_deref(), cli.verbose)?;
        }
        Commands::Notifications {
            base_url,
            csrf_token,
            page,
            mark_read,
            mark_all_read,
            watch,
            rounds,
        } => {
            let rounds = if watch { rounds.or(Some(usize::MAX)) } else { None };
            cmd_notifications(
                base_url.as_deref(),
                csrf_token.as_deref(),
                page.as_deref(),
                mark_read,
                mark_all_read,
                rounds,
                &config,
                cli.verbose,
            )?;
        }
    }

    Ok(())
}
