use crate::demo::{
    run_dashboard, run_demo, run_notify, DashboardArgs, DemoArgs, NotifyArgs,
};
use crate::server;
use certwatch::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Certificate Compliance Tracker",
    about = "Compliance dashboards and expiry reminders from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute a compliance dashboard from roster CSV exports
    Dashboard(DashboardArgs),
    /// Preview or dispatch expiry reminders
    Notify {
        #[command(subcommand)]
        command: NotifyCommand,
    },
    /// Run an end-to-end demo over seeded sample data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
pub(crate) enum NotifyCommand {
    /// List the certificates a dispatch would cover, without sending
    Preview(NotifyArgs),
    /// Group and dispatch reminders (log transport; nothing leaves the box)
    Dispatch(NotifyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Dashboard(args) => run_dashboard(args),
        Command::Notify { command } => run_notify(command).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
