use std::io::Write;

use anyhow::Result;
use log::warn;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use code_marshal_install::cli::Cli;
use code_marshal_install::config::{self, InstallRequest};
use code_marshal_install::Installer;

/// Exit status after SIGINT/SIGTERM (128 + SIGINT)
const INTERRUPTED_EXIT: i32 = 130;

#[derive(Debug, thiserror::Error)]
#[error("interrupted")]
struct Interrupted;

fn main() {
    // RUST_LOG overrides the default level
    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // --help and malformed arguments exit inside clap
    let cli = Cli::parse_args();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("FATAL: Failed to create Tokio runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(real_main(cli)) {
        if e.downcast_ref::<Interrupted>().is_some() {
            warn!("Interrupted; partial downloads removed");
            std::process::exit(INTERRUPTED_EXIT);
        }
        report_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn real_main(cli: Cli) -> Result<()> {
    let request = cli.into_request()?;
    let installer = Installer::new(request);

    // Dropping the pipeline future on a signal drops its scratch directory too
    tokio::select! {
        result = run(&installer) => result,
        Ok(()) = shutdown_signal() => Err(Interrupted.into()),
    }
}

async fn run(installer: &Installer) -> Result<()> {
    let request = installer.request();
    if request.dry_run {
        let strategy = installer.fetch_strategy()?;
        let plan = installer.plan().await?;
        println!("tag:         {}", plan.tag);
        println!("asset:       {}", plan.asset_name);
        println!("url:         {}", plan.download_url);
        println!("destination: {}", plan.target.display());
        println!("fetcher:     {}", strategy.name());
        return Ok(());
    }

    let outcome = installer.run().await?;

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = writeln!(
        stdout,
        "✅ Installed {} {} to {}",
        request.binary_name,
        outcome.tag,
        outcome.binary_path.display()
    );
    let _ = stdout.reset();

    print_path_hint(request);
    Ok(())
}

fn print_path_hint(request: &InstallRequest) {
    let on_path = std::env::var_os("PATH")
        .is_some_and(|path| config::path_contains(&path, &request.prefix));
    if !on_path {
        warn!(
            "{} is not on your PATH; add it to run {} directly",
            request.prefix.display(),
            request.binary_name
        );
    }
}

/// Resolves on SIGINT, or SIGTERM on unix. Errors if no handler could be installed.
async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = term.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

fn report_error(message: &str) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "error:");
    let _ = stderr.reset();
    let _ = writeln!(stderr, " {message}");
}
