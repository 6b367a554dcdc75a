//! `credkit` - interactive API key setup
//!
//! Exit codes: 0 on success, 1 on a fatal error, 130 when interrupted.

mod cli;

use anyhow::Context;
use credkit_core::{InterruptGate, TerminalPrompter, Wizard, WizardError};
use credkit_probe::HttpProber;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    let code = match try_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    };
    std::process::exit(code);
}

/// Logs go to stderr so they never interleave with prompts
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn try_main() -> anyhow::Result<i32> {
    let matches = cli::command().get_matches();
    let options = cli::Options::from_matches(&matches)?;
    let profile = options.profile();

    if options.list_keys {
        let descriptors: Vec<_> = profile.registry().iter().collect();
        let json = serde_json::to_string_pretty(&descriptors).context("failed to serialize key descriptors")?;
        println!("{json}");
        return Ok(0);
    }

    let mut wizard = Wizard::new(profile, options.config());
    if wizard.profile().probe_enabled() {
        match HttpProber::new() {
            Ok(prober) => wizard = wizard.with_prober(Arc::new(prober)),
            Err(e) => tracing::warn!(error = %e, "HTTP client unavailable; connectivity tests disabled"),
        }
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let code = runtime.block_on(run(&wizard));
    // An unmasked read may still be blocked after an interrupt
    runtime.shutdown_background();
    Ok(code)
}

async fn run(wizard: &Wizard) -> i32 {
    let mut prompter = TerminalPrompter::new();
    let gate = prompter.interrupt_gate();
    let result = tokio::select! {
        result = wizard.run(&mut prompter) => result,
        () = interrupted(&gate) => Err(WizardError::Interrupted),
    };

    match result {
        Ok(report) => {
            tracing::info!(path = %report.target.display(), configured = report.configured().count(), "setup complete");
            0
        }
        Err(e) => {
            if e.is_fatal() {
                eprintln!("error: {e}");
            } else {
                eprintln!("\n{e}");
            }
            e.exit_code()
        }
    }
}

/// Resolves on Ctrl-C unless a masked read is open
///
/// During a masked read the interrupt is left to the prompter, which fails
/// the read once it returns and echo is back on.
async fn interrupted(gate: &InterruptGate) {
    loop {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
        if !gate.interrupt() {
            return;
        }
        eprintln!("\ninterrupted; press Enter to exit");
    }
}
