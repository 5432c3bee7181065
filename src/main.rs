use color_eyre::eyre::{Result, WrapErr};
use mood_journal::config::{Config, LoggingConfig};
use mood_journal::journal::Journal;
use mood_journal::ui::{Action, UI};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::error;

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .wrap_err_with(|| format!("Failed to open log file {}", config.file.display()))?;

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(config.max_level())
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load()?;
    init_logging(&config.logging)?;

    let mut journal = Journal::open(&config)?;
    let mut ui = UI::new()?;

    loop {
        ui.display(&journal)?;

        if let Some(action) = ui.handle_input(&journal)? {
            match action {
                Action::Write => {
                    if let Some(draft) = ui.get_new_check_in()? {
                        match journal.submit(draft).await {
                            Ok(outcome) => ui.show_outcome(&outcome, journal.crisis_resources())?,
                            Err(err) => {
                                error!("{err:?}");
                                ui.show_error(&format!("{err:#}"))?;
                            }
                        }
                    }
                }
                Action::View => {
                    ui.view_entries(&journal)?;
                }
                Action::Screening => {
                    ui.run_screening(journal.crisis_resources())?;
                }
                Action::Quit => break,
            }
        }
    }

    Ok(())
}
