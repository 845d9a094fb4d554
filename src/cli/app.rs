//! Main app runners, one per subcommand

use std::env;
use std::process::ExitCode;

use crate::application::ports::{ConfigStore, LedgerStore, StorageError};
use crate::application::{CaptureCycleUseCase, CycleOutcome};
use crate::domain::config::AppConfig;
use crate::infrastructure::{
    CpalVoiceRecorder, GoogleSttTranscriber, OpenAiExtractor, SqliteLedger, XdgConfigStore,
};

use super::presenter::Presenter;
use super::signals::{wait_for_stop, StopReason};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Run one record cycle: capture until stopped, then transcribe,
/// extract and insert
pub async fn run_record(config: AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();

    // Both API keys are required before recording starts
    let (stt_key, llm_key) = match get_api_keys(&config) {
        Ok(keys) => keys,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let ledger = match open_ledger(&config) {
        Ok(ledger) => ledger,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Create adapters
    let recorder = CpalVoiceRecorder::new(
        config.sample_rate_or_default(),
        config.wav_path_or_default(),
    );
    let transcriber = GoogleSttTranscriber::new(stt_key, config.language_or_default());
    let extractor = OpenAiExtractor::new(llm_key, config.llm_model_or_default());

    let use_case = CaptureCycleUseCase::new(recorder, transcriber, extractor, ledger);

    if let Err(e) = use_case.begin().await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.info("Recording... press Enter to stop, Ctrl+C to discard");

    let reason = match wait_for_stop().await {
        Ok(reason) => reason,
        Err(e) => {
            let _ = use_case.abort().await;
            presenter.error(&format!("Failed to wait for stop: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if reason == StopReason::Interrupt {
        if let Err(e) = use_case.abort().await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        presenter.warn("Recording discarded");
        return ExitCode::from(EXIT_SUCCESS);
    }

    presenter.start_spinner("Transcribing...");
    let outcome = use_case.finish().await;
    presenter.stop_spinner();

    match outcome {
        Ok(CycleOutcome::Recorded(record)) => {
            presenter.success("Recorded:");
            presenter.record(&record);
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(CycleOutcome::NothingRecognized) => {
            presenter.warn("No speech recognized; nothing was stored");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// List every stored record
pub fn run_list(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let ledger = match open_ledger(&config) {
        Ok(ledger) => ledger,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match ledger.list_all() {
        Ok(records) if records.is_empty() => {
            presenter.info("No records");
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(records) => {
            for record in &records {
                presenter.record(record);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Delete one record by id; an unknown id deletes zero rows
pub fn run_delete(config: AppConfig, id: i64) -> ExitCode {
    let presenter = Presenter::new();

    let ledger = match open_ledger(&config) {
        Ok(ledger) => ledger,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match ledger.delete_by_id(id) {
        Ok(affected) => {
            presenter.success(&format!("Deleted {} record(s) (id: {})", affected, id));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Delete every record
pub fn run_clear(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let ledger = match open_ledger(&config) {
        Ok(ledger) => ledger,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match ledger.delete_all() {
        Ok(()) => {
            presenter.success("Ledger cleared");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Show the grand total and per-category breakdown
pub fn run_analyze(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let ledger = match open_ledger(&config) {
        Ok(ledger) => ledger,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match ledger.aggregate() {
        Ok(summary) => {
            if summary.grand_total == 0.0 {
                presenter.output("No records to analyze, or the total amount is 0.");
            } else {
                presenter.summary(&summary);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Open the ledger database and ensure the table exists
fn open_ledger(config: &AppConfig) -> Result<SqliteLedger, StorageError> {
    let ledger = SqliteLedger::open(config.db_path_or_default())?;
    ledger.initialize()?;
    Ok(ledger)
}

/// Get both API keys from environment or config file
fn get_api_keys(config: &AppConfig) -> Result<(String, String), String> {
    let stt_key = env::var("GOOGLE_STT_API_KEY")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| config.stt_api_key.clone())
        .ok_or_else(|| {
            "Missing STT API key. Set GOOGLE_STT_API_KEY or run 'voice-ledger config set stt_api_key <key>'".to_string()
        })?;

    let llm_key = env::var("OPENAI_API_KEY")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| config.llm_api_key.clone())
        .ok_or_else(|| {
            "Missing LLM API key. Set OPENAI_API_KEY or run 'voice-ledger config set llm_api_key <key>'".to_string()
        })?;

    Ok((stt_key, llm_key))
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Build env config
    let env_config = AppConfig {
        stt_api_key: env::var("GOOGLE_STT_API_KEY").ok().filter(|s| !s.is_empty()),
        llm_api_key: env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
