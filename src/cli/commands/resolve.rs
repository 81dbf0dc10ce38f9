use std::collections::BTreeMap;

use airenv::{AssembleOptions, CancellationToken, GcpSecretManager, Result, Source};

use crate::cli::Format;
use crate::cli::output::{self, MASK};

/// Execute `airenv resolve`.
///
/// Prints the merged environment to stdout. Secret-sourced values are
/// masked unless `show_secrets` is set.
pub fn execute(
    file: &str,
    options: AssembleOptions,
    format: Format,
    show_secrets: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let backend = GcpSecretManager::from_env();
    let Some(env) = airenv::resolve_environment(file, &backend, options, cancel)? else {
        output::warning("No configuration found; nothing to resolve");
        return Ok(());
    };

    let visible: BTreeMap<&str, &str> = env
        .entries()
        .into_iter()
        .map(|(key, (value, source))| {
            let shown = if source == Source::Secret && !show_secrets {
                MASK
            } else {
                value
            };
            (key, shown)
        })
        .collect();

    match format {
        Format::Dotenv => {
            for (key, value) in &visible {
                println!("{}", output::dotenv_line(key, value));
            }
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(&visible)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            println!("{json}");
        }
    }

    output::success(&format!(
        "Resolved {} variable(s), {} from secrets",
        env.len(),
        env.secret_count()
    ));
    Ok(())
}
