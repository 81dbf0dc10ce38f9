use std::process::Command;

use airenv::{AirEnvError, AssembleOptions, CancellationToken, GcpSecretManager, Result};

use crate::cli::output;

/// Execute `airenv run -- <cmd> [args…]`.
///
/// The resolved environment is handed to the child explicitly, layered over
/// the inherited one, instead of being written into this process. Returns
/// the child's exit code.
pub fn execute(
    file: &str,
    options: AssembleOptions,
    command: &[String],
    cancel: &CancellationToken,
) -> Result<i32> {
    let Some((program, args)) = command.split_first() else {
        return Err(AirEnvError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "no command given",
        )));
    };

    let backend = GcpSecretManager::from_env();
    let resolved = airenv::resolve_environment(file, &backend, options, cancel)?;

    let mut child = Command::new(program);
    child.args(args);
    match &resolved {
        Some(env) => {
            child.envs(env.ordered_pairs());
            output::success(&format!(
                "Resolved {} variable(s), {} from secrets",
                env.len(),
                env.secret_count()
            ));
        }
        None => output::warning("No configuration applied"),
    }

    tracing::debug!(program = %program, "spawning child process");
    let status = child.status()?;
    Ok(status.code().unwrap_or(1))
}
