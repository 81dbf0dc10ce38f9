use std::collections::BTreeMap;

use crate::core::cancel::CancellationToken;
use crate::core::errors::Result;
use crate::core::models::config_document::ConfigDocument;
use crate::core::models::resolved_env::ResolvedEnvironment;
use crate::core::models::secret_ref::SecretRef;
use crate::core::services::config_loader::ConfigLoader;
use crate::core::services::placeholder_resolver::{Parameters, PlaceholderResolver};
use crate::core::services::secret_fetcher::SecretFetcher;
use crate::core::traits::secret_backend::SecretBackend;

/// Deployment policy for the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Treat a document without `project_id` as "not configured".
    pub require_project_id: bool,
    /// Export the project id as `GOOGLE_CLOUD_PROJECT` when it is set.
    pub export_project_var: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            require_project_id: false,
            export_project_var: true,
        }
    }
}

/// Turns a config document plus a secret backend into the final environment.
///
/// Steps: load, guard, resolve plain env, resolve and fetch secrets.
/// Nothing touches the process environment here; callers decide whether to
/// `apply` the result or pass it on explicitly.
pub struct EnvAssembler<'a> {
    loader: ConfigLoader<'a>,
    backend: &'a dyn SecretBackend,
    options: AssembleOptions,
}

impl<'a> EnvAssembler<'a> {
    pub fn new(
        loader: ConfigLoader<'a>,
        backend: &'a dyn SecretBackend,
        options: AssembleOptions,
    ) -> Self {
        Self {
            loader,
            backend,
            options,
        }
    }

    /// Load `path` (empty = default file) and resolve it.
    ///
    /// Returns `Ok(None)` when the file is missing or the project guard
    /// short-circuits.
    ///
    /// # Errors
    ///
    /// - `ConfigRead` / `ConfigDecode` from the loader.
    /// - `InvalidSecretReference` before any secret is fetched.
    /// - Any secret fetch failure, including `Cancelled`.
    /// - `EnvApply` if a resolved name or value could never be exported.
    pub fn assemble(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<ResolvedEnvironment>> {
        let Some(doc) = self.loader.load(path)? else {
            tracing::info!(
                path = %ConfigLoader::effective_path(path).display(),
                "no config file, environment left unchanged"
            );
            return Ok(None);
        };

        self.assemble_document(&doc, cancel)
    }

    /// Resolve an already-loaded document.
    pub fn assemble_document(
        &self,
        doc: &ConfigDocument,
        cancel: &CancellationToken,
    ) -> Result<Option<ResolvedEnvironment>> {
        if self.options.require_project_id && doc.project().is_none() {
            tracing::warn!("project_id is required but empty, environment left unchanged");
            return Ok(None);
        }

        let params = Parameters::from_document(doc);
        let plain = PlaceholderResolver::resolve_all(&doc.env_entries, &params);
        let refs = Self::secret_refs(doc, &params)?;

        let fetcher = SecretFetcher::new(self.backend);
        let secrets = fetcher.fetch_all(&refs, cancel)?;

        let project_id = doc.project().map(str::to_string);
        let project_var = project_id
            .clone()
            .filter(|_| self.options.export_project_var);

        let env = ResolvedEnvironment::new(project_id, project_var, plain, secrets);
        env.validate()?;

        tracing::info!(
            variables = env.len(),
            secrets = env.secret_count(),
            "resolved environment"
        );
        Ok(Some(env))
    }

    /// Resolve and parse every `[secret]` entry. Fails on the first bad one.
    pub fn secret_refs(
        doc: &ConfigDocument,
        params: &Parameters,
    ) -> Result<BTreeMap<String, SecretRef>> {
        doc.secret_refs
            .iter()
            .map(|(env_name, template)| {
                let resolved = PlaceholderResolver::resolve(template, params);
                SecretRef::parse(env_name, &resolved, doc.project())
                    .map(|r| (env_name.clone(), r))
            })
            .collect()
    }
}
