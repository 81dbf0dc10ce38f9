use airenv::{
    AssembleOptions, ConfigLoader, EnvAssembler, Parameters, PlaceholderResolver, Result,
    TomlDecoder,
};

use crate::cli::output;

/// Execute `airenv check`.
///
/// Loads and validates the config file without contacting the secret store:
/// reports counts, the expanded secret names, and placeholders that have no
/// binding. Fails on an invalid secret reference.
pub fn execute(file: &str, options: AssembleOptions) -> Result<()> {
    let path = ConfigLoader::effective_path(file);
    let loader = ConfigLoader::new(&TomlDecoder);

    output::header(&format!("Checking {}", path.display()));

    let Some(doc) = loader.load_path(&path)? else {
        output::warning("File not found; startup would leave the environment unchanged");
        return Ok(());
    };

    match doc.project() {
        Some(project) => output::success(&format!("project_id: {project}")),
        None if options.require_project_id => {
            output::warning("project_id is empty; startup would skip resolution");
            return Ok(());
        }
        None => output::warning("project_id is empty; bare secret names cannot be expanded"),
    }

    let params = Parameters::from_document(&doc);
    output::success(&format!(
        "{} parameter(s), {} env value(s), {} secret(s)",
        doc.parameters.len(),
        doc.env_entries.len(),
        doc.secret_refs.len()
    ));

    let mut unresolved = 0;
    for (key, template) in &doc.env_entries {
        for name in PlaceholderResolver::unresolved(template, &params) {
            output::warning(&format!("{key}: no value for {{{name}}}, kept verbatim"));
            unresolved += 1;
        }
    }

    let refs = EnvAssembler::secret_refs(&doc, &params)?;
    if !refs.is_empty() {
        output::header("Secrets");
        for (env_name, reference) in &refs {
            output::item(env_name, &reference.to_string());
        }
    }

    if unresolved == 0 {
        output::success("All placeholders resolved");
    }
    Ok(())
}
