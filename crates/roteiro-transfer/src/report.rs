//! Per-product script report.
//!
//! Header metadata rows followed by a tabular section, one row per step.
//! Fields go through a real RFC 4180 writer, so free text may contain
//! commas, quotes and newlines without breaking columns.

use roteiro_core::clock::Clock;
use roteiro_core::error::DomainError;
use roteiro_script::{ProductId, ScriptRepository};

use crate::bundle::END_OF_SCRIPT;

/// Render the CSV report for one product.
///
/// # Errors
///
/// `ProductNotFound` for an unknown product; `Infrastructure` when the
/// writer fails.
pub fn script_report(
    repository: &ScriptRepository,
    product_id: &ProductId,
    clock: &dyn Clock,
) -> Result<String, DomainError> {
    let product = repository
        .get_product(product_id)
        .ok_or_else(|| DomainError::ProductNotFound(product_id.to_string()))?;
    let steps = repository.get_steps(Some(product_id));

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer
        .write_record(["Roteiro de atendimento", &product.name])
        .map_err(csv_error)?;
    writer
        .write_record(["Categoria", &product.category])
        .map_err(csv_error)?;
    writer
        .write_record(["Exportado em", &clock.now().to_rfc3339()])
        .map_err(csv_error)?;
    writer
        .write_record(["Etapa", "Título", "Botões", "Alerta", "Tabulações"])
        .map_err(csv_error)?;

    for step in steps {
        let buttons = step
            .buttons
            .iter()
            .map(|button| {
                let destination = button
                    .next_step_id
                    .as_ref()
                    .map_or(END_OF_SCRIPT, roteiro_script::StepId::as_str);
                format!("{} -> {destination}", button.label)
            })
            .collect::<Vec<_>>()
            .join("; ");
        let alert = step
            .alert
            .as_ref()
            .filter(|alert| alert.is_active())
            .map(|alert| alert.message.clone())
            .unwrap_or_default();
        let tabulations = step
            .tabulations
            .iter()
            .map(|tabulation| tabulation.name.clone())
            .collect::<Vec<_>>()
            .join("; ");

        writer
            .write_record([
                step.id.as_str(),
                &step.title,
                &buttons,
                &alert,
                &tabulations,
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| DomainError::Infrastructure(format!("report writer failed: {error}")))?;
    String::from_utf8(bytes)
        .map_err(|error| DomainError::Infrastructure(format!("report is not utf-8: {error}")))
}

fn csv_error(error: csv::Error) -> DomainError {
    DomainError::Infrastructure(format!("report writer failed: {error}"))
}
