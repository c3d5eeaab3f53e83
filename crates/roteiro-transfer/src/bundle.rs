//! The external JSON bundle format.
//!
//! ```json
//! { "marcas": { "<ProductName>": { "<stepKey>": {
//!     "id": "...", "title": "...", "body": "...",
//!     "buttons": [ { "label": "...", "next": "<stepId>|fim", "primary": true } ]
//! } } } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use roteiro_core::error::DomainError;
use roteiro_script::{Button, ButtonId, Product, ProductId, ScriptRepository, Step, StepId};

/// Sentinel destination marking a call-closing button.
pub const END_OF_SCRIPT: &str = "fim";

/// Aggregate result of an import, including the itemized skip reasons shown
/// to the admin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    /// Products imported.
    pub product_count: usize,
    /// Steps imported across all products.
    pub step_count: usize,
    /// One entry per skipped step: `product/stepKey: reason`.
    pub skipped: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawStep {
    id: String,
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    buttons: Vec<RawButton>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawButton {
    label: String,
    next: String,
    #[serde(default, skip_serializing_if = "is_false")]
    primary: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Import a bundle. Each product in the bundle fully replaces its previous
/// step set, so importing the same bundle twice yields the same repository
/// state. Steps missing an id or title are skipped and itemized; a
/// malformed bundle structure rejects the whole import.
///
/// # Errors
///
/// `Validation` when `marcas` is missing/empty or a product entry is not a
/// non-empty object; any repository error from applying the replacement.
pub fn import_bundle(
    repository: &ScriptRepository,
    bundle: &Value,
) -> Result<ImportOutcome, DomainError> {
    let marcas = bundle
        .get("marcas")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            DomainError::Validation("import bundle must contain a \"marcas\" object".into())
        })?;
    if marcas.is_empty() {
        return Err(DomainError::Validation(
            "import bundle has no products".into(),
        ));
    }

    let mut outcome = ImportOutcome {
        product_count: 0,
        step_count: 0,
        skipped: Vec::new(),
    };

    for (product_name, product_value) in marcas {
        let step_entries = product_value.as_object().ok_or_else(|| {
            DomainError::Validation(format!(
                "product {product_name} must be an object of steps"
            ))
        })?;
        if step_entries.is_empty() {
            return Err(DomainError::Validation(format!(
                "product {product_name} has no steps"
            )));
        }

        let product_id = ProductId::from(product_name.as_str());
        let mut steps = Vec::new();

        for (step_key, step_value) in step_entries {
            let raw: RawStep = match serde_json::from_value(step_value.clone()) {
                Ok(raw) => raw,
                Err(error) => {
                    outcome
                        .skipped
                        .push(format!("{product_name}/{step_key}: {error}"));
                    continue;
                }
            };
            if raw.id.trim().is_empty() || raw.title.trim().is_empty() {
                outcome
                    .skipped
                    .push(format!("{product_name}/{step_key}: id and title are required"));
                continue;
            }
            let order = u32::try_from(steps.len()).unwrap_or(u32::MAX);
            steps.push(to_step(raw, &product_id, order));
        }

        let product = Product {
            id: product_id.clone(),
            name: product_name.clone(),
            category: String::new(),
            active: true,
            first_step_id: steps.first().map(|step: &Step| step.id.clone()),
            attendance_kind: None,
            person_kind: None,
        };

        outcome.step_count += steps.len();
        repository.replace_product_steps(product, steps)?;
        outcome.product_count += 1;
    }

    info!(
        products = outcome.product_count,
        steps = outcome.step_count,
        skipped = outcome.skipped.len(),
        "imported script bundle"
    );
    Ok(outcome)
}

fn to_step(raw: RawStep, product_id: &ProductId, order: u32) -> Step {
    let step_id = StepId::from(raw.id.trim());
    let buttons = raw
        .buttons
        .into_iter()
        .enumerate()
        .map(|(index, button)| Button {
            // Bundles carry no button ids; derive stable ones so re-import
            // keeps existing references valid.
            id: ButtonId::from(format!("{step_id}-b{index}")),
            label: button.label,
            next_step_id: (button.next != END_OF_SCRIPT).then(|| StepId::from(button.next)),
            order: u32::try_from(index).unwrap_or(u32::MAX),
            primary: button.primary,
        })
        .collect();

    Step {
        id: step_id,
        title: raw.title.trim().to_owned(),
        content: raw.body,
        buttons,
        segments: Vec::new(),
        tabulations: Vec::new(),
        alert: None,
        formatting: None,
        product_id: Some(product_id.clone()),
        order,
    }
}

/// Export one product back out in the bundle format, steps in listing
/// order.
///
/// # Errors
///
/// `ProductNotFound` for an unknown product; `Infrastructure` when
/// serialization fails.
pub fn export_bundle(
    repository: &ScriptRepository,
    product_id: &ProductId,
) -> Result<Value, DomainError> {
    let product = repository
        .get_product(product_id)
        .ok_or_else(|| DomainError::ProductNotFound(product_id.to_string()))?;
    let steps = repository.get_steps(Some(product_id));

    let mut step_entries = serde_json::Map::new();
    for step in steps {
        let raw = RawStep {
            id: step.id.to_string(),
            title: step.title,
            body: step.content,
            buttons: step
                .buttons
                .into_iter()
                .map(|button| RawButton {
                    label: button.label,
                    next: button
                        .next_step_id
                        .map_or_else(|| END_OF_SCRIPT.to_owned(), |id| id.to_string()),
                    primary: button.primary,
                })
                .collect(),
        };
        let value = serde_json::to_value(&raw).map_err(|error| {
            DomainError::Infrastructure(format!("failed to serialize step: {error}"))
        })?;
        step_entries.insert(step.id.to_string(), value);
    }

    let mut products = serde_json::Map::new();
    products.insert(product.name, Value::Object(step_entries));
    let mut bundle = serde_json::Map::new();
    bundle.insert("marcas".to_owned(), Value::Object(products));
    Ok(Value::Object(bundle))
}
