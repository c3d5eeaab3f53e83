//! The step repository: in-memory owner of all steps and products.
//!
//! Reads are synchronous against in-memory state. Mutations apply in call
//! order, invalidate the derived caches they affect, and enqueue the changed
//! collections on the synchronization layer — the physical write happens
//! after the layer's quiescence window, not inline.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use roteiro_core::error::DomainError;
use roteiro_core::event::ChangeKind;
use roteiro_core::storage::StoragePort;
use roteiro_sync::SyncLayer;

use crate::domain::ids::{ProductId, StepId};
use crate::domain::model::{Product, Step};

/// Storage key holding the step collection.
pub const STEPS_KEY: &str = "steps";

/// Storage key holding the product collection.
pub const PRODUCTS_KEY: &str = "products";

const LOCK: &str = "script state lock poisoned";

#[derive(Default)]
struct ScriptState {
    steps: HashMap<StepId, Step>,
    products: HashMap<ProductId, Product>,
    /// Derived step grouping, invalidated explicitly by step mutations and
    /// rebuilt on the next grouped read. No TTL.
    steps_by_product: Option<HashMap<ProductId, Vec<StepId>>>,
}

/// Repository over the script graph. Constructed explicitly and passed by
/// reference, so tests instantiate isolated instances instead of sharing
/// process-wide state.
pub struct ScriptRepository {
    state: RwLock<ScriptState>,
    sync: Arc<SyncLayer>,
}

impl ScriptRepository {
    /// Load the repository from storage. Missing documents start the
    /// corresponding collection empty.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` when storage cannot be read or
    /// a stored document no longer deserializes.
    pub async fn load(storage: &dyn StoragePort, sync: Arc<SyncLayer>) -> Result<Self, DomainError> {
        let steps: Vec<Step> = read_collection(storage, STEPS_KEY).await?;
        let products: Vec<Product> = read_collection(storage, PRODUCTS_KEY).await?;

        let state = ScriptState {
            steps: steps.into_iter().map(|step| (step.id.clone(), step)).collect(),
            products: products
                .into_iter()
                .map(|product| (product.id.clone(), product))
                .collect(),
            steps_by_product: None,
        };

        Ok(Self {
            state: RwLock::new(state),
            sync,
        })
    }

    /// An empty repository, persisting through `sync`.
    #[must_use]
    pub fn empty(sync: Arc<SyncLayer>) -> Self {
        Self {
            state: RwLock::new(ScriptState::default()),
            sync,
        }
    }

    // ---- reads ----

    /// All steps, or the steps of one product, ordered by admin listing
    /// position.
    #[must_use]
    pub fn get_steps(&self, product_id: Option<&ProductId>) -> Vec<Step> {
        match product_id {
            None => {
                let state = self.state.read().expect(LOCK);
                let mut steps: Vec<Step> = state.steps.values().cloned().collect();
                sort_for_listing(&mut steps);
                steps
            }
            Some(product_id) => {
                self.ensure_steps_cache();
                let state = self.state.read().expect(LOCK);
                let Some(cache) = &state.steps_by_product else {
                    return Vec::new();
                };
                cache
                    .get(product_id)
                    .into_iter()
                    .flatten()
                    .filter_map(|id| state.steps.get(id).cloned())
                    .collect()
            }
        }
    }

    /// Look up one step.
    #[must_use]
    pub fn get_step(&self, id: &StepId) -> Option<Step> {
        self.state.read().expect(LOCK).steps.get(id).cloned()
    }

    /// All products, ordered by name.
    #[must_use]
    pub fn get_products(&self) -> Vec<Product> {
        let state = self.state.read().expect(LOCK);
        let mut products: Vec<Product> = state.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        products
    }

    /// Look up one product.
    #[must_use]
    pub fn get_product(&self, id: &ProductId) -> Option<Product> {
        self.state.read().expect(LOCK).products.get(id).cloned()
    }

    // ---- step mutations ----

    /// Insert a new step.
    ///
    /// # Errors
    ///
    /// `Validation` when the id or title is blank or the id already exists.
    pub fn create_step(&self, step: Step) -> Result<(), DomainError> {
        validate_step(&step)?;
        {
            let mut state = self.state.write().expect(LOCK);
            if state.steps.contains_key(&step.id) {
                return Err(DomainError::Validation(format!(
                    "step id already exists: {}",
                    step.id
                )));
            }
            state.steps.insert(step.id.clone(), step);
            state.steps_by_product = None;
        }
        self.persist_steps()
    }

    /// Replace an existing step in place. The id must stay stable across
    /// edits; buttons elsewhere keep referencing it.
    ///
    /// # Errors
    ///
    /// `StepNotFound` for an unknown id, `Validation` for a blank title.
    pub fn update_step(&self, step: Step) -> Result<(), DomainError> {
        validate_step(&step)?;
        {
            let mut state = self.state.write().expect(LOCK);
            if !state.steps.contains_key(&step.id) {
                return Err(DomainError::StepNotFound(step.id.to_string()));
            }
            state.steps.insert(step.id.clone(), step);
            state.steps_by_product = None;
        }
        self.persist_steps()
    }

    /// Delete a step. Buttons pointing at it are left dangling; traversal
    /// surfaces those lazily as missing-step errors.
    ///
    /// # Errors
    ///
    /// `StepNotFound` for an unknown id.
    pub fn delete_step(&self, id: &StepId) -> Result<(), DomainError> {
        {
            let mut state = self.state.write().expect(LOCK);
            if state.steps.remove(id).is_none() {
                return Err(DomainError::StepNotFound(id.to_string()));
            }
            state.steps_by_product = None;
        }
        self.persist_steps()
    }

    // ---- product mutations ----

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// `Validation` when the id or name is blank or the id already exists.
    pub fn create_product(&self, product: Product) -> Result<(), DomainError> {
        validate_product(&product)?;
        {
            let mut state = self.state.write().expect(LOCK);
            if state.products.contains_key(&product.id) {
                return Err(DomainError::Validation(format!(
                    "product id already exists: {}",
                    product.id
                )));
            }
            state.products.insert(product.id.clone(), product);
        }
        self.persist_products()
    }

    /// Replace an existing product in place.
    ///
    /// # Errors
    ///
    /// `ProductNotFound` for an unknown id, `Validation` for a blank name.
    pub fn update_product(&self, product: Product) -> Result<(), DomainError> {
        validate_product(&product)?;
        {
            let mut state = self.state.write().expect(LOCK);
            if !state.products.contains_key(&product.id) {
                return Err(DomainError::ProductNotFound(product.id.to_string()));
            }
            state.products.insert(product.id.clone(), product);
        }
        self.persist_products()
    }

    /// Delete a product. Its steps are kept; they become standalone entries
    /// the admin can reassign or remove.
    ///
    /// # Errors
    ///
    /// `ProductNotFound` for an unknown id.
    pub fn delete_product(&self, id: &ProductId) -> Result<(), DomainError> {
        {
            let mut state = self.state.write().expect(LOCK);
            if state.products.remove(id).is_none() {
                return Err(DomainError::ProductNotFound(id.to_string()));
            }
        }
        self.persist_products()
    }

    // ---- import ----

    /// Replace a product and the full set of its steps in one pass. This is
    /// the import path: re-importing the same bundle replaces rather than
    /// appends, so no duplicate steps accumulate. Category, active flag and
    /// discovery tags of an existing product survive the replace.
    ///
    /// # Errors
    ///
    /// `Validation` when the product or any step fails basic validation.
    pub fn replace_product_steps(
        &self,
        product: Product,
        steps: Vec<Step>,
    ) -> Result<(), DomainError> {
        validate_product(&product)?;
        for step in &steps {
            validate_step(step)?;
        }

        {
            let mut state = self.state.write().expect(LOCK);

            let merged = match state.products.get(&product.id) {
                Some(existing) => Product {
                    category: existing.category.clone(),
                    active: existing.active,
                    attendance_kind: existing.attendance_kind.clone(),
                    person_kind: existing.person_kind.clone(),
                    ..product
                },
                None => product,
            };

            state
                .steps
                .retain(|_, step| step.product_id.as_ref() != Some(&merged.id));
            for mut step in steps {
                step.product_id = Some(merged.id.clone());
                state.steps.insert(step.id.clone(), step);
            }
            state.products.insert(merged.id.clone(), merged);
            state.steps_by_product = None;
        }

        self.persist_steps()?;
        self.persist_products()
    }

    // ---- persistence ----

    fn persist_steps(&self) -> Result<(), DomainError> {
        let value = {
            let state = self.state.read().expect(LOCK);
            let mut steps: Vec<&Step> = state.steps.values().collect();
            steps.sort_by(|a, b| {
                a.order
                    .cmp(&b.order)
                    .then_with(|| a.id.as_str().cmp(b.id.as_str()))
            });
            serde_json::to_value(&steps).map_err(|error| {
                DomainError::Infrastructure(format!("failed to serialize steps: {error}"))
            })?
        };
        self.sync.save(STEPS_KEY, value);
        self.sync.notify(ChangeKind::Step);
        Ok(())
    }

    fn persist_products(&self) -> Result<(), DomainError> {
        let value = {
            let state = self.state.read().expect(LOCK);
            let mut products: Vec<&Product> = state.products.values().collect();
            products.sort_by(|a, b| a.id.cmp(&b.id));
            serde_json::to_value(&products).map_err(|error| {
                DomainError::Infrastructure(format!("failed to serialize products: {error}"))
            })?
        };
        self.sync.save(PRODUCTS_KEY, value);
        self.sync.notify(ChangeKind::Product);
        Ok(())
    }

    fn ensure_steps_cache(&self) {
        if self.state.read().expect(LOCK).steps_by_product.is_some() {
            return;
        }
        let mut state = self.state.write().expect(LOCK);
        if state.steps_by_product.is_some() {
            return;
        }

        let mut grouped: HashMap<ProductId, Vec<StepId>> = HashMap::new();
        for step in state.steps.values() {
            if let Some(product_id) = &step.product_id {
                grouped
                    .entry(product_id.clone())
                    .or_default()
                    .push(step.id.clone());
            }
        }
        for ids in grouped.values_mut() {
            ids.sort_by_key(|id| {
                let order = state.steps.get(id).map_or(0, |step| step.order);
                (order, id.clone())
            });
        }
        state.steps_by_product = Some(grouped);
    }
}

async fn read_collection<T: serde::de::DeserializeOwned>(
    storage: &dyn StoragePort,
    key: &str,
) -> Result<Vec<T>, DomainError> {
    match storage.get(key).await? {
        None => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value).map_err(|error| {
            DomainError::Infrastructure(format!("stored document {key} is corrupt: {error}"))
        }),
    }
}

fn sort_for_listing(steps: &mut [Step]) {
    steps.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| a.id.as_str().cmp(b.id.as_str()))
    });
}

fn validate_step(step: &Step) -> Result<(), DomainError> {
    if step.id.is_blank() {
        return Err(DomainError::Validation("step id must not be empty".into()));
    }
    if step.title.trim().is_empty() {
        return Err(DomainError::Validation(format!(
            "step {} must have a title",
            step.id
        )));
    }
    Ok(())
}

fn validate_product(product: &Product) -> Result<(), DomainError> {
    if product.id.is_blank() {
        return Err(DomainError::Validation(
            "product id must not be empty".into(),
        ));
    }
    if product.name.trim().is_empty() {
        return Err(DomainError::Validation(format!(
            "product {} must have a name",
            product.id
        )));
    }
    Ok(())
}
