//! The session-scoped traversal state machine.

use roteiro_script::{Product, ProductId, ScriptRepository, Step, StepId};

use crate::error::NavigationError;

/// Synchronous read access to the script graph.
pub trait StepLookup {
    /// Look up a step by id.
    fn step(&self, id: &StepId) -> Option<Step>;

    /// Look up a product by id.
    fn product(&self, id: &ProductId) -> Option<Product>;
}

impl StepLookup for ScriptRepository {
    fn step(&self, id: &StepId) -> Option<Step> {
        self.get_step(id)
    }

    fn product(&self, id: &ProductId) -> Option<Product> {
        self.get_product(id)
    }
}

/// Where a session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// At a step of the script.
    At(StepId),
    /// Past a call-closing button. History is preserved, so going back
    /// from here still works.
    Terminal,
}

impl Position {
    /// The current step id, if not terminal.
    #[must_use]
    pub fn step_id(&self) -> Option<&StepId> {
        match self {
            Self::At(id) => Some(id),
            Self::Terminal => None,
        }
    }
}

/// One operator's traversal state for one call. Created when the operator
/// opens a product, destroyed when they return to the product list. Never
/// persisted.
#[derive(Debug)]
pub struct NavigationSession {
    product_id: ProductId,
    position: Position,
    back_stack: Vec<StepId>,
}

impl NavigationSession {
    /// Start a session at the product's entry step.
    ///
    /// The entry step's existence is not checked here: a dangling entry
    /// reference surfaces on the first [`resolve`], the same as any other
    /// dangling link.
    ///
    /// # Errors
    ///
    /// `MissingProduct` for an unknown product, `NoEntryStep` when the
    /// product has no entry step configured.
    pub fn start(
        lookup: &impl StepLookup,
        product_id: &ProductId,
    ) -> Result<Self, NavigationError> {
        let product = lookup
            .product(product_id)
            .ok_or_else(|| NavigationError::MissingProduct(product_id.clone()))?;
        let first = product
            .first_step_id
            .ok_or_else(|| NavigationError::NoEntryStep(product_id.clone()))?;

        Ok(Self {
            product_id: product_id.clone(),
            position: Position::At(first),
            back_stack: Vec::new(),
        })
    }

    /// The product this session runs.
    #[must_use]
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// The current position.
    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The current step id, if not terminal.
    #[must_use]
    pub fn current_step_id(&self) -> Option<&StepId> {
        self.position.step_id()
    }

    /// Whether `go_back` would move.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    /// Apply the clicked button: push the current step onto the history and
    /// move to the button's destination. A button without a destination
    /// moves to [`Position::Terminal`] without clearing the history, so the
    /// operator can still back out of the call-closing screen.
    ///
    /// The transition depends only on the button's destination, never on
    /// how the operator got here; scripts may legitimately cycle back to
    /// earlier steps, so the history is bounded only by actual clicks.
    ///
    /// # Errors
    ///
    /// `AtEnd` when already terminal, `MissingStep` when the current step
    /// vanished from the repository, `MissingButton` for an unknown button.
    pub fn advance(
        &mut self,
        lookup: &impl StepLookup,
        button_id: &roteiro_script::ButtonId,
    ) -> Result<&Position, NavigationError> {
        let current = match &self.position {
            Position::At(id) => id.clone(),
            Position::Terminal => return Err(NavigationError::AtEnd),
        };

        let step = lookup
            .step(&current)
            .ok_or_else(|| NavigationError::MissingStep(current.clone()))?;
        let button = step
            .button(button_id)
            .ok_or_else(|| NavigationError::MissingButton(button_id.clone()))?;

        let next = button.next_step_id.clone();
        self.back_stack.push(current);
        self.position = match next {
            Some(id) => Position::At(id),
            None => Position::Terminal,
        };

        Ok(&self.position)
    }

    /// Pop the most recent history entry and make it current. A no-op
    /// returning `None` on an empty history — callers check `can_go_back`
    /// to decide whether to offer the affordance.
    pub fn go_back(&mut self) -> Option<StepId> {
        let previous = self.back_stack.pop()?;
        self.position = Position::At(previous.clone());
        Some(previous)
    }

    /// Resolve the current step. `Ok(None)` at terminal.
    ///
    /// # Errors
    ///
    /// `MissingStep` when the current id dangles — the caller decides
    /// whether to show a dead-end screen or stay put.
    pub fn resolve_current(
        &self,
        lookup: &impl StepLookup,
    ) -> Result<Option<Step>, NavigationError> {
        match &self.position {
            Position::Terminal => Ok(None),
            Position::At(id) => resolve(lookup, id).map(Some),
        }
    }
}

/// Resolve a step id, converting an unknown id into a recoverable error
/// instead of letting the gap propagate as a panic.
///
/// # Errors
///
/// `MissingStep` when the id is unknown.
pub fn resolve(lookup: &impl StepLookup, id: &StepId) -> Result<Step, NavigationError> {
    lookup
        .step(id)
        .ok_or_else(|| NavigationError::MissingStep(id.clone()))
}
