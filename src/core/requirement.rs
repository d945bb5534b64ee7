//! Discount requirement rules - The seam every requirement rule plugs into.

use crate::{core::customer::CustomerContext, entities::discount_requirement, errors::Result};

/// Everything a rule needs to decide whether a requirement is met.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckDiscountRequirementRequest {
    /// The requirement being checked
    pub discount_requirement: Option<discount_requirement::Model>,
    /// The current customer, None for anonymous sessions
    pub customer: Option<CustomerContext>,
}

impl CheckDiscountRequirementRequest {
    /// Creates a request for `discount_requirement` on behalf of `customer`.
    #[must_use]
    pub const fn new(
        discount_requirement: discount_requirement::Model,
        customer: Option<CustomerContext>,
    ) -> Self {
        Self {
            discount_requirement: Some(discount_requirement),
            customer,
        }
    }
}

/// A rule that evaluates discount requirements carrying its system name.
#[allow(async_fn_in_trait)] // used through generics only
pub trait DiscountRequirementRule {
    /// The `system_name` stored on requirements this rule evaluates.
    fn system_name(&self) -> &'static str;

    /// Decides whether the requirement in `request` is met.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` if `request` is None
    /// * `Error::InvalidState` if the request carries no requirement
    async fn check_requirement(
        &self,
        request: Option<&CheckDiscountRequirementRequest>,
    ) -> Result<bool>;

    /// Relative URL of the admin page that configures this rule.
    fn get_configuration_url(&self, discount_id: i64, discount_requirement_id: Option<i64>)
    -> String;
}
