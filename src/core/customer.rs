//! Customer business logic - Customers, their addresses, and the context a
//! discount rule sees for the current customer.

use crate::{
    entities::{Address, Customer, address, customer},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::{debug, instrument};

/// A customer together with their billing address, as handed to discount rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerContext {
    /// The customer being evaluated
    pub customer: customer::Model,
    /// The customer's billing address, None if they have not provided one
    pub billing_address: Option<address::Model>,
}

impl CustomerContext {
    /// Builds a context from an already loaded customer and billing address.
    #[must_use]
    pub const fn new(customer: customer::Model, billing_address: Option<address::Model>) -> Self {
        Self {
            customer,
            billing_address,
        }
    }
}

/// Fields for a new address. Only the country matters to discount rules.
#[derive(Debug, Clone, Default)]
pub struct NewAddress {
    /// Country the address is located in
    pub country_id: Option<i64>,
    /// City name
    pub city: Option<String>,
    /// First address line
    pub address1: Option<String>,
    /// Postal code
    pub zip_postal_code: Option<String>,
}

/// Creates a new address.
pub async fn create_address<C>(db: &C, new_address: NewAddress) -> Result<address::Model>
where
    C: ConnectionTrait,
{
    let address = address::ActiveModel {
        country_id: Set(new_address.country_id),
        city: Set(new_address.city),
        address1: Set(new_address.address1),
        zip_postal_code: Set(new_address.zip_postal_code),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    Ok(address.insert(db).await?)
}

/// Creates a new customer, optionally linked to an existing billing address.
pub async fn create_customer<C>(
    db: &C,
    email: String,
    billing_address_id: Option<i64>,
) -> Result<customer::Model>
where
    C: ConnectionTrait,
{
    let email = email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::Config {
            message: format!("'{email}' is not a valid customer email"),
        });
    }

    let customer = customer::ActiveModel {
        email: Set(email),
        billing_address_id: Set(billing_address_id),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    Ok(customer.insert(db).await?)
}

/// Points a customer's billing address at `address_id`, or clears it with None.
pub async fn set_billing_address<C>(
    db: &C,
    customer_id: i64,
    address_id: Option<i64>,
) -> Result<customer::Model>
where
    C: ConnectionTrait,
{
    let customer = Customer::find_by_id(customer_id)
        .one(db)
        .await?
        .ok_or(Error::CustomerNotFound { id: customer_id })?;

    let mut active_model: customer::ActiveModel = customer.into();
    active_model.billing_address_id = Set(address_id);
    Ok(active_model.update(db).await?)
}

/// Finds a customer by their unique ID.
pub async fn get_customer_by_id<C>(db: &C, customer_id: i64) -> Result<Option<customer::Model>>
where
    C: ConnectionTrait,
{
    Customer::find_by_id(customer_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a customer by email, ignoring surrounding whitespace.
pub async fn get_customer_by_email<C>(db: &C, email: &str) -> Result<Option<customer::Model>>
where
    C: ConnectionTrait,
{
    Customer::find()
        .filter(customer::Column::Email.eq(email.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a customer and their billing address.
///
/// # Returns
/// * `Ok(Some(context))` - The customer exists; the address may still be None
/// * `Ok(None)` - No customer with this ID
#[instrument(skip(db))]
pub async fn get_customer_context<C>(db: &C, customer_id: i64) -> Result<Option<CustomerContext>>
where
    C: ConnectionTrait,
{
    let Some(customer) = get_customer_by_id(db, customer_id).await? else {
        return Ok(None);
    };

    let billing_address = match customer.billing_address_id {
        Some(address_id) => Address::find_by_id(address_id).one(db).await?,
        None => None,
    };
    debug!(
        "Loaded customer {} with billing address {:?}",
        customer.id,
        billing_address.as_ref().map(|a| a.id)
    );

    Ok(Some(CustomerContext::new(customer, billing_address)))
}
