//! Discount business logic - Discounts, their requirements, and deciding
//! whether a discount applies to a customer.
//!
//! A discount applies when `now` lies inside its date window and every one of
//! its requirements is met. Requirements are routed to their rule by system
//! name; a requirement naming no known rule is never met.

use crate::{
    core::{
        billing_country::{self, BillingCountryRule},
        customer::CustomerContext,
        requirement::{CheckDiscountRequirementRequest, DiscountRequirementRule},
        setting::SettingSource,
    },
    entities::{Discount, DiscountRequirement, discount, discount_requirement},
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument, warn};

/// Creates a new discount, optionally limited to a UTC date window.
pub async fn create_discount<C>(
    db: &C,
    name: String,
    start_date_utc: Option<NaiveDateTime>,
    end_date_utc: Option<NaiveDateTime>,
) -> Result<discount::Model>
where
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Discount name cannot be empty".to_string(),
        });
    }
    if let (Some(start), Some(end)) = (start_date_utc, end_date_utc) {
        if start > end {
            return Err(Error::Config {
                message: format!("Discount starts ({start}) after it ends ({end})"),
            });
        }
    }

    let discount = discount::ActiveModel {
        name: Set(name.trim().to_string()),
        start_date_utc: Set(start_date_utc),
        end_date_utc: Set(end_date_utc),
        ..Default::default()
    };

    Ok(discount.insert(db).await?)
}

/// Finds a discount by its unique ID.
pub async fn get_discount_by_id<C>(db: &C, discount_id: i64) -> Result<Option<discount::Model>>
where
    C: ConnectionTrait,
{
    Discount::find_by_id(discount_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a discount by its name.
pub async fn get_discount_by_name<C>(db: &C, name: &str) -> Result<Option<discount::Model>>
where
    C: ConnectionTrait,
{
    Discount::find()
        .filter(discount::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Attaches a requirement evaluated by the rule named `system_name` to a discount.
pub async fn add_requirement<C>(
    db: &C,
    discount_id: i64,
    system_name: &str,
) -> Result<discount_requirement::Model>
where
    C: ConnectionTrait,
{
    get_discount_by_id(db, discount_id)
        .await?
        .ok_or(Error::DiscountNotFound { id: discount_id })?;

    let requirement = discount_requirement::ActiveModel {
        discount_id: Set(discount_id),
        system_name: Set(system_name.to_string()),
        ..Default::default()
    };

    let requirement = requirement.insert(db).await?;
    info!(
        "Added requirement {} ({}) to discount {}",
        requirement.id, system_name, discount_id
    );
    Ok(requirement)
}

/// Finds a requirement by its unique ID.
pub async fn get_requirement_by_id<C>(
    db: &C,
    requirement_id: i64,
) -> Result<Option<discount_requirement::Model>>
where
    C: ConnectionTrait,
{
    DiscountRequirement::find_by_id(requirement_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all requirements of a discount in creation order.
pub async fn get_requirements_for_discount<C>(
    db: &C,
    discount_id: i64,
) -> Result<Vec<discount_requirement::Model>>
where
    C: ConnectionTrait,
{
    DiscountRequirement::find()
        .filter(discount_requirement::Column::DiscountId.eq(discount_id))
        .order_by_asc(discount_requirement::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a requirement together with any rule configuration stored for it.
#[instrument(skip(db))]
pub async fn delete_requirement(db: &DatabaseConnection, requirement_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let requirement = DiscountRequirement::find_by_id(requirement_id)
        .one(&txn)
        .await?
        .ok_or(Error::DiscountRequirementNotFound { id: requirement_id })?;

    if requirement.system_name == billing_country::SYSTEM_NAME {
        billing_country::delete_billing_country_requirement(&txn, requirement.id).await?;
    }
    DiscountRequirement::delete_by_id(requirement.id)
        .exec(&txn)
        .await?;

    txn.commit().await?;
    info!("Deleted requirement {}", requirement_id);
    Ok(())
}

/// Whether `now` lies inside the discount's (inclusive) date window.
#[must_use]
pub fn is_within_date_window(discount: &discount::Model, now: NaiveDateTime) -> bool {
    discount.start_date_utc.is_none_or(|start| start <= now)
        && discount.end_date_utc.is_none_or(|end| now <= end)
}

/// Checks a single requirement with the rule its system name selects.
///
/// Requirements naming an unknown rule are not met.
pub async fn check_requirement<S>(
    settings: &S,
    requirement: &discount_requirement::Model,
    customer: Option<&CustomerContext>,
) -> Result<bool>
where
    S: SettingSource,
{
    let request = CheckDiscountRequirementRequest::new(requirement.clone(), customer.cloned());

    match requirement.system_name.as_str() {
        billing_country::SYSTEM_NAME => {
            BillingCountryRule::new(settings)
                .check_requirement(Some(&request))
                .await
        }
        unknown => {
            warn!(
                "Requirement {} uses unknown rule '{}'; treating as not met",
                requirement.id, unknown
            );
            Ok(false)
        }
    }
}

/// Decides whether a discount applies to `customer` at `now`.
///
/// # Errors
/// Returns `Error::DiscountNotFound` if the discount does not exist, or any
/// error raised while reading requirement configuration.
#[instrument(skip(db, settings, customer))]
pub async fn is_discount_valid<S>(
    db: &DatabaseConnection,
    settings: &S,
    discount_id: i64,
    customer: Option<&CustomerContext>,
    now: NaiveDateTime,
) -> Result<bool>
where
    S: SettingSource,
{
    let discount = get_discount_by_id(db, discount_id)
        .await?
        .ok_or(Error::DiscountNotFound { id: discount_id })?;

    if !is_within_date_window(&discount, now) {
        debug!("Discount {} is outside its date window", discount.id);
        return Ok(false);
    }

    for requirement in get_requirements_for_discount(db, discount.id).await? {
        if !check_requirement(settings, &requirement, customer).await? {
            debug!(
                "Discount {} rejected by requirement {}",
                discount.id, requirement.id
            );
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{country::CountryId, customer::get_customer_context, setting};
    use crate::test_utils::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_discount_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_discount(&db, "  ".to_string(), None, None).await;
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = create_discount(
            &db,
            "Backwards".to_string(),
            Some(at(2024, 2, 1)),
            Some(at(2024, 1, 1)),
        )
        .await;
        assert!(matches!(result, Err(Error::Config { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_requirement_to_missing_discount() -> Result<()> {
        let db = setup_test_db().await?;

        let result = add_requirement(&db, 404, billing_country::SYSTEM_NAME).await;
        assert!(matches!(result, Err(Error::DiscountNotFound { id: 404 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_requirements_listed_in_order() -> Result<()> {
        let db = setup_test_db().await?;
        let discount = create_test_discount(&db, "Spring").await?;
        let first = add_requirement(&db, discount.id, billing_country::SYSTEM_NAME).await?;
        let second = add_requirement(&db, discount.id, "DiscountRequirement.Other").await?;

        let ids: Vec<i64> = get_requirements_for_discount(&db, discount.id)
            .await?
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_requirement_removes_configuration() -> Result<()> {
        let db = setup_test_db().await?;
        let (requirement, _, country) = setup_billing_country_scenario(&db).await?;
        billing_country::save_billing_country_requirement(
            &db,
            requirement.id,
            CountryId(country.id),
        )
        .await?;

        delete_requirement(&db, requirement.id).await?;

        assert!(get_requirement_by_id(&db, requirement.id).await?.is_none());
        let key = billing_country::billing_country_setting_key(requirement.id);
        assert_eq!(setting::get_setting_value(&db, &key).await?, None);

        let again = delete_requirement(&db, requirement.id).await;
        assert!(matches!(
            again,
            Err(Error::DiscountRequirementNotFound { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_date_window() {
        let discount = discount::Model {
            id: 1,
            name: "January".to_string(),
            start_date_utc: Some(at(2024, 1, 1)),
            end_date_utc: Some(at(2024, 1, 31)),
        };

        assert!(!is_within_date_window(&discount, at(2023, 12, 31)));
        assert!(is_within_date_window(&discount, at(2024, 1, 1)));
        assert!(is_within_date_window(&discount, at(2024, 1, 15)));
        assert!(!is_within_date_window(&discount, at(2024, 2, 1)));

        let open = discount::Model {
            start_date_utc: None,
            end_date_utc: None,
            ..discount
        };
        assert!(is_within_date_window(&open, at(1999, 1, 1)));
    }

    #[tokio::test]
    async fn test_discount_without_requirements_is_valid() -> Result<()> {
        let db = setup_test_db().await?;
        let discount = create_test_discount(&db, "Everyone").await?;

        assert!(is_discount_valid(&db, &db, discount.id, None, at(2024, 5, 1)).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_discount_outside_window_is_invalid() -> Result<()> {
        let db = setup_test_db().await?;
        let discount = create_discount(
            &db,
            "Expired".to_string(),
            None,
            Some(at(2020, 1, 1)),
        )
        .await?;

        assert!(!is_discount_valid(&db, &db, discount.id, None, at(2024, 5, 1)).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_discount_with_billing_country_requirement() -> Result<()> {
        let db = setup_test_db().await?;
        let (requirement, customer, country) = setup_billing_country_scenario(&db).await?;
        billing_country::save_billing_country_requirement(
            &db,
            requirement.id,
            CountryId(country.id),
        )
        .await?;
        let context = get_customer_context(&db, customer.id).await?.unwrap();
        let now = at(2024, 5, 1);

        assert!(is_discount_valid(&db, &db, requirement.discount_id, Some(&context), now).await?);
        assert!(!is_discount_valid(&db, &db, requirement.discount_id, None, now).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_every_requirement_must_be_met() -> Result<()> {
        let db = setup_test_db().await?;
        let (requirement, customer, country) = setup_billing_country_scenario(&db).await?;
        billing_country::save_billing_country_requirement(
            &db,
            requirement.id,
            CountryId(country.id),
        )
        .await?;
        // Second billing-country requirement left unconfigured.
        add_requirement(&db, requirement.discount_id, billing_country::SYSTEM_NAME).await?;
        let context = get_customer_context(&db, customer.id).await?.unwrap();

        let valid = is_discount_valid(
            &db,
            &db,
            requirement.discount_id,
            Some(&context),
            at(2024, 5, 1),
        )
        .await?;
        assert!(!valid);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_rule_is_not_met() -> Result<()> {
        let db = setup_test_db().await?;
        let discount = create_test_discount(&db, "Mystery").await?;
        add_requirement(&db, discount.id, "DiscountRequirement.NotInstalled").await?;

        assert!(!is_discount_valid(&db, &db, discount.id, None, at(2024, 5, 1)).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_discount_is_an_error() -> Result<()> {
        let db = setup_test_db().await?;

        let result = is_discount_valid(&db, &db, 77, None, at(2024, 5, 1)).await;
        assert!(matches!(result, Err(Error::DiscountNotFound { id: 77 })));
        Ok(())
    }
}
