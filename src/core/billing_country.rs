//! Billing country discount rule.
//!
//! A requirement of this kind is met when the customer's billing address lies
//! in the country configured for the requirement. The configured country lives
//! in the settings store under a key derived from the requirement id; only
//! [`billing_country_setting_key`] knows the key format.
//!
//! A missing setting, or a stored country id of `0`, means the requirement was
//! never configured and can never be met.

use crate::{
    core::{
        country::{self, CountryId},
        discount,
        requirement::{CheckDiscountRequirementRequest, DiscountRequirementRule},
        setting::{self, SettingSource},
    },
    errors::{Error, Result},
};
use sea_orm::ConnectionTrait;
use tracing::{debug, info, instrument};

/// System name stored on requirements evaluated by [`BillingCountryRule`].
pub const SYSTEM_NAME: &str = "DiscountRequirement.BillingCountryIs";

const SETTING_KEY_PREFIX: &str = "DiscountRequirement.BillingCountry-";
const CONFIGURE_PATH: &str = "Plugins/DiscountRulesBillingCountry/Configure/";

/// Locale resources shown by the admin configuration page, with their default
/// English text. Registering them is up to the hosting application.
pub const LOCALE_RESOURCES: [(&str, &str); 3] = [
    (
        "Plugins.DiscountRules.BillingCountry.Fields.SelectCountry",
        "Select country",
    ),
    (
        "Plugins.DiscountRules.BillingCountry.Fields.Country",
        "Billing country",
    ),
    (
        "Plugins.DiscountRules.BillingCountry.Fields.Country.Hint",
        "Select required billing country.",
    ),
];

/// Settings key holding the configured country of a requirement.
#[must_use]
pub fn billing_country_setting_key(discount_requirement_id: i64) -> String {
    format!("{SETTING_KEY_PREFIX}{discount_requirement_id}")
}

/// Builds the relative admin URL used to configure a billing country requirement.
#[must_use]
pub fn configuration_url(discount_id: i64, discount_requirement_id: Option<i64>) -> String {
    let mut url = format!("{CONFIGURE_PATH}?discountId={discount_id}");
    if let Some(requirement_id) = discount_requirement_id {
        url.push_str(&format!("&discountRequirementId={requirement_id}"));
    }
    url
}

/// Reads the country configured for a requirement.
///
/// # Returns
/// * `Ok(Some(country))` - The requirement is configured
/// * `Ok(None)` - Nothing stored, or the stored id is zero
///
/// # Errors
/// Returns `Error::InvalidSetting` if the stored value is not an integer.
pub async fn get_billing_country_requirement<S>(
    settings: &S,
    discount_requirement_id: i64,
) -> Result<Option<CountryId>>
where
    S: SettingSource,
{
    let country_id: i64 = settings
        .setting_by_key(&billing_country_setting_key(discount_requirement_id))
        .await?;
    Ok((country_id != 0).then_some(CountryId(country_id)))
}

/// Stores the country a requirement is keyed on. Saving `CountryId(0)` clears
/// the configuration.
#[instrument(skip(db))]
pub async fn save_billing_country_requirement<C>(
    db: &C,
    discount_requirement_id: i64,
    country: CountryId,
) -> Result<()>
where
    C: ConnectionTrait,
{
    setting::set_setting(
        db,
        &billing_country_setting_key(discount_requirement_id),
        &country.to_string(),
    )
    .await?;
    info!(
        "Requirement {} now requires billing country {}",
        discount_requirement_id, country
    );
    Ok(())
}

/// Configures the billing country of an existing requirement by ISO code, or
/// clears it when `country_code` is None.
///
/// # Errors
/// * `Error::DiscountRequirementNotFound` if the requirement does not exist
/// * `Error::Config` if the requirement is evaluated by another rule
/// * `Error::CountryNotFound` if no country has the given ISO code
pub async fn configure_billing_country<C>(
    db: &C,
    discount_requirement_id: i64,
    country_code: Option<&str>,
) -> Result<CountryId>
where
    C: ConnectionTrait,
{
    let requirement = discount::get_requirement_by_id(db, discount_requirement_id)
        .await?
        .ok_or(Error::DiscountRequirementNotFound {
            id: discount_requirement_id,
        })?;
    if requirement.system_name != SYSTEM_NAME {
        return Err(Error::Config {
            message: format!(
                "Requirement {} is evaluated by '{}', not by the billing country rule",
                requirement.id, requirement.system_name
            ),
        });
    }

    let country_id = match country_code {
        Some(code) => country::get_country_by_iso_code(db, code)
            .await?
            .map(|c| CountryId::from(&c))
            .ok_or_else(|| Error::CountryNotFound {
                code: code.to_string(),
            })?,
        None => CountryId(0),
    };

    save_billing_country_requirement(db, requirement.id, country_id).await?;
    Ok(country_id)
}

/// Removes the configured country of a requirement, returning whether one existed.
pub async fn delete_billing_country_requirement<C>(
    db: &C,
    discount_requirement_id: i64,
) -> Result<bool>
where
    C: ConnectionTrait,
{
    setting::delete_setting(db, &billing_country_setting_key(discount_requirement_id)).await
}

/// Evaluates "billing country is X" requirements against a settings source.
#[derive(Debug)]
pub struct BillingCountryRule<'a, S> {
    settings: &'a S,
}

impl<'a, S> BillingCountryRule<'a, S>
where
    S: SettingSource,
{
    /// Creates a rule reading its configuration from `settings`.
    #[must_use]
    pub const fn new(settings: &'a S) -> Self {
        Self { settings }
    }
}

impl<S> DiscountRequirementRule for BillingCountryRule<'_, S>
where
    S: SettingSource,
{
    fn system_name(&self) -> &'static str {
        SYSTEM_NAME
    }

    async fn check_requirement(
        &self,
        request: Option<&CheckDiscountRequirementRequest>,
    ) -> Result<bool> {
        let request = request.ok_or_else(|| Error::InvalidArgument {
            name: "request".to_string(),
        })?;
        let requirement =
            request
                .discount_requirement
                .as_ref()
                .ok_or_else(|| Error::InvalidState {
                    message: "Discount requirement is not set".to_string(),
                })?;

        let Some(customer) = request.customer.as_ref() else {
            return Ok(false);
        };
        let Some(billing_address) = customer.billing_address.as_ref() else {
            return Ok(false);
        };

        let Some(required) = get_billing_country_requirement(self.settings, requirement.id).await?
        else {
            debug!(
                "Requirement {} has no billing country configured",
                requirement.id
            );
            return Ok(false);
        };

        let met = billing_address.country_id == Some(required.get());
        debug!(
            "Requirement {}: customer {} billing country {:?}, required {} => {}",
            requirement.id, customer.customer.id, billing_address.country_id, required, met
        );
        Ok(met)
    }

    fn get_configuration_url(
        &self,
        discount_id: i64,
        discount_requirement_id: Option<i64>,
    ) -> String {
        configuration_url(discount_id, discount_requirement_id)
    }
}
