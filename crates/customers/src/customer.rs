use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use softbridge_core::{CustomerNo, ErpResult, RecipientId};
use softbridge_infra::schema::{address, customer};
use softbridge_infra::{ReferenceResolver, Row};

/// Normalized customer (or alternate ship-to address) record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer number; carries a ship-to suffix for alternate delivery addresses.
    pub customer_no: RecipientId,
    /// Display name: first two name lines joined.
    pub name: String,
    pub name1: String,
    pub name2: String,
    pub name3: String,
    pub street: String,
    /// ISO 3166 alpha-2.
    pub country: String,
    pub postcode: String,
    pub city: String,
    pub phone: String,
    pub fax: String,
    pub mobile: String,
    pub mail: String,
    pub vat_id: String,
    pub address_file_id: String,
    pub company: String,
    /// Staff code of the account manager as stored in the ERP.
    pub account_manager_handle: String,
    /// Resolved account manager name; empty when the code is unknown.
    pub account_manager: String,
    pub internal_company_no: String,
    pub our_supplier_no: String,
    /// Parent organization (buying association) the customer belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association_no: Option<CustomerNo>,
    /// Membership number within the association.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gln: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<NaiveDate>,
    /// Last modification; the creation date when the record was never changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<NaiveDate>,
}

impl Customer {
    /// Whether this record is an alternate ship-to address rather than the master address.
    pub fn is_ship_to(&self) -> bool {
        !self.customer_no.is_master()
    }
}

/// Map a customer-shaped row (`XKD00`, `XXA00`, or joins thereof) into a [`Customer`].
///
/// Null columns read as empty. An unknown account manager code is logged and
/// leaves the resolved name empty.
pub fn customer_from_row<R: ReferenceResolver + ?Sized>(row: &Row, refs: &R) -> ErpResult<Customer> {
    let customer_no = CustomerNo::new(row.uint(customer::CUSTOMER_NO)?);
    let text = |field: &str| row.text_or_empty(field);

    let name1 = text(address::NAME1);
    let name2 = text(address::NAME2);
    let name = format!("{name1} {name2}").trim().to_string();

    let account_manager_handle = text(customer::ACCOUNT_MANAGER);
    let account_manager = refs
        .resolve_handler(&account_manager_handle)
        .unwrap_or_default();
    if account_manager.is_empty() {
        tracing::error!(
            customer = %customer_no,
            name = %name1,
            handle = %account_manager_handle,
            "customer has no valid account manager"
        );
    }

    let association_no = row
        .opt_uint(customer::ASSOCIATION_NO)?
        .filter(|n| *n != 0)
        .map(CustomerNo::new);
    let member_no = association_no.map(|_| text(customer::MEMBER_NO));

    let gln = row
        .opt_int(customer::GLN)?
        .filter(|n| *n != 0)
        .map(|n| n.to_string());

    let created = row.opt_date(customer::CREATED)?;
    let modified = row.opt_date(customer::CHANGED)?.or(created);

    Ok(Customer {
        customer_no: customer_no.into(),
        name,
        name2,
        name3: text(address::NAME3),
        street: text(address::STREET),
        country: refs.country_code_to_iso(&text(address::COUNTRY_CODE)),
        postcode: text(address::POSTCODE),
        city: text(address::CITY),
        phone: text(address::PHONE),
        fax: text(address::FAX),
        mobile: text(customer::MOBILE),
        mail: text(customer::MAIL),
        vat_id: text(customer::VAT_ID),
        address_file_id: text(customer::ADDRESS_FILE_ID),
        company: text(customer::COMPANY),
        account_manager_handle,
        account_manager,
        internal_company_no: text(customer::INTERNAL_COMPANY_NO),
        our_supplier_no: text(customer::OUR_SUPPLIER_NO),
        association_no,
        member_no,
        gln,
        created,
        modified,
        name1,
    })
}
