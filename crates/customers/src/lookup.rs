//! Customer lookups against the ERP.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use softbridge_core::{CustomerNo, ErpError, ErpResult, RecipientId};
use softbridge_infra::schema::{customer, customer_extra, customer_terms, generic_address, ship_to};
use softbridge_infra::sql::{sql_quote, softm_date};
use softbridge_infra::{ErpConfig, Query, QueryExecutor, ReferenceResolver, Row};

use crate::customer::{Customer, customer_from_row};

/// Customer keys are stored right-aligned in an 8 character field.
fn padded(no: CustomerNo) -> String {
    sql_quote(format!("{:>8}", no.value()))
}

/// Read access to customer master data and ship-to addresses.
#[derive(Debug)]
pub struct CustomerDirectory<E, R> {
    executor: E,
    refs: R,
    client_tag: String,
}

impl<E, R> CustomerDirectory<E, R>
where
    E: QueryExecutor,
    R: ReferenceResolver,
{
    pub fn new(executor: E, refs: R, config: &ErpConfig) -> Self {
        Self {
            executor,
            refs,
            client_tag: config.client_tag_for("customers"),
        }
    }

    fn run(&self, query: Query) -> ErpResult<Vec<Row>> {
        let query = query.tagged(self.client_tag.clone());
        tracing::debug!(table = query.primary_table(), condition = ?query.condition, "customer query");
        self.executor.query(&query)
    }

    /// All active customer numbers.
    pub fn customer_numbers(&self) -> ErpResult<Vec<CustomerNo>> {
        let rows = self.run(
            Query::table(customer::TABLE)
                .fields([customer::COL_CUSTOMER_NO])
                .condition(format!("{} <> 'X'", customer::COL_STATUS)),
        )?;
        rows.iter()
            .map(|r| r.uint(customer::COL_CUSTOMER_NO).map(CustomerNo::new))
            .collect()
    }

    /// Customers whose master data or sales terms changed since `date`.
    pub fn changed_after(&self, date: NaiveDate) -> ErpResult<Vec<CustomerNo>> {
        let d = softm_date(date);
        let master = self.run(
            Query::table(customer::TABLE)
                .fields([customer::COL_CUSTOMER_NO])
                .condition(format!(
                    "{}>{d} OR {}>={d}",
                    customer::COL_CREATED,
                    customer::COL_CHANGED
                )),
        )?;
        let terms = self.run(
            Query::table(customer_terms::TABLE)
                .fields([customer_terms::COL_CUSTOMER_NO])
                .condition(format!("{}>={d}", customer_terms::COL_CHANGED)),
        )?;

        let mut changed = BTreeSet::new();
        for row in &master {
            changed.insert(CustomerNo::new(row.uint(customer::COL_CUSTOMER_NO)?));
        }
        for row in &terms {
            changed.insert(CustomerNo::new(row.uint(customer_terms::COL_CUSTOMER_NO)?));
        }
        Ok(changed.into_iter().collect())
    }

    /// The customer with number `no`.
    ///
    /// Fails with `NotFound` when no active record exists and with `Consistency`
    /// when the number is not unique.
    pub fn get_customer(&self, no: CustomerNo) -> ErpResult<Customer> {
        let rows = self.run(
            Query::table(customer::TABLE)
                .condition(format!(
                    "{}={} AND {}<>'X'",
                    customer::COL_CUSTOMER_NO,
                    padded(no),
                    customer::COL_STATUS
                ))
                .join(customer_extra::TABLE, customer::COL_CUSTOMER_NO, customer_extra::COL_CUSTOMER_NO)
                .join(customer_terms::TABLE, customer::COL_CUSTOMER_NO, customer_terms::COL_CUSTOMER_NO),
        )?;
        match rows.as_slice() {
            [] => Err(ErpError::not_found(format!("no data for customer {no}"))),
            [row] => customer_from_row(row, &self.refs),
            _ => Err(ErpError::consistency(format!(
                "{} customer records for {no}",
                rows.len()
            ))),
        }
    }

    /// The customer (or ship-to address) carrying the global location number `gln`.
    ///
    /// Checks the customer master first, then alternate ship-to addresses.
    pub fn get_customer_by_gln(&self, gln: &str) -> ErpResult<Customer> {
        let gln_value: u64 = gln
            .trim()
            .parse()
            .map_err(|_| ErpError::invalid_id(format!("GLN: {gln:?}")))?;
        let quoted = sql_quote(gln_value);

        let master = self.run(
            Query::table(customer_extra::TABLE)
                .condition(format!("{}={quoted}", customer_extra::COL_GLN)),
        )?;
        if let Some(row) = master.first() {
            return self.get_customer(CustomerNo::new(row.uint(customer_extra::CUSTOMER_NO)?));
        }

        let ship_tos = self.run(
            Query::table(ship_to::TABLE).condition(format!("{}={quoted}", ship_to::COL_GLN)),
        )?;
        if let Some(ship) = ship_tos.first() {
            if let Some(address) = self.generic_addresses(ship)?.first() {
                return self.ship_to_customer(address, ship);
            }
        }

        Err(ErpError::not_found(format!("no data for GLN {gln_value}")))
    }

    /// All alternate delivery addresses of a customer.
    ///
    /// Each active ship-to entry must resolve to at most one address record.
    pub fn delivery_addresses(&self, no: CustomerNo) -> ErpResult<Vec<Customer>> {
        let ship_tos = self.run(Query::table(ship_to::TABLE).condition(format!(
            "{}={} AND {} <>'X'",
            ship_to::COL_CUSTOMER_NO,
            padded(no),
            ship_to::COL_STATUS
        )))?;

        let mut customers = Vec::with_capacity(ship_tos.len());
        for ship in &ship_tos {
            match self.generic_addresses(ship)?.as_slice() {
                [] => {}
                [address] => customers.push(self.ship_to_customer(address, ship)?),
                _ => {
                    return Err(ErpError::consistency(format!(
                        "delivery address of {no} is inconsistent: record {} is not unique",
                        ship.text_or_empty(ship_to::ADDRESS_RECORD_NO)
                    )));
                }
            }
        }
        Ok(customers)
    }

    /// The delivery address of a goods recipient.
    ///
    /// A bare customer number resolves to the master address. A ship-to id
    /// resolves the alternate address; `None` when it does not exist.
    pub fn delivery_address(&self, recipient: RecipientId) -> ErpResult<Option<Customer>> {
        let Some(address_no) = recipient.address_no() else {
            return self.get_customer(recipient.customer()).map(Some);
        };

        let rows = self.run(
            Query::table(ship_to::TABLE)
                .join(generic_address::TABLE, ship_to::COL_ADDRESS_RECORD_NO, generic_address::COL_RECORD_NO)
                .condition(format!(
                    "{}={} AND {}={address_no:03} AND {} <>'X'",
                    ship_to::COL_CUSTOMER_NO,
                    padded(recipient.customer()),
                    ship_to::COL_SHIP_TO_NO,
                    ship_to::COL_STATUS
                )),
        )?;
        match rows.as_slice() {
            [] => Ok(None),
            [row] => {
                let mut customer = customer_from_row(row, &self.refs)?;
                customer.customer_no = recipient;
                Ok(Some(customer))
            }
            _ => Err(ErpError::consistency(format!(
                "delivery address {recipient} is inconsistent: {} records",
                rows.len()
            ))),
        }
    }

    fn generic_addresses(&self, ship: &Row) -> ErpResult<Vec<Row>> {
        let record_no = ship.uint(ship_to::ADDRESS_RECORD_NO)?;
        self.run(
            Query::table(generic_address::TABLE)
                .condition(format!("{}={}", generic_address::COL_RECORD_NO, sql_quote(record_no))),
        )
    }

    fn ship_to_customer(&self, address: &Row, ship: &Row) -> ErpResult<Customer> {
        let mut customer = customer_from_row(address, &self.refs)?;
        let ship_to_no = u16::try_from(ship.uint(ship_to::SHIP_TO_NO)?).map_err(|_| {
            ErpError::consistency(format!("ship-to number out of range for {}", customer.customer_no))
        })?;
        customer.customer_no = customer.customer_no.with_address(ship_to_no);
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use softbridge_infra::testing::ScriptedExecutor;
    use softbridge_infra::StaticReferenceResolver;

    fn customer_row(no: &str) -> Row {
        Row::new("XKD00")
            .with("kundennr", no)
            .with("name1", "Sport A")
            .with("laenderkennzeichen", "D")
            .with("betreuer", "verkauf")
    }

    fn directory(exec: &ScriptedExecutor) -> CustomerDirectory<&ScriptedExecutor, StaticReferenceResolver> {
        CustomerDirectory::new(exec, StaticReferenceResolver::default(), &ErpConfig::default())
    }

    #[test]
    fn get_customer_returns_the_single_match() {
        let exec = ScriptedExecutor::new(|_| Ok(vec![customer_row("17200")]));
        let c = directory(&exec).get_customer("SC17200".parse().unwrap()).unwrap();
        assert_eq!(c.customer_no.to_string(), "SC17200");

        let q = &exec.queries()[0];
        assert_eq!(q.condition.as_deref(), Some("KDKDNR='   17200' AND KDSTAT<>'X'"));
        assert_eq!(q.joins.len(), 2);
        assert_eq!(q.client_tag.as_deref(), Some("softbridge.customers"));
    }

    #[test]
    fn get_customer_without_rows_is_not_found() {
        let exec = ScriptedExecutor::empty();
        let err = directory(&exec).get_customer(CustomerNo::new(1)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn get_customer_with_duplicates_is_inconsistent() {
        let exec = ScriptedExecutor::new(|_| Ok(vec![customer_row("17200"), customer_row("17200")]));
        let err = directory(&exec).get_customer(CustomerNo::new(17200)).unwrap_err();
        assert!(err.is_consistency());
    }

    #[test]
    fn gln_prefers_customer_master() {
        let exec = ScriptedExecutor::new(|q| match q.primary_table() {
            "XKS00" => Ok(vec![Row::new("XKS00").with("kundennr", 66669)]),
            "XKD00" => Ok(vec![customer_row("66669")]),
            other => panic!("unexpected query on {other}"),
        });
        let c = directory(&exec).get_customer_by_gln("4306544031019").unwrap();
        assert_eq!(c.customer_no.to_string(), "SC66669");
        assert_eq!(
            exec.queries()[0].condition.as_deref(),
            Some("KCE2IL='4306544031019'")
        );
    }

    #[test]
    fn gln_falls_back_to_ship_to_address() {
        let exec = ScriptedExecutor::new(|q| match q.primary_table() {
            "XKS00" => Ok(vec![]),
            "AVA00" => Ok(vec![Row::new("AVA00").with("satznr", 991).with("versandadresssnr", 2)]),
            "XXA00" => {
                assert_eq!(q.condition.as_deref(), Some("XASANR='991'"));
                Ok(vec![customer_row("28000")])
            }
            other => panic!("unexpected query on {other}"),
        });
        let c = directory(&exec).get_customer_by_gln("4306544000008").unwrap();
        assert_eq!(c.customer_no.to_string(), "SC28000.002");
        assert!(c.is_ship_to());
    }

    #[test]
    fn unknown_gln_is_not_found_and_malformed_gln_is_rejected() {
        let exec = ScriptedExecutor::empty();
        let dir = directory(&exec);
        assert!(dir.get_customer_by_gln("4306544000008").unwrap_err().is_not_found());
        assert!(matches!(
            dir.get_customer_by_gln("43065x").unwrap_err(),
            ErpError::InvalidId(_)
        ));
    }

    #[test]
    fn delivery_addresses_compose_ship_to_ids() {
        let exec = ScriptedExecutor::new(|q| match q.primary_table() {
            "AVA00" => Ok(vec![
                Row::new("AVA00").with("satznr", 1).with("versandadresssnr", 1),
                Row::new("AVA00").with("satznr", 2).with("versandadresssnr", 7),
                Row::new("AVA00").with("satznr", 3).with("versandadresssnr", 8),
            ]),
            "XXA00" if q.condition.as_deref() == Some("XASANR='3'") => Ok(vec![]),
            "XXA00" => Ok(vec![customer_row("28000")]),
            other => panic!("unexpected query on {other}"),
        });
        let addresses = directory(&exec).delivery_addresses(CustomerNo::new(28000)).unwrap();
        let ids: Vec<_> = addresses.iter().map(|c| c.customer_no.to_string()).collect();
        assert_eq!(ids, vec!["SC28000.001", "SC28000.007"]);
    }

    #[test]
    fn delivery_addresses_reject_ambiguous_address_records() {
        let exec = ScriptedExecutor::new(|q| match q.primary_table() {
            "AVA00" => Ok(vec![Row::new("AVA00").with("satznr", 1).with("versandadresssnr", 1)]),
            _ => Ok(vec![customer_row("28000"), customer_row("28000")]),
        });
        let err = directory(&exec).delivery_addresses(CustomerNo::new(28000)).unwrap_err();
        assert!(err.is_consistency());
    }

    #[test]
    fn delivery_address_for_master_recipient_uses_customer_master() {
        let exec = ScriptedExecutor::new(|q| {
            assert_eq!(q.primary_table(), "XKD00");
            Ok(vec![customer_row("17200")])
        });
        let c = directory(&exec)
            .delivery_address("SC17200".parse().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(c.customer_no.to_string(), "SC17200");
    }

    #[test]
    fn delivery_address_for_ship_to_recipient() {
        let exec = ScriptedExecutor::new(|q| {
            assert_eq!(q.primary_table(), "AVA00");
            assert_eq!(
                q.condition.as_deref(),
                Some("VAKDNR='   17200' AND VAVANR=002 AND VASTAT <>'X'")
            );
            Ok(vec![customer_row("17200")])
        });
        let dir = directory(&exec);
        let c = dir.delivery_address("SC17200.002".parse().unwrap()).unwrap().unwrap();
        assert_eq!(c.customer_no.to_string(), "SC17200.002");
    }

    #[test]
    fn delivery_address_missing_or_ambiguous() {
        let exec = ScriptedExecutor::empty();
        assert_eq!(
            directory(&exec).delivery_address("SC1.001".parse().unwrap()).unwrap(),
            None
        );

        let exec = ScriptedExecutor::new(|_| Ok(vec![customer_row("1"), customer_row("1")]));
        let err = directory(&exec)
            .delivery_address("SC1.001".parse().unwrap())
            .unwrap_err();
        assert!(err.is_consistency());
    }

    #[test]
    fn changed_after_merges_master_and_terms() {
        let exec = ScriptedExecutor::new(|q| match q.primary_table() {
            "XKD00" => {
                assert_eq!(q.condition.as_deref(), Some("KDDTER>1101101 OR KDDTAE>=1101101"));
                Ok(vec![
                    Row::new("XKD00").with("KDKDNR", 3),
                    Row::new("XKD00").with("KDKDNR", 1),
                ])
            }
            "AKZ00" => Ok(vec![
                Row::new("AKZ00").with("KZKDNR", 1),
                Row::new("AKZ00").with("KZKDNR", 2),
            ]),
            other => panic!("unexpected query on {other}"),
        });
        let date = NaiveDate::from_ymd_opt(2010, 11, 1).unwrap();
        let changed = directory(&exec).changed_after(date).unwrap();
        assert_eq!(
            changed,
            vec![CustomerNo::new(1), CustomerNo::new(2), CustomerNo::new(3)]
        );
    }

    #[test]
    fn customer_numbers_lists_active_customers() {
        let exec = ScriptedExecutor::new(|_| Ok(vec![Row::new("XKD00").with("KDKDNR", "   10003")]));
        let numbers = directory(&exec).customer_numbers().unwrap();
        assert_eq!(numbers, vec![CustomerNo::new(10003)]);
        assert_eq!(exec.queries()[0].condition.as_deref(), Some("KDSTAT <> 'X'"));
    }
}
