//! Strongly-typed, prefixed ERP identifiers.
//!
//! The ERP stores plain numbers; applications exchange them with a two-letter
//! type prefix (`SC17200`, `SO1163764`, ...). Parsing accepts both forms and
//! rejects anything else at the boundary.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ErpError;

/// Customer number, prefix `SC`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomerNo(u32);

/// Sales order number, prefix `SO`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderNo(u32);

/// Delivery note number, prefix `SL`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeliveryNoteNo(u32);

/// Picking document number, prefix `KA`. `KB` is accepted when parsing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PickingNo(u32);

/// Warehouse number, prefix `LG`, always rendered with three digits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WarehouseNo(u16);

/// Strip one of `prefixes` (if present) and validate the remaining digits.
fn digits<'a>(raw: &'a str, prefixes: &[&str], name: &str) -> Result<&'a str, ErpError> {
    let trimmed = raw.trim();
    let rest = prefixes
        .iter()
        .find_map(|p| trimmed.strip_prefix(p))
        .unwrap_or(trimmed)
        .trim_start();
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ErpError::invalid_id(format!("{name}: {raw:?}")));
    }
    Ok(rest)
}

macro_rules! impl_prefixed_id {
    ($t:ident, $inner:ty, $name:literal, [$($prefix:literal),+], $width:literal) => {
        impl $t {
            /// Prefix used when rendering this identifier.
            pub const PREFIX: &'static str = impl_prefixed_id!(@first $($prefix),+);

            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// The bare numeric value as stored in the ERP.
            pub const fn value(&self) -> $inner {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}{:0width$}", Self::PREFIX, self.0, width = $width)
            }
        }

        impl From<$inner> for $t {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl FromStr for $t {
            type Err = ErpError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let d = digits(s, &[$($prefix),+], $name)?;
                d.parse::<$inner>()
                    .map(Self)
                    .map_err(|e| ErpError::invalid_id(format!("{}: {s:?}: {e}", $name)))
            }
        }

        impl Serialize for $t {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
    (@first $first:literal $(, $rest:literal)*) => {
        $first
    };
}

impl_prefixed_id!(CustomerNo, u32, "CustomerNo", ["SC"], 0);
impl_prefixed_id!(OrderNo, u32, "OrderNo", ["SO"], 0);
impl_prefixed_id!(DeliveryNoteNo, u32, "DeliveryNoteNo", ["SL"], 0);
impl_prefixed_id!(PickingNo, u32, "PickingNo", ["KA", "KB"], 0);
impl_prefixed_id!(WarehouseNo, u16, "WarehouseNo", ["LG"], 3);

/// Goods recipient: a customer, optionally narrowed to one of its alternate
/// ship-to addresses (`SC17200.002`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecipientId {
    customer: CustomerNo,
    address_no: Option<u16>,
}

impl RecipientId {
    pub const fn new(customer: CustomerNo, address_no: Option<u16>) -> Self {
        Self {
            customer,
            address_no,
        }
    }

    pub const fn customer(&self) -> CustomerNo {
        self.customer
    }

    pub const fn address_no(&self) -> Option<u16> {
        self.address_no
    }

    /// The same recipient narrowed to a ship-to address. `0` means the master address.
    pub fn with_address(self, address_no: u16) -> Self {
        Self {
            customer: self.customer,
            address_no: (address_no != 0).then_some(address_no),
        }
    }

    /// Whether this recipient is the customer's master address.
    pub fn is_master(&self) -> bool {
        self.address_no.is_none()
    }
}

impl From<CustomerNo> for RecipientId {
    fn from(customer: CustomerNo) -> Self {
        Self::new(customer, None)
    }
}

impl core::fmt::Display for RecipientId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.address_no {
            Some(n) => write!(f, "{}.{:03}", self.customer, n),
            None => core::fmt::Display::fmt(&self.customer, f),
        }
    }
}

impl FromStr for RecipientId {
    type Err = ErpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.split_once(['.', '/']) {
            None => Ok(Self::from(trimmed.parse::<CustomerNo>()?)),
            Some((customer, address)) => {
                let customer = customer.parse::<CustomerNo>()?;
                let address = digits(address, &[], "RecipientId")?
                    .parse::<u16>()
                    .map_err(|e| ErpError::invalid_id(format!("RecipientId: {s:?}: {e}")))?;
                Ok(Self::new(customer, None).with_address(address))
            }
        }
    }
}

impl Serialize for RecipientId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecipientId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_with_and_without_prefix() {
        assert_eq!("SC17200".parse::<CustomerNo>().unwrap(), CustomerNo::new(17200));
        assert_eq!("17200".parse::<CustomerNo>().unwrap(), CustomerNo::new(17200));
        assert_eq!("SC   17200".parse::<CustomerNo>().unwrap(), CustomerNo::new(17200));
        assert_eq!(" SO1163764 ".parse::<OrderNo>().unwrap(), OrderNo::new(1163764));
    }

    #[test]
    fn picking_numbers_accept_both_type_prefixes() {
        assert_eq!("KA123".parse::<PickingNo>().unwrap(), PickingNo::new(123));
        assert_eq!("KB123".parse::<PickingNo>().unwrap(), PickingNo::new(123));
        assert_eq!(PickingNo::new(123).to_string(), "KA123");
    }

    #[test]
    fn rejects_malformed_input() {
        for raw in ["", "SC", "SCabc", "SL12x", "SO-1", "12.5", "SX100"] {
            let err = raw.parse::<CustomerNo>().unwrap_err();
            assert!(matches!(err, ErpError::InvalidId(_)), "{raw:?} -> {err:?}");
        }
        assert!("SO99999999999".parse::<OrderNo>().is_err());
    }

    #[test]
    fn foreign_prefix_is_rejected() {
        assert!("SL4173969".parse::<OrderNo>().is_err());
        assert!("SO4173969".parse::<DeliveryNoteNo>().is_err());
    }

    #[test]
    fn warehouse_is_zero_padded() {
        assert_eq!(WarehouseNo::new(1).to_string(), "LG001");
        assert_eq!("LG010".parse::<WarehouseNo>().unwrap(), WarehouseNo::new(10));
    }

    #[test]
    fn recipient_formats_ship_to_suffix() {
        let master = RecipientId::from(CustomerNo::new(17200));
        assert_eq!(master.to_string(), "SC17200");
        assert_eq!(master.with_address(2).to_string(), "SC17200.002");
        assert_eq!(master.with_address(0), master);
    }

    #[test]
    fn recipient_accepts_legacy_slash_separator() {
        let r: RecipientId = "SC17200/002".parse().unwrap();
        assert_eq!(r.customer(), CustomerNo::new(17200));
        assert_eq!(r.address_no(), Some(2));
        assert!("SC17200.".parse::<RecipientId>().is_err());
        assert!("SC17200.x1".parse::<RecipientId>().is_err());
    }

    #[test]
    fn serializes_as_prefixed_string() {
        let json = serde_json::to_string(&DeliveryNoteNo::new(4173969)).unwrap();
        assert_eq!(json, "\"SL4173969\"");
        let back: DeliveryNoteNo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DeliveryNoteNo::new(4173969));
        assert!(serde_json::from_str::<DeliveryNoteNo>("\"SLx\"").is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: rendering then parsing yields the same identifier.
        #[test]
        fn display_parses_back(n in any::<u32>(), addr in 0u16..1000) {
            let c = CustomerNo::new(n);
            prop_assert_eq!(c.to_string().parse::<CustomerNo>().unwrap(), c);
            let r = RecipientId::from(c).with_address(addr);
            prop_assert_eq!(r.to_string().parse::<RecipientId>().unwrap(), r);
        }

        /// Property: strings containing a non-digit after the prefix never parse.
        #[test]
        fn non_digit_suffix_is_rejected(n in any::<u32>(), junk in "[a-zA-Z_-]{1,4}") {
            let raw = format!("SO{n}{junk}");
            prop_assert!(raw.parse::<OrderNo>().is_err());
        }
    }
}
