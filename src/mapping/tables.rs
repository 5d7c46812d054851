//! Resource Mapping Tables
//!
//! One table per backend record shape. Nested shapes (a car inside a sale, an
//! address inside a customer) get their own tables where their defaults differ
//! from the top-level record.

use crate::mapping::FieldKind::{
    Currency, Decimal, Id, Integer, OptionalDecimal, OptionalText, Record, Reference, Text,
};
use crate::mapping::{FieldRule, RecordMapping};
use crate::types::BackendVersion::{V1, V2};
use crate::types::ResourceKind;

/// Mapping used for a resource's own records.
pub fn mapping_for(kind: ResourceKind) -> &'static RecordMapping {
    match kind {
        ResourceKind::Car => &CAR,
        ResourceKind::Customer => &CUSTOMER,
        ResourceKind::Gallerist => &GALLERIST,
        ResourceKind::Account => &ACCOUNT,
        ResourceKind::Address => &ADDRESS,
        ResourceKind::Sale => &SALE,
        ResourceKind::Inventory => &INVENTORY,
    }
}

const CAR_OUTBOUND: &[FieldRule] = &[
    FieldRule::new("plate", "plaka", Text("")),
    FieldRule::same("brand", Text("")),
    FieldRule::same("model", Text("")),
    FieldRule::same("productionYear", Integer(0)),
    FieldRule::same("price", Decimal(0.0)),
    FieldRule::same("currencyType", Currency),
    FieldRule::same("damagePrice", OptionalDecimal),
    FieldRule::same("carStatusType", Text("")),
];

pub static CAR: RecordMapping = RecordMapping {
    name: "car",
    inbound: &[
        FieldRule::same("id", Id),
        FieldRule::new("plate", "plaka", Text("")),
        FieldRule::same("brand", Text("")),
        FieldRule::same("model", Text("")),
        FieldRule::same("productionYear", Integer(0)),
        FieldRule::same("price", Decimal(0.0)),
        FieldRule::same("currencyType", Currency),
        FieldRule::same("damagePrice", OptionalDecimal),
        FieldRule::same("carStatusType", Text("SALABLE")),
        FieldRule::new("createdAt", "createTime", OptionalText),
        FieldRule::new("updatedAt", "createTime", OptionalText),
    ],
    outbound: CAR_OUTBOUND,
};

/// Car embedded in an inventory assignment: damage price defaults to zero.
pub static INVENTORY_CAR: RecordMapping = RecordMapping {
    name: "car",
    inbound: &[
        FieldRule::same("id", Id),
        FieldRule::new("plate", "plaka", Text("")),
        FieldRule::same("brand", Text("")),
        FieldRule::same("model", Text("")),
        FieldRule::same("productionYear", Integer(0)),
        FieldRule::same("price", Decimal(0.0)),
        FieldRule::same("currencyType", Currency),
        FieldRule::same("damagePrice", Decimal(0.0)),
        FieldRule::same("carStatusType", Text("SALABLE")),
    ],
    outbound: CAR_OUTBOUND,
};

/// Car embedded in a sale: status defaults to sold.
pub static SALE_CAR: RecordMapping = RecordMapping {
    name: "car",
    inbound: &[
        FieldRule::same("id", Id),
        FieldRule::new("plate", "plaka", Text("")),
        FieldRule::same("brand", Text("")),
        FieldRule::same("model", Text("")),
        FieldRule::same("productionYear", Integer(0)),
        FieldRule::same("price", Decimal(0.0)),
        FieldRule::same("currencyType", Currency),
        FieldRule::same("damagePrice", OptionalDecimal),
        FieldRule::same("carStatusType", Text("SALED")),
    ],
    outbound: CAR_OUTBOUND,
};

pub static ADDRESS: RecordMapping = RecordMapping {
    name: "address",
    inbound: &[
        FieldRule::same("id", Id),
        FieldRule::same("city", Text("")),
        FieldRule::same("district", Text("")),
        FieldRule::same("neighborhood", Text("")),
        FieldRule::same("street", Text("")),
        FieldRule::same("postalCode", Text("")).only(V1),
        FieldRule::same("createdAt", OptionalText).only(V1),
        FieldRule::same("updatedAt", OptionalText).only(V1),
        FieldRule::new("createdAt", "createTime", OptionalText).only(V2),
        FieldRule::new("updatedAt", "updateTime", OptionalText).only(V2),
    ],
    outbound: &[
        FieldRule::same("city", Text("")),
        FieldRule::same("district", Text("")),
        FieldRule::same("neighborhood", Text("")),
        FieldRule::same("street", Text("")),
        FieldRule::same("postalCode", Text("")).only(V1),
    ],
};

pub static ACCOUNT: RecordMapping = RecordMapping {
    name: "account",
    inbound: &[
        FieldRule::same("id", Id),
        FieldRule::same("accountNo", Text("")),
        FieldRule::same("iban", Text("")),
        FieldRule::same("amount", Decimal(0.0)),
        FieldRule::same("currencyType", Currency),
        FieldRule::new("createdAt", "createTime", OptionalText),
        FieldRule::new("updatedAt", "updateTime", OptionalText),
    ],
    outbound: &[
        FieldRule::same("accountNo", Text("")),
        FieldRule::same("iban", Text("")),
        FieldRule::same("amount", Decimal(0.0)),
        FieldRule::same("currencyType", Currency),
    ],
};

pub static CUSTOMER: RecordMapping = RecordMapping {
    name: "customer",
    inbound: &[
        FieldRule::same("id", Id),
        FieldRule::same("firstName", Text("")),
        FieldRule::same("lastName", Text("")),
        FieldRule::same("tckn", Text("")),
        FieldRule::same("birthDate", Text("")),
        FieldRule::same("address", Record(&ADDRESS)),
        FieldRule::same("account", Record(&ACCOUNT)),
        FieldRule::new("createdAt", "createTime", OptionalText),
        FieldRule::new("updatedAt", "updateTime", OptionalText),
    ],
    outbound: &[
        FieldRule::same("firstName", Text("")),
        FieldRule::same("lastName", Text("")),
        FieldRule::same("tckn", Text("")),
        FieldRule::same("birthDate", Text("")),
        FieldRule::same("addressId", Reference),
        FieldRule::same("accountId", Reference),
    ],
};

pub static GALLERIST: RecordMapping = RecordMapping {
    name: "gallerist",
    inbound: &[
        FieldRule::same("id", Id),
        FieldRule::same("firstName", Text("")),
        FieldRule::same("lastName", Text("")),
        FieldRule::same("address", Record(&ADDRESS)),
        FieldRule::new("createdAt", "createTime", OptionalText),
        FieldRule::new("updatedAt", "createTime", OptionalText),
    ],
    outbound: &[
        FieldRule::same("firstName", Text("")),
        FieldRule::same("lastName", Text("")),
        FieldRule::same("addressId", Reference),
    ],
};

pub static INVENTORY: RecordMapping = RecordMapping {
    name: "gallerist-car",
    inbound: &[
        FieldRule::same("id", Id),
        FieldRule::same("gallerist", Record(&GALLERIST)),
        FieldRule::same("car", Record(&INVENTORY_CAR)),
        FieldRule::new("createdAt", "createTime", OptionalText),
    ],
    outbound: &[
        FieldRule::same("galleristId", Reference),
        FieldRule::same("carId", Reference),
    ],
};

pub static SALE: RecordMapping = RecordMapping {
    name: "saled-car",
    inbound: &[
        FieldRule::same("id", Id),
        FieldRule::same("customer", Record(&CUSTOMER)),
        FieldRule::same("gallerist", Record(&GALLERIST)),
        FieldRule::same("car", Record(&SALE_CAR)),
        FieldRule::new("createdAt", "createTime", OptionalText),
    ],
    outbound: &[
        FieldRule::same("customerId", Reference),
        FieldRule::same("galleristId", Reference),
        FieldRule::same("carId", Reference),
    ],
};
