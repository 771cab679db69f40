//! PostgreSQL enum types and their domain counterparts

use domain_billing::{PaymentDirection, PaymentMethod, PaymentStatus};
use domain_inventory::StockMovementType;
use domain_party::CounterpartyKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "stock_movement_type", rename_all = "snake_case")]
pub enum DbStockMovementType {
    Purchase,
    Sale,
    Adjustment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
pub enum DbPaymentStatus {
    Pending,
    Paid,
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_direction", rename_all = "snake_case")]
pub enum DbPaymentDirection {
    Incoming,
    Outgoing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
pub enum DbPaymentMethod {
    Cash,
    Bank,
    Upi,
    Cheque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "counterparty_kind", rename_all = "snake_case")]
pub enum DbCounterpartyKind {
    Customer,
    Supplier,
}

/// Declares lossless conversions between a database enum and its domain enum
macro_rules! mirror_enum {
    ($db:ident <=> $domain:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$domain> for $db {
            fn from(value: $domain) -> Self {
                match value {
                    $($domain::$variant => $db::$variant,)+
                }
            }
        }

        impl From<$db> for $domain {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => $domain::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(DbStockMovementType <=> StockMovementType { Purchase, Sale, Adjustment });
mirror_enum!(DbPaymentStatus <=> PaymentStatus { Pending, Paid, Partial });
mirror_enum!(DbPaymentDirection <=> PaymentDirection { Incoming, Outgoing });
mirror_enum!(DbPaymentMethod <=> PaymentMethod { Cash, Bank, Upi, Cheque });
mirror_enum!(DbCounterpartyKind <=> CounterpartyKind { Customer, Supplier });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_type_mirrors() {
        for movement in [
            StockMovementType::Purchase,
            StockMovementType::Sale,
            StockMovementType::Adjustment,
        ] {
            let db: DbStockMovementType = movement.into();
            assert_eq!(StockMovementType::from(db), movement);
        }
    }

    #[test]
    fn test_counterparty_kind_mirrors() {
        assert_eq!(DbCounterpartyKind::from(CounterpartyKind::Supplier), DbCounterpartyKind::Supplier);
        assert_eq!(CounterpartyKind::from(DbCounterpartyKind::Customer), CounterpartyKind::Customer);
    }
}
