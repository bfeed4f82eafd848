//! Shared payment and balance bodies for validator tests.

use serde_json::{Value, json};

/// Payment body as returned right after creation.
#[allow(dead_code)]
pub fn created_payment() -> Value {
    json!({
        "paymentId": "generated_payout_id",
        "creationDateTime": "2024-01-01T00:00:00Z",
        "expirationDatetime": "2024-01-02T00:00:00.000Z",
        "status": {
            "value": "CREATED",
            "changedDateTime": "2024-01-01T00:00:00Z"
        },
        "recipientDetails": {
            "providerCode": "qiwi-wallet",
            "fields": { "phone": "79123456789" }
        },
        "amount": { "value": "1.00", "currency": "RUB" }
    })
}

/// Balance body with three positive sub-amounts.
#[allow(dead_code)]
pub fn balance() -> Value {
    json!({
        "balance": { "value": "1500.00", "currency": "RUB" },
        "overdraft": { "value": "100", "currency": "RUB" },
        "available": { "value": "1600.5", "currency": "RUB" }
    })
}
