//! User accounts of the mobile app.
//!
//! Password hashes never leave this layer: every read goes through
//! [`AccountView`], which projects a fixed list of safe columns.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use voyage_core::error::CoreError;
use voyage_core::types::{record_id, str_field, Record, RecordId};

use super::{or_zero, Shaper};

/// Create or update payload for an account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub balance: Option<Value>,
}

impl AccountInput {
    /// Shape a new account. `hash` turns the plain password into the stored
    /// digest.
    pub fn into_create_record(self, hash: impl Fn(&str) -> String) -> Result<Record, CoreError> {
        let email = self.email.as_deref().map(str::trim).unwrap_or("");
        let password = self.password.as_deref().unwrap_or("");
        if email.is_empty() || password.is_empty() {
            return Err(CoreError::Validation(
                "Email and password are required".into(),
            ));
        }
        let hashed = hash(password);
        let email = email.to_string();

        Ok(Shaper::create()
            .text("userName", self.user_name)
            .text("email", Some(email))
            .text("password", Some(hashed))
            .text("fullName", self.full_name)
            .text("avatar", self.avatar)
            .text("phone", self.phone)
            .text("address", self.address)
            .text("birthday", self.birthday)
            .text("gender", self.gender)
            .number("balance", self.balance)
            .finish())
    }

    /// Shape a partial update. An empty password leaves the stored one alone.
    pub fn into_update_record(self, hash: impl Fn(&str) -> String) -> Record {
        let password = self.password.filter(|p| !p.is_empty()).map(|p| hash(&p));
        let mut record = Shaper::update()
            .text("userName", self.user_name)
            .trimmed("email", self.email)
            .text("password", password)
            .text("fullName", self.full_name)
            .text("avatar", self.avatar)
            .text("phone", self.phone)
            .text("address", self.address)
            .text("birthday", self.birthday)
            .text("gender", self.gender)
            .finish();
        if let Some(balance) = self.balance {
            record.insert("balance".into(), balance);
        }
        record
    }
}

/// An account as returned to the admin UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    #[serde(rename = "Id")]
    pub id: Option<RecordId>,
    pub user_name: String,
    pub email: Value,
    pub full_name: String,
    pub avatar: String,
    pub phone: String,
    pub address: String,
    pub birthday: String,
    pub gender: String,
    pub balance: Value,
    #[serde(rename = "CreatedAt")]
    pub created_at: Value,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: Value,
}

impl From<&Record> for AccountView {
    fn from(record: &Record) -> Self {
        let text = |field: &str| str_field(record, field).to_string();
        let raw = |field: &str| record.get(field).cloned().unwrap_or(Value::Null);
        Self {
            id: record_id(record),
            user_name: text("userName"),
            email: raw("email"),
            full_name: text("fullName"),
            avatar: text("avatar"),
            phone: text("phone"),
            address: text("address"),
            birthday: text("birthday"),
            gender: text("gender"),
            balance: or_zero(record.get("balance")),
            created_at: raw("CreatedAt"),
            updated_at: raw("UpdatedAt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fake_hash(p: &str) -> String {
        format!("hashed:{p}")
    }

    #[test]
    fn create_requires_email_and_password() {
        let input: AccountInput = serde_json::from_value(json!({ "email": "a@b.vn" })).unwrap();
        assert!(matches!(
            input.into_create_record(fake_hash),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn create_hashes_the_password_and_fills_defaults() {
        let input: AccountInput = serde_json::from_value(json!({
            "email": "  lan@travel.vn ",
            "password": "secret",
            "userName": "lan",
        }))
        .unwrap();
        let record = input.into_create_record(fake_hash).unwrap();
        assert_eq!(record["email"], json!("lan@travel.vn"));
        assert_eq!(record["password"], json!("hashed:secret"));
        assert_eq!(record["fullName"], json!(""));
        assert_eq!(record["balance"], json!(0));
    }

    #[test]
    fn update_skips_empty_password() {
        let input: AccountInput =
            serde_json::from_value(json!({ "password": "", "fullName": "Lan Nguyen" })).unwrap();
        let record = input.into_update_record(fake_hash);
        assert_eq!(Value::Object(record), json!({ "fullName": "Lan Nguyen" }));
    }

    #[test]
    fn view_never_exposes_the_password() {
        let record = json!({
            "Id": 4,
            "userName": "lan",
            "email": "lan@travel.vn",
            "password": "deadbeef",
            "balance": null,
        });
        let view = AccountView::from(record.as_object().unwrap());
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["Id"], json!(4));
        assert_eq!(json["userName"], json!("lan"));
        assert_eq!(json["balance"], json!(0));
        assert_eq!(json["CreatedAt"], Value::Null);
    }
}
