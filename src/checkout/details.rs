use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    i18n::Localized,
    models::{Address, Contact, Destination},
    shipping::ShippingMethodId,
};

const GIFT_MESSAGE_MAX: usize = 250;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Recipient {
    pub full_name: String,
    pub phone: String,
    pub address: Address,
}

/// Who is buying and where the parcel goes. A gift order ships to a
/// recipient that is not the paying customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DeliveryDetails {
    Standard {
        customer: Contact,
        address: Address,
    },
    Gift {
        customer: Contact,
        recipient: Recipient,
        message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: Localized,
}

impl FieldError {
    fn new(field: impl Into<String>, en: &str, ar: &str) -> Self {
        Self {
            field: field.into(),
            message: Localized::new(en, ar),
        }
    }
}

impl DeliveryDetails {
    pub fn is_gift(&self) -> bool {
        matches!(self, DeliveryDetails::Gift { .. })
    }

    pub fn customer(&self) -> &Contact {
        match self {
            DeliveryDetails::Standard { customer, .. } | DeliveryDetails::Gift { customer, .. } => {
                customer
            }
        }
    }

    /// The address the parcel is shipped to.
    pub fn delivery_address(&self) -> &Address {
        match self {
            DeliveryDetails::Standard { address, .. } => address,
            DeliveryDetails::Gift { recipient, .. } => &recipient.address,
        }
    }

    pub fn destination(&self) -> Destination {
        Destination::from(self.delivery_address())
    }

    pub fn validate(&self, method: ShippingMethodId) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        let needs_street = method != ShippingMethodId::Pickup;

        check_contact(self.customer(), &mut errors);
        match self {
            DeliveryDetails::Standard { address, .. } => {
                check_address("address", address, needs_street, &mut errors);
            }
            DeliveryDetails::Gift {
                recipient, message, ..
            } => {
                if recipient.full_name.trim().chars().count() < 2 {
                    errors.push(FieldError::new(
                        "recipient.full_name",
                        "Enter the recipient's name",
                        "أدخل اسم المستلم",
                    ));
                }
                if !valid_phone(&recipient.phone) {
                    errors.push(FieldError::new(
                        "recipient.phone",
                        "Enter a valid phone number for the recipient",
                        "أدخل رقم هاتف صحيح للمستلم",
                    ));
                }
                check_address("recipient.address", &recipient.address, needs_street, &mut errors);
                if message
                    .as_deref()
                    .is_some_and(|m| m.chars().count() > GIFT_MESSAGE_MAX)
                {
                    errors.push(FieldError::new(
                        "message",
                        "Gift message is too long",
                        "رسالة الهدية طويلة جداً",
                    ));
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn check_contact(contact: &Contact, errors: &mut Vec<FieldError>) {
    if contact.full_name.trim().chars().count() < 2 {
        errors.push(FieldError::new(
            "customer.full_name",
            "Enter your full name",
            "أدخل اسمك الكامل",
        ));
    }
    if !valid_email(&contact.email) {
        errors.push(FieldError::new(
            "customer.email",
            "Enter a valid email address",
            "أدخل بريداً إلكترونياً صحيحاً",
        ));
    }
    if !valid_phone(&contact.phone) {
        errors.push(FieldError::new(
            "customer.phone",
            "Enter a valid phone number",
            "أدخل رقم هاتف صحيح",
        ));
    }
}

fn check_address(prefix: &str, address: &Address, needs_street: bool, errors: &mut Vec<FieldError>) {
    let code = address.country_code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        errors.push(FieldError::new(
            format!("{prefix}.country_code"),
            "Select a country",
            "اختر الدولة",
        ));
    }
    if address.city.trim().is_empty() {
        errors.push(FieldError::new(
            format!("{prefix}.city"),
            "Select a city",
            "اختر المدينة",
        ));
    }
    if needs_street && address.street.trim().is_empty() {
        errors.push(FieldError::new(
            format!("{prefix}.street"),
            "Enter a street address",
            "أدخل عنوان الشارع",
        ));
    }
}

fn valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .trim()
        .trim_start_matches('+')
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();
    (8..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> Contact {
        Contact {
            full_name: "Salim Al Harthy".into(),
            email: "salim@example.om".into(),
            phone: "+968 9123 4567".into(),
        }
    }

    fn address(city: &str, street: &str) -> Address {
        Address {
            country_code: "OM".into(),
            city: city.into(),
            street: street.into(),
            notes: None,
        }
    }

    #[test]
    fn pickup_does_not_need_a_street() {
        let details = DeliveryDetails::Standard {
            customer: contact(),
            address: address("Muscat", ""),
        };
        assert!(details.validate(ShippingMethodId::Pickup).is_ok());
        let errors = details
            .validate(ShippingMethodId::LocalCourier)
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "address.street");
    }

    #[test]
    fn gift_requires_recipient_fields() {
        let details = DeliveryDetails::Gift {
            customer: contact(),
            recipient: Recipient {
                full_name: "".into(),
                phone: "12".into(),
                address: address("", "Way 12"),
            },
            message: Some("Enjoy!".into()),
        };
        let fields: Vec<String> = details
            .validate(ShippingMethodId::LocalCourier)
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(
            fields,
            vec!["recipient.full_name", "recipient.phone", "recipient.address.city"]
        );
    }

    #[test]
    fn gift_ships_to_recipient() {
        let details = DeliveryDetails::Gift {
            customer: contact(),
            recipient: Recipient {
                full_name: "Aisha".into(),
                phone: "99887766".into(),
                address: Address {
                    country_code: "ae".into(),
                    city: "Dubai".into(),
                    street: "Jumeirah 1".into(),
                    notes: None,
                },
            },
            message: None,
        };
        assert!(details.is_gift());
        assert_eq!(details.destination(), Destination::new("AE", "Dubai"));
    }

    #[test]
    fn email_and_phone_rules() {
        assert!(valid_email("a@b.co"));
        assert!(!valid_email("a@b"));
        assert!(!valid_email("@b.com"));
        assert!(valid_phone("+968-9123-4567"));
        assert!(!valid_phone("9123abcd"));
    }
}
