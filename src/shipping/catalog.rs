use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    i18n::Localized,
    models::Destination,
    money::omr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethodId {
    Pickup,
    LocalCourier,
    InternationalCourier,
}

impl ShippingMethodId {
    /// Only the door-to-door courier is priced by the carrier.
    pub fn needs_rate(self) -> bool {
        matches!(self, ShippingMethodId::InternationalCourier)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShippingMethod {
    pub id: ShippingMethodId,
    pub label: Localized,
    pub description: Localized,
    pub eta: Localized,
    pub badge: Option<Localized>,
    #[schema(value_type = String, example = "2.000")]
    pub price: Decimal,
    #[serde(default)]
    pub calculating: bool,
    pub error: Option<Localized>,
}

/// Seller-side constants behind the delivery options.
#[derive(Debug, Clone)]
pub struct ShippingRules {
    pub home_country: String,
    pub free_shipping_threshold: Decimal,
    pub remote_city: String,
    pub remote_city_fee: Decimal,
    pub local_fee: Decimal,
}

impl Default for ShippingRules {
    fn default() -> Self {
        Self {
            home_country: "OM".into(),
            free_shipping_threshold: omr(20_000),
            remote_city: "Khasab".into(),
            remote_city_fee: omr(3_000),
            local_fee: omr(2_000),
        }
    }
}

impl ShippingRules {
    pub fn is_domestic(&self, destination: &Destination) -> bool {
        destination.country_code.eq_ignore_ascii_case(&self.home_country)
    }

    pub fn local_courier_price(&self, city: &str, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_shipping_threshold {
            Decimal::ZERO
        } else if city.trim().eq_ignore_ascii_case(&self.remote_city) {
            self.remote_city_fee
        } else {
            self.local_fee
        }
    }

    /// Delivery options for a destination, always ordered pickup, local
    /// courier (home country only), international courier. The international
    /// entry carries a zero placeholder until a carrier quote is merged in.
    pub fn methods_for(&self, destination: &Destination, subtotal: Decimal) -> Vec<ShippingMethod> {
        let mut methods = vec![pickup()];
        if self.is_domestic(destination) {
            let price = self.local_courier_price(&destination.city, subtotal);
            methods.push(local_courier(price));
        }
        methods.push(international_courier());
        methods
    }
}

fn pickup() -> ShippingMethod {
    ShippingMethod {
        id: ShippingMethodId::Pickup,
        label: Localized::new("Store pickup", "الاستلام من المتجر"),
        description: Localized::new(
            "Collect your order from our roastery in Muscat",
            "استلم طلبك من محمصتنا في مسقط",
        ),
        eta: Localized::new("Ready within 24 hours", "جاهز خلال 24 ساعة"),
        badge: Some(Localized::new("Free", "مجاني")),
        price: Decimal::ZERO,
        calculating: false,
        error: None,
    }
}

fn local_courier(price: Decimal) -> ShippingMethod {
    let badge = price
        .is_zero()
        .then(|| Localized::new("Free delivery", "توصيل مجاني"));
    ShippingMethod {
        id: ShippingMethodId::LocalCourier,
        label: Localized::new("Local delivery", "التوصيل المحلي"),
        description: Localized::new(
            "Delivered by our courier anywhere in Oman",
            "يوصله مندوبنا إلى أي مكان في عُمان",
        ),
        eta: Localized::new("1-3 business days", "1-3 أيام عمل"),
        badge,
        price,
        calculating: false,
        error: None,
    }
}

fn international_courier() -> ShippingMethod {
    ShippingMethod {
        id: ShippingMethodId::InternationalCourier,
        label: Localized::new("Door-to-door courier", "شحن من الباب إلى الباب"),
        description: Localized::new(
            "Priced by the carrier for your destination",
            "تحدد شركة الشحن السعر حسب وجهتك",
        ),
        eta: Localized::new("3-7 business days", "3-7 أيام عمل"),
        badge: None,
        price: Decimal::ZERO,
        calculating: false,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(methods: &[ShippingMethod]) -> Vec<ShippingMethodId> {
        methods.iter().map(|m| m.id).collect()
    }

    #[test]
    fn home_country_lists_all_three_in_order() {
        let rules = ShippingRules::default();
        let methods = rules.methods_for(&Destination::new("OM", "Sohar"), omr(5_000));
        assert_eq!(
            ids(&methods),
            vec![
                ShippingMethodId::Pickup,
                ShippingMethodId::LocalCourier,
                ShippingMethodId::InternationalCourier
            ]
        );
        assert_eq!(methods[1].price, omr(2_000));
    }

    #[test]
    fn threshold_is_exclusive() {
        let rules = ShippingRules::default();
        assert_eq!(rules.local_courier_price("Muscat", omr(20_000)), omr(2_000));
        assert_eq!(rules.local_courier_price("Muscat", omr(20_001)), Decimal::ZERO);
        assert_eq!(rules.local_courier_price("khasab", omr(20_000)), omr(3_000));
    }
}
