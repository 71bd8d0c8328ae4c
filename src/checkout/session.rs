//! Checkout session state machine.
//!
//! A session is synchronous and holds no I/O: the caller tells it what
//! changed, it answers with the rate lookup (if any) that the change
//! requires, and the caller feeds the carrier's answer back with
//! [`CheckoutSession::apply_rate`]. `services::checkout_service` drives it
//! with debounce and real network calls.

use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    checkout::{
        details::{DeliveryDetails, FieldError},
        order::{CheckoutOrder, ChosenShipping, Totals},
    },
    coupons::{AppliedCoupon, CouponCatalog, CouponContext, CouponRejection},
    i18n::{Locale, Localized},
    models::{CartLine, cart_subtotal},
    shipping::{
        RateKey, RateState, RateUnsupported, ShippingMethod, ShippingMethodId, ShippingRules,
        rates::RateFingerprint, weight::chargeable_weight_kg,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    CollectingDetails,
    RatePending,
    RateReady,
    RateUnsupported,
    Submitting,
    AwaitingLogin,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Open,
    /// Last submit attempt failed validation; the shopper is fixing the form.
    Invalid,
    AwaitingLogin,
    Submitting,
    Submitted(Uuid),
}

/// Reasons the submit action is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmitBlock {
    EmptyCart,
    RateCalculating,
    RateUnsupported,
}

impl SubmitBlock {
    pub fn message(&self) -> Localized {
        match self {
            SubmitBlock::EmptyCart => Localized::new("Your cart is empty", "سلة التسوق فارغة"),
            SubmitBlock::RateCalculating => Localized::new(
                "Calculating shipping, please wait",
                "جاري حساب الشحن، يرجى الانتظار",
            ),
            SubmitBlock::RateUnsupported => RateUnsupported.message(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("checkout session is closed")]
    Closed,

    #[error("checkout is already being submitted")]
    Busy,

    #[error("shipping method {0:?} is not available for this destination")]
    MethodUnavailable(ShippingMethodId),
}

#[derive(Debug, Error)]
pub enum CouponError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Rejected(#[from] CouponRejection),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("checkout cannot be submitted: {0:?}")]
    Blocked(SubmitBlock),

    #[error("checkout details are invalid")]
    Invalid(Vec<FieldError>),
}

/// Outcome of [`CheckoutSession::begin_submit`].
#[derive(Debug)]
pub enum SubmitStep {
    /// Guest checkout: log in, then resume. Form values stay in the session.
    LoginRequired,
    /// Order snapshot ready to be persisted and paid.
    Ready(Box<CheckoutOrder>),
}

/// What the caller must do after a mutation.
#[derive(Debug, Default)]
pub struct Change {
    /// Rate lookup to schedule, if the quote inputs changed.
    pub rate: Option<RateKey>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutView {
    pub id: Uuid,
    pub phase: CheckoutPhase,
    pub locale: Locale,
    pub lines: Vec<CartLine>,
    pub details: DeliveryDetails,
    pub shipping_methods: Vec<ShippingMethod>,
    pub selected_method: ShippingMethodId,
    pub coupon: Option<AppliedCoupon>,
    pub totals: Totals,
    pub can_submit: bool,
    pub submit_block: Option<SubmitBlock>,
    pub submit_block_message: Option<Localized>,
    pub notice: Option<Localized>,
    pub order_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    id: Uuid,
    owner: Option<Uuid>,
    locale: Locale,
    lines: Vec<CartLine>,
    details: DeliveryDetails,
    selected: ShippingMethodId,
    coupon: Option<AppliedCoupon>,
    rate: RateState,
    next_seq: u64,
    stage: Stage,
    notice: Option<Localized>,
    rules: Arc<ShippingRules>,
    touched_at: Instant,
}

impl CheckoutSession {
    /// Open a session. The returned change carries the first rate lookup
    /// when the delivery address is already complete.
    pub fn open(
        owner: Option<Uuid>,
        locale: Locale,
        lines: Vec<CartLine>,
        details: DeliveryDetails,
        rules: Arc<ShippingRules>,
    ) -> (Self, Change) {
        let mut session = Self {
            id: Uuid::new_v4(),
            owner,
            locale,
            lines,
            details,
            selected: ShippingMethodId::Pickup,
            coupon: None,
            rate: RateState::Idle,
            next_seq: 0,
            stage: Stage::Open,
            notice: None,
            rules,
            touched_at: Instant::now(),
        };
        let change = session.sync_rate();
        (session, change)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> Option<Uuid> {
        self.owner
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn details(&self) -> &DeliveryDetails {
        &self.details
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn selected_method(&self) -> ShippingMethodId {
        self.selected
    }

    pub fn coupon(&self) -> Option<&AppliedCoupon> {
        self.coupon.as_ref()
    }

    pub fn rate(&self) -> &RateState {
        &self.rate
    }

    pub fn touched_at(&self) -> Instant {
        self.touched_at
    }

    pub fn subtotal(&self) -> Decimal {
        cart_subtotal(&self.lines)
    }

    pub fn phase(&self) -> CheckoutPhase {
        match self.stage {
            Stage::Submitted(_) => CheckoutPhase::Submitted,
            Stage::Submitting => CheckoutPhase::Submitting,
            Stage::AwaitingLogin => CheckoutPhase::AwaitingLogin,
            Stage::Invalid => CheckoutPhase::CollectingDetails,
            Stage::Open => match self.rate {
                RateState::Idle => CheckoutPhase::CollectingDetails,
                RateState::Pending(_) => CheckoutPhase::RatePending,
                RateState::Ready { .. } => CheckoutPhase::RateReady,
                RateState::Unsupported { .. } => CheckoutPhase::RateUnsupported,
            },
        }
    }

    fn fingerprint(&self) -> RateFingerprint {
        RateFingerprint {
            gift: self.details.is_gift(),
            destination: self.details.destination(),
            chargeable_kg: chargeable_weight_kg(&self.lines),
        }
    }

    /// Invalidate the current quote when its inputs no longer match and hand
    /// out a fresh key for the next lookup.
    fn sync_rate(&mut self) -> Change {
        let fingerprint = self.fingerprint();
        if self
            .rate
            .key()
            .is_some_and(|key| key.fingerprint == fingerprint)
        {
            return Change::default();
        }
        if !fingerprint.destination.is_complete() {
            self.rate = RateState::Idle;
            return Change::default();
        }
        self.next_seq += 1;
        let key = RateKey {
            seq: self.next_seq,
            fingerprint,
        };
        self.rate = RateState::Pending(key.clone());
        Change { rate: Some(key) }
    }

    fn ensure_editable(&mut self) -> Result<(), SessionError> {
        match self.stage {
            Stage::Submitted(_) => Err(SessionError::Closed),
            Stage::Submitting => Err(SessionError::Busy),
            Stage::Open | Stage::Invalid | Stage::AwaitingLogin => {
                // Editing after a login prompt returns to the form.
                self.stage = Stage::Open;
                self.notice = None;
                self.touched_at = Instant::now();
                Ok(())
            }
        }
    }

    fn fall_back_if_unavailable(&mut self) {
        let available = self
            .rules
            .methods_for(&self.details.destination(), self.subtotal())
            .iter()
            .any(|m| m.id == self.selected);
        if !available {
            self.selected = ShippingMethodId::Pickup;
        }
    }

    pub fn update_details(&mut self, details: DeliveryDetails) -> Result<Change, SessionError> {
        self.ensure_editable()?;
        self.details = details;
        self.fall_back_if_unavailable();
        Ok(self.sync_rate())
    }

    pub fn replace_cart(&mut self, lines: Vec<CartLine>) -> Result<Change, SessionError> {
        self.ensure_editable()?;
        self.lines = lines;
        let subtotal = self.subtotal();
        if let Some(applied) = self.coupon.take_if(|c| !c.meets_minimum(subtotal)) {
            self.notice = Some(Localized::new(
                format!(
                    "Coupon {} was removed because the order is below its minimum",
                    applied.code()
                ),
                format!("تمت إزالة الرمز {} لأن الطلب أقل من الحد الأدنى", applied.code()),
            ));
        }
        Ok(self.sync_rate())
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn select_method(&mut self, method: ShippingMethodId) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let available = self
            .rules
            .methods_for(&self.details.destination(), self.subtotal())
            .iter()
            .any(|m| m.id == method);
        if !available {
            return Err(SessionError::MethodUnavailable(method));
        }
        self.selected = method;
        Ok(())
    }

    /// Validate `code` and keep it on success. A rejection leaves the
    /// applied coupon untouched.
    pub fn apply_coupon(
        &mut self,
        catalog: &CouponCatalog,
        code: &str,
        used_codes: Option<&HashSet<String>>,
        now: DateTime<Utc>,
    ) -> Result<&AppliedCoupon, CouponError> {
        self.ensure_editable()?;
        let applied = catalog.evaluate(
            code,
            CouponContext {
                subtotal: self.subtotal(),
                applied: self.coupon.as_ref(),
                used_codes,
                now,
            },
        )?;
        Ok(self.coupon.insert(applied))
    }

    pub fn remove_coupon(&mut self) -> Result<Option<AppliedCoupon>, SessionError> {
        self.ensure_editable()?;
        Ok(self.coupon.take())
    }

    pub fn pending_rate(&self) -> Option<&RateKey> {
        match &self.rate {
            RateState::Pending(key) => Some(key),
            _ => None,
        }
    }

    /// Store a carrier answer. Returns `false` when the answer belongs to a
    /// superseded lookup and was dropped.
    pub fn apply_rate(
        &mut self,
        key: &RateKey,
        outcome: Result<Decimal, RateUnsupported>,
    ) -> bool {
        if self.pending_rate() != Some(key) {
            return false;
        }
        self.rate = match outcome {
            Ok(price) if price > Decimal::ZERO => RateState::Ready {
                key: key.clone(),
                price,
            },
            _ => RateState::Unsupported { key: key.clone() },
        };
        true
    }

    pub fn shipping_methods(&self) -> Vec<ShippingMethod> {
        let mut methods = self
            .rules
            .methods_for(&self.details.destination(), self.subtotal());
        if let Some(courier) = methods
            .iter_mut()
            .find(|m| m.id == ShippingMethodId::InternationalCourier)
        {
            match &self.rate {
                RateState::Idle => {}
                RateState::Pending(_) => courier.calculating = true,
                RateState::Ready { price, .. } => courier.price = *price,
                RateState::Unsupported { .. } => courier.error = Some(RateUnsupported.message()),
            }
        }
        methods
    }

    fn selected_shipping(&self) -> Option<ShippingMethod> {
        self.shipping_methods()
            .into_iter()
            .find(|m| m.id == self.selected)
    }

    pub fn submit_block(&self) -> Option<SubmitBlock> {
        if self.lines.is_empty() {
            return Some(SubmitBlock::EmptyCart);
        }
        if !self.selected.needs_rate() {
            return None;
        }
        match self.rate {
            RateState::Ready { price, .. } if price > Decimal::ZERO => None,
            RateState::Pending(_) => Some(SubmitBlock::RateCalculating),
            _ => Some(SubmitBlock::RateUnsupported),
        }
    }

    pub fn totals(&self) -> Totals {
        let subtotal = self.subtotal();
        let shipping = match self.selected_shipping() {
            Some(method) if method.error.is_none() && !method.calculating => method.price,
            _ => Decimal::ZERO,
        };
        let discount = self
            .coupon
            .as_ref()
            .map(|c| c.discount(subtotal))
            .unwrap_or(Decimal::ZERO);
        Totals::compute(subtotal, shipping, discount)
    }

    pub fn view(&self) -> CheckoutView {
        let block = self.submit_block();
        let order_id = match self.stage {
            Stage::Submitted(id) => Some(id),
            _ => None,
        };
        CheckoutView {
            id: self.id,
            phase: self.phase(),
            locale: self.locale,
            lines: self.lines.clone(),
            details: self.details.clone(),
            shipping_methods: self.shipping_methods(),
            selected_method: self.selected,
            coupon: self.coupon.clone(),
            totals: self.totals(),
            can_submit: block.is_none()
                && matches!(self.stage, Stage::Open | Stage::Invalid | Stage::AwaitingLogin),
            submit_block: block,
            submit_block_message: block.map(|b| b.message()),
            notice: self.notice.clone(),
            order_id,
        }
    }

    /// Validate and either ask for a login or freeze the order. On
    /// [`SubmitStep::Ready`] the session stays in `submitting` until the
    /// caller reports back with [`finish_submit`](Self::finish_submit) or
    /// [`abort_submit`](Self::abort_submit).
    pub fn begin_submit(&mut self, user: Option<Uuid>) -> Result<SubmitStep, SubmitError> {
        match self.stage {
            Stage::Submitted(_) => return Err(SessionError::Closed.into()),
            Stage::Submitting => return Err(SessionError::Busy.into()),
            Stage::Open | Stage::Invalid | Stage::AwaitingLogin => {}
        }
        self.touched_at = Instant::now();
        if let Some(block) = self.submit_block() {
            self.stage = Stage::Open;
            return Err(SubmitError::Blocked(block));
        }
        if let Err(errors) = self.details.validate(self.selected) {
            self.stage = Stage::Invalid;
            return Err(SubmitError::Invalid(errors));
        }

        let Some(user_id) = user else {
            self.stage = Stage::AwaitingLogin;
            return Ok(SubmitStep::LoginRequired);
        };

        let Some(method) = self.selected_shipping() else {
            self.stage = Stage::Open;
            return Err(SessionError::MethodUnavailable(self.selected).into());
        };

        self.owner = Some(user_id);
        self.stage = Stage::Submitting;
        let order = CheckoutOrder {
            id: Uuid::new_v4(),
            user_id,
            locale: self.locale,
            lines: self.lines.clone(),
            shipping: ChosenShipping {
                method: method.id,
                label: method.label,
                cost: method.price,
            },
            totals: self.totals(),
            coupon_code: self.coupon.as_ref().map(|c| c.code().to_string()),
            details: self.details.clone(),
            created_at: Utc::now(),
        };
        Ok(SubmitStep::Ready(Box::new(order)))
    }

    pub fn finish_submit(&mut self, order_id: Uuid) {
        self.stage = Stage::Submitted(order_id);
        self.notice = None;
    }

    /// Return to the form after a failed submission, dropping the coupon if
    /// it turned out to be spent.
    pub fn abort_submit(&mut self, rejection: Option<CouponRejection>) {
        self.stage = Stage::Open;
        if let Some(rejection) = rejection {
            self.coupon = None;
            self.notice = Some(rejection.message());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        checkout::Recipient,
        models::{Address, Contact},
        money::omr,
    };

    fn line(price: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id: "sku-1".into(),
            name: "Yirgacheffe 250g".into(),
            unit_price: omr(price),
            quantity,
            weight: None,
            weight_unit: None,
        }
    }

    fn contact() -> Contact {
        Contact {
            full_name: "Maryam Al Balushi".into(),
            email: "maryam@example.om".into(),
            phone: "+968 9988 7766".into(),
        }
    }

    fn address(country: &str, city: &str) -> Address {
        Address {
            country_code: country.into(),
            city: city.into(),
            street: "Way 1234, House 5".into(),
            notes: None,
        }
    }

    fn standard(country: &str, city: &str) -> DeliveryDetails {
        DeliveryDetails::Standard {
            customer: contact(),
            address: address(country, city),
        }
    }

    fn gift(country: &str, city: &str) -> DeliveryDetails {
        DeliveryDetails::Gift {
            customer: contact(),
            recipient: Recipient {
                full_name: "Huda Al Rawahi".into(),
                phone: "99112233".into(),
                address: address(country, city),
            },
            message: Some("Enjoy!".into()),
        }
    }

    fn open(lines: Vec<CartLine>, details: DeliveryDetails) -> (CheckoutSession, Change) {
        CheckoutSession::open(
            None,
            Locale::En,
            lines,
            details,
            Arc::new(ShippingRules::default()),
        )
    }

    #[test]
    fn complete_address_starts_a_lookup() {
        let (session, change) = open(vec![line(6_500, 2)], standard("AE", "Dubai"));
        let key = change.rate.expect("lookup scheduled");
        assert_eq!(key.seq, 1);
        assert_eq!(key.fingerprint.chargeable_kg, 1);
        assert_eq!(session.phase(), CheckoutPhase::RatePending);

        let courier = session
            .shipping_methods()
            .into_iter()
            .find(|m| m.id == ShippingMethodId::InternationalCourier)
            .unwrap();
        assert!(courier.calculating);
    }

    #[test]
    fn incomplete_address_stays_idle() {
        let (session, change) = open(vec![line(6_500, 1)], standard("OM", ""));
        assert!(change.rate.is_none());
        assert_eq!(session.phase(), CheckoutPhase::CollectingDetails);
    }

    #[test]
    fn stale_answer_is_dropped() {
        let (mut session, change) = open(vec![line(6_500, 1)], standard("AE", "Dubai"));
        let first = change.rate.unwrap();
        let second = session
            .update_details(standard("SA", "Riyadh"))
            .unwrap()
            .rate
            .unwrap();
        assert!(second.seq > first.seq);

        assert!(!session.apply_rate(&first, Ok(omr(4_000))));
        assert!(session.rate().is_pending());

        assert!(session.apply_rate(&second, Ok(omr(7_250))));
        assert_eq!(session.rate().price(), Some(omr(7_250)));
        assert_eq!(session.phase(), CheckoutPhase::RateReady);
    }

    #[test]
    fn same_inputs_keep_the_quote() {
        let (mut session, change) = open(vec![line(6_500, 1)], standard("AE", "Dubai"));
        session.apply_rate(&change.rate.unwrap(), Ok(omr(5_000)));

        let mut details = standard("ae", " Dubai ");
        if let DeliveryDetails::Standard { address, .. } = &mut details {
            address.notes = Some("Call on arrival".into());
        }
        let change = session.update_details(details).unwrap();
        assert!(change.rate.is_none());
        assert_eq!(session.rate().price(), Some(omr(5_000)));
    }

    #[test]
    fn gift_toggle_forces_a_new_quote() {
        let (mut session, change) = open(vec![line(6_500, 1)], standard("AE", "Dubai"));
        session.apply_rate(&change.rate.unwrap(), Ok(omr(5_000)));

        let change = session.update_details(gift("AE", "Dubai")).unwrap();
        let key = change.rate.expect("gift mode invalidates");
        assert!(key.fingerprint.gift);
        assert!(session.rate().is_pending());
    }

    #[test]
    fn heavier_cart_forces_a_new_quote() {
        let (mut session, change) = open(vec![line(6_500, 1)], standard("AE", "Dubai"));
        session.apply_rate(&change.rate.unwrap(), Ok(omr(5_000)));

        let change = session.replace_cart(vec![line(6_500, 5)]).unwrap();
        assert_eq!(change.rate.unwrap().fingerprint.chargeable_kg, 2);
    }

    #[test]
    fn international_submit_waits_for_a_price() {
        let (mut session, change) = open(vec![line(6_500, 1)], standard("AE", "Dubai"));
        session
            .select_method(ShippingMethodId::InternationalCourier)
            .unwrap();
        assert_eq!(session.submit_block(), Some(SubmitBlock::RateCalculating));
        assert!(!session.view().can_submit);

        session.apply_rate(&change.rate.unwrap(), Err(RateUnsupported));
        assert_eq!(session.submit_block(), Some(SubmitBlock::RateUnsupported));
        assert_eq!(session.totals().shipping, Decimal::ZERO);
        let err = session.begin_submit(Some(Uuid::new_v4())).unwrap_err();
        assert!(matches!(err, SubmitError::Blocked(SubmitBlock::RateUnsupported)));
    }

    #[test]
    fn local_courier_totals() {
        let (mut session, _) = open(vec![line(12_500, 2)], standard("OM", "Muscat"));
        session.select_method(ShippingMethodId::LocalCourier).unwrap();
        let totals = session.totals();
        assert_eq!(totals.subtotal, omr(25_000));
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.grand_total, omr(25_000));

        session.update_details(standard("OM", "Khasab")).unwrap();
        session.replace_cart(vec![line(5_000, 2)]).unwrap();
        let totals = session.totals();
        assert_eq!(totals.shipping, omr(3_000));
        assert_eq!(totals.grand_total, omr(13_000));

        session.select_method(ShippingMethodId::Pickup).unwrap();
        assert_eq!(session.totals().shipping, omr(0));
        assert!(session.submit_block().is_none());
    }

    #[test]
    fn leaving_the_home_country_drops_local_courier() {
        let (mut session, _) = open(vec![line(5_000, 1)], standard("OM", "Sohar"));
        session.select_method(ShippingMethodId::LocalCourier).unwrap();
        session.update_details(standard("QA", "Doha")).unwrap();
        assert_eq!(session.selected_method(), ShippingMethodId::Pickup);
        assert!(matches!(
            session.select_method(ShippingMethodId::LocalCourier),
            Err(SessionError::MethodUnavailable(_))
        ));
    }

    #[test]
    fn shrinking_cart_drops_coupon_below_minimum() {
        let (mut session, _) = open(vec![line(8_000, 2)], standard("OM", "Muscat"));
        session
            .apply_coupon(&CouponCatalog::default(), "welcome5", None, Utc::now())
            .unwrap();
        assert_eq!(session.totals().discount, omr(5_000));

        session.replace_cart(vec![line(8_000, 1)]).unwrap();
        assert!(session.coupon().is_none());
        assert!(session.view().notice.is_some());
    }

    #[test]
    fn rejected_coupon_keeps_the_current_one() {
        let (mut session, _) = open(vec![line(10_000, 1)], standard("OM", "Muscat"));
        let catalog = CouponCatalog::default();
        session
            .apply_coupon(&catalog, "THANKS10", None, Utc::now())
            .unwrap();
        let err = session
            .apply_coupon(&catalog, "NOPE", None, Utc::now())
            .unwrap_err();
        assert!(matches!(err, CouponError::Rejected(CouponRejection::Unknown)));
        assert_eq!(session.coupon().map(|c| c.code()), Some("THANKS10"));
    }

    #[test]
    fn guest_submit_waits_for_login() {
        let (mut session, _) = open(vec![line(7_000, 1)], standard("OM", "Muscat"));
        let step = session.begin_submit(None).unwrap();
        assert!(matches!(step, SubmitStep::LoginRequired));
        assert_eq!(session.phase(), CheckoutPhase::AwaitingLogin);

        let user = Uuid::new_v4();
        let SubmitStep::Ready(order) = session.begin_submit(Some(user)).unwrap() else {
            panic!("expected an order");
        };
        assert_eq!(order.user_id, user);
        assert_eq!(session.owner(), Some(user));
        assert_eq!(session.phase(), CheckoutPhase::Submitting);

        session.finish_submit(order.id);
        assert_eq!(session.view().order_id, Some(order.id));
        assert!(matches!(
            session.update_details(standard("OM", "Sur")),
            Err(SessionError::Closed)
        ));
    }

    #[test]
    fn invalid_form_is_reported_per_field() {
        let mut details = standard("OM", "Muscat");
        if let DeliveryDetails::Standard { customer, .. } = &mut details {
            customer.email = "not-an-email".into();
        }
        let (mut session, _) = open(vec![line(7_000, 1)], details);
        let Err(SubmitError::Invalid(fields)) = session.begin_submit(None) else {
            panic!("expected validation errors");
        };
        assert_eq!(fields[0].field, "customer.email");
        assert_eq!(session.phase(), CheckoutPhase::CollectingDetails);

        session.update_details(standard("OM", "Muscat")).unwrap();
        assert_eq!(session.phase(), CheckoutPhase::RatePending);
    }
}
