use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::{sync::RwLock, time::Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    checkout::{
        Change, CheckoutOrder, CheckoutSession, CheckoutView, DeliveryDetails, SubmitStep,
    },
    coupons::{CouponCatalog, CouponRejection},
    dto::checkout::{OpenCheckoutRequest, SubmitOutcome},
    dto::shipping::RateQuote,
    error::{AppError, AppResult},
    i18n::Locale,
    models::{CartLine, Destination, validate_cart},
    shipping::{
        RateKey, RateProvider, ShippingMethod, ShippingMethodId, ShippingRules,
        rates::quote_weight, weight::chargeable_weight_kg,
    },
    store::{CheckoutStore, StoreError},
};

#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Quiet period before a changed destination is priced.
    pub rate_debounce: Duration,
    /// Sessions untouched for this long are dropped by the sweeper.
    pub session_idle: Duration,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            rate_debounce: Duration::from_millis(600),
            session_idle: Duration::from_secs(3600),
        }
    }
}

/// Owns every live checkout session and drives their carrier lookups.
#[derive(Clone)]
pub struct CheckoutService {
    inner: Arc<Inner>,
}

struct Inner {
    sessions: RwLock<HashMap<Uuid, CheckoutSession>>,
    rates: Arc<dyn RateProvider>,
    store: Arc<dyn CheckoutStore>,
    coupons: CouponCatalog,
    rules: Arc<ShippingRules>,
    settings: CheckoutSettings,
}

impl CheckoutService {
    pub fn new(
        rates: Arc<dyn RateProvider>,
        store: Arc<dyn CheckoutStore>,
        coupons: CouponCatalog,
        rules: ShippingRules,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                sessions: RwLock::new(HashMap::new()),
                rates,
                store,
                coupons,
                rules: Arc::new(rules),
                settings,
            }),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.inner.sessions.read().await.len()
    }

    /// Run `f` against a session the caller may touch. Sessions opened by a
    /// signed-in shopper are private to them; guest sessions are reachable by
    /// id until someone claims them on submit.
    async fn with_session<R>(
        &self,
        id: Uuid,
        user: Option<Uuid>,
        f: impl FnOnce(&mut CheckoutSession) -> R,
    ) -> AppResult<R> {
        let mut sessions = self.inner.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(AppError::NotFound)?;
        if let Some(owner) = session.owner()
            && user != Some(owner)
        {
            return Err(AppError::Forbidden);
        }
        Ok(f(session))
    }

    fn schedule(&self, session_id: Uuid, change: Change) {
        let Some(key) = change.rate else {
            return;
        };
        let service = self.clone();
        tokio::spawn(async move { service.refresh_rate(session_id, key).await });
    }

    /// Wait out the debounce window, then price the destination behind `key`
    /// unless a newer change has superseded it. The answer is applied only if
    /// `key` is still current when it arrives.
    pub async fn refresh_rate(&self, session_id: Uuid, key: RateKey) {
        tokio::time::sleep(self.inner.settings.rate_debounce).await;

        {
            let sessions = self.inner.sessions.read().await;
            let current = sessions
                .get(&session_id)
                .is_some_and(|s| s.pending_rate() == Some(&key));
            if !current {
                debug!(%session_id, seq = key.seq, "rate lookup superseded");
                return;
            }
        }

        let outcome = quote_weight(
            self.inner.rates.as_ref(),
            &self.inner.rules,
            &key.fingerprint.destination,
            key.fingerprint.chargeable_kg,
        )
        .await;

        let mut sessions = self.inner.sessions.write().await;
        match sessions.get_mut(&session_id) {
            Some(session) => {
                if !session.apply_rate(&key, outcome) {
                    debug!(%session_id, seq = key.seq, "discarding stale carrier quote");
                }
            }
            None => debug!(%session_id, "session closed before carrier answered"),
        }
    }

    pub async fn open(
        &self,
        owner: Option<Uuid>,
        payload: OpenCheckoutRequest,
    ) -> AppResult<CheckoutView> {
        validate_cart(&payload.lines)?;
        let (session, change) = CheckoutSession::open(
            owner,
            payload.locale.unwrap_or_default(),
            payload.lines,
            payload.details,
            self.inner.rules.clone(),
        );
        let id = session.id();
        let view = session.view();
        self.inner.sessions.write().await.insert(id, session);
        info!(session_id = %id, "checkout session opened");
        self.schedule(id, change);
        Ok(view)
    }

    pub async fn view(&self, id: Uuid, user: Option<Uuid>) -> AppResult<CheckoutView> {
        self.with_session(id, user, |s| s.view()).await
    }

    pub async fn update_details(
        &self,
        id: Uuid,
        user: Option<Uuid>,
        details: DeliveryDetails,
        locale: Option<Locale>,
    ) -> AppResult<CheckoutView> {
        let (change, view) = self
            .with_session(id, user, |s| {
                if let Some(locale) = locale {
                    s.set_locale(locale);
                }
                let change = s.update_details(details)?;
                Ok::<_, AppError>((change, s.view()))
            })
            .await??;
        self.schedule(id, change);
        Ok(view)
    }

    pub async fn replace_cart(
        &self,
        id: Uuid,
        user: Option<Uuid>,
        lines: Vec<CartLine>,
    ) -> AppResult<CheckoutView> {
        validate_cart(&lines)?;
        let (change, view) = self
            .with_session(id, user, |s| {
                let change = s.replace_cart(lines)?;
                Ok::<_, AppError>((change, s.view()))
            })
            .await??;
        self.schedule(id, change);
        Ok(view)
    }

    pub async fn select_method(
        &self,
        id: Uuid,
        user: Option<Uuid>,
        method: ShippingMethodId,
    ) -> AppResult<CheckoutView> {
        self.with_session(id, user, |s| {
            s.select_method(method)?;
            Ok::<_, AppError>(s.view())
        })
        .await?
    }

    pub async fn apply_coupon(
        &self,
        id: Uuid,
        user: Option<Uuid>,
        code: &str,
    ) -> AppResult<CheckoutView> {
        let used = match user {
            Some(user_id) => match self.inner.store.used_coupons(user_id).await {
                Ok(used) => Some(used),
                Err(err) => {
                    warn!(error = %err, %user_id, "coupon history unavailable");
                    return Err(CouponRejection::Unavailable.into());
                }
            },
            None => None,
        };
        let now = Utc::now();
        self.with_session(id, user, |s| {
            s.apply_coupon(&self.inner.coupons, code, used.as_ref(), now)?;
            Ok::<_, AppError>(s.view())
        })
        .await?
    }

    pub async fn remove_coupon(&self, id: Uuid, user: Option<Uuid>) -> AppResult<CheckoutView> {
        self.with_session(id, user, |s| {
            s.remove_coupon()?;
            Ok::<_, AppError>(s.view())
        })
        .await?
    }

    /// Forget a session, e.g. when the shopper leaves the checkout page.
    pub async fn discard(&self, id: Uuid, user: Option<Uuid>) -> AppResult<()> {
        self.with_session(id, user, |_| ()).await?;
        self.inner.sessions.write().await.remove(&id);
        Ok(())
    }

    pub async fn submit(&self, id: Uuid, user: Option<Uuid>) -> AppResult<SubmitOutcome> {
        let step = self.with_session(id, user, |s| s.begin_submit(user)).await??;
        let order = match step {
            SubmitStep::LoginRequired => {
                info!(session_id = %id, "checkout deferred until login");
                return Ok(SubmitOutcome::LoginRequired {
                    session_id: id,
                    resume_path: format!("/api/checkout/sessions/{id}/resume"),
                });
            }
            SubmitStep::Ready(order) => *order,
        };

        if let Err(err) = self.persist_order(&order).await {
            let rejection = match &err {
                AppError::Coupon(rejection) => Some(rejection.clone()),
                _ => None,
            };
            self.with_session(id, user, |s| s.abort_submit(rejection)).await?;
            return Err(err);
        }

        self.with_session(id, user, |s| s.finish_submit(order.id)).await?;
        info!(
            session_id = %id,
            order_id = %order.id,
            total = %order.totals.grand_total,
            "checkout submitted"
        );
        Ok(SubmitOutcome::Submitted { order })
    }

    /// Submit on behalf of a shopper who just logged in.
    pub async fn resume(&self, id: Uuid, user_id: Uuid) -> AppResult<SubmitOutcome> {
        self.submit(id, Some(user_id)).await
    }

    async fn persist_order(&self, order: &CheckoutOrder) -> AppResult<()> {
        match self.inner.store.commit_order(order).await {
            Ok(()) => Ok(()),
            Err(StoreError::CouponUsed(code)) => {
                info!(user_id = %order.user_id, %code, "coupon already redeemed");
                Err(CouponRejection::AlreadyUsed.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn last_order(&self, user_id: Uuid) -> AppResult<CheckoutOrder> {
        self.inner
            .store
            .last_order(user_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Drop every session the user owns. Called on logout.
    pub async fn end_user_sessions(&self, user_id: Uuid) -> usize {
        let mut sessions = self.inner.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.owner() != Some(user_id));
        before - sessions.len()
    }

    pub async fn sweep_idle(&self) -> usize {
        let idle = self.inner.settings.session_idle;
        let now = Instant::now();
        let mut sessions = self.inner.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.touched_at()) < idle);
        before - sessions.len()
    }

    pub fn spawn_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let service = self.clone();
        let period = self.inner.settings.session_idle.min(Duration::from_secs(300));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let removed = service.sweep_idle().await;
                if removed > 0 {
                    debug!(removed, "swept idle checkout sessions");
                }
            }
        })
    }

    pub fn shipping_methods(
        &self,
        destination: &Destination,
        subtotal: Decimal,
    ) -> Vec<ShippingMethod> {
        self.inner.rules.methods_for(destination, subtotal)
    }

    pub async fn quote(
        &self,
        destination: Destination,
        lines: &[CartLine],
    ) -> AppResult<RateQuote> {
        validate_cart(lines)?;
        let chargeable_kg = chargeable_weight_kg(lines);
        let outcome = quote_weight(
            self.inner.rates.as_ref(),
            &self.inner.rules,
            &destination,
            chargeable_kg,
        )
        .await;
        let quote = match outcome {
            Ok(price) => RateQuote {
                destination,
                chargeable_kg,
                supported: true,
                price: Some(price),
                error: None,
            },
            Err(unsupported) => RateQuote {
                destination,
                chargeable_kg,
                supported: false,
                price: None,
                error: Some(unsupported.message()),
            },
        };
        Ok(quote)
    }
}
