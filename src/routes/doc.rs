use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    checkout::{
        CheckoutOrder, CheckoutPhase, CheckoutView, ChosenShipping, DeliveryDetails, FieldError,
        Recipient, SubmitBlock, Totals,
    },
    coupons::{AppliedCoupon, Coupon, DiscountKind},
    dto::{
        auth::{LoginRequest, LoginResponse, LogoutResponse, RegisterRequest},
        checkout::{
            ApplyCouponRequest, OpenCheckoutRequest, ReplaceCartRequest, SelectMethodRequest,
            SubmitOutcome, UpdateDetailsRequest,
        },
        locations::{CityList, CountryList},
        shipping::{RateQuote, RateQuoteRequest, ShippingMethodList, ShippingMethodsRequest},
    },
    i18n::{Locale, Localized},
    locations::Country,
    models::{Address, CartLine, Contact, Destination, User, WeightUnit},
    response::{ApiResponse, Meta},
    routes::{auth, checkout, health, locations, shipping},
    shipping::{ShippingMethod, ShippingMethodId},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        locations::list_countries,
        locations::list_cities,
        shipping::shipping_methods,
        shipping::rate_quote,
        checkout::open_session,
        checkout::get_session,
        checkout::discard_session,
        checkout::update_details,
        checkout::replace_cart,
        checkout::select_method,
        checkout::apply_coupon,
        checkout::remove_coupon,
        checkout::submit,
        checkout::resume,
        checkout::last_order
    ),
    components(
        schemas(
            User,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            LogoutResponse,
            Locale,
            Localized,
            Country,
            CountryList,
            CityList,
            WeightUnit,
            CartLine,
            Address,
            Contact,
            Destination,
            Recipient,
            DeliveryDetails,
            FieldError,
            ShippingMethodId,
            ShippingMethod,
            ShippingMethodsRequest,
            ShippingMethodList,
            RateQuoteRequest,
            RateQuote,
            DiscountKind,
            Coupon,
            AppliedCoupon,
            Totals,
            ChosenShipping,
            CheckoutOrder,
            CheckoutPhase,
            SubmitBlock,
            CheckoutView,
            OpenCheckoutRequest,
            UpdateDetailsRequest,
            ReplaceCartRequest,
            SelectMethodRequest,
            ApplyCouponRequest,
            SubmitOutcome,
            Meta,
            ApiResponse<CheckoutView>,
            ApiResponse<SubmitOutcome>,
            ApiResponse<CheckoutOrder>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Locations", description = "Countries and cities for the address form"),
        (name = "Shipping", description = "Delivery options and carrier quotes"),
        (name = "Checkout", description = "Checkout session endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
