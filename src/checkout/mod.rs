pub mod details;
pub mod order;
pub mod session;

pub use details::{DeliveryDetails, FieldError, Recipient};
pub use order::{CheckoutOrder, ChosenShipping, Totals};
pub use session::{
    Change, CheckoutPhase, CheckoutSession, CheckoutView, CouponError, SessionError, SubmitBlock,
    SubmitError, SubmitStep,
};
