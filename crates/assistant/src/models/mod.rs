//! Domain state for the ordering assistant: menus, carts, checkout
//! drafts and per-device customer profiles.

pub mod cart;
pub mod draft;
pub mod menu;
pub mod order;
pub mod profile;
pub mod reply;
pub mod session;
pub mod site;

pub use cart::{Cart, CartLine};
pub use draft::{
    CheckoutFlow, CheckoutStage, CouponDiscount, DiscountKind, FulfillmentMethod, OrderDraft,
    PaymentMethod,
};
pub use menu::{Menu, MenuCategory, MenuItem};
pub use order::{OrderReceipt, OrderSubmission};
pub use profile::{CustomerProfile, FavoriteItem, SavedContact};
pub use reply::{MenuItemView, MenuSectionView, QuickReply, Reply, ReplyLink};
pub use session::{ChatSession, PendingPrompt};
pub use site::{DeliveryUnit, SiteConfig, VoiceGender};
