//! Domain entities and wire types for the food-delivery backend.
//!
//! Every entity is a plain serde struct mirroring one table row. Write-side
//! payloads (`*Request`) carry only the fields a client is allowed to set;
//! identities and timestamps are always assigned by the backend.

pub mod auth;
pub mod banner;
pub mod branch;
pub mod catalog;
pub mod combo;
pub mod courier;
pub mod notification;
pub mod order;
pub mod page;
pub mod people;
pub mod pricing;
pub mod payment;

pub use banner::{Banner, BannerRequest};
pub use branch::{Branch, BranchRequest};
pub use auth::{AuthInfo, LoginConfirmRequest, LoginResponse, RegisterConfirmRequest, Role, SendCodeRequest};
pub use catalog::{Category, CategoryRequest, Product, ProductListRequest, ProductRequest};
pub use combo::{Combo, ComboDetails, ComboItem, CreateComboRequest, NewCombo, UpdateComboRequest};
pub use courier::{
    CourierAssignment, CourierAssignmentRequest, DeliveryHistory, DeliveryHistoryRequest,
};
pub use order::{
    ChangeStatusRequest, CreateOrderRequest, NewOrder, Order, OrderDetails, OrderItem,
    OrderListRequest, OrderStatus, UpdateOrderRequest,
};
pub use page::{ListRequest, Page};
pub use notification::{Notification, NotificationRequest};
pub use payment::{Payment, PaymentRequest};
pub use people::{Admin, AdminRequest, User, UserRequest};
pub use pricing::{LineItemRequest, PricedLine, PricedLines, PricingError, UpdateLineItem};
