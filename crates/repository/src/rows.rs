//! Column lists and `Row` -> entity mapping shared by the Pg repositories.

use model::{
    Admin, Banner, Branch, Category, Combo, ComboItem, CourierAssignment, DeliveryHistory,
    Notification, Order, OrderItem, OrderStatus, Payment, Product, User,
};
use tokio_postgres::Row;

use crate::RepositoryError;

pub(crate) const USER_COLUMNS: &str = "id, name, sex, email, phone, created_at, updated_at";
pub(crate) const ADMIN_COLUMNS: &str = "id, name, email, phone, created_at, updated_at";
pub(crate) const CATEGORY_COLUMNS: &str = "id, name, created_at, updated_at";
pub(crate) const PRODUCT_COLUMNS: &str =
    "id, category_id, name, description, price, image_url, created_at, updated_at";
pub(crate) const BRANCH_COLUMNS: &str =
    "id, name, address, latitude, longitude, created_at, updated_at";
pub(crate) const BANNER_COLUMNS: &str = "id, image_url, created_at";
pub(crate) const PAYMENT_COLUMNS: &str =
    "id, user_id, order_id, is_paid, payment_method, created_at";
pub(crate) const NOTIFICATION_COLUMNS: &str = "id, user_id, message, is_read, created_at";
pub(crate) const COURIER_ASSIGNMENT_COLUMNS: &str =
    "id, order_id, courier_id, status, assigned_at, updated_at";
pub(crate) const DELIVERY_HISTORY_COLUMNS: &str =
    "id, courier_id, order_id, earnings, delivered_at";
pub(crate) const ORDER_COLUMNS: &str = "id, user_id, total_price, delivery_status, status, \
    longitude, latitude, address_name, created_at, updated_at";
pub(crate) const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, product_id, quantity, price, total_price, created_at, updated_at";
pub(crate) const COMBO_COLUMNS: &str =
    "id, name, description, price, total_price, created_at, updated_at";
pub(crate) const COMBO_ITEM_COLUMNS: &str =
    "id, combo_id, product_id, quantity, price, total_price, created_at, updated_at";

pub(crate) fn user(row: &Row) -> Result<User, RepositoryError> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        sex: row.try_get("sex")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn admin(row: &Row) -> Result<Admin, RepositoryError> {
    Ok(Admin {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn category(row: &Row) -> Result<Category, RepositoryError> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn product(row: &Row) -> Result<Product, RepositoryError> {
    Ok(Product {
        id: row.try_get("id")?,
        category_id: row.try_get("category_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn branch(row: &Row) -> Result<Branch, RepositoryError> {
    Ok(Branch {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        address: row.try_get("address")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn banner(row: &Row) -> Result<Banner, RepositoryError> {
    Ok(Banner {
        id: row.try_get("id")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn payment(row: &Row) -> Result<Payment, RepositoryError> {
    Ok(Payment {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        order_id: row.try_get("order_id")?,
        is_paid: row.try_get("is_paid")?,
        payment_method: row.try_get("payment_method")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn notification(row: &Row) -> Result<Notification, RepositoryError> {
    Ok(Notification {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        message: row.try_get("message")?,
        is_read: row.try_get("is_read")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn courier_assignment(row: &Row) -> Result<CourierAssignment, RepositoryError> {
    Ok(CourierAssignment {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        courier_id: row.try_get("courier_id")?,
        status: row.try_get("status")?,
        assigned_at: row.try_get("assigned_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn delivery_history(row: &Row) -> Result<DeliveryHistory, RepositoryError> {
    Ok(DeliveryHistory {
        id: row.try_get("id")?,
        courier_id: row.try_get("courier_id")?,
        order_id: row.try_get("order_id")?,
        earnings: row.try_get("earnings")?,
        delivered_at: row.try_get("delivered_at")?,
    })
}

pub(crate) fn order(row: &Row) -> Result<Order, RepositoryError> {
    let status: String = row.try_get("status")?;
    let status: OrderStatus = status.parse().map_err(RepositoryError::InvalidData)?;
    Ok(Order {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        total_price: row.try_get("total_price")?,
        delivery_status: row.try_get("delivery_status")?,
        status,
        longitude: row.try_get("longitude")?,
        latitude: row.try_get("latitude")?,
        address_name: row.try_get("address_name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn order_item(row: &Row) -> Result<OrderItem, RepositoryError> {
    Ok(OrderItem {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
        price: row.try_get("price")?,
        total_price: row.try_get("total_price")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn combo(row: &Row) -> Result<Combo, RepositoryError> {
    Ok(Combo {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        total_price: row.try_get("total_price")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn combo_item(row: &Row) -> Result<ComboItem, RepositoryError> {
    Ok(ComboItem {
        id: row.try_get("id")?,
        combo_id: row.try_get("combo_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
        price: row.try_get("price")?,
        total_price: row.try_get("total_price")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
