//! In-memory repositories and collaborators for service tests.
//!
//! Each fake is a cloneable handle over shared state so a test can keep a
//! copy and inspect what the service wrote.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use std::time::Duration;

use async_trait::async_trait;
use cache::{CacheError, CodeCheck, InMemoryOtpStore, OtpStore};
use chrono::Utc;
use model::pricing::price_lines;
use model::{
    Admin, AdminRequest, Combo, ComboDetails, ComboItem, LineItemRequest, ListRequest, NewCombo, NewOrder, Order,
    OrderDetails, OrderItem, OrderListRequest, OrderStatus, Page, UpdateComboRequest,
    UpdateOrderRequest, User, UserRequest,
};
use repository::{
    AdminRepository, ComboRepository, OrderRepository, RepositoryError, UserRepository,
};
use rust_decimal::Decimal;
use service::{ServiceError, SmsSender};
use uuid::Uuid;

fn window<T: Clone>(rows: &[T], list: &ListRequest) -> Page<T> {
    let items = rows
        .iter()
        .skip(list.offset() as usize)
        .take(list.limit as usize)
        .cloned()
        .collect();
    Page {
        items,
        count: rows.len() as i64,
    }
}

fn matches(term: Option<&str>, fields: &[&str]) -> bool {
    match term {
        None => true,
        Some(term) => {
            let term = term.to_lowercase();
            fields.iter().any(|f| f.to_lowercase().contains(&term))
        }
    }
}

#[derive(Default)]
struct OrderState {
    prices: HashMap<Uuid, Decimal>,
    orders: Vec<Order>,
    items: Vec<OrderItem>,
    deleted: Vec<Uuid>,
}

#[derive(Clone, Default)]
pub struct MemoryOrders {
    state: Arc<Mutex<OrderState>>,
}

impl MemoryOrders {
    pub fn with_products(products: &[(Uuid, Decimal)]) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().prices = products.iter().copied().collect();
        store
    }

    pub fn set_price(&self, product_id: Uuid, price: Decimal) {
        self.state.lock().unwrap().prices.insert(product_id, price);
    }

    pub fn order_rows(&self) -> usize {
        self.state.lock().unwrap().orders.len()
    }

    pub fn item_rows(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }
}

impl OrderState {
    fn live_order(&mut self, id: Uuid) -> Result<&mut Order, RepositoryError> {
        if self.deleted.contains(&id) {
            return Err(RepositoryError::NotFound("order".into()));
        }
        self.orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| RepositoryError::NotFound("order".into()))
    }

    fn details(&self, id: Uuid) -> Option<OrderDetails> {
        if self.deleted.contains(&id) {
            return None;
        }
        let order = self.orders.iter().find(|o| o.id == id)?.clone();
        let items = self
            .items
            .iter()
            .filter(|i| i.order_id == id)
            .cloned()
            .collect();
        Some(OrderDetails { order, items })
    }
}

#[async_trait]
impl OrderRepository for MemoryOrders {
    async fn create(
        &self,
        order: &NewOrder,
        items: &[LineItemRequest],
    ) -> Result<OrderDetails, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let priced = price_lines(items, &state.prices)?;

        let now = Utc::now();
        let stored = Order {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            total_price: priced.total,
            delivery_status: order.delivery_status.clone(),
            status: OrderStatus::Pending,
            longitude: order.longitude,
            latitude: order.latitude,
            address_name: order.address_name.clone(),
            created_at: now,
            updated_at: now,
        };
        let lines: Vec<OrderItem> = priced
            .lines
            .iter()
            .map(|line| OrderItem {
                id: Uuid::new_v4(),
                order_id: stored.id,
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.price,
                total_price: line.total_price,
                created_at: now,
                updated_at: now,
            })
            .collect();

        state.orders.push(stored.clone());
        state.items.extend(lines.iter().cloned());
        Ok(OrderDetails {
            order: stored,
            items: lines,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<OrderDetails, RepositoryError> {
        self.state
            .lock()
            .unwrap()
            .details(id)
            .ok_or_else(|| RepositoryError::NotFound("order".into()))
    }

    async fn list(&self, req: &OrderListRequest) -> Result<Page<Order>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let rows: Vec<Order> = state
            .orders
            .iter()
            .filter(|o| !state.deleted.contains(&o.id))
            .filter(|o| req.user_id.is_none_or(|user_id| o.user_id == user_id))
            .filter(|o| matches(req.list.search.as_deref(), &[o.address_name.as_str(), o.status.as_str()]))
            .cloned()
            .collect();
        Ok(window(&rows, &req.list))
    }

    async fn update(
        &self,
        id: Uuid,
        req: &UpdateOrderRequest,
    ) -> Result<OrderDetails, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.live_order(id)?;

        let lines: Vec<LineItemRequest> = req.items.iter().map(|i| i.line()).collect();
        let priced = price_lines(&lines, &state.prices)?;
        for item in &req.items {
            if let Some(item_id) = item.id {
                if !state.items.iter().any(|i| i.id == item_id && i.order_id == id) {
                    return Err(RepositoryError::NotFound("order item".into()));
                }
            }
        }

        let now = Utc::now();
        for (item, line) in req.items.iter().zip(&priced.lines) {
            match item.id {
                Some(item_id) => {
                    if let Some(stored) = state.items.iter_mut().find(|i| i.id == item_id) {
                        stored.product_id = line.product_id;
                        stored.quantity = line.quantity;
                        stored.price = line.price;
                        stored.total_price = line.total_price;
                        stored.updated_at = now;
                    }
                }
                None => state.items.push(OrderItem {
                    id: Uuid::new_v4(),
                    order_id: id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price: line.price,
                    total_price: line.total_price,
                    created_at: now,
                    updated_at: now,
                }),
            }
        }

        let total: Decimal = state
            .items
            .iter()
            .filter(|i| i.order_id == id)
            .map(|i| i.total_price)
            .sum();
        let order = state.live_order(id)?;
        order.user_id = req.user_id;
        order.delivery_status = req.delivery_status.clone();
        order.status = req.status;
        order.longitude = req.longitude;
        order.latitude = req.latitude;
        order.address_name = req.address_name.clone();
        order.total_price = total;
        order.updated_at = now;

        state
            .details(id)
            .ok_or_else(|| RepositoryError::NotFound("order".into()))
    }

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let order = state.live_order(id)?;
        order.status = status;
        Ok(order.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.live_order(id)?;
        state.deleted.push(id);
        Ok(())
    }
}

#[derive(Default)]
struct ComboState {
    prices: HashMap<Uuid, Decimal>,
    combos: Vec<Combo>,
    items: Vec<ComboItem>,
}

#[derive(Clone, Default)]
pub struct MemoryCombos {
    state: Arc<Mutex<ComboState>>,
}

impl MemoryCombos {
    pub fn with_products(products: &[(Uuid, Decimal)]) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().prices = products.iter().copied().collect();
        store
    }

    pub fn combo_rows(&self) -> usize {
        self.state.lock().unwrap().combos.len()
    }

    pub fn item_rows(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }
}

impl ComboState {
    fn details(&self, id: Uuid) -> Option<ComboDetails> {
        let combo = self.combos.iter().find(|c| c.id == id)?.clone();
        let items = self
            .items
            .iter()
            .filter(|i| i.combo_id == id)
            .cloned()
            .collect();
        Some(ComboDetails { combo, items })
    }
}

#[async_trait]
impl ComboRepository for MemoryCombos {
    async fn create(
        &self,
        combo: &NewCombo,
        items: &[LineItemRequest],
    ) -> Result<ComboDetails, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let priced = price_lines(items, &state.prices)?;

        let now = Utc::now();
        let stored = Combo {
            id: Uuid::new_v4(),
            name: combo.name.clone(),
            description: combo.description.clone(),
            price: combo.price,
            total_price: priced.total,
            created_at: now,
            updated_at: now,
        };
        for line in &priced.lines {
            state.items.push(ComboItem {
                id: Uuid::new_v4(),
                combo_id: stored.id,
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.price,
                total_price: line.total_price,
                created_at: now,
                updated_at: now,
            });
        }
        state.combos.push(stored.clone());
        state
            .details(stored.id)
            .ok_or_else(|| RepositoryError::NotFound("combo".into()))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<ComboDetails, RepositoryError> {
        self.state
            .lock()
            .unwrap()
            .details(id)
            .ok_or_else(|| RepositoryError::NotFound("combo".into()))
    }

    async fn list(&self, req: &ListRequest) -> Result<Page<Combo>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let rows: Vec<Combo> = state
            .combos
            .iter()
            .filter(|c| matches(req.search.as_deref(), &[c.name.as_str(), c.description.as_str()]))
            .cloned()
            .collect();
        Ok(window(&rows, req))
    }

    async fn update(
        &self,
        id: Uuid,
        req: &UpdateComboRequest,
    ) -> Result<ComboDetails, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if !state.combos.iter().any(|c| c.id == id) {
            return Err(RepositoryError::NotFound("combo".into()));
        }
        let lines: Vec<LineItemRequest> = req.items.iter().map(|i| i.line()).collect();
        let priced = price_lines(&lines, &state.prices)?;
        for item in &req.items {
            if let Some(item_id) = item.id {
                if !state.items.iter().any(|i| i.id == item_id && i.combo_id == id) {
                    return Err(RepositoryError::NotFound("combo item".into()));
                }
            }
        }

        let now = Utc::now();
        for (item, line) in req.items.iter().zip(&priced.lines) {
            match item.id {
                Some(item_id) => {
                    if let Some(stored) = state.items.iter_mut().find(|i| i.id == item_id) {
                        stored.product_id = line.product_id;
                        stored.quantity = line.quantity;
                        stored.price = line.price;
                        stored.total_price = line.total_price;
                        stored.updated_at = now;
                    }
                }
                None => state.items.push(ComboItem {
                    id: Uuid::new_v4(),
                    combo_id: id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price: line.price,
                    total_price: line.total_price,
                    created_at: now,
                    updated_at: now,
                }),
            }
        }

        let total: Decimal = state
            .items
            .iter()
            .filter(|i| i.combo_id == id)
            .map(|i| i.total_price)
            .sum();
        if let Some(combo) = state.combos.iter_mut().find(|c| c.id == id) {
            combo.name = req.name.clone();
            combo.description = req.description.clone();
            combo.price = req.price;
            combo.total_price = total;
            combo.updated_at = now;
        }
        state
            .details(id)
            .ok_or_else(|| RepositoryError::NotFound("combo".into()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let before = state.combos.len();
        state.combos.retain(|c| c.id != id);
        if state.combos.len() == before {
            return Err(RepositoryError::NotFound("combo".into()));
        }
        state.items.retain(|i| i.combo_id != id);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryUsers {
    users: Arc<Mutex<Vec<User>>>,
}

impl MemoryUsers {
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn insert(&self, name: &str, phone: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            sex: String::new(),
            email: String::new(),
            phone: phone.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn create(&self, user: &UserRequest) -> Result<User, RepositoryError> {
        if self.users.lock().unwrap().iter().any(|u| u.phone == user.phone) {
            return Err(RepositoryError::Constraint("phone already registered".into()));
        }
        let stored = self.insert(&user.name, &user.phone);
        Ok(stored)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, RepositoryError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound("user".into()))
    }

    async fn get_by_phone(&self, phone: &str) -> Result<User, RepositoryError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.phone == phone)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound("user".into()))
    }

    async fn list(&self, req: &ListRequest) -> Result<Page<User>, RepositoryError> {
        let users = self.users.lock().unwrap();
        let rows: Vec<User> = users
            .iter()
            .filter(|u| matches(req.search.as_deref(), &[u.email.as_str(), u.phone.as_str()]))
            .cloned()
            .collect();
        Ok(window(&rows, req))
    }

    async fn update(&self, id: Uuid, user: &UserRequest) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| RepositoryError::NotFound("user".into()))?;
        stored.name = user.name.clone();
        stored.sex = user.sex.clone();
        stored.email = user.email.clone();
        stored.phone = user.phone.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(RepositoryError::NotFound("user".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryAdmins {
    admins: Arc<Mutex<Vec<Admin>>>,
}

impl MemoryAdmins {
    pub fn insert(&self, name: &str, phone: &str) -> Admin {
        let now = Utc::now();
        let admin = Admin {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: String::new(),
            phone: phone.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.admins.lock().unwrap().push(admin.clone());
        admin
    }

    fn find(&self, pred: impl Fn(&Admin) -> bool) -> Result<Admin, RepositoryError> {
        self.admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| pred(a))
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound("admin".into()))
    }
}

#[async_trait]
impl AdminRepository for MemoryAdmins {
    async fn create(&self, admin: &AdminRequest) -> Result<Admin, RepositoryError> {
        Ok(self.insert(&admin.name, &admin.phone))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Admin, RepositoryError> {
        self.find(|a| a.id == id)
    }

    async fn get_by_phone(&self, phone: &str) -> Result<Admin, RepositoryError> {
        self.find(|a| a.phone == phone)
    }

    async fn list(&self, req: &ListRequest) -> Result<Page<Admin>, RepositoryError> {
        let admins = self.admins.lock().unwrap();
        let rows: Vec<Admin> = admins
            .iter()
            .filter(|a| matches(req.search.as_deref(), &[a.email.as_str(), a.phone.as_str()]))
            .cloned()
            .collect();
        Ok(window(&rows, req))
    }

    async fn update(&self, id: Uuid, admin: &AdminRequest) -> Result<Admin, RepositoryError> {
        let mut admins = self.admins.lock().unwrap();
        let stored = admins
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| RepositoryError::NotFound("admin".into()))?;
        stored.name = admin.name.clone();
        stored.email = admin.email.clone();
        stored.phone = admin.phone.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut admins = self.admins.lock().unwrap();
        let before = admins.len();
        admins.retain(|a| a.id != id);
        if admins.len() == before {
            return Err(RepositoryError::NotFound("admin".into()));
        }
        Ok(())
    }
}

/// [`InMemoryOtpStore`] that yields to the scheduler before every command,
/// the way a round trip to a remote cache would.
#[derive(Clone, Default)]
pub struct RemoteOtpStore {
    inner: InMemoryOtpStore,
}

#[async_trait]
impl OtpStore for RemoteOtpStore {
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        tokio::task::yield_now().await;
        self.inner.set_ex(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        tokio::task::yield_now().await;
        self.inner.get(key).await
    }

    async fn take_if_matches(&self, key: &str, expected: &str) -> Result<CodeCheck, CacheError> {
        tokio::task::yield_now().await;
        self.inner.take_if_matches(key, expected).await
    }
}

/// Records every message instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingSms {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingSms {
    pub fn sent(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// The code from the last message sent to `phone`.
    pub fn last_code(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == phone)
            .and_then(|(_, message)| message.rsplit(' ').next().map(str::to_string))
    }
}

#[async_trait]
impl SmsSender for RecordingSms {
    async fn send(&self, phone: &str, message: &str) -> Result<(), ServiceError> {
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), message.to_string()));
        Ok(())
    }
}
