// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;

use crate::error::BarberError;
use crate::types::{CustomerShop, InsertOutcome, PriceItem, Shop, ShopCustomer, WorkingHours};

/// Shop and customer-connection persistence.
#[async_trait]
pub trait ShopStore: Send + Sync + 'static {
    /// Insert a shop. Returns `false` when the id or code is already taken.
    async fn insert_shop(&self, shop: &Shop) -> Result<bool, BarberError>;

    async fn get_shop(&self, shop_id: &str) -> Result<Option<Shop>, BarberError>;

    async fn find_shop_by_code(&self, code: &str) -> Result<Option<Shop>, BarberError>;

    async fn shop_code_exists(&self, code: &str) -> Result<bool, BarberError>;

    async fn update_shop_name(&self, shop_id: &str, name: &str) -> Result<bool, BarberError>;

    async fn update_working_hours(
        &self,
        shop_id: &str,
        hours: &WorkingHours,
    ) -> Result<bool, BarberError>;

    /// Insert a connection unless the customer is already connected to the
    /// shop, in which case the existing connection is returned.
    async fn insert_connection(
        &self,
        connection: &CustomerShop,
    ) -> Result<InsertOutcome<CustomerShop>, BarberError>;

    async fn delete_connection(&self, connection_id: &str) -> Result<bool, BarberError>;

    async fn connections_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<CustomerShop>, BarberError>;

    /// Connected customers joined with their profiles, newest connection first.
    async fn shop_customers(&self, shop_id: &str) -> Result<Vec<ShopCustomer>, BarberError>;

    async fn count_connections(&self, shop_id: &str) -> Result<u64, BarberError>;
}

/// Price list persistence.
#[async_trait]
pub trait PriceStore: Send + Sync + 'static {
    async fn insert_price(&self, item: &PriceItem) -> Result<(), BarberError>;

    /// Price items of a shop in creation order.
    async fn prices_for_shop(&self, shop_id: &str) -> Result<Vec<PriceItem>, BarberError>;

    async fn delete_price(&self, shop_id: &str, price_id: &str) -> Result<bool, BarberError>;
}
