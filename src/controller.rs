//! Keeps the local item cache in step with the backend and drives the view.
//!
//! Every write goes to the server first; the cache only ever takes what the
//! server answered, so a failed request leaves it untouched.

use crate::api::ListApi;
use crate::config::ClientConfig;
use crate::errors::{Operation, SyncError};
use crate::events::UiEvent;
use crate::models::{Item, ItemPatch, NewItem, RemoteSummary};
use crate::state::ListState;
use crate::summary::{compute_summary, Summary};
use crate::ui::{parse_decimal, Level, ListView, Notification};
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct ListSyncController<A, V> {
    api: A,
    view: V,
    state: ListState,
    notification_ttl: Duration,
}

/// Shows the loading indicator for as long as it is alive.
struct Loading<'a, V: ListView>(&'a V);

impl<'a, V: ListView> Loading<'a, V> {
    fn show(view: &'a V) -> Self {
        view.set_loading(true);
        Self(view)
    }
}

impl<V: ListView> Drop for Loading<'_, V> {
    fn drop(&mut self) {
        self.0.set_loading(false);
    }
}

impl<A: ListApi, V: ListView> ListSyncController<A, V> {
    pub fn new(api: A, view: V, config: &ClientConfig) -> Self {
        Self {
            api,
            view,
            state: ListState::new(),
            notification_ttl: config.notification_ttl,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn items(&self) -> Vec<Item> {
        self.state.lock().items.clone()
    }

    pub fn categories(&self) -> Vec<String> {
        self.state.lock().categories.clone()
    }

    pub fn summary(&self) -> Summary {
        compute_summary(&self.state.lock().items)
    }

    /// Initial load: categories, then the item list.
    pub async fn start(&self) -> Result<(), SyncError> {
        info!("shopping list starting");
        let categories = self.load_categories().await;
        let items = self.load_items().await;
        categories?;
        items?;
        Ok(())
    }

    pub async fn load_categories(&self) -> Result<Vec<String>, SyncError> {
        match self.api.categories().await {
            Ok(categories) => {
                debug!("loaded {} categories", categories.len());
                self.state.lock().categories = categories.clone();
                self.view.show_categories(&categories);
                Ok(categories)
            }
            Err(err) => {
                self.report_as(Level::Warning, Operation::LoadCategories, &err);
                Err(err)
            }
        }
    }

    /// Replaces the cache with the server's list. Returns `false` when the
    /// response was discarded because a newer load or a write overtook it.
    pub async fn load_items(&self) -> Result<bool, SyncError> {
        let _loading = Loading::show(&self.view);
        let seq = self.state.begin_load();

        let items = match self.api.items().await {
            Ok(items) => items,
            Err(err) => {
                self.report(Operation::LoadItems, &err);
                return Err(err);
            }
        };

        if !self.state.finish_load(seq, items) {
            debug!("discarding stale item list (load #{seq})");
            return Ok(false);
        }
        let items = self.items();
        debug!("loaded {} items", items.len());
        self.view.render_items(&items);
        Ok(true)
    }

    pub async fn add_item(&self, name: &str, category: &str) -> Result<Item, SyncError> {
        let name = name.trim();
        let category = category.trim();
        if name.is_empty() || category.is_empty() {
            let err = SyncError::validation("Please fill in both name and category");
            self.report(Operation::AddItem, &err);
            return Err(err);
        }

        let _loading = Loading::show(&self.view);
        let request = NewItem {
            name: name.to_string(),
            category: category.to_string(),
        };
        let created = match self.api.create_item(&request).await {
            Ok(item) => item,
            Err(err) => {
                self.report(Operation::AddItem, &err);
                return Err(err);
            }
        };

        info!(id = created.id, "added item {:?}", created.name);
        let items = {
            let mut data = self.state.lock();
            data.items.push(created.clone());
            data.invalidate_loads();
            data.items.clone()
        };
        self.view.reset_form();
        self.view.render_items(&items);
        self.notify(Level::Success, "Item added");
        Ok(created)
    }

    /// Sends a partial update and installs the server's copy of the item.
    /// Errors are reported and handed back so the caller can undo its widget.
    pub async fn update_item(&self, id: i64, patch: ItemPatch) -> Result<Item, SyncError> {
        if patch.is_empty() {
            let err = SyncError::validation("Nothing to update");
            self.report(Operation::UpdateItem, &err);
            return Err(err);
        }

        let _claim = match self.state.claim(id) {
            Ok(claim) => claim,
            Err(err) => {
                self.report(Operation::UpdateItem, &err);
                return Err(err);
            }
        };

        let updated = match self.api.update_item(id, &patch).await {
            Ok(item) => item,
            Err(err) => {
                self.report(Operation::UpdateItem, &err);
                return Err(err);
            }
        };

        debug!(id, "item updated");
        let mut data = self.state.lock();
        if !data.replace(updated.clone()) {
            warn!(id, "updated item is not in the local list");
        }
        data.invalidate_loads();
        Ok(updated)
    }

    pub async fn mark_purchased(&self, id: i64, checked: bool) -> Result<Item, SyncError> {
        match self.update_item(id, ItemPatch::purchased(checked)).await {
            Ok(item) => {
                self.render_market_and_summary();
                Ok(item)
            }
            Err(err) => {
                self.view.set_purchased_checkbox(id, !checked);
                Err(err)
            }
        }
    }

    pub async fn set_quantity(&self, id: i64, raw: &str) -> Result<Item, SyncError> {
        self.update_field(id, ItemPatch::quantity(parse_decimal(raw))).await
    }

    pub async fn set_unit_price(&self, id: i64, raw: &str) -> Result<Item, SyncError> {
        self.update_field(id, ItemPatch::unit_price(parse_decimal(raw))).await
    }

    // On failure the market view is redrawn from the cache, which still holds
    // the last value the server confirmed, so the edited field snaps back.
    async fn update_field(&self, id: i64, patch: ItemPatch) -> Result<Item, SyncError> {
        match self.update_item(id, patch).await {
            Ok(item) => {
                self.render_market_and_summary();
                Ok(item)
            }
            Err(err) => {
                self.view.render_market(&self.items());
                Err(err)
            }
        }
    }

    pub async fn rename_item(&self, id: i64, name: &str) -> Result<Item, SyncError> {
        let name = name.trim();
        if name.is_empty() {
            let err = SyncError::validation("Name cannot be empty");
            self.report(Operation::UpdateItem, &err);
            return Err(err);
        }
        let item = self.update_item(id, ItemPatch::name(name)).await?;
        self.render_all();
        Ok(item)
    }

    pub async fn recategorize_item(&self, id: i64, category: &str) -> Result<Item, SyncError> {
        let category = category.trim();
        if category.is_empty() {
            let err = SyncError::validation("Category cannot be empty");
            self.report(Operation::UpdateItem, &err);
            return Err(err);
        }
        let item = self.update_item(id, ItemPatch::category(category)).await?;
        self.render_all();
        Ok(item)
    }

    /// Returns `Ok(false)` when the user declined the confirmation.
    pub async fn delete_item(&self, id: i64) -> Result<bool, SyncError> {
        if !self.view.confirm("Are you sure you want to remove this item?") {
            return Ok(false);
        }

        let _claim = match self.state.claim(id) {
            Ok(claim) => claim,
            Err(err) => {
                self.report(Operation::DeleteItem, &err);
                return Err(err);
            }
        };
        let _loading = Loading::show(&self.view);

        if let Err(err) = self.api.delete_item(id).await {
            self.report(Operation::DeleteItem, &err);
            return Err(err);
        }

        info!(id, "removed item");
        {
            let mut data = self.state.lock();
            data.remove(id);
            data.invalidate_loads();
        }
        self.render_all();
        self.notify(Level::Success, "Item removed");
        Ok(true)
    }

    /// Returns `Ok(false)` when the user declined the confirmation.
    pub async fn clear_list(&self) -> Result<bool, SyncError> {
        if !self.view.confirm("Are you sure you want to clear the whole list?") {
            return Ok(false);
        }

        let _claim = match self.state.claim_all() {
            Ok(claim) => claim,
            Err(err) => {
                self.report(Operation::ClearList, &err);
                return Err(err);
            }
        };
        let _loading = Loading::show(&self.view);

        if let Err(err) = self.api.clear().await {
            self.report(Operation::ClearList, &err);
            return Err(err);
        }

        info!("cleared list");
        {
            let mut data = self.state.lock();
            data.items.clear();
            data.invalidate_loads();
        }
        self.render_all();
        self.notify(Level::Success, "List cleared");
        Ok(true)
    }

    /// Market tab activation: redraws the in-store view from the cache.
    pub fn open_market(&self) {
        self.render_market_and_summary();
    }

    /// Derives the summary from the cache and shows it.
    pub fn compute_summary(&self) -> Summary {
        let summary = self.summary();
        self.view.render_summary(&summary);
        summary
    }

    pub async fn fetch_remote_summary(&self) -> Result<RemoteSummary, SyncError> {
        match self.api.summary().await {
            Ok(remote) => {
                self.view.render_summary(&Summary::from(remote.clone()));
                Ok(remote)
            }
            Err(err) => {
                self.report(Operation::LoadSummary, &err);
                Err(err)
            }
        }
    }

    pub async fn dispatch(&self, event: UiEvent) -> Result<(), SyncError> {
        debug!(?event, "dispatch");
        match event {
            UiEvent::Refresh => self.load_items().await.map(drop),
            UiEvent::OpenMarket => {
                self.open_market();
                Ok(())
            }
            UiEvent::ShowSummary => {
                self.compute_summary();
                Ok(())
            }
            UiEvent::AddItem { name, category } => self.add_item(&name, &category).await.map(drop),
            UiEvent::SetPurchased { id, checked } => {
                self.mark_purchased(id, checked).await.map(drop)
            }
            UiEvent::SetQuantity { id, raw } => self.set_quantity(id, &raw).await.map(drop),
            UiEvent::SetUnitPrice { id, raw } => self.set_unit_price(id, &raw).await.map(drop),
            UiEvent::Rename { id, name } => self.rename_item(id, &name).await.map(drop),
            UiEvent::Recategorize { id, category } => {
                self.recategorize_item(id, &category).await.map(drop)
            }
            UiEvent::Delete { id } => self.delete_item(id).await.map(drop),
            UiEvent::ClearList => self.clear_list().await.map(drop),
            UiEvent::FetchRemoteSummary => self.fetch_remote_summary().await.map(drop),
        }
    }

    fn render_market_and_summary(&self) {
        let items = self.items();
        self.view.render_market(&items);
        self.view.render_summary(&compute_summary(&items));
    }

    fn render_all(&self) {
        let items = self.items();
        self.view.render_items(&items);
        self.view.render_market(&items);
        self.view.render_summary(&compute_summary(&items));
    }

    fn notify(&self, level: Level, message: impl Into<String>) {
        self.view.notify(Notification {
            message: message.into(),
            level,
            ttl: self.notification_ttl,
        });
    }

    fn report(&self, operation: Operation, err: &SyncError) {
        let level = match err {
            SyncError::Validation(_) | SyncError::Busy(_) => Level::Warning,
            _ => Level::Danger,
        };
        self.report_as(level, operation, err);
    }

    fn report_as(&self, level: Level, operation: Operation, err: &SyncError) {
        match level {
            Level::Danger => error!(%operation, "{err}"),
            _ => warn!(%operation, "{err}"),
        }
        self.notify(level, err.user_message(operation));
    }
}
