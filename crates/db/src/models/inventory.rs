use labkit_core::inventory::InventoryItem;
use labkit_core::types::DbId;
use sqlx::FromRow;

/// A row from the `inventory` table.
#[derive(Debug, Clone, FromRow)]
pub struct InventoryRow {
    pub id: DbId,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            quantity: row.quantity,
            price: row.price,
        }
    }
}
