/// User interactions the controller reacts to. Views bind their widgets to
/// these variants instead of calling handlers by name.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Refresh,
    OpenMarket,
    ShowSummary,
    AddItem { name: String, category: String },
    SetPurchased { id: i64, checked: bool },
    /// Raw text from the quantity field.
    SetQuantity { id: i64, raw: String },
    /// Raw text from the unit price field.
    SetUnitPrice { id: i64, raw: String },
    Rename { id: i64, name: String },
    Recategorize { id: i64, category: String },
    Delete { id: i64 },
    ClearList,
    FetchRemoteSummary,
}
