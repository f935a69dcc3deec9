use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "comprado", default)]
    pub purchased: bool,
    #[serde(rename = "quantidade", default)]
    pub quantity: Option<f64>,
    #[serde(rename = "valor_unitario", default)]
    pub unit_price: Option<f64>,
    #[serde(rename = "valor_total", default)]
    pub total_value: Option<f64>,
    #[serde(rename = "data_criacao", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "data_atualizacao", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Item {
    /// Server-derived total, `0` when the backend sent none.
    pub fn total(&self) -> f64 {
        self.total_value.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
}

/// Partial update body for `PUT /itens/{id}`; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "comprado", skip_serializing_if = "Option::is_none")]
    pub purchased: Option<bool>,
    #[serde(rename = "quantidade", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(rename = "valor_unitario", skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

impl ItemPatch {
    pub fn purchased(purchased: bool) -> Self {
        Self {
            purchased: Some(purchased),
            ..Self::default()
        }
    }

    pub fn quantity(quantity: f64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn unit_price(unit_price: f64) -> Self {
        Self {
            unit_price: Some(unit_price),
            ..Self::default()
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Aggregate computed by the backend at `GET /resumo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSummary {
    #[serde(rename = "total_geral")]
    pub grand_total: f64,
    #[serde(rename = "total_comprados")]
    pub purchased_total: f64,
    #[serde(rename = "itens_comprados")]
    pub purchased_items: usize,
    #[serde(rename = "total_itens")]
    pub total_items: usize,
    #[serde(rename = "percentual_comprado")]
    pub percent_purchased: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "erro")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_reads_backend_payload() {
        let raw = r#"{
            "id": 7,
            "nome": "Leite",
            "categoria": "Laticínios",
            "quantidade": 2.0,
            "valor_unitario": 5.0,
            "valor_total": 10.0,
            "comprado": false,
            "data_criacao": "2024-03-01T12:30:00.123456",
            "data_atualizacao": null
        }"#;
        let item: Item = serde_json::from_str(raw).unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.name, "Leite");
        assert_eq!(item.category, "Laticínios");
        assert_eq!(item.total(), 10.0);
        assert!(item.created_at.is_some());
        assert!(item.updated_at.is_none());
    }

    #[test]
    fn item_tolerates_missing_optional_fields() {
        let item: Item =
            serde_json::from_str(r#"{"id": 1, "nome": "Pão", "categoria": "Padaria"}"#).unwrap();
        assert!(!item.purchased);
        assert_eq!(item.quantity, None);
        assert_eq!(item.total(), 0.0);
    }

    #[test]
    fn patch_only_sends_set_fields() {
        let body = serde_json::to_value(ItemPatch::purchased(true)).unwrap();
        assert_eq!(body, serde_json::json!({ "comprado": true }));
        assert!(ItemPatch::default().is_empty());
        assert!(!ItemPatch::quantity(0.0).is_empty());
    }
}
