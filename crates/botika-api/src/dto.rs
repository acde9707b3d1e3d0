//! Wire formats of the REST API and their conversion into core types.
//!
//! The backend is loose about JSON types: ids arrive as numbers or strings,
//! amounts as `12.5` or `"12.50"`. Everything is read through [`Scalar`]
//! and parsed exactly, so no float ever reaches the calculator.
//! Amounts sent back are decimal strings (`"840.00"`).

use botika_core::{
    Cart, CatalogItem, CheckoutSettings, Discount, DiscountSelection, ItemType, Money,
    PaymentMethod, PaymentRequest, Percent, TransactionReceipt, TransactionSummary, VatRate,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Loose Scalars
// =============================================================================

/// A JSON number or string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    fn text(&self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.trim().to_string(),
        }
    }

    fn invalid(&self, field: &str, reason: impl std::fmt::Display) -> ClientError {
        ClientError::InvalidResponse(format!("{} '{}': {}", field, self.text(), reason))
    }

    fn money(&self, field: &str) -> ClientResult<Money> {
        Money::parse(&self.text()).map_err(|e| self.invalid(field, e))
    }

    fn percent(&self, field: &str) -> ClientResult<Percent> {
        Percent::parse(&self.text()).map_err(|e| self.invalid(field, e))
    }

    fn vat_rate(&self, field: &str) -> ClientResult<VatRate> {
        VatRate::parse(&self.text()).map_err(|e| self.invalid(field, e))
    }

    fn whole(&self, field: &str) -> ClientResult<i64> {
        let parsed = match self {
            Scalar::Number(n) => n.as_i64(),
            Scalar::Text(s) => s.trim().parse::<i64>().ok(),
        };
        parsed.ok_or_else(|| self.invalid(field, "expected a whole number"))
    }
}

/// Responses may come bare or wrapped in `{"data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

/// `Money` as a decimal peso string.
pub fn decimal_string(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{}{}.{:02}", sign, amount.pesos().abs(), amount.centavos_part())
}

fn percent_string(percent: Percent) -> String {
    format!("{}.{:02}", percent.bps() / 100, percent.bps() % 100)
}

// =============================================================================
// Catalog
// =============================================================================

/// `GET /items` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemDto {
    pub id: Scalar,
    pub name: String,
    pub price: Scalar,
    #[serde(default)]
    pub quantity: Option<Scalar>,
    #[serde(default = "default_discountable")]
    pub is_discountable: bool,
    #[serde(default)]
    pub item_type: Option<String>,
}

fn default_discountable() -> bool {
    true
}

impl TryFrom<CatalogItemDto> for CatalogItem {
    type Error = ClientError;

    fn try_from(dto: CatalogItemDto) -> ClientResult<Self> {
        let item_type = match dto.item_type.as_deref().map(str::to_lowercase).as_deref() {
            Some("service") => ItemType::Service,
            _ => ItemType::Product,
        };

        let price = dto.price.money("price")?;
        botika_core::validation::validate_price(price)
            .map_err(|e| dto.price.invalid("price", e))?;

        let quantity = match &dto.quantity {
            Some(q) => q.whole("quantity")?,
            None => 0,
        };

        Ok(CatalogItem {
            id: dto.id.text(),
            name: dto.name,
            price,
            quantity,
            is_discountable: dto.is_discountable,
            item_type,
        })
    }
}

// =============================================================================
// Discounts
// =============================================================================

/// `GET /discounts` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountDto {
    pub id: Scalar,
    pub discount_name: String,
    pub percent: Scalar,
}

impl TryFrom<DiscountDto> for Discount {
    type Error = ClientError;

    fn try_from(dto: DiscountDto) -> ClientResult<Self> {
        Ok(Discount {
            id: dto.id.text(),
            percent: dto.percent.percent("percent")?,
            discount_name: dto.discount_name,
        })
    }
}

// =============================================================================
// Settings
// =============================================================================

/// `GET /settings`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDto {
    #[serde(default = "default_show_vat", alias = "vatEnabled")]
    pub show_vat: bool,
    #[serde(default)]
    pub vat_rate: Option<Scalar>,
}

fn default_show_vat() -> bool {
    true
}

impl TryFrom<SettingsDto> for CheckoutSettings {
    type Error = ClientError;

    fn try_from(dto: SettingsDto) -> ClientResult<Self> {
        let vat_rate = match &dto.vat_rate {
            Some(rate) => rate.vat_rate("vatRate")?,
            None => VatRate::STANDARD,
        };
        Ok(CheckoutSettings {
            vat_enabled: dto.show_vat,
            vat_rate,
        })
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// One line of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLine {
    pub item_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: String,
    pub line_total: String,
}

/// `POST /transactions` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Lets the server recognize a retried submission.
    pub client_transaction_id: Uuid,
    pub items: Vec<TransactionLine>,
    pub discount_id: Option<String>,
    pub discount_name: Option<String>,
    pub discount_percent: String,
    pub senior_id: Option<String>,
    pub subtotal: String,
    pub regular_discount: String,
    pub special_discount: String,
    pub vat: String,
    pub total_amount: String,
    pub payment_method: PaymentMethod,
    pub reference_number: Option<String>,
    pub cash_in_hand: Option<String>,
    pub change_amount: String,
}

impl TransactionRequest {
    /// Builds the submission body from the checkout inputs.
    pub fn new(
        client_transaction_id: Uuid,
        cart: &Cart,
        discount: &DiscountSelection,
        payment: &PaymentRequest,
        summary: &TransactionSummary,
    ) -> Self {
        let items = cart
            .items
            .iter()
            .map(|line| TransactionLine {
                item_id: line.id.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price: decimal_string(line.unit_price),
                line_total: decimal_string(line.line_total()),
            })
            .collect();

        let has_regular = discount.has_regular();
        let senior_id = (discount.is_senior() && !discount.senior_id.trim().is_empty())
            .then(|| discount.senior_id.trim().to_string());

        TransactionRequest {
            client_transaction_id,
            items,
            discount_id: discount.discount_id.clone(),
            discount_name: discount.discount_name.clone(),
            discount_percent: percent_string(if has_regular {
                discount.discount_percent
            } else {
                Percent::zero()
            }),
            senior_id,
            subtotal: decimal_string(summary.subtotal),
            regular_discount: decimal_string(summary.regular_discount),
            special_discount: decimal_string(summary.special_discount),
            vat: decimal_string(summary.vat),
            total_amount: decimal_string(summary.total),
            payment_method: payment.payment_method,
            reference_number: if payment.payment_method.requires_reference() {
                payment.reference_number.clone()
            } else {
                None
            },
            cash_in_hand: if payment.payment_method.is_cash() {
                payment.cash_in_hand.map(decimal_string)
            } else {
                None
            },
            change_amount: decimal_string(payment.change_due(summary.total)),
        }
    }
}

/// `POST /transactions` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResultDto {
    pub receipt_number: Scalar,
    pub total_amount: Scalar,
    pub payment_method: String,
    #[serde(default)]
    pub change_amount: Option<Scalar>,
}

impl TryFrom<TransactionResultDto> for TransactionReceipt {
    type Error = ClientError;

    fn try_from(dto: TransactionResultDto) -> ClientResult<Self> {
        let payment_method = dto.payment_method.parse::<PaymentMethod>().map_err(|e| {
            ClientError::InvalidResponse(format!("paymentMethod '{}': {}", dto.payment_method, e))
        })?;
        let change_amount = match &dto.change_amount {
            Some(change) => change.money("changeAmount")?,
            None => Money::zero(),
        };

        Ok(TransactionReceipt {
            receipt_number: dto.receipt_number.text(),
            total_amount: dto.total_amount.money("totalAmount")?,
            payment_method,
            change_amount,
        })
    }
}

/// Converts a list of DTOs, failing on the first bad entry.
pub(crate) fn convert_all<D, T>(dtos: Vec<D>) -> ClientResult<Vec<T>>
where
    T: TryFrom<D, Error = ClientError>,
{
    dtos.into_iter().map(T::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_item_numbers_and_strings() {
        let dtos: Vec<CatalogItemDto> = serde_json::from_str(
            r#"[
                {"id": 17, "name": "Biogesic 500mg", "price": 4.5, "quantity": 120,
                 "isDiscountable": true, "itemType": "product"},
                {"id": "svc-1", "name": "BP Check", "price": "25.00",
                 "isDiscountable": false, "itemType": "Service"}
            ]"#,
        )
        .unwrap();
        let items: Vec<CatalogItem> = convert_all(dtos).unwrap();

        assert_eq!(items[0].id, "17");
        assert_eq!(items[0].price, Money::from_centavos(450));
        assert_eq!(items[0].max_stock(), Some(120));

        assert_eq!(items[1].price, Money::from_pesos(25));
        assert_eq!(items[1].item_type, ItemType::Service);
        assert_eq!(items[1].max_stock(), None);
        assert!(!items[1].is_discountable);
    }

    #[test]
    fn test_catalog_item_rejects_bad_price() {
        let dto: CatalogItemDto =
            serde_json::from_str(r#"{"id": 1, "name": "X", "price": "1.005"}"#).unwrap();
        assert!(matches!(
            CatalogItem::try_from(dto),
            Err(ClientError::InvalidResponse(_))
        ));

        let dto: CatalogItemDto =
            serde_json::from_str(r#"{"id": 1, "name": "X", "price": -3}"#).unwrap();
        assert!(CatalogItem::try_from(dto).is_err());

        let dto: CatalogItemDto =
            serde_json::from_str(r#"{"id": 1, "name": "X", "price": "90000000000000000"}"#)
                .unwrap();
        assert!(matches!(
            CatalogItem::try_from(dto),
            Err(ClientError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_discount_conversion() {
        let dto: DiscountDto = serde_json::from_str(
            r#"{"id": 1, "discountName": "Senior Citizen", "percent": 20}"#,
        )
        .unwrap();
        let discount = Discount::try_from(dto).unwrap();
        assert_eq!(discount.percent, Percent::from_whole(20));
        assert!(discount.is_senior_citizen());

        let dto: DiscountDto =
            serde_json::from_str(r#"{"id": 2, "discountName": "Bogus", "percent": 150}"#).unwrap();
        assert!(Discount::try_from(dto).is_err());
    }

    #[test]
    fn test_settings_conversion() {
        let dto: SettingsDto = serde_json::from_str(r#"{"showVat": false}"#).unwrap();
        let settings = CheckoutSettings::try_from(dto).unwrap();
        assert!(!settings.vat_enabled);
        assert_eq!(settings.vat_rate, VatRate::STANDARD);

        let dto: SettingsDto =
            serde_json::from_str(r#"{"vatEnabled": true, "vatRate": "12.5"}"#).unwrap();
        let settings = CheckoutSettings::try_from(dto).unwrap();
        assert!(settings.vat_enabled);
        assert_eq!(settings.vat_rate.bps(), 1250);
    }

    #[test]
    fn test_envelope_accepts_wrapped_and_bare() {
        let wrapped: Envelope<Vec<DiscountDto>> = serde_json::from_str(
            r#"{"data": [{"id": 1, "discountName": "PWD", "percent": 20}]}"#,
        )
        .unwrap();
        assert_eq!(wrapped.into_inner().len(), 1);

        let bare: Envelope<Vec<DiscountDto>> = serde_json::from_str("[]").unwrap();
        assert!(bare.into_inner().is_empty());
    }

    #[test]
    fn test_transaction_result_conversion() {
        let dto: TransactionResultDto = serde_json::from_str(
            r#"{"receiptNumber": 100234, "totalAmount": 840, "paymentMethod": "Cash", "changeAmount": "160.00"}"#,
        )
        .unwrap();
        let receipt = TransactionReceipt::try_from(dto).unwrap();
        assert_eq!(receipt.receipt_number, "100234");
        assert_eq!(receipt.total_amount, Money::from_pesos(840));
        assert_eq!(receipt.payment_method, PaymentMethod::Cash);
        assert_eq!(receipt.change_amount, Money::from_pesos(160));

        let dto: TransactionResultDto = serde_json::from_str(
            r#"{"receiptNumber": "R-1", "totalAmount": 10, "paymentMethod": "Bitcoin"}"#,
        )
        .unwrap();
        assert!(TransactionReceipt::try_from(dto).is_err());
    }

    #[test]
    fn test_transaction_request_body() {
        let mut cart = Cart::new();
        cart.add_item(
            &CatalogItem {
                id: "17".to_string(),
                name: "Biogesic 500mg".to_string(),
                price: Money::from_pesos(250),
                quantity: 100,
                is_discountable: true,
                item_type: ItemType::Product,
            },
            4,
        )
        .unwrap();

        let mut discount = DiscountSelection::none();
        discount.select(&Discount {
            id: "1".to_string(),
            discount_name: "Senior Citizen".to_string(),
            percent: Percent::from_whole(20),
        });
        discount.set_senior_id("OSCA-77").unwrap();
        discount.set_special_discount(Money::from_pesos(50)).unwrap();

        let payment = PaymentRequest::cash(Money::from_pesos(1000));
        let summary =
            TransactionSummary::compute(&cart, &discount, &CheckoutSettings::default());

        let id = Uuid::nil();
        let body = TransactionRequest::new(id, &cart, &discount, &payment, &summary);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["clientTransactionId"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["items"][0]["itemId"], "17");
        assert_eq!(json["items"][0]["lineTotal"], "1000.00");
        assert_eq!(json["discountPercent"], "20.00");
        assert_eq!(json["seniorId"], "OSCA-77");
        assert_eq!(json["regularDiscount"], "200.00");
        assert_eq!(json["vat"], "90.00");
        assert_eq!(json["totalAmount"], "840.00");
        assert_eq!(json["paymentMethod"], "Cash");
        assert_eq!(json["cashInHand"], "1000.00");
        assert_eq!(json["changeAmount"], "160.00");
        assert!(json["referenceNumber"].is_null());
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(decimal_string(Money::from_centavos(5)), "0.05");
        assert_eq!(decimal_string(Money::from_centavos(-550)), "-5.50");
    }
}
