use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct CreateProductDto {
    pub name: String,
    pub price: Decimal,
    pub owner_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProductDto {
    pub name: Option<String>,
    pub price: Option<Decimal>,
}
