#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub name: String,
    pub email: String,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub name: Option<String>,
    pub email: Option<String>,
}
